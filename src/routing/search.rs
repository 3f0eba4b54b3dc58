// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::{BinaryHeap, HashMap};
use std::sync::Arc;

use log::trace;

use super::cache::{SegmentId, TileGraph};
use super::context::{RoutingContext, SearchDirection};
use super::restriction::{self, JunctionCandidates, Transition};
use super::RoutingError;
use crate::distance::square_root_dist;
use crate::{Point31, Road, RoadKind, RoutingPolicy};

/// (road id, point index) - the unit of the visited-point bookkeeping.
type VisitedKey = (i64, usize);

/// Walk headings along a road: towards lower point indices, then towards higher ones.
type Headings = [bool; 2];

const BOTH_HEADINGS: Headings = [true, true];

/// Segment popped from one of the search frontiers, as reported to search visitors.
#[derive(Debug, Clone, Copy)]
pub struct SegmentVisit<'a> {
    pub road: &'a Road,
    pub point_index: usize,

    /// Known cost (in seconds) from the origin of the popping frontier.
    pub distance_from_start: f64,

    /// Estimated cost (in seconds) to the target of the popping frontier.
    pub distance_to_end: f64,

    /// True if the segment was popped from the frontier growing from the route end.
    pub reverse: bool,
}

#[derive(Debug, Clone, Copy)]
struct QueueItem {
    priority: f64,
    seq: u64,
    segment: SegmentId,
}

impl PartialEq for QueueItem {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for QueueItem {}

impl PartialOrd for QueueItem {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueItem {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // NOTE: We revert the order of comparison,
        // as lower priorities are considered better ("higher"),
        // and Rust's BinaryHeap is a max-heap. Ties go to the earlier insertion.
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Search state of a single segment within a single [Frontier].
#[derive(Debug, Clone, Copy)]
pub(crate) struct Label {
    pub(crate) parent: Option<SegmentId>,

    /// Point index on the parent's road at which this segment was entered.
    pub(crate) parent_end: usize,

    pub(crate) distance_from_start: f64,
    pub(crate) distance_to_end: f64,
    priority: f64,
    seq: u64,
    queued: bool,
}

/// Best known arrival of a [Frontier] at a (road, point) key, for a single walk heading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Visit {
    pub(crate) segment: SegmentId,

    /// Cost (in seconds) between the origin of the frontier and the point.
    pub(crate) cost: f64,

    /// True if `cost` includes the obstacle delay at the point itself.
    pub(crate) delayed: bool,
}

impl Visit {
    fn seed(segment: SegmentId) -> Self {
        Self {
            segment,
            cost: 0.0,
            delayed: false,
        }
    }

    pub(crate) fn reached(segment: SegmentId, cost: f64) -> Self {
        Self {
            segment,
            cost,
            delayed: true,
        }
    }
}

/// Costs closer than this are considered equal.
const COST_TOLERANCE: f64 = 1e-9;

/// One of the two directions of the bidirectional search:
/// a priority queue of segments with their labels, and the visited-point map.
#[derive(Debug)]
pub(crate) struct Frontier {
    pub(crate) reverse: bool,
    target: Point31,
    queue: BinaryHeap<QueueItem>,
    labels: HashMap<SegmentId, Label>,
    visited: HashMap<VisitedKey, [Option<Visit>; 2]>,
    live: usize,
    seq: u64,
}

impl Frontier {
    pub(crate) fn new(reverse: bool, target: Point31) -> Self {
        Self {
            reverse,
            target,
            queue: BinaryHeap::default(),
            labels: HashMap::default(),
            visited: HashMap::default(),
            live: 0,
            seq: 0,
        }
    }

    /// Returns true if no segments are waiting for expansion.
    pub(crate) fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub(crate) fn label(&self, segment: SegmentId) -> Option<&Label> {
        self.labels.get(&segment)
    }

    /// Returns the arrivals at a point, for all walk headings.
    pub(crate) fn visits(&self, key: VisitedKey) -> impl Iterator<Item = Visit> + '_ {
        self.visited.get(&key).into_iter().flatten().flatten().copied()
    }

    /// Returns true if the key was already reached at a cost not higher than `cost`,
    /// by arrivals continuing in all of the provided headings.
    pub(crate) fn is_settled(&self, key: VisitedKey, headings: Headings, cost: f64) -> bool {
        let slots = self.visited.get(&key);
        headings.iter().enumerate().all(|(i, &needed)| {
            !needed
                || slots
                    .and_then(|slots| slots[i])
                    .is_some_and(|v| v.cost <= cost + COST_TOLERANCE)
        })
    }

    /// Records an arrival at a point for the provided headings. Existing arrivals
    /// are only replaced by cheaper ones. Returns true if anything was replaced.
    pub(crate) fn mark_visited(&mut self, key: VisitedKey, headings: Headings, visit: Visit) -> bool {
        let slots = self.visited.entry(key).or_default();
        let mut replaced = false;
        for (slot, needed) in slots.iter_mut().zip(headings) {
            if needed && slot.map_or(true, |existing| visit.cost < existing.cost) {
                *slot = Some(visit);
                replaced = true;
            }
        }
        replaced
    }

    /// Returns the priority of the segment [pop](Self::pop) would return,
    /// dropping superseded queue entries on the way.
    pub(crate) fn min_priority(&mut self) -> Option<f64> {
        while let Some(&item) = self.queue.peek() {
            match self.labels.get(&item.segment) {
                Some(label) if label.queued && label.seq == item.seq => return Some(item.priority),
                _ => {
                    self.queue.pop();
                }
            }
        }
        None
    }

    /// Returns true if a queued segment has a priority below `cost`.
    fn can_improve(&mut self, cost: f64) -> bool {
        self.min_priority()
            .is_some_and(|priority| priority < cost - COST_TOLERANCE)
    }

    /// Queues a segment, or improves its label if the new priority is strictly lower.
    /// Superseded queue entries are skipped when popped.
    pub(crate) fn relax(
        &mut self,
        segment: SegmentId,
        parent: Option<SegmentId>,
        parent_end: usize,
        distance_from_start: f64,
        distance_to_end: f64,
        priority: f64,
    ) -> bool {
        let was_queued = match self.labels.get(&segment) {
            Some(existing) if existing.priority <= priority => return false,
            Some(existing) => existing.queued,
            None => false,
        };

        if !was_queued {
            self.live += 1;
        }

        self.seq += 1;
        self.labels.insert(
            segment,
            Label {
                parent,
                parent_end,
                distance_from_start,
                distance_to_end,
                priority,
                seq: self.seq,
                queued: true,
            },
        );
        self.queue.push(QueueItem {
            priority,
            seq: self.seq,
            segment,
        });
        return true;
    }

    /// Removes the segment with the lowest priority from the queue.
    pub(crate) fn pop(&mut self) -> Option<(SegmentId, Label)> {
        while let Some(item) = self.queue.pop() {
            match self.labels.get_mut(&item.segment) {
                Some(label) if label.queued && label.seq == item.seq => {
                    label.queued = false;
                    self.live -= 1;
                    return Some((item.segment, *label));
                }
                _ => {}
            }
        }
        None
    }
}

/// Pair of segments from both frontiers which reached the same point.
///
/// `direct` (from the forward frontier) was traveled up to its `direct_end` point index,
/// `reverse` (from the reverse frontier) continues from its `reverse_end` point index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Meeting {
    pub(crate) direct: SegmentId,
    pub(crate) direct_end: usize,
    pub(crate) reverse: SegmentId,
    pub(crate) reverse_end: usize,
}

impl Meeting {
    fn new(
        active_reverse: bool,
        own: SegmentId,
        own_end: usize,
        other: SegmentId,
        other_end: usize,
    ) -> Self {
        if active_reverse {
            Self {
                direct: other,
                direct_end: other_end,
                reverse: own,
                reverse_end: own_end,
            }
        } else {
            Self {
                direct: own,
                direct_end: own_end,
                reverse: other,
                reverse_end: other_end,
            }
        }
    }
}

/// Cheapest allowed [Meeting] of both frontiers found so far.
#[derive(Debug)]
struct MeetingCandidates {
    best: Option<(f64, Meeting)>,
    first_only: bool,
}

impl MeetingCandidates {
    fn new(first_only: bool) -> Self {
        Self {
            best: None,
            first_only,
        }
    }

    /// Keeps the meeting if it is cheaper than the best one so far.
    /// Meetings of equal cost keep the earlier one.
    fn offer(&mut self, cost: f64, meeting: Meeting) {
        if let Some((best, _)) = self.best {
            if cost >= best - COST_TOLERANCE {
                return;
            }
        }
        trace!("meeting with cost {:.2}", cost);
        self.best = Some((cost, meeting));
    }

    fn best_cost(&self) -> Option<f64> {
        self.best.map(|(cost, _)| cost)
    }

    /// Returns true if the search should stop looking for other meetings right away.
    fn is_final(&self) -> bool {
        self.first_only && self.best.is_some()
    }
}

/// Final state of both frontiers after a search.
#[derive(Debug)]
pub(crate) struct SearchOutcome {
    pub(crate) forward: Frontier,
    pub(crate) backward: Frontier,
    pub(crate) meeting: Option<Meeting>,
}

/// Point reached while walking along the road of an expanded segment.
struct Arrival<'r> {
    segment: SegmentId,
    label: Label,
    road: &'r Road,
    point_index: usize,
    point: Point31,

    /// Cost of getting from the expanded segment to this point.
    travel: f64,
}

/// Runs the bidirectional search between two segments.
///
/// Every allowed meeting of both frontiers is a route candidate. The search stops
/// once the lowest queued priority of either frontier reaches the cost of the cheapest
/// candidate (or at the first candidate with [RoutingConfig::stop_at_first_meeting]),
/// or when one of the frontiers runs out of segments.
///
/// [RoutingConfig::stop_at_first_meeting]: super::RoutingConfig::stop_at_first_meeting
pub(crate) fn search(
    ctx: &mut RoutingContext<'_>,
    start: SegmentId,
    end: SegmentId,
    visitor: &mut dyn FnMut(&SegmentVisit<'_>),
) -> Result<SearchOutcome, RoutingError> {
    let start_point = ctx.graph.point_of(start);
    let end_point = ctx.graph.point_of(end);
    let estimate = square_root_dist(start_point, end_point) / ctx.policy.max_default_speed();

    let mut forward = Frontier::new(false, end_point);
    let mut backward = Frontier::new(true, start_point);
    seed(ctx, &mut forward, start, estimate)?;
    seed(ctx, &mut backward, end, estimate)?;

    let mut meetings = MeetingCandidates::new(ctx.config.stop_at_first_meeting);
    let mut reverse = ctx.config.direction == SearchDirection::Reverse;
    loop {
        if ctx.is_cancelled() {
            return Err(RoutingError::Cancelled);
        }

        if let Some(cost) = meetings.best_cost() {
            if meetings.is_final() || !forward.can_improve(cost) || !backward.can_improve(cost) {
                break;
            }
        }

        let (active, opposite) = if reverse {
            (&mut backward, &forward)
        } else {
            (&mut forward, &backward)
        };

        let Some((segment, label)) = active.pop() else {
            break;
        };

        ctx.visited_segments += 1;
        if ctx.visited_segments > ctx.config.step_limit {
            return Err(RoutingError::StepLimitExceeded);
        }

        {
            let road = ctx.graph.road_of(segment);
            let point_index = ctx.graph.segment(segment).point;
            trace!(
                "{} pop: road {} point {} (g = {:.2}, h = {:.2})",
                if reverse { "reverse" } else { "forward" },
                road.id,
                point_index,
                label.distance_from_start,
                label.distance_to_end,
            );
            visitor(&SegmentVisit {
                road,
                point_index,
                distance_from_start: label.distance_from_start,
                distance_to_end: label.distance_to_end,
                reverse,
            });
        }

        expand(ctx, active, opposite, &mut meetings, segment, label)?;

        if forward.is_empty() || backward.is_empty() {
            break;
        }

        reverse = match ctx.config.direction {
            SearchDirection::Bidirectional => !reverse,
            SearchDirection::Forward => false,
            SearchDirection::Reverse => true,
        };
    }

    Ok(SearchOutcome {
        forward,
        backward,
        meeting: meetings.best.map(|(_, meeting)| meeting),
    })
}

/// Queues the origin segment and all other roads passing through its point.
fn seed(
    ctx: &mut RoutingContext<'_>,
    frontier: &mut Frontier,
    origin: SegmentId,
    estimate: f64,
) -> Result<(), RoutingError> {
    let origin_at = ctx.graph.point_of(origin);
    let head = ctx.neighbors_at(origin_at)?;
    let graph = &ctx.graph;
    let road = graph.road_of(origin);
    let origin_point = graph.segment(origin).point;
    let priority = ctx
        .policy
        .segment_priority(0.0, estimate, ctx.config.heuristic_coefficient);

    frontier.mark_visited((road.id, origin_point), BOTH_HEADINGS, Visit::seed(origin));
    frontier.relax(origin, None, origin_point, 0.0, estimate, priority);

    let junction: Vec<i64> = graph.chain(head).map(|id| graph.road_of(id).id).collect();
    let present = |id: i64| junction.contains(&id);

    let mut candidates = JunctionCandidates::new(frontier.reverse);
    for sibling in graph.chain(head) {
        let sibling_road = graph.road_of(sibling);
        if sibling_road.id == road.id || sibling_road.kind != RoadKind::Line {
            continue;
        }

        let transition = if frontier.reverse {
            restriction::check_transition(sibling_road, road, &present)
        } else {
            restriction::check_transition(road, sibling_road, &present)
        };
        candidates.offer(sibling, transition);
    }

    for sibling in candidates.into_admissible() {
        let key = (graph.road_of(sibling).id, graph.segment(sibling).point);
        frontier.mark_visited(key, BOTH_HEADINGS, Visit::seed(sibling));
        frontier.relax(sibling, Some(origin), origin_point, 0.0, estimate, priority);
    }

    Ok(())
}

/// Walks along the road of a popped segment, alternating between both directions
/// (as far as one-way rules allow), and relaxes continuations at every point reached.
fn expand(
    ctx: &mut RoutingContext<'_>,
    active: &mut Frontier,
    opposite: &Frontier,
    meetings: &mut MeetingCandidates,
    segment: SegmentId,
    label: Label,
) -> Result<(), RoutingError> {
    let road = Arc::clone(ctx.graph.road_of(segment));
    let middle = ctx.graph.segment(segment).point;

    let key = (road.id, middle);
    active.mark_visited(
        key,
        BOTH_HEADINGS,
        Visit::reached(segment, label.distance_from_start),
    );
    for own in active.visits(key) {
        for other in opposite.visits(key) {
            offer_meeting(ctx, active, opposite, meetings, (own, middle), (other, middle), 0.0);
            if meetings.is_final() {
                return Ok(());
            }
        }
    }

    restriction::log_unknown_targets(&road, |id| ctx.graph.road(id).is_some());

    let one_way = ctx.policy.is_one_way(&road);
    let mut minus_allowed = !one_way || active.reverse;
    let mut plus_allowed = !one_way || !active.reverse;

    let mut speed = ctx.policy.define_speed(&road);
    if speed <= 0.0 {
        speed = ctx.policy.min_default_speed();
    }

    // (last point, distance, obstacle delay) walked towards lower and higher indices
    let mut walked = [(road.points[middle], 0.0_f64, 0.0_f64); 2];

    // Offsets from the middle point go +1, -1, +2, -2, ..., skipping disallowed directions
    let mut d: isize = if plus_allowed { 1 } else { -1 };
    while minus_allowed || plus_allowed {
        let segment_end = middle as isize + d;
        if !minus_allowed && d > 0 {
            d += 1;
        } else if !plus_allowed && d < 0 {
            d -= 1;
        } else if d <= 0 {
            d = -d + 1;
        } else {
            d = -d;
        }

        if segment_end < 0 {
            minus_allowed = false;
            continue;
        }
        let segment_end = segment_end as usize;
        if segment_end >= road.len() {
            plus_allowed = false;
            continue;
        }

        let point = road.points[segment_end];
        let head = ctx.neighbors_at(point)?;

        let (last, distance, obstacles) = &mut walked[usize::from(segment_end > middle)];
        *distance += square_root_dist(*last, point);
        *last = point;
        *obstacles += obstacle_delay(&ctx.graph, ctx.policy, ctx.graph.chain(head));
        let travel = *distance / speed + *obstacles;

        let key = (road.id, segment_end);
        let own = Visit::reached(segment, label.distance_from_start + travel);
        for other in opposite.visits(key) {
            offer_meeting(
                ctx,
                active,
                opposite,
                meetings,
                (own, segment_end),
                (other, segment_end),
                0.0,
            );
            if meetings.is_final() {
                return Ok(());
            }
        }
        active.mark_visited(key, [segment_end < middle, segment_end > middle], own);

        let arrival = Arrival {
            segment,
            label,
            road: &road,
            point_index: segment_end,
            point,
            travel,
        };
        process_junction(ctx, active, opposite, meetings, &arrival, head);
        if meetings.is_final() {
            return Ok(());
        }
    }

    Ok(())
}

/// Evaluates all roads passing through the arrival point: offers meetings
/// with the opposite frontier, and relaxes the admissible continuations.
fn process_junction(
    ctx: &RoutingContext<'_>,
    active: &mut Frontier,
    opposite: &Frontier,
    meetings: &mut MeetingCandidates,
    arrival: &Arrival<'_>,
    head: Option<SegmentId>,
) {
    let graph = &ctx.graph;
    let policy = ctx.policy;
    let config = &ctx.config;
    let road = arrival.road;
    let arrived = arrival.label.distance_from_start + arrival.travel;

    let junction: Vec<i64> = graph.chain(head).map(|id| graph.road_of(id).id).collect();
    let present = |id: i64| junction.contains(&id);
    let current_rank = policy.road_priority_heuristic_to_increase(road);

    let mut candidates = JunctionCandidates::new(active.reverse);
    for next in graph.chain(head) {
        let next_road = graph.road_of(next);
        if next_road.kind != RoadKind::Line {
            continue;
        }

        let transition = if active.reverse {
            restriction::check_transition(next_road, road, &present)
        } else {
            restriction::check_transition(road, next_road, &present)
        };
        if transition == Transition::Forbidden {
            continue;
        }

        let next_point = graph.segment(next).point;
        let key = (next_road.id, next_point);
        let turn = turn_time(policy, active.reverse, arrival, next_road, next_point);
        for other in opposite.visits(key) {
            let own = Visit::reached(arrival.segment, arrived);
            offer_meeting(
                ctx,
                active,
                opposite,
                meetings,
                (own, arrival.point_index),
                (other, next_point),
                turn,
            );
            if meetings.is_final() {
                return;
            }
        }

        // The walk along the arrival road already continues past this point
        if next_road.id == road.id && next_point == arrival.point_index {
            continue;
        }

        let headings = walk_headings(policy, active.reverse, next_road, next_point);
        if active.is_settled(key, headings, arrived + turn) {
            continue;
        }

        if config.increasing_road_priorities
            && policy.road_priority_heuristic_to_increase(next_road) < current_rank
        {
            continue;
        }

        candidates.offer(next, transition);
    }

    let estimate = square_root_dist(arrival.point, active.target) / policy.max_default_speed();
    for next in candidates.into_admissible() {
        let next_road = graph.road_of(next);
        let next_point = graph.segment(next).point;

        let mut distance_to_end = estimate;
        if config.dynamic_road_prioritising {
            distance_to_end /= policy.road_priority_to_calculate_route(next_road);
        }

        let turn = turn_time(policy, active.reverse, arrival, next_road, next_point);
        let distance_from_start = arrived + turn;
        let priority = policy.segment_priority(
            distance_from_start,
            distance_to_end,
            config.heuristic_coefficient,
        );

        if active.relax(
            next,
            Some(arrival.segment),
            arrival.point_index,
            distance_from_start,
            distance_to_end,
            priority,
        ) {
            trace!(
                "relaxed road {} point {} (g = {:.2}, h = {:.2})",
                next_road.id,
                next_point,
                distance_from_start,
                distance_to_end,
            );
        }
    }
}

/// Returns the headings in which a frontier would walk `road` from its `point`-th point.
fn walk_headings(policy: &dyn RoutingPolicy, reverse: bool, road: &Road, point: usize) -> Headings {
    let one_way = policy.is_one_way(road);
    [
        point > 0 && (!one_way || reverse),
        point + 1 < road.len() && (!one_way || !reverse),
    ]
}

/// Returns the delay of turning between the arrival road and `next`, in travel order.
fn turn_time(
    policy: &dyn RoutingPolicy,
    reverse: bool,
    arrival: &Arrival<'_>,
    next: &Road,
    next_point: usize,
) -> f64 {
    if reverse {
        policy.calculate_turn_time(next, next_point, arrival.road, arrival.point_index)
    } else {
        policy.calculate_turn_time(arrival.road, arrival.point_index, next, next_point)
    }
}

/// Sums the obstacle delays of all segments at a single point.
fn obstacle_delay(
    graph: &TileGraph,
    policy: &dyn RoutingPolicy,
    chain: impl Iterator<Item = SegmentId>,
) -> f64 {
    chain
        .map(|id| policy.define_obstacle(graph.road_of(id), graph.segment(id).point))
        .sum()
}

/// Validates a meeting and offers it as a route candidate.
///
/// The candidate costs the arrivals of both frontiers at the meeting point
/// plus the turn between them. An obstacle at the meeting point is counted once.
fn offer_meeting(
    ctx: &RoutingContext<'_>,
    active: &Frontier,
    opposite: &Frontier,
    meetings: &mut MeetingCandidates,
    (own, own_end): (Visit, usize),
    (other, other_end): (Visit, usize),
    turn: f64,
) {
    let meeting = Meeting::new(active.reverse, own.segment, own_end, other.segment, other_end);
    if !meeting_allowed(&ctx.graph, active, opposite, &meeting) {
        return;
    }

    let mut cost = own.cost + turn + other.cost;
    if own.delayed && other.delayed {
        let at = ctx.graph.road_of(meeting.direct).points[meeting.direct_end];
        cost -= obstacle_delay(&ctx.graph, ctx.policy, ctx.graph.chain_at(at));
    }
    meetings.offer(cost, meeting);
}

/// Checks that joining both frontiers does not create a restricted turn.
///
/// A frontier may enter a road exactly at the meeting point; the road traveled
/// before (or after) the meeting is then the one its segment was entered from.
fn meeting_allowed(
    graph: &TileGraph,
    active: &Frontier,
    opposite: &Frontier,
    meeting: &Meeting,
) -> bool {
    let (forward, backward) = if active.reverse {
        (opposite, active)
    } else {
        (active, opposite)
    };

    // Both trees traveling the same road towards the meeting point means turning around there
    if graph.road_of(meeting.direct).id == graph.road_of(meeting.reverse).id {
        let incoming = travel_direction(graph.segment(meeting.direct).point, meeting.direct_end);
        let outgoing = travel_direction(meeting.reverse_end, graph.segment(meeting.reverse).point);
        if incoming * outgoing < 0 {
            trace!("rejected meeting turning around on road {}", graph.road_of(meeting.direct).id);
            return false;
        }
    }

    let incoming = effective_road(graph, forward, meeting.direct, meeting.direct_end);
    let outgoing = effective_road(graph, backward, meeting.reverse, meeting.reverse_end);
    let (Some(from), Some(to)) = (incoming, outgoing) else {
        return true;
    };
    if from.id == to.id {
        return true;
    }

    let at = graph.road_of(meeting.direct).points[meeting.direct_end];
    let junction: Vec<i64> = graph.chain_at(at).map(|id| graph.road_of(id).id).collect();
    let transition = restriction::check_transition(from, to, |id| junction.contains(&id));
    if transition == Transition::Forbidden {
        trace!("rejected meeting turning from road {} to {}", from.id, to.id);
        return false;
    }
    return true;
}

fn travel_direction(from: usize, to: usize) -> i8 {
    match from.cmp(&to) {
        std::cmp::Ordering::Less => 1,
        std::cmp::Ordering::Equal => 0,
        std::cmp::Ordering::Greater => -1,
    }
}

fn effective_road<'g>(
    graph: &'g TileGraph,
    frontier: &Frontier,
    segment: SegmentId,
    end: usize,
) -> Option<&'g Road> {
    if graph.segment(segment).point != end {
        return Some(graph.road_of(segment).as_ref());
    }

    // Seed hops at the very end of a route are extended onto the seed road,
    // seed hops at the very start are dropped.
    let label = frontier.label(segment)?;
    match label.parent {
        Some(parent) if graph.segment(parent).point != label.parent_end => {
            Some(graph.road_of(parent).as_ref())
        }
        Some(parent) => frontier.reverse.then(|| graph.road_of(parent).as_ref()),
        None => frontier.reverse.then(|| graph.road_of(segment).as_ref()),
    }
}

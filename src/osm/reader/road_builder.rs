// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::HashMap;

use log::{debug, warn};

use super::model::{self, MemberType, Role};
use super::Options;
use crate::{MemoryMapData, Point31, Restriction, Road, RoadKind, TagValue};

/// Returns the [Road] id of an OSM way.
pub fn way_road_id(way_id: i64) -> i64 {
    way_id << 1
}

/// Returns the [Road] id of an OSM node loaded as a [point road](RoadKind::Point).
pub fn node_road_id(node_id: i64) -> i64 {
    (node_id << 1) | 1
}

/// Helper object used for storing state related to converting [OSM elements](model::Element)
/// into [Roads](Road).
pub(super) struct RoadBuilder<'a> {
    options: &'a Options<'a>,
    nodes: HashMap<i64, Point31>,
    roads: Vec<Road>,

    /// Maps OSM way ids to indices into `roads`.
    ways: HashMap<i64, usize>,
}

impl<'a> RoadBuilder<'a> {
    /// Create a new, empty road builder.
    pub(super) fn new(options: &'a Options<'a>) -> Self {
        Self {
            options,
            nodes: HashMap::default(),
            roads: Vec::default(),
            ways: HashMap::default(),
        }
    }

    /// Add all elements from the provided iterator, returning all created roads.
    pub(super) fn add_elements<I, E>(mut self, elements: I) -> Result<MemoryMapData, E>
    where
        I: IntoIterator<Item = Result<model::Element, E>>,
    {
        for e in elements {
            match e? {
                model::Element::Node(n) => self.add_node(n),
                model::Element::Way(w) => self.add_way(w),
                model::Element::TurnRestriction(r) => self.add_restriction(r),
            }
        }
        debug!(
            "loaded {} roads from {} nodes",
            self.roads.len(),
            self.nodes.len()
        );
        Ok(MemoryMapData::from_roads(self.roads))
    }

    fn add_node(&mut self, n: model::Node) {
        self.nodes.insert(n.id, n.at);

        if let Some(tags) = n.obstacle_tags {
            self.roads.push(Road {
                id: node_road_id(n.id),
                kind: RoadKind::Point,
                points: vec![n.at],
                types: sorted_tags(tags),
                one_way: false,
                name: None,
                restrictions: Vec::default(),
            });
        }
    }

    fn add_way(&mut self, w: model::Way) {
        let (forward, backward) = self.options.profile.way_direction(&w.tags);
        if !forward && !backward {
            return;
        }

        let mut points = self.get_way_points(&w);
        if points.len() < 2 {
            warn!("way {} has less than 2 known nodes - skipping", w.id);
            return;
        }

        // Ways traversable only backwards are stored reversed,
        // as one-way roads always go towards increasing indices.
        if !forward {
            points.reverse();
        }

        let name = w.tags.get("name").cloned();
        self.ways.insert(w.id, self.roads.len());
        self.roads.push(Road {
            id: way_road_id(w.id),
            kind: RoadKind::Line,
            points,
            types: sorted_tags(w.tags),
            one_way: forward != backward,
            name,
            restrictions: Vec::default(),
        });
    }

    /// Returns the positions of way nodes, skipping references to unknown nodes.
    fn get_way_points(&self, w: &model::Way) -> Vec<Point31> {
        w.nodes
            .iter()
            .filter_map(|node_id| self.nodes.get(node_id).copied())
            .collect()
    }

    fn add_restriction(&mut self, r: model::TurnRestriction) {
        if let Err(e) = self.store_restriction(&r) {
            warn!("skipping turn restriction {}: {}", r.id, e);
        }
    }

    /// Attaches a from-way, via-node, to-way restriction to the `from` road.
    fn store_restriction(&mut self, r: &model::TurnRestriction) -> Result<(), InvalidRestriction> {
        let from = Self::get_single_member(r, Role::From)?;
        let via = Self::get_single_member(r, Role::Via)?;
        let to = Self::get_single_member(r, Role::To)?;

        let from_idx = self.get_way_index(from)?;
        let to_idx = self.get_way_index(to)?;
        let via_point = match via.type_ {
            MemberType::Node => *self
                .nodes
                .get(&via.ref_)
                .ok_or(InvalidRestriction::ReferenceToUnknownNode(via.ref_))?,
            type_ => return Err(InvalidRestriction::UnsupportedVia(type_)),
        };

        let touches = |idx: usize| self.roads[idx].points.contains(&via_point);
        if !touches(from_idx) || !touches(to_idx) {
            return Err(InvalidRestriction::Disjoint);
        }

        let to_id = self.roads[to_idx].id;
        self.roads[from_idx]
            .restrictions
            .push(Restriction {
                to: to_id,
                kind: r.kind,
            });
        Ok(())
    }

    fn get_single_member(
        r: &model::TurnRestriction,
        role: Role,
    ) -> Result<model::Member, InvalidRestriction> {
        let mut members = r.members.iter().filter(|m| m.role == role);
        match (members.next(), members.next()) {
            (Some(&m), None) => Ok(m),
            (None, _) => Err(InvalidRestriction::MissingMember(role)),
            (Some(_), Some(_)) => Err(InvalidRestriction::MultipleMembers(role)),
        }
    }

    fn get_way_index(&self, m: model::Member) -> Result<usize, InvalidRestriction> {
        if m.type_ != MemberType::Way {
            return Err(InvalidRestriction::InvalidMemberType(m.role, m.type_));
        }
        self.ways
            .get(&m.ref_)
            .copied()
            .ok_or(InvalidRestriction::ReferenceToUnknownWay(m.ref_))
    }
}

/// Converts element tags into [TagValue]s, ordered by key.
fn sorted_tags(tags: HashMap<String, String>) -> Vec<TagValue> {
    let mut types: Vec<TagValue> = tags
        .into_iter()
        .map(|(tag, value)| TagValue { tag, value })
        .collect();
    types.sort_by(|a, b| a.tag.cmp(&b.tag));
    return types;
}

#[derive(Debug, thiserror::Error)]
enum InvalidRestriction {
    #[error("disjoint turn restriction")]
    Disjoint,

    #[error("missing '{0}' member")]
    MissingMember(Role),

    #[error("multiple '{0}' members")]
    MultipleMembers(Role),

    #[error("reference to unknown node {0}")]
    ReferenceToUnknownNode(i64),

    #[error("reference to unknown way {0}")]
    ReferenceToUnknownWay(i64),

    #[error("member with role {0} can't be of type {1}")]
    InvalidMemberType(Role, MemberType),

    #[error("'via' members of type {0} are not supported")]
    UnsupportedVia(MemberType),
}

// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use log::debug;

use crate::Road;

/// Classification of a single move between two roads at a junction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Transition {
    /// The move is prohibited - by a `no_*` restriction, or by an `only_*`
    /// restriction pointing at some other road present at the junction.
    Forbidden,

    /// The move is required by an `only_*` restriction.
    Prescribed,

    /// No restriction applies.
    Ordinary,
}

/// Classifies traveling from `from` onto `to` at a junction, where `at_junction`
/// tells whether a road (by id) passes through the junction.
///
/// Mandatory restrictions of `from` only take effect if their target is present
/// at the junction - restrictions are stored on roads, not on junctions.
pub(crate) fn check_transition<F: Fn(i64) -> bool>(
    from: &Road,
    to: &Road,
    at_junction: F,
) -> Transition {
    if let Some(kind) = from.restriction_to(to.id) {
        return if kind.is_prohibitory() {
            Transition::Forbidden
        } else {
            Transition::Prescribed
        };
    }

    let prescribed_elsewhere = from
        .restrictions
        .iter()
        .any(|r| r.kind.is_mandatory() && at_junction(r.to));

    if prescribed_elsewhere {
        Transition::Forbidden
    } else {
        Transition::Ordinary
    }
}

/// Collects continuations available at a single junction.
///
/// When expanding forward, the current road is the "from" road of every move,
/// so a single prescribed continuation excludes all ordinary ones. When expanding
/// backwards, every candidate is the "from" road of its own move, and prescriptions
/// of one candidate say nothing about the others.
#[derive(Debug)]
pub(crate) struct JunctionCandidates<T> {
    exclusive: bool,
    ordinary: Vec<T>,
    prescribed: Vec<T>,
}

impl<T> JunctionCandidates<T> {
    pub(crate) fn new(reverse: bool) -> Self {
        Self {
            exclusive: !reverse,
            ordinary: Vec::default(),
            prescribed: Vec::default(),
        }
    }

    pub(crate) fn offer(&mut self, candidate: T, transition: Transition) {
        match transition {
            Transition::Forbidden => {}
            Transition::Prescribed => {
                if self.exclusive {
                    self.ordinary.clear();
                }
                self.prescribed.push(candidate);
            }
            Transition::Ordinary => {
                if !self.exclusive || self.prescribed.is_empty() {
                    self.ordinary.push(candidate);
                }
            }
        }
    }

    /// Returns the continuations to relax, in the order they were offered
    /// (prescribed ones first, when not exclusive).
    pub(crate) fn into_admissible(mut self) -> Vec<T> {
        if self.exclusive && !self.prescribed.is_empty() {
            return self.prescribed;
        }
        self.prescribed.append(&mut self.ordinary);
        return self.prescribed;
    }
}

/// Logs restrictions of `road` pointing at roads which were never loaded.
pub(crate) fn log_unknown_targets<F: Fn(i64) -> bool>(road: &Road, is_known: F) {
    for r in &road.restrictions {
        if !is_known(r.to) {
            debug!(
                "road {} has {} restriction to unknown road {}",
                road.id, r.kind, r.to
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::road;
    use crate::RestrictionKind;

    fn present(ids: &'static [i64]) -> impl Fn(i64) -> bool {
        move |id| ids.contains(&id)
    }

    #[test]
    fn unrestricted() {
        let a = road(1, &[(0, 0), (10, 0)]);
        let b = road(2, &[(10, 0), (10, 10)]);
        assert_eq!(check_transition(&a, &b, present(&[1, 2])), Transition::Ordinary);
    }

    #[test]
    fn prohibitory() {
        let a = road(1, &[(0, 0), (10, 0)]).with_restriction(2, RestrictionKind::NoLeftTurn);
        let b = road(2, &[(10, 0), (10, 10)]);
        let c = road(3, &[(10, 0), (20, 0)]);
        assert_eq!(check_transition(&a, &b, present(&[1, 2, 3])), Transition::Forbidden);
        assert_eq!(check_transition(&a, &c, present(&[1, 2, 3])), Transition::Ordinary);
        assert_eq!(check_transition(&b, &a, present(&[1, 2, 3])), Transition::Ordinary);
    }

    #[test]
    fn mandatory() {
        let a = road(1, &[(0, 0), (10, 0)]).with_restriction(3, RestrictionKind::OnlyStraightOn);
        let b = road(2, &[(10, 0), (10, 10)]);
        let c = road(3, &[(10, 0), (20, 0)]);
        assert_eq!(check_transition(&a, &b, present(&[1, 2, 3])), Transition::Forbidden);
        assert_eq!(check_transition(&a, &c, present(&[1, 2, 3])), Transition::Prescribed);

        // The target isn't at this junction - the restriction applies elsewhere
        assert_eq!(check_transition(&a, &b, present(&[1, 2])), Transition::Ordinary);
    }

    #[test]
    fn forward_candidates() {
        let mut c = JunctionCandidates::new(false);
        c.offer(1, Transition::Ordinary);
        c.offer(2, Transition::Forbidden);
        c.offer(3, Transition::Ordinary);
        assert_eq!(c.into_admissible(), vec![1, 3]);

        let mut c = JunctionCandidates::new(false);
        c.offer(1, Transition::Ordinary);
        c.offer(2, Transition::Prescribed);
        c.offer(3, Transition::Ordinary);
        assert_eq!(c.into_admissible(), vec![2]);
    }

    #[test]
    fn reverse_candidates() {
        let mut c = JunctionCandidates::new(true);
        c.offer(1, Transition::Ordinary);
        c.offer(2, Transition::Prescribed);
        c.offer(3, Transition::Forbidden);
        c.offer(4, Transition::Ordinary);
        assert_eq!(c.into_admissible(), vec![2, 1, 4]);
    }

    #[test]
    fn no_candidates() {
        let c = JunctionCandidates::<i32>::new(false);
        assert_eq!(c.into_admissible(), Vec::<i32>::default());
    }
}

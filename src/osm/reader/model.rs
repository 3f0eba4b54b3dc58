// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::HashMap;

use crate::{Point31, RestrictionKind};

/// [OSM node](https://wiki.openstreetmap.org/wiki/Node), already projected onto the grid.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct Node {
    pub(super) id: i64,
    pub(super) at: Point31,

    /// Tags of nodes which the profile considers obstacles, `None` for all other nodes.
    pub(super) obstacle_tags: Option<HashMap<String, String>>,
}

/// [OSM way](https://wiki.openstreetmap.org/wiki/Way) with a road class known to the profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Way {
    pub(super) id: i64,
    pub(super) nodes: Vec<i64>,
    pub(super) tags: HashMap<String, String>,
}

/// Type of the element referenced by a restriction [Member].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum MemberType {
    Node,
    Way,
    Relation,
}

impl MemberType {
    pub(super) fn parse(s: &[u8]) -> Option<Self> {
        match s {
            b"node" => Some(Self::Node),
            b"way" => Some(Self::Way),
            b"relation" => Some(Self::Relation),
            _ => None,
        }
    }
}

impl std::fmt::Display for MemberType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Node => "node",
            Self::Way => "way",
            Self::Relation => "relation",
        })
    }
}

/// Role of a turn restriction [Member]. Members with other roles are not kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Role {
    From,
    Via,
    To,
}

impl Role {
    pub(super) fn parse(s: &[u8]) -> Option<Self> {
        match s {
            b"from" => Some(Self::From),
            b"via" => Some(Self::Via),
            b"to" => Some(Self::To),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::From => "from",
            Self::Via => "via",
            Self::To => "to",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Member {
    pub(super) role: Role,
    pub(super) type_: MemberType,
    pub(super) ref_: i64,
}

/// [Turn restriction](https://wiki.openstreetmap.org/wiki/Relation:restriction)
/// relation which applies to the profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct TurnRestriction {
    pub(super) id: i64,
    pub(super) kind: RestrictionKind,
    pub(super) members: Vec<Member>,
}

/// OSM element relevant for building roads.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum Element {
    Node(Node),
    Way(Way),
    TurnRestriction(TurnRestriction),
}

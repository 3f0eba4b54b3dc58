// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::Point31;

/// A single tag of a [Road] - key-value pair describing it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TagValue {
    pub tag: String,
    pub value: String,
}

impl TagValue {
    pub fn new(tag: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            value: value.into(),
        }
    }
}

/// Differentiates between routable polylines and single-point features
/// (like traffic signals or barriers) which only carry obstacle information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoadKind {
    Line,
    Point,
}

/// Kind of a turn restriction declared by a [Road] towards another road.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RestrictionKind {
    NoLeftTurn,
    NoRightTurn,
    NoStraightOn,
    NoUTurn,
    OnlyLeftTurn,
    OnlyRightTurn,
    OnlyStraightOn,
}

impl RestrictionKind {
    /// Parses the value of a `restriction=*` tag. Returns `None` for unknown values.
    pub fn from_tag_value(value: &str) -> Option<Self> {
        match value {
            "no_left_turn" => Some(Self::NoLeftTurn),
            "no_right_turn" => Some(Self::NoRightTurn),
            "no_straight_on" => Some(Self::NoStraightOn),
            "no_u_turn" => Some(Self::NoUTurn),
            "only_left_turn" => Some(Self::OnlyLeftTurn),
            "only_right_turn" => Some(Self::OnlyRightTurn),
            "only_straight_on" => Some(Self::OnlyStraightOn),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoLeftTurn => "no_left_turn",
            Self::NoRightTurn => "no_right_turn",
            Self::NoStraightOn => "no_straight_on",
            Self::NoUTurn => "no_u_turn",
            Self::OnlyLeftTurn => "only_left_turn",
            Self::OnlyRightTurn => "only_right_turn",
            Self::OnlyStraightOn => "only_straight_on",
        }
    }

    /// Returns true if this restriction forbids the turn to its target.
    pub fn is_prohibitory(self) -> bool {
        matches!(
            self,
            Self::NoLeftTurn | Self::NoRightTurn | Self::NoStraightOn | Self::NoUTurn
        )
    }

    /// Returns true if this restriction makes its target the only allowed continuation.
    pub fn is_mandatory(self) -> bool {
        !self.is_prohibitory()
    }
}

impl std::fmt::Display for RestrictionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Turn restriction from the declaring [Road] to the road with the `to` id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Restriction {
    pub to: i64,
    pub kind: RestrictionKind,
}

/// Immutable road record, as returned by a [MapDataProvider](crate::MapDataProvider).
///
/// Roads are shared between the provider and all routing caches through an `Arc`.
/// The same road (by `id`) may be returned multiple times by different tile queries;
/// a provider may even return only a partial copy of a road crossing tile boundaries.
/// Copies with more points are considered more complete.
#[derive(Debug, Clone, PartialEq)]
pub struct Road {
    pub id: i64,
    pub kind: RoadKind,
    pub points: Vec<Point31>,
    pub types: Vec<TagValue>,
    pub one_way: bool,
    pub name: Option<String>,
    pub restrictions: Vec<Restriction>,
}

impl Road {
    /// Creates a bidirectional, untagged line road.
    pub fn line(id: i64, points: Vec<Point31>) -> Self {
        Self {
            id,
            kind: RoadKind::Line,
            points,
            types: Vec::default(),
            one_way: false,
            name: None,
            restrictions: Vec::default(),
        }
    }

    /// Creates an untagged single-point feature.
    pub fn point(id: i64, at: Point31) -> Self {
        Self {
            id,
            kind: RoadKind::Point,
            points: vec![at],
            types: Vec::default(),
            one_way: false,
            name: None,
            restrictions: Vec::default(),
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>, value: impl Into<String>) -> Self {
        self.types.push(TagValue::new(tag, value));
        self
    }

    pub fn with_one_way(mut self, one_way: bool) -> Self {
        self.one_way = one_way;
        self
    }

    pub fn with_restriction(mut self, to: i64, kind: RestrictionKind) -> Self {
        self.restrictions.push(Restriction { to, kind });
        self
    }

    /// Number of points of this road.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the value of the first tag with the provided key.
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.types
            .iter()
            .find(|t| t.tag == key)
            .map(|t| t.value.as_str())
    }

    /// Returns the kind of restriction this road declares towards `to_road_id`, if any.
    pub fn restriction_to(&self, to_road_id: i64) -> Option<RestrictionKind> {
        self.restrictions
            .iter()
            .find(|r| r.to == to_road_id)
            .map(|r| r.kind)
    }
}

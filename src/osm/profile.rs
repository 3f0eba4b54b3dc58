// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::HashMap;

use crate::{RestrictionKind, Road, RoadKind, RoutingPolicy, TagValue};

/// Source of OSM-like tags: raw element tags, or a loaded [Road].
pub trait Tags {
    fn get_tag(&self, key: &str) -> Option<&str>;
}

impl Tags for HashMap<String, String> {
    fn get_tag(&self, key: &str) -> Option<&str> {
        self.get(key).map(|v| v.as_str())
    }
}

impl Tags for Road {
    fn get_tag(&self, key: &str) -> Option<&str> {
        self.tag(key)
    }
}

/// Describes how to interpret OSM data for routing, and how expensive it is to travel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Profile<'a> {
    /// Human readable name of the routing profile,
    /// customary the most specific [access tag](https://wiki.openstreetmap.org/wiki/Key:access).
    ///
    /// This values us not used for actual OSM data interpretation,
    /// except when set to "foot", which adds the following logic:
    /// - `oneway` tags are ignored - only `oneway:foot` tags are considered, except on:
    ///    - `highway=footway`,
    ///    - `highway=path`,
    ///    - `highway=steps`,
    ///    - `highway=platform`
    ///    - `public_transport=platform`,
    ///    - `railway=platform`;
    /// - only `restriction:foot` turn restrictions are considered.
    pub name: &'a str,

    /// Array of road classes which OSM ways can be used for routing.
    ///
    /// A way is matched against all [RoadClass] objects in order, and
    /// once an exact key and value match is found, the way is used for routing
    /// with the speed and priority of the class. Ways without a matching class are not
    /// routable.
    ///
    /// All speeds must be finite and greater than zero.
    pub road_classes: &'a [RoadClass<'a>],

    /// Array of OSM node tags which slow down travel through the node.
    /// Nodes matching any [Obstacle] are loaded as [point roads](RoadKind::Point).
    pub obstacles: &'a [Obstacle<'a>],

    /// Array of OSM [access tags](https://wiki.openstreetmap.org/wiki/Key:access#Land-based_transportation)
    /// (in order from least to most specific) to consider when checking for road prohibitions.
    ///
    /// This array is used mainly used to follow the access tags, but also to follow mode-specific
    /// one-way and turn restrictions (see [Profile::is_allowed], [Profile::way_direction] and
    /// [Profile::is_exempted]).
    pub access: &'a [&'a str],

    /// Force no routing over [motorroad=yes](https://wiki.openstreetmap.org/wiki/Key:motorroad) ways.
    pub disallow_motorroad: bool,

    /// Force ignoring of [turn restrictions](https://wiki.openstreetmap.org/wiki/Turn_restriction).
    pub disable_restrictions: bool,

    /// Time (in seconds) added when changing from one road to another.
    pub turn_time: f32,
}

/// Speed and priority of OSM ways with specific keys and values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoadClass<'a> {
    /// Key of an OSM way for which this RoadClass applies,
    /// used for [RoadClass::value] comparison (e.g. "highway" or "railway")
    pub key: &'a str,

    /// Value under [RoadClass::key] of an OSM way for which this RoadClass applies.
    /// E.g. "motorway", "residential" or "cycleway".
    pub value: &'a str,

    /// Travel speed in km/h, possibly lowered by a `maxspeed` tag.
    pub speed: f32,

    /// Preference for the road class, used by
    /// [dynamic road prioritising](crate::RoutingConfig::dynamic_road_prioritising) and
    /// [increasing road priorities](crate::RoutingConfig::increasing_road_priorities).
    /// Must be greater than zero; more important roads have higher priorities.
    pub priority: f32,
}

/// Delay of passing through OSM nodes with a specific key and value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle<'a> {
    pub key: &'a str,
    pub value: &'a str,

    /// Delay in seconds.
    pub delay: f32,
}

impl<'a> Profile<'a> {
    /// Finds the first matching [RoadClass] for a way with given tags.
    /// If there is no matching class, or if the way is disallowed
    /// by the access tags (as determined by [Profile::is_allowed]), returns `None`.
    pub fn way_class<T: Tags + ?Sized>(&self, tags: &T) -> Option<&'a RoadClass<'a>> {
        let class = self.get_class(tags)?;
        if !self.is_allowed(tags) {
            return None;
        }
        return Some(class);
    }

    /// Returns the first matching road class from way tags.
    fn get_class<T: Tags + ?Sized>(&self, tags: &T) -> Option<&'a RoadClass<'a>> {
        self.road_classes
            .iter()
            .find(|c| tags.get_tag(c.key) == Some(c.value))
    }

    /// Returns the delay of the first [Obstacle] matching the node tags.
    pub fn node_obstacle<T: Tags + ?Sized>(&self, tags: &T) -> Option<f32> {
        self.obstacles
            .iter()
            .find(|o| tags.get_tag(o.key) == Some(o.value))
            .map(|o| o.delay)
    }

    /// Checks if the way is routable, by considering motor roads ([Profile::disallow_motorroad])
    /// and access tags ([Profile::access]).
    pub fn is_allowed<T: Tags + ?Sized>(&self, tags: &T) -> bool {
        // Check against the motorroad tag
        if self.disallow_motorroad && tags.get_tag("motorroad") == Some("yes") {
            return false;
        }

        // Check against the access tags
        match self
            .access
            .iter()
            .rev()
            .find_map(|&mode| tags.get_tag(mode))
        {
            Some("no") | Some("private") => false,
            _ => true,
        }
    }

    /// Checks if a way is traversable forward (first return value) and
    /// backwards (second return value) by investigating mode-specific and generic one-way tags.
    ///
    /// Some ways (highway=motorway, highway=motorway_link, junction=roundabout and
    /// junction=circular) default to being one-way, except if overridden by specific tags.
    pub fn way_direction<T: Tags + ?Sized>(&self, tags: &T) -> (bool, bool) {
        let mut forward = true;
        let mut backward = true;

        // Default one-way ways (foot profile exception - does not apply)
        if !self.apply_foot_exceptions() {
            match tags.get_tag("highway").unwrap_or("") {
                "motorway" | "motorway_link" => {
                    backward = false;
                }
                _ => {}
            }

            match tags.get_tag("junction").unwrap_or("") {
                "roundabout" | "circular" => {
                    backward = false;
                }
                _ => {}
            }
        }

        // Check the oneway tag
        match self.get_active_oneway_value(tags) {
            "yes" | "true" | "1" => {
                forward = true;
                backward = false;
            }

            "-1" | "reverse" => {
                forward = false;
                backward = true;
            }

            "no" => {
                forward = true;
                backward = true;
            }

            _ => {}
        }

        return (forward, backward);
    }

    /// Returns the value of the most specific "oneway:MODE" tag (based on [Profile::access]),
    /// falling back to simply "oneway", and returning an empty string if no relevant tag was found.
    fn get_active_oneway_value<'t, T: Tags + ?Sized>(&self, tags: &'t T) -> &'t str {
        if self.apply_foot_exceptions() {
            // foot profile exception - only consider "oneway:foot" and "oneway" in select cases
            if let Some(oneway_foot) = tags.get_tag("oneway:foot") {
                return oneway_foot;
            }

            if Self::allow_generic_oneway_to_apply_on_foot(tags) {
                if let Some(oneway) = tags.get_tag("oneway") {
                    return oneway;
                }
            }

            return "";
        } else {
            self.access
                .iter()
                .rev()
                .filter(|&&mode| mode != "access")
                .find_map(|&mode| tags.get_tag(&format!("oneway:{}", mode)))
                .or_else(|| tags.get_tag("oneway"))
                .unwrap_or("")
        }
    }

    fn allow_generic_oneway_to_apply_on_foot<T: Tags + ?Sized>(tags: &T) -> bool {
        // By default, on foot, only "oneway:foot" is considered. However, on the following
        // ways the generic "oneway" tag also applies.

        // highway=footway, highway=path, highway=steps, highway=platform
        match tags.get_tag("highway") {
            Some("footway") | Some("path") | Some("steps") | Some("platform") => return true,
            _ => {}
        }

        // public_transport=platform
        if tags.get_tag("public_transport") == Some("platform") {
            return true;
        }

        // railway=platform
        if tags.get_tag("railway") == Some("platform") {
            return true;
        }

        // Default to false
        return false;
    }

    /// Figures out what kind of turn restriction a relation with given tags represents.
    /// Returns `None` if the relation is not a turn restriction, or a turn restriction
    /// which does not apply for the current profile.
    pub fn restriction_kind<T: Tags + ?Sized>(&self, tags: &T) -> Option<RestrictionKind> {
        // Short-circuit when restrictions are disabled,
        // relation is not a restriction, or the current profile is exempted
        if self.disable_restrictions
            || tags.get_tag("type") != Some("restriction")
            || self.is_exempted(tags)
        {
            return None;
        }

        RestrictionKind::from_tag_value(self.get_active_restriction_tag(tags))
    }

    /// Returns true if [Profile::access] intersects with any mode present in the `except` tag.
    /// If the tag is missing, returns false.
    pub fn is_exempted<T: Tags + ?Sized>(&self, tags: &T) -> bool {
        tags.get_tag("except")
            .unwrap_or("")
            .split(';')
            .any(|exempted_type| self.access.contains(&exempted_type))
    }

    /// Returns the value of the most specific "restriction:MODE" tag (based on [Profile::access]),
    /// falling back to simply "restriction", and returning an empty string if no relevant tag
    /// was found.
    fn get_active_restriction_tag<'t, T: Tags + ?Sized>(&self, tags: &'t T) -> &'t str {
        if self.apply_foot_exceptions() {
            // foot profile exception - only consider "restriction:foot"
            tags.get_tag("restriction:foot").unwrap_or("")
        } else {
            self.access
                .iter()
                .rev()
                .filter(|&&mode| mode != "access")
                .find_map(|&mode| tags.get_tag(&format!("restriction:{}", mode)))
                .or_else(|| tags.get_tag("restriction"))
                .unwrap_or("")
        }
    }

    fn apply_foot_exceptions(&self) -> bool {
        self.name == "foot"
    }

    /// Returns the travel speed (in km/h) over a way with the given tags,
    /// that is the speed of its class capped by its `maxspeed`.
    /// Returns zero for ways without a matching class.
    pub fn way_speed<T: Tags + ?Sized>(&self, tags: &T) -> f32 {
        let Some(class) = self.get_class(tags) else {
            return 0.0;
        };

        match tags.get_tag("maxspeed").and_then(parse_maxspeed) {
            Some(limit) if limit > 0.0 => class.speed.min(limit),
            _ => class.speed,
        }
    }
}

/// Parses the value of a [maxspeed](https://wiki.openstreetmap.org/wiki/Key:maxspeed) tag
/// into km/h. Only numeric values (optionally followed by "mph" or "km/h") are supported.
fn parse_maxspeed(value: &str) -> Option<f32> {
    let value = value.trim();
    if let Some(mph) = value.strip_suffix("mph") {
        return mph.trim().parse::<f32>().ok().map(|v| v * 1.609_344);
    }
    let kmh = value.strip_suffix("km/h").unwrap_or(value);
    return kmh.trim().parse::<f32>().ok();
}

fn is_tag_of(t: &TagValue, key: &str, value: &str) -> bool {
    t.tag == key && t.value == value
}

impl<'a> RoutingPolicy for Profile<'a> {
    fn accept_point(&self, tag: &TagValue) -> bool {
        self.obstacles.iter().any(|o| is_tag_of(tag, o.key, o.value))
    }

    fn accept_line(&self, tag: &TagValue) -> bool {
        self.road_classes
            .iter()
            .any(|c| is_tag_of(tag, c.key, c.value))
    }

    fn accept_road(&self, road: &Road) -> bool {
        match road.kind {
            RoadKind::Point => road.types.iter().any(|t| self.accept_point(t)),
            RoadKind::Line => self.way_class(road).is_some(),
        }
    }

    fn define_speed(&self, road: &Road) -> f64 {
        self.way_speed(road) as f64 / 3.6
    }

    fn min_default_speed(&self) -> f64 {
        self.road_classes
            .iter()
            .map(|c| c.speed as f64 / 3.6)
            .reduce(f64::min)
            .unwrap_or(1.0)
    }

    fn max_default_speed(&self) -> f64 {
        self.road_classes
            .iter()
            .map(|c| c.speed as f64 / 3.6)
            .reduce(f64::max)
            .unwrap_or(1.0)
    }

    fn define_obstacle(&self, road: &Road, _point_index: usize) -> f64 {
        if road.kind != RoadKind::Point {
            return 0.0;
        }
        self.node_obstacle(road).unwrap_or(0.0) as f64
    }

    fn calculate_turn_time(&self, from: &Road, _: usize, to: &Road, _: usize) -> f64 {
        if from.id == to.id {
            0.0
        } else {
            self.turn_time as f64
        }
    }

    fn road_priority_to_calculate_route(&self, road: &Road) -> f64 {
        self.get_class(road).map_or(1.0, |c| c.priority as f64)
    }

    fn road_priority_heuristic_to_increase(&self, road: &Road) -> f64 {
        self.get_class(road).map_or(1.0, |c| c.priority as f64)
    }
}

/// Example routing [Profile] for cars, with high preference for faster roads
/// and with appropriate [access tags](https://wiki.openstreetmap.org/wiki/Key:access).
pub const CAR_PROFILE: Profile = Profile {
    name: "motorcar",
    road_classes: &[
        RoadClass {
            key: "highway",
            value: "motorway",
            speed: 110.0,
            priority: 1.5,
        },
        RoadClass {
            key: "highway",
            value: "motorway_link",
            speed: 60.0,
            priority: 1.4,
        },
        RoadClass {
            key: "highway",
            value: "trunk",
            speed: 90.0,
            priority: 1.4,
        },
        RoadClass {
            key: "highway",
            value: "trunk_link",
            speed: 50.0,
            priority: 1.3,
        },
        RoadClass {
            key: "highway",
            value: "primary",
            speed: 70.0,
            priority: 1.3,
        },
        RoadClass {
            key: "highway",
            value: "primary_link",
            speed: 50.0,
            priority: 1.2,
        },
        RoadClass {
            key: "highway",
            value: "secondary",
            speed: 60.0,
            priority: 1.2,
        },
        RoadClass {
            key: "highway",
            value: "secondary_link",
            speed: 45.0,
            priority: 1.1,
        },
        RoadClass {
            key: "highway",
            value: "tertiary",
            speed: 50.0,
            priority: 1.1,
        },
        RoadClass {
            key: "highway",
            value: "tertiary_link",
            speed: 40.0,
            priority: 1.0,
        },
        RoadClass {
            key: "highway",
            value: "unclassified",
            speed: 40.0,
            priority: 1.0,
        },
        RoadClass {
            key: "highway",
            value: "minor",
            speed: 40.0,
            priority: 1.0,
        },
        RoadClass {
            key: "highway",
            value: "residential",
            speed: 30.0,
            priority: 0.9,
        },
        RoadClass {
            key: "highway",
            value: "living_street",
            speed: 10.0,
            priority: 0.6,
        },
        RoadClass {
            key: "highway",
            value: "track",
            speed: 15.0,
            priority: 0.5,
        },
        RoadClass {
            key: "highway",
            value: "service",
            speed: 20.0,
            priority: 0.7,
        },
    ],
    obstacles: &[
        Obstacle {
            key: "highway",
            value: "traffic_signals",
            delay: 20.0,
        },
        Obstacle {
            key: "railway",
            value: "level_crossing",
            delay: 25.0,
        },
        Obstacle {
            key: "highway",
            value: "stop",
            delay: 5.0,
        },
        Obstacle {
            key: "highway",
            value: "give_way",
            delay: 3.0,
        },
    ],
    access: &["access", "vehicle", "motor_vehicle", "motorcar"],
    disallow_motorroad: false,
    disable_restrictions: false,
    turn_time: 2.0,
};

/// Example routing [Profile] for bicycles, with preferences for quieter roads
/// and with appropriate [access tags](https://wiki.openstreetmap.org/wiki/Key:access).
pub const BICYCLE_PROFILE: Profile = Profile {
    name: "bicycle",
    road_classes: &[
        RoadClass {
            key: "highway",
            value: "cycleway",
            speed: 20.0,
            priority: 1.5,
        },
        RoadClass {
            key: "highway",
            value: "trunk",
            speed: 18.0,
            priority: 0.3,
        },
        RoadClass {
            key: "highway",
            value: "trunk_link",
            speed: 18.0,
            priority: 0.3,
        },
        RoadClass {
            key: "highway",
            value: "primary",
            speed: 18.0,
            priority: 0.6,
        },
        RoadClass {
            key: "highway",
            value: "primary_link",
            speed: 18.0,
            priority: 0.6,
        },
        RoadClass {
            key: "highway",
            value: "secondary",
            speed: 18.0,
            priority: 0.9,
        },
        RoadClass {
            key: "highway",
            value: "secondary_link",
            speed: 18.0,
            priority: 0.9,
        },
        RoadClass {
            key: "highway",
            value: "tertiary",
            speed: 18.0,
            priority: 1.0,
        },
        RoadClass {
            key: "highway",
            value: "tertiary_link",
            speed: 18.0,
            priority: 1.0,
        },
        RoadClass {
            key: "highway",
            value: "unclassified",
            speed: 18.0,
            priority: 1.0,
        },
        RoadClass {
            key: "highway",
            value: "minor",
            speed: 18.0,
            priority: 1.0,
        },
        RoadClass {
            key: "highway",
            value: "residential",
            speed: 18.0,
            priority: 1.2,
        },
        RoadClass {
            key: "highway",
            value: "living_street",
            speed: 12.0,
            priority: 1.1,
        },
        RoadClass {
            key: "highway",
            value: "track",
            speed: 12.0,
            priority: 0.9,
        },
        RoadClass {
            key: "highway",
            value: "service",
            speed: 15.0,
            priority: 0.9,
        },
        RoadClass {
            key: "highway",
            value: "bridleway",
            speed: 8.0,
            priority: 0.6,
        },
        RoadClass {
            key: "highway",
            value: "footway",
            speed: 8.0,
            priority: 0.6,
        },
        RoadClass {
            key: "highway",
            value: "path",
            speed: 10.0,
            priority: 0.8,
        },
        RoadClass {
            key: "highway",
            value: "steps",
            speed: 2.0,
            priority: 0.3,
        },
    ],
    obstacles: &[
        Obstacle {
            key: "highway",
            value: "traffic_signals",
            delay: 15.0,
        },
        Obstacle {
            key: "railway",
            value: "level_crossing",
            delay: 15.0,
        },
        Obstacle {
            key: "barrier",
            value: "cycle_barrier",
            delay: 10.0,
        },
    ],
    access: &["access", "vehicle", "bicycle"],
    disallow_motorroad: true,
    disable_restrictions: false,
    turn_time: 1.0,
};

/// Example routing [Profile] for walking, with preferences for quieter roads
/// and with appropriate [access tags](https://wiki.openstreetmap.org/wiki/Key:access).
pub const FOOT_PROFILE: Profile = Profile {
    name: "foot",
    road_classes: &[
        RoadClass {
            key: "highway",
            value: "pedestrian",
            speed: 5.0,
            priority: 1.2,
        },
        RoadClass {
            key: "highway",
            value: "footway",
            speed: 5.0,
            priority: 1.2,
        },
        RoadClass {
            key: "highway",
            value: "path",
            speed: 5.0,
            priority: 1.1,
        },
        RoadClass {
            key: "highway",
            value: "steps",
            speed: 3.0,
            priority: 1.0,
        },
        RoadClass {
            key: "highway",
            value: "platform",
            speed: 5.0,
            priority: 1.0,
        },
        RoadClass {
            key: "railway",
            value: "platform",
            speed: 5.0,
            priority: 1.0,
        },
        RoadClass {
            key: "public_transport",
            value: "platform",
            speed: 5.0,
            priority: 1.0,
        },
        RoadClass {
            key: "highway",
            value: "living_street",
            speed: 5.0,
            priority: 1.1,
        },
        RoadClass {
            key: "highway",
            value: "residential",
            speed: 5.0,
            priority: 1.0,
        },
        RoadClass {
            key: "highway",
            value: "service",
            speed: 5.0,
            priority: 1.0,
        },
        RoadClass {
            key: "highway",
            value: "track",
            speed: 5.0,
            priority: 1.0,
        },
        RoadClass {
            key: "highway",
            value: "bridleway",
            speed: 5.0,
            priority: 1.0,
        },
        RoadClass {
            key: "highway",
            value: "unclassified",
            speed: 5.0,
            priority: 0.9,
        },
        RoadClass {
            key: "highway",
            value: "minor",
            speed: 5.0,
            priority: 0.9,
        },
        RoadClass {
            key: "highway",
            value: "tertiary",
            speed: 5.0,
            priority: 0.9,
        },
        RoadClass {
            key: "highway",
            value: "tertiary_link",
            speed: 5.0,
            priority: 0.9,
        },
        RoadClass {
            key: "highway",
            value: "secondary",
            speed: 5.0,
            priority: 0.8,
        },
        RoadClass {
            key: "highway",
            value: "secondary_link",
            speed: 5.0,
            priority: 0.8,
        },
        RoadClass {
            key: "highway",
            value: "primary",
            speed: 5.0,
            priority: 0.7,
        },
        RoadClass {
            key: "highway",
            value: "primary_link",
            speed: 5.0,
            priority: 0.7,
        },
        RoadClass {
            key: "highway",
            value: "trunk",
            speed: 5.0,
            priority: 0.5,
        },
        RoadClass {
            key: "highway",
            value: "trunk_link",
            speed: 5.0,
            priority: 0.5,
        },
    ],
    obstacles: &[Obstacle {
        key: "highway",
        value: "traffic_signals",
        delay: 30.0,
    }],
    access: &["access", "foot"],
    disallow_motorroad: true,
    disable_restrictions: false,
    turn_time: 0.0,
};

#[cfg(test)]
mod tests {
    use super::{Obstacle, Profile, RoadClass, Tags, CAR_PROFILE, FOOT_PROFILE};
    use crate::testing::{assert_almost_eq, pt};
    use crate::{Road, RestrictionKind, RoutingPolicy};
    use std::collections::HashMap;

    const TEST_PROFILE: Profile = Profile {
        name: "cat",
        road_classes: &[
            RoadClass {
                key: "highway",
                value: "footway",
                speed: 36.0,
                priority: 1.0,
            },
            RoadClass {
                key: "highway",
                value: "path",
                speed: 18.0,
                priority: 0.5,
            },
        ],
        obstacles: &[Obstacle {
            key: "barrier",
            value: "cat_flap",
            delay: 4.0,
        }],
        access: &["access", "cat"],
        disallow_motorroad: false,
        disable_restrictions: false,
        turn_time: 1.5,
    };

    const TEST_PROFILE_WITHOUT_MOTORROAD: Profile = Profile {
        disallow_motorroad: true,
        ..TEST_PROFILE
    };

    const TEST_PROFILE_WITHOUT_RESTRICTIONS: Profile = Profile {
        disable_restrictions: true,
        ..TEST_PROFILE
    };

    macro_rules! tags {
        {} => { HashMap::<String, String>::default() };
        {$( $k:literal : $v:literal ),+} => {
            HashMap::<String, String>::from_iter([ $( ($k.to_string(), $v.to_string()) ),+ ])
        };
    }

    #[test]
    fn way_class() {
        let class = |tags: HashMap<String, String>| TEST_PROFILE.way_class(&tags).map(|c| c.value);

        assert_eq!(class(tags! {"highway": "footway"}), Some("footway"));
        assert_eq!(class(tags! {"highway": "path"}), Some("path"));
        assert_eq!(class(tags! {"highway": "motorway"}), None);
        assert_eq!(class(tags! {}), None);
        assert_eq!(class(tags! {"highway": "path", "access": "no"}), None);
        assert_eq!(
            class(tags! {"highway": "path", "access": "no", "cat": "destination"}),
            Some("path"),
        );
        assert_eq!(class(tags! {"highway": "path", "motorroad": "yes"}), Some("path"));
        assert!(TEST_PROFILE_WITHOUT_MOTORROAD
            .way_class(&tags! {"highway": "path", "motorroad": "yes"})
            .is_none());
    }

    #[test]
    fn is_allowed() {
        assert!(TEST_PROFILE.is_allowed(&tags! {"highway": "footway"}));
        assert!(!TEST_PROFILE.is_allowed(&tags! {"highway": "footway", "access": "no"}));
        assert!(!TEST_PROFILE.is_allowed(&tags! {"highway": "footway", "access": "private"}));
        assert!(TEST_PROFILE.is_allowed(&tags! {"highway": "footway", "access": "destination"}));
        assert!(
            TEST_PROFILE.is_allowed(&tags! {"highway": "footway", "access": "no", "cat": "yes"})
        );
        assert!(TEST_PROFILE.is_allowed(&tags! {"highway": "footway", "motorroad": "yes"}));
        assert!(!TEST_PROFILE_WITHOUT_MOTORROAD
            .is_allowed(&tags! {"highway": "footway", "motorroad": "yes"}));
    }

    #[test]
    fn way_direction() {
        assert_eq!(
            TEST_PROFILE.way_direction(&tags! {"highway": "path"}),
            (true, true),
        );
        assert_eq!(
            TEST_PROFILE.way_direction(&tags! {"highway": "path", "oneway": "yes"}),
            (true, false),
        );
        assert_eq!(
            TEST_PROFILE.way_direction(&tags! {"highway": "path", "oneway": "-1"}),
            (false, true),
        );
        assert_eq!(
            TEST_PROFILE.way_direction(&tags! {"highway": "motorway_link"}),
            (true, false),
        );
        assert_eq!(
            TEST_PROFILE.way_direction(&tags! {"highway": "path", "junction": "roundabout"}),
            (true, false),
        );
        assert_eq!(
            TEST_PROFILE.way_direction(&tags! {"highway": "motorway_link", "oneway": "no"}),
            (true, true),
        );
        assert_eq!(
            TEST_PROFILE.way_direction(&tags! {"junction": "circular", "oneway": "-1"}),
            (false, true),
        );
        assert_eq!(
            TEST_PROFILE.way_direction(&tags! {"highway": "path", "oneway:cat": "yes", "oneway": "no"}),
            (true, false),
        );
    }

    #[test]
    fn way_direction_foot() {
        assert_eq!(
            FOOT_PROFILE.way_direction(&tags! {"highway": "residential"}),
            (true, true),
        );
        assert_eq!(
            FOOT_PROFILE.way_direction(&tags! {"highway": "residential", "oneway": "yes"}),
            (true, true),
        );
        assert_eq!(
            FOOT_PROFILE.way_direction(&tags! {"highway": "residential", "oneway:foot": "yes"}),
            (true, false),
        );
        assert_eq!(
            FOOT_PROFILE.way_direction(&tags! {"highway": "residential", "oneway:foot": "-1"}),
            (false, true),
        );
        assert_eq!(
            FOOT_PROFILE.way_direction(&tags! {"highway": "path", "oneway": "yes"}),
            (true, false),
        );
        assert_eq!(
            FOOT_PROFILE.way_direction(&tags! {"highway": "footway", "oneway": "-1"}),
            (false, true),
        );
    }

    #[test]
    fn restriction_kind() {
        assert_eq!(TEST_PROFILE.restriction_kind(&tags! {"type": "multipolygon"}), None);
        assert_eq!(
            TEST_PROFILE
                .restriction_kind(&tags! {"type": "restriction", "restriction": "no_u_turn"}),
            Some(RestrictionKind::NoUTurn),
        );
        assert_eq!(
            TEST_PROFILE
                .restriction_kind(&tags! {"type": "restriction", "restriction": "only_left_turn"}),
            Some(RestrictionKind::OnlyLeftTurn),
        );
        assert_eq!(
            TEST_PROFILE.restriction_kind(
                &tags! {"type": "restriction", "restriction": "only_left_turn", "except": "psv;cat"}
            ),
            None,
        );
        assert_eq!(
            TEST_PROFILE
                .restriction_kind(&tags! {"type": "restriction", "restriction": "only_360"}),
            None,
        );
        assert_eq!(
            TEST_PROFILE_WITHOUT_RESTRICTIONS
                .restriction_kind(&tags! {"type": "restriction", "restriction": "no_u_turn"}),
            None,
        );
        assert_eq!(
            TEST_PROFILE
                .restriction_kind(&tags! {"type": "restriction", "restriction:car": "no_u_turn"}),
            None,
        );
        assert_eq!(
            TEST_PROFILE
                .restriction_kind(&tags! {"type": "restriction", "restriction:cat": "no_u_turn"}),
            Some(RestrictionKind::NoUTurn),
        );
    }

    #[test]
    fn restriction_kind_foot() {
        assert_eq!(
            FOOT_PROFILE
                .restriction_kind(&tags! {"type": "restriction", "restriction": "no_u_turn"}),
            None,
        );
        assert_eq!(
            FOOT_PROFILE
                .restriction_kind(&tags! {"type": "restriction", "restriction:foot": "no_u_turn"}),
            Some(RestrictionKind::NoUTurn),
        );
    }

    #[test]
    fn is_exempted() {
        assert!(!TEST_PROFILE.is_exempted(&tags! {}));
        assert!(!TEST_PROFILE.is_exempted(&tags! {"except": "car"}));
        assert!(TEST_PROFILE.is_exempted(&tags! {"except": "cat"}));
        assert!(TEST_PROFILE.is_exempted(&tags! {"except": "psv;cat"}));
    }

    #[test]
    fn way_speed() {
        assert_eq!(TEST_PROFILE.way_speed(&tags! {"highway": "footway"}), 36.0);
        assert_eq!(
            TEST_PROFILE.way_speed(&tags! {"highway": "footway", "maxspeed": "20"}),
            20.0,
        );
        assert_eq!(
            TEST_PROFILE.way_speed(&tags! {"highway": "path", "maxspeed": "50 km/h"}),
            18.0,
        );
        let mph = TEST_PROFILE.way_speed(&tags! {"highway": "footway", "maxspeed": "10 mph"});
        assert!((mph - 16.093).abs() < 0.01);
        assert_eq!(
            TEST_PROFILE.way_speed(&tags! {"highway": "footway", "maxspeed": "walk"}),
            36.0,
        );
        assert_eq!(TEST_PROFILE.way_speed(&tags! {"highway": "motorway"}), 0.0);
    }

    #[test]
    fn tags_of_roads() {
        let r = Road::line(2, vec![pt(0, 0), pt(1, 0)])
            .with_tag("highway", "path")
            .with_tag("oneway:cat", "-1");
        assert_eq!(r.get_tag("highway"), Some("path"));
        assert_eq!(r.get_tag("oneway"), None);
        assert_eq!(TEST_PROFILE.way_direction(&r), (false, true));
    }

    #[test]
    fn routing_policy() {
        let footway = Road::line(2, vec![pt(0, 0), pt(1, 0)]).with_tag("highway", "footway");
        let path = Road::line(4, vec![pt(1, 0), pt(2, 0)]).with_tag("highway", "path");
        let private = Road::line(6, vec![pt(2, 0), pt(3, 0)])
            .with_tag("highway", "path")
            .with_tag("access", "private");
        let flap = Road::point(3, pt(1, 0)).with_tag("barrier", "cat_flap");

        assert!(TEST_PROFILE.accept_road(&footway));
        assert!(TEST_PROFILE.accept_road(&path));
        assert!(!TEST_PROFILE.accept_road(&private));
        assert!(TEST_PROFILE.accept_road(&flap));

        assert_almost_eq!(TEST_PROFILE.define_speed(&footway), 10.0);
        assert_almost_eq!(TEST_PROFILE.define_speed(&path), 5.0);
        assert_almost_eq!(TEST_PROFILE.min_default_speed(), 5.0);
        assert_almost_eq!(TEST_PROFILE.max_default_speed(), 10.0);

        assert_almost_eq!(TEST_PROFILE.define_obstacle(&flap, 0), 4.0);
        assert_almost_eq!(TEST_PROFILE.define_obstacle(&footway, 0), 0.0);

        assert_almost_eq!(TEST_PROFILE.calculate_turn_time(&footway, 1, &path, 0), 1.5);
        assert_almost_eq!(TEST_PROFILE.calculate_turn_time(&path, 0, &path, 1), 0.0);

        assert_almost_eq!(TEST_PROFILE.road_priority_to_calculate_route(&path), 0.5);
        assert_almost_eq!(TEST_PROFILE.road_priority_heuristic_to_increase(&footway), 1.0);
    }

    #[test]
    fn stock_profiles_accept_their_roads() {
        let residential = Road::line(2, vec![pt(0, 0), pt(1, 0)]).with_tag("highway", "residential");
        let signals = Road::point(3, pt(0, 0)).with_tag("highway", "traffic_signals");
        assert!(CAR_PROFILE.accept_road(&residential));
        assert!(CAR_PROFILE.accept_road(&signals));
        assert!(CAR_PROFILE.define_speed(&residential) <= CAR_PROFILE.max_default_speed());
    }
}

// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::io;
use std::mem;
use std::str::{from_utf8, FromStr};

use log::warn;
use quick_xml::events::{BytesStart, Event};

use super::model::{Element, Member, MemberType, Node, Role, TurnRestriction, Way};
use crate::osm::Profile;
use crate::Point31;

/// Source of XML events.
///
/// Hides the difference between [quick_xml::Reader::read_event] on in-memory data,
/// which borrows from the input, and [quick_xml::Reader::read_event_into] on streams,
/// which needs a buffer.
pub(super) trait EventSource {
    fn next_event(&mut self) -> quick_xml::Result<Event<'_>>;
}

impl EventSource for quick_xml::Reader<&[u8]> {
    fn next_event(&mut self) -> quick_xml::Result<Event<'_>> {
        self.read_event()
    }
}

/// [EventSource] over a buffered stream.
pub(super) struct Buffered<R: io::BufRead> {
    reader: quick_xml::Reader<R>,
    buf: Vec<u8>,
}

impl<R: io::BufRead> EventSource for Buffered<R> {
    fn next_event(&mut self) -> quick_xml::Result<Event<'_>> {
        self.buf.clear();
        self.reader.read_event_into(&mut self.buf)
    }
}

/// Reads road-related [Elements](Element) from OSM XML.
///
/// Filtering by the [Profile] happens while reading: ways without a road class
/// and relations other than applicable turn restrictions are skipped, and only
/// obstacle nodes keep their tags. Attributes other than ids, positions and
/// references are never decoded.
pub(super) struct Reader<'p, S: EventSource> {
    source: S,
    assembler: Assembler<'p>,
    eof: bool,
}

impl<'p, 'a> Reader<'p, quick_xml::Reader<&'a [u8]>> {
    pub(super) fn from_buffer(data: &'a [u8], profile: &'p Profile<'p>) -> Self {
        Self::new(quick_xml::Reader::from_reader(data), profile)
    }
}

impl<'p, R: io::BufRead> Reader<'p, Buffered<R>> {
    pub(super) fn from_io(reader: R, profile: &'p Profile<'p>) -> Self {
        let source = Buffered {
            reader: quick_xml::Reader::from_reader(reader),
            buf: Vec::default(),
        };
        Self::new(source, profile)
    }
}

impl<'p, S: EventSource> Reader<'p, S> {
    fn new(source: S, profile: &'p Profile<'p>) -> Self {
        Self {
            source,
            assembler: Assembler {
                profile,
                pending: None,
                tags: HashMap::default(),
            },
            eof: false,
        }
    }
}

impl<S: EventSource> Iterator for Reader<'_, S> {
    type Item = Result<Element, quick_xml::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.eof {
            let element = match self.source.next_event() {
                Err(e) => return Some(Err(e)),

                Ok(Event::Start(start)) => {
                    if is_element(start.local_name().as_ref()) {
                        self.assembler.open(&start);
                    }
                    None
                }

                Ok(Event::Empty(start)) => {
                    if is_element(start.local_name().as_ref()) {
                        self.assembler.open(&start);
                        self.assembler.close()
                    } else {
                        self.assembler.child(&start);
                        None
                    }
                }

                Ok(Event::End(end)) if is_element(end.local_name().as_ref()) => {
                    self.assembler.close()
                }

                Ok(Event::Eof) => {
                    self.eof = true;
                    self.assembler.close()
                }

                Ok(_) => None,
            };

            if let Some(element) = element {
                return Some(Ok(element));
            }
        }
        None
    }
}

fn is_element(name: &[u8]) -> bool {
    matches!(name, b"node" | b"way" | b"relation")
}

/// Element whose children are still being read.
#[derive(Debug)]
enum Pending {
    Node { id: i64, at: Point31 },
    Way { id: i64, nodes: Vec<i64> },
    Relation { id: i64, members: Vec<Member> },
}

/// Collects the children of the element being read and decides,
/// once it's closed, what the profile needs from it.
struct Assembler<'p> {
    profile: &'p Profile<'p>,
    pending: Option<Pending>,
    tags: HashMap<String, String>,
}

impl Assembler<'_> {
    fn open(&mut self, start: &BytesStart<'_>) {
        self.tags.clear();
        self.pending = match start.local_name().as_ref() {
            b"node" => {
                let id = attribute(start, "id");
                let lat = attribute::<f64>(start, "lat").filter(|v| v.is_finite());
                let lon = attribute::<f64>(start, "lon").filter(|v| v.is_finite());
                match (id, lat, lon) {
                    (Some(id), Some(lat), Some(lon)) => Some(Pending::Node {
                        id,
                        at: Point31::from_lat_lon(lat, lon),
                    }),
                    _ => {
                        warn!("skipping node with invalid attributes");
                        None
                    }
                }
            }
            b"way" => attribute(start, "id").map(|id| Pending::Way {
                id,
                nodes: Vec::default(),
            }),
            _ => attribute(start, "id").map(|id| Pending::Relation {
                id,
                members: Vec::default(),
            }),
        };
    }

    fn child(&mut self, child: &BytesStart<'_>) {
        match (child.local_name().as_ref(), &mut self.pending) {
            (b"tag", Some(_)) => {
                if let Some((k, v)) = parse_tag(child) {
                    self.tags.insert(k, v);
                }
            }
            (b"nd", Some(Pending::Way { nodes, .. })) => nodes.extend(attribute::<i64>(child, "ref")),
            (b"member", Some(Pending::Relation { members, .. })) => {
                members.extend(parse_member(child))
            }
            _ => {}
        }
    }

    fn close(&mut self) -> Option<Element> {
        let tags = mem::take(&mut self.tags);
        match self.pending.take()? {
            Pending::Node { id, at } => {
                let obstacle_tags = self.profile.node_obstacle(&tags).map(|_| tags);
                Some(Element::Node(Node {
                    id,
                    at,
                    obstacle_tags,
                }))
            }

            Pending::Way { id, nodes } => {
                self.profile.way_class(&tags)?;
                Some(Element::Way(Way { id, nodes, tags }))
            }

            Pending::Relation { id, members } => {
                let kind = self.profile.restriction_kind(&tags)?;
                Some(Element::TurnRestriction(TurnRestriction { id, kind, members }))
            }
        }
    }
}

/// Parses a numeric attribute. Missing and malformed values both give `None`.
fn attribute<T: FromStr>(start: &BytesStart<'_>, key: &str) -> Option<T> {
    let attr = start.try_get_attribute(key).ok()??;
    from_utf8(&attr.value).ok()?.parse().ok()
}

fn parse_tag(start: &BytesStart<'_>) -> Option<(String, String)> {
    let k = start.try_get_attribute("k").ok()??.unescape_value().ok()?;
    let v = match start.try_get_attribute("v").ok()? {
        Some(v) => v.unescape_value().ok()?.into_owned(),
        None => String::default(),
    };
    Some((k.into_owned(), v))
}

/// Parses a relation member, skipping members with roles irrelevant for turn restrictions.
fn parse_member(start: &BytesStart<'_>) -> Option<Member> {
    let role = Role::parse(&start.try_get_attribute("role").ok()??.value)?;
    let type_ = MemberType::parse(&start.try_get_attribute("type").ok()??.value)?;
    let ref_ = attribute(start, "ref")?;
    Some(Member { role, type_, ref_ })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::osm::{CAR_PROFILE, FOOT_PROFILE};
    use crate::RestrictionKind;

    const SIMPLE_XML: &[u8] = include_bytes!("test_fixtures/simple.osm");

    fn read_all<I: Iterator<Item = Result<Element, quick_xml::Error>>>(
        elements: I,
    ) -> Vec<Element> {
        elements.collect::<Result<_, _>>().unwrap()
    }

    fn way_ids(elements: &[Element]) -> Vec<i64> {
        elements
            .iter()
            .filter_map(|e| match e {
                Element::Way(w) => Some(w.id),
                _ => None,
            })
            .collect()
    }

    fn restrictions(elements: &[Element]) -> Vec<&TurnRestriction> {
        elements
            .iter()
            .filter_map(|e| match e {
                Element::TurnRestriction(r) => Some(r),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn filters_elements_by_profile() {
        let elements = read_all(Reader::from_buffer(SIMPLE_XML, &CAR_PROFILE));

        // All node positions are kept, but only the traffic signals keep tags
        let nodes: Vec<&Node> = elements
            .iter()
            .filter_map(|e| match e {
                Element::Node(n) => Some(n),
                _ => None,
            })
            .collect();
        assert_eq!(nodes.len(), 7);
        assert_eq!(nodes[1].id, 2);
        assert_eq!(nodes[1].at, Point31::from_lat_lon(52.000, 21.002));
        assert_eq!(
            nodes[1].obstacle_tags.as_ref().and_then(|t| t.get("highway")),
            Some(&"traffic_signals".to_string()),
        );
        assert!(nodes
            .iter()
            .filter(|n| n.id != 2)
            .all(|n| n.obstacle_tags.is_none()));

        // 14 has access=no, 15 is a footway
        assert_eq!(way_ids(&elements), vec![10, 11, 12, 13, 16]);

        // 21 exempts motorcars, 23 is not a restriction
        let restrictions = restrictions(&elements);
        assert_eq!(restrictions.len(), 2);
        assert_eq!(restrictions[0].id, 20);
        assert_eq!(restrictions[0].kind, RestrictionKind::NoLeftTurn);
        assert_eq!(
            restrictions[0].members,
            vec![
                Member {
                    role: Role::From,
                    type_: MemberType::Way,
                    ref_: 10
                },
                Member {
                    role: Role::Via,
                    type_: MemberType::Node,
                    ref_: 2
                },
                Member {
                    role: Role::To,
                    type_: MemberType::Way,
                    ref_: 12
                },
            ],
        );
        assert_eq!(restrictions[1].id, 22);
        assert_eq!(restrictions[1].kind, RestrictionKind::OnlyStraightOn);
    }

    #[test]
    fn stream_and_buffer_agree() {
        let from_buffer = read_all(Reader::from_buffer(SIMPLE_XML, &FOOT_PROFILE));
        let from_io = read_all(Reader::from_io(io::Cursor::new(SIMPLE_XML), &FOOT_PROFILE));
        assert_eq!(from_buffer, from_io);

        // Pedestrians may use the footway, and no restriction applies to them
        assert!(way_ids(&from_io).contains(&15));
        assert!(restrictions(&from_io).is_empty());
    }

    #[test]
    fn skips_invalid_nodes_and_members() {
        const DATA: &[u8] = br#"<osm>
            <node id="1" lat="foo" lon="21.0" />
            <node id="2" lat="52.0" lon="21.0" />
            <node id="3" lat="52.0" lon="21.0"><tag k="highway" v="traffic_signals" /></node>
            <relation id="4">
                <member type="way" ref="10" role="from" />
                <member type="node" ref="2" role="via" />
                <member type="way" ref="11" role="outer" />
                <member type="area" ref="12" role="to" />
                <member type="way" ref="13" role="to" />
                <tag k="type" v="restriction" />
                <tag k="restriction" v="no_u_turn" />
            </relation>
        </osm>"#;

        let elements = read_all(Reader::from_buffer(DATA, &CAR_PROFILE));
        assert_eq!(elements.len(), 3);
        assert!(matches!(&elements[0], Element::Node(n) if n.id == 2 && n.obstacle_tags.is_none()));
        assert!(matches!(&elements[1], Element::Node(n) if n.id == 3 && n.obstacle_tags.is_some()));

        let Element::TurnRestriction(r) = &elements[2] else {
            panic!("expected a turn restriction, got {:?}", elements[2]);
        };
        assert_eq!(r.kind, RestrictionKind::NoUTurn);
        let refs: Vec<(Role, i64)> = r.members.iter().map(|m| (m.role, m.ref_)).collect();
        assert_eq!(refs, vec![(Role::From, 10), (Role::Via, 2), (Role::To, 13)]);
    }

    #[test]
    fn unescapes_tag_values() {
        const DATA: &[u8] = br#"<osm>
            <node id="1" lat="52.0" lon="21.0" />
            <node id="2" lat="52.0" lon="21.1" />
            <way id="3">
                <nd ref="1" />
                <nd ref="2" />
                <tag k="highway" v="residential" />
                <tag k="name" v="Fish &amp; Chips" />
            </way>
        </osm>"#;

        let elements = read_all(Reader::from_buffer(DATA, &CAR_PROFILE));
        let Some(Element::Way(way)) = elements.last() else {
            panic!("expected a way, got {:?}", elements.last());
        };
        assert_eq!(way.nodes, vec![1, 2]);
        assert_eq!(way.tags.get("name").map(String::as_str), Some("Fish & Chips"));
    }
}

//! The native `<KigDocument Version="2.0.000">` format (spec §6). The root
//! element and the legacy `<Point x="" y=""/>` shorthand are walked with
//! `quick_xml`'s event reader/writer directly — the node graph has no fixed
//! schema serde could derive cleanly, only the `ObjectHierarchy` tree
//! embedded in macro definitions gets the serde-driven treatment (see
//! [`crate::hierarchy_xml`]).

use std::io::Cursor;

use geo_graph::document::Document;
use geo_graph::node::{NodeId, NodeKind};
use geo_imp::value::{DoubleImp, ObjectImp};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::{CodecError, Location, Result};

const VERSION: &str = "2.0.000";

fn attr(tag: &BytesStart, name: &str) -> Option<String> {
    tag.attributes().flatten().find(|a| a.key.as_ref() == name.as_bytes()).map(|a| {
        String::from_utf8_lossy(&a.value).into_owned()
    })
}

fn leaf_payload(imp: &ObjectImp) -> Option<(&'static str, String)> {
    match imp {
        ObjectImp::Double(d) => Some(("double", d.0.to_string())),
        ObjectImp::Int(i) => Some(("int", i.0.to_string())),
        ObjectImp::Bool(b) => Some(("bool", b.0.to_string())),
        ObjectImp::String(s) => Some(("string", s.0.clone())),
        _ => None,
    }
}

fn parse_leaf_payload(kind: &str, text: &str) -> Option<ObjectImp> {
    match kind {
        "double" => text.parse::<f64>().ok().map(|v| ObjectImp::Double(DoubleImp(v))),
        "int" => text.parse::<i64>().ok().map(|v| ObjectImp::Int(geo_imp::value::IntImp(v))),
        "bool" => text.parse::<bool>().ok().map(|v| ObjectImp::Bool(geo_imp::value::BoolImp(v))),
        "string" => Some(ObjectImp::String(geo_imp::value::StringImp(text.to_string()))),
        _ => None,
    }
}

/// Writes every node in `order` (expected topologically sorted, parents
/// before children) as one `<Object>` element each, wrapped in the
/// `<KigDocument>` root. Never emits the legacy `<Point>` shorthand.
pub fn serialize(doc: &Document, order: &[NodeId]) -> Result<String> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

    let mut root = BytesStart::new("KigDocument");
    root.push_attribute(("Version", VERSION));
    writer.write_event(Event::Start(root)).map_err(xml_write_err)?;

    let index_of: std::collections::HashMap<NodeId, usize> =
        order.iter().enumerate().map(|(i, id)| (*id, i)).collect();

    for (i, &id) in order.iter().enumerate() {
        let node = doc.node(id).ok_or(CodecError::Graph(geo_graph::GraphError::NoSuchNode { id: id.0 }))?;
        let mut elem = BytesStart::new("Object");
        elem.push_attribute(("id", i.to_string().as_str()));
        match &node.kind {
            NodeKind::Data => elem.push_attribute(("kind", "data")),
            NodeKind::Property { index } => {
                elem.push_attribute(("kind", "property"));
                elem.push_attribute(("index", index.to_string().as_str()));
            }
            NodeKind::Typed { type_name } => {
                elem.push_attribute(("kind", "typed"));
                elem.push_attribute(("type", *type_name));
            }
        }
        writer.write_event(Event::Start(elem)).map_err(xml_write_err)?;

        for parent in &node.parents {
            let oref = index_of.get(parent).copied().unwrap_or(usize::MAX);
            let mut p = BytesStart::new("parent");
            p.push_attribute(("oref", oref.to_string().as_str()));
            writer.write_event(Event::Empty(p)).map_err(xml_write_err)?;
        }

        if let Some((kind, text)) = leaf_payload(&node.imp) {
            let mut data = BytesStart::new("data");
            data.push_attribute(("type", kind));
            writer.write_event(Event::Start(data)).map_err(xml_write_err)?;
            writer.write_event(Event::Text(BytesText::new(&text))).map_err(xml_write_err)?;
            writer.write_event(Event::End(BytesEnd::new("data"))).map_err(xml_write_err)?;
        }

        writer.write_event(Event::End(BytesEnd::new("Object"))).map_err(xml_write_err)?;
    }

    writer.write_event(Event::End(BytesEnd::new("KigDocument"))).map_err(xml_write_err)?;
    let bytes = writer.into_inner().into_inner();
    String::from_utf8(bytes).map_err(|e| CodecError::Xml { location: Location::start(), message: e.to_string() })
}

fn xml_write_err(e: quick_xml::Error) -> CodecError {
    CodecError::Xml { location: Location::start(), message: e.to_string() }
}

/// One node as read off the wire, before it is materialized into a
/// [`Document`]. `parents` are `oref` indices into the same file, always
/// referring to earlier elements (spec §6: forward references are
/// malformed).
#[derive(Debug, Clone)]
enum RawKind {
    Data,
    Property { index: usize },
    Typed { type_name: String },
    /// The historic `<Point x="" y=""/>` shorthand: a whole `FixedPoint`
    /// construction folded into a single element, read but never written.
    LegacyPoint { x: f64, y: f64 },
}

#[derive(Debug, Clone)]
struct RawNode {
    parents: Vec<usize>,
    kind: RawKind,
    payload: Option<ObjectImp>,
}

/// Parses a `<KigDocument>` into a fresh [`Document`], materializing nodes
/// in file order so `oref` N always means "the Nth object already created".
pub fn deserialize(xml: &str) -> Result<Document> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut raw_nodes: Vec<RawNode> = Vec::new();
    let mut cur_parents: Vec<usize> = Vec::new();
    let mut cur_kind: Option<RawKind> = None;
    let mut cur_payload: Option<ObjectImp> = None;
    let mut pending_data_kind: Option<String> = None;
    let mut seen_root = false;

    loop {
        let pos = reader.buffer_position() as usize;
        let event = reader.read_event().map_err(|e| parse_err(xml, pos, e.to_string()))?;
        match event {
            Event::Start(tag) if tag.name().as_ref() == b"KigDocument" => {
                seen_root = true;
            }
            Event::Start(tag) if tag.name().as_ref() == b"Object" => {
                let kind_attr = attr(&tag, "kind").ok_or_else(|| CodecError::Xml {
                    location: Location::from_offset(xml, pos),
                    message: "<Object> missing kind attribute".to_string(),
                })?;
                cur_kind = Some(match kind_attr.as_str() {
                    "data" => RawKind::Data,
                    "property" => {
                        let index = attr(&tag, "index")
                            .and_then(|s| s.parse().ok())
                            .ok_or_else(|| CodecError::Xml {
                                location: Location::from_offset(xml, pos),
                                message: "property Object missing numeric index".to_string(),
                            })?;
                        RawKind::Property { index }
                    }
                    "typed" => {
                        let type_name = attr(&tag, "type").ok_or_else(|| CodecError::Xml {
                            location: Location::from_offset(xml, pos),
                            message: "typed Object missing type attribute".to_string(),
                        })?;
                        RawKind::Typed { type_name }
                    }
                    other => {
                        return Err(CodecError::Xml {
                            location: Location::from_offset(xml, pos),
                            message: format!("unknown Object kind {other:?}"),
                        })
                    }
                });
                cur_parents.clear();
                cur_payload = None;
            }
            Event::Empty(tag) if tag.name().as_ref() == b"parent" => {
                let oref: usize = attr(&tag, "oref")
                    .and_then(|s| s.parse().ok())
                    .ok_or_else(|| CodecError::Xml {
                        location: Location::from_offset(xml, pos),
                        message: "<parent> missing numeric oref".to_string(),
                    })?;
                cur_parents.push(oref);
            }
            Event::Empty(tag) if tag.name().as_ref() == b"Point" => {
                let x = attr(&tag, "x").and_then(|s| s.parse().ok()).ok_or_else(|| CodecError::Xml {
                    location: Location::from_offset(xml, pos),
                    message: "legacy <Point> missing numeric x".to_string(),
                })?;
                let y = attr(&tag, "y").and_then(|s| s.parse().ok()).ok_or_else(|| CodecError::Xml {
                    location: Location::from_offset(xml, pos),
                    message: "legacy <Point> missing numeric y".to_string(),
                })?;
                raw_nodes.push(RawNode { parents: Vec::new(), kind: RawKind::LegacyPoint { x, y }, payload: None });
            }
            Event::Start(tag) if tag.name().as_ref() == b"data" => {
                pending_data_kind = attr(&tag, "type");
            }
            Event::Text(text) if pending_data_kind.is_some() => {
                let raw_text = text.unescape().map_err(|e| parse_err(xml, pos, e.to_string()))?;
                let kind = pending_data_kind.take().unwrap();
                cur_payload = parse_leaf_payload(&kind, raw_text.trim());
            }
            Event::End(tag) if tag.name().as_ref() == b"Object" => {
                let kind = cur_kind.take().ok_or_else(|| CodecError::Xml {
                    location: Location::from_offset(xml, pos),
                    message: "</Object> with no matching start".to_string(),
                })?;
                raw_nodes.push(RawNode { parents: std::mem::take(&mut cur_parents), kind, payload: cur_payload.take() });
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_root {
        return Err(CodecError::Xml { location: Location::start(), message: "missing <KigDocument> root".to_string() });
    }

    materialize(raw_nodes)
}

fn materialize(raw_nodes: Vec<RawNode>) -> Result<Document> {
    let mut doc = Document::new();
    let mut ids: Vec<NodeId> = Vec::with_capacity(raw_nodes.len());

    for raw in raw_nodes {
        let resolved_parents: Result<Vec<NodeId>> = raw
            .parents
            .iter()
            .map(|&oref| {
                ids.get(oref).copied().ok_or_else(|| CodecError::Xml {
                    location: Location::start(),
                    message: format!("parent oref {oref} refers to an object not yet defined"),
                })
            })
            .collect();
        let parents = resolved_parents?;

        let id = match raw.kind {
            RawKind::Data => doc.add_data(raw.payload.unwrap_or(ObjectImp::Invalid)),
            RawKind::Property { index } => {
                let parent = *parents.first().ok_or_else(|| CodecError::Xml {
                    location: Location::start(),
                    message: "property Object has no parent".to_string(),
                })?;
                doc.add_property(parent, index)?
            }
            RawKind::Typed { type_name } => {
                let leaked: &'static str = Box::leak(type_name.into_boxed_str());
                doc.add_typed(leaked, parents)?
            }
            RawKind::LegacyPoint { x, y } => {
                let xid = doc.add_data(ObjectImp::Double(DoubleImp(x)));
                let yid = doc.add_data(ObjectImp::Double(DoubleImp(y)));
                doc.add_typed("FixedPoint", vec![xid, yid])?
            }
        };
        ids.push(id);
    }

    Ok(doc)
}

fn parse_err(xml: &str, offset: usize, message: String) -> CodecError {
    CodecError::Xml { location: Location::from_offset(xml, offset), message }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_imp::value::ObjectImp;

    #[test]
    fn round_trips_a_fixed_point() {
        let mut doc = Document::new();
        let x = doc.add_data(ObjectImp::Double(DoubleImp(3.0)));
        let y = doc.add_data(ObjectImp::Double(DoubleImp(4.0)));
        let p = doc.add_typed("FixedPoint", vec![x, y]).unwrap();
        let xml = serialize(&doc, &[x, y, p]).unwrap();
        assert!(xml.contains("KigDocument"));

        let reloaded = deserialize(&xml).unwrap();
        match reloaded.imp(NodeId(2)) {
            Some(ObjectImp::Point(pt)) => {
                assert_eq!(pt.coord.x, 3.0);
                assert_eq!(pt.coord.y, 4.0);
            }
            other => panic!("expected a point, got {other:?}"),
        }
    }

    #[test]
    fn legacy_point_element_imports_as_a_fixed_point() {
        let xml = r#"<KigDocument Version="2.0.000"><Point x="1.5" y="-2.0"/></KigDocument>"#;
        let doc = deserialize(xml).unwrap();
        match doc.imp(NodeId(2)) {
            Some(ObjectImp::Point(pt)) => {
                assert_eq!(pt.coord.x, 1.5);
                assert_eq!(pt.coord.y, -2.0);
            }
            other => panic!("expected a point, got {other:?}"),
        }
    }

    #[test]
    fn forward_parent_reference_is_rejected() {
        let xml = r#"<KigDocument Version="2.0.000">
            <Object id="0" kind="typed" type="FixedPoint"><parent oref="5"/></Object>
        </KigDocument>"#;
        assert!(deserialize(xml).is_err());
    }

    #[test]
    fn missing_root_is_rejected() {
        assert!(deserialize("<NotKig/>").is_err());
    }
}

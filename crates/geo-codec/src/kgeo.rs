//! KGeo importer (spec §6, supplemented from `filters/kgeo.cc`). KGeo files
//! are `KSimpleConfig` ini-style text: `[Group]` headers followed by
//! `Key=Value` lines. Parsed with `nom` combinators in the same `ws`/line
//! style `gram-codec::parser::combinators` uses for its own hand-written
//! grammar.

use std::collections::HashMap;

use geo_graph::document::Document;
use geo_imp::value::{DoubleImp, ObjectImp};
use log::debug;
use nom::{
    branch::alt,
    bytes::complete::is_not,
    character::complete::{char, line_ending, space0},
    combinator::{eof, map, opt, recognize},
    multi::many0,
    sequence::{delimited, terminated, tuple},
    IResult,
};

use crate::error::{CodecError, Location, Result};

#[derive(Debug, Clone)]
enum Line {
    Group(String),
    KeyValue(String, String),
    Blank,
}

fn group_header(input: &str) -> IResult<&str, Line> {
    map(delimited(char('['), is_not("]\r\n"), char(']')), |name: &str| Line::Group(name.trim().to_string()))(input)
}

fn key_value(input: &str) -> IResult<&str, Line> {
    map(
        tuple((is_not("=\r\n"), char('='), opt(is_not("\r\n")))),
        |(key, _, value): (&str, char, Option<&str>)| {
            Line::KeyValue(key.trim().to_string(), value.unwrap_or("").trim().to_string())
        },
    )(input)
}

fn blank_line(input: &str) -> IResult<&str, Line> {
    map(space0, |_| Line::Blank)(input)
}

fn one_line(input: &str) -> IResult<&str, Line> {
    terminated(alt((group_header, key_value, blank_line)), alt((recognize(line_ending), eof)))(input)
}

fn ini_file(input: &str) -> IResult<&str, Vec<Line>> {
    many0(one_line)(input)
}

/// A group's key/value pairs, preserving the original KSimpleConfig
/// "last write wins" semantics for duplicate keys.
type Group = HashMap<String, String>;

fn parse_groups(input: &str) -> Result<Vec<(String, Group)>> {
    let (remainder, lines) = ini_file(input).map_err(|e| CodecError::KgeoParse {
        location: Location::start(),
        message: e.to_string(),
    })?;
    if !remainder.trim().is_empty() {
        return Err(CodecError::KgeoParse {
            location: Location::from_offset(input, input.len() - remainder.len()),
            message: format!("unparsed trailing content: {remainder:?}"),
        });
    }

    let mut groups: Vec<(String, Group)> = Vec::new();
    let mut current: Option<(String, Group)> = None;
    for line in lines {
        match line {
            Line::Group(name) => {
                if let Some(done) = current.take() {
                    groups.push(done);
                }
                current = Some((name, Group::new()));
            }
            Line::KeyValue(k, v) => {
                if let Some((_, group)) = current.as_mut() {
                    group.insert(k, v);
                }
            }
            Line::Blank => {}
        }
    }
    if let Some(done) = current.take() {
        groups.push(done);
    }
    Ok(groups)
}

fn find_group<'a>(groups: &'a [(String, Group)], name: &str) -> Option<&'a Group> {
    groups.iter().find(|(n, _)| n == name).map(|(_, g)| g)
}

fn read_num(group: &Group, group_name: &str, key: &str, default: Option<i64>) -> Result<i64> {
    match group.get(key) {
        Some(v) => v.parse().map_err(|_| CodecError::KgeoBadNumber {
            group: group_name.to_string(),
            key: key.to_string(),
            value: v.clone(),
        }),
        None => default.ok_or_else(|| CodecError::KgeoMissingKey {
            group: group_name.to_string(),
            key: key.to_string(),
        }),
    }
}

fn read_f64(group: &Group, group_name: &str, key: &str) -> Result<f64> {
    let raw = group.get(key).ok_or_else(|| CodecError::KgeoMissingKey {
        group: group_name.to_string(),
        key: key.to_string(),
    })?;
    raw.parse().map_err(|_| CodecError::KgeoBadNumber {
        group: group_name.to_string(),
        key: key.to_string(),
        value: raw.clone(),
    })
}

/// The coordinate-system metrics `loadMetrics` reads before objects, part
/// of the document model rather than the renderer (spec §6 supplement).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    pub x_max: i64,
    pub y_max: i64,
}

pub struct ImportResult {
    pub document: Document,
    pub metrics: Metrics,
}

const ID_POINT: i64 = 2;
const ID_SEGMENT: i64 = 3;
const ID_CIRCLE: i64 = 4;
const ID_LINE: i64 = 5;

/// Imports a whole KGeo file. Any unparsable numeric field or unsupported
/// object id aborts with no partial document committed (spec §7).
pub fn import(input: &str) -> Result<ImportResult> {
    let groups = parse_groups(input)?;
    let main = find_group(&groups, "Main").ok_or_else(|| CodecError::KgeoMissingKey {
        group: "Main".to_string(),
        key: "(the group itself)".to_string(),
    })?;

    let x_max = read_num(main, "Main", "XMax", Some(16))?;
    let y_max = read_num(main, "Main", "YMax", Some(11))?;
    let metrics = Metrics { x_max, y_max };
    debug!("kgeo metrics: {x_max}x{y_max}");

    let number = read_num(main, "Main", "Number", None)?;

    let mut document = Document::new();
    // Maps 1-based KGeo object index -> this object's own NodeId (the
    // observable output node, used when wiring `Parents`).
    let mut object_nodes: Vec<Option<geo_graph::node::NodeId>> = vec![None; number as usize];

    for i in 0..number {
        let group_name = format!("Object {}", i + 1);
        let group = find_group(&groups, &group_name).ok_or_else(|| CodecError::KgeoMissingKey {
            group: group_name.clone(),
            key: "(the group itself)".to_string(),
        })?;
        let geo_id = read_num(group, &group_name, "Geo", None)?;

        match geo_id {
            ID_POINT => {
                let x = read_f64(group, &group_name, "QPointX")?;
                let y = read_f64(group, &group_name, "QPointY")?;
                let xid = document.add_data(ObjectImp::Double(DoubleImp(x)));
                let yid = document.add_data(ObjectImp::Double(DoubleImp(y)));
                let node = document.add_typed("FixedPoint", vec![xid, yid])?;
                object_nodes[i as usize] = Some(node);
            }
            // Segment, circle and line all take their endpoints from
            // `Parents`, wired in the second pass once every point exists.
            ID_SEGMENT | ID_CIRCLE | ID_LINE => {}
            other => {
                return Err(CodecError::KgeoUnsupportedObject { group: group_name, id: other });
            }
        };
    }

    for i in 0..number {
        let group_name = format!("Object {}", i + 1);
        let group = find_group(&groups, &group_name).expect("validated to exist above");
        let geo_id = read_num(group, &group_name, "Geo", None)?;
        if geo_id == ID_POINT {
            continue;
        }

        let parent_indices: Vec<i64> = match group.get("Parents") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| {
                    s.parse::<i64>().map_err(|_| CodecError::KgeoBadNumber {
                        group: group_name.clone(),
                        key: "Parents".to_string(),
                        value: s.to_string(),
                    })
                })
                .collect::<Result<Vec<i64>>>()?,
            None => Vec::new(),
        };
        let parent_ids: Vec<geo_graph::node::NodeId> = parent_indices
            .iter()
            .filter(|&&p| p != 0)
            .map(|&p| {
                object_nodes
                    .get((p - 1) as usize)
                    .copied()
                    .flatten()
                    .ok_or_else(|| CodecError::KgeoBadNumber {
                        group: group_name.clone(),
                        key: "Parents".to_string(),
                        value: p.to_string(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        let type_name = match geo_id {
            ID_SEGMENT => "Segment",
            ID_CIRCLE => "CircleByCenterAndPoint",
            ID_LINE => "LineThroughTwoPoints",
            _ => unreachable!("validated in the first pass"),
        };
        let computed = document.add_typed(type_name, parent_ids)?;
        // Replace the placeholder Data node's slot with the real computed
        // node so later `Parents` references resolve to it.
        object_nodes[i as usize] = Some(computed);
    }

    Ok(ImportResult { document, metrics })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "[Main]\nXMax=16\nYMax=11\nNumber=3\n\n[Object 1]\nGeo=2\nQPointX=0.0\nQPointY=0.0\n\n[Object 2]\nGeo=2\nQPointX=4.0\nQPointY=0.0\n\n[Object 3]\nGeo=3\nParents=1,2\n";

    #[test]
    fn imports_two_points_and_a_segment() {
        let result = import(SAMPLE).unwrap();
        assert_eq!(result.metrics, Metrics { x_max: 16, y_max: 11 });
        // 2 points (2 Data + 1 Typed each) plus 1 Typed segment node.
        assert_eq!(result.document.len(), 7);
        assert!(matches!(
            result.document.imp(geo_graph::node::NodeId(6)),
            Some(ObjectImp::Line(_))
        ));
    }

    #[test]
    fn missing_main_group_is_rejected() {
        assert!(import("[Object 1]\nGeo=2\n").is_err());
    }

    #[test]
    fn unsupported_object_id_aborts_without_partial_import() {
        let bad = "[Main]\nXMax=16\nYMax=11\nNumber=1\n\n[Object 1]\nGeo=99\n";
        assert!(import(bad).is_err());
    }

    #[test]
    fn non_numeric_coordinate_is_rejected() {
        let bad = "[Main]\nNumber=1\n\n[Object 1]\nGeo=2\nQPointX=oops\nQPointY=0.0\n";
        assert!(import(bad).is_err());
    }

    #[test]
    fn defaults_metrics_when_absent() {
        let minimal = "[Main]\nNumber=0\n";
        let result = import(minimal).unwrap();
        assert_eq!(result.metrics, Metrics { x_max: 16, y_max: 11 });
    }
}

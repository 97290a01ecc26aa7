//! Scenario 6 (spec §8): importing a KGeo file and round-tripping it
//! losslessly through the native XML serializer.

use geo_codec::kgeo;
use geo_codec::native;
use geo_graph::node::NodeId;
use geo_imp::value::ObjectImp;

const SAMPLE: &str = "\
[Main]
XMax=16
YMax=11
Number=3

[Object 1]
Geo=2
QPointX=1.0
QPointY=2.0

[Object 2]
Geo=2
QPointX=3.0
QPointY=4.0

[Object 3]
Geo=3
Parents=1,2
";

fn assert_point_eq(imp: &ObjectImp, x: f64, y: f64) {
    match imp {
        ObjectImp::Point(p) => {
            assert_eq!(p.coord.x, x);
            assert_eq!(p.coord.y, y);
        }
        other => panic!("expected a point, got {other:?}"),
    }
}

#[test]
fn kgeo_import_produces_two_points_and_a_segment() {
    let result = kgeo::import(SAMPLE).unwrap();
    let doc = &result.document;

    // Points land at ids 2 (x,y,FixedPoint) and 5; the segment at id 6.
    assert_point_eq(doc.imp(NodeId(2)).unwrap(), 1.0, 2.0);
    assert_point_eq(doc.imp(NodeId(5)).unwrap(), 3.0, 4.0);
    match doc.imp(NodeId(6)).unwrap() {
        ObjectImp::Line(l) => {
            assert!(l.data.a.approx_eq(geo_imp::Coordinate::new(1.0, 2.0), 1e-9));
            assert!(l.data.b.approx_eq(geo_imp::Coordinate::new(3.0, 4.0), 1e-9));
        }
        other => panic!("expected a segment line, got {other:?}"),
    }
}

#[test]
fn kgeo_import_round_trips_losslessly_through_native_xml() {
    let result = kgeo::import(SAMPLE).unwrap();
    let doc = &result.document;

    // Insertion order already satisfies the topological ordering the
    // document's own `add_*` calls enforce (parents always precede their
    // children), so it can be used directly as the serializer's node order.
    let order: Vec<NodeId> = (0..doc.len() as u64).map(NodeId).collect();
    let xml = native::serialize(doc, &order).unwrap();

    let reloaded = native::deserialize(&xml).unwrap();
    assert_eq!(reloaded.len(), doc.len());
    assert_point_eq(reloaded.imp(NodeId(2)).unwrap(), 1.0, 2.0);
    assert_point_eq(reloaded.imp(NodeId(5)).unwrap(), 3.0, 4.0);
    match reloaded.imp(NodeId(6)).unwrap() {
        ObjectImp::Line(_) => {}
        other => panic!("expected a segment line after round-trip, got {other:?}"),
    }
}

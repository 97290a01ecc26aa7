//! (De)serializes an [`ObjectHierarchy`] using `quick_xml`'s serde
//! integration, since its `Given`/`Fetch`/`Apply` node list is already a
//! plain `#[derive(Serialize, Deserialize)]` tree with no document-specific
//! `oref` bookkeeping — unlike [`crate::native`], which has to hand-walk
//! `oref` indices that only make sense against a live `Document`.

use geo_graph::ObjectHierarchy;

use crate::error::{CodecError, Location, Result};

pub fn to_xml(hierarchy: &ObjectHierarchy) -> Result<String> {
    quick_xml::se::to_string(hierarchy).map_err(|e| CodecError::Xml {
        location: Location::start(),
        message: e.to_string(),
    })
}

pub fn from_xml(xml: &str) -> Result<ObjectHierarchy> {
    quick_xml::de::from_str(xml).map_err(|e| CodecError::Xml {
        location: Location::start(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_graph::HierarchyNode;

    #[test]
    fn round_trips_a_midpoint_macro() {
        let h = ObjectHierarchy::new(
            vec![
                HierarchyNode::Given { required_type: "point".into() },
                HierarchyNode::Given { required_type: "point".into() },
                HierarchyNode::Apply { type_name: "MidPoint".into(), args: vec![0, 1] },
            ],
            vec![2],
        );
        let xml = to_xml(&h).unwrap();
        let back = from_xml(&xml).unwrap();
        assert_eq!(h, back);
    }
}

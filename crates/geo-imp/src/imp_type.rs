//! The Imp type lattice: a single-inheritance tree of runtime type
//! singletons, rooted at `Any` (spec §3.1, §4.A).
//!
//! Every concrete `ImpType` is a `'static` singleton behind a
//! `once_cell::sync::Lazy`, the same "lazily-built, process-lifetime
//! registry" shape the teacher workspace uses for its own static tables.
//! Identity is by pointer (`&'static ImpType`); `machine_name()` is the
//! stable, externally visible identifier used in serialized documents and
//! in `ObjectType` lookups — integers never leak past this module.

use once_cell::sync::Lazy;
use std::fmt;

/// A node in the Imp type lattice.
///
/// `parent` is `None` only for `Any`. Every other `ImpType` has exactly one
/// parent, giving single inheritance; `inherits` walks this chain.
pub struct ImpType {
    machine_name: &'static str,
    display_name_singular: &'static str,
    display_name_plural: &'static str,
    display_name_selected: &'static str,
    action_verb_add: &'static str,
    parent: Option<&'static ImpType>,
}

impl ImpType {
    pub fn machine_name(&self) -> &'static str {
        self.machine_name
    }

    pub fn display_name_singular(&self) -> &'static str {
        self.display_name_singular
    }

    pub fn display_name_plural(&self) -> &'static str {
        self.display_name_plural
    }

    /// "selectable" display text, e.g. used in status-bar hints such as
    /// "Select a point".
    pub fn display_name_selected(&self) -> &'static str {
        self.display_name_selected
    }

    pub fn action_verb_add(&self) -> &'static str {
        self.action_verb_add
    }

    pub fn parent(&'static self) -> Option<&'static ImpType> {
        self.parent
    }

    /// Walks the parent chain to test `self.inherits(other)`. `Any`
    /// inherits only from itself. Iterative: the lattice here is never more
    /// than a handful of levels deep, but an unbounded user-supplied chain
    /// would still be safe against stack overflow.
    pub fn inherits(&'static self, other: &'static ImpType) -> bool {
        let mut cur: Option<&'static ImpType> = Some(self);
        while let Some(t) = cur {
            if std::ptr::eq(t, other) {
                return true;
            }
            cur = t.parent;
        }
        false
    }

    /// The number of property descriptors `self` exposes, counting those
    /// inherited from `parent`. Used only to validate property indices
    /// (§4.A: out-of-range indices are a programmer error).
    pub fn lookup(name: &str) -> Option<&'static ImpType> {
        ALL_TYPES.iter().find(|t| t.machine_name == name).copied()
    }
}

impl fmt::Debug for ImpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ImpType({})", self.machine_name)
    }
}

impl PartialEq for ImpType {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}
impl Eq for ImpType {}

macro_rules! imp_type {
    ($static_name:ident, $name:literal, $singular:literal, $plural:literal, $selected:literal, $verb:literal, $parent:expr) => {
        pub static $static_name: Lazy<ImpType> = Lazy::new(|| ImpType {
            machine_name: $name,
            display_name_singular: $singular,
            display_name_plural: $plural,
            display_name_selected: $selected,
            action_verb_add: $verb,
            parent: $parent,
        });
    };
}

imp_type!(ANY, "any", "object", "objects", "an object", "add", None);
imp_type!(
    GEOMETRIC,
    "geometric",
    "geometric object",
    "geometric objects",
    "a geometric object",
    "add",
    Some(&ANY)
);
imp_type!(POINT, "point", "point", "points", "a point", "add point", Some(&GEOMETRIC));
imp_type!(
    ABSTRACT_LINE,
    "abstract-line",
    "line",
    "lines",
    "a line",
    "add line",
    Some(&GEOMETRIC)
);
imp_type!(LINE, "line", "line", "lines", "a line", "add line", Some(&ABSTRACT_LINE));
imp_type!(RAY, "ray", "ray", "rays", "a ray", "add ray", Some(&ABSTRACT_LINE));
imp_type!(
    SEGMENT,
    "segment",
    "segment",
    "segments",
    "a segment",
    "add segment",
    Some(&ABSTRACT_LINE)
);
imp_type!(VECTOR, "vector", "vector", "vectors", "a vector", "add vector", Some(&GEOMETRIC));
imp_type!(CIRCLE, "circle", "circle", "circles", "a circle", "add circle", Some(&GEOMETRIC));
imp_type!(CONIC, "conic", "conic", "conics", "a conic", "add conic", Some(&GEOMETRIC));
imp_type!(CUBIC, "cubic", "cubic", "cubics", "a cubic", "add cubic", Some(&GEOMETRIC));
imp_type!(POLYGON, "polygon", "polygon", "polygons", "a polygon", "add polygon", Some(&GEOMETRIC));
imp_type!(
    TRANSFORMATION,
    "transformation",
    "transformation",
    "transformations",
    "a transformation",
    "add transformation",
    Some(&GEOMETRIC)
);
imp_type!(LOCUS, "locus", "locus", "loci", "a locus", "add locus", Some(&GEOMETRIC));
imp_type!(TEXT, "text", "label", "labels", "a label", "add label", Some(&ANY));
imp_type!(
    NUMERIC_TEXT,
    "numeric-text",
    "numeric label",
    "numeric labels",
    "a numeric label",
    "add label",
    Some(&TEXT)
);
imp_type!(
    BOOL_TEXT,
    "bool-text",
    "boolean label",
    "boolean labels",
    "a boolean label",
    "add label",
    Some(&TEXT)
);
imp_type!(PRIMITIVE, "primitive", "value", "values", "a value", "add", Some(&ANY));
imp_type!(INT, "int", "integer", "integers", "an integer", "add", Some(&PRIMITIVE));
imp_type!(DOUBLE, "double", "number", "numbers", "a number", "add", Some(&PRIMITIVE));
imp_type!(STRING, "string", "text", "texts", "a text", "add", Some(&PRIMITIVE));
imp_type!(BOOL, "bool", "boolean", "booleans", "a boolean", "add", Some(&PRIMITIVE));
imp_type!(INVALID, "invalid", "invalid object", "invalid objects", "nothing", "add", Some(&ANY));

static ALL_TYPES: Lazy<Vec<&'static ImpType>> = Lazy::new(|| {
    vec![
        &ANY,
        &GEOMETRIC,
        &POINT,
        &ABSTRACT_LINE,
        &LINE,
        &RAY,
        &SEGMENT,
        &VECTOR,
        &CIRCLE,
        &CONIC,
        &CUBIC,
        &POLYGON,
        &TRANSFORMATION,
        &LOCUS,
        &TEXT,
        &NUMERIC_TEXT,
        &BOOL_TEXT,
        &PRIMITIVE,
        &INT,
        &DOUBLE,
        &STRING,
        &BOOL,
        &INVALID,
    ]
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_inherits_abstract_line_and_geometric_and_any() {
        assert!(SEGMENT.inherits(&SEGMENT));
        assert!(SEGMENT.inherits(&ABSTRACT_LINE));
        assert!(SEGMENT.inherits(&GEOMETRIC));
        assert!(SEGMENT.inherits(&ANY));
        assert!(!SEGMENT.inherits(&RAY));
        assert!(!SEGMENT.inherits(&LINE));
    }

    #[test]
    fn any_inherits_only_itself() {
        assert!(ANY.inherits(&ANY));
        assert!(!ANY.inherits(&POINT));
    }

    #[test]
    fn lookup_by_machine_name() {
        let t = ImpType::lookup("segment").expect("segment type registered");
        assert_eq!(t.machine_name(), "segment");
        assert!(ImpType::lookup("no-such-type").is_none());
    }

    #[test]
    fn numeric_and_bool_text_both_inherit_text_not_each_other() {
        assert!(NUMERIC_TEXT.inherits(&TEXT));
        assert!(BOOL_TEXT.inherits(&TEXT));
        assert!(!NUMERIC_TEXT.inherits(&BOOL_TEXT));
    }
}

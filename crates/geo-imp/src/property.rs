//! Property descriptors (spec §3.1): an ordered, numbered list of
//! `(internal-name, display-name, icon, required-ImpType)` entries exposed
//! by every Imp, plus the pure evaluator `property(index) -> ObjectImp`.
//!
//! A parent type's properties occupy the low indices of each subtype's
//! list; subtypes append theirs. `PropertyList::extend` implements that
//! concatenation-at-the-tag-level rule (Design Notes §9).

use crate::imp_type::ImpType;

/// One entry in an Imp's property list.
#[derive(Debug, Clone, Copy)]
pub struct PropertyDescriptor {
    pub internal_name: &'static str,
    pub display_name: &'static str,
    pub icon: &'static str,
    /// The tightest ImpType a reader must request this property *as*.
    pub required_type: &'static ImpType,
    /// True when the property is geometrically the same object as (part
    /// of) its parent — e.g. a circle's center. Governs whether a point
    /// attached to this property may be intersected with the containing
    /// Imp (spec §3.1).
    pub defined_on_or_through: bool,
}

/// An ordered property list, built by parent-then-own concatenation.
#[derive(Debug, Clone, Default)]
pub struct PropertyList(pub Vec<PropertyDescriptor>);

impl PropertyList {
    pub fn new() -> Self {
        PropertyList(Vec::new())
    }

    /// Appends `own` after whatever this list already holds (i.e. after
    /// the parent's properties), per the low-indices-for-parent rule.
    pub fn extend(mut self, own: impl IntoIterator<Item = PropertyDescriptor>) -> Self {
        self.0.extend(own);
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PropertyDescriptor> {
        self.0.get(index)
    }
}

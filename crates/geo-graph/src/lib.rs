//! The object dependency graph: args parsing, node storage, the
//! `ObjectType` catalog, topological recalculation, macro/locus hierarchies,
//! construction mode and the document that ties them together.
//!
//! `geo-imp` supplies the values this crate moves around; it never appears
//! the other way — a [`document::Document`] is the only thing in this
//! workspace that knows both what an Imp is and how one came to exist.

pub mod args_parser;
pub mod calc_paths;
pub mod construction_mode;
pub mod document;
pub mod error;
pub mod hierarchy;
pub mod node;
pub mod object_type;

pub use args_parser::{ArgSpecEntry, ArgsParser, CheckResult};
pub use construction_mode::{ConstructionMode, Hypothesis};
pub use document::{Document, Holder};
pub use error::GraphError;
pub use hierarchy::{FetchValue, HierarchyNode, Locus, ObjectHierarchy};
pub use node::{Node, NodeId, NodeKind};
pub use object_type::{ObjectType, ParamRange};

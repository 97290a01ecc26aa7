//! The Imp type lattice and the immutable geometric values it classifies.
//!
//! Everything a construction computes or consumes — a point, a line, a
//! locus, a transformation, a raw number — is an [`value::ObjectImp`].
//! Imps never reference the graph that produced them: this crate has no
//! notion of objects, arguments or documents, only values and the runtime
//! type lattice ([`imp_type::ImpType`]) used to dispatch over them.

pub mod coordinate;
pub mod imp_type;
pub mod property;
pub mod value;

pub use coordinate::{Coordinate, LineData, Transformation};
pub use imp_type::ImpType;
pub use property::{PropertyDescriptor, PropertyList};
pub use value::ObjectImp;

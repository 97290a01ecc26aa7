//! Reading and writing documents: the native `<KigDocument>` XML format and
//! the KGeo import filter. Neither format is ever mixed with the other —
//! `open()` picks one path by file extension and commits to it.

pub mod error;
pub mod hierarchy_xml;
pub mod kgeo;
pub mod native;

use std::path::Path;

use geo_graph::document::Document;

pub use error::{CodecError, Result};
pub use kgeo::{ImportResult, Metrics};

/// What kind of file `open()` found, inferred from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Native,
    Kgeo,
}

pub fn detect_kind(path: &Path) -> Option<DocumentKind> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("kig") => Some(DocumentKind::Native),
        Some("kgeo") => Some(DocumentKind::Kgeo),
        _ => None,
    }
}

/// Opens a file by its extension, dispatching to the native XML reader or
/// the KGeo importer (spec §6). Returns the KGeo metrics alongside the
/// document when importing, `None` for a native document (it carries no
/// such metadata).
pub fn open(path: &Path) -> Result<(Document, Option<Metrics>)> {
    let contents = std::fs::read_to_string(path)?;
    match detect_kind(path) {
        Some(DocumentKind::Native) => Ok((native::deserialize(&contents)?, None)),
        Some(DocumentKind::Kgeo) => {
            let result = kgeo::import(&contents)?;
            Ok((result.document, Some(result.metrics)))
        }
        None => Err(CodecError::Xml {
            location: error::Location::start(),
            message: format!("unrecognized file extension: {}", path.display()),
        }),
    }
}

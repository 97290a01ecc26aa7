//! Structural failures specific to reading and writing documents: malformed
//! XML, a KGeo file referencing fields this importer doesn't understand.
//! Distinct from [`geo_graph::GraphError`], which this crate wraps rather
//! than duplicates.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl Location {
    pub fn start() -> Self {
        Location { line: 1, column: 1 }
    }

    pub fn from_offset(input: &str, offset: usize) -> Self {
        let offset = offset.min(input.len());
        let prefix = &input[..offset];
        let line = prefix.matches('\n').count() + 1;
        let column = prefix.rfind('\n').map(|pos| offset - pos).unwrap_or(offset + 1);
        Location { line, column }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("malformed KigDocument XML at {location}: {message}")]
    Xml { location: Location, message: String },

    #[error("KGeo file is missing required key {key:?} in group {group:?}")]
    KgeoMissingKey { group: String, key: String },

    #[error("KGeo file has a non-numeric value for {key:?} in group {group:?}: {value:?}")]
    KgeoBadNumber { group: String, key: String, value: String },

    #[error("KGeo file references unsupported object id {id} in group {group:?}")]
    KgeoUnsupportedObject { group: String, id: i64 },

    #[error("KGeo file is malformed at {location}: {message}")]
    KgeoParse { location: Location, message: String },

    #[error(transparent)]
    Graph(#[from] geo_graph::GraphError),

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for CodecError {
    fn from(e: std::io::Error) -> Self {
        CodecError::Io(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CodecError>;

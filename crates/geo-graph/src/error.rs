//! Structural failures (spec §7): malformed external data, unknown machine
//! names, arity mismatches. These are distinct from `InvalidImp`, which is
//! a perfectly ordinary calc result, not an error.

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
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GraphError {
    #[error("unknown object type machine name {name:?}")]
    UnknownObjectType { name: String },

    #[error("unknown imp type machine name {name:?}")]
    UnknownImpType { name: String },

    #[error("hierarchy node references index {index} which comes after it")]
    ForwardReference { index: usize },

    #[error("hierarchy expects {expected} inputs, got {actual}")]
    ArityMismatch { expected: usize, actual: usize },

    #[error("node {id:?} not found in document")]
    NoSuchNode { id: u64 },

    #[error("adding this edge would create a cycle through node {id:?}")]
    WouldCreateCycle { id: u64 },

    #[error("{context}: {location}: {message}")]
    Malformed {
        context: &'static str,
        location: Location,
        message: String,
    },
}

use std::fmt;
use thiserror::Error;

/// How a hits collection was asked for.
#[derive(Clone, Debug, PartialEq)]
pub enum CollectionRef {
    Name(String),
    Id(usize),
}

impl fmt::Display for CollectionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectionRef::Name(name) => write!(f, "name `{}`", name),
            CollectionRef::Id(id) => write!(f, "ID {}", id),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum HitsError {
    /// A collection lookup by name, or a fetch by id from the current
    /// event, came back empty.
    #[error("Cannot access hits collection {0}")]
    CollectionNotFound(CollectionRef),
}

impl HitsError {
    pub fn not_found_name(name: &str) -> HitsError {
        HitsError::CollectionNotFound(CollectionRef::Name(name.to_string()))
    }

    pub fn not_found_id(id: usize) -> HitsError {
        HitsError::CollectionNotFound(CollectionRef::Id(id))
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum AnalysisError {
    #[error("ntuple `{ntuple}` has no column {index}")]
    NoSuchColumn { ntuple: String, index: usize },

    #[error("column {index} of ntuple `{ntuple}` holds {expected} values, not {found}")]
    WrongColumnType {
        ntuple: String,
        index: usize,
        expected: &'static str,
        found: &'static str,
    },

    #[error("cannot merge ntuple `{other}` into `{ntuple}`: column layouts differ")]
    SchemaMismatch { ntuple: String, other: String },
}

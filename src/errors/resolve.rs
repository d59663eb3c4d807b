use alloc::{fmt, string::String, vec::Vec};
use core::fmt::{Display, Formatter};

use super::instantiate::InstantiateErrorKind;

#[derive(thiserror::Error, Debug)]
pub enum ResolveErrorKind {
    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: &'static str },
    #[error("Id not defined: {id}")]
    UndefinedId { id: String },
    #[error("Circular dependency detected: {}", CyclePath { id, stack })]
    CircularDependency { id: String, stack: Vec<String> },
    #[error("Incorrect instance type of `{id}`, expected: {expected}")]
    IncorrectType { id: String, expected: &'static str },
    #[error("Factory of `{id}` failed: {source}")]
    Factory {
        id: String,
        #[source]
        source: InstantiateErrorKind,
    },
}

struct CyclePath<'a> {
    id: &'a str,
    stack: &'a [String],
}

impl Display for CyclePath<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for id in self.stack {
            write!(f, "{id} -> ")?;
        }
        write!(f, "{}", self.id)
    }
}

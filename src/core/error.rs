use std::fmt;

/// Errors surfaced by registry lookups and strict registration.
///
/// None of these are transient: every registry operation is synchronous and
/// in-memory, so callers handle them once (fallback view, create-and-register)
/// rather than retrying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterError {
    /// Nothing is registered under the key.
    NotFound { key: String },
    /// Something is registered under the key, but not a router of the
    /// requested type.
    TypeMismatch { key: String, expected: &'static str },
    /// Strict registration refused to overwrite an existing router.
    DuplicateId { key: String },
}

impl fmt::Display for RouterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouterError::NotFound { key } => write!(f, "no router registered under '{key}'"),
            RouterError::TypeMismatch { key, expected } => {
                write!(f, "router '{key}' is not a {expected}")
            }
            RouterError::DuplicateId { key } => {
                write!(f, "a router is already registered under '{key}'")
            }
        }
    }
}

impl std::error::Error for RouterError {}

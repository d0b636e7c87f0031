//! Error types for sqlcraft

use std::fmt;

/// Result type alias for sqlcraft operations
pub type CraftResult<T> = Result<T, CraftError>;

/// Error types for statement building and query execution
// Display/Error are implemented by hand: thiserror treats any field named
// `source` as the error source, but `NotFound::source` is a plain String
// naming the statement source, not a wrapped error.
#[derive(Debug)]
pub enum CraftError {
    /// A WHERE/HAVING expression is statically false after combination.
    ///
    /// Raised at the fluent call that introduced the contradiction, never
    /// deferred to render time.
    NeverMatches(String),

    /// A feature was requested on a statement kind that does not declare it
    Unsupported {
        feature: &'static str,
        statement: &'static str,
    },

    /// Malformed builder input (e.g. a null operand under a non-equality operator)
    Validation(String),

    /// Internal invariant breach (placeholder/parameter drift, constant-false
    /// expression surviving to render). Always a programming error.
    Internal(String),

    /// Required single-result fetch matched no row
    NotFound { source: String },

    /// Pass-through error from the external execution engine
    Execution(String),
}

impl fmt::Display for CraftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NeverMatches(msg) => write!(f, "Expression can never match: {msg}"),
            Self::Unsupported { feature, statement } => {
                write!(f, "Feature {feature} is not supported on {statement} statements")
            }
            Self::Validation(msg) => write!(f, "Validation error: {msg}"),
            Self::Internal(msg) => write!(f, "Internal error: {msg}"),
            Self::NotFound { source } => write!(f, "No record found in '{source}'"),
            Self::Execution(msg) => write!(f, "Execution error: {msg}"),
        }
    }
}

impl std::error::Error for CraftError {}

impl CraftError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an internal-invariant error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create a not found error for a statement source
    pub fn not_found(source: impl Into<String>) -> Self {
        Self::NotFound {
            source: source.into(),
        }
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a build-time contradiction
    pub fn is_never_matches(&self) -> bool {
        matches!(self, Self::NeverMatches(_))
    }
}

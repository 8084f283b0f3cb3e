//! Error types for sqlforge.

use thiserror::Error;

/// Where in the pipeline an error was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Tree construction or structural assumptions about identifiers.
    Build,
    /// The translator could not turn a statement into SQL.
    Translation,
    /// Post-processing of fetched rows.
    ResultShape,
    /// Configuration, IO and the execution collaborator.
    Runtime,
}

/// The main error type for sqlforge operations.
#[derive(Debug, Error)]
pub enum ForgeError {
    /// Join type outside of inner, left, right, outer.
    #[error("Invalid join type \"{0}\". Available types: inner, left, right, outer")]
    InvalidJoinType(String),

    /// Condition type outside of and, or, where, having.
    #[error("Invalid condition type \"{0}\", must be one of: and, or, where, having")]
    InvalidConjunction(String),

    /// Sort direction outside of asc, desc.
    #[error("Invalid sort direction \"{0}\", must be asc or desc")]
    InvalidDirection(String),

    /// A dotted or aliased identifier split into the wrong parts.
    #[error("Malformed identifier \"{input}\": {reason}")]
    MalformedIdentifier { input: String, reason: String },

    /// Statement kind the translator does not know.
    #[error("Unknown statement kind. Cannot translate: {0}")]
    UnknownStatement(String),

    /// Insert/replace (or update) without any values.
    #[error("Cannot build {0} statement without values")]
    EmptyValues(&'static str),

    /// A value of a shape that cannot be escaped at its position.
    #[error("Cannot translate value: {0}")]
    Untranslatable(String),

    /// Forward or group key missing from the fetched rows.
    #[error("Cannot shape results, key \"{0}\" not in result fields")]
    MissingResultKey(String),

    /// Fetched rows are not key-value records.
    #[error("Cannot shape results, the result is no associative record")]
    NotAssociative,

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution error.
    #[error("Execution error: {0}")]
    Execution(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON statement or row (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ForgeError {
    /// Create a malformed identifier error.
    pub fn malformed(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedIdentifier {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Create an untranslatable value error.
    pub fn untranslatable(message: impl Into<String>) -> Self {
        Self::Untranslatable(message.into())
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidJoinType(_)
            | Self::InvalidConjunction(_)
            | Self::InvalidDirection(_)
            | Self::MalformedIdentifier { .. } => ErrorCategory::Build,
            Self::UnknownStatement(_) | Self::EmptyValues(_) | Self::Untranslatable(_) => {
                ErrorCategory::Translation
            }
            Self::MissingResultKey(_) | Self::NotAssociative => ErrorCategory::ResultShape,
            Self::Connection(_) | Self::Execution(_) | Self::Config(_) | Self::Io(_) | Self::Json(_) => {
                ErrorCategory::Runtime
            }
        }
    }
}

/// Result type alias for sqlforge operations.
pub type ForgeResult<T> = Result<T, ForgeError>;

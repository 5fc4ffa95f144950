use thiserror::Error;

use crate::value::CoercionError;

/// Error type shared across forgery crates.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A directive name/arity pair has no catalogue entry.
    #[error("directive not found: @{name} with {arity} argument(s)")]
    DirectiveNotFound { name: String, arity: usize },
    /// Malformed path, malformed directive syntax or unsupported value shape.
    #[error("parse error at '{path}': {message}")]
    Parse { path: String, message: String },
    /// A type lacks a usable no-argument constructor.
    #[error("cannot construct '{type_name}': {message}")]
    Construction { type_name: String, message: String },
    /// A targeted field exposes no mutator.
    #[error("field '{field}' of '{type_name}' is not assignable")]
    Assignment { type_name: String, field: String },
    /// A literal or generated value does not fit the declared type.
    #[error("cannot assign '{path}': {source}")]
    Coercion {
        path: String,
        #[source]
        source: CoercionError,
    },
    /// Directive arguments coerce but are rejected by the generator.
    #[error("invalid arguments for @{directive}: {message}")]
    InvalidArgument { directive: String, message: String },
}

impl Error {
    pub fn parse(path: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn construction(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Construction {
            type_name: type_name.into(),
            message: message.into(),
        }
    }

    pub fn coercion(path: impl Into<String>, source: CoercionError) -> Self {
        Error::Coercion {
            path: path.into(),
            source,
        }
    }

    pub fn invalid_argument(directive: impl Into<String>, message: impl Into<String>) -> Self {
        Error::InvalidArgument {
            directive: directive.into(),
            message: message.into(),
        }
    }

    /// Stable short code for the error kind, used in log fields.
    pub fn code(&self) -> &'static str {
        match self {
            Error::DirectiveNotFound { .. } => "directive_not_found",
            Error::Parse { .. } => "parse_error",
            Error::Construction { .. } => "construction_error",
            Error::Assignment { .. } => "assignment_error",
            Error::Coercion { .. } => "coercion_error",
            Error::InvalidArgument { .. } => "invalid_argument",
        }
    }
}

/// Convenience alias for results returned by forgery crates.
pub type Result<T> = std::result::Result<T, Error>;

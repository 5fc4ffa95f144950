//! Core contracts shared across the forgery crates.
//!
//! This crate defines the workspace error type, the value kinds used to
//! describe generated data, literal coercion into caller field types, and
//! the `@directive(args)` mini-syntax embedded in rule strings.

pub mod directive;
pub mod error;
pub mod value;

pub use directive::DirectiveCall;
pub use error::{Error, Result};
pub use value::{CoercionError, FromValue, ValueKind, describe_value};

/// Prefix that marks a rule string as a directive call.
pub const DIRECTIVE_PREFIX: char = '@';

//! Rule-driven mock object factories.
//!
//! A caller describes a type once through [`Mockable`], registers a rule
//! mapping of field paths to literals, `@directive(args)` strings, nested
//! mappings or sequences, and then draws independent populated instances
//! from the compiled [`MockFactory`].
//!
//! ```ignore
//! let registry = FactoryRegistry::new();
//! let factory = registry.set::<User>(&json!({
//!     "name": "@cname",
//!     "age": "@integer(18, 60)",
//!     "address.city": "@city",
//! }))?;
//! let user = factory.generate()?;
//! ```

pub mod factory;
pub mod parser;
pub mod registry;
pub mod schema;

pub use factory::{Instances, MockFactory};
pub use forgery_core::{Error, Result};
pub use forgery_directives::DirectiveCatalogue;
pub use parser::{FieldRule, TypeBinding, ValueSpec, compile};
pub use registry::FactoryRegistry;
pub use schema::{FieldDescriptor, FieldKind, Mockable, ObjectSchema, SchemaBuilder};

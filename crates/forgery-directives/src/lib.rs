//! Directive catalogue for forgery.
//!
//! A [`DirectiveCatalogue`] maps `(name, argument shape)` to a registered
//! [`Generator`]. It is built once, then shared read-only by every factory
//! that resolves `@name(args)` directives.

pub mod catalogue;
pub mod faker_rs;
pub mod generators;
pub mod params;

pub use catalogue::{CatalogueOptions, DirectiveCatalogue, Generator, GeneratorContext};
pub use faker_rs::LocaleKey;
pub use params::{Arg, Args, ParamKind};

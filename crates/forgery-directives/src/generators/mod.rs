//! Built-in generator library registered by `DirectiveCatalogue::new`.

pub mod datetime;
pub mod lorem;
pub mod person;
pub mod primitives;

use rand::{Rng, RngCore};

use crate::catalogue::DirectiveCatalogue;

pub fn register_builtin(catalogue: &mut DirectiveCatalogue) {
    primitives::register(catalogue);
    datetime::register(catalogue);
    person::register(catalogue);
    lorem::register(catalogue);
}

pub(crate) fn pick<'a>(values: &[&'a str], rng: &mut dyn RngCore) -> &'a str {
    if values.is_empty() {
        return "";
    }
    let idx = rng.random_range(0..values.len());
    values[idx]
}

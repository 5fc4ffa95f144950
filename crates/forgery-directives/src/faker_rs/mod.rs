//! Thin adapter over the `fake` crate for locale-aware values.

mod locales;

pub use locales::LocaleKey;

use fake::Fake;
use fake::faker::name::raw::{FirstName, LastName, Name};
use fake::locales::{EN, PT_BR, ZH_CN};
use rand::RngCore;

/// Part of a person name to generate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NamePart {
    Full,
    First,
    Last,
}

pub fn person_name(part: NamePart, locale: LocaleKey, rng: &mut dyn RngCore) -> String {
    match (part, locale) {
        (NamePart::Full, LocaleKey::EnUs) => Name(EN).fake_with_rng(rng),
        (NamePart::Full, LocaleKey::PtBr) => Name(PT_BR).fake_with_rng(rng),
        (NamePart::Full, LocaleKey::ZhCn) => {
            // zh_CN full names are written family name first without a space.
            let last: String = LastName(ZH_CN).fake_with_rng(rng);
            let first: String = FirstName(ZH_CN).fake_with_rng(rng);
            format!("{last}{first}")
        }
        (NamePart::First, LocaleKey::EnUs) => FirstName(EN).fake_with_rng(rng),
        (NamePart::First, LocaleKey::PtBr) => FirstName(PT_BR).fake_with_rng(rng),
        (NamePart::First, LocaleKey::ZhCn) => FirstName(ZH_CN).fake_with_rng(rng),
        (NamePart::Last, LocaleKey::EnUs) => LastName(EN).fake_with_rng(rng),
        (NamePart::Last, LocaleKey::PtBr) => LastName(PT_BR).fake_with_rng(rng),
        (NamePart::Last, LocaleKey::ZhCn) => LastName(ZH_CN).fake_with_rng(rng),
    }
}

use std::collections::BTreeMap;

use rand::RngCore;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use forgery_core::{DirectiveCall, Error, Result, ValueKind};

use crate::faker_rs::LocaleKey;
use crate::generators;
use crate::params::{Args, ParamKind, coerce_args};

const DEFAULT_MAX_REPEAT: u32 = 32;
const DEFAULT_STRING_MAX_LEN: usize = 32;
const DEFAULT_MAX_COUNT: usize = 10_000;

/// Options shared by every generator in a catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogueOptions {
    /// Locale used by locale-aware directives called without a locale.
    pub locale: LocaleKey,
    /// Repetition cap for unbounded regex quantifiers in `@regex`.
    pub max_repeat: u32,
    /// Upper length bound for `@string` without explicit bounds.
    pub string_max_len: usize,
    /// Largest length or count accepted by `@string`, `@words`,
    /// `@sentence` and `@paragraph`.
    pub max_count: usize,
}

impl Default for CatalogueOptions {
    fn default() -> Self {
        Self {
            locale: LocaleKey::EnUs,
            max_repeat: DEFAULT_MAX_REPEAT,
            string_max_len: DEFAULT_STRING_MAX_LEN,
            max_count: DEFAULT_MAX_COUNT,
        }
    }
}

/// Context handed to generators on validation and generation.
#[derive(Debug, Clone, Copy)]
pub struct GeneratorContext<'a> {
    pub options: &'a CatalogueOptions,
}

/// A directive implementation registered under a fixed name and signature.
pub trait Generator: Send + Sync {
    fn name(&self) -> &'static str;

    /// Ordered parameter kinds; the arity is `params().len()`.
    fn params(&self) -> &'static [ParamKind];

    /// Kind of every value this generator produces.
    fn output(&self) -> ValueKind;

    fn description(&self) -> &'static str {
        ""
    }

    /// Reject semantically invalid arguments before any generation happens.
    fn validate(&self, _args: &Args, _ctx: &GeneratorContext<'_>) -> Result<()> {
        Ok(())
    }

    fn generate(
        &self,
        args: &Args,
        ctx: &GeneratorContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<Value>;

    /// Human-readable signature such as `integer(int, int)`.
    fn signature(&self) -> String {
        let params = self
            .params()
            .iter()
            .map(|kind| kind.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        format!("{}({params}) -> {}", self.name(), self.output())
    }
}

/// Process-wide table of directives keyed by name and argument shape.
///
/// Read-only once built; share it behind an `Arc` across factories.
pub struct DirectiveCatalogue {
    options: CatalogueOptions,
    directives: BTreeMap<String, Vec<Box<dyn Generator>>>,
}

impl std::fmt::Debug for DirectiveCatalogue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectiveCatalogue")
            .field("options", &self.options)
            .field("directives", &self.len())
            .finish()
    }
}

impl Default for DirectiveCatalogue {
    fn default() -> Self {
        Self::new()
    }
}

impl DirectiveCatalogue {
    /// Catalogue with every built-in generator and default options.
    pub fn new() -> Self {
        Self::with_options(CatalogueOptions::default())
    }

    pub fn with_options(options: CatalogueOptions) -> Self {
        let mut catalogue = Self::empty(options);
        generators::register_builtin(&mut catalogue);
        debug!(directives = catalogue.len(), "directive catalogue built");
        catalogue
    }

    /// Catalogue without any generator registered.
    pub fn empty(options: CatalogueOptions) -> Self {
        Self {
            options,
            directives: BTreeMap::new(),
        }
    }

    pub fn options(&self) -> &CatalogueOptions {
        &self.options
    }

    /// Register a generator. An existing generator with the same name and
    /// parameter kinds is replaced and returned.
    pub fn register(&mut self, generator: Box<dyn Generator>) -> Option<Box<dyn Generator>> {
        let overloads = self
            .directives
            .entry(generator.name().to_string())
            .or_default();
        match overloads
            .iter()
            .position(|existing| existing.params() == generator.params())
        {
            Some(idx) => Some(std::mem::replace(&mut overloads[idx], generator)),
            None => {
                overloads.push(generator);
                None
            }
        }
    }

    /// Find the generator for `name` whose parameters fit `args`.
    ///
    /// Overloads of the same arity are tried by exact argument shape first,
    /// then by the first one the arguments can be coerced to.
    pub fn lookup(&self, name: &str, args: &[Value]) -> Result<&dyn Generator> {
        let not_found = || Error::DirectiveNotFound {
            name: name.to_string(),
            arity: args.len(),
        };
        let candidates: Vec<&dyn Generator> = self
            .directives
            .get(name)
            .ok_or_else(not_found)?
            .iter()
            .map(|generator| generator.as_ref())
            .filter(|generator| generator.params().len() == args.len())
            .collect();

        if let Some(exact) = candidates.iter().find(|generator| {
            generator
                .params()
                .iter()
                .zip(args)
                .all(|(kind, value)| kind.matches(value))
        }) {
            return Ok(*exact);
        }

        let mut first_error = None;
        for generator in &candidates {
            match coerce_args(name, generator.params(), args) {
                Ok(_) => return Ok(*generator),
                Err(err) => {
                    first_error.get_or_insert(err);
                }
            }
        }
        Err(first_error.unwrap_or_else(not_found))
    }

    pub fn contains(&self, name: &str, arity: usize) -> bool {
        self.directives.get(name).is_some_and(|overloads| {
            overloads
                .iter()
                .any(|generator| generator.params().len() == arity)
        })
    }

    /// Lookup, coerce and validate a call without generating a value.
    pub fn check(&self, call: &DirectiveCall) -> Result<()> {
        let generator = self.lookup(&call.name, &call.args)?;
        let args = coerce_args(&call.name, generator.params(), &call.args)?;
        generator.validate(&args, &self.context())
    }

    /// Produce a value for `call`.
    pub fn resolve(&self, call: &DirectiveCall, rng: &mut dyn RngCore) -> Result<Value> {
        let generator = self.lookup(&call.name, &call.args)?;
        let args = coerce_args(&call.name, generator.params(), &call.args)?;
        let ctx = self.context();
        generator.validate(&args, &ctx)?;
        generator.generate(&args, &ctx, rng)
    }

    /// Every registered generator, sorted by name then arity.
    pub fn directives(&self) -> Vec<&dyn Generator> {
        let mut all: Vec<&dyn Generator> = self
            .directives
            .values()
            .flat_map(|overloads| overloads.iter().map(|generator| generator.as_ref()))
            .collect();
        all.sort_by(|a, b| {
            a.name()
                .cmp(b.name())
                .then(a.params().len().cmp(&b.params().len()))
        });
        all
    }

    pub fn signatures(&self) -> Vec<String> {
        self.directives()
            .into_iter()
            .map(|generator| generator.signature())
            .collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.directives.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.directives.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    fn context(&self) -> GeneratorContext<'_> {
        GeneratorContext {
            options: &self.options,
        }
    }
}

use std::any::type_name;
use std::marker::PhantomData;
use std::sync::Arc;

use forgery_core::{Error, Result};
use forgery_directives::DirectiveCatalogue;
use rand::RngCore;
use rand::SeedableRng;
use rand::rngs::ThreadRng;
use rand_chacha::ChaCha8Rng;
use serde_json::Value;
use tracing::trace;

use crate::parser::{self, FieldRule, TypeBinding, ValueSpec};
use crate::schema::{Assignment, FieldKind, Instance, Mockable, SlotError};

/// Produces populated instances of `T` from a compiled rule set.
///
/// Cloning is cheap; clones share the binding and catalogue.
pub struct MockFactory<T> {
    binding: Arc<TypeBinding>,
    catalogue: Arc<DirectiveCatalogue>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for MockFactory<T> {
    fn clone(&self) -> Self {
        Self {
            binding: Arc::clone(&self.binding),
            catalogue: Arc::clone(&self.catalogue),
            _marker: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for MockFactory<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockFactory")
            .field("type_name", &self.binding.type_name())
            .field("rules", &self.binding.rules().len())
            .finish()
    }
}

impl<T: Mockable> MockFactory<T> {
    /// Compile `rules` for `T` without going through a registry.
    pub fn compile(rules: &Value, catalogue: Arc<DirectiveCatalogue>) -> Result<Self> {
        let schema = T::schema();
        if !schema.is_for::<T>() {
            return Err(Error::construction(
                type_name::<T>(),
                format!("schema describes '{}'", schema.type_name()),
            ));
        }
        let binding = parser::compile(schema, rules, &catalogue)?;
        check_literals(&binding, "")?;
        Ok(Self::from_binding(Arc::new(binding), catalogue))
    }

    pub(crate) fn from_binding(
        binding: Arc<TypeBinding>,
        catalogue: Arc<DirectiveCatalogue>,
    ) -> Self {
        Self {
            binding,
            catalogue,
            _marker: PhantomData,
        }
    }

    pub(crate) fn shared_binding(&self) -> &Arc<TypeBinding> {
        &self.binding
    }

    pub fn binding(&self) -> &TypeBinding {
        &self.binding
    }

    pub fn catalogue(&self) -> &DirectiveCatalogue {
        &self.catalogue
    }

    pub fn generate(&self) -> Result<T> {
        self.generate_with(&mut rand::rng())
    }

    pub fn generate_with(&self, rng: &mut dyn RngCore) -> Result<T> {
        let instance = build(&self.binding, &self.catalogue, rng, "")?;
        let value = instance
            .downcast::<T>()
            .map_err(|err| Error::construction(self.binding.type_name(), err.to_string()))?;
        trace!(type_name = self.binding.type_name(), "instance generated");
        Ok(value)
    }

    /// Same seed, same catalogue, same rules: same instance.
    pub fn generate_seeded(&self, seed: u64) -> Result<T> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.generate_with(&mut rng)
    }

    pub fn generate_many(&self, count: usize) -> Result<Vec<T>> {
        let mut rng = rand::rng();
        (0..count).map(|_| self.generate_with(&mut rng)).collect()
    }

    /// Endless stream of fresh instances.
    pub fn iter(&self) -> Instances<'_, T> {
        Instances {
            factory: self,
            rng: rand::rng(),
        }
    }
}

pub struct Instances<'a, T> {
    factory: &'a MockFactory<T>,
    rng: ThreadRng,
}

impl<T: Mockable> Iterator for Instances<'_, T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.factory.generate_with(&mut self.rng))
    }
}

fn join(scope: &str, segment: &str) -> String {
    if scope.is_empty() {
        segment.to_string()
    } else {
        format!("{scope}.{segment}")
    }
}

fn build(
    binding: &TypeBinding,
    catalogue: &DirectiveCatalogue,
    rng: &mut dyn RngCore,
    scope: &str,
) -> Result<Instance> {
    let mut instance = binding.schema().construct()?;
    for rule in binding.rules() {
        let path = join(scope, rule.segment());
        let assignment = assignment(rule, catalogue, rng, &path)?;
        write(&mut instance, rule, assignment, &path)?;
    }
    Ok(instance)
}

fn assignment(
    rule: &FieldRule,
    catalogue: &DirectiveCatalogue,
    rng: &mut dyn RngCore,
    path: &str,
) -> Result<Assignment> {
    match (rule.field().kind(), rule.value()) {
        (FieldKind::Value(_), spec) => resolve(spec, catalogue, rng, path).map(Assignment::Value),
        (FieldKind::Nested { .. }, ValueSpec::Nested(nested)) => {
            build(nested, catalogue, rng, path).map(Assignment::Object)
        }
        (FieldKind::Nested { optional: true, .. }, ValueSpec::Literal(Value::Null)) => {
            Ok(Assignment::Absent)
        }
        (FieldKind::NestedList { .. }, ValueSpec::Sequence(items)) => items
            .iter()
            .enumerate()
            .map(|(idx, item)| {
                let item_path = format!("{path}[{idx}]");
                match item {
                    ValueSpec::Nested(nested) => build(nested, catalogue, rng, &item_path),
                    _ => Err(Error::parse(item_path, "expected a nested rule set")),
                }
            })
            .collect::<Result<Vec<_>>>()
            .map(Assignment::Objects),
        _ => Err(Error::parse(path, "rule does not match the field kind")),
    }
}

fn resolve(
    spec: &ValueSpec,
    catalogue: &DirectiveCatalogue,
    rng: &mut dyn RngCore,
    path: &str,
) -> Result<Value> {
    match spec {
        ValueSpec::Literal(value) => Ok(value.clone()),
        ValueSpec::Directive(call) => catalogue.resolve(call, rng),
        ValueSpec::Sequence(items) => items
            .iter()
            .enumerate()
            .map(|(idx, item)| resolve(item, catalogue, rng, &format!("{path}[{idx}]")))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        ValueSpec::Nested(_) => {
            Err(Error::parse(path, "nested rule set where a value was expected"))
        }
    }
}

fn write(
    instance: &mut Instance,
    rule: &FieldRule,
    assignment: Assignment,
    path: &str,
) -> Result<()> {
    rule.field().assign(instance, assignment).map_err(|err| match err {
        SlotError::ReadOnly => Error::Assignment {
            type_name: instance.type_name().to_string(),
            field: rule.segment().to_string(),
        },
        SlotError::Coercion(source) => Error::coercion(path, source),
    })
}

/// Apply every literal rule to a scratch instance so a literal that cannot
/// fit its field is reported when the rules are registered.
fn check_literals(binding: &TypeBinding, scope: &str) -> Result<()> {
    let mut instance = binding.schema().construct()?;
    for rule in binding.rules() {
        let path = join(scope, rule.segment());
        match (rule.field().kind(), rule.value()) {
            (FieldKind::Value(_), spec) => {
                if let Some(value) = literal(spec) {
                    write(&mut instance, rule, Assignment::Value(value), &path)?;
                }
            }
            (_, ValueSpec::Nested(nested)) => check_literals(nested, &path)?,
            (_, ValueSpec::Sequence(items)) => {
                for (idx, item) in items.iter().enumerate() {
                    if let ValueSpec::Nested(nested) = item {
                        check_literals(nested, &format!("{path}[{idx}]"))?;
                    }
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn literal(spec: &ValueSpec) -> Option<Value> {
    match spec {
        ValueSpec::Literal(value) => Some(value.clone()),
        ValueSpec::Sequence(items) => items
            .iter()
            .map(literal)
            .collect::<Option<Vec<_>>>()
            .map(Value::Array),
        _ => None,
    }
}

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use forgery_core::Result;
use forgery_directives::DirectiveCatalogue;
use serde_json::Value;
use tracing::{info, warn};

use crate::factory::MockFactory;
use crate::parser::TypeBinding;
use crate::schema::Mockable;

/// Process-wide map from type to its compiled rules.
///
/// Registration is atomic per type: a rule set that fails to compile leaves
/// the previous factory for that type, if any, untouched.
#[derive(Debug)]
pub struct FactoryRegistry {
    catalogue: Arc<DirectiveCatalogue>,
    factories: RwLock<HashMap<TypeId, Arc<TypeBinding>>>,
}

impl Default for FactoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FactoryRegistry {
    pub fn new() -> Self {
        Self::with_catalogue(Arc::new(DirectiveCatalogue::new()))
    }

    pub fn with_catalogue(catalogue: Arc<DirectiveCatalogue>) -> Self {
        Self {
            catalogue,
            factories: RwLock::new(HashMap::new()),
        }
    }

    pub fn catalogue(&self) -> &Arc<DirectiveCatalogue> {
        &self.catalogue
    }

    /// Compile `rules` for `T` and make it the current factory for `T`.
    pub fn set<T: Mockable>(&self, rules: &Value) -> Result<MockFactory<T>> {
        let factory = match MockFactory::<T>::compile(rules, Arc::clone(&self.catalogue)) {
            Ok(factory) => factory,
            Err(err) => {
                warn!(
                    type_name = std::any::type_name::<T>(),
                    code = err.code(),
                    error = %err,
                    "rule set rejected"
                );
                return Err(err);
            }
        };

        let binding = Arc::clone(factory.shared_binding());
        let rule_count = binding.rules().len();
        let type_name = binding.type_name();
        let replaced = self
            .write()
            .insert(TypeId::of::<T>(), binding)
            .is_some();
        info!(type_name, rules = rule_count, replaced, "factory registered");
        Ok(factory)
    }

    pub fn get<T: Mockable>(&self) -> Option<MockFactory<T>> {
        let binding = self.read().get(&TypeId::of::<T>()).cloned()?;
        Some(MockFactory::from_binding(binding, Arc::clone(&self.catalogue)))
    }

    pub fn contains<T: Mockable>(&self) -> bool {
        self.read().contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Names of the registered types, sorted.
    pub fn type_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.read().values().map(|binding| binding.type_name()).collect();
        names.sort_unstable();
        names
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<TypeId, Arc<TypeBinding>>> {
        self.factories.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<TypeId, Arc<TypeBinding>>> {
        self.factories.write().unwrap_or_else(PoisonError::into_inner)
    }
}

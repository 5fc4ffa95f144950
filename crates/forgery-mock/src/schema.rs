use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use forgery_core::{CoercionError, Error, FromValue, Result, ValueKind, describe_value};
use serde_json::Value;

/// A type that factories can construct and populate.
///
/// The schema lists which fields rules may target and how each one is
/// written. It is built once per registration.
pub trait Mockable: Sized + Send + 'static {
    fn schema() -> ObjectSchema;
}

pub type SchemaFn = fn() -> ObjectSchema;

type SetResult = std::result::Result<(), CoercionError>;
type Setter = Arc<dyn Fn(&mut Instance, Assignment) -> SetResult + Send + Sync>;
type Constructor = Arc<dyn Fn() -> Instance + Send + Sync>;

/// A constructed object whose concrete type is only known to its schema.
pub struct Instance {
    type_name: &'static str,
    value: Box<dyn Any + Send>,
}

impl Instance {
    pub fn new<T: Send + 'static>(value: T) -> Self {
        Self {
            type_name: type_name::<T>(),
            value: Box::new(value),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn downcast<T: 'static>(self) -> std::result::Result<T, CoercionError> {
        let found = self.type_name;
        self.value
            .downcast::<T>()
            .map(|boxed| *boxed)
            .map_err(|_| CoercionError {
                expected: type_name::<T>().to_string(),
                found: found.to_string(),
            })
    }

    fn downcast_mut<T: 'static>(&mut self) -> std::result::Result<&mut T, CoercionError> {
        let found = self.type_name;
        self.value
            .downcast_mut::<T>()
            .ok_or_else(|| CoercionError {
                expected: type_name::<T>().to_string(),
                found: found.to_string(),
            })
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// What the engine hands to a field setter.
#[derive(Debug)]
pub enum Assignment {
    Value(Value),
    Object(Instance),
    Objects(Vec<Instance>),
    /// Clears an optional nested field.
    Absent,
}

impl Assignment {
    fn mismatch(&self, expected: &str) -> CoercionError {
        let found = match self {
            Assignment::Value(value) => describe_value(value),
            Assignment::Object(instance) => format!("object {}", instance.type_name()),
            Assignment::Objects(items) => format!("list of {} object(s)", items.len()),
            Assignment::Absent => "absent object".to_string(),
        };
        CoercionError {
            expected: expected.to_string(),
            found,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    /// A scalar or container populated from a JSON value.
    Value(ValueKind),
    /// Another `Mockable` type, possibly wrapped in `Option`.
    Nested { schema: SchemaFn, optional: bool },
    /// A `Vec` of another `Mockable` type.
    NestedList { schema: SchemaFn },
}

/// Why a field write failed.
#[derive(Debug)]
pub enum SlotError {
    ReadOnly,
    Coercion(CoercionError),
}

#[derive(Clone)]
pub struct FieldDescriptor {
    name: &'static str,
    kind: FieldKind,
    setter: Option<Setter>,
}

impl FieldDescriptor {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn is_assignable(&self) -> bool {
        self.setter.is_some()
    }

    pub fn assign(
        &self,
        target: &mut Instance,
        assignment: Assignment,
    ) -> std::result::Result<(), SlotError> {
        let setter = self.setter.as_ref().ok_or(SlotError::ReadOnly)?;
        setter(target, assignment).map_err(SlotError::Coercion)
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("assignable", &self.is_assignable())
            .finish()
    }
}

/// Type-erased description of a `Mockable` type.
#[derive(Clone)]
pub struct ObjectSchema {
    type_id: TypeId,
    type_name: &'static str,
    constructor: Option<Constructor>,
    fields: Vec<FieldDescriptor>,
}

impl ObjectSchema {
    pub fn builder<T: Send + 'static>(type_name: &'static str) -> SchemaBuilder<T> {
        SchemaBuilder {
            schema: ObjectSchema {
                type_id: TypeId::of::<T>(),
                type_name,
                constructor: None,
                fields: Vec::new(),
            },
            _marker: PhantomData,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn is_for<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn has_constructor(&self) -> bool {
        self.constructor.is_some()
    }

    pub fn construct(&self) -> Result<Instance> {
        let constructor = self
            .constructor
            .as_ref()
            .ok_or_else(|| Error::construction(self.type_name, "no constructor registered"))?;
        Ok(constructor())
    }

    /// First field name declared more than once, if any.
    pub fn duplicate_field(&self) -> Option<&'static str> {
        self.fields.iter().enumerate().find_map(|(idx, field)| {
            self.fields[..idx]
                .iter()
                .any(|earlier| earlier.name == field.name)
                .then_some(field.name)
        })
    }
}

impl fmt::Debug for ObjectSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectSchema")
            .field("type_name", &self.type_name)
            .field("constructible", &self.has_constructor())
            .field("fields", &self.fields)
            .finish()
    }
}

/// Declares the fields of `T` that rules may target.
pub struct SchemaBuilder<T> {
    schema: ObjectSchema,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Send + 'static> SchemaBuilder<T> {
    pub fn constructor(mut self, constructor: fn() -> T) -> Self {
        self.schema.constructor = Some(Arc::new(move || Instance::new(constructor())));
        self
    }

    pub fn default_constructor(self) -> Self
    where
        T: Default,
    {
        self.constructor(T::default)
    }

    /// A value field written through `access` after coercion to `F`.
    pub fn field<F, A>(self, name: &'static str, access: A) -> Self
    where
        F: FromValue + 'static,
        A: Fn(&mut T) -> &mut F + Send + Sync + 'static,
    {
        let setter = erase(move |target: &mut T, assignment| match assignment {
            Assignment::Value(value) => {
                *access(target) = F::from_value(value)?;
                Ok(())
            }
            other => Err(other.mismatch(F::kind().as_str())),
        });
        self.push(name, FieldKind::Value(F::kind()), Some(setter))
    }

    pub fn nested<N, A>(self, name: &'static str, access: A) -> Self
    where
        N: Mockable,
        A: Fn(&mut T) -> &mut N + Send + Sync + 'static,
    {
        let setter = erase(move |target: &mut T, assignment| match assignment {
            Assignment::Object(instance) => {
                *access(target) = instance.downcast::<N>()?;
                Ok(())
            }
            other => Err(other.mismatch(type_name::<N>())),
        });
        let kind = FieldKind::Nested {
            schema: N::schema,
            optional: false,
        };
        self.push(name, kind, Some(setter))
    }

    pub fn nested_option<N, A>(self, name: &'static str, access: A) -> Self
    where
        N: Mockable,
        A: Fn(&mut T) -> &mut Option<N> + Send + Sync + 'static,
    {
        let setter = erase(move |target: &mut T, assignment| match assignment {
            Assignment::Object(instance) => {
                *access(target) = Some(instance.downcast::<N>()?);
                Ok(())
            }
            Assignment::Absent => {
                *access(target) = None;
                Ok(())
            }
            other => Err(other.mismatch(type_name::<Option<N>>())),
        });
        let kind = FieldKind::Nested {
            schema: N::schema,
            optional: true,
        };
        self.push(name, kind, Some(setter))
    }

    pub fn nested_list<N, A>(self, name: &'static str, access: A) -> Self
    where
        N: Mockable,
        A: Fn(&mut T) -> &mut Vec<N> + Send + Sync + 'static,
    {
        let setter = erase(move |target: &mut T, assignment| match assignment {
            Assignment::Objects(items) => {
                *access(target) = items
                    .into_iter()
                    .map(Instance::downcast::<N>)
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(())
            }
            other => Err(other.mismatch(type_name::<Vec<N>>())),
        });
        self.push(name, FieldKind::NestedList { schema: N::schema }, Some(setter))
    }

    /// A field visible to rules but without a mutator.
    pub fn read_only(self, name: &'static str, kind: ValueKind) -> Self {
        self.push(name, FieldKind::Value(kind), None)
    }

    pub fn build(self) -> ObjectSchema {
        self.schema
    }

    fn push(mut self, name: &'static str, kind: FieldKind, setter: Option<Setter>) -> Self {
        self.schema.fields.push(FieldDescriptor { name, kind, setter });
        self
    }
}

/// Wrap a typed setter so it can be stored on a type-erased schema.
fn erase<T, S>(set: S) -> Setter
where
    T: 'static,
    S: Fn(&mut T, Assignment) -> SetResult + Send + Sync + 'static,
{
    Arc::new(move |target: &mut Instance, assignment: Assignment| -> SetResult {
        set(target.downcast_mut::<T>()?, assignment)
    })
}

//! Compiles a rule mapping against an [`ObjectSchema`].
//!
//! Dotted keys (`"address.city"`) are first folded into a path tree so that a
//! mapping value and dotted keys targeting the same nested field combine.
//! When both name the same leaf, the deeper (dotted) rule wins.

use std::sync::Arc;

use forgery_core::{DirectiveCall, Error, Result, describe_value};
use forgery_directives::DirectiveCatalogue;
use serde_json::{Map, Value};
use tracing::debug;

use crate::schema::{FieldDescriptor, FieldKind, ObjectSchema};

/// Compiled rules for one type: which fields to write and how.
#[derive(Debug, Clone)]
pub struct TypeBinding {
    schema: Arc<ObjectSchema>,
    rules: Vec<FieldRule>,
}

impl TypeBinding {
    pub fn schema(&self) -> &ObjectSchema {
        &self.schema
    }

    pub fn type_name(&self) -> &'static str {
        self.schema.type_name()
    }

    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    pub fn rule(&self, segment: &str) -> Option<&FieldRule> {
        self.rules.iter().find(|rule| rule.segment == segment)
    }
}

#[derive(Debug, Clone)]
pub struct FieldRule {
    segment: String,
    field: FieldDescriptor,
    value: ValueSpec,
}

impl FieldRule {
    pub fn segment(&self) -> &str {
        &self.segment
    }

    pub fn field(&self) -> &FieldDescriptor {
        &self.field
    }

    pub fn value(&self) -> &ValueSpec {
        &self.value
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValueSpec {
    /// Assigned as-is (after coercion) on every instance.
    Literal(Value),
    /// Resolved through the catalogue on every instance.
    Directive(DirectiveCall),
    /// A nested object built from its own rules.
    Nested(TypeBinding),
    /// Element-wise; yields a list.
    Sequence(Vec<ValueSpec>),
}

impl PartialEq for TypeBinding {
    fn eq(&self, other: &Self) -> bool {
        self.schema.type_id() == other.schema.type_id() && self.rules == other.rules
    }
}

impl PartialEq for FieldRule {
    fn eq(&self, other: &Self) -> bool {
        self.segment == other.segment && self.value == other.value
    }
}

/// Compile `rules` for the type described by `schema`.
///
/// Every directive is checked against `catalogue` here, so a binding that
/// compiles only fails at generation time if a generated value cannot be
/// coerced into its field.
pub fn compile(
    schema: ObjectSchema,
    rules: &Value,
    catalogue: &DirectiveCatalogue,
) -> Result<TypeBinding> {
    let map = rules.as_object().ok_or_else(|| {
        Error::parse(
            ROOT,
            format!("rule set must be a mapping, found {}", describe_value(rules)),
        )
    })?;
    let tree = PathTree::from_map(map, "")?;
    Compiler { catalogue }.binding(Arc::new(schema), tree, "")
}

const ROOT: &str = "$";

fn join(scope: &str, segment: &str) -> String {
    if scope.is_empty() {
        segment.to_string()
    } else {
        format!("{scope}.{segment}")
    }
}

#[derive(Debug, Default)]
struct PathTree {
    entries: Vec<(String, PathNode)>,
}

#[derive(Debug, Default)]
struct PathNode {
    direct: Option<Value>,
    children: PathTree,
}

impl PathTree {
    fn from_map(map: &Map<String, Value>, scope: &str) -> Result<Self> {
        let mut tree = PathTree::default();
        for (path, value) in map {
            tree.insert(scope, path, value.clone())?;
        }
        Ok(tree)
    }

    fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, scope: &str, path: &str, value: Value) -> Result<()> {
        let segments: Vec<&str> = path.split('.').collect();
        if segments.iter().any(|segment| segment.is_empty()) {
            let at = if path.is_empty() { ROOT.to_string() } else { join(scope, path) };
            return Err(Error::parse(at, "empty path segment"));
        }
        let Some((last, parents)) = segments.split_last() else {
            return Err(Error::parse(join(scope, path), "empty path"));
        };

        let mut tree = self;
        for segment in parents {
            tree = &mut tree.node_mut(segment).children;
        }
        if tree.node_mut(last).direct.replace(value).is_some() {
            debug!(path = %join(scope, path), "later rule replaces an earlier one");
        }
        Ok(())
    }

    fn node_mut(&mut self, segment: &str) -> &mut PathNode {
        let idx = match self.entries.iter().position(|(name, _)| name == segment) {
            Some(idx) => idx,
            None => {
                self.entries.push((segment.to_string(), PathNode::default()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[idx].1
    }

    /// Overlay `top` onto this tree; `top` wins where both set a value.
    fn merge(&mut self, top: PathTree) {
        for (segment, node) in top.entries {
            let target = self.node_mut(&segment);
            if node.direct.is_some() {
                target.direct = node.direct;
            }
            target.children.merge(node.children);
        }
    }
}

struct Compiler<'a> {
    catalogue: &'a DirectiveCatalogue,
}

impl Compiler<'_> {
    fn binding(
        &self,
        schema: Arc<ObjectSchema>,
        tree: PathTree,
        scope: &str,
    ) -> Result<TypeBinding> {
        let type_name = schema.type_name();
        if let Some(name) = schema.duplicate_field() {
            let at = if scope.is_empty() { ROOT } else { scope };
            return Err(Error::parse(
                at,
                format!("'{type_name}' declares field '{name}' more than once"),
            ));
        }
        if !schema.has_constructor() {
            return Err(Error::construction(type_name, "no constructor registered"));
        }

        let mut rules = Vec::with_capacity(tree.entries.len());
        for (segment, node) in tree.entries {
            let path = join(scope, &segment);
            let field = schema.field(&segment).ok_or_else(|| {
                Error::parse(&path, format!("'{type_name}' has no field '{segment}'"))
            })?;
            if !field.is_assignable() {
                return Err(Error::Assignment {
                    type_name: type_name.to_string(),
                    field: segment,
                });
            }
            let value = self.field_value(field, node, &path)?;
            rules.push(FieldRule {
                segment,
                field: field.clone(),
                value,
            });
        }

        Ok(TypeBinding { schema, rules })
    }

    fn field_value(
        &self,
        field: &FieldDescriptor,
        node: PathNode,
        path: &str,
    ) -> Result<ValueSpec> {
        match field.kind() {
            FieldKind::Value(_) => {
                if !node.children.is_empty() {
                    return Err(Error::parse(path, "not a nested type, cannot descend into it"));
                }
                let raw = node.direct.ok_or_else(|| Error::parse(path, "missing value"))?;
                self.classify(raw, path)
            }
            FieldKind::Nested { schema, optional } => {
                let mut tree = PathTree::default();
                match node.direct {
                    None => {}
                    Some(Value::Object(map)) => tree = PathTree::from_map(&map, path)?,
                    Some(Value::Null) if optional && node.children.is_empty() => {
                        return Ok(ValueSpec::Literal(Value::Null));
                    }
                    Some(other) if !node.children.is_empty() => {
                        debug!(
                            path,
                            discarded = %describe_value(&other),
                            "deeper rules replace a non-mapping value"
                        );
                    }
                    Some(other) => {
                        let expected = if optional { "a mapping or null" } else { "a mapping" };
                        let found = describe_value(&other);
                        return Err(Error::parse(
                            path,
                            format!("nested field expects {expected}, found {found}"),
                        ));
                    }
                }
                tree.merge(node.children);
                self.binding(Arc::new(schema()), tree, path)
                    .map(ValueSpec::Nested)
            }
            FieldKind::NestedList { schema } => {
                if !node.children.is_empty() {
                    return Err(Error::parse(path, "cannot descend into a list field"));
                }
                let items = match node.direct {
                    Some(Value::Array(items)) => items,
                    Some(other) => {
                        let found = describe_value(&other);
                        return Err(Error::parse(
                            path,
                            format!("list field expects an array of mappings, found {found}"),
                        ));
                    }
                    None => return Err(Error::parse(path, "missing value")),
                };
                let nested = Arc::new(schema());
                items
                    .into_iter()
                    .enumerate()
                    .map(|(idx, item)| {
                        let item_path = format!("{path}[{idx}]");
                        match item {
                            Value::Object(map) => {
                                let tree = PathTree::from_map(&map, &item_path)?;
                                self.binding(Arc::clone(&nested), tree, &item_path)
                                    .map(ValueSpec::Nested)
                            }
                            other => Err(Error::parse(
                                &item_path,
                                format!("expected a mapping, found {}", describe_value(&other)),
                            )),
                        }
                    })
                    .collect::<Result<Vec<_>>>()
                    .map(ValueSpec::Sequence)
            }
        }
    }

    fn classify(&self, raw: Value, path: &str) -> Result<ValueSpec> {
        match raw {
            Value::String(text) if DirectiveCall::is_directive(&text) => {
                let call = DirectiveCall::parse(&text).map_err(|err| match err {
                    Error::Parse { message, .. } => Error::parse(path, message),
                    other => other,
                })?;
                self.catalogue.check(&call)?;
                Ok(ValueSpec::Directive(call))
            }
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(idx, item)| self.classify(item, &format!("{path}[{idx}]")))
                .collect::<Result<Vec<_>>>()
                .map(ValueSpec::Sequence),
            other => Ok(ValueSpec::Literal(other)),
        }
    }
}

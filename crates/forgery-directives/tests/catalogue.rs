use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde_json::{Value, json};

use forgery_core::{DirectiveCall, Error, Result, ValueKind};
use forgery_directives::{
    Args, CatalogueOptions, DirectiveCatalogue, Generator, GeneratorContext, ParamKind,
};

fn call(source: &str) -> DirectiveCall {
    DirectiveCall::parse(source).expect("valid directive syntax")
}

struct ConstantGenerator {
    value: i64,
}

impl Generator for ConstantGenerator {
    fn name(&self) -> &'static str {
        "constant"
    }

    fn params(&self) -> &'static [ParamKind] {
        &[]
    }

    fn output(&self) -> ValueKind {
        ValueKind::Int
    }

    fn generate(
        &self,
        _args: &Args,
        _ctx: &GeneratorContext<'_>,
        _rng: &mut dyn RngCore,
    ) -> Result<Value> {
        Ok(json!(self.value))
    }
}

#[test]
fn signatures_are_sorted_and_unique() {
    let catalogue = DirectiveCatalogue::new();
    let signatures = catalogue.signatures();
    assert!(!signatures.is_empty());
    assert_eq!(signatures.len(), catalogue.len());

    let mut deduped = signatures.clone();
    deduped.dedup();
    assert_eq!(signatures, deduped);

    let names: Vec<&str> = catalogue.directives().iter().map(|g| g.name()).collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
}

#[test]
fn unknown_directive_is_always_not_found() {
    let catalogue = DirectiveCatalogue::new();
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    for _ in 0..3 {
        let result = catalogue.resolve(&call("@doesNotExist(1)"), &mut rng);
        assert_eq!(
            result,
            Err(Error::DirectiveNotFound {
                name: "doesNotExist".to_string(),
                arity: 1,
            })
        );
    }
}

#[test]
fn known_name_with_unknown_arity_is_not_found() {
    let catalogue = DirectiveCatalogue::new();
    assert!(catalogue.contains("uuid", 0));
    assert!(!catalogue.contains("uuid", 2));
    let result = catalogue.check(&call("@uuid(1, 2)"));
    assert!(matches!(
        result,
        Err(Error::DirectiveNotFound { ref name, arity: 2 }) if name == "uuid"
    ));
}

#[test]
fn overloads_are_chosen_by_argument_shape() {
    let catalogue = DirectiveCatalogue::new();
    let by_ints = catalogue
        .lookup("string", &[json!(2), json!(4)])
        .expect("string(int, int)");
    assert_eq!(by_ints.params(), &[ParamKind::Int, ParamKind::Int]);

    let by_pool = catalogue
        .lookup("string", &[json!("ab"), json!(4)])
        .expect("string(text, int)");
    assert_eq!(by_pool.params(), &[ParamKind::Text, ParamKind::Int]);
}

#[test]
fn numeric_strings_are_coerced_for_int_params() {
    let catalogue = DirectiveCatalogue::new();
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let value = catalogue
        .resolve(&DirectiveCall::new("integer", vec![json!("5"), json!("5")]), &mut rng)
        .expect("coerced integer");
    assert_eq!(value, json!(5));
}

#[test]
fn uncoercible_arguments_fail_with_coercion_error() {
    let catalogue = DirectiveCatalogue::new();
    let result = catalogue.check(&call("@integer(\"low\", \"high\")"));
    assert!(matches!(result, Err(Error::Coercion { .. })), "{result:?}");
}

#[test]
fn semantically_invalid_arguments_are_rejected_by_check() {
    let catalogue = DirectiveCatalogue::new();
    for source in [
        "@integer(10, 1)",
        "@boolean(1.5)",
        "@regex(\"(\")",
        "@name(\"xx_XX\")",
        "@date(\"2024-02-01\", \"2024-01-01\")",
        "@float(0, 1, 99)",
        "@string(\"\", 3)",
    ] {
        let result = catalogue.check(&call(source));
        assert!(
            matches!(result, Err(Error::InvalidArgument { .. })),
            "expected invalid argument for {source}, got {result:?}"
        );
    }
}

#[test]
fn register_replaces_same_signature() {
    let mut catalogue = DirectiveCatalogue::empty(CatalogueOptions::default());
    assert!(catalogue.is_empty());
    assert!(catalogue.register(Box::new(ConstantGenerator { value: 1 })).is_none());
    let replaced = catalogue.register(Box::new(ConstantGenerator { value: 2 }));
    assert!(replaced.is_some());
    assert_eq!(catalogue.len(), 1);

    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let value = catalogue
        .resolve(&call("@constant"), &mut rng)
        .expect("custom directive");
    assert_eq!(value, json!(2));
}

#[test]
fn every_directive_output_matches_its_declared_kind() {
    let catalogue = DirectiveCatalogue::new();
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let sample_args = |generator: &dyn Generator| -> Vec<Value> {
        let name = generator.name();
        generator
            .params()
            .iter()
            .enumerate()
            .map(|(idx, kind)| match (name, kind) {
                ("date", ParamKind::Text) if generator.params().len() == 2 => {
                    if idx == 0 { json!("2020-01-01") } else { json!("2020-12-31") }
                }
                ("time", ParamKind::Text) => json!("%H"),
                (_, ParamKind::Text) if matches!(name, "date" | "datetime") => {
                    json!("%Y")
                }
                ("name" | "firstName" | "lastName", ParamKind::Text) => json!("pt_BR"),
                ("regex", ParamKind::Text) => json!("[a-z]{3}"),
                (_, ParamKind::Text) => json!("xyz"),
                (_, ParamKind::Int) => json!(2 + idx as i64),
                (_, ParamKind::Float) => json!(idx as f64 * 0.25),
                (_, ParamKind::Bool) => json!(true),
            })
            .collect()
    };

    for generator in catalogue.directives() {
        let args = sample_args(generator);
        let call = DirectiveCall::new(generator.name(), args);
        for _ in 0..5 {
            let value = catalogue
                .resolve(&call, &mut rng)
                .unwrap_or_else(|err| panic!("{} failed: {err}", generator.signature()));
            assert!(
                generator.output().accepts(&value),
                "{} produced {value}",
                generator.signature()
            );
        }
    }
}

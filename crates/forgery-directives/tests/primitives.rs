use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde_json::json;

use forgery_core::DirectiveCall;
use forgery_directives::{CatalogueOptions, DirectiveCatalogue};

fn resolve_many(
    catalogue: &DirectiveCatalogue,
    source: &str,
    count: usize,
) -> Vec<serde_json::Value> {
    let call = DirectiveCall::parse(source).expect("valid directive syntax");
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    (0..count)
        .map(|_| catalogue.resolve(&call, &mut rng).expect("resolvable directive"))
        .collect()
}

#[test]
fn integer_respects_inclusive_bounds() {
    let catalogue = DirectiveCatalogue::new();
    for value in resolve_many(&catalogue, "@integer(-3, 3)", 200) {
        let value = value.as_i64().expect("integer output");
        assert!((-3..=3).contains(&value));
    }
    for value in resolve_many(&catalogue, "@integer(4)", 50) {
        let value = value.as_i64().expect("integer output");
        assert!((0..=4).contains(&value));
    }
}

#[test]
fn float_scale_rounds_output() {
    let catalogue = DirectiveCatalogue::new();
    for value in resolve_many(&catalogue, "@float(1, 2, 2)", 100) {
        let value = value.as_f64().expect("float output");
        assert!((1.0..=2.0).contains(&value));
        assert!(((value * 100.0).round() - value * 100.0).abs() < 1e-6);
    }
}

#[test]
fn boolean_probability_extremes_are_constant() {
    let catalogue = DirectiveCatalogue::new();
    assert!(resolve_many(&catalogue, "@boolean(1)", 20).iter().all(|v| v == &json!(true)));
    assert!(resolve_many(&catalogue, "@boolean(0)", 20).iter().all(|v| v == &json!(false)));
}

#[test]
fn string_lengths_and_pools() {
    let catalogue = DirectiveCatalogue::new();
    for value in resolve_many(&catalogue, "@string(6)", 10) {
        assert_eq!(value.as_str().map(|s| s.chars().count()), Some(6));
    }
    for value in resolve_many(&catalogue, "@string(2, 4)", 50) {
        let len = value.as_str().map(|s| s.chars().count()).unwrap_or(0);
        assert!((2..=4).contains(&len));
    }
    for value in resolve_many(&catalogue, "@string(\"ab\", 8)", 10) {
        let text = value.as_str().expect("text output");
        assert_eq!(text.len(), 8);
        assert!(text.chars().all(|ch| ch == 'a' || ch == 'b'));
    }
}

#[test]
fn string_default_length_follows_options() {
    let options = CatalogueOptions {
        string_max_len: 3,
        ..CatalogueOptions::default()
    };
    let catalogue = DirectiveCatalogue::with_options(options);
    for value in resolve_many(&catalogue, "@string", 50) {
        let len = value.as_str().map(|s| s.len()).unwrap_or(0);
        assert!((1..=3).contains(&len));
    }
}

#[test]
fn pick_returns_one_of_the_arguments() {
    let catalogue = DirectiveCatalogue::new();
    let allowed = [json!("red"), json!("green"), json!("blue")];
    for value in resolve_many(&catalogue, "@pick(\"red\", \"green\", \"blue\")", 30) {
        assert!(allowed.contains(&value));
    }
}

#[test]
fn regex_output_matches_pattern() {
    let catalogue = DirectiveCatalogue::new();
    for value in resolve_many(&catalogue, "@regex(\"[A-Z]{2}-[0-9]{3}\")", 20) {
        let text = value.as_str().expect("text output");
        assert_eq!(text.len(), 6);
        assert_eq!(&text[2..3], "-");
        assert!(text[..2].chars().all(|ch| ch.is_ascii_uppercase()));
        assert!(text[3..].chars().all(|ch| ch.is_ascii_digit()));
    }
}

#[test]
fn date_range_and_format() {
    let catalogue = DirectiveCatalogue::new();
    for value in resolve_many(&catalogue, "@date(\"2024-01-01\", \"2024-01-03\")", 30) {
        let text = value.as_str().expect("date output");
        assert!(["2024-01-01", "2024-01-02", "2024-01-03"].contains(&text));
    }
    for value in resolve_many(&catalogue, "@date(\"%Y\")", 10) {
        let year: i32 = value
            .as_str()
            .and_then(|text| text.parse().ok())
            .expect("four digit year");
        assert!((2000..=2030).contains(&year));
    }
}

#[test]
fn seeded_resolution_is_deterministic() {
    let catalogue = DirectiveCatalogue::new();
    assert_eq!(
        resolve_many(&catalogue, "@uuid", 5),
        resolve_many(&catalogue, "@uuid", 5)
    );
}

fn check_code(catalogue: &DirectiveCatalogue, source: &str) -> &'static str {
    let call = DirectiveCall::parse(source).expect("valid directive syntax");
    match catalogue.check(&call) {
        Ok(()) => "ok",
        Err(err) => err.code(),
    }
}

#[test]
fn float_bounds_must_be_finite_and_representable() {
    let catalogue = DirectiveCatalogue::new();
    for source in [
        "@float(\"inf\", \"inf\")",
        "@float(\"-inf\", 1)",
        "@float(0, \"NaN\")",
        "@float(-1e308, 1e308)",
        "@float(-1e308, 1e308, 2)",
    ] {
        assert_eq!(check_code(&catalogue, source), "invalid_argument", "{source}");
    }
    assert_eq!(check_code(&catalogue, "@float(-1e300, 1e300)"), "ok");
    for value in resolve_many(&catalogue, "@float(-1e300, 1e300)", 20) {
        assert!(value.as_f64().is_some_and(f64::is_finite));
    }
}

#[test]
fn lengths_and_counts_are_capped() {
    let catalogue = DirectiveCatalogue::new();
    for source in [
        "@string(100000000000)",
        "@string(1, 100000000000)",
        "@string(\"ab\", 100000000000)",
        "@words(100000000000)",
        "@sentence(1, 100000000000)",
        "@paragraph(1, 100000000000)",
    ] {
        assert_eq!(check_code(&catalogue, source), "invalid_argument", "{source}");
    }
    assert_eq!(check_code(&catalogue, "@string(10000)"), "ok");

    let strict = DirectiveCatalogue::with_options(CatalogueOptions {
        max_count: 4,
        ..CatalogueOptions::default()
    });
    assert_eq!(check_code(&strict, "@string(5)"), "invalid_argument");
    assert_eq!(check_code(&strict, "@words(4)"), "ok");
    for value in resolve_many(&strict, "@string", 20) {
        assert!(value.as_str().is_some_and(|s| (1..=4).contains(&s.len())));
    }
}

#[test]
fn datetime_formats_that_do_not_apply_are_rejected_at_check() {
    let catalogue = DirectiveCatalogue::new();
    assert_eq!(check_code(&catalogue, "@datetime(\"%z\")"), "invalid_argument");
    assert_eq!(check_code(&catalogue, "@datetime(\"%Y %H\")"), "ok");
}

mod common;

use std::collections::HashSet;

use chrono::NaiveDate;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde_json::json;

use common::{Address, Pet, User, init_tracing};
use forgery_mock::{FactoryRegistry, MockFactory};

fn factory(rules: serde_json::Value) -> MockFactory<User> {
    init_tracing();
    FactoryRegistry::new().set::<User>(&rules).expect("rules compile")
}

#[test]
fn literals_are_assigned_on_every_instance() {
    let factory = factory(json!({
        "name": "Ada",
        "age": 36,
        "score": 4,
        "active": true,
        "joined": "2021-03-04",
        "attributes": { "team": "core", "level": 3 },
    }));

    for user in factory.generate_many(5).unwrap() {
        assert_eq!(user.name, "Ada");
        assert_eq!(user.age, 36);
        assert_eq!(user.score, 4.0);
        assert!(user.active);
        assert_eq!(user.joined, NaiveDate::from_ymd_opt(2021, 3, 4));
        assert_eq!(user.attributes.get("team").map(String::as_str), Some("core"));
        assert_eq!(user.attributes.get("level").map(String::as_str), Some("3"));
    }
}

#[test]
fn directives_respect_their_declared_range() {
    let factory = factory(json!({
        "age": "@integer(18, 60)",
        "score": "@float(0, 1, 2)",
        "email": "@email",
        "name": "@cname",
        "joined": "@date(\"2020-01-01\", \"2020-12-31\")",
    }));

    let mut ages = HashSet::new();
    for user in factory.iter().take(50) {
        let user = user.unwrap();
        assert!((18..=60).contains(&user.age));
        assert!((0.0..=1.0).contains(&user.score));
        assert!(user.email.contains('@'));
        assert!(!user.name.is_empty());
        let joined = user.joined.expect("date assigned");
        assert!(joined >= NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        assert!(joined <= NaiveDate::from_ymd_opt(2020, 12, 31).unwrap());
        ages.insert(user.age);
    }
    assert!(ages.len() > 1, "directives should vary between instances");
}

#[test]
fn dotted_path_constructs_intermediate_objects() {
    let factory = factory(json!({ "address.city": "x" }));
    let user = factory.generate().unwrap();

    assert_eq!(user.address.city, "x");
    assert_eq!(user.address.zip, "");
    assert_eq!(user.address.geo, Default::default());
}

#[test]
fn deep_paths_and_nested_mappings_reach_the_same_field() {
    let dotted = factory(json!({ "address.geo.lat": 1.5 })).generate().unwrap();
    let nested = factory(json!({ "address": { "geo": { "lat": 1.5 } } })).generate().unwrap();
    let mixed = factory(json!({ "address": { "geo.lat": 1.5 } })).generate().unwrap();

    assert_eq!(dotted.address.geo.lat, 1.5);
    assert_eq!(dotted, nested);
    assert_eq!(dotted, mixed);
}

#[test]
fn unmentioned_fields_keep_constructor_defaults() {
    let user = factory(json!({ "name": "Ada" })).generate().unwrap();
    let defaults = User::default();

    assert_eq!(user.id, defaults.id);
    assert_eq!(user.nickname, "anon");
    assert_eq!(user.billing, defaults.billing);
    assert!(user.pets.is_empty());
}

#[test]
fn sequences_keep_their_order() {
    let factory = factory(json!({ "lucky": [1, 2, 3] }));
    for _ in 0..5 {
        assert_eq!(factory.generate().unwrap().lucky, vec![1, 2, 3]);
    }
}

#[test]
fn sequences_mix_literals_and_directives() {
    let factory = factory(json!({ "tags": ["fixed", "@word", "@integer(1, 9)"] }));
    let user = factory.generate().unwrap();

    assert_eq!(user.tags.len(), 3);
    assert_eq!(user.tags[0], "fixed");
    assert!(!user.tags[1].is_empty());
    let number: i64 = user.tags[2].parse().unwrap();
    assert!((1..=9).contains(&number));
}

#[test]
fn nested_lists_build_one_object_per_mapping() {
    let factory = factory(json!({
        "pets": [
            { "name": "Rex", "species": "dog" },
            { "name": "@firstName" },
        ]
    }));
    let user = factory.generate().unwrap();

    assert_eq!(user.pets.len(), 2);
    assert_eq!(user.pets[0], Pet { name: "Rex".into(), species: "dog".into() });
    assert!(!user.pets[1].name.is_empty());
    assert_eq!(user.pets[1].species, "cat");
}

#[test]
fn optional_nested_fields_accept_null_and_mappings() {
    let cleared = factory(json!({ "billing": null })).generate().unwrap();
    assert_eq!(cleared.billing, None);

    let filled = factory(json!({ "billing.zip": "01000" })).generate().unwrap();
    let billing = filled.billing.expect("billing built");
    assert_eq!(billing.zip, "01000");
    assert_eq!(billing.city, "", "built from a fresh Address, not the previous value");
}

#[test]
fn instances_share_no_state() {
    let factory = factory(json!({
        "tags": ["a", "b"],
        "attributes": { "k": "v" },
        "address.city": "x",
        "pets": [{ "name": "Rex" }],
    }));
    let mut first = factory.generate().unwrap();
    let second = factory.generate().unwrap();

    first.tags.push("c".into());
    first.attributes.insert("k".into(), "changed".into());
    first.address.city.push('!');
    first.pets[0].name.clear();

    assert_eq!(second.tags, vec!["a", "b"]);
    assert_eq!(second.attributes.get("k").map(String::as_str), Some("v"));
    assert_eq!(second.address, Address { city: "x".into(), ..Address::default() });
    assert_eq!(second.pets[0].name, "Rex");
    assert_eq!(factory.generate().unwrap().tags, vec!["a", "b"]);
}

#[test]
fn seeded_generation_is_reproducible() {
    let factory = factory(json!({
        "name": "@name",
        "age": "@age",
        "tags": ["@word", "@word"],
        "address.city": "@city",
    }));

    let a = factory.generate_seeded(42).unwrap();
    let b = factory.generate_seeded(42).unwrap();
    assert_eq!(a, b);

    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let c = factory.generate_with(&mut rng).unwrap();
    assert_eq!(a, c);
}

#[test]
fn factories_compile_without_a_registry() {
    let registry = FactoryRegistry::new();
    let rules = json!({ "name": "Tom" });
    let factory = MockFactory::<Pet>::compile(&rules, registry.catalogue().clone()).unwrap();

    assert_eq!(factory.generate().unwrap().name, "Tom");
    assert!(registry.get::<Pet>().is_none());
}

#[test]
fn generate_many_returns_the_requested_count() {
    let factory = factory(json!({ "name": "@firstName" }));
    assert_eq!(factory.generate_many(0).unwrap().len(), 0);
    assert_eq!(factory.generate_many(12).unwrap().len(), 12);
}

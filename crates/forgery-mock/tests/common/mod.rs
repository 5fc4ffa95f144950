#![allow(dead_code)]

use std::collections::BTreeMap;

use chrono::NaiveDate;
use forgery_core::ValueKind;
use forgery_mock::{Mockable, ObjectSchema};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Geo {
    pub lat: f64,
    pub lng: f64,
}

impl Mockable for Geo {
    fn schema() -> ObjectSchema {
        ObjectSchema::builder::<Geo>("Geo")
            .default_constructor()
            .field("lat", |g: &mut Geo| &mut g.lat)
            .field("lng", |g: &mut Geo| &mut g.lng)
            .build()
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Address {
    pub city: String,
    pub zip: String,
    pub geo: Geo,
}

impl Mockable for Address {
    fn schema() -> ObjectSchema {
        ObjectSchema::builder::<Address>("Address")
            .default_constructor()
            .field("city", |a: &mut Address| &mut a.city)
            .field("zip", |a: &mut Address| &mut a.zip)
            .nested("geo", |a: &mut Address| &mut a.geo)
            .build()
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Pet {
    pub name: String,
    pub species: String,
}

impl Mockable for Pet {
    fn schema() -> ObjectSchema {
        ObjectSchema::builder::<Pet>("Pet")
            .constructor(|| Pet {
                name: String::new(),
                species: "cat".to_string(),
            })
            .field("name", |p: &mut Pet| &mut p.name)
            .field("species", |p: &mut Pet| &mut p.species)
            .build()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub age: u32,
    pub email: String,
    pub score: f64,
    pub active: bool,
    pub nickname: String,
    pub tags: Vec<String>,
    pub lucky: Vec<i64>,
    pub joined: Option<NaiveDate>,
    pub attributes: BTreeMap<String, String>,
    pub address: Address,
    pub billing: Option<Address>,
    pub pets: Vec<Pet>,
}

impl Default for User {
    fn default() -> Self {
        Self {
            id: 7,
            name: String::new(),
            age: 0,
            email: String::new(),
            score: 0.0,
            active: false,
            nickname: "anon".to_string(),
            tags: Vec::new(),
            lucky: Vec::new(),
            joined: None,
            attributes: BTreeMap::new(),
            address: Address::default(),
            billing: Some(Address {
                city: "Default City".to_string(),
                ..Address::default()
            }),
            pets: Vec::new(),
        }
    }
}

impl Mockable for User {
    fn schema() -> ObjectSchema {
        ObjectSchema::builder::<User>("User")
            .default_constructor()
            .read_only("id", ValueKind::Int)
            .field("name", |u: &mut User| &mut u.name)
            .field("age", |u: &mut User| &mut u.age)
            .field("email", |u: &mut User| &mut u.email)
            .field("score", |u: &mut User| &mut u.score)
            .field("active", |u: &mut User| &mut u.active)
            .field("nickname", |u: &mut User| &mut u.nickname)
            .field("tags", |u: &mut User| &mut u.tags)
            .field("lucky", |u: &mut User| &mut u.lucky)
            .field("joined", |u: &mut User| &mut u.joined)
            .field("attributes", |u: &mut User| &mut u.attributes)
            .nested("address", |u: &mut User| &mut u.address)
            .nested_option("billing", |u: &mut User| &mut u.billing)
            .nested_list("pets", |u: &mut User| &mut u.pets)
            .build()
    }
}

/// Has no constructor.
#[derive(Debug, Default)]
pub struct Token {
    pub value: String,
}

impl Mockable for Token {
    fn schema() -> ObjectSchema {
        ObjectSchema::builder::<Token>("Token")
            .field("value", |t: &mut Token| &mut t.value)
            .build()
    }
}

#[derive(Debug, Default)]
pub struct Session {
    pub label: String,
    pub token: Token,
}

impl Mockable for Session {
    fn schema() -> ObjectSchema {
        ObjectSchema::builder::<Session>("Session")
            .default_constructor()
            .field("label", |s: &mut Session| &mut s.label)
            .nested("token", |s: &mut Session| &mut s.token)
            .build()
    }
}

#[derive(Debug, Default)]
pub struct Twice {
    pub a: String,
}

impl Mockable for Twice {
    fn schema() -> ObjectSchema {
        ObjectSchema::builder::<Twice>("Twice")
            .default_constructor()
            .field("a", |t: &mut Twice| &mut t.a)
            .field("a", |t: &mut Twice| &mut t.a)
            .build()
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

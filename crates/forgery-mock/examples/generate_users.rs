use forgery_mock::{FactoryRegistry, Mockable, ObjectSchema};
use serde_json::json;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default)]
struct Address {
    city: String,
    street: String,
}

impl Mockable for Address {
    fn schema() -> ObjectSchema {
        ObjectSchema::builder::<Address>("Address")
            .default_constructor()
            .field("city", |a: &mut Address| &mut a.city)
            .field("street", |a: &mut Address| &mut a.street)
            .build()
    }
}

#[derive(Debug, Default)]
struct User {
    name: String,
    age: u8,
    email: String,
    tags: Vec<String>,
    address: Address,
}

impl Mockable for User {
    fn schema() -> ObjectSchema {
        ObjectSchema::builder::<User>("User")
            .default_constructor()
            .field("name", |u: &mut User| &mut u.name)
            .field("age", |u: &mut User| &mut u.age)
            .field("email", |u: &mut User| &mut u.email)
            .field("tags", |u: &mut User| &mut u.tags)
            .nested("address", |u: &mut User| &mut u.address)
            .build()
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let registry = FactoryRegistry::new();
    let factory = registry.set::<User>(&json!({
        "name": "@name('pt_BR')",
        "age": "@integer(18, 80)",
        "email": "@email",
        "tags": ["customer", "@word"],
        "address.city": "@city",
        "address.street": "@street",
    }))?;

    for user in factory.generate_many(3)? {
        println!("{user:#?}");
    }
    Ok(())
}

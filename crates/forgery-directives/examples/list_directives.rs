use forgery_directives::DirectiveCatalogue;
use tracing_subscriber::EnvFilter;

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let catalogue = DirectiveCatalogue::new();
    for generator in catalogue.directives() {
        println!("@{:<40} {}", generator.signature(), generator.description());
    }
}

use bazaar_db::{create_pool, schema::initialize_database};
use color_eyre::eyre::{Result, WrapErr};
use dotenv::dotenv;

/// Standalone schema bootstrap, useful for CI and fresh deployments where the
/// API server should not be the first thing to touch the database.
#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenv().ok();

    tracing_subscriber::fmt::init();

    let database_url = std::env::var("DATABASE_URL")
        .wrap_err("DATABASE_URL environment variable must be set")?;

    let pool = create_pool(&database_url).await?;
    initialize_database(&pool).await?;

    tracing::info!("Database schema is up to date");
    Ok(())
}

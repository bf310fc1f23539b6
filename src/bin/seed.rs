// Reset the configured database and load the sample dataset

use tracing_subscriber::EnvFilter;

use news_api::{
    config::Config,
    data_seeder::{seed_data_into_store, SeedData},
    infrastructure::connect_store,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;
    tracing::info!("Seeding database at {}", config.database.url);

    let store = connect_store(&config.database).await?;
    let data = SeedData::sample();
    seed_data_into_store(store.as_ref(), &data).await?;

    tracing::info!(
        "Seeded {} users, {} topics, {} articles and {} comments",
        data.users.len(),
        data.topics.len(),
        data.articles.len(),
        data.comments.len()
    );
    Ok(())
}

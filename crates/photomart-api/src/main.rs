use photomart_api::setup;
use photomart_core::Config;

// Upload bodies are buffered in memory; mimalloc keeps fragmentation down
// on musl-based container images.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::from_env()?;

    let (_state, router, pool) = setup::initialize_app(config.clone()).await?;

    setup::server::start_server(&config, router).await?;

    pool.close().await;
    tracing::info!("Database pool closed");

    Ok(())
}

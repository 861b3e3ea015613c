use nbdrop_core::Config;

// Use mimalloc as the global allocator for lower fragmentation, especially on
// musl-based container images.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration
    let config = Config::from_env()?;

    nbdrop_api::telemetry::init_telemetry(config.is_production());

    // Initialize the application (storage, mirror, routes)
    let (_state, router) = nbdrop_api::setup::initialize_app(config.clone()).await?;

    // Start the server
    nbdrop_api::setup::server::start_server(&config, router).await?;

    Ok(())
}

use anyhow::{Context, Result};
use campus_console::console::repl::Console;
use campus_console::core::config::Config;
use campus_console::core::tracing_init;
use campus_console::session::manager::SessionManager;
use std::env;
use std::path::PathBuf;
use tracing::info;

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    let config_path = args.get(1).map(PathBuf::from);

    let config = Config::load(config_path.as_deref()).context(
        "Failed to load configuration. \
        Copy campus-console.example.toml to campus-console.toml and adjust the values, \
        or run without a config file to use the defaults.",
    )?;

    tracing_init::init_tracing(&config.logging);

    info!(
        base_url = %config.api.base_url,
        credentials_path = %config.storage.credentials_path.display(),
        log_level = %config.logging.level,
        "Student management console starting"
    );

    // All session mutations serialize on a single-threaded event loop
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build Tokio runtime")?;

    runtime.block_on(async_main(config))
}

async fn async_main(config: Config) -> Result<()> {
    let session = SessionManager::new(&config).context("Failed to create session manager")?;

    let console = Console::new(session);
    console.run().await?;

    info!("Console exiting");
    Ok(())
}

use anyhow::{Context, Result};
use staff_dashboard::console;
use staff_dashboard::core::config::Config;
use staff_dashboard::core::startup::{build_directory, open_store, start};
use staff_dashboard::core::state::AppState;
use staff_dashboard::core::tracing_init::init_tracing;
use std::env;
use std::io;
use std::path::PathBuf;
use tracing::info;

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    // An explicit path must exist; the default one is optional
    let config = if args.len() > 1 {
        let config_path = PathBuf::from(&args[1]);
        Config::from_file(&config_path)
            .context(format!("Failed to load configuration from '{}'", config_path.display()))?
    } else {
        let config_path = PathBuf::from("config.toml");
        if config_path.exists() {
            Config::from_file(&config_path)
                .context(format!("Failed to load configuration from '{}'", config_path.display()))?
        } else {
            Config::default()
        }
    };

    // Initialize tracing/logging
    init_tracing(&config.logging);

    info!(
        storage_backend = ?config.storage.backend,
        storage_path = %config.storage.path.display(),
        key_prefix = %config.storage.key_prefix,
        startup_policy = ?config.startup.policy,
        log_level = %config.logging.level,
        log_format = %config.logging.format,
        "Staff dashboard starting"
    );

    let store = open_store(&config.storage)?;
    let directory = build_directory(&config.directory)?;

    let state = AppState::new(config, directory, store);

    match start(&state) {
        Some(user) => info!(user_id = %user.id, "Resumed saved session"),
        None => info!(users = state.directory.len(), "No saved session, waiting for login"),
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    console::run(&state, stdin.lock(), stdout.lock())?;

    info!("Staff dashboard exiting");
    Ok(())
}

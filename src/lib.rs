pub mod commands;
pub mod compose;
pub mod config;
pub mod core_state;
pub mod models;
pub mod providers;
pub mod shell;

use std::io;

use tracing_subscriber::EnvFilter;

/// Start the provider directory shell on stdin/stdout.
pub fn run() -> io::Result<()> {
    // Logs go to stderr so the shell output stays readable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(io::stderr)
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let mut shell = shell::Shell::new(core_state::CoreState::new());
    let stdin = io::stdin();
    shell.run(stdin.lock(), io::stdout())?;

    tracing::info!(
        providers = shell.state().providers().len(),
        "Session ended, providers discarded"
    );
    Ok(())
}

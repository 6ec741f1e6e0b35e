use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use admin_console::cli;
use admin_console::config::ConsoleConfig;
use admin_console::Console;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "admin_console=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ConsoleConfig::load()?;
    tracing::info!("Configuration loaded successfully");

    let console = Console::builder(config).build()?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = cli::Command::parse(&args)?;
    cli::run(&console, command).await
}

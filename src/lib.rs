pub mod cli;
pub mod config;
pub mod db;
pub mod entities;

use clap::Parser;
pub use config::Config;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, UserCommands};

pub async fn run() -> anyhow::Result<()> {
    let config = Config::load()?;
    config.validate()?;

    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let fmt_layer = tracing_subscriber::fmt::layer();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Migrate) => cli::cmd_migrate(&config).await,

        Some(Commands::Status) => cli::cmd_status(&config).await,

        Some(Commands::Check { json }) => cli::cmd_check(&config, json).await,

        Some(Commands::Stats { json }) => cli::cmd_stats(&config, json).await,

        Some(Commands::Users { command }) => match command {
            UserCommands::List => cli::cmd_users_list(&config).await,
            UserCommands::Preview => cli::cmd_users_preview(&config).await,
        },

        Some(Commands::Init) => cli::cmd_init(),

        None => {
            use clap::CommandFactory;
            Cli::command().print_help()?;
            Ok(())
        }
    }
}

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use medirank::{config, init_tracing};

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();
    let command = args.get_command();

    if let cli::Commands::Version = command {
        println!("MediRank v{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // Logging settings live in the config, so it is loaded before tracing starts
    let cfg = config::load_config(&args.config)?;
    init_tracing(&cfg.server.log_level, &cfg.server.log_format);

    match command {
        cli::Commands::Serve { host, port } => {
            commands::serve::execute(cfg, host, port).await?;
        }
        cli::Commands::Rank {
            service_type,
            procedure,
            state,
            username,
            password,
        } => {
            commands::rank::execute(&cfg, service_type, &procedure, &state, &username, &password)?;
        }
        cli::Commands::Options { service_type } => {
            commands::options::execute(&cfg, service_type)?;
        }
        cli::Commands::Check => {
            commands::check::execute(&cfg)?;
        }
        cli::Commands::Config { action } => match action {
            cli::ConfigCommands::Show => commands::config::show(&cfg)?,
            cli::ConfigCommands::Validate => commands::config::validate(&cfg)?,
        },
        cli::Commands::Version => unreachable!("handled before config load"),
    }

    Ok(())
}

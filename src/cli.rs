use clap::{Parser, Subcommand};
use medirank::ranking::ServiceType;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "medirank", version, about = "MediRank - find the lowest-cost providers")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve {
        /// Override the configured listen host
        #[arg(long)]
        host: Option<String>,

        /// Override the configured listen port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Rank the three cheapest providers for a procedure and state
    Rank {
        /// Inpatient or Outpatient
        #[arg(short = 't', long, value_parser = parse_service_type)]
        service_type: ServiceType,

        /// Procedure label (DRG for inpatient, APC for outpatient)
        #[arg(long)]
        procedure: String,

        /// Provider state label
        #[arg(short, long)]
        state: String,

        /// Username to log in with
        #[arg(short, long)]
        username: String,

        /// Password (prefer the environment variable)
        #[arg(long, env = "MEDIRANK_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// List the procedure and state labels for a service type
    Options {
        /// Inpatient or Outpatient
        #[arg(short = 't', long, value_parser = parse_service_type, default_value = "Inpatient")]
        service_type: ServiceType,
    },

    /// Validate configuration and load every artifact
    Check,

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Display current configuration (with passwords masked)
    Show,

    /// Validate configuration file
    Validate,
}

fn parse_service_type(s: &str) -> Result<ServiceType, String> {
    s.parse()
}

impl Cli {
    /// Get the command to execute, defaulting to Serve if none provided
    pub fn get_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Serve {
            host: None,
            port: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_serve() {
        let cli = Cli {
            config: PathBuf::from("config.toml"),
            command: None,
        };

        match cli.get_command() {
            Commands::Serve { host, port } => {
                assert!(host.is_none());
                assert!(port.is_none());
            }
            _ => panic!("Expected Serve command"),
        }
    }

    #[test]
    fn test_cli_parsing_serve_with_port() {
        let cli = Cli::try_parse_from(["medirank", "serve", "--port", "9000"]).unwrap();

        match cli.get_command() {
            Commands::Serve { port, .. } => assert_eq!(port, Some(9000)),
            _ => panic!("Expected Serve command"),
        }
    }

    #[test]
    fn test_cli_parsing_rank() {
        let args = [
            "medirank", "rank", "-t", "outpatient", "--procedure", "APC-0012",
            "--state", "NY", "--username", "admin", "--password", "password123",
        ];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.get_command() {
            Commands::Rank {
                service_type,
                procedure,
                state,
                username,
                ..
            } => {
                assert_eq!(service_type, ServiceType::Outpatient);
                assert_eq!(procedure, "APC-0012");
                assert_eq!(state, "NY");
                assert_eq!(username, "admin");
            }
            _ => panic!("Expected Rank command"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_service_type() {
        let result = Cli::try_parse_from(["medirank", "options", "-t", "emergency"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parsing_config_show() {
        let cli = Cli::try_parse_from(["medirank", "config", "show"]).unwrap();

        match cli.get_command() {
            Commands::Config { action } => assert!(matches!(action, ConfigCommands::Show)),
            _ => panic!("Expected Config command"),
        }
    }
}

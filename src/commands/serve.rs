use anyhow::Result;
use colored::Colorize;
use medirank::{config::Config, server};
use tracing::info;

/// Execute the serve command
///
/// Applies CLI overrides to the loaded configuration and runs the server
/// until a shutdown signal arrives.
pub async fn execute(mut cfg: Config, host: Option<String>, port: Option<u16>) -> Result<()> {
    apply_overrides(&mut cfg, host, port);

    println!("{}", "Starting MediRank server...".green());
    info!(
        host = %cfg.server.host,
        port = cfg.server.port,
        "Starting MediRank in foreground mode"
    );

    server::start_server(cfg).await
}

fn apply_overrides(cfg: &mut Config, host: Option<String>, port: Option<u16>) {
    if let Some(host) = host {
        cfg.server.host = host;
    }
    if let Some(port) = port {
        cfg.server.port = port;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_overrides() {
        let mut cfg = Config::default();
        apply_overrides(&mut cfg, None, Some(9999));
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 9999);

        apply_overrides(&mut cfg, Some("127.0.0.1".to_string()), None);
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 9999);
    }
}

use anyhow::Result;
use colored::Colorize;
use medirank::config::Config;
use tracing::info;

/// Execute the config show command
///
/// Displays the current configuration with passwords masked
pub fn show(cfg: &Config) -> Result<()> {
    info!("Displaying configuration");
    let sanitized = sanitize_secrets(cfg);

    println!("{}", "Current Configuration:".green().bold());
    println!();

    let toml_string = toml::to_string_pretty(&sanitized)?;
    println!("{}", toml_string);

    Ok(())
}

/// Execute the config validate command
///
/// Loading already validated the file; this prints a summary
pub fn validate(cfg: &Config) -> Result<()> {
    println!("{}", "✓ Configuration is valid".green());
    println!();
    println!("{}", "Summary:".bold());
    println!("  Listen: {}:{}", cfg.server.host, cfg.server.port);
    println!("  Users: {}", cfg.users.len());
    println!("  Artifacts: {}", cfg.artifacts.dir.display());
    println!(
        "  Metrics: {}",
        if cfg.metrics.enabled {
            cfg.metrics.endpoint.as_str().green()
        } else {
            "disabled".red()
        }
    );

    info!("Configuration validation successful");
    Ok(())
}

/// Passwords are never shown, not even partially
fn sanitize_secrets(cfg: &Config) -> Config {
    let mut sanitized = cfg.clone();
    for user in &mut sanitized.users {
        user.password = "***".to_string();
    }
    sanitized
}

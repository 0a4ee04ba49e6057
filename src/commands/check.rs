use anyhow::Result;
use colored::Colorize;
use medirank::{
    artifacts::{ArtifactCache, ARTIFACT_FILES},
    config::Config,
};
use tracing::info;

/// Execute the check command
///
/// Validates the configuration and loads every model and encoder file
/// without starting the server
pub fn execute(cfg: &Config) -> Result<()> {
    println!("{}", "Checking configuration...".yellow());
    println!("{}", "✓ Configuration is valid".green());
    println!("  {}: {}:{}", "Server".cyan(), cfg.server.host, cfg.server.port);
    println!("  {}: {}", "Users".cyan(), cfg.users.len());
    println!();

    println!(
        "{} {}",
        "Checking artifacts in".yellow(),
        cfg.artifacts.dir.display()
    );
    for file in ARTIFACT_FILES {
        let present = cfg.artifacts.dir.join(file).is_file();
        let status = if present { "found".green() } else { "missing".red() };
        println!("    {} ({})", file, status);
    }

    let cache = ArtifactCache::new(cfg.artifacts.dir.clone());
    let artifacts = cache.artifacts()?;

    println!("{}", "✓ Artifacts loaded".green());
    println!();
    println!("{}", "Models:".bold());
    println!("  Inpatient: {}", artifacts.models.inpatient.kind());
    println!("  Outpatient: {}", artifacts.models.outpatient.kind());
    println!("{}", "Encoders:".bold());
    for encoder in [
        &artifacts.encoders.inpatient_drg,
        &artifacts.encoders.inpatient_state,
        &artifacts.encoders.outpatient_apc,
        &artifacts.encoders.outpatient_state,
    ] {
        println!("  {}: {} labels", encoder.name(), encoder.len());
    }

    info!("Configuration and artifact check completed successfully");
    Ok(())
}

use anyhow::Result;
use colored::Colorize;
use medirank::{
    artifacts::ArtifactCache,
    config::Config,
    ranking::{self, ServiceType},
};

/// Execute the options command
///
/// Prints the labels the procedure and state selectors offer for a service type
pub fn execute(cfg: &Config, service_type: ServiceType) -> Result<()> {
    let cache = ArtifactCache::new(cfg.artifacts.dir.clone());
    let artifacts = cache.artifacts()?;
    let options = ranking::selector_options(&artifacts, service_type);

    println!(
        "{} ({}):",
        format!("{} procedures", service_type.procedure_code_system()).cyan(),
        options.procedures.len()
    );
    for label in &options.procedures {
        println!("  {}", label);
    }
    println!();

    println!("{} ({}):", "States".cyan(), options.states.len());
    println!("  {}", options.states.join(", "));

    Ok(())
}

use anyhow::{bail, Result};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, Table};
use medirank::{
    artifacts::ArtifactCache,
    config::Config,
    credentials::{CredentialStore, Session},
    ranking::{self, RankedProvider, ServiceType},
};

/// Execute the rank command
///
/// Logs in with the given credentials, runs the ranking pipeline once and
/// prints the top providers.
pub fn execute(
    cfg: &Config,
    service_type: ServiceType,
    procedure: &str,
    state: &str,
    username: &str,
    password: &str,
) -> Result<()> {
    let credentials = CredentialStore::from_users(&cfg.users);
    let mut session = Session::new();
    if !session.authenticate(&credentials, username, password) {
        bail!("Invalid username or password");
    }
    println!("{}", format!("Welcome, {}!", username).green());

    let cache = ArtifactCache::new(cfg.artifacts.dir.clone());
    let artifacts = cache
        .artifacts()
        .map_err(|e| anyhow::anyhow!("Unable to load models or encoders: {}", e))?;

    let results = ranking::rank_top3(&artifacts, service_type, procedure, state)?;

    println!();
    println!(
        "{}",
        format!(
            "Top {} lowest-cost providers ({}, {} {}, {})",
            results.len(),
            service_type,
            service_type.procedure_code_system(),
            procedure,
            state
        )
        .bold()
    );
    println!("{}", render_table(&results));

    Ok(())
}

fn render_table(results: &[RankedProvider]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Rank", "Provider_Id", "Average_Total_Payments"]);

    for row in results {
        table.add_row(vec![
            Cell::new(row.rank).set_alignment(CellAlignment::Right),
            Cell::new(row.provider_id),
            Cell::new(format!("{:.2}", row.average_total_payments))
                .set_alignment(CellAlignment::Right),
        ]);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_table_contains_rows() {
        let results = vec![
            RankedProvider {
                rank: 1,
                provider_id: 520_042,
                average_total_payments: 8123.456,
            },
            RankedProvider {
                rank: 2,
                provider_id: 520_007,
                average_total_payments: 8200.0,
            },
        ];

        let rendered = render_table(&results).to_string();
        assert!(rendered.contains("Provider_Id"));
        assert!(rendered.contains("520042"));
        assert!(rendered.contains("8123.46"));
        assert!(rendered.contains("8200.00"));
    }

    #[test]
    fn test_wrong_password_is_rejected() {
        let cfg = Config::default();
        let result = execute(&cfg, ServiceType::Inpatient, "DRG-001", "CA", "admin", "wrong");
        assert!(result.unwrap_err().to_string().contains("Invalid username or password"));
    }
}

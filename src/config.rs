use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub artifacts: ArtifactsConfig,
    #[serde(default = "default_users")]
    pub users: Vec<UserConfig>,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub log_format: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ArtifactsConfig {
    /// Directory holding the model and encoder files
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UserConfig {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub endpoint: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "/metrics".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            artifacts: ArtifactsConfig::default(),
            users: default_users(),
            metrics: MetricsConfig::default(),
        }
    }
}

fn default_users() -> Vec<UserConfig> {
    vec![
        UserConfig {
            username: "admin".to_string(),
            password: "password123".to_string(),
        },
        UserConfig {
            username: "user".to_string(),
            password: "medi123".to_string(),
        },
    ]
}

/// Load configuration from an optional TOML file plus `MEDIRANK__*`
/// environment overrides, then validate it.
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    let config = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(config::Environment::with_prefix("MEDIRANK").separator("__"))
        .build()?;

    let cfg: Config = config.try_deserialize()?;
    validate_config(&cfg)?;

    Ok(cfg)
}

pub fn validate_config(cfg: &Config) -> anyhow::Result<()> {
    if cfg.users.is_empty() {
        anyhow::bail!("At least one user must be configured");
    }

    let mut seen = HashSet::new();
    for user in &cfg.users {
        if user.username.is_empty() {
            anyhow::bail!("Username cannot be empty");
        }
        if !seen.insert(user.username.as_str()) {
            anyhow::bail!("Duplicate username: {}", user.username);
        }
    }

    if !matches!(cfg.server.log_format.as_str(), "pretty" | "json") {
        anyhow::bail!(
            "Invalid log_format '{}': expected 'pretty' or 'json'",
            cfg.server.log_format
        );
    }

    if cfg.metrics.enabled && !cfg.metrics.endpoint.starts_with('/') {
        anyhow::bail!("Metrics endpoint must start with '/'");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let cfg = Config::default();
        assert!(validate_config(&cfg).is_ok());
        assert_eq!(cfg.users.len(), 2);
        assert_eq!(cfg.server.port, 8080);
    }

    #[test]
    fn test_validate_config_requires_users() {
        let mut cfg = Config::default();
        cfg.users.clear();

        let result = validate_config(&cfg);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("At least one user"));
    }

    #[test]
    fn test_validate_config_rejects_duplicate_usernames() {
        let mut cfg = Config::default();
        cfg.users.push(UserConfig {
            username: "admin".to_string(),
            password: "other".to_string(),
        });

        let result = validate_config(&cfg);
        assert!(result.unwrap_err().to_string().contains("Duplicate username"));
    }

    #[test]
    fn test_validate_config_rejects_bad_log_format() {
        let mut cfg = Config::default();
        cfg.server.log_format = "xml".to_string();
        assert!(validate_config(&cfg).is_err());
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(
            file,
            r#"
[server]
host = "127.0.0.1"
port = 9090
log_level = "debug"
log_format = "json"

[artifacts]
dir = "/srv/medirank"

[[users]]
username = "analyst"
password = "s3cret"
"#
        )
        .unwrap();

        let cfg = load_config(file.path()).unwrap();
        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.artifacts.dir, PathBuf::from("/srv/medirank"));
        assert_eq!(cfg.users.len(), 1);
        assert_eq!(cfg.users[0].username, "analyst");
        assert!(cfg.metrics.enabled);
    }

    #[test]
    fn test_load_config_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.users.len(), 2);
    }
}

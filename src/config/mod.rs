use secrecy::SecretString;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub mod types;

pub use types::Config;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("webhook secret is not configured (set GITHUB_WEBHOOK_SECRET or [github].webhook_secret)")]
    MissingSecret,
}

/// Values supplied on the command line or through the environment. Each one
/// beats the config file when present.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub database_url: Option<String>,
    pub webhook_secret: Option<String>,
    pub dedupe_deliveries: Option<bool>,
}

/// Fully resolved runtime settings.
#[derive(Debug)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub dedupe_deliveries: bool,
    pub webhook_secret: SecretString,
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Config::default());
        };

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl Settings {
    pub fn resolve(config: Config, overrides: Overrides) -> Result<Self, ConfigError> {
        let webhook_secret = overrides
            .webhook_secret
            .or(config.github.webhook_secret)
            .filter(|s| !s.trim().is_empty())
            .map(SecretString::from)
            .ok_or(ConfigError::MissingSecret)?;

        Ok(Settings {
            host: overrides.host.unwrap_or(config.server.host),
            port: overrides.port.unwrap_or(config.server.port),
            database_url: overrides.database_url.unwrap_or(config.store.database_url),
            dedupe_deliveries: overrides
                .dedupe_deliveries
                .unwrap_or(config.store.dedupe_deliveries),
            webhook_secret,
        })
    }

    /// Host and port kept apart so IPv6 literals need no brackets.
    pub fn bind_address(&self) -> (&str, u16) {
        (&self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    fn parse(toml_str: &str) -> Config {
        toml::from_str(toml_str).unwrap()
    }

    #[test]
    fn defaults_apply_without_a_file() {
        let config = Config::load(None).unwrap();
        assert_eq!(config.server.port, types::DEFAULT_PORT);
        assert_eq!(config.server.host, types::DEFAULT_HOST);
        assert_eq!(config.store.database_url, types::DEFAULT_DATABASE_URL);
        assert!(!config.store.dedupe_deliveries);
        assert!(config.github.webhook_secret.is_none());
    }

    #[test]
    fn missing_secret_is_fatal() {
        let err = Settings::resolve(Config::default(), Overrides::default()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingSecret));

        let blank = Overrides {
            webhook_secret: Some("   ".to_string()),
            ..Overrides::default()
        };
        let err = Settings::resolve(Config::default(), blank).unwrap_err();
        assert!(matches!(err, ConfigError::MissingSecret));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = parse(
            r#"
            [github]
            webhook_secret = "from-file"

            [store]
            dedupe_deliveries = true
            "#,
        );

        let settings = Settings::resolve(config, Overrides::default()).unwrap();
        assert_eq!(settings.port, types::DEFAULT_PORT);
        assert_eq!(settings.database_url, types::DEFAULT_DATABASE_URL);
        assert!(settings.dedupe_deliveries);
        assert_eq!(settings.webhook_secret.expose_secret(), "from-file");
    }

    #[test]
    fn overrides_beat_the_file() {
        let config = parse(
            r#"
            [server]
            port = 8080

            [github]
            webhook_secret = "from-file"
            "#,
        );
        let overrides = Overrides {
            port: Some(9000),
            database_url: Some("memory".to_string()),
            webhook_secret: Some("from-env".to_string()),
            ..Overrides::default()
        };

        let settings = Settings::resolve(config, overrides).unwrap();
        assert_eq!(settings.bind_address(), ("0.0.0.0", 9000));
        assert_eq!(settings.database_url, "memory");
        assert_eq!(settings.webhook_secret.expose_secret(), "from-env");
    }

    #[test]
    fn ipv6_hosts_resolve_to_ipv6_addresses() {
        use std::net::ToSocketAddrs;

        let overrides = Overrides {
            host: Some("::".to_string()),
            webhook_secret: Some("s".to_string()),
            ..Overrides::default()
        };
        let settings = Settings::resolve(Config::default(), overrides).unwrap();
        assert_eq!(settings.bind_address(), ("::", types::DEFAULT_PORT));

        let addrs: Vec<_> = settings.bind_address().to_socket_addrs().unwrap().collect();
        assert!(!addrs.is_empty());
        assert!(addrs.iter().all(|a| a.is_ipv6() && a.port() == types::DEFAULT_PORT));
    }

    #[test]
    fn secret_is_redacted_in_debug_output() {
        let overrides = Overrides {
            webhook_secret: Some("hunter2".to_string()),
            ..Overrides::default()
        };
        let settings = Settings::resolve(Config::default(), overrides).unwrap();
        assert!(!format!("{:?}", settings).contains("hunter2"));
    }

    #[test]
    fn unreadable_file_reports_its_path() {
        let path = Path::new("/nonexistent/hook-ledger.toml");
        let err = Config::load(Some(path)).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("/nonexistent/hook-ledger.toml"));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let path = std::env::temp_dir().join(format!("hook-ledger-{}.toml", std::process::id()));
        std::fs::write(&path, "[server]\nport = \"not a number\"\n").unwrap();

        let err = Config::load(Some(&path)).unwrap_err();
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}

use std::{env, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use dotenv::dotenv;

#[derive(Debug, Clone)]
pub struct Config {
    // Server configuration
    pub server_host: String,
    pub server_port: u16,

    // Storage
    pub data_file: PathBuf,

    // Landing assets
    pub static_dir: PathBuf,
    pub landing_page: String,

    // Admin panel
    pub admin_user: String,
    pub admin_password: Option<String>,

    // Security
    pub allowed_origins: Vec<String>,
    pub submit_rate_limit: usize, // per client per minute, 0 disables
}

/// Command-line overrides, applied on top of the environment.
#[derive(Debug, Default, Parser)]
#[clap(author, version, about, long_about = None)]
pub struct Cli {
    #[clap(long)]
    pub host: Option<String>,

    #[clap(long)]
    pub port: Option<u16>,

    #[clap(long)]
    pub data_file: Option<PathBuf>,

    #[clap(long)]
    pub static_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok();
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup; unset or blank keys fall back to defaults.
    pub fn from_vars<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let server_host = var("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let server_port = var("SERVER_PORT")
            .unwrap_or_else(|| "5000".to_string())
            .parse::<u16>()
            .context("SERVER_PORT must be a valid port number")?;

        let data_file = var("DATA_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("customer_data.json"));

        let static_dir = var("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("static"));
        let landing_page =
            var("LANDING_PAGE").unwrap_or_else(|| "wuhan_travel_website.html".to_string());

        let admin_user = var("ADMIN_USER").unwrap_or_else(|| "admin".to_string());
        let admin_password = var("ADMIN_PASSWORD");

        let allowed_origins = var("ALLOWED_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let submit_rate_limit = var("SUBMIT_RATE_LIMIT")
            .unwrap_or_else(|| "30".to_string())
            .parse::<usize>()
            .context("SUBMIT_RATE_LIMIT must be a valid number")?;

        Ok(Config {
            server_host,
            server_port,
            data_file,
            static_dir,
            landing_page,
            admin_user,
            admin_password,
            allowed_origins,
            submit_rate_limit,
        })
    }

    pub fn apply_cli(mut self, cli: Cli) -> Self {
        if let Some(host) = cli.host {
            self.server_host = host;
        }
        if let Some(port) = cli.port {
            self.server_port = port;
        }
        if let Some(data_file) = cli.data_file {
            self.data_file = data_file;
        }
        if let Some(static_dir) = cli.static_dir {
            self.static_dir = static_dir;
        }
        self
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// File name offered to browsers when the collection is exported.
    pub fn export_file_name(&self) -> String {
        self.data_file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "customer_data.json".to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.server_address(), "0.0.0.0:5000");
        assert_eq!(config.data_file, PathBuf::from("customer_data.json"));
        assert_eq!(config.static_dir, PathBuf::from("static"));
        assert_eq!(config.landing_page, "wuhan_travel_website.html");
        assert_eq!(config.admin_user, "admin");
        assert!(config.admin_password.is_none());
        assert!(config.allowed_origins.is_empty());
        assert_eq!(config.submit_rate_limit, 30);
        assert_eq!(config.export_file_name(), "customer_data.json");
    }

    #[test]
    fn test_values_are_read() {
        let config = config_from(&[
            ("SERVER_HOST", "127.0.0.1"),
            ("SERVER_PORT", "8080"),
            ("DATA_FILE", "/var/lib/intake/leads.json"),
            ("ADMIN_PASSWORD", "s3cret"),
            ("ALLOWED_ORIGINS", "https://a.example, https://b.example,"),
            ("SUBMIT_RATE_LIMIT", "0"),
        ])
        .unwrap();

        assert_eq!(config.server_address(), "127.0.0.1:8080");
        assert_eq!(config.export_file_name(), "leads.json");
        assert_eq!(config.admin_password.as_deref(), Some("s3cret"));
        assert_eq!(
            config.allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert_eq!(config.submit_rate_limit, 0);
    }

    #[test]
    fn test_blank_password_leaves_panel_open() {
        let config = config_from(&[("ADMIN_PASSWORD", "  ")]).unwrap();
        assert!(config.admin_password.is_none());
    }

    #[test]
    fn test_invalid_port_is_an_error() {
        let err = config_from(&[("SERVER_PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().contains("SERVER_PORT"));
    }

    #[test]
    fn test_cli_overrides_environment() {
        let config = config_from(&[("SERVER_PORT", "8080")])
            .unwrap()
            .apply_cli(Cli {
                port: Some(9090),
                data_file: Some(PathBuf::from("other.json")),
                ..Cli::default()
            });

        assert_eq!(config.server_port, 9090);
        assert_eq!(config.data_file, PathBuf::from("other.json"));
        assert_eq!(config.server_host, "0.0.0.0");
    }
}

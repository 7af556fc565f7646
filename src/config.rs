//! Configuration management for the relay.
//!
//! This module handles loading configuration from multiple sources, highest
//! precedence first:
//! - Command line flags
//! - Environment variables (`DEVOPS_RELAY_*`)
//! - A TOML configuration file following the XDG Base Directory layout
//! - Built-in defaults
//!
//! ## Example
//!
//! ```rust
//! use devops_relay::{Args, Config};
//!
//! let args = Args {
//!     organization: Some("my-org".to_string()),
//!     pat: Some("my-pat".to_string()),
//!     ..Args::default()
//! };
//!
//! // Defaults < file < env < CLI
//! let config = Config::default().merge(Config::from_args(&args));
//! let relay = config.resolve().unwrap();
//! assert_eq!(relay.bind_address(), "0.0.0.0:8080");
//! ```

use crate::{
    api::{DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT},
    error::ConfigError,
    models::Args,
    parsed_property::ParsedProperty,
};
use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Prefix shared by every environment variable the relay reads.
pub const ENV_PREFIX: &str = "DEVOPS_RELAY_";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;

/// api-version query values sent with each upstream call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiVersions {
    pub projects: String,
    pub teams: String,
    pub members: String,
    pub iterations: String,
    pub wiql: String,
    pub work_items: String,
}

impl Default for ApiVersions {
    fn default() -> Self {
        Self {
            projects: "5.1".to_string(),
            teams: "5.0".to_string(),
            members: "5.1".to_string(),
            iterations: "5.1".to_string(),
            wiql: "5.1".to_string(),
            work_items: "5.1".to_string(),
        }
    }
}

/// Temporary struct for deserializing TOML configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    organization: Option<String>,
    pat: Option<String>,
    base_url: Option<String>,
    host: Option<String>,
    port: Option<u16>,
    request_timeout_secs: Option<u64>,
    api_versions: Option<ApiVersions>,
}

/// Relay configuration assembled from CLI arguments, environment variables,
/// config file, and defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Azure DevOps organization name.
    pub organization: Option<ParsedProperty<String>>,
    /// Personal access token for authenticating with Azure DevOps.
    pub pat: Option<ParsedProperty<SecretString>>,
    /// Azure DevOps REST endpoint.
    pub base_url: Option<ParsedProperty<String>>,
    /// Address the HTTP server binds to.
    pub host: Option<ParsedProperty<String>>,
    /// Port the HTTP server binds to.
    pub port: Option<ParsedProperty<u16>>,
    /// Timeout applied to each upstream request.
    pub request_timeout_secs: Option<ParsedProperty<u64>>,
    /// api-version values per upstream operation.
    pub api_versions: Option<ParsedProperty<ApiVersions>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            organization: None,
            pat: None,
            base_url: Some(ParsedProperty::Default(DEFAULT_BASE_URL.to_string())),
            host: Some(ParsedProperty::Default(DEFAULT_HOST.to_string())),
            port: Some(ParsedProperty::Default(DEFAULT_PORT)),
            request_timeout_secs: Some(ParsedProperty::Default(DEFAULT_REQUEST_TIMEOUT.as_secs())),
            api_versions: Some(ParsedProperty::Default(ApiVersions::default())),
        }
    }
}

impl Config {
    /// A configuration with no values from any source.
    pub fn empty() -> Self {
        Self {
            organization: None,
            pat: None,
            base_url: None,
            host: None,
            port: None,
            request_timeout_secs: None,
            api_versions: None,
        }
    }

    /// Loads every source for `args` and merges them in precedence order.
    pub fn load(args: &Args) -> Result<Self, ConfigError> {
        Ok(Self::default()
            .merge(Self::load_from_file(args.config.as_deref())?)
            .merge(Self::load_from_env()?)
            .merge(Self::from_args(args)))
    }

    /// Loads the configuration file.
    ///
    /// An explicit path must exist. Without one, the XDG location is used
    /// when present and an empty configuration is returned otherwise.
    pub fn load_from_file(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load_from_path(path),
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::load_from_path(&path),
                _ => Ok(Self::empty()),
            },
        }
    }

    /// Loads configuration from a specific TOML file.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::FileReadError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let file: ConfigFile = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let from_file = |v: String| ParsedProperty::File(v, path.to_path_buf());
        Ok(Self {
            organization: file.organization.map(from_file),
            pat: file.pat.map(|v| from_file(v).map(SecretString::from)),
            base_url: file.base_url.map(from_file),
            host: file.host.map(from_file),
            port: file
                .port
                .map(|v| ParsedProperty::File(v, path.to_path_buf())),
            request_timeout_secs: file
                .request_timeout_secs
                .map(|v| ParsedProperty::File(v, path.to_path_buf())),
            api_versions: file
                .api_versions
                .map(|v| ParsedProperty::File(v, path.to_path_buf())),
        })
    }

    /// Load configuration from environment variables
    pub fn load_from_env() -> Result<Self, ConfigError> {
        Self::load_from_env_with(|name| std::env::var(name).ok())
    }

    /// Loads configuration through `lookup`, which maps a variable name to
    /// its value.
    ///
    /// Empty variables count as unset. A numeric variable that does not
    /// parse is an error rather than silently ignored.
    pub fn load_from_env_with<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |field: &str| {
            let name = env_var_name(field);
            lookup(&name)
                .filter(|v| !v.is_empty())
                .map(|v| ParsedProperty::Env(v, name))
        };
        let numeric = |field: &str| -> Result<Option<ParsedProperty<u64>>, ConfigError> {
            var(field)
                .map(|p| {
                    p.try_map(|s| {
                        s.trim().parse::<u64>().map_err(|e| ConfigError::InvalidValue {
                            field: field.to_string(),
                            message: format!("'{}' is not a number: {}", s, e),
                        })
                    })
                })
                .transpose()
        };

        let port = var("port")
            .map(|p| {
                p.try_map(|s| {
                    s.trim().parse::<u16>().map_err(|e| ConfigError::InvalidValue {
                        field: "port".to_string(),
                        message: format!("'{}' is not a valid port: {}", s, e),
                    })
                })
            })
            .transpose()?;

        Ok(Self {
            organization: var("organization"),
            pat: var("pat").map(|p| p.map(SecretString::from)),
            base_url: var("base_url"),
            host: var("host"),
            port,
            request_timeout_secs: numeric("request_timeout_secs")?,
            // api_versions is configured via file only
            api_versions: None,
        })
    }

    /// Build a Config from CLI values.
    pub fn from_args(args: &Args) -> Self {
        let cli = |flag: &str, v: &String| ParsedProperty::Cli(v.clone(), format!("--{}", flag));
        Self {
            organization: args.organization.as_ref().map(|v| cli("organization", v)),
            pat: args
                .pat
                .as_ref()
                .map(|v| cli("pat", v).map(SecretString::from)),
            base_url: args.base_url.as_ref().map(|v| cli("base-url", v)),
            host: args.host.as_ref().map(|v| cli("host", v)),
            port: args
                .port
                .map(|v| ParsedProperty::Cli(v, "--port".to_string())),
            request_timeout_secs: args
                .request_timeout_secs
                .map(|v| ParsedProperty::Cli(v, "--request-timeout-secs".to_string())),
            api_versions: None,
        }
    }

    /// Merge this config with another, preferring values from other when they exist
    pub fn merge(self, other: Self) -> Self {
        Self {
            organization: other.organization.or(self.organization),
            pat: other.pat.or(self.pat),
            base_url: other.base_url.or(self.base_url),
            host: other.host.or(self.host),
            port: other.port.or(self.port),
            request_timeout_secs: other.request_timeout_secs.or(self.request_timeout_secs),
            api_versions: other.api_versions.or(self.api_versions),
        }
    }

    /// Lists where each configured value came from, for the startup log.
    /// Values themselves are not included.
    pub fn describe_sources(&self) -> Vec<(&'static str, String)> {
        fn origin<T>(p: &Option<ParsedProperty<T>>) -> String {
            p.as_ref()
                .map(ParsedProperty::origin)
                .unwrap_or_else(|| "unset".to_string())
        }

        vec![
            ("organization", origin(&self.organization)),
            ("pat", origin(&self.pat)),
            ("base_url", origin(&self.base_url)),
            ("host", origin(&self.host)),
            ("port", origin(&self.port)),
            ("request_timeout_secs", origin(&self.request_timeout_secs)),
            ("api_versions", origin(&self.api_versions)),
        ]
    }

    /// Validates the merged configuration and produces the runtime settings.
    pub fn resolve(self) -> Result<RelayConfig, ConfigError> {
        let organization = self
            .organization
            .map(ParsedProperty::into_value)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| missing("organization"))?;

        let pat = self
            .pat
            .map(ParsedProperty::into_value)
            .filter(|v| !v.expose_secret().trim().is_empty())
            .ok_or_else(|| missing("pat"))?;

        let raw_base_url = self
            .base_url
            .map(ParsedProperty::into_value)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = parse_base_url(&raw_base_url)?;

        let request_timeout_secs = self
            .request_timeout_secs
            .map(ParsedProperty::into_value)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT.as_secs());
        if request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout_secs".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }

        Ok(RelayConfig {
            organization,
            pat,
            base_url,
            host: self
                .host
                .map(ParsedProperty::into_value)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: self
                .port
                .map(ParsedProperty::into_value)
                .unwrap_or(DEFAULT_PORT),
            request_timeout: Duration::from_secs(request_timeout_secs),
            api_versions: self
                .api_versions
                .map(ParsedProperty::into_value)
                .unwrap_or_default(),
        })
    }

    /// Location of the configuration file: `$XDG_CONFIG_HOME/devops-relay/config.toml`,
    /// falling back to `~/.config`.
    pub fn default_config_path() -> Option<PathBuf> {
        let config_dir = std::env::var_os("XDG_CONFIG_HOME")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))?;
        Some(config_dir.join("devops-relay").join("config.toml"))
    }

    /// Writes a commented sample config file.
    ///
    /// Returns the path and whether a file was written; an existing file is
    /// never overwritten.
    pub fn create_sample_config(path: Option<&Path>) -> Result<(PathBuf, bool)> {
        let config_path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::default_config_path()
                .context("Could not determine the configuration directory")?,
        };

        if config_path.exists() {
            return Ok((config_path, false));
        }

        if let Some(parent) = config_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        fs::write(&config_path, SAMPLE_CONFIG).with_context(|| {
            format!(
                "Failed to write sample config to: {}",
                config_path.display()
            )
        })?;

        Ok((config_path, true))
    }
}

const SAMPLE_CONFIG: &str = r#"# devops-relay configuration file
# Location: ~/.config/devops-relay/config.toml (or $XDG_CONFIG_HOME/devops-relay/config.toml)
# Every value can be overridden by a DEVOPS_RELAY_* environment variable or a CLI flag.

# Azure DevOps organization (required)
# organization = "your-organization"

# Personal Access Token (required, prefer the DEVOPS_RELAY_PAT environment variable)
# pat = "your-pat-token"

# Azure DevOps REST endpoint
base_url = "https://dev.azure.com/"

# Address and port of the HTTP server
host = "0.0.0.0"
port = 8080

# Timeout applied to each upstream request, in seconds
request_timeout_secs = 30

# api-version sent with each upstream call
[api_versions]
projects = "5.1"
teams = "5.0"
members = "5.1"
iterations = "5.1"
wiql = "5.1"
work_items = "5.1"
"#;

/// Fully resolved runtime settings.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub organization: String,
    pub pat: SecretString,
    pub base_url: Url,
    pub host: String,
    pub port: u16,
    pub request_timeout: Duration,
    pub api_versions: ApiVersions,
}

impl RelayConfig {
    /// `host:port` in a form accepted by `TcpListener::bind`; IPv6 hosts are
    /// bracketed.
    pub fn bind_address(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

/// `DEVOPS_RELAY_<FIELD>` for a config key.
pub fn env_var_name(field: &str) -> String {
    format!("{}{}", ENV_PREFIX, field.to_ascii_uppercase())
}

fn missing(field: &str) -> ConfigError {
    ConfigError::MissingRequired {
        field: field.to_string(),
        env_var: env_var_name(field),
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |message: String| ConfigError::InvalidValue {
        field: "base_url".to_string(),
        message,
    };

    let url = Url::parse(raw.trim()).map_err(|e| invalid(format!("'{}': {}", raw, e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("'{}' must use http or https", raw)));
    }
    if url.cannot_be_a_base() {
        return Err(invalid(format!("'{}' cannot be used as a base URL", raw)));
    }
    Ok(url)
}

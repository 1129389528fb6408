//! CLI configuration.
//!
//! Read from TOML (`~/.config/mesh-client/config.toml` unless `--config` is
//! given), then overridden by `MESH_*` environment variables.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, bail};
use mesh_client::{ClientConfig, Credentials, IdentityFiles, TlsConfig};
use serde::{Deserialize, Serialize};

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Exchange service base URL.
    #[serde(default = "default_url")]
    pub url: String,

    /// Sandbox mode skips server certificate verification.
    #[serde(default = "default_true")]
    pub sandbox: bool,

    #[serde(default)]
    pub mailbox_id: String,

    #[serde(default)]
    pub mailbox_password: String,

    #[serde(default)]
    pub shared_key: String,

    /// Client certificate, PEM.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cert_location: Option<PathBuf>,

    /// Client private key, PEM.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_location: Option<PathBuf>,

    /// Extra trusted CA, PEM.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_location: Option<PathBuf>,

    #[serde(default = "default_workflow_id")]
    pub workflow_id: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Upload chunk size in bytes.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

fn default_url() -> String {
    mesh_client::config::DEFAULT_BASE_URL.into()
}

fn default_true() -> bool {
    true
}

fn default_workflow_id() -> String {
    "API-DOCS-TEST".into()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_chunk_size() -> usize {
    mesh_client::config::DEFAULT_CHUNK_SIZE
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: default_url(),
            sandbox: default_true(),
            mailbox_id: String::new(),
            mailbox_password: String::new(),
            shared_key: String::new(),
            cert_location: None,
            key_location: None,
            ca_location: None,
            workflow_id: default_workflow_id(),
            timeout_secs: default_timeout_secs(),
            chunk_size: default_chunk_size(),
        }
    }
}

impl Config {
    /// Loads the file (if any) and applies the process environment.
    ///
    /// An explicit `path` must exist; the default path is optional.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let path = config_path();
                if path.exists() {
                    Self::from_file(&path)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Overrides fields from `MESH_*` variables returned by `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<()> {
        if let Some(v) = lookup("MESH_URL") {
            self.url = v;
        }
        if let Some(v) = lookup("MESH_SANDBOX") {
            self.sandbox = parse_bool(&v).with_context(|| format!("MESH_SANDBOX={v:?}"))?;
        }
        if let Some(v) = lookup("MESH_MAILBOX_ID") {
            self.mailbox_id = v;
        }
        if let Some(v) = lookup("MESH_MAILBOX_PASSWORD") {
            self.mailbox_password = v;
        }
        if let Some(v) = lookup("MESH_SHARED_KEY") {
            self.shared_key = v;
        }
        if let Some(v) = lookup("MESH_CERT_LOCATION") {
            self.cert_location = Some(v.into());
        }
        if let Some(v) = lookup("MESH_KEY_LOCATION") {
            self.key_location = Some(v.into());
        }
        if let Some(v) = lookup("MESH_CA_LOCATION") {
            self.ca_location = Some(v.into());
        }
        Ok(())
    }

    pub fn credentials(&self) -> anyhow::Result<Credentials> {
        Credentials::new(
            self.mailbox_id.as_str(),
            self.mailbox_password.as_str(),
            self.shared_key.as_str(),
        )
        .context("incomplete mailbox credentials")
    }

    pub fn client_config(&self) -> anyhow::Result<ClientConfig> {
        let identity = match (&self.cert_location, &self.key_location) {
            (Some(cert), Some(key)) => Some(IdentityFiles {
                cert: cert.clone(),
                key: key.clone(),
            }),
            (None, None) => None,
            _ => bail!("client certificate and key must be configured together"),
        };

        Ok(ClientConfig {
            base_url: self.url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            chunk_size: self.chunk_size,
            tls: TlsConfig {
                accept_invalid_certs: self.sandbox,
                identity,
                ca_cert: self.ca_location.clone(),
            },
            ..ClientConfig::default()
        })
    }
}

fn parse_bool(value: &str) -> anyhow::Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => bail!("expected a boolean"),
    }
}

/// Returns the default configuration file path.
pub fn config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        PathBuf::from(appdata).join("mesh-client").join("config.toml")
    }

    #[cfg(not(target_os = "windows"))]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        PathBuf::from(home)
            .join(".config")
            .join("mesh-client")
            .join("config.toml")
    }
}

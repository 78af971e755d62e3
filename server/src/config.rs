use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Serve HTTPS with a self-signed certificate generated at startup
    #[serde(default = "default_tls")]
    pub tls: bool,

    #[serde(default = "default_tls_subject_alt_names")]
    pub tls_subject_alt_names: Vec<String>,

    /// PKCS#8 PEM; generated on first start when missing
    #[serde(default = "default_private_key_path")]
    pub private_key_path: String,

    /// username -> password accepted by the login endpoint
    #[serde(default)]
    pub accounts: HashMap<String, String>,

    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log directory for file-based logging; stderr when unset
    pub log_dir: Option<String>,

    #[serde(default = "default_log_file")]
    pub log_file: String,
}

fn default_listen_addr() -> String {
    "127.0.0.1:8443".to_string()
}

fn default_tls() -> bool {
    true
}

fn default_tls_subject_alt_names() -> Vec<String> {
    vec!["localhost".to_string(), "127.0.0.1".to_string()]
}

fn default_private_key_path() -> String {
    "keys/private.pem".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "key-server.log".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            tls: default_tls(),
            tls_subject_alt_names: default_tls_subject_alt_names(),
            private_key_path: default_private_key_path(),
            accounts: HashMap::new(),
            log_level: default_log_level(),
            log_dir: None,
            log_file: default_log_file(),
        }
    }
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut usernames: Vec<&String> = self.accounts.keys().collect();
        usernames.sort();
        f.debug_struct("ServerConfig")
            .field("listen_addr", &self.listen_addr)
            .field("tls", &self.tls)
            .field("tls_subject_alt_names", &self.tls_subject_alt_names)
            .field("private_key_path", &self.private_key_path)
            .field("accounts", &usernames)
            .field("log_level", &self.log_level)
            .field("log_dir", &self.log_dir)
            .field("log_file", &self.log_file)
            .finish()
    }
}

impl ServerConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config: {}", e))?;
        Ok(config)
    }

    pub fn load_or_default<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}

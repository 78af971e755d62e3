use crate::error::{LoginError, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// `https` unless talking to a plain HTTP development server
    #[serde(default = "default_scheme")]
    pub scheme: String,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_public_key_path")]
    pub public_key_path: String,

    #[serde(default = "default_login_path")]
    pub login_path: String,

    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,

    /// Validate the server certificate chain. Disable only for self-signed
    /// development endpoints.
    #[serde(default = "default_verify_tls")]
    pub verify_tls: bool,

    /// Deadline for each of the two HTTP requests
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log directory for file-based logging; stderr when unset
    pub log_dir: Option<String>,

    /// Log file name for file-based logging
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

fn default_scheme() -> String {
    "https".to_string()
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    8443
}

fn default_public_key_path() -> String {
    "/api/public-key".to_string()
}

fn default_login_path() -> String {
    "/api/users/login".to_string()
}

fn default_verify_tls() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "login-client.log".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            scheme: default_scheme(),
            host: default_host(),
            port: default_port(),
            public_key_path: default_public_key_path(),
            login_path: default_login_path(),
            username: String::new(),
            password: String::new(),
            verify_tls: default_verify_tls(),
            timeout_secs: default_timeout_secs(),
            log_level: default_log_level(),
            log_dir: None,
            log_file: default_log_file(),
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("scheme", &self.scheme)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("public_key_path", &self.public_key_path)
            .field("login_path", &self.login_path)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("verify_tls", &self.verify_tls)
            .field("timeout_secs", &self.timeout_secs)
            .field("log_level", &self.log_level)
            .field("log_dir", &self.log_dir)
            .field("log_file", &self.log_file)
            .finish()
    }
}

impl ClientConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: ClientConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load `path` if it exists, defaults otherwise.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.scheme != "https" && self.scheme != "http" {
            return Err(LoginError::Config(format!(
                "Unsupported scheme {:?}, expected https or http",
                self.scheme
            )));
        }
        if self.port == 0 {
            return Err(LoginError::Config("Port must not be 0".to_string()));
        }
        if self.username.trim().is_empty() {
            return Err(LoginError::Config("Username must not be empty".to_string()));
        }
        if self.password.trim().is_empty() {
            return Err(LoginError::Config("Password must not be empty".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(LoginError::Config(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }

        self.public_key_url()?;
        self.login_url()?;
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn public_key_url(&self) -> Result<Url> {
        self.endpoint_url(&self.public_key_path)
    }

    pub fn login_url(&self) -> Result<Url> {
        self.endpoint_url(&self.login_path)
    }

    fn endpoint_url(&self, path: &str) -> Result<Url> {
        if !path.starts_with('/') {
            return Err(LoginError::Config(format!(
                "Endpoint path {:?} must start with '/'",
                path
            )));
        }

        let raw = format!("{}://{}:{}{}", self.scheme, self.host, self.port, path);
        Url::parse(&raw).map_err(|e| LoginError::Config(format!("Invalid endpoint {}: {}", raw, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn valid_config() -> ClientConfig {
        ClientConfig {
            username: "leodoe".to_string(),
            password: "qwerty".to_string(),
            ..ClientConfig::default()
        }
    }

    #[test]
    fn defaults_point_at_local_https_endpoints() {
        let config = valid_config();

        assert!(config.verify_tls);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(
            config.public_key_url().unwrap().as_str(),
            "https://localhost:8443/api/public-key"
        );
        assert_eq!(
            config.login_url().unwrap().as_str(),
            "https://localhost:8443/api/users/login"
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_partial_config_fills_defaults() {
        let content = r#"
host = "auth.internal"
port = 9443
username = "leodoe"
password = "qwerty"
verify_tls = false
"#;
        let file = create_temp_file(content);
        let config = ClientConfig::load(file.path()).unwrap();

        assert_eq!(config.host, "auth.internal");
        assert_eq!(config.port, 9443);
        assert!(!config.verify_tls);
        assert_eq!(config.scheme, "https");
        assert_eq!(config.login_path, "/api/users/login");
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn shipped_example_config_parses() {
        let config: ClientConfig =
            toml::from_str(include_str!("../../config/login-client.toml")).unwrap();
        assert_eq!(config.username, "leodoe");
        assert!(config.verify_tls);
    }

    #[test]
    fn load_or_default_without_file() {
        let config = ClientConfig::load_or_default("/nonexistent/path/login-client.toml").unwrap();
        assert_eq!(config.host, "localhost");
        assert!(config.username.is_empty());
    }

    #[test]
    fn parse_invalid_toml_returns_error() {
        let file = create_temp_file("this is not valid toml {{{");
        assert!(ClientConfig::load(file.path()).is_err());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let original = valid_config();
        let file = NamedTempFile::new().unwrap();
        original.save(file.path()).unwrap();

        let loaded = ClientConfig::load(file.path()).unwrap();
        assert_eq!(loaded.username, "leodoe");
        assert_eq!(loaded.password, "qwerty");
        assert_eq!(loaded.port, 8443);
    }

    #[test]
    fn validate_rejects_incomplete_config() {
        let mut config = valid_config();
        config.username = "  ".to_string();
        assert!(matches!(config.validate(), Err(LoginError::Config(_))));

        let mut config = valid_config();
        config.password.clear();
        assert!(matches!(config.validate(), Err(LoginError::Config(_))));

        let mut config = valid_config();
        config.scheme = "ftp".to_string();
        assert!(matches!(config.validate(), Err(LoginError::Config(_))));

        let mut config = valid_config();
        config.timeout_secs = 0;
        assert!(matches!(config.validate(), Err(LoginError::Config(_))));

        let mut config = valid_config();
        config.login_path = "api/users/login".to_string();
        assert!(matches!(config.validate(), Err(LoginError::Config(_))));

        let mut config = valid_config();
        config.host = "bad host".to_string();
        assert!(matches!(config.validate(), Err(LoginError::Config(_))));
    }

    #[test]
    fn debug_output_redacts_password() {
        let rendered = format!("{:?}", valid_config());
        assert!(rendered.contains("leodoe"));
        assert!(!rendered.contains("qwerty"));
    }
}

use clap::Parser;
use login_client::ClientConfig;

#[derive(Parser, Debug)]
#[command(name = "login-client")]
#[command(author, version, about = "Log in with an RSA-encrypted password", long_about = None)]
pub struct CliArgs {
    /// Path to configuration file, defaults are used when it does not exist
    #[arg(short, long, env = "LOGIN_CLIENT_CONFIG", default_value = "login-client.toml")]
    pub config: String,

    /// Override endpoint host
    #[arg(long, env = "LOGIN_CLIENT_HOST")]
    pub host: Option<String>,

    /// Override endpoint port
    #[arg(long, env = "LOGIN_CLIENT_PORT")]
    pub port: Option<u16>,

    /// Override URL scheme (https or http)
    #[arg(long, env = "LOGIN_CLIENT_SCHEME")]
    pub scheme: Option<String>,

    /// Override username
    #[arg(short, long, env = "LOGIN_CLIENT_USERNAME")]
    pub username: Option<String>,

    /// Override password
    #[arg(short, long, env = "LOGIN_CLIENT_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Accept any server certificate, including self-signed ones
    #[arg(long, env = "LOGIN_CLIENT_INSECURE")]
    pub insecure: bool,

    /// Override per-request timeout in seconds
    #[arg(long, env = "LOGIN_CLIENT_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Override log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Override log directory
    #[arg(long)]
    pub log_dir: Option<String>,
}

impl CliArgs {
    pub fn apply_to(self, cfg: &mut ClientConfig) {
        if let Some(host) = self.host {
            cfg.host = host;
        }
        if let Some(port) = self.port {
            cfg.port = port;
        }
        if let Some(scheme) = self.scheme {
            cfg.scheme = scheme;
        }
        if let Some(username) = self.username {
            cfg.username = username;
        }
        if let Some(password) = self.password {
            cfg.password = password;
        }
        if self.insecure {
            cfg.verify_tls = false;
        }
        if let Some(timeout_secs) = self.timeout_secs {
            cfg.timeout_secs = timeout_secs;
        }
        if let Some(log_level) = self.log_level {
            cfg.log_level = log_level;
        }
        if let Some(log_dir) = self.log_dir {
            cfg.log_dir = Some(log_dir);
        }
    }
}

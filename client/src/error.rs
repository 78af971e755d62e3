use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoginError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Unexpected HTTP status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Key parse error: {0}")]
    KeyParse(String),

    #[error("Encryption error: {0}")]
    Encryption(String),

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl LoginError {
    /// Stable label for the stderr error line.
    pub fn kind(&self) -> &'static str {
        match self {
            LoginError::Network(_) => "network",
            LoginError::Timeout(_) => "timeout",
            LoginError::HttpStatus { .. } => "http_status",
            LoginError::KeyParse(_) => "key_parse",
            LoginError::Encryption(_) => "encryption",
            LoginError::Encoding(_) => "encoding",
            LoginError::Config(_) => "config",
        }
    }
}

impl From<common::Error> for LoginError {
    fn from(e: common::Error) -> Self {
        match e {
            common::Error::KeyParse(msg) | common::Error::KeyGeneration(msg) => {
                LoginError::KeyParse(msg)
            }
            common::Error::Encryption(msg) | common::Error::Decryption(msg) => {
                LoginError::Encryption(msg)
            }
            common::Error::Encoding(msg) => LoginError::Encoding(msg),
            common::Error::Base64Decode(e) => LoginError::Encoding(e.to_string()),
        }
    }
}

impl From<reqwest::Error> for LoginError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LoginError::Timeout(e.to_string())
        } else {
            LoginError::Network(e.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, LoginError>;

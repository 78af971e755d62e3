use crate::error::Result;
use common::EncryptedCredential;
use common::crypto::validate_transport_text;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Username and plaintext password for a single run.
#[derive(Clone)]
pub struct Credential {
    username: String,
    password: String,
}

impl Credential {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// JSON body of the login call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(username: &str, encrypted: &EncryptedCredential) -> Result<Self> {
        validate_transport_text(encrypted.as_str())?;

        Ok(Self {
            username: username.to_string(),
            password: encrypted.as_str().to_string(),
        })
    }
}

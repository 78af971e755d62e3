//! Encrypted-password login client.
//!
//! Fetches the server's RSA public key, encrypts the password under it with
//! PKCS#1 v1.5 padding and posts `{username, password}` to the login endpoint.

pub mod config;
pub mod credential;
pub mod encryptor;
pub mod error;
pub mod flow;
pub mod key_fetcher;
pub mod login_submitter;
pub mod transport;

pub use config::ClientConfig;
pub use credential::{Credential, LoginRequest};
pub use encryptor::{PasswordEncryptor, RsaPkcs1Encryptor};
pub use error::{LoginError, Result};
pub use flow::{LoginFlow, LoginOutcome, RunState, Stage};
pub use key_fetcher::{HttpKeyFetcher, PublicKeySource};
pub use login_submitter::{HttpLoginSubmitter, LoginResponse, LoginSink};

/// Wire the HTTP implementations together from `config` and run one login.
pub async fn run_login(config: &ClientConfig) -> Result<LoginOutcome> {
    config.validate()?;

    let client = transport::build_http_client(config)?;
    let fetcher = HttpKeyFetcher::from_config(client.clone(), config)?;
    let submitter = HttpLoginSubmitter::from_config(client, config)?;
    let credential = Credential::new(config.username.clone(), config.password.clone());

    LoginFlow::new(fetcher, RsaPkcs1Encryptor, submitter)
        .run(&credential)
        .await
}

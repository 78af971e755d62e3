//! The fetch, encrypt, submit sequence.
//!
//! Each step consumes the previous step's output, so the run is strictly
//! sequential and any failure ends it. Nothing is retried.

use crate::credential::{Credential, LoginRequest};
use crate::encryptor::PasswordEncryptor;
use crate::error::{LoginError, Result};
use crate::key_fetcher::PublicKeySource;
use crate::login_submitter::{LoginResponse, LoginSink};
use common::{EncryptedCredential, PublicKeyMaterial};
use std::fmt;
use tracing::{debug, error, info};

/// Step of a run that can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetching,
    Encrypting,
    Submitting,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Fetching => write!(f, "fetching"),
            Stage::Encrypting => write!(f, "encrypting"),
            Stage::Submitting => write!(f, "submitting"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Fetching,
    Encrypting,
    Submitting,
    Done,
    /// Absorbing; records the step that failed.
    Failed(Stage),
}

/// Everything a successful run produced.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub public_key: PublicKeyMaterial,
    pub encrypted: EncryptedCredential,
    pub response: LoginResponse,
}

pub struct LoginFlow<F, E, S> {
    fetcher: F,
    encryptor: E,
    sink: S,
    state: RunState,
}

impl<F, E, S> LoginFlow<F, E, S>
where
    F: PublicKeySource,
    E: PasswordEncryptor,
    S: LoginSink,
{
    pub fn new(fetcher: F, encryptor: E, sink: S) -> Self {
        Self {
            fetcher,
            encryptor,
            sink,
            state: RunState::Fetching,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Run one login attempt. Calling it again makes another attempt.
    pub async fn run(&mut self, credential: &Credential) -> Result<LoginOutcome> {
        self.transition(RunState::Fetching);
        let public_key = match self.fetcher.fetch_public_key().await {
            Ok(public_key) => public_key,
            Err(e) => return Err(self.fail(Stage::Fetching, e)),
        };

        self.transition(RunState::Encrypting);
        let encrypted = match self.encryptor.encrypt(credential.password(), &public_key) {
            Ok(encrypted) => encrypted,
            Err(e) => return Err(self.fail(Stage::Encrypting, e.into())),
        };
        debug!("Encrypted password: {}", encrypted.as_str());

        let request = match LoginRequest::new(credential.username(), &encrypted) {
            Ok(request) => request,
            Err(e) => return Err(self.fail(Stage::Encrypting, e)),
        };

        self.transition(RunState::Submitting);
        let response = match self.sink.submit(&request).await {
            Ok(response) => response,
            Err(e) => return Err(self.fail(Stage::Submitting, e)),
        };

        self.transition(RunState::Done);
        info!("Login for {} completed", credential.username());

        Ok(LoginOutcome {
            public_key,
            encrypted,
            response,
        })
    }

    fn transition(&mut self, next: RunState) {
        debug!("Login run: {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    fn fail(&mut self, stage: Stage, e: LoginError) -> LoginError {
        error!("Login run failed while {}: {}", stage, e);
        self.state = RunState::Failed(stage);
        e
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encryptor::RsaPkcs1Encryptor;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const TEST_PUBLIC_PEM: &str = include_str!("../../common/tests/fixtures/test_public.pem");
    const TEST_PRIVATE_PEM: &str = include_str!("../../common/tests/fixtures/test_private.pem");

    struct StaticKey(std::result::Result<String, u16>);

    #[async_trait]
    impl PublicKeySource for StaticKey {
        async fn fetch_public_key(&self) -> Result<PublicKeyMaterial> {
            match &self.0 {
                Ok(pem) => Ok(PublicKeyMaterial::new(pem.clone())),
                Err(status) => Err(LoginError::HttpStatus {
                    status: *status,
                    body: "unavailable".to_string(),
                }),
            }
        }
    }

    #[derive(Default, Clone)]
    struct CountingEncryptor {
        calls: Arc<AtomicUsize>,
    }

    impl PasswordEncryptor for CountingEncryptor {
        fn encrypt(
            &self,
            password: &str,
            key: &PublicKeyMaterial,
        ) -> common::Result<EncryptedCredential> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            RsaPkcs1Encryptor.encrypt(password, key)
        }
    }

    #[derive(Default, Clone)]
    struct RecordingSink {
        requests: Arc<Mutex<Vec<LoginRequest>>>,
        reject_with: Option<u16>,
    }

    #[async_trait]
    impl LoginSink for RecordingSink {
        async fn submit(&self, request: &LoginRequest) -> Result<LoginResponse> {
            self.requests.lock().push(request.clone());
            match self.reject_with {
                Some(status) => Err(LoginError::HttpStatus {
                    status,
                    body: "Invalid username or password".to_string(),
                }),
                None => Ok(LoginResponse {
                    status: 200,
                    body: "token".to_string(),
                }),
            }
        }
    }

    fn credential() -> Credential {
        Credential::new("leodoe", "qwerty")
    }

    #[tokio::test]
    async fn successful_run_reaches_done() {
        let encryptor = CountingEncryptor::default();
        let sink = RecordingSink::default();
        let mut flow = LoginFlow::new(
            StaticKey(Ok(TEST_PUBLIC_PEM.to_string())),
            encryptor.clone(),
            sink.clone(),
        );

        let outcome = flow.run(&credential()).await.unwrap();

        assert_eq!(flow.state(), RunState::Done);
        assert_eq!(encryptor.calls.load(Ordering::SeqCst), 1);
        assert_eq!(outcome.response.body, "token");

        let requests = sink.requests.lock();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].username, "leodoe");
        assert_eq!(requests[0].password, outcome.encrypted.as_str());

        let private_key = common::crypto::parse_private_key(TEST_PRIVATE_PEM).unwrap();
        let password = common::crypto::decrypt_password(&private_key, &requests[0].password);
        assert_eq!(password.unwrap(), "qwerty");
    }

    #[tokio::test]
    async fn key_fetch_failure_skips_encryption_and_submission() {
        let encryptor = CountingEncryptor::default();
        let sink = RecordingSink::default();
        let mut flow = LoginFlow::new(StaticKey(Err(503)), encryptor.clone(), sink.clone());

        let result = flow.run(&credential()).await;

        assert!(matches!(result, Err(LoginError::HttpStatus { status: 503, .. })));
        assert_eq!(flow.state(), RunState::Failed(Stage::Fetching));
        assert_eq!(encryptor.calls.load(Ordering::SeqCst), 0);
        assert!(sink.requests.lock().is_empty());
    }

    #[tokio::test]
    async fn malformed_key_skips_submission() {
        let truncated = TEST_PUBLIC_PEM[..100].to_string();
        for pem in [String::new(), truncated] {
            let sink = RecordingSink::default();
            let mut flow = LoginFlow::new(StaticKey(Ok(pem)), RsaPkcs1Encryptor, sink.clone());

            let result = flow.run(&credential()).await;

            assert!(matches!(result, Err(LoginError::KeyParse(_))));
            assert_eq!(flow.state(), RunState::Failed(Stage::Encrypting));
            assert!(sink.requests.lock().is_empty());
        }
    }

    #[tokio::test]
    async fn oversized_password_fails_encryption() {
        let sink = RecordingSink::default();
        let mut flow = LoginFlow::new(
            StaticKey(Ok(TEST_PUBLIC_PEM.to_string())),
            RsaPkcs1Encryptor,
            sink.clone(),
        );

        let result = flow.run(&Credential::new("leodoe", "x".repeat(300))).await;

        assert!(matches!(result, Err(LoginError::Encryption(_))));
        assert_eq!(flow.state(), RunState::Failed(Stage::Encrypting));
        assert!(sink.requests.lock().is_empty());
    }

    #[tokio::test]
    async fn rejected_login_fails_in_submitting() {
        let sink = RecordingSink {
            reject_with: Some(401),
            ..RecordingSink::default()
        };
        let mut flow = LoginFlow::new(
            StaticKey(Ok(TEST_PUBLIC_PEM.to_string())),
            RsaPkcs1Encryptor,
            sink.clone(),
        );

        let result = flow.run(&credential()).await;

        assert!(matches!(result, Err(LoginError::HttpStatus { status: 401, .. })));
        assert_eq!(flow.state(), RunState::Failed(Stage::Submitting));
        assert_eq!(sink.requests.lock().len(), 1);
    }

    #[tokio::test]
    async fn repeated_runs_submit_repeatedly() {
        let sink = RecordingSink::default();
        let mut flow = LoginFlow::new(
            StaticKey(Ok(TEST_PUBLIC_PEM.to_string())),
            RsaPkcs1Encryptor,
            sink.clone(),
        );

        let first = flow.run(&credential()).await.unwrap();
        let second = flow.run(&credential()).await.unwrap();

        assert_eq!(sink.requests.lock().len(), 2);
        assert_ne!(first.encrypted.ciphertext(), second.encrypted.ciphertext());
    }
}

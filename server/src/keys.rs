use anyhow::{Context, Result};
use common::crypto;
use rsa::{RsaPrivateKey, RsaPublicKey};
use std::fs;
use std::path::Path;
use tracing::info;

/// The server's RSA key pair.
pub struct ServerKeys {
    private_key: RsaPrivateKey,
    public_key: RsaPublicKey,
}

impl ServerKeys {
    pub fn from_private_key_pem(pem: &str) -> Result<Self> {
        let private_key = crypto::parse_private_key(pem)?;
        let public_key = private_key.to_public_key();

        Ok(Self {
            private_key,
            public_key,
        })
    }

    /// Read the private key at `path`, generating and saving a new pair when
    /// the file does not exist.
    pub fn load_or_generate<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let pem = fs::read_to_string(path)
                .with_context(|| format!("Failed to read private key {}", path.display()))?;
            return Self::from_private_key_pem(&pem);
        }

        info!("Generating RSA key pair...");
        let (public_pem, private_pem) = crypto::generate_rsa_keypair(crypto::RSA_KEY_SIZE)?;
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, &private_pem)?;
        fs::write(path.with_extension("pub.pem"), &public_pem)?;
        info!("RSA keys generated and saved to {}", path.display());

        Self::from_private_key_pem(&private_pem)
    }

    pub fn private_key(&self) -> &RsaPrivateKey {
        &self.private_key
    }

    pub fn public_key(&self) -> &RsaPublicKey {
        &self.public_key
    }

    pub fn public_key_pem(&self) -> common::Result<String> {
        crypto::public_key_to_pem(&self.public_key)
    }
}

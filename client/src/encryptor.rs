use common::crypto;
use common::{EncryptedCredential, PublicKeyMaterial};

/// Turns a plaintext password into transport-ready ciphertext.
pub trait PasswordEncryptor: Send + Sync {
    fn encrypt(
        &self,
        password: &str,
        key: &PublicKeyMaterial,
    ) -> common::Result<EncryptedCredential>;
}

/// RSA with PKCS#1 v1.5 padding, base64 encoded.
#[derive(Debug, Clone, Copy, Default)]
pub struct RsaPkcs1Encryptor;

impl PasswordEncryptor for RsaPkcs1Encryptor {
    fn encrypt(
        &self,
        password: &str,
        key: &PublicKeyMaterial,
    ) -> common::Result<EncryptedCredential> {
        crypto::encrypt_password(password, key)
    }
}

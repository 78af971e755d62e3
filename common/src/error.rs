use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Key parse error: {0}")]
    KeyParse(String),

    #[error("Encryption error: {0}")]
    Encryption(String),

    #[error("Decryption error: {0}")]
    Decryption(String),

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Key generation error: {0}")]
    KeyGeneration(String),

    #[error("Base64 decode error: {0}")]
    Base64Decode(#[from] base64::DecodeError),
}

pub type Result<T> = std::result::Result<T, Error>;

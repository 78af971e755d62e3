//! Development counterpart of the login endpoints.
//!
//! Serves the RSA public key and decrypts the password of incoming login
//! requests with the matching private key. Listens on HTTPS with a
//! self-signed certificate unless TLS is turned off.

pub mod api;
pub mod config;
pub mod keys;
pub mod tls;

pub use api::{AppState, LoginSuccess, router, serve, start_server};
pub use config::ServerConfig;
pub use keys::ServerKeys;

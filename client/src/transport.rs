use crate::config::ClientConfig;
use crate::error::{LoginError, Result};
use tracing::warn;

/// Build the HTTP client shared by the key fetch and the login call.
pub fn build_http_client(config: &ClientConfig) -> Result<reqwest::Client> {
    if !config.verify_tls {
        warn!(
            "TLS certificate verification is disabled, any server certificate will be accepted"
        );
    }

    reqwest::Client::builder()
        .timeout(config.timeout())
        .connect_timeout(config.timeout())
        .danger_accept_invalid_certs(!config.verify_tls)
        .build()
        .map_err(|e| LoginError::Config(format!("Failed to build HTTP client: {}", e)))
}

/// Read the body of `response`, failing on any non-2xx status.
///
/// The status of a failed request is kept even when its body cannot be read.
pub(crate) async fn success_body(response: reqwest::Response) -> Result<(u16, String)> {
    let status = response.status();
    if !status.is_success() {
        return Err(LoginError::HttpStatus {
            status: status.as_u16(),
            body: response.text().await.unwrap_or_default(),
        });
    }

    let body = response.text().await?;
    Ok((status.as_u16(), body))
}

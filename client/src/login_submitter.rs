use crate::config::ClientConfig;
use crate::credential::LoginRequest;
use crate::error::Result;
use crate::transport::success_body;
use async_trait::async_trait;
use reqwest::Url;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use tracing::{debug, info, instrument};

/// Successful answer of the login endpoint.
///
/// The body is kept as text: the server may answer JSON or a bare token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginResponse {
    pub status: u16,
    pub body: String,
}

impl LoginResponse {
    pub fn json(&self) -> Option<serde_json::Value> {
        serde_json::from_str(&self.body).ok()
    }

    /// Body formatted for display, pretty-printed when it is JSON.
    pub fn render(&self) -> String {
        self.json()
            .and_then(|value| serde_json::to_string_pretty(&value).ok())
            .unwrap_or_else(|| self.body.clone())
    }
}

#[async_trait]
pub trait LoginSink: Send + Sync {
    async fn submit(&self, request: &LoginRequest) -> Result<LoginResponse>;
}

/// Single POST against the login endpoint.
pub struct HttpLoginSubmitter {
    client: reqwest::Client,
    url: Url,
}

impl HttpLoginSubmitter {
    pub fn new(client: reqwest::Client, url: Url) -> Self {
        Self { client, url }
    }

    pub fn from_config(client: reqwest::Client, config: &ClientConfig) -> Result<Self> {
        Ok(Self::new(client, config.login_url()?))
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl LoginSink for HttpLoginSubmitter {
    #[instrument(skip(self, request), fields(url = %self.url, username = %request.username))]
    async fn submit(&self, request: &LoginRequest) -> Result<LoginResponse> {
        debug!("Submitting login request");

        let response = self
            .client
            .post(self.url.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json, text/plain")
            .json(request)
            .send()
            .await?;
        let (status, body) = success_body(response).await?;

        info!("Login accepted with status {}", status);
        Ok(LoginResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_pretty_prints_json() {
        let response = LoginResponse {
            status: 200,
            body: r#"{"token":"abc"}"#.to_string(),
        };
        assert_eq!(response.json().unwrap()["token"], "abc");
        assert_eq!(response.render(), "{\n  \"token\": \"abc\"\n}");
    }

    #[test]
    fn render_keeps_plain_token() {
        let response = LoginResponse {
            status: 200,
            body: "eyJhbGciOiJIUzI1NiJ9.payload.sig".to_string(),
        };
        assert!(response.json().is_none());
        assert_eq!(response.render(), response.body);
    }
}

use crate::config::ClientConfig;
use crate::error::Result;
use crate::transport::success_body;
use async_trait::async_trait;
use common::PublicKeyMaterial;
use reqwest::Url;
use tracing::{debug, info, instrument, trace};

/// Where the run gets its encryption key from.
#[async_trait]
pub trait PublicKeySource: Send + Sync {
    async fn fetch_public_key(&self) -> Result<PublicKeyMaterial>;
}

/// Single GET against the public key endpoint.
pub struct HttpKeyFetcher {
    client: reqwest::Client,
    url: Url,
}

impl HttpKeyFetcher {
    pub fn new(client: reqwest::Client, url: Url) -> Self {
        Self { client, url }
    }

    pub fn from_config(client: reqwest::Client, config: &ClientConfig) -> Result<Self> {
        Ok(Self::new(client, config.public_key_url()?))
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl PublicKeySource for HttpKeyFetcher {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch_public_key(&self) -> Result<PublicKeyMaterial> {
        debug!("Requesting public key");

        let response = self.client.get(self.url.clone()).send().await?;
        let (status, body) = success_body(response).await?;

        info!("Received public key ({} bytes, status {})", body.len(), status);
        trace!("Public key PEM:\n{}", body);

        Ok(PublicKeyMaterial::new(body.trim()))
    }
}

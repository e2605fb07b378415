use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use super::config::{
    PASSKEY_ASSERTION_BEGIN_PATH, PASSKEY_ASSERTION_FINISH_PATH, PASSKEY_CAPABILITY_PATH,
    PASSKEY_REGISTER_BEGIN_PATH, PASSKEY_REGISTER_FINISH_PATH, PASSKEY_REQUEST_TIMEOUT,
};
use super::errors::RelyingPartyError;
use super::types::{CapabilityResponse, EncodedAttestation, RemovalRequest};

/// The remote relying-party contract: one capability read plus the begin and
/// finish calls of the two ceremonies, all over an authenticated transport.
///
/// The begin calls return raw JSON; decoding the binary-bearing fields is the
/// transform module's job, not the transport's.
#[async_trait]
pub trait RelyingParty: Send + Sync {
    /// Whether the active account currently has a registered resident credential.
    async fn capability(&self) -> Result<bool, RelyingPartyError>;

    /// Fetch server-issued options for a registration ceremony.
    async fn begin_registration(&self) -> Result<Value, RelyingPartyError>;

    /// Submit the encoded attestation response to finalize registration.
    async fn finish_registration(
        &self,
        response: &EncodedAttestation,
    ) -> Result<(), RelyingPartyError>;

    /// Fetch server-issued options for an assertion ceremony.
    async fn begin_assertion(&self) -> Result<Value, RelyingPartyError>;

    /// Submit the encoded assertion plus the original challenge to remove the
    /// registered credential.
    async fn finish_assertion(&self, request: &RemovalRequest) -> Result<(), RelyingPartyError>;
}

/// reqwest-backed implementation of the relying-party contract.
///
/// Endpoint paths come from the environment (see the module configuration) and
/// are joined onto the base URL. Authentication is the client's concern: pass a
/// preconfigured `reqwest::Client` carrying session cookies or auth headers via
/// [`HttpRelyingParty::with_client`].
pub struct HttpRelyingParty {
    client: Client,
    base: Url,
}

impl HttpRelyingParty {
    /// Build a transport with a fresh client using the configured request timeout.
    pub fn new(base_url: &str) -> Result<Self, RelyingPartyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(*PASSKEY_REQUEST_TIMEOUT))
            .build()
            .map_err(|e| RelyingPartyError::Config(format!("http client: {e}")))?;
        Self::with_client(client, base_url)
    }

    /// Build a transport over a preconfigured client.
    pub fn with_client(client: Client, base_url: &str) -> Result<Self, RelyingPartyError> {
        let mut base = Url::parse(base_url)
            .map_err(|e| RelyingPartyError::Config(format!("base url {base_url}: {e}")))?;
        // Url::join treats a base without a trailing slash as a file and would
        // drop the last path segment
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }
        Ok(Self { client, base })
    }

    fn endpoint(&self, path: &str) -> Result<Url, RelyingPartyError> {
        self.base
            .join(path)
            .map_err(|e| RelyingPartyError::Config(format!("endpoint {path}: {e}")))
    }

    async fn get_json(&self, path: &str) -> Result<Value, RelyingPartyError> {
        let url = self.endpoint(path)?;
        tracing::debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| RelyingPartyError::Network(e.to_string()))?;
        let response = Self::success_or_rejected(response).await?;
        response
            .json()
            .await
            .map_err(|e| RelyingPartyError::Serde(e.to_string()))
    }

    async fn post_for_json(&self, path: &str) -> Result<Value, RelyingPartyError> {
        let url = self.endpoint(path)?;
        tracing::debug!("POST {}", url);
        let response = self
            .client
            .post(url)
            .send()
            .await
            .map_err(|e| RelyingPartyError::Network(e.to_string()))?;
        let response = Self::success_or_rejected(response).await?;
        response
            .json()
            .await
            .map_err(|e| RelyingPartyError::Serde(e.to_string()))
    }

    async fn post_json<T: Serialize + Sync>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<(), RelyingPartyError> {
        let url = self.endpoint(path)?;
        tracing::debug!("POST {}", url);
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| RelyingPartyError::Network(e.to_string()))?;
        Self::success_or_rejected(response).await?;
        Ok(())
    }

    async fn success_or_rejected(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, RelyingPartyError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(RelyingPartyError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl RelyingParty for HttpRelyingParty {
    async fn capability(&self) -> Result<bool, RelyingPartyError> {
        let raw = self.get_json(&PASSKEY_CAPABILITY_PATH).await?;
        let parsed: CapabilityResponse =
            serde_json::from_value(raw).map_err(|e| RelyingPartyError::Serde(e.to_string()))?;
        Ok(parsed.is_enabled)
    }

    async fn begin_registration(&self) -> Result<Value, RelyingPartyError> {
        self.post_for_json(&PASSKEY_REGISTER_BEGIN_PATH).await
    }

    async fn finish_registration(
        &self,
        response: &EncodedAttestation,
    ) -> Result<(), RelyingPartyError> {
        self.post_json(&PASSKEY_REGISTER_FINISH_PATH, response)
            .await
    }

    async fn begin_assertion(&self) -> Result<Value, RelyingPartyError> {
        self.post_for_json(&PASSKEY_ASSERTION_BEGIN_PATH).await
    }

    async fn finish_assertion(&self, request: &RemovalRequest) -> Result<(), RelyingPartyError> {
        self.post_json(&PASSKEY_ASSERTION_FINISH_PATH, request)
            .await
    }
}

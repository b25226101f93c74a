use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::db::{EntityKind, ExportEnvelope, Folder, Prompt};
use crate::error::{Result, VaultError};

/// Body of `POST /import`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportPayload {
    pub prompts: Vec<Prompt>,
    pub folders: Vec<Folder>,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub prompts: Option<u64>,
    #[serde(default)]
    pub folders: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// The authoritative store on the other side of the network.
///
/// Entities travel as JSON values so one object-safe trait covers both
/// collections; the sync layer does the typed decoding.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn list(&self, kind: EntityKind) -> Result<Vec<Value>>;
    async fn create(&self, kind: EntityKind, entity: Value) -> Result<Value>;
    async fn update(&self, kind: EntityKind, id: &str, entity: Value) -> Result<Value>;
    async fn delete(&self, kind: EntityKind, id: &str) -> Result<()>;
    async fn import(&self, payload: &ImportPayload) -> Result<()>;
    async fn export(&self) -> Result<ExportEnvelope>;
    async fn health(&self) -> Result<HealthReport>;
}

/// REST client for the prompt API.
pub struct HttpRemote {
    client: Client,
    base_url: String,
}

impl HttpRemote {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(crate::version::user_agent())
            .build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Base URL with `segments` appended, each percent-encoded as one path segment.
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| VaultError::Http(format!("invalid API URL {}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| VaultError::Http(format!("API URL {} cannot take a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        let url = self.url(segments)?;
        debug!("{} {}", method, url);
        Ok(self.client.request(method, url))
    }

    /// Turn a non-2xx response into `VaultError::Remote`, using `{error}` when present.
    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.error)
            .unwrap_or_else(|_| {
                if body.is_empty() {
                    status.canonical_reason().unwrap_or("request failed").to_string()
                } else {
                    body
                }
            });
        Err(VaultError::Remote { status: status.as_u16(), message })
    }

    async fn send_json<T: serde::de::DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = Self::check(request.send().await?).await?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl RemoteStore for HttpRemote {
    async fn list(&self, kind: EntityKind) -> Result<Vec<Value>> {
        self.send_json(self.request(Method::GET, &[kind.key()])?).await
    }

    async fn create(&self, kind: EntityKind, entity: Value) -> Result<Value> {
        self.send_json(self.request(Method::POST, &[kind.key()])?.json(&entity))
            .await
    }

    async fn update(&self, kind: EntityKind, id: &str, entity: Value) -> Result<Value> {
        self.send_json(self.request(Method::PUT, &[kind.key(), id])?.json(&entity))
            .await
    }

    async fn delete(&self, kind: EntityKind, id: &str) -> Result<()> {
        Self::check(self.request(Method::DELETE, &[kind.key(), id])?.send().await?).await?;
        Ok(())
    }

    async fn import(&self, payload: &ImportPayload) -> Result<()> {
        Self::check(self.request(Method::POST, &["import"])?.json(payload).send().await?).await?;
        Ok(())
    }

    async fn export(&self) -> Result<ExportEnvelope> {
        self.send_json(self.request(Method::GET, &["export"])?).await
    }

    async fn health(&self) -> Result<HealthReport> {
        self.send_json(self.request(Method::GET, &["health"])?).await
    }
}

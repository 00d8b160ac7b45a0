//! Video Intelligence REST API client.
//!
//! Wraps two calls: `videos:annotate`, which starts a long-running
//! operation, and `operations get`, which reports its progress and, once
//! done, the annotation payload. Polled statuses are kept in an in-process
//! registry with a time-based cache.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use gcp_auth::{CustomServiceAccount, TokenProvider};
use reqwest::{Client, StatusCode};
use tokio::sync::RwLock;
use tracing::debug;

use vintel_models::wire::{
    AnnotateVideoProgress, AnnotateVideoRequest, AnnotateVideoResponse, Operation,
};
use vintel_models::{AnnotationKind, AnnotationKindSet, KindProgress, OperationStatus};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::token_cache::TokenCache;

/// Client for the Video Intelligence REST API.
pub struct VideoIntelligenceClient {
    http: Client,
    config: ClientConfig,
    token_cache: Arc<TokenCache>,
    operations: Arc<RwLock<HashMap<String, OperationStatus>>>,
}

impl Clone for VideoIntelligenceClient {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            config: self.config.clone(),
            token_cache: Arc::clone(&self.token_cache),
            operations: Arc::clone(&self.operations),
        }
    }
}

impl VideoIntelligenceClient {
    /// Create a client from a token provider.
    pub fn new(config: ClientConfig, provider: Arc<dyn TokenProvider>) -> ClientResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .user_agent(concat!("vintel-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ClientError::Network)?;

        Ok(Self {
            http,
            config,
            token_cache: Arc::new(TokenCache::new(provider)),
            operations: Arc::new(RwLock::new(HashMap::new())),
        })
    }

    /// Create a client from a service-account JSON file.
    pub fn from_service_account_file(
        config: ClientConfig,
        path: impl AsRef<Path>,
    ) -> ClientResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| ClientError::credentials(format!("{}: {}", path.display(), e)))?;
        let account = CustomServiceAccount::from_json(&json)
            .map_err(|e| ClientError::credentials(format!("{}: {}", path.display(), e)))?;
        Self::new(config, Arc::new(account))
    }

    /// Submit a video URI for annotation.
    ///
    /// Returns the operation name to poll with [`status`](Self::status). The
    /// new operation is registered with an empty progress map.
    pub async fn annotate(&self, uri: &str, kinds: AnnotationKindSet) -> ClientResult<String> {
        if kinds.is_empty() {
            return Err(ClientError::NoKindsRequested);
        }

        let url = format!("{}/v1/videos:annotate", self.config.endpoint);
        let request = AnnotateVideoRequest {
            input_uri: uri.to_string(),
            features: kinds.feature_names(),
        };

        debug!(uri = %uri, kinds = %kinds, "Submitting annotate request");

        let response = self
            .send_authorized(|http, token| http.post(&url).bearer_auth(token).json(&request))
            .await?;
        let operation: Operation = Self::decode_success(response).await?;

        let mut operations = self.operations.write().await;
        operations.insert(
            operation.name.clone(),
            OperationStatus::new(&operation.name, uri, kinds),
        );
        Ok(operation.name)
    }

    /// Fetch the current status of a registered operation.
    ///
    /// Decodes per-kind progress from the operation metadata and, once the
    /// operation is done, the flattened annotation payload. The registry
    /// entry is updated in place and a snapshot returned.
    pub async fn status(&self, name: &str) -> ClientResult<OperationStatus> {
        {
            let operations = self.operations.read().await;
            if !operations.contains_key(name) {
                return Err(ClientError::not_found(name));
            }
        }

        let url = format!("{}/v1/{}", self.config.endpoint, name);
        debug!(operation = name, "Fetching operation status");

        let response = self
            .send_authorized(|http, token| http.get(&url).bearer_auth(token))
            .await?;
        let operation: Operation = Self::decode_success(response).await?;

        if let Some(error) = operation.error {
            return Err(ClientError::Remote {
                code: error.code,
                message: error.message,
            });
        }

        let progress: Option<AnnotateVideoProgress> = operation
            .metadata
            .as_ref()
            .map(|value| serde_json::from_value(value.clone()))
            .transpose()?;
        let payload: Option<AnnotateVideoResponse> = operation
            .response
            .as_ref()
            .map(|value| serde_json::from_value(value.clone()))
            .transpose()?;

        let mut operations = self.operations.write().await;
        let entry = operations
            .get_mut(name)
            .ok_or_else(|| ClientError::not_found(name))?;
        if let Some(progress) = &progress {
            entry.apply_progress(progress);
        }
        if let Some(payload) = &payload {
            entry.apply_response(payload)?;
        }
        entry.mark_refreshed(operation.done);
        Ok(entry.clone())
    }

    /// Return the registered status, refetching when the cached snapshot is
    /// older than the configured cache expiry.
    pub async fn cached_status(&self, name: &str) -> ClientResult<OperationStatus> {
        {
            let operations = self.operations.read().await;
            match operations.get(name) {
                Some(status) if status.is_fresh(self.config.cache_expiry) => {
                    return Ok(status.clone());
                }
                Some(_) => {}
                None => return Err(ClientError::not_found(name)),
            }
        }
        self.status(name).await
    }

    /// Per-kind progress accessor over [`cached_status`](Self::cached_status).
    pub async fn cached_progress(
        &self,
        name: &str,
        kind: AnnotationKind,
    ) -> ClientResult<KindProgress> {
        let status = self.cached_status(name).await?;
        status
            .progress
            .get(&kind)
            .copied()
            .ok_or_else(|| ClientError::not_found(kind.as_str()))
    }

    /// Issue a bearer-authorized request, re-issuing once with a fresh token
    /// when the service rejects an expired one.
    async fn send_authorized<F>(&self, build: F) -> ClientResult<reqwest::Response>
    where
        F: Fn(&Client, &str) -> reqwest::RequestBuilder,
    {
        let token = self.token_cache.get_token().await?;
        let response = build(&self.http, &token).send().await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            let body = response.text().await.unwrap_or_default();
            if Self::is_access_token_expired(&body) {
                self.token_cache.invalidate().await;
                let token = self.token_cache.get_token().await?;
                let response = build(&self.http, &token).send().await?;
                return Ok(response);
            }
            return Err(ClientError::from_http_status(
                StatusCode::UNAUTHORIZED.as_u16(),
                body,
            ));
        }

        Ok(response)
    }

    fn is_access_token_expired(body: &str) -> bool {
        body.contains("ACCESS_TOKEN_EXPIRED") || body.contains("\"UNAUTHENTICATED\"")
    }

    async fn decode_success<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> ClientResult<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::from_http_status(status.as_u16(), body));
        }
        Ok(response.json().await?)
    }
}

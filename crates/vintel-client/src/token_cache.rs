//! OAuth token caching.
//!
//! Tokens obtained from `gcp_auth` are cached with a refresh margin so a
//! token never expires mid-request, refreshed under a write lock so
//! concurrent callers trigger a single refresh, and kept as a fallback when
//! a refresh attempt fails while the old token is still usable.

use std::sync::Arc;
use std::time::{Duration, Instant};

use gcp_auth::TokenProvider;
use tracing::{debug, warn};
use tokio::sync::RwLock;

use crate::error::{ClientError, ClientResult};

/// Refresh tokens this long before their assumed expiry.
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// Assumed token lifetime. OAuth access tokens are typically valid for
/// 60 minutes; 50 keeps a safety margin on top of the refresh margin.
const TOKEN_TTL: Duration = Duration::from_secs(50 * 60);

/// OAuth scope for the Video Intelligence API.
pub const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

impl CachedToken {
    fn is_valid(&self) -> bool {
        Instant::now() + TOKEN_REFRESH_MARGIN < self.expires_at
    }

    fn is_usable(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

/// Thread-safe token cache over a [`TokenProvider`].
pub struct TokenCache {
    provider: Arc<dyn TokenProvider>,
    cache: RwLock<Option<CachedToken>>,
}

impl TokenCache {
    pub fn new(provider: Arc<dyn TokenProvider>) -> Self {
        Self {
            provider,
            cache: RwLock::new(None),
        }
    }

    /// Drop the cached token, forcing a refresh on the next access.
    pub async fn invalidate(&self) {
        *self.cache.write().await = None;
    }

    /// Get a valid access token, refreshing if necessary.
    pub async fn get_token(&self) -> ClientResult<String> {
        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if cached.is_valid() {
                    return Ok(cached.access_token.clone());
                }
            }
        }

        let mut cache = self.cache.write().await;

        // Another task may have refreshed while we waited for the lock
        if let Some(cached) = cache.as_ref() {
            if cached.is_valid() {
                return Ok(cached.access_token.clone());
            }
        }

        match self.provider.token(&[CLOUD_PLATFORM_SCOPE]).await {
            Ok(token) => {
                let access_token = token.as_str().to_string();
                *cache = Some(CachedToken {
                    access_token: access_token.clone(),
                    expires_at: Instant::now() + TOKEN_TTL,
                });
                debug!("Refreshed access token");
                Ok(access_token)
            }
            Err(e) => {
                if let Some(cached) = cache.as_ref() {
                    if cached.is_usable() {
                        warn!("Token refresh failed, reusing existing token: {}", e);
                        return Ok(cached.access_token.clone());
                    }
                }
                Err(ClientError::auth_error(format!(
                    "Failed to obtain access token: {}",
                    e
                )))
            }
        }
    }
}

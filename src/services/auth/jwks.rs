/*
 * Responsibility
 * - プロバイダの JWKS (公開鍵セット) の取得とキャッシュ
 * - キャッシュは immutable snapshot、TTL 切れで再取得
 */
use std::sync::Arc;
use std::time::{Duration, Instant};

use jsonwebtoken::jwk::JwkSet;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Debug, Error)]
pub enum JwksError {
    #[error("jwks request failed: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Clone)]
struct Snapshot {
    keys: Arc<JwkSet>,
    fetched_at: Instant,
}

/// Fetches the provider's published key set and keeps an immutable snapshot
/// for `ttl`. Concurrent requests may race to refresh an expired snapshot;
/// each fetch produces its own `Arc<JwkSet>` and the last write wins, so
/// in-flight verifications always see a complete set.
pub struct JwksClient {
    http: reqwest::Client,
    url: String,
    ttl: Duration,
    cached: RwLock<Option<Snapshot>>,
}

impl std::fmt::Debug for JwksClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwksClient")
            .field("url", &self.url)
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl JwksClient {
    /// Standard well-known location under the provider domain.
    pub fn new(domain: &str, ttl: Duration) -> Self {
        Self::from_url(format!("https://{}/.well-known/jwks.json", domain), ttl)
    }

    /// Point at an explicit JWKS URL (non-Auth0 providers, tests).
    pub fn from_url(url: String, ttl: Duration) -> Self {
        Self {
            http: reqwest::Client::new(),
            url,
            ttl,
            cached: RwLock::new(None),
        }
    }

    /// Current key set, fetched if the snapshot is missing or stale.
    pub async fn keys(&self) -> Result<Arc<JwkSet>, JwksError> {
        if let Some(snapshot) = &*self.cached.read().await
            && snapshot.fetched_at.elapsed() < self.ttl
        {
            return Ok(snapshot.keys.clone());
        }

        let keys = Arc::new(self.fetch().await?);
        *self.cached.write().await = Some(Snapshot {
            keys: keys.clone(),
            fetched_at: Instant::now(),
        });

        tracing::debug!(url = %self.url, "refreshed jwks snapshot");
        Ok(keys)
    }

    async fn fetch(&self) -> Result<JwkSet, JwksError> {
        let response = self.http.get(&self.url).send().await?.error_for_status()?;
        Ok(response.json::<JwkSet>().await?)
    }
}

//! Cached token provider.

use async_trait::async_trait;
use chrono::Duration as ChronoDuration;
use std::fmt;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use super::{AccessToken, AuthError, TokenProvider};

/// Default refresh buffer in seconds.
const DEFAULT_REFRESH_BUFFER_SECS: i64 = 60;

/// A token provider that reuses tokens from an underlying provider.
///
/// A cached token is handed out until it is within the refresh buffer of
/// its expiry. Tokens without an expiry are kept until
/// [`invalidate`](TokenProvider::invalidate) is called. When several tasks
/// find the cache stale at the same time only one of them asks the
/// underlying provider; the others wait and reuse its result.
///
/// # Example
///
/// ```
/// use integrations_ser_mail::auth::{AccessToken, CachedTokenProvider, StaticTokenProvider, TokenProvider};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let cached = CachedTokenProvider::new(StaticTokenProvider::new(AccessToken::new("abc")));
///
/// let token = cached.token().await?;
/// assert_eq!(token.value(), "abc");
/// assert!(cached.has_cached_token().await);
/// # Ok(())
/// # }
/// ```
pub struct CachedTokenProvider<P>
where
    P: TokenProvider,
{
    inner: P,
    cache: Arc<RwLock<Option<AccessToken>>>,
    refresh_lock: Arc<Mutex<()>>,
    refresh_buffer: ChronoDuration,
}

impl<P> CachedTokenProvider<P>
where
    P: TokenProvider,
{
    /// Wrap `provider` with the default refresh buffer of 60 seconds.
    pub fn new(provider: P) -> Self {
        Self {
            inner: provider,
            cache: Arc::new(RwLock::new(None)),
            refresh_lock: Arc::new(Mutex::new(())),
            refresh_buffer: ChronoDuration::seconds(DEFAULT_REFRESH_BUFFER_SECS),
        }
    }

    /// Refresh tokens this long before they expire.
    pub fn with_refresh_buffer(mut self, buffer: ChronoDuration) -> Self {
        self.refresh_buffer = buffer;
        self
    }

    /// Returns true if a token is cached and still usable.
    pub async fn has_cached_token(&self) -> bool {
        self.cached().await.is_some()
    }

    /// The wrapped provider.
    pub fn inner(&self) -> &P {
        &self.inner
    }

    async fn cached(&self) -> Option<AccessToken> {
        let cache = self.cache.read().await;
        cache
            .as_ref()
            .filter(|token| !token.expires_within(self.refresh_buffer))
            .cloned()
    }
}

impl<P> Clone for CachedTokenProvider<P>
where
    P: TokenProvider + Clone,
{
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            cache: Arc::clone(&self.cache),
            refresh_lock: Arc::clone(&self.refresh_lock),
            refresh_buffer: self.refresh_buffer,
        }
    }
}

#[async_trait]
impl<P> TokenProvider for CachedTokenProvider<P>
where
    P: TokenProvider,
{
    async fn token(&self) -> Result<AccessToken, AuthError> {
        if let Some(token) = self.cached().await {
            return Ok(token);
        }

        let _guard = self.refresh_lock.lock().await;

        // Another task may have refreshed while we waited.
        if let Some(token) = self.cached().await {
            return Ok(token);
        }

        debug!("refreshing access token");
        let token = self.inner.token().await?;
        *self.cache.write().await = Some(token.clone());
        Ok(token)
    }

    async fn invalidate(&self) {
        debug!("invalidating cached access token");
        *self.cache.write().await = None;
        self.inner.invalidate().await;
    }
}

impl<P> fmt::Debug for CachedTokenProvider<P>
where
    P: TokenProvider + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedTokenProvider")
            .field("inner", &self.inner)
            .field("refresh_buffer", &self.refresh_buffer)
            .finish()
    }
}

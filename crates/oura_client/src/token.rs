use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared holder for the personal access token.
///
/// Clones share the same slot, so a token stored through the root resolver is
/// seen by the HTTP client on its next request. An empty token counts as
/// absent.
#[derive(Clone, Debug, Default)]
pub struct TokenStore {
    inner: Arc<RwLock<Option<SecretString>>>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: SecretString) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Some(token))),
        }
    }

    pub async fn set(&self, token: SecretString) {
        *self.inner.write().await = Some(token);
    }

    pub async fn clear(&self) {
        *self.inner.write().await = None;
    }

    pub async fn get(&self) -> Option<SecretString> {
        self.inner
            .read()
            .await
            .as_ref()
            .filter(|t| !t.expose_secret().is_empty())
            .cloned()
    }

    pub async fn is_set(&self) -> bool {
        self.get().await.is_some()
    }

    /// Non-blocking check, `false` while a writer holds the lock.
    pub fn try_is_set(&self) -> bool {
        self.inner
            .try_read()
            .map(|t| t.as_ref().is_some_and(|t| !t.expose_secret().is_empty()))
            .unwrap_or(false)
    }
}

//! Root resolver: connection status, token configuration and the collection
//! resolvers.

use schemars::JsonSchema;
use secrecy::SecretString;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;

use crate::collection::{CollectionResolver, ItemRef};
use crate::config::Config;
use crate::http_client::ReqwestOuraClient;
use crate::{Collection, DailyRecord, OuraClient, OuraError, TokenStore};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, JsonSchema)]
pub enum Status {
    Ready,
    Unconfigured,
}

impl Status {
    pub fn message(self) -> &'static str {
        match self {
            Status::Ready => "Ready",
            // Personal access tokens are created at https://cloud.ouraring.com/personal-access-tokens/new
            Status::Unconfigured => "[Add Personal Access Token](:configure)",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

pub struct Root {
    client: Arc<dyn OuraClient>,
    tokens: TokenStore,
    status_tx: watch::Sender<Status>,
}

impl Root {
    /// `tokens` must be the store the client reads its bearer token from.
    pub fn new(client: Arc<dyn OuraClient>, tokens: TokenStore) -> Self {
        let initial = if tokens.try_is_set() {
            Status::Ready
        } else {
            Status::Unconfigured
        };
        Self {
            client,
            tokens,
            status_tx: watch::Sender::new(initial),
        }
    }

    /// Wire a reqwest client and token store from configuration.
    pub fn from_config(config: &Config) -> Result<Self, OuraError> {
        let tokens = match &config.personal_access_token {
            Some(token) => TokenStore::with_token(token.clone()),
            None => TokenStore::new(),
        };
        let client = ReqwestOuraClient::from_config(config, tokens.clone())?;
        Ok(Self::new(Arc::new(client), tokens))
    }

    pub async fn status(&self) -> Status {
        if self.tokens.is_set().await {
            Status::Ready
        } else {
            Status::Unconfigured
        }
    }

    /// Store the token and notify status subscribers.
    pub async fn configure(&self, personal_access_token: impl Into<String>) {
        self.tokens
            .set(SecretString::from(personal_access_token.into()))
            .await;
        let status = self.status().await;
        tracing::info!(status = ?status, "personal access token configured");
        self.status_tx.send_replace(status);
    }

    pub fn subscribe(&self) -> watch::Receiver<Status> {
        self.status_tx.subscribe()
    }

    pub fn collection(&self, collection: Collection) -> CollectionResolver {
        CollectionResolver::new(self.client.clone(), collection)
    }

    pub fn daily_sleep(&self) -> CollectionResolver {
        self.collection(Collection::DailySleep)
    }

    pub fn daily_activity(&self) -> CollectionResolver {
        self.collection(Collection::DailyActivity)
    }

    pub fn daily_readiness(&self) -> CollectionResolver {
        self.collection(Collection::DailyReadiness)
    }

    pub fn daily_stress(&self) -> CollectionResolver {
        self.collection(Collection::DailyStress)
    }

    /// Follow a reference produced by [`CollectionResolver::gref`].
    pub async fn resolve(&self, item: &ItemRef) -> Result<DailyRecord, OuraError> {
        self.collection(item.collection).one(&item.id).await
    }
}

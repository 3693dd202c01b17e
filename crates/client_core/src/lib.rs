use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use shared::{
    domain::{AccountId, E8s, Principal, RealmId},
    error::ApiError,
    protocol::{Invoice, Session, TransactionRecord},
};
use tracing::info;

pub mod config;
pub mod header;
mod http_api;
pub mod wallet;

pub use header::HeaderController;
pub use http_api::HttpSessionApi;
pub use wallet::WalletController;

/// Remote backend surface the view controllers depend on. Every call
/// suspends at the network boundary and settles with a tagged result.
#[async_trait]
pub trait SessionApi: Send + Sync {
    async fn mint_cycles(&self, kilo_cycles: u64) -> Result<Invoice, ApiError>;
    async fn transfer(&self, recipient: &AccountId, amount: E8s) -> Result<(), ApiError>;
    /// `None` leaves the current realm.
    async fn enter_realm(&self, realm: Option<&RealmId>) -> Result<(), ApiError>;
    /// `Ok(None)` means no authenticated user exists yet.
    async fn fetch_session(&self) -> Result<Option<Session>, ApiError>;
    async fn transactions(
        &self,
        offset: u64,
        principal: &Principal,
    ) -> Result<Vec<TransactionRecord>, ApiError>;
}

pub struct MissingSessionApi;

#[async_trait]
impl SessionApi for MissingSessionApi {
    async fn mint_cycles(&self, _kilo_cycles: u64) -> Result<Invoice, ApiError> {
        Err(ApiError::network("session backend unavailable"))
    }

    async fn transfer(&self, _recipient: &AccountId, _amount: E8s) -> Result<(), ApiError> {
        Err(ApiError::network("session backend unavailable"))
    }

    async fn enter_realm(&self, _realm: Option<&RealmId>) -> Result<(), ApiError> {
        Err(ApiError::network("session backend unavailable"))
    }

    async fn fetch_session(&self) -> Result<Option<Session>, ApiError> {
        Err(ApiError::network("session backend unavailable"))
    }

    async fn transactions(
        &self,
        _offset: u64,
        _principal: &Principal,
    ) -> Result<Vec<TransactionRecord>, ApiError> {
        Err(ApiError::network("session backend unavailable"))
    }
}

/// Credential invalidation for whichever authentication method signed the
/// user in.
#[async_trait]
pub trait AuthMethod: Send + Sync {
    async fn logout(&self) -> Result<(), ApiError>;
}

pub struct MissingAuthMethod;

#[async_trait]
impl AuthMethod for MissingAuthMethod {
    async fn logout(&self) -> Result<(), ApiError> {
        Err(ApiError::network("no active authentication method"))
    }
}

/// Routing seam; the routing table itself lives outside the client core.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: &str);
}

/// Blocking user-facing prompts (alerts and confirmations) rendered by the
/// host UI.
pub trait UserPrompt: Send + Sync {
    fn confirm(&self, message: &str) -> bool;
    fn alert(&self, message: &str);
}

/// Process-wide cache of the optional authenticated session. Mutated in
/// place by reloads; cleared synchronously on logout. All access is
/// sequenced on the UI thread, so the lock is never contended or held
/// across an await point.
#[derive(Default)]
pub struct SessionStore {
    inner: RwLock<Option<Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Session> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    pub fn principal(&self) -> Option<Principal> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|session| session.principal.clone())
    }

    /// Replaces the cached session with whatever the backend reports,
    /// including `None` for an anonymous caller.
    pub async fn reload(&self, api: &dyn SessionApi) -> Result<(), ApiError> {
        let session = api.fetch_session().await?;
        if let Some(session) = &session {
            info!(principal = %session.principal, "session reloaded");
        }
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = session;
        Ok(())
    }

    /// Synchronous invalidation, independent of any in-flight network call.
    pub fn clear(&self) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    #[cfg(test)]
    pub(crate) fn set(&self, session: Session) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = Some(session);
    }
}

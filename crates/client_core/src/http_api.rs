use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use shared::{
    domain::{AccountId, E8s, Principal, RealmId},
    error::ApiError,
    protocol::{ApiResult, Invoice, Session, TransactionRecord},
};

use crate::SessionApi;

/// HTTP/JSON implementation of the session backend boundary.
pub struct HttpSessionApi {
    http: Client,
    api_url: String,
}

impl HttpSessionApi {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            api_url: api_url.into(),
        }
    }
}

fn network(err: reqwest::Error) -> ApiError {
    ApiError::network(err.to_string())
}

#[derive(Debug, Serialize)]
struct MintCyclesRequest {
    kilo_cycles: u64,
}

#[derive(Debug, Serialize)]
struct TransferRequest<'a> {
    recipient: &'a str,
    e8s: E8s,
}

#[derive(Debug, Serialize)]
struct EnterRealmRequest<'a> {
    realm: &'a str,
}

#[derive(Debug, Serialize)]
struct TransactionsQuery<'a> {
    offset: u64,
    principal: &'a str,
}

#[async_trait]
impl SessionApi for HttpSessionApi {
    async fn mint_cycles(&self, kilo_cycles: u64) -> Result<Invoice, ApiError> {
        let response: ApiResult<Invoice> = self
            .http
            .post(format!("{}/api/mint_cycles", self.api_url))
            .json(&MintCyclesRequest { kilo_cycles })
            .send()
            .await
            .map_err(network)?
            .error_for_status()
            .map_err(network)?
            .json()
            .await
            .map_err(network)?;
        response.into_result()
    }

    async fn transfer(&self, recipient: &AccountId, amount: E8s) -> Result<(), ApiError> {
        let response: ApiResult<()> = self
            .http
            .post(format!("{}/api/transfer", self.api_url))
            .json(&TransferRequest {
                recipient: recipient.as_str(),
                e8s: amount,
            })
            .send()
            .await
            .map_err(network)?
            .error_for_status()
            .map_err(network)?
            .json()
            .await
            .map_err(network)?;
        response.into_result()
    }

    async fn enter_realm(&self, realm: Option<&RealmId>) -> Result<(), ApiError> {
        // An empty realm name leaves the current realm.
        let realm = realm.map(RealmId::as_str).unwrap_or("");
        let response: ApiResult<()> = self
            .http
            .post(format!("{}/api/realm", self.api_url))
            .json(&EnterRealmRequest { realm })
            .send()
            .await
            .map_err(network)?
            .error_for_status()
            .map_err(network)?
            .json()
            .await
            .map_err(network)?;
        response.into_result()
    }

    async fn fetch_session(&self) -> Result<Option<Session>, ApiError> {
        self.http
            .get(format!("{}/api/session", self.api_url))
            .send()
            .await
            .map_err(network)?
            .error_for_status()
            .map_err(network)?
            .json()
            .await
            .map_err(network)
    }

    async fn transactions(
        &self,
        offset: u64,
        principal: &Principal,
    ) -> Result<Vec<TransactionRecord>, ApiError> {
        self.http
            .get(format!("{}/api/transactions", self.api_url))
            .query(&TransactionsQuery {
                offset,
                principal: principal.as_str(),
            })
            .send()
            .await
            .map_err(network)?
            .error_for_status()
            .map_err(network)?
            .json()
            .await
            .map_err(network)
    }
}

#[async_trait]
impl crate::AuthMethod for HttpSessionApi {
    async fn logout(&self) -> Result<(), ApiError> {
        let response: ApiResult<()> = self
            .http
            .post(format!("{}/api/logout", self.api_url))
            .send()
            .await
            .map_err(network)?
            .error_for_status()
            .map_err(network)?
            .json()
            .await
            .map_err(network)?;
        response.into_result()
    }
}

#[cfg(test)]
#[path = "tests/http_api_tests.rs"]
mod tests;

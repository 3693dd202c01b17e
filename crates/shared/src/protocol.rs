use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    domain::{AccountId, E8s, Principal, RealmId},
    error::ApiError,
};

/// Tagged success/error envelope the backend wraps every RPC response in:
/// `{"Ok": ...}` or `{"Err": "..."}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ApiResult<T> {
    Ok(T),
    Err(String),
}

impl<T> ApiResult<T> {
    pub fn into_result(self) -> Result<T, ApiError> {
        match self {
            ApiResult::Ok(value) => Ok(value),
            ApiResult::Err(message) => Err(ApiError::remote(message)),
        }
    }
}

/// Deposit invoice for cycle minting. Replaced by the next mint request
/// or by a paid response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub e8s: E8s,
    pub account: AccountId,
    pub paid: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub kind: String,
    pub delta: i64,
    pub description: String,
}

/// Authenticated user state, cached process-wide and refreshed in place
/// by session reloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub principal: Principal,
    pub name: String,
    pub cycles: u64,
    pub tokens: u64,
    #[serde(default)]
    pub inbox: BTreeMap<String, String>,
    #[serde(default)]
    pub realms: Vec<RealmId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_realm: Option<RealmId>,
    pub account: AccountId,
    #[serde(default)]
    pub ledger: Vec<LedgerEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Transfer,
    Mint,
    Fee,
}

/// Historical ledger entry fetched from the backend; append-only from the
/// client's perspective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: u64,
    pub timestamp: DateTime<Utc>,
    pub kind: TransactionKind,
    pub from: AccountId,
    pub to: AccountId,
    pub e8s: E8s,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_ok_envelope() {
        let raw = r#"{"Ok": {"e8s": "150000", "account": "abc", "paid": false}}"#;
        let parsed: ApiResult<Invoice> = serde_json::from_str(raw).expect("decode");
        let invoice = parsed.into_result().expect("ok branch");
        assert_eq!(invoice.e8s, E8s(150_000));
        assert_eq!(invoice.account, AccountId::new("abc"));
        assert!(!invoice.paid);
    }

    #[test]
    fn decodes_err_envelope_as_remote_error() {
        let raw = r#"{"Err": "cycle minting is disabled"}"#;
        let parsed: ApiResult<Invoice> = serde_json::from_str(raw).expect("decode");
        let err = parsed.into_result().expect_err("err branch");
        assert_eq!(err.code, crate::error::ErrorCode::Remote);
        assert_eq!(err.message, "cycle minting is disabled");
    }

    #[test]
    fn session_decodes_with_sparse_fields() {
        let raw = r#"{
            "principal": "aaaaa-aa",
            "name": "alice",
            "cycles": 1000,
            "tokens": 25,
            "account": "abcdef"
        }"#;
        let session: Session = serde_json::from_str(raw).expect("decode");
        assert!(session.inbox.is_empty());
        assert!(session.realms.is_empty());
        assert_eq!(session.current_realm, None);
        assert!(session.ledger.is_empty());
    }
}

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use shared::{
    domain::{AccountId, E8s, Principal, RealmId},
    error::ApiError,
    protocol::{Invoice, Session, TransactionRecord},
};

use super::*;
use crate::{AuthMethod, Navigator, SessionApi, SessionStore};

fn sample_session() -> Session {
    Session {
        principal: Principal::new("aaaaa-aa"),
        name: "alice".into(),
        cycles: 1_000,
        tokens: 25,
        inbox: Default::default(),
        realms: vec![RealmId::new("art")],
        current_realm: None,
        account: AccountId::new("abcdef0123456789"),
        ledger: Vec::new(),
    }
}

struct TestSessionApi {
    fail_with: Option<String>,
    session: Option<Session>,
    enter_realm_calls: Mutex<Vec<Option<RealmId>>>,
}

impl TestSessionApi {
    fn ok(session: Option<Session>) -> Self {
        Self {
            fail_with: None,
            session,
            enter_realm_calls: Mutex::new(Vec::new()),
        }
    }

    fn failing(err: impl Into<String>) -> Self {
        Self {
            fail_with: Some(err.into()),
            session: None,
            enter_realm_calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl SessionApi for TestSessionApi {
    async fn mint_cycles(&self, _kilo_cycles: u64) -> Result<Invoice, ApiError> {
        Err(ApiError::remote("not used by header tests"))
    }

    async fn transfer(&self, _recipient: &AccountId, _amount: E8s) -> Result<(), ApiError> {
        Err(ApiError::remote("not used by header tests"))
    }

    async fn enter_realm(&self, realm: Option<&RealmId>) -> Result<(), ApiError> {
        if let Some(err) = &self.fail_with {
            return Err(ApiError::remote(err.clone()));
        }
        self.enter_realm_calls
            .lock()
            .expect("lock")
            .push(realm.cloned());
        Ok(())
    }

    async fn fetch_session(&self) -> Result<Option<Session>, ApiError> {
        if let Some(err) = &self.fail_with {
            return Err(ApiError::remote(err.clone()));
        }
        Ok(self.session.clone())
    }

    async fn transactions(
        &self,
        _offset: u64,
        _principal: &Principal,
    ) -> Result<Vec<TransactionRecord>, ApiError> {
        Ok(Vec::new())
    }
}

#[derive(Default)]
struct RecordingNavigator {
    routes: Mutex<Vec<String>>,
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: &str) {
        self.routes.lock().expect("lock").push(route.to_string());
    }
}

/// Records whether the session cache was already empty when the auth
/// backend's logout was awaited.
struct ObservingAuth {
    store: Arc<SessionStore>,
    store_cleared_before_logout: Mutex<Option<bool>>,
}

#[async_trait]
impl AuthMethod for ObservingAuth {
    async fn logout(&self) -> Result<(), ApiError> {
        *self.store_cleared_before_logout.lock().expect("lock") =
            Some(!self.store.is_authenticated());
        Ok(())
    }
}

struct NoopAuth;

#[async_trait]
impl AuthMethod for NoopAuth {
    async fn logout(&self) -> Result<(), ApiError> {
        Ok(())
    }
}

fn controller(
    api: Arc<TestSessionApi>,
    store: Arc<SessionStore>,
    navigator: Arc<RecordingNavigator>,
) -> HeaderController {
    HeaderController::new(api, store, Arc::new(NoopAuth), navigator)
}

#[test]
fn button_bar_and_realm_switcher_are_mutually_exclusive() {
    let store = Arc::new(SessionStore::new());
    let mut header = controller(
        Arc::new(TestSessionApi::ok(None)),
        store,
        Arc::new(RecordingNavigator::default()),
    );

    // Every interleaving of the two toggles must leave at most one panel open.
    for step in 0..32 {
        if step % 3 == 0 {
            header.toggle_button_bar();
        } else {
            header.toggle_realm_switcher();
        }
        assert!(
            !(header.show_button_bar() && header.show_realms()),
            "both panels open after step {step}"
        );
    }

    header.toggle_button_bar();
    header.toggle_realm_switcher();
    assert!(header.show_realms());
    assert!(!header.show_button_bar());
    header.toggle_button_bar();
    assert!(header.show_button_bar());
    assert!(!header.show_realms());
}

#[test]
fn login_mask_only_toggles_without_a_session() {
    let store = Arc::new(SessionStore::new());
    let mut header = controller(
        Arc::new(TestSessionApi::ok(None)),
        Arc::clone(&store),
        Arc::new(RecordingNavigator::default()),
    );

    header.toggle_login();
    assert!(header.show_logins());
    header.toggle_login();
    assert!(!header.show_logins());

    store.set(sample_session());
    header.toggle_login();
    assert!(!header.show_logins());
}

#[tokio::test]
async fn enter_realm_reloads_session_and_navigates() {
    let api = Arc::new(TestSessionApi::ok(Some(sample_session())));
    let store = Arc::new(SessionStore::new());
    let navigator = Arc::new(RecordingNavigator::default());
    let mut header = controller(Arc::clone(&api), Arc::clone(&store), Arc::clone(&navigator));

    header
        .enter_realm(Some(RealmId::new("art")))
        .await
        .expect("realm switch");

    assert!(!header.is_loading());
    assert!(store.is_authenticated());
    assert_eq!(
        *api.enter_realm_calls.lock().expect("lock"),
        vec![Some(RealmId::new("art"))]
    );
    assert_eq!(*navigator.routes.lock().expect("lock"), vec![DEFAULT_ROUTE]);
}

#[tokio::test]
async fn enter_realm_clears_loading_on_failure_and_propagates() {
    let api = Arc::new(TestSessionApi::failing("realm is gated"));
    let navigator = Arc::new(RecordingNavigator::default());
    let mut header = controller(
        api,
        Arc::new(SessionStore::new()),
        Arc::clone(&navigator),
    );

    let err = header
        .enter_realm(None)
        .await
        .expect_err("failure must propagate");

    assert_eq!(err.message, "realm is gated");
    assert!(!header.is_loading());
    assert!(navigator.routes.lock().expect("lock").is_empty());
}

#[tokio::test]
async fn logout_clears_cache_before_credential_invalidation() {
    let store = Arc::new(SessionStore::new());
    store.set(sample_session());
    let auth = Arc::new(ObservingAuth {
        store: Arc::clone(&store),
        store_cleared_before_logout: Mutex::new(None),
    });
    let navigator = Arc::new(RecordingNavigator::default());
    let mut header = HeaderController::new(
        Arc::new(TestSessionApi::ok(None)),
        Arc::clone(&store),
        Arc::clone(&auth) as Arc<dyn AuthMethod>,
        Arc::clone(&navigator) as Arc<dyn Navigator>,
    );

    header.logout().await.expect("logout");

    assert_eq!(
        *auth.store_cleared_before_logout.lock().expect("lock"),
        Some(true)
    );
    assert!(!store.is_authenticated());
    assert_eq!(*navigator.routes.lock().expect("lock"), vec![ROOT_ROUTE]);
}

#[tokio::test]
async fn logout_failure_still_invalidates_the_cache() {
    let store = Arc::new(SessionStore::new());
    store.set(sample_session());
    let navigator = Arc::new(RecordingNavigator::default());
    let mut header = HeaderController::new(
        Arc::new(TestSessionApi::ok(None)),
        Arc::clone(&store),
        Arc::new(crate::MissingAuthMethod),
        Arc::clone(&navigator) as Arc<dyn Navigator>,
    );

    header
        .logout()
        .await
        .expect_err("missing auth method errors");

    assert!(!store.is_authenticated());
    assert!(navigator.routes.lock().expect("lock").is_empty());
}

#[test]
fn route_change_closes_both_panels() {
    let mut header = controller(
        Arc::new(TestSessionApi::ok(None)),
        Arc::new(SessionStore::new()),
        Arc::new(RecordingNavigator::default()),
    );

    header.toggle_button_bar();
    header.on_route_changed();
    assert!(!header.show_button_bar());
    assert!(!header.show_realms());

    header.toggle_realm_switcher();
    header.on_route_changed();
    assert!(!header.show_button_bar());
    assert!(!header.show_realms());
}

use std::sync::Arc;

use shared::{domain::RealmId, error::ApiError};
use tracing::{info, warn};

use crate::{AuthMethod, Navigator, SessionApi, SessionStore};

/// Landing route after a realm switch.
pub const DEFAULT_ROUTE: &str = "/home";
/// Landing route after logout.
pub const ROOT_ROUTE: &str = "/";

/// Header navigation state: login mask, button bar, and realm switcher
/// panels, plus the realm-switching side effects. Panel flags are private
/// to the controller instance and die with it.
pub struct HeaderController {
    api: Arc<dyn SessionApi>,
    store: Arc<SessionStore>,
    auth: Arc<dyn AuthMethod>,
    navigator: Arc<dyn Navigator>,
    show_logins: bool,
    show_button_bar: bool,
    show_realms: bool,
    loading: bool,
}

impl HeaderController {
    pub fn new(
        api: Arc<dyn SessionApi>,
        store: Arc<SessionStore>,
        auth: Arc<dyn AuthMethod>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            api,
            store,
            auth,
            navigator,
            show_logins: false,
            show_button_bar: false,
            show_realms: false,
            loading: false,
        }
    }

    pub fn show_logins(&self) -> bool {
        self.show_logins
    }

    pub fn show_button_bar(&self) -> bool {
        self.show_button_bar
    }

    pub fn show_realms(&self) -> bool {
        self.show_realms
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Only meaningful while no session exists; the login mask is never
    /// shown to an authenticated user.
    pub fn toggle_login(&mut self) {
        if self.store.is_authenticated() {
            return;
        }
        self.show_logins = !self.show_logins;
    }

    pub fn toggle_button_bar(&mut self) {
        self.show_button_bar = !self.show_button_bar;
        self.show_realms = false;
    }

    pub fn toggle_realm_switcher(&mut self) {
        self.show_realms = !self.show_realms;
        self.show_button_bar = false;
    }

    /// Enters the given realm (or leaves the current one for `None`),
    /// refreshes the session, and navigates to the default route. The
    /// loading flag is false again after settling on both outcomes;
    /// failures propagate to the caller without retry.
    pub async fn enter_realm(&mut self, realm: Option<RealmId>) -> Result<(), ApiError> {
        self.loading = true;
        let result = async {
            self.api.enter_realm(realm.as_ref()).await?;
            self.store.reload(self.api.as_ref()).await
        }
        .await;
        self.loading = false;
        if let Err(err) = &result {
            warn!(realm = ?realm, "realm switch failed: {err}");
        }
        result?;
        info!(realm = ?realm, "realm switched");
        self.navigator.navigate(DEFAULT_ROUTE);
        Ok(())
    }

    /// Drops the cached session before the credential invalidation is
    /// awaited, then navigates to the root route.
    pub async fn logout(&mut self) -> Result<(), ApiError> {
        self.store.clear();
        self.auth.logout().await?;
        info!("logged out");
        self.navigator.navigate(ROOT_ROUTE);
        Ok(())
    }

    /// Panels are route-scoped: every route change forces the collapsible
    /// panels closed.
    pub fn on_route_changed(&mut self) {
        self.show_button_bar = false;
        self.show_realms = false;
    }
}

#[cfg(test)]
#[path = "tests/header_tests.rs"]
mod tests;

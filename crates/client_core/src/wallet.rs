use std::sync::Arc;

use shared::{
    domain::{AccountId, E8s},
    error::ApiError,
    protocol::{Invoice, TransactionRecord},
};
use tracing::{info, warn};

use crate::{SessionApi, SessionStore, UserPrompt};

/// Replaces the displayed account after a successful transfer; the
/// transition is one-way.
pub const TRANSFER_DONE: &str = "DONE!";
pub const MINT_SUCCESS: &str = "SUCCESS!";

/// Wallet screen state: the cycle-minting invoice loop, ICP transfer, and
/// transaction history. One instance per mounted view.
pub struct WalletController {
    api: Arc<dyn SessionApi>,
    store: Arc<SessionStore>,
    prompt: Arc<dyn UserPrompt>,
    invoice: Option<Invoice>,
    loading: bool,
    account_display: Option<String>,
    status: Option<String>,
    transactions: Vec<TransactionRecord>,
}

impl WalletController {
    pub fn new(
        api: Arc<dyn SessionApi>,
        store: Arc<SessionStore>,
        prompt: Arc<dyn UserPrompt>,
    ) -> Self {
        Self {
            api,
            store,
            prompt,
            invoice: None,
            loading: false,
            account_display: None,
            status: None,
            transactions: Vec::new(),
        }
    }

    pub fn invoice(&self) -> Option<&Invoice> {
        self.invoice.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn account_display(&self) -> Option<&str> {
        self.account_display.as_deref()
    }

    pub fn transactions(&self) -> &[TransactionRecord] {
        &self.transactions
    }

    /// Initial mount: pick up the account identifier from the session and
    /// fetch the transaction history. Anonymous sessions render the
    /// onboarding/minting flow instead.
    pub async fn mount(&mut self) -> Result<(), ApiError> {
        let Some(session) = self.store.current() else {
            return Ok(());
        };
        self.account_display = Some(session.account.0.clone());
        self.load_transactions().await
    }

    /// Asks the backend to mint `kilo_cycles` (0 re-checks the open
    /// invoice). Remote errors surface one blocking alert and propagate;
    /// a paid invoice refreshes the session before being stored.
    pub async fn request_invoice(&mut self, kilo_cycles: u64) -> Result<(), ApiError> {
        let invoice = match self.api.mint_cycles(kilo_cycles).await {
            Ok(invoice) => invoice,
            Err(err) => {
                self.prompt.alert(&err.to_string());
                return Err(err);
            }
        };
        if invoice.paid {
            // Reload is best effort here: during onboarding the paid
            // invoice precedes user creation, so the backend may still
            // report an anonymous caller.
            if let Err(err) = self.store.reload(self.api.as_ref()).await {
                warn!("session reload after paid invoice failed: {err}");
            }
            info!(kilo_cycles, "invoice paid");
        }
        self.invoice = Some(invoice);
        Ok(())
    }

    /// User-triggered payment polling; no timer re-issues the check. The
    /// loading flag is false again after settling on both outcomes.
    pub async fn check_payment(&mut self) -> Result<(), ApiError> {
        self.loading = true;
        let result = self.request_invoice(0).await;
        self.loading = false;
        result
    }

    /// Sends ICP after explicit confirmation. Empty or malformed inputs
    /// abort silently before any network call; remote errors alert and
    /// leave prior state untouched.
    pub async fn transfer(&mut self, recipient: &str, amount: &str) -> Result<(), ApiError> {
        let recipient = recipient.trim();
        let amount = amount.trim();
        if recipient.is_empty() || amount.is_empty() {
            return Ok(());
        }
        let Some(e8s) = E8s::parse_icp(amount) else {
            return Ok(());
        };
        if !self
            .prompt
            .confirm(&format!("Transfer {e8s} ICP to {recipient}?"))
        {
            return Ok(());
        }
        if let Err(err) = self.api.transfer(&AccountId::new(recipient), e8s).await {
            self.prompt.alert(&err.to_string());
            return Err(err);
        }
        info!(%e8s, "transfer settled");
        self.account_display = Some(TRANSFER_DONE.to_string());
        Ok(())
    }

    /// Mints at least one kilo-cycle; the raw input aborts silently when it
    /// does not parse to an integer. A settled mint sets the success status.
    pub async fn mint(&mut self, kilo_cycles_input: &str) -> Result<(), ApiError> {
        let Ok(parsed) = kilo_cycles_input.trim().parse::<i64>() else {
            return Ok(());
        };
        let kilo_cycles = parsed.max(1) as u64;
        self.request_invoice(kilo_cycles).await?;
        self.status = Some(MINT_SUCCESS.to_string());
        Ok(())
    }

    /// Fetches the full history for the session principal; no pagination.
    pub async fn load_transactions(&mut self) -> Result<(), ApiError> {
        let Some(principal) = self.store.principal() else {
            return Ok(());
        };
        self.transactions = self.api.transactions(0, &principal).await?;
        Ok(())
    }

    /// Renderable deposit instructions for an open, unpaid invoice.
    pub fn deposit_instructions(&self) -> Option<String> {
        let invoice = self.invoice.as_ref().filter(|invoice| !invoice.paid)?;
        Some(format!(
            "Please transfer {} ICP to account {} to mint cycles.",
            invoice.e8s, invoice.account
        ))
    }

    /// True once an anonymous visitor's invoice is paid and the create-user
    /// prompt should render.
    pub fn awaiting_user_creation(&self) -> bool {
        !self.store.is_authenticated()
            && self.invoice.as_ref().is_some_and(|invoice| invoice.paid)
    }
}

#[cfg(test)]
#[path = "tests/wallet_tests.rs"]
mod tests;

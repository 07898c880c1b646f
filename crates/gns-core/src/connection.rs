//! Wallet connection state.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use alloy_primitives::Address;
use tracing::{debug, info, warn};

use crate::error::GnsError;
use crate::gateway::ChainGateway;
use crate::models::ConnectionState;

/// Owns the connected account.
pub struct ConnectionManager<G> {
    gateway: Rc<G>,
    state: RefCell<ConnectionState>,
    restored: Cell<bool>,
}

impl<G: ChainGateway> ConnectionManager<G> {
    pub fn new(gateway: Rc<G>) -> Self {
        Self {
            gateway,
            state: RefCell::new(ConnectionState::default()),
            restored: Cell::new(false),
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state.borrow().clone()
    }

    pub fn account(&self) -> Option<Address> {
        self.state.borrow().account
    }

    pub fn is_connected(&self) -> bool {
        self.state.borrow().is_connected()
    }

    pub fn wallet_available(&self) -> bool {
        self.gateway.is_available()
    }

    pub fn has_restored(&self) -> bool {
        self.restored.get()
    }

    /// Adopt an already-authorised account without prompting.
    ///
    /// Runs once per manager; later calls return the current account. A
    /// wallet that does not answer in time counts as no authorised account.
    pub async fn restore_connection(&self) -> Result<Option<Address>, GnsError> {
        if self.restored.replace(true) {
            return Ok(self.account());
        }
        if !self.gateway.is_available() {
            info!("no wallet provider injected, skipping restore");
            return Ok(None);
        }

        let accounts = match self.gateway.accounts().await {
            Ok(accounts) => accounts,
            Err(err) if err.timed_out => {
                warn!(error = %err, "wallet did not answer, restoring nothing");
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        };
        match accounts.first() {
            Some(account) => {
                info!(account = %account, "found an authorized account");
                self.adopt(Some(*account));
            }
            None => debug!("no authorized account found"),
        }
        Ok(self.account())
    }

    /// Prompt the wallet for authorisation and adopt the first account.
    pub async fn request_connection(&self) -> Result<Address, GnsError> {
        if !self.gateway.is_available() {
            warn!("connect requested without a wallet provider");
            return Err(GnsError::WalletUnavailable);
        }

        let accounts = self.gateway.request_accounts().await.map_err(GnsError::from)?;
        let account = accounts.first().copied().ok_or(GnsError::NotConnected)?;
        info!(account = %account, "connected");
        self.restored.set(true);
        self.adopt(Some(account));
        Ok(account)
    }

    /// Re-query authorised accounts after the wallet reported a change.
    ///
    /// A failed query keeps the current account; only an empty answer
    /// clears it.
    pub async fn reconcile(&self) -> Result<Option<Address>, GnsError> {
        let accounts = self.gateway.accounts().await.inspect_err(|err| {
            warn!(error = %err, "could not re-query accounts, keeping current");
        })?;
        let account = accounts.first().copied();
        if account != self.account() {
            info!(account = ?account, "wallet account changed");
        }
        self.adopt(account);
        Ok(account)
    }

    fn adopt(&self, account: Option<Address>) {
        self.state.borrow_mut().account = account;
    }
}

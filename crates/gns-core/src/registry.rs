//! Domain registration and record updates.
//!
//! A mint is two transactions: `register` carrying the payment, then
//! `setRecord`. The second is only sent once the first is included with a
//! successful receipt. [`MintPhase`] tracks where a mint stands so a
//! registered-but-recordless domain is reported rather than lost.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use alloy_primitives::{Address, TxHash};
use tracing::{info, warn};

use crate::config::NamePolicy;
use crate::connection::ConnectionManager;
use crate::contract::RegistryContract;
use crate::error::GnsError;
use crate::gateway::ChainGateway;
use crate::models::{DomainDraft, MintPhase, MintRecord, Price};
use crate::network::NetworkGuard;
use crate::pricing::{normalize_name, price_for};

/// Both transactions of a completed mint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MintOutcome {
    pub name: String,
    pub price: Price,
    pub registration: TxHash,
    pub record: TxHash,
}

/// Clears the in-flight flag however the operation ends.
struct InFlight<'a>(&'a Cell<bool>);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

pub struct RegistryClient<G> {
    contract: RegistryContract<G>,
    connection: Rc<ConnectionManager<G>>,
    network: Rc<NetworkGuard<G>>,
    policy: NamePolicy,
    draft: RefCell<DomainDraft>,
    phase: RefCell<MintPhase>,
    in_flight: Cell<bool>,
}

impl<G: ChainGateway> RegistryClient<G> {
    pub fn new(
        contract: RegistryContract<G>,
        connection: Rc<ConnectionManager<G>>,
        network: Rc<NetworkGuard<G>>,
        policy: NamePolicy,
    ) -> Self {
        Self {
            contract,
            connection,
            network,
            policy,
            draft: RefCell::new(DomainDraft::default()),
            phase: RefCell::new(MintPhase::Idle),
            in_flight: Cell::new(false),
        }
    }

    pub fn policy(&self) -> &NamePolicy {
        &self.policy
    }

    /// Whether a mutating call is awaiting inclusion.
    pub fn is_busy(&self) -> bool {
        self.in_flight.get()
    }

    pub fn phase(&self) -> MintPhase {
        self.phase.borrow().clone()
    }

    pub fn price_for(&self, name: &str) -> Result<Price, GnsError> {
        price_for(name, &self.policy)
    }

    // =========================================================================
    // Draft
    // =========================================================================

    pub fn draft(&self) -> DomainDraft {
        self.draft.borrow().clone()
    }

    /// Price of the drafted name, if it is currently valid.
    pub fn price_preview(&self) -> Option<Price> {
        self.price_for(&self.draft.borrow().name).ok()
    }

    /// Ignored while editing: the name must keep pointing at the owned domain.
    pub fn set_draft_name(&self, name: impl Into<String>) {
        let mut draft = self.draft.borrow_mut();
        if !draft.editing {
            draft.name = name.into();
        }
    }

    pub fn set_draft_record(&self, record: impl Into<String>) {
        self.draft.borrow_mut().record = record.into();
    }

    /// Load a listed domain owned by the connected account into the draft.
    pub fn begin_edit(&self, name: &str, records: &[MintRecord]) -> Result<(), GnsError> {
        let account = self.connection.account().ok_or(GnsError::NotConnected)?;
        let listed = records
            .iter()
            .find(|r| r.name == name && r.is_owned_by(Some(&account)))
            .ok_or_else(|| GnsError::NotOwner {
                name: name.to_string(),
            })?;

        *self.draft.borrow_mut() = DomainDraft {
            name: listed.name.clone(),
            record: listed.record.clone(),
            editing: true,
        };
        Ok(())
    }

    pub fn cancel_edit(&self) {
        self.draft.borrow_mut().clear();
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Register the drafted name and attach the drafted record.
    pub async fn mint(&self) -> Result<MintOutcome, GnsError> {
        let _flight = self.begin()?;
        let from = self.writable_account()?;
        let draft = self.draft();
        let name = normalize_name(&draft.name);
        let price = self.price_for(&name)?;

        info!(name = %name, price = %price, "registering domain");
        self.set_phase(MintPhase::Registering { name: name.clone() });

        let registration = match self.register(from, &name, price).await {
            Ok(hash) => hash,
            Err(err) => {
                warn!(name = %name, error = %err, "registration failed");
                self.set_phase(MintPhase::Failed {
                    name,
                    reason: err.to_string(),
                });
                return Err(err);
            }
        };

        info!(name = %name, tx = %registration, "domain registered, setting record");
        self.set_phase(MintPhase::RegisteredPendingRecord {
            name: name.clone(),
            registration,
        });

        // The network may have changed while the registration was pending.
        let attached = match self.writable_account() {
            Ok(from) => self.attach_record(from, &name, &draft.record).await,
            Err(err) => Err(err),
        };
        let record = match attached {
            Ok(hash) => hash,
            Err(err) => {
                let reason = err.to_string();
                warn!(name = %name, error = %reason, "record attach failed after registration");
                self.set_phase(MintPhase::Diverged {
                    name: name.clone(),
                    reason: reason.clone(),
                });
                return Err(GnsError::PartialMintDivergence { name, reason });
            }
        };

        info!(name = %name, tx = %record, "mint complete");
        self.set_phase(MintPhase::Complete { name: name.clone() });
        self.draft.borrow_mut().clear();

        Ok(MintOutcome {
            name,
            price,
            registration,
            record,
        })
    }

    /// Replace the record of a domain the connected account owns.
    ///
    /// Ownership is enforced by the contract; a non-owner's call reverts.
    pub async fn update(&self) -> Result<TxHash, GnsError> {
        let _flight = self.begin()?;
        let from = self.writable_account()?;
        let draft = self.draft();
        let name = normalize_name(&draft.name);
        if name.is_empty() {
            return Err(GnsError::EmptyField("Domain"));
        }
        if draft.record.is_empty() {
            return Err(GnsError::EmptyField("Record"));
        }

        info!(name = %name, "updating record");
        let hash = self.attach_record(from, &name, &draft.record).await.inspect_err(|err| {
            warn!(name = %name, error = %err, "record update failed");
        })?;

        info!(name = %name, tx = %hash, "record updated");
        self.draft.borrow_mut().clear();
        Ok(hash)
    }

    async fn register(&self, from: Address, name: &str, price: Price) -> Result<TxHash, GnsError> {
        let hash = self
            .contract
            .register(from, name, price.to_wei())
            .await
            .map_err(as_tx_failure)?;
        self.confirm(hash, "registration").await
    }

    async fn attach_record(&self, from: Address, name: &str, record: &str) -> Result<TxHash, GnsError> {
        let hash = self
            .contract
            .set_record(from, name, record)
            .await
            .map_err(as_tx_failure)?;
        self.confirm(hash, "record").await
    }

    /// Wait for inclusion and require a successful receipt.
    async fn confirm(&self, hash: TxHash, what: &str) -> Result<TxHash, GnsError> {
        let receipt = self
            .contract
            .wait_for_inclusion(hash)
            .await
            .map_err(as_tx_failure)?;
        if !receipt.success {
            return Err(GnsError::TransactionFailed(format!("{what} transaction {hash} reverted")));
        }
        Ok(hash)
    }

    fn begin(&self) -> Result<InFlight<'_>, GnsError> {
        if self.in_flight.replace(true) {
            return Err(GnsError::Busy);
        }
        Ok(InFlight(&self.in_flight))
    }

    /// Account allowed to write right now: connected and on the target network.
    fn writable_account(&self) -> Result<Address, GnsError> {
        let account = self.connection.account().ok_or(GnsError::NotConnected)?;
        self.network.ensure_target_network()?;
        Ok(account)
    }

    fn set_phase(&self, phase: MintPhase) {
        *self.phase.borrow_mut() = phase;
    }
}

/// Wallet failures while submitting or waiting count as a failed transaction;
/// a dismissed prompt stays distinguishable.
fn as_tx_failure(err: GnsError) -> GnsError {
    match err {
        GnsError::Provider(e) => GnsError::TransactionFailed(e.to_string()),
        other => other,
    }
}

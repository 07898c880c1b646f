//! Session context tying the components together.
//!
//! The presentation layer owns one [`Session`] and maps every user intent
//! onto one of its methods. Each intent resolves to a [`Notice`]; errors are
//! converted at this boundary and never escape.

use std::rc::Rc;

use alloy_primitives::Address;
use tracing::{debug, info, warn};

use crate::config::RegistryConfig;
use crate::connection::ConnectionManager;
use crate::contract::RegistryContract;
use crate::error::GnsError;
use crate::gateway::{ChainGateway, Timer};
use crate::listing::ListingSynchronizer;
use crate::models::{
    ConnectionState, DomainDraft, MintPhase, MintRecord, NetworkState, Notice, Price, WalletEvent,
};
use crate::network::NetworkGuard;
use crate::registry::RegistryClient;

pub struct Session<G, T> {
    config: RegistryConfig,
    timer: T,
    connection: Rc<ConnectionManager<G>>,
    network: Rc<NetworkGuard<G>>,
    registry: RegistryClient<G>,
    listing: ListingSynchronizer<G>,
}

impl<G: ChainGateway, T: Timer> Session<G, T> {
    pub fn new(gateway: G, timer: T, config: RegistryConfig) -> Self {
        let gateway = Rc::new(gateway);
        let contract = RegistryContract::new(Rc::clone(&gateway), config.contract_address);
        let connection = Rc::new(ConnectionManager::new(Rc::clone(&gateway)));
        let network = Rc::new(NetworkGuard::new(Rc::clone(&gateway), config.target.clone()));
        let registry = RegistryClient::new(
            contract.clone(),
            Rc::clone(&connection),
            Rc::clone(&network),
            config.names,
        );
        let listing = ListingSynchronizer::new(contract);

        Self {
            config,
            timer,
            connection,
            network,
            registry,
            listing,
        }
    }

    // =========================================================================
    // Projections
    // =========================================================================

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn connection(&self) -> ConnectionState {
        self.connection.state()
    }

    pub fn account(&self) -> Option<Address> {
        self.connection.account()
    }

    pub fn network(&self) -> NetworkState {
        self.network.state()
    }

    pub fn on_target_network(&self) -> bool {
        self.network.require_target_network()
    }

    pub fn records(&self) -> Vec<MintRecord> {
        self.listing.records()
    }

    pub fn draft(&self) -> DomainDraft {
        self.registry.draft()
    }

    pub fn mint_phase(&self) -> MintPhase {
        self.registry.phase()
    }

    pub fn price_preview(&self) -> Option<Price> {
        self.registry.price_preview()
    }

    /// UI loading flag: a mutation is awaiting inclusion.
    pub fn is_busy(&self) -> bool {
        self.registry.is_busy()
    }

    pub fn connection_manager(&self) -> &ConnectionManager<G> {
        &self.connection
    }

    pub fn network_guard(&self) -> &NetworkGuard<G> {
        &self.network
    }

    pub fn registry(&self) -> &RegistryClient<G> {
        &self.registry
    }

    pub fn listing(&self) -> &ListingSynchronizer<G> {
        &self.listing
    }

    // =========================================================================
    // Intents
    // =========================================================================

    /// Silent restore at application start, then the first network read.
    ///
    /// Reads do not need an account, so the network is read (and the listing
    /// refreshed when on target) whenever a wallet is injected, even if the
    /// restore failed.
    pub async fn start(&self) -> Notice {
        let restored = self.connection.restore_connection().await;
        if !self.connection.wallet_available() {
            return Notice::warning("Make sure you have MetaMask installed");
        }

        let network = self.read_network().await;
        match restored {
            Err(err) => self.report(err),
            Ok(_) if network.is_error() => network,
            Ok(Some(account)) => Notice::info(format!("Restored session for {account}")),
            Ok(None) => Notice::info("Connect a wallet to get started"),
        }
    }

    pub async fn connect(&self) -> Notice {
        match self.connection.request_connection().await {
            Ok(account) => {
                let notice = self.read_network().await;
                if notice.is_error() {
                    return notice;
                }
                Notice::success(format!("Connected {account}"))
            }
            Err(err) => self.report(err),
        }
    }

    pub async fn switch_network(&self) -> Notice {
        let was_on_target = self.on_target_network();
        match self.network.switch_to_target_network().await {
            Ok(added) => {
                self.refresh_if_newly_on_target(was_on_target).await;
                let name = &self.network.target().chain_name;
                if added {
                    Notice::success(format!("Added and switched to {name}"))
                } else {
                    Notice::success(format!("Switched to {name}"))
                }
            }
            Err(err) => self.report(err),
        }
    }

    /// Apply a wallet notification and re-derive the affected state.
    pub async fn handle_event(&self, event: WalletEvent) -> Option<Notice> {
        match event {
            WalletEvent::ChainChanged(chain_id) => {
                let was_on_target = self.on_target_network();
                let state = self.network.apply_chain_changed(chain_id);
                self.refresh_if_newly_on_target(was_on_target).await;
                (!self.on_target_network())
                    .then(|| Notice::warning(format!("Switched to {}", state.display_name())))
            }
            WalletEvent::AccountsChanged => {
                let notice = match self.connection.reconcile().await {
                    Ok(Some(_)) => None,
                    Ok(None) => Some(Notice::info("Wallet disconnected")),
                    Err(err) => Some(self.report(err)),
                };
                self.release_foreign_edit().or(notice)
            }
        }
    }

    pub fn set_draft_name(&self, name: impl Into<String>) {
        self.registry.set_draft_name(name);
    }

    pub fn set_draft_record(&self, record: impl Into<String>) {
        self.registry.set_draft_record(record);
    }

    pub fn begin_edit(&self, name: &str) -> Notice {
        let records = self.listing.records();
        match self.registry.begin_edit(name, &records) {
            Ok(()) => Notice::info(format!("Editing {}", self.full_name(name))),
            Err(err) => self.report(err),
        }
    }

    pub fn cancel_edit(&self) {
        self.registry.cancel_edit();
    }

    /// Mint the drafted name; schedules a refresh once the registry has settled.
    pub async fn submit_mint(&self) -> Notice {
        match self.registry.mint().await {
            Ok(outcome) => {
                self.settle_and_refresh().await;
                Notice::success(format!(
                    "Minted {} for {} {}",
                    self.full_name(&outcome.name),
                    outcome.price,
                    self.network.target().native_currency.symbol
                ))
            }
            Err(err @ GnsError::PartialMintDivergence { .. }) => {
                self.settle_and_refresh().await;
                self.report(err)
            }
            Err(err) => self.report(err),
        }
    }

    pub async fn submit_update(&self) -> Notice {
        let name = self.registry.draft().name;
        match self.registry.update().await {
            Ok(_) => {
                self.refresh_logged().await;
                Notice::success(format!("Record updated for {}", self.full_name(&name)))
            }
            Err(err) => self.report(err),
        }
    }

    /// Re-read the listing; errors become a notice.
    pub async fn refresh(&self) -> Option<Notice> {
        match self.listing.refresh().await {
            Ok(_) => None,
            Err(err) => Some(self.report(err)),
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    pub fn full_name(&self, name: &str) -> String {
        format!("{}.{}", name, self.config.tld.trim_start_matches('.'))
    }

    async fn read_network(&self) -> Notice {
        let was_on_target = self.on_target_network();
        match self.network.current_network().await {
            Ok(state) => {
                self.refresh_if_newly_on_target(was_on_target).await;
                Notice::info(format!("Network: {}", state.display_name()))
            }
            Err(err) => self.report(err),
        }
    }

    /// Cancel an open edit of a domain the current account does not own.
    fn release_foreign_edit(&self) -> Option<Notice> {
        let draft = self.registry.draft();
        if !draft.editing {
            return None;
        }
        let account = self.account();
        let owned = self
            .listing
            .records()
            .iter()
            .any(|r| r.name == draft.name && r.is_owned_by(account.as_ref()));
        if owned {
            return None;
        }

        info!(name = %draft.name, account = ?account, "cancelling edit after account change");
        self.registry.cancel_edit();
        Some(Notice::warning(format!(
            "Editing cancelled: {} is not owned by the connected account",
            self.full_name(&draft.name)
        )))
    }

    async fn refresh_if_newly_on_target(&self, was_on_target: bool) {
        if !was_on_target && self.on_target_network() {
            debug!("target network reached, refreshing listing");
            self.refresh_logged().await;
        }
    }

    async fn settle_and_refresh(&self) {
        debug!(ms = self.config.settle_delay_ms, "waiting for registry to settle");
        self.timer.sleep(self.config.settle_delay_ms).await;
        self.refresh_logged().await;
    }

    async fn refresh_logged(&self) {
        if let Err(err) = self.listing.refresh().await {
            warn!(error = %err, "listing refresh failed");
        }
    }

    fn report(&self, err: GnsError) -> Notice {
        info!(error = %err, recoverable = err.is_recoverable(), "operation ended with notice");
        Notice::from(err)
    }
}

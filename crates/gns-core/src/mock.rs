//! Scripted wallet provider for tests.
//!
//! [`MockGateway`] simulates a wallet on a small in-memory registry: names
//! register to the sender, records can only be set by the owner, and every
//! request is logged as a [`GatewayCall`]. Handles are cheap clones sharing
//! one state so a test can keep one while the session owns another.

use std::cell::RefCell;
use std::rc::Rc;

use alloy_primitives::{Address, Bytes, TxHash, U256};
use alloy_sol_types::{SolInterface, SolValue};
use async_trait::async_trait;
use futures::channel::oneshot;

use crate::config::{ChainDescriptor, NamePolicy};
use crate::contract::RegistryCall;
use crate::error::ProviderError;
use crate::gateway::{ChainGateway, Receipt, Timer, TransactionRequest};
use crate::pricing::price_for;

/// One request observed by the mock.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GatewayCall {
    Accounts,
    RequestAccounts,
    ChainId,
    SwitchChain(u64),
    AddChain(ChainDescriptor),
    Register { from: Address, name: String, value: U256 },
    SetRecord { from: Address, name: String, record: String },
    WaitForReceipt(TxHash),
    GetAllNames,
    Record(String),
    Owner(String),
}

impl GatewayCall {
    /// Whether the call reached the contract (read or write).
    pub fn touches_contract(&self) -> bool {
        matches!(
            self,
            Self::Register { .. }
                | Self::SetRecord { .. }
                | Self::WaitForReceipt(_)
                | Self::GetAllNames
                | Self::Record(_)
                | Self::Owner(_)
        )
    }
}

#[derive(Clone, Debug)]
struct Domain {
    name: String,
    record: String,
    owner: Address,
}

#[derive(Default)]
struct MockState {
    unavailable: bool,
    authorized: Vec<Address>,
    accounts_error: Option<ProviderError>,
    wallet_accounts: Vec<Address>,
    reject_connect: bool,
    chain_id: u64,
    known_chains: Vec<u64>,
    switch_error: Option<ProviderError>,
    add_error: Option<ProviderError>,
    domains: Vec<Domain>,
    receipts: Vec<Receipt>,
    revert_next_register: bool,
    revert_next_set_record: bool,
    reject_next_send: bool,
    read_error: Option<ProviderError>,
    hold_reads: Option<oneshot::Receiver<()>>,
    hold_receipt: Option<oneshot::Receiver<()>>,
    calls: Vec<GatewayCall>,
}

#[derive(Clone, Default)]
pub struct MockGateway {
    state: Rc<RefCell<MockState>>,
}

impl MockGateway {
    /// Wallet on `chain_id` holding `account`, not yet authorised for the app.
    pub fn new(account: Address, chain_id: u64) -> Self {
        let gateway = Self::default();
        {
            let mut state = gateway.state.borrow_mut();
            state.wallet_accounts = vec![account];
            state.chain_id = chain_id;
            state.known_chains = vec![chain_id];
        }
        gateway
    }

    /// No provider injected.
    pub fn unavailable() -> Self {
        let gateway = Self::default();
        gateway.state.borrow_mut().unavailable = true;
        gateway
    }

    // -------------------------------------------------------------------------
    // Scripting
    // -------------------------------------------------------------------------

    /// The account was authorised in an earlier visit.
    pub fn authorize(&self) -> &Self {
        let mut state = self.state.borrow_mut();
        state.authorized = state.wallet_accounts.clone();
        self
    }

    pub fn revoke(&self) -> &Self {
        self.state.borrow_mut().authorized.clear();
        self
    }

    /// Make `eth_accounts` fail until cleared with `None`.
    pub fn fail_accounts(&self, err: Option<ProviderError>) -> &Self {
        self.state.borrow_mut().accounts_error = err;
        self
    }

    pub fn reject_connect(&self) -> &Self {
        self.state.borrow_mut().reject_connect = true;
        self
    }

    /// Make the wallet aware of another chain it can switch to.
    pub fn know_chain(&self, chain_id: u64) -> &Self {
        self.state.borrow_mut().known_chains.push(chain_id);
        self
    }

    pub fn fail_switch(&self, err: ProviderError) -> &Self {
        self.state.borrow_mut().switch_error = Some(err);
        self
    }

    pub fn fail_add(&self, err: ProviderError) -> &Self {
        self.state.borrow_mut().add_error = Some(err);
        self
    }

    /// Switch the wallet's chain behind the app's back.
    pub fn set_chain(&self, chain_id: u64) -> &Self {
        self.state.borrow_mut().chain_id = chain_id;
        self
    }

    pub fn seed_domain(&self, name: &str, record: &str, owner: Address) -> &Self {
        self.state.borrow_mut().domains.push(Domain {
            name: name.to_string(),
            record: record.to_string(),
            owner,
        });
        self
    }

    pub fn revert_next_register(&self) -> &Self {
        self.state.borrow_mut().revert_next_register = true;
        self
    }

    pub fn revert_next_set_record(&self) -> &Self {
        self.state.borrow_mut().revert_next_set_record = true;
        self
    }

    pub fn reject_next_send(&self) -> &Self {
        self.state.borrow_mut().reject_next_send = true;
        self
    }

    pub fn fail_reads(&self, err: Option<ProviderError>) -> &Self {
        self.state.borrow_mut().read_error = err;
        self
    }

    /// Park the next contract read until the returned sender fires.
    pub fn hold_next_read(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.state.borrow_mut().hold_reads = Some(rx);
        tx
    }

    /// Park the next inclusion wait until the returned sender fires.
    pub fn hold_next_receipt(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.state.borrow_mut().hold_receipt = Some(rx);
        tx
    }

    // -------------------------------------------------------------------------
    // Inspection
    // -------------------------------------------------------------------------

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.state.borrow().calls.clone()
    }

    pub fn contract_calls(&self) -> Vec<GatewayCall> {
        self.calls()
            .into_iter()
            .filter(GatewayCall::touches_contract)
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&GatewayCall) -> bool) -> usize {
        self.state.borrow().calls.iter().filter(|c| pred(c)).count()
    }

    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    pub fn chain(&self) -> u64 {
        self.state.borrow().chain_id
    }

    pub fn record_of(&self, name: &str) -> Option<String> {
        self.state
            .borrow()
            .domains
            .iter()
            .find(|d| d.name == name)
            .map(|d| d.record.clone())
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.state.borrow().domains.iter().any(|d| d.name == name)
    }

    fn log(&self, call: GatewayCall) {
        self.state.borrow_mut().calls.push(call);
    }

    /// Apply a write to the registry; returns whether it would succeed on chain.
    fn execute(&self, tx: &TransactionRequest) -> Result<bool, ProviderError> {
        let call = RegistryCall::abi_decode(&tx.data)
            .map_err(|e| ProviderError::other(format!("bad calldata: {e}")))?;
        let mut state = self.state.borrow_mut();
        match call {
            RegistryCall::register(c) => {
                state.calls.push(GatewayCall::Register {
                    from: tx.from,
                    name: c.name.clone(),
                    value: tx.value,
                });
                if std::mem::take(&mut state.revert_next_register) {
                    return Ok(false);
                }
                let paid_enough = price_for(&c.name, &NamePolicy::default())
                    .is_ok_and(|price| tx.value >= price.to_wei());
                let taken = state.domains.iter().any(|d| d.name == c.name);
                if !paid_enough || taken {
                    return Ok(false);
                }
                state.domains.push(Domain {
                    name: c.name,
                    record: String::new(),
                    owner: tx.from,
                });
                Ok(true)
            }
            RegistryCall::setRecord(c) => {
                state.calls.push(GatewayCall::SetRecord {
                    from: tx.from,
                    name: c.name.clone(),
                    record: c.record.clone(),
                });
                if std::mem::take(&mut state.revert_next_set_record) {
                    return Ok(false);
                }
                match state
                    .domains
                    .iter_mut()
                    .find(|d| d.name == c.name && d.owner == tx.from)
                {
                    Some(domain) => {
                        domain.record = c.record;
                        Ok(true)
                    }
                    None => Ok(false),
                }
            }
            _ => Err(ProviderError::other("view function sent as transaction")),
        }
    }

    fn answer(&self, data: &[u8]) -> Result<Bytes, ProviderError> {
        let call = RegistryCall::abi_decode(data)
            .map_err(|e| ProviderError::other(format!("bad calldata: {e}")))?;
        let mut state = self.state.borrow_mut();
        let encoded = match call {
            RegistryCall::getAllNames(_) => {
                state.calls.push(GatewayCall::GetAllNames);
                let names: Vec<String> = state.domains.iter().map(|d| d.name.clone()).collect();
                (names,).abi_encode_params()
            }
            RegistryCall::records(c) => {
                state.calls.push(GatewayCall::Record(c.name.clone()));
                let record = state
                    .domains
                    .iter()
                    .find(|d| d.name == c.name)
                    .map(|d| d.record.clone())
                    .unwrap_or_default();
                (record,).abi_encode_params()
            }
            RegistryCall::domains(c) => {
                state.calls.push(GatewayCall::Owner(c.name.clone()));
                let owner = state
                    .domains
                    .iter()
                    .find(|d| d.name == c.name)
                    .map(|d| d.owner)
                    .unwrap_or(Address::ZERO);
                (owner,).abi_encode_params()
            }
            _ => return Err(ProviderError::other("transaction sent as eth_call")),
        };
        Ok(Bytes::from(encoded))
    }
}

#[async_trait(?Send)]
impl ChainGateway for MockGateway {
    fn is_available(&self) -> bool {
        !self.state.borrow().unavailable
    }

    async fn accounts(&self) -> Result<Vec<Address>, ProviderError> {
        self.log(GatewayCall::Accounts);
        let state = self.state.borrow();
        match &state.accounts_error {
            Some(err) => Err(err.clone()),
            None => Ok(state.authorized.clone()),
        }
    }

    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError> {
        self.log(GatewayCall::RequestAccounts);
        let mut state = self.state.borrow_mut();
        if state.reject_connect {
            return Err(ProviderError::user_rejected());
        }
        state.authorized = state.wallet_accounts.clone();
        Ok(state.authorized.clone())
    }

    async fn chain_id(&self) -> Result<u64, ProviderError> {
        self.log(GatewayCall::ChainId);
        Ok(self.state.borrow().chain_id)
    }

    async fn switch_chain(&self, chain_id: u64) -> Result<(), ProviderError> {
        self.log(GatewayCall::SwitchChain(chain_id));
        let mut state = self.state.borrow_mut();
        if let Some(err) = state.switch_error.clone() {
            return Err(err);
        }
        if !state.known_chains.contains(&chain_id) {
            return Err(ProviderError::unrecognized_chain(chain_id));
        }
        state.chain_id = chain_id;
        Ok(())
    }

    async fn add_chain(&self, descriptor: &ChainDescriptor) -> Result<(), ProviderError> {
        self.log(GatewayCall::AddChain(descriptor.clone()));
        let mut state = self.state.borrow_mut();
        if let Some(err) = state.add_error.clone() {
            return Err(err);
        }
        state.known_chains.push(descriptor.chain_id);
        state.chain_id = descriptor.chain_id;
        Ok(())
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxHash, ProviderError> {
        if std::mem::take(&mut self.state.borrow_mut().reject_next_send) {
            return Err(ProviderError::user_rejected());
        }
        let success = self.execute(&tx)?;
        let mut state = self.state.borrow_mut();
        let hash = TxHash::with_last_byte(state.receipts.len() as u8 + 1);
        let block_number = Some(state.receipts.len() as u64 + 1);
        state.receipts.push(Receipt {
            transaction_hash: hash,
            success,
            block_number,
        });
        Ok(hash)
    }

    async fn wait_for_receipt(&self, hash: TxHash) -> Result<Receipt, ProviderError> {
        self.log(GatewayCall::WaitForReceipt(hash));
        let hold = self.state.borrow_mut().hold_receipt.take();
        if let Some(hold) = hold {
            let _ = hold.await;
        }
        self.state
            .borrow()
            .receipts
            .iter()
            .find(|r| r.transaction_hash == hash)
            .copied()
            .ok_or_else(|| ProviderError::other(format!("unknown transaction {hash}")))
    }

    async fn call(&self, _to: Address, data: Bytes) -> Result<Bytes, ProviderError> {
        let hold = self.state.borrow_mut().hold_reads.take();
        if let Some(hold) = hold {
            let _ = hold.await;
        }
        if let Some(err) = self.state.borrow().read_error.clone() {
            return Err(err);
        }
        self.answer(&data)
    }
}

/// Timer that returns at once and remembers what it was asked for.
#[derive(Clone, Default)]
pub struct RecordingTimer {
    sleeps: Rc<RefCell<Vec<u32>>>,
}

impl RecordingTimer {
    pub fn sleeps(&self) -> Vec<u32> {
        self.sleeps.borrow().clone()
    }
}

#[async_trait(?Send)]
impl Timer for RecordingTimer {
    async fn sleep(&self, ms: u32) {
        self.sleeps.borrow_mut().push(ms);
    }
}

//! Seams to the outside world.
//!
//! [`ChainGateway`] is the only path to the wallet provider. [`Timer`]
//! supplies delays so session logic stays independent of the host runtime.

use alloy_primitives::{Address, Bytes, TxHash, U256};
use async_trait::async_trait;
use serde::Serialize;

use crate::config::ChainDescriptor;
use crate::error::ProviderError;

/// State-changing call handed to the wallet for signing.
///
/// Serialises as the `eth_sendTransaction` parameter object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TransactionRequest {
    pub from: Address,
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
}

/// Inclusion result of a submitted transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Receipt {
    pub transaction_hash: TxHash,
    pub success: bool,
    pub block_number: Option<u64>,
}

/// Requests against the single injected wallet provider.
///
/// All methods suspend; implementations are single-threaded (`?Send`).
#[async_trait(?Send)]
pub trait ChainGateway {
    /// Whether a provider is injected at all.
    fn is_available(&self) -> bool;

    /// Accounts already authorised for this origin (`eth_accounts`, no prompt).
    ///
    /// An implementation that gives up waiting returns
    /// [`ProviderError::timed_out()`] rather than an empty list.
    async fn accounts(&self) -> Result<Vec<Address>, ProviderError>;

    /// Prompt the user to authorise accounts (`eth_requestAccounts`).
    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError>;

    async fn chain_id(&self) -> Result<u64, ProviderError>;

    /// `wallet_switchEthereumChain`.
    async fn switch_chain(&self, chain_id: u64) -> Result<(), ProviderError>;

    /// `wallet_addEthereumChain`; wallets switch to the added chain.
    async fn add_chain(&self, descriptor: &ChainDescriptor) -> Result<(), ProviderError>;

    /// Sign and submit; resolves once the wallet returns the hash.
    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxHash, ProviderError>;

    /// Suspend until the transaction is included. No timeout.
    async fn wait_for_receipt(&self, hash: TxHash) -> Result<Receipt, ProviderError>;

    /// Read-only `eth_call` against the latest block.
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, ProviderError>;
}

/// Host-provided delay.
#[async_trait(?Send)]
pub trait Timer {
    async fn sleep(&self, ms: u32);
}

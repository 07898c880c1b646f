//! Wallet session and domain registry orchestration for the GangGang Name Service.
//!
//! This crate provides:
//! - [`ChainGateway`] and [`Timer`] seams to the wallet provider and host runtime
//! - [`ConnectionManager`] and [`NetworkGuard`] for the write gates
//! - [`RegistryClient`] for priced mints and record updates
//! - [`ListingSynchronizer`] for single-flight snapshots of every domain
//! - [`Session`], the context object the UI drives

pub mod config;
pub mod connection;
pub mod contract;
pub mod error;
pub mod gateway;
pub mod listing;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod models;
pub mod network;
pub mod pricing;
pub mod registry;
pub mod session;

pub use config::{ChainDescriptor, NamePolicy, NativeCurrency, RegistryConfig};
pub use connection::ConnectionManager;
pub use error::{GnsError, ProviderError};
pub use gateway::{ChainGateway, Receipt, Timer, TransactionRequest};
pub use listing::{ListingSynchronizer, RefreshOutcome};
pub use network::{NetworkGuard, network_name, parse_chain_id};
pub use pricing::price_for;
pub use registry::{MintOutcome, RegistryClient};
pub use session::Session;

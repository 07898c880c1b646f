//! Data models shared by the session components.
//!
//! - [`ConnectionState`], [`NetworkState`] - wallet session state
//! - [`DomainDraft`], [`MintRecord`], [`MintPhase`], [`Price`] - registry data
//! - [`Notice`] - user-visible outcome of an intent

mod domain;
mod notice;
mod wallet;

pub use domain::{DomainDraft, MintPhase, MintRecord, Price};
pub use notice::{Notice, NoticeLevel};
pub use wallet::{ConnectionState, NetworkName, NetworkState, WalletEvent, eth_address, short_address};

//! Browser bindings for the registry session.
//!
//! This module provides:
//! - [`Eip1193Gateway`] over the injected wallet, plus its event listeners
//! - [`BrowserTimer`] for the settle delay

mod timer;
pub mod wallet;

use gns_core::Session;

pub use timer::BrowserTimer;
pub use wallet::Eip1193Gateway;

/// The session as the browser runs it.
pub type WebSession = Session<Eip1193Gateway, BrowserTimer>;

//! Browser utilities.
//!
//! Provides:
//! - [`dom`] - window access, mount point, reload
//! - [`logging`] - `tracing` subscriber writing to the console
//! - [`race_with_timeout`] - promise racing for requests that may never settle

pub mod dom;
pub mod logging;
mod race;

pub use race::{RaceResult, race_with_timeout};

//! UI components built with Leptos.
//!
//! - [`Status`] - account, network, connect and switch actions
//! - [`Notices`] - outcome of the latest intents
//! - [`registry`] - mint/edit form and the listing of minted domains

mod notices;
pub mod registry;
pub mod status;

pub use notices::Notices;
pub use registry::{DomainForm, MintList};
pub use status::Status;

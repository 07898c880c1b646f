//! Error types for the registry client.
//!
//! - [`ProviderError`] - raw failure reported by the wallet provider
//! - [`GnsError`] - every failure an operation can surface to the user

use std::fmt;

use crate::models::NoticeLevel;

/// EIP-1193 code for a request the user dismissed in the wallet.
pub const USER_REJECTED_CODE: i64 = 4001;

/// EIP-3326 code for a chain the wallet has not been told about.
pub const UNRECOGNIZED_CHAIN_CODE: i64 = 4902;

/// Failure reported by the wallet provider for a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    /// Provider-specific numeric code, when the wallet supplied one.
    pub code: Option<i64>,
    pub message: String,
    /// The wallet did not answer within the caller's deadline.
    pub timed_out: bool,
}

impl ProviderError {
    pub fn new(code: Option<i64>, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            timed_out: false,
        }
    }

    /// Failure without a provider code (transport, missing object, bad reply).
    pub fn other(message: impl Into<String>) -> Self {
        Self::new(None, message)
    }

    pub fn user_rejected() -> Self {
        Self::new(Some(USER_REJECTED_CODE), "User rejected the request.")
    }

    pub fn unrecognized_chain(chain_id: u64) -> Self {
        Self::new(
            Some(UNRECOGNIZED_CHAIN_CODE),
            format!("Unrecognized chain ID 0x{chain_id:x}."),
        )
    }

    pub fn timed_out(method: &str, ms: u32) -> Self {
        Self {
            timed_out: true,
            ..Self::other(format!("{method} got no answer within {ms} ms"))
        }
    }

    pub fn is_user_rejection(&self) -> bool {
        self.code == Some(USER_REJECTED_CODE)
    }

    pub fn is_unrecognized_chain(&self) -> bool {
        self.code == Some(UNRECOGNIZED_CHAIN_CODE)
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "{} (code {})", self.message, code),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ProviderError {}

/// Errors surfaced by session operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GnsError {
    #[error("No wallet found. Get MetaMask -> https://metamask.io/")]
    WalletUnavailable,

    #[error("Request was rejected in the wallet")]
    UserRejected,

    #[error("Domain must be {} characters (got {len})", length_range(*.min, *.max))]
    InvalidDomainLength {
        len: usize,
        min: usize,
        max: Option<usize>,
    },

    #[error("Wrong network: connected to {actual}, switch to {expected}")]
    NetworkMismatch { expected: String, actual: String },

    #[error("Target network is not added to the wallet yet")]
    ChainAddRequired,

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    #[error("{name} was registered but its record could not be set: {reason}")]
    PartialMintDivergence { name: String, reason: String },

    #[error("Connect a wallet first")]
    NotConnected,

    #[error("Another transaction is still pending")]
    Busy,

    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    #[error("{name} is not owned by the connected account")]
    NotOwner { name: String },

    #[error("Wallet request failed: {0}")]
    Provider(ProviderError),

    #[error("Malformed contract response: {0}")]
    Decode(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

fn length_range(min: usize, max: Option<usize>) -> String {
    match max {
        Some(max) => format!("{min}-{max}"),
        None => format!("at least {min}"),
    }
}

impl GnsError {
    /// Notice level used when the error reaches the user.
    pub fn level(&self) -> NoticeLevel {
        match self {
            Self::WalletUnavailable
            | Self::TransactionFailed(_)
            | Self::Provider(_)
            | Self::Decode(_)
            | Self::Config(_) => NoticeLevel::Error,
            _ => NoticeLevel::Warning,
        }
    }

    /// Whether the user can recover without reloading or installing anything.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::WalletUnavailable | Self::Config(_))
    }
}

impl From<ProviderError> for GnsError {
    fn from(err: ProviderError) -> Self {
        if err.is_user_rejection() {
            Self::UserRejected
        } else if err.is_unrecognized_chain() {
            Self::ChainAddRequired
        } else {
            Self::Provider(err)
        }
    }
}

impl From<alloy_sol_types::Error> for GnsError {
    fn from(err: alloy_sol_types::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

use std::fmt;

use alloy_primitives::{Address, TxHash, U256};

use super::wallet::short_address;

/// Wei per milli native unit (10^15).
const WEI_PER_MILLI: u64 = 1_000_000_000_000_000;

/// Registration price in milli native-currency units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Price {
    milli: u64,
}

impl Price {
    pub const fn from_milli(milli: u64) -> Self {
        Self { milli }
    }

    pub const fn milli(&self) -> u64 {
        self.milli
    }

    /// Amount attached to the registration transaction.
    pub fn to_wei(&self) -> U256 {
        U256::from(self.milli) * U256::from(WEI_PER_MILLI)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.milli / 1000;
        let frac = self.milli % 1000;
        if frac == 0 {
            return write!(f, "{whole}");
        }
        let digits = format!("{frac:03}");
        write!(f, "{}.{}", whole, digits.trim_end_matches('0'))
    }
}

/// Form input for a mint or an edit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DomainDraft {
    pub name: String,
    pub record: String,
    /// Set while editing an existing domain owned by the connected account.
    pub editing: bool,
}

impl DomainDraft {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.record.is_empty()
    }
}

/// One registered domain as read from the contract.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MintRecord {
    /// Position in the contract's enumeration.
    pub index: usize,
    pub name: String,
    pub record: String,
    pub owner: Address,
}

impl MintRecord {
    /// Name with the registry suffix, e.g. `abc.gang`.
    pub fn full_name(&self, tld: &str) -> String {
        format!("{}.{}", self.name, tld.trim_start_matches('.'))
    }

    pub fn short_owner(&self) -> String {
        short_address(&self.owner)
    }

    pub fn is_owned_by(&self, account: Option<&Address>) -> bool {
        account == Some(&self.owner)
    }

    /// Owner page on the block explorer.
    pub fn owner_url(&self, explorer: &str) -> String {
        format!(
            "{}/address/{}",
            explorer.trim_end_matches('/'),
            self.owner.to_checksum(None)
        )
    }
}

/// Progress of the two-step mint: register with payment, then attach the record.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum MintPhase {
    #[default]
    Idle,
    Registering {
        name: String,
    },
    RegisteredPendingRecord {
        name: String,
        registration: TxHash,
    },
    Complete {
        name: String,
    },
    /// The name is registered but carries no record.
    Diverged {
        name: String,
        reason: String,
    },
    /// Registration did not succeed; nothing changed on chain.
    Failed {
        name: String,
        reason: String,
    },
}

impl MintPhase {
    pub fn is_pending(&self) -> bool {
        matches!(
            self,
            Self::Registering { .. } | Self::RegisteredPendingRecord { .. }
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Registering { .. } => "registering",
            Self::RegisteredPendingRecord { .. } => "setting record",
            Self::Complete { .. } => "complete",
            Self::Diverged { .. } => "registered without record",
            Self::Failed { .. } => "failed",
        }
    }
}

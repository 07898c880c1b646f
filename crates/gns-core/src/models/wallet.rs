use alloy_primitives::Address;

/// Display layout for shortened `0x1234...5678` addresses.
pub mod eth_address {
    /// Characters kept from the start, including `0x`.
    pub const PREFIX_LEN: usize = 6;
    /// Characters kept from the end.
    pub const SUFFIX_LEN: usize = 4;
}

/// Format an address for display (`0x1234...5678`).
pub fn short_address(address: &Address) -> String {
    let full = address.to_checksum(None);
    format!(
        "{}...{}",
        &full[..eth_address::PREFIX_LEN],
        &full[full.len() - eth_address::SUFFIX_LEN..]
    )
}

/// Account the wallet has authorised for this application.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConnectionState {
    pub account: Option<Address>,
}

impl ConnectionState {
    pub fn is_connected(&self) -> bool {
        self.account.is_some()
    }

    /// Shortened account or "Not connected".
    pub fn display_name(&self) -> String {
        match &self.account {
            Some(address) => short_address(address),
            None => "Not connected".to_string(),
        }
    }
}

/// Name resolved for a chain identifier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NetworkName {
    Known(&'static str),
    #[default]
    Unrecognized,
}

impl NetworkName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Known(name) => name,
            Self::Unrecognized => "Unrecognized network",
        }
    }
}

/// Network the wallet currently points at.
///
/// `chain_id` is `None` until the wallet has been queried at least once.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NetworkState {
    pub chain_id: Option<u64>,
    pub name: NetworkName,
}

impl NetworkState {
    pub fn is_resolved(&self) -> bool {
        self.chain_id.is_some()
    }

    pub fn display_name(&self) -> &'static str {
        if self.is_resolved() {
            self.name.as_str()
        } else {
            "—"
        }
    }
}

/// Notifications pushed by the wallet provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WalletEvent {
    /// `chainChanged` with the new chain identifier.
    ChainChanged(u64),
    /// `accountsChanged`; the payload is not trusted, accounts are re-queried.
    AccountsChanged,
}

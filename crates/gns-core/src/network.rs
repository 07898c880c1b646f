//! Network identity and the target-network gate.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{info, warn};

use crate::config::ChainDescriptor;
use crate::error::GnsError;
use crate::gateway::ChainGateway;
use crate::models::{NetworkName, NetworkState};

/// Convert a chain ID to its network name.
pub fn network_name(chain_id: u64) -> NetworkName {
    let name = match chain_id {
        1 => "Ethereum",
        11155111 => "Sepolia",
        17000 => "Holesky",
        42161 => "Arbitrum",
        10 => "Optimism",
        8453 => "Base",
        137 => "Polygon",
        80001 => "Polygon Mumbai Testnet",
        80002 => "Polygon Amoy Testnet",
        56 => "BNB Chain",
        43114 => "Avalanche",
        324 => "zkSync Era",
        59144 => "Linea",
        534352 => "Scroll",
        _ => return NetworkName::Unrecognized,
    };
    NetworkName::Known(name)
}

/// Parse an EIP-1193 hex quantity such as `"0x13881"`.
pub fn parse_chain_id(hex: &str) -> Option<u64> {
    let digits = hex.strip_prefix("0x").or_else(|| hex.strip_prefix("0X"))?;
    u64::from_str_radix(digits, 16).ok()
}

/// Owns [`NetworkState`] and enforces the target network.
pub struct NetworkGuard<G> {
    gateway: Rc<G>,
    target: ChainDescriptor,
    state: RefCell<NetworkState>,
}

impl<G: ChainGateway> NetworkGuard<G> {
    pub fn new(gateway: Rc<G>, target: ChainDescriptor) -> Self {
        Self {
            gateway,
            target,
            state: RefCell::new(NetworkState::default()),
        }
    }

    pub fn target(&self) -> &ChainDescriptor {
        &self.target
    }

    pub fn state(&self) -> NetworkState {
        *self.state.borrow()
    }

    /// Read the wallet's active chain and store it.
    pub async fn current_network(&self) -> Result<NetworkState, GnsError> {
        let chain_id = self.gateway.chain_id().await?;
        Ok(self.apply_chain_changed(chain_id))
    }

    /// Whether the stored network is the target. Callers check this before any write.
    pub fn require_target_network(&self) -> bool {
        self.state.borrow().chain_id == Some(self.target.chain_id)
    }

    /// Gate as a `Result`, carrying both network names.
    pub fn ensure_target_network(&self) -> Result<(), GnsError> {
        if self.require_target_network() {
            return Ok(());
        }
        Err(GnsError::NetworkMismatch {
            expected: self.target.chain_name.clone(),
            actual: self.state.borrow().display_name().to_string(),
        })
    }

    /// Re-derive the stored network from a `chainChanged` notification.
    pub fn apply_chain_changed(&self, chain_id: u64) -> NetworkState {
        let next = NetworkState {
            chain_id: Some(chain_id),
            name: network_name(chain_id),
        };
        let previous = self.state.replace(next);
        if previous != next {
            info!(chain_id, network = next.display_name(), "network changed");
        }
        next
    }

    /// Ask the wallet to switch to the target chain, adding it first if unknown.
    ///
    /// Returns whether the add-chain fallback was used.
    pub async fn switch_to_target_network(&self) -> Result<bool, GnsError> {
        let chain_id = self.target.chain_id;
        let added = match self.gateway.switch_chain(chain_id).await.map_err(GnsError::from) {
            Ok(()) => false,
            Err(GnsError::ChainAddRequired) => {
                info!(chain_id, "target chain unknown to wallet, adding it");
                self.gateway.add_chain(&self.target).await?;
                true
            }
            Err(err) => {
                warn!(chain_id, error = %err, "network switch failed");
                return Err(err);
            }
        };

        self.current_network().await?;
        Ok(added)
    }
}

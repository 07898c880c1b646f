//! Registry contract binding.
//!
//! Encodes calls with the contract ABI and routes them through the
//! [`ChainGateway`]. Reads go through `eth_call`, writes through the wallet.

use std::rc::Rc;

use alloy_primitives::{Address, Bytes, TxHash, U256};
use alloy_sol_types::{SolCall, SolValue, sol};
use tracing::debug;

use crate::error::GnsError;
use crate::gateway::{ChainGateway, Receipt, TransactionRequest};

sol! {
    /// Name service registry deployed on the target chain.
    interface IGangRegistry {
        function register(string calldata name) external payable;
        function setRecord(string calldata name, string calldata record) external;
        function getAllNames() external view returns (string[] memory);
        function records(string calldata name) external view returns (string memory);
        function domains(string calldata name) external view returns (address);
    }
}

pub use IGangRegistry::IGangRegistryCalls as RegistryCall;

/// Typed handle on the deployed registry.
pub struct RegistryContract<G> {
    gateway: Rc<G>,
    address: Address,
}

impl<G> Clone for RegistryContract<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: Rc::clone(&self.gateway),
            address: self.address,
        }
    }
}

impl<G: ChainGateway> RegistryContract<G> {
    pub fn new(gateway: Rc<G>, address: Address) -> Self {
        Self { gateway, address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    // -------------------------------------------------------------------------
    // Writes
    // -------------------------------------------------------------------------

    /// Submit `register(name)` paying `value`.
    pub async fn register(&self, from: Address, name: &str, value: U256) -> Result<TxHash, GnsError> {
        let data = IGangRegistry::registerCall {
            name: name.to_string(),
        }
        .abi_encode();
        self.send(from, value, data).await
    }

    /// Submit `setRecord(name, record)`.
    pub async fn set_record(&self, from: Address, name: &str, record: &str) -> Result<TxHash, GnsError> {
        let data = IGangRegistry::setRecordCall {
            name: name.to_string(),
            record: record.to_string(),
        }
        .abi_encode();
        self.send(from, U256::ZERO, data).await
    }

    pub async fn wait_for_inclusion(&self, hash: TxHash) -> Result<Receipt, GnsError> {
        let receipt = self.gateway.wait_for_receipt(hash).await?;
        debug!(tx = %hash, success = receipt.success, block = ?receipt.block_number, "transaction included");
        Ok(receipt)
    }

    async fn send(&self, from: Address, value: U256, data: Vec<u8>) -> Result<TxHash, GnsError> {
        let tx = TransactionRequest {
            from,
            to: self.address,
            value,
            data: Bytes::from(data),
        };
        let hash = self.gateway.send_transaction(tx).await?;
        debug!(tx = %hash, "transaction submitted");
        Ok(hash)
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    /// Every registered name in contract order.
    pub async fn all_names(&self) -> Result<Vec<String>, GnsError> {
        let ret = self.read(IGangRegistry::getAllNamesCall {}.abi_encode()).await?;
        let (names,) = <(Vec<String>,)>::abi_decode_params(&ret)?;
        Ok(names)
    }

    pub async fn record_of(&self, name: &str) -> Result<String, GnsError> {
        let data = IGangRegistry::recordsCall {
            name: name.to_string(),
        }
        .abi_encode();
        let ret = self.read(data).await?;
        let (record,) = <(String,)>::abi_decode_params(&ret)?;
        Ok(record)
    }

    pub async fn owner_of(&self, name: &str) -> Result<Address, GnsError> {
        let data = IGangRegistry::domainsCall {
            name: name.to_string(),
        }
        .abi_encode();
        let ret = self.read(data).await?;
        let (owner,) = <(Address,)>::abi_decode_params(&ret)?;
        Ok(owner)
    }

    async fn read(&self, data: Vec<u8>) -> Result<Bytes, GnsError> {
        Ok(self.gateway.call(self.address, Bytes::from(data)).await?)
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::address;
    use alloy_sol_types::SolInterface;

    use super::*;
    use crate::mock::{GatewayCall, MockGateway};

    const CONTRACT: Address = address!("00000000000000000000000000000000000c0de5");

    #[tokio::test]
    async fn test_reads_decode_listing_lookups() {
        let alice = address!("00000000000000000000000000000000000a11ce");
        let gateway = MockGateway::new(alice, 80001);
        gateway.seed_domain("abc", "hello", alice);
        let contract = RegistryContract::new(Rc::new(gateway.clone()), CONTRACT);

        assert_eq!(contract.all_names().await.unwrap(), ["abc"]);
        assert_eq!(contract.record_of("abc").await.unwrap(), "hello");
        assert_eq!(contract.owner_of("abc").await.unwrap(), alice);
        assert_eq!(contract.owner_of("zzz").await.unwrap(), Address::ZERO);
        assert_eq!(
            gateway.contract_calls(),
            vec![
                GatewayCall::GetAllNames,
                GatewayCall::Record("abc".into()),
                GatewayCall::Owner("abc".into()),
                GatewayCall::Owner("zzz".into()),
            ]
        );
    }

    #[test]
    fn test_interface_has_only_used_calls() {
        // register, setRecord, getAllNames, records, domains
        assert_eq!(<RegistryCall as SolInterface>::COUNT, 5);
    }
}

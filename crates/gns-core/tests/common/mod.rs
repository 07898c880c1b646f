//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use alloy_primitives::{Address, address};
use gns_core::mock::{MockGateway, RecordingTimer};
use gns_core::{RegistryConfig, Session};

/// Polygon Mumbai, the default target.
pub const TARGET_CHAIN: u64 = 80001;
/// Ethereum mainnet, never the target.
pub const OTHER_CHAIN: u64 = 1;

pub type TestSession = Session<MockGateway, RecordingTimer>;

pub fn alice() -> Address {
    address!("00000000000000000000000000000000000a11ce")
}

pub fn bob() -> Address {
    address!("0000000000000000000000000000000000000b0b")
}

pub fn session_with(gateway: &MockGateway, config: RegistryConfig) -> (TestSession, RecordingTimer) {
    let timer = RecordingTimer::default();
    (Session::new(gateway.clone(), timer.clone(), config), timer)
}

pub fn session(gateway: &MockGateway) -> (TestSession, RecordingTimer) {
    session_with(gateway, RegistryConfig::default())
}

/// Authorised wallet on the target chain, started and with calls cleared.
pub async fn ready_session() -> (MockGateway, TestSession, RecordingTimer) {
    let gateway = MockGateway::new(alice(), TARGET_CHAIN);
    gateway.authorize();
    let (session, timer) = session(&gateway);
    session.start().await;
    gateway.clear_calls();
    (gateway, session, timer)
}

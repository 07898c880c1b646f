//! Application configuration.
//!
//! Centralizes the constants of the web client. The registry deployment is
//! loaded at compile time from `assets/registry.toml` using `include_str!`.

use gns_core::RegistryConfig;

// =============================================================================
// Registry Deployment (loaded at compile time)
// =============================================================================

/// TOML document describing the contract and target network.
pub const REGISTRY_TOML: &str = include_str!("../assets/registry.toml");

/// Parse [`REGISTRY_TOML`], falling back to the built-in defaults.
pub fn registry_config() -> RegistryConfig {
    RegistryConfig::from_toml(REGISTRY_TOML).unwrap_or_else(|e| {
        tracing::error!(error = %e, "invalid registry.toml, using built-in defaults");
        RegistryConfig::default()
    })
}

// =============================================================================
// Application Metadata
// =============================================================================

/// Title shown in the header.
pub const APP_NAME: &str = "GangGang Name Service";

/// Element the app mounts into.
pub const MOUNT_ID: &str = "app";

/// Wallet download page shown when no provider is injected.
pub const WALLET_INSTALL_URL: &str = "https://metamask.io/";

// =============================================================================
// Wallet Configuration
// =============================================================================

/// Timeout for the silent `eth_accounts` query at startup, in milliseconds.
pub const WALLET_TIMEOUT_MS: i32 = 2000;

// =============================================================================
// UI Configuration
// =============================================================================

/// Notices kept on screen; older ones are dropped.
pub const MAX_NOTICES: usize = 5;

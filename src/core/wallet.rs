//! EIP-1193 wallet binding using web-sys.
//!
//! Implements [`ChainGateway`] over the `window.ethereum` object injected by
//! MetaMask (or a compatible wallet) through direct JavaScript interop via
//! the Reflect API.

use alloy_primitives::{Address, Bytes, TxHash};
use async_trait::async_trait;
use gloo_timers::future::TimeoutFuture;
use gns_core::{ChainDescriptor, ChainGateway, ProviderError, Receipt, TransactionRequest, parse_chain_id};
use js_sys::{Function, Object, Promise, Reflect};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_wasm_bindgen::Serializer;
use tracing::{debug, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::Closure;
use wasm_bindgen_futures::JsFuture;

use crate::config::WALLET_TIMEOUT_MS;
use crate::utils::{RaceResult, dom, race_with_timeout};

/// Get the window.ethereum object injected by the wallet.
fn get_ethereum() -> Result<Object, ProviderError> {
    let window = dom::window().ok_or_else(|| ProviderError::other("window not available"))?;
    Reflect::get(&window, &"ethereum".into())
        .ok()
        .and_then(|v| v.dyn_into::<Object>().ok())
        .ok_or_else(|| ProviderError::other("no wallet provider injected"))
}

/// Map a rejected request (`{ code, message }`) to a [`ProviderError`].
fn provider_error(value: &JsValue) -> ProviderError {
    let code = Reflect::get(value, &"code".into())
        .ok()
        .and_then(|c| c.as_f64())
        .map(|c| c as i64);
    let message = Reflect::get(value, &"message".into())
        .ok()
        .and_then(|m| m.as_string())
        .or_else(|| value.as_string())
        .unwrap_or_else(|| format!("{value:?}"));
    ProviderError::new(code, message)
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, ProviderError> {
    value
        .serialize(&Serializer::json_compatible())
        .map_err(|e| ProviderError::other(format!("could not encode request: {e}")))
}

fn from_js<T: DeserializeOwned>(value: JsValue) -> Result<T, ProviderError> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| ProviderError::other(format!("unexpected wallet response: {e}")))
}

/// Start `ethereum.request({ method, params })` and return its promise.
fn request_promise(method: &str, params: Option<JsValue>) -> Result<Promise, ProviderError> {
    let ethereum = get_ethereum()?;

    let args = Object::new();
    Reflect::set(&args, &"method".into(), &method.into())
        .map_err(|e| provider_error(&e))?;
    if let Some(params) = params {
        Reflect::set(&args, &"params".into(), &params).map_err(|e| provider_error(&e))?;
    }

    let request = Reflect::get(&ethereum, &"request".into())
        .map_err(|e| provider_error(&e))?
        .dyn_into::<Function>()
        .map_err(|_| ProviderError::other("ethereum.request is not a function"))?;

    Ok(request
        .call1(&ethereum, &args)
        .map_err(|e| provider_error(&e))?
        .into())
}

/// Call `ethereum.request` and await the result.
async fn ethereum_request(method: &str, params: Option<JsValue>) -> Result<JsValue, ProviderError> {
    let promise = request_promise(method, params)?;
    JsFuture::from(promise).await.map_err(|e| {
        let err = provider_error(&e);
        debug!(method, error = %err, "wallet request rejected");
        err
    })
}

// ============================================================================
// Request Shapes
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SwitchChainParams {
    chain_id: String,
}

#[derive(Serialize)]
struct CallParams {
    to: Address,
    data: Bytes,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RpcReceipt {
    transaction_hash: TxHash,
    status: Option<String>,
    block_number: Option<String>,
}

/// Parse a hex JSON-RPC quantity such as `"0x1"`.
fn parse_quantity(hex: &str) -> Option<u64> {
    u64::from_str_radix(hex.strip_prefix("0x")?, 16).ok()
}

impl RpcReceipt {
    fn into_receipt(self) -> Receipt {
        Receipt {
            transaction_hash: self.transaction_hash,
            success: self.status.as_deref().and_then(parse_quantity) == Some(1),
            block_number: self.block_number.as_deref().and_then(parse_quantity),
        }
    }
}

// ============================================================================
// Gateway
// ============================================================================

/// Gateway over the injected provider.
pub struct Eip1193Gateway {
    receipt_poll_ms: u32,
}

impl Eip1193Gateway {
    pub fn new(receipt_poll_ms: u32) -> Self {
        Self { receipt_poll_ms }
    }
}

#[async_trait(?Send)]
impl ChainGateway for Eip1193Gateway {
    fn is_available(&self) -> bool {
        get_ethereum().is_ok()
    }

    /// Raced against a timeout so a locked wallet cannot stall startup. A
    /// timeout is an error, not an empty account list.
    async fn accounts(&self) -> Result<Vec<Address>, ProviderError> {
        let promise = request_promise("eth_accounts", None)?;
        match race_with_timeout(promise, WALLET_TIMEOUT_MS).await {
            RaceResult::Completed(result) => from_js(result),
            RaceResult::TimedOut => {
                warn!(timeout_ms = WALLET_TIMEOUT_MS, "eth_accounts timed out");
                Err(ProviderError::timed_out("eth_accounts", WALLET_TIMEOUT_MS.unsigned_abs()))
            }
            RaceResult::Error(e) => Err(provider_error(&e)),
        }
    }

    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError> {
        from_js(ethereum_request("eth_requestAccounts", None).await?)
    }

    async fn chain_id(&self) -> Result<u64, ProviderError> {
        let result = ethereum_request("eth_chainId", None).await?;
        result
            .as_string()
            .as_deref()
            .and_then(parse_chain_id)
            .ok_or_else(|| ProviderError::other(format!("invalid chain id {result:?}")))
    }

    async fn switch_chain(&self, chain_id: u64) -> Result<(), ProviderError> {
        let params = [SwitchChainParams {
            chain_id: format!("{chain_id:#x}"),
        }];
        ethereum_request("wallet_switchEthereumChain", Some(to_js(&params)?)).await?;
        Ok(())
    }

    async fn add_chain(&self, descriptor: &ChainDescriptor) -> Result<(), ProviderError> {
        let params = [descriptor.add_chain_params()];
        ethereum_request("wallet_addEthereumChain", Some(to_js(&params)?)).await?;
        Ok(())
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxHash, ProviderError> {
        let params = [tx];
        from_js(ethereum_request("eth_sendTransaction", Some(to_js(&params)?)).await?)
    }

    /// Polls until the wallet's node reports the transaction; never times out.
    async fn wait_for_receipt(&self, hash: TxHash) -> Result<Receipt, ProviderError> {
        loop {
            let params = to_js(&[hash])?;
            let result = ethereum_request("eth_getTransactionReceipt", Some(params)).await?;
            if let Some(receipt) = from_js::<Option<RpcReceipt>>(result)? {
                return Ok(receipt.into_receipt());
            }
            TimeoutFuture::new(self.receipt_poll_ms).await;
        }
    }

    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, ProviderError> {
        let params = (CallParams { to, data }, "latest");
        from_js(ethereum_request("eth_call", Some(to_js(&params)?)).await?)
    }
}

// ============================================================================
// Event Listeners
// ============================================================================

/// Subscribe to a provider event with `ethereum.on(event, listener)`.
///
/// The closure is leaked with `forget()`: the listener lives as long as the
/// page does.
fn subscribe(event: &str, listener: impl Fn(JsValue) + 'static) -> Result<(), ProviderError> {
    let ethereum = get_ethereum()?;

    let closure = Closure::wrap(Box::new(listener) as Box<dyn Fn(JsValue)>);

    let on_fn = Reflect::get(&ethereum, &"on".into())
        .map_err(|e| provider_error(&e))?
        .dyn_into::<Function>()
        .map_err(|_| ProviderError::other("ethereum.on is not a function"))?;

    on_fn
        .call2(&ethereum, &event.into(), closure.as_ref())
        .map_err(|e| provider_error(&e))?;

    closure.forget();
    Ok(())
}

/// Register a callback for when the authorised accounts change.
///
/// The payload is ignored; the session re-queries `eth_accounts` itself.
pub fn on_accounts_changed(callback: impl Fn() + 'static) -> Result<(), ProviderError> {
    subscribe("accountsChanged", move |_| callback())
}

/// Register a callback for when the active chain changes.
///
/// The callback receives the new chain id parsed from its hex form.
pub fn on_chain_changed(callback: impl Fn(u64) + 'static) -> Result<(), ProviderError> {
    subscribe("chainChanged", move |chain_id: JsValue| {
        match chain_id.as_string().as_deref().and_then(parse_chain_id) {
            Some(id) => callback(id),
            None => warn!(payload = ?chain_id, "ignoring malformed chainChanged payload"),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("0x0"), Some(0));
        assert_eq!(parse_quantity("0x1"), Some(1));
        assert_eq!(parse_quantity("0x1b4"), Some(436));
        assert_eq!(parse_quantity("1"), None);
    }

    #[test]
    fn test_receipt_status() {
        let receipt = |status: Option<&str>| RpcReceipt {
            transaction_hash: TxHash::with_last_byte(7),
            status: status.map(str::to_string),
            block_number: Some("0x10".into()),
        };

        let ok = receipt(Some("0x1")).into_receipt();
        assert!(ok.success);
        assert_eq!(ok.block_number, Some(16));
        assert!(!receipt(Some("0x0")).into_receipt().success);
        assert!(!receipt(None).into_receipt().success);
    }
}

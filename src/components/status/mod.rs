//! Status bar component.
//!
//! Displays the account and network, with the connect and switch actions.

use leptos::prelude::*;

use crate::app::AppContext;
use crate::config::{APP_NAME, WALLET_INSTALL_URL};

/// Status bar showing session and network, plus the actions that fix them.
///
/// | Wallet state | Action shown |
/// |--------------|--------------|
/// | No provider injected | Link to install a wallet |
/// | Not connected | "Connect Wallet" |
/// | Connected, wrong network | "Switch to {target}" |
#[component]
pub fn Status() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided at root");

    let session_name = Signal::derive(move || ctx.connection.with(|c| c.display_name()));
    let network_name = Signal::derive(move || ctx.network.with(|n| n.display_name()));
    let target_name = ctx.target_name();

    let action = move || {
        let button = if !ctx.wallet_available.get() {
            view! {
                <a class="action" href=WALLET_INSTALL_URL target="_blank" rel="noopener">
                    "Get MetaMask"
                </a>
            }
            .into_any()
        } else if !ctx.connection.with(|c| c.is_connected()) {
            view! {
                <button class="action" on:click=move |_| ctx.connect()>"Connect Wallet"</button>
            }
            .into_any()
        } else if !ctx.on_target.get() {
            let label = format!("Switch to {target_name}");
            view! {
                <button class="action" on:click=move |_| ctx.switch_network()>{label}</button>
            }
            .into_any()
        } else {
            return None;
        };
        Some(button)
    };

    view! {
        <header class="status">
            <span class="title">{APP_NAME}</span>
            <span class="label">
                <span class="label-text">"Session:"</span>
                <span class="value">{session_name}</span>
            </span>
            <span class="label">
                <span class="label-text">"Network:"</span>
                <span class="value" class:mismatch=move || !ctx.on_target.get()>{network_name}</span>
            </span>
            {action}
        </header>
    }
}

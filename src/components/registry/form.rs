//! Mint and edit form.

use leptos::prelude::*;

use crate::app::AppContext;

/// Domain/record inputs with the price preview and submit actions.
///
/// Only shown once an account is connected on the target network; the
/// gate itself is enforced again by the session on submit.
#[component]
pub fn DomainForm() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");

    let ready = move || ctx.on_target.get() && ctx.connection.with(|c| c.is_connected());
    let target_name = ctx.target_name();

    view! {
        <section class="domain-form">
            <Show
                when=ready
                fallback=move || view! {
                    <p class="hint">{format!("Connect a wallet on {target_name} to mint a domain")}</p>
                }
            >
                <FormFields />
            </Show>
        </section>
    }
}

#[component]
fn FormFields() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");

    let suffix = format!(".{}", ctx.tld());
    let symbol = ctx.currency_symbol();
    let editing = move || ctx.draft.with(|d| d.editing);
    let busy = move || ctx.busy.get();

    let title = move || if editing() { "Update your domain" } else { "Mint a domain" };
    let price = move || {
        ctx.price
            .get()
            .map(|p| format!("{p} {symbol}"))
            .unwrap_or_else(|| "-".to_string())
    };
    let phase = move || {
        ctx.phase
            .with(|p| p.is_pending().then(|| format!("Pending: {}", p.label())))
    };

    let actions = move || {
        if editing() {
            view! {
                <button class="primary" disabled=busy on:click=move |_| ctx.submit_update()>
                    "Set record"
                </button>
                <button disabled=busy on:click=move |_| ctx.cancel_edit()>"Cancel"</button>
            }
            .into_any()
        } else {
            view! {
                <button class="primary" disabled=busy on:click=move |_| ctx.submit_mint()>
                    "Mint"
                </button>
            }
            .into_any()
        }
    };

    view! {
        <h2>{title}</h2>
        <div class="field">
            <input
                type="text"
                placeholder="domain"
                prop:value=move || ctx.draft.with(|d| d.name.clone())
                prop:disabled=move || editing() || busy()
                on:input=move |ev| ctx.set_draft_name(event_target_value(&ev))
            />
            <span class="tld">{suffix}</span>
        </div>
        <input
            type="text"
            placeholder="record"
            prop:value=move || ctx.draft.with(|d| d.record.clone())
            prop:disabled=busy
            on:input=move |ev| ctx.set_draft_record(event_target_value(&ev))
        />
        <p class="price">"Price: " {price}</p>
        {phase}
        <div class="actions">{actions}</div>
    }
}

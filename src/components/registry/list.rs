//! Listing of every minted domain.

use gns_core::models::MintRecord;
use leptos::prelude::*;

use crate::app::AppContext;

#[component]
pub fn MintList() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");

    view! {
        <section class="mint-list">
            <div class="mint-list-header">
                <h2>"Recently minted"</h2>
                <button
                    title="Reload from the registry"
                    disabled=move || !ctx.on_target.get()
                    on:click=move |_| ctx.refresh()
                >
                    "Refresh"
                </button>
            </div>
            <Show
                when=move || ctx.records.with(|r| !r.is_empty())
                fallback=|| view! { <p class="hint">"No domains minted yet"</p> }
            >
                <For
                    each=move || ctx.records.get()
                    key=|record| (record.index, record.name.clone(), record.record.clone(), record.owner)
                    children=move |record| view! { <MintItem record=record /> }
                />
            </Show>
        </section>
    }
}

#[component]
fn MintItem(record: MintRecord) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");

    let full_name = ctx.full_name(&record.name);
    let owner = record.short_owner();
    let owner_url = ctx.explorer_url().map(|explorer| record.owner_url(&explorer));
    let name = record.name.clone();
    let owned = {
        let record = record.clone();
        move || ctx.connection.with(|c| record.is_owned_by(c.account.as_ref()))
    };

    view! {
        <div class="mint-item">
            <div class="mint-row">
                <span class="mint-name">{full_name}</span>
                {move || owned().then(|| {
                    let name = name.clone();
                    view! {
                        <button
                            class="edit"
                            title="Edit record"
                            disabled=move || ctx.busy.get()
                            on:click=move |_| ctx.begin_edit(&name)
                        >
                            "Edit"
                        </button>
                    }
                })}
            </div>
            <p class="mint-record">{record.record}</p>
            <a class="mint-owner" href=owner_url target="_blank" rel="noopener">
                "Owner: " {owner}
            </a>
        </div>
    }
}

//! Outcome notices for user intents.

use gns_core::models::NoticeLevel;
use leptos::prelude::*;

use crate::app::AppContext;

fn level_class(level: NoticeLevel) -> &'static str {
    match level {
        NoticeLevel::Info => "notice info",
        NoticeLevel::Success => "notice success",
        NoticeLevel::Warning => "notice warning",
        NoticeLevel::Error => "notice error",
    }
}

#[component]
pub fn Notices() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");

    view! {
        <ul class="notices" aria-live="polite">
            {move || {
                ctx.notices
                    .get()
                    .into_iter()
                    .enumerate()
                    .map(|(index, notice)| {
                        view! {
                            <li class=level_class(notice.level)>
                                <span>{notice.message}</span>
                                <button
                                    class="dismiss"
                                    title="Dismiss"
                                    on:click=move |_| ctx.dismiss_notice(index)
                                >
                                    "×"
                                </button>
                            </li>
                        }
                    })
                    .collect_view()
            }}
        </ul>
    }
}

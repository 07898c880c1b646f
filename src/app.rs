//! Application root and global state.
//!
//! The [`Session`](gns_core::Session) owns all registry state. [`AppContext`]
//! mirrors its projections into signals and turns UI events into session
//! intents, so components never touch the session directly.

use std::future::Future;
use std::rc::Rc;

use futures::future::{self, Either};
use futures::{StreamExt, stream};
use gloo_timers::future::IntervalStream;
use gns_core::models::{
    ConnectionState, DomainDraft, MintPhase, MintRecord, NetworkState, Notice, Price, WalletEvent,
};
use leptos::prelude::*;
use tracing::warn;
use wasm_bindgen_futures::spawn_local;

use crate::components::{DomainForm, MintList, Notices, Status};
use crate::config::{self, MAX_NOTICES};
use crate::core::{BrowserTimer, Eip1193Gateway, WebSession, wallet};
use crate::utils::dom;

/// Global application context provided to all components.
///
/// Signals are refreshed from the session after every intent, and on a
/// timer while an intent is still running so pending mint phases show up.
#[derive(Clone, Copy)]
pub struct AppContext {
    session: StoredValue<Rc<WebSession>, LocalStorage>,

    pub wallet_available: RwSignal<bool>,
    pub connection: RwSignal<ConnectionState>,
    pub network: RwSignal<NetworkState>,
    pub on_target: RwSignal<bool>,
    pub records: RwSignal<Vec<MintRecord>>,
    pub draft: RwSignal<DomainDraft>,
    pub price: RwSignal<Option<Price>>,
    pub phase: RwSignal<MintPhase>,
    pub busy: RwSignal<bool>,
    pub notices: RwSignal<Vec<Notice>>,
}

impl AppContext {
    pub fn new(session: WebSession) -> Self {
        let ctx = Self {
            session: StoredValue::new_local(Rc::new(session)),
            wallet_available: RwSignal::new(false),
            connection: RwSignal::new(ConnectionState::default()),
            network: RwSignal::new(NetworkState::default()),
            on_target: RwSignal::new(false),
            records: RwSignal::new(Vec::new()),
            draft: RwSignal::new(DomainDraft::default()),
            price: RwSignal::new(None),
            phase: RwSignal::new(MintPhase::Idle),
            busy: RwSignal::new(false),
            notices: RwSignal::new(Vec::new()),
        };
        ctx.sync();
        ctx
    }

    fn with_session<R>(&self, f: impl FnOnce(&WebSession) -> R) -> R {
        self.session.with_value(|session| f(session))
    }

    /// Copy the session projections into the signals.
    pub fn sync(&self) {
        self.with_session(|s| {
            self.wallet_available.set(s.connection_manager().wallet_available());
            self.connection.set(s.connection());
            self.network.set(s.network());
            self.on_target.set(s.on_target_network());
            self.records.set(s.records());
            self.draft.set(s.draft());
            self.price.set(s.price_preview());
            self.phase.set(s.mint_phase());
            self.busy.set(s.is_busy());
        });
    }

    pub fn push_notice(&self, notice: Notice) {
        self.notices.update(|notices| {
            notices.push(notice);
            if notices.len() > MAX_NOTICES {
                notices.remove(0);
            }
        });
    }

    pub fn dismiss_notice(&self, index: usize) {
        self.notices.update(|notices| {
            if index < notices.len() {
                notices.remove(index);
            }
        });
    }

    // =========================================================================
    // Display helpers
    // =========================================================================

    /// `name.tld`
    pub fn full_name(&self, name: &str) -> String {
        self.with_session(|s| s.full_name(name))
    }

    pub fn tld(&self) -> String {
        self.with_session(|s| s.config().tld.clone())
    }

    pub fn target_name(&self) -> String {
        self.with_session(|s| s.config().target.chain_name.clone())
    }

    pub fn explorer_url(&self) -> Option<String> {
        self.with_session(|s| s.config().target.explorer_url().map(str::to_string))
    }

    pub fn currency_symbol(&self) -> String {
        self.with_session(|s| s.config().target.native_currency.symbol.clone())
    }

    // =========================================================================
    // Intents
    // =========================================================================

    /// Drive an async intent to completion, keeping the signals current.
    ///
    /// The signals are synced right after the intent first yields, then on
    /// every receipt poll tick until it finishes.
    fn run<F, Fut>(self, intent: F)
    where
        F: FnOnce(Rc<WebSession>) -> Fut + 'static,
        Fut: Future<Output = Option<Notice>> + 'static,
    {
        spawn_local(async move {
            let session = self.session.get_value();
            let poll_ms = session.config().receipt_poll_ms;

            let work = intent(session);
            let ticks = stream::once(future::ready(()))
                .chain(IntervalStream::new(poll_ms))
                .for_each(move |()| {
                    self.sync();
                    future::ready(())
                });
            futures::pin_mut!(work, ticks);

            let notice = match future::select(work, ticks).await {
                Either::Left((notice, _)) => notice,
                Either::Right(((), work)) => work.await,
            };

            self.sync();
            if let Some(notice) = notice {
                self.push_notice(notice);
            }
        });
    }

    /// Restore the session and subscribe to wallet notifications.
    pub fn boot(self) {
        self.run(|s| async move { Some(s.start().await) });

        if !self.wallet_available.get_untracked() {
            return;
        }
        if let Err(e) = wallet::on_chain_changed(move |chain_id| {
            self.run(move |s| async move { s.handle_event(WalletEvent::ChainChanged(chain_id)).await });
        }) {
            warn!(error = %e, "could not subscribe to chainChanged");
        }
        if let Err(e) = wallet::on_accounts_changed(move || {
            self.run(|s| async move { s.handle_event(WalletEvent::AccountsChanged).await });
        }) {
            warn!(error = %e, "could not subscribe to accountsChanged");
        }
    }

    pub fn connect(self) {
        self.run(|s| async move { Some(s.connect().await) });
    }

    pub fn switch_network(self) {
        self.run(|s| async move { Some(s.switch_network().await) });
    }

    pub fn submit_mint(self) {
        self.run(|s| async move { Some(s.submit_mint().await) });
    }

    pub fn submit_update(self) {
        self.run(|s| async move { Some(s.submit_update().await) });
    }

    pub fn refresh(self) {
        self.run(|s| async move { s.refresh().await });
    }

    pub fn set_draft_name(&self, name: String) {
        self.with_session(|s| s.set_draft_name(name));
        self.sync();
    }

    pub fn set_draft_record(&self, record: String) {
        self.with_session(|s| s.set_draft_record(record));
        self.sync();
    }

    pub fn begin_edit(&self, name: &str) {
        let notice = self.with_session(|s| s.begin_edit(name));
        self.sync();
        self.push_notice(notice);
    }

    pub fn cancel_edit(&self) {
        self.with_session(|s| s.cancel_edit());
        self.sync();
    }
}

/// Root application component with error boundary.
///
/// Builds the session from the compiled-in deployment config, provides the
/// context, and starts the silent wallet restore.
#[component]
pub fn App() -> impl IntoView {
    let registry = config::registry_config();
    let gateway = Eip1193Gateway::new(registry.receipt_poll_ms);
    let ctx = AppContext::new(WebSession::new(gateway, BrowserTimer, registry));
    provide_context(ctx);
    ctx.boot();

    view! {
        <ErrorBoundary
            fallback=|errors| view! {
                <div class="fatal">
                    <h1>"Something went wrong"</h1>
                    <ul>
                        {move || errors.get()
                            .into_iter()
                            .map(|(_, e)| view! { <li>{e.to_string()}</li> })
                            .collect::<Vec<_>>()
                        }
                    </ul>
                    <button on:click=move |_| dom::reload()>"Reload Page"</button>
                </div>
            }
        >
            <Status />
            <main class="registry">
                <Notices />
                <DomainForm />
                <MintList />
            </main>
        </ErrorBoundary>
    }
}

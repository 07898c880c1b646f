//! Browser delays for the session.

use async_trait::async_trait;
use gloo_timers::future::TimeoutFuture;
use gns_core::Timer;

/// [`Timer`] backed by `setTimeout`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserTimer;

#[async_trait(?Send)]
impl Timer for BrowserTimer {
    async fn sleep(&self, ms: u32) {
        TimeoutFuture::new(ms).await;
    }
}

//! Download queue poller.
//!
//! Refreshes the server-owned download tasks on a fixed interval, but only
//! while the downloads page is the one being shown.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::action::Page;
use crate::app::App;

/// One poll. Returns whether a fetch was made.
pub async fn poll_once(app: &App) -> bool {
    if !app.state().await.router.is_visible(Page::Downloads) {
        return false;
    }
    if let Err(e) = app.load_downloads().await {
        warn!("download poll failed: {}", e);
    }
    true
}

/// Spawn the poll loop. It runs until the runtime shuts down.
pub fn spawn(app: Arc<App>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        debug!("download poller started ({:?})", period);
        loop {
            interval.tick().await;
            poll_once(&app).await;
        }
    })
}

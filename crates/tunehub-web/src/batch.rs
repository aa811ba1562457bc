//! Batch download of a context's selection.
//!
//! Three steps, so the network loop never touches UI state:
//!
//! 1. [`plan`] snapshots the selection into download requests and marks the
//!    context's batch button busy.
//! 2. [`execute`] sends the requests one after another and folds the results
//!    into a [`BatchOutcome`].
//! 3. [`reconcile`] applies the outcome to the store in one pass.
//!
//! Requests are strictly sequential: the next one starts only after the
//! previous one finished. A failed item is counted and skipped.

use futures_util::stream::{self, StreamExt};
use tracing::{debug, info, warn};
use tunehub_proto::songs::{DownloadRequest, SongKey};

use crate::action::ListContext;
use crate::context::ContextStore;
use crate::error::UiError;
use crate::gateway::Gateway;

/// One selected row turned into a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchItem {
    pub index: usize,
    pub request: DownloadRequest,
}

/// Snapshot of a selection, taken when the batch starts.
#[derive(Debug, Clone)]
pub struct BatchPlan {
    pub context: ListContext,
    pub generation: u64,
    pub items: Vec<BatchItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub context: Option<ListContext>,
    pub generation: u64,
    /// Rows whose request succeeded, in request order.
    pub completed: Vec<(usize, SongKey)>,
    /// Rows whose request failed, in request order.
    pub failed: Vec<usize>,
}

impl BatchOutcome {
    pub fn succeeded(&self) -> usize {
        self.completed.len()
    }

    pub fn attempted(&self) -> usize {
        self.completed.len() + self.failed.len()
    }

    /// Toast text reported when the batch ends.
    pub fn summary(&self) -> String {
        format!("已添加 {} 首歌曲到下载队列", self.succeeded())
    }
}

/// Snapshot the selection of `ctx`. Fails without side effects when nothing
/// is selected or a batch is already running there. Indices that no longer
/// map to a song are dropped.
pub fn plan(store: &mut ContextStore, ctx: ListContext, quality: &str) -> Result<BatchPlan, UiError> {
    let state = store.get(ctx);
    if state.count() == 0 {
        return Err(UiError::EmptySelection);
    }
    if state.is_batch_running() {
        return Err(UiError::BatchRunning);
    }

    let items: Vec<BatchItem> = state
        .selected()
        .iter()
        .filter_map(|&index| {
            let row = state.song(index)?;
            Some(BatchItem {
                index,
                request: DownloadRequest::for_song(&row.song, quality),
            })
        })
        .collect();
    let generation = state.generation();

    store.set_batch_running(ctx, true);
    debug!("batch on {}: {} items (gen {})", ctx, items.len(), generation);

    Ok(BatchPlan {
        context: ctx,
        generation,
        items,
    })
}

/// Send every request in `plan`, one at a time, and collect the results.
pub async fn execute(gateway: &dyn Gateway, plan: BatchPlan) -> BatchOutcome {
    let initial = BatchOutcome {
        context: Some(plan.context),
        generation: plan.generation,
        ..Default::default()
    };

    stream::iter(plan.items)
        .then(|item| async move {
            let result = gateway.download(&item.request).await;
            (item, result)
        })
        .fold(initial, |mut outcome, (item, result)| async move {
            match result {
                Ok(()) => outcome.completed.push((item.index, item.request.key())),
                Err(e) => {
                    warn!("download failed for {}: {}", item.request.name, e);
                    outcome.failed.push(item.index);
                }
            }
            outcome
        })
        .await
}

/// Apply `outcome`: completed songs become downloaded wherever they are
/// listed, the selection is cleared, and the batch button is released.
///
/// If the context was reloaded while the batch ran, the new list keeps its
/// selection; only rows with a matching identity are marked.
pub fn reconcile(store: &mut ContextStore, outcome: &BatchOutcome) {
    let Some(ctx) = outcome.context else {
        return;
    };

    for (_, key) in &outcome.completed {
        store.mark_downloaded_everywhere(key);
    }

    if store.get(ctx).generation() == outcome.generation {
        store.clear_selection(ctx);
    } else {
        debug!("{} was reloaded during the batch; keeping its selection", ctx);
    }
    store.set_batch_running(ctx, false);

    info!(
        "batch on {} finished: {}/{} succeeded",
        ctx,
        outcome.succeeded(),
        outcome.attempted()
    );
}

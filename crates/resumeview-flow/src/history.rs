//! History flow: the list of analyzed resumes plus the open detail view.

use std::sync::Arc;

use resumeview_client::RecordRepository;
use resumeview_core::{RecordId, Summary, ViewState};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::detail::DetailController;
use crate::slot::Slot;

pub const HISTORY_FAILED: &str = "Failed to load resume history. Please try again.";

/// Owns the history list and hands selected ids to its [`DetailController`].
///
/// List state and selection are independent: a detail view can be opened or
/// closed whatever state the list is in.
pub struct HistoryController {
    repo: Arc<dyn RecordRepository>,
    slot: Arc<Slot<ViewState<Vec<Summary>>>>,
    detail: DetailController,
}

impl HistoryController {
    pub fn new(repo: Arc<dyn RecordRepository>) -> Self {
        Self {
            detail: DetailController::new(Arc::clone(&repo)),
            repo,
            slot: Arc::new(Slot::new(ViewState::Idle)),
        }
    }

    /// Fetch the list, superseding any fetch still in flight.
    ///
    /// Must be called within a tokio runtime.
    pub fn load(&self) -> JoinHandle<()> {
        let ticket = self.slot.begin(|state| *state = ViewState::Loading);
        let repo = Arc::clone(&self.repo);
        let slot = Arc::clone(&self.slot);
        info!("loading resume history");

        tokio::spawn(async move {
            let next = match repo.list_records().await {
                Ok(summaries) => {
                    info!(count = summaries.len(), "resume history loaded");
                    ViewState::Ready(summaries)
                }
                Err(err) => {
                    warn!(error = %err, "history fetch failed");
                    ViewState::Failed(err.user_message(HISTORY_FAILED))
                }
            };
            if !slot.settle(ticket, |state| *state = next) {
                debug!("discarding superseded history result");
            }
        })
    }

    /// First-display hook: load only if nothing has been requested yet.
    pub fn ensure_loaded(&self) -> Option<JoinHandle<()>> {
        self.slot.snapshot().is_idle().then(|| self.load())
    }

    /// User-triggered reload, also the retry path after a failure.
    pub fn refresh(&self) -> JoinHandle<()> {
        self.load()
    }

    /// Open the detail view for `id` and start fetching it.
    ///
    /// The id need not appear in the current list.
    pub fn select_detail(&self, id: RecordId) -> JoinHandle<()> {
        self.detail.load(id)
    }

    pub fn close_detail(&self) {
        self.detail.close();
    }

    pub fn selected(&self) -> Option<RecordId> {
        self.detail.current_id()
    }

    pub fn detail(&self) -> &DetailController {
        &self.detail
    }

    pub fn state(&self) -> ViewState<Vec<Summary>> {
        self.slot.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState<Vec<Summary>>> {
        self.slot.subscribe()
    }

    /// Wait for the current list fetch, if any, to finish.
    pub async fn settled(&self) -> ViewState<Vec<Summary>> {
        self.slot.wait_until(|state| !state.is_loading()).await
    }
}

//! Detail flow: fetch one record for whichever id is currently open.

use std::sync::Arc;

use resumeview_client::{ErrorKind, RecordRepository};
use resumeview_core::{Record, RecordId, ViewState};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::slot::Slot;

pub const DETAIL_FAILED: &str = "Failed to load resume details. Please try again.";

/// What the detail view shows: which id is open and the fetch state for it.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    /// `None` while the detail view is closed.
    pub id: Option<RecordId>,
    pub state: ViewState<Record>,
    /// Failure class when `state` is `Failed`.
    pub failure: Option<ErrorKind>,
}

impl DetailView {
    pub fn closed() -> Self {
        Self {
            id: None,
            state: ViewState::Idle,
            failure: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.id.is_some()
    }

    /// The service reported that the open id does not exist.
    pub fn not_found(&self) -> bool {
        self.failure == Some(ErrorKind::NotFound)
    }
}

/// Owns the fetch for the open detail view. Holds no cache: every open
/// fetches again.
pub struct DetailController {
    repo: Arc<dyn RecordRepository>,
    slot: Arc<Slot<DetailView>>,
}

impl DetailController {
    pub fn new(repo: Arc<dyn RecordRepository>) -> Self {
        Self {
            repo,
            slot: Arc::new(Slot::new(DetailView::closed())),
        }
    }

    /// Open `id` and fetch it, superseding any fetch for a previous id.
    ///
    /// Must be called within a tokio runtime.
    pub fn load(&self, id: RecordId) -> JoinHandle<()> {
        let ticket = self.slot.begin(|view| {
            view.id = Some(id);
            view.state = ViewState::Loading;
            view.failure = None;
        });
        let repo = Arc::clone(&self.repo);
        let slot = Arc::clone(&self.slot);
        info!(%id, "opening resume detail");

        tokio::spawn(async move {
            let (state, failure) = match repo.get_record(id).await {
                Ok(record) => (ViewState::Ready(record), None),
                Err(err) => {
                    warn!(%id, error = %err, "detail fetch failed");
                    (
                        ViewState::Failed(err.user_message(DETAIL_FAILED)),
                        Some(err.kind()),
                    )
                }
            };
            let applied = slot.settle(ticket, |view| {
                view.state = state;
                view.failure = failure;
            });
            if !applied {
                debug!(%id, "discarding superseded detail result");
            }
        })
    }

    /// Re-run the fetch for the open id. `None` when nothing is open.
    pub fn retry(&self) -> Option<JoinHandle<()>> {
        self.current_id().map(|id| self.load(id))
    }

    /// Close the view and drop everything held for the open id.
    pub fn close(&self) {
        self.slot.invalidate(|view| *view = DetailView::closed());
    }

    pub fn current_id(&self) -> Option<RecordId> {
        self.slot.snapshot().id
    }

    pub fn view(&self) -> DetailView {
        self.slot.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<DetailView> {
        self.slot.subscribe()
    }

    /// Wait for the fetch of the open id, if any, to finish.
    pub async fn settled(&self) -> DetailView {
        self.slot.wait_until(|view| !view.state.is_loading()).await
    }
}

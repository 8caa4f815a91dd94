//! View-state controllers for the upload, history and detail screens.
//!
//! Each controller owns one asynchronous request lifecycle and publishes its
//! state on a `tokio::sync::watch` channel. Starting a request supersedes any
//! request still in flight; superseded completions are dropped on arrival.

mod slot;

pub mod detail;
pub mod history;
pub mod upload;

#[cfg(test)]
mod testing;

pub use detail::{DETAIL_FAILED, DetailController, DetailView};
pub use history::{HISTORY_FAILED, HistoryController};
pub use upload::{UPLOAD_FAILED, UploadController, UploadFile, UploadPolicy};

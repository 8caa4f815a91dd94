//! Upload flow: validate a dropped file, submit it, expose the analysis.

use std::path::Path;
use std::sync::Arc;

use resumeview_client::{RecordRepository, RepositoryError};
use resumeview_core::{Record, ViewState};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::slot::Slot;

pub const UPLOAD_FAILED: &str = "Failed to process resume. Please try again.";

const MIB: usize = 1024 * 1024;

/// A document picked by the user, fully read into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub filename: String,
    /// MIME type reported by whatever picked the file, if any.
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content_type: None,
            bytes,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Read a file from disk, inferring its content type from the extension.
    ///
    /// Reads the whole file. [`UploadController::accept_path`] checks the
    /// size first.
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let (filename, content_type) = describe_path(path);
        Ok(Self {
            filename,
            content_type,
            bytes,
        })
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Filename and inferred content type of `path`.
fn describe_path(path: &Path) -> (String, Option<String>) {
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let content_type = path
        .extension()
        .and_then(|ext| mime_for_extension(&ext.to_string_lossy()))
        .map(str::to_string);
    (filename, content_type)
}

fn has_extension(filename: &str, extension: &str) -> bool {
    Path::new(filename)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

fn mime_for_extension(ext: &str) -> Option<&'static str> {
    match ext.to_ascii_lowercase().as_str() {
        "pdf" => Some("application/pdf"),
        "doc" => Some("application/msword"),
        "docx" => Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
        "txt" => Some("text/plain"),
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        _ => None,
    }
}

/// Client-side constraints checked before anything is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    pub max_bytes: usize,
    pub mime: String,
    pub extension: String,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_bytes: 10 * MIB,
            mime: "application/pdf".to_string(),
            extension: "pdf".to_string(),
        }
    }
}

impl UploadPolicy {
    /// A file passes when its content type or its extension names the
    /// accepted format, and it is no larger than `max_bytes`.
    pub fn check(&self, file: &UploadFile) -> Result<(), RepositoryError> {
        self.check_parts(&file.filename, file.content_type.as_deref(), file.size() as u64)
    }

    fn check_parts(
        &self,
        filename: &str,
        content_type: Option<&str>,
        size: u64,
    ) -> Result<(), RepositoryError> {
        let type_ok = content_type == Some(self.mime.as_str());
        if !type_ok && !has_extension(filename, &self.extension) {
            return Err(RepositoryError::Validation(format!(
                "Only {} files are supported",
                self.extension.to_ascii_uppercase()
            )));
        }
        if size > self.max_bytes as u64 {
            return Err(RepositoryError::Validation(format!(
                "File is larger than {}",
                human_size(self.max_bytes)
            )));
        }
        Ok(())
    }
}

fn human_size(bytes: usize) -> String {
    if bytes >= MIB && bytes % MIB == 0 {
        format!("{} MB", bytes / MIB)
    } else {
        format!("{bytes} bytes")
    }
}

/// Owns the lifecycle of the most recently accepted file.
pub struct UploadController {
    repo: Arc<dyn RecordRepository>,
    policy: UploadPolicy,
    slot: Arc<Slot<ViewState<Record>>>,
}

impl UploadController {
    pub fn new(repo: Arc<dyn RecordRepository>) -> Self {
        Self::with_policy(repo, UploadPolicy::default())
    }

    pub fn with_policy(repo: Arc<dyn RecordRepository>, policy: UploadPolicy) -> Self {
        Self {
            repo,
            policy,
            slot: Arc::new(Slot::new(ViewState::Idle)),
        }
    }

    pub fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    /// Validate and submit `file`, superseding any upload still in flight.
    ///
    /// A file that fails the policy goes straight to `Failed` and returns
    /// `None` without touching the network. Otherwise the submission runs on
    /// a spawned task whose handle is returned; dropping the handle does not
    /// cancel it. Must be called within a tokio runtime.
    pub fn accept(&self, file: UploadFile) -> Option<JoinHandle<()>> {
        if let Err(err) = self.policy.check(&file) {
            let message = err.user_message(UPLOAD_FAILED);
            warn!(filename = %file.filename, size = file.size(), reason = %message, "upload rejected locally");
            self.fail(message);
            return None;
        }

        let ticket = self.slot.begin(|state| *state = ViewState::Loading);
        let repo = Arc::clone(&self.repo);
        let slot = Arc::clone(&self.slot);
        info!(filename = %file.filename, size = file.size(), "upload started");

        Some(tokio::spawn(async move {
            let next = match repo.submit_record(file.bytes, &file.filename).await {
                Ok(record) => ViewState::Ready(record),
                Err(err) => {
                    warn!(filename = %file.filename, error = %err, "upload failed");
                    ViewState::Failed(err.user_message(UPLOAD_FAILED))
                }
            };
            if !slot.settle(ticket, |state| *state = next) {
                debug!(filename = %file.filename, "discarding superseded upload result");
            }
        }))
    }

    /// Validate the file at `path` from its metadata, then read and submit it.
    ///
    /// Format and size are checked before any bytes are read, so an
    /// oversized file is rejected without being buffered. Rejections and
    /// read errors go to `Failed` and supersede any upload still in flight.
    pub async fn accept_path(&self, path: &Path) -> Option<JoinHandle<()>> {
        let (filename, content_type) = describe_path(path);
        let metadata = match tokio::fs::metadata(path).await {
            Ok(metadata) => metadata,
            Err(err) => {
                self.fail_read(path, &err);
                return None;
            }
        };
        let size = metadata.len();
        if let Err(err) = self
            .policy
            .check_parts(&filename, content_type.as_deref(), size)
        {
            let message = err.user_message(UPLOAD_FAILED);
            warn!(%filename, size, reason = %message, "upload rejected locally");
            self.fail(message);
            return None;
        }
        match UploadFile::from_path(path).await {
            Ok(file) => self.accept(file),
            Err(err) => {
                self.fail_read(path, &err);
                None
            }
        }
    }

    fn fail_read(&self, path: &Path, err: &std::io::Error) {
        warn!(path = %path.display(), error = %err, "cannot read upload");
        self.fail(format!("Cannot read {}: {err}", path.display()));
    }

    fn fail(&self, message: String) {
        self.slot.invalidate(|state| *state = ViewState::Failed(message));
    }

    /// Back to idle, dropping the result of anything still in flight.
    pub fn reset(&self) {
        self.slot.invalidate(|state| *state = ViewState::Idle);
    }

    pub fn state(&self) -> ViewState<Record> {
        self.slot.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState<Record>> {
        self.slot.subscribe()
    }

    /// Wait for the current upload, if any, to finish.
    pub async fn settled(&self) -> ViewState<Record> {
        self.slot.wait_until(|state| !state.is_loading()).await
    }
}

use async_trait::async_trait;
use resumeview_core::{Record, RecordId, Summary};

use crate::RepositoryError;

/// Remote operations the view controllers depend on.
///
/// Implementations hold no per-call state and may be shared between
/// controllers. `submit_record` is not idempotent and must not be retried
/// by an implementation.
#[async_trait]
pub trait RecordRepository: Send + Sync {
    /// All analyzed records, in the order the service returns them.
    async fn list_records(&self) -> Result<Vec<Summary>, RepositoryError>;

    async fn get_record(&self, id: RecordId) -> Result<Record, RepositoryError>;

    /// Upload one document for analysis.
    async fn submit_record(
        &self,
        bytes: Vec<u8>,
        filename: &str,
    ) -> Result<Record, RepositoryError>;
}

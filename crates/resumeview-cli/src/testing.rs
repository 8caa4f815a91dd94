//! In-memory repository for driving the front end in tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use resumeview_client::{RecordRepository, RepositoryError};
use resumeview_core::{Rating, Record, RecordId, Summary};
use tokio::sync::oneshot;

/// Answers every call at once, except submissions held with [`hold`].
///
/// [`hold`]: FakeRepository::hold
#[derive(Default)]
pub(crate) struct FakeRepository {
    pub(crate) fail_list: bool,
    list_calls: Mutex<usize>,
    get_calls: Mutex<Vec<RecordId>>,
    held: Mutex<HashMap<String, oneshot::Receiver<()>>>,
}

impl FakeRepository {
    pub(crate) fn failing_list() -> Self {
        Self {
            fail_list: true,
            ..Self::default()
        }
    }

    /// Keep the submission of `filename` pending until the sender fires.
    pub(crate) fn hold(&self, filename: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.held.lock().unwrap().insert(filename.to_string(), rx);
        tx
    }

    pub(crate) fn list_calls(&self) -> usize {
        *self.list_calls.lock().unwrap()
    }

    pub(crate) fn fetched(&self) -> Vec<RecordId> {
        self.get_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecordRepository for FakeRepository {
    async fn list_records(&self) -> Result<Vec<Summary>, RepositoryError> {
        *self.list_calls.lock().unwrap() += 1;
        if self.fail_list {
            return Err(RepositoryError::Server {
                status: 500,
                detail: None,
            });
        }
        Ok(vec![record(1, "jane_doe.pdf").to_summary()])
    }

    async fn get_record(&self, id: RecordId) -> Result<Record, RepositoryError> {
        self.get_calls.lock().unwrap().push(id);
        Ok(record(id.0, "jane_doe.pdf"))
    }

    async fn submit_record(
        &self,
        _bytes: Vec<u8>,
        filename: &str,
    ) -> Result<Record, RepositoryError> {
        let gate = self.held.lock().unwrap().remove(filename);
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        Ok(record(7, filename))
    }
}

pub(crate) fn record(id: i64, filename: &str) -> Record {
    Record {
        id: RecordId(id),
        filename: filename.to_string(),
        name: Some("Jane Doe".into()),
        email: None,
        phone: None,
        technical_skills: vec!["Rust".into()],
        soft_skills: vec![],
        resume_rating: Rating::new(8).unwrap(),
        improvement_areas: "Quantify results".into(),
        upskill_suggestions: "Learn Kubernetes".into(),
        upload_date: None,
    }
}

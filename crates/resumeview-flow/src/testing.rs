//! Scripted repository whose replies are released by the test.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use resumeview_client::{RecordRepository, RepositoryError};
use resumeview_core::{Rating, Record, RecordId, Summary};
use tokio::sync::oneshot;

type Reply<T> = oneshot::Sender<Result<T, RepositoryError>>;
type Pending<T> = oneshot::Receiver<Result<T, RepositoryError>>;

/// Each call takes the next reply queued for it and waits until the test
/// sends on the matching sender. Lists are queued in call order, fetches per
/// id and submissions per filename. A call with nothing queued fails.
#[derive(Default)]
pub(crate) struct ScriptedRepository {
    lists: Mutex<VecDeque<Pending<Vec<Summary>>>>,
    gets: Mutex<HashMap<RecordId, VecDeque<Pending<Record>>>>,
    submits: Mutex<HashMap<String, VecDeque<Pending<Record>>>>,
    list_calls: Mutex<usize>,
    get_calls: Mutex<Vec<RecordId>>,
    submit_calls: Mutex<Vec<String>>,
}

impl ScriptedRepository {
    pub(crate) fn expect_list(&self) -> Reply<Vec<Summary>> {
        let (tx, rx) = oneshot::channel();
        self.lists.lock().unwrap().push_back(rx);
        tx
    }

    pub(crate) fn expect_get(&self, id: i64) -> Reply<Record> {
        let (tx, rx) = oneshot::channel();
        self.gets
            .lock()
            .unwrap()
            .entry(RecordId(id))
            .or_default()
            .push_back(rx);
        tx
    }

    pub(crate) fn expect_submit(&self, filename: &str) -> Reply<Record> {
        let (tx, rx) = oneshot::channel();
        self.submits
            .lock()
            .unwrap()
            .entry(filename.to_string())
            .or_default()
            .push_back(rx);
        tx
    }

    pub(crate) fn list_calls(&self) -> usize {
        *self.list_calls.lock().unwrap()
    }

    pub(crate) fn fetched(&self) -> Vec<RecordId> {
        self.get_calls.lock().unwrap().clone()
    }

    pub(crate) fn submitted(&self) -> Vec<String> {
        self.submit_calls.lock().unwrap().clone()
    }
}

async fn wait<T>(pending: Option<Pending<T>>) -> Result<T, RepositoryError> {
    let unscripted = || RepositoryError::Server {
        status: 599,
        detail: Some("unscripted call".into()),
    };
    match pending {
        Some(rx) => rx.await.unwrap_or_else(|_| Err(unscripted())),
        None => Err(unscripted()),
    }
}

#[async_trait]
impl RecordRepository for ScriptedRepository {
    async fn list_records(&self) -> Result<Vec<Summary>, RepositoryError> {
        *self.list_calls.lock().unwrap() += 1;
        let pending = self.lists.lock().unwrap().pop_front();
        wait(pending).await
    }

    async fn get_record(&self, id: RecordId) -> Result<Record, RepositoryError> {
        self.get_calls.lock().unwrap().push(id);
        let pending = self
            .gets
            .lock()
            .unwrap()
            .get_mut(&id)
            .and_then(VecDeque::pop_front);
        wait(pending).await
    }

    async fn submit_record(
        &self,
        _bytes: Vec<u8>,
        filename: &str,
    ) -> Result<Record, RepositoryError> {
        self.submit_calls.lock().unwrap().push(filename.to_string());
        let pending = self
            .submits
            .lock()
            .unwrap()
            .get_mut(filename)
            .and_then(VecDeque::pop_front);
        wait(pending).await
    }
}

pub(crate) fn record(id: i64, filename: &str) -> Record {
    Record {
        id: RecordId(id),
        filename: filename.to_string(),
        name: Some("Jane Doe".into()),
        email: Some("jane@example.com".into()),
        phone: Some("555-123-4567".into()),
        technical_skills: vec!["Rust".into(), "Sql".into()],
        soft_skills: vec!["Communication".into()],
        resume_rating: Rating::new(8).unwrap(),
        improvement_areas: "Expand on your work experience and achievements".into(),
        upskill_suggestions: "Learn cloud technologies like AWS, Azure, or Google Cloud Platform"
            .into(),
        upload_date: Some("2025-03-14T09:26:53".into()),
    }
}

pub(crate) fn summary(id: i64, full_name: &str, rating: u8) -> Summary {
    Summary {
        id: RecordId(id),
        filename: format!("resume_{id}.pdf"),
        full_name: Some(full_name.to_string()),
        email: None,
        phone: None,
        upload_date: Some("2025-03-14T09:26:53".into()),
        resume_rating: Rating::new(rating).unwrap(),
    }
}

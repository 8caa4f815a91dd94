//! HTTP repository for the resume analysis service's `/api/resumes` endpoints.

use std::time::Duration;

use async_trait::async_trait;
use resumeview_core::{Record, RecordId, Summary};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::RecordRepository;
use crate::RepositoryError;
use crate::error::parse_detail;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// The only document type the service accepts.
pub const DOCUMENT_MIME: &str = "application/pdf";

/// Connection settings, injected rather than compiled in so tests can point
/// the client at a local server.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Service root like `http://localhost:8000`.
    pub base_url: String,
    /// Per-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }
}

/// Stateless HTTP client for the analysis service.
pub struct HttpRepository {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct HealthResponse {
    status: String,
}

impl HttpRepository {
    /// Build a client for the configured base URL. Trailing slashes are trimmed.
    pub fn new(config: ClientConfig) -> Result<Self, RepositoryError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Probe `GET /health`, returning the reported status string.
    pub async fn health(&self) -> Result<String, RepositoryError> {
        let url = format!("{}/health", self.base_url);
        let resp = self.client.get(&url).send().await?;
        let health: HealthResponse = read_json(resp).await.map_err(Failure::into_error)?;
        Ok(health.status)
    }
}

/// A failed exchange before it is classified per endpoint.
enum Failure {
    Status { status: u16, detail: Option<String> },
    Other(RepositoryError),
}

impl Failure {
    /// Classify with no endpoint-specific meaning for any status.
    fn into_error(self) -> RepositoryError {
        match self {
            Failure::Status { status, detail } => RepositoryError::Server { status, detail },
            Failure::Other(err) => err,
        }
    }
}

impl From<reqwest::Error> for Failure {
    fn from(err: reqwest::Error) -> Self {
        Failure::Other(err.into())
    }
}

async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Failure> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        let detail = parse_detail(&body);
        warn!(
            status = status.as_u16(),
            detail = detail.as_deref().unwrap_or(""),
            "service returned an error"
        );
        return Err(Failure::Status {
            status: status.as_u16(),
            detail,
        });
    }
    let body = resp.bytes().await?;
    serde_json::from_slice(&body).map_err(|err| Failure::Other(err.into()))
}

#[async_trait]
impl RecordRepository for HttpRepository {
    async fn list_records(&self) -> Result<Vec<Summary>, RepositoryError> {
        let url = format!("{}/api/resumes/", self.base_url);

        info!(url = %url, "listing resumes");
        let resp = self.client.get(&url).send().await?;
        let summaries: Vec<Summary> = read_json(resp).await.map_err(Failure::into_error)?;
        info!(count = summaries.len(), "listed resumes");
        Ok(summaries)
    }

    async fn get_record(&self, id: RecordId) -> Result<Record, RepositoryError> {
        let url = format!("{}/api/resumes/{}", self.base_url, id);

        info!(url = %url, "fetching resume");
        let resp = self.client.get(&url).send().await?;
        let record: Record = read_json(resp).await.map_err(|failure| match failure {
            Failure::Status {
                status: 404,
                detail,
            } => RepositoryError::NotFound { id, detail },
            other => other.into_error(),
        })?;
        Ok(record)
    }

    async fn submit_record(
        &self,
        bytes: Vec<u8>,
        filename: &str,
    ) -> Result<Record, RepositoryError> {
        let url = format!("{}/api/resumes/upload", self.base_url);
        let size = bytes.len();

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(DOCUMENT_MIME)?;
        let form = reqwest::multipart::Form::new().part("file", part);

        info!(url = %url, filename, size, "submitting resume");
        let resp = self.client.post(&url).multipart(form).send().await?;
        let record: Record = read_json(resp).await.map_err(|failure| match failure {
            Failure::Status {
                status,
                detail: Some(detail),
            } => RepositoryError::ServiceValidation { status, detail },
            other => other.into_error(),
        })?;
        info!(id = %record.id, rating = %record.resume_rating, "resume analyzed");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    use axum::extract::{Multipart, Path};
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{Value, json};

    fn record_json(id: i64, filename: &str) -> Value {
        json!({
            "id": id,
            "filename": filename,
            "name": "Jane Doe",
            "email": "jane@example.com",
            "phone": "555-123-4567",
            "technical_skills": ["Python", "Docker"],
            "soft_skills": ["Teamwork"],
            "resume_rating": 7,
            "improvement_areas": "Add more technical skills relevant to your field",
            "upskill_suggestions": "Consider learning advanced Python frameworks like FastAPI or Django"
        })
    }

    async fn list() -> Json<Value> {
        Json(json!([
            {"id": 2, "filename": "b.pdf", "full_name": "", "email": "", "phone": "",
             "upload_date": "2025-03-15T10:00:00", "resume_rating": 4},
            {"id": 1, "filename": "a.pdf", "full_name": "Jane Doe", "email": "jane@example.com",
             "phone": null, "upload_date": "2025-03-14T09:26:53.589793", "resume_rating": 9}
        ]))
    }

    async fn detail(Path(id): Path<i64>) -> (StatusCode, Json<Value>) {
        if id == 1 {
            let mut body = record_json(1, "a.pdf");
            body["upload_date"] = json!("2025-03-14T09:26:53.589793");
            (StatusCode::OK, Json(body))
        } else {
            (
                StatusCode::NOT_FOUND,
                Json(json!({"detail": "Resume not found"})),
            )
        }
    }

    async fn upload(mut multipart: Multipart) -> (StatusCode, Json<Value>) {
        while let Ok(Some(field)) = multipart.next_field().await {
            if field.name() != Some("file") {
                continue;
            }
            let filename = field.file_name().unwrap_or_default().to_string();
            let content_type = field.content_type().unwrap_or_default().to_string();
            let bytes = field.bytes().await.unwrap_or_default();
            if !filename.to_lowercase().ends_with(".pdf") || content_type != DOCUMENT_MIME {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({"detail": "Only PDF files are supported"})),
                );
            }
            if bytes.starts_with(b"%PDF") {
                return (StatusCode::OK, Json(record_json(42, &filename)));
            }
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"detail": "Error processing resume: cannot open broken document"})),
            );
        }
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"detail": [{"loc": ["body", "file"], "msg": "field required"}]})),
        )
    }

    async fn spawn_service(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    async fn service() -> HttpRepository {
        let router = Router::new()
            .route("/health", get(|| async { Json(json!({"status": "healthy"})) }))
            .route("/api/resumes/", get(list))
            .route("/api/resumes/upload", post(upload))
            .route("/api/resumes/:id", get(detail));
        let base_url = spawn_service(router).await;
        HttpRepository::new(ClientConfig {
            base_url,
            timeout: Some(Duration::from_secs(5)),
        })
        .unwrap()
    }

    #[test]
    fn trims_trailing_slash() {
        let repo = HttpRepository::new(ClientConfig {
            base_url: "http://localhost:8000/".into(),
            timeout: None,
        })
        .unwrap();
        assert_eq!(repo.base_url(), "http://localhost:8000");
    }

    #[tokio::test]
    async fn lists_in_service_order() {
        let repo = service().await;
        let summaries = repo.list_records().await.unwrap();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].id, RecordId(2));
        assert_eq!(summaries[1].id, RecordId(1));
        assert_eq!(summaries[0].display_name(), "Name not detected");
        assert_eq!(summaries[1].resume_rating.value(), 9);
    }

    #[tokio::test]
    async fn empty_list_is_ok() {
        let router = Router::new().route("/api/resumes/", get(|| async { Json(json!([])) }));
        let repo = HttpRepository::new(ClientConfig {
            base_url: spawn_service(router).await,
            timeout: None,
        })
        .unwrap();
        assert!(repo.list_records().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_failure_without_detail() {
        let router = Router::new().route(
            "/api/resumes/",
            get(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
        );
        let repo = HttpRepository::new(ClientConfig {
            base_url: spawn_service(router).await,
            timeout: None,
        })
        .unwrap();
        let err = repo.list_records().await.unwrap_err();
        assert!(matches!(err, RepositoryError::Server { status: 502, detail: None }));
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[tokio::test]
    async fn fetches_one_record() {
        let repo = service().await;
        let record = repo.get_record(RecordId(1)).await.unwrap();
        assert_eq!(record.filename, "a.pdf");
        assert_eq!(record.soft_skills, vec!["Teamwork"]);
        assert_eq!(
            record.upload_date.as_deref(),
            Some("2025-03-14T09:26:53.589793")
        );
    }

    #[tokio::test]
    async fn missing_record_is_not_found() {
        let repo = service().await;
        let err = repo.get_record(RecordId(404)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.detail(), Some("Resume not found"));
    }

    #[tokio::test]
    async fn submits_multipart_pdf() {
        let repo = service().await;
        let record = repo
            .submit_record(b"%PDF-1.7 resume".to_vec(), "jane_doe.pdf")
            .await
            .unwrap();
        assert_eq!(record.id, RecordId(42));
        assert_eq!(record.filename, "jane_doe.pdf");
        assert!(record.upload_date.is_none());
    }

    #[tokio::test]
    async fn rejected_upload_surfaces_detail_verbatim() {
        let repo = service().await;
        let err = repo
            .submit_record(b"%PDF".to_vec(), "resume.docx")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ServiceValidation);
        assert_eq!(err.user_message("fallback"), "Only PDF files are supported");

        let err = repo
            .submit_record(b"not a pdf".to_vec(), "broken.pdf")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ServiceValidation);
        assert_eq!(
            err.to_string(),
            "Error processing resume: cannot open broken document"
        );
    }

    #[tokio::test]
    async fn upload_detail_round_trip() {
        let repo = service().await;
        let uploaded = repo
            .submit_record(b"%PDF".to_vec(), "a.pdf")
            .await
            .unwrap();
        let mut fetched = repo.get_record(RecordId(1)).await.unwrap();
        fetched.id = uploaded.id;
        assert!(uploaded.matches_upload(&fetched));
    }

    #[tokio::test]
    async fn health_reports_status() {
        let repo = service().await;
        assert_eq!(repo.health().await.unwrap(), "healthy");
    }

    #[tokio::test]
    async fn unreachable_service_is_transport() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let repo = HttpRepository::new(ClientConfig {
            base_url: format!("http://{addr}"),
            timeout: Some(Duration::from_secs(2)),
        })
        .unwrap();
        let err = repo.list_records().await.unwrap_err();
        assert!(matches!(err, RepositoryError::Http(_)));
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[tokio::test]
    async fn timeout_is_transport() {
        let router = Router::new().route(
            "/api/resumes/:id",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!({}))
            }),
        );
        let repo = HttpRepository::new(ClientConfig {
            base_url: spawn_service(router).await,
            timeout: Some(Duration::from_millis(100)),
        })
        .unwrap();
        let err = repo.get_record(RecordId(1)).await.unwrap_err();
        assert!(matches!(&err, RepositoryError::Http(e) if e.is_timeout()));
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[tokio::test]
    async fn malformed_body_is_transport() {
        let router = Router::new().route(
            "/api/resumes/",
            get(|| async { Json(json!([{"id": 1, "filename": "a.pdf", "resume_rating": 12}])) }),
        );
        let repo = HttpRepository::new(ClientConfig {
            base_url: spawn_service(router).await,
            timeout: None,
        })
        .unwrap();
        let err = repo.list_records().await.unwrap_err();
        assert!(matches!(err, RepositoryError::Json(_)));
    }
}

//! Record repository: list, fetch and submit analyzed resumes against the remote service.

mod error;
mod repository;

#[cfg(feature = "http")]
pub mod http;

pub use error::{ErrorKind, RepositoryError};
pub use repository::RecordRepository;

#[cfg(feature = "http")]
pub use http::{ClientConfig, HttpRepository};

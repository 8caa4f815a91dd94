//! Analyzed resume records as served by the analysis service.
//!
//! The service exposes one underlying record in two shapes: a [`Summary`] for
//! the history list and a full [`Record`] for upload results and the detail
//! view. Field names follow the wire format, including the one known rename
//! (`full_name` on summaries, `name` on full records).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Service-assigned record identifier. Opaque to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub i64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(RecordId)
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        RecordId(id)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("rating {0} is outside 0..=10")]
pub struct RatingError(pub i64);

/// Resume rating on a 0..=10 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Rating(u8);

/// Coarse rating grouping used when rendering a rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingBand {
    High,
    Medium,
    Low,
}

impl Rating {
    pub const MAX: u8 = 10;

    pub fn new(value: u8) -> Result<Self, RatingError> {
        Self::try_from(i64::from(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// 8 and above is high, 6 and 7 medium, anything lower is low.
    pub fn band(self) -> RatingBand {
        match self.0 {
            8.. => RatingBand::High,
            6..=7 => RatingBand::Medium,
            _ => RatingBand::Low,
        }
    }
}

impl TryFrom<i64> for Rating {
    type Error = RatingError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (0..=i64::from(Self::MAX)).contains(&value) {
            Ok(Rating(value as u8))
        } else {
            Err(RatingError(value))
        }
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0, Self::MAX)
    }
}

/// List-view projection returned by `GET /api/resumes/`.
///
/// Contact fields are `None` when the service omitted them or sent `null`,
/// and `Some("")` when it reported an empty detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub id: RecordId,
    pub filename: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// ISO 8601 timestamp string.
    #[serde(default)]
    pub upload_date: Option<String>,
    pub resume_rating: Rating,
}

impl Summary {
    pub fn display_name(&self) -> &str {
        crate::display_or(self.full_name.as_deref(), "Name not detected")
    }
}

/// Full projection returned by the upload and detail endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub filename: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub technical_skills: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub soft_skills: Vec<String>,
    pub resume_rating: Rating,
    #[serde(default, deserialize_with = "null_as_default")]
    pub improvement_areas: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub upskill_suggestions: String,
    /// ISO 8601 timestamp string. The upload endpoint does not return it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_date: Option<String>,
}

impl Record {
    pub fn display_name(&self) -> &str {
        crate::display_or(self.name.as_deref(), "Name not detected")
    }

    /// Project down to the list-view shape, renaming `name` to `full_name`.
    pub fn to_summary(&self) -> Summary {
        Summary {
            id: self.id,
            filename: self.filename.clone(),
            full_name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            upload_date: self.upload_date.clone(),
            resume_rating: self.resume_rating,
        }
    }

    /// Field-for-field comparison of two full projections of the same record.
    ///
    /// `upload_date` only takes part when both sides carry it, since the
    /// upload response leaves it out.
    pub fn matches_upload(&self, other: &Record) -> bool {
        let dates_agree = match (&self.upload_date, &other.upload_date) {
            (Some(a), Some(b)) => a == b,
            _ => true,
        };
        dates_agree
            && self.id == other.id
            && self.filename == other.filename
            && self.name == other.name
            && self.email == other.email
            && self.phone == other.phone
            && self.technical_skills == other.technical_skills
            && self.soft_skills == other.soft_skills
            && self.resume_rating == other.resume_rating
            && self.improvement_areas == other.improvement_areas
            && self.upskill_suggestions == other.upskill_suggestions
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

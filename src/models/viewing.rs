//! A single movie-viewing record.

use arrow::record_batch::RecordBatch;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One row of the viewing dataset
///
/// Every field is optional because permissive loading nulls values that do
/// not parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ViewingRecord {
    #[serde(rename = "UserID")]
    pub user_id: Option<i32>,
    #[serde(rename = "MovieID")]
    pub movie_id: Option<i32>,
    pub movie_title: Option<String>,
    pub genre: Option<String>,
    pub rating: Option<f32>,
    pub review_count: Option<i32>,
    pub watched_year: Option<i32>,
    pub user_location: Option<String>,
    pub age_group: Option<String>,
    pub streaming_platform: Option<String>,
    /// Minutes watched
    pub watch_time: Option<i32>,
    pub is_binge_watched: Option<bool>,
    pub subscription_status: Option<String>,
}

impl ViewingRecord {
    /// Convert directly from a `RecordBatch` using `serde_arrow`
    pub fn from_batch(batch: &RecordBatch) -> Result<Vec<Self>> {
        serde_arrow::from_record_batch::<Vec<Self>>(batch)
            .map_err(|e| anyhow::anyhow!("Failed to deserialize viewing records: {}", e))
    }

    /// Convert a slice of records into a `RecordBatch` with the viewing schema
    pub fn to_batch(records: &[Self]) -> Result<RecordBatch> {
        let fields: Vec<arrow::datatypes::FieldRef> = crate::schema::viewing_schema()
            .fields()
            .iter()
            .map(std::sync::Arc::clone)
            .collect();

        serde_arrow::to_record_batch(&fields, &records)
            .map_err(|e| anyhow::anyhow!("Serialization error: {}", e))
    }
}

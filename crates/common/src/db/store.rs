//! Storage seam for readings
//!
//! The writer, reader, and aggregator only talk to a [`ReadingStore`].
//! Implementations must enforce `session_id` uniqueness atomically and
//! report a violation as [`AppError::DuplicateSession`](crate::errors::AppError).

use crate::db::models::Reading;
use crate::errors::Result;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};

/// A fully derived reading, ready to persist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReading {
    pub session_id: String,
    pub birth_month: i32,
    pub zodiac_sign: Option<String>,
    pub spirit_animal: Option<String>,
    pub spirit_animal_emoji: Option<String>,
    pub quote: &'static str,
    pub author: &'static str,
    pub prediction: &'static str,
    pub good_points: [&'static str; 4],
    pub has_photo: bool,
    pub location_available: bool,
    pub device_type: String,
    pub browser: String,
}

/// Identity assigned to a reading by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavedReading {
    pub id: i32,
    pub created_at: NaiveDateTime,
}

/// Number of readings for one birth month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromQueryResult)]
pub struct MonthCount {
    pub birth_month: i32,
    pub count: i64,
}

/// Persistence operations for readings
#[async_trait]
pub trait ReadingStore: Send + Sync {
    /// Check that the store is reachable
    async fn ping(&self) -> Result<()>;

    /// Create the readings table if it does not exist
    async fn ensure_schema(&self) -> Result<()>;

    /// Append one reading; fails with `DuplicateSession` if the session exists
    async fn insert(&self, reading: NewReading) -> Result<SavedReading>;

    /// Newest readings first, at most `limit` of them
    async fn recent(&self, limit: u64) -> Result<Vec<Reading>>;

    /// Total number of readings
    async fn count_all(&self) -> Result<u64>;

    /// Reading counts per birth month, ascending, months with no rows omitted
    async fn count_by_month(&self) -> Result<Vec<MonthCount>>;

    /// Number of readings taken with a photo
    async fn count_with_photo(&self) -> Result<u64>;

    /// Release pooled resources
    async fn close(&self) -> Result<()>;

    /// Short name for logs
    fn backend_name(&self) -> &'static str;
}

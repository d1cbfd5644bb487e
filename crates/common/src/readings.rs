//! Reading writer, reader, and stats aggregator
//!
//! Both entry points go through [`ReadingService`], so validation, month
//! enrichment, and error classification behave the same everywhere.

use crate::db::models::Reading;
use crate::db::{MonthCount, NewReading, ReadingStore, SavedReading};
use crate::errors::{AppError, Result};
use crate::metrics::{self, SaveOutcome, StoreTimer};
use crate::zodiac::{month_content, PREDICTION};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

/// Default number of rows returned by the reader
pub const DEFAULT_READINGS_LIMIT: u64 = 50;

/// Upper bound applied to any requested limit
pub const MAX_READINGS_LIMIT: u64 = 1000;

/// Stored browser strings are cut to this many characters
pub const MAX_BROWSER_CHARS: usize = 100;

/// Value stored when device type or browser is not supplied
pub const UNKNOWN: &str = "Unknown";

/// A reading as submitted by a client
///
/// Unknown fields (such as the client's own `timestamp`) are ignored.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct ReadingSubmission {
    #[validate(required, length(min = 1))]
    pub session_id: Option<String>,

    #[validate(required)]
    pub birth_month: Option<i32>,

    pub zodiac_sign: Option<String>,
    pub spirit_animal: Option<String>,
    pub spirit_animal_emoji: Option<String>,
    pub has_photo: Option<bool>,
    pub location_available: Option<bool>,
    pub device_type: Option<String>,
    pub browser: Option<String>,
}

impl ReadingSubmission {
    /// Validate and derive the row to persist.
    ///
    /// An empty session id or a birth month of 0 counts as missing.
    /// Out-of-range months are accepted and get January's content.
    pub fn into_new_reading(self) -> Result<NewReading> {
        self.validate().map_err(|errors| {
            let mut fields: Vec<String> = errors
                .field_errors()
                .keys()
                .map(|field| field.to_string())
                .collect();
            fields.sort();
            AppError::MissingField {
                field: fields.join(","),
            }
        })?;

        let (Some(session_id), Some(birth_month)) = (self.session_id, self.birth_month) else {
            return Err(AppError::MissingField {
                field: "session_id,birth_month".to_string(),
            });
        };

        if birth_month == 0 {
            return Err(AppError::MissingField {
                field: "birth_month".to_string(),
            });
        }

        let content = month_content(birth_month);

        Ok(NewReading {
            session_id,
            birth_month,
            zodiac_sign: self.zodiac_sign,
            spirit_animal: self.spirit_animal,
            spirit_animal_emoji: self.spirit_animal_emoji,
            quote: content.quote,
            author: content.author,
            prediction: PREDICTION,
            good_points: content.points,
            has_photo: self.has_photo.unwrap_or(false),
            location_available: self.location_available.unwrap_or(false),
            device_type: self.device_type.unwrap_or_else(|| UNKNOWN.to_string()),
            browser: truncate_chars(
                self.browser.unwrap_or_else(|| UNKNOWN.to_string()),
                MAX_BROWSER_CHARS,
            ),
        })
    }
}

/// Cut `value` to at most `max` characters, never inside a character
pub fn truncate_chars(mut value: String, max: usize) -> String {
    if let Some((byte_index, _)) = value.char_indices().nth(max) {
        value.truncate(byte_index);
    }
    value
}

/// Aggregate view over all readings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadingStats {
    pub total_readings: u64,
    pub by_month: Vec<MonthCount>,
    pub photos_taken: u64,
}

/// Writer, reader, and aggregator over a [`ReadingStore`]
#[derive(Clone)]
pub struct ReadingService {
    store: Arc<dyn ReadingStore>,
}

impl ReadingService {
    pub fn new(store: Arc<dyn ReadingStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn ReadingStore> {
        &self.store
    }

    /// Validate, enrich, and insert one reading
    #[instrument(skip(self, submission), fields(session_id = submission.session_id.as_deref().unwrap_or("")))]
    pub async fn save(&self, submission: ReadingSubmission) -> Result<SavedReading> {
        let reading = match submission.into_new_reading() {
            Ok(reading) => reading,
            Err(e) => {
                metrics::record_save(SaveOutcome::Invalid);
                return Err(e);
            }
        };
        let birth_month = reading.birth_month;

        let timer = StoreTimer::start("insert");
        let result = self.store.insert(reading).await;
        timer.finish();

        match &result {
            Ok(saved) => {
                metrics::record_save(SaveOutcome::Saved);
                info!(record_id = saved.id, birth_month, "Reading saved");
            }
            Err(AppError::DuplicateSession { .. }) => metrics::record_save(SaveOutcome::Duplicate),
            Err(_) => metrics::record_save(SaveOutcome::Failed),
        }

        result
    }

    /// Newest readings first; `None` means the default limit
    pub async fn recent(&self, limit: Option<u64>) -> Result<Vec<Reading>> {
        let limit = limit
            .unwrap_or(DEFAULT_READINGS_LIMIT)
            .min(MAX_READINGS_LIMIT);

        let timer = StoreTimer::start("recent");
        let rows = self.store.recent(limit).await;
        timer.finish();

        rows
    }

    /// Totals, per-month counts, and photo count from three separate queries
    pub async fn stats(&self) -> Result<ReadingStats> {
        let timer = StoreTimer::start("stats");

        let total_readings = self.store.count_all().await?;
        let by_month = self.store.count_by_month().await?;
        let photos_taken = self.store.count_with_photo().await?;

        timer.finish();

        Ok(ReadingStats {
            total_readings,
            by_month,
            photos_taken,
        })
    }

    pub async fn ping(&self) -> Result<()> {
        self.store.ping().await
    }
}

//! In-process reading store
//!
//! Selected with the `memory://` database URL and used throughout the tests.
//! A single lock covers the uniqueness check and the append, so concurrent
//! inserts of one session resolve to exactly one success.

use crate::db::models::Reading;
use crate::db::store::{MonthCount, NewReading, ReadingStore, SavedReading};
use crate::errors::{AppError, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::Mutex;

#[derive(Default)]
struct MemoryState {
    rows: Vec<Reading>,
    next_id: i32,
}

/// Reading store held entirely in memory
#[derive(Default)]
pub struct MemoryReadingStore {
    state: Mutex<MemoryState>,
}

impl MemoryReadingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReadingStore for MemoryReadingStore {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn ensure_schema(&self) -> Result<()> {
        Ok(())
    }

    async fn insert(&self, reading: NewReading) -> Result<SavedReading> {
        let mut state = self.state.lock().await;

        if state.rows.iter().any(|r| r.session_id == reading.session_id) {
            return Err(AppError::DuplicateSession {
                session_id: reading.session_id,
            });
        }

        state.next_id += 1;
        let id = state.next_id;
        let created_at = chrono::Utc::now().naive_utc();
        let [point1, point2, point3, point4] = reading.good_points;

        state.rows.push(Reading {
            id,
            session_id: reading.session_id,
            birth_month: reading.birth_month,
            zodiac_sign: reading.zodiac_sign,
            spirit_animal: reading.spirit_animal,
            spirit_animal_emoji: reading.spirit_animal_emoji,
            quote: Some(reading.quote.to_string()),
            author: Some(reading.author.to_string()),
            prediction: Some(reading.prediction.to_string()),
            good_point1: Some(point1.to_string()),
            good_point2: Some(point2.to_string()),
            good_point3: Some(point3.to_string()),
            good_point4: Some(point4.to_string()),
            has_photo: reading.has_photo,
            location_available: reading.location_available,
            device_type: Some(reading.device_type),
            browser: Some(reading.browser),
            created_at,
        });

        Ok(SavedReading { id, created_at })
    }

    async fn recent(&self, limit: u64) -> Result<Vec<Reading>> {
        let state = self.state.lock().await;

        let mut rows = state.rows.clone();
        rows.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        rows.truncate(usize::try_from(limit).unwrap_or(usize::MAX));

        Ok(rows)
    }

    async fn count_all(&self) -> Result<u64> {
        let state = self.state.lock().await;
        Ok(state.rows.len() as u64)
    }

    async fn count_by_month(&self) -> Result<Vec<MonthCount>> {
        let state = self.state.lock().await;

        let mut counts: BTreeMap<i32, i64> = BTreeMap::new();
        for row in &state.rows {
            *counts.entry(row.birth_month).or_default() += 1;
        }

        Ok(counts
            .into_iter()
            .map(|(birth_month, count)| MonthCount { birth_month, count })
            .collect())
    }

    async fn count_with_photo(&self) -> Result<u64> {
        let state = self.state.lock().await;
        Ok(state.rows.iter().filter(|r| r.has_photo).count() as u64)
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

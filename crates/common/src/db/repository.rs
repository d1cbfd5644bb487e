//! SeaORM-backed reading store
//!
//! All statements are single-statement and parameterized; uniqueness of
//! `session_id` is left to the table's UNIQUE constraint.

use crate::db::models::*;
use crate::db::schema;
use crate::db::store::{MonthCount, NewReading, ReadingStore, SavedReading};
use crate::db::DbPool;
use crate::errors::{AppError, Result};
use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::sqlx::Error as SqlxError;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RuntimeErr, Set, SqlErr,
};

/// Repository for reading operations against Postgres
pub struct Repository {
    pool: DbPool,
}

impl Repository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> &DatabaseConnection {
        self.pool.conn()
    }
}

/// Whether the database rejected the statement on a unique constraint.
///
/// SeaORM only classifies errors that downcast to the Postgres driver type;
/// sqlx's own error kind covers the rest.
fn is_unique_violation(err: &DbErr) -> bool {
    if let Some(SqlErr::UniqueConstraintViolation(_)) = err.sql_err() {
        return true;
    }

    match err {
        DbErr::Exec(RuntimeErr::SqlxError(SqlxError::Database(db_err)))
        | DbErr::Query(RuntimeErr::SqlxError(SqlxError::Database(db_err))) => {
            db_err.is_unique_violation()
                || db_err.code().as_deref() == Some(UNIQUE_VIOLATION_SQLSTATE)
        }
        _ => false,
    }
}

/// SQLSTATE for unique_violation
const UNIQUE_VIOLATION_SQLSTATE: &str = "23505";

/// Split unique-constraint violations out of other database failures
fn classify_insert_error(err: DbErr, session_id: &str) -> AppError {
    if is_unique_violation(&err) {
        tracing::debug!(session_id, error = %err, "Unique constraint rejected insert");
        return AppError::DuplicateSession {
            session_id: session_id.to_string(),
        };
    }

    AppError::Storage(err)
}

impl From<NewReading> for ReadingActiveModel {
    fn from(reading: NewReading) -> Self {
        let [point1, point2, point3, point4] = reading.good_points;

        ReadingActiveModel {
            session_id: Set(reading.session_id),
            birth_month: Set(reading.birth_month),
            zodiac_sign: Set(reading.zodiac_sign),
            spirit_animal: Set(reading.spirit_animal),
            spirit_animal_emoji: Set(reading.spirit_animal_emoji),
            quote: Set(Some(reading.quote.to_string())),
            author: Set(Some(reading.author.to_string())),
            prediction: Set(Some(reading.prediction.to_string())),
            good_point1: Set(Some(point1.to_string())),
            good_point2: Set(Some(point2.to_string())),
            good_point3: Set(Some(point3.to_string())),
            good_point4: Set(Some(point4.to_string())),
            has_photo: Set(reading.has_photo),
            location_available: Set(reading.location_available),
            device_type: Set(Some(reading.device_type)),
            browser: Set(Some(reading.browser)),
            ..Default::default()
        }
    }
}

#[async_trait]
impl ReadingStore for Repository {
    async fn ping(&self) -> Result<()> {
        self.pool.ping().await
    }

    async fn ensure_schema(&self) -> Result<()> {
        schema::ensure(self.conn()).await
    }

    async fn insert(&self, reading: NewReading) -> Result<SavedReading> {
        let session_id = reading.session_id.clone();

        let saved = ReadingActiveModel::from(reading)
            .insert(self.conn())
            .await
            .map_err(|e| classify_insert_error(e, &session_id))?;

        Ok(SavedReading {
            id: saved.id,
            created_at: saved.created_at,
        })
    }

    async fn recent(&self, limit: u64) -> Result<Vec<Reading>> {
        ReadingEntity::find()
            .order_by_desc(ReadingColumn::CreatedAt)
            .order_by_desc(ReadingColumn::Id)
            .limit(limit)
            .all(self.conn())
            .await
            .map_err(Into::into)
    }

    async fn count_all(&self) -> Result<u64> {
        ReadingEntity::find()
            .count(self.conn())
            .await
            .map_err(Into::into)
    }

    async fn count_by_month(&self) -> Result<Vec<MonthCount>> {
        ReadingEntity::find()
            .select_only()
            .column(ReadingColumn::BirthMonth)
            .column_as(Expr::col(ReadingColumn::Id).count(), "count")
            .group_by(ReadingColumn::BirthMonth)
            .order_by_asc(ReadingColumn::BirthMonth)
            .into_model::<MonthCount>()
            .all(self.conn())
            .await
            .map_err(Into::into)
    }

    async fn count_with_photo(&self) -> Result<u64> {
        ReadingEntity::find()
            .filter(ReadingColumn::HasPhoto.eq(true))
            .count(self.conn())
            .await
            .map_err(Into::into)
    }

    async fn close(&self) -> Result<()> {
        self.pool.close().await
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zodiac::{month_content, PREDICTION};
    use chrono::NaiveDate;
    use sea_orm::sqlx::error::{DatabaseError, ErrorKind};
    use sea_orm::sea_query::Value;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::borrow::Cow;
    use std::collections::BTreeMap;
    use std::error::Error as StdError;

    /// Driver error carrying a SQLSTATE, as Postgres reports it
    #[derive(Debug)]
    struct DriverError {
        code: &'static str,
        unique: bool,
    }

    impl std::fmt::Display for DriverError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "driver error {}", self.code)
        }
    }

    impl StdError for DriverError {}

    impl DatabaseError for DriverError {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint \"zodiac_readings_session_id_key\""
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Borrowed(self.code))
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            if self.unique {
                ErrorKind::UniqueViolation
            } else {
                ErrorKind::Other
            }
        }
    }

    fn driver_error(code: &'static str, unique: bool) -> DbErr {
        DbErr::Query(RuntimeErr::SqlxError(SqlxError::Database(Box::new(
            DriverError { code, unique },
        ))))
    }

    fn count_row(count: i64) -> BTreeMap<&'static str, Value> {
        BTreeMap::from([("num_items", Value::BigInt(Some(count)))])
    }

    fn month_row(birth_month: i32, count: i64) -> BTreeMap<&'static str, Value> {
        BTreeMap::from([
            ("birth_month", Value::Int(Some(birth_month))),
            ("count", Value::BigInt(Some(count))),
        ])
    }

    fn created_at(hour: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 14)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn row(id: i32, session_id: &str, hour: u32) -> Reading {
        let content = month_content(3);
        Reading {
            id,
            session_id: session_id.to_string(),
            birth_month: 3,
            zodiac_sign: Some("Pisces".to_string()),
            spirit_animal: Some("Dolphin".to_string()),
            spirit_animal_emoji: None,
            quote: Some(content.quote.to_string()),
            author: Some(content.author.to_string()),
            prediction: Some(PREDICTION.to_string()),
            good_point1: Some(content.points[0].to_string()),
            good_point2: Some(content.points[1].to_string()),
            good_point3: Some(content.points[2].to_string()),
            good_point4: Some(content.points[3].to_string()),
            has_photo: false,
            location_available: true,
            device_type: Some("Mobile".to_string()),
            browser: Some("Firefox".to_string()),
            created_at: created_at(hour),
        }
    }

    fn new_reading(session_id: &str) -> NewReading {
        let content = month_content(3);
        NewReading {
            session_id: session_id.to_string(),
            birth_month: 3,
            zodiac_sign: Some("Pisces".to_string()),
            spirit_animal: Some("Dolphin".to_string()),
            spirit_animal_emoji: None,
            quote: content.quote,
            author: content.author,
            prediction: PREDICTION,
            good_points: content.points,
            has_photo: false,
            location_available: true,
            device_type: "Mobile".to_string(),
            browser: "Firefox".to_string(),
        }
    }

    fn repository(db: MockDatabase) -> Repository {
        Repository::new(DbPool::from_connection(db.into_connection()))
    }

    #[test]
    fn test_active_model_carries_derived_content() {
        let model = ReadingActiveModel::from(new_reading("abc"));
        assert_eq!(model.session_id, Set("abc".to_string()));
        assert_eq!(model.author, Set(Some("Unknown".to_string())));
        assert_eq!(
            model.good_point4,
            Set(Some("Creative potential".to_string()))
        );
        assert!(model.id.is_not_set());
        assert!(model.created_at.is_not_set());
    }

    #[tokio::test]
    async fn test_insert_returns_generated_identity() {
        let repo = repository(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![row(7, "abc", 9)]]),
        );

        let saved = repo.insert(new_reading("abc")).await.unwrap();
        assert_eq!(saved.id, 7);
        assert_eq!(saved.created_at, created_at(9));
    }

    #[tokio::test]
    async fn test_insert_failure_is_storage_error() {
        let repo = repository(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_errors([DbErr::Custom("connection reset".into())]),
        );

        let err = repo.insert(new_reading("abc")).await.unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
        assert!(err.to_string().contains("connection reset"));
    }

    #[tokio::test]
    async fn test_recent_returns_rows_in_store_order() {
        let repo = repository(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![row(2, "b", 11), row(1, "a", 10)]]),
        );

        let rows = repo.recent(50).await.unwrap();
        let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[tokio::test]
    async fn test_close_through_shared_store() {
        let store: std::sync::Arc<dyn ReadingStore> =
            std::sync::Arc::new(repository(MockDatabase::new(DatabaseBackend::Postgres)));

        tokio_test::assert_ok!(store.close().await);
        assert_eq!(store.backend_name(), "postgres");
    }

    #[test]
    fn test_unique_violation_becomes_duplicate_session() {
        let err = classify_insert_error(
            driver_error("23505", true),
            "abc",
        );
        assert!(matches!(err, AppError::DuplicateSession { ref session_id } if session_id == "abc"));
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);

        // SQLSTATE alone is enough
        let err = classify_insert_error(driver_error("23505", false), "abc");
        assert!(matches!(err, AppError::DuplicateSession { .. }));
    }

    #[test]
    fn test_other_constraint_failures_stay_storage_errors() {
        let err = classify_insert_error(driver_error("23502", false), "abc");
        assert!(matches!(err, AppError::Storage(_)));
        assert!(err.is_server_error());
    }

    #[tokio::test]
    async fn test_insert_unique_violation_is_duplicate() {
        let repo = repository(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_errors([driver_error("23505", true)]),
        );

        let err = repo.insert(new_reading("abc")).await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateSession { .. }));
    }

    #[tokio::test]
    async fn test_counts_read_aggregate_rows() {
        let repo = repository(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![count_row(6)]])
                .append_query_results([vec![month_row(1, 1), month_row(3, 3), month_row(12, 2)]])
                .append_query_results([vec![count_row(4)]]),
        );

        assert_eq!(repo.count_all().await.unwrap(), 6);
        assert_eq!(
            repo.count_by_month().await.unwrap(),
            vec![
                MonthCount { birth_month: 1, count: 1 },
                MonthCount { birth_month: 3, count: 3 },
                MonthCount { birth_month: 12, count: 2 },
            ]
        );
        assert_eq!(repo.count_with_photo().await.unwrap(), 4);

        let log = format!("{:?}", repo.pool.into_connection().into_transaction_log());
        assert!(log.contains("COUNT(*) AS num_items"));
        assert!(log.contains("GROUP BY"));
        assert!(log.contains("has_photo"));
    }
}

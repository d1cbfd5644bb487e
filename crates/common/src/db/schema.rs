//! Idempotent table creation for `zodiac_readings`

use crate::errors::Result;
use sea_orm::{ConnectionTrait, DatabaseConnection};
use tracing::info;

/// Table DDL; column widths match the deployed table.
pub const CREATE_READINGS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS zodiac_readings (
    id SERIAL PRIMARY KEY,
    session_id VARCHAR(100) UNIQUE NOT NULL,
    birth_month INTEGER NOT NULL,
    zodiac_sign VARCHAR(50),
    spirit_animal VARCHAR(50),
    spirit_animal_emoji VARCHAR(10),
    quote TEXT,
    author VARCHAR(100),
    prediction TEXT,
    good_point1 VARCHAR(100),
    good_point2 VARCHAR(100),
    good_point3 VARCHAR(100),
    good_point4 VARCHAR(100),
    has_photo BOOLEAN NOT NULL DEFAULT FALSE,
    location_available BOOLEAN NOT NULL DEFAULT FALSE,
    device_type VARCHAR(50),
    browser VARCHAR(100),
    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
)
"#;

/// Serves the newest-first listing
pub const CREATE_CREATED_AT_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS zodiac_readings_created_at_idx
    ON zodiac_readings (created_at DESC)
"#;

/// Create the readings table and its index when absent
pub async fn ensure(conn: &DatabaseConnection) -> Result<()> {
    conn.execute_unprepared(CREATE_READINGS_TABLE).await?;
    conn.execute_unprepared(CREATE_CREATED_AT_INDEX).await?;

    info!("Readings schema ready");
    Ok(())
}

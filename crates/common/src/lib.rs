//! Zodiac Readings Common Library
//!
//! Shared code for the gateway server and the standalone save handler:
//! - Reading entity, store seam, and Postgres/in-memory stores
//! - Static per-month content
//! - Reading writer, reader, and stats aggregator
//! - Error types and handling
//! - Configuration management
//! - Logging and metrics helpers
//! - Timestamp rendering shared by every response

pub mod config;
pub mod db;
pub mod errors;
pub mod metrics;
pub mod readings;
pub mod telemetry;
pub mod timestamps;
pub mod zodiac;

// Re-export commonly used types
pub use config::AppConfig;
pub use db::ReadingStore;
pub use errors::{AppError, Result};
pub use readings::{ReadingService, ReadingSubmission};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

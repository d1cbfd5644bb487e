//! API handlers module

pub mod health;
pub mod index;
pub mod readings;
pub mod stats;

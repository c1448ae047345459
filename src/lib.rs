//! Medibook — role-based hospital appointment scheduling core.
//!
//! Doctors publish availability slots, patients book and cancel them,
//! doctors record visit outcomes. Persistence is SQLite; routing,
//! sessions, and password hashing live in the embedding application.

pub mod accounts;
pub mod booking;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod slots;

#[cfg(test)]
pub(crate) mod testutil;

pub use error::ScheduleError;

use tracing_subscriber::EnvFilter;

/// Initialize tracing for the embedding application.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}

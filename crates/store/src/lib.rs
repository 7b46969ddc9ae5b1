//! Durable, append-only execution log for model arbitration outcomes.
//!
//! One row is written per top-level arbitration call. The `llm_log` table is
//! the on-disk contract consumed by history viewers and the healing driver;
//! its column names and semantics are stable.

mod log_store;
mod types;

pub use log_store::{LogStore, StoreError};
pub use types::{LogEntry, LogStatus};

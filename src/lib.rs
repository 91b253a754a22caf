// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod notify;
pub mod pipeline;
pub mod runner;
pub mod stats;
pub mod store;

// ---- Re-exports for stable public API ----
pub use crate::config::{AppConfig, SourceConfig};
pub use crate::error::{ExtractError, StoreError};
pub use crate::notify::{DeliveryStatus, Notification, Notifier};
pub use crate::pipeline::{SourceReport, Tracker};
pub use crate::runner::{Outcome, Runner, RunnerKind, SuppressReason};
pub use crate::stats::{Counter, Counters, Snapshot};
pub use crate::store::{Record, RecordStore, StoreRegistry};

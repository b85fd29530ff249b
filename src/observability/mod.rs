//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → stderr (tracing fmt layer)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Structured fields on every event (tx_hash, rights_id, session_id)
//! - Private keys never appear in logs
//! - Metric updates are no-ops until an exporter is installed

pub mod logging;
pub mod metrics;

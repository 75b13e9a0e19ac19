//! EI Core - Deterministic compute engine for Effectiveness Index signals
//!
//! ei-core converts noisy, partial behavioral signals into six normalized
//! sub-scores, a weighted aggregate score, and a categorical regulation
//! state, through a deterministic pipeline: signal parsing → sub-index
//! scoring → calendar-context adjustment → aggregation → state
//! classification → (insight generation, snapshot encoding).
//!
//! ## Modules
//!
//! - **Engine**: pure scoring of [`types::DomainSignals`] into [`types::EiResult`]
//! - **Insights**: natural-language insights and recommendations on top of a result
//! - **Calendar**: workload summarization over caller-supplied events
//! - **Snapshot/Trend/Pipeline**: encoding results into durable snapshots,
//!   with optional rolling-window trend context

pub mod calendar;
pub mod engine;
pub mod error;
pub mod insights;
pub mod pipeline;
pub mod snapshot;
pub mod trend;
pub mod types;

pub use engine::compute_ei;
pub use error::ComputeError;
pub use insights::generate_insights;
pub use pipeline::{signals_to_snapshot, EiProcessor};
pub use snapshot::SnapshotEncoder;
pub use trend::TrendStore;
pub use types::{
    CalendarEvent, CalendarSummary, DomainSignals, EiResult, EiSnapshot, InsightReport,
    RegulationState,
};

/// Engine version embedded in all snapshot payloads
pub const EI_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for snapshot payloads
pub const PRODUCER_NAME: &str = "ei-core";

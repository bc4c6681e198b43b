//! Lap stint and driver comparison analysis over session lap tables.
//!
//! Every entry point takes the lap table by reference and returns freshly
//! built values; nothing here performs I/O or keeps state between calls.

pub mod analysis;
pub mod config;
pub mod error;
pub mod gap;
pub mod laps;
pub mod session;
pub mod stint;
pub mod telemetry;
pub mod types;

pub use analysis::{analyze, AnalysisReport, AnalysisRequest, DriverReport, SessionData};
pub use error::{AnalysisError, Result};
pub use gap::{compare_drivers, gap_to_leader, LapMetric, MetricComparison};
pub use stint::{reconstruct_stints, StintStrategy};
pub use types::{Compound, DriverInfo, GapRow, LapRecord, Stint, TelemetrySample};

//! # Debug Tooling
//!
//! Everything the debug dashboard consumes. None of it is needed for
//! navigation to work.
//!
//! - [`recorder`]: `DebugRecorder`, the injected navigation event log
//! - [`route`]: synthetic feature routes and the debug router
//! - [`flow`]: scripted multi-step flows and their runner
//! - [`analyzer`]: registry health checks
//! - [`visualizer`]: router hierarchy and per-router timeline

pub mod analyzer;
pub mod flow;
pub mod recorder;
pub mod route;
pub mod visualizer;

pub use analyzer::{Analyzer, IssueSeverity, RouterIssue};
pub use flow::{FlowIds, FlowRunner, FlowStep, FlowTiming, StepOutcome};
pub use recorder::{DebugRecorder, LogKind, NavigationLog, NavigationLogEntry};
pub use route::{DEBUG_ROUTER_ID, DebugRoute, Feature, ensure_debug_router};

//! Services
//!
//! Core engine logic. Every entry point is a pure function of its inputs:
//! no I/O, no shared state, safe to call concurrently.

pub mod dependency;
pub mod scheduler;
pub mod validation;

pub use dependency::{
    AnalyzerError, Batch, CycleDetector, DependencyAnalyzer, DependencyGraphBuilder,
    DependencyMetrics,
};
pub use scheduler::{ScheduleError, SchedulerConfig, SprintScheduler};
pub use validation::PlanValidator;

//! Cadence Engine - Dependency Graph & Sprint Scheduling
//!
//! Pure planning computations over a snapshot of PRD stories:
//! - Dependency graph construction with readiness, depth, and fan-out
//! - Circular dependency detection
//! - Execution-plan validation warnings
//! - Capacity-constrained sprint scheduling with candidate-plan repair
//!
//! The engine holds no state between calls; persistence and transport are
//! the embedding application's responsibility.

pub mod models;
pub mod services;
pub mod utils;

pub use models::graph::{
    DependencyEdge, DependencyGraph, DependencyNode, PlanWarning, ValidationResult, WarningType,
};
pub use models::prd::{
    AcceptanceCriteria, Prd, Priority, Story, StoryStatus, STORY_POINT_SCALE,
};
pub use models::sprint::{
    CapacityMode, ParseCapacityModeError, Sprint, SprintPlan, SprintStory, UnassignedStory,
};
pub use services::dependency::{
    AnalyzerError, Batch, CycleDetector, DependencyAnalyzer, DependencyGraphBuilder,
    DependencyMetrics,
};
pub use services::scheduler::{ScheduleError, SchedulerConfig, SprintScheduler};
pub use services::validation::PlanValidator;
pub use utils::error::{AppError, AppResult};

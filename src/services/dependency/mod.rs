//! Dependency Services
//!
//! Graph construction, cycle detection, and dependency analytics.

pub mod analyzer;
pub mod cycle_detector;
pub mod graph_builder;

pub use analyzer::{AnalyzerError, Batch, DependencyAnalyzer, DependencyMetrics};
pub use cycle_detector::CycleDetector;
pub use graph_builder::DependencyGraphBuilder;

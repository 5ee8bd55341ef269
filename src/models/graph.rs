//! Dependency Graph Models
//!
//! Output structures produced by the graph builder and plan validator.
//! Field names serialize in camelCase to match the frontend contract.

use serde::{Deserialize, Serialize};

use crate::models::prd::{Priority, StoryStatus};

/// Kind of warning attached to a graph or validation result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningType {
    /// A dependency references a story id absent from the snapshot
    OrphanDependency,
    /// Graph-level circular dependency report
    Circular,
    /// A pending or in-progress story whose blockers are not all completed
    UnresolvedBlocker,
    /// Per-story circular dependency finding from plan validation
    CircularDependency,
    /// A considered story blocked by an unresolved blocker
    BlockedStory,
    /// A considered story blocked by a story nobody is tracking
    MissingDependency,
}

/// A single warning with the story ids it concerns
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanWarning {
    /// Warning kind
    #[serde(rename = "type")]
    pub warning_type: WarningType,
    /// Human-readable explanation
    pub message: String,
    /// Stories this warning concerns
    pub story_ids: Vec<String>,
}

impl PlanWarning {
    /// Create a new warning
    pub fn new(
        warning_type: WarningType,
        message: impl Into<String>,
        story_ids: Vec<String>,
    ) -> Self {
        Self {
            warning_type,
            message: message.into(),
            story_ids,
        }
    }
}

/// A story projected into the dependency graph
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyNode {
    /// Story id this node represents
    pub story_id: String,
    /// Story title
    pub title: String,
    /// Story status
    pub status: StoryStatus,
    /// Story priority
    pub priority: Priority,
    /// Number of stories that list this one as a blocker (resolvable edges only)
    pub blocks_count: u32,
    /// Number of resolvable blockers of this story
    pub blocked_by_count: u32,
    /// Whether every resolvable blocker is completed
    pub is_ready: bool,
    /// Longest resolvable blocker chain ending at this story
    pub depth: u32,
}

/// A resolvable dependency edge from blocker to blocked story
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyEdge {
    /// Blocker story id
    pub from: String,
    /// Blocked story id
    pub to: String,
    /// Optional recorded reason for the dependency
    pub reason: Option<String>,
}

/// The dependency graph for one PRD
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyGraph {
    /// Document the graph was built from
    pub prd_id: String,
    /// Nodes in snapshot input order
    pub nodes: Vec<DependencyNode>,
    /// Deduplicated resolvable edges in discovery order
    pub edges: Vec<DependencyEdge>,
    /// Structural anomalies recovered during the build
    pub warnings: Vec<PlanWarning>,
}

/// Result of validating a story subset for execution
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// True when no warnings were produced
    pub valid: bool,
    /// Warnings in detection order
    pub warnings: Vec<PlanWarning>,
}

impl ValidationResult {
    /// Build a result from collected warnings
    pub fn from_warnings(warnings: Vec<PlanWarning>) -> Self {
        Self {
            valid: warnings.is_empty(),
            warnings,
        }
    }
}

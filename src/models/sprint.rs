//! Sprint Plan Models
//!
//! Output structures produced by the sprint scheduler, plus the capacity
//! mode configuration enum.

use serde::{Deserialize, Serialize};

use crate::models::prd::Priority;

/// How sprint capacity is measured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapacityMode {
    /// Each story weighs 1
    Count,
    /// Each story weighs its story-point estimate
    Points,
}

/// Error for capacity mode tokens that are not part of the closed set
#[derive(Debug, Clone, thiserror::Error)]
#[error("Unknown capacity mode '{0}', expected 'count' or 'points'")]
pub struct ParseCapacityModeError(pub String);

impl std::str::FromStr for CapacityMode {
    type Err = ParseCapacityModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "count" => Ok(CapacityMode::Count),
            "points" => Ok(CapacityMode::Points),
            other => Err(ParseCapacityModeError(other.to_string())),
        }
    }
}

/// A story assigned to a sprint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SprintStory {
    /// Assigned story id
    pub story_id: String,
    /// Story title at scheduling time
    pub title: String,
    /// Story-point estimate
    pub story_points: u32,
    /// Story priority
    pub priority: Priority,
    /// Rationale for the assignment, if any
    pub reason: Option<String>,
}

/// A capacity-bounded execution period
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sprint {
    /// 1-based sequential sprint number
    pub sprint_number: u32,
    /// Stories assigned to this sprint, in assignment order
    pub stories: Vec<SprintStory>,
    /// Summed story weight under the configured capacity mode
    pub total_weight: u32,
}

/// A story that could not be scheduled
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnassignedStory {
    /// Story id
    pub story_id: String,
    /// Story title
    pub title: String,
    /// Why the story was not scheduled
    pub reason: String,
}

/// The complete sprint plan for one PRD
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SprintPlan {
    /// Document the plan was built from
    pub prd_id: String,
    /// Sprints numbered sequentially from 1
    pub sprints: Vec<Sprint>,
    /// Stories excluded from scheduling, in snapshot order
    pub unassigned_stories: Vec<UnassignedStory>,
    /// Summed weight across all sprints
    pub total_weight: u32,
    /// Number of sprints in the plan
    pub total_sprints: u32,
}

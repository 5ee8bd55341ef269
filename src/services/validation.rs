//! Plan Validation
//!
//! Validates the subset of stories being considered for near-term execution
//! (pending and in-progress stories), reusing the cycle detector. Produces
//! warnings, never errors: callers decide whether to proceed.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::models::graph::{PlanWarning, ValidationResult, WarningType};
use crate::models::prd::{Story, StoryStatus};
use crate::services::dependency::CycleDetector;

/// Validates story subsets ahead of execution
pub struct PlanValidator;

impl PlanValidator {
    /// Validate a story snapshot for execution readiness.
    ///
    /// The considered subset is the snapshot's pending/in-progress stories;
    /// terminal stories supply blocker status context. Emits
    /// `circular_dependency` per considered story on a cycle,
    /// `blocked_story` per considered story with unresolved resolvable
    /// blockers, and `missing_dependency` per blocker that was skipped
    /// rather than scheduled.
    pub fn validate(stories: &[Story]) -> ValidationResult {
        let by_id: HashMap<&str, &Story> = stories.iter().map(|s| (s.id.as_str(), s)).collect();
        let considered_ids: HashSet<&str> = stories
            .iter()
            .filter(|s| !s.status.is_terminal())
            .map(|s| s.id.as_str())
            .collect();

        let mut warnings: Vec<PlanWarning> = Vec::new();

        // Cycles among the considered subset only
        let adjacency: HashMap<String, Vec<String>> = stories
            .iter()
            .filter(|s| considered_ids.contains(s.id.as_str()))
            .map(|s| {
                let mut seen: HashSet<&str> = HashSet::new();
                let blockers = s
                    .depends_on
                    .iter()
                    .filter(|d| considered_ids.contains(d.as_str()) && seen.insert(d.as_str()))
                    .cloned()
                    .collect();
                (s.id.clone(), blockers)
            })
            .collect();
        let cyclic: HashSet<String> = CycleDetector::find_cycle_story_ids(&adjacency)
            .into_iter()
            .collect();

        for story in stories {
            if cyclic.contains(&story.id) {
                warnings.push(PlanWarning::new(
                    WarningType::CircularDependency,
                    format!("Story '{}' is part of a circular dependency chain", story.id),
                    vec![story.id.clone()],
                ));
            }
        }

        for story in stories {
            if story.status.is_terminal() {
                continue;
            }

            let mut seen: HashSet<&str> = HashSet::new();
            let unresolved: Vec<&Story> = story
                .depends_on
                .iter()
                .filter(|d| seen.insert(d.as_str()))
                .filter_map(|d| by_id.get(d.as_str()).copied())
                .filter(|blocker| blocker.status != StoryStatus::Completed)
                .collect();

            if unresolved.is_empty() {
                continue;
            }

            let blocker_ids: Vec<&str> = unresolved.iter().map(|b| b.id.as_str()).collect();
            warnings.push(PlanWarning::new(
                WarningType::BlockedStory,
                format!(
                    "Story '{}' is blocked by incomplete stories: {}",
                    story.id,
                    blocker_ids.join(", ")
                ),
                vec![story.id.clone()],
            ));

            for blocker in unresolved {
                // Unresolved and terminal means skipped: nobody is tracking it
                if blocker.status.is_terminal() {
                    warnings.push(PlanWarning::new(
                        WarningType::MissingDependency,
                        format!(
                            "Story '{}' depends on '{}', which was skipped and is not scheduled for execution",
                            story.id, blocker.id
                        ),
                        vec![story.id.clone(), blocker.id.clone()],
                    ));
                }
            }
        }

        debug!(
            considered = considered_ids.len(),
            warnings = warnings.len(),
            "validated execution plan"
        );

        ValidationResult::from_warnings(warnings)
    }
}

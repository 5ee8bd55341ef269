//! Sprint Scheduler
//!
//! Repairs an optional externally-produced candidate assignment into a
//! complete, capacity-valid sprint plan. The candidate is untrusted input:
//! unknown ids and duplicates are dropped, weights and titles are
//! recomputed from the snapshot, and every eligible story not covered by
//! the candidate is placed by first-fit.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::prd::{Prd, Story};
use crate::models::sprint::{
    CapacityMode, ParseCapacityModeError, Sprint, SprintPlan, SprintStory, UnassignedStory,
};

/// Reason attached to stories the scheduler places itself
const FIRST_FIT_REASON: &str = "Placed in first sprint with available capacity";

/// Reason for stories lacking a story-point estimate
const NO_ESTIMATE_REASON: &str = "No estimate — estimate the story first";

/// Scheduler configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulerConfig {
    /// Capacity budget per sprint; must be positive
    pub capacity: u32,
    /// How story weight is measured against the budget
    pub mode: CapacityMode,
}

/// Errors that can occur during scheduling
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error("Sprint capacity must be positive")]
    InvalidCapacity,

    #[error(transparent)]
    UnknownCapacityMode(#[from] ParseCapacityModeError),
}

/// Capacity-constrained sprint scheduler
pub struct SprintScheduler;

impl SprintScheduler {
    /// Build a complete sprint plan for a PRD.
    ///
    /// Terminal and unestimated stories go to `unassigned_stories`; every
    /// remaining story ends up in exactly one sprint. When a candidate is
    /// supplied its sprint grouping is authoritative for the stories it
    /// legitimately covers; the scheduler only fills the gaps. Output is
    /// deterministic: ties are broken by snapshot input order.
    pub fn schedule(
        prd: &Prd,
        config: &SchedulerConfig,
        candidate: Option<&SprintPlan>,
    ) -> Result<SprintPlan, ScheduleError> {
        if config.capacity == 0 {
            return Err(ScheduleError::InvalidCapacity);
        }

        // Pre-filter: terminal or unestimated stories are never schedulable
        let mut unassigned: Vec<UnassignedStory> = Vec::new();
        let mut eligible: Vec<(&Story, u32)> = Vec::new();
        for story in &prd.stories {
            if story.status.is_terminal() {
                unassigned.push(UnassignedStory {
                    story_id: story.id.clone(),
                    title: story.title.clone(),
                    reason: format!("Already {}", story.status),
                });
                continue;
            }
            match story.estimate {
                Some(points) => eligible.push((story, points)),
                None => unassigned.push(UnassignedStory {
                    story_id: story.id.clone(),
                    title: story.title.clone(),
                    reason: NO_ESTIMATE_REASON.to_string(),
                }),
            }
        }

        let eligible_by_id: HashMap<&str, (&Story, u32)> = eligible
            .iter()
            .map(|(story, points)| (story.id.as_str(), (*story, *points)))
            .collect();

        let story_weight = |points: u32| match config.mode {
            CapacityMode::Count => 1,
            CapacityMode::Points => points,
        };

        // Working sprints: (story, points, kept reason) per slot
        let mut sprints: Vec<Vec<(&Story, u32, Option<String>)>> = Vec::new();
        let mut covered: HashSet<&str> = HashSet::new();

        // Step 1: filter the candidate, keeping its sprint grouping. Ids
        // outside the eligible set and repeat assignments are dropped.
        if let Some(plan) = candidate {
            for cand_sprint in &plan.sprints {
                let mut kept: Vec<(&Story, u32, Option<String>)> = Vec::new();
                for entry in &cand_sprint.stories {
                    if let Some(&(story, points)) = eligible_by_id.get(entry.story_id.as_str()) {
                        if covered.insert(story.id.as_str()) {
                            kept.push((story, points, entry.reason.clone()));
                        }
                    }
                }
                // Emptied sprints stay as placement targets; their declared
                // order is part of the candidate's intent
                sprints.push(kept);
            }
        }

        // Steps 2-3: first-fit every eligible story the candidate missed
        let mut placed_count = 0usize;
        for (story, points) in &eligible {
            if covered.contains(story.id.as_str()) {
                continue;
            }
            let weight = story_weight(*points);

            let slot = sprints.iter().position(|sprint| {
                let current: u32 = sprint.iter().map(|(_, p, _)| story_weight(*p)).sum();
                current + weight <= config.capacity
            });

            let entry = (*story, *points, Some(FIRST_FIT_REASON.to_string()));
            match slot {
                Some(index) => sprints[index].push(entry),
                // No room anywhere: open a new sprint. A single story
                // heavier than the capacity still gets placed alone.
                None => sprints.push(vec![entry]),
            }
            covered.insert(story.id.as_str());
            placed_count += 1;
        }

        // Steps 4-5: drop empty sprints, renumber, recompute totals
        let mut out_sprints: Vec<Sprint> = Vec::new();
        for slots in sprints.into_iter().filter(|s| !s.is_empty()) {
            let total_weight: u32 = slots.iter().map(|(_, p, _)| story_weight(*p)).sum();
            let stories: Vec<SprintStory> = slots
                .into_iter()
                .map(|(story, points, reason)| SprintStory {
                    story_id: story.id.clone(),
                    title: story.title.clone(),
                    story_points: points,
                    priority: story.priority,
                    reason,
                })
                .collect();
            out_sprints.push(Sprint {
                sprint_number: out_sprints.len() as u32 + 1,
                stories,
                total_weight,
            });
        }

        let total_weight: u32 = out_sprints.iter().map(|s| s.total_weight).sum();
        let total_sprints = out_sprints.len() as u32;

        debug!(
            prd_id = %prd.id,
            eligible = eligible.len(),
            placed = placed_count,
            sprints = total_sprints,
            unassigned = unassigned.len(),
            "scheduled sprint plan"
        );

        Ok(SprintPlan {
            prd_id: prd.id.clone(),
            sprints: out_sprints,
            unassigned_stories: unassigned,
            total_weight,
            total_sprints,
        })
    }
}

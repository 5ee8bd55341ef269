//! Sprint Scheduler Integration Tests
//!
//! End-to-end packing scenarios: capacity invariants, completeness,
//! candidate repair, determinism, and idempotent replanning.

use cadence_engine::models::prd::{Prd, Priority, Story, StoryStatus};
use cadence_engine::models::sprint::{CapacityMode, Sprint, SprintPlan, SprintStory};
use cadence_engine::services::scheduler::{ScheduleError, SchedulerConfig, SprintScheduler};

// ============================================================================
// Helpers
// ============================================================================

fn estimated(id: &str, title: &str, points: u32, priority: Priority) -> Story {
    let mut s = Story::new(id, title);
    s.estimate = Some(points);
    s.priority = priority;
    s
}

fn release_prd() -> Prd {
    let mut prd = Prd::new("Release 1.2");
    prd.add_story(estimated("S1", "Payment retries", 3, Priority::Critical));
    prd.add_story(estimated("S2", "Audit log export", 5, Priority::High));
    prd.add_story(estimated("S3", "Fix session expiry", 2, Priority::Medium));
    prd.add_story(estimated("S4", "Rate limit dashboard", 8, Priority::Low));
    prd.add_story(estimated("S5", "Webhook signing", 1, Priority::High));
    prd
}

fn points(capacity: u32) -> SchedulerConfig {
    SchedulerConfig {
        capacity,
        mode: CapacityMode::Points,
    }
}

fn assigned_ids(plan: &SprintPlan) -> Vec<&str> {
    plan.sprints
        .iter()
        .flat_map(|s| s.stories.iter().map(|st| st.story_id.as_str()))
        .collect()
}

// ============================================================================
// Capacity and completeness invariants
// ============================================================================

#[test]
fn test_capacity_never_exceeded_except_singletons() {
    let plan = SprintScheduler::schedule(&release_prd(), &points(5), None).unwrap();

    for sprint in &plan.sprints {
        assert!(
            sprint.total_weight <= 5 || sprint.stories.len() == 1,
            "sprint {} overweight with {} stories",
            sprint.sprint_number,
            sprint.stories.len()
        );
        let recomputed: u32 = sprint.stories.iter().map(|s| s.story_points).sum();
        assert_eq!(sprint.total_weight, recomputed);
    }
}

#[test]
fn test_every_eligible_story_assigned_exactly_once() {
    let mut prd = release_prd();
    prd.get_story_mut("S2").unwrap().status = StoryStatus::Completed;
    prd.add_story(Story::new("S6", "Unestimated spike"));

    let plan = SprintScheduler::schedule(&prd, &points(5), None).unwrap();

    let mut ids = assigned_ids(&plan);
    ids.sort();
    assert_eq!(ids, vec!["S1", "S3", "S4", "S5"]);

    let unassigned: Vec<(&str, &str)> = plan
        .unassigned_stories
        .iter()
        .map(|u| (u.story_id.as_str(), u.reason.as_str()))
        .collect();
    assert_eq!(unassigned.len(), 2);
    assert_eq!(unassigned[0], ("S2", "Already completed"));
    assert_eq!(unassigned[1].0, "S6");
    assert!(unassigned[1].1.contains("No estimate"));
}

#[test]
fn test_sprint_numbers_sequential() {
    let plan = SprintScheduler::schedule(&release_prd(), &points(5), None).unwrap();
    let numbers: Vec<u32> = plan.sprints.iter().map(|s| s.sprint_number).collect();
    assert_eq!(numbers, (1..=plan.total_sprints).collect::<Vec<u32>>());
    assert_eq!(plan.total_sprints as usize, plan.sprints.len());
    assert_eq!(
        plan.total_weight,
        plan.sprints.iter().map(|s| s.total_weight).sum::<u32>()
    );
}

// ============================================================================
// Documented first-fit example
// ============================================================================

#[test]
fn test_first_fit_documented_example() {
    let mut prd = Prd::new("Example");
    prd.add_story(estimated("S1", "Story S1", 3, Priority::Critical));
    prd.add_story(estimated("S2", "Story S2", 5, Priority::High));
    prd.add_story(estimated("S3", "Story S3", 2, Priority::Medium));

    let plan = SprintScheduler::schedule(&prd, &points(5), None).unwrap();

    assert_eq!(plan.total_sprints, 2);
    let sprint1: Vec<&str> = plan.sprints[0]
        .stories
        .iter()
        .map(|s| s.story_id.as_str())
        .collect();
    assert_eq!(sprint1, vec!["S1", "S3"]);
    assert_eq!(plan.sprints[0].total_weight, 5);
    assert_eq!(plan.sprints[1].total_weight, 5);
}

// ============================================================================
// Candidate repair
// ============================================================================

fn candidate_sprint(number: u32, entries: &[(&str, u32)]) -> Sprint {
    Sprint {
        sprint_number: number,
        stories: entries
            .iter()
            .map(|(id, pts)| SprintStory {
                story_id: id.to_string(),
                title: String::new(),
                story_points: *pts,
                priority: Priority::Medium,
                reason: Some("planner rationale".to_string()),
            })
            .collect(),
        total_weight: entries.iter().map(|(_, p)| p).sum(),
    }
}

#[test]
fn test_partial_candidate_is_completed() {
    let prd = release_prd();
    let candidate = SprintPlan {
        prd_id: prd.id.clone(),
        sprints: vec![candidate_sprint(1, &[("S4", 8)])],
        unassigned_stories: Vec::new(),
        total_weight: 8,
        total_sprints: 1,
    };

    let plan = SprintScheduler::schedule(&prd, &points(8), Some(&candidate)).unwrap();

    // Candidate grouping preserved, gaps filled behind it
    assert_eq!(plan.sprints[0].stories[0].story_id, "S4");
    assert_eq!(
        plan.sprints[0].stories[0].reason.as_deref(),
        Some("planner rationale")
    );
    let mut ids = assigned_ids(&plan);
    ids.sort();
    assert_eq!(ids, vec!["S1", "S2", "S3", "S4", "S5"]);
}

#[test]
fn test_candidate_with_unknown_and_terminal_ids() {
    let mut prd = release_prd();
    prd.get_story_mut("S1").unwrap().status = StoryStatus::Skipped;

    let candidate = SprintPlan {
        prd_id: prd.id.clone(),
        sprints: vec![candidate_sprint(1, &[("S1", 3), ("ghost", 1), ("S3", 2)])],
        unassigned_stories: Vec::new(),
        total_weight: 6,
        total_sprints: 1,
    };

    let plan = SprintScheduler::schedule(&prd, &points(5), Some(&candidate)).unwrap();

    // Skipped S1 and unknown ghost dropped from the sprint
    assert!(!assigned_ids(&plan).contains(&"S1"));
    assert!(!assigned_ids(&plan).contains(&"ghost"));
    assert!(assigned_ids(&plan).contains(&"S3"));
    assert_eq!(plan.unassigned_stories[0].story_id, "S1");
    assert_eq!(plan.unassigned_stories[0].reason, "Already skipped");
}

#[test]
fn test_candidate_duplicate_keeps_first_occurrence() {
    let prd = release_prd();
    let candidate = SprintPlan {
        prd_id: prd.id.clone(),
        sprints: vec![
            candidate_sprint(1, &[("S5", 1)]),
            candidate_sprint(2, &[("S5", 1), ("S3", 2)]),
        ],
        unassigned_stories: Vec::new(),
        total_weight: 4,
        total_sprints: 2,
    };

    let plan = SprintScheduler::schedule(&prd, &points(5), Some(&candidate)).unwrap();

    let s5_placements: Vec<u32> = plan
        .sprints
        .iter()
        .filter(|s| s.stories.iter().any(|st| st.story_id == "S5"))
        .map(|s| s.sprint_number)
        .collect();
    assert_eq!(s5_placements, vec![1]);
}

#[test]
fn test_oversized_story_still_scheduled() {
    let mut prd = Prd::new("Oversized");
    prd.add_story(estimated("epic", "Rewrite storage layer", 13, Priority::High));

    let plan = SprintScheduler::schedule(&prd, &points(5), None).unwrap();
    assert_eq!(plan.total_sprints, 1);
    assert_eq!(plan.sprints[0].stories.len(), 1);
    assert_eq!(plan.sprints[0].total_weight, 13);
    assert!(plan.unassigned_stories.is_empty());
}

// ============================================================================
// Determinism and idempotence
// ============================================================================

#[test]
fn test_repeated_runs_are_bit_identical() {
    let prd = release_prd();
    let config = points(5);
    let baseline =
        serde_json::to_string(&SprintScheduler::schedule(&prd, &config, None).unwrap()).unwrap();
    for _ in 0..10 {
        let next = serde_json::to_string(&SprintScheduler::schedule(&prd, &config, None).unwrap())
            .unwrap();
        assert_eq!(baseline, next);
    }
}

#[test]
fn test_replanning_with_own_output_is_identity() {
    let prd = release_prd();
    let config = points(5);

    let first = SprintScheduler::schedule(&prd, &config, None).unwrap();
    let second = SprintScheduler::schedule(&prd, &config, Some(&first)).unwrap();
    let third = SprintScheduler::schedule(&prd, &config, Some(&second)).unwrap();

    let a = serde_json::to_string(&first).unwrap();
    let b = serde_json::to_string(&second).unwrap();
    let c = serde_json::to_string(&third).unwrap();
    assert_eq!(a, b);
    assert_eq!(b, c);
}

// ============================================================================
// Input errors and wire format
// ============================================================================

#[test]
fn test_zero_capacity_is_input_error() {
    let result = SprintScheduler::schedule(&release_prd(), &points(0), None);
    assert!(matches!(result, Err(ScheduleError::InvalidCapacity)));
}

#[test]
fn test_capacity_mode_parse_boundary() {
    let mode: CapacityMode = "points".parse().unwrap();
    assert_eq!(mode, CapacityMode::Points);

    let err = "velocity".parse::<CapacityMode>().unwrap_err();
    let schedule_err: ScheduleError = err.into();
    assert!(schedule_err.to_string().contains("velocity"));
}

#[test]
fn test_plan_serializes_camel_case() {
    let plan = SprintScheduler::schedule(&release_prd(), &points(5), None).unwrap();
    let json = serde_json::to_value(&plan).unwrap();

    assert!(json.get("unassignedStories").is_some());
    assert!(json.get("totalSprints").is_some());
    assert!(json["sprints"][0].get("sprintNumber").is_some());
    assert!(json["sprints"][0]["stories"][0].get("storyPoints").is_some());
}

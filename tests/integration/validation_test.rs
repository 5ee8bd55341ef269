//! Plan Validation Integration Tests
//!
//! Exercises the warning taxonomy over realistic snapshots: circular
//! dependencies among considered stories, blocked stories, and
//! dependencies on skipped work.

use cadence_engine::models::graph::{PlanWarning, ValidationResult, WarningType};
use cadence_engine::models::prd::{Story, StoryStatus};
use cadence_engine::services::validation::PlanValidator;

// ============================================================================
// Helpers
// ============================================================================

fn story(id: &str, status: StoryStatus, deps: &[&str]) -> Story {
    let mut s = Story::new(id, format!("Story {id}"));
    s.status = status;
    s.depends_on = deps.iter().map(|d| d.to_string()).collect();
    s
}

fn of_type(result: &ValidationResult, kind: WarningType) -> Vec<&PlanWarning> {
    result
        .warnings
        .iter()
        .filter(|w| w.warning_type == kind)
        .collect()
}

// ============================================================================
// Warning taxonomy
// ============================================================================

#[test]
fn test_clean_snapshot_is_valid() {
    let stories = vec![
        story("schema", StoryStatus::Completed, &[]),
        story("auth", StoryStatus::Pending, &["schema"]),
        story("api", StoryStatus::Pending, &["schema"]),
    ];
    let result = PlanValidator::validate(&stories);
    assert!(result.valid);
    assert!(result.warnings.is_empty());
}

#[test]
fn test_blocked_story_when_blocker_pending() {
    let stories = vec![
        story("schema", StoryStatus::Pending, &[]),
        story("auth", StoryStatus::Pending, &["schema"]),
    ];
    let result = PlanValidator::validate(&stories);
    assert!(!result.valid);

    let blocked = of_type(&result, WarningType::BlockedStory);
    assert_eq!(blocked.len(), 1);
    assert_eq!(blocked[0].story_ids, vec!["auth".to_string()]);
    assert!(blocked[0].message.contains("schema"));
    // schema is scheduled, so it is not a missing dependency
    assert!(of_type(&result, WarningType::MissingDependency).is_empty());
}

#[test]
fn test_blocked_story_when_blocker_in_progress() {
    let stories = vec![
        story("schema", StoryStatus::InProgress, &[]),
        story("auth", StoryStatus::Pending, &["schema"]),
    ];
    let result = PlanValidator::validate(&stories);
    assert_eq!(of_type(&result, WarningType::BlockedStory).len(), 1);
    assert!(of_type(&result, WarningType::MissingDependency).is_empty());
}

#[test]
fn test_missing_dependency_when_blocker_skipped() {
    let stories = vec![
        story("legacy-import", StoryStatus::Skipped, &[]),
        story("reports", StoryStatus::Pending, &["legacy-import"]),
    ];
    let result = PlanValidator::validate(&stories);

    // Both the generic blocked warning and the stricter missing warning
    assert_eq!(of_type(&result, WarningType::BlockedStory).len(), 1);
    let missing = of_type(&result, WarningType::MissingDependency);
    assert_eq!(missing.len(), 1);
    assert_eq!(
        missing[0].story_ids,
        vec!["reports".to_string(), "legacy-import".to_string()]
    );
}

#[test]
fn test_circular_dependency_among_considered() {
    let stories = vec![
        story("a", StoryStatus::Pending, &["b"]),
        story("b", StoryStatus::InProgress, &["c"]),
        story("c", StoryStatus::Pending, &["a"]),
        story("d", StoryStatus::Pending, &[]),
    ];
    let result = PlanValidator::validate(&stories);

    let circular = of_type(&result, WarningType::CircularDependency);
    assert_eq!(circular.len(), 3);
    let named: Vec<&str> = circular
        .iter()
        .map(|w| w.story_ids[0].as_str())
        .collect();
    assert_eq!(named, vec!["a", "b", "c"]);
}

#[test]
fn test_terminal_stories_are_not_considered() {
    // A completed story with an unresolved blocker is nobody's problem
    let stories = vec![
        story("old", StoryStatus::Pending, &[]),
        story("done", StoryStatus::Completed, &["old"]),
    ];
    let result = PlanValidator::validate(&stories);
    assert!(result.valid);
}

#[test]
fn test_orphan_blockers_ignored() {
    let stories = vec![story("auth", StoryStatus::Pending, &["ghost-1", "ghost-2"])];
    let result = PlanValidator::validate(&stories);
    assert!(result.valid);
}

#[test]
fn test_self_dependency_reported() {
    let stories = vec![story("a", StoryStatus::Pending, &["a"])];
    let result = PlanValidator::validate(&stories);
    assert!(!result.valid);
    assert_eq!(of_type(&result, WarningType::CircularDependency).len(), 1);
    assert_eq!(of_type(&result, WarningType::BlockedStory).len(), 1);
}

#[test]
fn test_validation_result_serializes_camel_case() {
    let stories = vec![
        story("schema", StoryStatus::Skipped, &[]),
        story("auth", StoryStatus::Pending, &["schema"]),
    ];
    let result = PlanValidator::validate(&stories);
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["valid"], false);
    assert_eq!(json["warnings"][0]["type"], "blocked_story");
    assert_eq!(json["warnings"][0]["storyIds"][0], "auth");
}

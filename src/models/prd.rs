//! PRD (Product Requirements Document) Models
//!
//! Data structures for representing requirement documents with stories,
//! dependencies, and story-point estimates.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::utils::error::{AppError, AppResult};

/// The story-point scale estimates are drawn from.
pub const STORY_POINT_SCALE: [u32; 6] = [1, 2, 3, 5, 8, 13];

/// Priority level for stories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

/// Status of a story in the PRD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StoryStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Skipped,
}

impl StoryStatus {
    /// Terminal statuses never change again and are never scheduled.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StoryStatus::Completed | StoryStatus::Skipped)
    }
}

impl std::fmt::Display for StoryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoryStatus::Pending => write!(f, "pending"),
            StoryStatus::InProgress => write!(f, "in_progress"),
            StoryStatus::Completed => write!(f, "completed"),
            StoryStatus::Skipped => write!(f, "skipped"),
        }
    }
}

/// Acceptance criteria for a story
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcceptanceCriteria {
    /// Unique ID for this criteria
    pub id: String,
    /// Description of the criteria
    pub description: String,
    /// Whether this criteria has been met
    #[serde(default)]
    pub met: bool,
}

/// A single story in the PRD
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    /// Unique story identifier (e.g., "S001", "story-1")
    pub id: String,
    /// Story title
    pub title: String,
    /// Detailed description of the story
    #[serde(default)]
    pub description: String,
    /// Priority level
    #[serde(default)]
    pub priority: Priority,
    /// Current status
    #[serde(default)]
    pub status: StoryStatus,
    /// Story IDs this story is blocked by. May contain duplicates or ids
    /// absent from the snapshot; both are tolerated downstream.
    #[serde(default)]
    pub depends_on: Vec<String>,
    /// Optional free-text reason per blocker id
    #[serde(default)]
    pub dependency_reasons: HashMap<String, String>,
    /// Story-point estimate from [`STORY_POINT_SCALE`]
    #[serde(default)]
    pub estimate: Option<u32>,
    /// Acceptance criteria
    #[serde(default)]
    pub acceptance_criteria: Vec<AcceptanceCriteria>,
}

impl Story {
    /// Create a new story with required fields
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            priority: Priority::default(),
            status: StoryStatus::default(),
            depends_on: Vec::new(),
            dependency_reasons: HashMap::new(),
            estimate: None,
            acceptance_criteria: Vec::new(),
        }
    }

    /// Check whether the estimate, if set, is on the story-point scale
    pub fn has_valid_estimate(&self) -> bool {
        match self.estimate {
            Some(points) => STORY_POINT_SCALE.contains(&points),
            None => true,
        }
    }

    /// Check if every blocker present in `known_ids` is in the completed set.
    ///
    /// Blockers outside `known_ids` are orphan references and never count
    /// against a story.
    pub fn dependencies_satisfied(
        &self,
        completed: &HashSet<String>,
        known_ids: &HashSet<String>,
    ) -> bool {
        self.depends_on
            .iter()
            .filter(|dep| known_ids.contains(*dep))
            .all(|dep| completed.contains(dep))
    }

    /// Check if this story is ready to execute
    pub fn is_ready(&self, completed: &HashSet<String>, known_ids: &HashSet<String>) -> bool {
        self.status == StoryStatus::Pending && self.dependencies_satisfied(completed, known_ids)
    }

    /// Validate boundary constraints on a single story
    pub fn validate(&self) -> AppResult<()> {
        if self.id.is_empty() {
            return Err(AppError::validation("Story has an empty id"));
        }
        if self.title.is_empty() {
            return Err(AppError::validation(format!(
                "Story '{}' has an empty title",
                self.id
            )));
        }
        if !self.has_valid_estimate() {
            return Err(AppError::validation(format!(
                "Story '{}' has estimate {} outside the story-point scale {:?}",
                self.id,
                self.estimate.unwrap_or(0),
                STORY_POINT_SCALE
            )));
        }
        Ok(())
    }
}

/// The complete PRD document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prd {
    /// Document identifier; graphs and sprint plans are keyed to this
    #[serde(default = "default_id")]
    pub id: String,
    /// PRD version
    #[serde(default = "default_version")]
    pub version: String,
    /// Task/project name
    pub name: String,
    /// Description of the overall task
    #[serde(default)]
    pub description: String,
    /// All stories in the PRD
    pub stories: Vec<Story>,
    /// Creation timestamp
    #[serde(default)]
    pub created_at: Option<String>,
    /// Last update timestamp
    #[serde(default)]
    pub updated_at: Option<String>,
    /// Additional metadata
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

fn default_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn default_version() -> String {
    "1.0.0".to_string()
}

impl Prd {
    /// Create a new PRD with a name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: default_id(),
            version: default_version(),
            name: name.into(),
            description: String::new(),
            stories: Vec::new(),
            created_at: Some(chrono::Utc::now().to_rfc3339()),
            updated_at: None,
            metadata: HashMap::new(),
        }
    }

    /// Add a story to the PRD
    pub fn add_story(&mut self, story: Story) {
        self.stories.push(story);
        self.updated_at = Some(chrono::Utc::now().to_rfc3339());
    }

    /// Get a story by ID
    pub fn get_story(&self, id: &str) -> Option<&Story> {
        self.stories.iter().find(|s| s.id == id)
    }

    /// Get a mutable reference to a story by ID
    pub fn get_story_mut(&mut self, id: &str) -> Option<&mut Story> {
        self.stories.iter_mut().find(|s| s.id == id)
    }

    /// Get all story IDs
    pub fn story_ids(&self) -> HashSet<String> {
        self.stories.iter().map(|s| s.id.clone()).collect()
    }

    /// Get completed story IDs
    pub fn completed_story_ids(&self) -> HashSet<String> {
        self.stories
            .iter()
            .filter(|s| s.status == StoryStatus::Completed)
            .map(|s| s.id.clone())
            .collect()
    }

    /// Get pending stories that are ready to execute
    pub fn ready_stories(&self) -> Vec<&Story> {
        let known = self.story_ids();
        let completed = self.completed_story_ids();
        self.stories
            .iter()
            .filter(|s| s.is_ready(&completed, &known))
            .collect()
    }

    /// Check if all stories are complete
    pub fn is_complete(&self) -> bool {
        self.stories
            .iter()
            .all(|s| s.status == StoryStatus::Completed)
    }

    /// Get completion percentage
    pub fn completion_percentage(&self) -> f32 {
        if self.stories.is_empty() {
            return 100.0;
        }
        let completed = self
            .stories
            .iter()
            .filter(|s| s.status == StoryStatus::Completed)
            .count();
        (completed as f32 / self.stories.len() as f32) * 100.0
    }

    /// Validate boundary constraints across the document
    pub fn validate(&self) -> AppResult<()> {
        let mut seen = HashSet::new();
        for story in &self.stories {
            story.validate()?;
            if !seen.insert(story.id.as_str()) {
                return Err(AppError::validation(format!(
                    "Duplicate story id '{}'",
                    story.id
                )));
            }
        }
        Ok(())
    }

    /// Load PRD from a JSON file
    pub fn from_file(path: &std::path::Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let prd = serde_json::from_str(&content)?;
        Ok(prd)
    }

    /// Save PRD to a JSON file
    pub fn to_file(&self, path: &std::path::Path) -> AppResult<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

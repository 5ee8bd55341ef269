//! Dependency Analyzer
//!
//! Analyzes PRD story dependencies: execution batches, critical path,
//! graph metrics, and a visual ASCII rendering. Orphan references are
//! treated as already satisfied; only circular dependencies are errors here.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::models::prd::{Prd, Story, StoryStatus};

/// A batch of stories that can be executed in parallel
#[derive(Debug, Clone)]
pub struct Batch {
    /// Batch index (1-based for display)
    pub index: usize,
    /// Story IDs in this batch
    pub story_ids: Vec<String>,
}

impl Batch {
    /// Create a new batch
    pub fn new(index: usize, story_ids: Vec<String>) -> Self {
        Self { index, story_ids }
    }

    /// Check if batch is empty
    pub fn is_empty(&self) -> bool {
        self.story_ids.is_empty()
    }

    /// Get number of stories in batch
    pub fn len(&self) -> usize {
        self.story_ids.len()
    }
}

/// Errors that can occur during dependency analysis
#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    #[error("Circular dependency detected among stories: {0:?}")]
    CircularDependency(Vec<String>),
}

/// Dependency analyzer for PRD stories
pub struct DependencyAnalyzer;

impl DependencyAnalyzer {
    /// Generate execution batches from PRD stories.
    ///
    /// Non-terminal stories are layered into batches where each batch
    /// contains stories whose resolvable precedence is satisfied by
    /// terminal stories and previous batches. Orphan references carry no
    /// precedence weight.
    ///
    /// # Returns
    /// * `Ok(Vec<Batch>)` - Ordered batches of story IDs
    /// * `Err(AnalyzerError)` - If circular dependencies are detected
    pub fn execution_batches(prd: &Prd) -> Result<Vec<Batch>, AnalyzerError> {
        if prd.stories.is_empty() {
            return Ok(Vec::new());
        }

        let known: HashSet<&str> = prd.stories.iter().map(|s| s.id.as_str()).collect();

        let mut batches = Vec::new();
        // Terminal stories count as satisfied precedence either way: a
        // skipped blocker is the validator's finding, not a layering stall.
        let mut satisfied: HashSet<&str> = prd
            .stories
            .iter()
            .filter(|s| s.status.is_terminal())
            .map(|s| s.id.as_str())
            .collect();
        let mut remaining: HashSet<&str> = prd
            .stories
            .iter()
            .filter(|s| !s.status.is_terminal())
            .map(|s| s.id.as_str())
            .collect();

        while !remaining.is_empty() {
            let mut batch: Vec<&str> = Vec::new();

            for story in &prd.stories {
                if remaining.contains(story.id.as_str()) {
                    let deps_satisfied = story
                        .depends_on
                        .iter()
                        .filter(|dep| known.contains(dep.as_str()))
                        .all(|dep| satisfied.contains(dep.as_str()));

                    if deps_satisfied {
                        batch.push(story.id.as_str());
                    }
                }
            }

            if batch.is_empty() {
                // Circular dependency: report the stuck stories in input order
                let cycle: Vec<String> = prd
                    .stories
                    .iter()
                    .filter(|s| remaining.contains(s.id.as_str()))
                    .map(|s| s.id.clone())
                    .collect();
                return Err(AnalyzerError::CircularDependency(cycle));
            }

            for id in &batch {
                remaining.remove(id);
                satisfied.insert(id);
            }

            batches.push(Batch::new(
                batches.len() + 1,
                batch.iter().map(|id| id.to_string()).collect(),
            ));
        }

        debug!(batches = batches.len(), "layered stories into batches");
        Ok(batches)
    }

    /// Get the critical path (longest resolvable dependency chain)
    pub fn critical_path(prd: &Prd) -> Vec<String> {
        let story_map: HashMap<&str, &Story> =
            prd.stories.iter().map(|s| (s.id.as_str(), s)).collect();

        let mut longest_path = Vec::new();

        for story in &prd.stories {
            let mut on_path = HashSet::new();
            let path = Self::dfs_longest_path(&story.id, &story_map, &mut on_path);
            if path.len() > longest_path.len() {
                longest_path = path;
            }
        }

        longest_path
    }

    /// Find the longest blocker chain from `current` using DFS with a
    /// per-path visited set, so cycles cannot recurse forever.
    fn dfs_longest_path(
        current: &str,
        story_map: &HashMap<&str, &Story>,
        on_path: &mut HashSet<String>,
    ) -> Vec<String> {
        if on_path.contains(current) {
            return Vec::new();
        }

        on_path.insert(current.to_string());

        let mut longest = vec![current.to_string()];

        if let Some(story) = story_map.get(current) {
            for dep in &story.depends_on {
                if !story_map.contains_key(dep.as_str()) {
                    continue;
                }
                let path = Self::dfs_longest_path(dep, story_map, on_path);
                if path.len() + 1 > longest.len() {
                    longest = vec![current.to_string()];
                    longest.extend(path);
                }
            }
        }

        on_path.remove(current);
        longest
    }

    /// Calculate metrics for the dependency graph
    pub fn metrics(prd: &Prd) -> DependencyMetrics {
        let known: HashSet<&str> = prd.stories.iter().map(|s| s.id.as_str()).collect();
        let total_stories = prd.stories.len();

        // Resolvable, deduplicated edges only
        let mut dependents: HashMap<&str, u32> = HashMap::new();
        let mut total_dependencies = 0usize;
        for story in &prd.stories {
            let mut seen: HashSet<&str> = HashSet::new();
            for dep in &story.depends_on {
                if known.contains(dep.as_str()) && seen.insert(dep.as_str()) {
                    total_dependencies += 1;
                    *dependents.entry(dep.as_str()).or_insert(0) += 1;
                }
            }
        }

        let batches = Self::execution_batches(prd).unwrap_or_default();
        let critical_path = Self::critical_path(prd);

        // Bottlenecks in snapshot order so output is deterministic
        let bottlenecks: Vec<String> = prd
            .stories
            .iter()
            .filter(|s| dependents.get(s.id.as_str()).copied().unwrap_or(0) >= 2)
            .map(|s| s.id.clone())
            .collect();

        DependencyMetrics {
            total_stories,
            total_dependencies,
            batch_count: batches.len(),
            max_parallel: batches.iter().map(|b| b.len()).max().unwrap_or(0),
            critical_path_length: critical_path.len(),
            critical_path,
            bottlenecks,
        }
    }

    /// Generate a visual ASCII dependency graph
    pub fn render_ascii(prd: &Prd) -> String {
        let mut output = String::new();
        output.push_str("Dependency Graph\n");
        output.push_str("================\n\n");

        if prd.stories.is_empty() {
            output.push_str("(No stories)\n");
            return output;
        }

        match Self::execution_batches(prd) {
            Ok(batches) => {
                for batch in &batches {
                    output.push_str(&format!("Batch {}: ", batch.index));
                    output.push_str(&batch.story_ids.join(", "));
                    output.push('\n');
                }
            }
            Err(e) => {
                output.push_str(&format!("Error: {}\n", e));
            }
        }
        output.push('\n');

        let known: HashSet<&str> = prd.stories.iter().map(|s| s.id.as_str()).collect();

        // Reverse dependency map (what depends on each story)
        let mut dependents: HashMap<&str, Vec<&str>> = HashMap::new();
        for story in &prd.stories {
            for dep in &story.depends_on {
                if known.contains(dep.as_str()) {
                    let entry = dependents.entry(dep.as_str()).or_default();
                    if !entry.contains(&story.id.as_str()) {
                        entry.push(&story.id);
                    }
                }
            }
        }

        output.push_str("Stories:\n");
        output.push_str("--------\n");

        for story in &prd.stories {
            output.push_str(&format!(
                "{} {} - {}\n",
                Self::status_icon(story.status),
                story.id,
                story.title
            ));

            let blockers: Vec<&str> = story
                .depends_on
                .iter()
                .filter(|d| known.contains(d.as_str()))
                .map(|d| d.as_str())
                .collect();
            if !blockers.is_empty() {
                output.push_str(&format!("    <- depends on: {}\n", blockers.join(", ")));
            }

            if let Some(deps) = dependents.get(story.id.as_str()) {
                output.push_str(&format!("    -> required by: {}\n", deps.join(", ")));
            }
        }

        output.push_str("\nTree View:\n");
        output.push_str("----------\n");

        let roots: Vec<&Story> = prd
            .stories
            .iter()
            .filter(|s| !s.depends_on.iter().any(|d| known.contains(d.as_str())))
            .collect();

        let mut printed: HashSet<&str> = HashSet::new();
        for (i, root) in roots.iter().enumerate() {
            let is_last = i == roots.len() - 1;
            Self::print_tree_node(&mut output, root, prd, &dependents, &mut printed, "", is_last);
        }

        output
    }

    fn status_icon(status: StoryStatus) -> &'static str {
        match status {
            StoryStatus::Completed => "[x]",
            StoryStatus::InProgress => "[~]",
            StoryStatus::Skipped => "[-]",
            StoryStatus::Pending => "[ ]",
        }
    }

    /// Recursively print a tree node. Each story prints at most once so
    /// cyclic graphs terminate.
    fn print_tree_node<'a>(
        output: &mut String,
        story: &'a Story,
        prd: &'a Prd,
        dependents: &HashMap<&str, Vec<&'a str>>,
        printed: &mut HashSet<&'a str>,
        prefix: &str,
        is_last: bool,
    ) {
        if !printed.insert(story.id.as_str()) {
            return;
        }

        let connector = if is_last { "\\-- " } else { "|-- " };
        output.push_str(&format!(
            "{}{}{} {}\n",
            prefix,
            connector,
            Self::status_icon(story.status),
            story.id
        ));

        if let Some(children) = dependents.get(story.id.as_str()) {
            let new_prefix = format!("{}{}   ", prefix, if is_last { " " } else { "|" });

            for (i, child_id) in children.iter().enumerate() {
                if let Some(child) = prd.get_story(child_id) {
                    let child_is_last = i == children.len() - 1;
                    Self::print_tree_node(
                        output,
                        child,
                        prd,
                        dependents,
                        printed,
                        &new_prefix,
                        child_is_last,
                    );
                }
            }
        }
    }
}

/// Metrics about the dependency graph
#[derive(Debug, Clone)]
pub struct DependencyMetrics {
    /// Total number of stories
    pub total_stories: usize,
    /// Total number of resolvable dependency edges
    pub total_dependencies: usize,
    /// Number of batches
    pub batch_count: usize,
    /// Maximum stories that can run in parallel
    pub max_parallel: usize,
    /// Length of the critical path
    pub critical_path_length: usize,
    /// Stories in the critical path
    pub critical_path: Vec<String>,
    /// Stories that are bottlenecks (many depend on them)
    pub bottlenecks: Vec<String>,
}

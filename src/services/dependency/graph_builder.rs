//! Dependency Graph Builder
//!
//! Turns a PRD snapshot into a dependency graph with readiness, depth and
//! fan-out, tolerating orphan references and cycles as warnings rather than
//! failures.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::models::graph::{
    DependencyEdge, DependencyGraph, DependencyNode, PlanWarning, WarningType,
};
use crate::models::prd::{Prd, StoryStatus};

use super::cycle_detector::CycleDetector;

/// Builds dependency graphs from PRD snapshots
pub struct DependencyGraphBuilder;

impl DependencyGraphBuilder {
    /// Build the dependency graph for a PRD.
    ///
    /// Edges are created only for `depends_on` entries resolving to a story
    /// in the snapshot; each unresolved reference becomes an
    /// `orphan_dependency` warning and carries no precedence weight.
    /// Never fails: cycles and unresolved blockers are reported as warnings
    /// on a best-effort graph.
    pub fn build(prd: &Prd) -> DependencyGraph {
        let known: HashSet<&str> = prd.stories.iter().map(|s| s.id.as_str()).collect();
        let status_by_id: HashMap<&str, StoryStatus> = prd
            .stories
            .iter()
            .map(|s| (s.id.as_str(), s.status))
            .collect();

        let mut warnings: Vec<PlanWarning> = Vec::new();
        let mut edges: Vec<DependencyEdge> = Vec::new();
        let mut edge_seen: HashSet<(&str, &str)> = HashSet::new();
        let mut orphan_seen: HashSet<(&str, &str)> = HashSet::new();
        // Resolvable blockers per story, deduplicated, in recorded order
        let mut blockers: HashMap<&str, Vec<&str>> = HashMap::new();
        let mut blocks_count: HashMap<&str, u32> = HashMap::new();

        for story in &prd.stories {
            for dep in &story.depends_on {
                if !known.contains(dep.as_str()) {
                    if orphan_seen.insert((story.id.as_str(), dep.as_str())) {
                        warn!(
                            story = %story.id,
                            dependency = %dep,
                            "orphan dependency reference"
                        );
                        warnings.push(PlanWarning::new(
                            WarningType::OrphanDependency,
                            format!("Story '{}' depends on unknown story '{}'", story.id, dep),
                            vec![story.id.clone()],
                        ));
                    }
                    continue;
                }
                if edge_seen.insert((dep.as_str(), story.id.as_str())) {
                    edges.push(DependencyEdge {
                        from: dep.clone(),
                        to: story.id.clone(),
                        reason: story.dependency_reasons.get(dep).cloned(),
                    });
                    blockers.entry(story.id.as_str()).or_default().push(dep);
                    *blocks_count.entry(dep.as_str()).or_insert(0) += 1;
                }
            }
        }

        // Depth is memoized across nodes; a blocker already on the current
        // path contributes 0 so cycles cannot recurse forever.
        let mut depth_memo: HashMap<&str, u32> = HashMap::new();
        for story in &prd.stories {
            let mut on_path: HashSet<&str> = HashSet::new();
            Self::depth_of(story.id.as_str(), &blockers, &mut depth_memo, &mut on_path);
        }

        let nodes: Vec<DependencyNode> = prd
            .stories
            .iter()
            .map(|story| {
                let story_blockers = blockers.get(story.id.as_str());
                let is_ready = story_blockers
                    .map(|list| {
                        list.iter()
                            .all(|b| status_by_id.get(*b) == Some(&StoryStatus::Completed))
                    })
                    .unwrap_or(true);
                DependencyNode {
                    story_id: story.id.clone(),
                    title: story.title.clone(),
                    status: story.status,
                    priority: story.priority,
                    blocks_count: blocks_count.get(story.id.as_str()).copied().unwrap_or(0),
                    blocked_by_count: story_blockers.map(|list| list.len() as u32).unwrap_or(0),
                    is_ready,
                    depth: depth_memo.get(story.id.as_str()).copied().unwrap_or(0),
                }
            })
            .collect();

        let adjacency: HashMap<String, Vec<String>> = prd
            .stories
            .iter()
            .map(|s| {
                let list = blockers
                    .get(s.id.as_str())
                    .map(|list| list.iter().map(|b| b.to_string()).collect())
                    .unwrap_or_default();
                (s.id.clone(), list)
            })
            .collect();
        let cycle_ids = CycleDetector::find_cycle_story_ids(&adjacency);
        if !cycle_ids.is_empty() {
            warn!(stories = ?cycle_ids, "circular dependency detected");
            warnings.push(PlanWarning::new(
                WarningType::Circular,
                format!(
                    "Circular dependency detected involving: {}",
                    cycle_ids.join(", ")
                ),
                cycle_ids,
            ));
        }

        for story in &prd.stories {
            if story.status.is_terminal() {
                continue;
            }
            if let Some(list) = blockers.get(story.id.as_str()) {
                let unresolved: Vec<&str> = list
                    .iter()
                    .filter(|b| status_by_id.get(**b) != Some(&StoryStatus::Completed))
                    .copied()
                    .collect();
                if !unresolved.is_empty() {
                    warnings.push(PlanWarning::new(
                        WarningType::UnresolvedBlocker,
                        format!(
                            "Story '{}' is blocked by incomplete stories: {}",
                            story.id,
                            unresolved.join(", ")
                        ),
                        vec![story.id.clone()],
                    ));
                }
            }
        }

        debug!(
            prd_id = %prd.id,
            nodes = nodes.len(),
            edges = edges.len(),
            warnings = warnings.len(),
            "built dependency graph"
        );

        DependencyGraph {
            prd_id: prd.id.clone(),
            nodes,
            edges,
            warnings,
        }
    }

    fn depth_of<'a>(
        id: &'a str,
        blockers: &HashMap<&'a str, Vec<&'a str>>,
        memo: &mut HashMap<&'a str, u32>,
        on_path: &mut HashSet<&'a str>,
    ) -> u32 {
        if let Some(depth) = memo.get(id) {
            return *depth;
        }
        if !on_path.insert(id) {
            // Revisiting a node on the current path: cycle, contribute 0
            return 0;
        }

        let depth = match blockers.get(id) {
            Some(list) if !list.is_empty() => {
                1 + list
                    .iter()
                    .map(|b| Self::depth_of(b, blockers, memo, on_path))
                    .max()
                    .unwrap_or(0)
            }
            _ => 0,
        };

        on_path.remove(id);
        memo.insert(id, depth);
        depth
    }
}

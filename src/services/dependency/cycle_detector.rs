//! Cycle Detection
//!
//! DFS-based circular dependency finder over an adjacency map of resolvable
//! blocker edges. Used by the graph builder and by plan validation.

use std::collections::{HashMap, HashSet};

/// Finds dependency edges that participate in cycles
pub struct CycleDetector;

impl CycleDetector {
    /// Return every `(from, to)` pair that is a genuine edge of `adjacency`
    /// and lies on some cycle.
    ///
    /// `adjacency` maps a story id to its resolvable blocker ids. Blockers
    /// without their own adjacency entry are treated as leaves. Roots are
    /// visited in sorted order so output is deterministic; no claim of
    /// minimality is made.
    pub fn find_cycle_edges(adjacency: &HashMap<String, Vec<String>>) -> Vec<(String, String)> {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut emitted: HashSet<(String, String)> = HashSet::new();
        let mut edges: Vec<(String, String)> = Vec::new();

        let mut roots: Vec<&String> = adjacency.keys().collect();
        roots.sort();

        for root in roots {
            if !visited.contains(root.as_str()) {
                let mut in_stack: HashSet<&str> = HashSet::new();
                let mut path: Vec<&str> = Vec::new();
                Self::dfs(
                    root,
                    adjacency,
                    &mut visited,
                    &mut in_stack,
                    &mut path,
                    &mut emitted,
                    &mut edges,
                );
            }
        }

        edges
    }

    /// Convenience wrapper: unique story ids touched by any cycle, in
    /// first-seen order of the detected edges.
    pub fn find_cycle_story_ids(adjacency: &HashMap<String, Vec<String>>) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut ids = Vec::new();
        for (from, to) in Self::find_cycle_edges(adjacency) {
            if seen.insert(from.clone()) {
                ids.push(from);
            }
            if seen.insert(to.clone()) {
                ids.push(to);
            }
        }
        ids
    }

    fn dfs<'a>(
        node: &'a str,
        adjacency: &'a HashMap<String, Vec<String>>,
        visited: &mut HashSet<&'a str>,
        in_stack: &mut HashSet<&'a str>,
        path: &mut Vec<&'a str>,
        emitted: &mut HashSet<(String, String)>,
        edges: &mut Vec<(String, String)>,
    ) {
        visited.insert(node);
        in_stack.insert(node);
        path.push(node);

        if let Some(blockers) = adjacency.get(node) {
            for blocker in blockers {
                if in_stack.contains(blocker.as_str()) {
                    Self::record_cycle(path, blocker, emitted, edges);
                } else if !visited.contains(blocker.as_str()) {
                    Self::dfs(blocker, adjacency, visited, in_stack, path, emitted, edges);
                }
            }
        }

        path.pop();
        in_stack.remove(node);
    }

    /// Emit the edges of the cycle closed by reaching `entry`, which is
    /// already on the current path: every consecutive pair from its first
    /// occurrence to the path tail, plus the closing back-edge.
    fn record_cycle(
        path: &[&str],
        entry: &str,
        emitted: &mut HashSet<(String, String)>,
        edges: &mut Vec<(String, String)>,
    ) {
        let Some(start) = path.iter().position(|id| *id == entry) else {
            return;
        };

        for pair in path[start..].windows(2) {
            Self::push_edge(pair[0], pair[1], emitted, edges);
        }
        if let Some(tail) = path.last() {
            Self::push_edge(tail, entry, emitted, edges);
        }
    }

    fn push_edge(
        from: &str,
        to: &str,
        emitted: &mut HashSet<(String, String)>,
        edges: &mut Vec<(String, String)>,
    ) {
        let pair = (from.to_string(), to.to_string());
        if emitted.insert(pair.clone()) {
            edges.push(pair);
        }
    }
}

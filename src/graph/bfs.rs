//! Breadth-first shortest paths over a [`GraphSnapshot`].
//!
//! Every vertex is expanded at most once, so a single run costs
//! O(V + E) regardless of how many cycles the friendship graph has.
//! Distances are exact hop counts; a vertex missing from the result is
//! unreachable (or lies beyond the requested depth bound).

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet, VecDeque};

use crate::graph::snapshot::GraphSnapshot;
use crate::types::StudentId;

/// Outcome of one single-source BFS.
#[derive(Debug, Clone)]
pub struct Reachability {
    source: StudentId,
    distances: HashMap<StudentId, u32>,
    levels: Vec<Vec<StudentId>>,
}

impl Reachability {
    pub fn source(&self) -> StudentId {
        self.source
    }

    /// Hop count from the source, or `None` when unreachable within the
    /// bound used for this run.
    pub fn distance(&self, id: StudentId) -> Option<u32> {
        self.distances.get(&id).copied()
    }

    /// Vertices at exactly `depth` hops, in discovery order. Discovery order
    /// is fixed for a given snapshot because neighbour lists are sorted.
    pub fn at_depth(&self, depth: u32) -> &[StudentId] {
        self.levels
            .get(depth as usize)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every reached vertex with its distance, source included.
    pub fn distances(&self) -> &HashMap<StudentId, u32> {
        &self.distances
    }

    /// Iterate `(vertex, distance)` level by level.
    pub fn iter(&self) -> impl Iterator<Item = (StudentId, u32)> + '_ {
        self.levels
            .iter()
            .enumerate()
            .flat_map(|(depth, level)| level.iter().map(move |id| (*id, depth as u32)))
    }

    /// Greatest finite distance found (the source's eccentricity when the
    /// run was unbounded).
    pub fn max_depth(&self) -> u32 {
        self.levels.len().saturating_sub(1) as u32
    }

    pub fn reached(&self) -> usize {
        self.distances.len()
    }
}

/// Run BFS from `source`, optionally stopping after `max_depth` hops.
///
/// The source is always reported at distance 0, even when it is not a
/// vertex of the snapshot (it then has no neighbours and nothing else is
/// reached).
pub fn bfs_from(
    snapshot: &GraphSnapshot,
    source: StudentId,
    max_depth: Option<u32>,
) -> Reachability {
    let mut distances: HashMap<StudentId, u32> = HashMap::new();
    let mut levels: Vec<Vec<StudentId>> = vec![vec![source]];
    distances.insert(source, 0);

    let mut depth: u32 = 0;
    loop {
        if max_depth.is_some_and(|limit| depth >= limit) {
            break;
        }
        let frontier = &levels[depth as usize];
        let mut next: Vec<StudentId> = Vec::new();
        for &vertex in frontier {
            for &neighbour in snapshot.neighbours(vertex) {
                if let Entry::Vacant(slot) = distances.entry(neighbour) {
                    slot.insert(depth + 1);
                    next.push(neighbour);
                }
            }
        }
        if next.is_empty() {
            break;
        }
        levels.push(next);
        depth += 1;
    }

    Reachability {
        source,
        distances,
        levels,
    }
}

/// Hop count between `from` and `to`, or `None` when they are not
/// connected. Both must be vertices of the snapshot.
pub fn distance_between(
    snapshot: &GraphSnapshot,
    from: StudentId,
    to: StudentId,
) -> Option<u32> {
    shortest_path(snapshot, from, to).map(|path| (path.len() - 1) as u32)
}

/// One shortest path from `from` to `to`, both endpoints included.
///
/// Returns `None` when either endpoint is unknown or no path exists. The
/// path to oneself is `[from]`. Among equally short paths, the one through
/// lower ids is preferred because neighbours are visited in ascending
/// order.
pub fn shortest_path(
    snapshot: &GraphSnapshot,
    from: StudentId,
    to: StudentId,
) -> Option<Vec<StudentId>> {
    if !snapshot.contains(from) || !snapshot.contains(to) {
        return None;
    }
    if from == to {
        return Some(vec![from]);
    }

    let mut parent: HashMap<StudentId, StudentId> = HashMap::new();
    let mut visited: HashSet<StudentId> = HashSet::new();
    let mut queue: VecDeque<StudentId> = VecDeque::new();
    visited.insert(from);
    queue.push_back(from);

    while let Some(current) = queue.pop_front() {
        for &neighbour in snapshot.neighbours(current) {
            if !visited.insert(neighbour) {
                continue;
            }
            parent.insert(neighbour, current);
            if neighbour == to {
                let mut path = vec![to];
                let mut cursor = to;
                while let Some(&prev) = parent.get(&cursor) {
                    path.push(prev);
                    cursor = prev;
                }
                path.reverse();
                return Some(path);
            }
            queue.push_back(neighbour);
        }
    }

    None
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn snapshot(edges: &[(StudentId, StudentId)]) -> GraphSnapshot {
        GraphSnapshot::build(edges.iter().copied(), HashMap::new())
    }

    /// 1 - 2 - 3 - 4 - 5 - 6
    fn path_graph() -> GraphSnapshot {
        snapshot(&[(1, 2), (2, 3), (3, 4), (4, 5), (5, 6)])
    }

    #[test]
    fn distances_on_a_path() {
        let reach = bfs_from(&path_graph(), 1, None);
        for (id, expected) in [(1, 0), (2, 1), (3, 2), (4, 3), (5, 4), (6, 5)] {
            assert_eq!(reach.distance(id), Some(expected), "distance to {id}");
        }
        assert_eq!(reach.max_depth(), 5);
        assert_eq!(reach.reached(), 6);
    }

    #[test]
    fn max_depth_bounds_expansion() {
        let reach = bfs_from(&path_graph(), 1, Some(2));
        assert_eq!(reach.distance(3), Some(2));
        assert_eq!(reach.distance(4), None);
        assert_eq!(reach.at_depth(2), &[3]);
        assert!(reach.at_depth(3).is_empty());
    }

    #[test]
    fn zero_depth_reaches_only_the_source() {
        let reach = bfs_from(&path_graph(), 3, Some(0));
        assert_eq!(reach.reached(), 1);
        assert_eq!(reach.distance(3), Some(0));
    }

    #[test]
    fn cycles_do_not_shorten_or_repeat() {
        // Square with a diagonal: 1-2-3-4-1 and 1-3
        let snap = snapshot(&[(1, 2), (2, 3), (3, 4), (4, 1), (1, 3)]);
        let reach = bfs_from(&snap, 2, None);
        assert_eq!(reach.distance(4), Some(2));
        assert_eq!(reach.at_depth(1), &[1, 3]);
        assert_eq!(reach.at_depth(2), &[4]);
        assert_eq!(reach.reached(), 4);
    }

    #[test]
    fn other_component_is_unreachable() {
        let snap = snapshot(&[(1, 2), (3, 4)]);
        let reach = bfs_from(&snap, 1, None);
        assert_eq!(reach.distance(3), None);
        assert_eq!(reach.distance(4), None);
    }

    #[test]
    fn unknown_source_reaches_only_itself() {
        let reach = bfs_from(&path_graph(), 42, None);
        assert_eq!(reach.source(), 42);
        assert_eq!(reach.reached(), 1);
        assert_eq!(reach.iter().collect::<Vec<_>>(), vec![(42, 0)]);
    }

    #[test]
    fn iter_walks_levels_in_order() {
        let snap = snapshot(&[(1, 3), (1, 2), (2, 4)]);
        let reach = bfs_from(&snap, 1, None);
        assert_eq!(
            reach.iter().collect::<Vec<_>>(),
            vec![(1, 0), (2, 1), (3, 1), (4, 2)]
        );
    }

    #[test]
    fn repeated_runs_are_identical() {
        let snap = snapshot(&[(5, 1), (5, 2), (1, 3), (2, 3), (3, 4)]);
        let first = bfs_from(&snap, 5, None);
        let second = bfs_from(&snap, 5, None);
        assert_eq!(first.iter().collect::<Vec<_>>(), second.iter().collect::<Vec<_>>());
    }

    #[test]
    fn shortest_path_reconstructs_route() {
        assert_eq!(
            shortest_path(&path_graph(), 1, 6),
            Some(vec![1, 2, 3, 4, 5, 6])
        );
        assert_eq!(distance_between(&path_graph(), 6, 1), Some(5));
    }

    #[test]
    fn shortest_path_prefers_lower_ids_on_ties() {
        // Two routes 1 -> 4: via 2 or via 3
        let snap = snapshot(&[(1, 3), (3, 4), (1, 2), (2, 4)]);
        assert_eq!(shortest_path(&snap, 1, 4), Some(vec![1, 2, 4]));
    }

    #[test]
    fn shortest_path_edge_cases() {
        let snap = snapshot(&[(1, 2), (3, 4)]);
        assert_eq!(shortest_path(&snap, 1, 1), Some(vec![1]));
        assert_eq!(shortest_path(&snap, 1, 3), None);
        assert_eq!(shortest_path(&snap, 1, 99), None);
        assert_eq!(distance_between(&snap, 2, 2), Some(0));
    }
}

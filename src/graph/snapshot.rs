//! Immutable, point-in-time adjacency view of the friendship graph.
//!
//! A snapshot is built once per query from a [`GraphSource`] (or from raw
//! edges and memberships), read concurrently by traversal code, and dropped
//! when the query returns. Nothing here caches across calls.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::error::Result;
use crate::graph::source::{GraphData, GraphSource};
use crate::types::{GroupId, StudentId};

/// Symmetric adjacency lists plus group memberships.
///
/// Invariants upheld by every constructor:
/// - if `b` is a neighbour of `a` then `a` is a neighbour of `b`;
/// - no vertex is its own neighbour;
/// - neighbour lists are sorted ascending and free of duplicates.
#[derive(Debug, Clone, Default)]
pub struct GraphSnapshot {
    adjacency: BTreeMap<StudentId, Vec<StudentId>>,
    memberships: HashMap<StudentId, HashSet<GroupId>>,
    edge_count: usize,
}

const NO_NEIGHBOURS: &[StudentId] = &[];

impl GraphSnapshot {
    /// Build a snapshot from an edge list and a membership map.
    ///
    /// Edge orientation and duplicates are irrelevant. Self-loops violate
    /// the friendship invariant and are dropped with a warning. Students
    /// that only appear in `memberships` become isolated vertices.
    pub fn build<I>(edges: I, memberships: HashMap<StudentId, HashSet<GroupId>>) -> Self
    where
        I: IntoIterator<Item = (StudentId, StudentId)>,
    {
        Self::build_with_students(std::iter::empty(), edges, memberships)
    }

    /// Like [`GraphSnapshot::build`], additionally registering `students` as
    /// vertices even when they have no friends.
    pub fn build_with_students<S, I>(
        students: S,
        edges: I,
        memberships: HashMap<StudentId, HashSet<GroupId>>,
    ) -> Self
    where
        S: IntoIterator<Item = StudentId>,
        I: IntoIterator<Item = (StudentId, StudentId)>,
    {
        let mut neighbours: BTreeMap<StudentId, HashSet<StudentId>> = BTreeMap::new();

        for id in students {
            neighbours.entry(id).or_default();
        }
        for id in memberships.keys() {
            neighbours.entry(*id).or_default();
        }

        let mut self_loops = 0usize;
        for (a, b) in edges {
            if a == b {
                self_loops += 1;
                neighbours.entry(a).or_default();
                continue;
            }
            neighbours.entry(a).or_default().insert(b);
            neighbours.entry(b).or_default().insert(a);
        }
        if self_loops > 0 {
            tracing::warn!(self_loops, "dropped self-loop friendship edges from snapshot");
        }

        let mut edge_endpoints = 0usize;
        let adjacency: BTreeMap<StudentId, Vec<StudentId>> = neighbours
            .into_iter()
            .map(|(id, set)| {
                edge_endpoints += set.len();
                let mut list: Vec<StudentId> = set.into_iter().collect();
                list.sort_unstable();
                (id, list)
            })
            .collect();

        let snapshot = Self {
            adjacency,
            memberships,
            edge_count: edge_endpoints / 2,
        };
        tracing::debug!(
            vertices = snapshot.vertex_count(),
            edges = snapshot.edge_count(),
            "built graph snapshot"
        );
        snapshot
    }

    /// Materialize the current state of `source`.
    ///
    /// Collaborator failures propagate unchanged; an unreadable source never
    /// turns into an empty graph.
    pub fn from_source<S: GraphSource + ?Sized>(source: &S) -> Result<Self> {
        let GraphData {
            students,
            edges,
            memberships,
        } = source.load_graph()?;
        Ok(Self::build_with_students(students, edges, memberships))
    }

    // -------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------

    /// Whether `id` is a vertex of this snapshot.
    pub fn contains(&self, id: StudentId) -> bool {
        self.adjacency.contains_key(&id)
    }

    /// Sorted neighbours of `id`; empty for unknown vertices.
    pub fn neighbours(&self, id: StudentId) -> &[StudentId] {
        self.adjacency
            .get(&id)
            .map(Vec::as_slice)
            .unwrap_or(NO_NEIGHBOURS)
    }

    /// Whether `a` and `b` are direct friends.
    pub fn are_friends(&self, a: StudentId, b: StudentId) -> bool {
        self.neighbours(a).binary_search(&b).is_ok()
    }

    /// All vertices in ascending id order.
    pub fn vertices(&self) -> impl Iterator<Item = StudentId> + '_ {
        self.adjacency.keys().copied()
    }

    /// Groups `id` belongs to, if any.
    pub fn groups_of(&self, id: StudentId) -> Option<&HashSet<GroupId>> {
        self.memberships.get(&id)
    }

    /// Whether `a` and `b` are both members of at least one group.
    pub fn share_group(&self, a: StudentId, b: StudentId) -> bool {
        match (self.memberships.get(&a), self.memberships.get(&b)) {
            (Some(ga), Some(gb)) => {
                let (small, large) = if ga.len() <= gb.len() { (ga, gb) } else { (gb, ga) };
                small.iter().any(|g| large.contains(g))
            }
            _ => false,
        }
    }

    /// The membership mapping exactly as supplied.
    pub fn memberships(&self) -> &HashMap<StudentId, HashSet<GroupId>> {
        &self.memberships
    }

    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of distinct undirected friendships.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

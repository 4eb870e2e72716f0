//! Read-only collaborator contracts that feed the analytics engine.
//!
//! The engine never talks to storage directly. It asks a [`GraphSource`]
//! for the current friendship edges and group memberships, materializes a
//! snapshot, and discards it when the query ends.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::error::{Result, SocialGraphError};
use crate::types::{GroupId, Student, StudentId};

/// Everything a snapshot is built from, read as one state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphData {
    pub students: Vec<StudentId>,
    pub edges: Vec<(StudentId, StudentId)>,
    pub memberships: HashMap<StudentId, HashSet<GroupId>>,
}

/// Supplier of the current friendship graph and membership data.
///
/// Snapshots are built from a single [`GraphSource::load_graph`] call, which
/// must return one consistent state. Sources whose data can change between
/// the individual reads (a shared database) must override it.
pub trait GraphSource {
    /// Every friendship as an unordered pair. Orientation is irrelevant.
    fn friend_edges(&self) -> Result<Vec<(StudentId, StudentId)>>;

    /// Group memberships keyed by student. Students in no group may be
    /// absent from the map.
    fn group_memberships(&self) -> Result<HashMap<StudentId, HashSet<GroupId>>>;

    /// Whether `id` names an existing student.
    fn student_exists(&self, id: StudentId) -> Result<bool>;

    /// All known student ids, including students with no friends.
    ///
    /// The default derives the set from edges and memberships, which misses
    /// isolated students; stores should override it.
    fn student_ids(&self) -> Result<Vec<StudentId>> {
        let mut ids: BTreeSet<StudentId> = BTreeSet::new();
        for (a, b) in self.friend_edges()? {
            ids.insert(a);
            ids.insert(b);
        }
        ids.extend(self.group_memberships()?.into_keys());
        Ok(ids.into_iter().collect())
    }

    /// Students, edges and memberships in one read.
    ///
    /// The default composes the individual methods and is only consistent
    /// for sources that cannot change underneath it.
    fn load_graph(&self) -> Result<GraphData> {
        Ok(GraphData {
            students: self.student_ids()?,
            edges: self.friend_edges()?,
            memberships: self.group_memberships()?,
        })
    }

    /// Resolve profiles for the given ids. Unknown ids are skipped.
    ///
    /// Sources without profile data report a collaborator error.
    fn students_by_ids(&self, _ids: &[StudentId]) -> Result<Vec<Student>> {
        Err(SocialGraphError::Collaborator(
            "this graph source does not provide student profiles".to_string(),
        ))
    }
}

impl<S: GraphSource + ?Sized> GraphSource for &S {
    fn friend_edges(&self) -> Result<Vec<(StudentId, StudentId)>> {
        (**self).friend_edges()
    }

    fn group_memberships(&self) -> Result<HashMap<StudentId, HashSet<GroupId>>> {
        (**self).group_memberships()
    }

    fn student_exists(&self, id: StudentId) -> Result<bool> {
        (**self).student_exists(id)
    }

    fn student_ids(&self) -> Result<Vec<StudentId>> {
        (**self).student_ids()
    }

    fn load_graph(&self) -> Result<GraphData> {
        (**self).load_graph()
    }

    fn students_by_ids(&self, ids: &[StudentId]) -> Result<Vec<Student>> {
        (**self).students_by_ids(ids)
    }
}

// ---------------------------------------------------------------------------
// InMemorySource
// ---------------------------------------------------------------------------

/// A fixed, in-memory [`GraphSource`]. Handy for hosts that already hold
/// the data and for tests.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    students: BTreeSet<StudentId>,
    edges: Vec<(StudentId, StudentId)>,
    memberships: HashMap<StudentId, HashSet<GroupId>>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a student with no friends and no groups.
    pub fn with_student(mut self, id: StudentId) -> Self {
        self.students.insert(id);
        self
    }

    /// Add a friendship. Both endpoints become known students.
    pub fn with_edge(mut self, a: StudentId, b: StudentId) -> Self {
        self.students.insert(a);
        self.students.insert(b);
        self.edges.push((a, b));
        self
    }

    /// Put `student` in each of `groups`.
    pub fn with_groups(mut self, student: StudentId, groups: &[GroupId]) -> Self {
        self.students.insert(student);
        self.memberships
            .entry(student)
            .or_default()
            .extend(groups.iter().copied());
        self
    }
}

impl GraphSource for InMemorySource {
    fn friend_edges(&self) -> Result<Vec<(StudentId, StudentId)>> {
        Ok(self.edges.clone())
    }

    fn group_memberships(&self) -> Result<HashMap<StudentId, HashSet<GroupId>>> {
        Ok(self.memberships.clone())
    }

    fn student_exists(&self, id: StudentId) -> Result<bool> {
        Ok(self.students.contains(&id))
    }

    fn student_ids(&self) -> Result<Vec<StudentId>> {
        Ok(self.students.iter().copied().collect())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

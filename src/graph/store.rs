//! SQLite store for students, groups, memberships and friendships.
//!
//! This is the mutable side of the system. Mutations map domain outcomes to
//! [`StoreOutcome`] and reserve `Err` for genuine database faults. The read
//! side is exposed through [`GraphSource`] so the analytics engine can take
//! a fresh snapshot per query.

use std::collections::{HashMap, HashSet};

use rusqlite::{params, params_from_iter, Connection, OptionalExtension};

use crate::db::schema::initialize_database;
use crate::error::{Result, SocialGraphError};
use crate::graph::source::{GraphData, GraphSource};
use crate::types::{GroupId, StoreOutcome, Student, StudentId, StudentIdPair};

// ---------------------------------------------------------------------------
// StoreStats
// ---------------------------------------------------------------------------

/// Aggregate row counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct StoreStats {
    pub students: usize,
    pub groups: usize,
    pub memberships: usize,
    pub friendships: usize,
}

// ---------------------------------------------------------------------------
// SocialStore
// ---------------------------------------------------------------------------

/// Typed CRUD wrapper around the student network database.
///
/// Every statement goes through [`Connection::prepare_cached`].
pub struct SocialStore {
    pub conn: Connection,
}

impl std::fmt::Debug for SocialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SocialStore").finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// SQL constants
// ---------------------------------------------------------------------------

const ENSURE_GROUP_SQL: &str = "INSERT OR IGNORE INTO groups (name) VALUES (?1)";

const GROUP_ID_SQL: &str = "SELECT id FROM groups WHERE name = ?1";

const STUDENT_EXISTS_SQL: &str = "SELECT EXISTS(SELECT 1 FROM students WHERE id = ?1)";

const INSERT_STUDENT_SQL: &str = "\
INSERT INTO students (id, name, faculty_id) VALUES (?1, ?2, ?3)";

const INSERT_MEMBER_SQL: &str = "\
INSERT OR IGNORE INTO members (group_id, student_id) VALUES (?1, ?2)";

const GET_STUDENT_SQL: &str = "\
SELECT s.id, s.name, g.name
FROM students s
JOIN groups g ON g.id = s.faculty_id
WHERE s.id = ?1";

const INSERT_FRIENDS_SQL: &str = "\
INSERT OR IGNORE INTO friends (id1, id2) VALUES (?1, ?2)";

const DELETE_FRIENDS_SQL: &str = "\
DELETE FROM friends WHERE id1 = ?1 AND id2 = ?2";

const UPDATE_FACULTY_SQL: &str = "\
UPDATE students SET faculty_id = ?1 WHERE id = ?2";

const STUDENTS_BY_IDS_SQL: &str = "\
SELECT s.id, s.name, g.name
FROM students s
JOIN groups g ON g.id = s.faculty_id
WHERE s.id IN";

/// Upper bound on ids bound into one `IN (...)` list.
const PROFILE_BATCH: usize = 500;

const LEAVE_GROUP_SQL: &str = "\
DELETE FROM members
WHERE student_id = ?1
  AND group_id = (SELECT id FROM groups WHERE name = ?2)";

// ---------------------------------------------------------------------------
// Implementation
// ---------------------------------------------------------------------------

impl SocialStore {
    /// Open (or create) the database at `db_path` and apply the schema.
    pub fn new(db_path: &str) -> Result<Self> {
        let conn = initialize_database(db_path)?;
        Ok(Self { conn })
    }

    /// Wrap a connection that already has the schema applied, e.g. one
    /// returned by `initialize_database(":memory:")`.
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    // -------------------------------------------------------------------
    // Students
    // -------------------------------------------------------------------

    /// Insert a student and enrol them in their faculty group, creating the
    /// group on first use.
    pub fn add_student(&self, student: &Student) -> Result<StoreOutcome> {
        if student.id <= 0 || student.name.trim().is_empty() || student.faculty.trim().is_empty() {
            return Ok(StoreOutcome::BadParams);
        }
        if self.student_exists_row(student.id)? {
            return Ok(StoreOutcome::AlreadyExists);
        }

        let tx = self.conn.unchecked_transaction()?;
        {
            let group_id = ensure_group(&tx, &student.faculty)?;
            tx.prepare_cached(INSERT_STUDENT_SQL)?
                .execute(params![student.id, student.name, group_id])?;
            tx.prepare_cached(INSERT_MEMBER_SQL)?
                .execute(params![group_id, student.id])?;
        }
        tx.commit()?;
        tracing::debug!(student = student.id, faculty = %student.faculty, "added student");
        Ok(StoreOutcome::Ok)
    }

    /// Remove a student. Friendships and memberships cascade.
    pub fn delete_student(&self, id: StudentId) -> Result<StoreOutcome> {
        let affected = self
            .conn
            .prepare_cached("DELETE FROM students WHERE id = ?1")?
            .execute(params![id])?;
        if affected == 0 {
            return Ok(StoreOutcome::NotExists);
        }
        tracing::debug!(student = id, "deleted student");
        Ok(StoreOutcome::Ok)
    }

    /// Retrieve a student profile, or `None` if the id is unknown.
    pub fn get_student(&self, id: StudentId) -> Result<Option<Student>> {
        let mut stmt = self.conn.prepare_cached(GET_STUDENT_SQL)?;
        let student = stmt.query_row(params![id], row_to_student).optional()?;
        Ok(student)
    }

    /// Move a student to another faculty: join the new faculty group
    /// (creating it if needed) and repoint their faculty. Membership of the
    /// previous faculty group is kept.
    ///
    /// Outcomes match [`SocialStore::join_group`]; `AlreadyExists` means the
    /// student is already a member of the new faculty group and nothing
    /// changes.
    pub fn update_student_faculty(&self, student: &Student) -> Result<StoreOutcome> {
        if student.faculty.trim().is_empty() {
            return Ok(StoreOutcome::BadParams);
        }
        if !self.student_exists_row(student.id)? {
            return Ok(StoreOutcome::NotExists);
        }

        let tx = self.conn.unchecked_transaction()?;
        let group_id = ensure_group(&tx, &student.faculty)?;
        let joined = tx
            .prepare_cached(INSERT_MEMBER_SQL)?
            .execute(params![group_id, student.id])?;
        if joined == 0 {
            // Dropping the transaction rolls back.
            return Ok(StoreOutcome::AlreadyExists);
        }
        tx.prepare_cached(UPDATE_FACULTY_SQL)?
            .execute(params![group_id, student.id])?;
        tx.commit()?;
        tracing::debug!(student = student.id, faculty = %student.faculty, "changed faculty");
        Ok(StoreOutcome::Ok)
    }

    fn student_exists_row(&self, id: StudentId) -> Result<bool> {
        let exists: bool = self
            .conn
            .prepare_cached(STUDENT_EXISTS_SQL)?
            .query_row(params![id], |row| row.get(0))?;
        Ok(exists)
    }

    // -------------------------------------------------------------------
    // Friendships
    // -------------------------------------------------------------------

    /// Record a mutual friendship.
    ///
    /// `BadParams` when both ids are the same student; `NotExists` when
    /// either student is missing; `AlreadyExists` for a repeated pair in
    /// either orientation.
    pub fn make_friends(&self, a: StudentId, b: StudentId) -> Result<StoreOutcome> {
        let Some(pair) = StudentIdPair::canonical(a, b) else {
            return Ok(StoreOutcome::BadParams);
        };
        if !self.student_exists_row(a)? || !self.student_exists_row(b)? {
            return Ok(StoreOutcome::NotExists);
        }
        let inserted = self
            .conn
            .prepare_cached(INSERT_FRIENDS_SQL)?
            .execute(params![pair.id2(), pair.id1()])?;
        if inserted == 0 {
            return Ok(StoreOutcome::AlreadyExists);
        }
        tracing::debug!(a, b, "recorded friendship");
        Ok(StoreOutcome::Ok)
    }

    /// Remove a friendship. `NotExists` if the two were not friends.
    pub fn make_not_friends(&self, a: StudentId, b: StudentId) -> Result<StoreOutcome> {
        let Some(pair) = StudentIdPair::canonical(a, b) else {
            return Ok(StoreOutcome::NotExists);
        };
        let removed = self
            .conn
            .prepare_cached(DELETE_FRIENDS_SQL)?
            .execute(params![pair.id2(), pair.id1()])?;
        if removed == 0 {
            return Ok(StoreOutcome::NotExists);
        }
        tracing::debug!(a, b, "removed friendship");
        Ok(StoreOutcome::Ok)
    }

    // -------------------------------------------------------------------
    // Groups
    // -------------------------------------------------------------------

    /// Add a student to a group, creating the group if needed.
    pub fn join_group(&self, id: StudentId, group_name: &str) -> Result<StoreOutcome> {
        if group_name.trim().is_empty() {
            return Ok(StoreOutcome::BadParams);
        }
        if !self.student_exists_row(id)? {
            return Ok(StoreOutcome::NotExists);
        }

        let tx = self.conn.unchecked_transaction()?;
        let inserted = {
            let group_id = ensure_group(&tx, group_name)?;
            tx.prepare_cached(INSERT_MEMBER_SQL)?
                .execute(params![group_id, id])?
        };
        tx.commit()?;

        if inserted == 0 {
            return Ok(StoreOutcome::AlreadyExists);
        }
        Ok(StoreOutcome::Ok)
    }

    /// Remove a student from a group. `NotExists` covers an unknown student,
    /// an unknown group, and a non-member alike.
    pub fn leave_group(&self, id: StudentId, group_name: &str) -> Result<StoreOutcome> {
        let removed = self
            .conn
            .prepare_cached(LEAVE_GROUP_SQL)?
            .execute(params![id, group_name])?;
        if removed == 0 {
            return Ok(StoreOutcome::NotExists);
        }
        Ok(StoreOutcome::Ok)
    }

    /// Look up a group id by name.
    pub fn group_id(&self, group_name: &str) -> Result<Option<GroupId>> {
        let id = self
            .conn
            .prepare_cached(GROUP_ID_SQL)?
            .query_row(params![group_name], |row| row.get(0))
            .optional()?;
        Ok(id)
    }

    // -------------------------------------------------------------------
    // Aggregates
    // -------------------------------------------------------------------

    fn count(&self, sql: &str) -> Result<usize> {
        let count: i64 = self.conn.prepare_cached(sql)?.query_row([], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn get_stats(&self) -> Result<StoreStats> {
        Ok(StoreStats {
            students: self.count("SELECT count(*) FROM students")?,
            groups: self.count("SELECT count(*) FROM groups")?,
            memberships: self.count("SELECT count(*) FROM members")?,
            friendships: self.count("SELECT count(*) FROM friends")?,
        })
    }

    // -------------------------------------------------------------------
    // Bulk reads backing the GraphSource contract
    // -------------------------------------------------------------------

    fn load_friend_edges(&self) -> Result<Vec<(StudentId, StudentId)>> {
        let mut stmt = self.conn.prepare_cached("SELECT id1, id2 FROM friends")?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Into::into)
    }

    fn load_memberships(&self) -> Result<HashMap<StudentId, HashSet<GroupId>>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT student_id, group_id FROM members")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, StudentId>(0)?, row.get::<_, GroupId>(1)?))
        })?;
        let mut memberships: HashMap<StudentId, HashSet<GroupId>> = HashMap::new();
        for row in rows {
            let (student, group) = row?;
            memberships.entry(student).or_default().insert(group);
        }
        Ok(memberships)
    }

    fn load_student_ids(&self) -> Result<Vec<StudentId>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT id FROM students ORDER BY id")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Into::into)
    }

    fn load_students(&self, ids: &[StudentId]) -> Result<Vec<Student>> {
        let mut wanted: Vec<StudentId> = ids.to_vec();
        wanted.sort_unstable();
        wanted.dedup();

        let mut students = Vec::with_capacity(wanted.len());
        for batch in wanted.chunks(PROFILE_BATCH) {
            let placeholders = vec!["?"; batch.len()].join(", ");
            let sql = format!("{STUDENTS_BY_IDS_SQL} ({placeholders}) ORDER BY s.id");
            let mut stmt = self.conn.prepare(&sql)?;
            let rows = stmt.query_map(params_from_iter(batch.iter()), row_to_student)?;
            for row in rows {
                students.push(row?);
            }
        }
        Ok(students)
    }

    /// Students, edges and memberships inside one read transaction, so a
    /// write committed by another connection mid-read is either fully
    /// visible or not at all.
    fn read_graph(&self) -> Result<GraphData> {
        self.read_graph_with(|| Ok(()))
    }

    /// [`SocialStore::read_graph`] running `after_students` between the
    /// first read and the rest.
    fn read_graph_with<F>(&self, after_students: F) -> Result<GraphData>
    where
        F: FnOnce() -> Result<()>,
    {
        let tx = self.conn.unchecked_transaction()?;
        let students = self.load_student_ids()?;
        after_students()?;
        let edges = self.load_friend_edges()?;
        let memberships = self.load_memberships()?;
        tx.commit()?;
        Ok(GraphData {
            students,
            edges,
            memberships,
        })
    }
}

/// Create `name` if missing and return its id.
fn ensure_group(conn: &Connection, name: &str) -> Result<GroupId> {
    conn.prepare_cached(ENSURE_GROUP_SQL)?
        .execute(params![name])?;
    let id = conn
        .prepare_cached(GROUP_ID_SQL)?
        .query_row(params![name], |row| row.get(0))?;
    Ok(id)
}

fn row_to_student(row: &rusqlite::Row<'_>) -> rusqlite::Result<Student> {
    Ok(Student {
        id: row.get(0)?,
        name: row.get(1)?,
        faculty: row.get(2)?,
    })
}

// ---------------------------------------------------------------------------
// GraphSource
// ---------------------------------------------------------------------------

impl GraphSource for SocialStore {
    fn friend_edges(&self) -> Result<Vec<(StudentId, StudentId)>> {
        self.load_friend_edges().map_err(SocialGraphError::collaborator)
    }

    fn group_memberships(&self) -> Result<HashMap<StudentId, HashSet<GroupId>>> {
        self.load_memberships().map_err(SocialGraphError::collaborator)
    }

    fn student_exists(&self, id: StudentId) -> Result<bool> {
        self.student_exists_row(id)
            .map_err(SocialGraphError::collaborator)
    }

    fn student_ids(&self) -> Result<Vec<StudentId>> {
        self.load_student_ids().map_err(SocialGraphError::collaborator)
    }

    fn load_graph(&self) -> Result<GraphData> {
        self.read_graph().map_err(SocialGraphError::collaborator)
    }

    fn students_by_ids(&self, ids: &[StudentId]) -> Result<Vec<Student>> {
        self.load_students(ids).map_err(SocialGraphError::collaborator)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    /// Spin up an in-memory store with the full schema applied.
    fn setup() -> SocialStore {
        let conn =
            initialize_database(":memory:").expect("schema init should succeed on :memory:");
        SocialStore::from_connection(conn)
    }

    fn add(store: &SocialStore, id: StudentId, faculty: &str) {
        let outcome = store
            .add_student(&Student::new(id, format!("student{id}"), faculty))
            .unwrap();
        assert_eq!(outcome, StoreOutcome::Ok);
    }

    // -- students ----------------------------------------------------------

    #[test]
    fn add_and_get_student_round_trip() {
        let store = setup();
        add(&store, 1, "cs");

        let got = store.get_student(1).unwrap().expect("student should exist");
        assert_eq!(got, Student::new(1, "student1", "cs"));
    }

    #[test]
    fn add_student_joins_faculty_group() {
        let store = setup();
        add(&store, 1, "cs");
        let memberships = store.group_memberships().unwrap();
        let cs = store.group_id("cs").unwrap().unwrap();
        assert_eq!(memberships[&1], HashSet::from([cs]));
    }

    #[test]
    fn add_student_twice_reports_already_exists() {
        let store = setup();
        add(&store, 1, "cs");
        let outcome = store.add_student(&Student::new(1, "again", "math")).unwrap();
        assert_eq!(outcome, StoreOutcome::AlreadyExists);
        assert_eq!(store.get_stats().unwrap().students, 1);
    }

    #[test]
    fn add_student_rejects_bad_params() {
        let store = setup();
        for student in [
            Student::new(0, "zero", "cs"),
            Student::new(-4, "negative", "cs"),
            Student::new(5, "", "cs"),
            Student::new(5, "blank faculty", "  "),
        ] {
            assert_eq!(store.add_student(&student).unwrap(), StoreOutcome::BadParams);
        }
        assert_eq!(store.get_stats().unwrap().students, 0);
    }

    #[test]
    fn students_share_an_existing_faculty_group() {
        let store = setup();
        add(&store, 1, "cs");
        add(&store, 2, "cs");
        assert_eq!(store.get_stats().unwrap().groups, 1);
        assert_eq!(store.get_stats().unwrap().memberships, 2);
    }

    #[test]
    fn get_student_returns_none_for_missing_id() {
        let store = setup();
        assert!(store.get_student(42).unwrap().is_none());
    }

    #[test]
    fn delete_student_cascades() {
        let store = setup();
        add(&store, 1, "cs");
        add(&store, 2, "cs");
        store.make_friends(1, 2).unwrap();

        assert_eq!(store.delete_student(2).unwrap(), StoreOutcome::Ok);
        assert_eq!(store.delete_student(2).unwrap(), StoreOutcome::NotExists);
        assert!(store.friend_edges().unwrap().is_empty());
        assert!(!store.group_memberships().unwrap().contains_key(&2));
    }

    #[test]
    fn update_student_faculty_joins_new_faculty_and_keeps_old_membership() {
        let store = setup();
        add(&store, 1, "cs");

        let moved = Student::new(1, "student1", "math");
        assert_eq!(store.update_student_faculty(&moved).unwrap(), StoreOutcome::Ok);
        assert_eq!(store.get_student(1).unwrap(), Some(moved.clone()));

        let cs = store.group_id("cs").unwrap().unwrap();
        let math = store.group_id("math").unwrap().unwrap();
        assert_eq!(store.group_memberships().unwrap()[&1], HashSet::from([cs, math]));

        assert_eq!(
            store.update_student_faculty(&moved).unwrap(),
            StoreOutcome::AlreadyExists
        );
    }

    #[test]
    fn update_student_faculty_to_a_joined_group_changes_nothing() {
        let store = setup();
        add(&store, 1, "cs");
        store.join_group(1, "chess").unwrap();

        let outcome = store
            .update_student_faculty(&Student::new(1, "student1", "chess"))
            .unwrap();
        assert_eq!(outcome, StoreOutcome::AlreadyExists);
        assert_eq!(store.get_student(1).unwrap().unwrap().faculty, "cs");
    }

    #[test]
    fn update_student_faculty_validates_inputs() {
        let store = setup();
        add(&store, 1, "cs");
        let blank = Student::new(1, "student1", " ");
        assert_eq!(store.update_student_faculty(&blank).unwrap(), StoreOutcome::BadParams);
        let missing = Student::new(7, "nobody", "math");
        assert_eq!(store.update_student_faculty(&missing).unwrap(), StoreOutcome::NotExists);
        assert!(store.group_id("math").unwrap().is_none());
    }

    // -- friendships -------------------------------------------------------

    #[test]
    fn make_friends_stores_one_canonical_row() {
        let store = setup();
        add(&store, 1, "cs");
        add(&store, 2, "cs");

        assert_eq!(store.make_friends(2, 1).unwrap(), StoreOutcome::Ok);
        assert_eq!(store.make_friends(1, 2).unwrap(), StoreOutcome::AlreadyExists);
        assert_eq!(store.make_friends(2, 1).unwrap(), StoreOutcome::AlreadyExists);
        assert_eq!(store.friend_edges().unwrap(), vec![(1, 2)]);
    }

    #[test]
    fn make_friends_validates_inputs() {
        let store = setup();
        add(&store, 1, "cs");
        assert_eq!(store.make_friends(1, 1).unwrap(), StoreOutcome::BadParams);
        assert_eq!(store.make_friends(1, 3).unwrap(), StoreOutcome::NotExists);
        assert_eq!(store.make_friends(-1, 1).unwrap(), StoreOutcome::NotExists);
    }

    #[test]
    fn make_not_friends_in_either_orientation() {
        let store = setup();
        add(&store, 1, "cs");
        add(&store, 2, "cs");
        store.make_friends(1, 2).unwrap();

        assert_eq!(store.make_not_friends(2, 1).unwrap(), StoreOutcome::Ok);
        assert_eq!(store.make_not_friends(1, 2).unwrap(), StoreOutcome::NotExists);
        assert_eq!(store.make_not_friends(1, 1).unwrap(), StoreOutcome::NotExists);
    }

    // -- groups ------------------------------------------------------------

    #[test]
    fn join_and_leave_group() {
        let store = setup();
        add(&store, 1, "cs");

        assert_eq!(store.join_group(1, "chess").unwrap(), StoreOutcome::Ok);
        assert_eq!(store.join_group(1, "chess").unwrap(), StoreOutcome::AlreadyExists);
        assert_eq!(store.group_memberships().unwrap()[&1].len(), 2);

        assert_eq!(store.leave_group(1, "chess").unwrap(), StoreOutcome::Ok);
        assert_eq!(store.leave_group(1, "chess").unwrap(), StoreOutcome::NotExists);
        assert_eq!(store.group_memberships().unwrap()[&1].len(), 1);
    }

    #[test]
    fn join_group_validates_inputs() {
        let store = setup();
        add(&store, 1, "cs");
        assert_eq!(store.join_group(1, "").unwrap(), StoreOutcome::BadParams);
        assert_eq!(store.join_group(2, "chess").unwrap(), StoreOutcome::NotExists);
        assert_eq!(store.leave_group(1, "no-such-group").unwrap(), StoreOutcome::NotExists);
        assert_eq!(store.leave_group(9, "cs").unwrap(), StoreOutcome::NotExists);
    }

    // -- GraphSource -------------------------------------------------------

    #[test]
    fn graph_source_reads_current_state() {
        let store = setup();
        add(&store, 3, "cs");
        add(&store, 1, "math");
        add(&store, 2, "cs");
        store.make_friends(1, 3).unwrap();

        assert_eq!(store.student_ids().unwrap(), vec![1, 2, 3]);
        assert!(store.student_exists(2).unwrap());
        assert!(!store.student_exists(7).unwrap());
        assert_eq!(store.friend_edges().unwrap(), vec![(1, 3)]);
    }

    #[test]
    fn students_by_ids_sorts_dedups_and_skips_unknown() {
        let store = setup();
        add(&store, 2, "cs");
        add(&store, 1, "cs");
        let students = store.students_by_ids(&[2, 99, 1, 2]).unwrap();
        let ids: Vec<StudentId> = students.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn students_by_ids_spans_several_batches() {
        let store = setup();
        let count = PROFILE_BATCH as StudentId + 20;
        for id in 1..=count {
            add(&store, id, "cs");
        }
        let ids: Vec<StudentId> = (1..=count).rev().collect();
        let students = store.students_by_ids(&ids).unwrap();
        assert_eq!(students.len(), count as usize);
        assert!(students.windows(2).all(|w| w[0].id < w[1].id));
        assert!(store.students_by_ids(&[]).unwrap().is_empty());
    }

    #[test]
    fn load_graph_reads_one_state_across_connections() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("graph.db");
        let path = path.to_str().unwrap();

        let store = SocialStore::new(path).unwrap();
        for id in 1..=4 {
            add(&store, id, "cs");
        }
        for (a, b) in [(1, 2), (2, 3), (3, 4)] {
            assert_eq!(store.make_friends(a, b).unwrap(), StoreOutcome::Ok);
        }
        let writer = SocialStore::new(path).unwrap();

        // Another connection deletes student 3 after the student list has
        // been read but before edges and memberships are.
        let data = store
            .read_graph_with(|| {
                assert_eq!(writer.delete_student(3)?, StoreOutcome::Ok);
                Ok(())
            })
            .unwrap();
        assert_eq!(data.students, vec![1, 2, 3, 4]);
        assert_eq!(data.edges.len(), 3);
        assert!(data.memberships.contains_key(&3));

        let after = store.load_graph().unwrap();
        assert_eq!(after.students, vec![1, 2, 4]);
        assert_eq!(after.edges, vec![(1, 2)]);
        assert!(!after.memberships.contains_key(&3));
    }

    #[test]
    fn graph_source_failure_is_a_collaborator_error() {
        let store = setup();
        store.conn.execute_batch("DROP TABLE friends").unwrap();
        let err = store.friend_edges().unwrap_err();
        assert!(matches!(err, SocialGraphError::Collaborator(_)));
        let err = store.load_graph().unwrap_err();
        assert!(matches!(err, SocialGraphError::Collaborator(_)));
    }

    #[test]
    fn stats_count_every_table() {
        let store = setup();
        add(&store, 1, "cs");
        add(&store, 2, "math");
        store.make_friends(1, 2).unwrap();
        store.join_group(1, "math").unwrap();
        assert_eq!(
            store.get_stats().unwrap(),
            StoreStats {
                students: 2,
                groups: 2,
                memberships: 3,
                friendships: 1,
            }
        );
    }
}

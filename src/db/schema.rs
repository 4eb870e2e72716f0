//! SQLite schema initialization for the student network store.
//!
//! Friendships are stored once per unordered pair with `id1 < id2`; the
//! CHECK constraint doubles as the no-self-friend rule. Deleting a student
//! cascades to their friendships and memberships, which is what keeps the
//! friendship graph consistent when a vertex disappears.

use rusqlite::Connection;

// ---------------------------------------------------------------------------
// DDL constants
// ---------------------------------------------------------------------------

const CREATE_GROUPS: &str = "\
CREATE TABLE IF NOT EXISTS groups (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  name TEXT NOT NULL UNIQUE
)";

const CREATE_STUDENTS: &str = "\
CREATE TABLE IF NOT EXISTS students (
  id INTEGER PRIMARY KEY CHECK (id > 0),
  name TEXT NOT NULL,
  faculty_id INTEGER NOT NULL,
  FOREIGN KEY (faculty_id) REFERENCES groups(id) ON DELETE CASCADE
)";

const CREATE_MEMBERS: &str = "\
CREATE TABLE IF NOT EXISTS members (
  group_id INTEGER NOT NULL,
  student_id INTEGER NOT NULL,
  PRIMARY KEY (student_id, group_id),
  FOREIGN KEY (group_id) REFERENCES groups(id) ON DELETE CASCADE,
  FOREIGN KEY (student_id) REFERENCES students(id) ON DELETE CASCADE
)";

const CREATE_FRIENDS: &str = "\
CREATE TABLE IF NOT EXISTS friends (
  id1 INTEGER NOT NULL,
  id2 INTEGER NOT NULL,
  PRIMARY KEY (id1, id2),
  CHECK (id1 < id2),
  FOREIGN KEY (id1) REFERENCES students(id) ON DELETE CASCADE,
  FOREIGN KEY (id2) REFERENCES students(id) ON DELETE CASCADE
)";

// Indexes ----------------------------------------------------------------

const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_friends_id2 ON friends(id2)",
    "CREATE INDEX IF NOT EXISTS idx_members_group ON members(group_id)",
];

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Open (or create) the SQLite database at `db_path` and apply the schema.
///
/// The returned connection has WAL mode, foreign keys ON, and synchronous
/// NORMAL configured. Pass `":memory:"` for a throwaway database.
pub fn initialize_database(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    apply_schema(&conn)?;
    Ok(conn)
}

/// Apply pragmas and DDL to an already-open connection. Idempotent.
pub fn apply_schema(conn: &Connection) -> rusqlite::Result<()> {
    // -- Pragmas ----------------------------------------------------------
    conn.pragma_update(None, "journal_mode", "WAL")?;
    // Cascading deletes depend on this.
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;

    // -- Tables -----------------------------------------------------------
    conn.execute_batch(CREATE_GROUPS)?;
    conn.execute_batch(CREATE_STUDENTS)?;
    conn.execute_batch(CREATE_MEMBERS)?;
    conn.execute_batch(CREATE_FRIENDS)?;

    // -- Indexes ----------------------------------------------------------
    for ddl in CREATE_INDEXES {
        conn.execute_batch(ddl)?;
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

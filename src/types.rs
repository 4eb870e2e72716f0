//! Core domain types shared by the store and the analytics engine.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// External student identity. Valid ids are strictly positive; the engine
/// treats anything else as an unknown vertex.
pub type StudentId = i64;

/// Group row id as assigned by the store.
pub type GroupId = i64;

// ---------------------------------------------------------------------------
// Student
// ---------------------------------------------------------------------------

/// A student profile. `faculty` names the group every student joins on
/// creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    pub faculty: String,
}

impl Student {
    pub fn new(id: StudentId, name: impl Into<String>, faculty: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            faculty: faculty.into(),
        }
    }
}

impl std::fmt::Display for Student {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}, {})", self.id, self.name, self.faculty)
    }
}

// ---------------------------------------------------------------------------
// StudentIdPair
// ---------------------------------------------------------------------------

/// Canonical unordered pair of students: `id1 > id2` always holds, so
/// `(a, b)` and `(b, a)` collapse to the same value.
///
/// Fields are private; the only ways in are [`StudentIdPair::canonical`] and
/// deserialization, which rejects non-canonical input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPair")]
pub struct StudentIdPair {
    id1: StudentId,
    id2: StudentId,
}

#[derive(Deserialize)]
struct RawPair {
    id1: StudentId,
    id2: StudentId,
}

impl TryFrom<RawPair> for StudentIdPair {
    type Error = String;

    fn try_from(raw: RawPair) -> Result<Self, Self::Error> {
        if raw.id1 > raw.id2 {
            Ok(Self {
                id1: raw.id1,
                id2: raw.id2,
            })
        } else {
            Err(format!(
                "pair ({}, {}) is not canonical: id1 must be greater than id2",
                raw.id1, raw.id2
            ))
        }
    }
}

impl StudentIdPair {
    /// Build the canonical pair for two distinct students. Returns `None`
    /// when `a == b`.
    pub fn canonical(a: StudentId, b: StudentId) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Greater => Some(Self { id1: a, id2: b }),
            std::cmp::Ordering::Less => Some(Self { id1: b, id2: a }),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// The larger id.
    pub fn id1(&self) -> StudentId {
        self.id1
    }

    /// The smaller id.
    pub fn id2(&self) -> StudentId {
        self.id2
    }

    /// Whether `id` is one of the two endpoints.
    pub fn contains(&self, id: StudentId) -> bool {
        self.id1 == id || self.id2 == id
    }
}

impl std::fmt::Display for StudentIdPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.id1, self.id2)
    }
}

// ---------------------------------------------------------------------------
// StoreOutcome
// ---------------------------------------------------------------------------

/// Domain-level result of a store mutation. Database faults are reported
/// separately through [`crate::error::SocialGraphError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StoreOutcome {
    Ok,
    NotExists,
    AlreadyExists,
    BadParams,
}

impl StoreOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::NotExists => "NOT_EXISTS",
            Self::AlreadyExists => "ALREADY_EXISTS",
            Self::BadParams => "BAD_PARAMS",
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl std::fmt::Display for StoreOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case(6, 1, Some((6, 1)) ; "already canonical")]
    #[test_case(1, 6, Some((6, 1)) ; "swapped")]
    #[test_case(3, 3, None ; "self pair")]
    fn canonical_pair(a: StudentId, b: StudentId, expected: Option<(StudentId, StudentId)>) {
        let got = StudentIdPair::canonical(a, b).map(|p| (p.id1(), p.id2()));
        assert_eq!(got, expected);
    }

    #[test]
    fn canonical_pair_is_symmetric() {
        assert_eq!(
            StudentIdPair::canonical(10, 42),
            StudentIdPair::canonical(42, 10)
        );
    }

    #[test]
    fn pair_contains_both_endpoints() {
        let pair = StudentIdPair::canonical(2, 9).unwrap();
        assert!(pair.contains(2));
        assert!(pair.contains(9));
        assert!(!pair.contains(5));
    }

    #[test]
    fn pair_serializes_with_named_fields() {
        let pair = StudentIdPair::canonical(1, 6).unwrap();
        let json = serde_json::to_value(pair).unwrap();
        assert_eq!(json, serde_json::json!({ "id1": 6, "id2": 1 }));
    }

    #[test]
    fn pair_deserializes_only_canonical_input() {
        let pair: StudentIdPair = serde_json::from_str(r#"{"id1": 6, "id2": 1}"#).unwrap();
        assert_eq!(pair, StudentIdPair::canonical(1, 6).unwrap());

        for bad in [r#"{"id1": 1, "id2": 6}"#, r#"{"id1": 4, "id2": 4}"#] {
            let err = serde_json::from_str::<StudentIdPair>(bad).unwrap_err();
            assert!(err.to_string().contains("not canonical"), "{err}");
        }
    }

    #[test]
    fn store_outcome_serde_matches_as_str() {
        for outcome in [
            StoreOutcome::Ok,
            StoreOutcome::NotExists,
            StoreOutcome::AlreadyExists,
            StoreOutcome::BadParams,
        ] {
            let json = serde_json::to_string(&outcome).unwrap();
            assert_eq!(json, format!("\"{}\"", outcome.as_str()));
            assert_eq!(outcome.to_string(), outcome.as_str());
        }
    }

    #[test]
    fn student_display() {
        let s = Student::new(1, "moshe", "cs");
        assert_eq!(s.to_string(), "1 (moshe, cs)");
    }
}

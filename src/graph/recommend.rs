//! "People you may know": friends-of-friends who share a group.
//!
//! A candidate must sit at BFS distance exactly 2 from the student, so the
//! student (distance 0) and direct friends (distance 1) drop out without a
//! separate exclusion step, and a candidate reachable through several
//! mutual friends still appears once.

use crate::graph::bfs::bfs_from;
use crate::graph::snapshot::GraphSnapshot;
use crate::types::StudentId;

/// Hop distance that defines a friend-of-friend.
pub const FRIEND_OF_FRIEND_DEPTH: u32 = 2;

/// Recommended students for `student`, ascending by id.
///
/// Unknown students (including non-positive ids) get an empty list rather
/// than an error.
pub fn recommend(snapshot: &GraphSnapshot, student: StudentId) -> Vec<StudentId> {
    if !snapshot.contains(student) {
        tracing::debug!(student, "recommendation requested for unknown student");
        return Vec::new();
    }
    let Some(own_groups) = snapshot.groups_of(student).filter(|g| !g.is_empty()) else {
        return Vec::new();
    };

    let reach = bfs_from(snapshot, student, Some(FRIEND_OF_FRIEND_DEPTH));
    let mut candidates: Vec<StudentId> = reach
        .at_depth(FRIEND_OF_FRIEND_DEPTH)
        .iter()
        .copied()
        .filter(|candidate| {
            snapshot
                .groups_of(*candidate)
                .is_some_and(|theirs| theirs.iter().any(|g| own_groups.contains(g)))
        })
        .collect();
    candidates.sort_unstable();

    tracing::debug!(
        student,
        friends_of_friends = reach.at_depth(FRIEND_OF_FRIEND_DEPTH).len(),
        recommended = candidates.len(),
        "computed recommendations"
    );
    candidates
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Query entry points over a [`GraphSource`].
//!
//! Each call takes a fresh snapshot, computes, and drops the snapshot, so
//! results always reflect the source's state at call time (friendships added
//! or removed, students deleted) without any invalidation logic.

use std::collections::BTreeSet;
use std::time::Instant;

use crate::config::AnalyticsConfig;
use crate::error::Result;
use crate::graph::bfs::distance_between;
use crate::graph::recommend::recommend;
use crate::graph::separation::{
    pairs_at_least, CancellationToken, SeparationOptions, DEFAULT_SEPARATION_THRESHOLD,
};
use crate::graph::snapshot::GraphSnapshot;
use crate::graph::source::GraphSource;
use crate::observability::QueryStats;
use crate::types::{Student, StudentId, StudentIdPair};

/// Social-graph analytics bound to one data source.
#[derive(Debug, Clone)]
pub struct Analytics<S> {
    source: S,
    config: AnalyticsConfig,
}

impl<S: GraphSource> Analytics<S> {
    /// Bind to `source` with default settings.
    pub fn new(source: S) -> Self {
        Self::with_config(source, AnalyticsConfig::default())
    }

    pub fn with_config(source: S, config: AnalyticsConfig) -> Self {
        Self { source, config }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Materialize the source's current state.
    pub fn snapshot(&self) -> Result<GraphSnapshot> {
        GraphSnapshot::from_source(&self.source)
    }

    // -------------------------------------------------------------------
    // Recommendations
    // -------------------------------------------------------------------

    /// Friends-of-friends of `student` who share a group with them,
    /// ascending by id. Unknown students get an empty list.
    pub fn recommend(&self, student: StudentId) -> Result<Vec<StudentId>> {
        Ok(self.recommend_with_stats(student)?.0)
    }

    /// [`Analytics::recommend`] plus timing and size statistics.
    pub fn recommend_with_stats(
        &self,
        student: StudentId,
    ) -> Result<(Vec<StudentId>, QueryStats)> {
        let started = Instant::now();
        if student <= 0 {
            return Ok((Vec::new(), QueryStats::empty("recommend", started)));
        }
        let snapshot = self.snapshot()?;
        if !snapshot.contains(student) {
            tracing::debug!(student, "no recommendations for unknown student");
            return Ok((Vec::new(), QueryStats::finish("recommend", &snapshot, 0, 0, started)));
        }
        let ids = recommend(&snapshot, student);
        let stats = QueryStats::finish("recommend", &snapshot, 1, ids.len(), started);
        Ok((ids, stats))
    }

    /// Recommendations resolved to full student profiles.
    pub fn recommend_profiles(&self, student: StudentId) -> Result<Vec<Student>> {
        let ids = self.recommend(student)?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.source.students_by_ids(&ids)
    }

    // -------------------------------------------------------------------
    // Separation
    // -------------------------------------------------------------------

    /// Pairs at distance at least 5.
    pub fn pairs_at_least_5(&self) -> Result<BTreeSet<StudentIdPair>> {
        self.pairs_at_least(DEFAULT_SEPARATION_THRESHOLD, None)
    }

    /// Pairs at the configured separation threshold.
    pub fn remote_pairs(&self) -> Result<BTreeSet<StudentIdPair>> {
        self.pairs_at_least(self.config.separation_threshold, None)
    }

    /// Pairs at distance at least `threshold`, optionally cancellable.
    pub fn pairs_at_least(
        &self,
        threshold: u32,
        cancel: Option<CancellationToken>,
    ) -> Result<BTreeSet<StudentIdPair>> {
        Ok(self.pairs_at_least_with_stats(threshold, cancel)?.0)
    }

    /// [`Analytics::pairs_at_least`] plus timing and size statistics.
    pub fn pairs_at_least_with_stats(
        &self,
        threshold: u32,
        cancel: Option<CancellationToken>,
    ) -> Result<(BTreeSet<StudentIdPair>, QueryStats)> {
        let started = Instant::now();
        let snapshot = self.snapshot()?;
        let options = SeparationOptions {
            parallel: self.config.parallel,
            worker_threads: self.config.worker_threads,
            cancel,
        };
        let pairs = pairs_at_least(&snapshot, threshold, &options)?;
        let stats = QueryStats::finish(
            "pairs_at_least",
            &snapshot,
            snapshot.vertex_count(),
            pairs.len(),
            started,
        );
        Ok((pairs, stats))
    }

    /// Shortest-path hop count between two students, `None` if either is
    /// unknown or they are not connected.
    pub fn degree_of_separation(&self, a: StudentId, b: StudentId) -> Result<Option<u32>> {
        let snapshot = self.snapshot()?;
        Ok(distance_between(&snapshot, a, b))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

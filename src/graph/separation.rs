//! Degree-of-separation queries: every pair of students whose shortest
//! friendship path is at least some threshold long.
//!
//! One unbounded BFS per vertex gives O(V·(V+E)) time and O(V) memory per
//! run. Runs are independent, so they fan out over a rayon pool and their
//! per-source results are merged by canonical pair. Students in different
//! connected components have no finite distance and are never reported.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;

use crate::error::{Result, SocialGraphError};
use crate::graph::bfs::bfs_from;
use crate::graph::snapshot::GraphSnapshot;
use crate::types::{StudentId, StudentIdPair};

/// Threshold used by the "remotely connected pairs" query.
pub const DEFAULT_SEPARATION_THRESHOLD: u32 = 5;

// ---------------------------------------------------------------------------
// Cancellation
// ---------------------------------------------------------------------------

/// Cooperative cancellation flag shared between a caller and a running
/// query. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Execution knobs for [`pairs_at_least`]. None of them change the result.
#[derive(Debug, Clone)]
pub struct SeparationOptions {
    /// Fan the per-vertex BFS runs out over rayon.
    pub parallel: bool,
    /// Size of a dedicated pool; `None` uses rayon's global pool.
    pub worker_threads: Option<usize>,
    /// Checked before each per-vertex BFS.
    pub cancel: Option<CancellationToken>,
}

impl Default for SeparationOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            worker_threads: None,
            cancel: None,
        }
    }
}

impl SeparationOptions {
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    pub fn with_cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    fn check_cancelled(&self) -> Result<()> {
        match &self.cancel {
            Some(token) if token.is_cancelled() => Err(SocialGraphError::Cancelled),
            _ => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// All canonical pairs `(a, b)`, `a > b`, whose finite shortest-path
/// distance is `>= threshold`.
///
/// Returns [`SocialGraphError::Cancelled`] if the token fires before every
/// source has been processed; partial results are dropped.
pub fn pairs_at_least(
    snapshot: &GraphSnapshot,
    threshold: u32,
    options: &SeparationOptions,
) -> Result<BTreeSet<StudentIdPair>> {
    let started = std::time::Instant::now();
    let sources: Vec<StudentId> = snapshot.vertices().collect();

    let per_source = sweep(&sources, options, |source| {
        pairs_from(snapshot, source, threshold)
    })?;

    let pairs: BTreeSet<StudentIdPair> = per_source.into_iter().flatten().collect();
    tracing::debug!(
        threshold,
        sources = sources.len(),
        pairs = pairs.len(),
        parallel = options.parallel,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "computed separation pairs"
    );
    Ok(pairs)
}

/// Pairs at distance `>= threshold` that `source` is the larger endpoint of.
///
/// Distance is symmetric, so emitting only from the larger endpoint covers
/// every qualifying pair exactly once across a full sweep.
pub fn pairs_from(
    snapshot: &GraphSnapshot,
    source: StudentId,
    threshold: u32,
) -> Vec<StudentIdPair> {
    let reach = bfs_from(snapshot, source, None);
    reach
        .iter()
        .filter(|&(other, distance)| distance >= threshold && other < source)
        .filter_map(|(other, _)| StudentIdPair::canonical(source, other))
        .collect()
}

/// Run `visit` once per source, checking the cancellation token before
/// each run. The first cancelled check aborts the sweep and drops whatever
/// was already collected.
fn sweep<F>(
    sources: &[StudentId],
    options: &SeparationOptions,
    visit: F,
) -> Result<Vec<Vec<StudentIdPair>>>
where
    F: Fn(StudentId) -> Vec<StudentIdPair> + Sync,
{
    let step = |source: StudentId| -> Result<Vec<StudentIdPair>> {
        options.check_cancelled()?;
        Ok(visit(source))
    };

    if !options.parallel {
        return sources.iter().map(|&source| step(source)).collect();
    }

    let fan_out = || {
        sources
            .par_iter()
            .map(|&source| step(source))
            .collect::<Result<Vec<_>>>()
    };
    match options.worker_threads {
        Some(threads) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|e| {
                    SocialGraphError::Config(format!("cannot build worker pool: {e}"))
                })?;
            pool.install(fan_out)
        }
        None => fan_out(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Structured logging and per-query statistics.
//!
//! - [`init_logging`] one-time `tracing` setup with `RUST_LOG` support
//! - [`QueryStats`] size and timing of a single analytics query

use std::time::Instant;

use serde::Serialize;
use tracing_subscriber::EnvFilter;

use crate::graph::snapshot::GraphSnapshot;

/// Initialize structured logging with `RUST_LOG` environment variable support.
///
/// Defaults to `socialgraph=info` when `RUST_LOG` is not set. Logs go to
/// stderr so JSON written to stdout by the CLI stays machine-readable.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("socialgraph=info"));

    // try_init so double-init in tests doesn't panic
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init();
}

/// What one analytics query cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryStats {
    pub query: &'static str,
    pub vertices: usize,
    pub edges: usize,
    pub bfs_runs: usize,
    pub results: usize,
    pub elapsed_ms: u64,
}

impl QueryStats {
    /// Stats for a query that finished against `snapshot`. Also emits a
    /// debug event.
    pub fn finish(
        query: &'static str,
        snapshot: &GraphSnapshot,
        bfs_runs: usize,
        results: usize,
        started: Instant,
    ) -> Self {
        let stats = Self {
            query,
            vertices: snapshot.vertex_count(),
            edges: snapshot.edge_count(),
            bfs_runs,
            results,
            elapsed_ms: started.elapsed().as_millis() as u64,
        };
        tracing::debug!(
            query,
            vertices = stats.vertices,
            edges = stats.edges,
            bfs_runs,
            results,
            elapsed_ms = stats.elapsed_ms,
            "analytics query finished"
        );
        stats
    }

    /// Stats for a query answered without building a snapshot.
    pub fn empty(query: &'static str, started: Instant) -> Self {
        Self {
            query,
            vertices: 0,
            edges: 0,
            bfs_runs: 0,
            results: 0,
            elapsed_ms: started.elapsed().as_millis() as u64,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

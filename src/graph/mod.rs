//! Graph layer: SQLite-backed student store, snapshots, and traversal.

pub mod bfs;
pub mod recommend;
pub mod separation;
pub mod snapshot;
pub mod source;
pub mod store;

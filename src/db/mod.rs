//! Database layer: SQLite schema for the student network.

pub mod schema;

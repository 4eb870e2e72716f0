//! Social-graph analytics over a friendship network of students.
//!
//! Builds an undirected friendship snapshot from a [`graph::source::GraphSource`]
//! and answers "people you may know" recommendations and degree-of-separation
//! queries against it. [`graph::store::SocialStore`] is the SQLite-backed source.

pub mod analytics;
pub mod config;
pub mod db;
pub mod error;
pub mod graph;
pub mod observability;
pub mod types;

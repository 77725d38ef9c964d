//! Folio Core Components
//!
//! This crate provides the engine entry point for Folio: configuration,
//! query types, built-tree handles and operation metrics on top of the
//! indexer and the task coordinator.

mod config;
mod engine;
mod error;
mod metrics;
mod query;
mod tree;

pub use config::{Backend, EngineConfig};
pub use engine::{build_and_query, Engine};
pub use error::CoreError;
pub use metrics::EngineMetrics;
pub use query::{QueryKind, QueryResult};
pub use tree::Tree;

pub use folio_indexer::{Document, DocumentPredicate, Entry, IndexerError};

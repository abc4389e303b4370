//! The ingredient knowledge base and candidate resolution.
//!
//! - [`base`] — the immutable, ordered [`KnowledgeBase`] table, JSON loading and browsing.
//! - [`matcher`] — tiered resolution of a candidate to at most one record.
//! - [`snapshot`] — [`KnowledgeStore`], copy-on-write publication of new tables.
//! - [`remote`] — fetching a table from an HTTP tables endpoint.

pub mod base;
pub mod matcher;
pub mod remote;
pub mod snapshot;

pub use base::{IngredientQuery, KnowledgeBase};
pub use snapshot::KnowledgeStore;

//! `label-checkr` — assess the health risk of a product from its recognized label text.
//!
//! # Flow
//! 1. Normalize the text into candidate ingredient names ([`normalizer`]).
//! 2. Resolve each candidate against a [`KnowledgeBase`] snapshot ([`knowledge::matcher`]).
//! 3. Score the matches for humans and animals ([`scoring`]).
//! 4. Infer the product category ([`category`]).
//! 5. Emit rule-based recommendations ([`recommend`]).
//!
//! [`Analyzer`] runs the whole pipeline and returns an immutable [`AnalysisResult`]. It does
//! no I/O; loading tables ([`knowledge`]), configuration ([`config`]), persistence
//! projections ([`record`]) and rendering ([`report`]) live around it.

pub mod analysis;
pub mod category;
pub mod config;
pub mod error;
pub mod knowledge;
pub mod models;
pub mod normalizer;
pub mod recommend;
pub mod record;
pub mod report;
pub mod scoring;

pub use analysis::{AnalysisConfig, Analyzer};
pub use error::{EngineError, KnowledgeBaseError};
pub use knowledge::{IngredientQuery, KnowledgeBase, KnowledgeStore};
pub use models::{
    AnalysisResult, IngredientRecord, MatchedIngredient, Recommendation, RecommendationKind,
    RiskLevel,
};
pub use record::AnalysisRecord;

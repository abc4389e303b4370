use serde::{Deserialize, Serialize};

use crate::models::{AnalysisResult, Recommendation};

pub const DEFAULT_PRODUCT_NAME: &str = "Scanned product";

/// Flat, storage-ready projection of an [`AnalysisResult`].
///
/// Ingredient records are reduced to their names; the full text that was analyzed is kept
/// so the analysis can be replayed. The timestamp comes from the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub product_name: String,
    pub category: String,
    pub ingredients_text: String,
    pub ingredients_detected: Vec<String>,
    pub risk_score: u8,
    pub health_score_human: u8,
    pub health_score_animal: u8,
    pub harmful_ingredients: Vec<String>,
    pub beneficial_ingredients: Vec<String>,
    pub recommendations: Vec<Recommendation>,
    /// Unix time in milliseconds.
    pub analysis_date: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl AnalysisRecord {
    pub fn new(result: &AnalysisResult, full_text: &str, analysis_date: u64) -> Self {
        Self {
            product_name: DEFAULT_PRODUCT_NAME.to_string(),
            category: result.product_category.clone(),
            ingredients_text: full_text.to_string(),
            ingredients_detected: result.candidates.clone(),
            risk_score: result.risk_score,
            health_score_human: result.health_score_human,
            health_score_animal: result.health_score_animal,
            harmful_ingredients: result.harmful.iter().map(|r| r.name.clone()).collect(),
            beneficial_ingredients: result.beneficial.iter().map(|r| r.name.clone()).collect(),
            recommendations: result.recommendations.clone(),
            analysis_date,
            session_id: None,
        }
    }

    pub fn with_product_name(mut self, name: impl Into<String>) -> Self {
        self.product_name = name.into();
        self
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }
}

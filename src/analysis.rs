//! The analysis pipeline: normalize → match → partition → score → categorize → recommend.

use serde::Deserialize;
use tracing::debug;

use crate::category::CategoryTable;
use crate::error::EngineError;
use crate::knowledge::matcher;
use crate::knowledge::KnowledgeBase;
use crate::models::{AnalysisResult, IngredientRecord, MatchedIngredient};
use crate::normalizer::{TextConfig, TextNormalizer};
use crate::recommend::{recommend, Assessment, Thresholds};
use crate::scoring::{RiskScorer, RiskWeights};

/// Engine settings. Every table has a built-in default, so an empty config is valid.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub text: TextConfig,
    pub weights: RiskWeights,
    pub categories: CategoryTable,
    pub thresholds: Thresholds,
}

/// Runs analyses against caller-supplied knowledge-base snapshots.
///
/// Holds no per-analysis state; one instance can serve concurrent callers.
pub struct Analyzer {
    normalizer: TextNormalizer,
    scorer: RiskScorer,
    categories: CategoryTable,
    thresholds: Thresholds,
}

impl Analyzer {
    pub fn new(config: &AnalysisConfig) -> Result<Self, EngineError> {
        Ok(Self {
            normalizer: TextNormalizer::new(&config.text)?,
            scorer: RiskScorer::new(config.weights.clone()),
            categories: config.categories.clone(),
            thresholds: config.thresholds.clone(),
        })
    }

    pub fn analyze(&self, full_text: &str, kb: &KnowledgeBase) -> AnalysisResult {
        let normalized = self.normalizer.normalize(full_text);
        debug!(candidates = normalized.candidates.len(), "normalized label text");

        let mut matched = Vec::new();
        let mut unknown = Vec::new();
        for candidate in &normalized.candidates {
            match matcher::resolve(candidate, kb) {
                Some(record) => matched.push(MatchedIngredient {
                    candidate: candidate.clone(),
                    ingredient: record.clone(),
                }),
                None => unknown.push(candidate.clone()),
            }
        }

        let harmful: Vec<IngredientRecord> = matched
            .iter()
            .filter(|m| m.ingredient.is_harmful())
            .map(|m| m.ingredient.clone())
            .collect();
        let beneficial: Vec<IngredientRecord> = matched
            .iter()
            .filter(|m| m.ingredient.is_beneficial())
            .map(|m| m.ingredient.clone())
            .collect();

        let scores = self.scorer.score(&matched);
        let product_category = self.categories.categorize(&normalized.cleaned).to_string();

        let recommendations = recommend(&Assessment {
            harmful: &harmful,
            unknown: &unknown,
            scores,
            thresholds: &self.thresholds,
        });

        debug!(
            matched = matched.len(),
            unknown = unknown.len(),
            risk = scores.risk,
            category = %product_category,
            "analysis complete"
        );

        AnalysisResult {
            candidates: normalized.candidates,
            matched,
            unknown,
            harmful,
            beneficial,
            risk_score: scores.risk,
            health_score_human: scores.human,
            health_score_animal: scores.animal,
            recommendations,
            product_category,
        }
    }
}

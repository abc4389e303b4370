//! Numeric risk and health indicators for a set of matched ingredients.

use serde::{Deserialize, Serialize};

use crate::models::{MatchedIngredient, RiskLevel};
use crate::normalizer::fold;

/// Risk weight per level. Defaults: 0 / 1 / 3 / 7 / 10, and 5 for an unrecognized level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskWeights {
    pub very_safe: u32,
    pub safe: u32,
    pub moderate: u32,
    pub high_risk: u32,
    pub dangerous: u32,
    pub unrecognized: u32,
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            very_safe: 0,
            safe: 1,
            moderate: 3,
            high_risk: 7,
            dangerous: 10,
            unrecognized: 5,
        }
    }
}

impl RiskWeights {
    pub fn weight(&self, level: Option<&RiskLevel>) -> u32 {
        match level {
            Some(RiskLevel::VerySafe) => self.very_safe,
            Some(RiskLevel::Safe) => self.safe,
            Some(RiskLevel::Moderate) => self.moderate,
            Some(RiskLevel::HighRisk) => self.high_risk,
            Some(RiskLevel::Dangerous) => self.dangerous,
            Some(RiskLevel::Unrecognized(_)) | None => self.unrecognized,
        }
    }
}

/// Animal-impact keyword families, checked in order against the folded impact text.
/// The first family with a hit decides the penalty.
pub const ANIMAL_IMPACT_FAMILIES: &[(&[&str], u32)] = &[
    (&["toxico", "toxic", "peligroso", "dangerous"], 30),
    (&["moderado", "moderate", "precaucion", "caution"], 15),
    (&["seguro", "safe", "beneficioso", "beneficial"], 0),
];

/// Penalty when the impact text names none of the families.
pub const UNKNOWN_ANIMAL_IMPACT_PENALTY: u32 = 5;

/// Keywords marking an ingredient as toxic to animals.
pub const TOXICITY_KEYWORDS: &[&str] = &["toxico", "toxic"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthScores {
    pub risk: u8,
    pub human: u8,
    pub animal: u8,
}

#[derive(Debug, Clone, Default)]
pub struct RiskScorer {
    weights: RiskWeights,
}

impl RiskScorer {
    pub fn new(weights: RiskWeights) -> Self {
        Self { weights }
    }

    pub fn score(&self, matched: &[MatchedIngredient]) -> HealthScores {
        let risk = self.risk_score(matched);
        HealthScores {
            risk,
            human: 100 - risk,
            animal: animal_score(matched),
        }
    }

    /// Mean weight × 10, rounded and capped at 100. Zero with no matches.
    pub fn risk_score(&self, matched: &[MatchedIngredient]) -> u8 {
        if matched.is_empty() {
            return 0;
        }
        let total: u64 = matched
            .iter()
            .map(|m| u64::from(self.weights.weight(m.ingredient.risk_level.as_ref())))
            .sum();
        let mean = total as f64 / matched.len() as f64;
        (mean * 10.0).min(100.0).round() as u8
    }
}

/// Starts at 100 and loses the family penalty of each matched ingredient, floored at 0.
pub fn animal_score(matched: &[MatchedIngredient]) -> u8 {
    let score = matched.iter().fold(100u32, |score, m| {
        score.saturating_sub(animal_penalty(&m.ingredient.health_impact_animal))
    });
    score as u8
}

pub fn animal_penalty(impact: &str) -> u32 {
    let impact = fold(impact);
    ANIMAL_IMPACT_FAMILIES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| impact.contains(k)))
        .map(|(_, penalty)| *penalty)
        .unwrap_or(UNKNOWN_ANIMAL_IMPACT_PENALTY)
}

pub fn is_toxic_to_animals(impact: &str) -> bool {
    let impact = fold(impact);
    TOXICITY_KEYWORDS.iter().any(|k| impact.contains(k))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IngredientRecord;

    fn matched(level: &str, animal: &str) -> MatchedIngredient {
        MatchedIngredient {
            candidate: "x".to_string(),
            ingredient: IngredientRecord {
                name: "x".to_string(),
                risk_level: Some(RiskLevel::from(level.to_string())),
                health_impact_animal: animal.to_string(),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_no_matches_scores_clean() {
        let scores = RiskScorer::default().score(&[]);
        assert_eq!(scores, HealthScores { risk: 0, human: 100, animal: 100 });
    }

    #[test]
    fn test_risk_is_mean_weight_times_ten() {
        let scorer = RiskScorer::default();
        assert_eq!(scorer.risk_score(&[matched("seguro", "")]), 10);
        assert_eq!(scorer.risk_score(&[matched("peligroso", "")]), 100);
        // (1 + 3 + 7) / 3 * 10 = 36.67
        let set = [matched("seguro", ""), matched("moderado", ""), matched("alto_riesgo", "")];
        assert_eq!(scorer.risk_score(&set), 37);
    }

    #[test]
    fn test_unrecognized_level_weighs_five() {
        assert_eq!(RiskScorer::default().risk_score(&[matched("desconocido", "")]), 50);
    }

    #[test]
    fn test_risk_capped_at_hundred_with_custom_weights() {
        let scorer = RiskScorer::new(RiskWeights {
            dangerous: 40,
            ..Default::default()
        });
        let scores = scorer.score(&[matched("peligroso", "")]);
        assert_eq!(scores.risk, 100);
        assert_eq!(scores.human, 0);
    }

    #[test]
    fn test_animal_penalties_by_family() {
        assert_eq!(animal_penalty("Altamente TÓXICO para perros"), 30);
        assert_eq!(animal_penalty("Use with caution"), 15);
        assert_eq!(animal_penalty("Seguro para mascotas"), 0);
        assert_eq!(animal_penalty(""), 5);
        // first family wins even when a later one also appears
        assert_eq!(animal_penalty("no es seguro: tóxico"), 30);
    }

    #[test]
    fn test_animal_score_floors_at_zero() {
        let set: Vec<_> = (0..5).map(|_| matched("peligroso", "tóxico")).collect();
        assert_eq!(animal_score(&set), 0);
        assert_eq!(animal_score(&[matched("seguro", "sin datos")]), 95);
    }

    #[test]
    fn test_toxicity_detection_ignores_accents() {
        assert!(is_toxic_to_animals("Tóxico para gatos"));
        assert!(is_toxic_to_animals("toxic to dogs"));
        assert!(!is_toxic_to_animals("peligroso en exceso"));
    }
}

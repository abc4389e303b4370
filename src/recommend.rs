//! Rule-based advisory entries.
//!
//! Each rule looks at an [`Assessment`] and emits at most one [`Recommendation`]. Rules
//! are independent and always evaluated in [`RULES`] order, so adding or removing one
//! never touches scoring.

use serde::{Deserialize, Serialize};

use crate::models::{IngredientRecord, Recommendation, RecommendationKind};
use crate::scoring::{is_toxic_to_animals, HealthScores};

/// Score thresholds used by the band and pet-safety rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Human score below this is "not recommended".
    pub human_danger_below: u8,
    /// Human score below this (and not below `human_danger_below`) means moderation.
    pub human_warning_below: u8,
    /// Animal score at or below this raises the pet-safety alert.
    pub animal_alert_at_or_below: u8,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            human_danger_below: 60,
            human_warning_below: 80,
            animal_alert_at_or_below: 70,
        }
    }
}

/// What the rules see: the scored, partitioned state of one analysis.
pub struct Assessment<'a> {
    pub harmful: &'a [IngredientRecord],
    pub unknown: &'a [String],
    pub scores: HealthScores,
    pub thresholds: &'a Thresholds,
}

pub type Rule = fn(&Assessment<'_>) -> Option<Recommendation>;

pub const RULES: &[Rule] = &[
    harmful_ingredients,
    human_health_band,
    pet_safety_alert,
    toxic_to_pets,
    unidentified_ingredients,
];

pub fn recommend(assessment: &Assessment<'_>) -> Vec<Recommendation> {
    RULES.iter().filter_map(|rule| rule(assessment)).collect()
}

fn harmful_ingredients(a: &Assessment<'_>) -> Option<Recommendation> {
    if a.harmful.is_empty() {
        return None;
    }
    Some(
        Recommendation::new(
            RecommendationKind::Warning,
            "Harmful ingredients detected",
            format!(
                "Found {} ingredient{} with high or dangerous risk.",
                a.harmful.len(),
                plural(a.harmful.len())
            ),
        )
        .with_ingredients(names(a.harmful.iter())),
    )
}

fn human_health_band(a: &Assessment<'_>) -> Option<Recommendation> {
    let human = a.scores.human;
    let rec = if human < a.thresholds.human_danger_below {
        Recommendation::new(
            RecommendationKind::Danger,
            "Product not recommended",
            "This product contains several ingredients that are harmful to human health.",
        )
    } else if human < a.thresholds.human_warning_below {
        Recommendation::new(
            RecommendationKind::Warning,
            "Consume in moderation",
            "This product should be consumed in moderation because of some risky ingredients.",
        )
    } else {
        Recommendation::new(
            RecommendationKind::Success,
            "Relatively safe product",
            "Most ingredients are safe for human consumption.",
        )
    };
    Some(rec)
}

fn pet_safety_alert(a: &Assessment<'_>) -> Option<Recommendation> {
    (a.scores.animal <= a.thresholds.animal_alert_at_or_below).then(|| {
        Recommendation::new(
            RecommendationKind::Danger,
            "Not suitable for pets",
            "This product contains ingredients that are toxic to animals. Keep it out of reach of pets.",
        )
    })
}

fn toxic_to_pets(a: &Assessment<'_>) -> Option<Recommendation> {
    let toxic: Vec<String> = names(
        a.harmful
            .iter()
            .filter(|r| is_toxic_to_animals(&r.health_impact_animal)),
    );
    if toxic.is_empty() {
        return None;
    }
    Some(
        Recommendation::new(
            RecommendationKind::Danger,
            "Toxic to pets",
            format!("Ingredients especially dangerous for animals: {}", toxic.join(", ")),
        )
        .with_ingredients(toxic),
    )
}

fn unidentified_ingredients(a: &Assessment<'_>) -> Option<Recommendation> {
    let count = a.unknown.len();
    (count > 0).then(|| {
        Recommendation::new(
            RecommendationKind::Info,
            "Unidentified ingredients",
            format!(
                "{} ingredient{} could not be identified in the knowledge base.",
                count,
                plural(count)
            ),
        )
        .with_ingredients(a.unknown.to_vec())
    })
}

fn names<'a>(records: impl Iterator<Item = &'a IngredientRecord>) -> Vec<String> {
    records.map(|r| r.name.clone()).collect()
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RiskLevel;

    fn record(name: &str, level: RiskLevel, animal: &str) -> IngredientRecord {
        IngredientRecord {
            name: name.to_string(),
            risk_level: Some(level),
            health_impact_animal: animal.to_string(),
            ..Default::default()
        }
    }

    fn run(harmful: &[IngredientRecord], unknown: &[String], human: u8, animal: u8) -> Vec<Recommendation> {
        let thresholds = Thresholds::default();
        recommend(&Assessment {
            harmful,
            unknown,
            scores: HealthScores {
                risk: 100 - human,
                human,
                animal,
            },
            thresholds: &thresholds,
        })
    }

    fn kinds(recs: &[Recommendation]) -> Vec<RecommendationKind> {
        recs.iter().map(|r| r.kind).collect()
    }

    #[test]
    fn test_clean_product_gets_single_success() {
        let recs = run(&[], &[], 100, 100);
        assert_eq!(kinds(&recs), vec![RecommendationKind::Success]);
    }

    #[test]
    fn test_health_bands() {
        assert_eq!(run(&[], &[], 59, 100)[0].kind, RecommendationKind::Danger);
        assert_eq!(run(&[], &[], 60, 100)[0].kind, RecommendationKind::Warning);
        assert_eq!(run(&[], &[], 79, 100)[0].kind, RecommendationKind::Warning);
        assert_eq!(run(&[], &[], 80, 100)[0].kind, RecommendationKind::Success);
    }

    #[test]
    fn test_pet_alert_threshold_is_inclusive() {
        assert_eq!(run(&[], &[], 100, 70).len(), 2);
        assert_eq!(run(&[], &[], 100, 71).len(), 1);
    }

    #[test]
    fn test_all_rules_fire_in_declared_order() {
        let harmful = vec![
            record("Teobromina", RiskLevel::Dangerous, "Tóxico para perros"),
            record("Nitrito", RiskLevel::HighRisk, "moderado"),
        ];
        let unknown = vec!["agua".to_string(), "harina".to_string()];
        let recs = run(&harmful, &unknown, 15, 55);

        assert_eq!(
            kinds(&recs),
            vec![
                RecommendationKind::Warning,
                RecommendationKind::Danger,
                RecommendationKind::Danger,
                RecommendationKind::Danger,
                RecommendationKind::Info,
            ]
        );
        assert_eq!(
            recs[0].ingredients.as_deref(),
            Some(&["Teobromina".to_string(), "Nitrito".to_string()][..])
        );
        assert!(recs[0].message.contains("2 ingredients"));
        assert_eq!(recs[3].title, "Toxic to pets");
        assert_eq!(recs[3].ingredients, Some(vec!["Teobromina".to_string()]));
        assert!(recs[4].message.starts_with("2 ingredients"));
    }

    #[test]
    fn test_toxic_rule_only_considers_harmful_ingredients() {
        let recs = run(&[], &[], 90, 70);
        assert!(recs.iter().all(|r| r.title != "Toxic to pets"));
    }
}

use serde::{Deserialize, Serialize};

/// A knowledge-base entry describing one ingredient.
///
/// Field names follow the ingredient table wire format. Every field except `name` and
/// `risk_level` falls back to an empty value when absent; records missing either of those
/// two are kept in the table but never matched (see [`IngredientRecord::is_well_formed`]).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IngredientRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub alternative_names: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub e_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cas_number: Option<String>,
    #[serde(default)]
    pub risk_level: Option<RiskLevel>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub health_impact_human: String,
    #[serde(default)]
    pub health_impact_animal: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_daily_intake: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub banned_countries: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl IngredientRecord {
    /// A record can take part in matching only with a canonical name and a risk level.
    pub fn is_well_formed(&self) -> bool {
        !self.name.trim().is_empty() && self.risk_level.is_some()
    }

    pub fn is_harmful(&self) -> bool {
        self.risk_level.as_ref().is_some_and(RiskLevel::is_harmful)
    }

    pub fn is_beneficial(&self) -> bool {
        self.risk_level.as_ref().is_some_and(RiskLevel::is_beneficial)
    }
}

/// Risk level of an ingredient.
///
/// The wire values are the Spanish identifiers used by the ingredient table
/// (`muy_seguro` … `peligroso`); English spellings are accepted on input. Anything else is
/// kept verbatim as [`RiskLevel::Unrecognized`] so it survives a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RiskLevel {
    VerySafe,
    Safe,
    Moderate,
    HighRisk,
    Dangerous,
    Unrecognized(String),
}

impl RiskLevel {
    /// The five recognized levels, safest first.
    pub const ALL: [RiskLevel; 5] = [
        RiskLevel::VerySafe,
        RiskLevel::Safe,
        RiskLevel::Moderate,
        RiskLevel::HighRisk,
        RiskLevel::Dangerous,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            RiskLevel::VerySafe => "muy_seguro",
            RiskLevel::Safe => "seguro",
            RiskLevel::Moderate => "moderado",
            RiskLevel::HighRisk => "alto_riesgo",
            RiskLevel::Dangerous => "peligroso",
            RiskLevel::Unrecognized(raw) => raw,
        }
    }

    /// Parse one of the five recognized levels (or an English alias); `None` otherwise.
    pub fn recognized(raw: &str) -> Option<Self> {
        match RiskLevel::from(raw.to_string()) {
            RiskLevel::Unrecognized(_) => None,
            level => Some(level),
        }
    }

    pub fn is_harmful(&self) -> bool {
        matches!(self, RiskLevel::HighRisk | RiskLevel::Dangerous)
    }

    pub fn is_beneficial(&self) -> bool {
        matches!(self, RiskLevel::VerySafe | RiskLevel::Safe)
    }
}

impl From<String> for RiskLevel {
    fn from(raw: String) -> Self {
        match raw.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "muy_seguro" | "very_safe" => RiskLevel::VerySafe,
            "seguro" | "safe" => RiskLevel::Safe,
            "moderado" | "moderate" => RiskLevel::Moderate,
            "alto_riesgo" | "high_risk" => RiskLevel::HighRisk,
            "peligroso" | "dangerous" => RiskLevel::Dangerous,
            _ => RiskLevel::Unrecognized(raw),
        }
    }
}

impl From<RiskLevel> for String {
    fn from(level: RiskLevel) -> Self {
        match level {
            RiskLevel::Unrecognized(raw) => raw,
            other => other.as_str().to_string(),
        }
    }
}

impl std::str::FromStr for RiskLevel {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(RiskLevel::from(s.to_string()))
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::VerySafe => write!(f, "Very safe"),
            RiskLevel::Safe => write!(f, "Safe"),
            RiskLevel::Moderate => write!(f, "Moderate"),
            RiskLevel::HighRisk => write!(f, "High risk"),
            RiskLevel::Dangerous => write!(f, "Dangerous"),
            RiskLevel::Unrecognized(raw) => write!(f, "Unrecognized ({})", raw),
        }
    }
}

/// A candidate that resolved to a knowledge-base record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedIngredient {
    pub candidate: String,
    pub ingredient: IngredientRecord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationKind {
    Success,
    Warning,
    Danger,
    Info,
}

impl std::fmt::Display for RecommendationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecommendationKind::Success => write!(f, "success"),
            RecommendationKind::Warning => write!(f, "warning"),
            RecommendationKind::Danger => write!(f, "danger"),
            RecommendationKind::Info => write!(f, "info"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    pub title: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<String>>,
}

impl Recommendation {
    pub fn new(kind: RecommendationKind, title: &str, message: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.to_string(),
            message: message.into(),
            ingredients: None,
        }
    }

    pub fn with_ingredients(mut self, names: Vec<String>) -> Self {
        self.ingredients = Some(names);
        self
    }
}

/// Output of one analysis. Built once by [`crate::analysis::Analyzer`] and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub candidates: Vec<String>,
    pub matched: Vec<MatchedIngredient>,
    pub unknown: Vec<String>,
    pub harmful: Vec<IngredientRecord>,
    pub beneficial: Vec<IngredientRecord>,
    pub risk_score: u8,
    pub health_score_human: u8,
    pub health_score_animal: u8,
    pub recommendations: Vec<Recommendation>,
    pub product_category: String,
}

impl AnalysisResult {
    pub fn has_danger(&self) -> bool {
        self.recommendations
            .iter()
            .any(|r| r.kind == RecommendationKind::Danger)
    }

    /// `(candidate, record id)` pairs, the compact form of `matched`.
    pub fn matched_ids(&self) -> Vec<(&str, &str)> {
        self.matched
            .iter()
            .map(|m| (m.candidate.as_str(), m.ingredient.id.as_str()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_level_parses_both_spellings() {
        assert_eq!(RiskLevel::from("peligroso".to_string()), RiskLevel::Dangerous);
        assert_eq!(RiskLevel::from("High-Risk".to_string()), RiskLevel::HighRisk);
        assert_eq!(RiskLevel::from("muy seguro".to_string()), RiskLevel::VerySafe);
    }

    #[test]
    fn test_recognized_rejects_unknown_levels() {
        assert_eq!(RiskLevel::recognized("alto_riesgo"), Some(RiskLevel::HighRisk));
        assert_eq!(RiskLevel::recognized("Dangerous"), Some(RiskLevel::Dangerous));
        assert_eq!(RiskLevel::recognized("toxic"), None);
    }

    #[test]
    fn test_unrecognized_level_is_preserved() {
        let level: RiskLevel = serde_json::from_str("\"desconocido\"").unwrap();
        assert_eq!(level, RiskLevel::Unrecognized("desconocido".to_string()));
        assert_eq!(serde_json::to_string(&level).unwrap(), "\"desconocido\"");
    }

    #[test]
    fn test_record_defaults_missing_fields() {
        let rec: IngredientRecord =
            serde_json::from_str(r#"{"name": "azucar", "risk_level": "seguro"}"#).unwrap();
        assert!(rec.is_well_formed());
        assert!(rec.is_beneficial());
        assert!(rec.alternative_names.is_empty());
        assert_eq!(rec.e_number, None);
    }

    #[test]
    fn test_record_without_risk_level_is_malformed() {
        let rec: IngredientRecord = serde_json::from_str(r#"{"name": "sal"}"#).unwrap();
        assert!(!rec.is_well_formed());
        assert!(!rec.is_harmful());
    }

    #[test]
    fn test_recommendation_kind_serialized_as_type() {
        let rec = Recommendation::new(RecommendationKind::Info, "t", "m");
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["type"], "info");
        assert!(json.get("ingredients").is_none());
    }
}

use crate::knowledge::base::{KnowledgeBase, MatchKeys};
use crate::models::IngredientRecord;
use crate::normalizer::fold;

/// One way a candidate can resolve to a record.
///
/// Tiers are tried in [`MatchTier::ORDER`]; the first tier with any hit wins, and within a
/// tier the first record in table order wins. There is no scoring across tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    /// Candidate equals the canonical name.
    CanonicalName,
    /// Candidate equals one of the alternative names.
    AlternativeName,
    /// Candidate contains the canonical name, or the canonical name contains the candidate.
    Containment,
    /// Candidate shaped `E` + 3–4 digits equals the E-number.
    ENumber,
}

impl MatchTier {
    pub const ORDER: [MatchTier; 4] = [
        MatchTier::CanonicalName,
        MatchTier::AlternativeName,
        MatchTier::Containment,
        MatchTier::ENumber,
    ];

    /// Whether this tier can apply to `candidate` at all. `candidate` is folded.
    pub fn applies_to(self, candidate: &str) -> bool {
        match self {
            MatchTier::ENumber => is_e_number(candidate),
            _ => !candidate.is_empty(),
        }
    }

    /// Tier predicate over folded keys.
    pub fn matches(self, candidate: &str, keys: &MatchKeys) -> bool {
        match self {
            MatchTier::CanonicalName => keys.name == candidate,
            MatchTier::AlternativeName => keys.alternatives.iter().any(|alt| alt == candidate),
            MatchTier::Containment => {
                candidate.contains(keys.name.as_str()) || keys.name.contains(candidate)
            }
            MatchTier::ENumber => keys.e_number.as_deref() == Some(candidate),
        }
    }
}

/// Resolve one candidate against the table.
pub fn resolve<'kb>(candidate: &str, kb: &'kb KnowledgeBase) -> Option<&'kb IngredientRecord> {
    resolve_with_tier(candidate, kb).map(|(record, _)| record)
}

/// Like [`resolve`], also reporting which tier produced the hit.
pub fn resolve_with_tier<'kb>(
    candidate: &str,
    kb: &'kb KnowledgeBase,
) -> Option<(&'kb IngredientRecord, MatchTier)> {
    let candidate = fold(candidate);
    MatchTier::ORDER
        .into_iter()
        .filter(|tier| tier.applies_to(&candidate))
        .find_map(|tier| {
            kb.matchable()
                .find(|(_, keys)| tier.matches(&candidate, keys))
                .map(|(record, _)| (record, tier))
        })
}

/// `e` followed by exactly 3 or 4 ASCII digits. Expects a lower-cased token.
fn is_e_number(token: &str) -> bool {
    token
        .strip_prefix('e')
        .is_some_and(|digits| (3..=4).contains(&digits.len()) && digits.bytes().all(|b| b.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kb(json: &str) -> KnowledgeBase {
        KnowledgeBase::from_json_str(json).unwrap()
    }

    #[test]
    fn test_exact_name_beats_earlier_containment() {
        // "sal" is contained in "sal marina" (first in table) but "sal" matches record 2 exactly.
        let kb = kb(r#"[
            {"id": "1", "name": "Sal marina", "risk_level": "seguro"},
            {"id": "2", "name": "Sal", "risk_level": "moderado"}
        ]"#);
        let (record, tier) = resolve_with_tier("sal", &kb).unwrap();
        assert_eq!(record.id, "2");
        assert_eq!(tier, MatchTier::CanonicalName);
    }

    #[test]
    fn test_alternative_name_beats_containment() {
        let kb = kb(r#"[
            {"id": "1", "name": "Jarabe de sacarosa", "risk_level": "moderado"},
            {"id": "2", "name": "Azucar", "alternative_names": ["Sacarosa"], "risk_level": "seguro"}
        ]"#);
        let (record, tier) = resolve_with_tier("sacarosa", &kb).unwrap();
        assert_eq!(record.id, "2");
        assert_eq!(tier, MatchTier::AlternativeName);
    }

    #[test]
    fn test_containment_is_bidirectional_and_first_in_table_wins() {
        let kb = kb(r#"[
            {"id": "1", "name": "Aceite de palma", "risk_level": "moderado"},
            {"id": "2", "name": "Palma", "risk_level": "seguro"}
        ]"#);
        // candidate inside name
        assert_eq!(resolve("palm", &kb).unwrap().id, "1");
        // name inside candidate: record 1's name is not inside, record 2's is
        let (record, tier) = resolve_with_tier("grasa de palma refinada", &kb).unwrap();
        assert_eq!(record.id, "2");
        assert_eq!(tier, MatchTier::Containment);
    }

    #[test]
    fn test_e_number_tier() {
        let kb = kb(r#"[{"id": "1", "name": "Nitrito de sodio", "e_number": "E250", "risk_level": "alto_riesgo"}]"#);
        let (record, tier) = resolve_with_tier("E250", &kb).unwrap();
        assert_eq!(record.id, "1");
        assert_eq!(tier, MatchTier::ENumber);
    }

    #[test]
    fn test_record_e_number_written_with_separator() {
        let kb = kb(r#"[
            {"id": "1", "name": "Nitrito de sodio", "e_number": "E-250", "risk_level": "alto_riesgo"},
            {"id": "2", "name": "Nitrato de sodio", "e_number": "E 251", "risk_level": "alto_riesgo"}
        ]"#);
        let (record, tier) = resolve_with_tier("e250", &kb).unwrap();
        assert_eq!(record.id, "1");
        assert_eq!(tier, MatchTier::ENumber);
        assert_eq!(resolve("E251", &kb).unwrap().id, "2");
    }

    #[test]
    fn test_two_digit_e_number_never_uses_e_number_tier() {
        let kb = kb(r#"[{"id": "1", "name": "Colorante", "e_number": "E99", "risk_level": "moderado"}]"#);
        assert!(resolve("e99", &kb).is_none());
        assert!(!MatchTier::ENumber.applies_to("e99"));
        assert!(!MatchTier::ENumber.applies_to("e12345"));
        assert!(!MatchTier::ENumber.applies_to("e33o"));
        assert!(MatchTier::ENumber.applies_to("e1234"));
    }

    #[test]
    fn test_accents_ignored_on_both_sides() {
        let kb = kb(r#"[{"id": "1", "name": "Ácido cítrico", "risk_level": "seguro"}]"#);
        assert_eq!(resolve("acido citrico", &kb).unwrap().id, "1");
    }

    #[test]
    fn test_malformed_records_never_match() {
        let kb = kb(r#"[
            {"id": "1", "name": "Sal"},
            {"id": "2", "risk_level": "seguro"}
        ]"#);
        assert!(resolve("sal", &kb).is_none());
        assert!(resolve("anything", &kb).is_none());
    }

    #[test]
    fn test_combining_mark_name_matches_nothing() {
        let kb = kb(r#"[{"id": "x", "name": "\u0301", "risk_level": "peligroso"}]"#);
        assert!(resolve("agua", &kb).is_none());
        assert!(resolve("harina", &kb).is_none());
    }

    #[test]
    fn test_unknown_candidate() {
        let kb = kb(r#"[{"id": "1", "name": "Azucar", "risk_level": "seguro"}]"#);
        assert!(resolve("agua", &kb).is_none());
        assert!(resolve("azucra", &kb).is_none());
    }
}

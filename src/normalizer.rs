//! Turns raw recognized label text into candidate ingredient names.
//!
//! Cleaning runs in a fixed order: whitespace collapse, quote/bracket artifacts,
//! parenthetical notes, E-number canonicalization, then diacritic folding. The text as it
//! stood before folding is kept alongside the candidates because product categorization
//! works on it.

use std::collections::HashSet;

use regex::{Captures, Regex};
use serde::Deserialize;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::error::EngineError;

/// Labeled-section patterns, tried in this order. The first one that matches wins.
pub const DEFAULT_SECTION_PATTERNS: &[&str] = &[
    "ingredientes?",
    "ingredients?",
    "composici[oó]n",
    "composition",
    "contiene",
    "contains?",
];

/// Pieces shorter than this (in characters) are never candidates.
const MIN_CANDIDATE_LEN: usize = 3;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// Regex fragments naming an ingredient section, e.g. `ingredientes?`.
    pub section_patterns: Vec<String>,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            section_patterns: DEFAULT_SECTION_PATTERNS
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

/// Output of [`TextNormalizer::normalize`].
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedText {
    /// Cleaned text with diacritics intact.
    pub cleaned: String,
    /// `cleaned` with diacritics stripped.
    pub folded: String,
    /// Lower-cased, deduplicated candidates in first-seen order.
    pub candidates: Vec<String>,
}

pub struct TextNormalizer {
    whitespace: Regex,
    artifacts: Regex,
    parenthetical: Regex,
    e_number: Regex,
    spaced_e_number: Regex,
    sections: Vec<Regex>,
    leading_junk: Regex,
    trailing_junk: Regex,
    conjunction: Regex,
    paren_remnant: Regex,
}

impl TextNormalizer {
    pub fn new(config: &TextConfig) -> Result<Self, EngineError> {
        let sections = config
            .section_patterns
            .iter()
            .map(|p| compile(&format!(r"(?i){}[:.]?\s*([^.]+)", p)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            whitespace: compile(r"\s+")?,
            artifacts: compile(r#"["“”„«»\[\]{}]"#)?,
            parenthetical: compile(r"\([^)]*\)")?,
            e_number: compile(r"(?i)\b(E-?\d{3,4}[a-z]?)\b")?,
            spaced_e_number: compile(r"(?i)(^|[,;:]\s*)(E\s\d{3,4}[a-z]?)\b")?,
            sections,
            leading_junk: compile(r"^[^\p{L}]+")?,
            trailing_junk: compile(r"[^\p{L}\p{N}\s()\-]+$")?,
            conjunction: compile(r"\b(?:(?i:y|and)|e)\b.*")?,
            paren_remnant: compile(r"\([^)]*\)?|\)")?,
        })
    }

    pub fn normalize(&self, raw: &str) -> NormalizedText {
        let collapsed = self.whitespace.replace_all(raw.trim(), " ");
        let stripped = self.artifacts.replace_all(&collapsed, "");
        let unannotated = self.parenthetical.replace_all(&stripped, "");
        // "E 250" only when it stands alone; "Vitamina E 1000" keeps its dose.
        let spaced = self.spaced_e_number.replace_all(&unannotated, |caps: &Captures| {
            format!("{}{}", &caps[1], canonical_e_number(&caps[2]))
        });
        let canonical = self
            .e_number
            .replace_all(&spaced, |caps: &Captures| canonical_e_number(&caps[1]));
        let cleaned = self.whitespace.replace_all(&canonical, " ").trim().to_string();

        let folded = strip_diacritics(&cleaned);
        let candidates = self.split_candidates(self.ingredient_section(&folded));

        NormalizedText {
            cleaned,
            folded,
            candidates,
        }
    }

    /// The substring following the first labeled section found, or the whole text.
    fn ingredient_section<'t>(&self, text: &'t str) -> &'t str {
        self.sections
            .iter()
            .find_map(|re| re.captures(text).and_then(|caps| caps.get(1)))
            .map(|m| m.as_str())
            .unwrap_or(text)
    }

    fn split_candidates(&self, section: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        section
            .split([',', ';'])
            .map(str::trim)
            .filter(|piece| long_enough(piece))
            .map(|piece| self.clean_piece(piece))
            .filter(|piece| long_enough(piece))
            .map(|piece| piece.to_lowercase())
            .filter(|piece| seen.insert(piece.clone()))
            .collect()
    }

    fn clean_piece(&self, piece: &str) -> String {
        let lead = self.leading_junk.replace(piece, "");
        let trail = self.trailing_junk.replace(&lead, "");
        let head = self.conjunction.replace(&trail, "");
        let head = head.trim();
        if !long_enough(head) {
            return String::new();
        }
        self.paren_remnant.replace_all(head, "").trim().to_string()
    }
}

/// `E-250`, `E 250` and `e250` all become `E250`. Anything not starting with `E` is
/// returned trimmed.
pub fn canonical_e_number(code: &str) -> String {
    let code = code.trim();
    match code.strip_prefix(['e', 'E']) {
        Some(rest) => format!("E{}", rest.trim_start_matches([' ', '-']).to_uppercase()),
        None => code.to_string(),
    }
}

/// Lower-case `text` and strip diacritics. Both sides of every name comparison go
/// through this.
pub fn fold(text: &str) -> String {
    strip_diacritics(&text.trim().to_lowercase())
}

fn strip_diacritics(text: &str) -> String {
    text.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

fn long_enough(piece: &str) -> bool {
    piece.chars().count() >= MIN_CANDIDATE_LEN
}

fn compile(pattern: &str) -> Result<Regex, EngineError> {
    Regex::new(pattern).map_err(|source| EngineError::Pattern {
        pattern: pattern.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> TextNormalizer {
        TextNormalizer::new(&TextConfig::default()).unwrap()
    }

    #[test]
    fn test_empty_input_yields_no_candidates() {
        let out = normalizer().normalize("   \n\t ");
        assert!(out.candidates.is_empty());
        assert_eq!(out.cleaned, "");
    }

    #[test]
    fn test_labeled_section_is_split() {
        let out = normalizer().normalize("Ingredientes: azucar, agua");
        assert_eq!(out.candidates, vec!["azucar", "agua"]);
    }

    #[test]
    fn test_section_priority_follows_pattern_order() {
        let out = normalizer().normalize("Contiene: leche. Ingredientes: harina; agua. Lote 12");
        assert_eq!(out.candidates, vec!["harina", "agua"]);
    }

    #[test]
    fn test_whole_text_used_without_section() {
        let out = normalizer().normalize("harina de trigo, sal marina");
        assert_eq!(out.candidates, vec!["harina de trigo", "sal marina"]);
    }

    #[test]
    fn test_parenthetical_notes_removed() {
        let out = normalizer().normalize("Ingredients: flour (wheat, gluten), milk");
        assert_eq!(out.candidates, vec!["flour", "milk"]);
    }

    #[test]
    fn test_unclosed_parenthesis_dropped() {
        let out = normalizer().normalize("cacao (minimo 30, sal");
        assert_eq!(out.candidates, vec!["cacao", "sal"]);
    }

    #[test]
    fn test_e_numbers_canonicalized() {
        let out = normalizer().normalize("Ingredientes: agua, e-330, E 211, e150d");
        assert!(out.cleaned.contains("E330"));
        assert!(out.cleaned.contains("E211"));
        assert!(out.cleaned.contains("E150D"));
        assert_eq!(out.candidates, vec!["agua", "e330", "e211", "e150d"]);
    }

    #[test]
    fn test_spaced_e_number_only_when_standalone() {
        let out = normalizer().normalize("Ingredientes: Vitamina E 1000, E 250, sal");
        assert_eq!(out.candidates, vec!["vitamina e 1000", "e250", "sal"]);
    }

    #[test]
    fn test_canonical_e_number() {
        assert_eq!(canonical_e_number("E-250"), "E250");
        assert_eq!(canonical_e_number(" E 250 "), "E250");
        assert_eq!(canonical_e_number("e150d"), "E150D");
        assert_eq!(canonical_e_number("250"), "250");
    }

    #[test]
    fn test_diacritics_folded_but_kept_in_cleaned_text() {
        let out = normalizer().normalize("Ingredientes: Azúcar, Crema de leche");
        assert_eq!(out.cleaned, "Ingredientes: Azúcar, Crema de leche");
        assert_eq!(out.folded, "Ingredientes: Azucar, Crema de leche");
        assert_eq!(out.candidates, vec!["azucar", "crema de leche"]);
    }

    #[test]
    fn test_conjunction_truncates_piece() {
        let out = normalizer().normalize("aceite de girasol y sal, sugar and salt");
        assert_eq!(out.candidates, vec!["aceite de girasol", "sugar"]);
    }

    #[test]
    fn test_upper_case_conjunction_truncates_piece() {
        let out = normalizer().normalize("AZÚCAR Y SAL, VITAMINA E");
        assert_eq!(out.candidates, vec!["azucar", "vitamina e"]);
    }

    #[test]
    fn test_short_and_junk_pieces_dropped() {
        let out = normalizer().normalize("ab, 2% leche, -- , sal!!");
        assert_eq!(out.candidates, vec!["leche", "sal"]);
    }

    #[test]
    fn test_case_insensitive_dedup_keeps_first_seen() {
        let out = normalizer().normalize("Sal, azucar, SAL, Azucar, sal");
        assert_eq!(out.candidates, vec!["sal", "azucar"]);
    }

    #[test]
    fn test_quotes_and_brackets_stripped() {
        let out = normalizer().normalize("“Ingredientes”: [harina], {agua}");
        assert_eq!(out.candidates, vec!["harina", "agua"]);
    }

    #[test]
    fn test_invalid_section_pattern_rejected() {
        let config = TextConfig {
            section_patterns: vec!["ingred(".to_string()],
        };
        assert!(matches!(
            TextNormalizer::new(&config),
            Err(EngineError::Pattern { .. })
        ));
    }

    #[test]
    fn test_fold() {
        assert_eq!(fold("  Ácido Cítrico "), "acido citrico");
    }
}

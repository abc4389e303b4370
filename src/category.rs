use serde::{Deserialize, Serialize};

pub const FALLBACK_CATEGORY: &str = "other";

/// Ordered category table; earlier rules win ties.
const DEFAULT_RULES: &[(&str, &[&str])] = &[
    (
        "alimento",
        &["ingredientes", "ingredients", "alimento", "comida", "nutritiva", "calorias", "calorías", "food"],
    ),
    (
        "bebida",
        &["bebida", "liquido", "líquido", "refresco", "jugo", "agua", "beverage", "drink", "juice"],
    ),
    (
        "cosmético",
        &["cosmético", "cosmetico", "crema", "loción", "locion", "shampoo", "maquillaje", "lotion"],
    ),
    (
        "medicamento",
        &["medicamento", "medicina", "farmaco", "fármaco", "comprimido", "tablet"],
    ),
    (
        "suplemento",
        &["suplemento", "vitamina", "mineral", "nutricional", "supplement"],
    ),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub name: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryTable {
    pub fallback: String,
    pub rules: Vec<CategoryRule>,
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self {
            fallback: FALLBACK_CATEGORY.to_string(),
            rules: DEFAULT_RULES
                .iter()
                .map(|(name, keywords)| CategoryRule {
                    name: name.to_string(),
                    keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
                })
                .collect(),
        }
    }
}

impl CategoryTable {
    /// First rule with any keyword inside the lower-cased text, else the fallback.
    pub fn categorize(&self, text: &str) -> &str {
        let lower = text.to_lowercase();
        self.rules
            .iter()
            .find(|rule| {
                rule.keywords
                    .iter()
                    .any(|k| !k.is_empty() && lower.contains(&k.to_lowercase()))
            })
            .map(|rule| rule.name.as_str())
            .unwrap_or(&self.fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_falls_back() {
        assert_eq!(CategoryTable::default().categorize(""), "other");
    }

    #[test]
    fn test_table_order_breaks_ties() {
        // "agua" is a beverage keyword, but "ingredientes" (food) comes first in the table.
        let table = CategoryTable::default();
        assert_eq!(table.categorize("Ingredientes: azucar, agua"), "alimento");
        assert_eq!(table.categorize("Agua mineral natural"), "bebida");
    }

    #[test]
    fn test_accented_keywords_match_unfolded_text() {
        let table = CategoryTable::default();
        assert_eq!(table.categorize("LOCIÓN hidratante"), "cosmético");
        assert_eq!(table.categorize("Fármaco de venta libre"), "medicamento");
    }

    #[test]
    fn test_custom_table() {
        let table = CategoryTable {
            fallback: "misc".to_string(),
            rules: vec![CategoryRule {
                name: "pet food".to_string(),
                keywords: vec!["Croquetas".to_string()],
            }],
        };
        assert_eq!(table.categorize("croquetas para perro"), "pet food");
        assert_eq!(table.categorize("agua"), "misc");
    }
}

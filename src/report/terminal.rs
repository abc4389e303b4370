use anyhow::Result;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::models::{
    IngredientRecord, MatchedIngredient, Recommendation, RecommendationKind, RiskLevel,
};
use crate::report::{LabelReport, ScoreBand};

/// Render a colored terminal report for every analyzed label.
pub fn render(reports: &[LabelReport], verbose: bool, quiet: bool) -> Result<()> {
    if quiet {
        for report in reports {
            let r = &report.result;
            println!(
                "{}  Risk: {}  Human: {}  Animal: {}  Category: {}",
                report.source,
                paint_risk(r.risk_score),
                paint_health(r.health_score_human),
                paint_health(r.health_score_animal),
                r.product_category,
            );
        }
        return Ok(());
    }

    println!(
        "\n {} v{}",
        "label-checkr".bold(),
        env!("CARGO_PKG_VERSION")
    );

    for report in reports {
        render_one(report, verbose);
    }

    Ok(())
}

fn render_one(report: &LabelReport, verbose: bool) {
    let r = &report.result;
    println!(" Label: {}\n", report.source);

    println!("{}", box_border('┌', '┐'));
    println!("{}", box_row("SUMMARY", "", |s| s.bold()));
    println!("{}", box_row("Category", &r.product_category, |s| s.normal()));
    println!("{}", box_row("Human health", &r.health_score_human.to_string(), |s| {
        paint(s, ScoreBand::of_health(r.health_score_human))
    }));
    println!("{}", box_row("Animal health", &r.health_score_animal.to_string(), |s| {
        paint(s, ScoreBand::of_health(r.health_score_animal))
    }));
    println!("{}", box_row("Risk", &r.risk_score.to_string(), |s| {
        paint(s, ScoreBand::of_risk(r.risk_score))
    }));
    let counts = format!(
        "{} detected, {} matched, {} unknown",
        r.candidates.len(),
        r.matched.len(),
        r.unknown.len()
    );
    println!("{}", box_row("Ingredients", &counts, |s| s.normal()));
    println!("{}\n", box_border('└', '┘'));

    for rec in &r.recommendations {
        render_recommendation(rec);
    }
    println!();

    let flagged: Vec<&MatchedIngredient> = r
        .matched
        .iter()
        .filter(|m| !m.ingredient.is_beneficial())
        .collect();
    if !flagged.is_empty() {
        println!(" {} Ingredients requiring attention:\n", "[RISK]".red().bold());
        println!("{}", matched_table(&flagged));
        println!();
    }

    if verbose {
        let safe: Vec<&MatchedIngredient> = r
            .matched
            .iter()
            .filter(|m| m.ingredient.is_beneficial())
            .collect();
        if !safe.is_empty() {
            println!(" {} Safe ingredients:\n", "[SAFE]".green().bold());
            println!("{}", matched_table(&safe));
            println!();
        }
    }

    if !r.unknown.is_empty() {
        println!(
            " {} Not in knowledge base: {}\n",
            "[UNKNOWN]".dimmed().bold(),
            r.unknown.join(", ")
        );
    }
}

fn render_recommendation(rec: &Recommendation) {
    let (icon, label) = match rec.kind {
        RecommendationKind::Success => ("✓".green(), "[OK]".green().bold()),
        RecommendationKind::Warning => ("⚠".yellow(), "[WARN]".yellow().bold()),
        RecommendationKind::Danger => ("✗".red(), "[DANGER]".red().bold()),
        RecommendationKind::Info => ("ℹ".blue(), "[INFO]".blue().bold()),
    };
    println!(" {} {} {}", icon, label, rec.title.bold());
    println!("     {}", rec.message);
}

fn matched_table(rows: &[&MatchedIngredient]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Detected").add_attribute(Attribute::Bold),
            Cell::new("Ingredient").add_attribute(Attribute::Bold),
            Cell::new("E-number").add_attribute(Attribute::Bold),
            Cell::new("Category").add_attribute(Attribute::Bold),
            Cell::new("Risk").add_attribute(Attribute::Bold),
            Cell::new("Animals").add_attribute(Attribute::Bold),
        ]);

    for m in rows {
        let ing = &m.ingredient;
        table.add_row(vec![
            Cell::new(&m.candidate),
            Cell::new(&ing.name),
            Cell::new(ing.e_number.as_deref().unwrap_or("—")),
            Cell::new(&ing.category),
            risk_cell(ing.risk_level.as_ref()),
            Cell::new(&ing.health_impact_animal),
        ]);
    }
    table
}

/// Render a knowledge-base listing.
pub fn render_ingredients(records: &[&IngredientRecord], quiet: bool) {
    if quiet {
        println!("{} ingredients", records.len());
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").add_attribute(Attribute::Bold),
            Cell::new("Name").add_attribute(Attribute::Bold),
            Cell::new("Category").add_attribute(Attribute::Bold),
            Cell::new("E-number").add_attribute(Attribute::Bold),
            Cell::new("Risk").add_attribute(Attribute::Bold),
        ]);

    for rec in records {
        table.add_row(vec![
            Cell::new(&rec.id),
            Cell::new(&rec.name),
            Cell::new(&rec.category),
            Cell::new(rec.e_number.as_deref().unwrap_or("—")),
            risk_cell(rec.risk_level.as_ref()),
        ]);
    }

    println!("{}", table);
    println!(" {} ingredients", records.len());
}

/// Render every field of a single record.
pub fn render_ingredient_detail(rec: &IngredientRecord) {
    let level = rec
        .risk_level
        .as_ref()
        .map(|l| l.to_string())
        .unwrap_or_else(|| "Not rated".to_string());

    println!("\n {}", rec.name.bold());
    println!(" Risk level: {}\n", level.bold());

    println!(" {}", "General".underline());
    println!("   Category: {}", or_missing(&rec.category));
    if let Some(e) = &rec.e_number {
        println!("   E-number: {}", e);
    }
    if let Some(cas) = &rec.cas_number {
        println!("   CAS number: {}", cas);
    }
    if !rec.alternative_names.is_empty() {
        println!("   Also known as: {}", rec.alternative_names.join(", "));
    }

    println!("\n {}", "Human health".underline());
    println!("   {}", or_missing(&rec.health_impact_human));
    println!("\n {}", "Animal health".underline());
    println!("   {}", or_missing(&rec.health_impact_animal));

    if let Some(intake) = &rec.max_daily_intake {
        println!("\n {}", "Maximum daily intake".underline());
        println!("   {}", intake);
    }
    if !rec.banned_countries.is_empty() {
        println!("\n {}", "Restrictions".underline());
        println!("   Restricted in: {}", rec.banned_countries.join(", "));
    }

    println!("\n {}", "Description".underline());
    println!(
        "   {}\n",
        rec.description.as_deref().map(or_missing).unwrap_or("No information available")
    );
}

fn or_missing(text: &str) -> &str {
    if text.trim().is_empty() {
        "No information available"
    } else {
        text
    }
}

fn risk_cell(level: Option<&RiskLevel>) -> Cell {
    let (text, color) = match level {
        Some(RiskLevel::VerySafe) => ("very safe".to_string(), Color::Green),
        Some(RiskLevel::Safe) => ("safe".to_string(), Color::Cyan),
        Some(RiskLevel::Moderate) => ("moderate".to_string(), Color::Yellow),
        Some(RiskLevel::HighRisk) => ("high risk".to_string(), Color::Red),
        Some(RiskLevel::Dangerous) => ("dangerous".to_string(), Color::Magenta),
        Some(RiskLevel::Unrecognized(raw)) => (raw.clone(), Color::DarkGrey),
        None => ("—".to_string(), Color::DarkGrey),
    };
    Cell::new(text).fg(color).set_alignment(CellAlignment::Center)
}

const BOX_WIDTH: usize = 49;

fn box_border(left: char, right: char) -> String {
    format!(" {}{}{}", left, "─".repeat(BOX_WIDTH + 3), right)
}

/// One line of the summary box. Padding is computed on the plain text so color codes
/// never shift the right border.
fn box_row(label: &str, value: &str, style: impl Fn(&str) -> ColoredString) -> String {
    let plain = if value.is_empty() {
        label.to_string()
    } else {
        format!("{:<16}: {}", label, value)
    };
    let pad = " ".repeat(BOX_WIDTH.saturating_sub(plain.chars().count()));
    let styled = if value.is_empty() {
        style(label).to_string()
    } else {
        format!("{:<16}: {}", label, style(value))
    };
    format!(" │  {}{} │", styled, pad)
}

fn paint_health(score: u8) -> ColoredString {
    paint(&score.to_string(), ScoreBand::of_health(score))
}

fn paint_risk(score: u8) -> ColoredString {
    paint(&score.to_string(), ScoreBand::of_risk(score))
}

fn paint(text: &str, band: ScoreBand) -> ColoredString {
    match band {
        ScoreBand::Good => text.green(),
        ScoreBand::Fair => text.yellow(),
        ScoreBand::Poor => text.red(),
    }
}

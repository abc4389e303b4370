use std::path::Path;

use anyhow::{Context, Result};
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Polygon, Rgb,
};

use crate::models::{MatchedIngredient, RecommendationKind, RiskLevel};
use crate::report::{LabelReport, ScoreBand};

const PAGE_W: f32 = 210.0;
const PAGE_H: f32 = 297.0;
const MARGIN: f32 = 18.0;
const T_END: f32 = PAGE_W - MARGIN;
const HEADER_H: f32 = 62.0;
const FOOTER_Y: f32 = 22.0;
const BOTTOM: f32 = 28.0;

type Rgb3 = (f32, f32, f32);

// ── Palette ───────────────────────────────────────────────────────────────────
const BG: Rgb3 = (1.00, 1.00, 1.00);
const PANEL_ALT: Rgb3 = (0.95, 0.97, 0.96);
const PANEL_BORDER: Rgb3 = (0.85, 0.89, 0.87);
const ACCENT_FROM: Rgb3 = (0.10, 0.55, 0.40);
const ACCENT_TO: Rgb3 = (0.15, 0.45, 0.75);
const TEXT_PRI: Rgb3 = (0.07, 0.09, 0.10);
const TEXT_SEC: Rgb3 = (0.34, 0.40, 0.44);
const TEXT_MUT: Rgb3 = (0.56, 0.62, 0.66);
const WHITE: Rgb3 = (1.00, 1.00, 1.00);
const WHITE_DIM: Rgb3 = (0.85, 0.95, 0.92);

const GOOD: (Rgb3, Rgb3) = ((0.07, 0.52, 0.22), (0.90, 0.98, 0.92));
const FAIR: (Rgb3, Rgb3) = ((0.70, 0.40, 0.02), (1.00, 0.95, 0.87));
const POOR: (Rgb3, Rgb3) = ((0.76, 0.09, 0.13), (1.00, 0.91, 0.91));
const INFO: (Rgb3, Rgb3) = ((0.20, 0.34, 0.82), (0.91, 0.93, 1.00));
const NEUTRAL: (Rgb3, Rgb3) = ((0.36, 0.40, 0.52), (0.93, 0.94, 0.96));

const R_PANEL: f32 = 2.5;
const R_BADGE: f32 = 1.5;

const MESSAGE_WRAP: usize = 92;
const ROW_H: f32 = 7.0;

/// Fonts and layer for the page being drawn.
struct Canvas {
    layer: PdfLayerReference,
    bold: IndirectFontRef,
    regular: IndirectFontRef,
}

impl Canvas {
    fn text(&self, text: &str, size: f32, x: f32, y: f32, color: Rgb3, bold: bool) {
        set_color(&self.layer, color);
        let font = if bold { &self.bold } else { &self.regular };
        self.layer.use_text(text, size, Mm(x), Mm(y), font);
    }
}

/// Render a PDF report: per label a summary page with score cards and recommendations,
/// followed by the matched-ingredient table.
pub fn render(reports: &[LabelReport], output_path: &Path) -> Result<()> {
    let doc = PdfDocument::empty("Label Analysis Report");
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
    let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;

    for report in reports {
        add_summary_page(&doc, &bold, &regular, report);
        add_ingredient_pages(&doc, &bold, &regular, report);
    }

    let bytes = doc.save_to_bytes()?;
    std::fs::write(output_path, &bytes)
        .with_context(|| format!("Failed to write PDF to {}", output_path.display()))?;
    Ok(())
}

fn new_canvas(
    doc: &PdfDocumentReference,
    bold: &IndirectFontRef,
    regular: &IndirectFontRef,
    name: &str,
) -> Canvas {
    let (page, layer) = doc.add_page(Mm(PAGE_W), Mm(PAGE_H), name);
    let canvas = Canvas {
        layer: doc.get_page(page).get_layer(layer),
        bold: bold.clone(),
        regular: regular.clone(),
    };
    fill_rect(&canvas.layer, 0.0, 0.0, PAGE_W, PAGE_H, BG);
    draw_hline(&canvas.layer, MARGIN, T_END, FOOTER_Y, PANEL_BORDER);
    canvas.text(
        &format!("Generated by label-checkr v{}", env!("CARGO_PKG_VERSION")),
        7.5,
        MARGIN,
        15.0,
        TEXT_MUT,
        false,
    );
    canvas
}

// ── Summary page ──────────────────────────────────────────────────────────────

fn add_summary_page(
    doc: &PdfDocumentReference,
    bold: &IndirectFontRef,
    regular: &IndirectFontRef,
    report: &LabelReport,
) {
    let c = new_canvas(doc, bold, regular, "Summary");
    let r = &report.result;

    let hdr_bot = PAGE_H - HEADER_H;
    fill_gradient_h(&c.layer, 0.0, hdr_bot, PAGE_W, HEADER_H, ACCENT_FROM, ACCENT_TO, 28);
    c.text("Label Analysis", 28.0, MARGIN, PAGE_H - 26.0, WHITE, true);
    c.text("Report", 28.0, MARGIN, PAGE_H - 41.0, WHITE_DIM, true);

    // Source chip
    let chip_y = hdr_bot - 18.0;
    let chip_h = 12.0;
    fill_rounded_rect(&c.layer, MARGIN, chip_y, 120.0, chip_h, R_BADGE, BG);
    stroke_rounded_rect(&c.layer, MARGIN, chip_y, 120.0, chip_h, R_BADGE, PANEL_BORDER);
    fill_rect(&c.layer, MARGIN, chip_y, 2.5, chip_h, ACCENT_FROM);
    c.text("LABEL", 6.0, MARGIN + 5.0, chip_y + chip_h - 3.8, TEXT_MUT, true);
    c.text(&truncate(&report.source, 40), 9.5, MARGIN + 5.0, chip_y + 2.8, TEXT_PRI, true);

    c.text(
        &format!(
            "Category  {}     Ingredients  {} detected, {} matched, {} unknown",
            r.product_category,
            r.candidates.len(),
            r.matched.len(),
            r.unknown.len()
        ),
        9.0,
        MARGIN,
        chip_y - 8.0,
        TEXT_SEC,
        false,
    );

    // Score cards
    let rule_y = chip_y - 16.5;
    draw_hline(&c.layer, MARGIN, T_END, rule_y, PANEL_BORDER);
    c.text("SCORES", 6.5, MARGIN, rule_y - 7.0, TEXT_MUT, true);

    let card_y = rule_y - 42.0;
    let card_h = 26.0;
    let gap = 4.0;
    let card_w = (T_END - MARGIN - gap * 2.0) / 3.0;
    let cards = [
        ("HUMAN HEALTH", r.health_score_human, ScoreBand::of_health(r.health_score_human)),
        ("ANIMAL HEALTH", r.health_score_animal, ScoreBand::of_health(r.health_score_animal)),
        ("RISK", r.risk_score, ScoreBand::of_risk(r.risk_score)),
    ];
    for (i, (label, score, band)) in cards.into_iter().enumerate() {
        let x = MARGIN + (card_w + gap) * i as f32;
        draw_score_card(&c, x, card_y, card_w, card_h, label, score, band_colors(band));
    }

    // Recommendations
    let section_y = card_y - 13.0;
    draw_hline(&c.layer, MARGIN, T_END, section_y, PANEL_BORDER);
    c.text("RECOMMENDATIONS", 6.5, MARGIN, section_y - 7.5, TEXT_MUT, true);

    let mut y = section_y - 16.0;
    for rec in &r.recommendations {
        let lines = wrap_text(&rec.message, MESSAGE_WRAP);
        let block_h = 9.0 + lines.len() as f32 * 4.2;
        if y - block_h < BOTTOM {
            c.text("More recommendations omitted", 7.5, MARGIN, y, TEXT_MUT, false);
            break;
        }

        let (fg, bg) = kind_colors(rec.kind);
        fill_rounded_rect(&c.layer, MARGIN, y - block_h + 3.0, T_END - MARGIN, block_h, R_PANEL, bg);
        fill_rect(&c.layer, MARGIN, y - block_h + 3.0, 2.0, block_h, fg);
        c.text(&rec.title, 9.5, MARGIN + 5.0, y - 2.0, fg, true);
        for (j, line) in lines.iter().enumerate() {
            c.text(line, 8.0, MARGIN + 5.0, y - 7.0 - j as f32 * 4.2, TEXT_PRI, false);
        }
        y -= block_h + 3.0;
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_score_card(
    c: &Canvas,
    x: f32,
    y: f32,
    w: f32,
    h: f32,
    label: &str,
    score: u8,
    (fg, bg): (Rgb3, Rgb3),
) {
    fill_rounded_rect(&c.layer, x, y, w, h, R_PANEL, bg);
    stroke_rounded_rect(&c.layer, x, y, w, h, R_PANEL, PANEL_BORDER);
    fill_rect(&c.layer, x, y + h - 2.0, w, 2.0, fg);
    c.text(label, 6.5, x + 4.0, y + h - 7.5, TEXT_SEC, true);
    c.text(&score.to_string(), 22.0, x + 4.0, y + 5.0, fg, true);
    c.text("/ 100", 8.0, x + 24.0, y + 5.5, TEXT_MUT, false);
}

// ── Ingredient table pages ────────────────────────────────────────────────────

fn add_ingredient_pages(
    doc: &PdfDocumentReference,
    bold: &IndirectFontRef,
    regular: &IndirectFontRef,
    report: &LabelReport,
) {
    const HDR_Y: f32 = 268.5;
    const FIRST_Y: f32 = 259.5;

    //  DETECTED   INGREDIENT   E-NUMBER   CATEGORY   RISK
    let col_x = [MARGIN, MARGIN + 42.0, MARGIN + 92.0, MARGIN + 112.0, MARGIN + 146.0];
    let headers = ["DETECTED", "INGREDIENT", "E-NUMBER", "CATEGORY", "RISK"];

    let rows: &[MatchedIngredient] = &report.result.matched;
    let mut page: Option<Canvas> = None;
    let mut page_num = 0u32;
    let mut cur_y = FIRST_Y;

    for (row_idx, m) in rows.iter().enumerate() {
        if page.is_none() || cur_y - ROW_H < BOTTOM {
            page_num += 1;
            let c = new_canvas(doc, bold, regular, "Ingredients");
            fill_gradient_h(&c.layer, 0.0, PAGE_H - 2.5, PAGE_W, 2.5, ACCENT_FROM, ACCENT_TO, 21);
            c.text(
                &truncate(&format!("Matched Ingredients: {}", report.source), 46),
                14.0,
                MARGIN,
                282.5,
                TEXT_PRI,
                true,
            );
            c.text(&format!("Page {}", page_num), 8.0, T_END - 14.0, 283.0, TEXT_MUT, false);
            draw_hline(&c.layer, MARGIN, T_END, 277.5, PANEL_BORDER);

            stroke_rounded_rect(&c.layer, MARGIN, HDR_Y - 7.5, T_END - MARGIN, 9.5, R_BADGE, PANEL_BORDER);
            for (x, h) in col_x.iter().zip(headers) {
                c.text(h, 7.0, x + 1.5, HDR_Y - 4.0, TEXT_MUT, true);
            }

            cur_y = FIRST_Y;
            page = Some(c);
        }
        let Some(c) = page.as_ref() else { continue };

        if row_idx % 2 == 0 {
            fill_rect(&c.layer, MARGIN, cur_y - ROW_H + 1.5, T_END - MARGIN, ROW_H, PANEL_ALT);
        }

        let ing = &m.ingredient;
        let text_y = cur_y - 4.0;
        c.text(&truncate(&m.candidate, 24), 8.0, col_x[0] + 1.5, text_y, TEXT_SEC, false);
        c.text(&truncate(&ing.name, 28), 8.0, col_x[1] + 1.5, text_y, TEXT_PRI, false);
        c.text(ing.e_number.as_deref().unwrap_or("—"), 8.0, col_x[2] + 1.5, text_y, TEXT_SEC, false);
        c.text(&truncate(&ing.category, 18), 8.0, col_x[3] + 1.5, text_y, TEXT_SEC, false);

        let (label, (fg, bg)) = risk_badge(ing.risk_level.as_ref());
        let badge_x = col_x[4] + 1.5;
        let badge_y = cur_y - ROW_H + 2.2;
        fill_rounded_rect(&c.layer, badge_x, badge_y, 26.0, 4.8, R_BADGE, bg);
        c.text(&truncate(&label, 14), 7.0, badge_x + 2.0, badge_y + 1.1, fg, true);

        draw_hline(&c.layer, MARGIN, T_END, cur_y - ROW_H + 1.5, PANEL_BORDER);
        cur_y -= ROW_H;
    }
}

fn risk_badge(level: Option<&RiskLevel>) -> (String, (Rgb3, Rgb3)) {
    match level {
        Some(RiskLevel::VerySafe) => ("VERY SAFE".to_string(), GOOD),
        Some(RiskLevel::Safe) => ("SAFE".to_string(), GOOD),
        Some(RiskLevel::Moderate) => ("MODERATE".to_string(), FAIR),
        Some(RiskLevel::HighRisk) => ("HIGH RISK".to_string(), POOR),
        Some(RiskLevel::Dangerous) => ("DANGEROUS".to_string(), POOR),
        Some(RiskLevel::Unrecognized(raw)) => (raw.to_uppercase(), NEUTRAL),
        None => ("—".to_string(), NEUTRAL),
    }
}

fn band_colors(band: ScoreBand) -> (Rgb3, Rgb3) {
    match band {
        ScoreBand::Good => GOOD,
        ScoreBand::Fair => FAIR,
        ScoreBand::Poor => POOR,
    }
}

fn kind_colors(kind: RecommendationKind) -> (Rgb3, Rgb3) {
    match kind {
        RecommendationKind::Success => GOOD,
        RecommendationKind::Warning => FAIR,
        RecommendationKind::Danger => POOR,
        RecommendationKind::Info => INFO,
    }
}

// ── Drawing helpers ───────────────────────────────────────────────────────────

fn rgb((r, g, b): Rgb3) -> Color {
    Color::Rgb(Rgb { r, g, b, icc_profile: None })
}

fn set_color(layer: &PdfLayerReference, color: Rgb3) {
    layer.set_fill_color(rgb(color));
}

fn fill_ring(layer: &PdfLayerReference, ring: Vec<(Point, bool)>, color: Rgb3) {
    layer.set_fill_color(rgb(color));
    layer.add_polygon(Polygon {
        rings: vec![ring],
        mode: PaintMode::Fill,
        winding_order: WindingOrder::NonZero,
    });
    layer.set_fill_color(rgb((0.0, 0.0, 0.0)));
}

fn fill_rect(layer: &PdfLayerReference, x: f32, y: f32, w: f32, h: f32, color: Rgb3) {
    let ring = [(x, y), (x + w, y), (x + w, y + h), (x, y + h)]
        .into_iter()
        .map(|(px, py)| (Point::new(Mm(px), Mm(py)), false))
        .collect();
    fill_ring(layer, ring, color);
}

/// Clockwise ring approximating a rounded rectangle, 8 segments per corner.
fn rounded_rect_ring(x: f32, y: f32, w: f32, h: f32, r: f32) -> Vec<(Point, bool)> {
    const SEGS: usize = 8;
    let r = r.min(w / 2.0).min(h / 2.0);
    let corners = [
        (x + w - r, y + r, 270.0f32),
        (x + w - r, y + h - r, 0.0),
        (x + r, y + h - r, 90.0),
        (x + r, y + r, 180.0),
    ];

    corners
        .iter()
        .flat_map(|&(cx, cy, start)| {
            (0..=SEGS).map(move |i| {
                let angle = (start + 90.0 * i as f32 / SEGS as f32).to_radians();
                (Point::new(Mm(cx + r * angle.cos()), Mm(cy + r * angle.sin())), false)
            })
        })
        .collect()
}

fn fill_rounded_rect(layer: &PdfLayerReference, x: f32, y: f32, w: f32, h: f32, r: f32, color: Rgb3) {
    fill_ring(layer, rounded_rect_ring(x, y, w, h, r), color);
}

fn stroke_rounded_rect(layer: &PdfLayerReference, x: f32, y: f32, w: f32, h: f32, r: f32, color: Rgb3) {
    layer.set_outline_color(rgb(color));
    layer.set_outline_thickness(0.4);
    layer.add_polygon(Polygon {
        rings: vec![rounded_rect_ring(x, y, w, h, r)],
        mode: PaintMode::Stroke,
        winding_order: WindingOrder::NonZero,
    });
    layer.set_outline_color(rgb((0.0, 0.0, 0.0)));
    layer.set_outline_thickness(1.0);
}

fn draw_hline(layer: &PdfLayerReference, x1: f32, x2: f32, y: f32, color: Rgb3) {
    layer.set_outline_color(rgb(color));
    layer.set_outline_thickness(0.3);
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(x1), Mm(y)), false),
            (Point::new(Mm(x2), Mm(y)), false),
        ],
        is_closed: false,
    });
    layer.set_outline_color(rgb((0.0, 0.0, 0.0)));
    layer.set_outline_thickness(1.0);
}

/// Left-to-right gradient made of `steps` vertical strips.
#[allow(clippy::too_many_arguments)]
fn fill_gradient_h(
    layer: &PdfLayerReference,
    x: f32,
    y: f32,
    w: f32,
    h: f32,
    from: Rgb3,
    to: Rgb3,
    steps: usize,
) {
    let step_w = w / steps as f32;
    for i in 0..steps {
        let t = i as f32 / (steps - 1).max(1) as f32;
        let color = (
            from.0 + (to.0 - from.0) * t,
            from.1 + (to.1 - from.1) * t,
            from.2 + (to.2 - from.2) * t,
        );
        fill_rect(layer, x + i as f32 * step_w, y, step_w + 0.6, h, color);
    }
}

// ── Text helpers ──────────────────────────────────────────────────────────────

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let head: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", head)
    } else {
        s.to_string()
    }
}

fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

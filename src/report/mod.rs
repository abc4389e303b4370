//! Report renderers for analysis results.
//!
//! - [`terminal`] — colored summary, recommendations and ingredient tables; respects
//!   `--verbose` / `--quiet`. Also renders knowledge-base listings.
//! - [`pdf`] — cover page with score cards, recommendations page and ingredient table.

pub mod pdf;
pub mod terminal;

use serde::Serialize;

use crate::models::AnalysisResult;

/// One analyzed label and where its text came from.
#[derive(Debug, Clone, Serialize)]
pub struct LabelReport {
    pub source: String,
    pub result: AnalysisResult,
}

/// Qualitative band of a 0–100 health score (higher is healthier).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Good,
    Fair,
    Poor,
}

impl ScoreBand {
    pub fn of_health(score: u8) -> Self {
        match score {
            80.. => ScoreBand::Good,
            60..=79 => ScoreBand::Fair,
            _ => ScoreBand::Poor,
        }
    }

    /// A risk score is banded by its complement.
    pub fn of_risk(risk: u8) -> Self {
        Self::of_health(100u8.saturating_sub(risk))
    }
}

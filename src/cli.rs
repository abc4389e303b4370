use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use label_checkr::RiskLevel;

#[derive(Parser, Debug)]
#[command(
    name = "label-checkr",
    about = "Analyze product label text and assess ingredient health risk",
    version
)]
pub struct Cli {
    /// Knowledge-base source: JSON file or http(s) tables endpoint (repeatable; overrides config)
    #[arg(long = "kb", value_name = "SOURCE", global = true)]
    pub kb: Vec<String>,

    /// Config file [default: ./.label-checkr/config.toml, fallback ~/.config/label-checkr/config.toml]
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Show all matched ingredients (not just risky ones)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print summary lines
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze label text from files, stdin or --text
    Analyze(AnalyzeArgs),
    /// Browse the ingredient knowledge base
    Ingredients(IngredientsArgs),
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Text files holding recognized label text; `-` reads stdin
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Label text given inline
    #[arg(long, value_name = "TEXT", conflicts_with = "files")]
    pub text: Option<String>,

    /// Report format
    #[arg(long, default_value = "terminal", value_name = "FORMAT")]
    pub report: ReportFormat,

    /// PDF output path; use without value to default to label-report.pdf
    #[arg(long, value_name = "FILE", num_args = 0..=1, default_missing_value = "label-report.pdf")]
    pub pdf: Option<PathBuf>,

    /// Write storage-ready analysis records as JSON
    #[arg(long, value_name = "FILE")]
    pub save: Option<PathBuf>,

    /// Product name stored with saved records
    #[arg(long, value_name = "NAME")]
    pub product_name: Option<String>,

    /// Session id stored with saved records
    #[arg(long, value_name = "ID")]
    pub session: Option<String>,
}

#[derive(Args, Debug)]
pub struct IngredientsArgs {
    /// Case-insensitive search over names and alternative names
    #[arg(long)]
    pub search: Option<String>,

    /// Only ingredients with this risk level (e.g. seguro, alto_riesgo, dangerous)
    #[arg(long, value_name = "LEVEL")]
    pub risk: Option<String>,

    /// Only ingredients in this category
    #[arg(long)]
    pub category: Option<String>,

    /// Show a single ingredient in detail
    #[arg(long, conflicts_with_all = ["search", "risk", "category"])]
    pub id: Option<String>,
}

impl IngredientsArgs {
    /// The `--risk` filter, rejecting anything that is not a known level.
    pub fn risk_level(&self) -> Result<Option<RiskLevel>> {
        let Some(raw) = self.risk.as_deref() else {
            return Ok(None);
        };
        match RiskLevel::recognized(raw) {
            Some(level) => Ok(Some(level)),
            None => {
                let accepted = RiskLevel::ALL.map(String::from).join(", ");
                bail!("Unknown risk level '{}'; expected one of: {}", raw, accepted)
            }
        }
    }
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum ReportFormat {
    Terminal,
    Json,
    Pdf,
}

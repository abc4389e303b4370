//! `label-checkr` — analyze recognized label text and assess ingredient health risk.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]).
//! 2. Load config ([`config::load_config`]).
//! 3. Load and merge knowledge-base sources, fetching remote tables concurrently.
//! 4. Publish the table into a [`KnowledgeStore`] and analyze against one snapshot.
//! 5. Render the requested report ([`report`]).
//! 6. Exit `0` or `1` (at least one danger recommendation).

mod cli;

use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cli::{AnalyzeArgs, Cli, Command, IngredientsArgs, ReportFormat};
use label_checkr::config::{load_config, Config};
use label_checkr::knowledge::remote::{fetch_table, is_remote};
use label_checkr::report::{self, LabelReport};
use label_checkr::{AnalysisRecord, Analyzer, IngredientQuery, KnowledgeBase, KnowledgeStore};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let base_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let config = load_config(&base_dir, cli.config.as_deref())?;

    let sources = if cli.kb.is_empty() {
        config.knowledge_base.sources.clone()
    } else {
        cli.kb.clone()
    };
    if sources.is_empty() {
        bail!("No knowledge base configured; pass --kb or set [knowledge_base] sources");
    }

    let store = KnowledgeStore::default();
    store.publish(load_knowledge_base(&sources, cli.quiet).await?);
    let kb = store.snapshot();

    match &cli.command {
        Command::Analyze(args) => {
            let danger = analyze(args, &config, &kb, cli.verbose, cli.quiet)?;
            if danger {
                std::process::exit(1);
            }
        }
        Command::Ingredients(args) => ingredients(args, &kb, cli.quiet)?,
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "label_checkr=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Load every source and concatenate them in the order given.
async fn load_knowledge_base(sources: &[String], quiet: bool) -> Result<KnowledgeBase> {
    use futures::future::join_all;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?;

    let remote_count = sources.iter().filter(|s| is_remote(s)).count();
    let pb = if !quiet && remote_count > 0 {
        let pb = ProgressBar::new(remote_count as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )?
                .progress_chars("#>-"),
        );
        pb.set_message("Fetching ingredient tables");
        Some(pb)
    } else {
        None
    };

    let loads = sources.iter().map(|source| {
        let client = client.clone();
        let pb = pb.clone();
        async move {
            if is_remote(source) {
                let table = fetch_table(&client, source).await;
                if let Some(pb) = &pb {
                    pb.inc(1);
                }
                table.with_context(|| format!("Failed to fetch ingredient table {}", source))
            } else {
                KnowledgeBase::load(Path::new(source))
                    .with_context(|| format!("Failed to load knowledge base {}", source))
            }
        }
    });
    let tables = join_all(loads).await;

    if let Some(pb) = pb {
        pb.finish_with_message("Done");
    }

    let mut kb = KnowledgeBase::default();
    for table in tables {
        kb = kb.merge(table?);
    }

    if kb.malformed_count() > 0 {
        warn!(
            malformed = kb.malformed_count(),
            "some ingredient records are excluded from matching"
        );
    }
    if !quiet {
        eprintln!(
            "  {} {} ingredients from {} source(s)",
            "→".cyan(),
            kb.len(),
            sources.len()
        );
    }

    Ok(kb)
}

/// Returns `true` when any analyzed label produced a danger recommendation.
fn analyze(
    args: &AnalyzeArgs,
    config: &Config,
    kb: &KnowledgeBase,
    verbose: bool,
    quiet: bool,
) -> Result<bool> {
    let inputs = read_inputs(args)?;
    let analyzer = Analyzer::new(&config.analysis()).context("Invalid text configuration")?;

    let pb = if !quiet && inputs.len() > 1 {
        let pb = ProgressBar::new(inputs.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let mut reports = Vec::with_capacity(inputs.len());
    for (source, text) in &inputs {
        let result = analyzer.analyze(text, kb);
        info!(
            source = source.as_str(),
            risk = result.risk_score,
            matched = result.matched.len(),
            "analyzed label"
        );
        reports.push(LabelReport {
            source: source.clone(),
            result,
        });
        if let Some(pb) = &pb {
            pb.inc(1);
        }
    }
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    if let Some(path) = &args.save {
        save_records(path, args, &inputs, &reports)?;
    }

    // --pdf implies PDF format
    let report_format = match &args.pdf {
        Some(_) => ReportFormat::Pdf,
        None => args.report.clone(),
    };
    let pdf_path = args
        .pdf
        .clone()
        .unwrap_or_else(|| PathBuf::from("label-report.pdf"));

    match report_format {
        ReportFormat::Terminal => report::terminal::render(&reports, verbose, quiet)?,
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
        ReportFormat::Pdf => {
            report::pdf::render(&reports, &pdf_path)?;
            if !quiet {
                eprintln!("  {} PDF written to {}", "→".cyan(), pdf_path.display());
            }
        }
    }

    Ok(reports.iter().any(|r| r.result.has_danger()))
}

/// Label texts paired with a display name for their source.
fn read_inputs(args: &AnalyzeArgs) -> Result<Vec<(String, String)>> {
    if let Some(text) = &args.text {
        return Ok(vec![("<text>".to_string(), text.clone())]);
    }
    if args.files.is_empty() {
        bail!("Nothing to analyze; pass label files, `-` for stdin, or --text");
    }

    args.files
        .iter()
        .map(|path| {
            if path.as_os_str() == "-" {
                let mut text = String::new();
                std::io::stdin()
                    .read_to_string(&mut text)
                    .context("Failed to read label text from stdin")?;
                Ok(("<stdin>".to_string(), text))
            } else {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                Ok((path.display().to_string(), text))
            }
        })
        .collect()
}

fn save_records(
    path: &Path,
    args: &AnalyzeArgs,
    inputs: &[(String, String)],
    reports: &[LabelReport],
) -> Result<()> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default();

    let records: Vec<AnalysisRecord> = inputs
        .iter()
        .zip(reports)
        .map(|((_, text), report)| {
            let mut record = AnalysisRecord::new(&report.result, text, now);
            if let Some(name) = &args.product_name {
                record = record.with_product_name(name);
            }
            if let Some(session) = &args.session {
                record = record.with_session(session);
            }
            record
        })
        .collect();

    let json = serde_json::to_string_pretty(&records)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

fn ingredients(args: &IngredientsArgs, kb: &KnowledgeBase, quiet: bool) -> Result<()> {
    if let Some(id) = &args.id {
        let Some(record) = kb.find_by_id(id) else {
            bail!("No ingredient with id {}", id);
        };
        report::terminal::render_ingredient_detail(record);
        return Ok(());
    }

    let query = IngredientQuery {
        search: args.search.clone(),
        risk_level: args.risk_level()?,
        category: args.category.clone(),
    };
    report::terminal::render_ingredients(&kb.query(&query), quiet);
    Ok(())
}

//! Batch processing command for multiple purchase-order sheets.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use clap::Args;
use console::style;
use futures_util::stream::{self, StreamExt};
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, error, warn};

use poscan_core::models::config::PoConfig;
use poscan_core::{
    flatten_outcomes, DocumentOutcome, ExportReport, ExtractionResult, FailureKind,
    PurchaseOrderExtractor,
};

use super::{display_name, load_config, process_file};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Name of the merged export file
    #[arg(long, default_value = "output.csv")]
    merged_name: String,

    /// Also generate a per-file summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,
}

/// One processed file with its timing.
struct ProcessResult {
    path: PathBuf,
    outcome: DocumentOutcome,
    processing_time_ms: u64,
}

/// `results.json` layout.
#[derive(Serialize)]
struct BatchReport<'a> {
    generated_at: String,
    processed_files: usize,
    total_files: usize,
    errors: &'a [String],
    documents: Vec<&'a DocumentOutcome>,
}

pub async fn run(args: BatchArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = Arc::new(load_config(config_path)?);

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    fs::create_dir_all(&args.output_dir)?;

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let extractor = PurchaseOrderExtractor::from_config(&config.extraction);
    let jobs = args.jobs.max(1);

    // `buffered` keeps input order, so file numbers in the report match the
    // order the files were found in.
    let results: Vec<ProcessResult> = stream::iter(files)
        .map(|path| {
            let config = Arc::clone(&config);
            let pb = pb.clone();
            async move {
                let result = process_in_worker(path, extractor, config).await;
                pb.inc(1);
                result
            }
        })
        .buffered(jobs)
        .collect()
        .await;

    pb.finish_with_message("Complete");

    let outcomes: Vec<DocumentOutcome> = results.iter().map(|r| r.outcome.clone()).collect();
    let report = flatten_outcomes(&outcomes);

    let merged_path = args.output_dir.join(&args.merged_name);
    write_merged(&merged_path, &report)?;
    println!(
        "{} Merged {} rows into {}",
        style("✓").green(),
        report.rows.len(),
        merged_path.display()
    );

    let results_path = args.output_dir.join("results.json");
    let batch_report = BatchReport {
        generated_at: Utc::now().to_rfc3339(),
        processed_files: report.processed_files,
        total_files: report.total_files,
        errors: &report.errors,
        documents: outcomes.iter().collect(),
    };
    fs::write(&results_path, serde_json::to_string_pretty(&batch_report)?)?;
    debug!("Wrote results to {}", results_path.display());

    if args.summary {
        let summary_path = args.output_dir.join("summary.csv");
        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let failed: Vec<_> = results.iter().filter(|r| !r.outcome.success).collect();
    let unusable: Vec<_> = results
        .iter()
        .filter(|r| r.outcome.success && !r.outcome.tables.is_usable())
        .collect();

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed, {} without PO or items",
        style(report.processed_files).green(),
        style(failed.len()).red(),
        style(unusable.len()).yellow()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.outcome.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    if !unusable.is_empty() {
        println!();
        println!("{}", style("Skipped in export:").yellow());
        for result in &unusable {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.outcome.tables.usability_issues().join(", ")
            );
        }
    }

    Ok(())
}

/// Run one file on the blocking pool. Extraction reads files and may sleep
/// while polling for readability.
async fn process_in_worker(
    path: PathBuf,
    extractor: PurchaseOrderExtractor,
    config: Arc<PoConfig>,
) -> ProcessResult {
    let file_start = Instant::now();
    let worker_path = path.clone();

    let outcome =
        tokio::task::spawn_blocking(move || process_file(&worker_path, &extractor, &config))
            .await
            .unwrap_or_else(|e| {
                error!("Worker for {} crashed: {}", path.display(), e);
                DocumentOutcome::new(
                    display_name(&path),
                    ExtractionResult::failed(FailureKind::Internal, format!("worker crashed: {}", e)),
                )
            });

    if !outcome.success {
        warn!(
            "Failed to process {}: {}",
            path.display(),
            outcome.error.as_deref().unwrap_or("unknown error")
        );
    }

    ProcessResult {
        path,
        outcome,
        processing_time_ms: file_start.elapsed().as_millis() as u64,
    }
}

fn write_merged(path: &Path, report: &ExportReport) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    for row in &report.rows {
        wtr.serialize(row)?;
    }

    wtr.flush()?;
    Ok(())
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "po",
        "style",
        "items",
        "total_cost",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let outcome = &result.outcome;
        let tables = &outcome.tables;

        if outcome.success {
            let total_cost: Decimal = tables
                .items
                .iter()
                .filter(|item| !item.is_color_subtotal())
                .map(|item| item.total_cost)
                .sum();
            let status = if tables.is_usable() { "success" } else { "incomplete" };

            wtr.write_record([
                outcome.file.as_str(),
                status,
                tables.header.po.as_deref().unwrap_or(""),
                tables.metadata.style.as_deref().unwrap_or(""),
                &tables.items.len().to_string(),
                &total_cost.to_string(),
                &result.processing_time_ms.to_string(),
                &tables.usability_issues().join("; "),
            ])?;
        } else {
            wtr.write_record([
                outcome.file.as_str(),
                "error",
                "",
                "",
                "",
                "",
                &result.processing_time_ms.to_string(),
                outcome.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}

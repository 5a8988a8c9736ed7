//! Process command - extract a single purchase-order sheet.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use poscan_core::{flatten_result, DocumentOutcome, ExtractionResult, PurchaseOrderExtractor};

use super::{load_config, process_file};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF, or JSON rows)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Report a missing PO number or empty item table
    #[arg(long)]
    validate: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output, one row per line item
    Csv,
    /// Plain text summary
    Text,
}

pub async fn run(args: ProcessArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!("Extracting {}...", args.input.display()));

    let extractor = PurchaseOrderExtractor::from_config(&config.extraction);
    let outcome = process_file(&args.input, &extractor, &config);

    pb.finish_and_clear();

    if !outcome.success {
        anyhow::bail!(
            "Extraction failed for {}: {}",
            outcome.file,
            outcome.error.as_deref().unwrap_or("unknown error")
        );
    }

    if args.validate {
        let issues = outcome.tables.usability_issues();
        if !issues.is_empty() {
            eprintln!("{}", style("Validation issues:").yellow());
            for issue in &issues {
                eprintln!("  - {}", issue);
            }
        }
    }

    let output = format_outcome(&outcome, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn format_outcome(outcome: &DocumentOutcome, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(outcome)?),
        OutputFormat::Csv => format_items_csv(&outcome.tables),
        OutputFormat::Text => Ok(format_text(&outcome.tables)),
    }
}

fn format_items_csv(result: &ExtractionResult) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    for row in flatten_result(result) {
        wtr.serialize(row)?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(result: &ExtractionResult) -> String {
    let mut output = String::new();
    let meta = &result.metadata;
    let or_dash = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());

    output.push_str(&format!("PO: {}\n", or_dash(&result.header.po)));
    output.push_str(&format!("Style: {}\n", or_dash(&meta.style)));
    if let Some(description) = &meta.style_description {
        output.push_str(&format!("  {}\n", description));
    }
    output.push_str(&format!("Brand: {}\n", or_dash(&meta.brand_desc)));
    if let Some(goods) = &meta.commercial_goods {
        output.push_str(&format!("Commercial goods: {}\n", goods));
    }
    if let Some(proto) = &meta.style_proto {
        output.push_str(&format!("Style proto: {}\n", proto));
    }
    let or_dash_date = |date: Option<NaiveDate>| {
        date.map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string())
    };
    output.push_str(&format!(
        "Original CRD: {}   Original In-DC: {}\n",
        or_dash_date(meta.crd_date()),
        or_dash_date(meta.in_dc_date())
    ));
    output.push('\n');

    let shipping = &result.shipping;
    if shipping.buyer.is_some() {
        output.push_str("Shipping:\n");
        for line in [&shipping.buyer, &shipping.vendor, &shipping.shipping_destination]
            .into_iter()
            .flatten()
        {
            output.push_str(&format!("  {}\n", line));
        }
        output.push('\n');
    }

    output.push_str(&format!("Items ({}):\n", result.items.len()));
    for item in &result.items {
        if item.is_color_subtotal() {
            output.push_str(&format!(
                "  Total for color {:<10} qty {:>5}  {:>10}\n",
                item.color, item.current_quantity, item.total_cost
            ));
        } else {
            output.push_str(&format!(
                "  {:<8} {:<6} {:<14} qty {:>5} @ {:>8} = {:>10}\n",
                item.color,
                item.size,
                item.upc,
                item.current_quantity,
                item.unit_cost,
                item.total_cost
            ));
        }
    }

    output
}

//! # postpack CLI
//!
//! Command-line interface for the postpack library.

use std::fs;
use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;

use postpack::cli::{Args, LayoutChoice};
use postpack::config::PipelineConfig;
use postpack::error::PostpackError;
use postpack::extract::DiscardReason;
use postpack::layout::Layout;
use postpack::output::{OutputFormat, write_to_format};
use postpack::pipeline::{Pipeline, finalize};
use postpack::store::{MemoryStore, RecordStore};

/// Lines sampled from the head of the file for layout auto-detection.
const DETECT_SAMPLE: usize = 20;

fn main() {
    if let Err(e) = run() {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), PostpackError> {
    let total_start = Instant::now();
    let args = <Args as ClapParser>::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let output_path = adjust_output_extension(&args.output, args.format);

    // Print header
    println!("📦 postpack v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📂 Input:   {}", args.input);
    println!("💾 Output:  {}", output_path);
    println!("📄 Format:  {}", args.format);

    let blob = fs::read_to_string(&args.input)?;

    // Resolve the layout, detecting from a sample when asked to
    let layout = resolve_layout(args.layout, &blob, args.delimiter)?;
    println!("🗂️  Layout:  {}", args.layout);

    // Build pipeline configuration
    let mut config = PipelineConfig::new()
        .with_delimiter(args.delimiter)
        .with_layout(layout)
        .with_require_timestamp(!args.keep_missing_timestamps);
    if let Some(min_fields) = args.min_fields {
        config = config.with_min_fields(min_fields);
    }

    println!();

    // Step 1: Ingest
    println!("⏳ Parsing export...");
    let parse_start = Instant::now();
    let (records, report) = Pipeline::with_config(config).ingest(&blob);
    let parse_time = parse_start.elapsed();
    println!(
        "   {} records found, {} lines skipped ({:.2}s)",
        report.accepted,
        report.discarded(),
        parse_time.as_secs_f64()
    );
    for &reason in DiscardReason::all() {
        let count = report.count_of(reason);
        if count > 0 {
            println!("     {} × {}", count, reason);
        }
    }

    // Step 2: Dedup and clean
    println!("🔀 Deduplicating...");
    let final_records = finalize(records);
    println!("   {} records after dedup/clean", final_records.len());

    // Step 3: Aggregate stats via the reference store
    let mut store = MemoryStore::new();
    store.insert(&final_records);
    let stats = store.stats();

    // Step 4: Write output
    let format: OutputFormat = args.format.into();
    println!("💾 Writing {}...", format);
    let write_start = Instant::now();
    write_to_format(&final_records, &output_path, format)?;
    println!("   Written in {:.2}s", write_start.elapsed().as_secs_f64());

    let total_time = total_start.elapsed();

    println!();
    println!("✅ Done! Output saved to {}", output_path);

    // Summary
    println!();
    println!("📊 Summary:");
    println!("   Accepted:       {} records", report.accepted);
    println!("   Skipped:        {} lines", report.discarded());
    println!("   Final:          {} records", final_records.len());
    println!("   Unique authors: {}", stats.unique_authors);
    if let (Some(earliest), Some(latest)) = (stats.earliest, stats.latest) {
        println!(
            "   Range:          {} — {}",
            earliest.format("%Y-%m-%d %H:%M:%S"),
            latest.format("%Y-%m-%d %H:%M:%S")
        );
    }

    // Performance stats
    println!();
    println!("⚡ Performance:");
    println!("   Total time:  {:.2}s", total_time.as_secs_f64());
    let lines_per_sec = blob.lines().count() as f64 / total_time.as_secs_f64();
    println!("   Throughput:  {:.0} lines/sec", lines_per_sec);

    Ok(())
}

/// Resolves the layout choice, sampling the file head when detection is
/// requested.
fn resolve_layout(
    choice: LayoutChoice,
    blob: &str,
    delimiter: char,
) -> Result<Layout, PostpackError> {
    if let Some(layout) = choice.layout() {
        return Ok(layout);
    }

    let sample: Vec<&str> = blob
        .lines()
        .filter(|l| !l.trim().is_empty())
        .take(DETECT_SAMPLE)
        .collect();

    Layout::detect(&sample, delimiter).ok_or_else(|| {
        PostpackError::invalid_format(
            "layout",
            "Could not detect the export layout. \
             Pass --layout classic or --layout compact explicitly.",
        )
    })
}

/// Adjusts output file extension based on format if using default output.
fn adjust_output_extension(output: &str, format: postpack::cli::OutputFormat) -> String {
    if output != "records.csv" {
        return output.to_string();
    }

    format!("records.{}", format.extension())
}

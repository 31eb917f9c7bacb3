//! pdfmerge - Combine selected pages of several PDF files into one document.
//!
//! Merges PDF files in plan order, renders page previews, and offers an
//! interactive session for editing a merge plan.

mod cli;

use clap::Parser;
use std::path::Path;
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands, MergeArgs, PreviewArgs, SessionArgs, Verbosity};
use pdfmerge::config::{Config, OverwriteMode};
use pdfmerge::error::PdfMergeError;
use pdfmerge::io::{PdfReader, PdfWriter};
use pdfmerge::merge::{MergeOptions, MergeReport, Merger};
use pdfmerge::output::{OutputFormatter, display_merge_report, display_plan, display_statistics};
use pdfmerge::preview::PreviewRenderer;
use pdfmerge::session::Session;

/// Environment variable holding a `tracing` filter directive.
const LOG_ENV: &str = "PDFMERGE_LOG";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();
    init_tracing(cli.verbosity);

    // Run the application and handle errors
    if let Err(err) = run(cli).await {
        eprintln!("Error: {err}");
        process::exit(err.exit_code());
    }
}

/// Log to stderr, filtered by `PDFMERGE_LOG` or the verbosity flag.
fn init_tracing(verbosity: Verbosity) {
    let default_level = if verbosity.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Main application logic.
async fn run(cli: Cli) -> Result<(), PdfMergeError> {
    debug!(command = ?cli.command, "starting {} v{}", pdfmerge::NAME, pdfmerge::VERSION);

    match cli.command {
        Commands::Merge(args) => run_merge(&args, cli.verbosity).await,
        Commands::Preview(args) => run_preview(&args, cli.verbosity),
        Commands::Session(args) => run_session(&args, cli.verbosity).await,
    }
}

async fn run_merge(args: &MergeArgs, verbosity: Verbosity) -> Result<(), PdfMergeError> {
    let config = args.to_config(verbosity).await?;
    let formatter = OutputFormatter::from_config(&config);

    // Print header
    if formatter.should_print() {
        formatter.section(&format!("{} v{}", pdfmerge::NAME, pdfmerge::VERSION));
        formatter.blank_line();
    }

    if formatter.is_verbose() {
        display_plan(&formatter, &config.plan);
        formatter.blank_line();
    }

    // Handle output file existence
    if !config.dry_run {
        handle_output_overwrite(&config, &formatter).await?;
        PdfWriter::new().can_write(&config.output).await?;
    }

    formatter.info(&format!("Merging {} file(s)...", config.plan.len()));

    let merger = Merger::with_options(MergeOptions::from(&config));
    let outcome = merger.merge(&config.plan).await?;

    display_merge_report(&formatter, &outcome.report);

    if let Some(report_path) = &config.report {
        write_report(&outcome.report, report_path).await?;
        formatter.debug(&format!("Report written to {}", report_path.display()));
    }

    // Dry run mode - stop here
    if config.dry_run {
        formatter.blank_line();
        formatter.success("Dry run completed successfully");
        formatter.info(&format!("  Output would be: {}", config.output.display()));
        formatter.info("  Run without --dry-run to create the merged PDF");
        return Ok(());
    }

    if outcome.report.total_pages == 0 {
        return Err(PdfMergeError::NothingToWrite);
    }

    // Write the output
    formatter.info(&format!("Writing to: {}", config.output.display()));

    let write_stats = PdfWriter::new()
        .save_with_stats(outcome.document, &config.output)
        .await?;

    if formatter.should_print() {
        formatter.blank_line();
        formatter.success(&format!(
            "Successfully created {} ({})",
            config.output.display(),
            write_stats.format_file_size()
        ));
        display_statistics(&formatter, &outcome.report, &write_stats);
    }

    Ok(())
}

fn run_preview(args: &PreviewArgs, verbosity: Verbosity) -> Result<(), PdfMergeError> {
    let formatter = OutputFormatter::new(verbosity.quiet, verbosity.verbose);
    PdfReader::check_path(&args.file)?;

    let renderer = PreviewRenderer::system()?;
    let pages = renderer.render(&args.file, args.span().as_ref())?;

    if pages.is_empty() {
        formatter.warning("The page range selects no pages; nothing to preview");
        return Ok(());
    }

    let written = PreviewRenderer::write_png(&pages, &args.dir, &args.stem())?;
    for path in &written {
        formatter.debug(&format!("Wrote {}", path.display()));
    }

    formatter.success(&format!(
        "Rendered {} page(s) to {}",
        written.len(),
        args.dir.display()
    ));

    Ok(())
}

async fn run_session(args: &SessionArgs, verbosity: Verbosity) -> Result<(), PdfMergeError> {
    let formatter = OutputFormatter::new(verbosity.quiet, verbosity.verbose);
    formatter.info(&format!(
        "{} v{} - type 'help' for a list of commands",
        pdfmerge::NAME,
        pdfmerge::VERSION
    ));

    let input = tokio::io::BufReader::new(tokio::io::stdin());
    let mut session = Session::new(input, &formatter).with_merge_options(args.merge_options()?);
    session.run().await
}

/// Write the merge report as JSON.
async fn write_report(report: &MergeReport, path: &Path) -> Result<(), PdfMergeError> {
    let json = report.to_json()?;
    tokio::fs::write(path, json)
        .await
        .map_err(|source| PdfMergeError::FailedToWrite {
            path: path.to_path_buf(),
            source,
        })
}

/// Handle output file overwrite scenarios.
async fn handle_output_overwrite(
    config: &Config,
    formatter: &OutputFormatter,
) -> Result<(), PdfMergeError> {
    // Check if output exists
    if !PdfWriter::new().exists(&config.output).await {
        return Ok(());
    }

    match config.overwrite_mode {
        OverwriteMode::Force => Ok(()),
        OverwriteMode::NoClobber => Err(PdfMergeError::output_exists(config.output.clone())),
        OverwriteMode::Prompt => {
            if formatter.is_quiet() {
                // In quiet mode, treat as no-clobber
                return Err(PdfMergeError::output_exists(config.output.clone()));
            }

            formatter.warning(&format!(
                "Output file already exists: {}",
                config.output.display()
            ));
            formatter.prompt("Overwrite? [y/N]: ");

            let mut response = String::new();
            std::io::stdin()
                .read_line(&mut response)
                .map_err(|err| PdfMergeError::other(format!("Failed to read input: {err}")))?;

            let response = response.trim().to_lowercase();
            if response == "y" || response == "yes" {
                Ok(())
            } else {
                Err(PdfMergeError::Cancelled)
            }
        }
    }
}

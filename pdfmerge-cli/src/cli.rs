//! CLI argument parsing for pdfmerge.
//!
//! This module defines the command-line interface structure using `clap`.
//! It handles argument parsing, validation, and help text generation.
//!
//! # Examples
//!
//! ```no_run
//! use clap::Parser;
//!
//! let cli = Cli::parse();
//! if let Commands::Merge(args) = &cli.command {
//!     println!("Merging {} inputs", args.inputs.len());
//! }
//! ```

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;

use pdfmerge::config::{
    CompressionLevel, Config, OverwriteMode, PageSpan, RangeAssignment, read_plan_file,
};
use pdfmerge::error::Result;
use pdfmerge::merge::MergeOptions;
use pdfmerge::plan::MergePlan;
use pdfmerge::utils::{ensure_pdf_extension, expand_input_patterns};

/// Combine selected pages of several PDF files into one document.
///
/// pdfmerge merges PDF files in the order given, optionally taking only a
/// page range from each of them. Files that cannot be opened are skipped
/// with a warning so the rest of the merge still succeeds.
#[derive(Parser, Debug)]
#[command(name = "pdfmerge")]
#[command(version)]
#[command(about = "Combine selected pages of several PDF files into one document", long_about = None)]
#[command(author)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub verbosity: Verbosity,
}

/// Output verbosity, accepted before or after the subcommand.
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct Verbosity {
    /// Verbose output - show per-entry details and statistics
    ///
    /// Also raises the default log level to debug.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all non-error output
    ///
    /// Only errors and warnings will be printed.
    /// Useful for scripts and automation.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Merge PDF files into a single document
    Merge(MergeArgs),

    /// Render the pages of a PDF to PNG previews
    Preview(PreviewArgs),

    /// Edit a merge plan interactively, one command per line
    Session(SessionArgs),
}

#[derive(Args, Debug)]
pub struct MergeArgs {
    /// Input PDF files to merge (in order)
    ///
    /// Specify multiple files or use glob patterns.
    /// Files are merged in the order provided.
    ///
    /// Examples:
    ///   pdfmerge merge file1.pdf file2.pdf -o output.pdf
    ///   pdfmerge merge chapter*.pdf -o book.pdf
    #[arg(value_name = "FILE", required_unless_present = "plan")]
    pub inputs: Vec<String>,

    /// Output PDF file path
    ///
    /// '.pdf' is appended when the name has no PDF extension.
    /// Use --force to overwrite existing files without confirmation.
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,

    /// Take only pages FROM to TO of entry N (1-based, repeatable)
    ///
    /// Bounds that are not positive whole numbers make the entry
    /// contribute all of its pages. The end is clamped to the document.
    ///
    /// Examples:
    ///   --range 2:3-7       # pages 3 to 7 of the second file
    #[arg(long = "range", value_name = "N:FROM-TO", value_parser = parse_range)]
    pub ranges: Vec<RangeAssignment>,

    /// Read more entries from a plan file
    ///
    /// One entry per line: a path, optionally followed by the first and
    /// last page. Quote paths containing spaces. Lines starting with '#'
    /// are comments. Plan entries come after the FILE arguments.
    ///
    /// Example:
    ///   pdfmerge merge --plan book.txt -o book.pdf
    #[arg(long, value_name = "FILE")]
    pub plan: Option<PathBuf>,

    /// Dry run - merge in memory and report without writing the output
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Force overwrite of existing output file without confirmation
    #[arg(short, long)]
    pub force: bool,

    /// Never overwrite existing output file
    #[arg(long, conflicts_with = "force")]
    pub no_clobber: bool,

    /// Compression level for output PDF
    ///
    /// - none: Keep streams as they are
    /// - standard: Compress streams (default)
    /// - maximum: Compress streams and drop embedded page thumbnails
    #[arg(short, long, value_name = "LEVEL", default_value = "standard")]
    #[arg(value_parser = ["none", "standard", "maximum"])]
    pub compression: String,

    /// Stop at the first file that cannot be merged
    ///
    /// By default such files are skipped with a warning.
    #[arg(long)]
    pub strict: bool,

    /// Write a JSON report of the merge to FILE
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct PreviewArgs {
    /// PDF file to preview
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// First page to render
    ///
    /// Used only together with --to; otherwise every page is rendered.
    #[arg(long, value_name = "PAGE")]
    pub from: Option<String>,

    /// Last page to render
    #[arg(long, value_name = "PAGE")]
    pub to: Option<String>,

    /// Directory for the PNG files
    #[arg(short = 'd', long, value_name = "DIR", default_value = ".")]
    pub dir: PathBuf,
}

#[derive(Args, Debug)]
pub struct SessionArgs {
    /// Compression level for merges made in the session
    #[arg(short, long, value_name = "LEVEL", default_value = "standard")]
    #[arg(value_parser = ["none", "standard", "maximum"])]
    pub compression: String,

    /// Stop a merge at the first file that cannot be merged
    #[arg(long)]
    pub strict: bool,
}

fn parse_range(s: &str) -> std::result::Result<RangeAssignment, String> {
    RangeAssignment::parse(s).map_err(|e| format!("{e:#}"))
}

impl MergeArgs {
    /// Convert merge arguments into a validated Config.
    ///
    /// This method performs the following:
    /// - Expands input patterns and appends plan file entries
    /// - Applies `--range` assignments to the combined plan
    /// - Resolves overwrite mode and compression level
    /// - Appends `.pdf` to the output name when missing
    /// - Validates the resulting configuration
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - An input pattern is malformed
    /// - The plan file cannot be read or parsed
    /// - A range names an entry that does not exist
    /// - Configuration validation fails
    pub async fn to_config(&self, verbosity: Verbosity) -> Result<Config> {
        let mut plan = MergePlan::new();
        plan.replace(expand_input_patterns(&self.inputs)?);

        if let Some(plan_file) = &self.plan {
            for entry in read_plan_file(plan_file).await? {
                plan.push(entry);
            }
        }

        for assignment in &self.ranges {
            assignment.apply(&mut plan)?;
        }

        let overwrite_mode = if self.force {
            OverwriteMode::Force
        } else if self.no_clobber {
            OverwriteMode::NoClobber
        } else {
            OverwriteMode::Prompt
        };

        let mut config = Config::new(plan, ensure_pdf_extension(&self.output));
        config.dry_run = self.dry_run;
        config.verbose = verbosity.verbose;
        config.quiet = verbosity.quiet;
        config.overwrite_mode = overwrite_mode;
        config.compression = CompressionLevel::from_str(&self.compression)?;
        config.strict = self.strict;
        config.report = self.report.clone();

        config.validate()?;

        Ok(config)
    }
}

impl PreviewArgs {
    /// Page span to render. Both bounds must be valid page numbers.
    pub fn span(&self) -> Option<PageSpan> {
        PageSpan::parse_bounds(
            self.from.as_deref().unwrap_or_default(),
            self.to.as_deref().unwrap_or_default(),
        )
    }

    /// Stem of the PNG file names.
    pub fn stem(&self) -> String {
        self.file
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "preview".to_string())
    }
}

impl SessionArgs {
    /// Merge options for the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the compression level is invalid.
    pub fn merge_options(&self) -> Result<MergeOptions> {
        Ok(MergeOptions {
            compression: CompressionLevel::from_str(&self.compression)?,
            strict: self.strict,
        })
    }
}

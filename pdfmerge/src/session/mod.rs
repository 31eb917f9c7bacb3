//! Interactive plan editing.
//!
//! A session keeps a [`MergePlan`] in memory and applies one command per
//! input line. Lines are split like a shell would, so quoted paths with spaces
//! work. A failing command prints its error and the session carries on.
//!
//! ```text
//! pdfmerge> open intro.pdf "chapter 1.pdf" appendix.pdf
//! pdfmerge> select 3
//! pdfmerge> up
//! pdfmerge> range 2 5 12
//! pdfmerge> merge book
//! ```

use anyhow::{Context, bail};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use crate::config::parse_entry_number;
use crate::error::{PdfMergeError, Result};
use crate::io::PdfWriter;
use crate::merge::{MergeOptions, Merger};
use crate::output::{OutputFormatter, display_merge_report, display_plan};
use crate::plan::MergePlan;
use crate::preview::PreviewRenderer;
use crate::utils::{ensure_pdf_extension, expand_input_patterns};

const PROMPT: &str = "pdfmerge> ";

const HELP: &str = "\
Commands:
  open <file>...             replace the plan with these files (globs allowed)
  list                       show the plan, '>' marks the selected entry
  select <n>                 select entry n
  up | down                  move the selected entry one step
  range <n> <from> <to>      merge only pages from..to of entry n
  range <n>                  merge all pages of entry n
  preview <n> [dir]          render the pages of entry n to PNG files
  merge <output>             merge the plan and save it
  help                       show this help
  quit | exit                leave the session";

/// A parsed session command. Entry numbers are already zero-based.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum Command {
    /// Replace the plan with these paths or glob patterns.
    Open(Vec<String>),
    List,
    Select(usize),
    Up,
    Down,
    /// Set a page range from raw bound text.
    Range {
        index: usize,
        from: String,
        to: String,
    },
    ClearRange(usize),
    /// Render an entry to PNG files, in the current directory by default.
    Preview {
        index: usize,
        dir: Option<PathBuf>,
    },
    /// Merge and save, appending `.pdf` when missing.
    Merge(PathBuf),
    Help,
    Quit,
}

impl Command {
    /// Parse one input line. Blank lines parse to `None`.
    pub fn parse(line: &str) -> anyhow::Result<Option<Self>> {
        let words = shell_words::split(line).context("Unbalanced quotes")?;
        let Some((name, args)) = words.split_first() else {
            return Ok(None);
        };

        let command = match (name.as_str(), args) {
            ("open", paths) => Self::Open(paths.to_vec()),
            ("list" | "ls", []) => Self::List,
            ("select", [n]) => Self::Select(parse_entry_number(n)?),
            ("up", []) => Self::Up,
            ("down", []) => Self::Down,
            ("range", [n]) => Self::ClearRange(parse_entry_number(n)?),
            ("range", [n, from, to]) => Self::Range {
                index: parse_entry_number(n)?,
                from: from.clone(),
                to: to.clone(),
            },
            ("preview", [n]) => Self::Preview {
                index: parse_entry_number(n)?,
                dir: None,
            },
            ("preview", [n, dir]) => Self::Preview {
                index: parse_entry_number(n)?,
                dir: Some(PathBuf::from(dir)),
            },
            ("merge", [output]) => Self::Merge(PathBuf::from(output)),
            ("help" | "?", []) => Self::Help,
            ("quit" | "exit", []) => Self::Quit,
            (
                "list" | "ls" | "select" | "up" | "down" | "range" | "preview" | "merge" | "help"
                | "?" | "quit" | "exit",
                _,
            ) => bail!("Wrong number of arguments for '{name}'. Type 'help' for usage"),
            _ => bail!("Unknown command '{name}'. Type 'help' for a list of commands"),
        };

        Ok(Some(command))
    }
}

/// Whether the session keeps reading commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read the next command.
    Continue,
    /// End the session.
    Quit,
}

/// An interactive editing session over a line-based input.
pub struct Session<'f, R> {
    input: R,
    formatter: &'f OutputFormatter,
    plan: MergePlan,
    merger: Merger,
    writer: PdfWriter,
    previews: Option<PreviewRenderer>,
}

impl<'f, R> Session<'f, R>
where
    R: AsyncBufRead + Unpin,
{
    /// Start a session with an empty plan.
    pub fn new(input: R, formatter: &'f OutputFormatter) -> Self {
        Self {
            input,
            formatter,
            plan: MergePlan::new(),
            merger: Merger::new(),
            writer: PdfWriter::new(),
            previews: None,
        }
    }

    /// Use custom merge options.
    pub fn with_merge_options(mut self, options: MergeOptions) -> Self {
        self.merger = Merger::with_options(options);
        self
    }

    /// Render previews with `renderer` instead of the system backend.
    pub fn with_previews(mut self, renderer: PreviewRenderer) -> Self {
        self.previews = Some(renderer);
        self
    }

    /// The plan as edited so far.
    pub fn plan(&self) -> &MergePlan {
        &self.plan
    }

    /// Read and apply commands until `quit` or end of input.
    ///
    /// # Errors
    ///
    /// Only fails when the input cannot be read. Command errors are printed.
    pub async fn run(&mut self) -> Result<()> {
        let mut line = String::new();

        loop {
            self.formatter.prompt(PROMPT);

            line.clear();
            if self.input.read_line(&mut line).await? == 0 {
                debug!("end of session input");
                break;
            }

            let command = match Command::parse(line.trim()) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(err) => {
                    self.formatter.error(&format!("{err:#}"));
                    continue;
                }
            };

            match self.execute(command).await {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => break,
                Err(err) => self.formatter.error(&err.to_string()),
            }
        }

        Ok(())
    }

    /// Apply one command to the plan.
    pub async fn execute(&mut self, command: Command) -> Result<Flow> {
        debug!(?command, "session command");

        match command {
            Command::Open(patterns) => self.open(&patterns)?,
            Command::List => display_plan(self.formatter, &self.plan),
            Command::Select(index) => {
                self.plan.select(index)?;
                display_plan(self.formatter, &self.plan);
            }
            Command::Up => self.reorder(MergePlan::move_up),
            Command::Down => self.reorder(MergePlan::move_down),
            Command::Range { index, from, to } => {
                self.plan.set_page_range(index, &from, &to)?;
                self.report_range(index);
            }
            Command::ClearRange(index) => {
                self.plan.clear_page_range(index)?;
                self.report_range(index);
            }
            Command::Preview { index, dir } => self.preview(index, dir.as_deref())?,
            Command::Merge(output) => self.merge(&output).await?,
            Command::Help => self.formatter.info(HELP),
            Command::Quit => return Ok(Flow::Quit),
        }

        Ok(Flow::Continue)
    }

    fn open(&mut self, patterns: &[String]) -> Result<()> {
        let paths = expand_input_patterns(patterns)?;
        if !self.plan.replace(paths) {
            self.formatter.info("No files selected; the plan is unchanged");
            return Ok(());
        }

        display_plan(self.formatter, &self.plan);
        Ok(())
    }

    fn reorder(&mut self, step: fn(&mut MergePlan) -> bool) {
        if step(&mut self.plan) {
            display_plan(self.formatter, &self.plan);
        } else {
            self.formatter.info("Nothing to move");
        }
    }

    fn report_range(&self, index: usize) {
        let entry = &self.plan.entries()[index];
        match entry.page_range {
            Some(span) => self.formatter.info(&format!(
                "Entry {} will contribute pages {span}",
                index + 1
            )),
            None => self
                .formatter
                .info(&format!("Entry {} will contribute all pages", index + 1)),
        }
    }

    fn preview(&mut self, index: usize, dir: Option<&Path>) -> Result<()> {
        let entry = self
            .plan
            .entries()
            .get(index)
            .cloned()
            .ok_or(PdfMergeError::InvalidEntryIndex {
                index,
                len: self.plan.len(),
            })?;

        let renderer = match self.previews.take() {
            Some(renderer) => renderer,
            None => PreviewRenderer::system()?,
        };
        let rendered = renderer.render(&entry.path, entry.page_range.as_ref());
        self.previews = Some(renderer);

        let pages = rendered?;
        if pages.is_empty() {
            self.formatter.warning(&format!(
                "Entry {} selects no pages; nothing to preview",
                index + 1
            ));
            return Ok(());
        }

        let stem = entry
            .path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "preview".to_string());
        let written =
            PreviewRenderer::write_png(&pages, dir.unwrap_or_else(|| Path::new(".")), &stem)?;

        for path in written {
            self.formatter.info(&format!("Wrote {}", path.display()));
        }
        Ok(())
    }

    async fn merge(&mut self, output: &Path) -> Result<()> {
        if self.plan.is_empty() {
            self.formatter.warning("Select PDF files first");
            return Ok(());
        }

        let output = ensure_pdf_extension(output);
        if self.plan.contains_path(&output) {
            return Err(PdfMergeError::invalid_config(format!(
                "Output file cannot be the same as an input file: {}",
                output.display()
            )));
        }

        if self.writer.exists(&output).await && !self.confirm_overwrite(&output).await? {
            self.formatter.info("Merge cancelled");
            return Ok(());
        }

        let outcome = self.merger.merge(&self.plan).await?;
        display_merge_report(self.formatter, &outcome.report);

        if outcome.report.total_pages == 0 {
            return Err(PdfMergeError::NothingToWrite);
        }

        let stats = self.writer.save_with_stats(outcome.document, &output).await?;
        self.formatter.success(&format!(
            "Successfully created {} ({})",
            output.display(),
            stats.format_file_size()
        ));
        Ok(())
    }

    async fn confirm_overwrite(&mut self, output: &Path) -> Result<bool> {
        self.formatter
            .warning(&format!("Output file already exists: {}", output.display()));
        self.formatter.prompt("Overwrite? [y/N]: ");

        let mut response = String::new();
        self.input.read_line(&mut response).await?;

        let response = response.trim().to_lowercase();
        Ok(response == "y" || response == "yes")
    }
}

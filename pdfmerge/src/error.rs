//! Error types for pdfmerge.
//!
//! Errors carry the offending path and the underlying cause so they can be
//! shown to the user as-is. They fall into a few groups:
//!
//! - **Source errors**: an input is missing, unreadable or not a valid PDF.
//!   During a merge these only skip the affected entry.
//! - **Save errors**: the output cannot be created or written. The merged
//!   document is discarded.
//! - **Plan errors**: bad entry indices, malformed plan files, bad options.
//! - **Preview errors**: rasterisation failed or is not compiled in.

use std::io;
use std::path::PathBuf;

/// Result type alias for pdfmerge operations.
pub type Result<T> = std::result::Result<T, PdfMergeError>;

/// Main error type for pdfmerge operations.
#[derive(Debug, thiserror::Error)]
pub enum PdfMergeError {
    /// Input file was not found.
    #[error("File not found: {}", .path.display())]
    FileNotFound {
        /// Path to the file that was not found.
        path: PathBuf,
    },

    /// Input path exists but is not a regular file.
    #[error("Not a file: {}", .path.display())]
    NotAFile {
        /// Offending path.
        path: PathBuf,
    },

    /// Failed to load a PDF file.
    #[error("Failed to load PDF: {}\n  Reason: {reason}", .path.display())]
    FailedToLoadPdf {
        /// Path to the PDF file.
        path: PathBuf,
        /// Reason for the failure.
        reason: String,
    },

    /// PDF file is corrupted or has an unusable structure.
    #[error("Corrupted or invalid PDF: {}\n  Details: {details}", .path.display())]
    CorruptedPdf {
        /// Path to the corrupted PDF.
        path: PathBuf,
        /// Details about the corruption.
        details: String,
    },

    /// PDF file is encrypted and cannot be processed.
    #[error(
        "PDF is encrypted and cannot be processed: {}\n  \
         Hint: Decrypt the PDF first using 'qpdf --decrypt' or similar tools",
        .path.display()
    )]
    EncryptedPdf {
        /// Path to the encrypted PDF.
        path: PathBuf,
    },

    /// The merge plan has no entries.
    #[error("No PDF files selected. Select PDF files first")]
    NoFilesToMerge,

    /// Every entry failed or selected zero pages.
    #[error("Nothing to write: the merged document has no pages")]
    NothingToWrite,

    /// Output file already exists and overwrite is not allowed.
    #[error(
        "Output file already exists: {}\n  \
         Use --force to overwrite or choose a different output path",
        .path.display()
    )]
    OutputExists {
        /// Path to the existing output file.
        path: PathBuf,
    },

    /// Failed to create the output file.
    #[error("Failed to create output file: {}\n  Reason: {source}", .path.display())]
    FailedToCreateOutput {
        /// Path where output should be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to write the output file.
    #[error("Failed to write to output file: {}\n  Reason: {source}", .path.display())]
    FailedToWrite {
        /// Path being written to.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// An entry index does not exist in the merge plan.
    #[error("No entry {} in the merge plan (it has {len} entries)", .index + 1)]
    InvalidEntryIndex {
        /// Zero-based index that was requested.
        index: usize,
        /// Current number of entries.
        len: usize,
    },

    /// A plan file could not be read.
    #[error("Failed to read plan file: {}\n  Reason: {source}", .path.display())]
    FailedToReadPlanFile {
        /// Path to the plan file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// A plan file line is malformed.
    #[error(
        "Invalid entry in plan file: {} at line {line_number}\n  Details: {details}",
        .path.display()
    )]
    InvalidPlanFile {
        /// Path to the plan file.
        path: PathBuf,
        /// Line number with the error.
        line_number: usize,
        /// What is wrong with the line.
        details: String,
    },

    /// Merge operation failed.
    #[error("Merge operation failed: {reason}")]
    MergeFailed {
        /// Description of what went wrong.
        reason: String,
    },

    /// A preview could not be produced.
    #[error("Failed to preview PDF: {}\n  Reason: {reason}", .path.display())]
    PreviewFailed {
        /// Path of the previewed document.
        path: PathBuf,
        /// Reason for the failure.
        reason: String,
    },

    /// No rasteriser is available in this build.
    #[error("Page previews are not available: {reason}")]
    PreviewUnavailable {
        /// Why no backend could be used.
        reason: String,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// User cancelled the operation.
    #[error("Operation cancelled by user")]
    Cancelled,

    /// Generic I/O error.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },

    /// Generic error with a custom message.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

impl From<lopdf::Error> for PdfMergeError {
    fn from(err: lopdf::Error) -> Self {
        Self::other(err.to_string())
    }
}

impl From<anyhow::Error> for PdfMergeError {
    fn from(err: anyhow::Error) -> Self {
        Self::other(format!("{err:#}"))
    }
}

impl PdfMergeError {
    /// Create a FileNotFound error.
    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    /// Create a NotAFile error.
    pub fn not_a_file(path: PathBuf) -> Self {
        Self::NotAFile { path }
    }

    /// Create a FailedToLoadPdf error.
    pub fn failed_to_load_pdf(path: PathBuf, reason: impl Into<String>) -> Self {
        Self::FailedToLoadPdf {
            path,
            reason: reason.into(),
        }
    }

    /// Create a CorruptedPdf error.
    pub fn corrupted_pdf(path: PathBuf, details: impl Into<String>) -> Self {
        Self::CorruptedPdf {
            path,
            details: details.into(),
        }
    }

    /// Create an EncryptedPdf error.
    pub fn encrypted_pdf(path: PathBuf) -> Self {
        Self::EncryptedPdf { path }
    }

    /// Create an OutputExists error.
    pub fn output_exists(path: PathBuf) -> Self {
        Self::OutputExists { path }
    }

    /// Create a MergeFailed error.
    pub fn merge_failed(reason: impl Into<String>) -> Self {
        Self::MergeFailed {
            reason: reason.into(),
        }
    }

    /// Create a PreviewFailed error.
    pub fn preview_failed(path: PathBuf, reason: impl Into<String>) -> Self {
        Self::PreviewFailed {
            path,
            reason: reason.into(),
        }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an Other error with a custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Whether this error happened while persisting the output.
    pub fn is_save_failure(&self) -> bool {
        matches!(
            self,
            Self::FailedToCreateOutput { .. } | Self::FailedToWrite { .. }
        )
    }

    /// Get the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. } => 2,
            Self::NotAFile { .. } => 2,
            Self::FailedToReadPlanFile { .. } => 2,
            Self::FailedToLoadPdf { .. } => 3,
            Self::CorruptedPdf { .. } => 3,
            Self::EncryptedPdf { .. } => 3,
            Self::NoFilesToMerge => 1,
            Self::NothingToWrite => 1,
            Self::InvalidEntryIndex { .. } => 1,
            Self::InvalidPlanFile { .. } => 1,
            Self::InvalidConfig { .. } => 1,
            Self::OutputExists { .. } => 4,
            Self::FailedToCreateOutput { .. } => 5,
            Self::FailedToWrite { .. } => 5,
            Self::Io { .. } => 5,
            Self::MergeFailed { .. } => 6,
            Self::PreviewFailed { .. } => 7,
            Self::PreviewUnavailable { .. } => 7,
            Self::Cancelled => 130, // SIGINT convention
            Self::Other { .. } => 1,
        }
    }
}

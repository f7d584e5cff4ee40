// Core types and errors for pdfxpose
use std::path::{Path, PathBuf};

use crate::pdf_extraction::GatewayError;
use crate::verdict::Verdict;

/// One input PDF. Never modified while it is being analysed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    path: PathBuf,
}

impl Document {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// A single-page PDF split out of a [`Document`] inside its workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// 1-based physical page number assigned at split time.
    pub index: usize,
    pub path: PathBuf,
}

impl Page {
    pub fn new(index: usize, path: impl Into<PathBuf>) -> Self {
        Self { index, path: path.into() }
    }
}

/// Result of analysing one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreRecord {
    pub suspicious: bool,
    pub flat_count: usize,
    pub layer_count: usize,
    pub image_count: usize,
    pub path: PathBuf,
}

impl ScoreRecord {
    pub fn new(verdict: Verdict, image_count: usize, path: impl Into<PathBuf>) -> Self {
        Self {
            suspicious: verdict.suspicious,
            flat_count: verdict.flat_count,
            layer_count: verdict.layer_count,
            image_count,
            path: path.into(),
        }
    }
}

/// What a document run hands back to the batch driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentOutcome {
    Scored(ScoreRecord),
    /// Too many embedded images; extraction was skipped.
    Rejected { path: PathBuf, image_count: usize },
    /// The workspace could not be created, nothing was analysed.
    Failed { path: PathBuf, reason: String },
}

impl DocumentOutcome {
    pub fn record(&self) -> Option<&ScoreRecord> {
        match self {
            DocumentOutcome::Scored(record) => Some(record),
            _ => None,
        }
    }
}

// Error types
#[derive(Debug, thiserror::Error)]
pub enum XposeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Keyword set must contain at least one non-blank keyword")]
    EmptyKeywordSet,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

pub type Result<T> = std::result::Result<T, XposeError>;

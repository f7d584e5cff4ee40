// Configuration for pdfxpose
use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::scorer::{KeywordSet, DEFAULT_KEYWORDS};
use crate::types::XposeError;

// Documents with more embedded images than this are not extracted
pub const MAX_IMAGES: usize = 100;

// `pdfimages -list` prints two header lines before the first image row
pub const IMAGE_LISTING_HEADER_LINES: usize = 2;

// Rasterization settings for OCR of the flattened page
pub const RASTER_DENSITY: u32 = 300;
pub const RASTER_BACKGROUND: &str = "white";
pub const RASTER_COLORSPACE: &str = "Gray";
pub const RASTER_GAMMA: &str = "2.2";

// Embedded image formats picked up after extraction
pub const EMBEDDED_IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "png", "gif"];

pub const WORKSPACE_PREFIX: &str = "tmp.pdfxpose-";

pub const CONFIG_ENV: &str = "PDFXPOSE_CONFIG";
pub const WORKDIR_ENV: &str = "PDFXPOSE_WORKDIR";
pub const TIMEOUT_ENV: &str = "PDFXPOSE_TOOL_TIMEOUT_SECS";

const DEFAULT_TOOL_TIMEOUT_SECS: u64 = 120;

/// How the whole-document text layer contributes to the layered corpus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NativeTextMode {
    /// Appended once per document.
    #[default]
    PerDocument,
    /// Appended once per page, weighting the text layer by page count.
    PerPage,
}

/// Names (or paths) of the external binaries.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ToolPaths {
    pub pdfimages: String,
    pub pdfseparate: String,
    pub convert: String,
    pub tesseract: String,
    pub pdftotext: String,
    pub pdftohtml: String,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            pdfimages: "pdfimages".to_string(),
            pdfseparate: "pdfseparate".to_string(),
            convert: "convert".to_string(),
            tesseract: "tesseract".to_string(),
            pdftotext: "pdftotext".to_string(),
            pdftohtml: "pdftohtml".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub workspace_root: PathBuf,
    pub tool_timeout_secs: u64,
    pub keywords: Vec<String>,
    pub native_text: NativeTextMode,
    pub tools: ToolPaths,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workspace_root: env::temp_dir(),
            tool_timeout_secs: DEFAULT_TOOL_TIMEOUT_SECS,
            keywords: DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            native_text: NativeTextMode::default(),
            tools: ToolPaths::default(),
        }
    }
}

impl Config {
    /// Defaults, then the TOML file named by `PDFXPOSE_CONFIG`, then the
    /// individual environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = match env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };
        config.apply_overrides(|key| env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> std::result::Result<Self, XposeError> {
        let config: Self =
            toml::from_str(content).map_err(|e| XposeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `PDFXPOSE_WORKDIR` / `PDFXPOSE_TOOL_TIMEOUT_SECS` from `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> std::result::Result<(), XposeError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(root) = lookup(WORKDIR_ENV).filter(|v| !v.trim().is_empty()) {
            self.workspace_root = PathBuf::from(root);
        }
        if let Some(secs) = lookup(TIMEOUT_ENV) {
            self.tool_timeout_secs = secs.trim().parse().map_err(|_| {
                XposeError::Config(format!("{} must be a whole number of seconds, got '{}'", TIMEOUT_ENV, secs))
            })?;
        }
        self.validate()
    }

    fn validate(&self) -> std::result::Result<(), XposeError> {
        if self.tool_timeout_secs == 0 {
            return Err(XposeError::Config("tool timeout must be at least one second".to_string()));
        }
        self.keyword_set().map(|_| ())
    }

    pub fn tool_timeout(&self) -> Duration {
        Duration::from_secs(self.tool_timeout_secs)
    }

    pub fn keyword_set(&self) -> std::result::Result<KeywordSet, XposeError> {
        KeywordSet::new(&self.keywords)
    }
}

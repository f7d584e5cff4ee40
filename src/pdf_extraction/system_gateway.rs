// Extraction gateway backed by poppler-utils, ImageMagick and tesseract
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::process::Command;

use super::gateway::{ExtractionGateway, GatewayError, GatewayResult};
use crate::config::{
    Config, ToolPaths, EMBEDDED_IMAGE_EXTENSIONS, IMAGE_LISTING_HEADER_LINES, RASTER_BACKGROUND,
    RASTER_COLORSPACE, RASTER_DENSITY, RASTER_GAMMA,
};
use crate::types::{Document, Page};

static SPLIT_PAGE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^split_(\d+)\.pdf$").expect("static regex"));

const SPLIT_PAGE_PATTERN: &str = "split_%d.pdf";

pub struct SystemGateway {
    tools: ToolPaths,
    timeout: Duration,
}

impl SystemGateway {
    pub fn new(config: &Config) -> Self {
        Self {
            tools: config.tools.clone(),
            timeout: config.tool_timeout(),
        }
    }

    /// Run one tool to completion, killing it if the deadline passes.
    async fn run<I, S>(&self, tool: &str, args: I) -> GatewayResult<Output>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let args: Vec<OsString> = args.into_iter().map(|a| a.as_ref().to_os_string()).collect();
        debug!("running {} {:?}", tool, args);

        let mut command = Command::new(tool);
        command
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = match tokio::time::timeout(self.timeout, command.output()).await {
            Ok(result) => result.map_err(|source| GatewayError::Spawn {
                tool: tool.to_string(),
                source,
            })?,
            Err(_) => {
                return Err(GatewayError::Timeout {
                    tool: tool.to_string(),
                    after: self.timeout,
                })
            }
        };

        if !output.status.success() {
            return Err(GatewayError::ExitStatus {
                tool: tool.to_string(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output)
    }

    async fn run_for_text<I, S>(&self, tool: &str, args: I) -> GatewayResult<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let output = self.run(tool, args).await?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl ExtractionGateway for SystemGateway {
    async fn count_embedded_images(&self, document: &Document) -> usize {
        let args = [OsStr::new("-list"), document.path().as_os_str()];
        match self.run_for_text(&self.tools.pdfimages, args).await {
            Ok(listing) => count_listed_images(&listing),
            Err(e) => {
                warn!("image listing failed for {}: {}", document.path().display(), e);
                0
            }
        }
    }

    async fn split_into_pages(&self, document: &Document, workspace: &Path) -> GatewayResult<Vec<Page>> {
        let target = workspace.join(SPLIT_PAGE_PATTERN);
        let status = self
            .run(&self.tools.pdfseparate, [document.path().as_os_str(), target.as_os_str()])
            .await;
        let failure = tolerate_exit_status(status)?;

        let pages = collect_split_pages(workspace)?;
        match failure {
            Some(e) if pages.is_empty() => Err(e),
            Some(e) => {
                warn!("{}; keeping {} pages already split", e, pages.len());
                Ok(pages)
            }
            None if pages.is_empty() => Err(GatewayError::EmptyOutput {
                tool: self.tools.pdfseparate.clone(),
            }),
            None => Ok(pages),
        }
    }

    async fn rasterize(&self, page: &Page) -> GatewayResult<PathBuf> {
        let image = raster_path(&page.path);
        let density = RASTER_DENSITY.to_string();
        let args = [
            OsStr::new("-density"),
            OsStr::new(&density),
            OsStr::new("-background"),
            OsStr::new(RASTER_BACKGROUND),
            OsStr::new("-colorspace"),
            OsStr::new(RASTER_COLORSPACE),
            OsStr::new("-gamma"),
            OsStr::new(RASTER_GAMMA),
            OsStr::new("-flatten"),
            page.path.as_os_str(),
            image.as_os_str(),
        ];
        self.run(&self.tools.convert, args).await?;

        if !image.is_file() {
            return Err(GatewayError::EmptyOutput {
                tool: self.tools.convert.clone(),
            });
        }
        Ok(image)
    }

    async fn ocr(&self, image: &Path) -> GatewayResult<String> {
        self.run_for_text(&self.tools.tesseract, [image.as_os_str(), OsStr::new("stdout")])
            .await
    }

    async fn extract_native_text(&self, document: &Document) -> GatewayResult<String> {
        self.run_for_text(&self.tools.pdftotext, [document.path().as_os_str(), OsStr::new("-")])
            .await
    }

    async fn extract_embedded_images(&self, page: &Page, workspace: &Path) -> GatewayResult<Vec<PathBuf>> {
        let image_dir = workspace.join(format!("images-{}", page.index));
        fs::create_dir_all(&image_dir)?;

        let html = image_dir.join("output.html");
        let status = self
            .run(&self.tools.pdftohtml, [page.path.as_os_str(), html.as_os_str()])
            .await;
        let failure = tolerate_exit_status(status)?;

        let images = collect_images(&image_dir)?;
        match failure {
            Some(e) if images.is_empty() => Err(e),
            Some(e) => {
                warn!("{}; keeping {} images from page {}", e, images.len(), page.index);
                Ok(images)
            }
            None => Ok(images),
        }
    }
}

/// poppler tools exit non-zero on damaged input after writing whatever they
/// could. Hand an exit failure back to the caller instead of raising it so
/// that output can still be collected; spawn and timeout errors propagate.
fn tolerate_exit_status(status: GatewayResult<Output>) -> GatewayResult<Option<GatewayError>> {
    match status {
        Ok(_) => Ok(None),
        Err(e @ GatewayError::ExitStatus { .. }) => Ok(Some(e)),
        Err(e) => Err(e),
    }
}

/// Image rows in a `pdfimages -list` listing; anything shorter than the
/// header counts as no images.
pub fn count_listed_images(listing: &str) -> usize {
    listing.lines().count().saturating_sub(IMAGE_LISTING_HEADER_LINES)
}

/// Page number encoded in a `split_<n>.pdf` file name.
pub fn split_page_index(file_name: &str) -> Option<usize> {
    SPLIT_PAGE_NAME
        .captures(file_name)
        .and_then(|caps| caps[1].parse().ok())
}

/// Split pages found in `dir`, ordered by page number rather than by name
/// (`split_2.pdf` comes before `split_10.pdf`).
pub fn collect_split_pages(dir: &Path) -> std::io::Result<Vec<Page>> {
    let mut pages = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name();
        if let Some(index) = name.to_str().and_then(split_page_index) {
            pages.push(Page::new(index, entry.path()));
        }
    }
    pages.sort_by_key(|page| page.index);
    Ok(pages)
}

/// Embedded images written by `pdftohtml`, sorted by path.
pub fn collect_images(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut images = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_image = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| EMBEDDED_IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
            .unwrap_or(false);
        if is_image && path.is_file() {
            images.push(path);
        }
    }
    images.sort();
    Ok(images)
}

// split_3.pdf -> split_3.pdf.png
fn raster_path(page: &Path) -> PathBuf {
    let mut name = page.as_os_str().to_os_string();
    name.push(".png");
    PathBuf::from(name)
}

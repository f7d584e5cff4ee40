// Typed boundary around the external PDF, raster and OCR engines
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::types::{Document, Page};

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("could not start {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} timed out after {after:?}")]
    Timeout { tool: String, after: Duration },

    #[error("{tool} exited with {}: {stderr}", describe_exit(.code))]
    ExitStatus {
        tool: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("{tool} produced no output")]
    EmptyOutput { tool: String },

    #[error("workspace IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "a signal".to_string(),
    }
}

pub type GatewayResult<T> = std::result::Result<T, GatewayError>;

/// The six external capabilities the detector depends on.
///
/// Every call blocks the current document until the tool finishes. Apart from
/// [`count_embedded_images`](Self::count_embedded_images), failures come back
/// as a [`GatewayError`] and the caller decides how to degrade.
#[allow(async_fn_in_trait)]
pub trait ExtractionGateway {
    /// Number of image streams in the document. Used only as a cost gate, so
    /// any failure reports 0 rather than blocking the document.
    async fn count_embedded_images(&self, document: &Document) -> usize;

    /// One single-page PDF per physical page inside `workspace`, in page order.
    async fn split_into_pages(&self, document: &Document, workspace: &Path) -> GatewayResult<Vec<Page>>;

    /// Render a page to a flattened grayscale raster suitable for OCR.
    async fn rasterize(&self, page: &Page) -> GatewayResult<PathBuf>;

    async fn ocr(&self, image: &Path) -> GatewayResult<String>;

    /// Text layer of the whole document, independent of rendering.
    async fn extract_native_text(&self, document: &Document) -> GatewayResult<String>;

    /// Raster images embedded in one page, written under `workspace`.
    async fn extract_embedded_images(&self, page: &Page, workspace: &Path) -> GatewayResult<Vec<PathBuf>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_status_message() {
        let err = GatewayError::ExitStatus {
            tool: "pdftotext".to_string(),
            code: Some(3),
            stderr: "Syntax Error".to_string(),
        };
        assert_eq!(err.to_string(), "pdftotext exited with status 3: Syntax Error");

        let killed = GatewayError::ExitStatus {
            tool: "convert".to_string(),
            code: None,
            stderr: String::new(),
        };
        assert!(killed.to_string().contains("a signal"));
    }

    #[test]
    fn test_timeout_message() {
        let err = GatewayError::Timeout {
            tool: "tesseract".to_string(),
            after: Duration::from_secs(5),
        };
        assert_eq!(err.to_string(), "tesseract timed out after 5s");
    }
}

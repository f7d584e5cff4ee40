// Builds the flattened ("what you see") and layered ("what is there") corpora
use log::{debug, warn};
use std::path::Path;

use super::gateway::{ExtractionGateway, GatewayResult};
use crate::config::NativeTextMode;
use crate::progress::ProgressSink;
use crate::types::{Document, Page};

/// The two text channels of one document, each in page order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpora {
    /// OCR of every rasterized page.
    pub flattened: String,
    /// Native text layer plus OCR of every embedded image.
    pub layered: String,
}

pub struct DualChannelExtractor<'a, G> {
    gateway: &'a G,
    native_text: NativeTextMode,
}

impl<'a, G: ExtractionGateway> DualChannelExtractor<'a, G> {
    pub fn new(gateway: &'a G, native_text: NativeTextMode) -> Self {
        Self { gateway, native_text }
    }

    /// Extract both channels over `pages`. A failing step contributes
    /// nothing and the remaining steps and pages still run.
    pub async fn extract(
        &self,
        document: &Document,
        pages: &[Page],
        workspace: &Path,
        progress: &mut dyn ProgressSink,
    ) -> Corpora {
        let mut corpora = Corpora::default();
        let mut native_text: Option<String> = None;

        for page in pages {
            debug!("page {} of {}", page.index, document.path().display());

            progress.status("Flattening PDF...");
            let raster = self.gateway.rasterize(page).await;

            progress.status("Performing OCR on PDF...");
            if let Some(image) = or_empty(raster, "rasterize", page) {
                if let Some(text) = or_empty(self.gateway.ocr(&image).await, "page OCR", page) {
                    corpora.flattened.push_str(&text);
                }
            }

            progress.status("Extracting text...");
            let first_use = native_text.is_none();
            if first_use {
                let text = self.gateway.extract_native_text(document).await;
                native_text = Some(or_empty(text, "text extraction", page).unwrap_or_default());
            }
            if first_use || self.native_text == NativeTextMode::PerPage {
                if let Some(text) = &native_text {
                    corpora.layered.push_str(text);
                }
            }

            progress.status("Extracting images...");
            let images = self.gateway.extract_embedded_images(page, workspace).await;
            let images = or_empty(images, "image extraction", page).unwrap_or_default();

            progress.status("Performing OCR on images...");
            for image in &images {
                if let Some(text) = or_empty(self.gateway.ocr(image).await, "image OCR", page) {
                    corpora.layered.push_str(&text);
                }
            }
        }

        corpora
    }
}

fn or_empty<T>(result: GatewayResult<T>, step: &str, page: &Page) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("{} failed on page {} ({}): {}", step, page.index, page.path.display(), e);
            None
        }
    }
}

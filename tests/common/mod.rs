// Scripted extraction gateway for driving the pipeline without external tools
#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use pdfxpose::pdf_extraction::GatewayResult;
use pdfxpose::{Document, ExtractionGateway, GatewayError, Page};

/// What one page "contains" as seen by each tool.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPage {
    /// Text OCR finds on the rasterized page.
    pub rendered: String,
    /// Text OCR finds in each embedded image.
    pub embedded: Vec<String>,
    pub fail_rasterize: bool,
    pub fail_images: bool,
}

impl ScriptedPage {
    pub fn rendered(text: &str) -> Self {
        Self {
            rendered: text.to_string(),
            ..Self::default()
        }
    }

    pub fn with_image(mut self, text: &str) -> Self {
        self.embedded.push(text.to_string());
        self
    }
}

/// Writes real files into the workspace so cleanup can be observed, and
/// "OCRs" an image by reading back the text it was written with.
#[derive(Debug, Default)]
pub struct ScriptedGateway {
    pub image_count: usize,
    pub native_text: String,
    pub pages: Vec<ScriptedPage>,
    pub fail_split: bool,
    pub fail_native_text: bool,
    pub native_text_calls: Cell<usize>,
    pub calls: RefCell<Vec<String>>,
}

impl ScriptedGateway {
    pub fn new(native_text: &str, pages: Vec<ScriptedPage>) -> Self {
        Self {
            native_text: native_text.to_string(),
            image_count: pages.iter().map(|p| p.embedded.len()).sum(),
            pages,
            ..Self::default()
        }
    }

    pub fn with_image_count(mut self, image_count: usize) -> Self {
        self.image_count = image_count;
        self
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }

    fn page(&self, page: &Page) -> &ScriptedPage {
        &self.pages[page.index - 1]
    }
}

fn tool_failure(tool: &str) -> GatewayError {
    GatewayError::ExitStatus {
        tool: tool.to_string(),
        code: Some(1),
        stderr: "scripted failure".to_string(),
    }
}

impl ExtractionGateway for ScriptedGateway {
    async fn count_embedded_images(&self, _document: &Document) -> usize {
        self.record("count".to_string());
        self.image_count
    }

    async fn split_into_pages(&self, _document: &Document, workspace: &Path) -> GatewayResult<Vec<Page>> {
        self.record("split".to_string());
        if self.fail_split {
            return Err(tool_failure("pdfseparate"));
        }
        let mut pages = Vec::new();
        for index in 1..=self.pages.len() {
            let path = workspace.join(format!("split_{}.pdf", index));
            fs::write(&path, b"%PDF-1.4")?;
            pages.push(Page::new(index, path));
        }
        Ok(pages)
    }

    async fn rasterize(&self, page: &Page) -> GatewayResult<PathBuf> {
        self.record(format!("rasterize {}", page.index));
        let scripted = self.page(page);
        if scripted.fail_rasterize {
            return Err(tool_failure("convert"));
        }
        let image = PathBuf::from(format!("{}.png", page.path.display()));
        fs::write(&image, &scripted.rendered)?;
        Ok(image)
    }

    async fn ocr(&self, image: &Path) -> GatewayResult<String> {
        self.record(format!("ocr {}", image.file_name().unwrap_or_default().to_string_lossy()));
        Ok(fs::read_to_string(image)?)
    }

    async fn extract_native_text(&self, _document: &Document) -> GatewayResult<String> {
        self.native_text_calls.set(self.native_text_calls.get() + 1);
        self.record("text".to_string());
        if self.fail_native_text {
            return Err(tool_failure("pdftotext"));
        }
        Ok(self.native_text.clone())
    }

    async fn extract_embedded_images(&self, page: &Page, workspace: &Path) -> GatewayResult<Vec<PathBuf>> {
        self.record(format!("images {}", page.index));
        let scripted = self.page(page);
        if scripted.fail_images {
            return Err(tool_failure("pdftohtml"));
        }
        let dir = workspace.join(format!("images-{}", page.index));
        fs::create_dir_all(&dir)?;
        let mut images = Vec::new();
        for (n, text) in scripted.embedded.iter().enumerate() {
            let image = dir.join(format!("output-{}_{}.png", page.index, n + 1));
            fs::write(&image, text)?;
            images.push(image);
        }
        Ok(images)
    }
}

/// Number of entries left directly under `dir`.
pub fn entries_in(dir: &Path) -> usize {
    fs::read_dir(dir).map(|entries| entries.count()).unwrap_or(0)
}

/// Executable shell script standing in for an external tool. Returns the
/// path to put in `ToolPaths`.
pub fn fake_tool(dir: &Path, name: &str, body: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path.to_string_lossy().into_owned()
}

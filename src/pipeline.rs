// Per-document analysis driver
use log::{debug, info, warn};
use std::fmt;

use crate::config::{Config, MAX_IMAGES};
use crate::pdf_extraction::{DualChannelExtractor, ExtractionGateway};
use crate::progress::ProgressSink;
use crate::scorer::KeywordSet;
use crate::types::{Document, DocumentOutcome, ScoreRecord};
use crate::verdict::decide;
use crate::workspace::Workspace;

/// Lifecycle of one document run. Every run ends in `Cleaned`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Init,
    Gated,
    Rejected,
    Splitting,
    PerPageExtraction,
    Scoring,
    Reported,
    Cleaned,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Extraction is skipped above the image ceiling.
pub fn exceeds_image_ceiling(image_count: usize) -> bool {
    image_count > MAX_IMAGES
}

/// Outcome plus the states the run went through, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineRun {
    pub outcome: DocumentOutcome,
    pub states: Vec<PipelineState>,
}

pub struct DocumentPipeline<'a, G> {
    gateway: &'a G,
    config: &'a Config,
    keywords: &'a KeywordSet,
}

impl<'a, G: ExtractionGateway> DocumentPipeline<'a, G> {
    pub fn new(gateway: &'a G, config: &'a Config, keywords: &'a KeywordSet) -> Self {
        Self {
            gateway,
            config,
            keywords,
        }
    }

    pub async fn analyse(&self, document: &Document, progress: &mut dyn ProgressSink) -> DocumentOutcome {
        self.run(document, progress).await.outcome
    }

    /// Analyse one document. The workspace is removed before this returns,
    /// whichever way the run ended.
    pub async fn run(&self, document: &Document, progress: &mut dyn ProgressSink) -> PipelineRun {
        let mut states = vec![PipelineState::Init];
        info!("analysing {}", document.path().display());

        let workspace = match Workspace::create(&self.config.workspace_root) {
            Ok(workspace) => workspace,
            Err(e) => {
                warn!(
                    "could not create workspace in {}: {}",
                    self.config.workspace_root.display(),
                    e
                );
                states.push(PipelineState::Cleaned);
                return PipelineRun {
                    outcome: DocumentOutcome::Failed {
                        path: document.path().to_path_buf(),
                        reason: format!("could not create workspace: {}", e),
                    },
                    states,
                };
            }
        };

        let outcome = self.run_in(document, &workspace, progress, &mut states).await;

        progress.status("Deleting temporary files...");
        workspace.close();
        transition(&mut states, PipelineState::Cleaned);

        PipelineRun { outcome, states }
    }

    async fn run_in(
        &self,
        document: &Document,
        workspace: &Workspace,
        progress: &mut dyn ProgressSink,
        states: &mut Vec<PipelineState>,
    ) -> DocumentOutcome {
        transition(states, PipelineState::Gated);
        let image_count = self.gateway.count_embedded_images(document).await;
        if exceeds_image_ceiling(image_count) {
            warn!(
                "{} has {} embedded images (limit {}), skipping extraction",
                document.path().display(),
                image_count,
                MAX_IMAGES
            );
            transition(states, PipelineState::Rejected);
            return DocumentOutcome::Rejected {
                path: document.path().to_path_buf(),
                image_count,
            };
        }

        transition(states, PipelineState::Splitting);
        progress.status("Splitting PDF file...");
        let pages = match self.gateway.split_into_pages(document, workspace.path()).await {
            Ok(pages) => pages,
            Err(e) => {
                warn!("splitting {} failed: {}", document.path().display(), e);
                Vec::new()
            }
        };
        debug!("{} split into {} pages", document.path().display(), pages.len());

        transition(states, PipelineState::PerPageExtraction);
        let extractor = DualChannelExtractor::new(self.gateway, self.config.native_text);
        let corpora = extractor
            .extract(document, &pages, workspace.path(), progress)
            .await;

        transition(states, PipelineState::Scoring);
        let verdict = decide(&corpora.flattened, &corpora.layered, self.keywords);
        let record = ScoreRecord::new(verdict, image_count, document.path());

        transition(states, PipelineState::Reported);
        info!(
            "{}: flat={} layer={} suspicious={}",
            document.path().display(),
            record.flat_count,
            record.layer_count,
            record.suspicious
        );
        DocumentOutcome::Scored(record)
    }
}

fn transition(states: &mut Vec<PipelineState>, next: PipelineState) {
    if let Some(current) = states.last() {
        debug!("pipeline {} -> {}", current, next);
    }
    states.push(next);
}

//! # pdfxpose
//!
//! Detects PDFs whose rendered appearance hides different content, the
//! overlay trick used in Business Email Compromise invoices: a fabricated
//! image is laid over (or replaces) real text carrying altered banking
//! details.
//!
//! Each document is read through two channels:
//!
//! - **flattened**: every page rasterized and OCR'd, i.e. what a reader sees;
//! - **layered**: the native text layer plus OCR of every embedded image,
//!   i.e. everything technically present.
//!
//! Banking keywords (`swift`, `iban`, `bic`, `rtgs` by default) are counted in
//! both. A document is suspicious when the layered channel mentions them more
//! often than the flattened one.
//!
//! The heavy lifting (rendering, OCR, text and image extraction) is delegated
//! to external tools behind [`pdf_extraction::ExtractionGateway`].

pub mod config;
pub mod pdf_extraction;
pub mod pipeline;
pub mod progress;
pub mod report;
pub mod scorer;
pub mod types;
pub mod verdict;
pub mod workspace;

pub use config::{Config, NativeTextMode, MAX_IMAGES};
pub use pdf_extraction::{Corpora, DualChannelExtractor, ExtractionGateway, GatewayError, SystemGateway};
pub use pipeline::{DocumentPipeline, PipelineRun, PipelineState};
pub use scorer::{score, KeywordSet};
pub use types::{Document, DocumentOutcome, Page, ScoreRecord, XposeError};
pub use verdict::{decide, Verdict};

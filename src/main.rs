// pdfxpose - flag PDFs whose visible text hides different banking details
use anyhow::{Context, Result};
use clap::Parser;
use std::io;
use std::path::PathBuf;
use std::process;

use pdfxpose::progress::{ProgressSink, TerminalStatus};
use pdfxpose::report::Report;
use pdfxpose::{Config, Document, DocumentOutcome, DocumentPipeline, SystemGateway};

#[derive(Parser, Debug)]
#[command(name = "pdfxpose", author, version, about = "Detect suspicious PDF overlays commonly found in BEC fraud")]
struct Args {
    /// PDF files to analyse
    #[arg(value_name = "FILE", required = true)]
    files: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    // Every argument is checked before any work starts
    if let Some(bad) = args.files.iter().find(|path| !path.is_file()) {
        eprintln!("Invalid parameter! '{}' is not a file.", bad.display());
        process::exit(1);
    }

    let config = Config::load().context("loading configuration")?;
    let keywords = config.keyword_set()?;
    let gateway = SystemGateway::new(&config);
    let pipeline = DocumentPipeline::new(&gateway, &config, &keywords);

    let mut report = Report::new(io::stdout());
    report.preamble(args.files.len())?;

    let mut progress = TerminalStatus::stderr();
    for file in &args.files {
        let outcome = pipeline.analyse(&Document::new(file), &mut progress).await;
        progress.clear();

        match outcome {
            DocumentOutcome::Scored(record) => report.row(&record)?,
            DocumentOutcome::Rejected { path, image_count } => {
                eprintln!(
                    "Error! Too many images to extract. '{}' has {} images.",
                    path.display(),
                    image_count
                );
            }
            DocumentOutcome::Failed { path, reason } => {
                eprintln!("Error! Could not analyse '{}': {}", path.display(), reason);
            }
        }
    }

    Ok(())
}

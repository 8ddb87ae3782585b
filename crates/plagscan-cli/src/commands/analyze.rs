//! Analyze command implementation.

use crate::cli::AnalyzeArgs;
use crate::error::Result;
use crate::output::Formatter;
use plagscan_engine::{AnalysisReport, AnalysisWorker, EngineConfig};
use plagscan_store::DocumentStore;
use std::path::PathBuf;

/// Execute the analyze command.
pub async fn execute_analyze(args: AnalyzeArgs, engine: &EngineConfig, formatter: &Formatter) -> Result<()> {
    let mut engine = engine.clone();
    if let Some(threshold) = args.threshold {
        engine.suspect_threshold = threshold;
    }
    if let Some(marker) = args.marker {
        engine.header_marker = Some(marker);
    }
    if let Some(policy) = args.on_unreadable {
        engine.on_unreadable = policy.into();
    }

    let report = analyze_files(args.files, engine).await?;
    println!("{}", formatter.format_report(&report)?);
    Ok(())
}

/// Load the files and run an analysis, cancelling it on Ctrl+C.
pub async fn analyze_files(files: Vec<PathBuf>, engine: EngineConfig) -> Result<AnalysisReport> {
    let worker = AnalysisWorker::new(engine)?;
    let marker = worker.analyzer().config().header_marker().map(str::to_string);

    let corpus = DocumentStore::new(files).with_header_marker(marker).load();
    Ok(worker.run(corpus).await?)
}

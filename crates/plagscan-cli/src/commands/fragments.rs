//! Fragments command implementation.

use crate::cli::FragmentsArgs;
use crate::commands::analyze::analyze_files;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use plagscan_engine::EngineConfig;

/// Execute the fragments command.
pub async fn execute_fragments(args: FragmentsArgs, engine: &EngineConfig, formatter: &Formatter) -> Result<()> {
    let [subject_a, subject_b] = <[String; 2]>::try_from(args.pair)
        .map_err(|_| CliError::InvalidInput("--pair takes exactly two subjects".to_string()))?;
    if subject_a == subject_b {
        return Err(CliError::InvalidInput(format!(
            "'{}' cannot be compared with itself",
            subject_a
        )));
    }

    let mut engine = engine.clone();
    if let Some(marker) = args.marker {
        engine.header_marker = Some(marker);
    }
    let marker = engine.header_marker().map(str::to_string);

    let report = analyze_files(args.files, engine).await?;
    let fragments = report.fragments(&subject_a, &subject_b, marker.as_deref())?;
    let regions = report.regions(&subject_a, &subject_b, marker.as_deref(), args.min_len)?;

    if let Some(score) = report.matrix().score_between(&subject_a, &subject_b) {
        eprintln!(
            "{}",
            formatter.info(&format!("{} / {}: {:.2}%", subject_a, subject_b, score))
        );
    }
    println!(
        "{}",
        formatter.format_fragments(&subject_a, &subject_b, &fragments, &regions)?
    );
    Ok(())
}

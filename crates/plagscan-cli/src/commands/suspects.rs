//! Suspects command implementation.

use crate::cli::SuspectsArgs;
use crate::commands::analyze::analyze_files;
use crate::error::Result;
use crate::output::Formatter;
use plagscan_engine::EngineConfig;

/// Execute the suspects command.
pub async fn execute_suspects(args: SuspectsArgs, engine: &EngineConfig, formatter: &Formatter) -> Result<()> {
    println!("{}", render_suspects(args, engine, formatter).await?);
    Ok(())
}

async fn render_suspects(args: SuspectsArgs, engine: &EngineConfig, formatter: &Formatter) -> Result<String> {
    let mut engine = engine.clone();
    if let Some(threshold) = args.threshold {
        engine.suspect_threshold = threshold;
    }

    let report = analyze_files(args.files, engine).await?;
    if report.is_insufficient() {
        eprintln!(
            "{}",
            formatter.warning("Fewer than two documents could be loaded; nothing was compared")
        );
    }

    formatter.format_suspects(&report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_is_listed() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.py");
        let c = dir.path().join("c.py");
        fs::write(&a, "print(sum(range(10)))\n").unwrap();
        fs::write(&c, "print(sum(range(10)))\n").unwrap();

        let args = SuspectsArgs {
            files: vec![a, dir.path().join("missing.py"), c],
            threshold: None,
        };
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = render_suspects(args, &EngineConfig::default(), &formatter).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["suspects"].as_array().unwrap().len(), 1);
        assert_eq!(value["suspects"][0]["subject_b"], "c");
        assert_eq!(value["load_failures"][0]["subject"], "missing");
    }
}

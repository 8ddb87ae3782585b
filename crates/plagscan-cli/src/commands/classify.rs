//! Classify command implementation.

use crate::cli::ClassifyArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use plagscan_engine::EngineConfig;

/// Execute the classify command.
pub fn execute_classify(args: ClassifyArgs, engine: &EngineConfig, formatter: &Formatter) -> Result<()> {
    if !(0.0..=100.0).contains(&args.score) {
        return Err(CliError::InvalidInput(format!(
            "Score must be between 0 and 100, got {}",
            args.score
        )));
    }

    let tier = engine.classifier()?.classify(args.score);
    println!("{}", formatter.format_classification(args.score, tier)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;

    #[test]
    fn test_score_out_of_range() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let result = execute_classify(ClassifyArgs { score: 101.0 }, &EngineConfig::default(), &formatter);
        assert!(matches!(result, Err(CliError::InvalidInput(_))));
    }

    #[test]
    fn test_valid_score() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        assert!(execute_classify(ClassifyArgs { score: 85.0 }, &EngineConfig::default(), &formatter).is_ok());
    }
}

//! Config command implementation.

use crate::cli::{ConfigAction, ConfigArgs};
use crate::config::{Config, OutputFormat};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use std::path::Path;

/// Execute the config command.
///
/// `path` is the `--config` override, if any.
pub fn execute_config(
    args: ConfigArgs,
    path: Option<&Path>,
    format: OutputFormat,
    formatter: &Formatter,
) -> Result<()> {
    match args.action {
        ConfigAction::Show => show_config(path, format),
        ConfigAction::Init { force } => init_config(path, force, formatter),
        ConfigAction::Path => {
            println!("{}", Config::resolve_path(path)?.display());
            Ok(())
        }
    }
}

/// Print the effective configuration.
fn show_config(path: Option<&Path>, format: OutputFormat) -> Result<()> {
    let config = Config::load(path)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&config)?),
        OutputFormat::Table | OutputFormat::Quiet => print!("{}", config.to_toml()?),
    }
    Ok(())
}

/// Write a default configuration file.
fn init_config(path: Option<&Path>, force: bool, formatter: &Formatter) -> Result<()> {
    let path = Config::resolve_path(path)?;
    if path.exists() && !force {
        return Err(CliError::NotPermitted(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }

    Config::default().save(&path)?;
    println!(
        "{}",
        formatter.success(&format!("Wrote default configuration to {}", path.display()))
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_init_then_refuse_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let formatter = Formatter::new(OutputFormat::Table, false);

        init_config(Some(&path), false, &formatter).unwrap();
        assert!(path.exists());
        assert!(Config::load(Some(&path)).is_ok());

        let result = init_config(Some(&path), false, &formatter);
        assert!(matches!(result, Err(CliError::NotPermitted(_))));

        fs::write(&path, "garbage = [").unwrap();
        init_config(Some(&path), true, &formatter).unwrap();
        assert!(Config::load(Some(&path)).is_ok());
    }

    #[test]
    fn test_show_rejects_bad_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[engine]\nsuspect_threshold = \"high\"\n").unwrap();

        let result = show_config(Some(&path), OutputFormat::Table);
        assert!(matches!(result, Err(CliError::Toml(_))));
    }
}

//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use plagscan_domain::{CellStatus, LoadFailure, RiskTier, SuspectPair, ThresholdClassifier};
use plagscan_engine::{AnalysisReport, CorpusStatus, Fragments, MatchRegion, PairFailure};
use std::ops::RangeInclusive;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Longest region excerpt shown in a table cell
const EXCERPT_CHARS: usize = 48;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format a full analysis report.
    pub fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&self.report_json(report))?),
            OutputFormat::Table => Ok(self.format_report_table(report)),
            OutputFormat::Quiet => Ok(self.format_report_quiet(report)),
        }
    }

    /// Format the suspect pairs of a report, with whatever was skipped.
    pub fn format_suspects(&self, report: &AnalysisReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let json = serde_json::json!({
                    "suspect_threshold": report.suspect_threshold,
                    "suspects": report
                        .suspects
                        .iter()
                        .map(|s| suspect_json(s, report.classifier()))
                        .collect::<Vec<_>>(),
                    "load_failures": report.load_failures.iter().map(load_failure_json).collect::<Vec<_>>(),
                    "pair_failures": report.pair_failures().iter().map(pair_failure_json).collect::<Vec<_>>(),
                });
                Ok(serde_json::to_string_pretty(&json)?)
            }
            OutputFormat::Table => {
                let mut sections = vec![self.format_suspects_table(&report.suspects, report.classifier())];
                if let Some(failures) = self.format_failures(&report.load_failures, report.pair_failures()) {
                    sections.push(failures);
                }
                Ok(sections.join("\n\n"))
            }
            OutputFormat::Quiet => Ok(self.format_report_quiet(report)),
        }
    }

    /// Format a side-by-side view of one pair.
    pub fn format_fragments(
        &self,
        subject_a: &str,
        subject_b: &str,
        fragments: &Fragments,
        regions: &[MatchRegion],
    ) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let json = serde_json::json!({
                    "subject_a": subject_a,
                    "subject_b": subject_b,
                    "lines_a": fragments.lines_a,
                    "lines_b": fragments.lines_b,
                    "regions": regions.iter().map(region_json).collect::<Vec<_>>(),
                });
                Ok(serde_json::to_string_pretty(&json)?)
            }
            OutputFormat::Table => Ok(self.format_fragments_table(subject_a, subject_b, fragments, regions)),
            OutputFormat::Quiet => Ok(regions
                .iter()
                .map(|r| format!("{}\t{}\t{}", span(&r.lines_a), span(&r.lines_b), r.size()))
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    /// Format the tier of a single score.
    pub fn format_classification(&self, score: f64, tier: RiskTier) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "score": score,
                "tier": tier.as_str(),
            }))?),
            OutputFormat::Table => Ok(format!(
                "{:.2}% → {}",
                score,
                self.colorize(tier.as_str(), tier_color(tier))
            )),
            OutputFormat::Quiet => Ok(tier.as_str().to_string()),
        }
    }

    /// Format the similarity matrix as a table.
    pub fn format_matrix(&self, report: &AnalysisReport) -> String {
        let matrix = report.matrix();
        if matrix.is_empty() {
            return self.colorize("No documents to compare.", "yellow");
        }

        let mut builder = Builder::default();
        let mut header = vec![String::new()];
        header.extend(matrix.subjects().iter().map(|s| s.to_string()));
        builder.push_record(header);

        for (i, subject) in matrix.subjects().iter().enumerate() {
            let mut record = vec![subject.to_string()];
            for j in 0..matrix.len() {
                record.push(self.format_cell(report, i, j));
            }
            builder.push_record(record);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn format_cell(&self, report: &AnalysisReport, i: usize, j: usize) -> String {
        let Some(cell) = report.matrix().get(i, j) else {
            return String::new();
        };
        match (cell.status, report.tier(i, j)) {
            (CellStatus::Failed, _) | (_, None) => self.colorize("n/a", "magenta"),
            (CellStatus::Diagonal, _) => format!("{:.2}", cell.score),
            (CellStatus::Measured, Some(tier)) => self.colorize(&format!("{:.2}", cell.score), tier_color(tier)),
        }
    }

    fn format_report_table(&self, report: &AnalysisReport) -> String {
        let mut sections = Vec::new();

        if report.status == CorpusStatus::InsufficientData {
            sections.push(self.warning(&format!(
                "Insufficient data: {} document(s) loaded, at least 2 are needed",
                report.summary.documents_loaded
            )));
        }

        if !report.matrix().is_empty() {
            sections.push(self.format_matrix(report));
        }

        if report.status == CorpusStatus::Complete {
            sections.push(format!("Suspect pairs (score ≥ {:.2}):", report.suspect_threshold));
            sections.push(self.format_suspects_table(&report.suspects, report.classifier()));
        }

        if let Some(failures) = self.format_failures(&report.load_failures, report.pair_failures()) {
            sections.push(failures);
        }

        sections.push(report.summary.summary());
        sections.join("\n\n")
    }

    fn format_suspects_table(&self, suspects: &[SuspectPair], classifier: &ThresholdClassifier) -> String {
        if suspects.is_empty() {
            return self.colorize("No suspect pairs found.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["#", "Subject A", "Subject B", "Score", "Tier"]);

        for (rank, suspect) in suspects.iter().enumerate() {
            let tier = classifier.classify(suspect.score);
            builder.push_record([
                (rank + 1).to_string(),
                suspect.subject_a.to_string(),
                suspect.subject_b.to_string(),
                format!("{:.2}", suspect.score),
                self.colorize(tier.as_str(), tier_color(tier)),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// One line per suspect, then one `skipped`/`failed` line per failure
    fn format_report_quiet(&self, report: &AnalysisReport) -> String {
        let suspects = report
            .suspects
            .iter()
            .map(|s| format!("{}\t{}\t{:.2}", s.subject_a, s.subject_b, s.score));
        let loads = report
            .load_failures
            .iter()
            .map(|f| format!("skipped\t{}\t{}", f.subject, f.reason));
        let pairs = report
            .pair_failures()
            .iter()
            .map(|f| format!("failed\t{}\t{}\t{}", f.subject_a, f.subject_b, f.reason));
        suspects.chain(loads).chain(pairs).collect::<Vec<_>>().join("\n")
    }

    fn format_failures(&self, loads: &[LoadFailure], pairs: &[PairFailure]) -> Option<String> {
        if loads.is_empty() && pairs.is_empty() {
            return None;
        }

        let mut lines = Vec::new();
        for failure in loads {
            let location = failure
                .path
                .as_ref()
                .map(|p| format!(" ({})", p.display()))
                .unwrap_or_default();
            lines.push(self.warning(&format!(
                "Could not load {}{}: {}",
                failure.subject, location, failure.reason
            )));
        }
        for failure in pairs {
            lines.push(self.warning(&format!(
                "Could not compare {} / {}: {}",
                failure.subject_a, failure.subject_b, failure.reason
            )));
        }
        Some(lines.join("\n"))
    }

    fn format_fragments_table(
        &self,
        subject_a: &str,
        subject_b: &str,
        fragments: &Fragments,
        regions: &[MatchRegion],
    ) -> String {
        let mut builder = Builder::default();
        builder.push_record(["#", subject_a, subject_b]);
        for (line, (a, b)) in fragments.rows().enumerate() {
            builder.push_record([(line + 1).to_string(), a.to_string(), b.to_string()]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        let mut sections = vec![table.to_string()];

        if regions.is_empty() {
            sections.push(self.colorize("No shared regions found.", "yellow"));
        } else {
            let mut builder = Builder::default();
            builder.push_record([
                format!("Lines {}", subject_a),
                format!("Lines {}", subject_b),
                "Size".to_string(),
                "Text".to_string(),
            ]);
            for region in regions {
                builder.push_record([
                    span(&region.lines_a),
                    span(&region.lines_b),
                    region.size().to_string(),
                    excerpt(&region.text),
                ]);
            }
            let mut table = builder.build();
            table
                .with(Style::rounded())
                .with(Modify::new(Rows::first()).with(Alignment::center()));
            sections.push(table.to_string());
        }

        sections.join("\n\n")
    }

    fn report_json(&self, report: &AnalysisReport) -> serde_json::Value {
        let matrix = report.matrix();
        let scores: Vec<Vec<Option<f64>>> = (0..matrix.len())
            .map(|i| {
                (0..matrix.len())
                    .map(|j| {
                        matrix
                            .get(i, j)
                            .filter(|cell| cell.status != CellStatus::Failed)
                            .map(|cell| cell.score)
                    })
                    .collect()
            })
            .collect();

        let summary = &report.summary;
        serde_json::json!({
            "status": match report.status {
                CorpusStatus::Complete => "complete",
                CorpusStatus::InsufficientData => "insufficient_data",
            },
            "suspect_threshold": report.suspect_threshold,
            "subjects": matrix.subjects().iter().map(|s| s.as_str()).collect::<Vec<_>>(),
            "matrix": scores,
            "suspects": report
                .suspects
                .iter()
                .map(|s| suspect_json(s, report.classifier()))
                .collect::<Vec<_>>(),
            "load_failures": report.load_failures.iter().map(load_failure_json).collect::<Vec<_>>(),
            "pair_failures": report.pair_failures().iter().map(pair_failure_json).collect::<Vec<_>>(),
            "summary": {
                "documents_loaded": summary.documents_loaded,
                "failed_loads": summary.failed_loads,
                "measured_pairs": summary.measured_pairs,
                "failed_pairs": summary.failed_pairs,
                "suspects": summary.suspects,
                "mean_score": summary.mean_score,
                "elapsed_secs": summary.elapsed.as_secs_f64(),
            },
        })
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            "magenta" => text.magenta().to_string(),
            _ => text.to_string(),
        }
    }
}

/// Display color of a risk tier.
pub fn tier_color(tier: RiskTier) -> &'static str {
    match tier {
        RiskTier::High => "red",
        RiskTier::Mid => "yellow",
        RiskTier::Low => "green",
        RiskTier::Unclassified => "none",
    }
}

fn suspect_json(suspect: &SuspectPair, classifier: &ThresholdClassifier) -> serde_json::Value {
    serde_json::json!({
        "subject_a": suspect.subject_a.as_str(),
        "subject_b": suspect.subject_b.as_str(),
        "score": suspect.score,
        "tier": classifier.classify(suspect.score).as_str(),
    })
}

fn load_failure_json(failure: &LoadFailure) -> serde_json::Value {
    serde_json::json!({
        "subject": failure.subject.as_str(),
        "path": failure.path.as_ref().map(|p| p.display().to_string()),
        "reason": failure.reason,
    })
}

fn pair_failure_json(failure: &PairFailure) -> serde_json::Value {
    serde_json::json!({
        "subject_a": failure.subject_a.as_str(),
        "subject_b": failure.subject_b.as_str(),
        "reason": failure.reason,
    })
}

fn region_json(region: &MatchRegion) -> serde_json::Value {
    serde_json::json!({
        "lines_a": [region.lines_a.start(), region.lines_a.end()],
        "lines_b": [region.lines_b.start(), region.lines_b.end()],
        "size": region.size(),
        "text": region.text,
    })
}

fn span(lines: &RangeInclusive<usize>) -> String {
    if lines.start() == lines.end() {
        lines.start().to_string()
    } else {
        format!("{}-{}", lines.start(), lines.end())
    }
}

fn excerpt(text: &str) -> String {
    let flat = text.replace('\n', "⏎");
    if flat.chars().count() <= EXCERPT_CHARS {
        flat
    } else {
        let cut: String = flat.chars().take(EXCERPT_CHARS).collect();
        format!("{}…", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plagscan_domain::{Corpus, Document};
    use plagscan_engine::{Analyzer, EngineConfig, UnreadablePolicy};

    fn sample_report() -> AnalysisReport {
        let mut corpus = Corpus::new();
        corpus.insert(Document::new("alice", "total = sum(numbers)\n"));
        corpus.insert(Document::new("bob", "total = sum(numbers)\n"));
        corpus.insert(Document::new("carol", "print('hi')\n"));
        Analyzer::default_config().analyze_corpus(corpus).unwrap()
    }

    #[test]
    fn test_report_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_report(&sample_report()).unwrap();
        assert!(output.contains("alice"));
        assert!(output.contains("100.00"));
        assert!(output.contains("Subject A"));
        assert!(output.contains("Analysis Summary"));
    }

    #[test]
    fn test_report_json() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_report(&sample_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["status"], "complete");
        assert_eq!(value["subjects"][2], "carol");
        assert_eq!(value["matrix"][0][1], 100.0);
        assert_eq!(value["suspects"][0]["tier"], "high");
    }

    #[test]
    fn test_report_quiet() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let output = formatter.format_report(&sample_report()).unwrap();
        assert_eq!(output, "alice\tbob\t100.00");
    }

    #[test]
    fn test_failed_cells_render_as_na() {
        let mut corpus = Corpus::new();
        corpus.insert(Document::new("a", "x"));
        corpus.insert(Document::new("c", "x"));
        corpus.record_failure(LoadFailure {
            subject: "b".into(),
            path: None,
            reason: "missing".to_string(),
        });
        let config = EngineConfig {
            on_unreadable: UnreadablePolicy::Include,
            ..Default::default()
        };
        let report = Analyzer::new(config).unwrap().analyze_corpus(corpus).unwrap();

        let table = Formatter::new(OutputFormat::Table, false).format_report(&report).unwrap();
        assert!(table.contains("n/a"));
        assert!(table.contains("Could not load b: missing"));

        let json = Formatter::new(OutputFormat::Json, false).format_report(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["matrix"][0][1].is_null());
        assert_eq!(value["pair_failures"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_insufficient_data_warning() {
        let mut corpus = Corpus::new();
        corpus.insert(Document::new("alone", "text"));
        let report = Analyzer::default_config().analyze_corpus(corpus).unwrap();

        let output = Formatter::new(OutputFormat::Table, false).format_report(&report).unwrap();
        assert!(output.contains("Insufficient data"));
        assert!(!output.contains("Suspect pairs (score"));
    }

    fn report_with_missing_subject() -> AnalysisReport {
        let mut corpus = Corpus::new();
        corpus.insert(Document::new("a", "same text"));
        corpus.insert(Document::new("c", "same text"));
        corpus.record_failure(LoadFailure {
            subject: "b".into(),
            path: None,
            reason: "missing".to_string(),
        });
        Analyzer::default_config().analyze_corpus(corpus).unwrap()
    }

    #[test]
    fn test_empty_suspects() {
        let mut corpus = Corpus::new();
        corpus.insert(Document::new("a", "aaaa"));
        corpus.insert(Document::new("b", "bbbb"));
        let report = Analyzer::default_config().analyze_corpus(corpus).unwrap();

        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_suspects(&report).unwrap();
        assert!(output.contains("No suspect pairs found"));
        assert!(!output.contains("Could not load"));
    }

    #[test]
    fn test_suspects_list_skipped_subjects() {
        let report = report_with_missing_subject();

        let table = Formatter::new(OutputFormat::Table, false).format_suspects(&report).unwrap();
        assert!(table.contains("Subject A"));
        assert!(table.contains("Could not load b: missing"));

        let json = Formatter::new(OutputFormat::Json, false).format_suspects(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["suspects"][0]["subject_a"], "a");
        assert_eq!(value["load_failures"][0]["subject"], "b");
        assert_eq!(value["load_failures"][0]["reason"], "missing");
        assert!(value["pair_failures"].as_array().unwrap().is_empty());

        let quiet = Formatter::new(OutputFormat::Quiet, false).format_suspects(&report).unwrap();
        assert_eq!(quiet, "a\tc\t100.00\nskipped\tb\tmissing");
    }

    #[test]
    fn test_quiet_report_lists_failures() {
        let quiet = Formatter::new(OutputFormat::Quiet, false)
            .format_report(&report_with_missing_subject())
            .unwrap();
        let lines: Vec<&str> = quiet.lines().collect();
        assert_eq!(lines, vec!["a\tc\t100.00", "skipped\tb\tmissing"]);
    }

    #[test]
    fn test_fragments_table() {
        let fragments = Fragments {
            lines_a: vec!["x = 1".to_string(), "y = 2".to_string()],
            lines_b: vec!["x = 1".to_string(), String::new()],
        };
        let regions = vec![MatchRegion {
            text: "x = 1\n".to_string(),
            lines_a: 1..=1,
            lines_b: 1..=2,
        }];

        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_fragments("alice", "bob", &fragments, &regions).unwrap();
        assert!(output.contains("y = 2"));
        assert!(output.contains("Lines alice"));
        assert!(output.contains("1-2"));

        let quiet = Formatter::new(OutputFormat::Quiet, false)
            .format_fragments("alice", "bob", &fragments, &regions)
            .unwrap();
        assert_eq!(quiet, "1\t1-2\t6");
    }

    #[test]
    fn test_classification() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        assert_eq!(formatter.format_classification(85.0, RiskTier::High).unwrap(), "high");

        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_classification(45.0, RiskTier::Unclassified).unwrap();
        assert_eq!(output, "45.00% → unclassified");
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let msg = formatter.success("test");
        assert_eq!(msg, "✓ test");
    }

    #[test]
    fn test_excerpt_truncates() {
        let long = "a".repeat(100);
        let short = excerpt(&long);
        assert_eq!(short.chars().count(), EXCERPT_CHARS + 1);
        assert_eq!(excerpt("a\nb"), "a⏎b");
    }
}

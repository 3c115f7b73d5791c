use crate::errors::Result;
use crate::rewriter::{FileOutcome, RunReport};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Defines the possible output formats for a run.
#[derive(clap::ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// One `Updated: <path>` line per changed file, printed as it happens.
    #[default]
    Text,
    /// A single JSON document written after the run.
    Json,
}

/// Writes per-file lines and end-of-run output in the chosen format.
pub struct Reporter<W: Write, E: Write> {
    format: OutputFormat,
    include_summary: bool,
    strict: bool,
    out: W,
    err: E,
}

impl<W: Write, E: Write> Reporter<W, E> {
    pub fn new(format: OutputFormat, include_summary: bool, strict: bool, out: W, err: E) -> Self {
        Self {
            format,
            include_summary,
            strict,
            out,
            err,
        }
    }

    /// Called once per processed file, in traversal order.
    pub fn file(&mut self, path: &Path, outcome: &FileOutcome, dry_run: bool) -> Result<()> {
        match outcome {
            FileOutcome::Updated { .. } if self.format == OutputFormat::Text => {
                let label = if dry_run { "Would update" } else { "Updated" };
                writeln!(self.out, "{label}: {}", path.display())?;
            }
            FileOutcome::SkippedUnreadable { reason } if self.strict => {
                writeln!(self.err, "Skipped (unreadable): {}: {reason}", path.display())?;
            }
            FileOutcome::SkippedUnwritable { reason } if self.strict => {
                writeln!(self.err, "Skipped (unwritable): {}: {reason}", path.display())?;
            }
            _ => {}
        }
        Ok(())
    }

    /// Called once after the walk completes.
    pub fn finish(&mut self, report: &RunReport) -> Result<()> {
        match self.format {
            OutputFormat::Text => {
                if self.include_summary {
                    self.write_summary(report)?;
                }
            }
            OutputFormat::Json => self.write_json(report)?,
        }
        self.out.flush()?;
        Ok(())
    }

    fn write_summary(&mut self, report: &RunReport) -> Result<()> {
        writeln!(self.out, "\n{}", "-".repeat(50))?;
        writeln!(self.out, "Files scanned    : {}", report.scanned())?;
        writeln!(self.out, "Files updated    : {}", report.updated())?;
        writeln!(self.out, "Files unchanged  : {}", report.unchanged())?;
        writeln!(self.out, "Skipped (read)   : {}", report.unreadable())?;
        writeln!(self.out, "Skipped (write)  : {}", report.unwritable())?;
        writeln!(self.out, "Total edits      : {}", report.substitutions())?;
        Ok(())
    }

    fn write_json(&mut self, report: &RunReport) -> Result<()> {
        #[derive(Serialize)]
        struct JsonOutput<'a> {
            tool: ToolInfo,
            totals: Totals,
            #[serde(flatten)]
            report: &'a RunReport,
        }

        #[derive(Serialize)]
        struct ToolInfo {
            name: &'static str,
            version: &'static str,
        }

        #[derive(Serialize)]
        struct Totals {
            scanned: usize,
            updated: usize,
            unchanged: usize,
            unreadable: usize,
            unwritable: usize,
            substitutions: usize,
        }

        let output = JsonOutput {
            tool: ToolInfo {
                name: env!("CARGO_PKG_NAME"),
                version: env!("CARGO_PKG_VERSION"),
            },
            totals: Totals {
                scanned: report.scanned(),
                updated: report.updated(),
                unchanged: report.unchanged(),
                unreadable: report.unreadable(),
                unwritable: report.unwritable(),
                substitutions: report.substitutions(),
            },
            report,
        };

        serde_json::to_writer_pretty(&mut self.out, &output)?;
        writeln!(self.out)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::rewriter::Rewriter;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_text_lines_only_for_updates() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        {
            let mut reporter = Reporter::new(OutputFormat::Text, false, false, &mut out, &mut err);
            reporter
                .file(Path::new("a.css"), &FileOutcome::Updated { substitutions: 2 }, false)
                .unwrap();
            reporter.file(Path::new("b.css"), &FileOutcome::Unchanged, false).unwrap();
            reporter
                .file(
                    Path::new("c.css"),
                    &FileOutcome::SkippedUnwritable { reason: "denied".into() },
                    false,
                )
                .unwrap();
            reporter.finish(&RunReport::default()).unwrap();
        }
        assert_eq!(String::from_utf8(out).unwrap(), "Updated: a.css\n");
        assert!(err.is_empty());
    }

    #[test]
    fn test_strict_reports_skips_on_stderr() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        {
            let mut reporter = Reporter::new(OutputFormat::Text, false, true, &mut out, &mut err);
            reporter
                .file(
                    Path::new("c.css"),
                    &FileOutcome::SkippedUnwritable { reason: "denied".into() },
                    false,
                )
                .unwrap();
        }
        assert!(out.is_empty());
        assert_eq!(
            String::from_utf8(err).unwrap(),
            "Skipped (unwritable): c.css: denied\n"
        );
    }

    #[test]
    fn test_dry_run_label() {
        let mut out = Vec::new();
        {
            let mut reporter =
                Reporter::new(OutputFormat::Text, false, false, &mut out, std::io::sink());
            reporter
                .file(Path::new("a.css"), &FileOutcome::Updated { substitutions: 1 }, true)
                .unwrap();
        }
        assert_eq!(String::from_utf8(out).unwrap(), "Would update: a.css\n");
    }

    #[test]
    fn test_json_document() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.css"), "color: #1243B2;").unwrap();
        fs::write(temp_dir.path().join("b.css"), "color: #000000;").unwrap();
        let report = Rewriter::new(Settings::default())
            .run(temp_dir.path(), |_, _| {})
            .unwrap();

        let mut out = Vec::new();
        {
            let mut reporter =
                Reporter::new(OutputFormat::Json, true, false, &mut out, std::io::sink());
            reporter.finish(&report).unwrap();
        }

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["tool"]["name"], "recolor");
        assert_eq!(value["totals"]["updated"], 1);
        assert_eq!(value["totals"]["unchanged"], 1);
        assert_eq!(value["files"][0]["status"], "updated");
        assert_eq!(value["files"][0]["substitutions"], 1);
        assert_eq!(value["files"][1]["status"], "unchanged");
    }
}

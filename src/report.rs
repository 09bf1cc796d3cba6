//! Persisted output of a trend-analysis run.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{Result, TrendError};
use crate::types::{AnalysisRecord, TrendSummary};

pub const DETAILED_FILE: &str = "detailed_analysis.json";
pub const SUMMARY_FILE: &str = "analysis_summary.txt";

/// Writes the detailed record list and the summary report into one directory,
/// replacing whatever a previous run left there.
#[derive(Debug, Clone)]
pub struct TrendReportWriter {
    output_dir: PathBuf,
}

impl TrendReportWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn detailed_path(&self) -> PathBuf {
        self.output_dir.join(DETAILED_FILE)
    }

    pub fn summary_path(&self) -> PathBuf {
        self.output_dir.join(SUMMARY_FILE)
    }

    /// Persist both artifacts and hand the records back untouched.
    pub fn write(&self, records: Vec<AnalysisRecord>) -> Result<Vec<AnalysisRecord>> {
        fs::create_dir_all(&self.output_dir).map_err(|source| TrendError::Write {
            path: self.output_dir.clone(),
            source,
        })?;

        let detailed_path = self.detailed_path();
        // serde_json leaves non-ASCII text unescaped
        let json = serde_json::to_string_pretty(&records).map_err(|err| TrendError::Write {
            path: detailed_path.clone(),
            source: err.into(),
        })?;
        write_file(&detailed_path, &json)?;
        info!(path = %detailed_path.display(), "detailed analysis saved");

        let summary_path = self.summary_path();
        let summary = TrendSummary::from_records(&records);
        write_file(&summary_path, &render_summary(&summary))?;
        info!(
            path = %summary_path.display(),
            total = summary.total,
            positive = summary.positive,
            negative = summary.negative,
            "summary report saved"
        );

        Ok(records)
    }
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).map_err(|source| TrendError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Read back a detailed artifact written by [`TrendReportWriter::write`].
pub fn read_detailed(path: &Path) -> Result<Vec<AnalysisRecord>> {
    if !path.exists() {
        return Err(TrendError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let raw = fs::read_to_string(path).map_err(|source| TrendError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| TrendError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn render_summary(summary: &TrendSummary) -> String {
    let mut out = String::from("Video Content Analysis Summary\n");
    out.push_str("============================\n\n");

    match (summary.positive_percent(), summary.negative_percent()) {
        (Some(positive_pct), Some(negative_pct)) => {
            out.push_str(&format!("Total Segments Analyzed: {}\n", summary.total));
            out.push_str(&format!(
                "Positive Segments: {} ({:.1}%)\n",
                summary.positive, positive_pct
            ));
            out.push_str(&format!(
                "Negative Segments: {} ({:.1}%)\n\n",
                summary.negative, negative_pct
            ));
        }
        _ => out.push_str("No segments were successfully analyzed.\n"),
    }
    out
}

#[cfg(test)]
mod tests {
    use super::render_summary;
    use crate::types::TrendSummary;

    #[test]
    fn summary_reports_counts_and_percentages() {
        let summary = TrendSummary {
            total: 3,
            positive: 2,
            negative: 1,
        };
        let rendered = render_summary(&summary);
        assert!(rendered.starts_with("Video Content Analysis Summary\n"));
        assert!(rendered.contains("Total Segments Analyzed: 3\n"));
        assert!(rendered.contains("Positive Segments: 2 (66.7%)\n"));
        assert!(rendered.contains("Negative Segments: 1 (33.3%)\n"));
        assert!(!rendered.contains("No segments"));
    }

    #[test]
    fn whole_percentages_keep_one_decimal() {
        let summary = TrendSummary {
            total: 2,
            positive: 2,
            negative: 0,
        };
        let rendered = render_summary(&summary);
        assert!(rendered.contains("Positive Segments: 2 (100.0%)"));
        assert!(rendered.contains("Negative Segments: 0 (0.0%)"));
    }

    #[test]
    fn exact_halves_round_to_even() {
        let summary = TrendSummary {
            total: 16,
            positive: 1,
            negative: 15,
        };
        let rendered = render_summary(&summary);
        assert!(rendered.contains("Positive Segments: 1 (6.2%)\n"));
        assert!(rendered.contains("Negative Segments: 15 (93.8%)\n"));
    }

    #[test]
    fn empty_summary_says_nothing_was_analyzed() {
        let rendered = render_summary(&TrendSummary::default());
        assert!(rendered.contains("No segments were successfully analyzed.\n"));
        assert!(!rendered.contains("Total Segments"));
    }
}

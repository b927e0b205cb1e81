use anyhow::{anyhow, Context, Result};
use lcov_parser::{FromFile, LCOVParser, LCOVRecord};
use serde::Serialize;
use std::fmt;
use std::io::Read;
use std::path::Path;

/// Aggregate counts over every record of an lcov tracefile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CoverageSummary {
    pub source_files: u64,
    pub lines_found: u64,
    pub lines_hit: u64,
    pub functions_found: u64,
    pub functions_hit: u64,
    pub branches_found: u64,
    pub branches_hit: u64,
}

fn percent(hit: u64, found: u64) -> Option<f64> {
    if found == 0 {
        None
    } else {
        Some(hit as f64 / found as f64 * 100.0)
    }
}

fn add_count(total: &mut u64, n: u64, label: &str, index: usize) -> Result<()> {
    *total = total
        .checked_add(n)
        .ok_or_else(|| anyhow!("record {}: {} total overflows", index + 1, label))?;
    Ok(())
}

impl CoverageSummary {
    pub fn line_percent(&self) -> Option<f64> {
        percent(self.lines_hit, self.lines_found)
    }

    pub fn function_percent(&self) -> Option<f64> {
        percent(self.functions_hit, self.functions_found)
    }

    pub fn branch_percent(&self) -> Option<f64> {
        percent(self.branches_hit, self.branches_found)
    }

    pub fn is_empty(&self) -> bool {
        self.lines_found == 0 && self.functions_found == 0 && self.branches_found == 0
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let mut parser = LCOVParser::from_file(path)
            .with_context(|| format!("Failed to open tracefile {}", path.display()))?;
        let records = parser
            .parse()
            .with_context(|| format!("Failed to parse tracefile {}", path.display()))?;
        Self::from_records(&records)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let records = LCOVParser::new(reader)
            .parse()
            .context("Failed to parse tracefile")?;
        Self::from_records(&records)
    }

    /// Folds the aggregate records; per-line, per-function and per-branch
    /// detail records are ignored.
    pub fn from_records(records: &[LCOVRecord]) -> Result<Self> {
        let mut summary = CoverageSummary::default();
        for (index, record) in records.iter().enumerate() {
            summary.add_record(record, index)?;
        }
        Ok(summary)
    }

    fn add_record(&mut self, record: &LCOVRecord, index: usize) -> Result<()> {
        match record {
            LCOVRecord::SourceFile(_) => add_count(&mut self.source_files, 1, "SF", index),
            LCOVRecord::LinesFound(n) => add_count(&mut self.lines_found, u64::from(*n), "LF", index),
            LCOVRecord::LinesHit(n) => add_count(&mut self.lines_hit, u64::from(*n), "LH", index),
            LCOVRecord::FunctionsFound(n) => {
                add_count(&mut self.functions_found, u64::from(*n), "FNF", index)
            }
            LCOVRecord::FunctionsHit(n) => {
                add_count(&mut self.functions_hit, u64::from(*n), "FNH", index)
            }
            LCOVRecord::BranchesFound(n) => {
                add_count(&mut self.branches_found, u64::from(*n), "BRF", index)
            }
            LCOVRecord::BranchesHit(n) => {
                add_count(&mut self.branches_hit, u64::from(*n), "BRH", index)
            }
            _ => Ok(()),
        }
    }
}

fn format_ratio(f: &mut fmt::Formatter<'_>, label: &str, hit: u64, found: u64) -> fmt::Result {
    match percent(hit, found) {
        Some(p) => writeln!(f, "  {:<10} {:>6.1}% ({} of {})", label, p, hit, found),
        None => writeln!(f, "  {:<10} no data", label),
    }
}

impl fmt::Display for CoverageSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Overall coverage rate ({} source files):", self.source_files)?;
        format_ratio(f, "lines", self.lines_hit, self.lines_found)?;
        format_ratio(f, "functions", self.functions_hit, self.functions_found)?;
        format_ratio(f, "branches", self.branches_hit, self.branches_found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const TRACEFILE: &str = "\
TN:
SF:/src/proxy/http2/HPACK.cc
FN:10,hpack_decode
FNDA:3,hpack_decode
FNF:2
FNH:1
DA:10,3
DA:11,0
BRDA:11,0,0,1
BRF:4
BRH:1
LF:20
LH:15
end_of_record
SF:/src/proxy/http2/HTTP2.cc
FNF:3
FNH:3
LF:10
LH:5
end_of_record
";

    #[test]
    fn totals_across_records() {
        let summary = CoverageSummary::from_reader(Cursor::new(TRACEFILE)).unwrap();
        assert_eq!(
            summary,
            CoverageSummary {
                source_files: 2,
                lines_found: 30,
                lines_hit: 20,
                functions_found: 5,
                functions_hit: 4,
                branches_found: 4,
                branches_hit: 1,
            }
        );
        assert_eq!(summary.branch_percent(), Some(25.0));
        assert_eq!(summary.function_percent(), Some(80.0));
        assert!(!summary.is_empty());
    }

    #[test]
    fn empty_tracefile_has_no_percentages() {
        let summary = CoverageSummary::from_reader(Cursor::new("TN:\n")).unwrap();
        assert!(summary.is_empty());
        assert_eq!(summary.line_percent(), None);
        assert!(summary.to_string().contains("lines      no data"));
    }

    #[test]
    fn bad_count_is_an_error() {
        let err = CoverageSummary::from_reader(Cursor::new("SF:a.c\nLF:ten\nend_of_record\n"))
            .unwrap_err();
        assert!(err.to_string().starts_with("Failed to parse tracefile"));
    }

    #[test]
    fn oversized_count_is_an_error_not_a_panic() {
        let result = std::panic::catch_unwind(|| {
            CoverageSummary::from_reader(Cursor::new(
                "SF:a.c\nLF:18446744073709551615\nend_of_record\nSF:b.c\nLF:1\nend_of_record\n",
            ))
        });
        assert!(result.expect("summarising must not panic").is_err());
    }

    #[test]
    fn total_overflow_names_the_record() {
        let mut summary = CoverageSummary {
            lines_found: u64::MAX - 1,
            ..CoverageSummary::default()
        };
        let err = summary
            .add_record(&LCOVRecord::LinesFound(5), 3)
            .unwrap_err();
        assert_eq!(err.to_string(), "record 4: LF total overflows");
        assert_eq!(summary.lines_found, u64::MAX - 1);
    }

    #[test]
    fn display_formats_rates() {
        let summary = CoverageSummary::from_reader(Cursor::new(TRACEFILE)).unwrap();
        let text = summary.to_string();
        assert!(text.starts_with("Overall coverage rate (2 source files):"));
        assert!(text.contains("lines        66.7% (20 of 30)"), "{}", text);
    }

    #[test]
    fn reads_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.info");
        std::fs::write(&path, TRACEFILE).unwrap();
        assert_eq!(CoverageSummary::from_path(&path).unwrap().lines_hit, 20);
    }
}

use crate::coverage::CoverageSummary;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::PathBuf;

/// Everything a `gather` run needs to know, after CLI flags and config are merged.
#[derive(Debug, Clone)]
pub struct GatherOptions {
    pub corpus_dir: PathBuf,
    pub program: PathBuf,
    /// Target arguments; `@@` is replaced by the input path.
    pub program_args: Vec<String>,
    pub title: String,
    pub capture_dir: PathBuf,
    pub merged_output: PathBuf,
    pub reset_counters: bool,
    pub archive: bool,
}

impl GatherOptions {
    pub fn report_dir_name(&self) -> String {
        format!("coverage-{}", self.title)
    }

    pub fn archive_name(&self) -> String {
        format!("coverage-{}.tgz", self.title)
    }

    pub fn report_dir(&self) -> PathBuf {
        self.corpus_dir.join(self.report_dir_name())
    }

    pub fn archive_path(&self) -> PathBuf {
        self.corpus_dir.join(self.archive_name())
    }
}

/// Result of replaying a single corpus input.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayOutcome {
    pub input: String,
    pub succeeded: bool,
    pub tracefile: PathBuf,
}

/// What a completed `gather` run produced.
#[derive(Debug, Clone, Serialize)]
pub struct GatherReport {
    pub title: String,
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
    pub inputs: usize,
    pub failed_inputs: Vec<String>,
    pub outcomes: Vec<ReplayOutcome>,
    pub tracefiles_merged: usize,
    pub merged_tracefile: PathBuf,
    pub report_dir: PathBuf,
    pub archive: Option<PathBuf>,
    /// Totals of the merged tracefile, when it could be parsed.
    pub coverage: Option<CoverageSummary>,
}

use crate::config::Config;
use crate::coverage;
use crate::types::GatherOptions;
use crate::utils::external_tools::check_tool;
use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

pub struct GatherArgs {
    pub corpus_dir: PathBuf,
    pub program: PathBuf,
    pub title: String,
    pub program_args: Vec<String>,
    pub capture_dir: Option<PathBuf>,
    pub merged_output: Option<PathBuf>,
    pub reset_counters: bool,
    pub no_archive: bool,
    pub report_json: Option<PathBuf>,
}

impl GatherArgs {
    pub fn into_options(self, config: &Config) -> GatherOptions {
        GatherOptions {
            corpus_dir: self.corpus_dir,
            program: self.program,
            program_args: self.program_args,
            title: self.title,
            capture_dir: self.capture_dir.unwrap_or_else(|| config.capture_dir.clone()),
            merged_output: self
                .merged_output
                .unwrap_or_else(|| config.merged_output.clone()),
            reset_counters: self.reset_counters,
            archive: !self.no_archive,
        }
    }
}

pub fn run(args: GatherArgs, config: &Config) -> Result<()> {
    let report_json = args.report_json.clone();
    let options = args.into_options(config);

    if !options.corpus_dir.is_dir() {
        anyhow::bail!(
            "Corpus directory {} does not exist",
            options.corpus_dir.display()
        );
    }

    check_tool(
        config.lcov.as_os_str(),
        "Please install lcov (https://github.com/linux-test-project/lcov) and ensure it's in your PATH",
    )?;
    check_tool(
        config.genhtml.as_os_str(),
        "genhtml ships with lcov; please install lcov and ensure it's in your PATH",
    )?;
    if options.archive {
        check_tool(config.tar.as_os_str(), "Please install tar or pass --no-archive")?;
    }

    let report = coverage::gather(&options, config)?;

    println!("Coverage report: {}", report.report_dir.display());
    if let Some(archive) = &report.archive {
        println!("Archive: {}", archive.display());
    }
    if !report.failed_inputs.is_empty() {
        println!(
            "{} of {} inputs made the program fail",
            report.failed_inputs.len(),
            report.inputs
        );
    }

    if let Some(path) = report_json {
        let json = serde_json::to_string_pretty(&report)?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write run report to {}", path.display()))?;
    }

    Ok(())
}

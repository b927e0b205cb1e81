use super::corpus;
use super::replay::{Replayer, TargetProgram};
use super::tools::CoverageTools;
use super::tracefile::CoverageSummary;
use crate::config::Config;
use crate::types::{GatherOptions, GatherReport};
use crate::utils::progress_bar_builder::ProgressBarBuilder;
use anyhow::{bail, Context, Result};
use chrono::Local;
use tracing::{info, warn};

/// Replays the corpus, merges the per-input tracefiles, renders the HTML
/// report and archives it.
pub fn gather(options: &GatherOptions, config: &Config) -> Result<GatherReport> {
    let started_at = Local::now();
    let tools = CoverageTools::new(config, &options.capture_dir);
    let target = TargetProgram::new(&options.program, options.program_args.clone());

    let inputs = corpus::list_inputs(&options.corpus_dir)?;
    info!(
        "Replaying {} corpus inputs from {}",
        inputs.len(),
        options.corpus_dir.display()
    );

    let progress = ProgressBarBuilder::new("Replaying corpus")
        .with_template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .with_length(inputs.len() as u64)
        .build()?;

    let replayer = Replayer::new(&target, &tools, &options.corpus_dir, options.reset_counters);
    let mut outcomes = Vec::with_capacity(inputs.len());
    for input in &inputs {
        progress.set_message(input.display_name());
        outcomes.push(replayer.replay(input)?);
        progress.inc(1);
    }
    let failed_inputs: Vec<String> = outcomes
        .iter()
        .filter(|outcome| !outcome.succeeded)
        .map(|outcome| outcome.input.clone())
        .collect();
    progress.finish_with_message(format!(
        "Replayed {} inputs ({} failed)",
        inputs.len(),
        failed_inputs.len()
    ));

    let spinner = ProgressBarBuilder::new("Joining lcov info")
        .with_tick()
        .build()?;
    info!("Joining lcov info");
    let tracefiles = corpus::list_tracefiles(&options.corpus_dir)?;
    if tracefiles.is_empty() {
        bail!(
            "No .info tracefiles found in {}",
            options.corpus_dir.display()
        );
    }
    tools
        .merge(&tracefiles, &options.merged_output)
        .run_checked("merge")
        .context("Failed to merge tracefiles")?;

    let coverage = match CoverageSummary::from_path(&options.merged_output) {
        Ok(summary) if summary.is_empty() => {
            warn!(
                "Merged tracefile {} holds no coverage data",
                options.merged_output.display()
            );
            Some(summary)
        }
        Ok(summary) => {
            info!(
                "Merged coverage: {}/{} lines, {}/{} functions",
                summary.lines_hit,
                summary.lines_found,
                summary.functions_hit,
                summary.functions_found
            );
            Some(summary)
        }
        Err(e) => {
            warn!("Could not summarise merged tracefile: {:#}", e);
            None
        }
    };

    spinner.set_message("Generating HTML coverage report");
    info!("Generating HTML coverage report");
    let report_dir = options.report_dir();
    tools
        .genhtml(&options.merged_output, &options.title, &report_dir)
        .run_checked("genhtml")
        .context("Failed to generate HTML report")?;

    let archive = if options.archive {
        spinner.set_message("Generating tar for the report");
        info!("Generating tar for the report");
        tools
            .archive(
                &options.corpus_dir,
                &options.archive_name(),
                &options.report_dir_name(),
            )
            .run_checked("archive")
            .context("Failed to archive HTML report")?;
        Some(options.archive_path())
    } else {
        None
    };

    spinner.finish_and_clear();

    Ok(GatherReport {
        title: options.title.clone(),
        started_at,
        finished_at: Local::now(),
        inputs: inputs.len(),
        failed_inputs,
        outcomes,
        tracefiles_merged: tracefiles.len(),
        merged_tracefile: options.merged_output.clone(),
        report_dir,
        archive,
        coverage,
    })
}

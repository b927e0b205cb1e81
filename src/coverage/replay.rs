use super::corpus::{self, CorpusInput};
use super::tools::CoverageTools;
use crate::types::ReplayOutcome;
use crate::utils::external_tools::ToolInvocation;
use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Placeholder argument replaced by the corpus input path.
pub const INPUT_PLACEHOLDER: &str = "@@";

/// The instrumented binary under test.
#[derive(Debug, Clone)]
pub struct TargetProgram {
    program: PathBuf,
    args: Vec<String>,
}

impl TargetProgram {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Command line for one input: `@@` is substituted, otherwise the input is appended.
    pub fn invocation(&self, input: &Path) -> ToolInvocation {
        let mut inv = ToolInvocation::new(&self.program);
        let mut substituted = false;
        for arg in &self.args {
            if arg == INPUT_PLACEHOLDER {
                inv = inv.arg(input);
                substituted = true;
            } else {
                inv = inv.arg(arg);
            }
        }
        if !substituted {
            inv = inv.arg(input);
        }
        inv
    }
}

/// Runs the target against inputs and captures coverage after each run.
pub struct Replayer<'a> {
    target: &'a TargetProgram,
    tools: &'a CoverageTools,
    corpus_dir: &'a Path,
    reset_counters: bool,
}

impl<'a> Replayer<'a> {
    pub fn new(
        target: &'a TargetProgram,
        tools: &'a CoverageTools,
        corpus_dir: &'a Path,
        reset_counters: bool,
    ) -> Self {
        Self {
            target,
            tools,
            corpus_dir,
            reset_counters,
        }
    }

    /// Replays one input. A failing target is tolerated; anything lcov
    /// gets wrong is not.
    pub fn replay(&self, input: &CorpusInput) -> Result<ReplayOutcome> {
        let tracefile = corpus::tracefile_for(self.corpus_dir, input);

        if self.reset_counters {
            self.tools
                .zero_counters()
                .run_checked("reset counters")
                .context("Failed to reset coverage counters")?;
        }

        let succeeded = self.run_target(input);
        if !succeeded {
            remove_stray_tracefile(&tracefile)?;
        }

        self.tools
            .capture(&tracefile)
            .run_checked("capture")
            .with_context(|| format!("Failed to capture coverage for {}", input.display_name()))?;

        Ok(ReplayOutcome {
            input: input.display_name(),
            succeeded,
            tracefile,
        })
    }

    fn run_target(&self, input: &CorpusInput) -> bool {
        let inv = self.target.invocation(&input.path);
        match inv.output("target") {
            Ok(output) if output.status.success() => true,
            Ok(output) => {
                warn!("Exception caused in {} ({})", inv, output.status);
                let stderr = String::from_utf8_lossy(&output.stderr);
                if !stderr.trim().is_empty() {
                    debug!("{}", stderr.trim_end());
                }
                false
            }
            Err(e) => {
                warn!("Exception caused in {}: {}", inv, e);
                false
            }
        }
    }
}

fn remove_stray_tracefile(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!("Removed stray tracefile {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("Failed to remove {}", path.display())),
    }
}

use crate::config::Config;
use crate::utils::external_tools::ToolInvocation;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Builds the `lcov`, `genhtml` and `tar` invocations for a run.
#[derive(Debug, Clone)]
pub struct CoverageTools {
    lcov: PathBuf,
    genhtml: PathBuf,
    tar: PathBuf,
    capture_dir: PathBuf,
    no_external: bool,
    ignore_errors: Vec<String>,
    legend: bool,
}

impl CoverageTools {
    pub fn new(config: &Config, capture_dir: &Path) -> Self {
        Self {
            lcov: config.lcov.clone(),
            genhtml: config.genhtml.clone(),
            tar: config.tar.clone(),
            capture_dir: capture_dir.to_path_buf(),
            no_external: config.no_external,
            ignore_errors: config.genhtml_ignore_errors.clone(),
            legend: config.genhtml_legend,
        }
    }

    pub fn capture(&self, tracefile: &Path) -> ToolInvocation {
        let mut inv = ToolInvocation::new(&self.lcov);
        if self.no_external {
            inv = inv.arg("--no-external");
        }
        inv.arg("--capture")
            .arg("--directory")
            .arg(&self.capture_dir)
            .arg("--output-file")
            .arg(tracefile)
    }

    pub fn zero_counters(&self) -> ToolInvocation {
        ToolInvocation::new(&self.lcov)
            .arg("--zerocounters")
            .arg("--directory")
            .arg(&self.capture_dir)
    }

    pub fn merge(&self, tracefiles: &[PathBuf], output: &Path) -> ToolInvocation {
        let mut inv = ToolInvocation::new(&self.lcov);
        for tracefile in tracefiles {
            inv = inv.arg("-a").arg(tracefile);
        }
        inv.arg("-o").arg(output)
    }

    pub fn genhtml(&self, merged: &Path, title: &str, report_dir: &Path) -> ToolInvocation {
        let mut inv = ToolInvocation::new(&self.genhtml);
        if !self.ignore_errors.is_empty() {
            inv = inv
                .arg("--ignore-errors")
                .arg(self.ignore_errors.join(","));
        }
        inv = inv.arg(merged);
        if self.legend {
            inv = inv.arg("--legend");
        }
        let mut output_dir = OsString::from("--output-directory=");
        output_dir.push(report_dir);
        inv.arg("--title").arg(title).arg(output_dir)
    }

    /// `tar -czvf <archive> <report dir>/`, run from `workdir`.
    pub fn archive(&self, workdir: &Path, archive_name: &str, report_dir_name: &str) -> ToolInvocation {
        ToolInvocation::new(&self.tar)
            .arg("-czvf")
            .arg(archive_name)
            .arg(format!("{}/", report_dir_name))
            .current_dir(workdir)
    }
}

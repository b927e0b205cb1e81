use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of the per-user config.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replay a corpus against a coverage-instrumented program and package an HTML report
    Gather {
        /// Directory where the corpus exists
        #[arg(long = "corpusdir")]
        corpus_dir: PathBuf,

        /// Program to run each corpus input with
        #[arg(long)]
        program: PathBuf,

        /// Title of the HTML report
        #[arg(long, default_value = "trafficserver")]
        title: String,

        /// Extra argument for the program; "@@" stands for the input path (repeatable)
        #[arg(long = "program-arg", allow_hyphen_values = true)]
        program_args: Vec<String>,

        /// Directory lcov scans for coverage data (overrides config)
        #[arg(long)]
        capture_dir: Option<PathBuf>,

        /// Path of the merged tracefile (overrides config)
        #[arg(long)]
        merged_output: Option<PathBuf>,

        /// Zero coverage counters before each input
        #[arg(long)]
        reset_counters: bool,

        /// Skip creating the .tgz archive
        #[arg(long)]
        no_archive: bool,

        /// Write a JSON summary of the run to this file
        #[arg(long)]
        report_json: Option<PathBuf>,
    },

    /// Summarise an lcov tracefile
    Summary {
        /// Tracefile (.info) to read
        tracefile: PathBuf,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Write the default configuration to the config file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

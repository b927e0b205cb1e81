pub mod cli;
pub mod commands;
pub mod config;
pub mod coverage;
pub mod types;
pub mod utils;

pub use config::Config;
pub use coverage::{gather, CoverageSummary};
pub use types::{GatherOptions, GatherReport};

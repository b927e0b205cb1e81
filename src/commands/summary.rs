use crate::coverage::CoverageSummary;
use anyhow::Result;
use std::path::Path;

pub fn run(tracefile: &Path, json: bool) -> Result<()> {
    let summary = CoverageSummary::from_path(tracefile)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", summary);
    }
    Ok(())
}

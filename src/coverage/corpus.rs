use anyhow::{Context, Result};
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};

/// Extension lcov tracefiles are written with.
pub const TRACEFILE_EXTENSION: &str = "info";

/// One entry of the corpus directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusInput {
    pub name: OsString,
    pub path: PathBuf,
}

impl CorpusInput {
    pub fn display_name(&self) -> String {
        self.name.to_string_lossy().into_owned()
    }
}

fn read_entries(dir: &Path) -> Result<Vec<fs::DirEntry>> {
    fs::read_dir(dir)
        .with_context(|| format!("Failed to list corpus directory {}", dir.display()))?
        .map(|entry| {
            entry.with_context(|| format!("Failed to read entry in {}", dir.display()))
        })
        .collect()
}

/// Lists the corpus inputs of `dir` in directory-listing order.
///
/// Subdirectories are not inputs and are skipped.
pub fn list_inputs(dir: &Path) -> Result<Vec<CorpusInput>> {
    let mut inputs = Vec::new();
    for entry in read_entries(dir)? {
        let path = entry.path();
        // follows symlinks, so a link to a file still counts
        if path.is_dir() {
            continue;
        }
        inputs.push(CorpusInput {
            name: entry.file_name(),
            path,
        });
    }
    Ok(inputs)
}

/// `<dir>/<input name>.info`
pub fn tracefile_for(dir: &Path, input: &CorpusInput) -> PathBuf {
    let mut name = input.name.clone();
    name.push(".");
    name.push(TRACEFILE_EXTENSION);
    dir.join(name)
}

fn is_tracefile(name: &OsStr) -> bool {
    name.to_string_lossy()
        .ends_with(&format!(".{}", TRACEFILE_EXTENSION))
}

/// Every `.info` file in `dir`, in directory-listing order.
pub fn list_tracefiles(dir: &Path) -> Result<Vec<PathBuf>> {
    Ok(read_entries(dir)?
        .into_iter()
        .filter(|entry| is_tracefile(&entry.file_name()))
        .map(|entry| entry.path())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn inputs_skip_directories() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("crash-1"), b"\x00\x01").unwrap();
        fs::write(dir.path().join("seed"), b"GET / HTTP/1.1").unwrap();
        fs::create_dir(dir.path().join("coverage-trafficserver")).unwrap();

        let names: BTreeSet<String> = list_inputs(dir.path())
            .unwrap()
            .iter()
            .map(CorpusInput::display_name)
            .collect();
        assert_eq!(names, BTreeSet::from(["crash-1".to_string(), "seed".to_string()]));
    }

    #[test]
    fn listing_order_matches_read_dir() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b", "a", "c", "0"] {
            fs::write(dir.path().join(name), name).unwrap();
        }
        let expected: Vec<OsString> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        let listed: Vec<OsString> = list_inputs(dir.path())
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(listed, expected);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = list_inputs(&dir.path().join("nope")).unwrap_err();
        assert!(err.to_string().starts_with("Failed to list corpus directory"));
    }

    #[test]
    fn tracefile_name_appends_extension() {
        let input = CorpusInput {
            name: OsString::from("seed.bin"),
            path: PathBuf::from("/c/seed.bin"),
        };
        assert_eq!(tracefile_for(Path::new("/c"), &input), PathBuf::from("/c/seed.bin.info"));
    }

    #[test]
    fn tracefiles_are_filtered_by_suffix() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.info", "a", "b.info", "info", "c.information"] {
            fs::write(dir.path().join(name), "").unwrap();
        }
        let found: BTreeSet<PathBuf> = list_tracefiles(dir.path()).unwrap().into_iter().collect();
        assert_eq!(
            found,
            BTreeSet::from([dir.path().join("a.info"), dir.path().join("b.info")])
        );
    }
}

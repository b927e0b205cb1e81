use crate::config::Config;
use anyhow::{anyhow, bail, Result};
use std::path::Path;

/// Writes `config` to `path`, or to the per-user config location.
pub fn run(config: &Config, path: Option<&Path>, force: bool) -> Result<()> {
    let target = match path {
        Some(path) => path.to_path_buf(),
        None => Config::default_path()
            .ok_or_else(|| anyhow!("Failed to determine project directories"))?,
    };

    if target.exists() && !force {
        bail!(
            "{} already exists; pass --force to overwrite it",
            target.display()
        );
    }

    config.save_to(&target)?;
    println!("Wrote {}", target.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "lcov = \"/usr/local/bin/lcov\"\n").unwrap();

        assert!(run(&Config::default(), Some(&path), false).is_err());
        assert_eq!(Config::load_from(&path).unwrap().lcov, Path::new("/usr/local/bin/lcov"));

        run(&Config::default(), Some(&path), true).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), Config::default());
    }
}

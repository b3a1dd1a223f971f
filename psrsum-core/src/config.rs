use std::env;
use std::path::PathBuf;

use crate::error::{Result, SumError};

/// Resolved run settings with every default filled in.
///
/// The verbose value is validated at the CLI boundary (it must be exactly
/// `true` or `false`); nothing here re-checks it. Path existence is checked
/// by [`Config::validate`] immediately before scanning, not at resolve time.
#[derive(Clone, Debug)]
pub struct Config {
    /// Directory tree to search.
    pub data_dir: PathBuf,
    /// File name of the generated README.
    pub output_name: String,
    /// Directory the README is written into.
    pub output_dir: PathBuf,
    /// Owner of the data directory (freeform label).
    pub owner: String,
    /// Person generating the README.
    pub generator: String,
    pub verbose: bool,
}

impl Config {
    /// Fills unset options with their defaults: current working directory
    /// for both paths, "README.txt", owner "Unknown", and the current OS
    /// user as generator.
    pub fn resolve(
        data_dir: Option<PathBuf>,
        output_name: Option<String>,
        output_dir: Option<PathBuf>,
        owner: Option<String>,
        generator: Option<String>,
        verbose: bool,
    ) -> Result<Self> {
        let cwd = env::current_dir()?;
        Ok(Self {
            data_dir: data_dir.unwrap_or_else(|| cwd.clone()),
            output_name: output_name.unwrap_or_else(|| "README.txt".to_string()),
            output_dir: output_dir.unwrap_or(cwd),
            owner: owner.unwrap_or_else(|| "Unknown".to_string()),
            generator: generator.unwrap_or_else(current_user),
            verbose,
        })
    }

    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(&self.output_name)
    }

    /// Preconditions, each fatal: both directories must exist and the
    /// output file must not. The tool never overwrites an existing README.
    pub fn validate(&self) -> Result<()> {
        if !self.data_dir.is_dir() {
            return Err(SumError::MissingDataDir(self.data_dir.clone()));
        }
        if !self.output_dir.is_dir() {
            return Err(SumError::MissingOutputDir(self.output_dir.clone()));
        }
        let out = self.output_path();
        if out.exists() {
            return Err(SumError::OutputExists(out));
        }
        Ok(())
    }
}

fn current_user() -> String {
    env::var("USER")
        .or_else(|_| env::var("USERNAME"))
        .unwrap_or_else(|_| "Unknown".to_string())
}

use crate::error::VendorError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "modvendor.toml";

/// Optional `modvendor.toml` in the project root.
///
/// ```toml
/// copy = ["**/*.h", "**/*.proto"]
/// include = ["github.com/tensorflow/tensorflow/tensorflow/c"]
/// verbose = false
/// modcache = "/opt/go/pkg/mod"
/// ```
#[derive(Deserialize, Debug, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct VendorConfig {
    #[serde(default)]
    pub copy: Vec<String>,
    #[serde(default)]
    pub include: Vec<String>,
    #[serde(default)]
    pub verbose: bool,
    pub modcache: Option<PathBuf>,
}

/// Settings taken from the command line.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub copy: Vec<String>,
    pub include: Vec<String>,
    pub verbose: bool,
    pub dry_run: bool,
    pub modcache: Option<PathBuf>,
}

/// Effective settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct VendorOptions {
    pub patterns: Vec<String>,
    pub includes: Vec<String>,
    pub verbose: bool,
    pub dry_run: bool,
    pub modcache: Option<PathBuf>,
}

impl VendorConfig {
    /// Load `modvendor.toml` from `project_root`, or defaults if absent.
    pub fn load(project_root: &Path) -> Result<Self, VendorError> {
        let path = project_root.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path).map_err(|e| VendorError::io(&path, e))?;
        let mut config: Self = toml::from_str(&content).map_err(|e| VendorError::Config {
            path: path.clone(),
            message: e.to_string(),
        })?;
        if let Some(dir) = config.modcache.take() {
            config.modcache = Some(project_root.join(dir));
        }
        Ok(config)
    }

    /// CLI patterns replace configured ones, CLI includes add to them.
    pub fn merge(self, cli: CliOverrides) -> VendorOptions {
        let patterns = if cli.copy.is_empty() {
            self.copy
        } else {
            cli.copy
        };
        let mut includes = self.include;
        includes.extend(cli.include);

        VendorOptions {
            patterns,
            includes,
            verbose: self.verbose || cli.verbose,
            dry_run: cli.dry_run,
            modcache: cli.modcache.or(self.modcache),
        }
    }
}

/// Split a space separated flag value, dropping empty entries.
pub fn split_list(value: &str) -> Vec<String> {
    value.split_whitespace().map(str::to_string).collect()
}

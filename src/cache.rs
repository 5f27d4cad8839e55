//! Go module cache lookup.
//!
//! Modules are stored under `$GOMODCACHE` (by default `$GOPATH/pkg/mod`) in
//! directories named `<encoded-import-path>@<version>`. The encoding keeps
//! cache paths unambiguous on case-insensitive filesystems by replacing each
//! uppercase letter with `!` and its lowercase form:
//!
//! ```text
//! github.com/BurntSushi/toml v1.2.0 -> github.com/!burnt!sushi/toml@v1.2.0
//! ```

use crate::error::VendorError;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

const ESCAPE: char = '!';
const VERSION_SEPARATOR: char = '@';

/// Case-fold an import path the way the module cache names directories.
pub fn encode_import_path(import_path: &str) -> String {
    let mut encoded = String::with_capacity(import_path.len());
    for c in import_path.chars() {
        if c.is_uppercase() {
            encoded.push(ESCAPE);
            encoded.push(c.to_lowercase().next().unwrap_or(c));
        } else {
            encoded.push(c);
        }
    }
    encoded
}

/// Directory a module version is extracted to under `root`. Pure; the
/// directory may not exist.
pub fn module_dir(root: &Path, import_path: &str, version: &str) -> PathBuf {
    let name = format!(
        "{}{}{}",
        encode_import_path(import_path),
        VERSION_SEPARATOR,
        version
    );
    // Import paths use '/', let the platform join each segment.
    name.split('/').fold(root.to_path_buf(), |dir, seg| dir.join(seg))
}

/// Pick the module cache root from the Go environment.
///
/// `GOMODCACHE` wins, then the first `GOPATH` entry plus `pkg/mod`, then
/// `~/go/pkg/mod` (the default GOPATH since Go 1.8).
pub fn root_from_env(
    gomodcache: Option<OsString>,
    gopath: Option<OsString>,
    home: Option<PathBuf>,
) -> Option<PathBuf> {
    if let Some(dir) = gomodcache.filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(dir));
    }

    let gopath = gopath
        .filter(|v| !v.is_empty())
        .and_then(|v| std::env::split_paths(&v).find(|p| !p.as_os_str().is_empty()))
        .or_else(|| home.map(|h| h.join("go")))?;

    Some(gopath.join("pkg").join("mod"))
}

/// Read-only view of the shared module cache.
#[derive(Debug, Clone)]
pub struct ModCache {
    root: PathBuf,
}

impl ModCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Cache rooted at `override_root`, or wherever the environment points.
    pub fn from_env(override_root: Option<&Path>) -> Option<Self> {
        if let Some(root) = override_root {
            return Some(Self::new(root));
        }
        root_from_env(
            std::env::var_os("GOMODCACHE"),
            std::env::var_os("GOPATH"),
            dirs::home_dir(),
        )
        .map(Self::new)
    }

    pub fn module_dir(&self, import_path: &str, version: &str) -> PathBuf {
        module_dir(&self.root, import_path, version)
    }

    /// Resolve a module directory and check that it was downloaded.
    pub fn locate(&self, import_path: &str, version: &str) -> Result<PathBuf, VendorError> {
        let dir = self.module_dir(import_path, version);
        ensure_dir(dir)
    }
}

pub(crate) fn ensure_dir(dir: PathBuf) -> Result<PathBuf, VendorError> {
    if dir.is_dir() {
        Ok(dir)
    } else {
        Err(VendorError::ModuleDirMissing { path: dir })
    }
}

use crate::error::VendorError;
use crate::manifest::ModuleRecord;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Copy patterns, compiled once and shared by every module.
///
/// `*` stays within one path segment, `**` spans any depth. Patterns are
/// matched against paths relative to the module directory, so a leading
/// `/` or `./` is rooted at the module directory.
#[derive(Debug, Clone)]
pub struct PatternSet {
    set: GlobSet,
}

impl PatternSet {
    pub fn compile<S: AsRef<str>>(patterns: &[S]) -> Result<Self, VendorError> {
        let patterns: Vec<String> = patterns
            .iter()
            .map(|p| {
                p.as_ref()
                    .trim()
                    .trim_start_matches("./")
                    .trim_start_matches('/')
                    .to_string()
            })
            .filter(|p| !p.is_empty())
            .collect();
        if patterns.is_empty() {
            return Err(VendorError::EmptyPatterns);
        }

        let mut builder = GlobSetBuilder::new();
        for p in &patterns {
            let glob = GlobBuilder::new(p)
                .literal_separator(true)
                .build()
                .map_err(|source| VendorError::InvalidPattern {
                    pattern: p.clone(),
                    source,
                })?;
            builder.add(glob);
        }
        let set = builder
            .build()
            .map_err(|source| VendorError::InvalidPattern {
                pattern: patterns.join(" "),
                source,
            })?;

        Ok(Self { set })
    }

    pub fn is_match(&self, relative: &Path) -> bool {
        self.set.is_match(relative)
    }
}

/// Every non-directory entry under the module's directory that matches a
/// pattern, as absolute paths in sorted order. Symlinks are not followed.
pub fn collect_candidates(
    patterns: &PatternSet,
    module: &ModuleRecord,
) -> Result<Vec<PathBuf>, VendorError> {
    let mut candidates = Vec::new();

    for entry in WalkDir::new(&module.dir)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(&module.dir).to_path_buf();
            VendorError::io(path, e.into())
        })?;
        if entry.file_type().is_dir() {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(&module.dir) else {
            continue;
        };
        if patterns.is_match(rel) {
            candidates.push(entry.into_path());
        }
    }

    Ok(candidates)
}

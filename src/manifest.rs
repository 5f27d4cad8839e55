//! `vendor/modules.txt` parsing.
//!
//! `go mod vendor` writes one block per module:
//!
//! ```text
//! # github.com/gogo/protobuf v1.3.2
//! github.com/gogo/protobuf/proto
//! # golang.org/x/net v0.0.0-2019 => github.com/golang/net v0.0.0-2019
//! golang.org/x/net/context
//! ```
//!
//! Module lines open a block, every other line names a package imported
//! from the module above it.

use crate::cache::{self, ModCache};
use crate::error::VendorError;
use std::path::{Path, PathBuf};

pub const MODULE_SENTINEL: char = '#';
pub const REDIRECT: &str = "=>";

/// Target of a `=>` replace directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub path: String,
    /// `None` for a filesystem replacement (`=> ../fork`).
    pub version: Option<String>,
}

impl Replacement {
    pub fn is_local(&self) -> bool {
        self.version.is_none()
    }
}

/// One classified line of the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestLine<'a> {
    Module {
        path: &'a str,
        version: &'a str,
        replace: Option<Replacement>,
    },
    /// `# path => ...` with `=>` in the version slot. Written by some Go
    /// releases for replaced-but-unused modules; carries nothing to vendor.
    Redirect { path: &'a str },
    /// `## explicit` and similar module annotations.
    Annotation,
    Blank,
    Package(&'a str),
}

/// Classify a single manifest line. `line_no` is 1-based and only used for errors.
pub fn parse_line(line_no: usize, line: &str) -> Result<ManifestLine<'_>, VendorError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(ManifestLine::Blank);
    }
    let Some(rest) = trimmed.strip_prefix(MODULE_SENTINEL) else {
        return Ok(ManifestLine::Package(trimmed));
    };
    if rest.starts_with(MODULE_SENTINEL) {
        return Ok(ManifestLine::Annotation);
    }

    let malformed = || VendorError::MalformedLine {
        line_no,
        line: line.to_string(),
    };

    let tokens: Vec<&str> = rest.split_whitespace().collect();
    let (path, version) = match tokens.as_slice() {
        [path, version, ..] => (*path, *version),
        _ => return Err(malformed()),
    };

    if version == REDIRECT {
        return Ok(ManifestLine::Redirect { path });
    }

    let replace = match tokens.get(2) {
        Some(&REDIRECT) => {
            let target = *tokens.get(3).ok_or_else(malformed)?;
            match tokens.get(4) {
                Some(v) => Some(Replacement {
                    path: target.to_string(),
                    version: Some(v.to_string()),
                }),
                None if is_filesystem_path(target) => Some(Replacement {
                    path: target.to_string(),
                    version: None,
                }),
                None => return Err(malformed()),
            }
        }
        _ => None,
    };

    Ok(ManifestLine::Module {
        path,
        version,
        replace,
    })
}

fn is_filesystem_path(target: &str) -> bool {
    target.starts_with('.') || target.starts_with('/') || Path::new(target).is_absolute()
}

/// A dependency module and the packages the build imports from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleRecord {
    pub import_path: String,
    pub version: String,
    pub replace: Option<Replacement>,
    /// Where the module's source lives: the cache directory of the
    /// replacement if there is one, of the module itself otherwise.
    pub dir: PathBuf,
    /// Imported package paths, in manifest order.
    pub packages: Vec<String>,
}

enum Cursor {
    Start,
    Skipping,
    Module(ModuleRecord),
}

struct Fold {
    modules: Vec<ModuleRecord>,
    cursor: Cursor,
}

impl Fold {
    fn close(mut self) -> Vec<ModuleRecord> {
        if let Cursor::Module(m) = self.cursor {
            self.modules.push(m);
        }
        self.modules
    }

    fn open(mut self, next: Cursor) -> Self {
        if let Cursor::Module(m) = std::mem::replace(&mut self.cursor, next) {
            self.modules.push(m);
        }
        self
    }
}

/// Parse the manifest into module records, resolving and checking each
/// module's source directory as soon as its line is read.
///
/// Filesystem replacements resolve against `project_root`; everything else
/// against `cache`. The first error stops parsing.
pub fn parse_manifest(
    text: &str,
    cache: &ModCache,
    project_root: &Path,
) -> Result<Vec<ModuleRecord>, VendorError> {
    let start = Fold {
        modules: Vec::new(),
        cursor: Cursor::Start,
    };

    let fold = text
        .lines()
        .enumerate()
        .try_fold(start, |mut fold, (idx, raw)| {
            let line_no = idx + 1;
            match parse_line(line_no, raw)? {
                ManifestLine::Blank | ManifestLine::Annotation => Ok(fold),
                ManifestLine::Redirect { .. } => Ok(fold.open(Cursor::Skipping)),
                ManifestLine::Module {
                    path,
                    version,
                    replace,
                } => {
                    let dir = resolve_dir(path, version, replace.as_ref(), cache, project_root)?;
                    Ok(fold.open(Cursor::Module(ModuleRecord {
                        import_path: path.to_string(),
                        version: version.to_string(),
                        replace,
                        dir,
                        packages: Vec::new(),
                    })))
                }
                ManifestLine::Package(pkg) => match &mut fold.cursor {
                    Cursor::Module(m) => {
                        m.packages.push(pkg.to_string());
                        Ok(fold)
                    }
                    Cursor::Skipping => Ok(fold),
                    Cursor::Start => Err(VendorError::OrphanPackage {
                        line_no,
                        line: raw.to_string(),
                    }),
                },
            }
        })?;

    Ok(fold.close())
}

fn resolve_dir(
    path: &str,
    version: &str,
    replace: Option<&Replacement>,
    cache: &ModCache,
    project_root: &Path,
) -> Result<PathBuf, VendorError> {
    match replace {
        Some(Replacement {
            path: target,
            version: Some(v),
        }) => cache.locate(target, v),
        Some(Replacement {
            path: target,
            version: None,
        }) => cache::ensure_dir(project_root.join(target)),
        None => cache.locate(path, version),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn cache_with(mods: &[&str]) -> (tempfile::TempDir, ModCache) {
        let tmp = tempfile::tempdir().unwrap();
        for m in mods {
            fs::create_dir_all(tmp.path().join(m)).unwrap();
        }
        let cache = ModCache::new(tmp.path());
        (tmp, cache)
    }

    #[test]
    fn test_parse_line_kinds() {
        assert_eq!(parse_line(1, "").unwrap(), ManifestLine::Blank);
        assert_eq!(parse_line(1, "## explicit").unwrap(), ManifestLine::Annotation);
        assert_eq!(
            parse_line(1, "example.com/foo/bar").unwrap(),
            ManifestLine::Package("example.com/foo/bar")
        );
        assert_eq!(
            parse_line(1, "# example.com/foo =>").unwrap(),
            ManifestLine::Redirect {
                path: "example.com/foo"
            }
        );
        assert_eq!(
            parse_line(1, "# example.com/foo v1.0.0").unwrap(),
            ManifestLine::Module {
                path: "example.com/foo",
                version: "v1.0.0",
                replace: None
            }
        );
    }

    #[test]
    fn test_parse_line_replace_forms() {
        match parse_line(1, "# a.io/x v1.0.0 => b.io/y v2.0.0").unwrap() {
            ManifestLine::Module { replace, .. } => assert_eq!(
                replace,
                Some(Replacement {
                    path: "b.io/y".into(),
                    version: Some("v2.0.0".into())
                })
            ),
            other => panic!("unexpected {:?}", other),
        }

        match parse_line(1, "# a.io/x v1.0.0 => ../x").unwrap() {
            ManifestLine::Module { replace, .. } => assert!(replace.unwrap().is_local()),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_line_malformed() {
        assert!(matches!(
            parse_line(3, "# lonely"),
            Err(VendorError::MalformedLine { line_no: 3, .. })
        ));
        assert!(matches!(
            parse_line(1, "# a.io/x v1.0.0 =>"),
            Err(VendorError::MalformedLine { .. })
        ));
        assert!(matches!(
            parse_line(1, "# a.io/x v1.0.0 => b.io/y"),
            Err(VendorError::MalformedLine { .. })
        ));
    }

    #[test]
    fn test_parse_preserves_order_and_counts() {
        let (_tmp, cache) = cache_with(&["a.io/a@v1.0.0", "b.io/b@v1.0.0", "c.io/c@v1.0.0"]);
        let text = "\
# a.io/a v1.0.0
a.io/a
a.io/a/x
# b.io/b v1.0.0
## explicit
b.io/b/y
# c.io/c v1.0.0
c.io/c/1
c.io/c/2
c.io/c/3
";
        let mods = parse_manifest(text, &cache, Path::new(".")).unwrap();
        let names: Vec<_> = mods.iter().map(|m| m.import_path.as_str()).collect();
        assert_eq!(names, ["a.io/a", "b.io/b", "c.io/c"]);
        let sizes: Vec<_> = mods.iter().map(|m| m.packages.len()).collect();
        assert_eq!(sizes, [2, 1, 3]);
        assert_eq!(mods[2].packages, ["c.io/c/1", "c.io/c/2", "c.io/c/3"]);
    }

    #[test]
    fn test_redirect_line_drops_following_packages() {
        let (_tmp, cache) = cache_with(&["a.io/a@v1.0.0"]);
        let text = "\
# old.io/gone =>
old.io/gone/pkg
# a.io/a v1.0.0
a.io/a/sub
";
        let mods = parse_manifest(text, &cache, Path::new(".")).unwrap();
        assert_eq!(mods.len(), 1);
        assert_eq!(mods[0].import_path, "a.io/a");
        assert_eq!(mods[0].packages, ["a.io/a/sub"]);
    }

    #[test]
    fn test_package_before_module_is_error() {
        let (_tmp, cache) = cache_with(&[]);
        let err = parse_manifest("a.io/a/sub\n", &cache, Path::new(".")).unwrap_err();
        assert!(matches!(err, VendorError::OrphanPackage { line_no: 1, .. }));
    }

    #[test]
    fn test_replace_resolves_from_replacement() {
        let (tmp, cache) = cache_with(&["github.com/fork/!net@v0.2.0"]);
        let text = "# golang.org/x/net v0.1.0 => github.com/fork/Net v0.2.0\ngolang.org/x/net/http2\n";
        let mods = parse_manifest(text, &cache, Path::new(".")).unwrap();
        assert_eq!(
            mods[0].dir,
            tmp.path().join("github.com").join("fork").join("!net@v0.2.0")
        );
        assert_eq!(mods[0].import_path, "golang.org/x/net");
    }

    #[test]
    fn test_local_replace_resolves_from_project_root() {
        let (_tmp, cache) = cache_with(&[]);
        let project = tempfile::tempdir().unwrap();
        fs::create_dir_all(project.path().join("forks").join("x")).unwrap();
        let text = "# a.io/x v1.0.0 => ./forks/x\na.io/x/y\n";
        let mods = parse_manifest(text, &cache, project.path()).unwrap();
        assert_eq!(mods[0].dir, project.path().join("./forks/x"));
    }

    #[test]
    fn test_missing_module_dir_stops_at_first() {
        let (_tmp, cache) = cache_with(&[]);
        let text = "# a.io/a v1.0.0\n# b.io/b v1.0.0\n";
        match parse_manifest(text, &cache, Path::new(".")).unwrap_err() {
            VendorError::ModuleDirMissing { path } => assert!(path.ends_with("a@v1.0.0")),
            other => panic!("unexpected {:?}", other),
        }
    }
}

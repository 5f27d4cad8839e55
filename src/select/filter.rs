use crate::manifest::ModuleRecord;
use std::path::{Path, PathBuf};

/// Part of `pkg` below `module_path`, or `""` if `pkg` is not under it.
///
/// An empty suffix scopes to the whole module directory.
pub fn import_path_suffix<'a>(module_path: &str, pkg: &'a str) -> &'a str {
    pkg.strip_prefix(module_path).unwrap_or("")
}

/// Directories inside `module.dir` whose files are in scope: one per
/// imported package, plus one per `-include` prefix that names a package of
/// this module.
pub fn scope_dirs(module: &ModuleRecord, includes: &[String]) -> Vec<PathBuf> {
    let extra = includes
        .iter()
        .filter(|pkg| pkg.starts_with(module.import_path.as_str()));

    module
        .packages
        .iter()
        .chain(extra)
        .map(|pkg| {
            import_path_suffix(&module.import_path, pkg)
                .split('/')
                .filter(|seg| !seg.is_empty())
                .fold(module.dir.clone(), |dir, seg| dir.join(seg))
        })
        .collect()
}

/// The candidates whose path starts with one of the module's scope
/// directories, in candidate order.
pub fn select_in_scope(
    module: &ModuleRecord,
    candidates: &[PathBuf],
    includes: &[String],
) -> Vec<PathBuf> {
    if candidates.is_empty() {
        return Vec::new();
    }

    let scopes: Vec<String> = scope_dirs(module, includes)
        .iter()
        .map(|d| d.to_string_lossy().into_owned())
        .collect();
    if scopes.is_empty() {
        return Vec::new();
    }

    candidates
        .iter()
        .filter(|c| in_scope(c, &scopes))
        .cloned()
        .collect()
}

fn in_scope(candidate: &Path, scopes: &[String]) -> bool {
    let path = candidate.to_string_lossy();
    scopes.iter().any(|s| path.starts_with(s.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn foo_module(packages: &[&str]) -> ModuleRecord {
        ModuleRecord {
            import_path: "example.com/foo".into(),
            version: "v1.0.0".into(),
            replace: None,
            dir: PathBuf::from("/cache/example.com/foo@v1.0.0"),
            packages: packages.iter().map(|p| p.to_string()).collect(),
        }
    }

    fn candidates() -> Vec<PathBuf> {
        let dir = PathBuf::from("/cache/example.com/foo@v1.0.0");
        vec![dir.join("bar").join("x.h"), dir.join("baz").join("y.h")]
    }

    #[test]
    fn test_selects_only_imported_package() {
        let module = foo_module(&["example.com/foo/bar"]);
        let selected = select_in_scope(&module, &candidates(), &[]);
        assert_eq!(selected, vec![candidates()[0].clone()]);
    }

    #[test]
    fn test_include_prefix_adds_package() {
        let module = foo_module(&["example.com/foo/bar"]);
        let includes = vec!["example.com/foo/baz".to_string()];
        let selected = select_in_scope(&module, &candidates(), &includes);
        assert_eq!(selected, candidates());
    }

    #[test]
    fn test_include_for_other_module_ignored() {
        let module = foo_module(&[]);
        let includes = vec!["example.com/other/baz".to_string()];
        assert!(scope_dirs(&module, &includes).is_empty());
        assert!(select_in_scope(&module, &candidates(), &includes).is_empty());
    }

    #[test]
    fn test_no_packages_selects_nothing() {
        let module = foo_module(&[]);
        assert!(select_in_scope(&module, &candidates(), &[]).is_empty());
    }

    #[test]
    fn test_root_package_selects_everything() {
        let module = foo_module(&["example.com/foo"]);
        assert_eq!(select_in_scope(&module, &candidates(), &[]), candidates());
    }

    #[test]
    fn test_unrelated_package_matches_whole_module() {
        let module = foo_module(&["elsewhere.org/pkg"]);
        assert_eq!(
            scope_dirs(&module, &[]),
            vec![PathBuf::from("/cache/example.com/foo@v1.0.0")]
        );
        assert_eq!(select_in_scope(&module, &candidates(), &[]), candidates());
    }

    #[test]
    fn test_suffix() {
        assert_eq!(import_path_suffix("a.io/m", "a.io/m/x/y"), "/x/y");
        assert_eq!(import_path_suffix("a.io/m", "a.io/m"), "");
        assert_eq!(import_path_suffix("a.io/m", "b.io/m/x"), "");
    }
}

//! Copy selected module files into `./vendor/`.
//!
//! `go mod vendor` only keeps the Go sources of imported packages. This
//! module puts back the other files those packages need (cgo headers,
//! protobuf schemas, ...) by copying them from the module cache:
//!
//! ```text
//! $GOMODCACHE/example.com/foo@v1.0.0/bar/x.h -> vendor/example.com/foo/bar/x.h
//! ```
//!
//! The run order is fixed: preflight checks, pattern compilation, manifest
//! parsing, selection for every module, then copying. Anything that can be
//! rejected is rejected before the first byte is written.

use crate::cache::ModCache;
use crate::config::VendorOptions;
use crate::error::VendorError;
use crate::manifest::{self, ModuleRecord};
use crate::select::{PatternSet, collect_candidates, select_in_scope};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};

pub const MODULE_MARKER: &str = "go.mod";
pub const VENDOR_DIR: &str = "vendor";
pub const MANIFEST_FILE: &str = "modules.txt";

/// One file to copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedCopy {
    pub source: PathBuf,
    pub dest: PathBuf,
    /// `<module-import-path>/<relative-path>`, always with `/`.
    pub vendor_path: String,
}

/// Everything selected from one module.
#[derive(Debug, Clone)]
pub struct ModulePlan {
    pub module: ModuleRecord,
    pub files: Vec<PlannedCopy>,
}

/// What a run did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct VendorReport {
    /// `(import path, files vendored)` for every module that contributed files.
    pub modules: Vec<(String, usize)>,
    pub files: usize,
    pub dry_run: bool,
}

/// Check that `project_root` looks like a vendored Go module and return the
/// manifest path.
pub fn preflight(project_root: &Path) -> Result<PathBuf, VendorError> {
    let marker = project_root.join(MODULE_MARKER);
    if !marker.exists() {
        return Err(VendorError::MissingPrecondition { path: marker });
    }
    let manifest = project_root.join(VENDOR_DIR).join(MANIFEST_FILE);
    if !manifest.exists() {
        return Err(VendorError::MissingPrecondition { path: manifest });
    }
    Ok(manifest)
}

/// Map a selected cache file to its place under `vendor_root`.
pub fn plan_destination(
    module: &ModuleRecord,
    candidate: &Path,
    vendor_root: &Path,
) -> Result<PlannedCopy, VendorError> {
    let rel = candidate
        .strip_prefix(&module.dir)
        .map_err(|_| VendorError::ForeignCandidate {
            module: module.import_path.clone(),
            path: candidate.to_path_buf(),
        })?;

    let rel_segments: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();

    let module_dir = module
        .import_path
        .split('/')
        .fold(vendor_root.to_path_buf(), |dir, seg| dir.join(seg));

    Ok(PlannedCopy {
        source: candidate.to_path_buf(),
        dest: module_dir.join(rel),
        vendor_path: format!("{}/{}", module.import_path, rel_segments.join("/")),
    })
}

/// Copy a regular file byte for byte, replacing `dst` if it exists.
///
/// Cache files are read-only, so the destination is created fresh instead
/// of inheriting the source permissions; that keeps re-runs able to
/// overwrite it.
pub fn copy_file(src: &Path, dst: &Path) -> Result<u64, VendorError> {
    let meta = fs::symlink_metadata(src).map_err(|e| VendorError::io(src, e))?;
    if !meta.file_type().is_file() {
        return Err(VendorError::NotRegularFile {
            path: src.to_path_buf(),
        });
    }

    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent).map_err(|e| VendorError::io(parent, e))?;
    }

    let bytes = fs::read(src).map_err(|e| VendorError::io(src, e))?;
    fs::write(dst, &bytes).map_err(|e| VendorError::io(dst, e))?;
    Ok(bytes.len() as u64)
}

/// Collect and filter every module. Modules without selected files are
/// left out.
pub fn plan_modules(
    modules: Vec<ModuleRecord>,
    patterns: &PatternSet,
    includes: &[String],
    vendor_root: &Path,
) -> Result<Vec<ModulePlan>, VendorError> {
    let mut plans = Vec::new();

    for module in modules {
        let candidates = collect_candidates(patterns, &module)?;
        let selected = select_in_scope(&module, &candidates, includes);
        if selected.is_empty() {
            continue;
        }

        let files = selected
            .iter()
            .map(|c| plan_destination(&module, c, vendor_root))
            .collect::<Result<Vec<_>, _>>()?;
        plans.push(ModulePlan { module, files });
    }

    Ok(plans)
}

/// Run the whole pipeline for the project at `project_root`.
pub fn vendor_project(
    project_root: &Path,
    options: &VendorOptions,
    cache: &ModCache,
) -> Result<VendorReport, VendorError> {
    let manifest_path = preflight(project_root)?;
    let patterns = PatternSet::compile(&options.patterns)?;

    let text = fs::read_to_string(&manifest_path).map_err(|e| VendorError::io(&manifest_path, e))?;
    let modules = manifest::parse_manifest(&text, cache, project_root)?;

    let vendor_root = project_root.join(VENDOR_DIR);
    let plans = plan_modules(modules, &patterns, &options.includes, &vendor_root)?;

    let total: usize = plans.iter().map(|p| p.files.len()).sum();
    let mut report = VendorReport {
        dry_run: options.dry_run,
        ..Default::default()
    };

    let pb = if options.verbose || options.dry_run {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(total as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb
    };

    for plan in &plans {
        for file in &plan.files {
            if options.dry_run {
                println!("would vendor {}", file.vendor_path);
                continue;
            }
            if options.verbose {
                println!("vendoring {}", file.vendor_path);
            }
            pb.set_message(plan.module.import_path.clone());
            copy_file(&file.source, &file.dest)?;
            pb.inc(1);
        }
        report
            .modules
            .push((plan.module.import_path.clone(), plan.files.len()));
        report.files += plan.files.len();
    }
    pb.finish_and_clear();

    Ok(report)
}

/// Print the closing line (and the module table when verbose).
pub fn print_report(report: &VendorReport, verbose: bool) {
    if report.files == 0 {
        println!("{} No files matched; nothing to vendor.", "!".yellow());
        return;
    }

    if verbose {
        let mut table = crate::ui::Table::new(&["Module", "Files"]);
        for (module, count) in &report.modules {
            table.add_row(vec![module.clone(), count.to_string()]);
        }
        table.print();
    }

    let verb = if report.dry_run { "Would vendor" } else { "Vendored" };
    println!(
        "{} {} {} files from {} modules",
        "✓".green(),
        verb,
        report.files,
        report.modules.len()
    );
}

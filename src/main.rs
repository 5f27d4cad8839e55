//! # modvendor CLI Entry Point
//!
//! Parses flags with clap, merges them with `modvendor.toml` and runs the
//! vendoring pipeline from the current directory.
//!
//! Flags are accepted in Go style as well (`-copy="..."`), so existing
//! `go generate` lines and Makefiles keep working.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::{Shell, generate};
use std::path::PathBuf;

use modvendor::cache::ModCache;
use modvendor::config::{self, CliOverrides, VendorConfig};
use modvendor::vendor;

/// Long flags that may be spelled with a single dash.
const GO_STYLE_FLAGS: &[&str] = &["copy", "include", "modcache", "dry-run", "completions"];

#[derive(Parser, Debug)]
#[command(name = "modvendor")]
#[command(about = "Copy files pruned by `go mod vendor` from the module cache into ./vendor", version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
struct Cli {
    /// Copy files matching glob patterns to ./vendor/, e.g. -copy="**/*.c **/*.h **/*.proto"
    #[arg(long, value_name = "PATTERNS", default_value = "")]
    copy: String,
    /// Additional packages untracked in vendor/modules.txt, e.g. -include="github.com/tensorflow/tensorflow/tensorflow/c"
    #[arg(long, value_name = "PACKAGES", default_value = "")]
    include: String,
    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
    /// Show what would be copied without writing anything
    #[arg(long)]
    dry_run: bool,
    /// Module cache to read from (default: $GOMODCACHE or $GOPATH/pkg/mod)
    #[arg(long, value_name = "DIR")]
    modcache: Option<PathBuf>,
    /// Print a shell completion script and exit
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,
}

/// Rewrite `-copy=...` style arguments to `--copy=...`.
fn normalize_args<I>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    args.into_iter()
        .enumerate()
        .map(|(i, arg)| {
            if i == 0 || arg.starts_with("--") {
                return arg;
            }
            let Some(rest) = arg.strip_prefix('-') else {
                return arg;
            };
            let name = rest.split('=').next().unwrap_or(rest);
            if GO_STYLE_FLAGS.contains(&name) {
                format!("-{arg}")
            } else {
                arg
            }
        })
        .collect()
}

fn main() -> Result<()> {
    let cli = Cli::parse_from(normalize_args(std::env::args()));

    if let Some(shell) = cli.completions {
        let mut cmd = Cli::command();
        let bin_name = cmd.get_name().to_string();
        generate(shell, &mut cmd, bin_name, &mut std::io::stdout());
        return Ok(());
    }

    let project_root = std::env::current_dir().context("Could not read current directory")?;
    vendor::preflight(&project_root)?;
    let file_config = VendorConfig::load(&project_root)?;
    let options = file_config.merge(CliOverrides {
        copy: config::split_list(&cli.copy),
        include: config::split_list(&cli.include),
        verbose: cli.verbose,
        dry_run: cli.dry_run,
        modcache: cli.modcache,
    });

    let cache = ModCache::from_env(options.modcache.as_deref())
        .context("Could not find home directory to locate the Go module cache")?;

    let report = vendor::vendor_project(&project_root, &options, &cache)?;
    vendor::print_report(&report, options.verbose);
    Ok(())
}

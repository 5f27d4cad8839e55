//! Error taxonomy for a vendoring run.
//!
//! Every variant is fatal. The run stops at the first one and leaves any
//! files already copied in place; re-running after fixing the reported
//! condition overwrites them.

use std::path::PathBuf;

/// Error type for manifest, selection and copy operations
#[derive(Debug)]
pub enum VendorError {
    /// A file that must exist before any work starts (go.mod, modules.txt)
    MissingPrecondition { path: PathBuf },
    /// No copy patterns were given
    EmptyPatterns,
    /// The resolved module directory is not in the module cache
    ModuleDirMissing { path: PathBuf },
    /// A module line that does not follow `# <path> <version> [=> <path> <version>]`
    MalformedLine { line_no: usize, line: String },
    /// A package line with no module line before it
    OrphanPackage { line_no: usize, line: String },
    /// A copy pattern globset refused to compile
    InvalidPattern {
        pattern: String,
        source: globset::Error,
    },
    /// A selected file that does not live under its module's directory
    ForeignCandidate { module: String, path: PathBuf },
    /// A selected source that is a symlink, directory or device
    NotRegularFile { path: PathBuf },
    /// IO error
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// `modvendor.toml` could not be read or parsed
    Config { path: PathBuf, message: String },
}

impl VendorError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        VendorError::Io {
            path: path.into(),
            source,
        }
    }

    /// True for failures that may go away on a plain re-run (filesystem
    /// hiccups), false for input that has to be fixed first.
    pub fn is_retryable(&self) -> bool {
        matches!(self, VendorError::Io { .. })
    }
}

impl std::fmt::Display for VendorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VendorError::MissingPrecondition { path } => write!(
                f,
                "{} not found. Run `go mod vendor` and try again.",
                path.display()
            ),
            VendorError::EmptyPatterns => write!(f, "-copy argument is empty."),
            VendorError::ModuleDirMissing { path } => write!(
                f,
                "{} module path does not exist. Check $GOPATH/pkg/mod.",
                path.display()
            ),
            VendorError::MalformedLine { line_no, line } => {
                write!(f, "modules.txt:{}: malformed module line {:?}", line_no, line)
            }
            VendorError::OrphanPackage { line_no, line } => write!(
                f,
                "modules.txt:{}: package {:?} appears before any module line",
                line_no, line
            ),
            VendorError::InvalidPattern { pattern, source } => {
                write!(f, "glob match failure: {:?}: {}", pattern, source)
            }
            VendorError::ForeignCandidate { module, path } => write!(
                f,
                "vendor file {} doesn't belong to module {}",
                path.display(),
                module
            ),
            VendorError::NotRegularFile { path } => {
                write!(f, "{} is not a regular file", path.display())
            }
            VendorError::Io { path, source } => write!(f, "{}: {}", path.display(), source),
            VendorError::Config { path, message } => {
                write!(f, "invalid config {}: {}", path.display(), message)
            }
        }
    }
}

impl std::error::Error for VendorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            VendorError::InvalidPattern { source, .. } => Some(source),
            VendorError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_io_is_retryable() {
        let io = VendorError::io("a", std::io::Error::other("boom"));
        assert!(io.is_retryable());
        assert!(!VendorError::EmptyPatterns.is_retryable());
        assert!(
            !VendorError::ModuleDirMissing {
                path: PathBuf::from("x")
            }
            .is_retryable()
        );
    }

    #[test]
    fn test_messages_name_the_path() {
        let err = VendorError::ModuleDirMissing {
            path: PathBuf::from("/cache/example.com/foo@v1.0.0"),
        };
        assert!(err.to_string().contains("/cache/example.com/foo@v1.0.0"));

        let err = VendorError::NotRegularFile {
            path: PathBuf::from("/cache/link.h"),
        };
        assert_eq!(err.to_string(), "/cache/link.h is not a regular file");
    }
}

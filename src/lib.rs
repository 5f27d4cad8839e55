//! # modvendor - put back what `go mod vendor` prunes
//!
//! `go mod vendor` copies only the Go sources of the packages a build
//! imports. Anything else those packages need at build time (cgo headers,
//! C sources, `.proto` schemas) is dropped. `modvendor` reads
//! `vendor/modules.txt`, finds each module in the Go module cache and copies
//! the files matching the given patterns, limited to imported packages.
//!
//! ## Quick Start
//!
//! ```bash
//! go mod vendor
//! modvendor -copy="**/*.c **/*.h **/*.proto" -v
//! ```
//!
//! ## Module Organization
//!
//! - [`cache`] - Module cache location and import path encoding
//! - [`manifest`] - `vendor/modules.txt` parsing
//! - [`select`] - Pattern matching and package scoping
//! - [`vendor`] - Destination planning and copying

/// Module cache lookup and import path encoding.
pub mod cache;

/// Optional `modvendor.toml` and option merging.
pub mod config;

/// Error taxonomy.
pub mod error;

/// `vendor/modules.txt` parsing.
pub mod manifest;

/// Candidate collection and scope filtering.
pub mod select;

/// Terminal UI utilities (tables).
pub mod ui;

/// Vendoring pipeline.
pub mod vendor;

pub use error::VendorError;

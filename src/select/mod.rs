//! File selection for a module.
//!
//! Selection runs in two stages that never share mutable state:
//!
//! - [`collect`] walks the module directory and returns every file matching
//!   a copy pattern
//! - [`filter`] keeps the candidates that sit under a package the build
//!   imports (or one force-included with `-include`)

pub mod collect;
pub mod filter;

pub use collect::{PatternSet, collect_candidates};
pub use filter::{scope_dirs, select_in_scope};

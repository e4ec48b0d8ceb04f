//! Scaffolder Core - extension resolution and source mutation for frontend scaffolding
//!
//! This library decides which extensions a generated project may combine and then
//! wires them into the project's source files. It is used by the `create-frontend`
//! binary and can be driven directly by other front ends.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Source mutation** - Formatter, import editor and declaration-array patcher
//!   ([`source`])
//! - **Layer 2: Extension graph** - Catalog arena, selection checks, catalog sanity checks and
//!   the dependency hull ([`extensions`])
//! - **Layer 3: Recipes** - Per-extension edits applied in catalog order ([`recipes`])
//! - **Layer 4: CLI/TUI Interface** - Optional cliclack-based reporting (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based reporting module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use scaffolder_core::{extensions, recipes, source::StyleOverrides};
//!
//! let catalog = extensions::builtin::catalog()?;
//! let selection = catalog.resolve_names(&["React", "Sass"]).map_err(|e| anyhow::anyhow!(e.join("\n")))?;
//! extensions::check_selection(&catalog, &selection).into_result()?;
//! let report = recipes::apply_selection(&catalog, &selection, dir, &StyleOverrides::default()).await?;
//! ```

pub mod config;
pub mod error;
pub mod extensions;
pub mod recipes;
pub mod runtime;
pub mod source;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use error::{CatalogError, EditError, FormatError, SelectionError};
pub use extensions::{
    check_dependencies, check_exclusivities, check_selection, perform_integrity_checks,
    perform_sanity_checks, Catalog, ExtensionId, Validation,
};
pub use recipes::{apply_selection, ApplyReport};
pub use runtime::PackageManager;
pub use source::{FormatStyle, ImportDescriptor, StyleOverrides};

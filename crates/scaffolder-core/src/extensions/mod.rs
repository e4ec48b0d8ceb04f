//! Extension catalog, selection checks and catalog integrity
//!
//! Extensions live in an arena ([`Catalog`]) and refer to each other by
//! [`ExtensionId`]. Two kinds of checks run against it:
//!
//! - [`check_selection`] validates what a user picked and returns a [`Validation`]
//!   that the caller reports and re-prompts on
//! - [`perform_sanity_checks`] validates the catalog itself and fails hard

pub mod builtin;
pub mod check;
pub mod hull;
pub mod model;
pub mod sanity;

pub use check::{check_dependencies, check_exclusivities, check_selection, Validation};
pub use hull::{build_adjacency_matrix, reachable, transitive_hull, Matrix};
pub use model::{
    find_in_selection, Catalog, CatalogBuilder, CatalogManifest, Category, Extension,
    ExtensionDef, ExtensionId,
};
pub use sanity::{
    ensure_all_dependencies_and_exclusivities_are_defined, ensure_all_extensions_have_unique_names,
    ensure_all_indexes_are_correct, ensure_dependants_are_not_exclusive_to_each_other,
    get_deep_dependencies, perform_integrity_checks, perform_sanity_checks,
};

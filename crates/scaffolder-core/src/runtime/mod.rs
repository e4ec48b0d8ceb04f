//! Package manager detection
//!
//! Installing packages stays outside the core: this module only finds out which
//! package manager a project uses and renders the commands for it.

pub mod package_manager;

pub use package_manager::{detect_package_manager, probe, PackageManager, PackageManagerInfo};

//! Terminal reporting using cliclack (Charm-style inline output)
//!
//! This module is optional and only available when the `tui` feature is enabled.

#[cfg(feature = "tui")]
mod report;

#[cfg(feature = "tui")]
pub use report::{
    print_catalog, print_hull, print_next_steps, report_validation, run_apply, run_check,
    ApplyArgs,
};

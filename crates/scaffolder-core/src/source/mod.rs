//! Source-file mutation engine
//!
//! Every edit is a read-modify-write cycle on a whole file:
//! normalize to one line per statement, splice with structural regex matches,
//! re-normalize to the house style, write back.

pub mod array;
pub mod format;
pub mod import;

pub use array::{add_item_to_array, insert_array_item};
pub use format::{format_file, format_tree, normalize, FormatStyle, StyleOverrides, TrailingComma};
pub use import::{add_import, insert_import, remove_import, strip_import, ImportDescriptor};

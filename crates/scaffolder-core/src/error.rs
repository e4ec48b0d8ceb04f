//! Error types for formatting, source edits and the extension catalog

use std::path::PathBuf;

/// Failures of the formatting pass. Line numbers are 1-based and refer to the input text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("unterminated string literal on line {line}")]
    UnterminatedString { line: usize },

    #[error("unterminated template literal starting on line {line}")]
    UnterminatedTemplate { line: usize },

    #[error("unterminated block comment starting on line {line}")]
    UnterminatedComment { line: usize },

    #[error("unterminated regular expression on line {line}")]
    UnterminatedRegex { line: usize },

    #[error("unexpected '{found}' on line {line}")]
    UnbalancedBracket { found: char, line: usize },

    #[error("'{opener}' opened on line {line} is never closed")]
    UnclosedBracket { opener: char, line: usize },
}

/// Structural-match failures of the import editor and the declaration-array patcher.
#[derive(Debug, thiserror::Error)]
pub enum EditError {
    #[error("no leading import block found in {path}")]
    ImportBlockNotFound { path: PathBuf },

    #[error("array '{array}' not found in {path}")]
    ArrayNotFound { array: String, path: PathBuf },

    #[error("import of '{source_path}' has no named item to insert into an array")]
    NoNamedItem { source_path: String },

    #[error("namespace import of '{source_path}' cannot be combined with default or named imports")]
    NamespaceConflict { source_path: String },

    #[error("invalid structural pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("failed to format {path}: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: FormatError,
    },
}

/// Catalog-authoring bugs detected by the sanity checks. Always fatal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("extension name '{name}' is used more than once")]
    DuplicateName { name: String },

    #[error("extension '{extension}' has an undefined {relation} reference (#{reference})")]
    UndefinedReference {
        extension: String,
        relation: &'static str,
        reference: usize,
    },

    #[error("extension '{extension}' references unknown extension '{name}'")]
    UnknownName { extension: String, name: String },

    #[error("extension '{extension}' is cached at index {cached} but sits at position {actual}")]
    IndexMismatch {
        extension: String,
        cached: usize,
        actual: usize,
    },

    #[error("extension '{extension}' depends on '{dependency}' but is also exclusive to it")]
    ExclusiveDependency {
        extension: String,
        dependency: String,
    },

    #[error(
        "extension '{extension}' depends on '{first}' and '{second}', which are mutually exclusive"
    )]
    MutuallyExclusiveDependencies {
        extension: String,
        first: String,
        second: String,
    },
}

/// An invalid user selection. Recoverable: the messages are meant for direct display.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid extension selection:\n  - {}", .errors.join("\n  - "))]
pub struct SelectionError {
    pub errors: Vec<String>,
}

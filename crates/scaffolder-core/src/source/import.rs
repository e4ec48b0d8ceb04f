//! Import statement insertion and removal

use super::format::{normalize, StyleOverrides};
use crate::error::EditError;
use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;
use tokio::fs;

/// Greedy run of import lines and blank lines at the very start of a file
static LEADING_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[ \t]*import\b[^\n]*\n|[ \t]*\n)*").expect("valid leading block pattern")
});

static IMPORT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*import\b[^\n]*\n").expect("valid import line pattern")
});

/// A single import to add or remove
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportDescriptor {
    /// `import Default from '...'`
    #[serde(default)]
    pub default_import: Option<String>,

    /// `import { a, b } from '...'`
    #[serde(default)]
    pub named: Vec<String>,

    /// `import * as ns from '...'`
    #[serde(default)]
    pub namespace: Option<String>,

    /// Module specifier
    pub source: String,
}

impl ImportDescriptor {
    /// Side-effect-only import (`import './index.css'`)
    pub fn side_effect(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Default::default()
        }
    }

    pub fn default_import(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self::side_effect(source).with_default(name)
    }

    pub fn named<I, S>(items: I, source: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::side_effect(source).with_named(items)
    }

    pub fn namespace(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            namespace: Some(name.into()),
            ..Self::side_effect(source)
        }
    }

    pub fn with_default(mut self, name: impl Into<String>) -> Self {
        self.default_import = Some(name.into());
        self
    }

    pub fn with_named<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.named.extend(items.into_iter().map(Into::into));
        self
    }

    /// A namespace import cannot carry other bindings
    pub fn validate(&self) -> Result<(), EditError> {
        if self.namespace.is_some() && (self.default_import.is_some() || !self.named.is_empty()) {
            return Err(EditError::NamespaceConflict {
                source_path: self.source.clone(),
            });
        }
        Ok(())
    }

    /// Render the statement. Named items are sorted ascending.
    pub fn render(&self) -> String {
        let source = format!("'{}'", self.source);

        if let Some(namespace) = &self.namespace {
            return format!("import * as {} from {}", namespace, source);
        }

        let mut bindings = Vec::new();
        if let Some(default_import) = &self.default_import {
            bindings.push(default_import.clone());
        }
        if !self.named.is_empty() {
            let mut named = self.named.clone();
            named.sort();
            named.dedup();
            bindings.push(format!("{{ {} }}", named.join(", ")));
        }

        if bindings.is_empty() {
            format!("import {}", source)
        } else {
            format!("import {} from {}", bindings.join(", "), source)
        }
    }
}

pub(crate) fn format_error(path: &Path) -> impl FnOnce(crate::error::FormatError) -> EditError + '_ {
    move |source| EditError::Format {
        path: path.to_path_buf(),
        source,
    }
}

/// Insert `descriptor` after the last import of the leading import block of `content`.
///
/// Existing imports are kept verbatim and in order. Inserting an import whose statement
/// already exists in the block leaves the content unchanged apart from formatting.
pub fn insert_import(
    content: &str,
    path: &Path,
    descriptor: &ImportDescriptor,
    overrides: &StyleOverrides,
) -> Result<String, EditError> {
    descriptor.validate()?;

    let flat_overrides = overrides.single_line();
    let flat = normalize(content, path, &flat_overrides).map_err(format_error(path))?;

    let block_end = LEADING_BLOCK.find(&flat).map_or(0, |m| m.end());
    let block = &flat[..block_end];
    let last_import_end = IMPORT_LINE
        .find_iter(block)
        .last()
        .map(|m| m.end())
        .ok_or_else(|| EditError::ImportBlockNotFound {
            path: path.to_path_buf(),
        })?;

    let rendered = descriptor.render();
    let statement = normalize(&rendered, path, &flat_overrides).map_err(format_error(path))?;
    let statement = statement.trim_end();

    if block.lines().any(|line| line.trim() == statement) {
        tracing::debug!(path = %path.display(), import = statement, "import already present");
        return normalize(&flat, path, overrides).map_err(format_error(path));
    }

    tracing::debug!(
        path = %path.display(),
        import = statement,
        offset = last_import_end,
        "splicing import"
    );
    let spliced = format!(
        "{}{}\n{}",
        &flat[..last_import_end],
        statement,
        &flat[last_import_end..]
    );
    normalize(&spliced, path, overrides).map_err(format_error(path))
}

/// Remove every import whose module specifier equals `source`.
///
/// Matching is by specifier only: all bindings from that module go, not just the
/// ones a descriptor would name.
pub fn strip_import(
    content: &str,
    path: &Path,
    source: &str,
    overrides: &StyleOverrides,
) -> Result<String, EditError> {
    let flat = normalize(content, path, &overrides.single_line()).map_err(format_error(path))?;

    let pattern = format!(
        r#"(?m)^[ \t]*import\s+(?:[^'"\n]*?\s*from\s*)?['"]{}['"][ \t]*;?[ \t]*(?:\n|$)"#,
        regex::escape(source)
    );
    let re = Regex::new(&pattern)?;
    let remaining: Vec<&str> = re.split(&flat).collect();
    tracing::debug!(
        path = %path.display(),
        source,
        removed = remaining.len().saturating_sub(1),
        "stripping imports"
    );

    normalize(&remaining.concat(), path, overrides).map_err(format_error(path))
}

/// Add an import to the file at `path`
pub async fn add_import(
    path: &Path,
    descriptor: &ImportDescriptor,
    overrides: &StyleOverrides,
) -> Result<()> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let updated = insert_import(&content, path, descriptor, overrides)?;

    fs::write(path, &updated)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), source = %descriptor.source, "added import");
    Ok(())
}

/// Remove all imports of `descriptor.source` from the file at `path`
pub async fn remove_import(
    path: &Path,
    descriptor: &ImportDescriptor,
    overrides: &StyleOverrides,
) -> Result<()> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let updated = strip_import(&content, path, &descriptor.source, overrides)?;

    fs::write(path, &updated)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), source = %descriptor.source, "removed import");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn insert(content: &str, descriptor: &ImportDescriptor) -> Result<String, EditError> {
        insert_import(
            content,
            Path::new("src/index.js"),
            descriptor,
            &StyleOverrides::default(),
        )
    }

    #[test]
    fn test_render_side_effect_import() {
        assert_eq!(
            ImportDescriptor::side_effect("./index.css").render(),
            "import './index.css'"
        );
    }

    #[test]
    fn test_render_sorts_named_items() {
        let descriptor = ImportDescriptor::named(["b", "c", "a"], "./someFile");
        assert_eq!(descriptor.render(), "import { a, b, c } from './someFile'");
    }

    #[test]
    fn test_render_default_with_named_and_namespace() {
        let descriptor =
            ImportDescriptor::default_import("React", "react").with_named(["useState"]);
        assert_eq!(descriptor.render(), "import React, { useState } from 'react'");
        assert_eq!(
            ImportDescriptor::namespace("path", "path").render(),
            "import * as path from 'path'"
        );
    }

    #[test]
    fn test_namespace_cannot_carry_other_bindings() {
        let descriptor = ImportDescriptor::namespace("fs", "fs").with_named(["readFile"]);
        assert!(matches!(
            descriptor.validate(),
            Err(EditError::NamespaceConflict { .. })
        ));
    }

    #[test]
    fn test_inserts_after_leading_imports() {
        let content =
            "import React from 'react'\nimport { readFile } from 'fs/promises'\n\nconst root = 1\n";
        let out = insert(content, &ImportDescriptor::side_effect("./index.css")).unwrap();
        assert_eq!(
            out,
            "import React from 'react'\nimport { readFile } from 'fs/promises'\nimport './index.css'\n\nconst root = 1\n"
        );
    }

    #[test]
    fn test_inserts_after_multiline_imports() {
        let content = "import {\n  b,\n  a\n} from \"./letters\";\n\nrun();\n";
        let out = insert(content, &ImportDescriptor::named(["z", "y"], "./last")).unwrap();
        assert_eq!(
            out,
            "import { b, a } from './letters'\nimport { y, z } from './last'\n\nrun()\n"
        );
    }

    #[test]
    fn test_insert_keeps_type_literal_members_apart() {
        let content = "import React from 'react'\n\ntype Props = {\n  title: string\n  count: number\n}\n";
        let out = insert_import(
            content,
            Path::new("src/Card.tsx"),
            &ImportDescriptor::side_effect("./Card.css"),
            &StyleOverrides::default(),
        )
        .unwrap();
        assert_eq!(
            out,
            "import React from 'react'\nimport './Card.css'\n\ntype Props = {\n  title: string\n  count: number\n}\n"
        );
    }

    #[test]
    fn test_insert_keeps_case_block_statements() {
        let body = "function counter(state = 0, action) {\n  switch (action.type) {\n    case 'add': {\n      const next = state + 1\n      return next\n    }\n    default:\n      return state\n  }\n}\n";
        let content = format!("import {{ createStore }} from 'redux'\n\n{}", body);
        let out = insert(&content, &ImportDescriptor::default_import("logger", "redux-logger"))
            .unwrap();
        assert_eq!(
            out,
            format!(
                "import {{ createStore }} from 'redux'\nimport logger from 'redux-logger'\n\n{}",
                body
            )
        );
    }

    #[test]
    fn test_missing_import_block_is_structural_error() {
        let err = insert("const a = 1\n", &ImportDescriptor::side_effect("./a")).unwrap_err();
        assert!(matches!(err, EditError::ImportBlockNotFound { .. }));
    }

    #[test]
    fn test_insert_is_idempotent() {
        let content = "import React from 'react'\n\nrun()\n";
        let descriptor = ImportDescriptor::named(["Provider"], "react-redux");
        let once = insert(content, &descriptor).unwrap();
        let twice = insert(&once, &descriptor).unwrap();
        assert_eq!(once, twice);
        assert_eq!(once.matches("react-redux").count(), 1);
    }

    #[test]
    fn test_strip_removes_every_import_of_the_source() {
        let content = "import { a } from './x'\nimport b from \"./x\";\nimport c from './y'\nimport './x'\n\nrun(a, b, c)\n";
        let out = strip_import(
            content,
            Path::new("a.ts"),
            "./x",
            &StyleOverrides::default(),
        )
        .unwrap();
        assert_eq!(out, "import c from './y'\n\nrun(a, b, c)\n");
    }

    #[test]
    fn test_insert_then_strip_round_trip() {
        let content = "import React from 'react'\nimport App from './App'\n\nrender(App)\n";
        let descriptor = ImportDescriptor::named(["store"], "./store");
        let inserted = insert(content, &descriptor).unwrap();
        assert!(inserted.contains("import { store } from './store'"));

        let stripped = strip_import(
            &inserted,
            Path::new("src/index.js"),
            "./store",
            &StyleOverrides::default(),
        )
        .unwrap();
        assert_eq!(stripped, content);
    }

    #[test]
    fn test_insert_honours_style_overrides() {
        let overrides = StyleOverrides {
            single_quote: Some(false),
            semi: Some(true),
            ..Default::default()
        };
        let out = insert_import(
            "import a from 'a';\n\nrun();\n",
            Path::new("main.ts"),
            &ImportDescriptor::default_import("b", "b"),
            &overrides,
        )
        .unwrap();
        assert_eq!(out, "import a from \"a\";\nimport b from \"b\";\n\nrun();\n");
    }

    #[tokio::test]
    async fn test_add_and_remove_import_on_disk() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("index.js");
        std::fs::write(&path, "import React from 'react'\n\nrender()\n").unwrap();

        let descriptor = ImportDescriptor::side_effect("./index.css");
        add_import(&path, &descriptor, &StyleOverrides::default())
            .await
            .unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "import React from 'react'\nimport './index.css'\n\nrender()\n"
        );

        remove_import(&path, &descriptor, &StyleOverrides::default())
            .await
            .unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "import React from 'react'\n\nrender()\n"
        );
    }

    #[tokio::test]
    async fn test_failed_insert_leaves_file_untouched() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("main.js");
        std::fs::write(&path, "run();\n").unwrap();

        let result = add_import(
            &path,
            &ImportDescriptor::side_effect("./a"),
            &StyleOverrides::default(),
        )
        .await;

        assert!(result.is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "run();\n");
    }
}

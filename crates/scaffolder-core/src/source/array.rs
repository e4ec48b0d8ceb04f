//! Declaration-array patching
//!
//! Locates `<name>: [ ... ]` or `<name> = [ ... ]` and inserts an identifier in sorted
//! position, together with the import that brings it into scope. The array body is
//! read as a flat list of identifiers, so entries that are calls or member accesses
//! are not preserved as such.

use super::format::{normalize, StyleOverrides};
use super::import::{format_error, insert_import, ImportDescriptor};
use crate::error::EditError;
use anyhow::{Context, Result};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use tokio::fs;

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\W+").expect("valid separator pattern"));

/// Insert the named items of `descriptor` into `array` and their import into the import block.
pub fn insert_array_item(
    content: &str,
    path: &Path,
    array: &str,
    descriptor: &ImportDescriptor,
    overrides: &StyleOverrides,
) -> Result<String, EditError> {
    if descriptor.namespace.is_some() {
        return Err(EditError::NamespaceConflict {
            source_path: descriptor.source.clone(),
        });
    }
    if descriptor.named.is_empty() {
        return Err(EditError::NoNamedItem {
            source_path: descriptor.source.clone(),
        });
    }

    let with_import = insert_import(content, path, descriptor, overrides)?;

    let pattern = format!(r"\b{}\s*[:=]\s*\[(?P<body>[^\]]*)\]", regex::escape(array));
    let re = Regex::new(&pattern)?;
    let body = re
        .captures(&with_import)
        .and_then(|caps| caps.name("body"))
        .ok_or_else(|| EditError::ArrayNotFound {
            array: array.to_string(),
            path: path.to_path_buf(),
        })?;

    let mut items: Vec<String> = NON_WORD
        .split(body.as_str())
        .filter(|token| !token.is_empty())
        .map(String::from)
        .collect();
    for item in &descriptor.named {
        if !items.contains(item) {
            items.push(item.clone());
        }
    }
    items.sort();

    tracing::debug!(
        path = %path.display(),
        array,
        items = ?items,
        "patching declaration array"
    );

    let patched = format!(
        "{}{}{}",
        &with_import[..body.start()],
        items.join(", "),
        &with_import[body.end()..]
    );
    normalize(&patched, path, overrides).map_err(format_error(path))
}

/// Register the named items of `descriptor` in `array` of the file at `path`.
///
/// The file is written once, after both the import and the array have been patched.
pub async fn add_item_to_array(
    path: &Path,
    array: &str,
    descriptor: &ImportDescriptor,
    overrides: &StyleOverrides,
) -> Result<()> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let updated = insert_array_item(&content, path, array, descriptor, overrides)?;

    fs::write(path, &updated)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), array, "registered in array");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const APP_MODULE: &str = "import { NgModule } from '@angular/core';
import { BrowserModule } from '@angular/platform-browser';

import { AppComponent } from './app.component';

@NgModule({
  declarations: [
    AppComponent
  ],
  imports: [
    BrowserModule
  ],
  providers: [],
  bootstrap: [AppComponent]
})
export class AppModule { }
";

    fn patch(array: &str, descriptor: &ImportDescriptor) -> Result<String, EditError> {
        insert_array_item(
            APP_MODULE,
            Path::new("src/app/app.module.ts"),
            array,
            descriptor,
            &StyleOverrides::default(),
        )
    }

    #[test]
    fn test_registers_component_in_declarations() {
        let descriptor = ImportDescriptor::named(["MyComponent"], "./my/my.component");
        let out = patch("declarations", &descriptor).unwrap();

        assert_eq!(
            out,
            "import { NgModule } from '@angular/core'
import { BrowserModule } from '@angular/platform-browser'

import { AppComponent } from './app.component'
import { MyComponent } from './my/my.component'

@NgModule({ declarations: [AppComponent, MyComponent], imports: [BrowserModule], providers: [], bootstrap: [AppComponent] })
export class AppModule { }
"
        );
    }

    #[test]
    fn test_items_are_sorted() {
        let descriptor = ImportDescriptor::named(["AaaModule"], "aaa");
        let out = patch("imports", &descriptor).unwrap();
        assert!(out.contains("imports: [AaaModule, BrowserModule]"));
    }

    #[test]
    fn test_empty_array_receives_item() {
        let descriptor = ImportDescriptor::named(["ApiService"], "./api.service");
        let out = patch("providers", &descriptor).unwrap();
        assert!(out.contains("providers: [ApiService]"));
    }

    #[test]
    fn test_assignment_arrays_are_found() {
        let content = "import { a } from './a'\n\nexport const routes = [\n  home,\n  about,\n]\n";
        let out = insert_array_item(
            content,
            Path::new("routes.js"),
            "routes",
            &ImportDescriptor::named(["contact"], "./contact"),
            &StyleOverrides::default(),
        )
        .unwrap();
        assert_eq!(
            out,
            "import { a } from './a'\nimport { contact } from './contact'\n\nexport const routes = [about, contact, home]\n"
        );
    }

    #[test]
    fn test_patch_is_idempotent() {
        let descriptor = ImportDescriptor::named(["MyComponent"], "./my/my.component");
        let once = patch("declarations", &descriptor).unwrap();
        let twice = insert_array_item(
            &once,
            Path::new("src/app/app.module.ts"),
            "declarations",
            &descriptor,
            &StyleOverrides::default(),
        )
        .unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_missing_array_is_structural_error() {
        let descriptor = ImportDescriptor::named(["X"], "./x");
        assert!(matches!(
            patch("entryComponents", &descriptor),
            Err(EditError::ArrayNotFound { .. })
        ));
    }

    #[test]
    fn test_descriptor_needs_named_item() {
        assert!(matches!(
            patch("declarations", &ImportDescriptor::default_import("X", "./x")),
            Err(EditError::NoNamedItem { .. })
        ));
        assert!(matches!(
            patch("declarations", &ImportDescriptor::namespace("x", "./x")),
            Err(EditError::NamespaceConflict { .. })
        ));
    }

    #[tokio::test]
    async fn test_add_item_to_array_on_disk() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("app.module.ts");
        std::fs::write(&path, APP_MODULE).unwrap();

        add_item_to_array(
            &path,
            "imports",
            &ImportDescriptor::named(["StoreModule"], "@ngrx/store"),
            &StyleOverrides::default(),
        )
        .await
        .unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("import { StoreModule } from '@ngrx/store'\n\n@NgModule"));
        assert!(written.contains("imports: [BrowserModule, StoreModule]"));
    }

    #[tokio::test]
    async fn test_missing_array_leaves_file_untouched() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("app.module.ts");
        std::fs::write(&path, APP_MODULE).unwrap();

        let result = add_item_to_array(
            &path,
            "schemas",
            &ImportDescriptor::named(["X"], "./x"),
            &StyleOverrides::default(),
        )
        .await;

        assert!(result.is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), APP_MODULE);
    }
}

//! Single file edits a recipe is made of
//!
//! All paths are relative to the project directory. Every edit is a complete
//! read-modify-write of one file (two for a rename).

use crate::source::{
    add_import, add_item_to_array, normalize, remove_import, ImportDescriptor, StyleOverrides,
};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    AddImport {
        file: PathBuf,
        import: ImportDescriptor,
    },
    /// Removes every import of `source`
    RemoveImport {
        file: PathBuf,
        source: String,
    },
    AddToArray {
        file: PathBuf,
        array: String,
        import: ImportDescriptor,
    },
    RenameFile {
        from: PathBuf,
        to: PathBuf,
    },
    /// Creates or overwrites a file, normalizing script content
    WriteFile {
        file: PathBuf,
        content: String,
    },
    /// Replaces the first literal occurrence of `find`
    Replace {
        file: PathBuf,
        find: String,
        replace: String,
    },
}

impl Edit {
    pub fn add_import(file: impl Into<PathBuf>, import: ImportDescriptor) -> Self {
        Edit::AddImport {
            file: file.into(),
            import,
        }
    }

    pub fn remove_import(file: impl Into<PathBuf>, source: impl Into<String>) -> Self {
        Edit::RemoveImport {
            file: file.into(),
            source: source.into(),
        }
    }

    pub fn add_to_array(
        file: impl Into<PathBuf>,
        array: impl Into<String>,
        import: ImportDescriptor,
    ) -> Self {
        Edit::AddToArray {
            file: file.into(),
            array: array.into(),
            import,
        }
    }

    pub fn rename(from: impl Into<PathBuf>, to: impl Into<PathBuf>) -> Self {
        Edit::RenameFile {
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn write(file: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Edit::WriteFile {
            file: file.into(),
            content: content.into(),
        }
    }

    pub fn replace(
        file: impl Into<PathBuf>,
        find: impl Into<String>,
        replace: impl Into<String>,
    ) -> Self {
        Edit::Replace {
            file: file.into(),
            find: find.into(),
            replace: replace.into(),
        }
    }

    /// The file the edit leaves behind
    pub fn target(&self) -> &Path {
        match self {
            Edit::AddImport { file, .. }
            | Edit::RemoveImport { file, .. }
            | Edit::AddToArray { file, .. }
            | Edit::WriteFile { file, .. }
            | Edit::Replace { file, .. } => file,
            Edit::RenameFile { to, .. } => to,
        }
    }

    /// Apply the edit below `project_dir`
    pub async fn apply(&self, project_dir: &Path, overrides: &StyleOverrides) -> Result<()> {
        match self {
            Edit::AddImport { file, import } => {
                add_import(&project_dir.join(file), import, overrides).await
            }
            Edit::RemoveImport { file, source } => {
                let descriptor = ImportDescriptor::side_effect(source.as_str());
                remove_import(&project_dir.join(file), &descriptor, overrides).await
            }
            Edit::AddToArray {
                file,
                array,
                import,
            } => add_item_to_array(&project_dir.join(file), array, import, overrides).await,
            Edit::RenameFile { from, to } => rename(project_dir, from, to).await,
            Edit::WriteFile { file, content } => {
                write_file(&project_dir.join(file), content, overrides).await
            }
            Edit::Replace {
                file,
                find,
                replace,
            } => replace_first(&project_dir.join(file), find, replace, overrides).await,
        }
    }
}

async fn rename(project_dir: &Path, from: &Path, to: &Path) -> Result<()> {
    let source = project_dir.join(from);
    let target = project_dir.join(to);
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::rename(&source, &target).await.with_context(|| {
        format!(
            "Failed to rename {} to {}",
            source.display(),
            target.display()
        )
    })?;
    tracing::info!(from = %source.display(), to = %target.display(), "renamed");
    Ok(())
}

async fn write_file(path: &Path, content: &str, overrides: &StyleOverrides) -> Result<()> {
    let formatted = normalize(content, path, overrides)
        .with_context(|| format!("Failed to format {}", path.display()))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(path, &formatted)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), "wrote file");
    Ok(())
}

async fn replace_first(
    path: &Path,
    find: &str,
    replace: &str,
    overrides: &StyleOverrides,
) -> Result<()> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    if !content.contains(find) {
        anyhow::bail!("Could not find {:?} in {}", find, path.display());
    }
    let replaced = content.replacen(find, replace, 1);
    let formatted = normalize(&replaced, path, overrides)
        .with_context(|| format!("Failed to format {}", path.display()))?;

    fs::write(path, &formatted)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), "replaced text");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn project(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (path, content) in files {
            let path = dir.path().join(path);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, content).unwrap();
        }
        dir
    }

    fn read(dir: &TempDir, path: &str) -> String {
        std::fs::read_to_string(dir.path().join(path)).unwrap()
    }

    #[tokio::test]
    async fn test_rename_creates_parent() {
        let dir = project(&[("src/App.css", "body {}\n")]);
        Edit::rename("src/App.css", "src/styles/App.scss")
            .apply(dir.path(), &StyleOverrides::default())
            .await
            .unwrap();
        assert!(!dir.path().join("src/App.css").exists());
        assert_eq!(read(&dir, "src/styles/App.scss"), "body {}\n");
    }

    #[tokio::test]
    async fn test_rename_missing_file_fails() {
        let dir = project(&[]);
        let result = Edit::rename("src/App.css", "src/App.scss")
            .apply(dir.path(), &StyleOverrides::default())
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_write_normalizes_scripts() {
        let dir = project(&[]);
        Edit::write("src/store.js", "export const store = {\n  a: 1,\n};\n")
            .apply(dir.path(), &StyleOverrides::default())
            .await
            .unwrap();
        assert_eq!(read(&dir, "src/store.js"), "export const store = { a: 1 }\n");
    }

    #[tokio::test]
    async fn test_replace_first_occurrence_only() {
        let dir = project(&[("angular.json", "\"src/styles.css\"\n\"src/styles.css\"\n")]);
        let edit = Edit::replace("angular.json", "src/styles.css", "src/styles.scss");
        edit.apply(dir.path(), &StyleOverrides::default())
            .await
            .unwrap();
        assert_eq!(
            read(&dir, "angular.json"),
            "\"src/styles.scss\"\n\"src/styles.css\"\n"
        );

        edit.apply(dir.path(), &StyleOverrides::default())
            .await
            .unwrap();
        assert_eq!(
            read(&dir, "angular.json"),
            "\"src/styles.scss\"\n\"src/styles.scss\"\n"
        );
    }

    #[tokio::test]
    async fn test_replace_missing_text_fails() {
        let dir = project(&[("src/index.js", "import React from 'react'\n")]);
        let result = Edit::replace("src/index.js", "<App />", "<Root />")
            .apply(dir.path(), &StyleOverrides::default())
            .await;
        assert!(result.is_err());
        assert_eq!(read(&dir, "src/index.js"), "import React from 'react'\n");
    }

    #[tokio::test]
    async fn test_swap_stylesheet_import() {
        let dir = project(&[(
            "src/App.js",
            "import logo from './logo.svg'\nimport './App.css'\n\nexport default App\n",
        )]);
        let overrides = StyleOverrides::default();
        Edit::remove_import("src/App.js", "./App.css")
            .apply(dir.path(), &overrides)
            .await
            .unwrap();
        Edit::add_import("src/App.js", ImportDescriptor::side_effect("./App.scss"))
            .apply(dir.path(), &overrides)
            .await
            .unwrap();
        assert_eq!(
            read(&dir, "src/App.js"),
            "import logo from './logo.svg'\nimport './App.scss'\n\nexport default App\n"
        );
    }

    #[test]
    fn test_target_of_rename_is_destination() {
        assert_eq!(
            Edit::rename("a.css", "a.scss").target(),
            Path::new("a.scss")
        );
    }
}

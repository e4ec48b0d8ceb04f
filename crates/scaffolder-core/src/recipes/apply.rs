//! Applying the recipes of a validated selection to a generated project

use super::{recipe_for, RecipeContext};
use crate::extensions::{check_selection, Catalog, ExtensionId};
use crate::runtime::PackageManager;
use crate::source::StyleOverrides;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// What applying a selection did and what is left for the package manager
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Extension names, in the order they were applied
    pub applied: Vec<String>,
    /// Files written, relative to the project directory
    pub touched: Vec<PathBuf>,
    pub packages: Vec<String>,
    pub dev_packages: Vec<String>,
    /// Commands that produce the base project
    pub generators: Vec<String>,
}

impl ApplyReport {
    /// Install commands for the collected packages
    pub fn install_commands(&self, manager: PackageManager) -> Vec<String> {
        [
            manager.add_command(&self.packages, false),
            manager.add_command(&self.dev_packages, true),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

fn push_unique<T: PartialEq>(items: &mut Vec<T>, item: T) {
    if !items.contains(&item) {
        items.push(item);
    }
}

/// The selection in catalog order, without repeats
pub fn ordered_selection(selection: &[ExtensionId]) -> Vec<ExtensionId> {
    let mut ordered = selection.to_vec();
    ordered.sort();
    ordered.dedup();
    ordered
}

/// Validate `selection` and apply the recipe of each selected extension to the
/// project in `project_dir`.
///
/// Extensions are applied in catalog order and every edit finishes before the next
/// one starts. The first failing edit aborts the run.
pub async fn apply_selection(
    catalog: &Catalog,
    selection: &[ExtensionId],
    project_dir: &Path,
    overrides: &StyleOverrides,
) -> Result<ApplyReport> {
    check_selection(catalog, selection).into_result()?;

    let ordered = ordered_selection(selection);
    let context = RecipeContext::from_selection(catalog, &ordered);
    let mut report = ApplyReport::default();

    let recipes: Vec<_> = ordered
        .iter()
        .filter_map(|id| catalog.get(*id))
        .filter_map(|extension| {
            let recipe = recipe_for(&extension.name, &context, overrides);
            if recipe.is_none() {
                tracing::warn!(extension = %extension.name, "no recipe, skipping");
            }
            recipe.map(|recipe| (extension.name.as_str(), recipe))
        })
        .collect();

    for (_, recipe) in &recipes {
        if let Some(generator) = &recipe.generator {
            push_unique(&mut report.generators, generator.clone());
        }
    }

    if !project_dir.join("package.json").is_file() {
        let hint = match report.generators.first() {
            Some(generator) => format!("; generate the base project first with `{}`", generator),
            None => String::new(),
        };
        anyhow::bail!(
            "No package.json in {}{}",
            project_dir.display(),
            hint
        );
    }

    for (name, recipe) in recipes {
        for edit in &recipe.edits {
            edit.apply(project_dir, overrides)
                .await
                .with_context(|| format!("Failed to apply {}", name))?;
            push_unique(&mut report.touched, edit.target().to_path_buf());
        }
        for package in recipe.packages {
            push_unique(&mut report.packages, package);
        }
        for package in recipe.dev_packages {
            push_unique(&mut report.dev_packages, package);
        }

        tracing::info!(extension = name, edits = recipe.edits.len(), "applied extension");
        report.applied.push(name.to_string());
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SelectionError;
    use crate::extensions::builtin;

    #[test]
    fn test_ordered_selection_follows_catalog() {
        assert_eq!(
            ordered_selection(&[ExtensionId(6), ExtensionId(0), ExtensionId(6)]),
            vec![ExtensionId(0), ExtensionId(6)]
        );
    }

    #[test]
    fn test_install_commands() {
        let report = ApplyReport {
            dev_packages: vec!["sass".to_string()],
            ..ApplyReport::default()
        };
        assert_eq!(
            report.install_commands(PackageManager::Npm),
            vec!["npm install --save-dev sass".to_string()]
        );
    }

    #[tokio::test]
    async fn test_invalid_selection_touches_nothing() {
        let catalog = builtin::catalog().unwrap();
        let dir = tempfile::TempDir::new().unwrap();
        let selection = catalog.resolve_names(&["Redux"]).unwrap();

        let err = apply_selection(&catalog, &selection, dir.path(), &StyleOverrides::default())
            .await
            .unwrap_err();
        let selection_error = err.downcast_ref::<SelectionError>().unwrap();
        assert_eq!(
            selection_error.errors,
            vec!["Redux depends on React, which must also be selected".to_string()]
        );
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_missing_project_names_generator() {
        let catalog = builtin::catalog().unwrap();
        let dir = tempfile::TempDir::new().unwrap();
        let selection = catalog.resolve_names(&["React"]).unwrap();

        let err = apply_selection(&catalog, &selection, dir.path(), &StyleOverrides::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("npx create-react-app ."));
    }
}

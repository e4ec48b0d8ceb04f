//! Per-extension recipes: the packages an extension needs and the file edits that
//! wire it into a generated project

pub mod apply;
pub mod builtin;
pub mod edit;

pub use apply::{apply_selection, ApplyReport};
pub use builtin::recipe_for;
pub use edit::Edit;

use crate::extensions::{builtin as names, Catalog, ExtensionId};

/// Frontend framework the project was generated with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Framework {
    React,
    Angular,
}

/// What a recipe needs to know about the rest of the selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecipeContext {
    pub typescript: bool,
    pub framework: Option<Framework>,
}

impl RecipeContext {
    pub fn from_selection(catalog: &Catalog, selection: &[ExtensionId]) -> Self {
        let selected = |name: &str| {
            catalog
                .find(name)
                .is_some_and(|extension| selection.contains(&extension.id()))
        };

        let framework = if selected(names::REACT) {
            Some(Framework::React)
        } else if selected(names::ANGULAR) {
            Some(Framework::Angular)
        } else {
            None
        };

        Self {
            typescript: selected(names::TYPESCRIPT) || framework == Some(Framework::Angular),
            framework,
        }
    }

    /// Extension for script files, `jsx` selecting the React component flavor
    pub fn script_ext(&self, jsx: bool) -> &'static str {
        match (self.typescript, jsx) {
            (true, true) => "tsx",
            (true, false) => "ts",
            (false, _) => "js",
        }
    }
}

/// Everything one extension contributes to a project
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Recipe {
    /// Command producing the base project, for framework extensions
    pub generator: Option<String>,
    pub packages: Vec<String>,
    pub dev_packages: Vec<String>,
    /// Applied in order, each one completing before the next starts
    pub edits: Vec<Edit>,
}

impl Recipe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generator(mut self, command: impl Into<String>) -> Self {
        self.generator = Some(command.into());
        self
    }

    pub fn packages<I, S>(mut self, packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.packages.extend(packages.into_iter().map(Into::into));
        self
    }

    pub fn dev_packages<I, S>(mut self, packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dev_packages.extend(packages.into_iter().map(Into::into));
        self
    }

    pub fn edit(mut self, edit: Edit) -> Self {
        self.edits.push(edit);
        self
    }

    pub fn edits(mut self, edits: impl IntoIterator<Item = Edit>) -> Self {
        self.edits.extend(edits);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_from_selection() {
        let catalog = crate::extensions::builtin::catalog().unwrap();

        let react = catalog.resolve_names(&["React"]).unwrap();
        assert_eq!(
            RecipeContext::from_selection(&catalog, &react),
            RecipeContext {
                typescript: false,
                framework: Some(Framework::React),
            }
        );

        let angular = catalog.resolve_names(&["Angular", "TypeScript"]).unwrap();
        let context = RecipeContext::from_selection(&catalog, &angular);
        assert!(context.typescript);
        assert_eq!(context.framework, Some(Framework::Angular));
        assert_eq!(context.script_ext(true), "tsx");
        assert_eq!(context.script_ext(false), "ts");
    }
}

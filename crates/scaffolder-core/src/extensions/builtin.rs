//! The catalog shipped with the scaffolder

use super::model::{Catalog, CatalogBuilder, Category, ExtensionDef};
use crate::error::CatalogError;

pub const REACT: &str = "React";
pub const ANGULAR: &str = "Angular";
pub const TYPESCRIPT: &str = "TypeScript";
pub const SASS: &str = "Sass";
pub const LESS: &str = "Less";
pub const STYLUS: &str = "Stylus";
pub const REDUX: &str = "Redux";
pub const MOBX: &str = "MobX";
pub const NGRX: &str = "NgRx";
pub const ESLINT: &str = "ESLint";
pub const PRETTIER: &str = "Prettier";
pub const ESLINT_PRETTIER: &str = "ESLint Prettier";

/// Definitions in catalog order. Recipes are applied in this order.
pub fn definitions() -> Vec<ExtensionDef> {
    vec![
        ExtensionDef::new(REACT, Category::Frontend).exclusive_to(ANGULAR),
        ExtensionDef::new(ANGULAR, Category::Frontend)
            .depends_on(TYPESCRIPT)
            .exclusive_to(REACT),
        ExtensionDef::new(TYPESCRIPT, Category::Language),
        ExtensionDef::new(SASS, Category::CssPreprocessor),
        ExtensionDef::new(LESS, Category::CssPreprocessor),
        ExtensionDef::new(STYLUS, Category::CssPreprocessor),
        ExtensionDef::new(REDUX, Category::Library)
            .depends_on(REACT)
            .exclusive_to(MOBX),
        ExtensionDef::new(MOBX, Category::Library)
            .depends_on(REACT)
            .exclusive_to(REDUX),
        ExtensionDef::new(NGRX, Category::Library).depends_on(ANGULAR),
        ExtensionDef::new(ESLINT, Category::Linter),
        ExtensionDef::new(PRETTIER, Category::Linter),
        ExtensionDef::new(ESLINT_PRETTIER, Category::Linter)
            .depends_on(ESLINT)
            .depends_on(PRETTIER),
    ]
}

/// Build the built-in catalog and run the sanity checks on it
pub fn catalog() -> Result<Catalog, CatalogError> {
    let catalog = definitions()
        .into_iter()
        .fold(CatalogBuilder::new(), CatalogBuilder::extension)
        .exclusive_group(&[SASS, LESS, STYLUS])
        .build()?;
    super::sanity::perform_sanity_checks(&catalog)?;
    Ok(catalog)
}

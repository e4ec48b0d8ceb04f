//! Integrity checks on a complete catalog
//!
//! These run once at startup against the static catalog, never against a user
//! selection. A failure means the catalog was authored wrong and is always fatal.

use super::model::{Catalog, ExtensionId};
use crate::error::CatalogError;
use std::collections::HashSet;

/// No two extensions may share a name, ignoring case
pub fn ensure_all_extensions_have_unique_names(catalog: &Catalog) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();
    for extension in catalog.iter() {
        if !seen.insert(extension.name.to_lowercase()) {
            return Err(CatalogError::DuplicateName {
                name: extension.name.clone(),
            });
        }
    }
    Ok(())
}

/// Every extension reachable from `id` through one or more dependency edges, depth first.
///
/// Not de-duplicated: an extension reachable along two paths appears twice. `id` itself
/// only appears when it depends on itself.
pub fn get_deep_dependencies(catalog: &Catalog, id: ExtensionId) -> Vec<ExtensionId> {
    let mut deep = Vec::new();
    let mut path = Vec::new();
    collect_dependencies(catalog, id, &mut path, &mut deep);
    deep
}

fn collect_dependencies(
    catalog: &Catalog,
    id: ExtensionId,
    path: &mut Vec<ExtensionId>,
    deep: &mut Vec<ExtensionId>,
) {
    let Some(extension) = catalog.get(id) else {
        return;
    };

    path.push(id);
    for dependency in &extension.depends_on {
        deep.push(*dependency);
        // A dependency already on the current path closes a cycle
        if !path.contains(dependency) {
            collect_dependencies(catalog, *dependency, path, deep);
        }
    }
    path.pop();
}

/// No extension may (transitively) depend on something it is exclusive to, and no two of
/// its (transitive) dependencies may be exclusive to each other.
pub fn ensure_dependants_are_not_exclusive_to_each_other(
    catalog: &Catalog,
) -> Result<(), CatalogError> {
    for extension in catalog.iter() {
        let deep = get_deep_dependencies(catalog, extension.id());

        if let Some(dependency) = extension
            .exclusive_to
            .iter()
            .find(|excluded| deep.contains(excluded))
        {
            return Err(CatalogError::ExclusiveDependency {
                extension: extension.name.clone(),
                dependency: catalog.name_of(*dependency),
            });
        }

        for first in &deep {
            let Some(first_extension) = catalog.get(*first) else {
                continue;
            };
            for second in &deep {
                if first != second && first_extension.exclusive_to.contains(second) {
                    return Err(CatalogError::MutuallyExclusiveDependencies {
                        extension: extension.name.clone(),
                        first: first_extension.name.clone(),
                        second: catalog.name_of(*second),
                    });
                }
            }
        }
    }
    Ok(())
}

/// Every dependency and exclusivity reference must point into the catalog
pub fn ensure_all_dependencies_and_exclusivities_are_defined(
    catalog: &Catalog,
) -> Result<(), CatalogError> {
    for extension in catalog.iter() {
        let references = extension
            .depends_on
            .iter()
            .map(|id| ("dependency", id))
            .chain(extension.exclusive_to.iter().map(|id| ("exclusivity", id)));

        for (relation, id) in references {
            if catalog.get(*id).is_none() {
                return Err(CatalogError::UndefinedReference {
                    extension: extension.name.clone(),
                    relation,
                    reference: id.index(),
                });
            }
        }
    }
    Ok(())
}

/// The cached index of every extension must equal its position
pub fn ensure_all_indexes_are_correct(catalog: &Catalog) -> Result<(), CatalogError> {
    for (position, extension) in catalog.iter().enumerate() {
        if extension.index != position {
            return Err(CatalogError::IndexMismatch {
                extension: extension.name.clone(),
                cached: extension.index,
                actual: position,
            });
        }
    }
    Ok(())
}

/// Name uniqueness, then dependency/exclusivity consistency
pub fn perform_sanity_checks(catalog: &Catalog) -> Result<(), CatalogError> {
    ensure_all_extensions_have_unique_names(catalog)?;
    ensure_dependants_are_not_exclusive_to_each_other(catalog)?;
    Ok(())
}

/// Reference and index checks followed by [`perform_sanity_checks`], for catalogs
/// that did not come out of the builder
pub fn perform_integrity_checks(catalog: &Catalog) -> Result<(), CatalogError> {
    ensure_all_dependencies_and_exclusivities_are_defined(catalog)?;
    ensure_all_indexes_are_correct(catalog)?;
    perform_sanity_checks(catalog)
}

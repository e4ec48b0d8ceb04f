//! Extension catalog: an arena of extensions linked by dependency and exclusivity edges

use crate::error::CatalogError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Position of an extension in its catalog. Identity of a node is identity of its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExtensionId(pub usize);

impl ExtensionId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Kind of capability an extension adds
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Frontend,
    CssPreprocessor,
    Language,
    Library,
    Linter,
    TestOnly,
}

impl Category {
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Frontend => "Frontend framework",
            Category::CssPreprocessor => "CSS preprocessor",
            Category::Language => "Language flavor",
            Category::Library => "Library",
            Category::Linter => "Linter / formatter",
            Category::TestOnly => "Test only",
        }
    }

    pub const ALL: [Category; 6] = [
        Category::Frontend,
        Category::Language,
        Category::CssPreprocessor,
        Category::Library,
        Category::Linter,
        Category::TestOnly,
    ];
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A catalog entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extension {
    /// Cached position in the catalog, used for O(1) lookups
    pub index: usize,
    pub name: String,
    pub category: Category,
    pub depends_on: Vec<ExtensionId>,
    pub exclusive_to: Vec<ExtensionId>,
}

impl Extension {
    pub fn id(&self) -> ExtensionId {
        ExtensionId(self.index)
    }
}

/// Immutable set of extensions, built once at startup
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    extensions: Vec<Extension>,
    by_name: HashMap<String, ExtensionId>,
}

impl Catalog {
    /// Wrap raw records as-is. Nothing is validated; run the integrity checks on the result.
    pub fn from_extensions(extensions: Vec<Extension>) -> Self {
        let mut by_name = HashMap::new();
        for (position, extension) in extensions.iter().enumerate() {
            by_name
                .entry(extension.name.to_lowercase())
                .or_insert(ExtensionId(position));
        }
        Self {
            extensions,
            by_name,
        }
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Extension> {
        self.extensions.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = ExtensionId> {
        (0..self.extensions.len()).map(ExtensionId)
    }

    pub fn extensions(&self) -> &[Extension] {
        &self.extensions
    }

    pub fn get(&self, id: ExtensionId) -> Option<&Extension> {
        self.extensions.get(id.0)
    }

    /// Name of an extension, or a placeholder for an id outside the catalog
    pub fn name_of(&self, id: ExtensionId) -> String {
        self.get(id)
            .map(|extension| extension.name.clone())
            .unwrap_or_else(|| format!("#{}", id.0))
    }

    /// Case-insensitive lookup by name
    pub fn find(&self, name: &str) -> Option<&Extension> {
        self.by_name
            .get(&name.to_lowercase())
            .and_then(|id| self.get(*id))
    }

    /// Two-tier lookup: the cached index first, the name map when the entry there differs
    pub fn lookup(&self, name: &str, cached_index: usize) -> Option<&Extension> {
        if let Some(extension) = self.extensions.get(cached_index) {
            if extension.name.eq_ignore_ascii_case(name) {
                return Some(extension);
            }
        }
        tracing::warn!(name, cached_index, "cached catalog index missed, using name map");
        self.find(name)
    }

    /// Map user-typed names to ids, collecting every name that is unknown
    pub fn resolve_names<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<ExtensionId>, Vec<String>> {
        let mut ids = Vec::new();
        let mut unknown = Vec::new();
        for name in names {
            let name = name.as_ref().trim();
            match self.find(name) {
                Some(extension) => {
                    if !ids.contains(&extension.id()) {
                        ids.push(extension.id());
                    }
                }
                None => unknown.push(format!("Unknown extension: {}", name)),
            }
        }
        if unknown.is_empty() {
            Ok(ids)
        } else {
            Err(unknown)
        }
    }

    /// Ids of the given category, in catalog order
    pub fn by_category(&self, category: Category) -> Vec<ExtensionId> {
        self.iter()
            .filter(|extension| extension.category == category)
            .map(Extension::id)
            .collect()
    }
}

/// Find `name` in a selection, trying `selection[cached_index]` before scanning.
///
/// Tolerates selections whose order does not follow the catalog at the cost of a
/// linear scan.
pub fn find_in_selection(
    catalog: &Catalog,
    selection: &[ExtensionId],
    name: &str,
    cached_index: usize,
) -> Option<ExtensionId> {
    let matches = |id: &ExtensionId| {
        catalog
            .get(*id)
            .is_some_and(|extension| extension.name.eq_ignore_ascii_case(name))
    };

    if let Some(id) = selection.get(cached_index).filter(|id| matches(*id)) {
        return Some(*id);
    }
    selection.iter().find(|id| matches(*id)).copied()
}

/// Definition of an extension before linking, referring to others by name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionDef {
    pub name: String,
    pub category: Category,
    #[serde(default)]
    pub depends_on: Vec<String>,
    #[serde(default)]
    pub exclusive_to: Vec<String>,
}

impl ExtensionDef {
    pub fn new(name: impl Into<String>, category: Category) -> Self {
        Self {
            name: name.into(),
            category,
            depends_on: Vec::new(),
            exclusive_to: Vec::new(),
        }
    }

    pub fn depends_on(mut self, name: impl Into<String>) -> Self {
        self.depends_on.push(name.into());
        self
    }

    pub fn exclusive_to(mut self, name: impl Into<String>) -> Self {
        self.exclusive_to.push(name.into());
        self
    }
}

/// Catalog manifest as authored in YAML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogManifest {
    pub extensions: Vec<ExtensionDef>,

    /// Groups of extensions that are pairwise exclusive to each other
    #[serde(default)]
    pub exclusive_groups: Vec<Vec<String>>,
}

impl CatalogManifest {
    pub fn build(&self) -> Result<Catalog, CatalogError> {
        let mut builder = CatalogBuilder::new();
        for def in &self.extensions {
            builder = builder.extension(def.clone());
        }
        for group in &self.exclusive_groups {
            builder = builder.exclusive_group(group);
        }
        builder.build()
    }
}

/// Links definitions by name into an immutable [`Catalog`]
#[derive(Debug, Clone, Default)]
pub struct CatalogBuilder {
    defs: Vec<ExtensionDef>,
    groups: Vec<Vec<String>>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extension(mut self, def: ExtensionDef) -> Self {
        self.defs.push(def);
        self
    }

    /// Make every member of `names` exclusive to every other member
    pub fn exclusive_group<S: AsRef<str>>(mut self, names: &[S]) -> Self {
        self.groups
            .push(names.iter().map(|name| name.as_ref().to_string()).collect());
        self
    }

    pub fn build(self) -> Result<Catalog, CatalogError> {
        let positions: HashMap<String, usize> = self
            .defs
            .iter()
            .enumerate()
            .rev()
            .map(|(position, def)| (def.name.to_lowercase(), position))
            .collect();

        let resolve = |owner: &str, name: &str| {
            positions
                .get(&name.to_lowercase())
                .map(|position| ExtensionId(*position))
                .ok_or_else(|| CatalogError::UnknownName {
                    extension: owner.to_string(),
                    name: name.to_string(),
                })
        };

        let mut extensions = Vec::with_capacity(self.defs.len());
        for (position, def) in self.defs.iter().enumerate() {
            let depends_on = def
                .depends_on
                .iter()
                .map(|name| resolve(&def.name, name))
                .collect::<Result<Vec<_>, _>>()?;
            let exclusive_to = def
                .exclusive_to
                .iter()
                .map(|name| resolve(&def.name, name))
                .collect::<Result<Vec<_>, _>>()?;

            extensions.push(Extension {
                index: position,
                name: def.name.clone(),
                category: def.category,
                depends_on,
                exclusive_to,
            });
        }

        for group in &self.groups {
            let members = group
                .iter()
                .map(|name| resolve(name, name))
                .collect::<Result<Vec<_>, _>>()?;
            for member in &members {
                let extension = &mut extensions[member.0];
                for other in &members {
                    if other != member && !extension.exclusive_to.contains(other) {
                        extension.exclusive_to.push(*other);
                    }
                }
            }
        }

        Ok(Catalog::from_extensions(extensions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Catalog {
        CatalogBuilder::new()
            .extension(ExtensionDef::new("A", Category::TestOnly))
            .extension(ExtensionDef::new("B", Category::TestOnly).depends_on("A"))
            .extension(ExtensionDef::new("C", Category::TestOnly))
            .extension(ExtensionDef::new("D", Category::TestOnly))
            .exclusive_group(&["A", "C", "D"])
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_links_by_name() {
        let catalog = sample();
        let b = catalog.find("b").unwrap();
        assert_eq!(b.index, 1);
        assert_eq!(b.depends_on, vec![ExtensionId(0)]);
    }

    #[test]
    fn test_exclusive_group_is_pairwise() {
        let catalog = sample();
        assert_eq!(
            catalog.find("A").unwrap().exclusive_to,
            vec![ExtensionId(2), ExtensionId(3)]
        );
        assert_eq!(
            catalog.find("D").unwrap().exclusive_to,
            vec![ExtensionId(0), ExtensionId(2)]
        );
        assert!(catalog.find("B").unwrap().exclusive_to.is_empty());
    }

    #[test]
    fn test_builder_rejects_unknown_names() {
        let result = CatalogBuilder::new()
            .extension(ExtensionDef::new("A", Category::TestOnly).depends_on("Missing"))
            .build();
        assert_eq!(
            result.unwrap_err(),
            CatalogError::UnknownName {
                extension: "A".to_string(),
                name: "Missing".to_string(),
            }
        );
    }

    #[test]
    fn test_lookup_uses_cached_index_then_name() {
        let catalog = sample();
        assert_eq!(catalog.lookup("C", 2).unwrap().index, 2);
        assert_eq!(catalog.lookup("C", 0).unwrap().index, 2);
        assert_eq!(catalog.lookup("c", 99).unwrap().index, 2);
        assert!(catalog.lookup("Z", 0).is_none());
    }

    #[test]
    fn test_find_in_selection_falls_back_to_scan() {
        let catalog = sample();
        let selection = vec![ExtensionId(3), ExtensionId(1)];
        assert_eq!(
            find_in_selection(&catalog, &selection, "B", 1),
            Some(ExtensionId(1))
        );
        assert_eq!(
            find_in_selection(&catalog, &selection, "D", 3),
            Some(ExtensionId(3))
        );
        assert_eq!(find_in_selection(&catalog, &selection, "A", 0), None);
    }

    #[test]
    fn test_resolve_names_reports_unknown() {
        let catalog = sample();
        assert_eq!(
            catalog.resolve_names(&["a", " B ", "A"]),
            Ok(vec![ExtensionId(0), ExtensionId(1)])
        );
        assert_eq!(
            catalog.resolve_names(&["A", "nope"]),
            Err(vec!["Unknown extension: nope".to_string()])
        );
    }

    #[test]
    fn test_manifest_from_yaml() {
        let yaml = r#"
extensions:
  - name: React
    category: frontend
  - name: Redux
    category: library
    depends_on: [React]
  - name: Sass
    category: css-preprocessor
  - name: Less
    category: css-preprocessor
exclusive_groups:
  - [Sass, Less]
"#;
        let manifest: CatalogManifest = serde_yaml::from_str(yaml).unwrap();
        let catalog = manifest.build().unwrap();
        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.find("redux").unwrap().depends_on, vec![ExtensionId(0)]);
        assert_eq!(catalog.find("less").unwrap().exclusive_to, vec![ExtensionId(2)]);
        assert_eq!(catalog.by_category(Category::CssPreprocessor).len(), 2);
    }
}

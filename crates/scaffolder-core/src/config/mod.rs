//! Style and catalog configuration
//!
//! Formatting follows the house style unless a YAML file of prettier-style
//! overrides is supplied, either explicitly or through [`STYLE_ENV`]. Catalogs
//! other than the built-in one are read from YAML manifests.

use crate::extensions::{builtin, perform_integrity_checks, Catalog, CatalogManifest};
use crate::source::StyleOverrides;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Environment variable naming a style override file
pub const STYLE_ENV: &str = "CREATE_FRONTEND_STYLE";

/// Pick the override file: an explicit path wins over the environment value.
///
/// Empty values count as unset.
pub fn style_path(explicit: Option<&Path>, env_value: Option<&str>) -> Option<PathBuf> {
    explicit
        .filter(|path| !path.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .or_else(|| {
            env_value
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(PathBuf::from)
        })
}

/// Parse a YAML override file
pub async fn read_style_overrides(path: &Path) -> Result<StyleOverrides> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read style file {}", path.display()))?;
    parse_style_overrides(&content)
        .with_context(|| format!("Failed to parse style file {}", path.display()))
}

pub fn parse_style_overrides(content: &str) -> Result<StyleOverrides> {
    // An empty document means no overrides
    if content.trim().is_empty() {
        return Ok(StyleOverrides::default());
    }
    Ok(serde_yaml::from_str(content)?)
}

/// Load overrides from `explicit`, else from [`STYLE_ENV`], else defaults
pub async fn load_style_overrides(explicit: Option<&Path>) -> Result<StyleOverrides> {
    let env_value = std::env::var(STYLE_ENV).ok();
    match style_path(explicit, env_value.as_deref()) {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading style overrides");
            read_style_overrides(&path).await
        }
        None => Ok(StyleOverrides::default()),
    }
}

/// Read and link a catalog manifest, then check its integrity
pub async fn load_catalog_manifest(path: &Path) -> Result<Catalog> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read catalog manifest {}", path.display()))?;
    let manifest: CatalogManifest = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse catalog manifest {}", path.display()))?;

    let catalog = manifest
        .build()
        .with_context(|| format!("Invalid catalog manifest {}", path.display()))?;
    perform_integrity_checks(&catalog)
        .with_context(|| format!("Invalid catalog manifest {}", path.display()))?;
    tracing::debug!(path = %path.display(), extensions = catalog.len(), "loaded catalog manifest");
    Ok(catalog)
}

/// The manifest at `path`, or the built-in catalog
pub async fn load_catalog(path: Option<&Path>) -> Result<Catalog> {
    match path {
        Some(path) => load_catalog_manifest(path).await,
        None => Ok(builtin::catalog()?),
    }
}

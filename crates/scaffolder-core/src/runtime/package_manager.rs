//! npm / yarn / pnpm detection

use std::fmt;
use std::path::Path;
use std::process::Command;

/// Supported package managers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PackageManager {
    #[default]
    Npm,
    Yarn,
    Pnpm,
}

impl PackageManager {
    /// Probe order when no lockfile decides
    pub const ALL: [PackageManager; 3] = [PackageManager::Npm, PackageManager::Yarn, PackageManager::Pnpm];

    pub fn binary(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Yarn => "yarn",
            PackageManager::Pnpm => "pnpm",
        }
    }

    pub fn lockfile(&self) -> &'static str {
        match self {
            PackageManager::Npm => "package-lock.json",
            PackageManager::Yarn => "yarn.lock",
            PackageManager::Pnpm => "pnpm-lock.yaml",
        }
    }

    /// Command adding `packages` as runtime (or, with `dev`, development) dependencies
    pub fn add_command(&self, packages: &[String], dev: bool) -> Option<String> {
        if packages.is_empty() {
            return None;
        }
        let verb = match (self, dev) {
            (PackageManager::Npm, false) => "npm install",
            (PackageManager::Npm, true) => "npm install --save-dev",
            (PackageManager::Yarn, false) => "yarn add",
            (PackageManager::Yarn, true) => "yarn add --dev",
            (PackageManager::Pnpm, false) => "pnpm add",
            (PackageManager::Pnpm, true) => "pnpm add --save-dev",
        };
        Some(format!("{} {}", verb, packages.join(" ")))
    }

    /// Command running a package.json script
    pub fn run_command(&self, script: &str) -> String {
        match self {
            PackageManager::Npm => format!("npm run {}", script),
            PackageManager::Yarn => format!("yarn {}", script),
            PackageManager::Pnpm => format!("pnpm {}", script),
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.binary())
    }
}

/// Probe result for one package manager
#[derive(Debug, Clone)]
pub struct PackageManagerInfo {
    pub manager: PackageManager,
    pub version: Option<String>,
    pub available: bool,
}

/// Run `<binary> --version`
pub fn probe(manager: PackageManager) -> PackageManagerInfo {
    let output = Command::new(manager.binary()).arg("--version").output();

    match output {
        Ok(out) if out.status.success() => PackageManagerInfo {
            manager,
            version: Some(String::from_utf8_lossy(&out.stdout).trim().to_string()),
            available: true,
        },
        _ => PackageManagerInfo {
            manager,
            version: None,
            available: false,
        },
    }
}

/// Manager whose lockfile is present in `project_dir`
pub fn from_lockfile(project_dir: &Path) -> Option<PackageManager> {
    // pnpm and yarn projects sometimes carry a stray package-lock.json
    [PackageManager::Pnpm, PackageManager::Yarn, PackageManager::Npm]
        .into_iter()
        .find(|manager| project_dir.join(manager.lockfile()).is_file())
}

/// Lockfile first, then the first manager answering `--version`, then npm
pub fn detect_package_manager(project_dir: &Path) -> PackageManager {
    if let Some(manager) = from_lockfile(project_dir) {
        tracing::debug!(%manager, "package manager chosen by lockfile");
        return manager;
    }
    let manager = PackageManager::ALL
        .into_iter()
        .map(probe)
        .find(|info| info.available)
        .map(|info| info.manager)
        .unwrap_or_default();
    tracing::debug!(%manager, "package manager chosen by probe");
    manager
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lockfile_detection() {
        let dir = tempfile::TempDir::new().unwrap();
        assert_eq!(from_lockfile(dir.path()), None);

        std::fs::write(dir.path().join("package-lock.json"), "{}").unwrap();
        assert_eq!(from_lockfile(dir.path()), Some(PackageManager::Npm));

        std::fs::write(dir.path().join("yarn.lock"), "").unwrap();
        assert_eq!(from_lockfile(dir.path()), Some(PackageManager::Yarn));
        assert_eq!(detect_package_manager(dir.path()), PackageManager::Yarn);
    }

    #[test]
    fn test_add_command() {
        let packages = vec!["redux".to_string(), "react-redux".to_string()];
        assert_eq!(
            PackageManager::Npm.add_command(&packages, false).unwrap(),
            "npm install redux react-redux"
        );
        assert_eq!(
            PackageManager::Yarn.add_command(&packages, true).unwrap(),
            "yarn add --dev redux react-redux"
        );
        assert_eq!(PackageManager::Pnpm.add_command(&[], false), None);
    }

    #[test]
    fn test_run_command() {
        assert_eq!(PackageManager::Npm.run_command("start"), "npm run start");
        assert_eq!(PackageManager::Pnpm.run_command("start"), "pnpm start");
    }

    #[test]
    fn test_probe_missing_binary_is_unavailable() {
        let info = probe(PackageManager::Pnpm);
        assert_eq!(info.available, info.version.is_some());
    }
}

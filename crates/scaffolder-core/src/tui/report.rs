//! Charm-style reporting of catalog, validation and apply results

use crate::extensions::{
    build_adjacency_matrix, check_selection, reachable, transitive_hull, Catalog, Category,
    ExtensionId, Validation,
};
use crate::recipes::{apply_selection, ApplyReport};
use crate::runtime::{detect_package_manager, PackageManager};
use crate::source::StyleOverrides;
use anyhow::Result;
use colored::Colorize;
use std::path::{Path, PathBuf};

/// Arguments of an apply run
#[derive(Debug, Clone, Default)]
pub struct ApplyArgs {
    /// Directory of the generated base project
    pub directory: PathBuf,

    /// Extension names as typed by the user
    pub extensions: Vec<String>,

    pub overrides: StyleOverrides,
}

/// Print every message of `validation`. Returns whether it was valid.
pub fn report_validation(
    catalog: &Catalog,
    selection: &[ExtensionId],
    validation: &Validation,
) -> Result<bool> {
    match validation {
        Validation::Valid => {
            let names: Vec<String> = selection.iter().map(|id| catalog.name_of(*id)).collect();
            cliclack::log::success(format!("Valid selection: {}", names.join(", ")))?;
            Ok(true)
        }
        Validation::Invalid { errors } => {
            for error in errors {
                cliclack::log::error(error)?;
            }
            Ok(false)
        }
    }
}

/// Resolve names, reporting unknown ones
fn resolve(catalog: &Catalog, names: &[String]) -> Result<Vec<ExtensionId>> {
    match catalog.resolve_names(names) {
        Ok(ids) => Ok(ids),
        Err(unknown) => {
            for message in &unknown {
                cliclack::log::error(message)?;
            }
            let available: Vec<&str> = catalog.iter().map(|e| e.name.as_str()).collect();
            anyhow::bail!(
                "Unknown extension name. Available extensions: {}",
                available.join(", ")
            );
        }
    }
}

/// Validate a selection and report the outcome
pub fn run_check(catalog: &Catalog, names: &[String]) -> Result<()> {
    cliclack::intro("Check extension selection")?;

    let selection = resolve(catalog, names)?;
    let validation = check_selection(catalog, &selection);
    if !report_validation(catalog, &selection, &validation)? {
        cliclack::outro_cancel("Selection rejected")?;
        validation.into_result()?;
    }

    cliclack::outro("Selection is consistent")?;
    Ok(())
}

/// Validate a selection, apply its recipes and print the next steps
pub async fn run_apply(catalog: &Catalog, args: ApplyArgs) -> Result<()> {
    cliclack::intro("Apply extensions")?;

    let selection = resolve(catalog, &args.extensions)?;
    let validation = check_selection(catalog, &selection);
    if !report_validation(catalog, &selection, &validation)? {
        cliclack::outro_cancel("Nothing was changed")?;
        validation.into_result()?;
    }

    let spinner = cliclack::spinner();
    spinner.start("Applying extensions...");

    let report = match apply_selection(catalog, &selection, &args.directory, &args.overrides).await
    {
        Ok(report) => report,
        Err(e) => {
            spinner.error("Failed to apply extensions");
            return Err(e);
        }
    };

    spinner.stop(format!(
        "Applied {} extensions, touched {} files in {}",
        report.applied.len(),
        report.touched.len(),
        args.directory.display()
    ));

    for file in &report.touched {
        cliclack::log::info(format!("{}", file.display()))?;
    }

    let manager = detect_package_manager(&args.directory);
    print_next_steps(&report, &args.directory, manager)?;

    Ok(())
}

/// Steps left for the user: changing into the project and installing packages
pub fn print_next_steps(
    report: &ApplyReport,
    project_dir: &Path,
    manager: PackageManager,
) -> Result<()> {
    let mut steps = Vec::new();

    let current = std::env::current_dir().ok();
    if current.as_deref() != Some(project_dir) {
        steps.push(format!("cd {}", project_dir.display()));
    }
    steps.extend(report.install_commands(manager));
    steps.push(manager.run_command("start"));

    println!();
    println!("  Next steps");
    println!();

    for (i, step) in steps.iter().enumerate() {
        println!("  {}.  {}", i + 1, step);
    }

    cliclack::outro("Happy coding!")?;

    Ok(())
}

/// List the catalog grouped by category, or just the extensions of `only`
pub fn print_catalog(catalog: &Catalog, only: Option<Category>) {
    for category in Category::ALL {
        if only.is_some_and(|only| only != category) {
            continue;
        }
        let ids = catalog.by_category(category);
        if ids.is_empty() {
            continue;
        }

        println!("{}", category.display_name().bold());
        for id in ids {
            let Some(extension) = catalog.get(id) else {
                continue;
            };
            let mut line = format!("  {}", extension.name.cyan());
            if !extension.depends_on.is_empty() {
                let deps: Vec<String> = extension
                    .depends_on
                    .iter()
                    .map(|dep| catalog.name_of(*dep))
                    .collect();
                line.push_str(&format!(" {} {}", "requires".dimmed(), deps.join(", ")));
            }
            if !extension.exclusive_to.is_empty() {
                let excluded: Vec<String> = extension
                    .exclusive_to
                    .iter()
                    .map(|other| catalog.name_of(*other))
                    .collect();
                line.push_str(&format!(
                    " {} {}",
                    "excludes".dimmed(),
                    excluded.join(", ").yellow()
                ));
            }
            println!("{}", line);
        }
        println!();
    }
}

/// Print the transitive dependency hull of the whole catalog
pub fn print_hull(catalog: &Catalog) {
    let ordered: Vec<ExtensionId> = catalog.ids().collect();
    let hull = transitive_hull(build_adjacency_matrix(catalog, &ordered));

    println!("{}", "Transitive dependencies".bold());
    for (row, id) in ordered.iter().enumerate() {
        let reached: Vec<String> = reachable(&hull, &ordered, row)
            .into_iter()
            .map(|dep| catalog.name_of(dep))
            .collect();
        if reached.is_empty() {
            println!("  {} {}", catalog.name_of(*id).cyan(), "-".dimmed());
        } else {
            println!(
                "  {} {} {}",
                catalog.name_of(*id).cyan(),
                "->".dimmed(),
                reached.join(", ")
            );
        }
    }
}

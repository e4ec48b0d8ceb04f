//! create-frontend - Extension-based scaffolding for frontend projects

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use scaffolder_core::config;
use scaffolder_core::extensions::Category;
use scaffolder_core::source::{
    add_import, add_item_to_array, format_file, format_tree, remove_import, ImportDescriptor,
    StyleOverrides,
};
use scaffolder_core::tui::{self, ApplyArgs};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "create-frontend")]
#[command(about = "CLI for adding extensions to generated frontend projects")]
#[command(version)]
pub struct Args {
    /// YAML file of style overrides (singleQuote, semi, trailingComma, printWidth)
    #[arg(long, global = true, value_name = "FILE")]
    pub style: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check the catalog and list its extensions
    Catalog(CatalogArgs),
    /// Validate an extension selection
    Check(CheckArgs),
    /// Validate a selection and apply its recipes to a generated project
    Apply(CliApplyArgs),
    /// Normalize a file, or every script file below a directory
    Format(FormatArgs),
    /// Add an import to a script file
    AddImport(AddImportArgs),
    /// Remove every import of a module from a script file
    RemoveImport(RemoveImportArgs),
    /// Register an identifier in a declaration array and import it
    AddToArray(AddToArrayArgs),
}

#[derive(Parser, Debug)]
pub struct CatalogArgs {
    /// Catalog manifest to check instead of the built-in catalog
    #[arg(long, value_name = "FILE")]
    pub manifest: Option<PathBuf>,

    /// Only list extensions of this category
    #[arg(long, value_enum)]
    pub category: Option<Category>,

    /// Also print the transitive dependency hull
    #[arg(long)]
    pub hull: bool,
}

#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Extensions to check (comma-separated)
    #[arg(short, long = "with", value_delimiter = ',', required = true)]
    pub extensions: Vec<String>,

    /// Catalog manifest to check against instead of the built-in catalog
    #[arg(long, value_name = "FILE")]
    pub manifest: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct CliApplyArgs {
    /// Directory of the generated project
    #[arg(short, long, default_value = ".")]
    pub dir: PathBuf,

    /// Extensions to apply (comma-separated)
    #[arg(short, long = "with", value_delimiter = ',', required = true)]
    pub extensions: Vec<String>,
}

#[derive(Parser, Debug)]
pub struct FormatArgs {
    /// File or directory
    pub path: PathBuf,
}

#[derive(Parser, Debug)]
pub struct AddImportArgs {
    pub file: PathBuf,

    /// Module specifier
    #[arg(long)]
    pub source: String,

    /// Default binding
    #[arg(long)]
    pub default: Option<String>,

    /// Named bindings (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub named: Vec<String>,

    /// Namespace binding, cannot be combined with the others
    #[arg(long)]
    pub namespace: Option<String>,
}

impl From<&AddImportArgs> for ImportDescriptor {
    fn from(args: &AddImportArgs) -> Self {
        ImportDescriptor {
            default_import: args.default.clone(),
            named: args.named.clone(),
            namespace: args.namespace.clone(),
            source: args.source.clone(),
        }
    }
}

#[derive(Parser, Debug)]
pub struct RemoveImportArgs {
    pub file: PathBuf,

    /// Module specifier
    #[arg(long)]
    pub source: String,
}

#[derive(Parser, Debug)]
pub struct AddToArrayArgs {
    pub file: PathBuf,

    /// Name of the array, e.g. `declarations`
    #[arg(long)]
    pub array: String,

    /// Module the items are imported from
    #[arg(long)]
    pub source: String,

    /// Identifiers to register (comma-separated)
    #[arg(long, value_delimiter = ',', required = true)]
    pub named: Vec<String>,
}

async fn run(args: Args) -> Result<()> {
    let overrides: StyleOverrides = config::load_style_overrides(args.style.as_deref()).await?;
    tracing::debug!(?overrides, "resolved style overrides");

    match args.command {
        Command::Catalog(catalog_args) => {
            let catalog = config::load_catalog(catalog_args.manifest.as_deref()).await?;
            println!(
                "{} {} extensions, integrity checks passed",
                "✓".green(),
                catalog.len()
            );
            println!();
            tui::print_catalog(&catalog, catalog_args.category);
            if catalog_args.hull {
                tui::print_hull(&catalog);
            }
            Ok(())
        }
        Command::Check(check_args) => {
            let catalog = config::load_catalog(check_args.manifest.as_deref()).await?;
            tui::run_check(&catalog, &check_args.extensions)
        }
        Command::Apply(apply_args) => {
            let catalog = config::load_catalog(None).await?;
            let args = ApplyArgs {
                directory: apply_args.dir,
                extensions: apply_args.extensions,
                overrides,
            };
            tui::run_apply(&catalog, args).await
        }
        Command::Format(format_args) => {
            if format_args.path.is_dir() {
                let changed = format_tree(&format_args.path, &overrides).await?;
                for file in &changed {
                    println!("{} {}", "formatted".green(), file);
                }
                println!("{} files changed", changed.len());
            } else if format_file(&format_args.path, &overrides).await? {
                println!("{} {}", "formatted".green(), format_args.path.display());
            } else {
                println!("{} {}", "unchanged".dimmed(), format_args.path.display());
            }
            Ok(())
        }
        Command::AddImport(import_args) => {
            let descriptor = ImportDescriptor::from(&import_args);
            add_import(&import_args.file, &descriptor, &overrides).await?;
            cliclack::log::success(format!(
                "{} now imports {}",
                import_args.file.display(),
                descriptor.source
            ))?;
            Ok(())
        }
        Command::RemoveImport(remove_args) => {
            let descriptor = ImportDescriptor::side_effect(remove_args.source.as_str());
            remove_import(&remove_args.file, &descriptor, &overrides).await?;
            cliclack::log::success(format!(
                "Removed imports of {} from {}",
                remove_args.source,
                remove_args.file.display()
            ))?;
            Ok(())
        }
        Command::AddToArray(array_args) => {
            let descriptor =
                ImportDescriptor::named(array_args.named.iter(), array_args.source.as_str());
            add_item_to_array(&array_args.file, &array_args.array, &descriptor, &overrides)
                .await?;
            cliclack::log::success(format!(
                "Registered {} in {} of {}",
                array_args.named.join(", "),
                array_args.array,
                array_args.file.display()
            ))?;
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Diagnostics go to stderr so command output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    let result = run(args).await;

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    result
}

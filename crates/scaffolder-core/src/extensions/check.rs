//! Validation of a user selection against the catalog
//!
//! Failures here are recoverable: they describe an invalid choice that the caller
//! reports and asks about again.

use super::model::{Catalog, ExtensionId};
use crate::error::SelectionError;

/// Outcome of a selection check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    Valid,
    Invalid { errors: Vec<String> },
}

impl Validation {
    pub fn from_errors(errors: Vec<String>) -> Self {
        if errors.is_empty() {
            Validation::Valid
        } else {
            Validation::Invalid { errors }
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid)
    }

    pub fn errors(&self) -> &[String] {
        match self {
            Validation::Valid => &[],
            Validation::Invalid { errors } => errors,
        }
    }

    /// Combine two outcomes, keeping the messages of both in order
    pub fn and(self, other: Validation) -> Validation {
        let mut errors = self.errors().to_vec();
        errors.extend_from_slice(other.errors());
        Validation::from_errors(errors)
    }

    pub fn into_result(self) -> Result<(), SelectionError> {
        match self {
            Validation::Valid => Ok(()),
            Validation::Invalid { errors } => Err(SelectionError { errors }),
        }
    }
}

/// Every selected extension must have all of its direct dependencies selected.
///
/// Produces one message per offending extension, in selection order, naming all of its
/// missing dependencies in declaration order.
pub fn check_dependencies(catalog: &Catalog, selected: &[ExtensionId]) -> Validation {
    let mut errors = Vec::new();

    for id in selected {
        let Some(extension) = catalog.get(*id) else {
            errors.push(unknown_extension(*id));
            continue;
        };
        let missing: Vec<String> = extension
            .depends_on
            .iter()
            .filter(|dependency| !selected.contains(dependency))
            .map(|dependency| catalog.name_of(*dependency))
            .collect();

        if !missing.is_empty() {
            errors.push(format!(
                "{} depends on {}, which must also be selected",
                extension.name,
                missing.join(", ")
            ));
        }
    }

    Validation::from_errors(errors)
}

/// No two selected extensions may be exclusive to each other.
///
/// Each conflicting pair is reported once, on the extension selected first.
pub fn check_exclusivities(catalog: &Catalog, selected: &[ExtensionId]) -> Validation {
    let mut errors = Vec::new();

    for (position, id) in selected.iter().enumerate() {
        let Some(extension) = catalog.get(*id) else {
            errors.push(unknown_extension(*id));
            continue;
        };
        let conflicts: Vec<String> = selected[position + 1..]
            .iter()
            .filter(|other| *other != id)
            .filter(|other| {
                extension.exclusive_to.contains(other)
                    || catalog
                        .get(**other)
                        .is_some_and(|o| o.exclusive_to.contains(id))
            })
            .map(|other| catalog.name_of(*other))
            .collect();

        if !conflicts.is_empty() {
            errors.push(format!(
                "{} cannot be combined with {}",
                extension.name,
                conflicts.join(", ")
            ));
        }
    }

    Validation::from_errors(errors)
}

/// Dependencies first, then exclusivities. An unknown id is reported once.
pub fn check_selection(catalog: &Catalog, selected: &[ExtensionId]) -> Validation {
    let combined =
        check_dependencies(catalog, selected).and(check_exclusivities(catalog, selected));

    let mut errors: Vec<String> = Vec::with_capacity(combined.errors().len());
    for error in combined.errors() {
        if !errors.contains(error) {
            errors.push(error.clone());
        }
    }
    Validation::from_errors(errors)
}

fn unknown_extension(id: ExtensionId) -> String {
    format!("Unknown extension #{}", id.index())
}

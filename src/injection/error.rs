//! Injection configuration errors.

use resref_config::MergeConflict;

/// Render conflicts one per line in `<attr>: [i]=v != [j]=v` form.
pub fn format_conflicts(conflicts: &[MergeConflict]) -> String {
    conflicts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Fatal configuration errors; deployment of the reference cannot proceed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InjectionError {
    /// Partial configurations of one reference disagree.
    #[error(
        "The {name} reference has conflicting configuration:\n{}",
        format_conflicts(.conflicts)
    )]
    ConflictingValues {
        name: String,
        conflicts: Vec<MergeConflict>,
    },

    /// Two components declare the same reference differently.
    #[error(
        "The {name} reference has conflicting values for the {attribute} attribute: \
         {value1} and {value2}"
    )]
    ConflictingReferences {
        name: String,
        attribute: String,
        value1: String,
        value2: String,
    },
}

impl InjectionError {
    /// Name of the reference the error is about.
    pub fn reference_name(&self) -> &str {
        match self {
            Self::ConflictingValues { name, .. } => name,
            Self::ConflictingReferences { name, .. } => name,
        }
    }
}

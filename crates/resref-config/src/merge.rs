//! Binding and extension merge engine
//!
//! Folds an ordered sequence of partial configurations attribute by
//! attribute:
//! - Merge mode: first non-null value wins, later different values conflict
//! - Strict mode: every source must agree, absence included
//! - Login properties: one independent sub-attribute per property name
//! - `transactional`: never a conflict

use crate::attribute::{merge_attribute, MergeMode, Resolved};
use crate::config::ResourceRefConfig;
use crate::conflict::MergeConflict;
use crate::values::AttributeValue;

/// Attribute name prefix of a per-property login configuration sub-attribute.
pub const LOGIN_PROPERTY_ATTRIBUTE_PREFIX: &str = "custom-login-configuration property ";

/// Tracked scalar attributes of a [`ResourceRefConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    Description,
    Type,
    ResAuth,
    SharingScope,
    BindingName,
    LoginConfigurationName,
    IsolationLevel,
    CommitPriority,
    BranchCoupling,
}

impl Attribute {
    /// Processing order; conflicts are reported in this order.
    pub const ALL: [Attribute; 9] = [
        Self::Description,
        Self::Type,
        Self::ResAuth,
        Self::SharingScope,
        Self::BindingName,
        Self::LoginConfigurationName,
        Self::IsolationLevel,
        Self::CommitPriority,
        Self::BranchCoupling,
    ];

    /// Name used in conflict diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Self::Description => "description",
            Self::Type => "type",
            Self::ResAuth => "res-auth",
            Self::SharingScope => "res-sharing-scope",
            Self::BindingName => "binding-name",
            Self::LoginConfigurationName => "custom-login-configuration",
            Self::IsolationLevel => "isolation-level",
            Self::CommitPriority => "commit-priority",
            Self::BranchCoupling => "branch-coupling",
        }
    }

    pub fn get(self, config: &ResourceRefConfig) -> Option<AttributeValue> {
        match self {
            Self::Description => config.description.clone().map(AttributeValue::Text),
            Self::Type => config.type_name.clone().map(AttributeValue::Text),
            Self::ResAuth => config.res_auth.map(AttributeValue::Auth),
            Self::SharingScope => config.sharing_scope.map(AttributeValue::Sharing),
            Self::BindingName => config.jndi_name.clone().map(AttributeValue::Text),
            Self::LoginConfigurationName => {
                config.login_configuration_name.clone().map(AttributeValue::Text)
            }
            Self::IsolationLevel => config.isolation_level.map(AttributeValue::Isolation),
            Self::CommitPriority => config.commit_priority.map(AttributeValue::Integer),
            Self::BranchCoupling => config.branch_coupling.map(AttributeValue::Coupling),
        }
    }

    fn copy(self, from: &ResourceRefConfig, to: &mut ResourceRefConfig) {
        match self {
            Self::Description => to.description = from.description.clone(),
            Self::Type => to.type_name = from.type_name.clone(),
            Self::ResAuth => to.res_auth = from.res_auth,
            Self::SharingScope => to.sharing_scope = from.sharing_scope,
            Self::BindingName => to.jndi_name = from.jndi_name.clone(),
            Self::LoginConfigurationName => {
                to.login_configuration_name = from.login_configuration_name.clone()
            }
            Self::IsolationLevel => to.isolation_level = from.isolation_level,
            Self::CommitPriority => to.commit_priority = from.commit_priority,
            Self::BranchCoupling => to.branch_coupling = from.branch_coupling,
        }
    }
}

/// Diagnostic name of the login property sub-attribute for `property`.
pub fn login_property_attribute_name(property: &str) -> String {
    format!("{}{}", LOGIN_PROPERTY_ATTRIBUTE_PREFIX, property)
}

/// Result of folding a sequence of partial configurations.
#[derive(Debug, Clone, Default)]
pub struct MergeOutcome {
    pub attributes: Vec<(Attribute, Resolved<AttributeValue>)>,
    /// Login properties in order of first appearance.
    pub login_properties: Vec<(String, Resolved<String>)>,
    pub transactional: Resolved<bool>,
    pub conflicts: Vec<MergeConflict>,
}

impl MergeOutcome {
    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }
}

fn source_index(position: usize) -> i32 {
    i32::try_from(position).unwrap_or(i32::MAX)
}

/// Fold `sources` in index order.
///
/// `None` entries did not contribute and are skipped, keeping their index.
/// `seed`, when given, is carried in at index -1 so that source 0 is checked
/// against it.
pub fn merge(
    seed: Option<&ResourceRefConfig>,
    sources: &[Option<&ResourceRefConfig>],
    mode: MergeMode,
) -> MergeOutcome {
    let mut outcome = MergeOutcome::default();
    let present = || {
        sources
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.map(|s| (source_index(i), s)))
    };

    for attribute in Attribute::ALL {
        let initial = match seed {
            Some(seed) => Resolved::carried_in(attribute.get(seed)),
            None => Resolved::unset(),
        };
        let resolved = present().fold(initial, |previous, (index, source)| {
            let value = attribute.get(source);
            let (next, conflict) =
                merge_attribute(attribute.name(), previous, value.as_ref(), index, mode);
            outcome.conflicts.extend(conflict);
            next
        });
        outcome.attributes.push((attribute, resolved));
    }

    let mut property_names: Vec<&str> = Vec::new();
    for config in seed.into_iter().chain(present().map(|(_, s)| s)) {
        for property in &config.login_properties {
            if !property_names.contains(&property.name.as_str()) {
                property_names.push(&property.name);
            }
        }
    }
    for property in property_names {
        let attribute_name = login_property_attribute_name(property);
        let initial = match seed {
            Some(seed) => Resolved::carried_in(seed.login_property(property).map(String::from)),
            None => Resolved::unset(),
        };
        let resolved = present().fold(initial, |previous, (index, source)| {
            let value = source.login_property(property).map(String::from);
            let (next, conflict) =
                merge_attribute(&attribute_name, previous, value.as_ref(), index, mode);
            outcome.conflicts.extend(conflict);
            next
        });
        outcome.login_properties.push((property.to_string(), resolved));
    }

    // transactional cannot be a merge error.
    outcome.transactional = match seed {
        Some(seed) => Resolved::carried_in(seed.transactional),
        None => Resolved::unset(),
    };
    if mode == MergeMode::Merge {
        for (index, source) in present() {
            let Some(value) = source.transactional else {
                continue;
            };
            match outcome.transactional.value {
                None => {
                    outcome.transactional = Resolved {
                        value: Some(value),
                        index: Some(index),
                    }
                }
                Some(current) => {
                    if current != value {
                        tracing::debug!(
                            name = %source.name,
                            index,
                            kept = current,
                            "ignoring differing transactional value"
                        );
                    }
                }
            }
        }
    }

    outcome
}

impl ResourceRefConfig {
    /// Merge partial configurations into this one.
    ///
    /// Each attribute takes the first non-null value among `sources`;
    /// attributes no source supplies keep their current value. Disagreements
    /// are returned; resolved values are applied regardless.
    pub fn merge_bindings_and_extensions(
        &mut self,
        sources: &[Option<&ResourceRefConfig>],
    ) -> Vec<MergeConflict> {
        let outcome = merge(None, sources, MergeMode::Merge);

        for (attribute, resolved) in &outcome.attributes {
            let winner = resolved
                .index
                .and_then(|i| usize::try_from(i).ok())
                .and_then(|i| sources.get(i).copied().flatten());
            if let Some(source) = winner {
                attribute.copy(source, self);
            }
        }
        for (name, resolved) in &outcome.login_properties {
            if let Some(ref value) = resolved.value {
                self.add_login_property(name.clone(), value.clone());
            }
        }
        if let Some(transactional) = outcome.transactional.value {
            self.transactional = Some(transactional);
        }

        tracing::debug!(
            name = %self.name,
            sources = sources.len(),
            conflicts = outcome.conflicts.len(),
            "merged bindings and extensions"
        );
        outcome.conflicts
    }

    /// Report every difference between this configuration and `other`.
    ///
    /// Absence on one side and presence on the other is a difference.
    /// Neither configuration is modified.
    pub fn compare_bindings_and_extensions(&self, other: &ResourceRefConfig) -> Vec<MergeConflict> {
        merge(Some(self), &[Some(other)], MergeMode::Strict).conflicts
    }
}

//! Resource reference configuration record.

use crate::values::{branch_coupling_raw, BranchCoupling, IsolationLevel, ResAuth, SharingScope};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A name/value pair of a custom login configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginProperty {
    pub name: String,
    pub value: String,
}

impl LoginProperty {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Bindings, extensions and declared attributes of one named resource reference.
///
/// Every attribute other than `name` may be unset. Partial configurations
/// from several sources are combined with
/// [`merge_bindings_and_extensions`](Self::merge_bindings_and_extensions).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ResourceRefConfig {
    pub(crate) name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) description: Option<String>,

    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub(crate) type_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) res_auth: Option<ResAuth>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) sharing_scope: Option<SharingScope>,

    /// JNDI name this reference is bound to.
    #[serde(default, rename = "binding-name", skip_serializing_if = "Option::is_none")]
    pub(crate) jndi_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) login_configuration_name: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) login_properties: Vec<LoginProperty>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) isolation_level: Option<IsolationLevel>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) commit_priority: Option<i32>,

    #[serde(
        default,
        with = "branch_coupling_raw",
        skip_serializing_if = "Option::is_none"
    )]
    pub(crate) branch_coupling: Option<BranchCoupling>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) transactional: Option<bool>,
}

impl ResourceRefConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Configuration used for a reference with no explicit declaration.
    pub fn default_config(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            res_auth: Some(ResAuth::Container),
            sharing_scope: Some(SharingScope::Shareable),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }

    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    pub fn set_type(&mut self, type_name: Option<String>) {
        self.type_name = type_name;
    }

    pub fn res_auth(&self) -> Option<ResAuth> {
        self.res_auth
    }

    pub fn set_res_auth(&mut self, res_auth: Option<ResAuth>) {
        self.res_auth = res_auth;
    }

    pub fn sharing_scope(&self) -> Option<SharingScope> {
        self.sharing_scope
    }

    pub fn set_sharing_scope(&mut self, sharing_scope: Option<SharingScope>) {
        self.sharing_scope = sharing_scope;
    }

    pub fn jndi_name(&self) -> Option<&str> {
        self.jndi_name.as_deref()
    }

    pub fn set_jndi_name(&mut self, jndi_name: Option<String>) {
        self.jndi_name = jndi_name;
    }

    pub fn login_configuration_name(&self) -> Option<&str> {
        self.login_configuration_name.as_deref()
    }

    pub fn set_login_configuration_name(&mut self, name: Option<String>) {
        self.login_configuration_name = name;
    }

    pub fn login_properties(&self) -> &[LoginProperty] {
        &self.login_properties
    }

    pub fn login_property(&self, name: &str) -> Option<&str> {
        self.login_properties
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }

    /// Add a login property; a repeated name replaces the earlier value in place.
    pub fn add_login_property(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let property = LoginProperty::new(name, value);
        match self.login_properties.iter_mut().find(|p| p.name == property.name) {
            Some(existing) => existing.value = property.value,
            None => self.login_properties.push(property),
        }
    }

    pub fn clear_login_properties(&mut self) {
        self.login_properties.clear();
    }

    pub fn isolation_level(&self) -> Option<IsolationLevel> {
        self.isolation_level
    }

    pub fn set_isolation_level(&mut self, level: Option<IsolationLevel>) {
        self.isolation_level = level;
    }

    pub fn commit_priority(&self) -> Option<i32> {
        self.commit_priority
    }

    pub fn set_commit_priority(&mut self, priority: Option<i32>) {
        self.commit_priority = priority;
    }

    pub fn branch_coupling(&self) -> Option<BranchCoupling> {
        self.branch_coupling
    }

    pub fn set_branch_coupling(&mut self, coupling: Option<BranchCoupling>) {
        self.branch_coupling = coupling;
    }

    pub fn transactional(&self) -> Option<bool> {
        self.transactional
    }

    pub fn set_transactional(&mut self, transactional: Option<bool>) {
        self.transactional = transactional;
    }

    /// Collapse duplicate login property names, last occurrence winning.
    ///
    /// Deserialized lists may repeat a name; the setters never do.
    pub fn normalize_login_properties(&mut self) {
        let properties = std::mem::take(&mut self.login_properties);
        for property in properties {
            self.add_login_property(property.name, property.value);
        }
    }
}

impl fmt::Display for ResourceRefConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResourceRefConfig[name={}", self.name)?;
        if let Some(ref description) = self.description {
            write!(f, ", description={}", description)?;
        }
        if let Some(ref type_name) = self.type_name {
            write!(f, ", type={}", type_name)?;
        }
        if let Some(auth) = self.res_auth {
            write!(f, ", auth={}", auth)?;
        }
        if let Some(scope) = self.sharing_scope {
            write!(f, ", sharingScope={}", scope)?;
        }
        if let Some(ref jndi_name) = self.jndi_name {
            write!(f, ", bindingName={}", jndi_name)?;
        }
        if let Some(ref login) = self.login_configuration_name {
            write!(f, ", loginConfigurationName={}", login)?;
        }
        if !self.login_properties.is_empty() {
            let props: Vec<String> = self
                .login_properties
                .iter()
                .map(|p| format!("{}={}", p.name, p.value))
                .collect();
            write!(f, ", loginProperties=[{}]", props.join(", "))?;
        }
        if let Some(level) = self.isolation_level {
            write!(f, ", isolationLevel={}", level)?;
        }
        if let Some(priority) = self.commit_priority {
            write!(f, ", commitPriority={}", priority)?;
        }
        if let Some(coupling) = self.branch_coupling {
            write!(f, ", branchCoupling={}", coupling)?;
        }
        if let Some(transactional) = self.transactional {
            write!(f, ", transactional={}", transactional)?;
        }
        write!(f, "]")
    }
}

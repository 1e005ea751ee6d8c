//! Injection binding for one resource reference in one component.

use resref_config::{render, Attribute, ResourceRefConfig};

use super::error::InjectionError;

/// A resource reference as declared by a specific component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceInjectionBinding {
    jndi_name: String,
    component: String,
    module: String,
    application: String,
    lookup: Option<String>,
    config: ResourceRefConfig,
}

impl ResourceInjectionBinding {
    pub fn new(
        jndi_name: impl Into<String>,
        component: impl Into<String>,
        module: impl Into<String>,
        application: impl Into<String>,
        config: ResourceRefConfig,
    ) -> Self {
        Self {
            jndi_name: jndi_name.into(),
            component: component.into(),
            module: module.into(),
            application: application.into(),
            lookup: None,
            config,
        }
    }

    /// Set the JNDI name the declaration looks the resource up by.
    pub fn with_lookup(mut self, lookup: impl Into<String>) -> Self {
        self.lookup = Some(lookup.into());
        self
    }

    pub fn lookup(&self) -> Option<&str> {
        self.lookup.as_deref()
    }

    pub fn jndi_name(&self) -> &str {
        &self.jndi_name
    }

    pub fn component(&self) -> &str {
        &self.component
    }

    pub fn config(&self) -> &ResourceRefConfig {
        &self.config
    }

    /// Check a binding saved from another component against this one.
    ///
    /// `lookup` and binding name must be identical, absence included.
    /// The binding configurations are then compared strictly.
    pub fn merge_saved(&self, saved: &ResourceInjectionBinding) -> Result<(), InjectionError> {
        self.merge_saved_value(self.lookup(), saved.lookup(), "lookup")?;
        let binding_name = Attribute::BindingName.name();
        self.merge_saved_value(
            self.config.jndi_name(),
            saved.config.jndi_name(),
            binding_name,
        )?;

        let conflicts = self.config.compare_bindings_and_extensions(&saved.config);
        let mut primary = None;
        for conflict in conflicts
            .iter()
            .filter(|c| c.attribute_name() != binding_name)
        {
            tracing::error!(
                component = %self.component,
                saved_component = %saved.component,
                module = %self.module,
                application = %self.application,
                attribute = conflict.attribute_name(),
                reference = %self.jndi_name,
                value1 = conflict.value1(),
                value2 = conflict.value2(),
                "conflicting references"
            );
            primary = Some(conflict);
        }

        match primary {
            Some(conflict) => Err(self.conflicting(
                conflict.attribute_name(),
                conflict.value1(),
                conflict.value2(),
            )),
            None => Ok(()),
        }
    }

    fn merge_saved_value(
        &self,
        ours: Option<&str>,
        theirs: Option<&str>,
        attribute: &str,
    ) -> Result<(), InjectionError> {
        if ours == theirs {
            return Ok(());
        }
        let (value1, value2) = (render(ours), render(theirs));
        tracing::error!(
            reference = %self.jndi_name,
            attribute,
            value1 = %value1,
            value2 = %value2,
            "incompatible merge attributes"
        );
        Err(self.conflicting(attribute, &value1, &value2))
    }

    fn conflicting(&self, attribute: &str, value1: &str, value2: &str) -> InjectionError {
        InjectionError::ConflictingReferences {
            name: self.jndi_name.clone(),
            attribute: attribute.to_string(),
            value1: value1.to_string(),
            value2: value2.to_string(),
        }
    }
}

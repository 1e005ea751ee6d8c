//! Resource reference processing for one component namespace.

use resref_config::{ResAuth, ResourceRefConfig, ResourceRefConfigList, SharingScope};
use serde::{Deserialize, Serialize};

use super::binding::ResourceInjectionBinding;
use super::error::InjectionError;

/// A `@Resource` declaration found by annotation scanning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ResourceAnnotation {
    pub name: String,

    /// Empty means not specified.
    #[serde(default)]
    pub description: String,

    #[serde(default, rename = "type")]
    pub type_name: Option<String>,

    /// `None` when the annotation leaves the element at its default.
    #[serde(default)]
    pub authentication_type: Option<ResAuth>,

    #[serde(default)]
    pub shareable: Option<bool>,

    /// JNDI name the reference is bound to, if the annotation names one.
    #[serde(default)]
    pub lookup: Option<String>,
}

impl ResourceAnnotation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            type_name: None,
            authentication_type: None,
            shareable: None,
            lookup: None,
        }
    }

    /// Effective authentication type, `Container` unless declared.
    pub fn res_auth(&self) -> ResAuth {
        self.authentication_type.unwrap_or(ResAuth::Container)
    }

    /// Effective sharing scope, shareable unless declared.
    pub fn sharing_scope(&self) -> SharingScope {
        scope_of(self.shareable.unwrap_or(true))
    }

    /// The partial configuration this annotation contributes.
    ///
    /// Only explicitly declared elements are set, so a later layer can
    /// supply auth or sharing scope without conflicting with a default.
    pub fn to_partial(&self) -> ResourceRefConfig {
        let mut config = ResourceRefConfig::new(self.name.clone());
        self.apply_common(&mut config, self.lookup.as_deref());
        config.set_res_auth(self.authentication_type);
        config.set_sharing_scope(self.shareable.map(scope_of));
        config
    }

    fn apply_common(&self, config: &mut ResourceRefConfig, bound_to: Option<&str>) {
        let description = (!self.description.is_empty()).then(|| self.description.clone());
        config.set_description(description);
        config.set_type(self.type_name.clone());
        config.set_jndi_name(bound_to.map(String::from));
    }
}

fn scope_of(shareable: bool) -> SharingScope {
    if shareable {
        SharingScope::Shareable
    } else {
        SharingScope::Unshareable
    }
}

/// Owns the resource reference configurations of one component namespace.
#[derive(Debug, Clone, Default)]
pub struct ResourceProcessor {
    refs: ResourceRefConfigList,
}

impl ResourceProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_refs(refs: ResourceRefConfigList) -> Self {
        Self { refs }
    }

    pub fn refs(&self) -> &ResourceRefConfigList {
        &self.refs
    }

    pub fn into_refs(self) -> ResourceRefConfigList {
        self.refs
    }

    /// Record an annotation's attributes on the named reference.
    ///
    /// Overwrites description, type, auth, sharing scope and binding name.
    pub fn apply_annotation(
        &mut self,
        annotation: &ResourceAnnotation,
        bound_to: Option<&str>,
    ) -> &ResourceRefConfig {
        let config = self.refs.find_or_add_by_name(&annotation.name);
        annotation.apply_common(config, bound_to);
        config.set_res_auth(Some(annotation.res_auth()));
        config.set_sharing_scope(Some(annotation.sharing_scope()));
        tracing::debug!(
            name = %annotation.name,
            bound_to = ?bound_to,
            "applied resource annotation"
        );
        config
    }

    /// Merge ordered partial configurations into the named reference.
    ///
    /// Any conflict is fatal for the reference, and the stored
    /// configuration is left as it was.
    pub fn resolve(
        &mut self,
        name: &str,
        partials: &[Option<&ResourceRefConfig>],
    ) -> Result<&ResourceRefConfig, InjectionError> {
        let mut merged = match self.refs.find_by_name(name) {
            Some(existing) => existing.clone(),
            None => ResourceRefConfig::new(name),
        };
        let conflicts = merged.merge_bindings_and_extensions(partials);
        if !conflicts.is_empty() {
            tracing::warn!(
                name,
                conflicts = conflicts.len(),
                "conflicting resource reference configuration"
            );
            return Err(InjectionError::ConflictingValues {
                name: name.to_string(),
                conflicts,
            });
        }

        let config = self.refs.find_or_add_by_name(name);
        *config = merged;
        Ok(config)
    }

    /// Injection binding for a reference, falling back to the default
    /// configuration when the reference was never declared.
    pub fn binding(
        &self,
        name: &str,
        component: &str,
        module: &str,
        application: &str,
    ) -> ResourceInjectionBinding {
        let config = match self.refs.find_by_name(name) {
            Some(config) => config.clone(),
            None => ResourceRefConfig::default_config(name),
        };
        ResourceInjectionBinding::new(name, component, module, application, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_annotation_sets_declared_attributes() {
        let mut processor = ResourceProcessor::new();
        let mut annotation = ResourceAnnotation::new("jdbc/ds");
        annotation.type_name = Some("javax.sql.DataSource".to_string());
        annotation.shareable = Some(false);

        let config = processor.apply_annotation(&annotation, Some("jdbc/real"));
        assert_eq!(config.type_name(), Some("javax.sql.DataSource"));
        assert_eq!(config.sharing_scope(), Some(SharingScope::Unshareable));
        assert_eq!(config.res_auth(), Some(ResAuth::Container));
        assert_eq!(config.jndi_name(), Some("jdbc/real"));
        assert!(config.description().is_none());
        assert_eq!(processor.refs().len(), 1);
    }

    #[test]
    fn test_resolve_merges_into_named_reference() {
        let mut processor = ResourceProcessor::new();
        let annotation = ResourceAnnotation::new("jdbc/ds").to_partial();
        let mut binding = ResourceRefConfig::new("jdbc/ds");
        binding.set_jndi_name(Some("jdbc/real".to_string()));

        let config = processor
            .resolve("jdbc/ds", &[Some(&annotation), Some(&binding)])
            .unwrap();
        assert_eq!(config.jndi_name(), Some("jdbc/real"));
        assert!(config.res_auth().is_none());
    }

    #[test]
    fn test_undeclared_annotation_elements_do_not_conflict() {
        let mut processor = ResourceProcessor::new();
        let annotation = ResourceAnnotation::new("jdbc/ds").to_partial();
        let mut descriptor = ResourceRefConfig::new("jdbc/ds");
        descriptor.set_res_auth(Some(ResAuth::Application));
        descriptor.set_sharing_scope(Some(SharingScope::Unshareable));

        let config = processor
            .resolve("jdbc/ds", &[Some(&annotation), Some(&descriptor)])
            .unwrap();
        assert_eq!(config.res_auth(), Some(ResAuth::Application));
        assert_eq!(config.sharing_scope(), Some(SharingScope::Unshareable));
    }

    #[test]
    fn test_declared_annotation_elements_still_conflict() {
        let mut processor = ResourceProcessor::new();
        let mut annotation = ResourceAnnotation::new("jdbc/ds");
        annotation.authentication_type = Some(ResAuth::Container);
        let mut descriptor = ResourceRefConfig::new("jdbc/ds");
        descriptor.set_res_auth(Some(ResAuth::Application));

        let err = processor
            .resolve("jdbc/ds", &[Some(&annotation.to_partial()), Some(&descriptor)])
            .unwrap_err();
        assert!(err.to_string().contains("res-auth: [0]=Container != [1]=Application"));
    }

    #[test]
    fn test_resolve_conflict_is_fatal() {
        let mut processor = ResourceProcessor::new();
        let mut first = ResourceRefConfig::new("jdbc/ds");
        first.set_commit_priority(Some(1));
        let mut second = ResourceRefConfig::new("jdbc/ds");
        second.set_commit_priority(Some(2));

        let err = processor
            .resolve("jdbc/ds", &[Some(&first), Some(&second)])
            .unwrap_err();
        assert!(err.to_string().contains("commit-priority: [0]=1 != [1]=2"));
    }

    #[test]
    fn test_failed_resolve_leaves_stored_config_unchanged() {
        let mut processor = ResourceProcessor::new();
        let mut first = ResourceRefConfig::new("jdbc/ds");
        first.set_commit_priority(Some(1));
        first.set_jndi_name(Some("jdbc/real".to_string()));
        let mut second = ResourceRefConfig::new("jdbc/ds");
        second.set_commit_priority(Some(2));

        assert!(processor.resolve("jdbc/new", &[Some(&first), Some(&second)]).is_err());
        assert!(processor.refs().find_by_name("jdbc/new").is_none());

        let annotation = ResourceAnnotation::new("jdbc/ds");
        let before = processor.apply_annotation(&annotation, None).clone();
        assert!(processor.resolve("jdbc/ds", &[Some(&first), Some(&second)]).is_err());
        assert_eq!(processor.refs().find_by_name("jdbc/ds"), Some(&before));
    }

    #[test]
    fn test_binding_falls_back_to_default_config() {
        let processor = ResourceProcessor::new();
        let binding = processor.binding("jdbc/missing", "Comp", "mod.war", "app");
        assert_eq!(binding.config().res_auth(), Some(ResAuth::Container));
        assert_eq!(binding.config().name(), "jdbc/missing");
        assert_eq!(binding.jndi_name(), "jdbc/missing");
    }

    #[test]
    fn test_annotation_deserializes_with_defaults() {
        let annotation: ResourceAnnotation =
            toml::from_str("name = \"jms/cf\"\nauthentication-type = \"Application\"")
                .unwrap();
        assert_eq!(annotation.authentication_type, Some(ResAuth::Application));
        assert!(annotation.shareable.is_none());
        assert_eq!(annotation.sharing_scope(), SharingScope::Shareable);
        assert!(annotation.lookup.is_none());

        let partial = annotation.to_partial();
        assert_eq!(partial.res_auth(), Some(ResAuth::Application));
        assert!(partial.sharing_scope().is_none());
    }
}

//! Descriptor layers
//!
//! One layer holds the partial resource reference configurations
//! contributed by a single source file.

use resref_config::ResourceRefConfig;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::injection::ResourceAnnotation;

/// Kind of source a layer comes from, in precedence order.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum LayerOrigin {
    /// Annotation scan results
    Annotation,
    /// Deployment descriptor (XML) declarations
    #[default]
    Descriptor,
    /// Binding and extension overrides
    Binding,
}

/// On-disk TOML form of a layer.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct LayerFile {
    #[serde(default)]
    origin: LayerOrigin,

    #[serde(default, rename = "resource")]
    resources: Vec<ResourceAnnotation>,

    #[serde(default, rename = "resource-ref")]
    resource_refs: Vec<ResourceRefConfig>,
}

/// Partial configurations from one source, with provenance.
#[derive(Debug, Clone)]
pub struct DescriptorLayer {
    pub origin: LayerOrigin,

    /// File path (None for in-memory layers)
    pub path: Option<String>,

    /// SHA-256 digest of raw file bytes (None for in-memory layers)
    pub digest: Option<String>,

    refs: Vec<ResourceRefConfig>,
}

impl DescriptorLayer {
    /// Build an in-memory layer.
    pub fn new(origin: LayerOrigin, refs: Vec<ResourceRefConfig>) -> Result<Self, ConfigError> {
        let mut refs = refs;
        Self::validate(&mut refs)?;
        Ok(Self {
            origin,
            path: None,
            digest: None,
            refs,
        })
    }

    /// Load and parse a TOML layer file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let bytes = fs::read(path)
            .map_err(|e| ConfigError::IoError(format!("{}: {}", path.display(), e)))?;

        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let digest = hex::encode(hasher.finalize());

        let contents = String::from_utf8(bytes)
            .map_err(|e| ConfigError::ParseError(format!("Invalid UTF-8: {}", e)))?;

        let mut layer = Self::from_toml_str(&contents)?;
        layer.path = Some(path.to_string_lossy().to_string());
        layer.digest = Some(digest);
        tracing::debug!(
            path = %path.display(),
            origin = ?layer.origin,
            refs = layer.refs.len(),
            "loaded descriptor layer"
        );
        Ok(layer)
    }

    /// Parse a layer from TOML text.
    ///
    /// `[[resource]]` annotation tables are converted to their partial
    /// configurations ahead of the `[[resource-ref]]` tables.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let file: LayerFile = toml::from_str(contents)
            .map_err(|e| ConfigError::ParseError(format!("TOML parse error: {}", e)))?;

        let refs = file
            .resources
            .iter()
            .map(ResourceAnnotation::to_partial)
            .chain(file.resource_refs)
            .collect();
        Self::new(file.origin, refs)
    }

    pub fn refs(&self) -> &[ResourceRefConfig] {
        &self.refs
    }

    pub fn find(&self, name: &str) -> Option<&ResourceRefConfig> {
        self.refs.iter().find(|r| r.name() == name)
    }

    /// Describe this layer for error messages.
    pub fn label(&self) -> String {
        match self.path {
            Some(ref path) => format!("{:?} layer {}", self.origin, path),
            None => format!("{:?} layer", self.origin),
        }
    }

    fn validate(refs: &mut [ResourceRefConfig]) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for config in refs.iter_mut() {
            if config.name().trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "resource reference name must not be empty".to_string(),
                ));
            }
            if !seen.insert(config.name().to_string()) {
                return Err(ConfigError::ValidationError(format!(
                    "duplicate resource reference {} in one layer",
                    config.name()
                )));
            }
            config.normalize_login_properties();
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use resref_config::{BranchCoupling, IsolationLevel, ResAuth};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_resource_refs() {
        let layer = DescriptorLayer::from_toml_str(
            r#"
origin = "binding"

[[resource-ref]]
name = "jdbc/ds"
binding-name = "jdbc/real"
isolation-level = 8
branch-coupling = "TIGHT"
login-configuration-name = "DefaultPrincipalMapping"
login-properties = [{ name = "user", value = "dbuser" }]
"#,
        )
        .unwrap();

        assert_eq!(layer.origin, LayerOrigin::Binding);
        let config = layer.find("jdbc/ds").unwrap();
        assert_eq!(config.jndi_name(), Some("jdbc/real"));
        assert_eq!(config.isolation_level(), Some(IsolationLevel::Serializable));
        assert_eq!(config.branch_coupling(), Some(BranchCoupling::Tight));
        assert_eq!(config.login_property("user"), Some("dbuser"));
    }

    #[test]
    fn test_origin_defaults_to_descriptor() {
        let layer =
            DescriptorLayer::from_toml_str("[[resource-ref]]\nname = \"jdbc/ds\"\n").unwrap();
        assert_eq!(layer.origin, LayerOrigin::Descriptor);
    }

    #[test]
    fn test_annotation_tables_become_partials() {
        let layer = DescriptorLayer::from_toml_str(
            r#"
origin = "annotation"

[[resource]]
name = "jms/cf"
type = "javax.jms.ConnectionFactory"
authentication-type = "Application"
lookup = "jms/realCF"
"#,
        )
        .unwrap();

        let config = layer.find("jms/cf").unwrap();
        assert_eq!(config.res_auth(), Some(ResAuth::Application));
        assert_eq!(config.jndi_name(), Some("jms/realCF"));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let result = DescriptorLayer::from_toml_str(
            "[[resource-ref]]\nname = \"jdbc/ds\"\n[[resource-ref]]\nname = \"jdbc/ds\"\n",
        );
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_unknown_isolation_level_rejected() {
        let result = DescriptorLayer::from_toml_str(
            "[[resource-ref]]\nname = \"jdbc/ds\"\nisolation-level = 3\n",
        );
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_load_records_digest() {
        let mut temp = NamedTempFile::new().unwrap();
        writeln!(temp, "[[resource-ref]]").unwrap();
        writeln!(temp, "name = \"jdbc/ds\"").unwrap();

        let layer = DescriptorLayer::load(temp.path()).unwrap();
        assert_eq!(layer.digest.as_ref().map(String::len), Some(64));
        assert!(layer.path.is_some());
    }

    #[test]
    fn test_load_missing_file() {
        let result = DescriptorLayer::load(Path::new("/nonexistent/layer.toml"));
        assert!(matches!(result, Err(ConfigError::IoError(_))));
    }
}

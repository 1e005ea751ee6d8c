//! Effective resource references with full provenance
//!
//! The effective set captures every merged resource reference plus the
//! layers that contributed, and can be persisted as a snapshot.

use chrono::{DateTime, Utc};
use resref_config::{MergeConflict, ResourceRefConfig, ResourceRefConfigList};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::layer::{ConfigError, DescriptorLayer, LayerOrigin};
use crate::injection::{InjectionError, ResourceProcessor};

/// Schema version for effective_refs
pub const SCHEMA_VERSION: u32 = 1;

/// Schema identifier
pub const SCHEMA_ID: &str = "resref/effective_refs@1";

/// A contributing layer with provenance
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LayerSource {
    /// Merge index of this layer
    pub index: i32,

    pub origin: LayerOrigin,

    /// File path (None for in-memory layers)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// SHA-256 digest of raw file bytes (None for in-memory layers)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

/// Resolved resource references with full provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveRefs {
    /// Schema version
    pub schema_version: u32,

    /// Schema identifier
    pub schema_id: String,

    /// When this set was computed
    pub created_at: DateTime<Utc>,

    /// Contributing layers in merge order
    pub sources: Vec<LayerSource>,

    /// The merged references in order of first declaration
    pub references: ResourceRefConfigList,

    /// SHA-256 of the canonical (RFC 8785) JSON of `references`
    pub snapshot_digest: String,
}

impl EffectiveRefs {
    /// Load layer files in the order given.
    pub fn load_layers(paths: &[PathBuf]) -> Result<Vec<DescriptorLayer>, ConfigError> {
        paths.iter().map(|p| DescriptorLayer::load(p)).collect()
    }

    /// Merge layers into the effective set.
    ///
    /// Layers are ordered by origin (annotation, descriptor, binding),
    /// keeping the given order within one origin; the resulting position is
    /// the merge index reported in conflicts. Every conflicting reference is
    /// reported, not just the first.
    pub fn build(mut layers: Vec<DescriptorLayer>) -> Result<Self, ResolveError> {
        layers.sort_by_key(|layer| layer.origin);

        let sources: Vec<LayerSource> = layers
            .iter()
            .enumerate()
            .map(|(i, layer)| LayerSource {
                index: i32::try_from(i).unwrap_or(i32::MAX),
                origin: layer.origin,
                path: layer.path.clone(),
                digest: layer.digest.clone(),
            })
            .collect();

        let mut names: Vec<&str> = Vec::new();
        for config in layers.iter().flat_map(|layer| layer.refs()) {
            if !names.contains(&config.name()) {
                names.push(config.name());
            }
        }

        let mut processor = ResourceProcessor::new();
        let mut failures = Vec::new();
        for name in names {
            let partials: Vec<Option<&ResourceRefConfig>> =
                layers.iter().map(|layer| layer.find(name)).collect();
            if let Err(e) = processor.resolve(name, &partials) {
                failures.push(e);
            }
        }
        if !failures.is_empty() {
            return Err(ResolveError::Conflicts(failures));
        }

        let references = processor.into_refs();
        let snapshot_digest = Self::compute_digest(&references)?;
        tracing::info!(
            layers = sources.len(),
            references = references.len(),
            digest = %snapshot_digest,
            "resolved resource references"
        );

        Ok(Self {
            schema_version: SCHEMA_VERSION,
            schema_id: SCHEMA_ID.to_string(),
            created_at: Utc::now(),
            sources,
            references,
            snapshot_digest,
        })
    }

    /// SHA-256 hex digest of the canonical JSON of `references`.
    pub fn compute_digest(references: &ResourceRefConfigList) -> Result<String, ConfigError> {
        let jcs_bytes = serde_json_canonicalizer::to_vec(references)
            .map_err(|e| ConfigError::ParseError(format!("JCS error: {}", e)))?;

        let mut hasher = Sha256::new();
        hasher.update(&jcs_bytes);
        Ok(hex::encode(hasher.finalize()))
    }

    pub fn get(&self, name: &str) -> Option<&ResourceRefConfig> {
        self.references.find_by_name(name)
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write to file
    pub fn write_to_file(&self, path: &Path) -> io::Result<()> {
        let json = self.to_json().map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("JSON serialization failed: {}", e),
            )
        })?;
        fs::write(path, json)
    }

    /// Read a snapshot written by [`write_to_file`](Self::write_to_file).
    ///
    /// The schema and the snapshot digest are checked.
    pub fn read_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(format!("{}: {}", path.display(), e)))?;
        let snapshot: Self = serde_json::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(format!("JSON parse error: {}", e)))?;

        if snapshot.schema_id != SCHEMA_ID || snapshot.schema_version != SCHEMA_VERSION {
            return Err(ConfigError::ValidationError(format!(
                "unsupported snapshot schema {}@{}",
                snapshot.schema_id, snapshot.schema_version
            )));
        }
        let digest = Self::compute_digest(&snapshot.references)?;
        if digest != snapshot.snapshot_digest {
            return Err(ConfigError::ValidationError(format!(
                "snapshot digest mismatch: recorded {}, computed {}",
                snapshot.snapshot_digest, digest
            )));
        }
        Ok(snapshot)
    }
}

/// Strictly compare same-named references of two layers.
///
/// `left` is the receiver (index -1), `right` the compared source (index 0).
/// References present in only one layer are skipped.
pub fn compare_layers(
    left: &DescriptorLayer,
    right: &DescriptorLayer,
    name: Option<&str>,
) -> Vec<(String, Vec<MergeConflict>)> {
    left.refs()
        .iter()
        .filter(|config| name.map_or(true, |n| config.name() == n))
        .filter_map(|config| {
            let Some(other) = right.find(config.name()) else {
                tracing::debug!(name = config.name(), "reference missing from right layer");
                return None;
            };
            let conflicts = config.compare_bindings_and_extensions(other);
            (!conflicts.is_empty()).then(|| (config.name().to_string(), conflicts))
        })
        .collect()
}

/// Errors building the effective set
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{} conflicting resource reference(s):\n{}", .0.len(), join_errors(.0))]
    Conflicts(Vec<InjectionError>),
}

fn join_errors(errors: &[InjectionError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use resref_config::IsolationLevel;
    use tempfile::TempDir;

    fn layer(origin: LayerOrigin, configs: Vec<ResourceRefConfig>) -> DescriptorLayer {
        DescriptorLayer::new(origin, configs).unwrap()
    }

    fn bound(name: &str, jndi: &str) -> ResourceRefConfig {
        let mut config = ResourceRefConfig::new(name);
        config.set_jndi_name(Some(jndi.to_string()));
        config
    }

    fn single_binding(jndi: &str) -> EffectiveRefs {
        EffectiveRefs::build(vec![layer(LayerOrigin::Binding, vec![bound("jdbc/a", jndi)])])
            .unwrap()
    }

    #[test]
    fn test_build_merges_across_layers() {
        let mut ext = ResourceRefConfig::new("jdbc/ds");
        ext.set_isolation_level(Some(IsolationLevel::ReadCommitted));

        let effective = EffectiveRefs::build(vec![
            layer(LayerOrigin::Binding, vec![bound("jdbc/ds", "jdbc/real")]),
            layer(LayerOrigin::Descriptor, vec![ext]),
        ])
        .unwrap();

        let config = effective.get("jdbc/ds").unwrap();
        assert_eq!(config.jndi_name(), Some("jdbc/real"));
        assert_eq!(config.isolation_level(), Some(IsolationLevel::ReadCommitted));
        assert_eq!(effective.sources[0].origin, LayerOrigin::Descriptor);
        assert_eq!(effective.sources[1].origin, LayerOrigin::Binding);
        assert_eq!(effective.snapshot_digest.len(), 64);
    }

    #[test]
    fn test_build_reports_every_conflicting_reference() {
        let result = EffectiveRefs::build(vec![
            layer(
                LayerOrigin::Descriptor,
                vec![bound("jdbc/a", "x"), bound("jdbc/b", "x"), bound("jdbc/c", "x")],
            ),
            layer(
                LayerOrigin::Binding,
                vec![bound("jdbc/a", "y"), bound("jdbc/b", "x"), bound("jdbc/c", "z")],
            ),
        ]);

        match result {
            Err(ResolveError::Conflicts(errors)) => {
                let names: Vec<&str> = errors.iter().map(|e| e.reference_name()).collect();
                assert_eq!(names, vec!["jdbc/a", "jdbc/c"]);
            }
            other => panic!("expected conflicts, got {:?}", other),
        }
    }

    #[test]
    fn test_digest_is_content_sensitive() {
        let one = single_binding("x");
        let two = single_binding("x");
        let three = single_binding("y");
        assert_eq!(one.snapshot_digest, two.snapshot_digest);
        assert_ne!(one.snapshot_digest, three.snapshot_digest);
    }

    #[test]
    fn test_snapshot_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("effective_refs.json");
        let effective = single_binding("x");
        effective.write_to_file(&path).unwrap();

        let restored = EffectiveRefs::read_from_file(&path).unwrap();
        assert_eq!(restored.references, effective.references);
        assert_eq!(restored.snapshot_digest, effective.snapshot_digest);
    }

    #[test]
    fn test_snapshot_tamper_detected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("effective_refs.json");
        let effective = single_binding("x");
        effective.write_to_file(&path).unwrap();

        let tampered = fs::read_to_string(&path).unwrap().replace("\"x\"", "\"y\"");
        fs::write(&path, tampered).unwrap();

        let result = EffectiveRefs::read_from_file(&path);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_compare_layers() {
        let left = layer(
            LayerOrigin::Descriptor,
            vec![bound("jdbc/a", "x"), bound("jdbc/b", "x")],
        );
        let right = layer(
            LayerOrigin::Descriptor,
            vec![bound("jdbc/a", "x"), bound("jdbc/b", "y")],
        );

        let all = compare_layers(&left, &right, None);
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].0, "jdbc/b");
        assert_eq!(all[0].1[0].to_string(), "binding-name: [-1]=x != [0]=y");

        assert!(compare_layers(&left, &right, Some("jdbc/a")).is_empty());
    }
}

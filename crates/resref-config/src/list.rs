//! Ordered collection of resource reference configurations keyed by name.

use crate::config::ResourceRefConfig;
use serde::{Deserialize, Serialize};

/// Resource reference configurations of one component, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceRefConfigList {
    configs: Vec<ResourceRefConfig>,
}

impl ResourceRefConfigList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ResourceRefConfig> {
        self.configs.get(index)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&ResourceRefConfig> {
        self.configs.iter().find(|c| c.name() == name)
    }

    pub fn find_by_name_mut(&mut self, name: &str) -> Option<&mut ResourceRefConfig> {
        self.configs.iter_mut().find(|c| c.name() == name)
    }

    /// Find the configuration for `name`, appending a new one if absent.
    pub fn find_or_add_by_name(&mut self, name: &str) -> &mut ResourceRefConfig {
        let index = match self.configs.iter().position(|c| c.name() == name) {
            Some(index) => index,
            None => {
                self.configs.push(ResourceRefConfig::new(name));
                self.configs.len() - 1
            }
        };
        &mut self.configs[index]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ResourceRefConfig> {
        self.configs.iter()
    }
}

impl<'a> IntoIterator for &'a ResourceRefConfigList {
    type Item = &'a ResourceRefConfig;
    type IntoIter = std::slice::Iter<'a, ResourceRefConfig>;

    fn into_iter(self) -> Self::IntoIter {
        self.configs.iter()
    }
}

//! Layered resource reference resolution
//!
//! Partial configurations are merged in layer order:
//! 1. Annotation scan results
//! 2. Deployment descriptors
//! 3. Binding and extension overrides
//!
//! Within each attribute the first layer that supplies a value wins; a later
//! layer supplying a different value is a conflict.

mod effective;
mod layer;

pub use effective::{
    compare_layers, EffectiveRefs, LayerSource, ResolveError, SCHEMA_ID, SCHEMA_VERSION,
};
pub use layer::{ConfigError, DescriptorLayer, LayerOrigin};

//! Resource reference resolution
//!
//! Resolves resource references declared across annotation, deployment
//! descriptor and binding layers into one configuration per reference name,
//! failing deployment of any reference whose layers disagree.

pub mod config;
pub mod injection;

pub use config::{ConfigError, DescriptorLayer, EffectiveRefs, LayerOrigin, ResolveError};
pub use injection::{
    InjectionError, ResourceAnnotation, ResourceInjectionBinding, ResourceProcessor,
};
pub use resref_config::{
    BranchCoupling, IsolationLevel, LoginProperty, MergeConflict, MergeMode, ResAuth,
    ResourceRefConfig, ResourceRefConfigList, SharingScope,
};

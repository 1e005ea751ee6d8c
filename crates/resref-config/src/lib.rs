//! Resource reference configuration and binding/extension merging.
//!
//! A resource reference may be declared by annotations, deployment
//! descriptors and binding/extension files. Each declaration is a partial
//! [`ResourceRefConfig`]; the merge engine folds them into one configuration
//! and reports every attribute on which two sources disagree as a
//! [`MergeConflict`].

mod attribute;
mod config;
mod conflict;
mod list;
mod merge;
mod values;

pub use attribute::{merge_attribute, MergeMode, Resolved, CARRIED_IN_INDEX};
pub use config::{LoginProperty, ResourceRefConfig};
pub use conflict::MergeConflict;
pub use list::ResourceRefConfigList;
pub use merge::{
    login_property_attribute_name, merge, Attribute, MergeOutcome, LOGIN_PROPERTY_ATTRIBUTE_PREFIX,
};
pub use values::{
    render, AttributeValue, BranchCoupling, IsolationLevel, RawSymbol, ResAuth, SharingScope,
    ValueError, BRANCH_COUPLING_UNSET,
};

//! Resource injection processing
//!
//! The consumer side of the merge engine:
//! - `ResourceProcessor` applies `@Resource` declarations and resolves
//!   partial configurations per reference name
//! - `ResourceInjectionBinding::merge_saved` validates that two components
//!   declaring the same reference agree

mod binding;
mod error;
mod processor;

pub use binding::ResourceInjectionBinding;
pub use error::{format_conflicts, InjectionError};
pub use processor::{ResourceAnnotation, ResourceProcessor};

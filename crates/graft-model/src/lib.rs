// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Abstract model for the graft binding-graph resolver.
//!
//! This crate holds the facts the front-end collaborator produces: keys,
//! dependency requests, declared bindings, and module/component descriptors.
//! It contains no resolution policy; that lives in `graft-resolve`.

pub mod binding;
pub mod component;
pub mod foundation;
pub mod key;

pub use binding::{
    Binding, BindingType, ContributionKind, MembersInjectionBinding, ProductionBinding,
    ProvisionBinding,
};
pub use component::{ComponentDescriptor, ModuleDescriptor};
pub use foundation::{Element, Qualifier, Scope, Span, TypeRef};
pub use key::{BindingKey, BindingKeyKind, DependencyRequest, FrameworkWrapper, Key, RequestKind};

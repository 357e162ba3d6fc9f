//! Foundation value types shared across the model.

mod span;
mod types;

pub use span::{Element, Span};
pub use types::{Qualifier, Scope, TypeRef};

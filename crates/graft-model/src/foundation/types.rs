//! Type references, qualifiers, and scope annotations.
//!
//! These are the identity-bearing value types the front-end resolves from
//! source. Equality is structural everywhere: two requests name the same
//! dependency iff their types, qualifiers, and wrappers compare equal.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A structural reference to a type, possibly generic.
///
/// `TypeRef` is the resolver's stand-in for the host compiler's type mirror.
/// It supports exactly what graph resolution needs: structural equality,
/// hashing, and display.
///
/// # Examples
///
/// ```
/// # use graft_model::foundation::TypeRef;
/// let set = TypeRef::generic("Set", vec![TypeRef::named("Handler")]);
/// assert_eq!(set.to_string(), "Set<Handler>");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeRef {
    name: String,
    arguments: Vec<TypeRef>,
}

impl TypeRef {
    /// A non-generic type.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
        }
    }

    /// A generic type applied to arguments.
    pub fn generic(name: impl Into<String>, arguments: Vec<TypeRef>) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }

    /// The raw (unapplied) type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Generic arguments, empty for non-generic types.
    pub fn arguments(&self) -> &[TypeRef] {
        &self.arguments
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.arguments.is_empty() {
            write!(f, "<")?;
            for (i, arg) in self.arguments.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{arg}")?;
            }
            write!(f, ">")?;
        }
        Ok(())
    }
}

impl From<&str> for TypeRef {
    fn from(s: &str) -> Self {
        Self::named(s)
    }
}

/// A qualifier annotation distinguishing otherwise identical types.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Qualifier(String);

impl Qualifier {
    /// Creates a qualifier with the given annotation name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The annotation name.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Qualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

/// A scope annotation constraining instance lifetime.
///
/// One scope per hierarchy may be designated the *root*: the broadest
/// lifetime, terminating every scoped-dependency chain. A root-scoped
/// component may not depend on any other scoped component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scope {
    name: String,
    root: bool,
}

impl Scope {
    /// An ordinary scope annotation.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            root: false,
        }
    }

    /// The designated broadest scope of the hierarchy.
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            root: true,
        }
    }

    /// The annotation name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this is the designated broadest scope.
    pub fn is_root(&self) -> bool {
        self.root
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.name)
    }
}

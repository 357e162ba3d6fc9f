//! Keys and dependency requests.
//!
//! A [`Key`] identifies *what is requested*: a type, an optional qualifier,
//! and an optional framework wrapper. A [`DependencyRequest`] is an edge in
//! the graph: a key plus how the requesting site wants it delivered and where
//! that site is. [`BindingKey`] folds the request kind down to the two ways a
//! key can be satisfied: by producing a value, or by injecting the members of
//! an existing instance.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::foundation::{Element, Qualifier, TypeRef};

/// The framework type wrapping a requested value, if any.
///
/// A bare key requests an eager value; wrapped keys request the deferred or
/// repeated-access forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FrameworkWrapper {
    /// `Provider<T>`: repeated on-demand provision.
    Provider,
    /// `Lazy<T>`: deferred, memoized provision.
    Lazy,
    /// `Producer<T>`: asynchronous production.
    Producer,
}

impl fmt::Display for FrameworkWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameworkWrapper::Provider => write!(f, "Provider"),
            FrameworkWrapper::Lazy => write!(f, "Lazy"),
            FrameworkWrapper::Producer => write!(f, "Producer"),
        }
    }
}

/// Identity of a requestable dependency.
///
/// Equality and hashing are structural; two requests are the same dependency
/// iff their keys are equal. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Key {
    qualifier: Option<Qualifier>,
    ty: TypeRef,
    wrapper: Option<FrameworkWrapper>,
}

impl Key {
    /// An unqualified, unwrapped key for a type.
    pub fn for_type(ty: TypeRef) -> Self {
        Self {
            qualifier: None,
            ty,
            wrapper: None,
        }
    }

    /// A qualified key.
    pub fn qualified(qualifier: Qualifier, ty: TypeRef) -> Self {
        Self {
            qualifier: Some(qualifier),
            ty,
            wrapper: None,
        }
    }

    /// Returns this key with a framework wrapper applied.
    pub fn wrapped(mut self, wrapper: FrameworkWrapper) -> Self {
        self.wrapper = Some(wrapper);
        self
    }

    /// The qualifier, if any.
    pub fn qualifier(&self) -> Option<&Qualifier> {
        self.qualifier.as_ref()
    }

    /// The requested type.
    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    /// The framework wrapper, if any.
    pub fn wrapper(&self) -> Option<FrameworkWrapper> {
        self.wrapper
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(q) = &self.qualifier {
            write!(f, "{q} ")?;
        }
        match self.wrapper {
            Some(w) => write!(f, "{w}<{}>", self.ty),
            None => write!(f, "{}", self.ty),
        }
    }
}

/// How a requesting site wants its dependency delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestKind {
    /// An eager instance.
    Instance,
    /// A deferred, memoized supplier.
    Lazy,
    /// A repeated-access provider.
    Provider,
    /// An asynchronous producer.
    Producer,
    /// Injection of the members of an already-constructed instance.
    MembersInjection,
}

/// The two ways a key can be satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BindingKeyKind {
    /// Produce a value (possibly one of many feeding a collection).
    Contribution,
    /// Populate the members of an existing instance.
    MembersInjection,
}

/// A [`Key`] tagged with how it must be satisfied.
///
/// Contribution and members-injection requests for the same type are distinct
/// graph nodes: they resolve to different bindings and are validated under
/// different cardinality rules.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BindingKey {
    kind: BindingKeyKind,
    key: Key,
}

impl BindingKey {
    /// Creates a binding key.
    pub fn new(kind: BindingKeyKind, key: Key) -> Self {
        Self { kind, key }
    }

    /// A contribution binding key.
    pub fn contribution(key: Key) -> Self {
        Self::new(BindingKeyKind::Contribution, key)
    }

    /// A members-injection binding key.
    pub fn members_injection(key: Key) -> Self {
        Self::new(BindingKeyKind::MembersInjection, key)
    }

    /// The binding key a request resolves through.
    pub fn for_request(request: &DependencyRequest) -> Self {
        let kind = match request.kind() {
            RequestKind::MembersInjection => BindingKeyKind::MembersInjection,
            _ => BindingKeyKind::Contribution,
        };
        Self::new(kind, request.key().clone())
    }

    /// Which satisfaction kind this key demands.
    pub fn kind(&self) -> BindingKeyKind {
        self.kind
    }

    /// The underlying key.
    pub fn key(&self) -> &Key {
        &self.key
    }
}

impl fmt::Display for BindingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            BindingKeyKind::Contribution => write!(f, "{}", self.key),
            BindingKeyKind::MembersInjection => write!(f, "members of {}", self.key),
        }
    }
}

/// An edge descriptor: one site's request for one key.
///
/// The site is used only for diagnostics; it never affects resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyRequest {
    key: Key,
    kind: RequestKind,
    site: Element,
}

impl DependencyRequest {
    /// Creates a request.
    pub fn new(key: Key, kind: RequestKind, site: Element) -> Self {
        Self { key, kind, site }
    }

    /// The requested key.
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// How the site wants the dependency delivered.
    pub fn kind(&self) -> RequestKind {
        self.kind
    }

    /// The syntactic site that issued the request.
    pub fn site(&self) -> &Element {
        &self.site
    }
}

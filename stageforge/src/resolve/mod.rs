//! Target and argument resolution.
//!
//! The [`Resolver`] turns a canonical stage into a [`BoundCallable`] and
//! binds the stage's arguments against the callable's signature. Both steps
//! read names through a [`Scope`]: host attributes first, then the store.

mod arguments;
mod target;

pub use arguments::{bind, ArgumentMode};
pub use target::{BoundCallable, Resolver};

use crate::core::{SharedObject, Value};
use crate::pipeline::AttributeStore;

/// Read-only view of the names visible to a stage.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    host: Option<&'a SharedObject>,
    store: &'a AttributeStore,
}

impl<'a> Scope<'a> {
    /// Creates a scope over an optional host and a store.
    #[must_use]
    pub const fn new(host: Option<&'a SharedObject>, store: &'a AttributeStore) -> Self {
        Self { host, store }
    }

    /// Returns the host, if one is set.
    #[must_use]
    pub const fn host(&self) -> Option<&'a SharedObject> {
        self.host
    }

    /// Looks a name up on the host, then in the store.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<Value> {
        self.host
            .and_then(|host| host.attribute(name))
            .or_else(|| self.store.get(name).cloned())
    }
}

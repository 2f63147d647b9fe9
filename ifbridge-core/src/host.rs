//! Host object abstraction.
//!
//! A host object implements the business logic behind one interface.
//! Generated bridges reach it through [`HostObject::invoke`] and listen to
//! its signals through [`HostObject::connect`].

use crate::error::HostError;
use crate::variant::Variant;
use std::collections::HashMap;
use std::sync::Arc;

/// Callback attached to a host signal. Receives the signal arguments in
/// declaration order.
pub type Slot = Box<dyn Fn(&[Variant]) + Send + Sync>;

/// Endpoint implementing one interface.
pub trait HostObject: Send + Sync {
    /// Performs one blocking call. `args` is the packed request map and the
    /// returned value is expected to be a [`Variant::Map`].
    ///
    /// # Errors
    /// Returns `HostError` if the method is unknown or fails.
    fn invoke(&self, method: &str, args: Variant) -> Result<Variant, HostError>;

    /// Attaches a slot to the named signal.
    fn connect(&self, signal: &str, slot: Slot);
}

/// Name-based lookup of host sub-objects.
pub trait HostTree {
    /// Returns the host object registered under `name`.
    fn find_child(&self, name: &str) -> Option<Arc<dyn HostObject>>;
}

/// [`HostTree`] backed by a map of interface names.
#[derive(Default)]
pub struct HostDirectory {
    children: HashMap<String, Arc<dyn HostObject>>,
}

impl HostDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a host object under `name`, replacing any previous one.
    pub fn insert(&mut self, name: impl Into<String>, host: Arc<dyn HostObject>) {
        self.children.insert(name.into(), host);
    }

    /// Builder form of [`HostDirectory::insert`].
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, host: Arc<dyn HostObject>) -> Self {
        self.insert(name, host);
        self
    }

    /// Returns the number of registered host objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Returns true if no host object is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl HostTree for HostDirectory {
    fn find_child(&self, name: &str) -> Option<Arc<dyn HostObject>> {
        self.children.get(name).cloned()
    }
}

//! Process-wide registry of wire types.
//!
//! Generated code registers every struct together with its optional, array
//! and optional-array forms before the first bridge is constructed. Hosts
//! can then look up the wire name of any type they are handed.

use crate::marshal::Marshal;
use parking_lot::RwLock;
use std::any::TypeId;
use std::collections::BTreeMap;

static REGISTRY: RwLock<BTreeMap<TypeId, &'static str>> = RwLock::new(BTreeMap::new());

/// Registers `T` under its wire name.
///
/// # Returns
/// `true` if the type was not registered before.
pub fn register<T: Marshal + 'static>(name: &'static str) -> bool {
    let previous = REGISTRY.write().insert(TypeId::of::<T>(), name);
    if previous.is_none() {
        tracing::trace!(name, "registered wire type");
    }
    previous.is_none()
}

/// Returns the wire name `T` was registered under.
#[must_use]
pub fn lookup<T: 'static>() -> Option<&'static str> {
    REGISTRY.read().get(&TypeId::of::<T>()).copied()
}

/// Returns true if `T` has been registered.
#[must_use]
pub fn is_registered<T: 'static>() -> bool {
    REGISTRY.read().contains_key(&TypeId::of::<T>())
}

/// Returns the number of registered types.
#[must_use]
pub fn registered_count() -> usize {
    REGISTRY.read().len()
}

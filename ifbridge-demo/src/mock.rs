//! In-memory host object.

use ifbridge_core::{HostError, HostObject, Slot, Variant};
use parking_lot::Mutex;
use std::collections::HashMap;

/// Host object that answers calls from canned replies and fires signals
/// on demand.
#[derive(Default)]
pub struct MockHost {
    replies: Mutex<HashMap<String, Result<Variant, HostError>>>,
    calls: Mutex<Vec<(String, Variant)>>,
    slots: Mutex<HashMap<String, Vec<Slot>>>,
}

impl MockHost {
    /// Creates a host with no replies and no connections.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the reply returned for `method`.
    pub fn reply(&self, method: &str, value: Variant) {
        self.replies.lock().insert(method.to_string(), Ok(value));
    }

    /// Makes calls to `method` fail.
    pub fn fail(&self, method: &str, error: HostError) {
        self.replies.lock().insert(method.to_string(), Err(error));
    }

    /// Returns every call received so far, with its arguments.
    #[must_use]
    pub fn calls(&self) -> Vec<(String, Variant)> {
        self.calls.lock().clone()
    }

    /// Returns the number of slots attached to `signal`.
    #[must_use]
    pub fn connected(&self, signal: &str) -> usize {
        self.slots.lock().get(signal).map_or(0, Vec::len)
    }

    /// Delivers `args` to every slot attached to `signal`.
    ///
    /// # Returns
    /// The number of slots invoked.
    pub fn fire(&self, signal: &str, args: &[Variant]) -> usize {
        let slots = self.slots.lock();
        let Some(slots) = slots.get(signal) else {
            return 0;
        };
        for slot in slots {
            slot(args);
        }
        slots.len()
    }
}

impl HostObject for MockHost {
    fn invoke(&self, method: &str, args: Variant) -> Result<Variant, HostError> {
        self.calls.lock().push((method.to_string(), args));
        self.replies
            .lock()
            .get(method)
            .cloned()
            .unwrap_or_else(|| Err(HostError::unknown_method(method)))
    }

    fn connect(&self, signal: &str, slot: Slot) {
        self.slots
            .lock()
            .entry(signal.to_string())
            .or_default()
            .push(slot);
    }
}

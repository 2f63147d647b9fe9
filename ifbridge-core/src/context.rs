//! Shared bridging context.
//!
//! Every generated bridge holds a clone of one [`BridgeContext`]. It carries
//! the error channel that call failures are raised on and the sender that
//! translated notifications are emitted on.

use crate::error::{BridgeError, DecodeError};
use crate::host::HostObject;
use crate::variant::{Variant, VariantMap};
use crossbeam_channel::{Receiver, Sender, unbounded};
use parking_lot::Mutex;
use std::sync::Arc;

/// Receiver of remote call failures.
pub trait ErrorSink: Send + Sync {
    /// Called once per failed bridge call.
    fn raise(&self, error: &BridgeError);
}

/// Sink that logs each error at warn level and keeps nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogErrorSink;

impl ErrorSink for LogErrorSink {
    fn raise(&self, error: &BridgeError) {
        tracing::warn!(%error, "remote call failed");
    }
}

/// Sink that records raised errors in order.
#[derive(Debug, Default)]
pub struct CollectingErrorSink {
    errors: Mutex<Vec<BridgeError>>,
}

impl CollectingErrorSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns every recorded error.
    pub fn take(&self) -> Vec<BridgeError> {
        std::mem::take(&mut *self.errors.lock())
    }

    /// Returns the number of recorded errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.lock().len()
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.lock().is_empty()
    }
}

impl ErrorSink for CollectingErrorSink {
    fn raise(&self, error: &BridgeError) {
        self.errors.lock().push(error.clone());
    }
}

/// Error channel plus event sender shared by all bridges of one aggregate.
pub struct BridgeContext<E> {
    inner: Arc<ContextInner<E>>,
}

struct ContextInner<E> {
    errors: Arc<dyn ErrorSink>,
    events: Sender<E>,
}

impl<E> Clone for BridgeContext<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E: Send> BridgeContext<E> {
    /// Creates a context around an existing event sender.
    #[must_use]
    pub fn new(errors: Arc<dyn ErrorSink>, events: Sender<E>) -> Self {
        Self {
            inner: Arc::new(ContextInner { errors, events }),
        }
    }

    /// Creates a context with an unbounded event channel.
    ///
    /// # Returns
    /// The context and the receiving end of its event stream.
    #[must_use]
    pub fn unbounded(errors: Arc<dyn ErrorSink>) -> (Self, Receiver<E>) {
        let (sender, receiver) = unbounded();
        (Self::new(errors, sender), receiver)
    }

    /// Performs the single blocking round trip of a call bridge.
    ///
    /// # Arguments
    /// * `interface` - Interface name, used in diagnostics
    /// * `host` - Bound host object, if any
    /// * `method` - External method name
    /// * `args` - Packed request fields
    ///
    /// # Errors
    /// Returns `BridgeError` if no host is bound or the host call fails.
    pub fn invoke(
        &self,
        interface: &str,
        host: Option<&dyn HostObject>,
        method: &str,
        args: VariantMap,
    ) -> Result<Variant, BridgeError> {
        let Some(host) = host else {
            return Err(BridgeError::host_not_bound(interface));
        };
        tracing::trace!(interface, method, fields = args.len(), "invoking host");
        host.invoke(method, Variant::Map(args))
            .map_err(|err| BridgeError::call_failed(format!("{interface}.{method}"), err))
    }

    /// Reports a failed call on the error channel.
    pub fn raise(&self, error: BridgeError) {
        tracing::debug!(%error, "raising call failure");
        self.inner.errors.raise(&error);
    }

    /// Emits a translated event.
    pub fn emit(&self, event: E) {
        if self.inner.events.send(event).is_err() {
            tracing::debug!("event receiver dropped, discarding event");
        }
    }

    /// Records that a notification was dropped because a parameter could
    /// not be decoded.
    pub fn drop_event(&self, interface: &str, notification: &str, param: &str, error: DecodeError) {
        tracing::warn!(interface, notification, param, %error, "dropping notification");
    }

    /// Records that a host signal fired with arguments of the wrong shape.
    pub fn signal_mismatch(&self, interface: &str, signal: &str, args: &[Variant]) {
        tracing::warn!(
            interface,
            signal,
            arity = args.len(),
            "host signal arguments do not match the declared parameters"
        );
    }

    /// Records that no host object was found for an interface.
    pub fn host_missing(&self, interface: &str) {
        tracing::warn!(interface, "no host object found for interface");
    }
}

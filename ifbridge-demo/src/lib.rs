//! # ifbridge demo
//!
//! Bridges generated by the build script from `schema/hmi_api.xml`, plus an
//! in-memory host to drive them.
//!
//! ```ignore
//! let (context, events) = BridgeContext::unbounded(Arc::new(LogErrorSink));
//! let mut bridges = ApiBridges::new(context);
//! bridges.bind(&HostDirectory::new().with("UI", Arc::new(MockHost::new())));
//! ```

pub mod mock;

/// Generated HMI bridges.
pub mod hmi {
    include!(concat!(env!("OUT_DIR"), "/bridge_types.rs"));
    include!(concat!(env!("OUT_DIR"), "/bridge_impl.rs"));
}

pub use hmi::{ApiBridges, ApiEvent};
pub use mock::MockHost;

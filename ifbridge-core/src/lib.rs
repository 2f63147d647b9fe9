//! # ifbridge Core
//!
//! Runtime support referenced by code that `ifbridge-codegen` generates.
//!
//! This crate provides:
//! - [`Variant`], the generic wire container
//! - [`Marshal`], typed conversion to and from the wire container
//! - [`HostObject`] and [`HostTree`], the host binding seam
//! - [`BridgeContext`], the shared error channel and event sender
//! - [`registry`], the process-wide wire type registry

pub mod context;
pub mod error;
pub mod host;
pub mod marshal;
pub mod registry;
pub mod variant;

pub use context::{BridgeContext, CollectingErrorSink, ErrorSink, LogErrorSink};
pub use error::{BridgeError, DecodeError, HostError};
pub use host::{HostDirectory, HostObject, HostTree, Slot};
pub use marshal::Marshal;
pub use variant::{FromNative, Variant, VariantKind, VariantMap, native_arg};

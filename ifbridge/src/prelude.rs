//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and traits.
//!
//! ```ignore
//! use ifbridge::prelude::*;
//! ```

// Runtime types
pub use ifbridge_core::{
    BridgeContext, CollectingErrorSink, ErrorSink, HostDirectory, HostObject, HostTree,
    LogErrorSink, Slot,
};
pub use ifbridge_core::{BridgeError, DecodeError, HostError};
pub use ifbridge_core::{FromNative, Marshal, Variant, VariantKind, VariantMap, native_arg};

// Generator types
pub use ifbridge_codegen::{CodegenError, GeneratedCode, GeneratorConfig};
pub use ifbridge_schema::{InterfaceIr, Schema, SchemaError, parse_schema};

//! # ifbridge
//!
//! Interface-definition compiler for typed host bridges.
//!
//! An interface schema describes methods (request/response pairs),
//! notifications, structs and enums. The generator turns it into Rust code
//! that marshals structs to and from a generic wire container and bridges
//! calls and events between typed callers and a host object.
//!
//! ## Quick Start
//!
//! ```ignore
//! // build.rs
//! let config = ifbridge::codegen::GeneratorConfig::default()
//!     .with_runtime_crate("ifbridge::core");
//! ifbridge::codegen::build::generate_to_out_dir("schema/api.xml", &config)?;
//!
//! // lib.rs
//! pub mod api {
//!     include!(concat!(env!("OUT_DIR"), "/bridge_types.rs"));
//!     include!(concat!(env!("OUT_DIR"), "/bridge_impl.rs"));
//! }
//!
//! let (context, events) = BridgeContext::unbounded(Arc::new(LogErrorSink));
//! let mut bridges = api::ApiBridges::new(context);
//! bridges.bind(&host_tree);
//! ```
//!
//! ## Crate Organization
//!
//! - [`core`] - Wire container, marshaling traits and bridge runtime
//! - [`schema`] - XML schema parsing, validation and type resolution
//! - [`codegen`] - Rust code generation from schemas

pub mod prelude;

/// Runtime support referenced by generated code.
pub mod core {
    pub use ifbridge_core::*;
}

/// Schema parsing and validation.
pub mod schema {
    pub use ifbridge_schema::*;
}

/// Code generation from interface schemas.
pub mod codegen {
    pub use ifbridge_codegen::*;
}

// Re-export commonly used items at the crate root
pub use ifbridge_codegen::{GeneratedCode, GeneratorConfig, generate_from_file, generate_from_xml};
pub use ifbridge_core::{
    BridgeContext, BridgeError, DecodeError, HostObject, HostTree, Marshal, Variant, VariantMap,
};

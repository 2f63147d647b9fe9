//! # ifbridge Schema
//!
//! Interface schema loader and type descriptors.
//!
//! This crate provides:
//! - XML parsing of interface definition files
//! - Type definitions for schema elements
//! - Schema validation
//! - Resolved descriptors (the IR) for code generation

pub mod error;
pub mod ir;
pub mod parser;
pub mod types;
pub mod validation;

pub use error::{ParseError, SchemaError};
pub use ir::{
    BaseKind, EnumDescriptor, InterfaceDescriptor, InterfaceIr, MethodDescriptor,
    NotificationDescriptor, ParamDescriptor, Resolver, StructDescriptor, TypeKey, WireType,
};
pub use parser::parse_schema;
pub use types::{
    EnumDef, EnumElement, FunctionDef, InterfaceDef, MessageType, ParamDef, Schema, StructDef,
};
pub use validation::{validate_ir, validate_schema};

//! Rust code generation modules.

pub mod assembly;
pub mod bridges;
pub mod enums;
pub mod naming;
pub mod structs;

pub use assembly::AssemblyGenerator;
pub use bridges::BridgeGenerator;
pub use enums::EnumGenerator;
pub use structs::StructGenerator;

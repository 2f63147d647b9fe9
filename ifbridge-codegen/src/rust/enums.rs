//! Enum constant generation.
//!
//! Enums travel as plain integers, so each one becomes a module of
//! `i32` constants rather than a Rust enum.

use crate::rust::naming::{const_ident, doc_comment};
use ifbridge_schema::ir::{EnumDescriptor, InterfaceIr, to_snake_case};

/// Generator for enum constant modules.
pub struct EnumGenerator<'a> {
    ir: &'a InterfaceIr,
}

impl<'a> EnumGenerator<'a> {
    /// Creates a new enum generator.
    #[must_use]
    pub fn new(ir: &'a InterfaceIr) -> Self {
        Self { ir }
    }

    /// Generates all enum modules.
    #[must_use]
    pub fn generate(&self) -> String {
        let mut output = String::new();
        for enum_desc in &self.ir.enums {
            output.push_str(&self.generate_enum(enum_desc));
        }
        output
    }

    /// Returns the module name for an enum.
    #[must_use]
    pub fn module_name(enum_desc: &EnumDescriptor) -> String {
        format!(
            "{}_{}",
            to_snake_case(&enum_desc.key.namespace),
            to_snake_case(&enum_desc.key.name)
        )
    }

    fn generate_enum(&self, enum_desc: &EnumDescriptor) -> String {
        let mut output = String::new();
        let fallback = format!("Values of the `{}` enumeration.", enum_desc.key);

        output.push_str(&doc_comment("", enum_desc.description.as_deref(), &fallback));
        output.push_str(&format!("pub mod {} {{\n", Self::module_name(enum_desc)));
        for (i, value) in enum_desc.values.iter().enumerate() {
            if i > 0 && value.description.is_some() {
                output.push('\n');
            }
            if let Some(description) = value.description.as_deref() {
                output.push_str(&doc_comment("    ", Some(description), ""));
            }
            output.push_str(&format!(
                "    pub const {}: i32 = {};\n",
                const_ident(&value.name),
                value.value
            ));
        }
        output.push_str("}\n\n");

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ifbridge_schema::parse_schema;

    #[test]
    fn test_generate_enum_module() {
        let xml = r#"<interfaces><interface name="Common">
            <enum name="Result">
                <element name="SUCCESS"/>
                <element name="INVALID_DATA" value="11">
                    <description>Data was rejected</description>
                </element>
                <element name="truncatedData"/>
            </enum>
        </interface></interfaces>"#;
        let schema = parse_schema(xml).expect("Failed to parse schema");
        let ir = InterfaceIr::from_schema(&schema).expect("Failed to resolve schema");

        let code = EnumGenerator::new(&ir).generate();
        assert!(code.contains("/// Values of the `Common.Result` enumeration.\npub mod common_result {"));
        assert!(code.contains("    pub const SUCCESS: i32 = 0;\n"));
        assert!(code.contains("    /// Data was rejected\n    pub const INVALID_DATA: i32 = 11;\n"));
        assert!(code.contains("    pub const TRUNCATED_DATA: i32 = 12;\n"));
    }
}

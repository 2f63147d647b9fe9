//! Struct declaration and marshaling generation.
//!
//! Each struct gets a plain declaration and an `rt::Marshal` impl with all
//! four routines written out. Fields reuse the `Marshal` impl of their own
//! type, so nested structs never repeat field-level logic.

use crate::rust::naming::{doc_comment, field_ident, rust_type, type_name};
use ifbridge_schema::ir::{InterfaceIr, StructDescriptor};

/// Generator for struct declarations and their marshaling impls.
pub struct StructGenerator<'a> {
    ir: &'a InterfaceIr,
}

impl<'a> StructGenerator<'a> {
    /// Creates a new struct generator.
    #[must_use]
    pub fn new(ir: &'a InterfaceIr) -> Self {
        Self { ir }
    }

    /// Generates all struct declarations.
    #[must_use]
    pub fn generate_declarations(&self) -> String {
        let mut output = String::new();
        for struct_desc in &self.ir.structs {
            output.push_str(&self.generate_declaration(struct_desc));
        }
        output
    }

    /// Generates all marshaling impls.
    #[must_use]
    pub fn generate_definitions(&self) -> String {
        let mut output = String::new();
        for struct_desc in &self.ir.structs {
            output.push_str(&self.generate_marshal_impl(struct_desc));
            output.push_str(&self.generate_from_map(struct_desc));
        }
        output
    }

    /// Generates the value type declaration.
    fn generate_declaration(&self, struct_desc: &StructDescriptor) -> String {
        let mut output = String::new();
        let fallback = format!("`{}` struct.", struct_desc.key);

        output.push_str(&doc_comment("", struct_desc.description.as_deref(), &fallback));
        output.push_str("#[derive(Debug, Clone, Default, PartialEq)]\n");
        output.push_str(&format!("pub struct {} {{\n", type_name(&struct_desc.key)));
        for field in &struct_desc.fields {
            if let Some(description) = field.description.as_deref() {
                output.push_str(&doc_comment("    ", Some(description), ""));
            }
            output.push_str(&format!(
                "    pub {}: {},\n",
                field_ident(&field.name),
                rust_type(&field.ty)
            ));
        }
        output.push_str("}\n\n");

        output
    }

    /// Generates encode, decode, put and get.
    fn generate_marshal_impl(&self, struct_desc: &StructDescriptor) -> String {
        let mut output = String::new();
        let name = type_name(&struct_desc.key);

        output.push_str(&format!("impl rt::Marshal for {name} {{\n"));

        // Encode: fields in declaration order into one map.
        output.push_str("    fn to_variant(&self) -> rt::Variant {\n");
        if struct_desc.fields.is_empty() {
            output.push_str("        rt::Variant::Map(rt::VariantMap::new())\n");
        } else {
            output.push_str("        let mut map = rt::VariantMap::new();\n");
            for field in &struct_desc.fields {
                output.push_str(&format!(
                    "        rt::Marshal::put_arg(&self.{}, &mut map, {:?});\n",
                    field_ident(&field.name),
                    field.name
                ));
            }
            output.push_str("        rt::Variant::Map(map)\n");
        }
        output.push_str("    }\n\n");

        // Decode.
        output.push_str(
            "    fn from_variant(variant: &rt::Variant) -> Result<Self, rt::DecodeError> {\n",
        );
        output.push_str("        match variant {\n");
        output.push_str("            rt::Variant::Map(map) => Self::from_wire_map(map),\n");
        output.push_str(
            "            other => Err(rt::DecodeError::mismatch(rt::VariantKind::Map, other.kind())),\n",
        );
        output.push_str("        }\n");
        output.push_str("    }\n\n");

        // Put.
        output.push_str("    fn put_arg(&self, map: &mut rt::VariantMap, name: &str) {\n");
        output.push_str("        map.insert(name.to_string(), rt::Marshal::to_variant(self));\n");
        output.push_str("    }\n\n");

        // Get: check the container kind before extracting.
        output.push_str(
            "    fn get_arg(map: &rt::VariantMap, name: &str) -> Result<Self, rt::DecodeError> {\n",
        );
        output.push_str("        match map.get(name) {\n");
        output.push_str(
            "            Some(rt::Variant::Map(fields)) => {\n                Self::from_wire_map(fields).map_err(|err| err.within(name))\n            }\n",
        );
        output.push_str(
            "            Some(other) => Err(\n                rt::DecodeError::mismatch(rt::VariantKind::Map, other.kind()).within(name),\n            ),\n",
        );
        output.push_str("            None => Err(rt::DecodeError::missing(name)),\n");
        output.push_str("        }\n");
        output.push_str("    }\n");

        output.push_str("}\n\n");

        output
    }

    /// Generates the field-by-field reader shared by decode and get.
    fn generate_from_map(&self, struct_desc: &StructDescriptor) -> String {
        let mut output = String::new();
        let name = type_name(&struct_desc.key);

        output.push_str(&format!("impl {name} {{\n"));
        output.push_str(
            "    fn from_wire_map(map: &rt::VariantMap) -> Result<Self, rt::DecodeError> {\n",
        );
        if struct_desc.fields.is_empty() {
            output.push_str("        let _ = map;\n");
            output.push_str("        Ok(Self {})\n");
        } else {
            output.push_str("        Ok(Self {\n");
            for field in &struct_desc.fields {
                output.push_str(&format!(
                    "            {}: <{} as rt::Marshal>::get_arg(map, {:?})?,\n",
                    field_ident(&field.name),
                    rust_type(&field.ty),
                    field.name
                ));
            }
            output.push_str("        })\n");
        }
        output.push_str("    }\n");
        output.push_str("}\n\n");

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ifbridge_schema::parse_schema;

    const SCHEMA: &str = r#"<interfaces><interface name="Common">
        <struct name="Coord">
            <description>Point on screen</description>
            <param name="x" type="Integer"/>
            <param name="y" type="Integer"/>
        </struct>
        <struct name="Path">
            <param name="points" type="Coord" array="true" mandatory="false">
                <description>Visited points</description>
            </param>
            <param name="type" type="String"/>
        </struct>
        <struct name="Marker"/>
    </interface></interfaces>"#;

    fn generator_output() -> (String, String) {
        let schema = parse_schema(SCHEMA).expect("Failed to parse schema");
        let ir = InterfaceIr::from_schema(&schema).expect("Failed to resolve schema");
        let generator = StructGenerator::new(&ir);
        (generator.generate_declarations(), generator.generate_definitions())
    }

    #[test]
    fn test_struct_declaration() {
        let (declarations, _) = generator_output();
        assert!(declarations.contains(
            "/// Point on screen\n#[derive(Debug, Clone, Default, PartialEq)]\npub struct CommonCoord {\n    pub x: i32,\n    pub y: i32,\n}"
        ));
        assert!(declarations.contains(
            "    /// Visited points\n    pub points: Option<Vec<CommonCoord>>,\n    pub r#type: String,\n"
        ));
        assert!(declarations.contains("/// `Common.Marker` struct.\n"));
        assert!(declarations.contains("pub struct CommonMarker {\n}"));
    }

    #[test]
    fn test_encode_in_field_order() {
        let (_, definitions) = generator_output();
        let x = definitions
            .find("rt::Marshal::put_arg(&self.x, &mut map, \"x\");")
            .expect("Missing x");
        let y = definitions
            .find("rt::Marshal::put_arg(&self.y, &mut map, \"y\");")
            .expect("Missing y");
        assert!(x < y);
    }

    #[test]
    fn test_decode_uses_field_types_and_wire_keys() {
        let (_, definitions) = generator_output();
        assert!(definitions.contains(
            "points: <Option<Vec<CommonCoord>> as rt::Marshal>::get_arg(map, \"points\")?,"
        ));
        assert!(definitions.contains("r#type: <String as rt::Marshal>::get_arg(map, \"type\")?,"));
    }

    #[test]
    fn test_get_checks_container_kind() {
        let (_, definitions) = generator_output();
        assert!(definitions.contains("Some(rt::Variant::Map(fields)) => {"));
        assert!(definitions.contains("None => Err(rt::DecodeError::missing(name)),"));
    }

    #[test]
    fn test_empty_struct() {
        let (_, definitions) = generator_output();
        assert!(definitions.contains("        rt::Variant::Map(rt::VariantMap::new())\n"));
        assert!(definitions.contains("        let _ = map;\n        Ok(Self {})\n"));
    }
}

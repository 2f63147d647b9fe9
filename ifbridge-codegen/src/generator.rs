//! Generation driver.
//!
//! Runs the individual generators over a resolved schema and collects their
//! output into the two artifacts: declarations and definitions.

use crate::CodegenError;
use crate::config::GeneratorConfig;
use crate::rust::naming::{
    decoded_ident, field_ident, out_ident, param_ident, type_name, variant_ident,
};
use crate::rust::{AssemblyGenerator, BridgeGenerator, EnumGenerator, StructGenerator};
use ifbridge_schema::ir::InterfaceIr;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const HEADER: &str = "// Generated by ifbridge-codegen. Do not edit.\n";

/// Bridge members the generator always emits.
const BRIDGE_MEMBERS: &[&str] = &["new", "set_host", "is_bound", "INTERFACE", "HOST_NAME"];

/// The two generated artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedCode {
    /// Type declarations, bridge shapes, registration guard and aggregate.
    pub declarations: String,
    /// Marshaling bodies, bridge bodies and registration body.
    pub definitions: String,
}

impl GeneratedCode {
    /// Writes both artifacts into `dir` under the configured file names.
    ///
    /// # Returns
    /// Paths of the declarations and definitions files.
    ///
    /// # Errors
    /// Returns `CodegenError::Io` if a file cannot be written.
    pub fn write_to_dir(
        &self,
        dir: &Path,
        config: &GeneratorConfig,
    ) -> Result<(PathBuf, PathBuf), CodegenError> {
        std::fs::create_dir_all(dir)?;
        let declarations = dir.join(&config.declarations_file);
        let definitions = dir.join(&config.definitions_file);
        std::fs::write(&declarations, &self.declarations)?;
        std::fs::write(&definitions, &self.definitions)?;
        tracing::info!(
            "Wrote {} and {}",
            declarations.display(),
            definitions.display()
        );
        Ok((declarations, definitions))
    }
}

/// Main code generator.
pub struct Generator<'a> {
    ir: &'a InterfaceIr,
    config: &'a GeneratorConfig,
}

impl<'a> Generator<'a> {
    /// Creates a new generator.
    #[must_use]
    pub fn new(ir: &'a InterfaceIr, config: &'a GeneratorConfig) -> Self {
        Self { ir, config }
    }

    /// Generates both artifacts.
    ///
    /// # Errors
    /// Returns `CodegenError::Config` for an invalid configuration and
    /// `CodegenError::NameCollision` if two schema elements map onto the
    /// same Rust name.
    pub fn generate(&self) -> Result<GeneratedCode, CodegenError> {
        self.config.validate()?;
        self.check_names()?;

        tracing::debug!(
            "Generating {} structs, {} enums, {} bridges",
            self.ir.structs.len(),
            self.ir.enums.len(),
            self.ir.bridged_interfaces().count()
        );

        let structs = StructGenerator::new(self.ir);
        let bridges = BridgeGenerator::new(self.ir, self.config);
        let assembly = AssemblyGenerator::new(self.ir, self.config);

        let mut declarations = String::new();
        declarations.push_str(HEADER);
        declarations.push('\n');
        declarations.push_str("#[allow(unused_imports)]\n");
        declarations.push_str(&format!("use {} as rt;\n\n", self.runtime_path()));
        declarations.push_str(&EnumGenerator::new(self.ir).generate());
        declarations.push_str(&structs.generate_declarations());
        declarations.push_str(&bridges.generate_declarations());
        declarations.push_str(&assembly.generate_declarations());

        let mut definitions = String::new();
        definitions.push_str(HEADER);
        definitions.push('\n');
        definitions.push_str(&structs.generate_definitions());
        definitions.push_str(&bridges.generate_definitions());
        definitions.push_str(&assembly.generate_definitions());

        Ok(GeneratedCode {
            declarations,
            definitions,
        })
    }

    fn runtime_path(&self) -> String {
        let path = &self.config.runtime_crate;
        if path.starts_with("::") {
            path.clone()
        } else {
            format!("::{path}")
        }
    }

    /// Checks every generated scope for names claimed twice.
    fn check_names(&self) -> Result<(), CodegenError> {
        let mut items = NameTable::default();
        items.claim("rt", "the runtime import")?;
        items.claim("WIRE_TYPES", "the registration guard")?;
        items.claim("register_wire_types", "the registration function")?;
        items.claim(self.config.bridges_type(), "the aggregate")?;
        items.claim(self.config.event_type(), "the aggregate event")?;

        for struct_desc in &self.ir.structs {
            let owner = format!("struct {}", struct_desc.key);
            items.claim(type_name(&struct_desc.key), &owner)?;

            let mut fields = NameTable::default();
            for field in &struct_desc.fields {
                fields.claim(field_ident(&field.name), format!("{owner} field {}", field.name))?;
            }
        }
        for enum_desc in &self.ir.enums {
            let owner = format!("enum {}", enum_desc.key);
            items.claim(EnumGenerator::module_name(enum_desc), &owner)?;
        }

        let mut aggregate_fields = NameTable::default();
        aggregate_fields.claim("context", "the aggregate context")?;
        let mut aggregate_variants = NameTable::default();

        for interface in self.ir.bridged_interfaces() {
            let owner = format!("interface {}", interface.name);
            items.claim(BridgeGenerator::bridge_type(interface), &owner)?;
            aggregate_fields.claim(field_ident(&interface.name), &owner)?;
            if !interface.notifications.is_empty() {
                items.claim(BridgeGenerator::event_type(interface), &owner)?;
                aggregate_variants.claim(variant_ident(&interface.name), &owner)?;
            }

            let mut members = NameTable::default();
            for member in BRIDGE_MEMBERS {
                members.claim(*member, "a bridge built-in")?;
            }
            for method in &interface.methods {
                let method_owner = format!("method {}.{}", interface.name, method.name);
                members.claim(BridgeGenerator::method_name(method), &method_owner)?;

                let mut params = NameTable::default();
                params.claim("self", "the receiver")?;
                for param in &method.request {
                    params.claim(param_ident(&param.name), format!("{method_owner} parameter {}", param.name))?;
                }
                for param in method.secondary() {
                    params.claim(
                        out_ident(&param.name),
                        format!("{method_owner} output {}", param.name),
                    )?;
                }
            }

            let mut variants = NameTable::default();
            for notification in &interface.notifications {
                let notification_owner =
                    format!("notification {}.{}", interface.name, notification.name);
                members.claim(BridgeGenerator::translator_name(notification), &notification_owner)?;
                variants.claim(variant_ident(&notification.name), &notification_owner)?;

                let mut locals = NameTable::default();
                locals.claim("context", "the bridge context")?;
                let mut fields = NameTable::default();
                for param in &notification.params {
                    let param_owner = format!("{notification_owner} parameter {}", param.name);
                    locals.claim(param_ident(&param.name), &param_owner)?;
                    if !param.ty.is_passthrough() {
                        locals.claim(decoded_ident(&param.name), &param_owner)?;
                    }
                    fields.claim(field_ident(&param.name), &param_owner)?;
                }
            }
        }

        Ok(())
    }
}

/// Rust names claimed within one scope.
#[derive(Debug, Default)]
struct NameTable {
    owners: HashMap<String, String>,
}

impl NameTable {
    fn claim(&mut self, name: impl Into<String>, owner: impl Into<String>) -> Result<(), CodegenError> {
        let name = name.into();
        let owner = owner.into();
        match self.owners.get(&name) {
            Some(first) => Err(CodegenError::NameCollision {
                name,
                first: first.clone(),
                second: owner,
            }),
            None => {
                self.owners.insert(name, owner);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ifbridge_schema::parse_schema;

    fn generate(xml: &str, config: &GeneratorConfig) -> Result<GeneratedCode, CodegenError> {
        let schema = parse_schema(xml).expect("Failed to parse schema");
        let ir = InterfaceIr::from_schema(&schema).expect("Failed to resolve schema");
        Generator::new(&ir, config).generate()
    }

    const SCHEMA: &str = r#"<interfaces><interface name="Common">
        <struct name="Coord">
            <param name="x" type="Integer"/>
            <param name="y" type="Integer"/>
        </struct>
    </interface>
    <interface name="UI">
        <function name="Show" messagetype="request">
            <param name="at" type="Common.Coord"/>
        </function>
        <function name="Show" messagetype="response"/>
    </interface></interfaces>"#;

    #[test]
    fn test_artifact_headers() {
        let code = generate(SCHEMA, &GeneratorConfig::default()).expect("Failed to generate");
        assert!(code.declarations.starts_with(HEADER));
        assert!(code.declarations.contains("#[allow(unused_imports)]\nuse ::ifbridge_core as rt;\n"));
        assert!(code.definitions.starts_with(HEADER));
        assert!(!code.definitions.contains("as rt;"));
    }

    #[test]
    fn test_runtime_path_from_config() {
        let config = GeneratorConfig::new().with_runtime_crate("::ifbridge::core");
        let code = generate(SCHEMA, &config).expect("Failed to generate");
        assert!(code.declarations.contains("use ::ifbridge::core as rt;\n"));
    }

    #[test]
    fn test_declarations_and_definitions_split() {
        let code = generate(SCHEMA, &GeneratorConfig::default()).expect("Failed to generate");
        assert!(code.declarations.contains("pub struct CommonCoord {"));
        assert!(code.declarations.contains("pub struct UIBridge {"));
        assert!(code.declarations.contains("pub struct ApiBridges {"));
        assert!(!code.declarations.contains("impl rt::Marshal"));
        assert!(code.definitions.contains("impl rt::Marshal for CommonCoord {"));
        assert!(code.definitions.contains("pub fn show(&self, at: CommonCoord) {"));
        assert!(code.definitions.contains("pub fn register_wire_types() {"));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = GeneratorConfig::new().with_aggregate_name("not valid");
        let result = generate(SCHEMA, &config);
        assert!(matches!(result, Err(CodegenError::Config { .. })));
    }

    #[test]
    fn test_type_name_collision() {
        let xml = r#"<interfaces>
            <interface name="Common"><struct name="UiItem"/></interface>
            <interface name="CommonUi"><struct name="Item"/></interface>
        </interfaces>"#;
        let result = generate(xml, &GeneratorConfig::default());
        match result {
            Err(CodegenError::NameCollision { name, .. }) => assert_eq!(name, "CommonUiItem"),
            other => panic!("Expected a name collision, got {other:?}"),
        }
    }

    #[test]
    fn test_method_collides_with_builtin() {
        let xml = r#"<interfaces><interface name="UI">
            <function name="New" messagetype="request"/>
            <function name="New" messagetype="response"/>
        </interface></interfaces>"#;
        let result = generate(xml, &GeneratorConfig::default());
        assert!(matches!(result, Err(CodegenError::NameCollision { .. })));
    }

    #[test]
    fn test_interface_collides_with_aggregate() {
        let xml = r#"<interfaces><interface name="Api">
            <function name="OnReady" messagetype="notification"/>
        </interface></interfaces>"#;
        let result = generate(xml, &GeneratorConfig::default());
        match result {
            Err(CodegenError::NameCollision { name, .. }) => assert_eq!(name, "ApiEvent"),
            other => panic!("Expected a name collision, got {other:?}"),
        }
    }

    #[test]
    fn test_write_to_dir() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config = GeneratorConfig::default();
        let code = generate(SCHEMA, &config).expect("Failed to generate");

        let (declarations, definitions) = code
            .write_to_dir(dir.path(), &config)
            .expect("Failed to write artifacts");
        assert_eq!(declarations, dir.path().join("bridge_types.rs"));
        let written = std::fs::read_to_string(definitions).expect("Failed to read artifact");
        assert_eq!(written, code.definitions);
    }
}

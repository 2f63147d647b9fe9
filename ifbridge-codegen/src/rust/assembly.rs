//! Aggregate and wire type registration generation.

use crate::config::GeneratorConfig;
use crate::rust::bridges::BridgeGenerator;
use crate::rust::naming::{field_ident, rust_type, variant_ident};
use ifbridge_schema::ir::{BaseKind, InterfaceIr, WireType};

/// Derived representations registered for every struct, in order: plain,
/// optional, array, optional array.
pub const REPRESENTATIONS: [fn(WireType) -> WireType; 4] = [
    |ty| ty,
    WireType::optional,
    WireType::array,
    |ty| ty.array().optional(),
];

/// Generator for the aggregate bridge set.
pub struct AssemblyGenerator<'a> {
    ir: &'a InterfaceIr,
    config: &'a GeneratorConfig,
}

impl<'a> AssemblyGenerator<'a> {
    /// Creates a new assembly generator.
    #[must_use]
    pub fn new(ir: &'a InterfaceIr, config: &'a GeneratorConfig) -> Self {
        Self { ir, config }
    }

    /// Returns every registered wire type as `(rust type, wire name)` pairs.
    #[must_use]
    pub fn wire_types(&self) -> Vec<(String, String)> {
        let mut types = Vec::with_capacity(self.ir.structs.len() * REPRESENTATIONS.len());
        for struct_desc in &self.ir.structs {
            let base = WireType::Base(BaseKind::Struct(struct_desc.key.clone()));
            for wrap in REPRESENTATIONS {
                let ty = wrap(base.clone());
                types.push((rust_type(&ty), ty.mangled_name()));
            }
        }
        types
    }

    /// Generates the event enum, the registration guard and the aggregate.
    #[must_use]
    pub fn generate_declarations(&self) -> String {
        let mut output = String::new();
        let event = self.config.event_type();

        output.push_str("/// Events from every bridged host.\n");
        output.push_str("#[derive(Debug, Clone, PartialEq)]\n");
        output.push_str(&format!("pub enum {event} {{\n"));
        for interface in self.ir.bridged_interfaces() {
            if !interface.notifications.is_empty() {
                output.push_str(&format!(
                    "    {}({}),\n",
                    variant_ident(&interface.name),
                    BridgeGenerator::event_type(interface)
                ));
            }
        }
        output.push_str("}\n\n");

        output.push_str("/// Guards the one-time wire type registration.\n");
        output.push_str("pub static WIRE_TYPES: std::sync::Once = std::sync::Once::new();\n\n");

        output.push_str("/// One bridge per host interface.\n");
        output.push_str(&format!("pub struct {} {{\n", self.config.bridges_type()));
        output.push_str(&format!("    context: rt::BridgeContext<{event}>,\n"));
        for interface in self.ir.bridged_interfaces() {
            output.push_str(&format!(
                "    pub {}: {},\n",
                field_ident(&interface.name),
                BridgeGenerator::bridge_type(interface)
            ));
        }
        output.push_str("}\n\n");

        output
    }

    /// Generates the registration body and the aggregate impl.
    #[must_use]
    pub fn generate_definitions(&self) -> String {
        let mut output = String::new();

        output.push_str(&self.generate_registration());
        output.push_str(&self.generate_aggregate_impl());

        output
    }

    fn generate_registration(&self) -> String {
        let mut output = String::new();

        output.push_str("/// Registers every struct representation with the runtime.\n");
        output.push_str("pub fn register_wire_types() {\n");
        output.push_str("    WIRE_TYPES.call_once(|| {\n");
        for (rust, wire) in self.wire_types() {
            output.push_str(&format!(
                "        rt::registry::register::<{rust}>({wire:?});\n"
            ));
        }
        output.push_str("    });\n");
        output.push_str("}\n\n");

        output
    }

    fn generate_aggregate_impl(&self) -> String {
        let mut output = String::new();
        let event = self.config.event_type();
        let interfaces: Vec<_> = self.ir.bridged_interfaces().collect();

        output.push_str(&format!("impl {} {{\n", self.config.bridges_type()));

        output.push_str("    /// Registers the wire types and creates unbound bridges.\n");
        output.push_str(&format!(
            "    pub fn new(context: rt::BridgeContext<{event}>) -> Self {{\n"
        ));
        output.push_str("        register_wire_types();\n");
        output.push_str("        Self {\n");
        for interface in &interfaces {
            output.push_str(&format!(
                "            {}: {}::new(context.clone()),\n",
                field_ident(&interface.name),
                BridgeGenerator::bridge_type(interface)
            ));
        }
        output.push_str("            context,\n");
        output.push_str("        }\n");
        output.push_str("    }\n\n");

        output.push_str("    /// Returns the shared context.\n");
        output.push_str(&format!(
            "    pub fn context(&self) -> &rt::BridgeContext<{event}> {{\n"
        ));
        output.push_str("        &self.context\n");
        output.push_str("    }\n\n");

        output.push_str("    /// Attaches each bridge to the host object of the same name.\n");
        output.push_str("    pub fn bind(&mut self, root: &dyn rt::HostTree) {\n");
        if interfaces.is_empty() {
            output.push_str("        let _ = root;\n");
        }
        for interface in &interfaces {
            output.push_str(&format!(
                "        match root.find_child({}::HOST_NAME) {{\n",
                BridgeGenerator::bridge_type(interface)
            ));
            output.push_str(&format!(
                "            Some(host) => self.{}.set_host(host),\n",
                field_ident(&interface.name)
            ));
            output.push_str(&format!(
                "            None => self.context.host_missing({:?}),\n",
                interface.name
            ));
            output.push_str("        }\n");
        }
        output.push_str("    }\n\n");

        output.push_str("    /// Returns true if every bridge has a host.\n");
        output.push_str("    pub fn is_bound(&self) -> bool {\n");
        if interfaces.is_empty() {
            output.push_str("        true\n");
        } else {
            let checks: Vec<String> = interfaces
                .iter()
                .map(|i| format!("self.{}.is_bound()", field_ident(&i.name)))
                .collect();
            output.push_str(&format!("        {}\n", checks.join(" && ")));
        }
        output.push_str("    }\n");

        output.push_str("}\n");

        output
    }
}

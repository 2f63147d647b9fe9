//! Call bridge and event translation generation.

use crate::config::GeneratorConfig;
use crate::rust::naming::{
    decoded_ident, doc_comment, field_ident, host_name, native_type, out_ident, param_ident,
    rust_type, variant_ident,
};
use ifbridge_schema::ir::{
    InterfaceDescriptor, InterfaceIr, MethodDescriptor, NotificationDescriptor, ParamDescriptor,
    WireType, to_snake_case,
};

/// Generator for per-interface bridges.
pub struct BridgeGenerator<'a> {
    ir: &'a InterfaceIr,
    config: &'a GeneratorConfig,
}

impl<'a> BridgeGenerator<'a> {
    /// Creates a new bridge generator.
    #[must_use]
    pub fn new(ir: &'a InterfaceIr, config: &'a GeneratorConfig) -> Self {
        Self { ir, config }
    }

    /// Returns the bridge type name of an interface.
    #[must_use]
    pub fn bridge_type(interface: &InterfaceDescriptor) -> String {
        format!("{}Bridge", variant_ident(&interface.name))
    }

    /// Returns the event enum name of an interface.
    #[must_use]
    pub fn event_type(interface: &InterfaceDescriptor) -> String {
        format!("{}Event", variant_ident(&interface.name))
    }

    /// Returns the bridge method name of a request/response pair.
    #[must_use]
    pub fn method_name(method: &MethodDescriptor) -> String {
        field_ident(&method.name)
    }

    /// Returns the translator name of a notification.
    #[must_use]
    pub fn translator_name(notification: &NotificationDescriptor) -> String {
        format!("{}_from_host", to_snake_case(&notification.name))
    }

    /// Generates event enums, bridge structs and their constants.
    #[must_use]
    pub fn generate_declarations(&self) -> String {
        let mut output = String::new();
        for interface in self.ir.bridged_interfaces() {
            if !interface.notifications.is_empty() {
                output.push_str(&self.generate_event_enum(interface));
            }
            output.push_str(&self.generate_bridge_struct(interface));
        }
        output
    }

    /// Generates the bridge bodies.
    #[must_use]
    pub fn generate_definitions(&self) -> String {
        let mut output = String::new();
        for interface in self.ir.bridged_interfaces() {
            output.push_str(&self.generate_bridge_impl(interface));
        }
        output
    }

    fn generate_event_enum(&self, interface: &InterfaceDescriptor) -> String {
        let mut output = String::new();

        output.push_str(&format!("/// Events raised by the `{}` host.\n", interface.name));
        output.push_str("#[derive(Debug, Clone, PartialEq)]\n");
        output.push_str(&format!("pub enum {} {{\n", Self::event_type(interface)));
        for notification in &interface.notifications {
            output.push_str(&doc_comment("    ", notification.description.as_deref(), ""));
            let variant = variant_ident(&notification.name);
            if notification.params.is_empty() {
                output.push_str(&format!("    {variant},\n"));
                continue;
            }
            output.push_str(&format!("    {variant} {{\n"));
            for param in &notification.params {
                if let Some(description) = param.description.as_deref() {
                    output.push_str(&doc_comment("        ", Some(description), ""));
                }
                output.push_str(&format!(
                    "        {}: {},\n",
                    field_ident(&param.name),
                    rust_type(&param.ty)
                ));
            }
            output.push_str("    },\n");
        }
        output.push_str("}\n\n");

        output
    }

    fn generate_bridge_struct(&self, interface: &InterfaceDescriptor) -> String {
        let mut output = String::new();
        let bridge = Self::bridge_type(interface);
        let fallback = format!("Bridge to the `{}` host object.", interface.name);

        output.push_str(&doc_comment("", interface.description.as_deref(), &fallback));
        output.push_str(&format!("pub struct {bridge} {{\n"));
        output.push_str(&format!(
            "    context: rt::BridgeContext<{}>,\n",
            self.config.event_type()
        ));
        output.push_str("    host: Option<std::sync::Arc<dyn rt::HostObject>>,\n");
        output.push_str("}\n\n");

        output.push_str(&format!("impl {bridge} {{\n"));
        output.push_str("    /// Transport interface name.\n");
        output.push_str(&format!(
            "    pub const INTERFACE: &'static str = {:?};\n",
            format!("{}.{}", self.config.interface_path, interface.name)
        ));
        output.push_str("    /// Name of the host object in the host tree.\n");
        output.push_str(&format!(
            "    pub const HOST_NAME: &'static str = {:?};\n",
            interface.name
        ));
        output.push_str("}\n\n");

        output
    }

    fn generate_bridge_impl(&self, interface: &InterfaceDescriptor) -> String {
        let mut output = String::new();
        let event = self.config.event_type();

        output.push_str("#[allow(clippy::too_many_arguments)]\n");
        output.push_str(&format!("impl {} {{\n", Self::bridge_type(interface)));

        output.push_str("    /// Creates an unbound bridge and registers the wire types.\n");
        output.push_str(&format!(
            "    pub fn new(context: rt::BridgeContext<{event}>) -> Self {{\n"
        ));
        output.push_str("        register_wire_types();\n");
        output.push_str("        Self { context, host: None }\n");
        output.push_str("    }\n\n");

        output.push_str(&self.generate_set_host(interface));

        output.push_str("    /// Returns true once a host object is attached.\n");
        output.push_str("    pub fn is_bound(&self) -> bool {\n");
        output.push_str("        self.host.is_some()\n");
        output.push_str("    }\n");

        for method in &interface.methods {
            output.push('\n');
            output.push_str(&self.generate_method(interface, method));
        }
        for notification in &interface.notifications {
            output.push('\n');
            output.push_str(&self.generate_translator(interface, notification));
        }

        output.push_str("}\n\n");

        output
    }

    /// Generates `set_host`, which connects every host signal to its
    /// translator before storing the host.
    fn generate_set_host(&self, interface: &InterfaceDescriptor) -> String {
        let mut output = String::new();

        output.push_str("    /// Attaches the host object and connects its signals.\n");
        output.push_str(
            "    pub fn set_host(&mut self, host: std::sync::Arc<dyn rt::HostObject>) {\n",
        );
        for notification in &interface.notifications {
            output.push_str(&self.generate_connect(interface, notification));
        }
        output.push_str("        self.host = Some(host);\n");
        output.push_str("    }\n\n");

        output
    }

    fn generate_connect(
        &self,
        interface: &InterfaceDescriptor,
        notification: &NotificationDescriptor,
    ) -> String {
        let mut output = String::new();
        let signal = host_name(&notification.name);
        let translator = Self::translator_name(notification);
        let args: Vec<String> = (0..notification.params.len())
            .map(|i| format!("arg{i}"))
            .collect();

        output.push_str("        {\n");
        output.push_str("            let context = self.context.clone();\n");
        output.push_str(&format!("            host.connect(\n                {signal:?},\n"));

        if notification.params.is_empty() {
            output.push_str(&format!(
                "                Box::new(move |_args: &[rt::Variant]| Self::{translator}(&context)),\n"
            ));
        } else {
            let extract: Vec<String> = notification
                .params
                .iter()
                .enumerate()
                .map(|(i, param)| format!("rt::native_arg::<{}>(args, {i})", native_type(&param.ty)))
                .collect();
            let (scrutinee, pattern, fallback) = if args.len() == 1 {
                (extract[0].clone(), format!("Some({})", args[0]), "None")
            } else {
                (
                    format!("({})", extract.join(", ")),
                    format!(
                        "({})",
                        args.iter()
                            .map(|a| format!("Some({a})"))
                            .collect::<Vec<_>>()
                            .join(", ")
                    ),
                    "_",
                )
            };
            output.push_str(
                "                Box::new(move |args: &[rt::Variant]| match ",
            );
            output.push_str(&scrutinee);
            output.push_str(" {\n");
            output.push_str(&format!(
                "                    {pattern} => Self::{translator}(&context, {}),\n",
                args.join(", ")
            ));
            output.push_str(&format!(
                "                    {fallback} => context.signal_mismatch({:?}, {signal:?}, args),\n",
                interface.name
            ));
            output.push_str("                }),\n");
        }

        output.push_str("            );\n");
        output.push_str("        }\n");

        output
    }

    /// Generates the call bridge of one request/response pair.
    fn generate_method(&self, interface: &InterfaceDescriptor, method: &MethodDescriptor) -> String {
        let mut output = String::new();
        let label = format!("{}.{}", interface.name, method.name);
        let primary = method.primary();
        let fail = if primary.is_some() { "return ret;" } else { "return;" };

        let mut params: Vec<String> = method
            .request
            .iter()
            .map(|p| format!("{}: {}", param_ident(&p.name), rust_type(&p.ty)))
            .collect();
        params.extend(
            method
                .secondary()
                .iter()
                .map(|p| format!("{}: &mut {}", out_ident(&p.name), rust_type(&p.ty))),
        );
        let returns = primary
            .map(|p| format!(" -> {}", rust_type(&p.ty)))
            .unwrap_or_default();

        let fallback = format!("Calls `{}` on the host.", host_name(&method.name));
        output.push_str(&doc_comment("    ", method.description.as_deref(), &fallback));
        output.push_str(&format!(
            "    pub fn {}(&self{}{}){returns} {{\n",
            Self::method_name(method),
            if params.is_empty() { "" } else { ", " },
            params.join(", ")
        ));

        if let Some(primary) = primary {
            output.push_str(&format!(
                "        let mut ret: {} = Default::default();\n",
                rust_type(&primary.ty)
            ));
        }

        // Pack request fields.
        if method.request.is_empty() {
            output.push_str("        let in_arg = rt::VariantMap::new();\n");
        } else {
            output.push_str("        let mut in_arg = rt::VariantMap::new();\n");
            for param in &method.request {
                output.push_str(&format!(
                    "        rt::Marshal::put_arg(&{}, &mut in_arg, {:?});\n",
                    param_ident(&param.name),
                    param.name
                ));
            }
        }

        // Single round trip.
        output.push_str(&format!(
            "        let reply = match self.context.invoke({:?}, self.host.as_deref(), {:?}, in_arg) {{\n",
            interface.name,
            host_name(&method.name)
        ));
        output.push_str("            Ok(reply) => reply,\n");
        output.push_str("            Err(err) => {\n");
        output.push_str("                self.context.raise(err);\n");
        output.push_str(&format!("                {fail}\n"));
        output.push_str("            }\n");
        output.push_str("        };\n");

        let Some(primary) = primary else {
            output.push_str("        if !matches!(reply, rt::Variant::Map(_)) {\n");
            output.push_str(&format!(
                "            self.context.raise(rt::BridgeError::bad_response({label:?}, reply.kind()));\n"
            ));
            output.push_str("        }\n");
            output.push_str("    }\n");
            return output;
        };

        output.push_str("        let out_arg = match reply {\n");
        output.push_str("            rt::Variant::Map(out_arg) => out_arg,\n");
        output.push_str("            other => {\n");
        output.push_str(&format!(
            "                self.context.raise(rt::BridgeError::bad_response({label:?}, other.kind()));\n"
        ));
        output.push_str("                return ret;\n");
        output.push_str("            }\n");
        output.push_str("        };\n");

        // Secondary fields abort on the first failure.
        for param in method.secondary() {
            output.push_str(&format!(
                "        match <{} as rt::Marshal>::get_arg(&out_arg, {:?}) {{\n",
                rust_type(&param.ty),
                param.name
            ));
            output.push_str(&format!("            Ok(value) => *{} = value,\n", out_ident(&param.name)));
            output.push_str("            Err(err) => {\n");
            output.push_str(&format!(
                "                self.context.raise(rt::BridgeError::response_field({label:?}, err));\n"
            ));
            output.push_str("                return ret;\n");
            output.push_str("            }\n");
            output.push_str("        }\n");
        }

        // The primary field is read last and a failure still returns `ret`.
        output.push_str(&format!(
            "        match <{} as rt::Marshal>::get_arg(&out_arg, {:?}) {{\n",
            rust_type(&primary.ty),
            primary.name
        ));
        output.push_str("            Ok(value) => ret = value,\n");
        output.push_str(&format!(
            "            Err(err) => self.context.raise(rt::BridgeError::response_field({label:?}, err)),\n"
        ));
        output.push_str("        }\n");
        output.push_str("        ret\n");
        output.push_str("    }\n");

        output
    }

    /// Generates the translator from host signal arguments to an event.
    fn generate_translator(
        &self,
        interface: &InterfaceDescriptor,
        notification: &NotificationDescriptor,
    ) -> String {
        let mut output = String::new();
        let event = self.config.event_type();
        let variant = variant_ident(&notification.name);
        let constructor = format!(
            "{event}::{}({}::{variant}",
            variant_ident(&interface.name),
            Self::event_type(interface)
        );

        let natives: Vec<String> = notification
            .params
            .iter()
            .map(|p| format!(", {}: {}", param_ident(&p.name), native_type(&p.ty)))
            .collect();

        output.push_str(&format!(
            "    /// Translates the `{}` host signal into an event.\n",
            host_name(&notification.name)
        ));
        output.push_str(&format!(
            "    pub fn {}(context: &rt::BridgeContext<{event}>{}) {{\n",
            Self::translator_name(notification),
            natives.concat()
        ));

        for param in &notification.params {
            if !param.ty.is_passthrough() {
                output.push_str(&self.generate_param_decode(interface, notification, param));
            }
        }

        if notification.params.is_empty() {
            output.push_str(&format!("        context.emit({constructor}));\n"));
        } else {
            let fields: Vec<String> = notification
                .params
                .iter()
                .map(|param| {
                    let field = field_ident(&param.name);
                    let source = if param.ty.is_passthrough() {
                        param_ident(&param.name)
                    } else {
                        decoded_ident(&param.name)
                    };
                    if field == source {
                        field
                    } else {
                        format!("{field}: {source}")
                    }
                })
                .collect();
            output.push_str(&format!(
                "        context.emit({constructor} {{ {} }}));\n",
                fields.join(", ")
            ));
        }
        output.push_str("    }\n");

        output
    }

    fn generate_param_decode(
        &self,
        interface: &InterfaceDescriptor,
        notification: &NotificationDescriptor,
        param: &ParamDescriptor,
    ) -> String {
        let mut output = String::new();
        let native = param_ident(&param.name);
        let on_error = format!(
            "context.drop_event({:?}, {:?}, {:?}, err);",
            interface.name, notification.name, param.name
        );

        match &param.ty {
            WireType::Optional(inner) => {
                // Presence is checked before the inner decoder runs.
                output.push_str(&format!(
                    "        let {} = if {native}.is_null() {{\n",
                    decoded_ident(&param.name)
                ));
                output.push_str("            None\n");
                output.push_str("        } else {\n");
                output.push_str(&format!(
                    "            match <{} as rt::Marshal>::from_variant(&{native}) {{\n",
                    rust_type(inner)
                ));
                output.push_str("                Ok(value) => Some(value),\n");
                output.push_str("                Err(err) => {\n");
                output.push_str(&format!("                    {on_error}\n"));
                output.push_str("                    return;\n");
                output.push_str("                }\n");
                output.push_str("            }\n");
                output.push_str("        };\n");
            }
            ty => {
                output.push_str(&format!(
                    "        let {} = match <{} as rt::Marshal>::from_variant(&{native}) {{\n",
                    decoded_ident(&param.name),
                    rust_type(ty)
                ));
                output.push_str("            Ok(value) => value,\n");
                output.push_str("            Err(err) => {\n");
                output.push_str(&format!("                {on_error}\n"));
                output.push_str("                return;\n");
                output.push_str("            }\n");
                output.push_str("        };\n");
            }
        }

        output
    }
}

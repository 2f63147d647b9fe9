//! Intermediate representation for code generation.
//!
//! Every raw type reference in the schema is resolved here into a
//! [`WireType`]: a base kind wrapped by at most one `Array` and at most one
//! `Optional`, optional always outermost. Struct and enum references keep
//! their [`TypeKey`] so generators can name them.

use crate::error::SchemaError;
use crate::types::{MessageType, ParamDef, Schema};
use crate::validation::{validate_ir, validate_schema};
use std::collections::HashSet;
use std::fmt;

/// Key of a struct or enum: the declaring interface and the type name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeKey {
    /// Declaring interface.
    pub namespace: String,
    /// Type name within the interface.
    pub name: String,
}

impl TypeKey {
    /// Creates a new type key.
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.namespace, self.name)
    }
}

/// Base kind a type reference bottoms out at.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BaseKind {
    /// 32-bit integer.
    Integer,
    /// UTF-8 string.
    String,
    /// Boolean.
    Boolean,
    /// Double precision float.
    Float,
    /// Reference to a struct.
    Struct(TypeKey),
    /// Reference to an enum, carried as an integer on the wire.
    Enum(TypeKey),
}

impl BaseKind {
    /// Maps a primitive schema type name.
    #[must_use]
    pub fn primitive(name: &str) -> Option<Self> {
        match name {
            "Integer" => Some(Self::Integer),
            "String" => Some(Self::String),
            "Boolean" => Some(Self::Boolean),
            "Float" => Some(Self::Float),
            _ => None,
        }
    }

    /// Returns true for the four primitive kinds.
    #[must_use]
    pub const fn is_primitive(&self) -> bool {
        matches!(
            self,
            Self::Integer | Self::String | Self::Boolean | Self::Float
        )
    }
}

/// Resolved type of a parameter or field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WireType {
    /// Unmodified base kind.
    Base(BaseKind),
    /// List of the inner type.
    Array(Box<WireType>),
    /// Possibly absent inner type.
    Optional(Box<WireType>),
}

impl WireType {
    /// Wraps the type in an array.
    #[must_use]
    pub fn array(self) -> Self {
        Self::Array(Box::new(self))
    }

    /// Wraps the type in an optional.
    #[must_use]
    pub fn optional(self) -> Self {
        Self::Optional(Box::new(self))
    }

    /// Returns the type one wrapping step in, if any.
    #[must_use]
    pub fn inner(&self) -> Option<&WireType> {
        match self {
            Self::Base(_) => None,
            Self::Array(inner) | Self::Optional(inner) => Some(inner),
        }
    }

    /// Returns the base kind under every wrapper.
    #[must_use]
    pub fn base(&self) -> &BaseKind {
        match self {
            Self::Base(base) => base,
            Self::Array(inner) | Self::Optional(inner) => inner.base(),
        }
    }

    /// Returns true if the outermost wrapper is optional.
    #[must_use]
    pub const fn is_optional(&self) -> bool {
        matches!(self, Self::Optional(_))
    }

    /// Returns true if an array wrapper appears anywhere.
    #[must_use]
    pub fn is_array(&self) -> bool {
        match self {
            Self::Base(_) => false,
            Self::Array(_) => true,
            Self::Optional(inner) => inner.is_array(),
        }
    }

    /// Returns the referenced struct, if the base kind is a struct.
    #[must_use]
    pub fn struct_key(&self) -> Option<&TypeKey> {
        match self.base() {
            BaseKind::Struct(key) => Some(key),
            _ => None,
        }
    }

    /// Returns true for a primitive without modifiers, which crosses the
    /// host boundary in its native form.
    #[must_use]
    pub const fn is_passthrough(&self) -> bool {
        match self {
            Self::Base(base) => base.is_primitive(),
            _ => false,
        }
    }

    /// Returns the wire name of the type: `opt_` and `arr_` prefixes in
    /// wrapping order over the base name, e.g. `opt_arr_Common_Coord`.
    #[must_use]
    pub fn mangled_name(&self) -> String {
        match self {
            Self::Optional(inner) => format!("opt_{}", inner.mangled_name()),
            Self::Array(inner) => format!("arr_{}", inner.mangled_name()),
            Self::Base(BaseKind::Integer) => "int".to_string(),
            Self::Base(BaseKind::String) => "string".to_string(),
            Self::Base(BaseKind::Boolean) => "bool".to_string(),
            Self::Base(BaseKind::Float) => "float".to_string(),
            Self::Base(BaseKind::Struct(key) | BaseKind::Enum(key)) => {
                format!("{}_{}", key.namespace, key.name)
            }
        }
    }
}

/// Resolved parameter or struct field.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamDescriptor {
    /// Name as declared, also the wire key.
    pub name: String,
    /// Resolved type.
    pub ty: WireType,
    /// Description text.
    pub description: Option<String>,
}

/// Resolved struct.
#[derive(Debug, Clone)]
pub struct StructDescriptor {
    /// Struct key.
    pub key: TypeKey,
    /// Description text.
    pub description: Option<String>,
    /// Fields in declaration order.
    pub fields: Vec<ParamDescriptor>,
}

/// Resolved enum element.
#[derive(Debug, Clone)]
pub struct EnumValueDescriptor {
    /// Element name.
    pub name: String,
    /// Numeric value.
    pub value: i32,
    /// Description text.
    pub description: Option<String>,
}

/// Resolved enum.
#[derive(Debug, Clone)]
pub struct EnumDescriptor {
    /// Enum key.
    pub key: TypeKey,
    /// Description text.
    pub description: Option<String>,
    /// Elements with their numeric values.
    pub values: Vec<EnumValueDescriptor>,
}

/// A request paired with its response.
#[derive(Debug, Clone)]
pub struct MethodDescriptor {
    /// Method name.
    pub name: String,
    /// Description of the request.
    pub description: Option<String>,
    /// Request parameters.
    pub request: Vec<ParamDescriptor>,
    /// Response parameters. The first is the primary return value.
    pub response: Vec<ParamDescriptor>,
}

impl MethodDescriptor {
    /// Returns the primary response field.
    #[must_use]
    pub fn primary(&self) -> Option<&ParamDescriptor> {
        self.response.first()
    }

    /// Returns the response fields after the primary one.
    #[must_use]
    pub fn secondary(&self) -> &[ParamDescriptor] {
        self.response.get(1..).unwrap_or(&[])
    }
}

/// Resolved notification.
#[derive(Debug, Clone)]
pub struct NotificationDescriptor {
    /// Notification name.
    pub name: String,
    /// Description text.
    pub description: Option<String>,
    /// Parameters in declaration order.
    pub params: Vec<ParamDescriptor>,
}

/// Resolved interface.
#[derive(Debug, Clone)]
pub struct InterfaceDescriptor {
    /// Interface name.
    pub name: String,
    /// Description text.
    pub description: Option<String>,
    /// Methods ordered by request declaration.
    pub methods: Vec<MethodDescriptor>,
    /// Notifications in declaration order.
    pub notifications: Vec<NotificationDescriptor>,
}

impl InterfaceDescriptor {
    /// Returns true if the interface has neither methods nor notifications.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty() && self.notifications.is_empty()
    }
}

/// Resolved schema used by the generators.
#[derive(Debug, Clone)]
pub struct InterfaceIr {
    /// Structs in declaration order.
    pub structs: Vec<StructDescriptor>,
    /// Enums in declaration order.
    pub enums: Vec<EnumDescriptor>,
    /// Interfaces in declaration order, including empty ones.
    pub interfaces: Vec<InterfaceDescriptor>,
}

impl InterfaceIr {
    /// Validates a schema and resolves every type reference in it.
    ///
    /// # Errors
    /// Returns `SchemaError` for duplicate keys, unpaired functions, unknown
    /// types or recursive struct nesting.
    pub fn from_schema(schema: &Schema) -> Result<Self, SchemaError> {
        validate_schema(schema)?;
        let resolver = Resolver::new(schema);

        let mut structs = Vec::new();
        let mut enums = Vec::new();
        let mut interfaces = Vec::new();

        for interface in &schema.interfaces {
            for struct_def in &interface.structs {
                structs.push(StructDescriptor {
                    key: TypeKey::new(&interface.name, &struct_def.name),
                    description: struct_def.description.clone(),
                    fields: resolver.resolve_all(
                        &struct_def.params,
                        &interface.name,
                        &struct_def.name,
                    )?,
                });
            }

            for enum_def in &interface.enums {
                enums.push(EnumDescriptor {
                    key: TypeKey::new(&interface.name, &enum_def.name),
                    description: enum_def.description.clone(),
                    values: enum_def
                        .numbered_elements()
                        .into_iter()
                        .map(|(element, value)| EnumValueDescriptor {
                            name: element.name.clone(),
                            value,
                            description: element.description.clone(),
                        })
                        .collect(),
                });
            }

            let mut methods = Vec::new();
            for request in interface.functions_of(MessageType::Request) {
                let response_params = interface
                    .find_function(&request.name, MessageType::Response)
                    .map(|response| response.params.as_slice())
                    .unwrap_or_default();
                methods.push(MethodDescriptor {
                    name: request.name.clone(),
                    description: request.description.clone(),
                    request: resolver.resolve_all(&request.params, &interface.name, &request.name)?,
                    response: resolver.resolve_all(
                        response_params,
                        &interface.name,
                        &request.name,
                    )?,
                });
            }

            let mut notifications = Vec::new();
            for notification in interface.functions_of(MessageType::Notification) {
                notifications.push(NotificationDescriptor {
                    name: notification.name.clone(),
                    description: notification.description.clone(),
                    params: resolver.resolve_all(
                        &notification.params,
                        &interface.name,
                        &notification.name,
                    )?,
                });
            }

            tracing::debug!(
                interface = %interface.name,
                methods = methods.len(),
                notifications = notifications.len(),
                "resolved interface"
            );
            interfaces.push(InterfaceDescriptor {
                name: interface.name.clone(),
                description: interface.description.clone(),
                methods,
                notifications,
            });
        }

        let ir = Self {
            structs,
            enums,
            interfaces,
        };
        validate_ir(&ir)?;
        Ok(ir)
    }

    /// Looks up a struct by key.
    #[must_use]
    pub fn get_struct(&self, key: &TypeKey) -> Option<&StructDescriptor> {
        self.structs.iter().find(|s| &s.key == key)
    }

    /// Iterates over the interfaces that get a bridge.
    pub fn bridged_interfaces(&self) -> impl Iterator<Item = &InterfaceDescriptor> {
        self.interfaces.iter().filter(|i| !i.is_empty())
    }
}

/// Raw type reference being resolved.
#[derive(Debug, Clone, Copy)]
struct RawType<'a> {
    type_name: &'a str,
    array: bool,
    optional: bool,
}

/// Resolves raw parameter declarations against the struct and enum tables.
pub struct Resolver {
    structs: HashSet<TypeKey>,
    enums: HashSet<TypeKey>,
}

impl Resolver {
    /// Builds the lookup tables for a schema.
    #[must_use]
    pub fn new(schema: &Schema) -> Self {
        let mut structs = HashSet::new();
        let mut enums = HashSet::new();
        for interface in &schema.interfaces {
            for struct_def in &interface.structs {
                structs.insert(TypeKey::new(&interface.name, &struct_def.name));
            }
            for enum_def in &interface.enums {
                enums.insert(TypeKey::new(&interface.name, &enum_def.name));
            }
        }
        Self { structs, enums }
    }

    /// Resolves one parameter declared inside `interface.element`.
    ///
    /// # Errors
    /// Returns `SchemaError::UnknownType` if the base type names no
    /// primitive, struct or enum.
    pub fn resolve(
        &self,
        param: &ParamDef,
        interface: &str,
        element: &str,
    ) -> Result<ParamDescriptor, SchemaError> {
        let raw = RawType {
            type_name: &param.type_name,
            array: param.array,
            optional: param.is_optional(),
        };
        let ty = self
            .resolve_type(raw, interface)
            .ok_or_else(|| {
                SchemaError::unknown_type(interface, element, &param.name, &param.type_name)
            })?;
        Ok(ParamDescriptor {
            name: param.name.clone(),
            ty,
            description: param.description.clone(),
        })
    }

    /// Resolves a parameter list in order.
    ///
    /// # Errors
    /// Returns the first `SchemaError` encountered.
    pub fn resolve_all(
        &self,
        params: &[ParamDef],
        interface: &str,
        element: &str,
    ) -> Result<Vec<ParamDescriptor>, SchemaError> {
        params
            .iter()
            .map(|param| self.resolve(param, interface, element))
            .collect()
    }

    /// Peels optional, then array, then looks the base up.
    fn resolve_type(&self, raw: RawType<'_>, namespace: &str) -> Option<WireType> {
        if raw.optional {
            let inner = RawType {
                optional: false,
                ..raw
            };
            return self.resolve_type(inner, namespace).map(WireType::optional);
        }
        if raw.array {
            let inner = RawType {
                array: false,
                ..raw
            };
            return self.resolve_type(inner, namespace).map(WireType::array);
        }
        self.resolve_base(raw.type_name, namespace).map(WireType::Base)
    }

    /// Looks up a base type. Unqualified names resolve against the
    /// enclosing interface; structs shadow enums.
    fn resolve_base(&self, type_name: &str, namespace: &str) -> Option<BaseKind> {
        if let Some(primitive) = BaseKind::primitive(type_name) {
            return Some(primitive);
        }
        let key = match type_name.split_once('.') {
            Some((ns, name)) => TypeKey::new(ns, name),
            None => TypeKey::new(namespace, type_name),
        };
        if self.structs.contains(&key) {
            Some(BaseKind::Struct(key))
        } else if self.enums.contains(&key) {
            Some(BaseKind::Enum(key))
        } else {
            None
        }
    }
}

/// Converts a name to snake_case. Runs of capitals stay together, so
/// `appID` becomes `app_id` and `HMIStatus` becomes `hmi_status`.
#[must_use]
pub fn to_snake_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c == '-' || c == ' ' {
            result.push('_');
            continue;
        }
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_lower)
            {
                result.push('_');
            }
        }
        result.push(c.to_ascii_lowercase());
    }
    result
}

/// Converts a name to PascalCase.
#[must_use]
pub fn to_pascal_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut capitalize_next = true;

    for c in s.chars() {
        if c == '_' || c == '-' || c == ' ' {
            capitalize_next = true;
        } else if capitalize_next {
            result.push(c.to_ascii_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_schema;

    const SCHEMA: &str = r#"<interfaces>
    <interface name="Common">
        <enum name="Mode"><element name="A"/><element name="B" value="5"/></enum>
        <struct name="Coord">
            <param name="x" type="Integer"/>
            <param name="y" type="Integer"/>
        </struct>
        <struct name="Path">
            <param name="points" type="Coord" array="true" mandatory="false"/>
            <param name="mode" type="Mode"/>
        </struct>
    </interface>
    <interface name="UI">
        <function name="Alert" messagetype="request">
            <param name="text" type="String"/>
            <param name="at" type="Common.Coord" mandatory="false"/>
        </function>
        <function name="Alert" messagetype="response">
            <param name="success" type="Boolean"/>
            <param name="retry" type="Integer" mandatory="false"/>
        </function>
        <function name="OnPath" messagetype="notification">
            <param name="path" type="Common.Path"/>
        </function>
    </interface>
    <interface name="Idle"/>
</interfaces>"#;

    fn ir() -> InterfaceIr {
        let schema = parse_schema(SCHEMA).expect("Failed to parse schema");
        InterfaceIr::from_schema(&schema).expect("Failed to resolve schema")
    }

    #[test]
    fn test_to_snake_case() {
        assert_eq!(to_snake_case("alertStrings"), "alert_strings");
        assert_eq!(to_snake_case("appID"), "app_id");
        assert_eq!(to_snake_case("HMIStatus"), "hmi_status");
        assert_eq!(to_snake_case("UI"), "ui");
        assert_eq!(to_snake_case("VehicleInfo"), "vehicle_info");
        assert_eq!(to_snake_case("already_snake"), "already_snake");
    }

    #[test]
    fn test_to_pascal_case() {
        assert_eq!(to_pascal_case("coord"), "Coord");
        assert_eq!(to_pascal_case("text_field"), "TextField");
        assert_eq!(to_pascal_case("UI"), "UI");
    }

    #[test]
    fn test_optional_array_of_struct_keeps_identity() {
        let ir = ir();
        let path = ir
            .get_struct(&TypeKey::new("Common", "Path"))
            .expect("Missing Path");
        let points = &path.fields[0];

        let coord = WireType::Base(BaseKind::Struct(TypeKey::new("Common", "Coord")));
        assert_eq!(points.ty, coord.clone().array().optional());
        assert!(points.ty.is_optional());
        assert!(points.ty.is_array());
        assert_eq!(points.ty.struct_key(), Some(&TypeKey::new("Common", "Coord")));
        assert_eq!(points.ty.inner(), Some(&coord.array()));
    }

    #[test]
    fn test_enum_reference_keeps_identity() {
        let ir = ir();
        let path = ir
            .get_struct(&TypeKey::new("Common", "Path"))
            .expect("Missing Path");
        assert_eq!(
            path.fields[1].ty,
            WireType::Base(BaseKind::Enum(TypeKey::new("Common", "Mode")))
        );
        let values: Vec<i32> = ir.enums[0].values.iter().map(|v| v.value).collect();
        assert_eq!(values, vec![0, 5]);
    }

    #[test]
    fn test_mangled_name_wraps_in_order() {
        let coord = WireType::Base(BaseKind::Struct(TypeKey::new("Common", "Coord")));
        assert_eq!(coord.mangled_name(), "Common_Coord");
        assert_eq!(coord.clone().array().mangled_name(), "arr_Common_Coord");
        assert_eq!(
            coord.array().optional().mangled_name(),
            "opt_arr_Common_Coord"
        );
    }

    #[test]
    fn test_methods_pair_request_and_response() {
        let ir = ir();
        let ui = &ir.interfaces[1];
        assert_eq!(ui.methods.len(), 1);

        let alert = &ui.methods[0];
        assert_eq!(alert.request.len(), 2);
        assert_eq!(alert.primary().map(|p| p.name.as_str()), Some("success"));
        assert_eq!(alert.secondary().len(), 1);
        assert!(alert.secondary()[0].ty.is_optional());
        assert!(alert.request[0].ty.is_passthrough());
        assert!(!alert.request[1].ty.is_passthrough());
    }

    #[test]
    fn test_bridged_interfaces_skip_empty() {
        let ir = ir();
        assert_eq!(ir.interfaces.len(), 3);
        let bridged: Vec<&str> = ir.bridged_interfaces().map(|i| i.name.as_str()).collect();
        assert_eq!(bridged, vec!["UI"]);
    }

    #[test]
    fn test_unknown_type_is_error() {
        let xml = r#"<interfaces><interface name="UI">
            <function name="OnX" messagetype="notification">
                <param name="value" type="Common.Missing"/>
            </function>
        </interface></interfaces>"#;
        let schema = parse_schema(xml).expect("Failed to parse schema");
        let err = InterfaceIr::from_schema(&schema).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::UnknownType { ref type_name, ref field, .. }
                if type_name == "Common.Missing" && field == "value"
        ));
    }

    #[test]
    fn test_unqualified_reference_uses_enclosing_interface() {
        let xml = r#"<interfaces>
            <interface name="A"><struct name="S"><param name="x" type="Integer"/></struct></interface>
            <interface name="B"><struct name="T"><param name="s" type="S"/></struct></interface>
        </interfaces>"#;
        let schema = parse_schema(xml).expect("Failed to parse schema");
        let err = InterfaceIr::from_schema(&schema).unwrap_err();
        assert!(matches!(err, SchemaError::UnknownType { .. }));
    }
}

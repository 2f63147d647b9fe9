//! Schema type definitions.
//!
//! This module contains the data structures representing interface schema
//! elements as they appear in the XML: interfaces, enums, structs,
//! functions and their parameters. Type references are still plain strings
//! here; [`crate::ir`] resolves them.

/// Complete interface schema.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    /// Schema name from the root element.
    pub name: Option<String>,
    /// Interfaces in declaration order.
    pub interfaces: Vec<InterfaceDef>,
}

impl Schema {
    /// Creates a new empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an interface definition.
    pub fn add_interface(&mut self, interface: InterfaceDef) {
        self.interfaces.push(interface);
    }

    /// Looks up an interface by name.
    #[must_use]
    pub fn get_interface(&self, name: &str) -> Option<&InterfaceDef> {
        self.interfaces.iter().find(|i| i.name == name)
    }

    /// Returns true if `namespace.name` is a declared struct.
    #[must_use]
    pub fn has_struct(&self, namespace: &str, name: &str) -> bool {
        self.get_interface(namespace)
            .is_some_and(|i| i.get_struct(name).is_some())
    }

    /// Returns true if `namespace.name` is a declared enum.
    #[must_use]
    pub fn has_enum(&self, namespace: &str, name: &str) -> bool {
        self.get_interface(namespace)
            .is_some_and(|i| i.get_enum(name).is_some())
    }

    /// Returns the total number of structs across all interfaces.
    #[must_use]
    pub fn struct_count(&self) -> usize {
        self.interfaces.iter().map(|i| i.structs.len()).sum()
    }
}

/// Interface definition. The interface name doubles as the namespace of
/// the enums and structs declared inside it.
#[derive(Debug, Clone)]
pub struct InterfaceDef {
    /// Interface name.
    pub name: String,
    /// Description text.
    pub description: Option<String>,
    /// Enumerations.
    pub enums: Vec<EnumDef>,
    /// Structured types.
    pub structs: Vec<StructDef>,
    /// Requests, responses and notifications in declaration order.
    pub functions: Vec<FunctionDef>,
}

impl InterfaceDef {
    /// Creates a new empty interface.
    #[must_use]
    pub fn new(name: String) -> Self {
        Self {
            name,
            description: None,
            enums: Vec::new(),
            structs: Vec::new(),
            functions: Vec::new(),
        }
    }

    /// Looks up a struct declared in this interface.
    #[must_use]
    pub fn get_struct(&self, name: &str) -> Option<&StructDef> {
        self.structs.iter().find(|s| s.name == name)
    }

    /// Looks up an enum declared in this interface.
    #[must_use]
    pub fn get_enum(&self, name: &str) -> Option<&EnumDef> {
        self.enums.iter().find(|e| e.name == name)
    }

    /// Iterates over functions of one message type.
    pub fn functions_of(&self, message_type: MessageType) -> impl Iterator<Item = &FunctionDef> {
        self.functions
            .iter()
            .filter(move |f| f.message_type == message_type)
    }

    /// Looks up a function by name and message type.
    #[must_use]
    pub fn find_function(&self, name: &str, message_type: MessageType) -> Option<&FunctionDef> {
        self.functions_of(message_type).find(|f| f.name == name)
    }
}

/// Enumeration definition.
#[derive(Debug, Clone)]
pub struct EnumDef {
    /// Enum name.
    pub name: String,
    /// Description text.
    pub description: Option<String>,
    /// Elements in declaration order.
    pub elements: Vec<EnumElement>,
}

impl EnumDef {
    /// Creates a new enum definition.
    #[must_use]
    pub fn new(name: String) -> Self {
        Self {
            name,
            description: None,
            elements: Vec::new(),
        }
    }

    /// Adds an element.
    pub fn add_element(&mut self, element: EnumElement) {
        self.elements.push(element);
    }

    /// Returns every element with its numeric value. Elements without an
    /// explicit value continue from the previous one, starting at zero.
    #[must_use]
    pub fn numbered_elements(&self) -> Vec<(&EnumElement, i32)> {
        let mut next = 0i32;
        self.elements
            .iter()
            .map(|element| {
                let value = element.value.unwrap_or(next);
                next = value.wrapping_add(1);
                (element, value)
            })
            .collect()
    }
}

/// Enumeration element.
#[derive(Debug, Clone)]
pub struct EnumElement {
    /// Element name.
    pub name: String,
    /// Explicit value.
    pub value: Option<i32>,
    /// Description text.
    pub description: Option<String>,
}

impl EnumElement {
    /// Creates a new element.
    #[must_use]
    pub fn new(name: String, value: Option<i32>) -> Self {
        Self {
            name,
            value,
            description: None,
        }
    }
}

/// Struct definition.
#[derive(Debug, Clone)]
pub struct StructDef {
    /// Struct name.
    pub name: String,
    /// Description text.
    pub description: Option<String>,
    /// Fields in declaration order.
    pub params: Vec<ParamDef>,
}

impl StructDef {
    /// Creates a new struct definition.
    #[must_use]
    pub fn new(name: String) -> Self {
        Self {
            name,
            description: None,
            params: Vec::new(),
        }
    }

    /// Adds a field.
    pub fn add_param(&mut self, param: ParamDef) {
        self.params.push(param);
    }
}

/// Kind of a function element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    /// Inbound call.
    Request,
    /// Reply to a request of the same name.
    Response,
    /// Host-originated event.
    Notification,
}

impl MessageType {
    /// Parses the `messagetype` attribute.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "request" => Some(Self::Request),
            "response" => Some(Self::Response),
            "notification" => Some(Self::Notification),
            _ => None,
        }
    }

    /// Returns the attribute spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Request => "request",
            Self::Response => "response",
            Self::Notification => "notification",
        }
    }
}

/// Function definition.
#[derive(Debug, Clone)]
pub struct FunctionDef {
    /// Function name.
    pub name: String,
    /// Message type.
    pub message_type: MessageType,
    /// Description text.
    pub description: Option<String>,
    /// Parameters in declaration order.
    pub params: Vec<ParamDef>,
}

impl FunctionDef {
    /// Creates a new function definition.
    #[must_use]
    pub fn new(name: String, message_type: MessageType) -> Self {
        Self {
            name,
            message_type,
            description: None,
            params: Vec::new(),
        }
    }

    /// Adds a parameter.
    pub fn add_param(&mut self, param: ParamDef) {
        self.params.push(param);
    }
}

/// Parameter or struct field definition.
#[derive(Debug, Clone)]
pub struct ParamDef {
    /// Parameter name, also the wire key.
    pub name: String,
    /// Raw type reference: a primitive name, `Name` or `Namespace.Name`.
    pub type_name: String,
    /// True if the parameter is a list.
    pub array: bool,
    /// False if the parameter may be absent.
    pub mandatory: bool,
    /// Description text.
    pub description: Option<String>,
}

impl ParamDef {
    /// Creates a mandatory scalar parameter.
    #[must_use]
    pub fn new(name: String, type_name: String) -> Self {
        Self {
            name,
            type_name,
            array: false,
            mandatory: true,
            description: None,
        }
    }

    /// Returns true if the parameter may be absent.
    #[must_use]
    pub const fn is_optional(&self) -> bool {
        !self.mandatory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_type_parse() {
        assert_eq!(MessageType::parse("request"), Some(MessageType::Request));
        assert_eq!(MessageType::parse("notification"), Some(MessageType::Notification));
        assert_eq!(MessageType::parse("event"), None);
        assert_eq!(MessageType::Response.as_str(), "response");
    }

    #[test]
    fn test_enum_numbering() {
        let mut enum_def = EnumDef::new("Result".to_string());
        enum_def.add_element(EnumElement::new("A".to_string(), None));
        enum_def.add_element(EnumElement::new("B".to_string(), Some(10)));
        enum_def.add_element(EnumElement::new("C".to_string(), None));

        let values: Vec<i32> = enum_def.numbered_elements().iter().map(|(_, v)| *v).collect();
        assert_eq!(values, vec![0, 10, 11]);
    }

    #[test]
    fn test_schema_lookups() {
        let mut common = InterfaceDef::new("Common".to_string());
        common.structs.push(StructDef::new("Coord".to_string()));
        common.enums.push(EnumDef::new("Result".to_string()));
        let mut schema = Schema::new();
        schema.add_interface(common);

        assert!(schema.has_struct("Common", "Coord"));
        assert!(!schema.has_struct("Common", "Result"));
        assert!(schema.has_enum("Common", "Result"));
        assert!(!schema.has_enum("UI", "Result"));
        assert_eq!(schema.struct_count(), 1);
    }

    #[test]
    fn test_find_function() {
        let mut ui = InterfaceDef::new("UI".to_string());
        ui.functions
            .push(FunctionDef::new("Alert".to_string(), MessageType::Request));
        ui.functions
            .push(FunctionDef::new("Alert".to_string(), MessageType::Response));
        assert!(ui.find_function("Alert", MessageType::Response).is_some());
        assert!(ui.find_function("Alert", MessageType::Notification).is_none());
        assert_eq!(ui.functions_of(MessageType::Request).count(), 1);
    }
}

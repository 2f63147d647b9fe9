//! Error types for schema parsing and validation.

use thiserror::Error;

/// Error type for schema parsing operations.
#[derive(Debug, Error)]
pub enum ParseError {
    /// XML parsing error.
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Missing required attribute.
    #[error("missing required attribute '{attribute}' on element '{element}'")]
    MissingAttribute {
        /// Element name.
        element: String,
        /// Attribute name.
        attribute: String,
    },

    /// Invalid attribute value.
    #[error("invalid value '{value}' for attribute '{attribute}' on element '{element}'")]
    InvalidAttribute {
        /// Element name.
        element: String,
        /// Attribute name.
        attribute: String,
        /// Invalid value.
        value: String,
    },

    /// Invalid schema structure.
    #[error("invalid schema structure: {message}")]
    InvalidStructure {
        /// Error message.
        message: String,
    },

    /// UTF-8 decoding error.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

/// Error type for schema validation and type resolution.
///
/// Any of these aborts generation: they describe a schema that cannot be
/// turned into bridges, not a malformed document.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Parsing error.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// A type reference names no known struct or enum.
    #[error("unknown type '{type_name}' for '{field}' in {interface}.{element}")]
    UnknownType {
        /// Enclosing interface.
        interface: String,
        /// Enclosing struct or function.
        element: String,
        /// Field name.
        field: String,
        /// Unresolved type reference.
        type_name: String,
    },

    /// Two definitions share a key.
    #[error("duplicate {kind} definition: '{name}'")]
    DuplicateDefinition {
        /// Kind of definition (interface, struct, enum, parameter).
        kind: String,
        /// Qualified name of the duplicate.
        name: String,
    },

    /// A request has no response of the same name, or the reverse.
    #[error("{message_type} '{interface}.{function}' has no matching {missing}")]
    UnpairedFunction {
        /// Interface name.
        interface: String,
        /// Function name.
        function: String,
        /// Message type that was found.
        message_type: String,
        /// Message type that is missing.
        missing: String,
    },

    /// A struct contains itself without an array in between.
    #[error("recursive struct nesting: {path}")]
    RecursiveStruct {
        /// Chain of struct keys forming the cycle.
        path: String,
    },
}

impl ParseError {
    /// Creates a missing attribute error.
    pub fn missing_attr(element: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::MissingAttribute {
            element: element.into(),
            attribute: attribute.into(),
        }
    }

    /// Creates an invalid attribute error.
    pub fn invalid_attr(
        element: impl Into<String>,
        attribute: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::InvalidAttribute {
            element: element.into(),
            attribute: attribute.into(),
            value: value.into(),
        }
    }
}

impl SchemaError {
    /// Creates a duplicate definition error.
    pub fn duplicate(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self::DuplicateDefinition {
            kind: kind.into(),
            name: name.into(),
        }
    }

    /// Creates an unknown type error.
    pub fn unknown_type(
        interface: impl Into<String>,
        element: impl Into<String>,
        field: impl Into<String>,
        type_name: impl Into<String>,
    ) -> Self {
        Self::UnknownType {
            interface: interface.into(),
            element: element.into(),
            field: field.into(),
            type_name: type_name.into(),
        }
    }
}

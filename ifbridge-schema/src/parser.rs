//! Interface XML schema parser.
//!
//! This module parses interface definition files (`<interfaces>` root with
//! one `<interface>` per namespace) into the [`Schema`] model.

use crate::error::ParseError;
use crate::types::{
    EnumDef, EnumElement, FunctionDef, InterfaceDef, MessageType, ParamDef, Schema, StructDef,
};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// Parses an interface schema from a string.
///
/// # Arguments
/// * `xml` - XML schema content
///
/// # Returns
/// Parsed schema or parse error.
///
/// # Errors
/// Returns `ParseError` if the XML is malformed or contains invalid schema elements.
pub fn parse_schema(xml: &str) -> Result<Schema, ParseError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut schema: Option<Schema> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name_bytes = e.name().as_ref().to_vec();
                let name = std::str::from_utf8(&name_bytes)?;
                match (name, schema.as_mut()) {
                    ("interfaces", None) => schema = Some(parse_root(e)?),
                    ("interface", Some(schema)) => {
                        let interface = parse_interface(&mut reader, e, true)?;
                        schema.add_interface(interface);
                    }
                    ("interface", None) => {
                        return Err(ParseError::InvalidStructure {
                            message: "interface element outside of interfaces".to_string(),
                        });
                    }
                    _ => skip_element(&mut reader)?,
                }
            }
            Ok(Event::Empty(ref e)) => {
                let name_bytes = e.name().as_ref().to_vec();
                let name = std::str::from_utf8(&name_bytes)?;
                match (name, schema.as_mut()) {
                    ("interfaces", None) => schema = Some(parse_root(e)?),
                    ("interface", Some(schema)) => {
                        let interface = parse_interface(&mut reader, e, false)?;
                        schema.add_interface(interface);
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    schema.ok_or_else(|| ParseError::InvalidStructure {
        message: "No interfaces element found".to_string(),
    })
}

/// Parses the root element attributes.
fn parse_root(e: &BytesStart<'_>) -> Result<Schema, ParseError> {
    let mut schema = Schema::new();
    for attr in e.attributes().flatten() {
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let value = std::str::from_utf8(&attr.value)?;
        if key == "name" {
            schema.name = Some(value.to_string());
        }
    }
    Ok(schema)
}

/// Parses an interface element and its children.
fn parse_interface(
    reader: &mut Reader<&[u8]>,
    e: &BytesStart<'_>,
    has_children: bool,
) -> Result<InterfaceDef, ParseError> {
    let name = required_name(e, "interface")?;
    let mut interface = InterfaceDef::new(name);
    if !has_children {
        return Ok(interface);
    }

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name_bytes = e.name().as_ref().to_vec();
                match std::str::from_utf8(&name_bytes)? {
                    "enum" => interface.enums.push(parse_enum(reader, e, true)?),
                    "struct" => interface.structs.push(parse_struct(reader, e, true)?),
                    "function" => interface.functions.push(parse_function(reader, e, true)?),
                    "description" => interface.description = Some(read_text(reader)?),
                    _ => skip_element(reader)?,
                }
            }
            Ok(Event::Empty(ref e)) => {
                let name_bytes = e.name().as_ref().to_vec();
                match std::str::from_utf8(&name_bytes)? {
                    "enum" => interface.enums.push(parse_enum(reader, e, false)?),
                    "struct" => interface.structs.push(parse_struct(reader, e, false)?),
                    "function" => interface.functions.push(parse_function(reader, e, false)?),
                    _ => {}
                }
            }
            Ok(Event::End(_)) => break,
            Ok(Event::Eof) => return Err(unexpected_eof("interface")),
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(interface)
}

/// Parses an enum element and its elements.
fn parse_enum(
    reader: &mut Reader<&[u8]>,
    e: &BytesStart<'_>,
    has_children: bool,
) -> Result<EnumDef, ParseError> {
    let mut enum_def = EnumDef::new(required_name(e, "enum")?);
    if !has_children {
        return Ok(enum_def);
    }

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name_bytes = e.name().as_ref().to_vec();
                match std::str::from_utf8(&name_bytes)? {
                    "element" => enum_def.add_element(parse_enum_element(reader, e, true)?),
                    "description" => enum_def.description = Some(read_text(reader)?),
                    _ => skip_element(reader)?,
                }
            }
            Ok(Event::Empty(ref e)) => {
                let name_bytes = e.name().as_ref().to_vec();
                if std::str::from_utf8(&name_bytes)? == "element" {
                    enum_def.add_element(parse_enum_element(reader, e, false)?);
                }
            }
            Ok(Event::End(_)) => break,
            Ok(Event::Eof) => return Err(unexpected_eof("enum")),
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(enum_def)
}

/// Parses an enum element entry.
fn parse_enum_element(
    reader: &mut Reader<&[u8]>,
    e: &BytesStart<'_>,
    has_children: bool,
) -> Result<EnumElement, ParseError> {
    let mut name = None;
    let mut value = None;

    for attr in e.attributes().flatten() {
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let raw = std::str::from_utf8(&attr.value)?;
        match key {
            "name" => name = Some(raw.to_string()),
            "value" => {
                value = Some(
                    raw.trim()
                        .parse()
                        .map_err(|_| ParseError::invalid_attr("element", "value", raw))?,
                )
            }
            _ => {}
        }
    }

    let name = name.ok_or_else(|| ParseError::missing_attr("element", "name"))?;
    let mut element = EnumElement::new(name, value);
    if has_children {
        element.description = read_description(reader)?;
    }
    Ok(element)
}

/// Parses a struct element and its fields.
fn parse_struct(
    reader: &mut Reader<&[u8]>,
    e: &BytesStart<'_>,
    has_children: bool,
) -> Result<StructDef, ParseError> {
    let mut struct_def = StructDef::new(required_name(e, "struct")?);
    if !has_children {
        return Ok(struct_def);
    }

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name_bytes = e.name().as_ref().to_vec();
                match std::str::from_utf8(&name_bytes)? {
                    "param" => struct_def.add_param(parse_param(reader, e, true)?),
                    "description" => struct_def.description = Some(read_text(reader)?),
                    _ => skip_element(reader)?,
                }
            }
            Ok(Event::Empty(ref e)) => {
                let name_bytes = e.name().as_ref().to_vec();
                if std::str::from_utf8(&name_bytes)? == "param" {
                    struct_def.add_param(parse_param(reader, e, false)?);
                }
            }
            Ok(Event::End(_)) => break,
            Ok(Event::Eof) => return Err(unexpected_eof("struct")),
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(struct_def)
}

/// Parses a function element and its parameters.
fn parse_function(
    reader: &mut Reader<&[u8]>,
    e: &BytesStart<'_>,
    has_children: bool,
) -> Result<FunctionDef, ParseError> {
    let mut name = None;
    let mut message_type = None;

    for attr in e.attributes().flatten() {
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let value = std::str::from_utf8(&attr.value)?;
        match key {
            "name" => name = Some(value.to_string()),
            "messagetype" => {
                message_type = Some(
                    MessageType::parse(value)
                        .ok_or_else(|| ParseError::invalid_attr("function", "messagetype", value))?,
                )
            }
            _ => {}
        }
    }

    let name = name.ok_or_else(|| ParseError::missing_attr("function", "name"))?;
    let message_type =
        message_type.ok_or_else(|| ParseError::missing_attr("function", "messagetype"))?;
    let mut function = FunctionDef::new(name, message_type);
    if !has_children {
        return Ok(function);
    }

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name_bytes = e.name().as_ref().to_vec();
                match std::str::from_utf8(&name_bytes)? {
                    "param" => function.add_param(parse_param(reader, e, true)?),
                    "description" => function.description = Some(read_text(reader)?),
                    _ => skip_element(reader)?,
                }
            }
            Ok(Event::Empty(ref e)) => {
                let name_bytes = e.name().as_ref().to_vec();
                if std::str::from_utf8(&name_bytes)? == "param" {
                    function.add_param(parse_param(reader, e, false)?);
                }
            }
            Ok(Event::End(_)) => break,
            Ok(Event::Eof) => return Err(unexpected_eof("function")),
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(function)
}

/// Parses a param element. Range and size constraints are accepted and
/// ignored.
fn parse_param(
    reader: &mut Reader<&[u8]>,
    e: &BytesStart<'_>,
    has_children: bool,
) -> Result<ParamDef, ParseError> {
    let mut name = None;
    let mut type_name = None;
    let mut array = false;
    let mut mandatory = true;

    for attr in e.attributes().flatten() {
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let value = std::str::from_utf8(&attr.value)?;
        match key {
            "name" => name = Some(value.to_string()),
            "type" => type_name = Some(value.trim().to_string()),
            "array" => array = parse_flag("array", value)?,
            "mandatory" => mandatory = parse_flag("mandatory", value)?,
            _ => {}
        }
    }

    let name = name.ok_or_else(|| ParseError::missing_attr("param", "name"))?;
    let type_name = type_name.ok_or_else(|| ParseError::missing_attr("param", "type"))?;

    let mut param = ParamDef::new(name, type_name);
    param.array = array;
    param.mandatory = mandatory;
    if has_children {
        param.description = read_description(reader)?;
    }
    Ok(param)
}

/// Reads the `name` attribute of a definition element.
fn required_name(e: &BytesStart<'_>, element: &str) -> Result<String, ParseError> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == b"name" {
            return Ok(std::str::from_utf8(&attr.value)?.to_string());
        }
    }
    Err(ParseError::missing_attr(element, "name"))
}

/// Parses a boolean attribute.
fn parse_flag(attribute: &str, value: &str) -> Result<bool, ParseError> {
    match value.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::invalid_attr("param", attribute, value)),
    }
}

/// Reads the children of a leaf element, keeping only its description.
fn read_description(reader: &mut Reader<&[u8]>) -> Result<Option<String>, ParseError> {
    let mut description = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                if e.name().as_ref() == b"description" {
                    description = Some(read_text(reader)?);
                } else {
                    skip_element(reader)?;
                }
            }
            Ok(Event::End(_)) => break,
            Ok(Event::Eof) => return Err(unexpected_eof("param")),
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(description)
}

/// Collects the text content of the current element up to its end tag.
fn read_text(reader: &mut Reader<&[u8]>) -> Result<String, ParseError> {
    let mut parts: Vec<String> = Vec::new();
    let mut buf = Vec::new();
    let mut depth = 1;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Text(ref t)) => {
                let text = std::str::from_utf8(t.as_ref())?.trim();
                if !text.is_empty() {
                    parts.push(text.to_string());
                }
            }
            Ok(Event::CData(ref t)) => {
                parts.push(std::str::from_utf8(t.as_ref())?.trim().to_string());
            }
            Ok(Event::Start(_)) => depth += 1,
            Ok(Event::End(_)) => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            Ok(Event::Eof) => return Err(unexpected_eof("description")),
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(parts.join(" "))
}

/// Skips the current element including all of its children.
fn skip_element(reader: &mut Reader<&[u8]>) -> Result<(), ParseError> {
    let mut buf = Vec::new();
    let mut depth = 1;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(_)) => depth += 1,
            Ok(Event::End(_)) => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

fn unexpected_eof(element: &str) -> ParseError {
    ParseError::InvalidStructure {
        message: format!("unexpected end of document inside '{element}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE_SCHEMA: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<interfaces name="Test API">
    <interface name="Common" version="1.0">
        <description>Shared types</description>
        <enum name="Result">
            <element name="SUCCESS" value="0"/>
            <element name="REJECTED" value="4">
                <description>Request was rejected</description>
            </element>
        </enum>
        <struct name="Coord">
            <param name="x" type="Integer" mandatory="true" minvalue="0"/>
            <param name="y" type="Integer"/>
        </struct>
    </interface>
    <interface name="UI">
        <function name="Show" messagetype="request">
            <description>Shows text</description>
            <param name="lines" type="String" array="true" mandatory="false">
                <description>Text lines</description>
            </param>
            <param name="at" type="Common.Coord"/>
        </function>
        <function name="Show" messagetype="response"/>
        <function name="OnReady" messagetype="notification"/>
    </interface>
    <interface name="Empty"/>
</interfaces>"#;

    #[test]
    fn test_parse_simple_schema() {
        let schema = parse_schema(SIMPLE_SCHEMA).expect("Failed to parse schema");

        assert_eq!(schema.name.as_deref(), Some("Test API"));
        assert_eq!(schema.interfaces.len(), 3);
        assert_eq!(schema.interfaces[2].name, "Empty");
    }

    #[test]
    fn test_parse_types() {
        let schema = parse_schema(SIMPLE_SCHEMA).expect("Failed to parse schema");
        let common = schema.get_interface("Common").expect("Missing Common");

        assert_eq!(common.description.as_deref(), Some("Shared types"));
        let coord = common.get_struct("Coord").expect("Missing Coord");
        assert_eq!(coord.params.len(), 2);
        assert_eq!(coord.params[0].name, "x");
        assert!(coord.params[1].mandatory);

        let result = common.get_enum("Result").expect("Missing Result");
        assert_eq!(result.elements.len(), 2);
        assert_eq!(result.elements[1].value, Some(4));
        assert_eq!(
            result.elements[1].description.as_deref(),
            Some("Request was rejected")
        );
    }

    #[test]
    fn test_parse_functions() {
        let schema = parse_schema(SIMPLE_SCHEMA).expect("Failed to parse schema");
        let ui = schema.get_interface("UI").expect("Missing UI");

        assert_eq!(ui.functions.len(), 3);
        let show = ui
            .find_function("Show", MessageType::Request)
            .expect("Missing Show request");
        assert_eq!(show.description.as_deref(), Some("Shows text"));
        assert_eq!(show.params.len(), 2);

        let lines = &show.params[0];
        assert!(lines.array);
        assert!(lines.is_optional());
        assert_eq!(lines.description.as_deref(), Some("Text lines"));
        assert_eq!(show.params[1].type_name, "Common.Coord");

        assert!(ui.find_function("OnReady", MessageType::Notification).is_some());
    }

    #[test]
    fn test_missing_root() {
        let err = parse_schema("<other/>").unwrap_err();
        assert!(matches!(err, ParseError::InvalidStructure { .. }));
    }

    #[test]
    fn test_missing_param_type() {
        let xml = r#"<interfaces><interface name="A">
            <struct name="S"><param name="x"/></struct>
        </interface></interfaces>"#;
        let err = parse_schema(xml).unwrap_err();
        assert!(matches!(
            err,
            ParseError::MissingAttribute { ref attribute, .. } if attribute == "type"
        ));
    }

    #[test]
    fn test_invalid_message_type() {
        let xml = r#"<interfaces><interface name="A">
            <function name="F" messagetype="event"/>
        </interface></interfaces>"#;
        let err = parse_schema(xml).unwrap_err();
        assert!(matches!(err, ParseError::InvalidAttribute { .. }));
    }

    #[test]
    fn test_invalid_flag() {
        let xml = r#"<interfaces><interface name="A">
            <struct name="S"><param name="x" type="Integer" array="yes"/></struct>
        </interface></interfaces>"#;
        let err = parse_schema(xml).unwrap_err();
        assert!(matches!(
            err,
            ParseError::InvalidAttribute { ref attribute, .. } if attribute == "array"
        ));
    }

    #[test]
    fn test_unknown_elements_are_skipped() {
        let xml = r#"<interfaces><interface name="A">
            <history><note>old</note></history>
            <struct name="S"><param name="x" type="Integer"/></struct>
        </interface></interfaces>"#;
        let schema = parse_schema(xml).expect("Failed to parse schema");
        assert_eq!(schema.interfaces[0].structs.len(), 1);
    }
}

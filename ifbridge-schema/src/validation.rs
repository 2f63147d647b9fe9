//! Schema validation utilities.
//!
//! [`validate_schema`] checks the raw model for duplicate keys and unpaired
//! functions; [`validate_ir`] checks resolved structs for by-value
//! recursion, which no generated struct could represent.

use crate::error::SchemaError;
use crate::ir::{InterfaceIr, TypeKey, WireType};
use crate::types::{InterfaceDef, MessageType, ParamDef, Schema};
use std::collections::{HashMap, HashSet};

/// Validates a parsed schema for correctness.
///
/// # Arguments
/// * `schema` - The schema to validate
///
/// # Returns
/// Ok(()) if valid, or SchemaError describing the issue.
///
/// # Errors
/// Returns `SchemaError` if validation fails.
pub fn validate_schema(schema: &Schema) -> Result<(), SchemaError> {
    let mut seen_interfaces = HashSet::new();
    for interface in &schema.interfaces {
        if !seen_interfaces.insert(interface.name.as_str()) {
            return Err(SchemaError::duplicate("interface", &interface.name));
        }
        validate_types(interface)?;
        validate_functions(interface)?;
    }
    Ok(())
}

/// Validates struct and enum definitions of one interface.
fn validate_types(interface: &InterfaceDef) -> Result<(), SchemaError> {
    let mut seen_types = HashSet::new();

    for struct_def in &interface.structs {
        let key = format!("{}.{}", interface.name, struct_def.name);
        if !seen_types.insert(struct_def.name.as_str()) {
            return Err(SchemaError::duplicate("struct", key));
        }
        validate_params(&key, &struct_def.params)?;
    }

    for enum_def in &interface.enums {
        let key = format!("{}.{}", interface.name, enum_def.name);
        if !seen_types.insert(enum_def.name.as_str()) {
            return Err(SchemaError::duplicate("enum", key));
        }
        let mut seen_elements = HashSet::new();
        for element in &enum_def.elements {
            if !seen_elements.insert(element.name.as_str()) {
                return Err(SchemaError::duplicate(
                    "enum element",
                    format!("{key}.{}", element.name),
                ));
            }
        }
    }

    Ok(())
}

/// Validates function definitions of one interface.
fn validate_functions(interface: &InterfaceDef) -> Result<(), SchemaError> {
    let mut seen = HashSet::new();

    for function in &interface.functions {
        let key = format!("{}.{}", interface.name, function.name);
        if !seen.insert((function.name.as_str(), function.message_type)) {
            return Err(SchemaError::duplicate(function.message_type.as_str(), key));
        }
        validate_params(&key, &function.params)?;

        let counterpart = match function.message_type {
            MessageType::Request => MessageType::Response,
            MessageType::Response => MessageType::Request,
            MessageType::Notification => continue,
        };
        if interface.find_function(&function.name, counterpart).is_none() {
            return Err(SchemaError::UnpairedFunction {
                interface: interface.name.clone(),
                function: function.name.clone(),
                message_type: function.message_type.as_str().to_string(),
                missing: counterpart.as_str().to_string(),
            });
        }
    }

    Ok(())
}

/// Rejects duplicate parameter names, which would collide as wire keys.
fn validate_params(owner: &str, params: &[ParamDef]) -> Result<(), SchemaError> {
    let mut seen = HashSet::new();
    for param in params {
        if !seen.insert(param.name.as_str()) {
            return Err(SchemaError::duplicate(
                "parameter",
                format!("{owner}.{}", param.name),
            ));
        }
    }
    Ok(())
}

/// Validates resolved structs.
///
/// # Errors
/// Returns `SchemaError::RecursiveStruct` if a struct contains itself
/// through fields that are not arrays.
pub fn validate_ir(ir: &InterfaceIr) -> Result<(), SchemaError> {
    let by_value: HashMap<&TypeKey, Vec<&TypeKey>> = ir
        .structs
        .iter()
        .map(|s| {
            let children = s
                .fields
                .iter()
                .filter_map(|field| embedded_struct(&field.ty))
                .collect();
            (&s.key, children)
        })
        .collect();

    let mut done = HashSet::new();
    for s in &ir.structs {
        let mut path = Vec::new();
        check_recursion(&s.key, &by_value, &mut path, &mut done)?;
    }
    Ok(())
}

/// Returns the struct stored inline by a field. Arrays add indirection.
fn embedded_struct(ty: &WireType) -> Option<&TypeKey> {
    match ty {
        WireType::Array(_) => None,
        WireType::Optional(inner) => embedded_struct(inner),
        WireType::Base(_) => ty.struct_key(),
    }
}

fn check_recursion<'a>(
    key: &'a TypeKey,
    by_value: &HashMap<&'a TypeKey, Vec<&'a TypeKey>>,
    path: &mut Vec<&'a TypeKey>,
    done: &mut HashSet<&'a TypeKey>,
) -> Result<(), SchemaError> {
    if done.contains(key) {
        return Ok(());
    }
    if let Some(start) = path.iter().position(|k| *k == key) {
        let cycle: Vec<String> = path[start..]
            .iter()
            .chain(std::iter::once(&key))
            .map(ToString::to_string)
            .collect();
        return Err(SchemaError::RecursiveStruct {
            path: cycle.join(" -> "),
        });
    }

    path.push(key);
    for child in by_value.get(key).into_iter().flatten() {
        check_recursion(child, by_value, path, done)?;
    }
    path.pop();
    done.insert(key);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_schema;

    fn resolve(xml: &str) -> Result<InterfaceIr, SchemaError> {
        let schema = parse_schema(xml).expect("Failed to parse schema");
        InterfaceIr::from_schema(&schema)
    }

    #[test]
    fn test_duplicate_struct() {
        let err = resolve(
            r#"<interfaces><interface name="Common">
                <struct name="Coord"><param name="x" type="Integer"/></struct>
                <struct name="Coord"><param name="y" type="Integer"/></struct>
            </interface></interfaces>"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SchemaError::DuplicateDefinition { ref kind, ref name }
                if kind == "struct" && name == "Common.Coord"
        ));
    }

    #[test]
    fn test_struct_and_enum_share_key() {
        let err = resolve(
            r#"<interfaces><interface name="Common">
                <struct name="Mode"><param name="x" type="Integer"/></struct>
                <enum name="Mode"><element name="A"/></enum>
            </interface></interfaces>"#,
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateDefinition { .. }));
    }

    #[test]
    fn test_duplicate_interface() {
        let err = resolve(
            r#"<interfaces><interface name="UI"/><interface name="UI"/></interfaces>"#,
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateDefinition { .. }));
    }

    #[test]
    fn test_duplicate_param() {
        let err = resolve(
            r#"<interfaces><interface name="UI">
                <function name="OnX" messagetype="notification">
                    <param name="a" type="Integer"/>
                    <param name="a" type="String"/>
                </function>
            </interface></interfaces>"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SchemaError::DuplicateDefinition { ref name, .. } if name == "UI.OnX.a"
        ));
    }

    #[test]
    fn test_unpaired_request() {
        let err = resolve(
            r#"<interfaces><interface name="UI">
                <function name="Show" messagetype="request"/>
            </interface></interfaces>"#,
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "request 'UI.Show' has no matching response"
        );
    }

    #[test]
    fn test_unpaired_response() {
        let err = resolve(
            r#"<interfaces><interface name="UI">
                <function name="Show" messagetype="response"/>
            </interface></interfaces>"#,
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::UnpairedFunction { .. }));
    }

    #[test]
    fn test_recursive_struct() {
        let err = resolve(
            r#"<interfaces><interface name="A">
                <struct name="Node"><param name="next" type="Link" mandatory="false"/></struct>
                <struct name="Link"><param name="node" type="Node"/></struct>
            </interface></interfaces>"#,
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "recursive struct nesting: A.Node -> A.Link -> A.Node"
        );
    }

    #[test]
    fn test_array_breaks_recursion() {
        let ir = resolve(
            r#"<interfaces><interface name="A">
                <struct name="Tree"><param name="children" type="Tree" array="true"/></struct>
            </interface></interfaces>"#,
        )
        .expect("Failed to resolve schema");
        assert_eq!(ir.structs.len(), 1);
    }
}

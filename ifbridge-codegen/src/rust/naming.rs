//! Rust names and types for schema elements.
//!
//! [`rust_type`] peels wrappers in the same order the resolver applied them,
//! so `Option<Vec<T>>` is always `rust_type` of the array one wrapping step
//! out, just like [`WireType::mangled_name`](ifbridge_schema::WireType::mangled_name).

use ifbridge_schema::ir::{BaseKind, TypeKey, WireType, to_pascal_case, to_snake_case};

const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized",
    "use", "virtual", "where", "while", "yield",
];

/// Keywords that cannot be raw identifiers.
const UNRAWABLE: &[&str] = &["self", "Self", "super", "crate", "_"];

/// Names used by generated function bodies.
const RESERVED_LOCALS: &[&str] = &[
    "context", "ret", "in_arg", "out_arg", "reply", "value", "err", "args", "host", "other",
];

/// Returns the Rust type name of a struct: namespace and name in PascalCase.
#[must_use]
pub fn type_name(key: &TypeKey) -> String {
    format!("{}{}", to_pascal_case(&key.namespace), to_pascal_case(&key.name))
}

/// Returns the Rust representation of a resolved type.
#[must_use]
pub fn rust_type(ty: &WireType) -> String {
    match ty {
        WireType::Optional(inner) => format!("Option<{}>", rust_type(inner)),
        WireType::Array(inner) => format!("Vec<{}>", rust_type(inner)),
        WireType::Base(base) => base_type(base),
    }
}

fn base_type(base: &BaseKind) -> String {
    match base {
        BaseKind::Integer | BaseKind::Enum(_) => "i32".to_string(),
        BaseKind::String => "String".to_string(),
        BaseKind::Boolean => "bool".to_string(),
        BaseKind::Float => "f64".to_string(),
        BaseKind::Struct(key) => type_name(key),
    }
}

/// Returns the type a parameter arrives in from a host signal: the value
/// itself for unmodified primitives, the raw variant otherwise.
#[must_use]
pub fn native_type(ty: &WireType) -> String {
    if ty.is_passthrough() {
        rust_type(ty)
    } else {
        "rt::Variant".to_string()
    }
}

/// Returns true if `s` is a plain Rust identifier.
#[must_use]
pub fn is_ident(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
        && !KEYWORDS.contains(&s)
        && !UNRAWABLE.contains(&s)
}

/// Replaces characters that cannot appear in an identifier.
fn sanitize(name: &str) -> String {
    let mut ident: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    ident
}

/// Makes `name` usable as an identifier.
#[must_use]
pub fn escape_ident(name: &str) -> String {
    let mut ident = sanitize(name);
    if UNRAWABLE.contains(&ident.as_str()) {
        ident.push('_');
    } else if KEYWORDS.contains(&ident.as_str()) {
        ident.insert_str(0, "r#");
    }
    ident
}

/// Field or method name for a schema name.
#[must_use]
pub fn field_ident(name: &str) -> String {
    escape_ident(&to_snake_case(name))
}

/// Parameter name inside generated bodies. Avoids the locals those bodies
/// declare themselves.
#[must_use]
pub fn param_ident(name: &str) -> String {
    let snake = to_snake_case(name);
    if RESERVED_LOCALS.contains(&snake.as_str()) {
        format!("{snake}_")
    } else {
        escape_ident(&snake)
    }
}

/// Local holding the decoded form of a parameter.
#[must_use]
pub fn decoded_ident(name: &str) -> String {
    format!("p_{}", escape_ident(&to_snake_case(name)).trim_start_matches("r#"))
}

/// Out-parameter carrying a secondary response field.
#[must_use]
pub fn out_ident(name: &str) -> String {
    format!("{}_out", sanitize(&to_snake_case(name)))
}

/// Enum variant or type name for a schema name.
#[must_use]
pub fn variant_ident(name: &str) -> String {
    let mut ident = to_pascal_case(&sanitize(name));
    if UNRAWABLE.contains(&ident.as_str()) {
        ident.push('_');
    }
    ident
}

/// Constant name for an enum element.
#[must_use]
pub fn const_ident(name: &str) -> String {
    escape_ident(&to_snake_case(name).to_ascii_uppercase())
}

/// Name the host uses for a method or signal: the schema name with its
/// first letter lowercased.
#[must_use]
pub fn host_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Renders optional description text as doc comment lines.
#[must_use]
pub fn doc_comment(indent: &str, description: Option<&str>, fallback: &str) -> String {
    let text = description
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or(fallback);
    let mut output = String::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            output.push_str(&format!("{indent}///\n"));
        } else {
            output.push_str(&format!("{indent}/// {line}\n"));
        }
    }
    output
}

//! # ifbridge Codegen
//!
//! Bridge and marshaling code generation from interface schemas.
//!
//! This crate provides:
//! - Struct declarations with `Marshal` impls
//! - Call bridges and notification translators per interface
//! - Wire type registration and the aggregate bridge set
//! - Build script integration

pub mod build;
pub mod config;
pub mod error;
pub mod generator;
pub mod rust;

pub use config::{DEFAULT_INTERFACE_PATH, GeneratorConfig};
pub use error::CodegenError;
pub use generator::{GeneratedCode, Generator};

/// Generates bridge code from an interface schema string.
///
/// # Arguments
/// * `xml` - Interface schema content
/// * `config` - Generator options
///
/// # Returns
/// The declarations and definitions artifacts.
///
/// # Errors
/// Returns `CodegenError` if parsing, validation or generation fails.
pub fn generate_from_xml(xml: &str, config: &GeneratorConfig) -> Result<GeneratedCode, CodegenError> {
    let schema = ifbridge_schema::parse_schema(xml)?;
    let ir = ifbridge_schema::InterfaceIr::from_schema(&schema)?;
    let generator = Generator::new(&ir, config);
    generator.generate()
}

/// Generates bridge code from an interface schema file.
///
/// # Arguments
/// * `path` - Path to the schema file
/// * `config` - Generator options
///
/// # Returns
/// The declarations and definitions artifacts.
///
/// # Errors
/// Returns `CodegenError` if reading, parsing, validation or generation fails.
pub fn generate_from_file(
    path: &std::path::Path,
    config: &GeneratorConfig,
) -> Result<GeneratedCode, CodegenError> {
    tracing::debug!("Reading schema {}", path.display());
    let xml = std::fs::read_to_string(path)?;
    generate_from_xml(&xml, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_from_xml_reports_unknown_type() {
        let xml = r#"<interfaces><interface name="UI">
            <function name="Show" messagetype="request">
                <param name="at" type="Missing"/>
            </function>
            <function name="Show" messagetype="response"/>
        </interface></interfaces>"#;
        let result = generate_from_xml(xml, &GeneratorConfig::default());
        assert!(matches!(
            result,
            Err(CodegenError::Schema(ifbridge_schema::SchemaError::UnknownType { .. }))
        ));
    }

    #[test]
    fn test_generate_from_xml_reports_parse_error() {
        let result = generate_from_xml("<schema/>", &GeneratorConfig::default());
        assert!(matches!(result, Err(CodegenError::Parse(_))));
    }

    #[test]
    fn test_generate_from_file() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("api.xml");
        std::fs::write(
            &path,
            r#"<interfaces><interface name="UI">
                <function name="OnReady" messagetype="notification"/>
            </interface></interfaces>"#,
        )
        .expect("Failed to write schema");

        let code = generate_from_file(&path, &GeneratorConfig::default())
            .expect("Failed to generate");
        assert!(code.declarations.contains("pub enum UIEvent {\n    OnReady,\n}"));
        assert!(code.definitions.contains("pub fn on_ready_from_host("));
    }

    #[test]
    fn test_generate_from_missing_file() {
        let result = generate_from_file(
            std::path::Path::new("/nonexistent/api.xml"),
            &GeneratorConfig::default(),
        );
        assert!(matches!(result, Err(CodegenError::Io(_))));
    }
}

//! Generator configuration.

use crate::CodegenError;
use crate::rust::naming::is_ident;

/// Default transport interface prefix.
pub const DEFAULT_INTERFACE_PATH: &str = "com.ifbridge.hmi";

/// Options controlling the generated code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Prefix of each bridge's `INTERFACE` constant.
    pub interface_path: String,
    /// Prefix of the aggregate types, `Api` gives `ApiBridges` and `ApiEvent`.
    pub aggregate_name: String,
    /// Path of the runtime crate, imported by generated code as `rt`.
    pub runtime_crate: String,
    /// File name of the declarations artifact.
    pub declarations_file: String,
    /// File name of the definitions artifact.
    pub definitions_file: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            interface_path: DEFAULT_INTERFACE_PATH.to_string(),
            aggregate_name: "Api".to_string(),
            runtime_crate: "ifbridge_core".to_string(),
            declarations_file: "bridge_types.rs".to_string(),
            definitions_file: "bridge_impl.rs".to_string(),
        }
    }
}

impl GeneratorConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the interface path prefix.
    #[must_use]
    pub fn with_interface_path(mut self, path: impl Into<String>) -> Self {
        self.interface_path = path.into();
        self
    }

    /// Sets the aggregate name.
    #[must_use]
    pub fn with_aggregate_name(mut self, name: impl Into<String>) -> Self {
        self.aggregate_name = name.into();
        self
    }

    /// Sets the runtime crate path.
    #[must_use]
    pub fn with_runtime_crate(mut self, path: impl Into<String>) -> Self {
        self.runtime_crate = path.into();
        self
    }

    /// Sets both artifact file names.
    #[must_use]
    pub fn with_file_names(
        mut self,
        declarations: impl Into<String>,
        definitions: impl Into<String>,
    ) -> Self {
        self.declarations_file = declarations.into();
        self.definitions_file = definitions.into();
        self
    }

    /// Name of the generated aggregate struct.
    #[must_use]
    pub fn bridges_type(&self) -> String {
        format!("{}Bridges", self.aggregate_name)
    }

    /// Name of the generated aggregate event enum.
    #[must_use]
    pub fn event_type(&self) -> String {
        format!("{}Event", self.aggregate_name)
    }

    /// Checks that every name ends up as valid Rust.
    ///
    /// # Errors
    /// Returns `CodegenError::Config` describing the first invalid option.
    pub fn validate(&self) -> Result<(), CodegenError> {
        if !is_ident(&self.aggregate_name) {
            return Err(CodegenError::config(format!(
                "aggregate name '{}' is not an identifier",
                self.aggregate_name
            )));
        }
        let crate_path = self
            .runtime_crate
            .strip_prefix("::")
            .unwrap_or(&self.runtime_crate);
        if !crate_path.split("::").all(is_ident) {
            return Err(CodegenError::config(format!(
                "runtime crate '{}' is not a path",
                self.runtime_crate
            )));
        }
        for file in [&self.declarations_file, &self.definitions_file] {
            if file.is_empty() || file.contains(['/', '\\']) {
                return Err(CodegenError::config(format!(
                    "'{file}' is not a plain file name"
                )));
            }
        }
        if self.declarations_file == self.definitions_file {
            return Err(CodegenError::config(
                "declarations and definitions need distinct file names",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = GeneratorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.bridges_type(), "ApiBridges");
        assert_eq!(config.event_type(), "ApiEvent");
    }

    #[test]
    fn test_builder() {
        let config = GeneratorConfig::new()
            .with_interface_path("com.example.hmi")
            .with_aggregate_name("Hmi")
            .with_runtime_crate("::ifbridge::core")
            .with_file_names("types.rs", "impl.rs");
        assert!(config.validate().is_ok());
        assert_eq!(config.bridges_type(), "HmiBridges");
        assert_eq!(config.definitions_file, "impl.rs");
    }

    #[test]
    fn test_invalid_aggregate_name() {
        let config = GeneratorConfig::new().with_aggregate_name("my api");
        assert!(matches!(config.validate(), Err(CodegenError::Config { .. })));
    }

    #[test]
    fn test_invalid_runtime_crate() {
        let config = GeneratorConfig::new().with_runtime_crate("ifbridge-core");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_same_file_names() {
        let config = GeneratorConfig::new().with_file_names("out.rs", "out.rs");
        assert!(config.validate().is_err());
    }
}

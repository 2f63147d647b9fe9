//! Build script integration.
//!
//! ```ignore
//! // build.rs
//! fn main() {
//!     let config = ifbridge_codegen::GeneratorConfig::default();
//!     ifbridge_codegen::build::generate_to_out_dir("schema/hmi_api.xml", &config)
//!         .expect("Failed to generate bridges");
//! }
//! ```

use crate::{CodegenError, GeneratorConfig};
use std::path::{Path, PathBuf};

/// Generates both artifacts from `schema` into `OUT_DIR` and tells cargo to
/// rerun when the schema changes.
///
/// # Returns
/// Paths of the declarations and definitions files.
///
/// # Errors
/// Returns `CodegenError` if `OUT_DIR` is unset or generation fails.
pub fn generate_to_out_dir(
    schema: impl AsRef<Path>,
    config: &GeneratorConfig,
) -> Result<(PathBuf, PathBuf), CodegenError> {
    let schema = schema.as_ref();
    println!("cargo:rerun-if-changed={}", schema.display());

    let out_dir = std::env::var_os("OUT_DIR")
        .map(PathBuf::from)
        .ok_or_else(|| CodegenError::config("OUT_DIR is not set"))?;
    let code = crate::generate_from_file(schema, config)?;
    code.write_to_dir(&out_dir, config)
}

//! Generator configuration.

use std::path::PathBuf;

use crate::codegen::{CodegenOptions, DEFAULT_RUNTIME_CRATE};

/// Configuration for a generator run.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Model file, or a directory of `*.json` model files.
    pub input: PathBuf,

    /// File the generated Rust source is written to.
    pub output: PathBuf,

    /// Name of the generated module. Defaults to the output file stem.
    pub unit: Option<String>,

    /// Path under which generated code imports the runtime crate.
    pub runtime_crate: String,
}

impl GeneratorConfig {
    /// Module name of the generated unit.
    pub fn unit_name(&self) -> String {
        match &self.unit {
            Some(unit) => unit.clone(),
            None => self
                .output
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default(),
        }
    }

    pub fn codegen_options(&self) -> CodegenOptions {
        CodegenOptions {
            runtime_crate: self.runtime_crate.clone(),
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("dbus.json"),
            output: PathBuf::from("src/generated/dbus.rs"),
            unit: None,
            runtime_crate: DEFAULT_RUNTIME_CRATE.to_string(),
        }
    }
}

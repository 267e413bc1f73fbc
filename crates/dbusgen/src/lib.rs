//! # dbusgen
//!
//! This crate generates typed Rust client proxies from D-Bus interface
//! descriptions. The generated code calls into a small transport facade,
//! `dbusgen-runtime`, and converts raw incoming signals into typed events.
//!
//! ## Architecture
//!
//! ```text
//! Interface model (JSON)
//!        │
//!        ▼
//! ┌──────────────┐
//! │    Model     │  Interfaces, members, D-Bus signatures
//! │ (JSON → IR)  │
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │   Validate   │  Identifier uniqueness & type checks
//! │   (IR)       │
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │   Codegen    │  Proxies, events, signal dispatch
//! │ (IR → Rust)  │
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │  Normalize   │  syn parse + canonical layout
//! └──────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dbusgen::{Generator, GeneratorConfig};
//!
//! let config = GeneratorConfig {
//!     input: "dbus/demo.json".into(),
//!     output: "src/generated/demo.rs".into(),
//!     ..GeneratorConfig::default()
//! };
//!
//! let result = Generator::new(config).run()?;
//! println!("{} interfaces", result.interfaces);
//! ```

pub mod codegen;
pub mod config;
pub mod diagnostic;
pub mod model;
pub mod validate;

use std::path::Path;

pub use codegen::CodegenOptions;
pub use config::GeneratorConfig;
pub use diagnostic::GeneratorError;
pub use model::Interface;

/// Drives a complete run: load the model, generate, write the output file.
pub struct Generator {
    config: GeneratorConfig,
}

/// Result of a generator run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateResult {
    pub interfaces: usize,
    pub methods: usize,
    pub properties: usize,
    pub signals: usize,
    /// False when the output file already held identical contents.
    pub written: bool,
}

impl Generator {
    /// Creates a new generator with the given configuration.
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generates code from the configured model and writes it to the output file.
    ///
    /// The output is only touched once generation has fully succeeded.
    pub fn run(&self) -> Result<GenerateResult, GeneratorError> {
        let interfaces = model::load(&self.config.input)?;
        let code = self.generate_code(&interfaces)?;
        let written = self.write_output(&code)?;

        let result = GenerateResult {
            written,
            ..summarize(&interfaces)
        };
        tracing::info!(
            output = %self.config.output.display(),
            interfaces = result.interfaces,
            signals = result.signals,
            written,
            "generated D-Bus proxies"
        );
        Ok(result)
    }

    /// Loads, validates and generates without writing anything.
    pub fn check(&self) -> Result<GenerateResult, GeneratorError> {
        let interfaces = model::load(&self.config.input)?;
        self.generate_code(&interfaces)?;
        Ok(summarize(&interfaces))
    }

    fn generate_code(&self, interfaces: &[Interface]) -> Result<String, GeneratorError> {
        codegen::generate(
            &self.config.unit_name(),
            interfaces,
            &self.config.codegen_options(),
        )
    }

    /// Writes generated code to the output file, skipping identical contents.
    fn write_output(&self, code: &str) -> Result<bool, GeneratorError> {
        let output = &self.config.output;
        if std::fs::read_to_string(output).map_or(false, |existing| existing == code) {
            tracing::debug!(path = %output.display(), "output unchanged");
            return Ok(false);
        }

        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            create_dir(parent)?;
        }
        std::fs::write(output, code).map_err(|e| GeneratorError::io(output, e.to_string()))?;
        Ok(true)
    }
}

/// Generates the source of one unit with default options.
pub fn generate(unit: &str, interfaces: &[Interface]) -> Result<String, GeneratorError> {
    codegen::generate(unit, interfaces, &CodegenOptions::default())
}

fn summarize(interfaces: &[Interface]) -> GenerateResult {
    GenerateResult {
        interfaces: interfaces.len(),
        methods: interfaces.iter().map(|i| i.methods.len()).sum(),
        properties: interfaces.iter().map(|i| i.properties.len()).sum(),
        signals: interfaces.iter().map(|i| i.signals.len()).sum(),
        written: false,
    }
}

fn create_dir(path: &Path) -> Result<(), GeneratorError> {
    std::fs::create_dir_all(path).map_err(|e| GeneratorError::io(path, e.to_string()))
}

//! Generator error types.
#![allow(unused_assignments)]

use std::path::PathBuf;
use miette::Diagnostic;
use thiserror::Error;

/// Errors that can occur while loading a model or generating code.
#[allow(unused_assignments)]
#[derive(Error, Diagnostic, Debug)]
pub enum GeneratorError {
    // =========================================================================
    // IO Errors
    // =========================================================================
    #[error("Failed to access '{}': {message}", path.display())]
    #[diagnostic(code(dbusgen::io::access_failed))]
    IoError {
        path: PathBuf,
        message: String,
    },

    // =========================================================================
    // Model Errors
    // =========================================================================
    #[error("Failed to parse interface model '{}': {message}", path.display())]
    #[diagnostic(
        code(dbusgen::model::parse_failed),
        help("The model is a JSON document of the form {{ \"interfaces\": [ ... ] }}")
    )]
    ModelParse {
        path: PathBuf,
        message: String,
    },

    #[error("Invalid type signature '{signature}': {reason}")]
    #[diagnostic(
        code(dbusgen::model::invalid_signature),
        help("Argument types are single complete D-Bus signatures such as \"s\" or \"a{{sv}}\"")
    )]
    InvalidSignature {
        signature: String,
        reason: String,
    },

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Identifier '{ident}' is generated more than once ({context})")]
    #[diagnostic(
        code(dbusgen::validate::duplicate_identifier),
        help("Rename one of the colliding members; generated names derive from model names")
    )]
    DuplicateIdentifier {
        ident: String,
        context: String,
    },

    #[error("{kind} name must not be empty ({context})")]
    #[diagnostic(code(dbusgen::validate::empty_name))]
    EmptyName {
        kind: &'static str,
        context: String,
    },

    #[error("Unsupported type in {context}: {reason}")]
    #[diagnostic(code(dbusgen::validate::unsupported_type))]
    UnsupportedType {
        context: String,
        reason: String,
    },

    #[error("Invalid output unit name '{name}'")]
    #[diagnostic(
        code(dbusgen::validate::invalid_unit),
        help("The unit name becomes the generated module name and needs a letter or digit")
    )]
    InvalidUnitName {
        name: String,
    },

    // =========================================================================
    // Code Generation Errors
    // =========================================================================
    #[error("Generated code is not well-formed Rust at {line}:{column}: {message}")]
    #[diagnostic(
        code(dbusgen::codegen::malformed_output),
        help("This is a bug in the generator templates, not in the interface model")
    )]
    MalformedOutput {
        message: String,
        line: usize,
        column: usize,
    },
}

impl GeneratorError {
    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::IoError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a duplicate identifier error.
    pub fn duplicate(ident: impl Into<String>, context: impl Into<String>) -> Self {
        Self::DuplicateIdentifier {
            ident: ident.into(),
            context: context.into(),
        }
    }
}

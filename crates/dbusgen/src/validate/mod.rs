//! Validation of the interface model.
//!
//! Generation only succeeds for models whose derived Rust identifiers are
//! unique and whose types the runtime can represent. Everything else about
//! the model is taken as given.

mod names;
mod types;

use crate::diagnostic::GeneratorError;
use crate::model::Interface;

/// Validates a whole unit before any code is emitted.
pub fn validate_unit(unit: &str, interfaces: &[Interface]) -> Result<(), GeneratorError> {
    names::validate_unit_name(unit)?;
    names::validate_names(interfaces)?;

    for iface in interfaces {
        types::validate_interface_types(iface)?;
    }

    Ok(())
}

//! Identifier validation.
//!
//! Detects model names that are empty, derive to an empty identifier, or
//! derive to the same identifier as another item in the same namespace.

use std::collections::HashSet;

use crate::codegen::naming::to_snake_case;
use crate::codegen::registry::event_type_ident;
use crate::diagnostic::GeneratorError;
use crate::model::{Arg, Interface, Method, Signal};

/// Type identifiers emitted by the dispatch table, plus the prelude names the
/// generated code refers to unqualified. A proxy or event type with one of
/// these names would shadow the prelude inside the unit module.
const RESERVED_TYPES: &[&str] = &[
    "Signal",
    "AnySignal",
    "Result",
    "Option",
    "String",
    "Vec",
    "Box",
    "Ok",
    "Err",
    "Some",
    "None",
    "From",
    "Into",
    "Clone",
    "Debug",
    "PartialEq",
    "Default",
    "Self",
];

/// Proxy members that every interface already defines.
const RESERVED_METHODS: &[&str] = &["new", "object"];

/// The unit becomes the generated module name.
pub fn validate_unit_name(unit: &str) -> Result<(), GeneratorError> {
    if to_snake_case(unit).is_empty() {
        return Err(GeneratorError::InvalidUnitName {
            name: unit.to_string(),
        });
    }
    Ok(())
}

/// Validates every name across the unit.
pub fn validate_names(interfaces: &[Interface]) -> Result<(), GeneratorError> {
    let mut iface_names = HashSet::new();
    let mut type_idents: HashSet<String> = RESERVED_TYPES.iter().map(|s| s.to_string()).collect();

    for iface in interfaces {
        if iface.name.trim().is_empty() || iface.type_ident().is_empty() {
            return Err(GeneratorError::EmptyName {
                kind: "Interface",
                context: format!("interface {:?}", iface.name),
            });
        }
        if !iface_names.insert(iface.name.as_str()) {
            return Err(GeneratorError::duplicate(&iface.name, "interface declared twice"));
        }

        claim(&mut type_idents, iface.type_ident(), || {
            format!("proxy type of interface {}", iface.name)
        })?;

        validate_members(iface)?;

        for signal in &iface.signals {
            validate_signal(iface, signal)?;
            let ty = event_type_ident(iface, signal);
            claim(&mut type_idents, format!("{ty}Body"), || {
                format!("payload type of signal {}.{}", iface.name, signal.name)
            })?;
            claim(&mut type_idents, ty, || {
                format!("event type of signal {}.{}", iface.name, signal.name)
            })?;
        }
    }

    Ok(())
}

/// Methods and readable property getters share the proxy's namespace.
fn validate_members(iface: &Interface) -> Result<(), GeneratorError> {
    let mut fn_idents: HashSet<String> = RESERVED_METHODS.iter().map(|s| s.to_string()).collect();

    for method in &iface.methods {
        let context = format!("method {}.{}", iface.name, method.name);
        if method.fn_ident().is_empty() {
            return Err(GeneratorError::EmptyName { kind: "Method", context });
        }
        validate_method_args(method, &context)?;
        claim(&mut fn_idents, method.fn_ident(), || context.clone())?;
    }

    for property in &iface.properties {
        let context = format!("property {}.{}", iface.name, property.name);
        if property.fn_ident().is_empty() {
            return Err(GeneratorError::EmptyName { kind: "Property", context });
        }
        if property.is_readable() {
            claim(&mut fn_idents, property.fn_ident(), || format!("getter of {context}"))?;
        }
    }

    Ok(())
}

/// Inputs become parameters and outputs become locals, so each list is
/// checked on its own.
fn validate_method_args(method: &Method, context: &str) -> Result<(), GeneratorError> {
    validate_bindings(&method.inputs, &format!("inputs of {context}"))?;
    validate_bindings(&method.outputs, &format!("outputs of {context}"))
}

fn validate_signal(iface: &Interface, signal: &Signal) -> Result<(), GeneratorError> {
    let context = format!("signal {}.{}", iface.name, signal.name);
    if signal.ident().is_empty() {
        return Err(GeneratorError::EmptyName { kind: "Signal", context });
    }
    validate_bindings(&signal.args, &format!("payload of {context}"))
}

fn validate_bindings(args: &[Arg], context: &str) -> Result<(), GeneratorError> {
    let mut seen = HashSet::new();
    for (i, arg) in args.iter().enumerate() {
        let binding = arg.binding(i);
        if binding.is_empty() {
            return Err(GeneratorError::EmptyName {
                kind: "Argument",
                context: format!("{context}, argument {i} ({:?})", arg.name),
            });
        }
        claim(&mut seen, binding, || context.to_string())?;
    }
    Ok(())
}

/// Records `ident`, failing if it was already taken.
fn claim(
    taken: &mut HashSet<String>,
    ident: String,
    context: impl FnOnce() -> String,
) -> Result<(), GeneratorError> {
    if taken.contains(&ident) {
        return Err(GeneratorError::duplicate(ident, context()));
    }
    taken.insert(ident);
    Ok(())
}

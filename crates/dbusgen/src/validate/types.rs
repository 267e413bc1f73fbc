//! Type validation.
//!
//! Dictionaries map to `HashMap`, so keys must be hashable; structs and
//! multi-value replies map to tuples, which the runtime converts up to a
//! fixed arity.

use crate::diagnostic::GeneratorError;
use crate::model::{Arg, ArgType, Interface};

/// Largest tuple the runtime can convert to and from.
pub const MAX_TUPLE_ARITY: usize = 12;

/// Validates every type used by `iface`.
pub fn validate_interface_types(iface: &Interface) -> Result<(), GeneratorError> {
    for method in &iface.methods {
        let context = format!("method {}.{}", iface.name, method.name);
        if method.outputs.len() > MAX_TUPLE_ARITY {
            return Err(GeneratorError::UnsupportedType {
                context,
                reason: format!(
                    "{} output values, at most {} are supported",
                    method.outputs.len(),
                    MAX_TUPLE_ARITY
                ),
            });
        }
        validate_args(method.inputs.iter().chain(&method.outputs), &context)?;
    }

    for property in &iface.properties {
        let context = format!("property {}.{}", iface.name, property.name);
        validate_type(&property.arg.ty, &context)?;
    }

    for signal in &iface.signals {
        let context = format!("signal {}.{}", iface.name, signal.name);
        validate_args(&signal.args, &context)?;
    }

    Ok(())
}

fn validate_args<'a>(
    args: impl IntoIterator<Item = &'a Arg>,
    context: &str,
) -> Result<(), GeneratorError> {
    for arg in args {
        validate_type(&arg.ty, context)?;
    }
    Ok(())
}

fn validate_type(ty: &ArgType, context: &str) -> Result<(), GeneratorError> {
    let mut problem = None;
    ty.walk(&mut |nested| {
        if problem.is_some() {
            return;
        }
        match nested {
            ArgType::Dict(key, _) if matches!(**key, ArgType::Double) => {
                problem = Some(format!(
                    "'{}' uses a floating point dictionary key",
                    nested.signature()
                ));
            }
            ArgType::Struct(fields) if fields.len() > MAX_TUPLE_ARITY => {
                problem = Some(format!(
                    "'{}' has {} fields, at most {} are supported",
                    nested.signature(),
                    fields.len(),
                    MAX_TUPLE_ARITY
                ));
            }
            _ => {}
        }
    });

    match problem {
        Some(reason) => Err(GeneratorError::UnsupportedType {
            context: context.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

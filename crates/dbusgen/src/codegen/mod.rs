//! Rust code generation from the interface model.
//!
//! One run produces one unit, a `pub mod` block containing:
//! - a typed client proxy per interface (methods and readable properties)
//! - an event type and payload type per signal
//! - the `Signal` trait, `AnySignal` and `lookup_signal`, when any signal exists
//!
//! The generated code reaches the transport through the runtime crate,
//! imported under the local alias `dbus`.

pub mod dispatch;
pub mod emitter;
pub mod events;
pub mod header;
pub mod naming;
pub mod normalize;
pub mod proxy;
pub mod registry;
pub mod rust_types;

use crate::diagnostic::GeneratorError;
use crate::model::Interface;
use crate::validate;
use emitter::Emitter;
use naming::to_snake_case;
use registry::SignalRegistry;
use rust_types::RUNTIME_ALIAS;

/// Runtime crate path used when none is configured.
pub const DEFAULT_RUNTIME_CRATE: &str = "::dbusgen_runtime";

/// Options that change the generated text without changing its shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodegenOptions {
    /// Path under which the generated code imports the runtime crate.
    pub runtime_crate: String,
}

impl Default for CodegenOptions {
    fn default() -> Self {
        Self {
            runtime_crate: DEFAULT_RUNTIME_CRATE.to_string(),
        }
    }
}

/// Generates the Rust source of one unit.
///
/// Runs validation, the per-interface generators and the dispatch table
/// builder, then normalizes the result. Output is deterministic for a given
/// input; on failure no text is returned.
pub fn generate(
    unit: &str,
    interfaces: &[Interface],
    options: &CodegenOptions,
) -> Result<String, GeneratorError> {
    validate::validate_unit(unit, interfaces)?;

    let mut out = Emitter::new();
    let mut registry = SignalRegistry::new();

    header::write_header(&mut out, interfaces);

    let module = to_snake_case(unit);
    let runtime = options.runtime_crate.trim();
    out.writef(format_args!(
        r#"#[allow(dead_code, unused_imports, clippy::all)]
pub mod {module} {{
use {runtime} as {RUNTIME_ALIAS};
"#
    ));

    for iface in interfaces {
        tracing::debug!(
            interface = %iface.name,
            methods = iface.methods.len(),
            properties = iface.properties.len(),
            signals = iface.signals.len(),
            "generating interface"
        );
        proxy::generate_proxy(&mut out, iface);
        events::generate_event_types(&mut out, iface, &mut registry);
    }

    if !registry.is_empty() {
        tracing::debug!(signals = registry.len(), "generating signal dispatch");
        dispatch::generate_dispatch(&mut out, &registry);
    }

    out.writeln(&["}"]);

    normalize::normalize(out.contents())
}

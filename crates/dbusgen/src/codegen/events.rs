//! Typed event generation for interface signals.

use crate::model::{Interface, Signal};
use super::emitter::Emitter;
use super::naming::{comment_text, str_literal};
use super::registry::{event_type_ident, SignalRegistry};
use super::rust_types::to_rust_type;

/// Generates one event type and payload type per signal of `iface`, and
/// registers each signal for the dispatch table.
pub fn generate_event_types<'a>(
    out: &mut Emitter,
    iface: &'a Interface,
    registry: &mut SignalRegistry<'a>,
) {
    for signal in &iface.signals {
        write_event_type(out, iface, signal);
        // Validation rejects duplicate signals before generation starts.
        let fresh = registry.register(iface, signal);
        debug_assert!(fresh, "signal {}.{} registered twice", iface.name, signal.name);
    }
}

fn write_event_type(out: &mut Emitter, iface: &Interface, signal: &Signal) {
    let ty = event_type_ident(iface, signal);
    let doc_signal = comment_text(&signal.name);
    let doc_iface = comment_text(&iface.name);
    let name_lit = str_literal(&signal.name);
    let iface_lit = str_literal(&iface.name);

    let fields: String = signal
        .args
        .iter()
        .enumerate()
        .map(|(i, arg)| format!("pub {}: {},\n", arg.binding(i), to_rust_type(&arg.ty)))
        .collect();

    out.writef(format_args!(
        r#"
/// `{doc_signal}` signal of the `{doc_iface}` interface.
#[derive(Debug, Clone, PartialEq)]
pub struct {ty} {{
sender: String,
path: dbus::ObjectPath,
body: {ty}Body,
}}

/// Payload of the `{doc_iface}.{doc_signal}` signal, in wire order.
#[derive(Debug, Clone, PartialEq)]
pub struct {ty}Body {{
{fields}}}

impl {ty} {{
/// Creates the signal from its sender, emitting path and payload.
pub fn new(sender: impl Into<String>, path: dbus::ObjectPath, body: {ty}Body) -> Self {{
Self {{
sender: sender.into(),
path,
body,
}}
}}

/// Returns the signal's payload.
pub fn body(&self) -> &{ty}Body {{
&self.body
}}

/// Consumes the signal, returning its payload.
pub fn into_body(self) -> {ty}Body {{
self.body
}}
}}

impl Signal for {ty} {{
fn name(&self) -> &'static str {{
{name_lit}
}}

fn interface(&self) -> &'static str {{
{iface_lit}
}}

fn sender(&self) -> &str {{
&self.sender
}}

fn path(&self) -> &dbus::ObjectPath {{
&self.path
}}
}}
"#
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Arg, ArgType};

    #[test]
    fn test_event_and_payload_types() {
        let iface = Interface::new("org.example.Demo").with_signal(Signal::new(
            "Changed",
            vec![Arg::new("value", ArgType::String), Arg::new("count", ArgType::UInt32)],
        ));

        let mut out = Emitter::new();
        let mut registry = SignalRegistry::new();
        generate_event_types(&mut out, &iface, &mut registry);
        let code = out.into_string();

        assert!(code.contains("pub struct OrgExampleDemoChanged {"));
        assert!(code.contains("body: OrgExampleDemoChangedBody,"));
        assert!(code.contains(
            "pub struct OrgExampleDemoChangedBody {\npub value: String,\npub count: u32,\n}"
        ));
        assert!(code.contains("impl Signal for OrgExampleDemoChanged {"));
        assert!(code.contains("fn name(&self) -> &'static str {\n\"Changed\"\n}"));
        assert!(code.contains("fn interface(&self) -> &'static str {\n\"org.example.Demo\"\n}"));
        assert!(code.contains("pub fn body(&self) -> &OrgExampleDemoChangedBody {"));
    }

    #[test]
    fn test_signals_are_registered_by_qualified_name() {
        let iface = Interface::new("org.example.Demo")
            .with_signal(Signal::new("Changed", vec![]))
            .with_signal(Signal::new("Removed", vec![]));

        let mut out = Emitter::new();
        let mut registry = SignalRegistry::new();
        generate_event_types(&mut out, &iface, &mut registry);

        let names: Vec<_> = registry.iter().map(|e| e.qualified_name.as_str()).collect();
        assert_eq!(names, ["org.example.Demo.Changed", "org.example.Demo.Removed"]);
        assert!(out.contents().contains("pub struct OrgExampleDemoRemovedBody {\n}"));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "signal org.example.Demo.Changed registered twice")]
    fn test_registering_a_signal_twice_panics_in_debug() {
        let iface = Interface::new("org.example.Demo").with_signal(Signal::new("Changed", vec![]));

        let mut out = Emitter::new();
        let mut registry = SignalRegistry::new();
        generate_event_types(&mut out, &iface, &mut registry);
        generate_event_types(&mut out, &iface, &mut registry);
    }
}

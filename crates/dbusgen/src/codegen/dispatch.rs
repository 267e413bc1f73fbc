//! Signal dispatch generation.
//!
//! Emits the shared `Signal` trait, the `AnySignal` enum and `lookup_signal`,
//! which routes a raw notification to its typed event by qualified name.

use super::emitter::Emitter;
use super::naming::str_literal;
use super::registry::SignalRegistry;

/// Accessors shared by every generated event, as `(name, return type, doc)`.
const SIGNAL_ACCESSORS: &[(&str, &str, &str)] = &[
    ("name", "&'static str", "Returns the signal's name."),
    ("interface", "&'static str", "Returns the signal's interface."),
    ("sender", "&str", "Returns the signal's sender unique name."),
    ("path", "&dbus::ObjectPath", "Returns path that emitted the signal."),
];

/// Generates the dispatch table for every registered signal.
///
/// Must run once, after all interfaces were generated, and only when the
/// registry is non-empty.
pub fn generate_dispatch(out: &mut Emitter, registry: &SignalRegistry<'_>) {
    write_signal_trait(out);
    write_any_signal(out, registry);
    write_lookup(out, registry);
}

fn write_signal_trait(out: &mut Emitter) {
    out.writeln(&[]);
    out.writeln(&["/// Signal is a common interface for all signals."]);
    out.writeln(&["pub trait Signal {"]);
    for (name, ret, doc) in SIGNAL_ACCESSORS {
        out.writef(format_args!("/// {doc}\nfn {name}(&self) -> {ret};\n"));
    }
    out.writeln(&["}"]);
}

fn write_any_signal(out: &mut Emitter, registry: &SignalRegistry<'_>) {
    out.writeln(&[]);
    out.writeln(&["/// Any signal declared by the generated interfaces."]);
    out.writeln(&["#[derive(Debug, Clone, PartialEq)]"]);
    out.writeln(&["pub enum AnySignal {"]);
    for entry in registry.iter() {
        let ty = entry.type_ident();
        out.writef(format_args!("{ty}({ty}),\n"));
    }
    out.writeln(&["}"]);

    out.writeln(&[]);
    out.writeln(&["impl Signal for AnySignal {"]);
    for (i, (name, ret, _)) in SIGNAL_ACCESSORS.iter().enumerate() {
        if i != 0 {
            out.writeln(&[]);
        }
        out.writef(format_args!("fn {name}(&self) -> {ret} {{\nmatch self {{\n"));
        for entry in registry.iter() {
            let ty = entry.type_ident();
            out.writef(format_args!("AnySignal::{ty}(signal) => signal.{name}(),\n"));
        }
        out.writeln(&["}"]);
        out.writeln(&["}"]);
    }
    out.writeln(&["}"]);

    for entry in registry.iter() {
        let ty = entry.type_ident();
        out.writef(format_args!(
            r#"
impl From<{ty}> for AnySignal {{
fn from(signal: {ty}) -> Self {{
AnySignal::{ty}(signal)
}}
}}
"#
        ));
    }
}

fn write_lookup(out: &mut Emitter, registry: &SignalRegistry<'_>) {
    out.writef(format_args!(
        r#"
/// Converts the given raw D-Bus signal into a typed one.
///
/// Returns `Ok(None)` when no generated interface declares the signal, and an
/// error when its payload does not match the declared argument types.
pub fn lookup_signal(
signal: &dbus::RawSignal,
) -> Result<Option<AnySignal>, dbus::ConversionError> {{
let found = match signal.name.as_str() {{
"#
    ));

    for entry in registry.iter() {
        let ty = entry.type_ident();
        let qualified = str_literal(&entry.qualified_name);
        out.writef(format_args!(
            r#"{qualified} => AnySignal::{ty}({ty} {{
sender: signal.sender.clone(),
path: signal.path.clone(),
body: {ty}Body {{
"#
        ));
        for (i, arg) in entry.signal.args.iter().enumerate() {
            out.writef(format_args!("{}: signal.arg({i})?,\n", arg.binding(i)));
        }
        out.writeln(&["},"]);
        out.writeln(&["}),"]);
    }

    out.writeln(&["_ => return Ok(None),"]);
    out.writeln(&["};"]);
    out.writeln(&["Ok(Some(found))"]);
    out.writeln(&["}"]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Arg, ArgType, Interface, Signal};

    #[test]
    fn test_lookup_routes_by_qualified_name() {
        let a = Interface::new("org.example.A").with_signal(Signal::new(
            "Changed",
            vec![Arg::new("value", ArgType::String), Arg::new("count", ArgType::UInt32)],
        ));
        let b = Interface::new("org.example.B").with_signal(Signal::new("Changed", vec![]));

        let mut registry = SignalRegistry::new();
        registry.register(&a, &a.signals[0]);
        registry.register(&b, &b.signals[0]);

        let mut out = Emitter::new();
        generate_dispatch(&mut out, &registry);
        let code = out.into_string();

        assert!(code.contains("pub trait Signal {"));
        assert!(code.contains(
            "OrgExampleAChanged(OrgExampleAChanged),\nOrgExampleBChanged(OrgExampleBChanged),"
        ));
        assert!(code.contains(
            "\"org.example.A.Changed\" => AnySignal::OrgExampleAChanged(OrgExampleAChanged {"
        ));
        assert!(code.contains(
            "\"org.example.B.Changed\" => AnySignal::OrgExampleBChanged(OrgExampleBChanged {"
        ));
        assert!(code.contains("value: signal.arg(0)?,\ncount: signal.arg(1)?,"));
        assert!(code.contains("_ => return Ok(None),"));
    }

    #[test]
    fn test_any_signal_delegates_every_accessor() {
        let a = Interface::new("org.example.A").with_signal(Signal::new("Changed", vec![]));
        let mut registry = SignalRegistry::new();
        registry.register(&a, &a.signals[0]);

        let mut out = Emitter::new();
        generate_dispatch(&mut out, &registry);
        let code = out.into_string();

        for (name, _, _) in SIGNAL_ACCESSORS {
            let arm = format!("AnySignal::OrgExampleAChanged(signal) => signal.{name}(),");
            assert!(code.contains(&arm));
        }
        assert!(code.contains("impl From<OrgExampleAChanged> for AnySignal {"));
    }
}

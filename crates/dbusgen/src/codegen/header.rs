//! Generated-file banner listing every interface member.

use crate::model::Interface;
use super::emitter::Emitter;
use super::naming::comment_text;

pub const BANNER: &str = "// Generated by dbusgen, don't edit!";

/// Writes the banner comment block.
pub fn write_header(out: &mut Emitter, interfaces: &[Interface]) {
    out.writeln(&[BANNER]);
    out.writeln(&["//"]);

    for (i, iface) in interfaces.iter().enumerate() {
        if i != 0 {
            out.writeln(&["//"]);
        }
        out.writeln(&["// ", &comment_text(&iface.name)]);
        write_section(out, "Methods", iface.methods.iter().map(|m| m.name.as_str()));
        write_section(out, "Properties", iface.properties.iter().map(|p| p.name.as_str()));
        write_section(out, "Signals", iface.signals.iter().map(|s| s.name.as_str()));
    }

    out.writeln(&[]);
}

fn write_section<'a>(
    out: &mut Emitter,
    title: &str,
    names: impl ExactSizeIterator<Item = &'a str>,
) {
    if names.len() == 0 {
        return;
    }
    out.writeln(&["//   ", title]);
    for name in names {
        out.writeln(&["//     ", &comment_text(name)]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Access, Arg, ArgType, Method, Property, Signal};

    #[test]
    fn test_lists_members_and_skips_empty_sections() {
        let ifaces = vec![
            Interface::new("org.example.Demo")
                .with_method(Method::new(
                    "GetValue",
                    vec![],
                    vec![Arg::new("value", ArgType::String)],
                ))
                .with_signal(Signal::new("Changed", vec![])),
            Interface::new("org.example.Props")
                .with_property(Property::new("Version", Access::Read, ArgType::UInt32)),
        ];

        let mut out = Emitter::new();
        write_header(&mut out, &ifaces);

        let expected = "\
// Generated by dbusgen, don't edit!
//
// org.example.Demo
//   Methods
//     GetValue
//   Signals
//     Changed
//
// org.example.Props
//   Properties
//     Version

";
        assert_eq!(out.contents(), expected);
    }

    #[test]
    fn test_hostile_names_stay_in_comments() {
        let ifaces = vec![Interface::new("org.example\n}fn oops() {")];
        let mut out = Emitter::new();
        write_header(&mut out, &ifaces);
        assert!(out.contents().lines().all(|line| line.is_empty() || line.starts_with("//")));
    }
}

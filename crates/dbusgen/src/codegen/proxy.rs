//! Client proxy generation: one typed proxy per interface.

use crate::model::{Interface, Method, Property};
use super::emitter::Emitter;
use super::naming::{comment_text, str_literal};
use super::rust_types::{to_rust_type, tuple_type};

/// Generates the proxy type, its constructor and the method and property bindings.
pub fn generate_proxy(out: &mut Emitter, iface: &Interface) {
    let ty = iface.type_ident();
    let name = comment_text(&iface.name);

    out.writef(format_args!(
        r#"
/// `{ty}` implements the `{name}` D-Bus interface.
#[derive(Debug, Clone)]
pub struct {ty}<C> {{
object: dbus::BusObject<C>,
}}

impl<C: dbus::Connection> {ty}<C> {{
/// Returns a `{name}` proxy for the object at `path` owned by `dest`.
pub fn new(conn: C, dest: impl Into<String>, path: dbus::ObjectPath) -> Self {{
Self {{
object: dbus::BusObject::new(conn, dest, path),
}}
}}

/// Returns the remote object this proxy is bound to.
pub fn object(&self) -> &dbus::BusObject<C> {{
&self.object
}}
"#
    ));

    for method in &iface.methods {
        write_method(out, iface, method);
    }

    for property in iface.properties.iter().filter(|p| p.is_readable()) {
        write_getter(out, iface, property);
    }

    out.writeln(&["}"]);
}

fn write_method(out: &mut Emitter, iface: &Interface, method: &Method) {
    let fn_name = method.fn_ident();
    let doc = comment_text(&format!("{}.{}", iface.name, method.name));
    let member = str_literal(&format!("{}.{}", iface.name, method.name));

    let mut params = String::from("&self");
    for (i, arg) in method.inputs.iter().enumerate() {
        params.push_str(&format!(", {}: {}", arg.binding(i), to_rust_type(&arg.ty)));
    }

    let call_args = if method.inputs.is_empty() {
        "Vec::new()".to_string()
    } else {
        let values: Vec<String> = method
            .inputs
            .iter()
            .enumerate()
            .map(|(i, arg)| format!("dbus::Value::from({})", arg.binding(i)))
            .collect();
        format!("vec![{}]", values.join(", "))
    };
    let call = format!("self.object.call({member}, {call_args})?");

    let bindings: Vec<String> = method
        .outputs
        .iter()
        .enumerate()
        .map(|(i, arg)| arg.binding(i))
        .collect();
    let types: Vec<String> = method.outputs.iter().map(|arg| to_rust_type(&arg.ty)).collect();

    let (ret, body) = match method.outputs.len() {
        0 => ("()".to_string(), format!("{call};\nOk(())")),
        1 => {
            let (binding, ty) = (&bindings[0], &types[0]);
            (ty.clone(), format!("let {binding}: {ty} = {call}.arg(0)?;\nOk({binding})"))
        }
        _ => {
            let pattern = format!("({})", bindings.join(", "));
            let tuple = tuple_type(types);
            (
                tuple.clone(),
                format!("let {pattern}: {tuple} = {call}.store()?;\nOk({pattern})"),
            )
        }
    };

    out.writef(format_args!(
        r#"
/// Calls the `{doc}` method.
pub fn {fn_name}({params}) -> Result<{ret}, dbus::Error> {{
{body}
}}
"#
    ));
}

fn write_getter(out: &mut Emitter, iface: &Interface, property: &Property) {
    let fn_name = property.fn_ident();
    let doc = comment_text(&format!("{}.{}", iface.name, property.name));
    let binding = property.arg.binding(0);
    let ty = to_rust_type(&property.arg.ty);
    let iface_name = str_literal(&iface.name);
    let prop_name = str_literal(&property.name);

    out.writef(format_args!(
        r#"
/// Gets the `{doc}` property.
pub fn {fn_name}(&self) -> Result<{ty}, dbus::Error> {{
let {binding}: {ty} = self.object.get_property({iface_name}, {prop_name})?;
Ok({binding})
}}
"#
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Access, Arg, ArgType};

    fn render(iface: &Interface) -> String {
        let mut out = Emitter::new();
        generate_proxy(&mut out, iface);
        out.into_string()
    }

    #[test]
    fn test_proxy_type_and_constructor() {
        let code = render(&Interface::new("org.example.Demo"));

        assert!(code.contains("pub struct OrgExampleDemo<C> {"));
        assert!(code.contains("impl<C: dbus::Connection> OrgExampleDemo<C> {"));
        assert!(code.contains(
            "pub fn new(conn: C, dest: impl Into<String>, path: dbus::ObjectPath) -> Self {"
        ));
        assert!(code.contains("object: dbus::BusObject::new(conn, dest, path),"));
    }

    #[test]
    fn test_single_output_method() {
        let iface = Interface::new("org.example.Demo").with_method(Method::new(
            "GetValue",
            vec![],
            vec![Arg::new("value", ArgType::String)],
        ));
        let code = render(&iface);

        assert!(code.contains("pub fn get_value(&self) -> Result<String, dbus::Error> {"));
        assert!(code.contains(concat!(
            "let value: String = ",
            "self.object.call(\"org.example.Demo.GetValue\", Vec::new())?.arg(0)?;",
        )));
        assert!(code.contains("Ok(value)"));
    }

    #[test]
    fn test_inputs_forwarded_in_order() {
        let iface = Interface::new("org.example.Demo").with_method(Method::new(
            "Move",
            vec![
                Arg::new("x", ArgType::Int32),
                Arg::new("y", ArgType::Int32),
                Arg::new("", ArgType::Boolean),
            ],
            vec![],
        ));
        let code = render(&iface);

        assert!(code.contains(
            "pub fn r#move(&self, x: i32, y: i32, arg2: bool) -> Result<(), dbus::Error> {"
        ));
        assert!(code.contains(concat!(
            "self.object.call(\"org.example.Demo.Move\", vec![dbus::Value::from(x), ",
            "dbus::Value::from(y), dbus::Value::from(arg2)])?;",
        )));
        assert!(code.contains("Ok(())"));
    }

    #[test]
    fn test_multiple_outputs_stored_in_order() {
        let iface = Interface::new("org.example.Demo").with_method(Method::new(
            "Stat",
            vec![Arg::new("path", ArgType::ObjectPath)],
            vec![Arg::new("size", ArgType::UInt64), Arg::new("name", ArgType::String)],
        ));
        let code = render(&iface);

        assert!(code.contains(
            "pub fn stat(&self, path: dbus::ObjectPath) -> Result<(u64, String), dbus::Error> {"
        ));
        assert!(code.contains("let (size, name): (u64, String) = self.object.call("));
        assert!(code.contains(".store()?;"));
        assert!(code.contains("Ok((size, name))"));
    }

    #[test]
    fn test_only_readable_properties_get_accessors() {
        let iface = Interface::new("org.example.Demo")
            .with_property(Property::new("Version", Access::Read, ArgType::UInt32))
            .with_property(Property::new("Title", Access::ReadWrite, ArgType::String))
            .with_property(Property::new("Secret", Access::Write, ArgType::String));
        let code = render(&iface);

        assert!(code.contains("pub fn version(&self) -> Result<u32, dbus::Error> {"));
        assert!(code.contains(
            "let version: u32 = self.object.get_property(\"org.example.Demo\", \"Version\")?;"
        ));
        assert!(code.contains("pub fn title(&self) -> Result<String, dbus::Error> {"));
        assert!(!code.contains("secret"));
        assert!(!code.contains("Secret"));
    }
}

//! Interface model consumed by the code generator.
//!
//! The model is produced by an external front-end (for example an
//! introspection XML reader) and handed to [`crate::codegen::generate`].
//! It is also deserializable from JSON so that the CLI can load it directly:
//!
//! ```json
//! {
//!   "interfaces": [{
//!     "name": "org.example.Demo",
//!     "methods": [{ "name": "GetValue", "out": [{ "name": "value", "type": "s" }] }],
//!     "properties": [{ "name": "Version", "type": "u", "access": "read" }],
//!     "signals": [{ "name": "Changed", "args": [{ "name": "value", "type": "s" }] }]
//!   }]
//! }
//! ```

mod types;

pub use types::ArgType;

use std::path::Path;

use serde::Deserialize;
use walkdir::WalkDir;

use crate::codegen::naming::{to_pascal_case, to_snake_case};
use crate::diagnostic::GeneratorError;

/// A JSON model document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Model {
    #[serde(default)]
    pub interfaces: Vec<Interface>,
}

/// A remote-object interface.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Interface {
    /// Qualified, dot-separated name (e.g., "org.freedesktop.DBus").
    pub name: String,

    #[serde(default)]
    pub methods: Vec<Method>,

    #[serde(default)]
    pub properties: Vec<Property>,

    #[serde(default)]
    pub signals: Vec<Signal>,
}

/// A method of an interface.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Method {
    pub name: String,

    #[serde(default, rename = "in")]
    pub inputs: Vec<Arg>,

    #[serde(default, rename = "out")]
    pub outputs: Vec<Arg>,
}

/// Access mode of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    Read,
    Write,
    ReadWrite,
}

/// A property of an interface.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "PropertyRepr")]
pub struct Property {
    pub name: String,
    pub access: Access,
    /// Value type and binding name of the property.
    pub arg: Arg,
}

#[derive(Deserialize)]
struct PropertyRepr {
    name: String,
    #[serde(rename = "type")]
    ty: ArgType,
    access: Access,
}

impl From<PropertyRepr> for Property {
    fn from(repr: PropertyRepr) -> Self {
        Property::new(repr.name, repr.access, repr.ty)
    }
}

/// A signal emitted by an interface.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Signal {
    pub name: String,

    /// Payload, in wire order.
    #[serde(default)]
    pub args: Vec<Arg>,
}

/// A named, typed argument.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Arg {
    #[serde(default)]
    pub name: String,

    #[serde(rename = "type")]
    pub ty: ArgType,
}

impl Interface {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: Vec::new(),
            properties: Vec::new(),
            signals: Vec::new(),
        }
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.methods.push(method);
        self
    }

    pub fn with_property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    pub fn with_signal(mut self, signal: Signal) -> Self {
        self.signals.push(signal);
        self
    }

    /// Rust type identifier of the proxy, derived from every name segment.
    pub fn type_ident(&self) -> String {
        to_pascal_case(&self.name)
    }
}

impl Method {
    pub fn new(name: impl Into<String>, inputs: Vec<Arg>, outputs: Vec<Arg>) -> Self {
        Self {
            name: name.into(),
            inputs,
            outputs,
        }
    }

    /// Rust function identifier of the bound call.
    pub fn fn_ident(&self) -> String {
        to_snake_case(&self.name)
    }
}

impl Property {
    pub fn new(name: impl Into<String>, access: Access, ty: ArgType) -> Self {
        let name = name.into();
        Self {
            arg: Arg::new(name.clone(), ty),
            name,
            access,
        }
    }

    pub fn is_readable(&self) -> bool {
        matches!(self.access, Access::Read | Access::ReadWrite)
    }

    /// Rust function identifier of the getter.
    pub fn fn_ident(&self) -> String {
        to_snake_case(&self.name)
    }
}

impl Signal {
    pub fn new(name: impl Into<String>, args: Vec<Arg>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    /// Local identifier of the signal, unique within its interface.
    pub fn ident(&self) -> String {
        to_pascal_case(&self.name)
    }
}

impl Arg {
    pub fn new(name: impl Into<String>, ty: ArgType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }

    /// Binding identifier for the argument at `index`; unnamed arguments become `argN`.
    pub fn binding(&self, index: usize) -> String {
        if self.name.trim().is_empty() {
            format!("arg{}", index)
        } else {
            to_snake_case(&self.name)
        }
    }
}

/// Loads interfaces from a JSON model file, or from every `*.json` file
/// below a directory in sorted path order.
pub fn load(path: &Path) -> Result<Vec<Interface>, GeneratorError> {
    if !path.is_dir() {
        return load_file(path);
    }

    let mut interfaces = Vec::new();
    for entry in WalkDir::new(path).sort_by_file_name() {
        let entry = entry.map_err(|e| GeneratorError::io(path, e.to_string()))?;
        let is_json = entry.path().extension().map(|ext| ext == "json").unwrap_or(false);
        if entry.file_type().is_file() && is_json {
            interfaces.extend(load_file(entry.path())?);
        }
    }

    Ok(interfaces)
}

/// Parses a single JSON model document.
pub fn from_json(path: &Path, content: &str) -> Result<Vec<Interface>, GeneratorError> {
    let model: Model = serde_json::from_str(content).map_err(|e| GeneratorError::ModelParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(model.interfaces)
}

fn load_file(path: &Path) -> Result<Vec<Interface>, GeneratorError> {
    let content =
        std::fs::read_to_string(path).map_err(|e| GeneratorError::io(path, e.to_string()))?;
    tracing::debug!(path = %path.display(), "loading interface model");
    from_json(path, &content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const DEMO: &str = r#"{
        "interfaces": [{
            "name": "org.example.Demo",
            "methods": [{ "name": "GetValue", "out": [{ "name": "value", "type": "s" }] }],
            "properties": [
                { "name": "Version", "type": "u", "access": "read" },
                { "name": "Secret", "type": "s", "access": "write" }
            ],
            "signals": [{ "name": "Changed", "args": [{ "name": "value", "type": "s" }] }]
        }]
    }"#;

    #[test]
    fn test_parse_demo_model() {
        let interfaces = from_json(Path::new("demo.json"), DEMO).unwrap();
        assert_eq!(interfaces.len(), 1);

        let iface = &interfaces[0];
        assert_eq!(iface.type_ident(), "OrgExampleDemo");
        assert_eq!(iface.methods[0].fn_ident(), "get_value");
        assert!(iface.methods[0].inputs.is_empty());
        assert_eq!(iface.methods[0].outputs[0].ty, ArgType::String);

        assert!(iface.properties[0].is_readable());
        assert!(!iface.properties[1].is_readable());
        assert_eq!(iface.properties[0].arg.ty, ArgType::UInt32);

        assert_eq!(iface.signals[0].ident(), "Changed");
    }

    #[test]
    fn test_parse_error_names_file() {
        let err = from_json(Path::new("broken.json"), "{ \"interfaces\": [{}] }").unwrap_err();
        assert!(matches!(err, GeneratorError::ModelParse { .. }));
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn test_unnamed_arg_binding() {
        let arg = Arg::new("", ArgType::Int32);
        assert_eq!(arg.binding(2), "arg2");
        assert_eq!(Arg::new("NewOwner", ArgType::String).binding(0), "new_owner");
    }

    #[test]
    fn test_load_directory_in_sorted_order() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("b.json"),
            r#"{ "interfaces": [{ "name": "org.example.B" }] }"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("a.json"),
            r#"{ "interfaces": [{ "name": "org.example.A" }] }"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let interfaces = load(dir.path()).unwrap();
        let names: Vec<_> = interfaces.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["org.example.A", "org.example.B"]);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = load(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, GeneratorError::IoError { .. }));
    }
}

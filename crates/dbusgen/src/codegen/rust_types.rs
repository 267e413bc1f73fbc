//! Rust type generation from D-Bus argument types.

use crate::model::ArgType;

/// Name under which generated code imports the runtime crate.
pub const RUNTIME_ALIAS: &str = "dbus";

/// Converts an ArgType to a Rust type string.
pub fn to_rust_type(ty: &ArgType) -> String {
    match ty {
        ArgType::Byte => "u8".to_string(),
        ArgType::Boolean => "bool".to_string(),
        ArgType::Int16 => "i16".to_string(),
        ArgType::UInt16 => "u16".to_string(),
        ArgType::Int32 => "i32".to_string(),
        ArgType::UInt32 => "u32".to_string(),
        ArgType::Int64 => "i64".to_string(),
        ArgType::UInt64 => "u64".to_string(),
        ArgType::Double => "f64".to_string(),
        ArgType::String => "String".to_string(),
        ArgType::ObjectPath => format!("{}::ObjectPath", RUNTIME_ALIAS),
        ArgType::Signature => format!("{}::Signature", RUNTIME_ALIAS),
        ArgType::UnixFd => format!("{}::UnixFd", RUNTIME_ALIAS),
        ArgType::Variant => format!("{}::Variant", RUNTIME_ALIAS),
        ArgType::Array(inner) => format!("Vec<{}>", to_rust_type(inner)),
        ArgType::Dict(key, value) => format!(
            "std::collections::HashMap<{}, {}>",
            to_rust_type(key),
            to_rust_type(value)
        ),
        ArgType::Struct(fields) => tuple_type(fields.iter().map(to_rust_type)),
    }
}

/// Formats a tuple type; a single element keeps its trailing comma.
pub fn tuple_type(elements: impl IntoIterator<Item = String>) -> String {
    let elements: Vec<String> = elements.into_iter().collect();
    if elements.len() == 1 {
        format!("({},)", elements[0])
    } else {
        format!("({})", elements.join(", "))
    }
}

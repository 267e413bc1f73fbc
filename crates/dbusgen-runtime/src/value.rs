//! Dynamically typed D-Bus values and typed extraction.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use crate::error::ConversionError;
use crate::object::FromReply;

/// A D-Bus value as carried in message bodies.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Byte(u8),
    Boolean(bool),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Double(f64),
    String(String),
    ObjectPath(ObjectPath),
    Signature(Signature),
    UnixFd(UnixFd),
    Variant(Box<Value>),
    Array(Vec<Value>),
    /// Dictionary entries in wire order.
    Dict(Vec<(Value, Value)>),
    Struct(Vec<Value>),
}

impl Value {
    /// Human readable name of the value's type, used in conversion errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Byte(_) => "byte",
            Value::Boolean(_) => "boolean",
            Value::Int16(_) => "int16",
            Value::UInt16(_) => "uint16",
            Value::Int32(_) => "int32",
            Value::UInt32(_) => "uint32",
            Value::Int64(_) => "int64",
            Value::UInt64(_) => "uint64",
            Value::Double(_) => "double",
            Value::String(_) => "string",
            Value::ObjectPath(_) => "object path",
            Value::Signature(_) => "signature",
            Value::UnixFd(_) => "unix fd",
            Value::Variant(_) => "variant",
            Value::Array(_) => "array",
            Value::Dict(_) => "dict",
            Value::Struct(_) => "struct",
        }
    }

    /// Extracts a typed value.
    pub fn get<T: FromValue>(&self) -> Result<T, ConversionError> {
        T::from_value(self)
    }
}

/// Typed extraction from a [`Value`].
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Result<Self, ConversionError>;
}

/// Path of an object on the bus, e.g. `/org/example/Demo`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectPath(String);

impl ObjectPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the path follows the D-Bus object path grammar.
    pub fn is_valid(&self) -> bool {
        if self.0 == "/" {
            return true;
        }
        match self.0.strip_prefix('/') {
            Some(rest) => rest.split('/').all(|segment| {
                !segment.is_empty()
                    && segment
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '_')
            }),
            None => false,
        }
    }
}

impl Default for ObjectPath {
    fn default() -> Self {
        Self::new("/")
    }
}

impl From<&str> for ObjectPath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl fmt::Display for ObjectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A D-Bus type signature, e.g. `a{sv}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Signature(String);

impl Signature {
    pub fn new(signature: impl Into<String>) -> Self {
        Self(signature.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Signature {
    fn from(signature: &str) -> Self {
        Self::new(signature)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Index of a file descriptor passed alongside a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnixFd(pub u32);

/// A self-describing value of any type.
#[derive(Debug, Clone, PartialEq)]
pub struct Variant(pub Value);

impl Variant {
    pub fn new(value: impl Into<Value>) -> Self {
        Self(value.into())
    }

    pub fn value(&self) -> &Value {
        &self.0
    }

    pub fn into_inner(self) -> Value {
        self.0
    }

    /// Extracts the contained value as `T`.
    pub fn get<T: FromValue>(&self) -> Result<T, ConversionError> {
        T::from_value(&self.0)
    }
}

impl From<Variant> for Value {
    fn from(variant: Variant) -> Self {
        Value::Variant(Box::new(variant.0))
    }
}

impl FromValue for Variant {
    fn from_value(value: &Value) -> Result<Self, ConversionError> {
        match value {
            Value::Variant(inner) => Ok(Variant(inner.as_ref().clone())),
            // A bare value is taken as the variant's contents.
            other => Ok(Variant(other.clone())),
        }
    }
}

macro_rules! basic_values {
    ($($ty:ty => $variant:ident, $kind:literal;)+) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::$variant(value)
                }
            }

            impl FromValue for $ty {
                fn from_value(value: &Value) -> Result<Self, ConversionError> {
                    match value {
                        Value::$variant(v) => Ok(v.clone()),
                        other => Err(ConversionError::mismatch($kind, other)),
                    }
                }
            }
        )+
    };
}

basic_values! {
    u8 => Byte, "byte";
    bool => Boolean, "boolean";
    i16 => Int16, "int16";
    u16 => UInt16, "uint16";
    i32 => Int32, "int32";
    u32 => UInt32, "uint32";
    i64 => Int64, "int64";
    u64 => UInt64, "uint64";
    f64 => Double, "double";
    String => String, "string";
    ObjectPath => ObjectPath, "object path";
    Signature => Signature, "signature";
    UnixFd => UnixFd, "unix fd";
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: &Value) -> Result<Self, ConversionError> {
        match value {
            Value::Array(items) => items.iter().map(T::from_value).collect(),
            other => Err(ConversionError::mismatch("array", other)),
        }
    }
}

impl<K: Into<Value>, V: Into<Value>> From<HashMap<K, V>> for Value {
    fn from(map: HashMap<K, V>) -> Self {
        Value::Dict(map.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K, V> FromValue for HashMap<K, V>
where
    K: FromValue + Eq + Hash,
    V: FromValue,
{
    fn from_value(value: &Value) -> Result<Self, ConversionError> {
        match value {
            Value::Dict(entries) => entries
                .iter()
                .map(|(k, v)| Ok((K::from_value(k)?, V::from_value(v)?)))
                .collect(),
            other => Err(ConversionError::mismatch("dict", other)),
        }
    }
}

/// Structs map to tuples; multi-value replies are stored into tuples too.
macro_rules! tuples {
    ($(($len:literal; $($name:ident $idx:tt),+))+) => {
        $(
            impl<$($name: Into<Value>),+> From<($($name,)+)> for Value {
                fn from(tuple: ($($name,)+)) -> Self {
                    Value::Struct(vec![$(tuple.$idx.into()),+])
                }
            }

            impl<$($name: FromValue),+> FromValue for ($($name,)+) {
                fn from_value(value: &Value) -> Result<Self, ConversionError> {
                    match value {
                        Value::Struct(fields) if fields.len() == $len => {
                            Ok(($($name::from_value(&fields[$idx])?,)+))
                        }
                        other => Err(ConversionError::mismatch(
                            concat!("struct of ", $len, " fields"),
                            other,
                        )),
                    }
                }
            }

            impl<$($name: FromValue),+> FromReply for ($($name,)+) {
                fn from_reply(values: &[Value]) -> Result<Self, ConversionError> {
                    Ok(($(
                        $name::from_value(
                            values
                                .get($idx)
                                .ok_or(ConversionError::MissingArgument { index: $idx })?,
                        )?,
                    )+))
                }
            }
        )+
    };
}

tuples! {
    (1; A 0)
    (2; A 0, B 1)
    (3; A 0, B 1, C 2)
    (4; A 0, B 1, C 2, D 3)
    (5; A 0, B 1, C 2, D 3, E 4)
    (6; A 0, B 1, C 2, D 3, E 4, F 5)
    (7; A 0, B 1, C 2, D 3, E 4, F 5, G 6)
    (8; A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7)
    (9; A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8)
    (10; A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8, J 9)
    (11; A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8, J 9, K 10)
    (12; A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8, J 9, K 10, L 11)
}

//! Untyped incoming signals.

use crate::error::ConversionError;
use crate::value::{FromValue, ObjectPath, Value};

/// A signal as received from the bus, before typed dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSignal {
    /// Qualified name, `"<interface>.<member>"`.
    pub name: String,
    /// Unique bus name of the emitter.
    pub sender: String,
    /// Path of the emitting object.
    pub path: ObjectPath,
    /// Payload in wire order.
    pub body: Vec<Value>,
}

impl RawSignal {
    pub fn new(
        name: impl Into<String>,
        sender: impl Into<String>,
        path: ObjectPath,
        body: Vec<Value>,
    ) -> Self {
        Self {
            name: name.into(),
            sender: sender.into(),
            path,
            body,
        }
    }

    /// Extracts payload slot `index`.
    pub fn arg<T: FromValue>(&self, index: usize) -> Result<T, ConversionError> {
        let value = self
            .body
            .get(index)
            .ok_or(ConversionError::MissingArgument { index })?;
        T::from_value(value)
    }

    /// Interface part of the name.
    pub fn interface(&self) -> &str {
        self.name.rsplit_once('.').map_or("", |(interface, _)| interface)
    }

    /// Member part of the name.
    pub fn member(&self) -> &str {
        self.name.rsplit_once('.').map_or(self.name.as_str(), |(_, member)| member)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_parts_and_payload() {
        let signal = RawSignal::new(
            "org.example.Demo.Changed",
            ":1.42",
            ObjectPath::new("/org/example/Demo"),
            vec![Value::from("hi")],
        );
        assert_eq!(signal.interface(), "org.example.Demo");
        assert_eq!(signal.member(), "Changed");
        assert_eq!(signal.arg::<String>(0), Ok("hi".to_string()));
        assert_eq!(signal.arg::<String>(1), Err(ConversionError::MissingArgument { index: 1 }));
    }
}

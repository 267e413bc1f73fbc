//! In-memory connection for testing generated proxies.
//!
//! Replies are registered per method and every call is recorded for
//! verification.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::error::Error;
use crate::object::{Connection, PROPERTIES_INTERFACE};
use crate::value::{ObjectPath, Value};

/// Error name returned for calls nothing was registered for.
pub const UNKNOWN_METHOD: &str = "org.freedesktop.DBus.Error.UnknownMethod";

/// Mock connection for testing.
///
/// # Example
///
/// ```
/// use dbusgen_runtime::testing::MockConnection;
/// use dbusgen_runtime::{BusObject, ObjectPath, Value};
///
/// let conn = MockConnection::new();
/// conn.reply("org.example.Demo.GetValue", vec![Value::from("hi")]);
///
/// let object = BusObject::new(conn.clone(), "org.example", ObjectPath::new("/"));
/// let reply = object.call("org.example.Demo.GetValue", Vec::new()).unwrap();
/// let value: String = reply.arg(0).unwrap();
/// assert_eq!(value, "hi");
/// conn.assert_called("org.example.Demo.GetValue");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockConnection {
    replies: Arc<RwLock<HashMap<String, Result<Vec<Value>, Error>>>>,
    properties: Arc<RwLock<HashMap<(String, String), Value>>>,
    calls: Arc<RwLock<Vec<RecordedCall>>>,
}

/// A recorded call for verification.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub destination: String,
    pub path: ObjectPath,
    pub interface: String,
    pub member: String,
    pub args: Vec<Value>,
}

impl RecordedCall {
    /// `"<interface>.<member>"` of the call.
    pub fn method(&self) -> String {
        format!("{}.{}", self.interface, self.member)
    }
}

impl MockConnection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replies to `method` (`"<interface>.<member>"`) with `values`.
    pub fn reply(&self, method: &str, values: Vec<Value>) {
        write(&self.replies).insert(method.to_string(), Ok(values));
    }

    /// Fails calls to `method` with `error`.
    pub fn fail(&self, method: &str, error: Error) {
        write(&self.replies).insert(method.to_string(), Err(error));
    }

    /// Serves `value` for reads of `interface`'s property `name`.
    pub fn property(&self, interface: &str, name: &str, value: impl Into<Value>) {
        write(&self.properties).insert((interface.to_string(), name.to_string()), value.into());
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        read(&self.calls).clone()
    }

    pub fn call_count(&self, method: &str) -> usize {
        read(&self.calls).iter().filter(|c| c.method() == method).count()
    }

    /// Assert that `method` was called at least once.
    pub fn assert_called(&self, method: &str) {
        assert!(
            self.call_count(method) > 0,
            "Expected a call to {}, but none was made",
            method
        );
    }

    /// Assert that `method` was never called.
    pub fn assert_not_called(&self, method: &str) {
        assert_eq!(
            self.call_count(method),
            0,
            "Expected no calls to {}",
            method
        );
    }

    fn property_value(&self, args: &[Value]) -> Result<Vec<Value>, Error> {
        let key = match args {
            [Value::String(interface), Value::String(name)] => (interface.clone(), name.clone()),
            _ => return Err(unknown("malformed Properties.Get call".to_string())),
        };
        match read(&self.properties).get(&key) {
            Some(value) => Ok(vec![Value::Variant(Box::new(value.clone()))]),
            None => Err(Error::Call {
                name: "org.freedesktop.DBus.Error.UnknownProperty".to_string(),
                message: format!("no property {}.{}", key.0, key.1),
            }),
        }
    }
}

impl Connection for MockConnection {
    fn call_method(
        &self,
        destination: &str,
        path: &ObjectPath,
        interface: &str,
        member: &str,
        args: Vec<Value>,
    ) -> Result<Vec<Value>, Error> {
        write(&self.calls).push(RecordedCall {
            destination: destination.to_string(),
            path: path.clone(),
            interface: interface.to_string(),
            member: member.to_string(),
            args: args.clone(),
        });

        let method = format!("{interface}.{member}");
        if let Some(reply) = read(&self.replies).get(&method) {
            return reply.clone();
        }
        if interface == PROPERTIES_INTERFACE && member == "Get" {
            return self.property_value(&args);
        }
        Err(unknown(format!("no reply registered for {method}")))
    }
}

fn unknown(message: String) -> Error {
    Error::Call {
        name: UNKNOWN_METHOD.to_string(),
        message,
    }
}

fn read<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

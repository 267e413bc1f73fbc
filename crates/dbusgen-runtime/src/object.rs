//! Connections, bound remote objects and method replies.

use std::rc::Rc;
use std::sync::Arc;

use crate::error::{ConversionError, Error};
use crate::value::{FromValue, ObjectPath, Value};

/// Interface implementing property access on every object.
pub const PROPERTIES_INTERFACE: &str = "org.freedesktop.DBus.Properties";

/// A bus connection able to perform method calls.
///
/// Implementations own the wire protocol; generated proxies only ever go
/// through this trait.
pub trait Connection {
    /// Calls `interface.member` on the object at `path` owned by `destination`
    /// and returns the reply body.
    fn call_method(
        &self,
        destination: &str,
        path: &ObjectPath,
        interface: &str,
        member: &str,
        args: Vec<Value>,
    ) -> Result<Vec<Value>, Error>;
}

impl<T: Connection + ?Sized> Connection for &T {
    fn call_method(
        &self,
        destination: &str,
        path: &ObjectPath,
        interface: &str,
        member: &str,
        args: Vec<Value>,
    ) -> Result<Vec<Value>, Error> {
        (**self).call_method(destination, path, interface, member, args)
    }
}

impl<T: Connection + ?Sized> Connection for Arc<T> {
    fn call_method(
        &self,
        destination: &str,
        path: &ObjectPath,
        interface: &str,
        member: &str,
        args: Vec<Value>,
    ) -> Result<Vec<Value>, Error> {
        (**self).call_method(destination, path, interface, member, args)
    }
}

impl<T: Connection + ?Sized> Connection for Rc<T> {
    fn call_method(
        &self,
        destination: &str,
        path: &ObjectPath,
        interface: &str,
        member: &str,
        args: Vec<Value>,
    ) -> Result<Vec<Value>, Error> {
        (**self).call_method(destination, path, interface, member, args)
    }
}

/// A remote object bound to a connection, a destination and a path.
#[derive(Debug, Clone)]
pub struct BusObject<C> {
    conn: C,
    destination: String,
    path: ObjectPath,
}

impl<C: Connection> BusObject<C> {
    pub fn new(conn: C, destination: impl Into<String>, path: ObjectPath) -> Self {
        Self {
            conn,
            destination: destination.into(),
            path,
        }
    }

    pub fn connection(&self) -> &C {
        &self.conn
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn path(&self) -> &ObjectPath {
        &self.path
    }

    /// Calls `method`, given as `"<interface>.<member>"`.
    ///
    /// The interface is everything before the last dot; a name without a dot
    /// is sent without an interface.
    pub fn call(&self, method: &str, args: Vec<Value>) -> Result<Reply, Error> {
        let (interface, member) = method.rsplit_once('.').unwrap_or(("", method));
        let values = self
            .conn
            .call_method(&self.destination, &self.path, interface, member, args)?;
        Ok(Reply::new(values))
    }

    /// Reads a property through `org.freedesktop.DBus.Properties.Get`.
    pub fn get_property<T: FromValue>(&self, interface: &str, name: &str) -> Result<T, Error> {
        let method = format!("{PROPERTIES_INTERFACE}.Get");
        let reply = self.call(&method, vec![Value::from(interface), Value::from(name)])?;
        let value = reply
            .values()
            .first()
            .ok_or(ConversionError::MissingArgument { index: 0 })?;
        let value = match value {
            Value::Variant(inner) => inner.as_ref(),
            other => other,
        };
        Ok(T::from_value(value)?)
    }
}

/// Values that can be stored from a whole reply body.
pub trait FromReply: Sized {
    fn from_reply(values: &[Value]) -> Result<Self, ConversionError>;
}

/// Body of a method return.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reply {
    values: Vec<Value>,
}

impl Reply {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Extracts the value at `index`.
    pub fn arg<T: FromValue>(&self, index: usize) -> Result<T, ConversionError> {
        let value = self
            .values
            .get(index)
            .ok_or(ConversionError::MissingArgument { index })?;
        T::from_value(value)
    }

    /// Stores every leading value into a tuple, in order.
    pub fn store<T: FromReply>(&self) -> Result<T, ConversionError> {
        T::from_reply(&self.values)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Echoes the call back as the reply body.
    #[derive(Default)]
    struct Echo {
        last: RefCell<Option<(String, String)>>,
    }

    impl Connection for Echo {
        fn call_method(
            &self,
            _destination: &str,
            _path: &ObjectPath,
            interface: &str,
            member: &str,
            args: Vec<Value>,
        ) -> Result<Vec<Value>, Error> {
            *self.last.borrow_mut() = Some((interface.to_string(), member.to_string()));
            Ok(args)
        }
    }

    #[test]
    fn test_call_splits_at_last_dot() {
        let echo = Echo::default();
        let object = BusObject::new(&echo, "org.example", ObjectPath::new("/org/example"));

        let reply = object.call("org.example.Demo.Ping", vec![Value::from(1u8)]).unwrap();
        assert_eq!(reply.arg::<u8>(0), Ok(1));
        assert_eq!(
            *echo.last.borrow(),
            Some(("org.example.Demo".to_string(), "Ping".to_string()))
        );
    }

    #[test]
    fn test_reply_extraction() {
        let reply = Reply::new(vec![Value::from(3u64), Value::from("x")]);
        let (n, s): (u64, String) = reply.store().unwrap();
        assert_eq!((n, s.as_str()), (3, "x"));
        assert_eq!(reply.arg::<bool>(5), Err(ConversionError::MissingArgument { index: 5 }));
        assert_eq!(
            reply.store::<(u64, String, u32)>(),
            Err(ConversionError::MissingArgument { index: 2 })
        );
    }

    #[test]
    fn test_get_property_unwraps_variant() {
        struct Props;
        impl Connection for Props {
            fn call_method(
                &self,
                _destination: &str,
                _path: &ObjectPath,
                interface: &str,
                member: &str,
                args: Vec<Value>,
            ) -> Result<Vec<Value>, Error> {
                assert_eq!((interface, member), (PROPERTIES_INTERFACE, "Get"));
                assert_eq!(args, vec![Value::from("org.example.Demo"), Value::from("Version")]);
                Ok(vec![Value::Variant(Box::new(Value::from(2u32)))])
            }
        }

        let object = BusObject::new(Arc::new(Props), "org.example", ObjectPath::default());
        assert_eq!(object.get_property::<u32>("org.example.Demo", "Version"), Ok(2));
        assert!(matches!(
            object.get_property::<String>("org.example.Demo", "Version"),
            Err(Error::Conversion(ConversionError::TypeMismatch { .. }))
        ));
    }
}

//! # dbusgen-runtime
//!
//! The transport facade that code generated by `dbusgen` calls into. It
//! defines how a call reaches the bus ([`Connection`]), a remote object bound
//! to a destination and path ([`BusObject`]), the dynamically typed
//! [`Value`] with fallible typed extraction, and the untyped [`RawSignal`]
//! that generated `lookup_signal` functions turn into typed events.
//!
//! The crate performs no I/O. Bus implementations plug in through
//! [`Connection`]; the `testing` feature ships an in-memory
//! [`testing::MockConnection`].

mod error;
mod object;
mod signal;
mod value;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use error::{ConversionError, Error};
pub use object::{BusObject, Connection, FromReply, Reply, PROPERTIES_INTERFACE};
pub use signal::RawSignal;
pub use value::{FromValue, ObjectPath, Signature, UnixFd, Value, Variant};

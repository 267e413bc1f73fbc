//! Generated proxies driven against the mock connection.

use std::collections::HashMap;

use dbusgen_demo::demo::{OrgExampleDemo, OrgExampleOther};
use dbusgen_demo::{OBJECT_PATH, SERVICE};
use dbusgen_runtime::testing::MockConnection;
use dbusgen_runtime::{ConversionError, Error, ObjectPath, Value, Variant};

fn demo(conn: &MockConnection) -> OrgExampleDemo<MockConnection> {
    OrgExampleDemo::new(conn.clone(), SERVICE, ObjectPath::new(OBJECT_PATH))
}

#[test]
fn test_single_output() {
    let conn = MockConnection::new();
    conn.reply("org.example.Demo.GetValue", vec![Value::from("hi")]);

    assert_eq!(demo(&conn).get_value().unwrap(), "hi");

    let calls = conn.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].destination, SERVICE);
    assert_eq!(calls[0].path, ObjectPath::new(OBJECT_PATH));
    assert_eq!(calls[0].interface, "org.example.Demo");
    assert_eq!(calls[0].member, "GetValue");
    assert!(calls[0].args.is_empty());
}

#[test]
fn test_inputs_forwarded_in_order() {
    let conn = MockConnection::new();
    conn.reply("org.example.Demo.SetValue", vec![]);
    conn.reply(
        "org.example.Demo.Move",
        vec![Value::from(true), Value::from("moved")],
    );
    let proxy = demo(&conn);

    proxy.set_value("x".to_string()).unwrap();
    let (ok, message) = proxy.r#move(1, 2).unwrap();
    assert!(ok);
    assert_eq!(message, "moved");

    let calls = conn.calls();
    assert_eq!(calls[0].args, vec![Value::from("x")]);
    assert_eq!(calls[1].method(), "org.example.Demo.Move");
    assert_eq!(calls[1].args, vec![Value::from(1i32), Value::from(2i32)]);
}

#[test]
fn test_container_types() {
    let conn = MockConnection::new();
    conn.reply(
        "org.example.Demo.Lookup",
        vec![Value::from(vec![(ObjectPath::new("/a"), 1u32), (ObjectPath::new("/b"), 2u32)])],
    );

    let mut filter = HashMap::new();
    filter.insert("kind".to_string(), Variant::new("file"));
    let found = demo(&conn).lookup(filter).unwrap();
    assert_eq!(found, vec![(ObjectPath::new("/a"), 1), (ObjectPath::new("/b"), 2)]);

    let args = &conn.calls()[0].args;
    assert_eq!(
        args[0],
        Value::Dict(vec![(Value::from("kind"), Value::from(Variant::new("file")))])
    );
}

#[test]
fn test_no_outputs() {
    let conn = MockConnection::new();
    conn.reply("org.example.Other.Ping", vec![]);
    let other = OrgExampleOther::new(conn.clone(), "org.example.Other", ObjectPath::new("/"));

    other.ping().unwrap();
    conn.assert_called("org.example.Other.Ping");
}

#[test]
fn test_readable_properties() {
    let conn = MockConnection::new();
    conn.property("org.example.Demo", "Version", 7u32);
    conn.property("org.example.Demo", "Title", "Demo");
    let proxy = demo(&conn);

    assert_eq!(proxy.version().unwrap(), 7);
    assert_eq!(proxy.title().unwrap(), "Demo");

    let call = &conn.calls()[0];
    assert_eq!(call.method(), "org.freedesktop.DBus.Properties.Get");
    assert_eq!(call.args, vec![Value::from("org.example.Demo"), Value::from("Version")]);
}

#[test]
fn test_transport_errors_pass_through() {
    let conn = MockConnection::new();
    let failure = Error::Call {
        name: "org.example.Error.Busy".to_string(),
        message: "try later".to_string(),
    };
    conn.fail("org.example.Demo.GetValue", failure.clone());

    assert_eq!(demo(&conn).get_value(), Err(failure));
    assert_eq!(conn.call_count("org.example.Demo.GetValue"), 1);
}

#[test]
fn test_mistyped_reply_is_a_conversion_error() {
    let conn = MockConnection::new();
    conn.reply("org.example.Demo.GetValue", vec![Value::from(1u32)]);
    conn.reply("org.example.Demo.Move", vec![Value::from(true)]);
    let proxy = demo(&conn);

    assert_eq!(
        proxy.get_value(),
        Err(Error::Conversion(ConversionError::TypeMismatch {
            expected: "string",
            found: "uint32",
        }))
    );
    assert_eq!(
        proxy.r#move(0, 0),
        Err(Error::Conversion(ConversionError::MissingArgument { index: 1 }))
    );
}

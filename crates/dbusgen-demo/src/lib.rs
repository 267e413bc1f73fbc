//! Proxies for `model/demo.json`, generated by the build script into the
//! `demo` module.

include!(concat!(env!("OUT_DIR"), "/demo.rs"));

/// Well-known name the demo service owns on the bus.
pub const SERVICE: &str = "org.example.Demo";

/// Path of the demo object.
pub const OBJECT_PATH: &str = "/org/example/Demo";

//! Run-scoped registry of every signal seen while generating a unit.

use std::collections::HashSet;

use crate::model::{Interface, Signal};

/// A signal together with the interface that declares it.
#[derive(Debug, Clone)]
pub struct RegisteredSignal<'a> {
    /// Qualified name, `"<interface>.<signal>"`.
    pub qualified_name: String,
    pub interface: &'a Interface,
    pub signal: &'a Signal,
}

impl RegisteredSignal<'_> {
    /// Rust identifier of the generated event type.
    pub fn type_ident(&self) -> String {
        event_type_ident(self.interface, self.signal)
    }
}

/// Identifier of the event type generated for `signal`, qualified by its interface.
pub fn event_type_ident(interface: &Interface, signal: &Signal) -> String {
    format!("{}{}", interface.type_ident(), signal.ident())
}

/// Signals keyed by qualified name, kept in registration order.
#[derive(Debug, Default)]
pub struct SignalRegistry<'a> {
    entries: Vec<RegisteredSignal<'a>>,
    names: HashSet<String>,
}

impl<'a> SignalRegistry<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a signal. Returns `false` if its qualified name was already taken.
    pub fn register(&mut self, interface: &'a Interface, signal: &'a Signal) -> bool {
        let qualified_name = format!("{}.{}", interface.name, signal.name);
        if !self.names.insert(qualified_name.clone()) {
            return false;
        }
        self.entries.push(RegisteredSignal {
            qualified_name,
            interface,
            signal,
        });
        true
    }

    pub fn get(&self, qualified_name: &str) -> Option<&RegisteredSignal<'a>> {
        self.entries.iter().find(|e| e.qualified_name == qualified_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegisteredSignal<'a>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

//! Accumulating output buffer for generated source text.

use std::fmt::{self, Write};

/// Text sink the generators write into. It never validates what it is given.
#[derive(Debug, Default)]
pub struct Emitter {
    buf: String,
}

impl Emitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends formatted text without a trailing newline.
    pub fn writef(&mut self, args: fmt::Arguments<'_>) {
        // Formatting into a String only fails if a Display impl does.
        let _ = self.buf.write_fmt(args);
    }

    /// Appends the concatenated fragments followed by exactly one newline.
    pub fn writeln(&mut self, fragments: &[&str]) {
        for fragment in fragments {
            self.buf.push_str(fragment);
        }
        self.buf.push('\n');
    }

    pub fn contents(&self) -> &str {
        &self.buf
    }

    pub fn into_string(self) -> String {
        self.buf
    }
}

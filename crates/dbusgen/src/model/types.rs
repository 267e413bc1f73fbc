//! D-Bus argument types and their signature notation.

use std::fmt;

use serde::Deserialize;

use crate::diagnostic::GeneratorError;

/// Nesting limit for containers inside a single signature.
const MAX_DEPTH: usize = 64;

/// The semantic type of an argument, mirroring the D-Bus type system.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum ArgType {
    Byte,
    Boolean,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Double,
    String,
    ObjectPath,
    Signature,
    UnixFd,
    Variant,
    Array(Box<ArgType>),
    Dict(Box<ArgType>, Box<ArgType>),
    Struct(Vec<ArgType>),
}

impl ArgType {
    /// Parses exactly one complete type from a D-Bus signature such as `a{sv}`.
    pub fn parse(signature: &str) -> Result<Self, GeneratorError> {
        let invalid = |reason: String| GeneratorError::InvalidSignature {
            signature: signature.to_string(),
            reason,
        };

        if signature.is_empty() {
            return Err(invalid("signature is empty".to_string()));
        }

        let mut parser = SignatureParser {
            bytes: signature.as_bytes(),
            pos: 0,
        };
        let ty = parser.complete_type(0).map_err(invalid)?;

        if parser.pos != parser.bytes.len() {
            return Err(invalid(format!(
                "expected a single complete type, found trailing '{}'",
                &signature[parser.pos..]
            )));
        }

        Ok(ty)
    }

    /// Renders the type back into D-Bus signature notation.
    pub fn signature(&self) -> String {
        let mut out = String::new();
        self.write_signature(&mut out);
        out
    }

    fn write_signature(&self, out: &mut String) {
        match self {
            ArgType::Byte => out.push('y'),
            ArgType::Boolean => out.push('b'),
            ArgType::Int16 => out.push('n'),
            ArgType::UInt16 => out.push('q'),
            ArgType::Int32 => out.push('i'),
            ArgType::UInt32 => out.push('u'),
            ArgType::Int64 => out.push('x'),
            ArgType::UInt64 => out.push('t'),
            ArgType::Double => out.push('d'),
            ArgType::String => out.push('s'),
            ArgType::ObjectPath => out.push('o'),
            ArgType::Signature => out.push('g'),
            ArgType::UnixFd => out.push('h'),
            ArgType::Variant => out.push('v'),
            ArgType::Array(inner) => {
                out.push('a');
                inner.write_signature(out);
            }
            ArgType::Dict(key, value) => {
                out.push_str("a{");
                key.write_signature(out);
                value.write_signature(out);
                out.push('}');
            }
            ArgType::Struct(fields) => {
                out.push('(');
                for field in fields {
                    field.write_signature(out);
                }
                out.push(')');
            }
        }
    }

    /// Whether the type may be used as a dictionary key.
    pub fn is_basic(&self) -> bool {
        !matches!(
            self,
            ArgType::Variant | ArgType::Array(_) | ArgType::Dict(..) | ArgType::Struct(_)
        )
    }

    /// Visits this type and every type nested inside it.
    pub fn walk(&self, visit: &mut impl FnMut(&ArgType)) {
        visit(self);
        match self {
            ArgType::Array(inner) => inner.walk(visit),
            ArgType::Dict(key, value) => {
                key.walk(visit);
                value.walk(visit);
            }
            ArgType::Struct(fields) => {
                for field in fields {
                    field.walk(visit);
                }
            }
            _ => {}
        }
    }
}

impl TryFrom<String> for ArgType {
    type Error = GeneratorError;

    fn try_from(signature: String) -> Result<Self, Self::Error> {
        ArgType::parse(&signature)
    }
}

impl fmt::Display for ArgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.signature())
    }
}

struct SignatureParser<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl SignatureParser<'_> {
    fn complete_type(&mut self, depth: usize) -> Result<ArgType, String> {
        if depth > MAX_DEPTH {
            return Err(format!("containers nested deeper than {}", MAX_DEPTH));
        }

        let Some(&code) = self.bytes.get(self.pos) else {
            return Err("unexpected end of signature".to_string());
        };
        self.pos += 1;

        let ty = match code {
            b'y' => ArgType::Byte,
            b'b' => ArgType::Boolean,
            b'n' => ArgType::Int16,
            b'q' => ArgType::UInt16,
            b'i' => ArgType::Int32,
            b'u' => ArgType::UInt32,
            b'x' => ArgType::Int64,
            b't' => ArgType::UInt64,
            b'd' => ArgType::Double,
            b's' => ArgType::String,
            b'o' => ArgType::ObjectPath,
            b'g' => ArgType::Signature,
            b'h' => ArgType::UnixFd,
            b'v' => ArgType::Variant,
            b'a' if self.bytes.get(self.pos) == Some(&b'{') => {
                self.pos += 1;
                let key = self.complete_type(depth + 1)?;
                if !key.is_basic() {
                    return Err(format!("dictionary key '{}' is not a basic type", key));
                }
                let value = self.complete_type(depth + 1)?;
                self.expect(b'}')?;
                ArgType::Dict(Box::new(key), Box::new(value))
            }
            b'a' => ArgType::Array(Box::new(self.complete_type(depth + 1)?)),
            b'(' => {
                let mut fields = Vec::new();
                while self.bytes.get(self.pos) != Some(&b')') {
                    if self.pos >= self.bytes.len() {
                        return Err("unterminated struct".to_string());
                    }
                    fields.push(self.complete_type(depth + 1)?);
                }
                self.pos += 1;
                if fields.is_empty() {
                    return Err("empty struct".to_string());
                }
                ArgType::Struct(fields)
            }
            b'{' => return Err("dictionary entry outside of an array".to_string()),
            other => return Err(format!("unknown type code '{}'", other as char)),
        };

        Ok(ty)
    }

    fn expect(&mut self, code: u8) -> Result<(), String> {
        match self.bytes.get(self.pos) {
            Some(&found) if found == code => {
                self.pos += 1;
                Ok(())
            }
            Some(&found) => Err(format!("expected '{}', found '{}'", code as char, found as char)),
            None => Err(format!("expected '{}', found end of signature", code as char)),
        }
    }
}

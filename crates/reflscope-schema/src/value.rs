//! Generic value-tree parser.
//!
//! Parses the snapshot payload grammar: objects, arrays, double-quoted
//! strings with a small escape set, `true`/`false`, and an "other scalar"
//! category (numbers, null, anything else unquoted) that is captured raw and
//! never interpreted. Structure must balance; content is unconstrained.
//!
//! Leniencies carried over from the producer's hand-rolled serializer:
//! commas between entries are optional, trailing bytes after the root value
//! are ignored, and an escape outside the known set passes the escaped
//! character through literally (so `\uXXXX` comes out as `uXXXX`).

use crate::error::{Result, SchemaError};

/// One node of the generic value tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Key order and duplicate keys preserved as written.
    Object(Vec<(String, Value)>),
    Array(Vec<Value>),
    Str(String),
    Bool(bool),
    /// Raw unquoted token: numbers, `null`, anything unrecognized. Kept only
    /// well enough to be skipped.
    Scalar(String),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&[(String, Value)]> {
        match self {
            Value::Object(entries) => Some(entries),
            _ => None,
        }
    }

    /// First entry with the given key, if this is an object.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object()?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }
}

/// Parse one root value from raw payload bytes.
///
/// The payload is treated as UTF-8-ish: byte sequences flow through string
/// and scalar content unvalidated. Trailing bytes after the root value are
/// ignored.
pub fn parse_value(input: &[u8]) -> Result<Value> {
    let mut parser = Parser { input, pos: 0 };
    parser.skip_ws();
    parser.value()
}

struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.pos += 1;
        Some(byte)
    }

    fn expect(&mut self, byte: u8) -> Result<()> {
        if self.peek() == Some(byte) {
            self.pos += 1;
            Ok(())
        } else {
            Err(SchemaError::Expected {
                expected: byte as char,
                at: self.pos,
            })
        }
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\n' | b'\r' | b'\t')) {
            self.pos += 1;
        }
    }

    fn value(&mut self) -> Result<Value> {
        match self.peek() {
            Some(b'{') => self.object(),
            Some(b'[') => self.array(),
            Some(b'"') => Ok(Value::Str(self.string()?)),
            Some(_) => self.bool_or_scalar(),
            None => Err(SchemaError::UnexpectedEnd(self.pos)),
        }
    }

    fn object(&mut self) -> Result<Value> {
        self.expect(b'{')?;
        let mut entries = Vec::new();
        loop {
            self.skip_ws();
            match self.peek() {
                Some(b'}') => {
                    self.pos += 1;
                    return Ok(Value::Object(entries));
                }
                Some(b'"') => {}
                Some(_) => {
                    return Err(SchemaError::Expected {
                        expected: '"',
                        at: self.pos,
                    })
                }
                None => return Err(SchemaError::UnexpectedEnd(self.pos)),
            }

            let key = self.string()?;
            self.skip_ws();
            self.expect(b':')?;
            self.skip_ws();
            let value = self.value()?;
            entries.push((key, value));

            self.skip_ws();
            // Comma between entries is optional.
            if self.peek() == Some(b',') {
                self.pos += 1;
            }
        }
    }

    fn array(&mut self) -> Result<Value> {
        self.expect(b'[')?;
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            match self.peek() {
                Some(b']') => {
                    self.pos += 1;
                    return Ok(Value::Array(items));
                }
                Some(_) => {}
                None => return Err(SchemaError::UnexpectedEnd(self.pos)),
            }

            items.push(self.value()?);

            self.skip_ws();
            if self.peek() == Some(b',') {
                self.pos += 1;
            }
        }
    }

    fn string(&mut self) -> Result<String> {
        self.expect(b'"')?;
        let mut bytes = Vec::new();
        loop {
            match self.bump() {
                Some(b'"') => break,
                Some(b'\\') => match self.bump() {
                    Some(b'n') => bytes.push(b'\n'),
                    Some(b'r') => bytes.push(b'\r'),
                    Some(b't') => bytes.push(b'\t'),
                    Some(b'\\') => bytes.push(b'\\'),
                    Some(b'"') => bytes.push(b'"'),
                    // Unknown escape: the escaped byte passes through
                    // literally, backslash dropped.
                    Some(other) => bytes.push(other),
                    None => return Err(SchemaError::UnexpectedEnd(self.pos)),
                },
                Some(other) => bytes.push(other),
                None => return Err(SchemaError::UnexpectedEnd(self.pos)),
            }
        }
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn bool_or_scalar(&mut self) -> Result<Value> {
        if self.input[self.pos..].starts_with(b"true") {
            self.pos += 4;
            return Ok(Value::Bool(true));
        }
        if self.input[self.pos..].starts_with(b"false") {
            self.pos += 5;
            return Ok(Value::Bool(false));
        }

        let start = self.pos;
        while let Some(byte) = self.peek() {
            if matches!(byte, b',' | b'}' | b']' | b' ' | b'\n' | b'\r' | b'\t') {
                break;
            }
            self.pos += 1;
        }
        if self.pos == start {
            return Err(SchemaError::MalformedValue(start));
        }
        Ok(Value::Scalar(
            String::from_utf8_lossy(&self.input[start..self.pos]).into_owned(),
        ))
    }
}

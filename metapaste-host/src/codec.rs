//! Serialized-value detection and decoding.
//!
//! Hosts commonly persist structured metadata as a serialized string. When
//! such a string comes back through the bulk editor it must be decoded
//! before being written, otherwise the host would serialize it a second time.
//!
//! [`PhpSerializedCodec`] understands the PHP `serialize()` format used by
//! the reference host: `N;`, `b:`, `i:`, `d:`, `s:` and `a:` (nested).
//! Object (`O:`) and enum (`E:`) payloads are recognized as serialized but
//! cannot be decoded. Arrays nested deeper than [`MAX_DEPTH`] do not decode
//! either.

use metapaste_types::MetaValue;
use serde_json::{Map, Number, Value};

/// Deepest array nesting the decoder accepts. Kept below serde_json's
/// recursion limit so a decoded value still parses back from panel text.
pub const MAX_DEPTH: usize = 64;

/// Recognizes and decodes host-serialized scalar strings.
pub trait ScalarCodec: Send + Sync {
    /// True when `raw` looks like a value the host serialized.
    fn is_serialized(&self, raw: &str) -> bool;

    /// Decodes a serialized value. `None` when the payload is malformed or
    /// uses a form this codec cannot represent.
    fn deserialize(&self, raw: &str) -> Option<MetaValue>;
}

/// Codec for the PHP `serialize()` wire format.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhpSerializedCodec;

impl PhpSerializedCodec {
    pub fn new() -> Self {
        Self
    }
}

impl ScalarCodec for PhpSerializedCodec {
    fn is_serialized(&self, raw: &str) -> bool {
        let data = raw.trim();
        if data == "N;" {
            return true;
        }
        let bytes = data.as_bytes();
        if bytes.len() < 4 || bytes[1] != b':' {
            return false;
        }
        let last = bytes[bytes.len() - 1];
        if last != b';' && last != b'}' {
            return false;
        }

        match bytes[0] {
            b's' => bytes[bytes.len() - 2] == b'"' && has_length_prefix(&bytes[2..]),
            b'a' | b'O' | b'E' => has_length_prefix(&bytes[2..]),
            b'b' | b'i' | b'd' => {
                let body = &bytes[2..bytes.len() - 1];
                !body.is_empty()
                    && body
                        .iter()
                        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'E' | b'+' | b'-'))
                    && last == b';'
            }
            _ => false,
        }
    }

    fn deserialize(&self, raw: &str) -> Option<MetaValue> {
        let mut parser = Parser::new(raw.trim().as_bytes());
        let value = parser.value()?;
        parser.at_end().then_some(value)
    }
}

/// `<digits>:` at the start of `rest`.
fn has_length_prefix(rest: &[u8]) -> bool {
    let digits = rest.iter().take_while(|b| b.is_ascii_digit()).count();
    digits > 0 && rest.get(digits) == Some(&b':')
}

enum ArrayKey {
    Index(i64),
    Name(String),
}

struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            pos: 0,
            depth: 0,
        }
    }

    fn at_end(&self) -> bool {
        self.pos == self.input.len()
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn expect(&mut self, literal: &[u8]) -> Option<()> {
        let end = self.pos.checked_add(literal.len())?;
        if self.input.get(self.pos..end)? == literal {
            self.pos = end;
            Some(())
        } else {
            None
        }
    }

    fn take(&mut self, len: usize) -> Option<&'a [u8]> {
        let end = self.pos.checked_add(len)?;
        let slice = self.input.get(self.pos..end)?;
        self.pos = end;
        Some(slice)
    }

    /// Reads up to (not including) `delim` and consumes the delimiter.
    fn until(&mut self, delim: u8) -> Option<&'a str> {
        let rest = self.input.get(self.pos..)?;
        let len = rest.iter().position(|&b| b == delim)?;
        let text = std::str::from_utf8(&rest[..len]).ok()?;
        self.pos += len + 1;
        Some(text)
    }

    fn value(&mut self) -> Option<Value> {
        match self.peek()? {
            b'N' => {
                self.expect(b"N;")?;
                Some(Value::Null)
            }
            b'b' => {
                self.expect(b"b:")?;
                match self.until(b';')? {
                    "0" => Some(Value::Bool(false)),
                    "1" => Some(Value::Bool(true)),
                    _ => None,
                }
            }
            b'i' => {
                self.expect(b"i:")?;
                let n: i64 = self.until(b';')?.parse().ok()?;
                Some(Value::from(n))
            }
            b'd' => {
                self.expect(b"d:")?;
                let f: f64 = self.until(b';')?.parse().ok()?;
                Number::from_f64(f).map(Value::Number)
            }
            b's' => self.string().map(Value::String),
            b'a' => self.array(),
            _ => None,
        }
    }

    fn string(&mut self) -> Option<String> {
        self.expect(b"s:")?;
        let len: usize = self.until(b':')?.parse().ok()?;
        self.expect(b"\"")?;
        let bytes = self.take(len)?;
        self.expect(b"\";")?;
        String::from_utf8(bytes.to_vec()).ok()
    }

    fn key(&mut self) -> Option<ArrayKey> {
        match self.peek()? {
            b'i' => {
                self.expect(b"i:")?;
                Some(ArrayKey::Index(self.until(b';')?.parse().ok()?))
            }
            b's' => self.string().map(ArrayKey::Name),
            _ => None,
        }
    }

    fn array(&mut self) -> Option<Value> {
        if self.depth >= MAX_DEPTH {
            return None;
        }
        self.depth += 1;
        self.expect(b"a:")?;
        let count: usize = self.until(b':')?.parse().ok()?;
        self.expect(b"{")?;

        let mut entries = Vec::with_capacity(count.min(1024));
        for _ in 0..count {
            let key = self.key()?;
            let value = self.value()?;
            entries.push((key, value));
        }
        self.expect(b"}")?;
        self.depth -= 1;

        let is_list = entries
            .iter()
            .enumerate()
            .all(|(i, (key, _))| matches!(key, ArrayKey::Index(n) if *n == i as i64));
        if is_list {
            return Some(Value::Array(entries.into_iter().map(|(_, v)| v).collect()));
        }

        let mut map = Map::new();
        for (key, value) in entries {
            let name = match key {
                ArrayKey::Index(n) => n.to_string(),
                ArrayKey::Name(s) => s,
            };
            map.insert(name, value);
        }
        Some(Value::Object(map))
    }
}

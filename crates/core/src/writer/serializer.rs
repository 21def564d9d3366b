//! Canonical PDF object serialization.
//!
//! Every `encode_*` function appends to a byte buffer and cannot fail.
//! [`Serializer`] wraps an output sink and writes one encoded value at
//! a time. Decoding the output of this module with the tokenizer gives
//! back the same null, boolean, integer, name and byte-string values;
//! reals are stable to six decimal digits.

use crate::error::Result;
use crate::model::PDFObject;
use crate::parser::charclass::is_token_end;
use std::io::Write;

/// Reals smaller than this (and nonzero) use the fixed six-digit form.
const SMALL_REAL: f64 = 1e-4;

/// Above this magnitude a real has no fractional digits worth rounding.
const ROUNDING_LIMIT: f64 = 1e15;

/// Serializer writing canonical object syntax to a sink.
pub struct Serializer<W: Write> {
    sink: W,
    buf: Vec<u8>,
}

impl<W: Write> Serializer<W> {
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            buf: Vec::new(),
        }
    }

    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    pub fn into_inner(self) -> W {
        self.sink
    }

    /// Write any object.
    pub fn write_object(&mut self, obj: &PDFObject) -> Result<()> {
        self.buf.clear();
        encode_object(&mut self.buf, obj);
        tracing::trace!(kind = obj.type_name(), len = self.buf.len(), "serialized object");
        self.flush_buf()
    }

    /// Write a real number.
    ///
    /// # Panics
    /// Panics if `value` is NaN or infinite.
    pub fn write_real(&mut self, value: f64) -> Result<()> {
        self.buf.clear();
        encode_real(&mut self.buf, value);
        self.flush_buf()
    }

    /// Write a name given its decoded bytes (without the slash).
    pub fn write_name(&mut self, name: impl AsRef<[u8]>) -> Result<()> {
        self.buf.clear();
        encode_name(&mut self.buf, name);
        self.flush_buf()
    }

    /// Write bytes as a literal string.
    pub fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.buf.clear();
        encode_literal(&mut self.buf, data);
        self.flush_buf()
    }

    /// Write text, switching to UTF-16BE when it is not plain ASCII.
    pub fn write_text(&mut self, text: &str) -> Result<()> {
        self.buf.clear();
        encode_text(&mut self.buf, text);
        self.flush_buf()
    }

    /// Write raw bytes with no encoding, e.g. separators.
    pub fn write_raw(&mut self, data: &[u8]) -> Result<()> {
        self.sink.write_all(data)?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.sink.flush()?;
        Ok(())
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.sink.write_all(&self.buf)?;
        Ok(())
    }
}

/// Serialize an object to a new byte vector.
pub fn to_bytes(obj: &PDFObject) -> Vec<u8> {
    let mut out = Vec::new();
    encode_object(&mut out, obj);
    out
}

/// Append the canonical encoding of `obj`.
pub fn encode_object(out: &mut Vec<u8>, obj: &PDFObject) {
    match obj {
        PDFObject::Null => out.extend_from_slice(b"null"),
        PDFObject::Bool(b) => out.extend_from_slice(if *b { b"true" } else { b"false" }),
        PDFObject::Int(n) => out.extend_from_slice(n.to_string().as_bytes()),
        PDFObject::Real(r) => encode_real(out, *r),
        PDFObject::Bytes(s) => encode_literal(out, s),
        PDFObject::Name(n) => encode_name(out, n),
        PDFObject::Array(arr) => {
            out.push(b'[');
            for (i, item) in arr.iter().enumerate() {
                if i > 0 {
                    out.push(b' ');
                }
                encode_object(out, item);
            }
            out.push(b']');
        }
        PDFObject::Dict(dict) => {
            out.extend_from_slice(b"<<");
            for (i, (key, value)) in dict.iter().enumerate() {
                if i > 0 {
                    out.push(b' ');
                }
                encode_name(out, key);
                out.push(b' ');
                encode_object(out, value);
            }
            out.extend_from_slice(b">>");
        }
    }
}

/// Format a real in positional notation, never scientific.
///
/// # Panics
/// Panics if `value` is NaN or infinite.
pub fn format_real(value: f64) -> String {
    assert!(
        value.is_finite(),
        "cannot serialize non-finite real {value}"
    );

    if value != 0.0 && value.abs() < SMALL_REAL {
        let s = format!("{value:.6}");
        return match s.strip_prefix('-') {
            Some(zero @ "0.000000") => zero.to_owned(),
            _ => s,
        };
    }

    let rounded = if value.abs() < ROUNDING_LIMIT {
        (value * 1e6).round() / 1e6
    } else {
        value
    };
    // Zero is written unsigned.
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    // f64 Display is positional; keep a fraction so the value reads back as a real.
    let mut s = format!("{rounded}");
    if !s.contains('.') {
        s.push_str(".0");
    }
    s
}

/// Append a real number.
pub fn encode_real(out: &mut Vec<u8>, value: f64) {
    out.extend_from_slice(format_real(value).as_bytes());
}

/// Append a name, escaping bytes that would end or alter it as `#xx`.
///
/// Every other byte, including non-UTF-8 ones, is written verbatim.
pub fn encode_name(out: &mut Vec<u8>, name: impl AsRef<[u8]>) {
    out.push(b'/');
    for &b in name.as_ref() {
        if b == b'#' || is_token_end(b) {
            out.extend_from_slice(format!("#{b:02x}").as_bytes());
        } else {
            out.push(b);
        }
    }
}

/// Append a literal string.
///
/// Only `(`, `)`, `\` and CR are escaped; every other byte is written
/// as is, with no octal escapes or line wrapping.
pub fn encode_literal(out: &mut Vec<u8>, data: &[u8]) {
    out.push(b'(');
    for &b in data {
        match b {
            b'(' | b')' | b'\\' => {
                out.push(b'\\');
                out.push(b);
            }
            b'\r' => out.extend_from_slice(b"\\r"),
            _ => out.push(b),
        }
    }
    out.push(b')');
}

/// Check whether text can be written as plain bytes.
fn is_plain_text(text: &str) -> bool {
    text.bytes()
        .all(|b| matches!(b, b'\t' | b'\n' | b'\r' | 0x20..=0x7E))
}

/// Encode text as UTF-16BE with a leading byte order mark.
pub fn utf16be_with_bom(text: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(2 + text.len() * 2);
    bytes.extend_from_slice(&[0xFE, 0xFF]);
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    bytes
}

/// Append text as a literal string.
///
/// Printable ASCII (plus tab, CR and LF) is written directly; anything
/// else becomes UTF-16BE with a byte order mark.
pub fn encode_text(out: &mut Vec<u8>, text: &str) {
    if is_plain_text(text) {
        encode_literal(out, text.as_bytes());
    } else {
        encode_literal(out, &utf16be_with_bom(text));
    }
}

//! Byte classification for the object grammar.
//!
//! Every byte falls in exactly one class. Lookups go through a
//! 256-entry table built at compile time.

/// Lexical class of a single byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    /// NUL, TAB, LF, FF, CR, SPACE
    Whitespace,
    /// ( ) < > [ ] { } / %
    Delimiter,
    /// 0-9
    Digit,
    /// Anything else
    Regular,
}

const fn classify(b: u8) -> CharClass {
    match b {
        b'\x00' | b'\t' | b'\n' | b'\x0c' | b'\r' | b' ' => CharClass::Whitespace,
        b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%' => {
            CharClass::Delimiter
        }
        b'0'..=b'9' => CharClass::Digit,
        _ => CharClass::Regular,
    }
}

static CLASS_TABLE: [CharClass; 256] = {
    let mut table = [CharClass::Regular; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = classify(i as u8);
        i += 1;
    }
    table
};

/// Class of byte `b`.
#[inline]
pub fn class_of(b: u8) -> CharClass {
    CLASS_TABLE[b as usize]
}

#[inline]
pub fn is_whitespace(b: u8) -> bool {
    class_of(b) == CharClass::Whitespace
}

#[inline]
pub fn is_delimiter(b: u8) -> bool {
    class_of(b) == CharClass::Delimiter
}

#[inline]
pub fn is_digit(b: u8) -> bool {
    class_of(b) == CharClass::Digit
}

/// Check if byte ends a name or keyword
#[inline]
pub fn is_token_end(b: u8) -> bool {
    matches!(class_of(b), CharClass::Whitespace | CharClass::Delimiter)
}

/// Value of an ASCII hex digit.
#[inline]
pub const fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

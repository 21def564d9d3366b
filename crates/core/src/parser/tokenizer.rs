//! PDF object tokenizer.
//!
//! `Tokenizer::next_token` reads one lexical unit. Primitive values
//! (numbers, names, strings, booleans, null) resolve directly to
//! [`PDFObject`]s; structural markers and unknown words come back as
//! bare tokens. `Tokenizer::next_object` assembles arrays and
//! dictionaries on top of that by recursive descent.

use super::charclass::{hex_value, is_digit, is_token_end, is_whitespace};
use super::params::{NameEscapePolicy, TokenizerParams};
use super::source::{ByteSource, SliceSource};
use crate::error::{PdfError, Result};
use crate::model::{Name, NamePool, PDFDict, PDFObject};
use std::sync::Arc;

/// Keywords outside the primitive grammar.
///
/// Known object-structure markers are zero-allocation variants; any
/// other word keeps its raw bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Keyword {
    Obj,
    EndObj,
    R,
    Stream,
    EndStream,
    Xref,
    Trailer,
    StartXref,

    // Unknown (preserves original bytes)
    Other(Vec<u8>),
}

impl Keyword {
    pub fn from_bytes(b: &[u8]) -> Self {
        match b {
            b"obj" => Keyword::Obj,
            b"endobj" => Keyword::EndObj,
            b"R" => Keyword::R,
            b"stream" => Keyword::Stream,
            b"endstream" => Keyword::EndStream,
            b"xref" => Keyword::Xref,
            b"trailer" => Keyword::Trailer,
            b"startxref" => Keyword::StartXref,
            _ => Keyword::Other(b.to_vec()),
        }
    }

    /// The raw matched text.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Keyword::Obj => b"obj",
            Keyword::EndObj => b"endobj",
            Keyword::R => b"R",
            Keyword::Stream => b"stream",
            Keyword::EndStream => b"endstream",
            Keyword::Xref => b"xref",
            Keyword::Trailer => b"trailer",
            Keyword::StartXref => b"startxref",
            Keyword::Other(bytes) => bytes.as_slice(),
        }
    }
}

/// A lexical unit.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// End of input; returned again on every later call.
    Eof,
    DictOpen,
    DictClose,
    ArrayOpen,
    ArrayClose,
    BraceOpen,
    BraceClose,
    /// Bare word that is not `true`, `false` or `null`
    Keyword(Keyword),
    /// Primitive value, or a composite built by `next_object`
    Object(PDFObject),
}

impl Token {
    /// Short description used in logs and error messages.
    pub const fn kind(&self) -> &'static str {
        match self {
            Token::Eof => "end of input",
            Token::DictOpen => "'<<'",
            Token::DictClose => "'>>'",
            Token::ArrayOpen => "'['",
            Token::ArrayClose => "']'",
            Token::BraceOpen => "'{'",
            Token::BraceClose => "'}'",
            Token::Keyword(_) => "keyword",
            Token::Object(obj) => obj.type_name(),
        }
    }

    pub fn into_object(self) -> Option<PDFObject> {
        match self {
            Token::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub const fn is_eof(&self) -> bool {
        matches!(self, Token::Eof)
    }
}

/// Fractional digits past this count are read but do not contribute.
const MAX_FRACTION_DIGITS: u32 = 18;

/// Largest magnitude an f64 mantissa holds exactly.
const EXACT_F64_LIMIT: i64 = 1 << 53;

/// Tokenizer over a seekable byte source.
///
/// Every token and object is returned as a freshly owned value. A
/// tokenizer is single-threaded; only its [`NamePool`] may be shared.
pub struct Tokenizer<S: ByteSource> {
    source: S,
    pool: Arc<NamePool>,
    params: TokenizerParams,
    /// Scratch space for names and keywords
    buf: Vec<u8>,
    /// Start of the most recent token
    token_pos: usize,
}

impl<'a> Tokenizer<SliceSource<'a>> {
    /// Tokenize an in-memory byte slice with a private name pool.
    pub fn from_slice(data: &'a [u8]) -> Self {
        Self::new(SliceSource::new(data))
    }
}

impl<S: ByteSource> Tokenizer<S> {
    /// Create a tokenizer with a private name pool and default parameters.
    pub fn new(source: S) -> Self {
        Self::with_pool(source, Arc::new(NamePool::new()))
    }

    /// Create a tokenizer interning names into a shared pool.
    pub fn with_pool(source: S, pool: Arc<NamePool>) -> Self {
        Self {
            source,
            pool,
            params: TokenizerParams::default(),
            buf: Vec::new(),
            token_pos: 0,
        }
    }

    pub fn with_params(mut self, params: TokenizerParams) -> Self {
        self.params = params;
        self
    }

    pub fn params(&self) -> &TokenizerParams {
        &self.params
    }

    pub fn pool(&self) -> &Arc<NamePool> {
        &self.pool
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn into_source(self) -> S {
        self.source
    }

    /// Current position in the source.
    pub fn pos(&self) -> usize {
        self.source.pos()
    }

    /// Seek to an absolute position.
    pub fn set_pos(&mut self, pos: usize) -> Result<()> {
        self.token_pos = pos;
        self.source.set_pos(pos)
    }

    /// Alias for [`Tokenizer::pos`].
    pub fn tell(&self) -> usize {
        self.pos()
    }

    /// Start position of the most recently read token, or of the
    /// opening bracket after `next_object` returns a composite.
    pub fn token_pos(&self) -> usize {
        self.token_pos
    }

    /// Read one raw byte.
    pub fn next_byte(&mut self) -> Result<Option<u8>> {
        self.source.read_byte()
    }

    /// Skip whitespace bytes (not comments).
    pub fn skip_whitespace(&mut self) -> Result<()> {
        while let Some(b) = self.source.read_byte()? {
            if !is_whitespace(b) {
                self.unread()?;
                break;
            }
        }
        Ok(())
    }

    /// Step back over the byte just read.
    fn unread(&mut self) -> Result<()> {
        let pos = self.source.pos();
        self.source.set_pos(pos - 1)
    }

    /// Look at the next byte without consuming it.
    fn peek_byte(&mut self) -> Result<Option<u8>> {
        let b = self.source.read_byte()?;
        if b.is_some() {
            self.unread()?;
        }
        Ok(b)
    }

    /// Get next token
    pub fn next_token(&mut self) -> Result<Token> {
        loop {
            self.skip_whitespace()?;
            let start = self.source.pos();
            self.token_pos = start;

            let Some(b) = self.source.read_byte()? else {
                return Ok(Token::Eof);
            };

            let token = match b {
                b'%' => {
                    self.skip_comment()?;
                    continue;
                }
                b'/' => Token::Object(PDFObject::Name(self.parse_name()?)),
                b'(' => Token::Object(PDFObject::Bytes(self.parse_literal_string(start)?)),
                b'<' => {
                    if self.peek_byte()? == Some(b'<') {
                        self.source.read_byte()?;
                        Token::DictOpen
                    } else {
                        Token::Object(PDFObject::Bytes(self.parse_hex_string(start)?))
                    }
                }
                b'>' => {
                    if self.source.read_byte()? != Some(b'>') {
                        return Err(PdfError::malformed("expected '>>'", Some(start)));
                    }
                    Token::DictClose
                }
                b'[' => Token::ArrayOpen,
                b']' => Token::ArrayClose,
                b'{' => Token::BraceOpen,
                b'}' => Token::BraceClose,
                b'+' | b'-' | b'.' => self.parse_number(b, start)?,
                c if is_digit(c) => self.parse_number(c, start)?,
                _ => self.parse_keyword(b)?,
            };

            tracing::trace!(pos = start, kind = token.kind(), "token");
            return Ok(token);
        }
    }

    /// Parse the next token and rewind to where it started.
    ///
    /// This repeats the full parse; there is no lookahead cache.
    pub fn peek_token(&mut self) -> Result<Token> {
        let pos = self.source.pos();
        let token_pos = self.token_pos;
        let token = self.next_token();
        self.source.set_pos(pos)?;
        self.token_pos = token_pos;
        token
    }

    /// Get next object, assembling arrays and dictionaries.
    ///
    /// A `]` is only returned when `allow_end_array_token` is set; other
    /// bare tokens (keywords, `>>`, braces, end of input) only when
    /// `allow_keyword` is set. Anything else is malformed.
    pub fn next_object(
        &mut self,
        allow_end_array_token: bool,
        allow_keyword: bool,
    ) -> Result<Token> {
        self.read_object(0, allow_end_array_token, allow_keyword)
    }

    /// Iterate over tokens with their start positions, stopping at end of input.
    pub fn tokens(&mut self) -> Tokens<'_, S> {
        Tokens {
            tokenizer: self,
            done: false,
        }
    }

    fn read_object(
        &mut self,
        depth: usize,
        allow_end_array_token: bool,
        allow_keyword: bool,
    ) -> Result<Token> {
        let token = self.next_token()?;
        let start = self.token_pos;
        match token {
            Token::Object(_) => Ok(token),
            Token::DictOpen => {
                let dict = self.parse_dict(depth + 1, start)?;
                self.token_pos = start;
                Ok(Token::Object(PDFObject::Dict(dict)))
            }
            Token::ArrayOpen => {
                let arr = self.parse_array(depth + 1, start)?;
                self.token_pos = start;
                Ok(Token::Object(PDFObject::Array(arr)))
            }
            Token::ArrayClose if allow_end_array_token => Ok(token),
            Token::ArrayClose => Err(PdfError::malformed("unexpected ']'", Some(start))),
            _ if allow_keyword => Ok(token),
            _ => Err(PdfError::malformed(
                format!("unexpected {}", token.kind()),
                Some(start),
            )),
        }
    }

    fn check_depth(&self, depth: usize, start: usize) -> Result<()> {
        if depth > self.params.max_depth {
            return Err(PdfError::malformed(
                format!("nesting deeper than {}", self.params.max_depth),
                Some(start),
            ));
        }
        Ok(())
    }

    /// Parse dictionary entries after `<<` up to the matching `>>`.
    fn parse_dict(&mut self, depth: usize, start: usize) -> Result<PDFDict> {
        self.check_depth(depth, start)?;
        let mut dict = PDFDict::new();

        loop {
            let key = match self.next_token()? {
                Token::DictClose => break,
                Token::Object(PDFObject::Name(name)) => name,
                Token::Eof => {
                    return Err(PdfError::malformed("unterminated dictionary", Some(start)));
                }
                other => {
                    return Err(PdfError::malformed(
                        format!("dictionary key must be a name, got {}", other.kind()),
                        Some(self.token_pos),
                    ));
                }
            };

            match self.read_object(depth, false, false)? {
                // A null value means the entry is absent.
                Token::Object(PDFObject::Null) => {
                    dict.shift_remove(&key);
                }
                Token::Object(value) => {
                    dict.insert(key, value);
                }
                other => {
                    return Err(PdfError::malformed(
                        format!("unexpected {} in dictionary", other.kind()),
                        Some(self.token_pos),
                    ));
                }
            }
        }

        Ok(dict)
    }

    /// Parse array elements after `[` up to the matching `]`.
    fn parse_array(&mut self, depth: usize, start: usize) -> Result<Vec<PDFObject>> {
        self.check_depth(depth, start)?;
        let mut arr = Vec::new();

        loop {
            match self.read_object(depth, true, false)? {
                Token::ArrayClose => break,
                Token::Object(obj) => arr.push(obj),
                other => {
                    return Err(PdfError::malformed(
                        format!("unexpected {} in array", other.kind()),
                        Some(self.token_pos),
                    ));
                }
            }
        }

        Ok(arr)
    }

    /// Discard a comment body up to the end of the line.
    fn skip_comment(&mut self) -> Result<()> {
        while let Some(b) = self.source.read_byte()? {
            if b == b'\r' || b == b'\n' {
                break;
            }
        }
        Ok(())
    }

    /// Parse a number after its first byte (sign, dot or digit).
    fn parse_number(&mut self, first: u8, start: usize) -> Result<Token> {
        let negative = first == b'-';
        let mut next = if first == b'+' || first == b'-' {
            self.source.read_byte()?
        } else {
            Some(first)
        };

        // A bare sign is a keyword.
        if !matches!(next, Some(c) if is_digit(c) || c == b'.') {
            self.source.set_pos(start + 1)?;
            return self.parse_keyword(first);
        }

        let overflow = || PdfError::malformed("integer overflow", Some(start));

        let mut int_part: i64 = 0;
        while let Some(c) = next.filter(|&c| is_digit(c)) {
            let d = i64::from(c - b'0');
            int_part = int_part.checked_mul(10).ok_or_else(overflow)?;
            int_part = if negative {
                int_part.checked_sub(d)
            } else {
                int_part.checked_add(d)
            }
            .ok_or_else(overflow)?;
            next = self.source.read_byte()?;
        }

        if next != Some(b'.') {
            if next.is_some() {
                self.unread()?;
            }
            return Ok(Token::Object(PDFObject::Int(int_part)));
        }

        let mut fraction: i64 = 0;
        let mut scale: u32 = 0;
        next = self.source.read_byte()?;
        while let Some(c) = next.filter(|&c| is_digit(c)) {
            if scale < MAX_FRACTION_DIGITS {
                let d = i64::from(c - b'0');
                fraction = fraction * 10 + if negative { -d } else { d };
                scale += 1;
            }
            next = self.source.read_byte()?;
        }
        if next.is_some() {
            self.unread()?;
        }

        Ok(Token::Object(PDFObject::Real(fixed_point(
            int_part, fraction, scale,
        ))))
    }

    /// Parse a literal string after its opening `(`.
    fn parse_literal_string(&mut self, start: usize) -> Result<Vec<u8>> {
        let unterminated = || PdfError::malformed("unterminated literal string", Some(start));
        let mut result = Vec::new();
        let mut depth = 1u32;

        loop {
            let b = self.source.read_byte()?.ok_or_else(unterminated)?;
            match b {
                b'(' => {
                    depth += 1;
                    result.push(b);
                }
                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                    result.push(b);
                }
                b'\\' => {
                    let esc = self.source.read_byte()?.ok_or_else(unterminated)?;
                    match esc {
                        b'n' => result.push(b'\n'),
                        b'r' => result.push(b'\r'),
                        b't' => result.push(b'\t'),
                        b'b' => result.push(0x08),
                        b'f' => result.push(0x0c),
                        b'(' | b')' | b'\\' => result.push(esc),
                        b'\r' => {
                            // Line continuation, CR or CR LF
                            if self.peek_byte()? == Some(b'\n') {
                                self.source.read_byte()?;
                            }
                        }
                        b'\n' => {}
                        b'0'..=b'7' => {
                            let mut octal = u32::from(esc - b'0');
                            for _ in 0..2 {
                                match self.source.read_byte()? {
                                    Some(d @ b'0'..=b'7') => octal = octal * 8 + u32::from(d - b'0'),
                                    Some(_) => {
                                        self.unread()?;
                                        break;
                                    }
                                    None => break,
                                }
                            }
                            result.push((octal & 0xFF) as u8);
                        }
                        other => result.push(other),
                    }
                }
                b'\r' => {
                    if self.peek_byte()? == Some(b'\n') {
                        self.source.read_byte()?;
                    }
                    result.push(b'\n');
                }
                _ => result.push(b),
            }
        }

        Ok(result)
    }

    /// Parse a hex string after its opening `<`.
    fn parse_hex_string(&mut self, start: usize) -> Result<Vec<u8>> {
        let mut result = Vec::new();
        let mut high: Option<u8> = None;

        loop {
            let b = self
                .source
                .read_byte()?
                .ok_or_else(|| PdfError::malformed("unterminated hex string", Some(start)))?;
            if b == b'>' {
                break;
            }
            if is_whitespace(b) {
                continue;
            }
            let Some(nibble) = hex_value(b) else {
                return Err(PdfError::malformed(
                    format!("invalid hex digit {:?}", char::from(b)),
                    Some(self.source.pos() - 1),
                ));
            };
            match high.take() {
                Some(h) => result.push((h << 4) | nibble),
                None => high = Some(nibble),
            }
        }

        // An odd digit count ends with an implied 0.
        if let Some(h) = high {
            result.push(h << 4);
        }

        Ok(result)
    }

    /// Parse a name after its `/`.
    fn parse_name(&mut self) -> Result<Name> {
        self.buf.clear();

        while let Some(b) = self.source.read_byte()? {
            if is_token_end(b) {
                self.unread()?;
                break;
            }
            if b != b'#' {
                self.buf.push(b);
                continue;
            }

            let after_hash = self.source.pos();
            let h1 = self.source.read_byte()?.and_then(hex_value);
            let h2 = match h1 {
                Some(_) => self.source.read_byte()?.and_then(hex_value),
                None => None,
            };
            if let (Some(h1), Some(h2)) = (h1, h2) {
                self.buf.push((h1 << 4) | h2);
                continue;
            }

            match self.params.name_escapes {
                NameEscapePolicy::Strict => {
                    return Err(PdfError::malformed(
                        "invalid '#' escape in name",
                        Some(after_hash - 1),
                    ));
                }
                NameEscapePolicy::Lenient => {
                    tracing::debug!(pos = after_hash - 1, "keeping invalid '#' escape in name");
                    self.buf.push(b'#');
                    self.source.set_pos(after_hash)?;
                }
            }
        }

        Ok(self.pool.intern(&self.buf))
    }

    /// Parse a keyword starting with `first`.
    fn parse_keyword(&mut self, first: u8) -> Result<Token> {
        self.buf.clear();
        self.buf.push(first);

        while let Some(b) = self.source.read_byte()? {
            if is_token_end(b) {
                self.unread()?;
                break;
            }
            self.buf.push(b);
        }

        Ok(match self.buf.as_slice() {
            b"true" => Token::Object(PDFObject::Bool(true)),
            b"false" => Token::Object(PDFObject::Bool(false)),
            b"null" => Token::Object(PDFObject::Null),
            bytes => Token::Keyword(Keyword::from_bytes(bytes)),
        })
    }
}

/// Combine integer and fractional digits into a real.
///
/// Both parts carry the number's sign. When the combined mantissa fits
/// an f64 exactly a single division keeps the result correctly rounded.
fn fixed_point(int_part: i64, fraction: i64, scale: u32) -> f64 {
    let divisor = 10f64.powi(scale as i32);
    let mantissa = 10i64
        .checked_pow(scale)
        .and_then(|p| int_part.checked_mul(p))
        .and_then(|m| m.checked_add(fraction))
        .filter(|m| m.unsigned_abs() <= EXACT_F64_LIMIT as u64);
    match mantissa {
        Some(m) => m as f64 / divisor,
        None => int_part as f64 + fraction as f64 / divisor,
    }
}

/// Iterator over `(position, token)` pairs, ending before end of input.
pub struct Tokens<'t, S: ByteSource> {
    tokenizer: &'t mut Tokenizer<S>,
    done: bool,
}

impl<S: ByteSource> Iterator for Tokens<'_, S> {
    type Item = Result<(usize, Token)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.tokenizer.next_token() {
            Ok(Token::Eof) => {
                self.done = true;
                None
            }
            Ok(token) => Some(Ok((self.tokenizer.token_pos(), token))),
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

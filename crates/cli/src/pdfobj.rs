//! pdfobj - Dump the primitive objects of a PDF byte range
//!
//! Reads a file (optionally RC4-decrypting it first), then prints either
//! the raw token stream or the assembled objects as text, XML or JSON.
//! `canonical` mode re-encodes every object with the serializer.

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, ValueEnum};
use memmap2::Mmap;
use pdfsyntax_core::PDFObject;
use pdfsyntax_core::arcfour;
use pdfsyntax_core::parser::{ByteSource, NameEscapePolicy, Token, Tokenizer, TokenizerParams};
use pdfsyntax_core::writer::encode_object;
use serde_json::{Value, json};
use std::borrow::Cow;
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::ops::Deref;
use std::path::{Path, PathBuf};

/// What to dump.
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
enum Mode {
    /// Every token with its offset
    Tokens,
    /// Top-level objects with keywords passed through (default)
    #[default]
    Objects,
    /// Objects re-encoded in canonical form, one per line
    Canonical,
}

/// Output format for `tokens` and `objects`.
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
enum Format {
    #[default]
    Text,
    Xml,
    Json,
}

/// Dump PDF tokens or objects.
#[derive(Parser, Debug)]
#[command(name = "pdfobj")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input file, or "-" for stdin
    file: PathBuf,

    /// Dump mode
    #[arg(short, long, value_enum, default_value_t = Mode::Objects)]
    mode: Mode,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Byte offset to start reading at
    #[arg(short, long, default_value_t = 0)]
    start: usize,

    /// RC4 key (hex) used to decrypt the whole input first
    #[arg(long = "rc4-key")]
    rc4_key: Option<String>,

    /// Reject malformed name escapes instead of keeping them literally
    #[arg(long = "strict-escapes", action = ArgAction::SetTrue)]
    strict_escapes: bool,

    /// Maximum array/dictionary nesting depth
    #[arg(long = "max-depth", default_value_t = 256)]
    max_depth: usize,

    /// Path to file where output is written, or "-" for stdout
    #[arg(short, long, default_value = "-")]
    outfile: String,
}

/// Escape special characters for XML output.
fn escape(s: &[u8]) -> String {
    let mut result = String::new();
    for &byte in s {
        match byte {
            b'&' => result.push_str("&amp;"),
            b'<' => result.push_str("&lt;"),
            b'>' => result.push_str("&gt;"),
            b'"' => result.push_str("&quot;"),
            b'\'' => result.push_str("&#39;"),
            0..=31 | 127..=255 => result.push_str(&format!("&#{byte};")),
            _ => result.push(byte as char),
        }
    }
    result
}

fn dumpxml<W: Write>(out: &mut W, obj: &PDFObject) -> io::Result<()> {
    match obj {
        PDFObject::Null => write!(out, "<null />"),
        PDFObject::Bool(b) => write!(out, "<boolean>{b}</boolean>"),
        PDFObject::Int(n) => write!(out, "<number>{n}</number>"),
        PDFObject::Real(n) => write!(out, "<number>{n}</number>"),
        PDFObject::Bytes(s) => {
            write!(out, r#"<string size="{}">{}</string>"#, s.len(), escape(s))
        }
        PDFObject::Name(name) => {
            write!(out, "<literal>{}</literal>", escape(name.as_bytes()))
        }
        PDFObject::Array(arr) => {
            writeln!(out, r#"<list size="{}">"#, arr.len())?;
            for item in arr {
                dumpxml(out, item)?;
                writeln!(out)?;
            }
            write!(out, "</list>")
        }
        PDFObject::Dict(dict) => {
            writeln!(out, r#"<dict size="{}">"#, dict.len())?;
            for (k, v) in dict {
                writeln!(out, "<key>{}</key>", escape(k.as_bytes()))?;
                write!(out, "<value>")?;
                dumpxml(out, v)?;
                writeln!(out, "</value>")?;
            }
            write!(out, "</dict>")
        }
    }
}

/// JSON rendition of an object. Strings and names that are not UTF-8
/// come out as hex; dictionary keys are converted lossily.
fn to_json(obj: &PDFObject) -> Value {
    match obj {
        PDFObject::Null => Value::Null,
        PDFObject::Bool(b) => json!(b),
        PDFObject::Int(n) => json!(n),
        PDFObject::Real(r) => json!(r),
        PDFObject::Bytes(b) => match std::str::from_utf8(b) {
            Ok(s) => json!({ "string": s }),
            Err(_) => json!({ "hex": hex::encode(b) }),
        },
        PDFObject::Name(name) => match name.as_str() {
            Some(s) => json!({ "name": s }),
            None => json!({ "name_hex": hex::encode(name.as_bytes()) }),
        },
        PDFObject::Array(arr) => Value::Array(arr.iter().map(to_json).collect()),
        PDFObject::Dict(dict) => Value::Object(
            dict.iter()
                .map(|(k, v)| (k.to_string_lossy().into_owned(), to_json(v)))
                .collect(),
        ),
    }
}

/// Short machine-friendly category name.
fn token_label(token: &Token) -> &'static str {
    match token {
        Token::Eof => "eof",
        Token::DictOpen => "dict_open",
        Token::DictClose => "dict_close",
        Token::ArrayOpen => "array_open",
        Token::ArrayClose => "array_close",
        Token::BraceOpen => "brace_open",
        Token::BraceClose => "brace_close",
        Token::Keyword(_) => "keyword",
        Token::Object(obj) => obj.type_name(),
    }
}

/// Source text of a token; objects are shown in canonical form.
fn token_text(token: &Token) -> Cow<'_, str> {
    match token {
        Token::Eof => Cow::Borrowed(""),
        Token::DictOpen => Cow::Borrowed("<<"),
        Token::DictClose => Cow::Borrowed(">>"),
        Token::ArrayOpen => Cow::Borrowed("["),
        Token::ArrayClose => Cow::Borrowed("]"),
        Token::BraceOpen => Cow::Borrowed("{"),
        Token::BraceClose => Cow::Borrowed("}"),
        Token::Keyword(kw) => String::from_utf8_lossy(kw.as_bytes()),
        Token::Object(obj) => {
            let mut buf = Vec::new();
            encode_object(&mut buf, obj);
            Cow::Owned(String::from_utf8_lossy(&buf).into_owned())
        }
    }
}

/// Writes one `(offset, token)` item in the selected format.
struct Dumper<W: Write> {
    out: W,
    format: Format,
    json: Vec<Value>,
}

impl<W: Write> Dumper<W> {
    fn new(out: W, format: Format) -> Self {
        Self {
            out,
            format,
            json: Vec::new(),
        }
    }

    fn begin(&mut self) -> io::Result<()> {
        if self.format == Format::Xml {
            writeln!(self.out, "<pdf>")?;
        }
        Ok(())
    }

    fn item(&mut self, pos: usize, token: &Token) -> io::Result<()> {
        match (self.format, token) {
            (Format::Text, _) => {
                writeln!(self.out, "{pos}: {} {}", token_label(token), token_text(token))
            }
            (Format::Xml, Token::Object(obj)) => {
                write!(self.out, r#"<object pos="{pos}">"#)?;
                dumpxml(&mut self.out, obj)?;
                writeln!(self.out, "</object>")
            }
            (Format::Xml, _) => writeln!(
                self.out,
                r#"<token pos="{pos}" kind="{}">{}</token>"#,
                token_label(token),
                escape(token_text(token).as_bytes())
            ),
            (Format::Json, Token::Object(obj)) => {
                self.json.push(json!({ "pos": pos, "object": to_json(obj) }));
                Ok(())
            }
            (Format::Json, _) => {
                self.json.push(json!({
                    "pos": pos,
                    "kind": token_label(token),
                    "text": token_text(token),
                }));
                Ok(())
            }
        }
    }

    fn finish(mut self) -> Result<W> {
        match self.format {
            Format::Text => {}
            Format::Xml => writeln!(self.out, "</pdf>")?,
            Format::Json => {
                serde_json::to_writer_pretty(&mut self.out, &self.json)?;
                writeln!(self.out)?;
            }
        }
        Ok(self.out)
    }
}

fn dump_tokens<S: ByteSource, W: Write>(
    tokenizer: &mut Tokenizer<S>,
    dumper: &mut Dumper<W>,
) -> Result<()> {
    for item in tokenizer.tokens() {
        let (pos, token) = item?;
        dumper.item(pos, &token)?;
    }
    Ok(())
}

fn dump_objects<S: ByteSource, W: Write>(
    tokenizer: &mut Tokenizer<S>,
    dumper: &mut Dumper<W>,
) -> Result<()> {
    loop {
        let token = tokenizer.next_object(false, true)?;
        if token.is_eof() {
            return Ok(());
        }
        dumper.item(tokenizer.token_pos(), &token)?;
    }
}

fn dump_canonical<S: ByteSource, W: Write>(tokenizer: &mut Tokenizer<S>, out: &mut W) -> Result<()> {
    let mut buf = Vec::new();
    loop {
        let token = tokenizer.next_object(false, true)?;
        match token {
            Token::Eof => return Ok(()),
            Token::Object(obj) => {
                buf.clear();
                encode_object(&mut buf, &obj);
                out.write_all(&buf)?;
                writeln!(out)?;
            }
            other => writeln!(out, "{}", token_text(&other))?,
        }
    }
}

/// Input bytes: a mapped file, or a buffer for stdin and decrypted data.
enum Input {
    Mapped(Mmap),
    Owned(Vec<u8>),
}

impl Deref for Input {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            Input::Mapped(mmap) => mmap,
            Input::Owned(data) => data,
        }
    }
}

fn read_input(path: &Path) -> Result<Input> {
    if path.as_os_str() == "-" {
        let mut data = Vec::new();
        io::stdin()
            .read_to_end(&mut data)
            .context("failed to read stdin")?;
        return Ok(Input::Owned(data));
    }
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    // SAFETY: the file is opened read-only and not modified while mapped.
    let mmap = unsafe { Mmap::map(&file) }
        .with_context(|| format!("failed to map {}", path.display()))?;
    Ok(Input::Mapped(mmap))
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.max_depth == 0 {
        bail!("--max-depth must be at least 1");
    }

    let mut data = read_input(&args.file)?;
    log::debug!("read {} bytes from {}", data.len(), args.file.display());

    if let Some(key) = &args.rc4_key {
        let key = hex::decode(key).context("--rc4-key is not valid hex")?;
        if key.is_empty() || key.len() > 256 {
            bail!("--rc4-key must be 1 to 256 bytes, got {}", key.len());
        }
        data = Input::Owned(arcfour::decrypt(&key, &data));
    }

    if args.start > data.len() {
        bail!(
            "start offset {} is past end of input ({} bytes)",
            args.start,
            data.len()
        );
    }

    let name_escapes = if args.strict_escapes {
        NameEscapePolicy::Strict
    } else {
        NameEscapePolicy::Lenient
    };
    let params = TokenizerParams::new(args.max_depth, name_escapes);
    let mut tokenizer = Tokenizer::from_slice(&data).with_params(params);
    tokenizer.set_pos(args.start)?;

    let output: Box<dyn Write> = if args.outfile == "-" {
        Box::new(BufWriter::new(io::stdout()))
    } else {
        let file = File::create(&args.outfile)
            .with_context(|| format!("failed to create {}", args.outfile))?;
        Box::new(BufWriter::new(file))
    };

    let mut output = match args.mode {
        Mode::Canonical => {
            let mut output = output;
            dump_canonical(&mut tokenizer, &mut output)
                .with_context(|| format!("while parsing {}", args.file.display()))?;
            output
        }
        Mode::Tokens | Mode::Objects => {
            let mut dumper = Dumper::new(output, args.format);
            dumper.begin()?;
            let result = if args.mode == Mode::Tokens {
                dump_tokens(&mut tokenizer, &mut dumper)
            } else {
                dump_objects(&mut tokenizer, &mut dumper)
            };
            result.with_context(|| format!("while parsing {}", args.file.display()))?;
            dumper.finish()?
        }
    };

    output.flush()?;
    Ok(())
}

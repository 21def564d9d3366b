//! Tests for the byte-level tokenizer.

use pdfsyntax_core::parser::{
    Keyword, NameEscapePolicy, ReaderSource, SliceSource, Token, Tokenizer, TokenizerParams,
};
use pdfsyntax_core::{Name, PDFObject};
use std::io::Cursor;

/// Mixed token sample: comments, keywords, names, numbers, strings.
const TESTDATA: &[u8] = br#"%!PDF comment
begin end
 "  @ #
/a/BCD /Some_Name /foo#5f#xbaa
0 +1 -2 .5 1.234
(abc) () (abc ( def ) ghi)
(def\040\0\0404ghi) (bach\\slask) (foo\nbaa)
(this % is not a comment.)
(foo
baa)
(foo\
baa)
<> <20> < 40 4020 >
<abcd00
12345>
func/a/b{(c)do*}def
[ 1 (z) ! ]
<< /foo (bar) >>
"#;

fn kw(s: &str) -> Token {
    Token::Keyword(Keyword::from_bytes(s.as_bytes()))
}

fn name(s: &str) -> Token {
    Token::Object(PDFObject::Name(Name::new(s)))
}

fn bytes(b: &[u8]) -> Token {
    Token::Object(PDFObject::Bytes(b.to_vec()))
}

fn int(n: i64) -> Token {
    Token::Object(PDFObject::Int(n))
}

fn real(n: f64) -> Token {
    Token::Object(PDFObject::Real(n))
}

/// Expected (position, token) pairs for TESTDATA.
fn expected_tokens() -> Vec<(usize, Token)> {
    vec![
        (14, kw("begin")),
        (20, kw("end")),
        (25, kw("\"")),
        (28, kw("@")),
        (30, kw("#")),
        (32, name("a")),
        (34, name("BCD")),
        (39, name("Some_Name")),
        (50, name("foo_#xbaa")), // #5f = '_', #xb is invalid so '#' stays
        (63, int(0)),
        (65, int(1)),
        (68, int(-2)),
        (71, real(0.5)),
        (74, real(1.234)),
        (80, bytes(b"abc")),
        (86, bytes(b"")),
        (89, bytes(b"abc ( def ) ghi")),
        (107, bytes(b"def \x00 4ghi")), // \040=space, \0=NUL, \040=space, 4=4
        (127, bytes(b"bach\\slask")),
        (141, bytes(b"foo\nbaa")),
        (152, bytes(b"this % is not a comment.")),
        (179, bytes(b"foo\nbaa")), // literal newline in string
        (189, bytes(b"foobaa")),   // \<newline> = line continuation
        (200, bytes(b"")),
        (203, bytes(b" ")),
        (208, bytes(b"@@ ")),
        (220, bytes(b"\xab\xcd\x00\x12\x34\x50")), // odd digit count pads with 0
        (235, kw("func")),
        (239, name("a")),
        (241, name("b")),
        (243, Token::BraceOpen),
        (244, bytes(b"c")),
        (247, kw("do*")),
        (250, Token::BraceClose),
        (251, kw("def")),
        (255, Token::ArrayOpen),
        (257, int(1)),
        (259, bytes(b"z")),
        (263, kw("!")),
        (265, Token::ArrayClose),
        (267, Token::DictOpen),
        (270, name("foo")),
        (275, bytes(b"bar")),
        (281, Token::DictClose),
    ]
}

fn collect_tokens(data: &[u8]) -> Vec<(usize, Token)> {
    let mut tokenizer = Tokenizer::from_slice(data);
    tokenizer.tokens().collect::<Result<_, _>>().unwrap()
}

fn single(data: &[u8]) -> Token {
    Tokenizer::from_slice(data).next_token().unwrap()
}

#[test]
fn test_tokens_and_positions() {
    let tokens = collect_tokens(TESTDATA);
    let expected = expected_tokens();
    for (i, (got, want)) in tokens.iter().zip(expected.iter()).enumerate() {
        assert_eq!(got, want, "token {i} mismatch");
    }
    assert_eq!(tokens.len(), expected.len());
}

#[test]
fn test_reader_source_matches_slice_source() {
    let mut tokenizer = Tokenizer::new(ReaderSource::new(Cursor::new(TESTDATA.to_vec())).unwrap());
    let tokens: Vec<_> = tokenizer.tokens().collect::<Result<_, _>>().unwrap();
    assert_eq!(tokens, expected_tokens());
}

#[test]
fn test_hex_string_decodes() {
    assert_eq!(single(b"<4E6F76>"), bytes(b"Nov"));
    assert_eq!(single(b"<4e 6f\n76>"), bytes(b"Nov"));
    assert_eq!(single(b"<7>"), bytes(b"\x70"));
}

#[test]
fn test_literal_string_escaped_parens() {
    assert_eq!(single(br"(a\(b\)c)"), bytes(b"a(b)c"));
}

#[test]
fn test_literal_string_escapes() {
    assert_eq!(single(br"(\053)"), bytes(b"\x2b"));
    assert_eq!(single(br"(\n\r\t\b\f\\)"), bytes(b"\n\r\t\x08\x0c\\"));
    assert_eq!(single(br"(\q)"), bytes(b"q"));
    // Octal wraps modulo 256
    assert_eq!(single(br"(\777)"), bytes(b"\xff"));
    assert_eq!(single(br"(\0053)"), bytes(b"\x053"));
}

#[test]
fn test_literal_string_line_endings_normalized() {
    assert_eq!(single(b"(a\rb\r\nc\nd)"), bytes(b"a\nb\nc\nd"));
    assert_eq!(single(b"(a\\\r\nb\\\rc)"), bytes(b"abc"));
}

#[test]
fn test_eof_repeats() {
    let mut tokenizer = Tokenizer::from_slice(b"  % trailing comment");
    for _ in 0..3 {
        assert_eq!(tokenizer.next_token().unwrap(), Token::Eof);
    }
}

#[test]
fn test_peek_token_keeps_position() {
    let mut tokenizer = Tokenizer::from_slice(TESTDATA);
    loop {
        let before = tokenizer.pos();
        let peeked = tokenizer.peek_token().unwrap();
        assert_eq!(tokenizer.pos(), before);
        let next = tokenizer.next_token().unwrap();
        assert_eq!(peeked, next);
        if next.is_eof() {
            break;
        }
    }
}

#[test]
fn test_seek_and_reparse() {
    let mut tokenizer = Tokenizer::from_slice(b"/First /Second");
    assert_eq!(tokenizer.next_token().unwrap(), name("First"));
    assert_eq!(tokenizer.next_token().unwrap(), name("Second"));
    tokenizer.set_pos(0).unwrap();
    assert_eq!(tokenizer.next_token().unwrap(), name("First"));
    tokenizer.set_pos(7).unwrap();
    assert_eq!(tokenizer.next_token().unwrap(), name("Second"));
}

#[test]
fn test_primitive_cursor_operations() {
    let mut tokenizer = Tokenizer::from_slice(b" \t\r\nx");
    tokenizer.skip_whitespace().unwrap();
    assert_eq!(tokenizer.pos(), 4);
    assert_eq!(tokenizer.next_byte().unwrap(), Some(b'x'));
    assert_eq!(tokenizer.next_byte().unwrap(), None);
}

#[test]
fn test_true_false_null_resolve_to_objects() {
    let tokens = collect_tokens(b"true false null truex");
    let values: Vec<Token> = tokens.into_iter().map(|(_, t)| t).collect();
    assert_eq!(
        values,
        vec![
            Token::Object(PDFObject::Bool(true)),
            Token::Object(PDFObject::Bool(false)),
            Token::Object(PDFObject::Null),
            kw("truex"),
        ]
    );
}

#[test]
fn test_known_keywords() {
    let tokens = collect_tokens(b"1 0 obj endobj 3 0 R stream endstream xref trailer startxref");
    let keywords: Vec<Keyword> = tokens
        .into_iter()
        .filter_map(|(_, t)| match t {
            Token::Keyword(k) => Some(k),
            _ => None,
        })
        .collect();
    assert_eq!(
        keywords,
        vec![
            Keyword::Obj,
            Keyword::EndObj,
            Keyword::R,
            Keyword::Stream,
            Keyword::EndStream,
            Keyword::Xref,
            Keyword::Trailer,
            Keyword::StartXref,
        ]
    );
}

#[test]
fn test_numbers_stop_at_non_digits() {
    let tokens: Vec<Token> = collect_tokens(b"12abc 3.5.5 -0.25 1e5")
        .into_iter()
        .map(|(_, t)| t)
        .collect();
    assert_eq!(
        tokens,
        vec![
            int(12),
            kw("abc"),
            real(3.5),
            real(0.5),
            real(-0.25),
            int(1),
            kw("e5"),
        ]
    );
}

#[test]
fn test_long_fraction_is_truncated() {
    let token = single(b"0.12345678901234567890123");
    match token {
        Token::Object(PDFObject::Real(r)) => assert!((r - 0.123456789012345678).abs() < 1e-15),
        other => panic!("expected real, got {other:?}"),
    }
}

#[test]
fn test_name_hex_escapes() {
    assert_eq!(single(b"/A#20B"), name("A B"));
    assert_eq!(single(b"/#2F#2f"), name("//"));
    assert_eq!(single(b"/caf#c3#a9"), name("café"));
    assert_eq!(
        single(b"/x#e9"),
        Token::Object(PDFObject::Name(Name::new(b"x\xe9")))
    );
    assert_eq!(single(b"/"), name(""));
}

#[test]
fn test_name_invalid_escape_lenient() {
    assert_eq!(single(b"/a#"), name("a#"));
    assert_eq!(single(b"/a#4"), name("a#4"));
    assert_eq!(single(b"/a#4/b"), name("a#4"));
}

#[test]
fn test_name_invalid_escape_strict() {
    let params = TokenizerParams::default().with_name_escapes(NameEscapePolicy::Strict);
    let mut tokenizer = Tokenizer::from_slice(b"/ok#41 /a#zz").with_params(params);
    assert_eq!(tokenizer.next_token().unwrap(), name("okA"));
    let err = tokenizer.next_token().unwrap_err();
    assert!(err.is_malformed());
    assert_eq!(err.offset(), Some(9));
}

#[test]
fn test_names_are_interned() {
    let mut tokenizer = Tokenizer::from_slice(b"/Type /Type /Font");
    let a = tokenizer.next_token().unwrap().into_object().unwrap();
    let b = tokenizer.next_token().unwrap().into_object().unwrap();
    let (PDFObject::Name(a), PDFObject::Name(b)) = (a, b) else {
        panic!("expected names");
    };
    assert!(a.ptr_eq(&b));
    tokenizer.next_token().unwrap();
    assert_eq!(tokenizer.pool().len(), 2);
}

#[test]
fn test_unterminated_literal_string() {
    let err = Tokenizer::from_slice(b"  (abc (def)").next_token().unwrap_err();
    assert!(err.is_malformed());
    assert_eq!(err.offset(), Some(2));

    let err = Tokenizer::from_slice(b"(abc\\").next_token().unwrap_err();
    assert!(err.is_malformed());
}

#[test]
fn test_unterminated_hex_string() {
    let err = Tokenizer::from_slice(b"<4E6F").next_token().unwrap_err();
    assert!(err.is_malformed());
    assert_eq!(err.offset(), Some(0));
}

#[test]
fn test_invalid_hex_digit() {
    let err = Tokenizer::from_slice(b"<4G>").next_token().unwrap_err();
    assert!(err.is_malformed());
    assert_eq!(err.offset(), Some(2));
}

#[test]
fn test_lone_close_angle_is_malformed() {
    let err = Tokenizer::from_slice(b"1 > 2").tokens().nth(1).unwrap().unwrap_err();
    assert!(err.is_malformed());
    assert_eq!(err.offset(), Some(2));
}

#[test]
fn test_slice_source_shared_storage() {
    let source = SliceSource::from_bytes(b"[/A]");
    let mut tokenizer = Tokenizer::new(source);
    assert_eq!(tokenizer.next_token().unwrap(), Token::ArrayOpen);
    assert_eq!(tokenizer.next_token().unwrap(), name("A"));
    assert_eq!(tokenizer.next_token().unwrap(), Token::ArrayClose);
    assert!(tokenizer.into_source().remaining().is_empty());
}

use super::*;

fn kinds(src: &str) -> Vec<TokenKind> {
    lex(src).unwrap().into_iter().map(|t| t.kind).collect()
}

#[test]
fn lexes_literals_and_properties() {
    assert_eq!(
        kinds("$price 1.5e2 'car' #fff red"),
        vec![
            TokenKind::Prop("price".to_owned()),
            TokenKind::Number(150.0),
            TokenKind::Str("car".to_owned()),
            TokenKind::Hex("#fff".to_owned()),
            TokenKind::Ident("red".to_owned()),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn keywords_and_symbols_share_tokens() {
    assert_eq!(kinds("a and b"), kinds("a && b"));
    assert_eq!(kinds("a or b"), kinds("a || b"));
    assert_eq!(
        kinds("<= >= == != ^ %"),
        vec![
            TokenKind::Le,
            TokenKind::Ge,
            TokenKind::EqEq,
            TokenKind::Ne,
            TokenKind::Caret,
            TokenKind::Percent,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn strings_unescape_and_keep_unicode() {
    assert_eq!(
        kinds(r#""caf\"é" 'it\'s'"#),
        vec![
            TokenKind::Str("caf\"é".to_owned()),
            TokenKind::Str("it's".to_owned()),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn spans_cover_tokens() {
    let tokens = lex("  $a + 10").unwrap();
    assert_eq!(tokens[0].span, Span { start: 2, end: 4 });
    assert_eq!(tokens[2].span, Span { start: 7, end: 9 });
    assert_eq!(tokens[3].span, Span { start: 9, end: 9 });
}

#[test]
fn errors_carry_byte_offsets() {
    let offset = |src: &str| match lex(src) {
        Err(VizError::Parse { offset, .. }) => offset,
        other => panic!("expected parse error, got {other:?}"),
    };
    assert_eq!(offset("1 + 'open"), 4);
    assert_eq!(offset("$ + 1"), 0);
    assert_eq!(offset("2e+"), 1);
    assert_eq!(offset("1 @ 2"), 2);
}

#[test]
fn line_comments_are_skipped_outside_strings() {
    assert_eq!(
        kinds("$price != 30  // same as neq($price, 30)"),
        kinds("$price != 30")
    );
    assert_eq!(
        kinds("1 // one\n+ 2"),
        vec![
            TokenKind::Number(1.0),
            TokenKind::Plus,
            TokenKind::Number(2.0),
            TokenKind::Eof,
        ]
    );
    assert_eq!(
        kinds("'http://example.com/a.png' // icon"),
        vec![
            TokenKind::Str("http://example.com/a.png".to_owned()),
            TokenKind::Eof,
        ]
    );
    assert_eq!(
        kinds("6 / 2"),
        vec![
            TokenKind::Number(6.0),
            TokenKind::Slash,
            TokenKind::Number(2.0),
            TokenKind::Eof,
        ]
    );
}

use super::*;

fn kinds(src: &str) -> Vec<TokenKind> {
    lex(src).unwrap().into_iter().map(|t| t.kind).collect()
}

#[test]
fn numbers_accept_c_float_forms() {
    assert_eq!(
        kinds("1.f 0.5f .25 1.e-6f 2e3 7"),
        vec![
            TokenKind::Number(1.0),
            TokenKind::Number(0.5),
            TokenKind::Number(0.25),
            TokenKind::Number(1e-6),
            TokenKind::Number(2000.0),
            TokenKind::Number(7.0),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn bad_exponent_reports_offset() {
    let err = lex("x = 1e+;").unwrap_err();
    assert_eq!(err.offset, 5);
}

#[test]
fn comments_are_skipped() {
    assert_eq!(
        kinds("a // line\n/* block\n */ b"),
        vec![
            TokenKind::Ident("a".into()),
            TokenKind::Ident("b".into()),
            TokenKind::Eof,
        ]
    );
    assert!(lex("/* open").is_err());
}

#[test]
fn compound_operators_win_over_single_chars() {
    assert_eq!(
        kinds("+= -= *= /= == != <= >= && || < > = !"),
        vec![
            TokenKind::PlusEq,
            TokenKind::MinusEq,
            TokenKind::StarEq,
            TokenKind::SlashEq,
            TokenKind::EqEq,
            TokenKind::Ne,
            TokenKind::Le,
            TokenKind::Ge,
            TokenKind::AndAnd,
            TokenKind::OrOr,
            TokenKind::Lt,
            TokenKind::Gt,
            TokenKind::Assign,
            TokenKind::Bang,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn identifiers_and_bool_literals() {
    assert_eq!(
        kinds("__x true false sqrtf_safe"),
        vec![
            TokenKind::Ident("__x".into()),
            TokenKind::True,
            TokenKind::False,
            TokenKind::Ident("sqrtf_safe".into()),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn spans_cover_tokens() {
    let toks = lex("ab + 1.5f").unwrap();
    assert_eq!(toks[0].span, Span { start: 0, end: 2 });
    assert_eq!(toks[1].span, Span { start: 3, end: 4 });
    assert_eq!(toks[2].span, Span { start: 5, end: 9 });
    assert_eq!(toks[3].span, Span { start: 9, end: 9 });
}

#[test]
fn unexpected_character_is_an_error() {
    let err = lex("a # b").unwrap_err();
    assert_eq!(err.offset, 2);
    assert!(err.message.contains('#'));
}

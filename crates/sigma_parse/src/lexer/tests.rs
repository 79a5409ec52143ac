use super::*;
use pretty_assertions::assert_eq;

fn kinds(source: &str) -> Vec<Token> {
    tokenize(source)
        .unwrap_or_default()
        .into_iter()
        .map(|s| s.token)
        .collect()
}

#[test]
fn integers_are_arbitrary_precision() {
    let tokens = kinds("123456789012345678901234567890");
    let expected: BigInt = "123456789012345678901234567890".parse().unwrap_or_default();
    assert_eq!(tokens, vec![Token::Int(expected)]);
}

#[test]
fn float_forms() {
    assert_eq!(kinds("1.5"), vec![Token::Float(1.5)]);
    assert_eq!(kinds("2."), vec![Token::Float(2.0)]);
    assert_eq!(kinds(".25"), vec![Token::Float(0.25)]);
    assert_eq!(kinds("1e-3"), vec![Token::Float(0.001)]);
    assert_eq!(kinds("6.02E23"), vec![Token::Float(6.02e23)]);
}

#[test]
fn exponent_marker_needs_digits() {
    assert_eq!(
        kinds("2e"),
        vec![Token::Int(BigInt::from(2)), Token::Ident("e".to_owned())]
    );
}

#[test]
fn operators_prefer_longest_match() {
    assert_eq!(
        kinds("a:=b**2!"),
        vec![
            Token::Ident("a".to_owned()),
            Token::ColonEq,
            Token::Ident("b".to_owned()),
            Token::StarStar,
            Token::Int(BigInt::from(2)),
            Token::Bang,
        ]
    );
}

#[test]
fn strings_unescape() {
    assert_eq!(kinds(r#""a\"b\n""#), vec![Token::Str("a\"b\n".to_owned())]);
}

#[test]
fn spans_cover_source() {
    let tokens = tokenize("x + 10").unwrap_or_default();
    let spans: Vec<_> = tokens.iter().map(|t| t.span.clone()).collect();
    assert_eq!(spans, vec![0..1, 2..3, 4..6]);
}

#[test]
fn unknown_character_reports_position() {
    let err = tokenize("1 +\n  $").err();
    assert_eq!(
        err,
        Some(ParseDiagnostic {
            line: 2,
            column: 3,
            message: "unexpected character `$`".to_owned(),
        })
    );
}

use crate::{parse, MAX_NESTING};
use pretty_assertions::assert_eq;
use sigma_gen::{Gen, Op};

fn int(i: i64) -> Gen {
    Gen::int(i)
}

fn id(name: &str) -> Gen {
    Gen::ident(name)
}

fn node(op: Op, args: Vec<Gen>) -> Gen {
    Gen::symbolic(op, args)
}

#[test]
fn literals() {
    assert_eq!(parse("42"), Ok(int(42)));
    assert_eq!(parse("-42"), Ok(int(-42)));
    assert_eq!(parse("2.5"), Ok(Gen::double(2.5)));
    assert_eq!(parse("\"hi\""), Ok(Gen::string("hi")));
    assert_eq!(
        parse("99999999999999999999").map(|g| g.gen_type()),
        Ok(sigma_gen::GenType::Big)
    );
}

#[test]
fn precedence_and_associativity() {
    assert_eq!(
        parse("1+2*3"),
        Ok(node(Op::Add, vec![int(1), node(Op::Mul, vec![int(2), int(3)])]))
    );
    assert_eq!(
        parse("2^3^2"),
        Ok(node(Op::Pow, vec![int(2), node(Op::Pow, vec![int(3), int(2)])]))
    );
    assert_eq!(
        parse("-x^2"),
        Ok(node(Op::Neg, vec![node(Op::Pow, vec![id("x"), int(2)])]))
    );
    assert_eq!(parse("2**-1"), Ok(node(Op::Pow, vec![int(2), int(-1)])));
}

#[test]
fn subtraction_and_division_desugar() {
    assert_eq!(
        parse("a-b/c"),
        Ok(node(
            Op::Add,
            vec![
                id("a"),
                node(
                    Op::Neg,
                    vec![node(
                        Op::Mul,
                        vec![id("b"), node(Op::Inv, vec![id("c")])]
                    )]
                ),
            ]
        ))
    );
}

#[test]
fn calls_vectors_and_factorial() {
    assert_eq!(
        parse("gcd(12, 18)"),
        Ok(Gen::call("gcd", vec![int(12), int(18)]))
    );
    assert_eq!(parse("rand()"), Ok(Gen::call("rand", vec![])));
    assert_eq!(
        parse("[[1,2],[3,4]]"),
        Ok(Gen::vector(vec![
            Gen::vector(vec![int(1), int(2)]),
            Gen::vector(vec![int(3), int(4)]),
        ]))
    );
    assert_eq!(parse("[]"), Ok(Gen::vector(vec![])));
    assert_eq!(parse("5!"), Ok(node(Op::Factorial, vec![int(5)])));
}

#[test]
fn assignment_and_sequence() {
    assert_eq!(
        parse("a:=2; a*3;"),
        Ok(node(
            Op::Seq,
            vec![
                node(Op::Assign, vec![id("a"), int(2)]),
                node(Op::Mul, vec![id("a"), int(3)]),
            ]
        ))
    );
}

#[test]
fn special_float_names() {
    assert_eq!(parse("inf"), Ok(Gen::double(f64::INFINITY)));
    assert!(matches!(parse("undef"), Ok(Gen::Double(d)) if d.is_nan()));
}

#[test]
fn errors_carry_position() {
    let err = parse("(").err();
    assert_eq!(err.as_ref().map(|e| (e.line, e.column)), Some((1, 2)));
    assert_eq!(
        err.map(|e| e.to_string()),
        Some("syntax error at line 1, column 2: unexpected end of input".to_owned())
    );

    let err = parse("1 + 2)").err();
    assert_eq!(
        err.map(|e| e.message),
        Some("unexpected `)`".to_owned())
    );

    let err = parse("f(1 2)").err();
    assert_eq!(
        err.map(|e| e.message),
        Some("expected `,`, found integer `2`".to_owned())
    );

    assert!(parse("").is_err());
    assert!(parse("3 := 4").is_err());
}

#[test]
fn deep_nesting_does_not_overflow() {
    let depth = 900;
    let source = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
    assert_eq!(parse(&source), Ok(int(1)));
}

// Nesting limit

fn power_tower(levels: usize) -> String {
    let mut text = "x^".repeat(levels);
    text.push('x');
    text
}

#[test]
fn deep_nesting_within_limit_parses() {
    let parsed = parse(&power_tower(MAX_NESTING / 2));
    assert!(parsed.is_ok(), "{parsed:?}");
    let parsed = parse(&format!("{}x{}", "(".repeat(500), ")".repeat(500)));
    assert_eq!(parsed, Ok(id("x")));
}

#[test]
fn hundred_thousand_levels_are_rejected() {
    for text in [
        power_tower(100_000),
        format!("{}x{}", "(".repeat(100_000), ")".repeat(100_000)),
        format!("{}x{}", "[".repeat(100_000), "]".repeat(100_000)),
        format!("{}x", "-".repeat(100_000)),
        format!("x{}", "!".repeat(100_000)),
    ] {
        let err = parse(&text).err().map(|d| d.message);
        assert_eq!(
            err,
            Some(format!("expression nested more than {MAX_NESTING} levels deep"))
        );
    }
}

use super::*;
use crate::ops;
use pretty_assertions::assert_eq;

fn x() -> Gen {
    Gen::ident("x")
}

fn y() -> Gen {
    Gen::ident("y")
}

#[test]
fn numbers() {
    assert_eq!(Gen::int(-42).to_string(), "-42");
    assert_eq!(
        Gen::fraction(num_bigint::BigInt::from(363), num_bigint::BigInt::from(28))
            .map(|g| g.to_string()),
        Ok("363/28".to_owned())
    );
    assert_eq!(Gen::double(2.5).to_string(), "2.5");
    assert_eq!(Gen::double(1.0).to_string(), "1.0");
    assert_eq!(Gen::double(f64::NAN).to_string(), "undef");
    assert_eq!(Gen::double(f64::NEG_INFINITY).to_string(), "-inf");
}

#[test]
fn format_double_round_trips() {
    for value in [0.1, 1e-7, 12.964_285_714_3, 6.02e23, -3.25] {
        let text = format_double(value);
        assert_eq!(text.parse::<f64>().ok(), Some(value), "{text}");
    }
}

#[test]
fn sums_print_negative_terms_with_minus() {
    let expr = ops::sub(&x(), &Gen::int(5)).unwrap_or_default();
    assert_eq!(expr.to_string(), "x-5");

    let expr = ops::sub(&x(), &ops::mul(&Gen::int(2), &y()).unwrap_or_default())
        .unwrap_or_default();
    assert_eq!(expr.to_string(), "x-2*y");

    let expr = ops::sub(&x(), &y()).unwrap_or_default();
    assert_eq!(expr.to_string(), "x-y");
}

#[test]
fn products_and_quotients() {
    let expr = ops::div(&x(), &y()).unwrap_or_default();
    assert_eq!(expr.to_string(), "x/y");

    let expr = ops::reciprocal(&x()).unwrap_or_default();
    assert_eq!(expr.to_string(), "1/x");

    let expr = ops::neg(&x()).unwrap_or_default();
    assert_eq!(expr.to_string(), "-x");

    let sum = ops::add(&x(), &Gen::int(1)).unwrap_or_default();
    let expr = ops::mul(&sum, &y()).unwrap_or_default();
    assert_eq!(expr.to_string(), "(x+1)*y");
}

#[test]
fn powers_parenthesize_compound_operands() {
    let sum = ops::add(&x(), &Gen::int(1)).unwrap_or_default();
    assert_eq!(ops::pow(&sum, &Gen::int(2)).map(|g| g.to_string()), Ok("(x+1)^2".to_owned()));
    assert_eq!(
        ops::pow(&x(), &Gen::int(-1)).map(|g| g.to_string()),
        Ok("x^(-1)".to_owned())
    );
    let half = Gen::fraction(1.into(), 2.into()).unwrap_or_default();
    assert_eq!(
        ops::pow(&Gen::int(2), &half).map(|g| g.to_string()),
        Ok("2^(1/2)".to_owned())
    );
}

#[test]
fn calls_vectors_and_strings() {
    let call = Gen::call("factor", vec![x(), Gen::int(2)]);
    assert_eq!(call.to_string(), "factor(x,2)");

    let matrix = Gen::vector(vec![
        Gen::vector(vec![Gen::int(1), Gen::int(2)]),
        Gen::vector(vec![Gen::int(3), Gen::int(4)]),
    ]);
    assert_eq!(matrix.to_string(), "[[1,2],[3,4]]");

    assert_eq!(Gen::string("a\"b").to_string(), "\"a\\\"b\"");
}

#[test]
fn factorial_and_assignment() {
    let fact = Gen::symbolic(Op::Factorial, vec![x()]);
    assert_eq!(fact.to_string(), "x!");
    let assign = Gen::symbolic(Op::Assign, vec![x(), Gen::int(3)]);
    assert_eq!(assign.to_string(), "x:=3");
}

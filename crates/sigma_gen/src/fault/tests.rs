use super::*;

#[test]
fn division_by_zero_has_correct_kind() {
    let err = division_by_zero();
    assert_eq!(err.kind(), FaultKind::Domain);
    assert_eq!(err.to_string(), "division by zero");
}

#[test]
fn wrong_arg_count_pluralizes() {
    assert_eq!(
        wrong_arg_count("euler", 1, 2).message,
        "euler expects 1 argument, got 2"
    );
    assert_eq!(
        wrong_arg_count("gcd", 2, 3).message,
        "gcd expects 2 arguments, got 3"
    );
}

#[test]
fn invalid_operands_names_both_types() {
    let err = invalid_operands("+", &Gen::string("a"), &Gen::int(1));
    assert_eq!(err.kind(), FaultKind::Evaluation);
    assert_eq!(
        err.message,
        "operator `+` cannot be applied to string and integer"
    );
}

#[test]
fn not_an_integer_is_a_conversion_fault() {
    let err = not_an_integer("to_int", &Gen::ident("x"));
    assert_eq!(err.kind(), FaultKind::Conversion);
    assert_eq!(err.message, "to_int: expected an integer, got x");
}

#[test]
fn in_op_prefixes_and_keeps_kind() {
    let err = division_by_zero().in_op("irem");
    assert_eq!(err.kind(), FaultKind::Domain);
    assert_eq!(err.message, "irem: division by zero");
}

#[test]
fn internal_error_is_prefixed() {
    assert_eq!(internal_error("boom").message, "internal error: boom");
}

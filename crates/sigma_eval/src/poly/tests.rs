use super::*;
use pretty_assertions::assert_eq;
use sigma_gen::FaultKind;

fn expr(text: &str) -> Gen {
    sigma_parse::parse(text).unwrap_or_else(|diag| Gen::string(diag.to_string()))
}

fn simplified(text: &str) -> String {
    match simplify(&expr(text)) {
        Ok(g) => g.to_string(),
        Err(fault) => format!("fault: {fault}"),
    }
}

fn factored(text: &str) -> String {
    match factor(&expr(text), &EngineConfig::default()) {
        Ok(g) => g.to_string(),
        Err(fault) => format!("fault: {fault}"),
    }
}

fn x() -> Poly {
    Poly::var(0)
}

fn c(n: i64) -> Poly {
    Poly::constant(BigRational::from_integer(BigInt::from(n)))
}

#[test]
fn arithmetic_on_polys() {
    // (x + 1)(x - 1) = x^2 - 1
    let product = x().add(&c(1)).mul(&x().sub(&c(1)));
    assert_eq!(product, x().pow(2).sub(&c(1)));
    assert!(product.sub(&product).is_zero());
    assert_eq!(c(3).as_constant(), Some(BigRational::from_integer(BigInt::from(3))));
    assert_eq!(x().as_constant(), None);
}

#[test]
fn division_with_remainder() {
    // x^3 + 2 = (x^2 + x + 1)(x - 1) + 3
    let dividend = x().pow(3).add(&c(2));
    let (q, r) = dividend.div_rem(&x().sub(&c(1)));
    assert_eq!(q, x().pow(2).add(&x()).add(&c(1)));
    assert_eq!(r, c(3));
    assert_eq!(dividend.div_exact(&x().sub(&c(1))), None);
    assert_eq!(x().pow(2).sub(&c(1)).div_exact(&x().add(&c(1))), Some(x().sub(&c(1))));
}

#[test]
fn primitive_part_has_positive_lead() {
    let (content, part) = x().scale(&BigRational::new(BigInt::from(-4), BigInt::from(3)))
        .add(&c(-2))
        .primitive();
    assert_eq!(content, BigRational::new(BigInt::from(-2), BigInt::from(3)));
    assert_eq!(part, x().scale(&BigRational::from_integer(BigInt::from(2))).add(&c(3)));
}

#[test]
fn euclid_over_rationals() {
    let a = x().pow(2).sub(&c(1));
    let b = x().pow(2).sub(&x().scale(&BigRational::from_integer(BigInt::from(2)))).add(&c(1));
    assert_eq!(univariate_gcd(&a, &b), x().sub(&c(1)));
    assert_eq!(univariate_gcd(&a, &c(5)), c(1));
}

#[test]
fn simplify_cancels_common_factors() {
    assert_eq!(simplified("(x^2-1)/(x-1)"), "x+1");
    assert_eq!(simplified("x/x"), "1");
    assert_eq!(simplified("x-x"), "0");
    assert_eq!(simplified("1/x+1/x"), "2/x");
    assert_eq!(simplified("(x+1)^2"), "x^2+2*x+1");
}

#[test]
fn simplify_orders_atoms_by_name() {
    assert_eq!(simplified("y+x"), "x+y");
    assert_eq!(simplified("x+y"), "x+y");
}

#[test]
fn simplify_treats_calls_as_atoms() {
    assert_eq!(simplified("sin(x)^2-sin(x)^2"), "0");
    assert_eq!(simplified("f(x+x)"), "f(2*x)");
    assert_eq!(simplified("x^(1/2)*x^(1/2)"), "(x^(1/2))^2");
}

#[test]
fn simplify_leaves_floats_alone() {
    assert_eq!(simplified("2.5*x"), "2.5*x");
    assert_eq!(simplified("7"), "7");
}

#[test]
fn simplify_reports_division_by_zero() {
    let fault = simplify(&expr("x/(x-x)")).map_err(|f| f.kind);
    assert_eq!(fault, Err(FaultKind::Domain));
}

#[test]
fn factor_integers_and_polynomials() {
    assert_eq!(factored("12"), "2^2*3");
    assert_eq!(factored("x^2-1"), "(x-1)*(x+1)");
    assert_eq!(factored("x^3-x"), "x*(x-1)*(x+1)");
    assert_eq!(factored("2*x^2-2"), "2*(x-1)*(x+1)");
    assert_eq!(factored("x^2+2*x+1"), "(x+1)^2");
}

#[test]
fn factor_keeps_irreducible_parts() {
    assert_eq!(factored("x^2+1"), "x^2+1");
    assert_eq!(factored("(x^2+1)^2"), "(x^2+1)^2");
    assert_eq!(factored("2*x-1"), "2*x-1");
}

#[test]
fn factor_recognises_multivariate_powers() {
    assert_eq!(factored("x^2-2*x*y+y^2"), "(x-y)^2");
    assert_eq!(factored("x^3+3*x^2*y+3*x*y^2+y^3"), "(x+y)^3");
    assert_eq!(factored("4*x^2+4*x*y+y^2"), "(2*x+y)^2");
    assert_eq!(factored("x^2*y-2*x*y^2+y^3"), "y*(x-y)^2");
    assert_eq!(factored("x^2+y^2"), "x^2+y^2");
}

#[test]
fn factor_rational_function() {
    assert_eq!(factored("1/(x^2-1)"), "1/((x-1)*(x+1))");
}

#[test]
fn polynomial_gcd_and_lcm() {
    let g = gcd(&expr("x^2-1"), &expr("x-1")).map(|g| g.to_string());
    assert_eq!(g, Ok("x-1".to_owned()));
    let g = gcd(&expr("2*x+2"), &expr("4*x+4")).map(|g| g.to_string());
    assert_eq!(g, Ok("2*x+2".to_owned()));
    let l = lcm(&expr("x^2-1"), &expr("x-1")).map(|g| g.to_string());
    assert_eq!(l, Ok("x^2-1".to_owned()));
}

#[test]
fn gcd_rejects_rational_functions() {
    let fault = gcd(&expr("1/x"), &expr("x")).map_err(|f| f.kind);
    assert_eq!(fault, Err(FaultKind::Domain));
}

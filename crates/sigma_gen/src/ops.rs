//! Arithmetic over engine values.
//!
//! Dispatch order for every binary operator:
//! 1. numbers (machine-integer fast path, then the exact/inexact tower)
//! 2. vectors and matrices
//! 3. scalar symbolic operands, which build a `Gen::Symb` tree
//!
//! Anything else is an `invalid_operands` fault.

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::fault::{
    complex_result, dimension_mismatch, division_by_zero, domain_error, exponent_too_large,
    invalid_operands, not_square, GenResult,
};
use crate::value::{Gen, Op};

/// Upper bound on the bit length of an exact power.
pub const MAX_POWER_BITS: u64 = 1 << 26;

/// A number lifted into the tower.
enum Num {
    Exact(BigRational),
    Inexact(f64),
}

impl Num {
    fn of(g: &Gen) -> Option<Num> {
        match g {
            Gen::Double(_) | Gen::Float(_) => g.to_f64().map(Num::Inexact),
            _ => g.to_ratio().map(Num::Exact),
        }
    }

    fn approx(&self) -> f64 {
        match self {
            Num::Exact(r) => r.to_f64().unwrap_or(f64::NAN),
            Num::Inexact(f) => *f,
        }
    }
}

fn numeric(
    a: &Gen,
    b: &Gen,
    exact: impl FnOnce(BigRational, BigRational) -> BigRational,
    inexact: impl FnOnce(f64, f64) -> f64,
) -> Option<Gen> {
    match (Num::of(a)?, Num::of(b)?) {
        (Num::Exact(x), Num::Exact(y)) => Some(Gen::from_ratio(exact(x, y))),
        (x, y) => Some(Gen::Double(inexact(x.approx(), y.approx()))),
    }
}

/// Operand that can take part in a symbolic tree.
fn is_scalar(g: &Gen) -> bool {
    g.is_number() || matches!(g, Gen::Ident(_) | Gen::Symb(_))
}

// Numbers

fn add_numbers(a: &Gen, b: &Gen) -> Option<Gen> {
    if let (Gen::Int(x), Gen::Int(y)) = (a, b) {
        return Some(match x.checked_add(*y) {
            Some(sum) => Gen::Int(sum),
            None => Gen::from_bigint(BigInt::from(*x) + *y),
        });
    }
    numeric(a, b, |x, y| x + y, |x, y| x + y)
}

fn sub_numbers(a: &Gen, b: &Gen) -> Option<Gen> {
    if let (Gen::Int(x), Gen::Int(y)) = (a, b) {
        return Some(match x.checked_sub(*y) {
            Some(diff) => Gen::Int(diff),
            None => Gen::from_bigint(BigInt::from(*x) - *y),
        });
    }
    numeric(a, b, |x, y| x - y, |x, y| x - y)
}

fn mul_numbers(a: &Gen, b: &Gen) -> Option<Gen> {
    if let (Gen::Int(x), Gen::Int(y)) = (a, b) {
        return Some(match x.checked_mul(*y) {
            Some(prod) => Gen::Int(prod),
            None => Gen::from_bigint(BigInt::from(*x) * *y),
        });
    }
    numeric(a, b, |x, y| x * y, |x, y| x * y)
}

/// Caller guarantees `b` is a non-zero number.
fn div_numbers(a: &Gen, b: &Gen) -> Option<Gen> {
    if let (Gen::Int(x), Gen::Int(y)) = (a, b) {
        if let Some(q) = x.checked_div(*y) {
            if x.checked_rem(*y) == Some(0) {
                return Some(Gen::Int(q));
            }
        }
        return Some(Gen::from_ratio(BigRational::new(
            BigInt::from(*x),
            BigInt::from(*y),
        )));
    }
    numeric(a, b, |x, y| x / y, |x, y| x / y)
}

fn neg_number(a: &Gen) -> Option<Gen> {
    match a {
        Gen::Int(i) => Some(match i.checked_neg() {
            Some(n) => Gen::Int(n),
            None => Gen::from_bigint(-BigInt::from(*i)),
        }),
        Gen::Big(b) => Some(Gen::from_bigint(-b)),
        Gen::Frac(r) => Some(Gen::Frac(-r)),
        Gen::Double(d) => Some(Gen::Double(-d)),
        Gen::Float(f) => Some(Gen::Float(-f)),
        _ => None,
    }
}

// Public operators

pub fn add(a: &Gen, b: &Gen) -> GenResult {
    if let Some(sum) = add_numbers(a, b) {
        return Ok(sum);
    }
    match (a, b) {
        (Gen::Vect(x), Gen::Vect(y)) => zip_with(x, y, "+", add),
        (Gen::Str(x), Gen::Str(y)) => Ok(Gen::Str(format!("{x}{y}"))),
        _ if is_scalar(a) && is_scalar(b) => Ok(symbolic_sum(vec![a.clone(), b.clone()])),
        _ => Err(invalid_operands("+", a, b)),
    }
}

pub fn sub(a: &Gen, b: &Gen) -> GenResult {
    if let Some(diff) = sub_numbers(a, b) {
        return Ok(diff);
    }
    match (a, b) {
        (Gen::Vect(x), Gen::Vect(y)) => zip_with(x, y, "-", sub),
        _ if is_scalar(a) && is_scalar(b) => Ok(symbolic_sum(vec![a.clone(), neg(b)?])),
        _ => Err(invalid_operands("-", a, b)),
    }
}

pub fn mul(a: &Gen, b: &Gen) -> GenResult {
    if let Some(prod) = mul_numbers(a, b) {
        return Ok(prod);
    }
    match (a, b) {
        (Gen::Vect(x), Gen::Vect(y)) => vector_product(a, b, x, y),
        (Gen::Vect(x), s) if is_scalar(s) => map(x, |e| mul(e, s)),
        (s, Gen::Vect(y)) if is_scalar(s) => map(y, |e| mul(s, e)),
        _ if is_scalar(a) && is_scalar(b) => Ok(symbolic_product(vec![a.clone(), b.clone()])),
        _ => Err(invalid_operands("*", a, b)),
    }
}

pub fn div(a: &Gen, b: &Gen) -> GenResult {
    if b.is_zero_number() {
        return Err(division_by_zero());
    }
    if let Some(quot) = div_numbers(a, b) {
        return Ok(quot);
    }
    match (a, b) {
        (Gen::Vect(x), s) if is_scalar(s) => map(x, |e| div(e, s)),
        _ if is_scalar(a) && is_scalar(b) => {
            Ok(symbolic_product(vec![a.clone(), reciprocal(b)?]))
        }
        _ => Err(invalid_operands("/", a, b)),
    }
}

pub fn neg(a: &Gen) -> GenResult {
    if let Some(n) = neg_number(a) {
        return Ok(n);
    }
    match a {
        Gen::Vect(items) => map(items, neg),
        Gen::Ident(_) | Gen::Symb(_) => Ok(symbolic_product(vec![Gen::Int(-1), a.clone()])),
        _ => Err(crate::fault::evaluation_error(format!(
            "unary `-` cannot be applied to {}",
            a.gen_type().name()
        ))),
    }
}

/// `1 / a`.
pub fn reciprocal(a: &Gen) -> GenResult {
    if a.is_number() {
        return div(&Gen::Int(1), a);
    }
    match a {
        Gen::Symb(node) if node.op == Op::Inv && node.args.len() == 1 => Ok(node.args[0].clone()),
        Gen::Ident(_) | Gen::Symb(_) => Ok(Gen::symbolic(Op::Inv, vec![a.clone()])),
        _ => Err(invalid_operands("/", &Gen::Int(1), a)),
    }
}

pub fn pow(base: &Gen, exp: &Gen) -> GenResult {
    pow_with_limit(base, exp, MAX_POWER_BITS)
}

/// `pow` with an explicit cap on the bit length of exact results.
pub fn pow_with_limit(base: &Gen, exp: &Gen, max_bits: u64) -> GenResult {
    if exp.is_exact_zero() && !matches!(base, Gen::Vect(_)) {
        return Ok(Gen::Int(1));
    }
    if exp.is_one() {
        return Ok(base.clone());
    }
    match (base, exp) {
        (b, e) if b.is_exact() && e.is_integer() => exact_pow(b, e, max_bits),
        (b, Gen::Frac(e)) if b.is_exact() => Ok(exact_root_pow(b, e, max_bits)?
            .unwrap_or_else(|| Gen::symbolic(Op::Pow, vec![b.clone(), exp.clone()]))),
        (b, e) if b.is_number() && e.is_number() => {
            let value = b.to_f64().unwrap_or(f64::NAN).powf(e.to_f64().unwrap_or(f64::NAN));
            if value.is_nan() {
                Err(complex_result("^"))
            } else {
                Ok(Gen::Double(value))
            }
        }
        (Gen::Vect(_), e) if e.is_integer() => matrix_pow(base, e),
        _ if is_scalar(base) && is_scalar(exp) => Ok(symbolic_power(base, exp)),
        _ => Err(invalid_operands("^", base, exp)),
    }
}

fn exact_pow(base: &Gen, exp: &Gen, max_bits: u64) -> GenResult {
    let ratio = base.to_ratio().unwrap_or_else(BigRational::zero);
    let exponent = exp.to_bigint().unwrap_or_else(BigInt::zero);
    let negative = exponent.is_negative();

    if ratio.is_zero() {
        return if negative {
            Err(division_by_zero())
        } else {
            Ok(Gen::Int(0))
        };
    }
    if ratio.is_one() {
        return Ok(Gen::Int(1));
    }
    if ratio == -BigRational::one() {
        return Ok(Gen::Int(if exponent.is_even() { 1 } else { -1 }));
    }

    let magnitude = exponent
        .abs()
        .to_u32()
        .ok_or_else(|| exponent_too_large("^"))?;
    let bits = ratio.numer().bits().max(ratio.denom().bits());
    if bits.saturating_mul(u64::from(magnitude)) > max_bits {
        return Err(exponent_too_large("^"));
    }

    let powered = BigRational::new(ratio.numer().pow(magnitude), ratio.denom().pow(magnitude));
    Ok(Gen::from_ratio(if negative {
        powered.recip()
    } else {
        powered
    }))
}

/// `base ^ (p/q)` when `base` is an exact `q`-th power. `None` otherwise.
fn exact_root_pow(
    base: &Gen,
    exp: &BigRational,
    max_bits: u64,
) -> Result<Option<Gen>, crate::Fault> {
    let Some(ratio) = base.to_ratio() else {
        return Ok(None);
    };
    let Some(q) = exp.denom().to_u32() else {
        return Ok(None);
    };
    if ratio.is_negative() && q % 2 == 0 {
        return Ok(None);
    }
    let numer_root = ratio.numer().nth_root(q);
    let denom_root = ratio.denom().nth_root(q);
    if &numer_root.pow(q) != ratio.numer() || &denom_root.pow(q) != ratio.denom() {
        return Ok(None);
    }
    let root = Gen::from_ratio(BigRational::new(numer_root, denom_root));
    exact_pow(&root, &Gen::from_bigint(exp.numer().clone()), max_bits).map(Some)
}

fn matrix_pow(base: &Gen, exp: &Gen) -> GenResult {
    let (rows, cols) = base.matrix_shape().ok_or_else(|| not_square("^"))?;
    if rows != cols {
        return Err(not_square("^"));
    }
    let mut remaining = exp
        .to_bigint()
        .and_then(|e| e.to_u32())
        .ok_or_else(|| domain_error("^", "matrix exponent must be a non-negative machine integer"))?;

    let mut result = identity(rows);
    let mut square = base.clone();
    while remaining > 0 {
        if remaining & 1 == 1 {
            result = mul(&result, &square)?;
        }
        remaining >>= 1;
        if remaining > 0 {
            square = mul(&square, &square)?;
        }
    }
    Ok(result)
}

/// `n x n` identity matrix.
pub fn identity(n: usize) -> Gen {
    Gen::Vect(
        (0..n)
            .map(|i| Gen::Vect((0..n).map(|j| Gen::Int(i64::from(i == j))).collect()))
            .collect(),
    )
}

// Vectors

fn map(items: &[Gen], f: impl Fn(&Gen) -> GenResult) -> GenResult {
    items.iter().map(f).collect::<Result<Vec<_>, _>>().map(Gen::Vect)
}

fn zip_with(x: &[Gen], y: &[Gen], op: &str, f: fn(&Gen, &Gen) -> GenResult) -> GenResult {
    if x.len() != y.len() {
        return Err(dimension_mismatch(op));
    }
    x.iter()
        .zip(y)
        .map(|(a, b)| f(a, b))
        .collect::<Result<Vec<_>, _>>()
        .map(Gen::Vect)
}

/// Dot product of two equal-length vectors.
pub fn dot(x: &[Gen], y: &[Gen]) -> GenResult {
    if x.len() != y.len() {
        return Err(dimension_mismatch("*"));
    }
    x.iter()
        .zip(y)
        .try_fold(Gen::Int(0), |acc, (a, b)| add(&acc, &mul(a, b)?))
}

fn column(rows: &[Gen], j: usize) -> Vec<Gen> {
    rows.iter()
        .filter_map(|row| row.as_vector().and_then(|r| r.get(j)).cloned())
        .collect()
}

fn vector_product(a: &Gen, b: &Gen, x: &[Gen], y: &[Gen]) -> GenResult {
    match (a.matrix_shape(), b.matrix_shape()) {
        (Some((_, inner_a)), Some((inner_b, cols))) => {
            if inner_a != inner_b {
                return Err(dimension_mismatch("*"));
            }
            let columns: Vec<Vec<Gen>> = (0..cols).map(|j| column(y, j)).collect();
            x.iter()
                .map(|row| {
                    let row = row.as_vector().unwrap_or_default();
                    columns
                        .iter()
                        .map(|col| dot(row, col))
                        .collect::<Result<Vec<_>, _>>()
                        .map(Gen::Vect)
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Gen::Vect)
        }
        (Some(_), None) => x
            .iter()
            .map(|row| dot(row.as_vector().unwrap_or_default(), y))
            .collect::<Result<Vec<_>, _>>()
            .map(Gen::Vect),
        (None, Some((inner, cols))) => {
            if x.len() != inner {
                return Err(dimension_mismatch("*"));
            }
            (0..cols)
                .map(|j| dot(x, &column(y, j)))
                .collect::<Result<Vec<_>, _>>()
                .map(Gen::Vect)
        }
        (None, None) => dot(x, y),
    }
}

// Symbolic trees

/// Flattened sum with numeric terms folded into one trailing constant.
pub fn symbolic_sum(terms: Vec<Gen>) -> Gen {
    fn collect(term: Gen, flat: &mut Vec<Gen>, constant: &mut Gen) {
        match term {
            Gen::Symb(mut node) if node.op == Op::Add => {
                for arg in std::mem::take(&mut node.args) {
                    collect(arg, flat, constant);
                }
            }
            t if t.is_number() => {
                if let Some(sum) = add_numbers(constant, &t) {
                    *constant = sum;
                }
            }
            t => flat.push(t),
        }
    }

    let mut flat = Vec::with_capacity(terms.len());
    let mut constant = Gen::Int(0);
    for term in terms {
        collect(term, &mut flat, &mut constant);
    }
    if !constant.is_exact_zero() {
        flat.push(constant);
    }
    match flat.len() {
        0 => Gen::Int(0),
        1 => flat.pop().unwrap_or_default(),
        _ => Gen::symbolic(Op::Add, flat),
    }
}

/// Flattened product with numeric factors folded into one leading coefficient.
pub fn symbolic_product(factors: Vec<Gen>) -> Gen {
    fn collect(factor: Gen, flat: &mut Vec<Gen>, coeff: &mut Gen) {
        match factor {
            Gen::Symb(mut node) if node.op == Op::Mul => {
                for arg in std::mem::take(&mut node.args) {
                    collect(arg, flat, coeff);
                }
            }
            f if f.is_number() => {
                if let Some(prod) = mul_numbers(coeff, &f) {
                    *coeff = prod;
                }
            }
            f => flat.push(f),
        }
    }

    let mut flat = Vec::with_capacity(factors.len());
    let mut coeff = Gen::Int(1);
    for factor in factors {
        collect(factor, &mut flat, &mut coeff);
    }
    if coeff.is_exact_zero() {
        return Gen::Int(0);
    }
    if flat.is_empty() {
        return coeff;
    }
    if !coeff.is_one() {
        flat.insert(0, coeff);
    }
    if flat.len() == 1 {
        flat.pop().unwrap_or_default()
    } else {
        Gen::symbolic(Op::Mul, flat)
    }
}

/// `base ^ exp` as a tree, merging `(x^m)^n` for integer exponents.
pub fn symbolic_power(base: &Gen, exp: &Gen) -> Gen {
    if let Gen::Symb(node) = base {
        if node.op == Op::Pow && node.args.len() == 2 && node.args[1].is_integer() && exp.is_integer()
        {
            if let Some(merged) = mul_numbers(&node.args[1], exp) {
                return Gen::symbolic(Op::Pow, vec![node.args[0].clone(), merged]);
            }
        }
    }
    Gen::symbolic(Op::Pow, vec![base.clone(), exp.clone()])
}

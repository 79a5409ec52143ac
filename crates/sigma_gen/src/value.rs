//! The engine's tagged value.
//!
//! All exact numbers go through the normalizing constructors
//! (`Gen::from_bigint`, `Gen::from_ratio`), so structural equality on `Gen`
//! is numeric equality for exact values.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, ToPrimitive, Zero};
use sigma_stack::ensure_sufficient_stack;

use crate::fault::{division_by_zero, not_an_integer, out_of_range, Fault};

/// One-byte discriminant exposed across the boundary.
///
/// Hosts must treat the byte as opaque and compare it only for equality.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum GenType {
    /// Machine integer (`i64`).
    Int = 0,
    /// Double-precision float.
    Double = 1,
    /// Arbitrary-precision integer outside `i64`.
    Big = 2,
    /// Single-precision float.
    Float = 3,
    /// Exact fraction with denominator > 1.
    Frac = 4,
    /// Free identifier such as `x`.
    Ident = 5,
    /// Vector; matrices are vectors of equal-length rows.
    Vect = 6,
    /// Symbolic expression tree.
    Symb = 7,
    /// String.
    Str = 8,
}

impl GenType {
    /// Raw tag byte.
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Human-readable kind, used in fault messages.
    pub const fn name(self) -> &'static str {
        match self {
            GenType::Int => "integer",
            GenType::Double => "float",
            GenType::Big => "big integer",
            GenType::Float => "single float",
            GenType::Frac => "fraction",
            GenType::Ident => "identifier",
            GenType::Vect => "vector",
            GenType::Symb => "expression",
            GenType::Str => "string",
        }
    }
}

/// Operator of a symbolic node.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Op {
    /// n-ary sum.
    Add,
    /// n-ary product.
    Mul,
    /// Negation of the single argument.
    Neg,
    /// Reciprocal of the single argument.
    Inv,
    /// `base ^ exponent`.
    Pow,
    /// Postfix `n!`.
    Factorial,
    /// Named function application.
    Call(String),
    /// `name := value`.
    Assign,
    /// `a; b; c` - evaluates to the last element.
    Seq,
}

/// A symbolic node: an operator applied to arguments.
#[derive(Clone, Debug, PartialEq)]
pub struct Symbolic {
    pub op: Op,
    pub args: Vec<Gen>,
}

// Trees built through repeated boundary arithmetic can be far deeper than the
// parser allows, so the recursive traversals every value goes through
// (clone, comparison, drop) run on a grown stack.

impl Drop for Symbolic {
    fn drop(&mut self) {
        let args = std::mem::take(&mut self.args);
        if args.iter().any(|arg| matches!(arg, Gen::Symb(_) | Gen::Vect(_))) {
            ensure_sufficient_stack(move || drop(args));
        }
    }
}

/// An engine value.
#[derive(Debug)]
pub enum Gen {
    Int(i64),
    Big(BigInt),
    Frac(BigRational),
    Double(f64),
    Float(f32),
    Ident(String),
    Vect(Vec<Gen>),
    Symb(Box<Symbolic>),
    Str(String),
}

impl Clone for Gen {
    fn clone(&self) -> Self {
        match self {
            Gen::Int(i) => Gen::Int(*i),
            Gen::Big(b) => Gen::Big(b.clone()),
            Gen::Frac(r) => Gen::Frac(r.clone()),
            Gen::Double(d) => Gen::Double(*d),
            Gen::Float(f) => Gen::Float(*f),
            Gen::Ident(name) => Gen::Ident(name.clone()),
            Gen::Vect(items) => ensure_sufficient_stack(|| Gen::Vect(items.clone())),
            Gen::Symb(node) => ensure_sufficient_stack(|| Gen::Symb(node.clone())),
            Gen::Str(text) => Gen::Str(text.clone()),
        }
    }
}

impl PartialEq for Gen {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Gen::Int(a), Gen::Int(b)) => a == b,
            (Gen::Big(a), Gen::Big(b)) => a == b,
            (Gen::Frac(a), Gen::Frac(b)) => a == b,
            (Gen::Double(a), Gen::Double(b)) => a == b,
            (Gen::Float(a), Gen::Float(b)) => a == b,
            (Gen::Ident(a), Gen::Ident(b)) | (Gen::Str(a), Gen::Str(b)) => a == b,
            (Gen::Vect(a), Gen::Vect(b)) => ensure_sufficient_stack(|| a == b),
            (Gen::Symb(a), Gen::Symb(b)) => ensure_sufficient_stack(|| a == b),
            _ => false,
        }
    }
}

impl Default for Gen {
    fn default() -> Self {
        Gen::Int(0)
    }
}

impl Gen {
    // Constructors

    /// Machine integer.
    pub const fn int(value: i64) -> Self {
        Gen::Int(value)
    }

    /// Integer, demoted to `Gen::Int` when it fits.
    pub fn from_bigint(value: BigInt) -> Self {
        match value.to_i64() {
            Some(small) => Gen::Int(small),
            None => Gen::Big(value),
        }
    }

    /// Reduced fraction, demoted to an integer when the denominator is one.
    pub fn from_ratio(value: BigRational) -> Self {
        if value.is_integer() {
            Gen::from_bigint(value.to_integer())
        } else {
            Gen::Frac(value)
        }
    }

    /// Exact quotient `numer / denom`.
    pub fn fraction(numer: BigInt, denom: BigInt) -> Result<Self, Fault> {
        if denom.is_zero() {
            return Err(division_by_zero());
        }
        Ok(Gen::from_ratio(BigRational::new(numer, denom)))
    }

    pub const fn double(value: f64) -> Self {
        Gen::Double(value)
    }

    pub fn ident(name: impl Into<String>) -> Self {
        Gen::Ident(name.into())
    }

    pub fn string(text: impl Into<String>) -> Self {
        Gen::Str(text.into())
    }

    pub fn vector(items: Vec<Gen>) -> Self {
        Gen::Vect(items)
    }

    pub fn symbolic(op: Op, args: Vec<Gen>) -> Self {
        Gen::Symb(Box::new(Symbolic { op, args }))
    }

    /// Unevaluated function application `name(args...)`.
    pub fn call(name: impl Into<String>, args: Vec<Gen>) -> Self {
        Gen::symbolic(Op::Call(name.into()), args)
    }

    // Classification

    pub fn gen_type(&self) -> GenType {
        match self {
            Gen::Int(_) => GenType::Int,
            Gen::Big(_) => GenType::Big,
            Gen::Frac(_) => GenType::Frac,
            Gen::Double(_) => GenType::Double,
            Gen::Float(_) => GenType::Float,
            Gen::Ident(_) => GenType::Ident,
            Gen::Vect(_) => GenType::Vect,
            Gen::Symb(_) => GenType::Symb,
            Gen::Str(_) => GenType::Str,
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(
            self,
            Gen::Int(_) | Gen::Big(_) | Gen::Frac(_) | Gen::Double(_) | Gen::Float(_)
        )
    }

    pub fn is_exact(&self) -> bool {
        matches!(self, Gen::Int(_) | Gen::Big(_) | Gen::Frac(_))
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Gen::Int(_) | Gen::Big(_))
    }

    pub fn is_exact_zero(&self) -> bool {
        matches!(self, Gen::Int(0))
    }

    pub fn is_one(&self) -> bool {
        matches!(self, Gen::Int(1))
    }

    /// Exact zero or a float equal to zero.
    pub fn is_zero_number(&self) -> bool {
        match self {
            Gen::Int(0) => true,
            Gen::Double(d) => *d == 0.0,
            Gen::Float(f) => *f == 0.0,
            _ => false,
        }
    }

    /// True if the value contains a free identifier or a symbolic node.
    pub fn has_symbols(&self) -> bool {
        match self {
            Gen::Ident(_) | Gen::Symb(_) => true,
            Gen::Vect(items) => items.iter().any(Gen::has_symbols),
            _ => false,
        }
    }

    /// Sign of an exact number.
    pub fn exact_signum(&self) -> Option<i32> {
        let sign = match self {
            Gen::Int(i) => i.signum() as i32,
            Gen::Big(b) => sign_of(b),
            Gen::Frac(r) => sign_of(r.numer()),
            _ => return None,
        };
        Some(sign)
    }

    // Accessors

    pub fn to_bigint(&self) -> Option<BigInt> {
        match self {
            Gen::Int(i) => Some(BigInt::from(*i)),
            Gen::Big(b) => Some(b.clone()),
            _ => None,
        }
    }

    pub fn to_ratio(&self) -> Option<BigRational> {
        match self {
            Gen::Int(i) => Some(BigRational::from_integer(BigInt::from(*i))),
            Gen::Big(b) => Some(BigRational::from_integer(b.clone())),
            Gen::Frac(r) => Some(r.clone()),
            _ => None,
        }
    }

    /// Approximate any number as `f64`.
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            #[allow(clippy::cast_precision_loss, reason = "approximation is the point")]
            Gen::Int(i) => Some(*i as f64),
            Gen::Big(b) => b.to_f64(),
            Gen::Frac(r) => r.to_f64(),
            Gen::Double(d) => Some(*d),
            Gen::Float(f) => Some(f64::from(*f)),
            _ => None,
        }
    }

    /// Narrowing conversion to `i64`.
    ///
    /// Accepts exact integers and floats with an integral value.
    pub fn to_i64(&self) -> Result<i64, Fault> {
        match self {
            Gen::Int(i) => Ok(*i),
            Gen::Big(_) => Err(out_of_range("a 64-bit integer", self)),
            Gen::Double(_) | Gen::Float(_) => {
                let value = self.to_f64().unwrap_or(f64::NAN);
                #[allow(clippy::cast_precision_loss, reason = "range check only")]
                let in_range = value >= i64::MIN as f64 && value < i64::MAX as f64;
                if value.fract() != 0.0 || !value.is_finite() {
                    Err(not_an_integer("to_int", self))
                } else if in_range {
                    #[allow(clippy::cast_possible_truncation, reason = "range checked above")]
                    Ok(value as i64)
                } else {
                    Err(out_of_range("a 64-bit integer", self))
                }
            }
            _ => Err(not_an_integer("to_int", self)),
        }
    }

    /// Narrowing conversion to `i32`.
    pub fn to_i32(&self) -> Result<i32, Fault> {
        let wide = self.to_i64().map_err(|fault| match self {
            Gen::Big(_) => out_of_range("a 32-bit integer", self),
            _ => fault,
        })?;
        i32::try_from(wide).map_err(|_| out_of_range("a 32-bit integer", self))
    }

    pub fn as_vector(&self) -> Option<&[Gen]> {
        match self {
            Gen::Vect(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_symbolic(&self) -> Option<&Symbolic> {
        match self {
            Gen::Symb(node) => Some(node),
            _ => None,
        }
    }

    /// `(rows, cols)` if this is a non-empty rectangular matrix.
    pub fn matrix_shape(&self) -> Option<(usize, usize)> {
        let rows = self.as_vector()?;
        let cols = rows.first()?.as_vector()?.len();
        if cols == 0 {
            return None;
        }
        rows.iter()
            .all(|row| row.as_vector().is_some_and(|r| r.len() == cols))
            .then_some((rows.len(), cols))
    }
}

fn sign_of(value: &BigInt) -> i32 {
    if value.is_zero() {
        0
    } else if value.is_positive() {
        1
    } else {
        -1
    }
}

impl From<i32> for Gen {
    fn from(value: i32) -> Self {
        Gen::Int(i64::from(value))
    }
}

impl From<i64> for Gen {
    fn from(value: i64) -> Self {
        Gen::Int(value)
    }
}

impl From<f32> for Gen {
    fn from(value: f32) -> Self {
        Gen::Float(value)
    }
}

impl From<f64> for Gen {
    fn from(value: f64) -> Self {
        Gen::Double(value)
    }
}

impl From<BigInt> for Gen {
    fn from(value: BigInt) -> Self {
        Gen::from_bigint(value)
    }
}

impl From<BigRational> for Gen {
    fn from(value: BigRational) -> Self {
        Gen::from_ratio(value)
    }
}

#[cfg(test)]
mod tests;

//! Sparse multivariate polynomials over the rationals.
//!
//! `simplify`, `factor` and polynomial `gcd`/`lcm` convert an expression
//! into a rational function `num / den` over a list of atoms, work on that,
//! and convert back. Any sub-expression that is not a polynomial operation
//! (a function call, a non-integer power, a factorial) becomes an opaque
//! atom, so `sin(x)^2 - 1` is a polynomial in the single atom `sin(x)`.
//!
//! Cancellation is complete for univariate rational functions. With several
//! variables only monomial content and exact divisibility are cancelled.

use std::collections::{BTreeMap, BTreeSet};

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Pow, Signed, Zero};
use smallvec::SmallVec;
use sigma_gen::ops::{reciprocal, symbolic_power, symbolic_product, symbolic_sum};
use sigma_gen::{division_by_zero, domain_error, Fault, Gen, GenResult, Op};
use sigma_stack::ensure_sufficient_stack;

use crate::config::EngineConfig;
use crate::primes;

/// Exponent of each atom, trailing zeros trimmed so equal monomials compare equal.
pub(crate) type Exponents = SmallVec<[u32; 4]>;

/// Largest integer power expanded symbolically.
const MAX_EXPANDED_POWER: u32 = 1000;

/// Largest candidate list tried by the rational root search.
const MAX_ROOT_CANDIDATES: usize = 4096;

// Monomials

fn trim(mut exps: Exponents) -> Exponents {
    while exps.last() == Some(&0) {
        exps.pop();
    }
    exps
}

fn exp_at(exps: &Exponents, i: usize) -> u32 {
    exps.get(i).copied().unwrap_or(0)
}

fn mono_mul(a: &Exponents, b: &Exponents) -> Exponents {
    let len = a.len().max(b.len());
    trim(
        (0..len)
            .map(|i| exp_at(a, i).saturating_add(exp_at(b, i)))
            .collect(),
    )
}

fn mono_div(a: &Exponents, b: &Exponents) -> Option<Exponents> {
    if (0..b.len()).any(|i| exp_at(a, i) < exp_at(b, i)) {
        return None;
    }
    Some(trim((0..a.len()).map(|i| exp_at(a, i) - exp_at(b, i)).collect()))
}

fn mono_min(a: &Exponents, b: &Exponents) -> Exponents {
    let len = a.len().min(b.len());
    trim((0..len).map(|i| exp_at(a, i).min(exp_at(b, i))).collect())
}

fn unit_exponents(var: usize) -> Exponents {
    let mut exps: Exponents = SmallVec::from_elem(0, var + 1);
    exps[var] = 1;
    exps
}

// Polynomials

/// Sparse polynomial; terms are keyed by monomial in lexicographic order.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Poly {
    terms: BTreeMap<Exponents, BigRational>,
}

impl Poly {
    pub fn zero() -> Self {
        Poly::default()
    }

    pub fn one() -> Self {
        Poly::constant(BigRational::one())
    }

    pub fn constant(c: BigRational) -> Self {
        Poly::term(Exponents::new(), c)
    }

    /// The atom with index `var`.
    pub fn var(var: usize) -> Self {
        Poly::term(unit_exponents(var), BigRational::one())
    }

    fn term(exps: Exponents, coeff: BigRational) -> Self {
        let mut poly = Poly::zero();
        poly.add_term(exps, coeff);
        poly
    }

    fn add_term(&mut self, exps: Exponents, coeff: BigRational) {
        if coeff.is_zero() {
            return;
        }
        let exps = trim(exps);
        let sum = match self.terms.remove(&exps) {
            Some(existing) => existing + coeff,
            None => coeff,
        };
        if !sum.is_zero() {
            self.terms.insert(exps, sum);
        }
    }

    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// The value of a constant polynomial.
    pub fn as_constant(&self) -> Option<BigRational> {
        match self.terms.len() {
            0 => Some(BigRational::zero()),
            1 => self.terms.get(&Exponents::new()).cloned(),
            _ => None,
        }
    }

    pub fn is_constant(&self) -> bool {
        self.as_constant().is_some()
    }

    /// Lexicographically largest monomial and its coefficient.
    fn leading(&self) -> Option<(&Exponents, &BigRational)> {
        self.terms.last_key_value()
    }

    fn constant_term(&self) -> BigRational {
        self.terms
            .get(&Exponents::new())
            .cloned()
            .unwrap_or_else(BigRational::zero)
    }

    pub fn add(&self, other: &Poly) -> Poly {
        let mut sum = self.clone();
        for (exps, c) in &other.terms {
            sum.add_term(exps.clone(), c.clone());
        }
        sum
    }

    pub fn neg(&self) -> Poly {
        Poly {
            terms: self
                .terms
                .iter()
                .map(|(e, c)| (e.clone(), -c))
                .collect(),
        }
    }

    pub fn sub(&self, other: &Poly) -> Poly {
        self.add(&other.neg())
    }

    pub fn mul(&self, other: &Poly) -> Poly {
        let mut product = Poly::zero();
        for (ea, ca) in &self.terms {
            for (eb, cb) in &other.terms {
                product.add_term(mono_mul(ea, eb), ca * cb);
            }
        }
        product
    }

    pub fn scale(&self, factor: &BigRational) -> Poly {
        if factor.is_zero() {
            return Poly::zero();
        }
        Poly {
            terms: self
                .terms
                .iter()
                .map(|(e, c)| (e.clone(), c * factor))
                .collect(),
        }
    }

    pub fn pow(&self, mut exponent: u32) -> Poly {
        let mut result = Poly::one();
        let mut base = self.clone();
        while exponent > 0 {
            if exponent & 1 == 1 {
                result = result.mul(&base);
            }
            exponent >>= 1;
            if exponent > 0 {
                base = base.mul(&base);
            }
        }
        result
    }

    /// Quotient and remainder of multivariate division by `divisor`'s leading term.
    ///
    /// A zero divisor yields a zero quotient and `self` as remainder.
    pub fn div_rem(&self, divisor: &Poly) -> (Poly, Poly) {
        let Some((lead_exps, lead_coeff)) = divisor.leading() else {
            return (Poly::zero(), self.clone());
        };
        let (lead_exps, lead_coeff) = (lead_exps.clone(), lead_coeff.clone());

        let mut quotient = Poly::zero();
        let mut remainder = Poly::zero();
        let mut rest = self.clone();
        while let Some((exps, coeff)) = rest.leading() {
            let (exps, coeff) = (exps.clone(), coeff.clone());
            match mono_div(&exps, &lead_exps) {
                Some(shift) => {
                    let step = Poly::term(shift, coeff / &lead_coeff);
                    rest = rest.sub(&divisor.mul(&step));
                    quotient = quotient.add(&step);
                }
                None => {
                    rest.terms.remove(&exps);
                    remainder.add_term(exps, coeff);
                }
            }
        }
        (quotient, remainder)
    }

    /// `self / divisor` when the division is exact.
    pub fn div_exact(&self, divisor: &Poly) -> Option<Poly> {
        if divisor.is_zero() {
            return None;
        }
        let (quotient, remainder) = self.div_rem(divisor);
        remainder.is_zero().then_some(quotient)
    }

    fn div_monomial(&self, exps: &Exponents) -> Poly {
        Poly {
            terms: self
                .terms
                .iter()
                .filter_map(|(e, c)| Some((mono_div(e, exps)?, c.clone())))
                .collect(),
        }
    }

    /// Largest monomial dividing every term.
    fn monomial_content(&self) -> Exponents {
        let mut iter = self.terms.keys();
        let Some(first) = iter.next() else {
            return Exponents::new();
        };
        iter.fold(first.clone(), |acc, e| mono_min(&acc, e))
    }

    /// `(c, p)` with `self = c * p`, `p` having coprime integer coefficients
    /// and a positive leading coefficient.
    pub fn primitive(&self) -> (BigRational, Poly) {
        let Some((_, lead)) = self.leading() else {
            return (BigRational::one(), Poly::zero());
        };
        let negative = lead.is_negative();
        let (numer_gcd, denom_lcm) = self.terms.values().fold(
            (BigInt::zero(), BigInt::one()),
            |(g, l), c| (g.gcd(c.numer()), l.lcm(c.denom())),
        );
        let mut content = BigRational::new(numer_gcd, denom_lcm);
        if negative {
            content = -content;
        }
        let scaled = self.scale(&content.recip());
        (content, scaled)
    }

    /// Indices of atoms that occur with a positive exponent.
    pub fn variables(&self) -> BTreeSet<usize> {
        self.terms
            .keys()
            .flat_map(|e| e.iter().enumerate().filter(|(_, &x)| x > 0).map(|(i, _)| i))
            .collect()
    }

    fn degree(&self) -> u32 {
        self.terms
            .keys()
            .map(|e| e.iter().sum::<u32>())
            .max()
            .unwrap_or(0)
    }

    fn derivative(&self, var: usize) -> Poly {
        let mut result = Poly::zero();
        for (exps, c) in &self.terms {
            let e = exp_at(exps, var);
            if e == 0 {
                continue;
            }
            let mut lowered = exps.clone();
            lowered[var] = e - 1;
            result.add_term(lowered, c * BigInt::from(e));
        }
        result
    }

    /// Value of a polynomial in the single atom `var` at `x`.
    fn eval_univariate(&self, var: usize, x: &BigRational) -> BigRational {
        self.terms.iter().fold(BigRational::zero(), |acc, (exps, c)| {
            acc + c * Pow::pow(x, exp_at(exps, var))
        })
    }

    /// Same polynomial with atom `i` renamed to `map[i]`.
    fn remap(&self, map: &[usize]) -> Poly {
        let mut result = Poly::zero();
        for (exps, c) in &self.terms {
            let len = exps
                .iter()
                .enumerate()
                .filter(|(_, &e)| e > 0)
                .map(|(i, _)| map.get(i).copied().unwrap_or(i) + 1)
                .max()
                .unwrap_or(0);
            let mut renamed: Exponents = SmallVec::from_elem(0, len);
            for (i, &e) in exps.iter().enumerate() {
                if e > 0 {
                    renamed[map.get(i).copied().unwrap_or(i)] = e;
                }
            }
            result.add_term(renamed, c.clone());
        }
        result
    }
}

/// Euclid over the rationals; the result is primitive.
fn univariate_gcd(a: &Poly, b: &Poly) -> Poly {
    let (mut a, mut b) = (a.clone(), b.clone());
    while !b.is_zero() {
        let remainder = a.div_rem(&b).1;
        a = std::mem::replace(&mut b, remainder);
    }
    a.primitive().1
}

/// A common factor of `a` and `b`, complete when both use at most one atom.
fn common_factor(a: &Poly, b: &Poly) -> Poly {
    let mut vars = a.variables();
    vars.extend(b.variables());
    if vars.len() <= 1 {
        return univariate_gcd(a, b);
    }
    if a.div_exact(b).is_some() {
        return b.primitive().1;
    }
    if b.div_exact(a).is_some() {
        return a.primitive().1;
    }
    Poly::one()
}

// Rational functions

#[derive(Clone, Debug)]
struct RatFun {
    num: Poly,
    den: Poly,
}

impl RatFun {
    fn poly(num: Poly) -> Self {
        RatFun {
            num,
            den: Poly::one(),
        }
    }

    /// Reduced `num / den`; `den` must be non-zero.
    fn new(num: Poly, den: Poly) -> Self {
        if num.is_zero() {
            return RatFun::poly(Poly::zero());
        }
        if let Some(c) = den.as_constant() {
            return RatFun::poly(num.scale(&c.recip()));
        }
        let shared = mono_min(&num.monomial_content(), &den.monomial_content());
        let mut num = num.div_monomial(&shared);
        let mut den = den.div_monomial(&shared);

        let common = common_factor(&num, &den);
        if !common.is_constant() {
            if let (Some(n), Some(d)) = (num.div_exact(&common), den.div_exact(&common)) {
                num = n;
                den = d;
            }
        }

        let (content, den) = den.primitive();
        let num = num.scale(&content.recip());
        if den.is_constant() {
            return RatFun::poly(num);
        }
        RatFun { num, den }
    }

    fn add(&self, other: &RatFun) -> RatFun {
        if self.den == other.den {
            return RatFun::new(self.num.add(&other.num), self.den.clone());
        }
        RatFun::new(
            self.num.mul(&other.den).add(&other.num.mul(&self.den)),
            self.den.mul(&other.den),
        )
    }

    fn mul(&self, other: &RatFun) -> RatFun {
        RatFun::new(self.num.mul(&other.num), self.den.mul(&other.den))
    }

    fn neg(&self) -> RatFun {
        RatFun {
            num: self.num.neg(),
            den: self.den.clone(),
        }
    }

    fn recip(&self) -> Result<RatFun, Fault> {
        if self.num.is_zero() {
            return Err(division_by_zero());
        }
        Ok(RatFun::new(self.den.clone(), self.num.clone()))
    }

    fn pow(&self, exponent: i64) -> Result<RatFun, Fault> {
        let base = if exponent < 0 { self.recip()? } else { self.clone() };
        let e = u32::try_from(exponent.unsigned_abs()).unwrap_or(u32::MAX);
        Ok(RatFun::new(base.num.pow(e), base.den.pow(e)))
    }
}

// Conversion

enum ConvertError {
    /// The expression is outside what polynomials can represent.
    Unsupported,
    Fault(Fault),
}

impl From<Fault> for ConvertError {
    fn from(fault: Fault) -> Self {
        ConvertError::Fault(fault)
    }
}

type Converted = Result<RatFun, ConvertError>;

/// Expression to rational function over a growing list of atoms.
#[derive(Default)]
struct Converter {
    atoms: Vec<Gen>,
}

impl Converter {
    fn atom(&mut self, g: Gen) -> RatFun {
        let index = match self.atoms.iter().position(|a| *a == g) {
            Some(i) => i,
            None => {
                self.atoms.push(g);
                self.atoms.len() - 1
            }
        };
        RatFun::poly(Poly::var(index))
    }

    fn convert(&mut self, g: &Gen) -> Converted {
        ensure_sufficient_stack(|| self.convert_inner(g))
    }

    fn convert_inner(&mut self, g: &Gen) -> Converted {
        match g {
            _ if g.is_exact() => Ok(RatFun::poly(Poly::constant(
                g.to_ratio().unwrap_or_else(BigRational::zero),
            ))),
            Gen::Ident(_) => Ok(self.atom(g.clone())),
            Gen::Symb(node) => match (&node.op, node.args.as_slice()) {
                (Op::Add, args) => args.iter().try_fold(
                    RatFun::poly(Poly::zero()),
                    |acc, arg| Ok(acc.add(&self.convert(arg)?)),
                ),
                (Op::Mul, args) => args.iter().try_fold(
                    RatFun::poly(Poly::one()),
                    |acc, arg| Ok(acc.mul(&self.convert(arg)?)),
                ),
                (Op::Neg, [a]) => Ok(self.convert(a)?.neg()),
                (Op::Inv, [a]) => Ok(self.convert(a)?.recip()?),
                (Op::Pow, [base, exp]) if exp.is_integer() => match exp.to_i64() {
                    Ok(e) if e.unsigned_abs() <= u64::from(MAX_EXPANDED_POWER) => {
                        Ok(self.convert(base)?.pow(e)?)
                    }
                    _ => Err(ConvertError::Unsupported),
                },
                (Op::Pow, [base, exp]) => {
                    let atom = Gen::symbolic(Op::Pow, vec![simplify(base)?, simplify(exp)?]);
                    Ok(self.atom(atom))
                }
                (Op::Factorial, [a]) => {
                    let atom = Gen::symbolic(Op::Factorial, vec![simplify(a)?]);
                    Ok(self.atom(atom))
                }
                (Op::Call(name), args) => {
                    let args = args.iter().map(simplify).collect::<Result<Vec<_>, _>>()?;
                    Ok(self.atom(Gen::call(name.clone(), args)))
                }
                _ => Err(ConvertError::Unsupported),
            },
            _ => Err(ConvertError::Unsupported),
        }
    }

    /// Polynomial argument of `op`; rational functions are rejected.
    fn polynomial(&mut self, op: &str, g: &Gen) -> Result<Poly, Fault> {
        let rf = match self.convert(g) {
            Ok(rf) => rf,
            Err(ConvertError::Fault(fault)) => return Err(fault),
            Err(ConvertError::Unsupported) => {
                return Err(domain_error(op, "expected a polynomial"));
            }
        };
        match rf.den.as_constant() {
            Some(c) => Ok(rf.num.scale(&c.recip())),
            None => Err(domain_error(op, "expected a polynomial")),
        }
    }

    /// Renumber atoms in order of their text, so `y+x` and `x+y` agree.
    fn canonical_order(&mut self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.atoms.len()).collect();
        order.sort_by_cached_key(|&i| self.atoms[i].to_string());
        let mut map = vec![0; self.atoms.len()];
        for (new_index, &old_index) in order.iter().enumerate() {
            map[old_index] = new_index;
        }
        let sorted = order.iter().map(|&i| self.atoms[i].clone()).collect();
        self.atoms = sorted;
        map
    }

    fn poly_to_gen(&self, poly: &Poly) -> Gen {
        let terms = poly
            .terms
            .iter()
            .rev()
            .map(|(exps, c)| {
                let mut factors = vec![Gen::from_ratio(c.clone())];
                for (i, &e) in exps.iter().enumerate() {
                    if e > 0 {
                        let atom = self.atoms.get(i).cloned().unwrap_or_default();
                        factors.push(if e == 1 {
                            atom
                        } else {
                            symbolic_power(&atom, &Gen::int(i64::from(e)))
                        });
                    }
                }
                symbolic_product(factors)
            })
            .collect();
        symbolic_sum(terms)
    }

    fn ratfun_to_gen(&self, rf: &RatFun) -> GenResult {
        let num = self.poly_to_gen(&rf.num);
        if rf.den.is_constant() {
            return Ok(num);
        }
        let den = self.poly_to_gen(&rf.den);
        Ok(symbolic_product(vec![num, reciprocal(&den)?]))
    }
}

// Public operations

/// Rational normal form of an expression.
pub fn simplify(g: &Gen) -> GenResult {
    ensure_sufficient_stack(|| match g {
        Gen::Vect(items) => items
            .iter()
            .map(simplify)
            .collect::<Result<Vec<_>, _>>()
            .map(Gen::Vect),
        _ if !g.has_symbols() => Ok(g.clone()),
        _ => {
            let mut conv = Converter::default();
            match conv.convert(g) {
                Ok(rf) => {
                    let map = conv.canonical_order();
                    let rf = RatFun::new(rf.num.remap(&map), rf.den.remap(&map));
                    conv.ratfun_to_gen(&rf)
                }
                Err(ConvertError::Unsupported) => Ok(g.clone()),
                Err(ConvertError::Fault(fault)) => Err(fault),
            }
        }
    })
}

/// Factor an integer into primes, or an expression into irreducible parts.
pub fn factor(g: &Gen, config: &EngineConfig) -> GenResult {
    match g {
        Gen::Vect(items) => items
            .iter()
            .map(|item| factor(item, config))
            .collect::<Result<Vec<_>, _>>()
            .map(Gen::Vect),
        _ if g.is_integer() => primes::ifactor(g, config),
        _ if !g.has_symbols() => Ok(g.clone()),
        _ => {
            let mut conv = Converter::default();
            let rf = match conv.convert(g) {
                Ok(rf) => rf,
                Err(ConvertError::Unsupported) => return Ok(g.clone()),
                Err(ConvertError::Fault(fault)) => return Err(fault),
            };
            let map = conv.canonical_order();
            let rf = RatFun::new(rf.num.remap(&map), rf.den.remap(&map));

            let (num_coeff, num_factors) = factor_poly(&rf.num, config);
            let (den_coeff, den_factors) = factor_poly(&rf.den, config);
            let mut parts = vec![Gen::from_ratio(num_coeff / den_coeff)];
            parts.extend(factors_to_gen(&conv, &num_factors));
            if !den_factors.is_empty() {
                let divisor = symbolic_product(factors_to_gen(&conv, &den_factors));
                parts.push(reciprocal(&divisor)?);
            }
            Ok(symbolic_product(parts))
        }
    }
}

fn factors_to_gen(conv: &Converter, factors: &[(Poly, u32)]) -> Vec<Gen> {
    factors
        .iter()
        .map(|(f, m)| {
            let base = conv.poly_to_gen(f);
            if *m == 1 {
                base
            } else {
                symbolic_power(&base, &Gen::int(i64::from(*m)))
            }
        })
        .collect()
}

/// `(c, [(f, m)])` with `p = c * prod(f^m)`, each `f` primitive.
///
/// Univariate parts are split into rational linear factors and a square-free
/// decomposition of what remains. With several atoms only monomial content
/// and a whole perfect power are recognised: `x^2-2*x*y+y^2` becomes
/// `(x-y)^2`, but `(x-y)^2*(x+y)` is left as one expanded factor.
fn factor_poly(p: &Poly, config: &EngineConfig) -> (BigRational, Vec<(Poly, u32)>) {
    if let Some(c) = p.as_constant() {
        return (c, Vec::new());
    }
    let (_, primitive) = p.primitive();
    let monomial = primitive.monomial_content();
    let mut rest = primitive.div_monomial(&monomial);

    let mut factors: Vec<(Poly, u32)> = monomial
        .iter()
        .enumerate()
        .filter(|(_, &e)| e > 0)
        .map(|(i, &e)| (Poly::var(i), e))
        .collect();

    let vars = rest.variables();
    if let (1, Some(&var)) = (vars.len(), vars.first()) {
        for root in rational_roots(&rest, var, config) {
            let linear = Poly::var(var)
                .scale(&BigRational::from_integer(root.denom().clone()))
                .sub(&Poly::constant(BigRational::from_integer(root.numer().clone())));
            let mut multiplicity = 0;
            while let Some(quotient) = rest.div_exact(&linear) {
                rest = quotient;
                multiplicity += 1;
            }
            if multiplicity > 0 {
                factors.push((linear, multiplicity));
            }
        }
        if !rest.is_constant() {
            factors.extend(square_free(&rest, var));
        }
    } else if !rest.is_constant() {
        let (base, power) = perfect_power(&rest);
        factors.push((base.primitive().1, power));
    }

    factors.sort_by(|(a, _), (b, _)| {
        (a.degree(), a.terms.len())
            .cmp(&(b.degree(), b.terms.len()))
            .then_with(|| a.cmp(b))
    });

    // Leading coefficients fix the constant: p = c * prod(f^m)
    let lead = |q: &Poly| q.leading().map(|(_, c)| c.clone()).unwrap_or_else(BigRational::one);
    let product = factors.iter().fold(BigRational::one(), |acc, (f, m)| {
        acc * Pow::pow(lead(f), *m)
    });
    (lead(p) / product, factors)
}

/// Square-free decomposition (Yun) of a univariate polynomial.
fn square_free(f: &Poly, var: usize) -> Vec<(Poly, u32)> {
    let df = f.derivative(var);
    let a0 = univariate_gcd(f, &df);
    let mut b = f.div_exact(&a0).unwrap_or_else(|| f.clone());
    let c = df.div_exact(&a0).unwrap_or_else(|| df.clone());
    let mut d = c.sub(&b.derivative(var));

    let mut out = Vec::new();
    let mut multiplicity = 1;
    while !b.is_constant() && multiplicity <= f.degree() {
        let a = univariate_gcd(&b, &d);
        let next_b = b.div_exact(&a).unwrap_or_else(Poly::one);
        let c = d.div_exact(&a).unwrap_or_else(Poly::zero);
        d = c.sub(&next_b.derivative(var));
        if !a.is_constant() {
            out.push((a.primitive().1, multiplicity));
        }
        b = next_b;
        multiplicity += 1;
    }
    out
}

/// `(r, k)` with `f = r^k` and `k` as large as possible; `(f, 1)` when `f`
/// is not a perfect power.
fn perfect_power(f: &Poly) -> (Poly, u32) {
    let degree = f.degree();
    (2..=degree)
        .rev()
        .filter(|k| degree % k == 0)
        .find_map(|k| Some((kth_root(f, k)?, k)))
        .unwrap_or_else(|| (f.clone(), 1))
}

/// Exact `k`-th root of a primitive polynomial, built one term at a time from
/// the leading term down: each new term cancels the leading term of
/// `f - r^k` against `k * lead(r)^(k-1)`.
fn kth_root(f: &Poly, k: u32) -> Option<Poly> {
    let (lead_exps, lead_coeff) = f.leading()?;
    let root_exps = trim(
        lead_exps
            .iter()
            .map(|&e| (e % k == 0).then_some(e / k))
            .collect::<Option<_>>()?,
    );
    let root_coeff = BigRational::new(
        exact_root(lead_coeff.numer(), k)?,
        exact_root(lead_coeff.denom(), k)?,
    );
    let mut root = Poly::term(root_exps.clone(), root_coeff.clone());
    let step_exps: Exponents = root_exps.iter().map(|&e| e * (k - 1)).collect();
    let step_coeff = Pow::pow(&root_coeff, k - 1) * BigInt::from(k);

    // each pass fixes one more term of the root
    for _ in 0..2 * f.terms.len() + 8 {
        let diff = f.sub(&root.pow(k));
        let Some((exps, coeff)) = diff.leading() else {
            return Some(root);
        };
        let next = mono_div(exps, &step_exps)?;
        if next >= root_exps {
            return None;
        }
        root = root.add(&Poly::term(next, coeff / &step_coeff));
    }
    None
}

fn exact_root(n: &BigInt, k: u32) -> Option<BigInt> {
    let root = n.nth_root(k);
    (Pow::pow(&root, k) == *n).then_some(root)
}

/// Rational roots of a primitive univariate polynomial with a non-zero
/// constant term, by the rational root theorem.
fn rational_roots(f: &Poly, var: usize, config: &EngineConfig) -> Vec<BigRational> {
    let Some((_, lead)) = f.leading() else {
        return Vec::new();
    };
    let constant = f.constant_term();
    if constant.is_zero() {
        return Vec::new();
    }
    let (Some(ps), Some(qs)) = (
        small_divisors(constant.numer(), config),
        small_divisors(lead.numer(), config),
    ) else {
        return Vec::new();
    };
    if ps.len().saturating_mul(qs.len()) > MAX_ROOT_CANDIDATES {
        return Vec::new();
    }

    let mut roots = BTreeSet::new();
    for p in &ps {
        for q in &qs {
            for candidate in [
                BigRational::new(p.clone(), q.clone()),
                BigRational::new(-p, q.clone()),
            ] {
                if f.eval_univariate(var, &candidate).is_zero() {
                    roots.insert(candidate);
                }
            }
        }
    }
    roots.into_iter().collect()
}

/// Positive divisors of a machine-sized integer.
fn small_divisors(n: &BigInt, config: &EngineConfig) -> Option<Vec<BigInt>> {
    if n.bits() > 64 {
        return None;
    }
    let mut divisors = vec![BigInt::one()];
    for (p, e) in primes::factorize(n, config).ok()? {
        let mut next = Vec::new();
        for d in &divisors {
            let mut power = d.clone();
            next.push(power.clone());
            for _ in 0..e {
                power *= &p;
                next.push(power.clone());
            }
        }
        divisors = next;
        if divisors.len() > MAX_ROOT_CANDIDATES {
            return None;
        }
    }
    Some(divisors)
}

/// Polynomial gcd; integer content is kept (`gcd(2x+2, 4x+4) = 2x+2`).
pub fn gcd(a: &Gen, b: &Gen) -> GenResult {
    let mut conv = Converter::default();
    let pa = conv.polynomial("gcd", a)?;
    let pb = conv.polynomial("gcd", b)?;
    let g = poly_gcd(&pa, &pb);
    Ok(conv.poly_to_gen(&g))
}

/// Polynomial lcm, `a*b / gcd(a, b)` with a positive leading coefficient.
pub fn lcm(a: &Gen, b: &Gen) -> GenResult {
    let mut conv = Converter::default();
    let pa = conv.polynomial("lcm", a)?;
    let pb = conv.polynomial("lcm", b)?;
    if pa.is_zero() || pb.is_zero() {
        return Ok(Gen::int(0));
    }
    let g = poly_gcd(&pa, &pb);
    let product = pa.mul(&pb);
    let l = product.div_exact(&g).unwrap_or(product);
    let l = match l.leading() {
        Some((_, c)) if c.is_negative() => l.neg(),
        _ => l,
    };
    Ok(conv.poly_to_gen(&l))
}

fn poly_gcd(a: &Poly, b: &Poly) -> Poly {
    if a.is_zero() {
        return b.primitive().1.scale(&b.primitive().0.abs());
    }
    if b.is_zero() {
        return a.primitive().1.scale(&a.primitive().0.abs());
    }
    let monomial = mono_min(&a.monomial_content(), &b.monomial_content());
    let (ca, pa) = a.div_monomial(&monomial).primitive();
    let (cb, pb) = b.div_monomial(&monomial).primitive();
    let content = BigRational::new(
        ca.numer().gcd(cb.numer()),
        ca.denom().lcm(cb.denom()),
    );
    common_factor(&pa, &pb)
        .mul(&Poly::term(monomial, BigRational::one()))
        .scale(&content)
}

#[cfg(test)]
mod tests;

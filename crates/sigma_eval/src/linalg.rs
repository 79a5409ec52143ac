//! Determinants.
//!
//! Exact matrices are eliminated over the rationals and inexact ones in
//! `f64` with partial pivoting. Symbolic entries fall back to cofactor
//! expansion followed by `simplify`, which is only practical for small sizes.

use num_rational::BigRational;
use num_traits::{One, Zero};
use sigma_gen::ops::{add, mul, sub};
use sigma_gen::{domain_error, not_a_matrix, not_square, Gen, GenResult};

use crate::poly::simplify;

/// Largest order expanded by cofactors.
const MAX_SYMBOLIC_ORDER: usize = 8;

/// Determinant of a square matrix.
///
/// Exact entries use Gaussian elimination over the rationals, numeric ones
/// partial pivoting in `f64`, and symbolic ones cofactor expansion up to
/// order `MAX_SYMBOLIC_ORDER`.
pub fn det(m: &Gen) -> GenResult {
    let (n, cols) = m.matrix_shape().ok_or_else(|| not_a_matrix("det", m))?;
    if n != cols {
        return Err(not_square("det"));
    }
    let rows: Vec<&[Gen]> = m
        .as_vector()
        .unwrap_or_default()
        .iter()
        .filter_map(Gen::as_vector)
        .collect();
    let entries = || rows.iter().flat_map(|row| row.iter());

    if entries().all(Gen::is_exact) {
        let matrix = rows
            .iter()
            .map(|row| row.iter().filter_map(Gen::to_ratio).collect())
            .collect();
        return Ok(Gen::from_ratio(exact_det(matrix)));
    }
    if entries().all(Gen::is_number) {
        let matrix = rows
            .iter()
            .map(|row| row.iter().filter_map(Gen::to_f64).collect())
            .collect();
        return Ok(Gen::double(float_det(matrix)));
    }
    if n > MAX_SYMBOLIC_ORDER {
        return Err(domain_error(
            "det",
            format!("symbolic matrices are limited to order {MAX_SYMBOLIC_ORDER}"),
        ));
    }
    tracing::trace!(order = n, "cofactor expansion");
    let expanded = cofactor_det(&rows)?;
    simplify(&expanded)
}

fn exact_det(mut a: Vec<Vec<BigRational>>) -> BigRational {
    let n = a.len();
    let mut det = BigRational::one();
    for col in 0..n {
        let Some(pivot) = (col..n).find(|&r| !a[r][col].is_zero()) else {
            return BigRational::zero();
        };
        if pivot != col {
            a.swap(pivot, col);
            det = -det;
        }
        let p = a[col][col].clone();
        det *= &p;
        for r in col + 1..n {
            if a[r][col].is_zero() {
                continue;
            }
            let factor = &a[r][col] / &p;
            for k in col..n {
                let delta = &a[col][k] * &factor;
                a[r][k] -= delta;
            }
        }
    }
    det
}

fn float_det(mut a: Vec<Vec<f64>>) -> f64 {
    let n = a.len();
    let mut det = 1.0;
    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&x, &y| a[x][col].abs().total_cmp(&a[y][col].abs()))
            .unwrap_or(col);
        if a[pivot][col] == 0.0 {
            return 0.0;
        }
        if pivot != col {
            a.swap(pivot, col);
            det = -det;
        }
        let p = a[col][col];
        det *= p;
        for r in col + 1..n {
            let factor = a[r][col] / p;
            for k in col..n {
                a[r][k] -= a[col][k] * factor;
            }
        }
    }
    det
}

/// Expansion along the first row.
fn cofactor_det(rows: &[&[Gen]]) -> GenResult {
    match rows {
        [] => Ok(Gen::int(1)),
        [row] => Ok(row.first().cloned().unwrap_or_default()),
        [first, rest @ ..] => {
            let mut total = Gen::int(0);
            for (j, entry) in first.iter().enumerate() {
                if entry.is_exact_zero() {
                    continue;
                }
                let minor: Vec<Vec<Gen>> = rest
                    .iter()
                    .map(|row| {
                        row.iter()
                            .enumerate()
                            .filter(|&(k, _)| k != j)
                            .map(|(_, g)| g.clone())
                            .collect()
                    })
                    .collect();
                let minor_rows: Vec<&[Gen]> = minor.iter().map(Vec::as_slice).collect();
                let term = mul(entry, &cofactor_det(&minor_rows)?)?;
                total = if j % 2 == 0 {
                    add(&total, &term)?
                } else {
                    sub(&total, &term)?
                };
            }
            Ok(total)
        }
    }
}

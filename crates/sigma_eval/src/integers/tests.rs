use super::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use sigma_gen::FaultKind;

fn int(i: i64) -> Gen {
    Gen::int(i)
}

#[test]
fn gcd_and_lcm_are_non_negative() {
    assert_eq!(gcd(&int(-12), &int(18)), Ok(int(6)));
    assert_eq!(lcm(&int(-4), &int(6)), Ok(int(12)));
    assert_eq!(gcd(&int(0), &int(0)), Ok(int(0)));
    assert_eq!(lcm(&int(0), &int(5)), Ok(int(0)));
}

#[test]
fn gcd_rejects_floats() {
    assert_eq!(
        gcd(&Gen::double(1.5), &int(3)).map_err(|f| f.kind),
        Err(FaultKind::Conversion)
    );
}

#[test]
fn truncated_division() {
    assert_eq!(iquorem(&int(-7), &int(2)), Ok((int(-3), int(-1))));
    assert_eq!(iquo(&int(7), &int(-2)), Ok(int(-3)));
    assert_eq!(irem(&int(7), &int(-2)), Ok(int(1)));
    let err = irem(&int(1), &int(0)).map_err(|f| f.message);
    assert_eq!(err, Err("irem: division by zero".to_owned()));
}

#[test]
fn bezout_coefficients() {
    let (u, v, d) = iegcd(&int(240), &int(46)).unwrap_or_default();
    assert_eq!(d, int(2));
    let check = sigma_gen::ops::add(
        &sigma_gen::ops::mul(&u, &int(240)).unwrap_or_default(),
        &sigma_gen::ops::mul(&v, &int(46)).unwrap_or_default(),
    );
    assert_eq!(check, Ok(int(2)));

    let (u, v, d) = iegcd(&int(-3), &int(0)).unwrap_or_default();
    assert_eq!((u, v, d), (int(-1), int(0), int(3)));
}

#[test]
fn iabcuv_reduces_u() {
    assert_eq!(iabcuv(&int(21), &int(28), &int(7)), Ok((int(3), int(-2))));
    assert_eq!(
        iabcuv(&int(4), &int(6), &int(3)).map_err(|f| f.kind),
        Err(FaultKind::Domain)
    );
}

#[test]
fn chinese_remainder() {
    assert_eq!(ichinrem(&int(2), &int(3), &int(3), &int(5)), Ok(int(8)));
    assert_eq!(ichinrem(&int(1), &int(4), &int(3), &int(6)), Ok(int(9)));
    assert_eq!(
        ichinrem(&int(1), &int(4), &int(2), &int(6)).map_err(|f| f.kind),
        Err(FaultKind::Domain)
    );
}

#[test]
fn sums_of_two_squares() {
    assert_eq!(pa2b2(&int(2)), Ok((int(1), int(1))));
    assert_eq!(pa2b2(&int(5)), Ok((int(2), int(1))));
    assert_eq!(pa2b2(&int(13)), Ok((int(3), int(2))));
    assert_eq!(pa2b2(&int(1_000_000_009)).map(|(a, b)| {
        let a = a.to_i64().unwrap_or_default();
        let b = b.to_i64().unwrap_or_default();
        a * a + b * b
    }), Ok(1_000_000_009));
    assert!(pa2b2(&int(7)).is_err());
    assert!(pa2b2(&int(15)).is_err());
}

#[test]
fn totient() {
    let config = EngineConfig::default();
    assert_eq!(euler(&int(1), &config), Ok(int(1)));
    assert_eq!(euler(&int(36), &config), Ok(int(12)));
    assert_eq!(euler(&int(97), &config), Ok(int(96)));
    assert!(euler(&int(0), &config).is_err());
}

#[test]
fn residue_symbols() {
    assert_eq!(legendre(&int(2), &int(7)), Ok(1));
    assert_eq!(legendre(&int(3), &int(7)), Ok(-1));
    assert_eq!(legendre(&int(14), &int(7)), Ok(0));
    assert_eq!(jacobi(&int(2), &int(15)), Ok(1));
    assert_eq!(jacobi(&int(7), &int(15)), Ok(-1));
    assert!(legendre(&int(2), &int(9)).is_err());
    assert!(jacobi(&int(2), &int(8)).is_err());
}

#[test]
fn parity() {
    assert_eq!(even(&int(-4)), Ok(true));
    assert_eq!(odd(&int(-4)), Ok(false));
    assert!(even(&Gen::ident("x")).is_err());
}

#[test]
fn float2rational_respects_epsilon() {
    assert_eq!(
        float2rational(&Gen::double(12.964_285_714_3), 1e-6).map(|g| g.to_string()),
        Ok("363/28".to_owned())
    );
    assert_eq!(float2rational(&Gen::double(-0.5), 1e-12).map(|g| g.to_string()), Ok("-1/2".to_owned()));
    assert_eq!(float2rational(&int(3), 1e-12), Ok(int(3)));
    assert!(float2rational(&Gen::double(f64::INFINITY), 1e-12).is_err());
}

proptest! {
    #[test]
    fn gcd_times_lcm_is_product(a in -10_000i64..10_000, b in -10_000i64..10_000) {
        let g = gcd(&int(a), &int(b)).unwrap_or_default().to_i64().unwrap_or(-1);
        let l = lcm(&int(a), &int(b)).unwrap_or_default().to_i64().unwrap_or(-1);
        prop_assert!(g >= 0 && l >= 0);
        prop_assert_eq!(g * l, (a * b).abs());
        if g != 0 {
            prop_assert_eq!(a % g, 0);
            prop_assert_eq!(b % g, 0);
        }
    }

    #[test]
    fn iquorem_identity(a in any::<i64>(), b in any::<i64>().prop_filter("nonzero", |b| *b != 0)) {
        let (q, r) = iquorem(&int(a), &int(b)).unwrap_or_default();
        let rebuilt = sigma_gen::ops::add(
            &sigma_gen::ops::mul(&q, &int(b)).unwrap_or_default(),
            &r,
        );
        prop_assert_eq!(rebuilt, Ok(int(a)));
        let r = r.to_bigint().unwrap_or_default();
        prop_assert!(r.is_zero() || r.is_negative() == (a < 0));
    }

    #[test]
    fn chinese_remainder_is_consistent(a in 0i64..1000, m in 1i64..200, b in 0i64..1000, n in 1i64..200) {
        if let Ok(x) = ichinrem(&int(a), &int(m), &int(b), &int(n)) {
            let x = x.to_i64().unwrap_or(-1);
            prop_assert_eq!((x - a).rem_euclid(m), 0);
            prop_assert_eq!((x - b).rem_euclid(n), 0);
        }
    }
}

use super::*;
use pretty_assertions::assert_eq;

#[test]
fn default_is_integer_zero() {
    assert_eq!(Gen::default(), Gen::Int(0));
    assert_eq!(Gen::default().gen_type(), GenType::Int);
}

#[test]
fn from_bigint_demotes_small_values() {
    assert_eq!(Gen::from_bigint(BigInt::from(42)), Gen::Int(42));
    let huge: BigInt = BigInt::from(i64::MAX) + 1;
    assert_eq!(Gen::from_bigint(huge.clone()), Gen::Big(huge));
}

#[test]
fn fraction_normalizes() {
    let half = Gen::fraction(BigInt::from(2), BigInt::from(4));
    assert_eq!(half.map(|g| g.gen_type()), Ok(GenType::Frac));
    assert_eq!(
        Gen::fraction(BigInt::from(6), BigInt::from(3)),
        Ok(Gen::Int(2))
    );
    assert_eq!(
        Gen::fraction(BigInt::from(1), BigInt::from(0)).map_err(|f| f.kind),
        Err(crate::FaultKind::Domain)
    );
}

#[test]
fn tag_bytes_are_stable() {
    assert_eq!(GenType::Int.as_u8(), 0);
    assert_eq!(GenType::Double.as_u8(), 1);
    assert_eq!(GenType::Vect.as_u8(), 6);
    assert_eq!(Gen::string("s").gen_type().as_u8(), 8);
}

#[test]
fn to_i32_conversions() {
    assert_eq!(Gen::int(-7).to_i32(), Ok(-7));
    assert_eq!(Gen::double(3.0).to_i32(), Ok(3));
    assert!(Gen::double(3.5).to_i32().is_err());
    assert!(Gen::int(i64::from(i32::MAX) + 1).to_i32().is_err());
    assert!(Gen::ident("x").to_i32().is_err());
    let big = Gen::from_bigint(BigInt::from(u64::MAX) * 3);
    assert_eq!(
        big.to_i32().map_err(|f| f.kind),
        Err(crate::FaultKind::Conversion)
    );
}

#[test]
fn matrix_shape_requires_rectangular_rows() {
    let m = Gen::vector(vec![
        Gen::vector(vec![Gen::int(1), Gen::int(2)]),
        Gen::vector(vec![Gen::int(3), Gen::int(4)]),
    ]);
    assert_eq!(m.matrix_shape(), Some((2, 2)));

    let ragged = Gen::vector(vec![
        Gen::vector(vec![Gen::int(1), Gen::int(2)]),
        Gen::vector(vec![Gen::int(3)]),
    ]);
    assert_eq!(ragged.matrix_shape(), None);
    assert_eq!(Gen::vector(vec![Gen::int(1)]).matrix_shape(), None);
}

#[test]
fn has_symbols_looks_inside_vectors() {
    assert!(!Gen::vector(vec![Gen::int(1)]).has_symbols());
    assert!(Gen::vector(vec![Gen::int(1), Gen::ident("x")]).has_symbols());
}

#[test]
fn exact_signum() {
    assert_eq!(Gen::int(-3).exact_signum(), Some(-1));
    assert_eq!(Gen::int(0).exact_signum(), Some(0));
    assert_eq!(Gen::double(1.0).exact_signum(), None);
}

// Deep trees

fn negation_chain(levels: usize) -> Gen {
    let mut g = Gen::ident("x");
    for _ in 0..levels {
        g = Gen::symbolic(Op::Neg, vec![g]);
    }
    g
}

#[test]
fn hundred_thousand_levels_clone_compare_display_and_drop() {
    let deep = negation_chain(100_000);
    let copy = deep.clone();
    assert!(copy == deep);
    assert!(copy != negation_chain(99_999));
    let text = copy.to_string();
    assert_eq!(text.len(), 100_001);
    assert!(text.starts_with("--") && text.ends_with("-x"));
    drop(copy);
    drop(deep);
}

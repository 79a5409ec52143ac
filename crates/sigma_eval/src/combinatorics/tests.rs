use super::*;
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;
use sigma_gen::FaultKind;

fn int(i: i64) -> Gen {
    Gen::int(i)
}

#[test]
fn small_factorials() {
    let config = EngineConfig::default();
    assert_eq!(factorial(0, &config), Ok(int(1)));
    assert_eq!(factorial(5, &config), Ok(int(120)));
    assert_eq!(factorial(20, &config), Ok(int(2_432_902_008_176_640_000)));
    assert_eq!(
        factorial(25, &config).map(|g| g.to_string()),
        Ok("15511210043330985984000000".to_owned())
    );
}

#[test]
fn factorial_limit_is_a_domain_fault() {
    let config = EngineConfig { factorial_limit: 10, ..EngineConfig::default() };
    assert_eq!(
        factorial(11, &config).map_err(|f| f.kind),
        Err(FaultKind::Domain)
    );
    assert!(factorial_of(&int(-1), &config).is_err());
}

#[test]
fn binomials_and_arrangements() {
    let config = EngineConfig::default();
    assert_eq!(comb(&int(5), &int(2), &config), Ok(int(10)));
    assert_eq!(comb(&int(52), &int(5), &config), Ok(int(2_598_960)));
    assert_eq!(comb(&int(3), &int(5), &config), Ok(int(0)));
    assert_eq!(perm(&int(5), &int(2), &config), Ok(int(20)));
    assert_eq!(perm(&int(5), &int(0), &config), Ok(int(1)));
    assert_eq!(perm(&int(2), &int(3), &config), Ok(int(0)));
    assert!(comb(&int(-1), &int(2), &config).is_err());
}

#[test]
fn random_stays_in_range() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..200 {
        let value = random_below(&int(10), &mut rng).unwrap_or(int(-1));
        let value = value.to_i64().unwrap_or(-1);
        assert!((0..10).contains(&value), "{value}");

        let real = random_below(&Gen::double(2.5), &mut rng).unwrap_or_default();
        let real = real.to_f64().unwrap_or(-1.0);
        assert!((0.0..2.5).contains(&real), "{real}");
    }
}

#[test]
fn random_rejects_non_positive_bounds() {
    let mut rng = StdRng::seed_from_u64(7);
    assert!(random_below(&int(0), &mut rng).is_err());
    assert!(random_below(&Gen::double(-1.0), &mut rng).is_err());
    assert!(random_below(&Gen::ident("x"), &mut rng).is_err());
}

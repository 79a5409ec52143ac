use super::*;
use pretty_assertions::assert_eq;

fn int(i: i64) -> Gen {
    Gen::int(i)
}

fn big(text: &str) -> BigInt {
    text.parse().unwrap_or_default()
}

#[test]
fn primality_classes() {
    assert_eq!(primality(&BigInt::from(1)), Primality::Composite);
    assert_eq!(primality(&BigInt::from(2)), Primality::Proven);
    assert_eq!(primality(&BigInt::from(561)), Primality::Composite);
    assert_eq!(primality(&BigInt::from(1_000_000_007)), Primality::Proven);
    // 2^89 - 1 is a Mersenne prime above the deterministic range
    assert_eq!(
        primality(&big("618970019642690137449562111")),
        Primality::Probable
    );
}

#[test]
fn neighbouring_primes() {
    assert_eq!(next_prime(&BigInt::from(-5)), BigInt::from(2));
    assert_eq!(next_prime(&BigInt::from(13)), BigInt::from(17));
    assert_eq!(prev_prime(&BigInt::from(13)), Some(BigInt::from(11)));
    assert_eq!(prev_prime(&BigInt::from(3)), Some(BigInt::from(2)));
    assert_eq!(prev_prime(&BigInt::from(2)), None);
    assert!(prevprime(&int(2)).is_err());
}

#[test]
fn nth_prime_is_one_based() {
    assert_eq!(nth_prime(1, 100), Ok(2));
    assert_eq!(nth_prime(6, 100), Ok(13));
    assert_eq!(nth_prime(10_000, 1_000_000), Ok(104_729));
    assert!(nth_prime(0, 100).is_err());
}

#[test]
fn nth_prime_above_limit_is_reported() {
    let err = nthprime(&Gen::from_bigint(big("100000000000000000000")), &EngineConfig::default());
    assert_eq!(
        err.map_err(|f| (f.kind, f.message)),
        Err((
            FaultKind::Domain,
            "Failed to compute nthprime, argument is too big".to_owned()
        ))
    );
}

fn small_cache() -> EngineConfig {
    EngineConfig {
        factor_cache_capacity: 16,
        ..EngineConfig::default()
    }
}

#[test]
fn factorization() {
    let config = small_cache();
    let factors = factorize(&BigInt::from(360), &config);
    assert_eq!(
        factors,
        Ok(vec![
            (BigInt::from(2), 3),
            (BigInt::from(3), 2),
            (BigInt::from(5), 1)
        ])
    );
    // two primes above the trial-division bound
    let n = BigInt::from(1_000_003u64) * BigInt::from(1_000_033u64);
    assert_eq!(
        factorize(&n, &config),
        Ok(vec![(BigInt::from(1_000_003), 1), (BigInt::from(1_000_033), 1)])
    );
    let square = BigInt::from(10_007u64).pow(2);
    assert_eq!(factorize(&square, &config), Ok(vec![(BigInt::from(10_007), 2)]));
}

#[test]
fn exhausted_factor_budget_is_a_domain_fault() {
    let tight = EngineConfig {
        factor_iterations: 10,
        ..EngineConfig::default()
    };
    let n = BigInt::from(1_000_037u64) * BigInt::from(1_000_039u64);
    let err = factorize(&n, &tight).map_err(|f| (f.kind, f.message));
    assert_eq!(
        err,
        Err((
            FaultKind::Domain,
            format!("Failed to factor {n}: no factor found within 10 iterations")
        ))
    );
    assert!(ifactor(&Gen::from_bigint(n.clone()), &tight).is_err());
    assert!(divisors(&Gen::from_bigint(n.clone()), &tight).is_err());

    // nothing was memoised, so the default budget still gets there
    assert_eq!(
        factorize(&n, &EngineConfig::default()),
        Ok(vec![(BigInt::from(1_000_037), 1), (BigInt::from(1_000_039), 1)])
    );
}

#[test]
fn trial_division_needs_no_budget() {
    let none = EngineConfig {
        factor_iterations: 0,
        ..EngineConfig::default()
    };
    assert_eq!(
        ifactor(&int(9_699_690), &none).map(|g| g.to_string()),
        Ok("2*3*5*7*11*13*17*19".to_owned())
    );
}

#[test]
fn ifactor_renders_as_product() {
    let config = EngineConfig::default();
    assert_eq!(ifactor(&int(12), &config).map(|g| g.to_string()), Ok("2^2*3".to_owned()));
    assert_eq!(ifactor(&int(-7), &config).map(|g| g.to_string()), Ok("-7".to_owned()));
    assert_eq!(ifactor(&int(1), &config), Ok(int(1)));
}

#[test]
fn ifactors_shapes() {
    let config = EngineConfig::default();
    assert_eq!(
        ifactors(&int(-12), &config).map(|g| g.to_string()),
        Ok("[-1,1,2,2,3,1]".to_owned())
    );
    assert_eq!(
        maple_ifactors(&int(12), &config).map(|g| g.to_string()),
        Ok("[1,[[2,2],[3,1]]]".to_owned())
    );
    assert!(ifactors(&int(0), &config).is_err());
}

#[test]
fn divisors_are_sorted() {
    let config = EngineConfig::default();
    assert_eq!(
        divisors(&int(-12), &config).map(|g| g.to_string()),
        Ok("[1,2,3,4,6,12]".to_owned())
    );
    assert_eq!(divisors(&int(1), &config).map(|g| g.to_string()), Ok("[1]".to_owned()));
}

#[test]
fn pseudoprime_rejects_non_integers() {
    assert!(is_pseudoprime(&Gen::double(7.0)).is_err());
    assert_eq!(is_pseudoprime(&int(7)), Ok(Primality::Proven));
}

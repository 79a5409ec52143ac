//! Process-wide tables shared by every context.
//!
//! Both tables are filled on demand, so after `release_globals` the next
//! request simply rebuilds what it needs.

use num_bigint::BigInt;
use parking_lot::{const_mutex, Mutex};
use rustc_hash::FxHashMap;

/// Prime factors of `|n|` in ascending order with multiplicities.
pub type Factorization = Vec<(BigInt, u32)>;

/// Smallest sieve ever built.
const MIN_SIEVE_BOUND: u64 = 1 << 16;

struct PrimeTable {
    /// Every prime `<= bound` is in `primes`.
    bound: u64,
    primes: Vec<u64>,
}

static PRIMES: Mutex<PrimeTable> = const_mutex(PrimeTable {
    bound: 0,
    primes: Vec::new(),
});

static FACTORS: Mutex<Option<FxHashMap<BigInt, Factorization>>> = const_mutex(None);

/// Run `f` over a sorted slice holding at least every prime `<= bound`.
pub fn with_primes<R>(bound: u64, f: impl FnOnce(&[u64]) -> R) -> R {
    let mut table = PRIMES.lock();
    if table.bound < bound {
        let target = bound
            .max(table.bound.saturating_mul(2))
            .max(MIN_SIEVE_BOUND);
        tracing::debug!(target, "extending prime sieve");
        table.primes = sieve(target);
        table.bound = target;
    }
    f(&table.primes)
}

pub(crate) fn cached_factors(n: &BigInt) -> Option<Factorization> {
    FACTORS.lock().as_ref()?.get(n).cloned()
}

pub(crate) fn remember_factors(n: BigInt, factors: Factorization, capacity: usize) {
    if capacity == 0 {
        return;
    }
    let mut guard = FACTORS.lock();
    let memo = guard.get_or_insert_with(FxHashMap::default);
    if memo.len() >= capacity {
        memo.clear();
    }
    memo.insert(n, factors);
}

/// Drop the prime sieve and the factorization memo.
pub fn release_globals() {
    let released_primes = std::mem::take(&mut *PRIMES.lock());
    let released_factors = FACTORS.lock().take().map_or(0, |memo| memo.len());
    tracing::debug!(
        sieve_bound = released_primes.bound,
        factorizations = released_factors,
        "released global tables"
    );
}

impl Default for PrimeTable {
    fn default() -> Self {
        PrimeTable {
            bound: 0,
            primes: Vec::new(),
        }
    }
}

/// Sieve of Eratosthenes over odd numbers.
fn sieve(limit: u64) -> Vec<u64> {
    let Ok(limit_idx) = usize::try_from(limit) else {
        return Vec::new();
    };
    if limit_idx < 2 {
        return Vec::new();
    }
    // composite[i] is for the odd number 2*i + 1
    let mut composite = vec![false; limit_idx / 2 + 1];
    let mut primes = vec![2];
    let mut i = 1;
    while 2 * i + 1 <= limit_idx {
        if !composite[i] {
            let p = 2 * i + 1;
            primes.push(p as u64);
            let mut multiple = p.saturating_mul(p);
            while multiple <= limit_idx {
                composite[multiple / 2] = true;
                multiple += 2 * p;
            }
        }
        i += 1;
    }
    primes
}

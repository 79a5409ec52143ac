use std::io;

use pretty_assertions::assert_eq;
use sigma_gen::FaultKind;

use super::*;
use crate::config::EngineConfig;

fn run(name: &str, args: &[Gen]) -> GenResult {
    let mut ctx = Context::with_config(EngineConfig::default());
    ctx.set_log_sink(Box::new(io::sink()));
    call(name, args, &mut ctx)
}

fn ints(values: &[i64]) -> Vec<Gen> {
    values.iter().copied().map(Gen::int).collect()
}

#[test]
fn every_catalogue_name_is_registered() {
    let registry = global_registry();
    for name in [
        "gcd", "lcm", "iquo", "irem", "iquorem", "iegcd", "iabcuv", "ichinrem", "pa2b2",
        "euler", "legendre", "jacobi", "comb", "perm", "is_pseudoprime", "nextprime",
        "prevprime", "nthprime", "ithprime", "ifactor", "ifactors", "maple_ifactors",
        "divisors", "idivis", "factorial", "float2rational", "even", "odd", "factor",
        "simplify", "det", "rand", "abs",
    ] {
        assert!(registry.get(name).is_some(), "{name} missing");
    }
}

#[test]
fn multi_output_builtins_return_vectors() {
    assert_eq!(run("iquorem", &ints(&[17, 5])), Ok(Gen::vector(ints(&[3, 2]))));
    assert_eq!(run("pa2b2", &ints(&[13])), Ok(Gen::vector(ints(&[3, 2]))));
}

#[test]
fn predicates_return_zero_or_one() {
    assert_eq!(run("even", &ints(&[4])), Ok(Gen::int(1)));
    assert_eq!(run("odd", &ints(&[4])), Ok(Gen::int(0)));
    assert_eq!(run("is_pseudoprime", &ints(&[97])), Ok(Gen::int(2)));
}

#[test]
fn abs_of_each_kind() {
    assert_eq!(run("abs", &ints(&[-5])), Ok(Gen::int(5)));
    assert_eq!(run("abs", &[Gen::double(-2.5)]), Ok(Gen::double(2.5)));
    assert_eq!(
        run("abs", &[Gen::ident("x")]).map(|g| g.to_string()),
        Ok("abs(x)".to_owned())
    );
}

#[test]
fn wrong_arity_is_reported() {
    let fault = run("comb", &ints(&[5]));
    assert_eq!(
        fault.map_err(|f| (f.kind, f.message)),
        Err((FaultKind::Evaluation, "comb expects 2 arguments, got 1".to_owned()))
    );
}

#[test]
fn unknown_names_are_kept() {
    assert_eq!(
        run("mystery", &ints(&[1])),
        Ok(Gen::call("mystery", ints(&[1])))
    );
}

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use sigma_gen::FaultKind;

use super::*;
use crate::config::EngineConfig;

fn ctx() -> Context {
    let mut ctx = Context::with_config(EngineConfig::default());
    ctx.set_log_sink(Box::new(std::io::sink()));
    ctx
}

fn shown(text: &str) -> String {
    match ctx().eval_str(text) {
        Ok(g) => g.to_string(),
        Err(fault) => format!("fault: {fault}"),
    }
}

#[test]
fn numeric_tower() {
    assert_eq!(shown("1+2*3"), "7");
    assert_eq!(shown("1/3+1/6"), "1/2");
    assert_eq!(shown("2^100"), "1267650600228229401496703205376");
    assert_eq!(shown("0.5+1/2"), "1.0");
    assert_eq!(shown("5!"), "120");
    assert_eq!(shown("-(2-5)"), "3");
}

#[test]
fn free_identifiers_build_trees() {
    assert_eq!(shown("x+1"), "x+1");
    assert_eq!(shown("2*x*3"), "6*x");
    assert_eq!(shown("n!"), "n!");
}

#[test]
fn assignment_and_sequences() {
    assert_eq!(shown("a := 3; b := a^2; a + b"), "12");
    let bad = Gen::symbolic(Op::Assign, vec![Gen::int(2), Gen::int(3)]);
    let fault = eval(&bad, &mut ctx()).map_err(|f| f.kind);
    assert_eq!(fault, Err(FaultKind::Evaluation));
}

#[test]
fn vectors_and_matrices() {
    assert_eq!(shown("[1,2]+[3,4]"), "[4,6]");
    assert_eq!(shown("[[1,2],[3,4]]*[[0,1],[1,0]]"), "[[2,1],[4,3]]");
}

#[test]
fn calls_reach_builtins() {
    assert_eq!(shown("gcd(12, 18)"), "6");
    assert_eq!(shown("ifactor(12)"), "2^2*3");
    assert_eq!(shown("det([[1,2],[3,4]])"), "-2");
    assert_eq!(shown("simplify((x^2-1)/(x-1))"), "x+1");
    assert_eq!(shown("factor(x^2-1)"), "(x-1)*(x+1)");
}

#[test]
fn arity_is_checked() {
    let fault = ctx().eval_str("gcd(1)").map_err(|f| f.kind);
    assert_eq!(fault, Err(FaultKind::Evaluation));
}

#[test]
fn unknown_functions_stay_unevaluated() {
    assert_eq!(shown("f(1+1, y)"), "f(2,y)");
}

#[test]
fn division_by_zero_faults() {
    let fault = ctx().eval_str("1/0").map_err(|f| f.kind);
    assert_eq!(fault, Err(FaultKind::Domain));
}

#[test]
fn deep_nesting_evaluates() {
    let text = format!("{}1{}", "(".repeat(900), ")".repeat(900));
    assert_eq!(shown(&text), "1");
}

proptest! {
    #[test]
    fn rationals_survive_display_and_reparse(n in -10_000i64..10_000, d in 1i64..10_000) {
        let mut ctx = ctx();
        let value = ctx.eval_str(&format!("{n}/{d}")).unwrap_or_default();
        let again = ctx.eval_str(&value.to_string()).unwrap_or_default();
        prop_assert_eq!(again, value);
    }

    #[test]
    fn doubles_survive_display_and_reparse(x in -1e12f64..1e12) {
        let mut ctx = ctx();
        let again = ctx.eval_str(&Gen::double(x).to_string()).unwrap_or_default();
        prop_assert_eq!(again, Gen::double(x));
    }
}

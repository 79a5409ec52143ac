//! The evaluation environment handed to every engine operation.

use std::fmt;
use std::io::{self, Write};

use rand::rngs::StdRng;
use rand::SeedableRng;
use rustc_hash::FxHashMap;
use sigma_gen::{Fault, Gen, GenResult};
use sigma_parse::ParseDiagnostic;

use crate::config::{sanitize_epsilon, EngineConfig};
use crate::poly::simplify;

/// Symbol bindings, limits, a diagnostic sink and a random source.
///
/// A context is single-writer: every operation takes `&mut Context`. Hosts
/// wanting parallelism use one context per thread.
pub struct Context {
    bindings: FxHashMap<String, Gen>,
    config: EngineConfig,
    log: Box<dyn Write + Send>,
    rng: StdRng,
    parse_error: Option<ParseDiagnostic>,
}

impl Context {
    /// Context configured from the environment, logging to stderr.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::from_env())
    }

    /// Context with explicit limits, logging to stderr.
    pub fn with_config(config: EngineConfig) -> Self {
        Context {
            bindings: FxHashMap::default(),
            config,
            log: Box::new(io::stderr()),
            rng: StdRng::from_entropy(),
            parse_error: None,
        }
    }

    /// Limits in force for this context.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Current tolerance for inexact zero tests.
    pub fn epsilon(&self) -> f64 {
        self.config.epsilon
    }

    /// Set the tolerance; values that are not finite and positive reset it
    /// to the default.
    pub fn set_epsilon(&mut self, epsilon: f64) {
        self.config.epsilon = sanitize_epsilon(epsilon);
    }

    /// Replace the diagnostic sink.
    pub fn set_log_sink(&mut self, sink: Box<dyn Write + Send>) {
        self.log = sink;
    }

    /// Write one diagnostic line to the sink. Sink failures are traced and
    /// otherwise ignored.
    pub fn log(&mut self, message: fmt::Arguments<'_>) {
        if let Err(err) = writeln!(self.log, "{message}") {
            tracing::debug!(%err, "context log sink rejected a write");
        }
    }

    /// Bind `name` to `value`, replacing any earlier binding.
    pub fn bind(&mut self, name: impl Into<String>, value: Gen) {
        self.bindings.insert(name.into(), value);
    }

    /// Value bound to `name`, if any.
    pub fn lookup(&self, name: &str) -> Option<&Gen> {
        self.bindings.get(name)
    }

    /// Parse `text` without evaluating it.
    ///
    /// The diagnostic slot is reset on every call and holds the first error
    /// of the latest parse, which is also written to the log sink.
    pub fn parse(&mut self, text: &str) -> Result<Gen, ParseDiagnostic> {
        self.parse_error = None;
        sigma_parse::parse(text).map_err(|diag| {
            self.log(format_args!("{diag}"));
            self.parse_error = Some(diag.clone());
            diag
        })
    }

    /// First error of the most recent `parse`, if it failed.
    pub fn first_parse_error(&self) -> Option<&ParseDiagnostic> {
        self.parse_error.as_ref()
    }

    /// Evaluate an already parsed expression.
    pub fn eval(&mut self, expr: &Gen) -> GenResult {
        crate::eval::eval(expr, self)
    }

    /// Parse then evaluate.
    #[tracing::instrument(level = "debug", skip(self), err)]
    pub fn eval_str(&mut self, text: &str) -> GenResult {
        let expr = self.parse(text)?;
        self.eval(&expr)
    }

    /// Zero test: exact zero, an inexact number within epsilon, or an
    /// expression that simplifies to zero.
    pub fn is_zero(&self, value: &Gen) -> Result<bool, Fault> {
        if value.is_exact() {
            return Ok(value.is_exact_zero());
        }
        if let Some(x) = value.to_f64() {
            return Ok(x.abs() <= self.config.epsilon);
        }
        match value {
            Gen::Vect(items) => items.iter().try_fold(true, |all, item| {
                Ok(all && self.is_zero(item)?)
            }),
            Gen::Symb(_) => Ok(simplify(value)?.is_exact_zero()),
            _ => Ok(false),
        }
    }

    /// The random source used by `rand`.
    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Make the random source deterministic.
    #[cfg(test)]
    pub(crate) fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("bindings", &self.bindings.len())
            .field("config", &self.config)
            .field("parse_error", &self.parse_error)
            .finish_non_exhaustive()
    }
}

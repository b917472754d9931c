//! Expression evaluation
//!
//! Plotting only needs a way to turn formula text plus variable bindings into
//! a number. Anything implementing [`Evaluator`] can be plugged in; the
//! binary ships with [`Calculator`], which parses arbitrary formulas with
//! `evalexpr` and caches the operator trees.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::f64::consts::{E, PI};

use evalexpr::{
    build_operator_tree, ContextWithMutableFunctions, ContextWithMutableVariables, Function,
    HashMapContext, Node, Value,
};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("unknown variable '{0}'")]
    UnknownVariable(String),

    #[error("cannot parse '{expr}': {reason}")]
    Parse { expr: String, reason: String },

    #[error("evaluation failed: {0}")]
    Evaluation(String),

    #[error("empty expression")]
    Empty,
}

/// Named variable bindings for one evaluation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scope {
    values: BTreeMap<String, f64>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: f64) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: &str, value: f64) {
        self.values.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Like [`Scope::get`] but reports the missing name
    pub fn var(&self, name: &str) -> Result<f64, EvalError> {
        self.get(name)
            .ok_or_else(|| EvalError::UnknownVariable(name.to_string()))
    }
}

pub trait Evaluator {
    fn evaluate(&self, expr: &str, scope: &Scope) -> Result<f64, EvalError>;
}

impl<F> Evaluator for F
where
    F: Fn(&str, &Scope) -> Result<f64, EvalError>,
{
    fn evaluate(&self, expr: &str, scope: &Scope) -> Result<f64, EvalError> {
        self(expr, scope)
    }
}

/// Evaluate for plotting: errors and non-finite results both mean "no point"
pub fn sample<E: Evaluator + ?Sized>(evaluator: &E, expr: &str, scope: &Scope) -> Option<f64> {
    match evaluator.evaluate(expr, scope) {
        Ok(value) if value.is_finite() => Some(value),
        Ok(_) => None,
        Err(err) => {
            log::trace!("'{expr}' gave no point: {err}");
            None
        }
    }
}

/// Single-argument functions available in formulas. `log` is the natural log.
const FUNCTIONS: &[(&str, fn(f64) -> f64)] = &[
    ("sin", f64::sin),
    ("cos", f64::cos),
    ("tan", f64::tan),
    ("asin", f64::asin),
    ("acos", f64::acos),
    ("atan", f64::atan),
    ("sinh", f64::sinh),
    ("cosh", f64::cosh),
    ("tanh", f64::tanh),
    ("sqrt", f64::sqrt),
    ("cbrt", f64::cbrt),
    ("exp", f64::exp),
    ("ln", f64::ln),
    ("log", f64::ln),
    ("log10", f64::log10),
    ("abs", f64::abs),
    ("sign", f64::signum),
    ("floor", f64::floor),
    ("ceil", f64::ceil),
    ("round", f64::round),
];

const CONSTANTS: &[(&str, f64)] = &[("pi", PI), ("PI", PI), ("e", E)];

fn constant(name: &str) -> Option<f64> {
    CONSTANTS.iter().find(|(n, _)| *n == name).map(|(_, v)| *v)
}

/// Function or constant name understood by [`Calculator`]
pub fn is_builtin(name: &str) -> bool {
    constant(name).is_some() || FUNCTIONS.iter().any(|(n, _)| *n == name)
}

pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Rewrite integer literals as floats so `1/2` means one half
fn promote_integers(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    let mut chars = text.chars().peekable();
    let mut previous: Option<char> = None;
    while let Some(c) = chars.next() {
        out.push(c);
        let in_token = previous.is_some_and(|p| p.is_ascii_alphanumeric() || p == '_' || p == '.');
        if c.is_ascii_digit() && !in_token {
            while let Some(&d) = chars.peek().filter(|d| d.is_ascii_digit()) {
                out.push(d);
                chars.next();
            }
            let continues = chars
                .peek()
                .is_some_and(|&d| d == '.' || d.is_ascii_alphanumeric() || d == '_');
            if !continues {
                out.push_str(".0");
            }
            previous = Some('0');
        } else {
            previous = Some(c);
        }
    }
    out
}

#[derive(Debug)]
struct Compiled {
    tree: Node,
    /// Variables the tree reads, constants excluded
    variables: Vec<String>,
}

fn compile(expr: &str) -> Result<Compiled, EvalError> {
    let tree = build_operator_tree(&promote_integers(expr)).map_err(|err| EvalError::Parse {
        expr: expr.to_string(),
        reason: err.to_string(),
    })?;
    let mut variables: Vec<String> = tree
        .iter_variable_identifiers()
        .filter(|name| constant(name).is_none())
        .map(str::to_string)
        .collect();
    variables.sort();
    variables.dedup();
    Ok(Compiled { tree, variables })
}

/// Formula evaluator backed by `evalexpr`. Parsed formulas are cached by
/// their text, so tracing a curve parses it once.
pub struct Calculator {
    compiled: RefCell<HashMap<String, Result<Compiled, EvalError>>>,
    context: RefCell<HashMapContext>,
}

impl Calculator {
    pub fn new() -> Self {
        let mut context = HashMapContext::new();
        for &(name, f) in FUNCTIONS {
            let function = Function::new(move |argument: &Value| Ok(Value::Float(f(argument.as_number()?))));
            if let Err(err) = context.set_function(name.to_string(), function) {
                log::warn!("Could not register '{name}': {err}");
            }
        }
        for &(name, value) in CONSTANTS {
            if let Err(err) = context.set_value(name.to_string(), Value::Float(value)) {
                log::warn!("Could not bind '{name}': {err}");
            }
        }
        Self {
            compiled: RefCell::new(HashMap::new()),
            context: RefCell::new(context),
        }
    }

    /// Number of distinct formulas parsed so far
    pub fn cached(&self) -> usize {
        self.compiled.borrow().len()
    }
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Calculator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Calculator")
            .field("cached", &self.cached())
            .finish()
    }
}

impl Evaluator for Calculator {
    fn evaluate(&self, expr: &str, scope: &Scope) -> Result<f64, EvalError> {
        let key = expr.trim();
        if key.is_empty() {
            return Err(EvalError::Empty);
        }
        let mut cache = self.compiled.borrow_mut();
        let compiled = cache
            .entry(key.to_string())
            .or_insert_with_key(|key| compile(key))
            .as_ref()
            .map_err(Clone::clone)?;

        let mut context = self.context.borrow_mut();
        for name in &compiled.variables {
            let value = scope.var(name)?;
            context
                .set_value(name.clone(), Value::Float(value))
                .map_err(|err| EvalError::Evaluation(err.to_string()))?;
        }
        compiled
            .tree
            .eval_number_with_context(&*context)
            .map_err(|err| EvalError::Evaluation(err.to_string()))
    }
}

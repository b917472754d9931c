//! Free parameters of the plotted expressions
//!
//! Any name in an expression that is not `x`, `y` or a known function or
//! constant becomes a parameter with its own slider.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::expression::{is_builtin, Scope};

/// Plot variables and evaluator built-ins never become parameters
fn is_reserved(name: &str) -> bool {
    matches!(name, "x" | "y") || is_builtin(name)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub value: f64,
    pub min: f64,
    pub max: f64,
}

impl Default for Parameter {
    fn default() -> Self {
        Self {
            value: 1.0,
            min: -10.0,
            max: 10.0,
        }
    }
}

/// Names in `expr` that would become parameters
pub fn free_names(expr: &str) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    let mut chars = expr.char_indices().peekable();
    while let Some((start, c)) = chars.next() {
        if c.is_ascii_digit() || c == '.' {
            // skip the rest of a number so "2e3" is not read as a name
            while let Some(&(_, d)) = chars.peek() {
                if d.is_ascii_alphanumeric() || d == '.' {
                    chars.next();
                } else {
                    break;
                }
            }
            continue;
        }
        if !c.is_ascii_alphabetic() {
            continue;
        }
        let mut end = start + c.len_utf8();
        while let Some(&(i, d)) = chars.peek() {
            if d.is_ascii_alphanumeric() || d == '_' {
                end = i + d.len_utf8();
                chars.next();
            } else {
                break;
            }
        }
        let name = &expr[start..end];
        if !is_reserved(name) {
            names.insert(name.to_string());
        }
    }
    names
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    values: BTreeMap<String, Parameter>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add parameters newly referenced by `expressions` and drop the ones no
    /// expression uses any more. Existing values are kept.
    pub fn sync<'a, I>(&mut self, expressions: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let used: BTreeSet<String> = expressions.into_iter().flat_map(free_names).collect();
        self.values.retain(|name, _| used.contains(name));
        for name in used {
            if !self.values.contains_key(&name) {
                log::debug!("New parameter '{name}'");
                self.values.insert(name, Parameter::default());
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.values.get(name)
    }

    /// Set a parameter's value, clamped to its range. Returns false for unknown names.
    pub fn set(&mut self, name: &str, value: f64) -> bool {
        match self.values.get_mut(name) {
            Some(parameter) => {
                parameter.value = value.clamp(parameter.min, parameter.max);
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Parameter)> {
        self.values.iter().map(|(name, p)| (name.as_str(), p))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut Parameter)> {
        self.values.iter_mut().map(|(name, p)| (name.as_str(), p))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Scope binding every parameter to its current value
    pub fn scope(&self) -> Scope {
        let mut scope = Scope::new();
        for (name, parameter) in &self.values {
            scope.set(name, parameter.value);
        }
        scope
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_names() {
        let names: Vec<String> = free_names("a*sin(b*x) + cos(y) - pi").into_iter().collect();
        assert_eq!(names, ["a", "b"]);
        assert!(free_names("2e3*x + 1.5").is_empty());
        assert_eq!(free_names("(x/a)^2 + (y/b)^2 = 1").len(), 2);
        assert!(free_names("k_1 + x").contains("k_1"));
    }

    #[test]
    fn test_sync_adds_and_removes() {
        let mut params = Parameters::new();
        params.sync(["a*x^2", "x^2 + y^2 = r^2"]);
        assert_eq!(params.len(), 2);
        assert_eq!(params.get("r"), Some(&Parameter::default()));

        params.set("a", 3.0);
        params.sync(["a*x^2"]);
        assert_eq!(params.len(), 1);
        assert!(params.get("r").is_none());
        assert_eq!(params.get("a").map(|p| p.value), Some(3.0));
    }

    #[test]
    fn test_set_clamps() {
        let mut params = Parameters::new();
        params.sync(["a*x"]);
        assert!(params.set("a", 25.0));
        assert_eq!(params.get("a").unwrap().value, 10.0);
        assert!(!params.set("q", 1.0));
        assert_eq!(params.scope().get("a"), Some(10.0));
    }
}

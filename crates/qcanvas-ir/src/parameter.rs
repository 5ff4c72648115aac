//! Rotation angles: bound constants or free symbols awaiting a value.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

/// A symbolic or concrete rotation angle.
///
/// Ansatz templates are built with [`ParameterExpression::Symbol`] leaves and
/// later bound to constants. The compiler produces sums and negations when it
/// rewrites rotations into a native basis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParameterExpression {
    /// A constant numeric value.
    Constant(f64),
    /// A named free parameter.
    Symbol(String),
    /// The constant π.
    Pi,
    /// Negation.
    Neg(Box<ParameterExpression>),
    /// Addition.
    Add(Box<ParameterExpression>, Box<ParameterExpression>),
}

impl ParameterExpression {
    /// Create a constant parameter.
    pub fn constant(value: f64) -> Self {
        ParameterExpression::Constant(value)
    }

    /// Create a symbolic parameter.
    pub fn symbol(name: impl Into<String>) -> Self {
        ParameterExpression::Symbol(name.into())
    }

    /// Create a π constant.
    pub fn pi() -> Self {
        ParameterExpression::Pi
    }

    /// Check if this expression contains any symbols.
    pub fn is_symbolic(&self) -> bool {
        match self {
            ParameterExpression::Symbol(_) => true,
            ParameterExpression::Constant(_) | ParameterExpression::Pi => false,
            ParameterExpression::Neg(e) => e.is_symbolic(),
            ParameterExpression::Add(a, b) => a.is_symbolic() || b.is_symbolic(),
        }
    }

    /// Try to evaluate as a concrete f64 value.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParameterExpression::Constant(v) => Some(*v),
            ParameterExpression::Symbol(_) => None,
            ParameterExpression::Pi => Some(PI),
            ParameterExpression::Neg(e) => e.as_f64().map(|v| -v),
            ParameterExpression::Add(a, b) => Some(a.as_f64()? + b.as_f64()?),
        }
    }

    /// Append symbol names to `out` in left-to-right order, skipping repeats.
    pub fn collect_symbols(&self, out: &mut Vec<String>) {
        match self {
            ParameterExpression::Constant(_) | ParameterExpression::Pi => {}
            ParameterExpression::Symbol(name) => {
                if !out.iter().any(|s| s == name) {
                    out.push(name.clone());
                }
            }
            ParameterExpression::Neg(e) => e.collect_symbols(out),
            ParameterExpression::Add(a, b) => {
                a.collect_symbols(out);
                b.collect_symbols(out);
            }
        }
    }

    /// Substitute every symbol found in `values`, folding the result to a
    /// constant when nothing symbolic remains.
    pub fn bind(&self, values: &FxHashMap<String, f64>) -> Self {
        let bound = match self {
            ParameterExpression::Symbol(name) => match values.get(name) {
                Some(v) => ParameterExpression::Constant(*v),
                None => self.clone(),
            },
            ParameterExpression::Constant(_) | ParameterExpression::Pi => self.clone(),
            ParameterExpression::Neg(e) => ParameterExpression::Neg(Box::new(e.bind(values))),
            ParameterExpression::Add(a, b) => {
                ParameterExpression::Add(Box::new(a.bind(values)), Box::new(b.bind(values)))
            }
        };
        bound.simplify()
    }

    /// Fold constant subexpressions.
    pub fn simplify(&self) -> Self {
        if let Some(v) = self.as_f64() {
            return ParameterExpression::Constant(v);
        }
        match self {
            ParameterExpression::Neg(e) => ParameterExpression::Neg(Box::new(e.simplify())),
            ParameterExpression::Add(a, b) => {
                ParameterExpression::Add(Box::new(a.simplify()), Box::new(b.simplify()))
            }
            _ => self.clone(),
        }
    }
}

impl fmt::Display for ParameterExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterExpression::Constant(v) => write!(f, "{v}"),
            ParameterExpression::Symbol(name) => write!(f, "{name}"),
            ParameterExpression::Pi => write!(f, "π"),
            ParameterExpression::Neg(e) => write!(f, "-({e})"),
            ParameterExpression::Add(a, b) => write!(f, "({a} + {b})"),
        }
    }
}

impl From<f64> for ParameterExpression {
    fn from(value: f64) -> Self {
        ParameterExpression::Constant(value)
    }
}

impl std::ops::Add for ParameterExpression {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        ParameterExpression::Add(Box::new(self), Box::new(rhs))
    }
}

impl std::ops::Neg for ParameterExpression {
    type Output = Self;

    fn neg(self) -> Self::Output {
        ParameterExpression::Neg(Box::new(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_is_unbound() {
        let p = ParameterExpression::symbol("θ[0]");
        assert!(p.is_symbolic());
        assert_eq!(p.as_f64(), None);
    }

    #[test]
    fn test_bind_folds_to_constant() {
        let p = ParameterExpression::symbol("θ[1]") + ParameterExpression::pi();
        let mut values = FxHashMap::default();
        values.insert("θ[1]".to_string(), 1.0);

        let bound = p.bind(&values);
        assert!(!bound.is_symbolic());
        assert!(matches!(bound, ParameterExpression::Constant(_)));
        assert!((bound.as_f64().unwrap() - (1.0 + PI)).abs() < 1e-12);
    }

    #[test]
    fn test_bind_leaves_unknown_symbols() {
        let p = -ParameterExpression::symbol("a");
        let bound = p.bind(&FxHashMap::default());
        assert!(bound.is_symbolic());
    }

    #[test]
    fn test_collect_symbols_in_order() {
        let p = ParameterExpression::symbol("b")
            + (ParameterExpression::symbol("a") + ParameterExpression::symbol("b"));
        let mut out = Vec::new();
        p.collect_symbols(&mut out);
        assert_eq!(out, vec!["b".to_string(), "a".to_string()]);
    }
}

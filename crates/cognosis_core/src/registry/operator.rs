//! Built-in logical operators.
//!
//! # Responsibility
//! - Define the closed operator set and the behavior bound to each member.
//! - Own the stable numeric id and canonical key of every operator.
//!
//! # Invariants
//! - Ids are never reused or renumbered; a new operator takes a new id.
//! - `apply` checks arity before evaluating and never panics.

use super::{RegistryError, RegistryResult};
use crate::model::value::Value;

/// Closed set of executable operators known to every process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Operator {
    Reflexivity,
    Symmetry,
    Transitivity,
    Transparency,
    Top,
    Bottom,
    IfElseA,
    Negation,
    Conjunction,
    Disjunction,
    Implication,
    Biconditional,
    Nor,
    Nand,
    Contrapositive,
}

impl Operator {
    /// Every built-in operator, ordered by id.
    pub const ALL: [Operator; 15] = [
        Self::Reflexivity,
        Self::Symmetry,
        Self::Transitivity,
        Self::Transparency,
        Self::Top,
        Self::Bottom,
        Self::IfElseA,
        Self::Negation,
        Self::Conjunction,
        Self::Disjunction,
        Self::Implication,
        Self::Biconditional,
        Self::Nor,
        Self::Nand,
        Self::Contrapositive,
    ];

    /// Stable wire id.
    pub fn id(self) -> u32 {
        match self {
            Self::Reflexivity => 1,
            Self::Symmetry => 2,
            Self::Transitivity => 3,
            Self::Transparency => 4,
            Self::Top => 5,
            Self::Bottom => 6,
            Self::IfElseA => 7,
            Self::Negation => 8,
            Self::Conjunction => 9,
            Self::Disjunction => 10,
            Self::Implication => 11,
            Self::Biconditional => 12,
            Self::Nor => 13,
            Self::Nand => 14,
            Self::Contrapositive => 15,
        }
    }

    /// Canonical name key.
    pub fn key(self) -> &'static str {
        match self {
            Self::Reflexivity => "reflexivity",
            Self::Symmetry => "symmetry",
            Self::Transitivity => "transitivity",
            Self::Transparency => "transparency",
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::IfElseA => "if_else_a",
            Self::Negation => "negation",
            Self::Conjunction => "conjunction",
            Self::Disjunction => "disjunction",
            Self::Implication => "implication",
            Self::Biconditional => "biconditional",
            Self::Nor => "nor",
            Self::Nand => "nand",
            Self::Contrapositive => "contrapositive",
        }
    }

    /// Connective glyph used as a case-base key, if the operator has one.
    pub fn symbol(self) -> Option<&'static str> {
        match self {
            Self::Top => Some("⊤"),
            Self::Bottom => Some("⊥"),
            Self::IfElseA => Some("a"),
            Self::Negation => Some("¬"),
            Self::Conjunction => Some("∧"),
            Self::Disjunction => Some("∨"),
            Self::Implication => Some("→"),
            Self::Biconditional => Some("↔"),
            Self::Nor => Some("¬∨"),
            Self::Nand => Some("¬∧"),
            Self::Contrapositive => Some("contrapositive"),
            Self::Reflexivity | Self::Symmetry | Self::Transitivity | Self::Transparency => None,
        }
    }

    /// Resolves a connective glyph back to its operator.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|operator| operator.symbol() == Some(symbol))
    }

    /// Number of arguments `apply` expects.
    pub fn arity(self) -> usize {
        match self {
            Self::Reflexivity | Self::Negation => 1,
            Self::Transitivity | Self::Transparency => 3,
            _ => 2,
        }
    }

    /// Evaluates the operator over `args`.
    ///
    /// Transparency expects `[f, x, y]` where `f` is an operator value of
    /// arity 2; it yields `Value::Null` when `x != y`.
    ///
    /// # Errors
    /// - `ArityMismatch` when `args.len()` differs from [`Operator::arity`].
    /// - `NotCallable` when transparency receives a non-binary callee.
    #[allow(clippy::eq_op)] // reflexivity must observe NaN != NaN
    pub fn apply(self, args: &[Value]) -> RegistryResult<Value> {
        if args.len() != self.arity() {
            return Err(RegistryError::ArityMismatch {
                operator: self.key(),
                expected: self.arity(),
                actual: args.len(),
            });
        }

        let value = match (self, args) {
            (Self::Reflexivity, [x]) => Value::Bool(x == x),
            (Self::Symmetry, [x, y]) => Value::Bool(x == y),
            (Self::Transitivity, [x, y, z]) => Value::Bool(x == y && y == z && x == z),
            (Self::Transparency, [f, x, y]) => {
                let callee = match f {
                    Value::Operator(callee) if callee.arity() == 2 => *callee,
                    other => return Err(RegistryError::NotCallable(other.type_name())),
                };
                transparent(|a, b| callee.apply(&[a.clone(), b.clone()]), x, y)
                    .transpose()?
                    .unwrap_or(Value::Null)
            }
            (Self::Top, [x, _]) => x.clone(),
            (Self::Bottom, [_, y]) => y.clone(),
            (Self::IfElseA, [a, b]) => {
                if a.is_truthy() {
                    a.clone()
                } else {
                    b.clone()
                }
            }
            (Self::Negation, [a]) => Value::Bool(!a.is_truthy()),
            (Self::Conjunction, [a, b]) => Value::Bool(a.is_truthy() && b.is_truthy()),
            (Self::Disjunction, [a, b]) => Value::Bool(a.is_truthy() || b.is_truthy()),
            (Self::Implication, [a, b]) => Value::Bool(!a.is_truthy() || b.is_truthy()),
            (Self::Biconditional, [a, b]) => {
                let (a, b) = (a.is_truthy(), b.is_truthy());
                Value::Bool((a && b) || (!a && !b))
            }
            (Self::Nor, [a, b]) => Value::Bool(!(a.is_truthy() || b.is_truthy())),
            (Self::Nand, [a, b]) => Value::Bool(!(a.is_truthy() && b.is_truthy())),
            (Self::Contrapositive, [a, b]) => Value::Bool(!b.is_truthy() || !a.is_truthy()),
            _ => {
                return Err(RegistryError::ArityMismatch {
                    operator: self.key(),
                    expected: self.arity(),
                    actual: args.len(),
                })
            }
        };

        Ok(value)
    }
}

/// Transparency rule for arbitrary callables: `Some(f(x, y))` when `x == y`.
pub fn transparent<T, F>(f: F, x: &Value, y: &Value) -> Option<T>
where
    F: FnOnce(&Value, &Value) -> T,
{
    if x == y {
        Some(f(x, y))
    } else {
        None
    }
}

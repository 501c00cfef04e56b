//! Bundle of relational operators plus a symbol-keyed case base.
//!
//! # Invariants
//! - Every slot and case-base entry is a registry `Operator`, so a theory can
//!   always be encoded by id.
//! - The case base is ordered by key; encoding order never depends on
//!   insertion order.

use super::atom::{Atom, AtomKind, Expression};
use super::value::Value;
use crate::codec::{AtomCodec, CodecResult};
use crate::registry::{Operator, RegistryResult};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// Connectives installed in a default case base.
const DEFAULT_CASES: [Operator; 11] = [
    Operator::Top,
    Operator::Bottom,
    Operator::IfElseA,
    Operator::Negation,
    Operator::Conjunction,
    Operator::Disjunction,
    Operator::Implication,
    Operator::Biconditional,
    Operator::Nor,
    Operator::Nand,
    Operator::Contrapositive,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormalTheory {
    pub reflexivity: Operator,
    pub symmetry: Operator,
    pub transitivity: Operator,
    pub transparency: Operator,
    case_base: BTreeMap<String, Operator>,
}

impl FormalTheory {
    /// Theory with the default slots and no case-base entries.
    pub fn without_cases() -> Self {
        Self::from_parts(
            Operator::Reflexivity,
            Operator::Symmetry,
            Operator::Transitivity,
            Operator::Transparency,
            BTreeMap::new(),
        )
    }

    pub fn from_parts(
        reflexivity: Operator,
        symmetry: Operator,
        transitivity: Operator,
        transparency: Operator,
        case_base: BTreeMap<String, Operator>,
    ) -> Self {
        Self {
            reflexivity,
            symmetry,
            transitivity,
            transparency,
            case_base,
        }
    }

    /// The four named slots in wire order.
    pub fn slots(&self) -> [Operator; 4] {
        [
            self.reflexivity,
            self.symmetry,
            self.transitivity,
            self.transparency,
        ]
    }

    pub fn case_base(&self) -> &BTreeMap<String, Operator> {
        &self.case_base
    }

    /// Looks up the operator bound to `key`.
    pub fn case(&self, key: &str) -> Option<Operator> {
        self.case_base.get(key).copied()
    }

    /// Binds `key` to `operator`, returning the previous binding.
    pub fn insert_case(&mut self, key: impl Into<String>, operator: Operator) -> Option<Operator> {
        self.case_base.insert(key.into(), operator)
    }

    pub fn remove_case(&mut self, key: &str) -> Option<Operator> {
        self.case_base.remove(key)
    }
}

impl Default for FormalTheory {
    /// Default slots plus the built-in connective case base.
    fn default() -> Self {
        let mut theory = Self::without_cases();
        for operator in DEFAULT_CASES {
            if let Some(symbol) = operator.symbol() {
                theory.insert_case(symbol, operator);
            }
        }
        theory
    }
}

impl Display for FormalTheory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "FormalTheory(reflexivity={}, symmetry={}, transitivity={}, transparency={})",
            self.reflexivity.key(),
            self.symmetry.key(),
            self.transitivity.key(),
            self.transparency.key()
        )
    }
}

impl Atom for FormalTheory {
    fn kind(&self) -> AtomKind {
        AtomKind::Theory
    }

    fn encode_with(&self, codec: &AtomCodec<'_>) -> CodecResult<Vec<u8>> {
        codec.encode_theory(self)
    }

    fn decode_with(codec: &AtomCodec<'_>, bytes: &[u8]) -> CodecResult<Self> {
        codec.decode_theory(bytes)
    }

    /// Applies the transparency slot to `args`.
    ///
    /// With the default slot, `args` is `[f, x, y]` and the result is
    /// `Value::Null` when `x != y`.
    fn execute(&self, args: &[Value]) -> RegistryResult<Value> {
        self.transparency.apply(args)
    }

    /// Returns the case-base operator bound to `expression`, or `Unbound`.
    fn parse_expression(&self, expression: &str) -> Expression {
        match self.case(expression) {
            Some(operator) => Expression::Operator(operator),
            None => Expression::Unbound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::FormalTheory;
    use crate::model::atom::{Atom, Expression};
    use crate::model::value::Value;
    use crate::registry::Operator;

    #[test]
    fn default_case_base_has_eleven_connectives() {
        let theory = FormalTheory::default();
        assert_eq!(theory.case_base().len(), 11);
        assert_eq!(theory.case("¬∨"), Some(Operator::Nor));
        assert_eq!(theory.case("contrapositive"), Some(Operator::Contrapositive));
    }

    #[test]
    fn parse_expression_misses_are_unbound() {
        let theory = FormalTheory::default();
        assert_eq!(
            theory.parse_expression("∧"),
            Expression::Operator(Operator::Conjunction)
        );
        assert_eq!(theory.parse_expression("⊕"), Expression::Unbound);
    }

    #[test]
    fn execute_uses_transparency_slot() {
        let theory = FormalTheory::default();
        let result = theory
            .execute(&[
                Value::Operator(Operator::Disjunction),
                Value::from(1),
                Value::from(1),
            ])
            .expect("execute");
        assert_eq!(result, Value::Bool(true));

        let absent = theory
            .execute(&[
                Value::Operator(Operator::Disjunction),
                Value::from(1),
                Value::from(2),
            ])
            .expect("execute");
        assert!(absent.is_null());
    }

    #[test]
    fn tautology_passes_predicate_result_through() {
        let theory = FormalTheory::default();
        assert!(theory.tautology(|| true));
        assert!(!theory.tautology(|| false));
    }

    #[test]
    fn display_names_slots() {
        assert_eq!(
            FormalTheory::default().to_string(),
            "FormalTheory(reflexivity=reflexivity, symmetry=symmetry, transitivity=transitivity, transparency=transparency)"
        );
    }
}

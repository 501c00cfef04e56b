//! Process-wide operator registry.
//!
//! # Responsibility
//! - Map operator keys and wire ids to executable operators, both ways.
//! - Provide the one shared table consulted by every encode/decode call.
//!
//! # Invariants
//! - The id <-> key mapping is a bijection.
//! - The table is built once and never mutated afterwards; reads need no lock.
//! - Misses are surfaced as typed errors, never replaced by a default.

use log::debug;
use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod operator;

pub use operator::{transparent, Operator};

static GLOBAL_REGISTRY: Lazy<OperatorRegistry> = Lazy::new(|| {
    let registry = OperatorRegistry::builtin();
    debug!(
        "event=registry_init module=registry status=ok operators={}",
        registry.len()
    );
    registry
});

pub type RegistryResult<T> = Result<T, RegistryError>;

/// Registry lookup and operator evaluation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    UnknownOperator(String),
    UnknownOperatorId(u32),
    ArityMismatch {
        operator: &'static str,
        expected: usize,
        actual: usize,
    },
    NotCallable(&'static str),
}

impl Display for RegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownOperator(key) => write!(f, "unknown operator key: {key}"),
            Self::UnknownOperatorId(id) => write!(f, "unknown operator id: {id}"),
            Self::ArityMismatch {
                operator,
                expected,
                actual,
            } => write!(
                f,
                "operator `{operator}` expects {expected} argument(s), got {actual}"
            ),
            Self::NotCallable(kind) => write!(f, "value of type {kind} is not a binary operator"),
        }
    }
}

impl Error for RegistryError {}

/// Read-only bidirectional table of built-in operators.
#[derive(Debug, Clone)]
pub struct OperatorRegistry {
    by_id: BTreeMap<u32, Operator>,
    by_key: BTreeMap<&'static str, Operator>,
}

impl OperatorRegistry {
    /// Builds a fresh table holding exactly the built-in operators.
    pub fn builtin() -> Self {
        let mut by_id = BTreeMap::new();
        let mut by_key = BTreeMap::new();
        for operator in Operator::ALL {
            let previous_id = by_id.insert(operator.id(), operator);
            let previous_key = by_key.insert(operator.key(), operator);
            debug_assert!(previous_id.is_none(), "duplicate operator id");
            debug_assert!(previous_key.is_none(), "duplicate operator key");
        }
        Self { by_id, by_key }
    }

    /// Returns the process-wide registry, building it on first use.
    pub fn global() -> &'static OperatorRegistry {
        &GLOBAL_REGISTRY
    }

    /// Resolves a canonical key to its wire id.
    pub fn id_of(&self, key: &str) -> RegistryResult<u32> {
        self.by_key
            .get(key)
            .map(|operator| operator.id())
            .ok_or_else(|| RegistryError::UnknownOperator(key.to_string()))
    }

    /// Resolves a wire id to its executable operator.
    pub fn lookup(&self, id: u32) -> RegistryResult<Operator> {
        self.by_id
            .get(&id)
            .copied()
            .ok_or(RegistryError::UnknownOperatorId(id))
    }

    /// Resolves a wire id to its canonical key.
    pub fn key_of(&self, id: u32) -> RegistryResult<&'static str> {
        self.lookup(id).map(Operator::key)
    }

    /// Resolves a canonical key to its operator.
    pub fn resolve(&self, key: &str) -> RegistryResult<Operator> {
        self.by_key
            .get(key)
            .copied()
            .ok_or_else(|| RegistryError::UnknownOperator(key.to_string()))
    }

    /// Iterates operators in id order.
    pub fn entries(&self) -> impl Iterator<Item = Operator> + '_ {
        self.by_id.values().copied()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

impl Default for OperatorRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

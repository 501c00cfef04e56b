//! Atom domain model.
//!
//! # Responsibility
//! - Define the two atom variants and the operand values operators act on.
//! - Keep the variant set closed behind the `Atom` capability trait.
//!
//! # Invariants
//! - Atoms embed operators only by registry identity, never as opaque code.

pub mod atom;
pub mod atomic_data;
pub mod formal_theory;
pub mod value;

//! Key structures, such as literals and clauses.
//!
//! Most structures are made of a trait to capture the key features of the structure and a 'canonical' implementation of the trait.
//!
//! # Other structures
//!
//! ## Formulas
//!
//! A formula 𝐅 is a sequence of [clauses](clause), interpreted as the conjunction of those clauses.
//! Formulas are kept in the [clause store](crate::cnf).
//! The order of clauses does not matter for satisfiability, though it does matter for the search of explanations.

pub mod atom;
pub mod clause;
pub mod literal;
pub mod valuation;

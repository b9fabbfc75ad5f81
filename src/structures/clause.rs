//! Clauses, aka. a collection of literals, interpreted as the disjunction of those literals.
//!
//! A clause of a [formula](crate::cnf::ClauseList) is a [LiteralSet]: a fixed sequence of literals, immutable once built.
//! Literals are stored as given.
//! In particular, duplicate literals or complementary literals are *not* simplified, this is left to whoever builds the clause.
//!
//! ```rust
//! # use fm_core::structures::clause::{Clause, LiteralSet};
//! # use fm_core::structures::valuation::ValuationVec;
//! let clause = LiteralSet::from([23, -41, -3, 15]);
//!
//! assert_eq!(clause.size(), 4);
//! assert_eq!(clause.as_dimacs(true), " 23 -41 -3  15 0");
//!
//! let mut valuation: ValuationVec = vec![Some(true); 42];
//! valuation[23] = Some(false);
//! valuation[15] = Some(false);
//! valuation[3] = Some(true);
//! assert_eq!(clause.asserts(&valuation), None);
//!
//! valuation[41] = None;
//! assert_eq!(clause.asserts(&valuation), Some(-41));
//! ```
//!
//! - The empty clause is always false (never true).
//! - Single literals are identified with the clause containing that literal (aka. a 'unit' clause --- where the 'unit' is the literal).

use crate::structures::{
    atom::Atom,
    literal::{CLiteral, Literal},
    valuation::Valuation,
};

/// The clause trait.
pub trait Clause {
    /// A string of the clause in DIMACS form, with the terminating `0` as optional.
    fn as_dimacs(&self, zero: bool) -> String;

    /// The literal asserted by the clause on a given valuation, if one such literal exists. \
    /// In detail, returns:
    /// - Some(*l*), if *l* has no value on the given valuation and for every other literal *l'* in the clause the polarity of *l'* conflicts with the value of the atom of *l'*.
    /// - None, otherwise.
    fn asserts(&self, valuation: &impl Valuation) -> Option<CLiteral>;

    /// An iterator over all literals in the clause, in the order given.
    fn literals(&self) -> impl Iterator<Item = CLiteral>;

    /// The number of literals in the clause.
    fn size(&self) -> usize;

    /// An iterator over all atoms in the clause, in the order given.
    fn atoms(&self) -> impl Iterator<Item = Atom>;

    /// Returns whether every literal of the clause is false on the given valuation.
    fn unsatisfiable_on(&self, valuation: &impl Valuation) -> bool;
}

impl Clause for [CLiteral] {
    fn as_dimacs(&self, zero: bool) -> String {
        let mut dimacs_string = String::new();
        for literal in self.literals() {
            match literal.polarity() {
                true => dimacs_string.push_str(format!(" {literal} ").as_str()),
                false => dimacs_string.push_str(format!("{literal} ").as_str()),
            };
        }
        if zero {
            dimacs_string += "0";
            dimacs_string
        } else {
            dimacs_string.pop();
            dimacs_string
        }
    }

    fn asserts(&self, valuation: &impl Valuation) -> Option<CLiteral> {
        let mut asserted_literal = None;
        for literal in self.literals() {
            match valuation.literal_value(literal) {
                Some(true) => return None,
                Some(false) => continue,
                None if asserted_literal.is_none() => asserted_literal = Some(literal),
                None => return None,
            }
        }
        asserted_literal
    }

    fn literals(&self) -> impl Iterator<Item = CLiteral> {
        self.iter().copied()
    }

    fn size(&self) -> usize {
        self.len()
    }

    fn atoms(&self) -> impl Iterator<Item = Atom> {
        self.iter().map(|literal| literal.atom())
    }

    fn unsatisfiable_on(&self, valuation: &impl Valuation) -> bool {
        self.literals()
            .all(|literal| valuation.literal_value(literal) == Some(false))
    }
}

/// The implementation of a (mutable, under construction) clause as a vector of integers.
pub type IntClause = Vec<CLiteral>;

/// A clause of a formula.
///
/// The literals are fixed on construction, and the set dereferences to the slice of its literals.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LiteralSet {
    literals: Box<[CLiteral]>,
}

impl LiteralSet {
    pub fn new(literals: impl IntoIterator<Item = CLiteral>) -> Self {
        LiteralSet {
            literals: literals.into_iter().collect(),
        }
    }

    /// The literals of the set, in the order given on construction.
    pub fn as_slice(&self) -> &[CLiteral] {
        &self.literals
    }

    /// Whether the literal occurs in the set.
    pub fn contains(&self, literal: CLiteral) -> bool {
        self.literals.contains(&literal)
    }

    /// Whether some literal of the set is over the atom.
    pub fn mentions(&self, atom: Atom) -> bool {
        self.literals.iter().any(|literal| literal.atom() == atom)
    }
}

impl std::ops::Deref for LiteralSet {
    type Target = [CLiteral];

    fn deref(&self) -> &Self::Target {
        &self.literals
    }
}

impl From<IntClause> for LiteralSet {
    fn from(value: IntClause) -> Self {
        LiteralSet {
            literals: value.into_boxed_slice(),
        }
    }
}

impl<const N: usize> From<[CLiteral; N]> for LiteralSet {
    fn from(value: [CLiteral; N]) -> Self {
        LiteralSet::new(value)
    }
}

impl std::fmt::Display for LiteralSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_dimacs(false).trim())
    }
}

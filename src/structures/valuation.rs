/*!
(Partial) valuations of atoms.

A valuation is a vector indexed by atoms, where index `0` is unused.
An atom without a value is mapped to `None`.

```rust
# use fm_core::structures::valuation::{Valuation, ValuationVec};
let mut valuation: ValuationVec = vec![None; 4];
valuation[2] = Some(false);

assert_eq!(valuation.value_of(2), Some(false));
assert_eq!(valuation.value_of(3), None);
assert_eq!(valuation.literal_value(-2), Some(true));
```
*/

use crate::structures::{
    atom::Atom,
    literal::{CLiteral, Literal},
};

/// The canonical implementation of a valuation.
pub type ValuationVec = Vec<Option<bool>>;

pub trait Valuation {
    /// The value of an atom, if the atom has a value.
    /// Atoms outside the valuation have no value.
    fn value_of(&self, atom: Atom) -> Option<bool>;

    /// The value of a literal, if the atom of the literal has a value.
    fn literal_value(&self, literal: CLiteral) -> Option<bool> {
        self.value_of(literal.atom())
            .map(|value| value == literal.polarity())
    }

    /// The count of atoms the valuation may value, excluding the unused index `0`.
    fn atom_count(&self) -> usize;
}

impl Valuation for ValuationVec {
    fn value_of(&self, atom: Atom) -> Option<bool> {
        self.get(atom as usize).copied().flatten()
    }

    fn atom_count(&self) -> usize {
        self.len().saturating_sub(1)
    }
}

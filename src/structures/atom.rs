/*!
(The internal representation of) an atom (aka. a 'variable').

Each atom is a positive u32.
`0` is not an atom, as in DIMACS the integer `0` terminates a clause and has no sign.

Within a [compiled formula](crate::cnf::Cnf) each feature of a model is given an atom, and the name of the feature is kept in the [variable map](crate::cnf::VariableMap).

```rust
# use fm_core::structures::atom::{Atom, ATOM_MAX};
let atoms = (1..5).collect::<Vec<Atom>>();
assert!(atoms.iter().all(|atom| *atom <= ATOM_MAX));
```
*/

/// An atom, aka. a 'variable'.
pub type Atom = u32;

/// The maximum instance of an atom, bounded by the integer representation of literals.
pub const ATOM_MAX: Atom = i32::MAX.unsigned_abs();

/*!
The clause store.

A formula in conjunctive normal form is kept as a [ClauseList], an ordered sequence of [LiteralSet]s.
The order of clauses has no bearing on satisfiability, though it is used by [comparators](comparator) and the search for explanations, so clauses keep their position once added.

A [Cnf] bundles a clause list with:
- A [VariableMap] from atoms to names (of features, typically).
- An [origin](ClauseOrigin) for each clause, recording the part of a model the clause was compiled from.

A compiled formula is owned by whoever asked for the compilation and is rebuilt whenever the source model changes.

# Example

```rust
# use fm_core::cnf::{Cnf, ClauseOrigin};
# use fm_core::structures::clause::LiteralSet;
let mut cnf = Cnf::default();
let a = cnf.variables.fresh_atom("A").unwrap() as i32;
let b = cnf.variables.fresh_atom("B").unwrap() as i32;

let key = cnf.add_clause(LiteralSet::from([-b, a]), ClauseOrigin::Input);

assert_eq!(key, 0);
assert_eq!(cnf.clauses.total_literals(), 2);
assert_eq!(cnf.describe(key), "¬B ∨ A");
```
*/

pub mod comparator;
mod dimacs;

use std::collections::{BTreeSet, HashMap};

use crate::{
    structures::{
        atom::Atom,
        clause::{Clause, LiteralSet},
        literal::{CLiteral, Literal},
    },
    types::err,
};

/// The index of a clause in a [ClauseList].
pub type ClauseIndex = usize;

/// An ordered sequence of clauses, interpreted as their conjunction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClauseList {
    clauses: Vec<LiteralSet>,
}

impl ClauseList {
    pub fn new() -> Self {
        ClauseList::default()
    }

    /// Appends a clause, returning the index of the clause.
    pub fn push(&mut self, clause: LiteralSet) -> ClauseIndex {
        self.clauses.push(clause);
        self.clauses.len() - 1
    }

    pub fn get(&self, index: ClauseIndex) -> Option<&LiteralSet> {
        self.clauses.get(index)
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LiteralSet> {
        self.clauses.iter()
    }

    pub fn as_slice(&self) -> &[LiteralSet] {
        &self.clauses
    }

    /// The sum of the lengths of each clause.
    pub fn total_literals(&self) -> usize {
        self.clauses.iter().map(|clause| clause.size()).sum()
    }

    /// All atoms which occur in some clause, in ascending order.
    pub fn atoms(&self) -> BTreeSet<Atom> {
        self.clauses.iter().flat_map(|clause| clause.atoms()).collect()
    }

    /// The largest atom occurring in some clause, or 0 if there are no atoms.
    pub fn max_atom(&self) -> Atom {
        self.clauses
            .iter()
            .flat_map(|clause| clause.atoms())
            .max()
            .unwrap_or(0)
    }

    /// The clauses at the given indicies, in the order of the indicies.
    /// Indicies outside the list are skipped.
    pub fn select<'a>(
        &'a self,
        indicies: &'a [ClauseIndex],
    ) -> impl Iterator<Item = &'a LiteralSet> + 'a {
        indicies.iter().filter_map(|index| self.clauses.get(*index))
    }
}

impl FromIterator<LiteralSet> for ClauseList {
    fn from_iter<T: IntoIterator<Item = LiteralSet>>(iter: T) -> Self {
        ClauseList {
            clauses: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<LiteralSet>> for ClauseList {
    fn from(clauses: Vec<LiteralSet>) -> Self {
        ClauseList { clauses }
    }
}

/// A map between atoms and names.
///
/// Atoms are handed out in sequence from 1 by [fresh_atom](VariableMap::fresh_atom), though an atom may also be named directly (as when reading DIMACS, where the atoms are fixed by the input).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariableMap {
    /// Names indexed by atom, with index `0` unused.
    names: Vec<Option<String>>,

    atoms: HashMap<String, Atom>,
}

impl Default for VariableMap {
    fn default() -> Self {
        VariableMap {
            names: vec![None],
            atoms: HashMap::default(),
        }
    }
}

impl VariableMap {
    /// A fresh atom for the given name.
    pub fn fresh_atom(&mut self, name: &str) -> Result<Atom, err::CompileError> {
        if self.atoms.contains_key(name) {
            return Err(err::CompileError::DuplicateFeature(name.to_owned()));
        }
        let atom = self.names.len() as Atom;
        self.names.push(Some(name.to_owned()));
        self.atoms.insert(name.to_owned(), atom);
        Ok(atom)
    }

    /// Names an atom, extending the map as required.
    /// Any previous name of the atom is replaced.
    pub fn name_atom(&mut self, atom: Atom, name: &str) {
        self.reserve(atom);
        if let Some(old) = self.names[atom as usize].replace(name.to_owned()) {
            self.atoms.remove(&old);
        }
        self.atoms.insert(name.to_owned(), atom);
    }

    /// Extends the map so the atom is within bounds, without a name.
    pub fn reserve(&mut self, atom: Atom) {
        if self.names.len() <= atom as usize {
            self.names.resize(atom as usize + 1, None);
        }
    }

    pub fn atom_of(&self, name: &str) -> Option<Atom> {
        self.atoms.get(name).copied()
    }

    pub fn name_of(&self, atom: Atom) -> Option<&str> {
        self.names.get(atom as usize).and_then(|name| name.as_deref())
    }

    /// The largest atom known to the map.
    pub fn atom_count(&self) -> usize {
        self.names.len() - 1
    }

    /// Named atoms, in ascending order of atom.
    pub fn named(&self) -> impl Iterator<Item = (Atom, &str)> {
        self.names
            .iter()
            .enumerate()
            .filter_map(|(atom, name)| name.as_deref().map(|name| (atom as Atom, name)))
    }

    /// The literal of a name with the given polarity.
    pub fn literal(&self, name: &str, polarity: bool) -> Option<CLiteral> {
        self.atom_of(name).map(|atom| CLiteral::new(atom, polarity))
    }

    /// The literal written with the name of its atom (or the atom, if unnamed) and `¬` for negation.
    pub fn describe(&self, literal: CLiteral) -> String {
        let name = match self.name_of(literal.atom()) {
            Some(name) => name.to_owned(),
            None => literal.atom().to_string(),
        };
        match literal.polarity() {
            true => name,
            false => format!("¬{name}"),
        }
    }
}

/// The part of a model a clause was compiled from.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ClauseOrigin {
    /// The root feature is always selected.
    Root(String),

    /// A selected feature requires its parent.
    Parent { child: String, parent: String },

    /// A mandatory feature is selected with its parent.
    Mandatory { parent: String, child: String },

    /// A selected parent of an or (or alternative) group requires some child of the group.
    Group { parent: String, children: Vec<String> },

    /// At most one child of an alternative group is selected.
    Alternative {
        parent: String,
        first: String,
        second: String,
    },

    /// A cross-tree constraint, by position in the model, with a rendering of the constraint.
    Constraint { index: usize, text: String },

    /// A clause read as input, e.g. from DIMACS, without further information.
    Input,
}

impl std::fmt::Display for ClauseOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Root(root) => write!(f, "{root} is the root feature"),
            Self::Parent { child, parent } => write!(f, "{parent} is the parent of {child}"),
            Self::Mandatory { parent, child } => {
                write!(f, "{child} is a mandatory child of {parent}")
            }
            Self::Group { parent, children } => {
                write!(f, "{parent} requires one of {}", children.join(", "))
            }
            Self::Alternative {
                parent,
                first,
                second,
            } => write!(f, "{first} and {second} are alternatives under {parent}"),
            Self::Constraint { index, text } => write!(f, "constraint {index}: {text}"),
            Self::Input => write!(f, "input clause"),
        }
    }
}

/// A formula together with names for its atoms and an origin for each clause.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cnf {
    pub variables: VariableMap,

    pub clauses: ClauseList,

    /// The origin of each clause, indexed as the clause list.
    origins: Vec<ClauseOrigin>,
}

impl Cnf {
    /// Adds a clause with a given origin, returning the index of the clause.
    pub fn add_clause(&mut self, clause: LiteralSet, origin: ClauseOrigin) -> ClauseIndex {
        for atom in clause.atoms() {
            self.variables.reserve(atom);
        }
        log::trace!(target: crate::misc::log::targets::CLAUSE_STORE, "Clause {clause} from {origin}");
        self.origins.push(origin);
        self.clauses.push(clause)
    }

    pub fn origin(&self, index: ClauseIndex) -> Option<&ClauseOrigin> {
        self.origins.get(index)
    }

    /// The clause at the index written with the names of its atoms.
    pub fn describe(&self, index: ClauseIndex) -> String {
        match self.clauses.get(index) {
            None => String::default(),
            Some(clause) => clause
                .literals()
                .map(|literal| self.variables.describe(literal))
                .collect::<Vec<_>>()
                .join(" ∨ "),
        }
    }
}

impl From<ClauseList> for Cnf {
    fn from(clauses: ClauseList) -> Self {
        let mut cnf = Cnf::default();
        for clause in clauses.clauses {
            cnf.add_clause(clause, ClauseOrigin::Input);
        }
        cnf
    }
}

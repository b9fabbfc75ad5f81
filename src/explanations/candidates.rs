/*!
Generation of candidate explanations.

A candidate is a set of clause indicies, kept in ascending order.
Generators return candidates by ascending cardinality, starting from the empty candidate, and in lexicographic order for candidates of the same cardinality.
As the engine sorts candidates by rank with a stable sort, this order breaks ties between candidates of equal rank.

Two generators are provided:
- [BreadthFirst], over every clause of the formula.
- [Relevance], over the clauses connected to the atoms of the goal.

Clauses are *connected* to a set of atoms if some atom of the clause is in the set, or is connected through a chain of clauses sharing atoms.
The clauses not connected to the goal share no atom with the goal or with the connected clauses.
So, if those clauses are satisfiable on their own, a subset of the formula which entails the goal remains entailing after removing them, and restricting to connected clauses loses no explanation.
If the unconnected clauses are unsatisfiable then every goal is entailed by some subset of them, and the [relevance pool](Relevance::pool) alone is not enough.
The [engine](crate::explanations::ExplanationEngine) checks for this, and falls back to every clause of the formula.
*/

use std::collections::{BTreeSet, VecDeque};

use crate::{
    cnf::{ClauseIndex, ClauseList},
    explanations::Goal,
    structures::{atom::Atom, clause::Clause},
};

/// A candidate explanation, as ascending clause indicies.
pub type Candidate = Vec<ClauseIndex>;

/// Something which generates candidate explanations of a goal.
pub trait CandidateGenerator {
    /// The clauses from which candidates are built.
    fn pool(&self, formula: &ClauseList, goal: &Goal) -> Vec<ClauseIndex>;

    /// The most clauses in a candidate.
    fn max_size(&self) -> usize;

    /// The most candidates to generate.
    fn max_candidates(&self) -> usize;

    /// Candidates built from some pool, by ascending cardinality.
    fn candidates(&self, pool: &[ClauseIndex]) -> Vec<Candidate> {
        subsets(pool, self.max_size(), self.max_candidates())
    }
}

/// Candidates from every clause of a formula.
#[derive(Clone, Copy, Debug)]
pub struct BreadthFirst {
    pub max_size: usize,
    pub max_candidates: usize,
}

impl CandidateGenerator for BreadthFirst {
    fn pool(&self, formula: &ClauseList, _goal: &Goal) -> Vec<ClauseIndex> {
        (0..formula.len()).collect()
    }

    fn max_size(&self) -> usize {
        self.max_size
    }

    fn max_candidates(&self) -> usize {
        self.max_candidates
    }
}

/// Candidates from the clauses connected to the atoms of the goal.
///
/// The pool is complete only if the [unconnected](unconnected_clauses) clauses are satisfiable.
#[derive(Clone, Copy, Debug)]
pub struct Relevance {
    pub max_size: usize,
    pub max_candidates: usize,
}

impl CandidateGenerator for Relevance {
    fn pool(&self, formula: &ClauseList, goal: &Goal) -> Vec<ClauseIndex> {
        relevant_clauses(formula, goal.atoms())
    }

    fn max_size(&self) -> usize {
        self.max_size
    }

    fn max_candidates(&self) -> usize {
        self.max_candidates
    }
}

/// The (ascending) indicies of clauses connected to the given atoms.
pub fn relevant_clauses(
    formula: &ClauseList,
    atoms: impl IntoIterator<Item = Atom>,
) -> Vec<ClauseIndex> {
    let mut reached_atoms: BTreeSet<Atom> = BTreeSet::default();
    let mut todo: VecDeque<Atom> = VecDeque::default();
    for atom in atoms {
        if reached_atoms.insert(atom) {
            todo.push_back(atom);
        }
    }

    let mut relevant: BTreeSet<ClauseIndex> = BTreeSet::default();

    while let Some(atom) = todo.pop_front() {
        for (index, clause) in formula.iter().enumerate() {
            if relevant.contains(&index) || !clause.mentions(atom) {
                continue;
            }
            relevant.insert(index);
            for other in clause.atoms() {
                if reached_atoms.insert(other) {
                    todo.push_back(other);
                }
            }
        }
    }

    relevant.into_iter().collect()
}

/// The (ascending) indicies of clauses of the formula outside of the given pool.
pub fn unconnected_clauses(formula: &ClauseList, pool: &[ClauseIndex]) -> Vec<ClauseIndex> {
    let pool = pool.iter().copied().collect::<BTreeSet<_>>();
    (0..formula.len()).filter(|index| !pool.contains(index)).collect()
}

/// Subsets of the pool of at most `max_size` elements, by ascending cardinality and then lexicographically, stopping after `max_candidates` subsets.
pub fn subsets(pool: &[ClauseIndex], max_size: usize, max_candidates: usize) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = Vec::default();
    if max_candidates == 0 {
        return candidates;
    }
    candidates.push(Vec::default());

    let max_size = std::cmp::min(max_size, pool.len());

    'size_loop: for size in 1..=max_size {
        // Positions in the pool of the current subset.
        let mut positions: Vec<usize> = (0..size).collect();

        loop {
            if candidates.len() >= max_candidates {
                break 'size_loop;
            }
            candidates.push(positions.iter().map(|position| pool[*position]).collect());

            // Advance to the lexicographically next combination, if any.
            let mut slot = size;
            loop {
                if slot == 0 {
                    continue 'size_loop;
                }
                slot -= 1;
                if positions[slot] < pool.len() - size + slot {
                    break;
                }
            }
            positions[slot] += 1;
            for later in slot + 1..size {
                positions[later] = positions[later - 1] + 1;
            }
        }
    }

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structures::clause::LiteralSet;

    #[test]
    fn subsets_in_order() {
        let candidates = subsets(&[3, 5, 7], 2, usize::MAX);
        assert_eq!(
            candidates,
            vec![
                vec![],
                vec![3],
                vec![5],
                vec![7],
                vec![3, 5],
                vec![3, 7],
                vec![5, 7]
            ]
        );
    }

    #[test]
    fn subsets_bounded() {
        assert_eq!(subsets(&[0, 1, 2, 3], 4, 6).len(), 6);
        assert_eq!(subsets(&[0, 1, 2, 3], 4, usize::MAX).len(), 16);
        assert_eq!(subsets(&[], 4, usize::MAX), vec![Vec::<ClauseIndex>::new()]);
    }

    #[test]
    fn relevance() {
        let formula = ClauseList::from(vec![
            LiteralSet::from([1, 2]),
            LiteralSet::from([-2, 3]),
            LiteralSet::from([4, 5]),
            LiteralSet::from([-5]),
        ]);

        assert_eq!(relevant_clauses(&formula, [1]), vec![0, 1]);
        assert_eq!(relevant_clauses(&formula, [4]), vec![2, 3]);
        assert_eq!(relevant_clauses(&formula, [6]), Vec::<ClauseIndex>::new());

        let pool = relevant_clauses(&formula, [1]);
        assert_eq!(unconnected_clauses(&formula, &pool), vec![2, 3]);
    }
}

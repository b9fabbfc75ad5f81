/*!
Comparators over lists of clauses.

A comparator ranks a list of clauses by summing a weight over each clause of the list, and orders lists by ascending rank.
The canonical comparator is [LengthAsc], which weighs a clause by its number of literals, and so prefers lists with fewer literals in total --- presumably simpler explanations.

Lists of equal rank compare equal.
As [sort](ClauseListComparator::sort) is stable, lists of equal rank keep their relative order.

```rust
# use std::cmp::Ordering;
# use fm_core::cnf::comparator::{ClauseListComparator, LengthAsc};
# use fm_core::structures::clause::LiteralSet;
let c1 = LiteralSet::from([1, 2]);
let c2 = LiteralSet::from([-1, 3]);
let c3 = LiteralSet::from([2, -3]);

let smaller = vec![c1.clone(), c2.clone()];
let larger = vec![c1, c2, c3];

assert_eq!(LengthAsc.rank(&smaller), 4);
assert_eq!(LengthAsc.difference(&smaller, &larger), -2);
assert_eq!(LengthAsc.compare(&smaller, &larger), Ordering::Less);
assert_eq!(LengthAsc.compare(&[], &smaller), Ordering::Less);
```

Other heuristics are obtained by supplying a different weight, e.g. through [ByMetric].
*/

use std::cmp::Ordering;

use crate::structures::clause::{Clause, LiteralSet};

/// Something which orders lists of clauses by the sum of a weight over the clauses of each list.
pub trait ClauseListComparator {
    /// The weight of a single clause.
    fn weight(&self, clause: &LiteralSet) -> usize;

    /// The rank of a list of clauses, i.e. the sum of the weights of the clauses.
    /// The empty list has rank 0.
    fn rank<'a>(&self, clauses: impl IntoIterator<Item = &'a LiteralSet>) -> usize {
        clauses.into_iter().map(|clause| self.weight(clause)).sum()
    }

    /// The difference between the ranks of two lists.
    fn difference(&self, a: &[LiteralSet], b: &[LiteralSet]) -> isize {
        self.rank(a) as isize - self.rank(b) as isize
    }

    /// Orders two lists by ascending rank.
    fn compare(&self, a: &[LiteralSet], b: &[LiteralSet]) -> Ordering {
        self.rank(a).cmp(&self.rank(b))
    }

    /// A stable sort of lists by ascending rank.
    fn sort<L: AsRef<[LiteralSet]>>(&self, lists: &mut [L]) {
        lists.sort_by_cached_key(|list| self.rank(list.as_ref()));
    }
}

/// Compares lists of clauses by their total number of literals, fewer first.
#[derive(Clone, Copy, Debug, Default)]
pub struct LengthAsc;

impl ClauseListComparator for LengthAsc {
    fn weight(&self, clause: &LiteralSet) -> usize {
        clause.size()
    }
}

/// Compares lists of clauses by an arbitrary weight on clauses.
///
/// ```rust
/// # use fm_core::cnf::comparator::{ByMetric, ClauseListComparator};
/// # use fm_core::structures::clause::LiteralSet;
/// // Each clause counts as one, regardless of length.
/// let by_count = ByMetric(|_: &LiteralSet| 1_usize);
/// assert_eq!(by_count.rank(&[LiteralSet::from([1, 2, 3]), LiteralSet::from([4])]), 2);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct ByMetric<F: Fn(&LiteralSet) -> usize>(pub F);

impl<F: Fn(&LiteralSet) -> usize> ClauseListComparator for ByMetric<F> {
    fn weight(&self, clause: &LiteralSet) -> usize {
        (self.0)(clause)
    }
}

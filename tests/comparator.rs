use std::cmp::Ordering;

use fm_core::{
    cnf::comparator::{ByMetric, ClauseListComparator, LengthAsc},
    structures::clause::{Clause, LiteralSet},
};

use rand::{rngs::StdRng, Rng, SeedableRng};

fn random_clause(rng: &mut StdRng) -> LiteralSet {
    let length = rng.gen_range(1..=5);
    LiteralSet::new((0..length).map(|_| {
        let atom = rng.gen_range(1..=20);
        match rng.gen_bool(0.5) {
            true => atom,
            false => -atom,
        }
    }))
}

fn random_list(rng: &mut StdRng) -> Vec<LiteralSet> {
    let length = rng.gen_range(0..=6);
    (0..length).map(|_| random_clause(rng)).collect()
}

fn total_literals(list: &[LiteralSet]) -> usize {
    list.iter().map(|clause| clause.size()).sum()
}

/// A list tagged with its position before sorting.
struct Tagged {
    tag: usize,
    list: Vec<LiteralSet>,
}

impl AsRef<[LiteralSet]> for Tagged {
    fn as_ref(&self) -> &[LiteralSet] {
        &self.list
    }
}

mod length_asc {
    use super::*;

    #[test]
    fn difference_is_total_difference() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let a = random_list(&mut rng);
            let b = random_list(&mut rng);

            let expected = total_literals(&a) as isize - total_literals(&b) as isize;
            assert_eq!(LengthAsc.difference(&a, &b), expected);
            assert_eq!(LengthAsc.compare(&a, &b), expected.cmp(&0));
            assert_eq!(LengthAsc.compare(&a, &a), Ordering::Equal);
        }
    }

    #[test]
    fn empty_first() {
        let mut rng = StdRng::seed_from_u64(11);
        let empty: Vec<LiteralSet> = Vec::default();
        assert_eq!(LengthAsc.rank(&empty), 0);

        for _ in 0..100 {
            let list = random_list(&mut rng);
            assert_ne!(LengthAsc.compare(&empty, &list), Ordering::Greater);
        }
    }

    #[test]
    fn stable_sort() {
        let mut rng = StdRng::seed_from_u64(13);
        let mut lists = (0..200)
            .map(|tag| Tagged {
                tag,
                list: random_list(&mut rng),
            })
            .collect::<Vec<_>>();

        LengthAsc.sort(&mut lists);

        for pair in lists.windows(2) {
            let (first, second) = (&pair[0], &pair[1]);
            match LengthAsc.compare(&first.list, &second.list) {
                Ordering::Less => {}
                Ordering::Equal => assert!(first.tag < second.tag),
                Ordering::Greater => panic!("Lists out of order"),
            }
        }
    }

    #[test]
    fn scenario() {
        let c1 = LiteralSet::from([1, 2]);
        let c2 = LiteralSet::from([-1, 3]);
        let c3 = LiteralSet::from([2, -3]);

        let mut lists = vec![
            vec![c1.clone(), c2.clone(), c3.clone()],
            vec![c1.clone(), c2.clone()],
            vec![c2.clone()],
        ];
        LengthAsc.sort(&mut lists);

        assert_eq!(lists[0], vec![c2.clone()]);
        assert_eq!(lists[1], vec![c1.clone(), c2.clone()]);
        assert_eq!(LengthAsc.rank(&lists[2]), 6);
    }
}

mod by_metric {
    use super::*;

    #[test]
    fn clause_count() {
        let by_count = ByMetric(|_: &LiteralSet| 1_usize);

        let short = vec![LiteralSet::from([1, 2, 3, 4])];
        let long = vec![LiteralSet::from([1]), LiteralSet::from([2])];

        assert_eq!(by_count.compare(&short, &long), Ordering::Less);
        assert_eq!(LengthAsc.compare(&short, &long), Ordering::Greater);
    }

    #[test]
    fn weighted_atoms() {
        // Clauses mentioning atom 1 are costly.
        let avoid_one = ByMetric(|clause: &LiteralSet| match clause.mentions(1) {
            true => 10,
            false => clause.size(),
        });

        assert_eq!(avoid_one.rank(&[LiteralSet::from([-1])]), 10);
        assert_eq!(avoid_one.rank(&[LiteralSet::from([2, 3])]), 2);
    }
}

/*!
A DPLL oracle.

The procedure interleaves unit propagation with decisions on the value of some atom, and backtracks chronologically on a conflict by flipping the most recent decision which has not already been flipped.
Propagation is a pass over every clause, repeated until no clause asserts a literal.

Assumptions are set before the first decision and are never undone, so a conflict with no decision to flip shows the clauses are unsatisfiable together with the assumptions.

If a time limit is configured, the limit is checked before each propagation, and a report of [Unknown](Report::Unknown) is given when the limit is reached.
*/

use std::time::{Duration, Instant};

use rand::{Rng, SeedableRng};

use crate::{
    config::{Config, PolarityLean},
    misc::log::targets::{self},
    oracle::{Counters, Report, SatOracle},
    structures::{
        atom::Atom,
        clause::{Clause, LiteralSet},
        literal::{CLiteral, Literal},
        valuation::{Valuation, ValuationVec},
    },
    types::err,
};

/// How a literal came to be on the trail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    /// A free decision, noting whether the decision is the flip of an earlier decision.
    Decision { flipped: bool },

    /// A literal asserted by some clause.
    Implied,
}

/// A DPLL oracle, parameratised to a source of randomness for the polarity of decisions.
#[derive(Clone, Debug)]
pub struct DpllOracle<R: Rng + SeedableRng> {
    /// The probability of deciding an atom is true.
    polarity_lean: PolarityLean,

    /// The limit on a single call, if any.
    time_limit: Option<Duration>,

    /// The source of rng.
    rng: R,

    pub counters: Counters,
}

impl<R: Rng + SeedableRng> DpllOracle<R> {
    /// Creates an oracle from some given configuration, with a fixed seed.
    pub fn from_config(config: &Config) -> Self {
        let time_limit = match config.time_limit.value.is_zero() {
            true => None,
            false => Some(config.time_limit.value),
        };

        DpllOracle {
            polarity_lean: config.polarity_lean.value.clamp(0.0, 1.0),
            time_limit,
            rng: R::seed_from_u64(0),
            counters: Counters::default(),
        }
    }

    fn time_exceeded(&self, start: &Instant) -> bool {
        self.time_limit
            .is_some_and(|limit| start.elapsed() > limit)
    }

    /// Propagates until no clause asserts a literal.
    /// Returns false on finding a clause which is unsatisfiable on the valuation.
    fn propagate(
        clauses: &[&LiteralSet],
        valuation: &mut ValuationVec,
        trail: &mut Vec<(CLiteral, Step)>,
    ) -> bool {
        loop {
            let mut fresh_consequence = false;

            for clause in clauses {
                if clause.unsatisfiable_on(valuation) {
                    log::trace!(target: targets::ORACLE, "Conflict on {clause}");
                    return false;
                }

                if let Some(literal) = clause.asserts(valuation) {
                    valuation[literal.atom() as usize] = Some(literal.polarity());
                    trail.push((literal, Step::Implied));
                    fresh_consequence = true;
                }
            }

            if !fresh_consequence {
                return true;
            }
        }
    }

    /// Undoes the trail to the most recent unflipped decision and flips the decision.
    /// Returns false if there is no such decision.
    fn backtrack(valuation: &mut ValuationVec, trail: &mut Vec<(CLiteral, Step)>) -> bool {
        while let Some((literal, step)) = trail.pop() {
            valuation[literal.atom() as usize] = None;

            if step == (Step::Decision { flipped: false }) {
                let flip = literal.negate();
                valuation[flip.atom() as usize] = Some(flip.polarity());
                trail.push((flip, Step::Decision { flipped: true }));
                return true;
            }
        }
        false
    }

    fn unvalued_atom(valuation: &ValuationVec) -> Option<Atom> {
        valuation
            .iter()
            .enumerate()
            .skip(1)
            .find(|(_, value)| value.is_none())
            .map(|(atom, _)| atom as Atom)
    }
}

impl<R: Rng + SeedableRng> SatOracle for DpllOracle<R> {
    fn solve(
        &mut self,
        clauses: &[&LiteralSet],
        assumptions: &[CLiteral],
    ) -> Result<Report, err::OracleError> {
        self.counters.calls += 1;
        let start = Instant::now();

        if assumptions.contains(&0) || clauses.iter().any(|clause| clause.contains(0)) {
            return Err(err::OracleError::ZeroLiteral);
        }

        let max_atom = clauses
            .iter()
            .flat_map(|clause| clause.atoms())
            .chain(assumptions.iter().map(|literal| literal.atom()))
            .max()
            .unwrap_or(0);

        let mut valuation: ValuationVec = vec![None; max_atom as usize + 1];

        for assumption in assumptions {
            match valuation.literal_value(*assumption) {
                Some(false) => return Ok(Report::Unsatisfiable),
                Some(true) => {}
                None => valuation[assumption.atom() as usize] = Some(assumption.polarity()),
            }
        }

        let mut trail: Vec<(CLiteral, Step)> = Vec::default();

        let report = loop {
            if self.time_exceeded(&start) {
                self.counters.timeouts += 1;
                log::debug!(target: targets::ORACLE, "Time limit reached after {} decisions", self.counters.decisions);
                break Report::Unknown;
            }

            match Self::propagate(clauses, &mut valuation, &mut trail) {
                true => match Self::unvalued_atom(&valuation) {
                    None => break Report::Satisfiable,

                    Some(atom) => {
                        self.counters.decisions += 1;
                        let polarity = self.rng.gen_bool(self.polarity_lean);
                        let decision = CLiteral::new(atom, polarity);
                        valuation[atom as usize] = Some(polarity);
                        trail.push((decision, Step::Decision { flipped: false }));
                    }
                },

                false => {
                    self.counters.conflicts += 1;
                    if !Self::backtrack(&mut valuation, &mut trail) {
                        break Report::Unsatisfiable;
                    }
                }
            }
        };

        log::trace!(target: targets::ORACLE, "{report} on {} clauses and {} assumptions", clauses.len(), assumptions.len());
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::Oracle;

    fn oracle() -> Oracle {
        Oracle::from_config(&Config::default())
    }

    #[test]
    fn empty_formula() {
        assert_eq!(oracle().solve(&[], &[]), Ok(Report::Satisfiable));
    }

    #[test]
    fn empty_clause() {
        let empty = LiteralSet::default();
        assert_eq!(oracle().solve(&[&empty], &[]), Ok(Report::Unsatisfiable));
    }

    #[test]
    fn conflicting_assumptions() {
        assert_eq!(oracle().solve(&[], &[3, -3]), Ok(Report::Unsatisfiable));
    }

    #[test]
    fn zero_literal() {
        let bad = LiteralSet::from([1, 0]);
        assert_eq!(
            oracle().solve(&[&bad], &[]),
            Err(err::OracleError::ZeroLiteral)
        );
    }

    #[test]
    fn conflict() {
        let clauses = [
            LiteralSet::from([1, 2]),
            LiteralSet::from([-1, -2]),
            LiteralSet::from([1, -2]),
            LiteralSet::from([-1, 2]),
        ];
        let refs = clauses.iter().collect::<Vec<_>>();

        let mut oracle = oracle();
        assert_eq!(oracle.solve(&refs, &[]), Ok(Report::Unsatisfiable));
        assert!(oracle.counters.conflicts > 0);

        assert_eq!(oracle.solve(&refs[..3], &[]), Ok(Report::Satisfiable));
    }

    #[test]
    fn pigeonhole_three_two() {
        // Three pigeons, two holes: atom 2p + h - 2 is pigeon p in hole h.
        let mut clauses = vec![];
        for p in 1..=3 {
            clauses.push(LiteralSet::from([2 * p - 1, 2 * p]));
        }
        for h in 0..2 {
            for p in 1..=3 {
                for q in (p + 1)..=3 {
                    clauses.push(LiteralSet::from([-(2 * p - 1 + h), -(2 * q - 1 + h)]));
                }
            }
        }
        let refs = clauses.iter().collect::<Vec<_>>();
        assert_eq!(oracle().solve(&refs, &[]), Ok(Report::Unsatisfiable));
    }

    /// Ten pigeons and nine holes, with atom 9p + h + 1 for pigeon p in hole h.
    fn pigeonhole_ten_nine() -> Vec<LiteralSet> {
        let atom = |p: i32, h: i32| 9 * p + h + 1;
        let mut clauses = vec![];
        for p in 0..10 {
            clauses.push(LiteralSet::from((0..9).map(|h| atom(p, h)).collect::<Vec<_>>()));
        }
        for h in 0..9 {
            for p in 0..10 {
                for q in (p + 1)..10 {
                    clauses.push(LiteralSet::from([-atom(p, h), -atom(q, h)]));
                }
            }
        }
        clauses
    }

    #[test]
    fn time_limit() {
        let mut config = Config::default();
        config.time_limit.value = Duration::from_millis(5);
        let mut oracle = Oracle::from_config(&config);

        let clauses = pigeonhole_ten_nine();
        let refs = clauses.iter().collect::<Vec<_>>();
        assert_eq!(oracle.solve(&refs, &[]), Ok(Report::Unknown));
        assert_eq!(oracle.counters.timeouts, 1);

        // Easy calls finish within the limit.
        assert_eq!(oracle.solve(&refs[..3], &[]), Ok(Report::Satisfiable));
        assert_eq!(oracle.counters.timeouts, 1);
    }

    #[test]
    fn positive_lean() {
        let mut config = Config::default();
        config.polarity_lean.value = 1.0;
        let mut oracle = Oracle::from_config(&config);

        let clause = LiteralSet::from([-1, -2]);
        assert_eq!(oracle.solve(&[&clause], &[]), Ok(Report::Satisfiable));
        assert_eq!(oracle.solve(&[&clause], &[1]), Ok(Report::Satisfiable));
        assert_eq!(oracle.solve(&[&clause], &[1, 2]), Ok(Report::Unsatisfiable));
    }
}

/*!
The search for explanations.

# Overview

Given a compiled formula and a goal, the engine:
1. Generates candidates with the configured [strategy](crate::config::CandidateStrategy).
   For the relevance strategy, if the clauses not connected to the goal are not known to be satisfiable then candidates are drawn from every clause.
2. Sorts candidates by ascending rank of the comparator, with a stable sort.
3. Validates candidates in order, returning the first candidate which, together with the [assumptions](Goal::assumptions) of the goal, is unsatisfiable.

If no candidate is valid and shrinking is enabled, the pool of clauses the candidates were drawn from is checked as a whole.
If the pool entails the goal, clauses are removed from the pool one at a time (heaviest first) whenever the remainder still entails the goal, giving an explanation from which no clause can be removed --- though one which may not be of least rank.

Otherwise, the goal is [inexplicable](err::ExplanationError::Inexplicable).

# Parallel validation

When configured, candidates are validated in batches, with the candidates of a batch split between scoped threads, each with a clone of the oracle.
Results are collected by position in the ranked sequence before the first valid candidate is chosen, so the explanation returned is the same as when validating in sequence.

# Unknown reports

If the oracle cannot decide a candidate ranked before any valid candidate then the explanation is [unknown](err::ExplanationError::Unknown), as the undecided candidate may have been valid.
*/

use crossbeam::channel::unbounded;

use crate::{
    cnf::{
        comparator::{ClauseListComparator, LengthAsc},
        ClauseIndex, ClauseList, Cnf,
    },
    config::{CandidateStrategy, Config},
    explanations::{
        candidates::{unconnected_clauses, BreadthFirst, Candidate, CandidateGenerator, Relevance},
        Explanation, Goal,
    },
    misc::log::targets::{self},
    oracle::{Oracle, Report, SatOracle},
    structures::{clause::LiteralSet, literal::CLiteral},
    types::err::{self},
};

/// Searches for explanations, using some oracle to validate candidates and some comparator to rank them.
pub struct ExplanationEngine<O: SatOracle + Clone + Send = Oracle, C: ClauseListComparator = LengthAsc>
{
    config: Config,

    oracle: O,

    comparator: C,
}

impl ExplanationEngine {
    /// An engine with the default oracle and comparator, from some given configuration.
    pub fn from_config(config: Config) -> Self {
        let oracle = Oracle::from_config(&config);
        ExplanationEngine {
            config,
            oracle,
            comparator: LengthAsc,
        }
    }
}

impl<O: SatOracle + Clone + Send, C: ClauseListComparator> ExplanationEngine<O, C> {
    pub fn new(config: Config, oracle: O, comparator: C) -> Self {
        ExplanationEngine {
            config,
            oracle,
            comparator,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// An explanation of the goal from the clauses of the formula.
    pub fn explain(&mut self, cnf: &Cnf, goal: &Goal) -> Result<Explanation, err::ExplanationError> {
        let formula = &cnf.clauses;
        let assumptions = goal.assumptions();

        let max_size = self.config.max_candidate_size.value;
        let max_candidates = self.config.max_candidates.value;
        let (pool, candidates) = match self.config.strategy.value {
            CandidateStrategy::BreadthFirst => {
                let generator = BreadthFirst {
                    max_size,
                    max_candidates,
                };
                let pool = generator.pool(formula, goal);
                let candidates = generator.candidates(&pool);
                (pool, candidates)
            }
            CandidateStrategy::Relevance => {
                let generator = Relevance {
                    max_size,
                    max_candidates,
                };
                let mut pool = generator.pool(formula, goal);
                if !self.independent(formula, &unconnected_clauses(formula, &pool))? {
                    log::debug!(target: targets::EXPLANATION, "Unconnected clauses may be unsatisfiable, using every clause");
                    pool = (0..formula.len()).collect();
                }
                let candidates = generator.candidates(&pool);
                (pool, candidates)
            }
        };

        let ranked = self.rank(formula, candidates);
        log::debug!(target: targets::EXPLANATION, "{} candidates from a pool of {} clauses for {}", ranked.len(), pool.len(), goal.describe(cnf));

        let found = match self.config.parallel_validation.value {
            true => self.first_valid_parallel(formula, &ranked, &assumptions)?,
            false => self.first_valid(formula, &ranked, &assumptions)?,
        };

        if let Some(position) = found {
            let candidate = ranked[position].clone();
            log::debug!(target: targets::EXPLANATION, "Candidate {position} is valid, with rank {}", self.comparator.rank(formula.select(&candidate)));
            return Ok(Explanation::from_indicies(cnf, *goal, candidate, true));
        }

        if self.config.shrink_fallback.value {
            if let Some(shrunk) = self.shrink(formula, pool, &assumptions)? {
                log::debug!(target: targets::EXPLANATION, "Shrunk to {} clauses", shrunk.len());
                return Ok(Explanation::from_indicies(cnf, *goal, shrunk, false));
            }
        }

        log::debug!(target: targets::EXPLANATION, "No explanation for {}", goal.describe(cnf));
        Err(err::ExplanationError::Inexplicable)
    }

    /// Candidates sorted by ascending rank, keeping the given order between candidates of equal rank.
    pub fn rank(&self, formula: &ClauseList, mut candidates: Vec<Candidate>) -> Vec<Candidate> {
        candidates.sort_by_cached_key(|candidate| self.comparator.rank(formula.select(candidate)));
        candidates
    }

    /// Whether clauses outside of a relevance pool are known to be satisfiable, and so may be ignored.
    fn independent(
        &mut self,
        formula: &ClauseList,
        unconnected: &[ClauseIndex],
    ) -> Result<bool, err::ExplanationError> {
        if unconnected.is_empty() {
            return Ok(true);
        }
        match Self::validate(&mut self.oracle, formula, unconnected, &[])? {
            Report::Satisfiable => Ok(true),
            Report::Unsatisfiable | Report::Unknown => Ok(false),
        }
    }

    /// Whether the candidate, together with the assumptions, is unsatisfiable.
    fn validate(
        oracle: &mut O,
        formula: &ClauseList,
        candidate: &[ClauseIndex],
        assumptions: &[CLiteral],
    ) -> Result<Report, err::OracleError> {
        let clauses = formula.select(candidate).collect::<Vec<&LiteralSet>>();
        oracle.solve(&clauses, assumptions)
    }

    /// The position of the first valid candidate, if any.
    fn first_valid(
        &mut self,
        formula: &ClauseList,
        ranked: &[Candidate],
        assumptions: &[CLiteral],
    ) -> Result<Option<usize>, err::ExplanationError> {
        for (position, candidate) in ranked.iter().enumerate() {
            match Self::validate(&mut self.oracle, formula, candidate, assumptions)? {
                Report::Unsatisfiable => return Ok(Some(position)),
                Report::Satisfiable => {}
                Report::Unknown => return Err(err::ExplanationError::Unknown),
            }
        }
        Ok(None)
    }

    /// The position of the first valid candidate, if any, validating batches of candidates in parallel.
    fn first_valid_parallel(
        &mut self,
        formula: &ClauseList,
        ranked: &[Candidate],
        assumptions: &[CLiteral],
    ) -> Result<Option<usize>, err::ExplanationError> {
        let workers = std::thread::available_parallelism()
            .map(|count| count.get())
            .unwrap_or(1);
        let batch_size = self.config.validation_batch.value.max(1);
        let chunk_size = batch_size.div_ceil(workers).max(1);

        for (batch_index, batch) in ranked.chunks(batch_size).enumerate() {
            let offset = batch_index * batch_size;
            let (tx, rx) = unbounded::<(usize, Result<Report, err::OracleError>)>();

            let scope = crossbeam::scope(|scope| {
                for (chunk_index, chunk) in batch.chunks(chunk_size).enumerate() {
                    let tx = tx.clone();
                    let mut oracle = self.oracle.clone();
                    scope.spawn(move |_| {
                        for (index, candidate) in chunk.iter().enumerate() {
                            let position = offset + chunk_index * chunk_size + index;
                            let result = Self::validate(&mut oracle, formula, candidate, assumptions);
                            let stop = !matches!(result, Ok(Report::Satisfiable));
                            if tx.send((position, result)).is_err() || stop {
                                break;
                            }
                        }
                    });
                }
            });
            drop(tx);

            if scope.is_err() {
                return Err(err::ExplanationError::Oracle(err::OracleError::Worker));
            }

            let mut results: Vec<Option<Result<Report, err::OracleError>>> = vec![None; batch.len()];
            for (position, result) in rx.iter() {
                results[position - offset] = Some(result);
            }

            // A worker stops at the first candidate which is not satisfiable, so any result missing from a batch follows some such candidate of the same worker.
            for (index, result) in results.into_iter().enumerate() {
                match result {
                    Some(Ok(Report::Satisfiable)) => {}
                    Some(Ok(Report::Unsatisfiable)) => return Ok(Some(offset + index)),
                    Some(Ok(Report::Unknown)) => return Err(err::ExplanationError::Unknown),
                    Some(Err(e)) => return Err(err::ExplanationError::from(e)),
                    None => return Err(err::ExplanationError::Oracle(err::OracleError::Worker)),
                }
            }
        }

        Ok(None)
    }

    /// An irreducible subset of the pool which, together with the assumptions, is unsatisfiable.
    /// Or, none if the pool together with the assumptions is satisfiable.
    fn shrink(
        &mut self,
        formula: &ClauseList,
        pool: Vec<ClauseIndex>,
        assumptions: &[CLiteral],
    ) -> Result<Option<Candidate>, err::ExplanationError> {
        match Self::validate(&mut self.oracle, formula, &pool, assumptions)? {
            Report::Satisfiable => return Ok(None),
            Report::Unknown => return Err(err::ExplanationError::Unknown),
            Report::Unsatisfiable => {}
        }

        // Heaviest clauses are tried for removal first, ties broken by the later clause.
        let mut order = pool.clone();
        order.sort_by_cached_key(|index| {
            let weight = formula
                .get(*index)
                .map(|clause| self.comparator.weight(clause))
                .unwrap_or(0);
            (std::cmp::Reverse(weight), std::cmp::Reverse(*index))
        });

        let mut kept = pool;
        for index in order {
            let without = kept
                .iter()
                .copied()
                .filter(|kept_index| *kept_index != index)
                .collect::<Vec<_>>();

            match Self::validate(&mut self.oracle, formula, &without, assumptions)? {
                Report::Unsatisfiable => kept = without,
                Report::Satisfiable => {}
                Report::Unknown => return Err(err::ExplanationError::Unknown),
            }
        }

        Ok(Some(kept))
    }
}

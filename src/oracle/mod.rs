/*!
Satisfiability oracles.

The search for explanations treats satisfiability as a black box: some [SatOracle] is asked whether a collection of clauses together with some assumed literals is satisfiable, and [reports](Report) back.
An oracle may be slow, and may give up --- in which case the report is [Unknown](Report::Unknown).

The library provides a [DPLL](dpll) oracle, sufficient for the (small) formulas which arise when validating candidate explanations, and for the analysis of feature models of modest size.
Any other solver may be used by implementing [SatOracle].

```rust
# use fm_core::config::Config;
# use fm_core::oracle::{Oracle, Report, SatOracle};
# use fm_core::structures::clause::LiteralSet;
let mut oracle = Oracle::from_config(&Config::default());

let p_or_q = LiteralSet::from([1, 2]);
let not_p = LiteralSet::from([-1]);

assert_eq!(oracle.solve(&[&p_or_q, &not_p], &[]), Ok(Report::Satisfiable));
assert_eq!(oracle.solve(&[&p_or_q, &not_p], &[-2]), Ok(Report::Unsatisfiable));
```
*/

pub mod dpll;
pub use dpll::DpllOracle;

use crate::{
    structures::{clause::LiteralSet, literal::CLiteral},
    types::err,
};

/// The oracle used by default, a DPLL oracle with the standard source of randomness.
pub type Oracle = DpllOracle<rand::rngs::StdRng>;

/// High-level reports regarding a call to an oracle.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Report {
    /// The formula is satisfiable.
    Satisfiable,

    /// The formula is unsatisfiable.
    Unsatisfiable,

    /// Satisfiability of the formula is unknown, for some reason.
    Unknown,
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Satisfiable => write!(f, "Satisfiable"),
            Self::Unsatisfiable => write!(f, "Unsatisfiable"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Something which decides the satisfiability of a conjunction of clauses, under assumptions.
pub trait SatOracle {
    /// Reports on the satisfiability of the conjunction of the clauses and the assumed literals.
    fn solve(
        &mut self,
        clauses: &[&LiteralSet],
        assumptions: &[CLiteral],
    ) -> Result<Report, err::OracleError>;
}

/// Counts related to the calls made to an oracle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Counters {
    /// A count of calls to the oracle.
    pub calls: usize,

    /// A count of all decisions made.
    pub decisions: usize,

    /// A count of all conflicts seen.
    pub conflicts: usize,

    /// A count of calls which reached the time limit.
    pub timeouts: usize,
}

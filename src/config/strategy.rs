use std::str::FromStr;

/// Variant strategies for generating candidate explanations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum CandidateStrategy {
    /// Every subset of the formula, growing from the empty subset.
    BreadthFirst = 0,

    /// Every subset of the clauses which are connected to the goal through shared atoms.
    ///
    /// Clauses which share no atom (transitively) with the goal can only contribute to an explanation when they are unsatisfiable on their own.
    /// In that case every clause of the formula is used instead, and otherwise this strategy returns the same explanations as breadth-first search while validating fewer candidates.
    Relevance,
}

impl std::fmt::Display for CandidateStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BreadthFirst => write!(f, "BreadthFirst"),
            Self::Relevance => write!(f, "Relevance"),
        }
    }
}

impl CandidateStrategy {
    /// The minimum CandidateStrategy type.
    pub const MIN: CandidateStrategy = CandidateStrategy::BreadthFirst;

    /// The maximum CandidateStrategy type.
    pub const MAX: CandidateStrategy = CandidateStrategy::Relevance;
}

impl FromStr for CandidateStrategy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BreadthFirst" => Ok(Self::BreadthFirst),

            "Relevance" => Ok(Self::Relevance),

            _unkown_string => Err(()),
        }
    }
}

/*!
Explanations of properties of a formula.

An explanation of a [Goal] is a subset of the clauses of a formula which, on its own, entails the goal.
For example, if a feature *F* of a model is false-optional then *F* is selected whenever its parent *P* is selected, and an explanation is some collection of clauses *S* such that *S* ∧ *P* ∧ ¬*F* is unsatisfiable.

Explanations are found by the [engine](ExplanationEngine):
1. Candidate subsets of the formula are [generated](candidates).
2. Candidates are ranked by a [comparator](crate::cnf::comparator), by default preferring fewer literals.
3. Candidates are validated in order of rank by a [satisfiability oracle](crate::oracle), and the first valid candidate is the explanation.

Explainers for particular properties of feature models wrap the engine:
- [FalseOptionalExplainer], for features which are optional and yet always selected with their parent.
- [DeadFeatureExplainer], for features which are never selected.

Each explainer is built without a subject, and requesting an explanation before setting a subject is an error.

```rust
# use fm_core::config::Config;
# use fm_core::explanations::{ExplanationCreator, FalseOptionalExplainer};
# use fm_core::model::FeatureModel;
# use fm_core::model::expr::Expr;
# use fm_core::types::err::ExplanationError;
let mut model = FeatureModel::new("Car");
model.add_child("Car", "Engine", true);
model.add_child("Car", "Radio", false);
model.constraints.push(Expr::implies(Expr::var("Engine"), Expr::var("Radio")));

let mut explainer = FalseOptionalExplainer::new(&model, Config::default()).unwrap();
assert_eq!(explainer.explanation(), Err(ExplanationError::InvalidState));

explainer.set_false_optional_feature(Some("Radio"));
let explanation = explainer.explanation().unwrap();

// Car → Engine, and Engine → Radio.
assert_eq!(explanation.reasons.len(), 2);
```
*/

pub mod candidates;
mod dead;
mod engine;
mod false_optional;

pub use dead::DeadFeatureExplainer;
pub use engine::ExplanationEngine;
pub use false_optional::FalseOptionalExplainer;

use crate::{
    cnf::{ClauseIndex, ClauseOrigin, Cnf},
    structures::{
        atom::Atom,
        clause::LiteralSet,
        literal::{CLiteral, Literal},
    },
    types::err,
};

/// A property of a formula to be explained.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Goal {
    /// Whenever the antecedent holds, so does the consequent.
    Implication {
        antecedent: CLiteral,
        consequent: CLiteral,
    },

    /// The literal holds on every model of the formula.
    Always(CLiteral),

    /// The literal holds on no model of the formula.
    Never(CLiteral),
}

impl Goal {
    /// Literals which, together with an explanation, are unsatisfiable.
    /// I.e. the negation of the goal.
    pub fn assumptions(&self) -> Vec<CLiteral> {
        match self {
            Goal::Implication {
                antecedent,
                consequent,
            } => vec![*antecedent, consequent.negate()],
            Goal::Always(literal) => vec![literal.negate()],
            Goal::Never(literal) => vec![*literal],
        }
    }

    /// The atoms of the goal.
    pub fn atoms(&self) -> Vec<Atom> {
        self.assumptions().iter().map(|literal| literal.atom()).collect()
    }

    /// The goal written with names from a formula.
    pub fn describe(&self, cnf: &Cnf) -> String {
        match self {
            Goal::Implication {
                antecedent,
                consequent,
            } => format!(
                "{} whenever {}",
                cnf.variables.describe(*consequent),
                cnf.variables.describe(*antecedent)
            ),
            Goal::Always(literal) => format!("always {}", cnf.variables.describe(*literal)),
            Goal::Never(literal) => format!("never {}", cnf.variables.describe(*literal)),
        }
    }
}

/// A single clause of an explanation, with a justification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reason {
    /// The index of the clause in the formula.
    pub index: ClauseIndex,

    pub clause: LiteralSet,

    /// Where the clause came from.
    pub origin: ClauseOrigin,

    /// The clause, written with names.
    pub text: String,
}

impl std::fmt::Display for Reason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.origin {
            ClauseOrigin::Input => write!(f, "{}", self.text),
            _ => write!(f, "{} ({})", self.text, self.origin),
        }
    }
}

/// An ordered sequence of reasons which together entail a goal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Explanation {
    pub goal: Goal,

    /// A description of the goal, with names.
    pub subject: String,

    /// Reasons, in the order of the clauses in the formula.
    pub reasons: Vec<Reason>,

    /// Whether the explanation is known to be of least rank among the candidates considered.
    /// This is false for explanations obtained by shrinking.
    pub minimal: bool,
}

impl Explanation {
    pub(crate) fn from_indicies(
        cnf: &Cnf,
        goal: Goal,
        mut indicies: Vec<ClauseIndex>,
        minimal: bool,
    ) -> Self {
        indicies.sort_unstable();
        let reasons = indicies
            .into_iter()
            .filter_map(|index| {
                let clause = cnf.clauses.get(index)?.clone();
                Some(Reason {
                    index,
                    clause,
                    origin: cnf.origin(index).cloned().unwrap_or(ClauseOrigin::Input),
                    text: cnf.describe(index),
                })
            })
            .collect();

        Explanation {
            goal,
            subject: goal.describe(cnf),
            reasons,
            minimal,
        }
    }

    /// The indicies of the clauses of the explanation.
    pub fn indicies(&self) -> Vec<ClauseIndex> {
        self.reasons.iter().map(|reason| reason.index).collect()
    }

    /// The clauses of the explanation.
    pub fn clauses(&self) -> Vec<LiteralSet> {
        self.reasons.iter().map(|reason| reason.clause.clone()).collect()
    }
}

impl std::fmt::Display for Explanation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}, as:", self.subject)?;
        for (position, reason) in self.reasons.iter().enumerate() {
            writeln!(f, "  {}. {reason}", position + 1)?;
        }
        Ok(())
    }
}

/// Something which creates an explanation of some property of a feature model.
pub trait ExplanationCreator {
    /// An explanation of the property, for the subject set on the creator.
    fn explanation(&mut self) -> Result<Explanation, err::ExplanationError>;
}

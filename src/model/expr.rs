/*!
Propositional expressions over feature names, used for cross-tree constraints.

An expression is converted to clauses by first pushing negations to the names (negation normal form), and then distributing disjunction over conjunction.
Distribution may grow exponentially, though cross-tree constraints are typically short.

```rust
# use fm_core::model::expr::Expr;
let constraint = Expr::implies(Expr::var("Encryption"), Expr::var("Keys"));
assert_eq!(constraint.to_string(), "Encryption ⇒ Keys");

let clauses = constraint.clauses();
assert_eq!(clauses, vec![vec![("Encryption".to_owned(), false), ("Keys".to_owned(), true)]]);
```
*/

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A propositional expression over names.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Expr {
    Var(String),
    Not(Box<Expr>),
    And(Vec<Expr>),
    Or(Vec<Expr>),
    Implies(Box<Expr>, Box<Expr>),
    Iff(Box<Expr>, Box<Expr>),
}

/// A name paired with a polarity.
pub type NamedLiteral = (String, bool);

/// An expression in negation normal form.
enum Nnf {
    Literal(NamedLiteral),
    And(Vec<Nnf>),
    Or(Vec<Nnf>),
}

impl Expr {
    pub fn var(name: &str) -> Self {
        Expr::Var(name.to_owned())
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(expr: Expr) -> Self {
        Expr::Not(Box::new(expr))
    }

    pub fn implies(antecedent: Expr, consequent: Expr) -> Self {
        Expr::Implies(Box::new(antecedent), Box::new(consequent))
    }

    pub fn iff(left: Expr, right: Expr) -> Self {
        Expr::Iff(Box::new(left), Box::new(right))
    }

    /// Every name in the expression.
    pub fn names(&self) -> BTreeSet<&str> {
        let mut names = BTreeSet::default();
        let mut todo = vec![self];
        while let Some(expr) = todo.pop() {
            match expr {
                Expr::Var(name) => {
                    names.insert(name.as_str());
                }
                Expr::Not(inner) => todo.push(inner),
                Expr::And(parts) | Expr::Or(parts) => todo.extend(parts.iter()),
                Expr::Implies(left, right) | Expr::Iff(left, right) => {
                    todo.push(left);
                    todo.push(right);
                }
            }
        }
        names
    }

    fn nnf(&self, positive: bool) -> Nnf {
        match (self, positive) {
            (Expr::Var(name), _) => Nnf::Literal((name.clone(), positive)),

            (Expr::Not(inner), _) => inner.nnf(!positive),

            (Expr::And(parts), true) | (Expr::Or(parts), false) => {
                Nnf::And(parts.iter().map(|part| part.nnf(positive)).collect())
            }

            (Expr::Or(parts), true) | (Expr::And(parts), false) => {
                Nnf::Or(parts.iter().map(|part| part.nnf(positive)).collect())
            }

            (Expr::Implies(left, right), true) => Nnf::Or(vec![left.nnf(false), right.nnf(true)]),

            (Expr::Implies(left, right), false) => {
                Nnf::And(vec![left.nnf(true), right.nnf(false)])
            }

            (Expr::Iff(left, right), true) => Nnf::And(vec![
                Nnf::Or(vec![left.nnf(false), right.nnf(true)]),
                Nnf::Or(vec![left.nnf(true), right.nnf(false)]),
            ]),

            (Expr::Iff(left, right), false) => Nnf::Or(vec![
                Nnf::And(vec![left.nnf(true), right.nnf(false)]),
                Nnf::And(vec![left.nnf(false), right.nnf(true)]),
            ]),
        }
    }

    /// The expression as a conjunction of clauses over named literals.
    ///
    /// No simplification takes place, so clauses may repeat a literal or contain complementary literals.
    /// The empty conjunction is true and has no clauses, while the empty disjunction is false and is a single empty clause.
    pub fn clauses(&self) -> Vec<Vec<NamedLiteral>> {
        Self::distribute(self.nnf(true))
    }

    fn distribute(nnf: Nnf) -> Vec<Vec<NamedLiteral>> {
        match nnf {
            Nnf::Literal(literal) => vec![vec![literal]],

            Nnf::And(parts) => parts.into_iter().flat_map(Self::distribute).collect(),

            Nnf::Or(parts) => {
                let mut product: Vec<Vec<NamedLiteral>> = vec![vec![]];
                for part in parts {
                    let part_clauses = Self::distribute(part);
                    product = product
                        .iter()
                        .flat_map(|left| {
                            part_clauses.iter().map(move |right| {
                                let mut joined = left.clone();
                                joined.extend(right.iter().cloned());
                                joined
                            })
                        })
                        .collect();
                }
                product
            }
        }
    }

    fn fmt_nested(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Var(_) | Expr::Not(_) => write!(f, "{self}"),
            _ => write!(f, "({self})"),
        }
    }
}

impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Var(name) => write!(f, "{name}"),

            Expr::Not(inner) => {
                write!(f, "¬")?;
                inner.fmt_nested(f)
            }

            Expr::And(parts) | Expr::Or(parts) => {
                let connective = match self {
                    Expr::And(_) => " ∧ ",
                    _ => " ∨ ",
                };
                match parts.is_empty() {
                    true => match self {
                        Expr::And(_) => write!(f, "⊤"),
                        _ => write!(f, "⊥"),
                    },
                    false => {
                        for (index, part) in parts.iter().enumerate() {
                            if index > 0 {
                                write!(f, "{connective}")?;
                            }
                            part.fmt_nested(f)?;
                        }
                        Ok(())
                    }
                }
            }

            Expr::Implies(left, right) => {
                left.fmt_nested(f)?;
                write!(f, " ⇒ ")?;
                right.fmt_nested(f)
            }

            Expr::Iff(left, right) => {
                left.fmt_nested(f)?;
                write!(f, " ⇔ ")?;
                right.fmt_nested(f)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(name: &str, polarity: bool) -> NamedLiteral {
        (name.to_owned(), polarity)
    }

    #[test]
    fn negated_conjunction() {
        let expr = Expr::not(Expr::And(vec![Expr::var("A"), Expr::var("B")]));
        assert_eq!(expr.clauses(), vec![vec![lit("A", false), lit("B", false)]]);
        assert_eq!(expr.to_string(), "¬(A ∧ B)");
    }

    #[test]
    fn distribution() {
        // (A ∧ B) ∨ C
        let expr = Expr::Or(vec![
            Expr::And(vec![Expr::var("A"), Expr::var("B")]),
            Expr::var("C"),
        ]);
        assert_eq!(
            expr.clauses(),
            vec![
                vec![lit("A", true), lit("C", true)],
                vec![lit("B", true), lit("C", true)]
            ]
        );
    }

    #[test]
    fn equivalence() {
        let expr = Expr::iff(Expr::var("A"), Expr::var("B"));
        assert_eq!(
            expr.clauses(),
            vec![
                vec![lit("A", false), lit("B", true)],
                vec![lit("A", true), lit("B", false)]
            ]
        );
    }

    #[test]
    fn empty_connectives() {
        assert!(Expr::And(vec![]).clauses().is_empty());
        assert_eq!(Expr::Or(vec![]).clauses(), vec![Vec::<NamedLiteral>::new()]);
    }
}

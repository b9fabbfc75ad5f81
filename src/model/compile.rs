/*!
Compilation of a feature model to a formula.

Each feature is given an atom, in the order of the features of the model, and clauses are added with an [origin](ClauseOrigin):
- The root is selected.
- Each feature requires its parent.
- In an `and` group each mandatory child is required by the parent.
- In an `or` group the parent requires some child.
- In an `alternative` group the parent requires some child, and no two children are selected together.
- Each clause of each cross-tree constraint.

Clauses from constraints are simplified before being added: repeated literals are dropped, and tautologies are skipped.
*/

use std::collections::HashSet;

use crate::{
    cnf::{ClauseOrigin, Cnf},
    misc::log::targets::{self},
    model::{FeatureModel, GroupKind},
    structures::{
        clause::{IntClause, LiteralSet},
        literal::{CLiteral, Literal},
    },
    types::err::{self},
};

impl FeatureModel {
    /// Checks the structure of the tree: a single root, known parents, and no cycles.
    pub fn validate(&self) -> Result<(), err::CompileError> {
        self.root()?;

        let mut names = HashSet::with_capacity(self.features.len());
        for feature in &self.features {
            if !names.insert(feature.name.as_str()) {
                return Err(err::CompileError::DuplicateFeature(feature.name.clone()));
            }
        }

        for feature in &self.features {
            let mut steps = 0;
            let mut current = feature;
            while let Some(parent) = &current.parent {
                current = match self.feature(parent) {
                    Some(parent) => parent,
                    None => return Err(err::CompileError::UnknownFeature(parent.clone())),
                };
                steps += 1;
                if steps > self.features.len() {
                    return Err(err::CompileError::Cycle(feature.name.clone()));
                }
            }
        }

        for constraint in &self.constraints {
            if let Some(unknown) = constraint.names().into_iter().find(|name| !names.contains(name)) {
                return Err(err::CompileError::UnknownFeature(unknown.to_owned()));
            }
        }

        Ok(())
    }

    /// The formula of the model.
    pub fn compile(&self) -> Result<Cnf, err::CompileError> {
        self.validate()?;

        let mut cnf = Cnf::default();
        for feature in &self.features {
            cnf.variables.fresh_atom(&feature.name)?;
        }

        let literal = |name: &str, polarity: bool| -> Result<CLiteral, err::CompileError> {
            cnf.variables
                .literal(name, polarity)
                .ok_or_else(|| err::CompileError::UnknownFeature(name.to_owned()))
        };

        let mut clauses: Vec<(LiteralSet, ClauseOrigin)> = Vec::default();

        let root = self.root()?;
        clauses.push((
            LiteralSet::from([literal(&root.name, true)?]),
            ClauseOrigin::Root(root.name.clone()),
        ));

        for feature in &self.features {
            if let Some(parent) = &feature.parent {
                clauses.push((
                    LiteralSet::from([literal(&feature.name, false)?, literal(parent, true)?]),
                    ClauseOrigin::Parent {
                        child: feature.name.clone(),
                        parent: parent.clone(),
                    },
                ));
            }

            let children = self.children(&feature.name).collect::<Vec<_>>();
            if children.is_empty() {
                continue;
            }

            match feature.group {
                GroupKind::And => {
                    for child in children.iter().filter(|child| child.mandatory) {
                        clauses.push((
                            LiteralSet::from([
                                literal(&feature.name, false)?,
                                literal(&child.name, true)?,
                            ]),
                            ClauseOrigin::Mandatory {
                                parent: feature.name.clone(),
                                child: child.name.clone(),
                            },
                        ));
                    }
                }

                GroupKind::Or | GroupKind::Alternative => {
                    let mut group_clause: IntClause = vec![literal(&feature.name, false)?];
                    for child in &children {
                        group_clause.push(literal(&child.name, true)?);
                    }
                    clauses.push((
                        LiteralSet::from(group_clause),
                        ClauseOrigin::Group {
                            parent: feature.name.clone(),
                            children: children.iter().map(|child| child.name.clone()).collect(),
                        },
                    ));

                    if feature.group == GroupKind::Alternative {
                        for (index, first) in children.iter().enumerate() {
                            for second in &children[index + 1..] {
                                clauses.push((
                                    LiteralSet::from([
                                        literal(&first.name, false)?,
                                        literal(&second.name, false)?,
                                    ]),
                                    ClauseOrigin::Alternative {
                                        parent: feature.name.clone(),
                                        first: first.name.clone(),
                                        second: second.name.clone(),
                                    },
                                ));
                            }
                        }
                    }
                }
            }
        }

        for (index, constraint) in self.constraints.iter().enumerate() {
            let text = constraint.to_string();
            'clause_loop: for named_clause in constraint.clauses() {
                let mut clause: IntClause = Vec::with_capacity(named_clause.len());
                for (name, polarity) in named_clause {
                    let the_literal = literal(&name, polarity)?;
                    if clause.contains(&the_literal.negate()) {
                        log::trace!(target: targets::COMPILE, "Tautology skipped in constraint {index}");
                        continue 'clause_loop;
                    }
                    if !clause.contains(&the_literal) {
                        clause.push(the_literal);
                    }
                }
                clauses.push((
                    LiteralSet::from(clause),
                    ClauseOrigin::Constraint {
                        index,
                        text: text.clone(),
                    },
                ));
            }
        }

        for (clause, origin) in clauses {
            cnf.add_clause(clause, origin);
        }

        log::debug!(target: targets::COMPILE, "Compiled {} features and {} constraints to {} clauses", self.features.len(), self.constraints.len(), cnf.clauses.len());
        Ok(cnf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::expr::Expr;

    #[test]
    fn tree_clauses() {
        let mut model = FeatureModel::new("R");
        model.add_child("R", "A", true);
        model.add_child("R", "B", false);

        let cnf = model.compile().unwrap();

        // root, two parent clauses, one mandatory clause
        assert_eq!(cnf.clauses.len(), 4);
        assert_eq!(cnf.origin(0), Some(&ClauseOrigin::Root("R".to_owned())));
        assert_eq!(cnf.describe(1), "¬R ∨ A");
        assert_eq!(cnf.describe(3), "¬B ∨ R");
    }

    #[test]
    fn alternative_group() {
        let mut model = FeatureModel::new("R");
        for name in ["A", "B", "C"] {
            model.add_child("R", name, false);
        }
        model.set_group("R", GroupKind::Alternative);

        let cnf = model.compile().unwrap();

        // root, three parent clauses, one group clause, three exclusions
        assert_eq!(cnf.clauses.len(), 8);
        assert_eq!(cnf.describe(1), "¬R ∨ A ∨ B ∨ C");
        assert_eq!(cnf.describe(2), "¬A ∨ ¬B");
    }

    #[test]
    fn constraint_simplification() {
        let mut model = FeatureModel::new("R");
        model.add_child("R", "A", false);
        model.constraints.push(Expr::Or(vec![Expr::var("A"), Expr::not(Expr::var("A"))]));
        model.constraints.push(Expr::Or(vec![Expr::var("A"), Expr::var("A")]));

        let cnf = model.compile().unwrap();

        // root, parent clause, the simplified second constraint
        assert_eq!(cnf.clauses.len(), 3);
        assert_eq!(cnf.clauses.get(2).map(|clause| clause.len()), Some(1));
    }

    #[test]
    fn structural_errors() {
        let mut unknown_parent = FeatureModel::new("R");
        unknown_parent.add_child("X", "A", false);
        assert!(unknown_parent.compile().is_err());

        let mut two_roots = FeatureModel::new("R");
        two_roots.features.push(crate::model::Feature::new("S", None, false));
        assert_eq!(
            two_roots.compile(),
            Err(err::CompileError::MultipleRoots("R".to_owned(), "S".to_owned()))
        );

        let mut duplicate = FeatureModel::new("R");
        duplicate.add_child("R", "R", false);
        assert_eq!(
            duplicate.compile(),
            Err(err::CompileError::DuplicateFeature("R".to_owned()))
        );

        let mut unknown_name = FeatureModel::new("R");
        unknown_name.constraints.push(Expr::var("Q"));
        assert_eq!(
            unknown_name.compile(),
            Err(err::CompileError::UnknownFeature("Q".to_owned()))
        );
    }

    #[test]
    fn cycle() {
        let mut model = FeatureModel::new("R");
        model.features.push(crate::model::Feature::new("A", Some("B"), false));
        model.features.push(crate::model::Feature::new("B", Some("A"), false));
        assert_eq!(model.compile(), Err(err::CompileError::Cycle("A".to_owned())));
    }
}

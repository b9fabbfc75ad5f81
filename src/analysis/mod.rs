/*!
Model-wide analysis.

The [Analyzer] asks the oracle about the whole compiled formula of a model, to find:
- Whether the model is *void*, i.e. has no configuration at all.
- *Dead* features, selected in no configuration.
- *Core* features, selected in every configuration.
- *False-optional* features, optional in the tree and yet selected whenever their parent is selected.

Each question is a single oracle call per feature, with the feature (and parent) as assumptions.
Any feature found in this way may then be [explained](crate::explanations).

```rust
# use fm_core::analysis::Analyzer;
# use fm_core::config::Config;
# use fm_core::model::FeatureModel;
# use fm_core::model::expr::Expr;
let mut model = FeatureModel::new("Car");
model.add_child("Car", "Engine", true);
model.add_child("Car", "Radio", false);
model.add_child("Car", "Tape", false);
model.constraints.push(Expr::implies(Expr::var("Engine"), Expr::var("Radio")));
model.constraints.push(Expr::not(Expr::var("Tape")));

let mut analyzer = Analyzer::new(&model, &Config::default()).unwrap();
assert_eq!(analyzer.is_void(), Ok(false));
assert_eq!(analyzer.dead_features(), Ok(vec!["Tape".to_owned()]));
assert_eq!(analyzer.false_optional_features(), Ok(vec!["Radio".to_owned()]));
```
*/

use crate::{
    cnf::Cnf,
    config::Config,
    misc::log::targets::{self},
    model::FeatureModel,
    oracle::{Oracle, Report, SatOracle},
    structures::{clause::LiteralSet, literal::CLiteral},
    types::err::{self},
};

/// Answers questions about every feature of a model.
pub struct Analyzer<'m, O: SatOracle = Oracle> {
    model: &'m FeatureModel,

    cnf: Cnf,

    oracle: O,
}

impl<'m> Analyzer<'m> {
    pub fn new(model: &'m FeatureModel, config: &Config) -> Result<Self, err::CompileError> {
        Self::with_oracle(model, Oracle::from_config(config))
    }
}

impl<'m, O: SatOracle> Analyzer<'m, O> {
    pub fn with_oracle(model: &'m FeatureModel, oracle: O) -> Result<Self, err::CompileError> {
        Ok(Analyzer {
            model,
            cnf: model.compile()?,
            oracle,
        })
    }

    pub fn cnf(&self) -> &Cnf {
        &self.cnf
    }

    /// Whether the formula is satisfiable together with the assumptions.
    fn satisfiable(&mut self, assumptions: &[CLiteral]) -> Result<bool, err::OracleError> {
        let clauses = self.cnf.clauses.iter().collect::<Vec<&LiteralSet>>();
        match self.oracle.solve(&clauses, assumptions)? {
            Report::Satisfiable => Ok(true),
            Report::Unsatisfiable => Ok(false),
            Report::Unknown => Err(err::OracleError::Undecided),
        }
    }

    fn literal(&self, name: &str, polarity: bool) -> Result<CLiteral, err::OracleError> {
        // Every feature has an atom after compilation.
        self.cnf
            .variables
            .literal(name, polarity)
            .ok_or(err::OracleError::Undecided)
    }

    /// Whether the model has no configuration.
    pub fn is_void(&mut self) -> Result<bool, err::OracleError> {
        Ok(!self.satisfiable(&[])?)
    }

    /// Features selected in no configuration, in model order.
    pub fn dead_features(&mut self) -> Result<Vec<String>, err::OracleError> {
        let mut dead = Vec::default();
        for feature in &self.model.features {
            let literal = self.literal(&feature.name, true)?;
            if !self.satisfiable(&[literal])? {
                dead.push(feature.name.clone());
            }
        }
        log::debug!(target: targets::ANALYSIS, "{} dead features", dead.len());
        Ok(dead)
    }

    /// Features selected in every configuration, in model order.
    /// If the model is void there are no configurations, and every feature is core.
    pub fn core_features(&mut self) -> Result<Vec<String>, err::OracleError> {
        let mut core = Vec::default();
        for feature in &self.model.features {
            let literal = self.literal(&feature.name, false)?;
            if !self.satisfiable(&[literal])? {
                core.push(feature.name.clone());
            }
        }
        Ok(core)
    }

    /// Optional features selected whenever their parent is selected, in model order.
    ///
    /// Features with a dead parent are skipped, as are dead features, as each trivially holds whenever the parent is selected.
    pub fn false_optional_features(&mut self) -> Result<Vec<String>, err::OracleError> {
        let mut false_optional = Vec::default();
        let model = self.model;
        for feature in &model.features {
            let Some(parent) = feature.parent.as_deref() else {
                continue;
            };
            if !model.is_optional(&feature.name) {
                continue;
            }

            let parent_literal = self.literal(parent, true)?;
            if !self.satisfiable(&[parent_literal])? {
                continue;
            }

            let feature_literal = self.literal(&feature.name, true)?;
            if !self.satisfiable(&[feature_literal])? {
                continue;
            }

            if !self.satisfiable(&[parent_literal, -feature_literal])? {
                false_optional.push(feature.name.clone());
            }
        }
        log::debug!(target: targets::ANALYSIS, "{} false-optional features", false_optional.len());
        Ok(false_optional)
    }
}

use crate::{
    cnf::{comparator::ClauseListComparator, comparator::LengthAsc, Cnf},
    config::Config,
    explanations::{Explanation, ExplanationCreator, ExplanationEngine, Goal},
    misc::log::targets::{self},
    model::FeatureModel,
    oracle::{Oracle, SatOracle},
    types::err::{self},
};

/// Explains why a feature is dead, i.e. selected in no configuration of the model.
pub struct DeadFeatureExplainer<O: SatOracle + Clone + Send = Oracle, C: ClauseListComparator = LengthAsc>
{
    cnf: Cnf,

    engine: ExplanationEngine<O, C>,

    dead_feature: Option<String>,
}

impl DeadFeatureExplainer {
    pub fn new(model: &FeatureModel, config: Config) -> Result<Self, err::CompileError> {
        Self::with_engine(model, ExplanationEngine::from_config(config))
    }
}

impl<O: SatOracle + Clone + Send, C: ClauseListComparator> DeadFeatureExplainer<O, C> {
    pub fn with_engine(
        model: &FeatureModel,
        engine: ExplanationEngine<O, C>,
    ) -> Result<Self, err::CompileError> {
        Ok(DeadFeatureExplainer {
            cnf: model.compile()?,
            engine,
            dead_feature: None,
        })
    }

    pub fn dead_feature(&self) -> Option<&str> {
        self.dead_feature.as_deref()
    }

    pub fn set_dead_feature(&mut self, feature: Option<&str>) {
        self.dead_feature = feature.map(str::to_owned);
    }

    pub fn cnf(&self) -> &Cnf {
        &self.cnf
    }
}

impl<O: SatOracle + Clone + Send, C: ClauseListComparator> ExplanationCreator
    for DeadFeatureExplainer<O, C>
{
    fn explanation(&mut self) -> Result<Explanation, err::ExplanationError> {
        let Some(name) = &self.dead_feature else {
            return Err(err::ExplanationError::InvalidState);
        };
        let literal = self
            .cnf
            .variables
            .literal(name, true)
            .ok_or_else(|| err::ExplanationError::UnknownFeature(name.clone()))?;

        let goal = Goal::Never(literal);
        log::info!(target: targets::EXPLANATION, "Explaining dead {}", self.cnf.variables.describe(literal));
        self.engine.explain(&self.cnf, &goal)
    }
}

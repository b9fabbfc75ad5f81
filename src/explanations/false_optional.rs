use crate::{
    cnf::{comparator::ClauseListComparator, comparator::LengthAsc, Cnf},
    config::Config,
    explanations::{Explanation, ExplanationCreator, ExplanationEngine, Goal},
    misc::log::targets::{self},
    model::FeatureModel,
    oracle::{Oracle, SatOracle},
    types::err::{self},
};

/// Explains why a feature is false-optional, i.e. selected whenever its parent is selected.
///
/// The explainer is built without a feature, and a feature must be [set](FalseOptionalExplainer::set_false_optional_feature) before an explanation is requested.
pub struct FalseOptionalExplainer<
    'm,
    O: SatOracle + Clone + Send = Oracle,
    C: ClauseListComparator = LengthAsc,
> {
    model: &'m FeatureModel,

    cnf: Cnf,

    engine: ExplanationEngine<O, C>,

    false_optional_feature: Option<String>,
}

impl<'m> FalseOptionalExplainer<'m> {
    pub fn new(model: &'m FeatureModel, config: Config) -> Result<Self, err::CompileError> {
        Self::with_engine(model, ExplanationEngine::from_config(config))
    }
}

impl<'m, O: SatOracle + Clone + Send, C: ClauseListComparator> FalseOptionalExplainer<'m, O, C> {
    /// An explainer using the given engine, over the compiled formula of the model.
    pub fn with_engine(
        model: &'m FeatureModel,
        engine: ExplanationEngine<O, C>,
    ) -> Result<Self, err::CompileError> {
        Ok(FalseOptionalExplainer {
            model,
            cnf: model.compile()?,
            engine,
            false_optional_feature: None,
        })
    }

    /// The feature to be explained, if set.
    pub fn false_optional_feature(&self) -> Option<&str> {
        self.false_optional_feature.as_deref()
    }

    pub fn set_false_optional_feature(&mut self, feature: Option<&str>) {
        self.false_optional_feature = feature.map(str::to_owned);
    }

    /// The compiled formula of the model.
    pub fn cnf(&self) -> &Cnf {
        &self.cnf
    }

    pub fn goal(&self) -> Result<Goal, err::ExplanationError> {
        let Some(name) = &self.false_optional_feature else {
            return Err(err::ExplanationError::InvalidState);
        };

        let feature = self
            .model
            .feature(name)
            .ok_or_else(|| err::ExplanationError::UnknownFeature(name.clone()))?;
        let parent = feature
            .parent
            .as_deref()
            .ok_or_else(|| err::ExplanationError::NoParent(name.clone()))?;

        let antecedent = self
            .cnf
            .variables
            .literal(parent, true)
            .ok_or_else(|| err::ExplanationError::UnknownFeature(parent.to_owned()))?;
        let consequent = self
            .cnf
            .variables
            .literal(name, true)
            .ok_or_else(|| err::ExplanationError::UnknownFeature(name.clone()))?;

        Ok(Goal::Implication {
            antecedent,
            consequent,
        })
    }
}

impl<O: SatOracle + Clone + Send, C: ClauseListComparator> ExplanationCreator
    for FalseOptionalExplainer<'_, O, C>
{
    fn explanation(&mut self) -> Result<Explanation, err::ExplanationError> {
        let goal = self.goal()?;
        log::info!(target: targets::EXPLANATION, "Explaining false-optional {}", goal.describe(&self.cnf));
        self.engine.explain(&self.cnf, &goal)
    }
}

use std::path::PathBuf;

use fm_core::{
    analysis::Analyzer,
    cnf::Cnf,
    config::Config,
    explanations::{
        DeadFeatureExplainer, Explanation, ExplanationCreator, ExplanationEngine,
        FalseOptionalExplainer, Goal,
    },
    model::FeatureModel,
    types::err::{self},
};

use parse_args::{cli, config_from_args};
use read::{read_input, Input};

mod parse_args;
mod read;

fn main() {
    #[cfg(feature = "logger")]
    env_logger::init();

    let matches = cli().get_matches();

    let config = match config_from_args(&matches) {
        Ok(config) => config,
        Err(message) => {
            println!("c {message}");
            std::process::exit(1);
        }
    };

    let Some(path) = matches.get_one::<PathBuf>("path") else {
        println!("c Path to a model or formula required");
        std::process::exit(1);
    };

    let input = match read_input(path) {
        Ok(input) => input,
        Err(e) => {
            println!("c {e}");
            std::process::exit(1);
        }
    };

    let result = match input {
        Input::Model(model) => examine_model(&model, &matches, config),
        Input::Formula(cnf) => examine_formula(&cnf, &matches, config),
    };

    if let Err(e) = result {
        println!("c Analysis error: {e}");
        std::process::exit(2);
    }
}

fn print_explanation(explanation: &Explanation) {
    print!("{explanation}");
    if !explanation.minimal {
        println!("c The explanation is irreducible, though may not be the least explanation.");
    }
}

fn examine_model(
    model: &FeatureModel,
    matches: &clap::ArgMatches,
    config: Config,
) -> Result<(), err::ErrorKind> {
    let mut analyzer = Analyzer::new(model, &config)?;

    if analyzer.is_void()? {
        println!("s VOID");
        return Ok(());
    }
    println!("s VALID");

    let dead = analyzer.dead_features()?;
    if matches.get_flag("dead") {
        println!("c Dead features: {}", dead.len());
        for name in &dead {
            println!("d {name}");
        }
    }

    if matches.get_flag("false_optional") {
        let false_optional = analyzer.false_optional_features()?;
        println!("c False-optional features: {}", false_optional.len());
        for name in &false_optional {
            println!("f {name}");
        }
    }

    if let Some(name) = matches.get_one::<String>("explain") {
        let explanation = match dead.contains(name) {
            true => {
                let mut explainer = DeadFeatureExplainer::new(model, config)?;
                explainer.set_dead_feature(Some(name));
                explainer.explanation()?
            }
            false => {
                let mut explainer = FalseOptionalExplainer::new(model, config)?;
                explainer.set_false_optional_feature(Some(name));
                explainer.explanation()?
            }
        };
        print_explanation(&explanation);
    }

    Ok(())
}

fn examine_formula(
    cnf: &Cnf,
    matches: &clap::ArgMatches,
    config: Config,
) -> Result<(), err::ErrorKind> {
    let Some(mut literals) = matches.get_many::<i32>("implies") else {
        println!("c Nothing to explain, see --implies");
        return Ok(());
    };

    let (Some(antecedent), Some(consequent)) = (literals.next(), literals.next()) else {
        println!("c --implies requires two literals");
        return Ok(());
    };

    let goal = Goal::Implication {
        antecedent: *antecedent,
        consequent: *consequent,
    };

    let mut engine = ExplanationEngine::from_config(config);
    let explanation = engine.explain(cnf, &goal)?;
    print_explanation(&explanation);

    Ok(())
}

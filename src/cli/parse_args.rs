use std::path::PathBuf;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};

use fm_core::config::{CandidateStrategy, Config};

pub fn cli() -> Command {
    let defaults = Config::default();

    Command::new("fm_explain")
        .about("Finds and explains anomalies of feature models")

        .arg(Arg::new("path")
            .required(true)
            .value_parser(value_parser!(PathBuf))
            .help("A feature model (.json) or a DIMACS formula (.cnf, or .cnf.xz with the xz feature)."))

        .arg(Arg::new("dead")
            .long("dead")
            .action(ArgAction::SetTrue)
            .help("List the dead features of a model."))

        .arg(Arg::new("false_optional")
            .long("false-optional")
            .action(ArgAction::SetTrue)
            .help("List the false-optional features of a model."))

        .arg(Arg::new("explain")
            .short('e')
            .long("explain")
            .num_args(1)
            .help("Explain why the named feature of a model is dead, or else false-optional."))

        .arg(Arg::new("implies")
            .long("implies")
            .num_args(2)
            .allow_negative_numbers(true)
            .value_parser(value_parser!(i32).range(-(i32::MAX as i64)..=i32::MAX as i64))
            .value_names(["ANTECEDENT", "CONSEQUENT"])
            .help("Explain why one literal of a formula implies another, as DIMACS literals."))

        .arg(Arg::new("strategy")
            .long("strategy")
            .num_args(1)
            .help(format!("How candidate explanations are generated, one of BreadthFirst or Relevance.
Default: {}", defaults.strategy.value)))

        .arg(Arg::new("max_size")
            .long("max-size")
            .num_args(1)
            .value_parser(value_parser!(usize))
            .help(format!("The most clauses in a candidate explanation.
Default: {}", defaults.max_candidate_size.value)))

        .arg(Arg::new("max_candidates")
            .long("max-candidates")
            .num_args(1)
            .value_parser(value_parser!(usize))
            .help(format!("The most candidates generated for an explanation.
Default: {}", defaults.max_candidates.value)))

        .arg(Arg::new("time_limit")
            .short('t')
            .long("time-limit")
            .num_args(1)
            .value_parser(value_parser!(u64))
            .help("The time limit of a single oracle call, in seconds."))

        .arg(Arg::new("parallel")
            .long("parallel")
            .action(ArgAction::SetTrue)
            .help("Validate candidates in parallel."))

        .arg(Arg::new("no_shrink")
            .long("no-shrink")
            .action(ArgAction::SetTrue)
            .help("Do not shrink the formula when no generated candidate is valid."))
}

/// A configuration from the arguments, or a message on some invalid value.
pub fn config_from_args(args: &ArgMatches) -> Result<Config, String> {
    let mut the_config = Config::default();

    if let Some(strategy) = args.get_one::<String>("strategy") {
        match strategy.parse::<CandidateStrategy>() {
            Ok(strategy) => the_config.strategy.value = strategy,
            Err(()) => return Err(format!("Unknown strategy '{strategy}'.")),
        }
    }

    if let Some(size) = args.get_one::<usize>("max_size") {
        if !the_config.max_candidate_size.set(*size) {
            let (min, max) = the_config.max_candidate_size.min_max();
            return Err(format!("max-size requires a value between {min} and {max}"));
        }
    }

    if let Some(count) = args.get_one::<usize>("max_candidates") {
        if !the_config.max_candidates.set(*count) {
            let (min, max) = the_config.max_candidates.min_max();
            return Err(format!("max-candidates requires a value between {min} and {max}"));
        }
    }

    if let Some(secs) = args.get_one::<u64>("time_limit") {
        the_config.time_limit.value = std::time::Duration::from_secs(*secs);
    }

    if args.get_flag("parallel") {
        the_config.parallel_validation.value = true;
    }

    if args.get_flag("no_shrink") {
        the_config.shrink_fallback.value = false;
    }

    Ok(the_config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn implies_literals() {
        let args = cli()
            .try_get_matches_from(["fm_explain", "f.cnf", "--implies", "1", "-2"])
            .unwrap();
        let literals = args.get_many::<i32>("implies").unwrap().copied().collect::<Vec<_>>();
        assert_eq!(literals, vec![1, -2]);
    }

    #[test]
    fn implies_without_negation() {
        let min = i32::MIN.to_string();
        let args = cli().try_get_matches_from(["fm_explain", "f.cnf", "--implies", "1", min.as_str()]);
        assert!(args.is_err());

        let max = i32::MAX.to_string();
        let negated_max = (-i32::MAX).to_string();
        let args = cli().try_get_matches_from([
            "fm_explain",
            "f.cnf",
            "--implies",
            max.as_str(),
            negated_max.as_str(),
        ]);
        assert!(args.is_ok());
    }

    #[test]
    fn config_values() {
        let args = cli()
            .try_get_matches_from(["fm_explain", "f.cnf", "--strategy", "BreadthFirst", "--parallel", "--no-shrink"])
            .unwrap();
        let config = config_from_args(&args).unwrap();
        assert_eq!(config.strategy.value, CandidateStrategy::BreadthFirst);
        assert!(config.parallel_validation.value);
        assert!(!config.shrink_fallback.value);

        let args = cli()
            .try_get_matches_from(["fm_explain", "f.cnf", "--strategy", "Deepest"])
            .unwrap();
        assert!(config_from_args(&args).is_err());
    }
}

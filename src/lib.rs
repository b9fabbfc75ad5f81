//! A library for the analysis of feature models, through their representation as formulas in conjunctive normal form.
//!
//! fm_core compiles a feature model (a tree of features, together with cross-tree constraints) to a formula, finds anomalies of the model such as dead and false-optional features, and explains each anomaly by a small collection of clauses of the formula which on their own entail the anomaly.
//! Models, and artifacts derived from models, are kept on disk by persistent managers.
//!
//! # Orientation
//!
//! The library follows the path of a model from construction to explanation:
//! - A [model](crate::model) is built by hand, or read through a [format handler](crate::io::FormatHandler).
//! - The model is [compiled](crate::model::FeatureModel::compile) to a [formula](crate::cnf::Cnf), where each clause notes its origin in the model.
//! - The [analyzer](crate::analysis::Analyzer) asks a [satisfiability oracle](crate::oracle) about the formula to find anomalies.
//! - An [explainer](crate::explanations) searches subsets of the formula for the least (by the [comparator](crate::cnf::comparator)) subset which entails an anomaly.
//!
//! Independently, a [persistent manager](crate::io::PersistentModelManager) reads and saves a model together with any number of extra artifacts, tolerating failure of individual artifacts.
//!
//! Useful starting points, then, may be:
//! - The [explanation engine](crate::explanations::ExplanationEngine), for the search itself.
//! - The [clause store](crate::cnf), for the representation of formulas.
//! - The [configuration](crate::config), to see what may be adjusted.
//!
//! # Examples
//!
//! + Explain why a feature is false-optional.
//!
//! ```rust
//! # use fm_core::config::Config;
//! # use fm_core::explanations::{ExplanationCreator, FalseOptionalExplainer};
//! # use fm_core::model::{FeatureModel, GroupKind};
//! # use fm_core::model::expr::Expr;
//! let mut model = FeatureModel::new("Phone");
//! model.add_child("Phone", "Screen", true);
//! model.add_child("Phone", "GPS", false);
//! model.add_child("Screen", "Basic", false);
//! model.add_child("Screen", "HighRes", false);
//! model.set_group("Screen", GroupKind::Alternative);
//! model.constraints.push(Expr::not(Expr::var("Basic")));
//! model.constraints.push(Expr::implies(Expr::var("HighRes"), Expr::var("GPS")));
//!
//! let mut explainer = FalseOptionalExplainer::new(&model, Config::default()).unwrap();
//! explainer.set_false_optional_feature(Some("GPS"));
//!
//! let explanation = explainer.explanation().unwrap();
//! for reason in &explanation.reasons {
//!     println!("{reason}");
//! }
//! assert!(explanation.minimal);
//! ```
//!
//! + Explain an implication of a DIMACS formula.
//!
//! ```rust
//! # use fm_core::cnf::Cnf;
//! # use fm_core::config::Config;
//! # use fm_core::explanations::{ExplanationEngine, Goal};
//! let cnf = Cnf::read_dimacs(&b"
//! p cnf 3 3
//!  1  2 0
//! -1  3 0
//!  2 -3 0
//! "[..]).unwrap();
//!
//! let mut engine = ExplanationEngine::from_config(Config::default());
//! let goal = Goal::Implication { antecedent: 1, consequent: 3 };
//!
//! let explanation = engine.explain(&cnf, &goal).unwrap();
//! assert_eq!(explanation.indicies(), vec![1]);
//! ```
//!
//! # Logs
//!
//! Calls to [log!](log) are made throughout the library, with a variety of targets to help narrow output to relevant parts of the library.
//!
//! The targets are listed in [misc::log].
//!
//! For example, when used with [env_logger](https://docs.rs/env_logger/latest/env_logger/):
//! - Logs of the search for an explanation can be found with `RUST_LOG=explanation …`, or
//! - Failures recorded by a persistent manager, and nothing else, with `RUST_LOG=persistence=error …`

#![allow(mixed_script_confusables)]
#![allow(clippy::single_match)]

pub mod analysis;
pub mod cnf;
pub mod config;
pub mod explanations;
pub mod io;
pub mod misc;
pub mod model;
pub mod oracle;
pub mod structures;
pub mod types;

/*!
Configuration of an analysis.

All configuration is contained within [Config], which is cloned into each [explainer](crate::explanations) and [oracle](crate::oracle) built from it.
Each option is a [ConfigOption], which pairs a value with a name and bounds.

```rust
# use fm_core::config::{Config, CandidateStrategy};
let mut config = Config::default();
assert!(config.max_candidate_size.set(3));
assert!(!config.max_candidate_size.set(0));

config.strategy.value = CandidateStrategy::BreadthFirst;
```
*/

mod config_option;
pub use config_option::ConfigOption;

mod strategy;
pub use strategy::CandidateStrategy;

/// Representation used for the probability of choosing a positive value for an atom when freely deciding.
pub type PolarityLean = f64;

/// The primary configuration structure.
#[derive(Clone, Debug)]
pub struct Config {
    /// How candidate explanations are generated.
    pub strategy: ConfigOption<CandidateStrategy>,

    /// The most clauses a generated candidate may contain.
    pub max_candidate_size: ConfigOption<usize>,

    /// The most candidates generated for a single explanation.
    pub max_candidates: ConfigOption<usize>,

    /// The time limit for a single oracle call, where zero is no limit.
    pub time_limit: ConfigOption<std::time::Duration>,

    /// Validate candidates of a batch on separate threads.
    pub parallel_validation: ConfigOption<bool>,

    /// The count of candidates validated together when validating in parallel.
    pub validation_batch: ConfigOption<usize>,

    /// If no generated candidate is valid, shrink the whole (relevant) formula to an irreducible explanation.
    pub shrink_fallback: ConfigOption<bool>,

    /// The probability of assigning positive polarity to an atom when freely choosing an atom.
    pub polarity_lean: ConfigOption<PolarityLean>,
}

impl Default for Config {
    /// The default is configured to give deterministic explanations of small size.
    fn default() -> Self {
        Config {
            strategy: ConfigOption {
                name: "strategy",
                min: CandidateStrategy::MIN,
                max: CandidateStrategy::MAX,
                value: CandidateStrategy::Relevance,
            },

            max_candidate_size: ConfigOption {
                name: "max_candidate_size",
                min: 1,
                max: usize::MAX,
                value: 4,
            },

            max_candidates: ConfigOption {
                name: "max_candidates",
                min: 1,
                max: usize::MAX,
                value: 100_000,
            },

            time_limit: ConfigOption {
                name: "time_limit",
                min: std::time::Duration::from_secs(0),
                max: std::time::Duration::MAX,
                value: std::time::Duration::from_secs(0),
            },

            parallel_validation: ConfigOption {
                name: "parallel_validation",
                min: false,
                max: true,
                value: false,
            },

            validation_batch: ConfigOption {
                name: "validation_batch",
                min: 1,
                max: usize::MAX,
                value: 64,
            },

            shrink_fallback: ConfigOption {
                name: "shrink_fallback",
                min: false,
                max: true,
                value: true,
            },

            polarity_lean: ConfigOption {
                name: "polarity_lean",
                min: 0.0,
                max: 1.0,
                value: 0.0,
            },
        }
    }
}

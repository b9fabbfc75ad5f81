/*!
Miscelanous items related to [logging](log).

Calls to the log macro are made throughout the library.
These are intended to provide useful information when diagnosing an analysis or a failed read/save.

Note, no log implementation is provided by the library.
The `fm_explain` binary installs [env_logger](https://docs.rs/env_logger/latest/env_logger/) when built with the `logger` feature.
*/

/// Targets to be used within a [log]! macro.
pub mod targets {
    /// Logs related to [compilation](crate::model::FeatureModel::compile) of a feature model to a formula.
    pub const COMPILE: &str = "compile";

    /// Logs related to the [clause store](crate::cnf).
    pub const CLAUSE_STORE: &str = "clause_store";

    /// Logs related to [oracle](crate::oracle) calls.
    pub const ORACLE: &str = "oracle";

    /// Logs related to model-wide [analysis](crate::analysis).
    pub const ANALYSIS: &str = "analysis";

    /// Logs related to [explanation search](crate::explanations).
    pub const EXPLANATION: &str = "explanation";

    /// Logs related to reading and saving models through a [manager](crate::io::PersistentModelManager).
    pub const PERSISTENCE: &str = "persistence";

    /// Logs related to the [registry](crate::io::ManagerRegistry) of managers.
    pub const REGISTRY: &str = "registry";
}

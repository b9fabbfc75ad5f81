use std::sync::PoisonError;

use crate::{
    cnf::Cnf,
    io::{PersistentHandler, SharedModel},
    types::err,
};

/// The compiled formula of a model, in DIMACS form with atoms named by comment.
///
/// The formula is compiled from the shared model on each write.
/// On read, the formula is parsed and kept, and is available as [formula](DimacsExport::formula).
pub struct DimacsExport {
    model: SharedModel,

    formula: Option<Cnf>,
}

impl DimacsExport {
    pub fn new(model: SharedModel) -> Self {
        DimacsExport {
            model,
            formula: None,
        }
    }

    /// The formula of the most recent read, if any.
    pub fn formula(&self) -> Option<&Cnf> {
        self.formula.as_ref()
    }
}

impl PersistentHandler for DimacsExport {
    fn suffix(&self) -> &str {
        "cnf"
    }

    fn read(&mut self, content: &str) -> Result<(), err::FormatError> {
        self.formula = Some(Cnf::read_dimacs(content.as_bytes())?);
        Ok(())
    }

    fn write(&self) -> Result<String, err::FormatError> {
        let model = self.model.read().unwrap_or_else(PoisonError::into_inner);
        Ok(model.compile()?.as_dimacs())
    }
}

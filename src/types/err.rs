//! Error types used in the library.
//!
//! - Some of these are internally expected --- e.g. a single failing extra handler is recorded, and the remaining handlers still run.
//! - Some are external --- e.g. an explainer returns `Inexplicable` when no subset of the formula justifies a property, which is an answer rather than a fault.
//!
//! Names of the error enums --- for the most part --- overlap with the module they originate from.
//  As such, throughout the library err::{self} is often used to prefix use of the types with `err::`.

use std::{path::PathBuf, sync::Arc};

use thiserror::Error;

#[derive(Clone, Debug, Error)]
pub enum ErrorKind {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Explanation(#[from] ExplanationError),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// Errors when compiling a feature model to a formula.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum CompileError {
    /// The model has no features at all.
    #[error("the feature model has no root feature")]
    NoRoot,

    /// More than one feature has no parent.
    #[error("the feature model has more than one root: {0} and {1}")]
    MultipleRoots(String, String),

    /// Two features share a name.
    #[error("duplicate feature `{0}`")]
    DuplicateFeature(String),

    /// A parent, or a name in a constraint, which is not a feature of the model.
    #[error("unknown feature `{0}`")]
    UnknownFeature(String),

    /// Following parents from the feature never reaches the root.
    #[error("feature `{0}` is part of a parent cycle")]
    Cycle(String),
}

/// Errors from an explanation request.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ExplanationError {
    /// An explanation was requested before the subject of the explanation was set.
    #[error("no subject has been set for the explanation")]
    InvalidState,

    /// No candidate subset of the formula entails the goal.
    #[error("the property cannot be explained by the formula")]
    Inexplicable,

    /// The oracle could not decide some candidate (e.g. the time limit was reached).
    #[error("the oracle could not decide a candidate")]
    Unknown,

    /// The subject is not a feature of the analysed model.
    #[error("unknown feature `{0}`")]
    UnknownFeature(String),

    /// The subject has no parent, and so cannot be false-optional.
    #[error("feature `{0}` has no parent")]
    NoParent(String),

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

/// Errors when converting between a text representation and an object.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum FormatError {
    /// The JSON (de)serializer failed, with the message of the failure.
    #[error("json: {0}")]
    Json(String),

    /// Some line of a line-based format could not be read.
    #[error("malformed line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    /// A handler was asked to write before it had anything to write.
    #[error("nothing to write")]
    Empty,

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl From<serde_json::Error> for FormatError {
    fn from(e: serde_json::Error) -> Self {
        FormatError::Json(e.to_string())
    }
}

/// Errors from the satisfiability oracle.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum OracleError {
    /// A clause or assumption contained the literal `0`, which has no atom.
    #[error("the literal 0 has no atom")]
    ZeroLiteral,

    /// A worker validating candidates in parallel did not return.
    #[error("a validation worker failed")]
    Worker,

    /// The oracle reported unknown where an analysis required an answer.
    #[error("the oracle could not decide the formula")]
    Undecided,
}

/// Errors during parsing of DIMACS input.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ParseError {
    /// Some issue with the problem specification in a DIMACS input.
    #[error("malformed problem specification")]
    ProblemSpecification,

    /// Some unspecific problem at a specific line.
    #[error("unreadable line {0}")]
    Line(usize),

    /// A token which is not an integer, at a specific line.
    #[error("bad literal `{1}` at line {0}")]
    Literal(usize, String),

    /// Input ended inside a clause (no terminating `0`).
    #[error("unterminated clause")]
    Unterminated,
}

/// Errors from reading or saving a model, and from the registry of managers.
///
/// Errors are clonable so a copy may be both returned and kept as part of a manager's record of the last operation.
#[derive(Clone, Debug, Error)]
pub enum PersistError {
    /// An underlying I/O failure on the given path.
    #[error("i/o failure on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: Arc<std::io::Error>,
    },

    /// The hidden folder for extra artifacts could not be created.
    #[error("could not create folder {path:?}: {source}")]
    FolderCreation {
        path: PathBuf,
        #[source]
        source: Arc<std::io::Error>,
    },

    /// A handler could not read or write the content of the given path.
    #[error("format failure on {path:?}: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: FormatError,
    },

    /// A path without a final file name component.
    #[error("{0:?} does not name a file")]
    InvalidPath(PathBuf),
}

impl PersistError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PersistError::Io {
            path: path.into(),
            source: Arc::new(source),
        }
    }

    pub fn format(path: impl Into<PathBuf>, source: FormatError) -> Self {
        PersistError::Format {
            path: path.into(),
            source,
        }
    }
}

//! Handlers for the primary file of a model, and for extra artifacts.
//!
//! - [JsonFormat], the primary format of models.
//! - [ColorSchemeHandler], an extra artifact of colours assigned to features.
//! - [DimacsExport], an extra artifact of the compiled formula of a model.

mod colors;
mod dimacs;
mod json;

pub use colors::{Color, ColorScheme, ColorSchemeHandler};
pub use dimacs::DimacsExport;
pub use json::JsonFormat;

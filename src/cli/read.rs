use std::{ffi::OsString, path::Path};

use fm_core::{
    cnf::Cnf,
    io::{formats::JsonFormat, FormatHandler},
    model::FeatureModel,
    types::err::{self},
};

pub(super) enum ReadError {
    NoExtension,
    Format(err::FormatError),
    Parse(err::ParseError),
    UnknownExtension(OsString),
    FailedToOpen,
}

impl std::fmt::Display for ReadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self {
            Self::NoExtension => write!(f, "The file does not have an extension."),
            Self::Format(e) => write!(f, "Format error: '{e}'."),
            Self::Parse(e) => write!(f, "Parse error: '{e}'."),
            Self::UnknownExtension(ex) => write!(f, "Unsupported extension '{ex:?}'."),
            Self::FailedToOpen => write!(f, "Failed to open the file."),
        }
    }
}

/// What was read from a path.
pub(super) enum Input {
    Model(FeatureModel),
    Formula(Cnf),
}

/// Reads a model or formula from `path`, by extension.
pub(super) fn read_input(path: &Path) -> Result<Input, ReadError> {
    println!("c Reading from {path:?}");

    let extension = match path.extension() {
        Some(extension) => extension,
        None => return Err(ReadError::NoExtension),
    };

    if extension == "json" {
        let content = std::fs::read_to_string(path).map_err(|_| ReadError::FailedToOpen)?;
        return JsonFormat
            .read(&content)
            .map(Input::Model)
            .map_err(ReadError::Format);
    }

    let file = match std::fs::File::open(path) {
        Ok(file) => file,
        Err(_) => return Err(ReadError::FailedToOpen),
    };

    let parse_report = match extension {
        #[cfg(feature = "xz")]
        extension if extension == "xz" => {
            Cnf::read_dimacs(std::io::BufReader::new(xz2::read::XzDecoder::new(&file)))
        }

        extension if extension == "cnf" => Cnf::read_dimacs(std::io::BufReader::new(&file)),

        unknown => return Err(ReadError::UnknownExtension(unknown.to_owned())),
    };

    match parse_report {
        Ok(cnf) => {
            println!("c Atom count:       {}", cnf.variables.atom_count());
            println!("c Clause count:     {}", cnf.clauses.len());
            Ok(Input::Formula(cnf))
        }

        Err(e) => Err(ReadError::Parse(e)),
    }
}

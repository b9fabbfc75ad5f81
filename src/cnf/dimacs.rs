use std::io::BufRead;

use crate::{
    cnf::{ClauseList, ClauseOrigin, Cnf},
    misc::log::targets::{self},
    structures::{
        atom::Atom,
        clause::{Clause, IntClause, LiteralSet},
        literal::CLiteral,
    },
    types::err::{self},
};

impl Cnf {
    /// Reads a formula in DIMACS form.
    ///
    /// Comment lines of the form `c <atom> <name>`, as written by [as_dimacs](Cnf::as_dimacs), name the atom.
    /// Other comments are skipped.
    /// Literals are stored as given, without removing duplicates.
    ///
    /// ```rust
    /// # use fm_core::cnf::Cnf;
    /// # use std::io::Write;
    /// let mut dimacs = vec![];
    /// let _ = dimacs.write(b"
    /// c 1 Root
    /// c 2 Leaf
    /// p cnf 2 2
    ///  1      0
    /// -2  1   0
    /// ");
    ///
    /// let cnf = Cnf::read_dimacs(dimacs.as_slice()).unwrap();
    /// assert_eq!(cnf.clauses.len(), 2);
    /// assert_eq!(cnf.variables.atom_of("Leaf"), Some(2));
    /// ```
    #[allow(unused_labels)]
    pub fn read_dimacs(mut reader: impl BufRead) -> Result<Cnf, err::ParseError> {
        let mut cnf = Cnf::default();
        let mut buffer = String::with_capacity(1024);
        let mut clause_buffer: IntClause = Vec::default();

        let mut line_counter = 0;
        let mut expected: Option<(usize, usize)> = None;

        'formula_loop: loop {
            buffer.clear();
            match reader.read_line(&mut buffer) {
                Ok(0) => break,
                Ok(_) => line_counter += 1,
                Err(_) => return Err(err::ParseError::Line(line_counter)),
            }

            match buffer.trim_start().chars().next() {
                None => {}

                Some('%') => break 'formula_loop,

                Some('c') => {
                    let mut details = buffer.split_whitespace().skip(1);
                    if let Some(Ok(atom)) = details.next().map(|atom| atom.parse::<Atom>()) {
                        let name = details.collect::<Vec<_>>().join(" ");
                        if atom != 0 && !name.is_empty() {
                            cnf.variables.name_atom(atom, &name);
                        }
                    }
                }

                Some('p') => {
                    let mut problem_details = buffer.split_whitespace().skip(2);
                    let atom_count = problem_details
                        .next()
                        .and_then(|count| count.parse::<usize>().ok());
                    let clause_count = problem_details
                        .next()
                        .and_then(|count| count.parse::<usize>().ok());
                    match (atom_count, clause_count) {
                        (Some(atoms), Some(clauses)) => expected = Some((atoms, clauses)),
                        _ => return Err(err::ParseError::ProblemSpecification),
                    }
                }

                _ => {
                    for item in buffer.split_whitespace() {
                        match item.parse::<CLiteral>() {
                            Ok(0) => {
                                let the_clause = std::mem::take(&mut clause_buffer);
                                cnf.add_clause(LiteralSet::from(the_clause), ClauseOrigin::Input);
                            }
                            Ok(literal) => clause_buffer.push(literal),
                            Err(_) => {
                                return Err(err::ParseError::Literal(line_counter, item.to_owned()))
                            }
                        }
                    }
                }
            }
        }

        if !clause_buffer.is_empty() {
            return Err(err::ParseError::Unterminated);
        }

        if let Some((atoms, clauses)) = expected {
            if clauses != cnf.clauses.len() || atoms < cnf.clauses.max_atom() as usize {
                log::warn!(target: targets::CLAUSE_STORE, "Expected {atoms} atoms and {clauses} clauses, read {} atoms and {} clauses", cnf.clauses.max_atom(), cnf.clauses.len());
            }
        }

        Ok(cnf)
    }

    /// The formula in DIMACS form, preceded by a comment naming each named atom.
    pub fn as_dimacs(&self) -> String {
        let atom_count = std::cmp::max(
            self.variables.atom_count(),
            self.clauses.max_atom() as usize,
        );

        let mut dimacs = String::new();
        for (atom, name) in self.variables.named() {
            dimacs.push_str(format!("c {atom} {name}\n").as_str());
        }
        dimacs.push_str(format!("p cnf {atom_count} {}\n", self.clauses.len()).as_str());
        for clause in self.clauses.iter() {
            dimacs.push_str(clause.as_dimacs(true).as_str());
            dimacs.push('\n');
        }
        dimacs
    }
}

impl ClauseList {
    /// Reads a formula in DIMACS form, ignoring any names given to atoms.
    pub fn read_dimacs(reader: impl BufRead) -> Result<ClauseList, err::ParseError> {
        Cnf::read_dimacs(reader).map(|cnf| cnf.clauses)
    }
}

//! Sample programs bundled with the crate.

use crate::parser::parse_with;
use crate::types::{Grammar, Program, TuringMachineError, COMMENT_MARKER};

// Embedded program sources, keyed by name.
const PROGRAM_TEXTS: [(&str, &str); 4] = [
    ("flip", include_str!("../programs/flip.tm")),
    (
        "binary-increment",
        include_str!("../programs/binary-increment.tm"),
    ),
    ("unary-addition", include_str!("../programs/unary-addition.tm")),
    ("busy-beaver-2", include_str!("../programs/busy-beaver-2.tm")),
];

lazy_static::lazy_static! {
    pub static ref PROGRAMS: Vec<ProgramInfo> = PROGRAM_TEXTS
        .iter()
        .map(|&(name, source)| ProgramInfo {
            name,
            description: describe(source),
            source,
        })
        .collect();
}

/// A bundled program source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramInfo {
    pub name: &'static str,
    /// Text of the leading comment line, if any.
    pub description: String,
    pub source: &'static str,
}

impl ProgramInfo {
    pub fn parse(&self) -> Result<Program, TuringMachineError> {
        self.parse_with(&Grammar::default())
    }

    /// Builds the program with a custom move-token grammar.
    pub fn parse_with(&self, grammar: &Grammar) -> Result<Program, TuringMachineError> {
        Ok(parse_with(self.source, grammar)?)
    }
}

pub struct ProgramManager;

impl ProgramManager {
    /// Get the number of available programs
    pub fn get_program_count() -> usize {
        PROGRAMS.len()
    }

    /// Get the names of all available programs, in catalogue order
    pub fn list_program_names() -> Vec<&'static str> {
        PROGRAMS.iter().map(|info| info.name).collect()
    }

    /// Get a program's source and description by its name
    pub fn get_program_info(name: &str) -> Option<&'static ProgramInfo> {
        PROGRAMS.iter().find(|info| info.name == name)
    }

    /// Get a built program by its name
    pub fn get_program_by_name(name: &str) -> Result<Program, TuringMachineError> {
        Self::get_program_by_name_with(name, &Grammar::default())
    }

    /// Get a program by its name, built with a custom move-token grammar
    pub fn get_program_by_name_with(
        name: &str,
        grammar: &Grammar,
    ) -> Result<Program, TuringMachineError> {
        Self::get_program_info(name)
            .ok_or_else(|| TuringMachineError::FileError(format!("Unknown program '{name}'")))?
            .parse_with(grammar)
    }

    /// Get a built program by its index
    pub fn get_program_by_index(index: usize) -> Result<Program, TuringMachineError> {
        PROGRAMS
            .get(index)
            .ok_or_else(|| {
                TuringMachineError::FileError(format!("Program index {index} out of range"))
            })?
            .parse()
    }
}

/// Extracts the first comment line of a source as its description.
fn describe(source: &str) -> String {
    source
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .and_then(|line| line.strip_prefix(COMMENT_MARKER))
        .map(|text| text.trim().to_string())
        .unwrap_or_default()
}

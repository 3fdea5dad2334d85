//! This crate provides the core logic for a line-oriented Turing Machine language.
//! It includes modules for normalizing and classifying source lines, folding them into a
//! validated transition table, and executing that table against a sparse single tape.

pub mod analyzer;
pub mod builder;
pub mod loader;
pub mod machine;
pub mod parser;
pub mod programs;
pub mod tape;
pub mod types;

/// Re-exports the `Rule` enum from the parser module, used by the `pest` grammar.
pub use crate::parser::Rule;
/// Re-exports the `ProgramBuilder` struct from the builder module.
pub use builder::ProgramBuilder;
/// Re-exports the `ProgramLoader` struct from the loader module.
pub use loader::ProgramLoader;
/// Re-exports the interpreter and its step outcome from the machine module.
pub use machine::{run, Step, TuringMachine};
/// Re-exports the parse entry points from the parser module.
pub use parser::{parse, parse_lines, parse_with};
/// Re-exports `ProgramInfo`, `ProgramManager`, and `PROGRAMS` from the programs module.
pub use programs::{ProgramInfo, ProgramManager, PROGRAMS};
/// Re-exports the `Tape` struct from the tape module.
pub use tape::Tape;
/// Re-exports the data model, grammar configuration, diagnostics, and errors.
pub use types::{
    BuildError, Direction, Grammar, Program, Rejection, State, Transition, TuringMachineError,
    Warning, BLANK_SYMBOL, MAX_PROGRAM_SIZE,
};

//! This module defines the core data structures and types used throughout the Turing Machine
//! language, including the transition table, grammar configuration, diagnostics, and error types.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use thiserror::Error;

/// The blank symbol. An unvisited tape cell reads as this symbol.
pub const BLANK_SYMBOL: char = '_';
/// Everything from this marker to the end of a line is a comment.
pub const COMMENT_MARKER: &str = "//";
/// Name of the halt state synthesized when no state is tagged `[halt]`.
pub const IMPLICIT_HALT_STATE: &str = "halt";
/// Tag value designating the start state.
pub const START_TAG: &str = "start";
/// Tag value designating the halt state.
pub const HALT_TAG: &str = "halt";
/// The maximum allowed size for a program source in bytes.
pub const MAX_PROGRAM_SIZE: usize = 65536; // 64KB

/// Represents the possible directions the tape head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// The `L` move. Advances the position index by one.
    Left,
    /// The `R` move. Decrements the position index by one.
    Right,
    /// Keep the head in the same position.
    Stay,
}

impl Direction {
    /// Returns the change applied to the head position after a write.
    ///
    /// The language defines `L` as moving towards higher indices and `R` towards lower
    /// ones. Output is rendered in ascending index order, so `L` walks forward through
    /// the input string.
    pub fn offset(self) -> i64 {
        match self {
            Direction::Left => 1,
            Direction::Right => -1,
            Direction::Stay => 0,
        }
    }
}

/// The action taken when a state reads a particular symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// Symbol written to the current cell.
    pub write: char,
    /// Head movement applied after the write.
    pub direction: Direction,
    /// The state the machine transitions to.
    pub next_state: String,
}

/// A named state and its transitions, keyed by the symbol read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    pub name: String,
    pub transitions: BTreeMap<char, Transition>,
}

impl State {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transitions: BTreeMap::new(),
        }
    }
}

/// A validated transition table.
///
/// Programs are only produced by [`crate::builder::ProgramBuilder`] and are immutable
/// afterwards. Every `next_state` of every transition names a state in the table, and the
/// halt state never has transitions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Program {
    /// States in declaration order. A synthesized halt state comes last.
    pub(crate) states: Vec<State>,
    #[serde(skip)]
    pub(crate) index: HashMap<String, usize>,
    pub(crate) start: String,
    pub(crate) halt: String,
    /// Every symbol read or written by an instruction.
    pub(crate) alphabet: BTreeSet<char>,
    pub(crate) warnings: Vec<Warning>,
}

impl Program {
    /// Returns the name of the start state.
    pub fn start(&self) -> &str {
        &self.start
    }

    /// Returns the name of the halt state.
    pub fn halt(&self) -> &str {
        &self.halt
    }

    /// Returns all states in declaration order.
    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// Looks up a state by name.
    pub fn state(&self, name: &str) -> Option<&State> {
        self.index.get(name).map(|&i| &self.states[i])
    }

    /// Returns the transition for `symbol` in `state`, if one is defined.
    pub fn transition(&self, state: &str, symbol: char) -> Option<&Transition> {
        self.state(state)
            .and_then(|state| state.transitions.get(&symbol))
    }

    pub fn contains_state(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn alphabet(&self) -> &BTreeSet<char> {
        &self.alphabet
    }

    pub fn symbol_count(&self) -> usize {
        self.alphabet.len()
    }

    /// Non-fatal diagnostics collected while building the program.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }
}

/// Token spellings for the move slot of an instruction.
///
/// Revisions of the language disagree on the "no shift" token, so both `N` and `S` are
/// accepted by default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grammar {
    pub left: Vec<String>,
    pub right: Vec<String>,
    pub stay: Vec<String>,
}

impl Default for Grammar {
    fn default() -> Self {
        Self {
            left: vec!["L".into()],
            right: vec!["R".into()],
            stay: vec!["N".into(), "S".into()],
        }
    }
}

impl Grammar {
    /// Replaces the accepted "no shift" tokens.
    pub fn with_stay_tokens<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stay = tokens.into_iter().map(Into::into).collect();
        self
    }

    /// Resolves a move token to its direction.
    pub fn direction(&self, token: &str) -> Option<Direction> {
        let matches = |tokens: &[String]| tokens.iter().any(|t| t == token);

        if matches(&self.left) {
            Some(Direction::Left)
        } else if matches(&self.right) {
            Some(Direction::Right)
        } else if matches(&self.stay) {
            Some(Direction::Stay)
        } else {
            None
        }
    }
}

/// Non-fatal findings reported alongside a successfully built program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Warning {
    /// Declared states that no transition targets. The start state is usually among them.
    UnusedStates(Vec<String>),
    /// Instructions written under the halt state. They are never executed and were dropped.
    IgnoredHaltRules { state: String, count: usize },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::UnusedStates(names) => write!(f, "Unused states ({})", names.join(", ")),
            Warning::IgnoredHaltRules { state, count } => write!(
                f,
                "Ignored {count} instruction(s) in halt state '{state}'"
            ),
        }
    }
}

/// Static defects in program text. Building stops at the first one found, except for
/// undefined state references which are reported together.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// A line matches neither a state declaration nor an instruction.
    #[error("Error (line {line}): {reason}")]
    Syntax { line: usize, reason: String },
    #[error("Error (line {line}): Duplicate state '{name}'")]
    DuplicateState { line: usize, name: String },
    #[error("Error (line {line}): Duplicate [start] tag")]
    DuplicateStart { line: usize },
    #[error("Error (line {line}): Duplicate [halt] tag")]
    DuplicateHalt { line: usize },
    /// An instruction appears before any state declaration.
    #[error("Error (line {line}): Orphan instruction")]
    OrphanInstruction { line: usize },
    #[error("Error (line {line}): Duplicate instruction for symbol '{symbol}' in state '{state}'")]
    DuplicateRule {
        line: usize,
        state: String,
        symbol: char,
    },
    /// No state is tagged `[halt]` but the implicit halt name is already taken.
    #[error("Error: cannot create implicit halt state, '{name}' is already declared")]
    HaltNameCollision { name: String },
    #[error("Error: References to undefined states ({})", .names.join(", "))]
    UndefinedStates { names: Vec<String> },
    /// The program declares no states at all.
    #[error("Error: No start state")]
    NoStartState,
}

/// The machine read a symbol for which its current state has no transition.
///
/// This is an expected outcome for inputs the machine was not designed to accept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("Reject (no instruction for symbol '{symbol}' in state '{state}')")]
pub struct Rejection {
    pub state: String,
    pub symbol: char,
}

/// Represents every failure a host can see when loading and running a program.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TuringMachineError {
    /// The program text is invalid.
    #[error(transparent)]
    Build(#[from] BuildError),
    /// The machine rejected its input.
    #[error(transparent)]
    Rejected(#[from] Rejection),
    /// Indicates an error related to reading program sources.
    #[error("File error: {0}")]
    FileError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_serialization() {
        let left_json = serde_json::to_string(&Direction::Left).unwrap();
        let stay_json = serde_json::to_string(&Direction::Stay).unwrap();

        assert_eq!(left_json, "\"Left\"");
        assert_eq!(stay_json, "\"Stay\"");

        let left: Direction = serde_json::from_str(&left_json).unwrap();
        assert_eq!(left, Direction::Left);
    }

    #[test]
    fn test_direction_offsets_are_inverted() {
        assert_eq!(Direction::Left.offset(), 1);
        assert_eq!(Direction::Right.offset(), -1);
        assert_eq!(Direction::Stay.offset(), 0);
    }

    #[test]
    fn test_default_grammar_accepts_both_stay_spellings() {
        let grammar = Grammar::default();

        assert_eq!(grammar.direction("L"), Some(Direction::Left));
        assert_eq!(grammar.direction("R"), Some(Direction::Right));
        assert_eq!(grammar.direction("N"), Some(Direction::Stay));
        assert_eq!(grammar.direction("S"), Some(Direction::Stay));
        assert_eq!(grammar.direction("Q"), None);
    }

    #[test]
    fn test_grammar_with_custom_stay_token() {
        let grammar = Grammar::default().with_stay_tokens(["-"]);

        assert_eq!(grammar.direction("-"), Some(Direction::Stay));
        assert_eq!(grammar.direction("N"), None);
        assert_eq!(grammar.direction("S"), None);
    }

    #[test]
    fn test_error_display() {
        let error = BuildError::UndefinedStates {
            names: vec!["q7".into(), "q9".into()],
        };
        assert_eq!(
            error.to_string(),
            "Error: References to undefined states (q7, q9)"
        );

        let rejection = Rejection {
            state: "q0".into(),
            symbol: '1',
        };
        assert_eq!(
            TuringMachineError::from(rejection).to_string(),
            "Reject (no instruction for symbol '1' in state 'q0')"
        );
    }

    #[test]
    fn test_warning_display() {
        let warning = Warning::UnusedStates(vec!["q0".into(), "halt".into()]);
        assert_eq!(warning.to_string(), "Unused states (q0, halt)");
    }
}

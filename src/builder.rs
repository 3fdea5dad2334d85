//! This module folds classified source lines into a [`Program`].
//!
//! Lines are consumed strictly in order. The builder tracks the most recently declared
//! state, the explicit `[start]` and `[halt]` tags, and every state name referenced by an
//! instruction. Implicit defaults and whole-table validation run once in
//! [`ProgramBuilder::finish`], which is what makes forward references legal.

use crate::{
    analyzer::analyze,
    parser::{Line, Statement, Tag},
    types::{BuildError, Direction, Program, State, Transition, Warning, IMPLICIT_HALT_STATE},
};
use std::collections::{BTreeSet, HashMap};

/// Accumulates states and transitions from classified lines.
#[derive(Debug, Default)]
pub struct ProgramBuilder {
    states: Vec<State>,
    index: HashMap<String, usize>,
    /// Index of the most recently declared state.
    current: Option<usize>,
    start: Option<String>,
    halt: Option<String>,
    alphabet: BTreeSet<char>,
    referenced: BTreeSet<String>,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a single classified line.
    pub fn push(&mut self, line: Line) -> Result<(), BuildError> {
        match line.statement {
            Statement::StateDecl { name, tag } => self.declare_state(line.number, name, tag),
            Statement::Instruction {
                read,
                write,
                direction,
                target,
            } => self.add_instruction(line.number, read, write, direction, target),
        }
    }

    fn declare_state(
        &mut self,
        line: usize,
        name: String,
        tag: Option<Tag>,
    ) -> Result<(), BuildError> {
        if self.index.contains_key(&name) {
            return Err(BuildError::DuplicateState { line, name });
        }

        match tag {
            Some(Tag::Start) => {
                if self.start.is_some() {
                    return Err(BuildError::DuplicateStart { line });
                }
                self.start = Some(name.clone());
            }
            Some(Tag::Halt) => {
                if self.halt.is_some() {
                    return Err(BuildError::DuplicateHalt { line });
                }
                self.halt = Some(name.clone());
            }
            None => {}
        }

        let position = self.states.len();
        self.index.insert(name.clone(), position);
        self.states.push(State::new(name));
        self.current = Some(position);

        Ok(())
    }

    fn add_instruction(
        &mut self,
        line: usize,
        read: char,
        write: char,
        direction: Direction,
        target: String,
    ) -> Result<(), BuildError> {
        let state = self
            .current
            .map(|i| &mut self.states[i])
            .ok_or(BuildError::OrphanInstruction { line })?;

        if state.transitions.contains_key(&read) {
            return Err(BuildError::DuplicateRule {
                line,
                state: state.name.clone(),
                symbol: read,
            });
        }

        state.transitions.insert(
            read,
            Transition {
                write,
                direction,
                next_state: target.clone(),
            },
        );

        self.alphabet.insert(read);
        self.alphabet.insert(write);
        self.referenced.insert(target);

        Ok(())
    }

    /// Resolves implicit start and halt states, validates references, and produces the
    /// immutable program.
    ///
    /// # Returns
    ///
    /// * `Err(BuildError::NoStartState)` if no state was declared.
    /// * `Err(BuildError::HaltNameCollision)` if a halt state must be synthesized but its
    ///   name is taken.
    /// * `Err(BuildError::UndefinedStates)` listing every referenced but undeclared state.
    pub fn finish(mut self) -> Result<Program, BuildError> {
        let start = self.resolve_start()?;
        let halt = self.resolve_halt()?;
        let ignored = self.clear_halt_transitions(&halt);

        let mut program = Program {
            states: self.states,
            index: self.index,
            start,
            halt,
            alphabet: self.alphabet,
            warnings: Vec::new(),
        };

        let mut warnings = analyze(&program, &self.referenced)?;
        warnings.extend(ignored);
        program.warnings = warnings;

        Ok(program)
    }

    /// Falls back to the first declared state when no state is tagged `[start]`.
    fn resolve_start(&mut self) -> Result<String, BuildError> {
        self.start
            .take()
            .or_else(|| self.states.first().map(|state| state.name.clone()))
            .ok_or(BuildError::NoStartState)
    }

    /// Synthesizes an empty `halt` state when no state is tagged `[halt]`.
    fn resolve_halt(&mut self) -> Result<String, BuildError> {
        if let Some(halt) = self.halt.take() {
            return Ok(halt);
        }

        if self.index.contains_key(IMPLICIT_HALT_STATE) {
            return Err(BuildError::HaltNameCollision {
                name: IMPLICIT_HALT_STATE.to_string(),
            });
        }

        self.index
            .insert(IMPLICIT_HALT_STATE.to_string(), self.states.len());
        self.states.push(State::new(IMPLICIT_HALT_STATE));

        Ok(IMPLICIT_HALT_STATE.to_string())
    }

    /// Drops instructions written under the halt state, since it never executes.
    fn clear_halt_transitions(&mut self, halt: &str) -> Option<Warning> {
        let state = self.index.get(halt).map(|&i| &mut self.states[i])?;
        if state.transitions.is_empty() {
            return None;
        }

        let count = state.transitions.len();
        state.transitions.clear();

        Some(Warning::IgnoredHaltRules {
            state: halt.to_string(),
            count,
        })
    }
}

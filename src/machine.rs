//! This module defines the `TuringMachine` struct, which executes a validated [`Program`]
//! against a sparse single tape. It exposes a single-step primitive for hosts that want to
//! trace or budget a run, and an all-in-one `run` that loops until halt or reject.

use crate::tape::Tape;
use crate::types::{Program, Rejection};

/// Represents the outcome of a single execution step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// The machine performed a transition and has not reached the halt state.
    Continue,
    /// The machine is in the halt state. Stepping again is a no-op.
    Halt,
    /// No transition matches the symbol under the head in the current state.
    Reject(Rejection),
}

/// A single-tape machine bound to a program.
///
/// The program is only borrowed and never modified, so any number of machines can run the
/// same program, each with its own tape.
#[derive(Debug, Clone)]
pub struct TuringMachine<'p> {
    program: &'p Program,
    state: &'p str,
    head: i64,
    tape: Tape,
    step_count: usize,
}

impl<'p> TuringMachine<'p> {
    /// Creates a machine in the start state with `input` written at positions `0..len`
    /// and the head at position 0.
    pub fn new(program: &'p Program, input: &str) -> Self {
        Self {
            program,
            state: program.start(),
            head: 0,
            tape: Tape::from_input(input),
            step_count: 0,
        }
    }

    /// Executes a single step: read, look up, write, move, transition.
    ///
    /// # Returns
    ///
    /// * `Step::Continue` if a transition was applied.
    /// * `Step::Halt` if the machine was already in the halt state.
    /// * `Step::Reject(_)` if the current state has no rule for the symbol read. The
    ///   visited cell stays materialized.
    pub fn step(&mut self) -> Step {
        if self.is_halted() {
            return Step::Halt;
        }

        let symbol = self.tape.read(self.head);
        let Some(transition) = self.program.transition(self.state, symbol) else {
            return Step::Reject(Rejection {
                state: self.state.to_string(),
                symbol,
            });
        };

        self.tape.write(self.head, transition.write);
        self.head += transition.direction.offset();
        self.state = &transition.next_state;
        self.step_count += 1;

        Step::Continue
    }

    /// Runs until the halt state is reached and returns the rendered tape.
    ///
    /// There is no step limit. Hosts that need one should drive [`TuringMachine::step`]
    /// themselves.
    pub fn run(&mut self) -> Result<String, Rejection> {
        loop {
            match self.step() {
                Step::Continue => continue,
                Step::Halt => return Ok(self.output()),
                Step::Reject(rejection) => return Err(rejection),
            }
        }
    }

    /// Returns the current state of the machine.
    pub fn state(&self) -> &str {
        self.state
    }

    /// Returns the head position. Position 0 is the first input symbol.
    pub fn head(&self) -> i64 {
        self.head
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    /// Returns the number of transitions applied so far.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    pub fn is_halted(&self) -> bool {
        self.state == self.program.halt()
    }

    /// Renders the materialized tape cells in position order.
    pub fn output(&self) -> String {
        self.tape.render()
    }
}

/// Runs `program` on `input` and returns the final tape contents.
pub fn run(program: &Program, input: &str) -> Result<String, Rejection> {
    TuringMachine::new(program, input).run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::types::BLANK_SYMBOL;

    const FLIP: &str = r#"
flip [start]
  0 -> 1 L flip
  1 -> 0 L flip
  _ -> _ N done
done [halt]
"#;

    #[test]
    fn test_machine_creation() {
        let program = parse(FLIP).unwrap();
        let machine = TuringMachine::new(&program, "01");

        assert_eq!(machine.state(), "flip");
        assert_eq!(machine.head(), 0);
        assert_eq!(machine.step_count(), 0);
        assert_eq!(machine.output(), "01");
        assert!(!machine.is_halted());
    }

    #[test]
    fn test_single_step_moves_left_token_upward() {
        let program = parse(FLIP).unwrap();
        let mut machine = TuringMachine::new(&program, "01");

        assert_eq!(machine.step(), Step::Continue);
        assert_eq!(machine.head(), 1);
        assert_eq!(machine.output(), "11");
        assert_eq!(machine.step_count(), 1);
    }

    #[test]
    fn test_right_token_moves_downward() {
        let program = parse("q0\n0 -> 0 R q0\n_ -> x N halt\n").unwrap();
        let mut machine = TuringMachine::new(&program, "00");

        assert_eq!(machine.step(), Step::Continue);
        assert_eq!(machine.head(), -1);
        assert_eq!(machine.run(), Ok("x00".to_string()));
    }

    #[test]
    fn test_run_to_completion_with_trailing_blank() {
        let program = parse(FLIP).unwrap();

        assert_eq!(run(&program, "0110"), Ok("1001_".to_string()));
    }

    #[test]
    fn test_halt_step_is_idempotent() {
        let program = parse(FLIP).unwrap();
        let mut machine = TuringMachine::new(&program, "");

        assert_eq!(machine.step(), Step::Continue);
        assert!(machine.is_halted());
        assert_eq!(machine.step(), Step::Halt);
        assert_eq!(machine.step(), Step::Halt);
        assert_eq!(machine.step_count(), 1);
    }

    #[test]
    fn test_reject_after_moving_onto_blank() {
        // `R` moves to position -1, which has never been written.
        let program = parse("q0 [start]\n0 -> 1 R q0\n").unwrap();

        assert_eq!(program.halt(), "halt");
        assert_eq!(
            run(&program, "0"),
            Err(Rejection {
                state: "q0".into(),
                symbol: BLANK_SYMBOL
            })
        );
    }

    #[test]
    fn test_reject_on_written_symbol() {
        let program = parse("q0 [start]\n0 -> 1 N q0\n").unwrap();
        let mut machine = TuringMachine::new(&program, "0");

        assert_eq!(machine.step(), Step::Continue);
        assert_eq!(
            machine.step(),
            Step::Reject(Rejection {
                state: "q0".into(),
                symbol: '1'
            })
        );
    }

    #[test]
    fn test_immediate_halt_keeps_seeded_input() {
        let program = parse("q0 [start]\n0 -> 0 N halt\nhalt [halt]\n").unwrap();

        assert_eq!(run(&program, "000"), Ok("000".to_string()));
    }

    #[test]
    fn test_start_equal_to_halt_returns_input() {
        let program = parse("only [halt]\n").unwrap();

        assert_eq!(program.start(), program.halt());
        assert_eq!(run(&program, "abc"), Ok("abc".to_string()));
        assert_eq!(run(&program, ""), Ok(String::new()));
    }

    #[test]
    fn test_empty_input_reads_blank() {
        let program = parse("q0\n_ -> 1 N halt\n").unwrap();

        assert_eq!(run(&program, ""), Ok("1".to_string()));
    }

    #[test]
    fn test_rejection_materializes_visited_cell() {
        let program = parse("q0\n0 -> 0 L q0\n").unwrap();
        let mut machine = TuringMachine::new(&program, "00");

        let result = machine.run();

        assert_eq!(
            result,
            Err(Rejection {
                state: "q0".into(),
                symbol: BLANK_SYMBOL
            })
        );
        assert_eq!(machine.output(), "00_");
    }

    #[test]
    fn test_output_spans_every_visited_cell() {
        // Walk two cells below the input, then two cells past its end.
        let source = r#"
down [start]
  a -> a R down
  _ -> _ R turn
turn
  _ -> _ L up
up
  _ -> _ L up2
  a -> a L up
up2
  a -> a L up
  _ -> _ N halt
"#;
        let program = parse(source).unwrap();
        let mut machine = TuringMachine::new(&program, "a");

        let output = machine.run().unwrap();
        let (min, max) = machine.tape().bounds().unwrap();

        assert_eq!(output.chars().count() as i64, max - min + 1);
        assert_eq!(output, "__a__");
    }

    #[test]
    fn test_runs_are_deterministic() {
        let program = parse(FLIP).unwrap();

        let first = run(&program, "1100101");
        let second = run(&program, "1100101");

        assert_eq!(first, second);
    }

    #[test]
    fn test_program_is_shared_between_machines() {
        let program = parse(FLIP).unwrap();
        let mut a = TuringMachine::new(&program, "0");
        let mut b = TuringMachine::new(&program, "1");

        assert_eq!(a.run(), Ok("1_".to_string()));
        assert_eq!(b.run(), Ok("0_".to_string()));
    }
}

//! A sparse, two-way unbounded tape.

use crate::types::BLANK_SYMBOL;
use std::collections::BTreeMap;
use std::fmt;

/// Maps positions to symbols. Only visited cells are stored.
///
/// Reading a cell materializes it, so a cell the head passed over appears in the rendered
/// output even if it still holds the blank symbol. Since the head moves at most one cell
/// per step, the materialized positions always form one contiguous range.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tape {
    cells: BTreeMap<i64, char>,
}

impl Tape {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a tape holding `input` at positions `0..len`.
    pub fn from_input(input: &str) -> Self {
        Self {
            cells: (0..).zip(input.chars()).collect(),
        }
    }

    /// Returns the symbol at `position`, materializing a blank cell if it was never visited.
    pub fn read(&mut self, position: i64) -> char {
        *self.cells.entry(position).or_insert(BLANK_SYMBOL)
    }

    /// Returns the symbol at `position` without materializing it.
    pub fn peek(&self, position: i64) -> char {
        self.cells.get(&position).copied().unwrap_or(BLANK_SYMBOL)
    }

    pub fn write(&mut self, position: i64, symbol: char) {
        self.cells.insert(position, symbol);
    }

    /// Returns the lowest and highest materialized positions.
    pub fn bounds(&self) -> Option<(i64, i64)> {
        let (&min, _) = self.cells.first_key_value()?;
        let (&max, _) = self.cells.last_key_value()?;
        Some((min, max))
    }

    /// Number of materialized cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Concatenates materialized symbols in ascending position order.
    pub fn render(&self) -> String {
        self.cells.values().collect()
    }
}

impl fmt::Display for Tape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_input_seeds_positions() {
        let tape = Tape::from_input("abc");

        assert_eq!(tape.bounds(), Some((0, 2)));
        assert_eq!(tape.peek(1), 'b');
        assert_eq!(tape.render(), "abc");
    }

    #[test]
    fn test_empty_input() {
        let tape = Tape::from_input("");

        assert!(tape.is_empty());
        assert_eq!(tape.bounds(), None);
        assert_eq!(tape.render(), "");
    }

    #[test]
    fn test_read_materializes_blank() {
        let mut tape = Tape::from_input("1");

        assert_eq!(tape.peek(-1), BLANK_SYMBOL);
        assert_eq!(tape.len(), 1);

        assert_eq!(tape.read(-1), BLANK_SYMBOL);
        assert_eq!(tape.len(), 2);
        assert_eq!(tape.render(), "_1");
    }

    #[test]
    fn test_render_orders_by_position() {
        let mut tape = Tape::new();
        tape.write(1, 'b');
        tape.write(-1, 'z');
        tape.write(0, 'a');

        assert_eq!(tape.render(), "zab");
        assert_eq!(tape.to_string(), "zab");
    }
}

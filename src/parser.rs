//! This module provides the line normalizer and classifier for Turing Machine programs,
//! utilizing the `pest` crate. Each source line is cleaned of comments and redundant
//! whitespace, then classified as a state declaration or an instruction. The classified
//! lines are folded into a [`Program`] by the [`ProgramBuilder`].

use crate::{
    builder::ProgramBuilder,
    types::{
        BuildError, Direction, Grammar, Program, COMMENT_MARKER, HALT_TAG, START_TAG,
    },
};
use lazy_static::lazy_static;
use pest::{
    error::{Error, LineColLocation},
    iterators::{Pair, Pairs},
    Parser as PestParser,
};
use pest_derive::Parser as PestParser;
use regex::Regex;

/// Derives a `PestParser` for the line grammar defined in `grammar.pest`.
#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub struct TuringMachineParser;

lazy_static! {
    static ref COMMENT: Regex =
        Regex::new(&format!("{}.*", regex::escape(COMMENT_MARKER))).unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// The meaningful tags a state declaration can carry. Any other tag is accepted and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Start,
    Halt,
}

/// A classified source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// `name` or `name [tag]`
    StateDecl { name: String, tag: Option<Tag> },
    /// `read -> write move target`
    Instruction {
        read: char,
        write: char,
        direction: Direction,
        target: String,
    },
}

/// A statement together with its 1-based source line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub number: usize,
    pub statement: Statement,
}

/// Parses program source into a validated `Program` using the default grammar.
///
/// # Returns
///
/// * `Ok(Program)` if every line is well formed and the table is consistent.
/// * `Err(BuildError)` describing the first defect found.
pub fn parse(source: &str) -> Result<Program, BuildError> {
    parse_with(source, &Grammar::default())
}

/// Parses program source with a custom move-token grammar.
pub fn parse_with(source: &str, grammar: &Grammar) -> Result<Program, BuildError> {
    parse_lines(source.lines(), grammar)
}

/// Parses an ordered sequence of raw lines, numbering them from 1.
///
/// Lines are classified and folded one at a time, so the reported error is always the
/// earliest one in the file.
pub fn parse_lines<I, S>(lines: I, grammar: &Grammar) -> Result<Program, BuildError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut builder = ProgramBuilder::new();

    for (index, raw) in lines.into_iter().enumerate() {
        if let Some(line) = classify_line(index + 1, raw.as_ref(), grammar)? {
            builder.push(line)?;
        }
    }

    builder.finish()
}

/// Strips the trailing comment, collapses whitespace runs and trims the result.
pub fn normalize(raw: &str) -> String {
    let without_comment = COMMENT.replace(raw, "");
    WHITESPACE
        .replace_all(&without_comment, " ")
        .trim()
        .to_string()
}

/// Classifies a single raw line.
///
/// # Returns
///
/// * `Ok(None)` for lines that are blank once normalized.
/// * `Ok(Some(Line))` for a state declaration or instruction.
/// * `Err(BuildError::Syntax)` for anything else.
pub fn classify_line(
    number: usize,
    raw: &str,
    grammar: &Grammar,
) -> Result<Option<Line>, BuildError> {
    let text = normalize(raw);
    if text.is_empty() {
        return Ok(None);
    }

    let statement = TuringMachineParser::parse(Rule::line, &text)
        .map_err(|e| syntax_error(number, &text, &e))?
        .next()
        .and_then(|line| line.into_inner().next())
        .ok_or_else(|| BuildError::Syntax {
            line: number,
            reason: format!("Invalid line '{text}'"),
        })?;

    let statement = parse_statement(statement, grammar)
        .map_err(|reason| BuildError::Syntax { line: number, reason })?;

    Ok(Some(Line { number, statement }))
}

/// Dispatches a matched line to its statement parser.
fn parse_statement(pair: Pair<Rule>, grammar: &Grammar) -> Result<Statement, String> {
    match pair.as_rule() {
        Rule::instruction => parse_instruction(pair, grammar),
        Rule::state_decl => Ok(parse_state_decl(pair)),
        rule => Err(format!("Unexpected {rule:?} in place of a statement")),
    }
}

/// Parses `ident ( [tag] )?` from a `Pair<Rule::state_decl>`.
fn parse_state_decl(pair: Pair<Rule>) -> Statement {
    let mut pairs = pair.into_inner();
    let name = parse_string(&mut pairs);
    let tag = pairs.next().and_then(|tag| parse_tag(tag.as_str()));

    Statement::StateDecl { name, tag }
}

/// Parses `symbol -> symbol direction ident` from a `Pair<Rule::instruction>`.
///
/// The move token is resolved against the grammar here rather than in `grammar.pest`, so
/// the accepted spellings stay configurable.
fn parse_instruction(pair: Pair<Rule>, grammar: &Grammar) -> Result<Statement, String> {
    let mut pairs = pair.into_inner();
    let read = parse_symbol(&mut pairs)?;
    let write = parse_symbol(&mut pairs)?;

    let token = parse_string(&mut pairs);
    let direction = grammar
        .direction(&token)
        .ok_or_else(|| format!("Unsupported move token '{token}'"))?;

    let target = parse_string(&mut pairs);

    Ok(Statement::Instruction {
        read,
        write,
        direction,
        target,
    })
}

fn parse_tag(tag: &str) -> Option<Tag> {
    match tag {
        START_TAG => Some(Tag::Start),
        HALT_TAG => Some(Tag::Halt),
        _ => None,
    }
}

/// Parses a single character symbol from a `Pairs` iterator.
fn parse_symbol(pairs: &mut Pairs<Rule>) -> Result<char, String> {
    parse_string(pairs)
        .chars()
        .next()
        .ok_or_else(|| "Missing symbol".to_string())
}

/// Extracts the string content from the current `Pair` in a `Pairs` iterator.
fn parse_string(pairs: &mut Pairs<Rule>) -> String {
    pairs
        .next()
        .map(|pair| pair.as_str().to_string())
        .unwrap_or_default()
}

/// Creates a `BuildError::Syntax` pointing at the column where matching failed.
fn syntax_error(number: usize, text: &str, error: &Error<Rule>) -> BuildError {
    let column = match error.line_col {
        LineColLocation::Pos((_, col)) | LineColLocation::Span((_, col), _) => col,
    };

    BuildError::Syntax {
        line: number,
        reason: format!("Invalid line '{text}' (unexpected input at column {column})"),
    }
}

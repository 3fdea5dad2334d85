//! This module provides whole-table checks that can only run once every line has been
//! consumed: referential integrity of transition targets, and the non-fatal unused-state
//! diagnostic.

use crate::types::{BuildError, Program, Warning};
use std::collections::BTreeSet;

/// Analyzes a closed transition table.
///
/// # Arguments
///
/// * `program` - The program with start and halt already resolved.
/// * `referenced` - Every state name used as an instruction target, including targets of
///   instructions that were later dropped from the halt state.
///
/// # Returns
///
/// * `Ok(warnings)` if all references resolve.
/// * `Err(BuildError::UndefinedStates)` listing every undeclared target.
pub fn analyze(
    program: &Program,
    referenced: &BTreeSet<String>,
) -> Result<Vec<Warning>, BuildError> {
    check_undefined_states(program, referenced)?;

    let mut warnings = Vec::new();
    let unused = unused_states(program, referenced);
    if !unused.is_empty() {
        warnings.push(Warning::UnusedStates(unused));
    }

    Ok(warnings)
}

/// Checks that every referenced state is declared. All offenders are collected into a
/// single error.
fn check_undefined_states(
    program: &Program,
    referenced: &BTreeSet<String>,
) -> Result<(), BuildError> {
    let names: Vec<String> = referenced
        .iter()
        .filter(|name| !program.contains_state(name))
        .cloned()
        .collect();

    if !names.is_empty() {
        return Err(BuildError::UndefinedStates { names });
    }

    Ok(())
}

/// Returns declared states that no transition targets, in declaration order.
///
/// The start state appears here whenever nothing loops back to it, which is normal.
fn unused_states(program: &Program, referenced: &BTreeSet<String>) -> Vec<String> {
    program
        .states()
        .iter()
        .filter(|state| !referenced.contains(&state.name))
        .map(|state| state.name.clone())
        .collect()
}

use std::collections::HashSet;

use crate::{
    grading::{
        diagnostic::{Check, Diagnostic, Verdict},
        task::{Task, TruthTableEntry, TRUTH_TABLE_SWITCHES},
    },
    simulation::{Simulation, WireIndex},
    utils,
};

/// Checks that the table holds every combination of `num_switches` switches exactly once.
pub fn check_coverage(entries: &[TruthTableEntry], num_switches: usize) -> Result<(), Diagnostic> {
    let malformed = |reason: String| Diagnostic::MalformedTruthTable { check: Check::TruthTable, reason };
    let expected_len = 1usize << num_switches;

    if entries.len() != expected_len {
        return Err(malformed(format!("{} entries for {num_switches} switches, expected {expected_len}", entries.len())));
    }

    let mut seen = HashSet::new();
    for entry in entries {
        if entry.combination as usize >= expected_len {
            return Err(malformed(format!("combination {} is out of range for {num_switches} switches", entry.combination)));
        }
        if !seen.insert(entry.combination) {
            return Err(malformed(format!("combination {} appears more than once", entry.combination)));
        }
    }

    Ok(())
}

/// Drives every entry of the table through the circuit and compares the indicator against the expected output.
///
/// Each combination gets exactly one recompute pass, see [`Simulation::recompute_pass`].
/// The switches are left in the state of the last entry.
pub fn validate(task: &Task, entries: &[TruthTableEntry], simulation: &mut Simulation, index: &WireIndex) -> Verdict {
    if task.switches.len() != TRUTH_TABLE_SWITCHES {
        return Verdict::fail(Diagnostic::WrongArity { check: Check::TruthTable, expected: TRUTH_TABLE_SWITCHES, got: task.switches.len() });
    }
    let switches = match task.resolve_switches(simulation, Check::TruthTable) {
        Ok(switches) => switches,
        Err(missing) => return Verdict::from_diagnostics(missing),
    };
    let indicator = match task.resolve_indicator(simulation, Check::TruthTable) {
        Ok(indicator) => indicator,
        Err(diagnostic) => return Verdict::fail(diagnostic),
    };
    if let Err(diagnostic) = check_coverage(entries, TRUTH_TABLE_SWITCHES) {
        log::warn!("task '{}': {diagnostic}", task.description);
        return Verdict::fail(diagnostic);
    }

    let mut diagnostics = Vec::new();
    for entry in entries {
        for (switch, on) in switches.iter().zip(utils::combination_bits(entry.combination, TRUTH_TABLE_SWITCHES)) {
            simulation.set_switch(*switch, on);
        }
        simulation.recompute_pass(index);

        let got = simulation.indicator_state(indicator).unwrap_or(false);
        log::debug!("combination {} ({}): expected {} got {got}", entry.combination, utils::binary(entry.combination, TRUTH_TABLE_SWITCHES), entry.expected);
        if got != entry.expected {
            diagnostics.push(Diagnostic::OutputMismatch { combination: entry.combination, width: TRUTH_TABLE_SWITCHES, expected: entry.expected, got });
        }
    }

    Verdict::from_diagnostics(diagnostics)
}

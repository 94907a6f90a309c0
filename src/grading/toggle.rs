use crate::{
    grading::{
        diagnostic::{Check, Diagnostic, Verdict},
        task::{Task, TaskCheck},
    },
    simulation::Simulation,
    utils,
};

/// Compares the indicator against what the task expects for the switches as they are set right now.
/// Reads the live state, so it has to run before the truth table is driven through the circuit.
pub fn check(task: &Task, simulation: &Simulation) -> Verdict {
    let switches = match task.resolve_switches(simulation, Check::Toggle) {
        Ok(switches) => switches,
        Err(missing) => return Verdict::from_diagnostics(missing),
    };
    let indicator = match task.resolve_indicator(simulation, Check::Toggle) {
        Ok(indicator) => indicator,
        Err(diagnostic) => return Verdict::fail(diagnostic),
    };

    let combination = utils::read_combination(simulation, &switches);
    let width = switches.len();
    let got = simulation.indicator_state(indicator).unwrap_or(false);
    let expected = match &task.check {
        TaskCheck::TargetValues(targets) => targets.contains(&combination),
        TaskCheck::TruthTable(entries) => match entries.iter().find(|e| e.combination == combination) {
            Some(entry) => entry.expected,
            None => return Verdict::fail(Diagnostic::UncoveredCombination { check: Check::Toggle, combination, width }),
        },
    };

    if got == expected {
        Verdict::pass()
    } else {
        Verdict::fail(Diagnostic::ToggleMismatch { check: Check::Toggle, combination, width, expected, got })
    }
}

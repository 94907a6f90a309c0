use crate::{
    grading::{
        diagnostic::{Check, Diagnostic, Verdict},
        task::Task,
    },
    simulation::Simulation,
};

/// Every gate kind the task requires has to have at least one gate in the simulation.
pub fn presence(task: &Task, simulation: &Simulation) -> Verdict {
    let diagnostics = task
        .required_gates
        .iter()
        .filter(|kind| simulation.gates_of_kind(*kind).next().is_none())
        .map(|kind| Diagnostic::MissingGateKind { check: Check::Presence, kind })
        .collect();
    Verdict::from_diagnostics(diagnostics)
}

/// Every gate of a required kind has to be named with that kind's prefix. Reports all of them, not just the first.
pub fn naming(task: &Task, simulation: &Simulation) -> Verdict {
    let mut diagnostics = Vec::new();
    for kind in task.required_gates {
        let prefix = kind.name_prefix();
        for (_, gate) in simulation.gates_of_kind(kind).filter(|(_, gate)| !gate.name.starts_with(prefix)) {
            log::warn!("{kind} gate '{}' does not follow the '{prefix}' naming pattern", gate.name);
            diagnostics.push(Diagnostic::NamingViolation { check: Check::Naming, kind, name: gate.name.clone(), prefix });
        }
    }
    Verdict::from_diagnostics(diagnostics)
}

pub fn at_least_one_gate(simulation: &Simulation) -> Verdict {
    if simulation.gates.is_empty() {
        Verdict::fail(Diagnostic::NoGates { check: Check::GateCount })
    } else {
        Verdict::pass()
    }
}

use std::collections::HashSet;

use crate::{
    grading::{
        diagnostic::{Check, Diagnostic, Part, Verdict},
        task::Task,
    },
    simulation::{ConnectorKey, ConnectorParent, IndicatorKey, Simulation, SwitchKey, WireIndex},
};

/// A node of the search: the same input connector is a different state depending on whether a gate was crossed on the way to it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
struct PathState {
    input: ConnectorKey,
    crossed_gate: bool,
}

/// Walks the wires backwards from the indicator and answers whether `source` feeds it through at least one gate.
/// A switch wired straight into the indicator does not count.
pub fn is_reachable_through_gate(simulation: &Simulation, index: &WireIndex, target: IndicatorKey, source: SwitchKey) -> bool {
    let Some(indicator) = simulation.indicators.get(target) else { return false };

    let start = PathState { input: indicator.input, crossed_gate: false };
    let mut stack = vec![start];
    let mut visited = HashSet::from([start]);

    while let Some(current) = stack.pop() {
        for &output in index.incoming_edges(current.input) {
            match simulation.parent_of(output) {
                Some(ConnectorParent::Switch(switch)) if switch == source => {
                    // reaching the switch without a gate is a dead end, not a failure: another path may still cross one
                    if current.crossed_gate {
                        return true;
                    }
                }
                Some(ConnectorParent::Gate(gate)) => {
                    let Some(gate) = simulation.gates.get(gate) else { continue };
                    for &input in &gate.inputs {
                        let next = PathState { input, crossed_gate: true };
                        if visited.insert(next) {
                            stack.push(next);
                        }
                    }
                }
                // other switches and anything unknown
                _ => {}
            }
        }
    }

    false
}

/// Fails for every bound switch that does not reach the indicator through a gate.
pub fn check(task: &Task, simulation: &Simulation, index: &WireIndex) -> Verdict {
    let indicator = match task.resolve_indicator(simulation, Check::Connectivity) {
        Ok(indicator) => indicator,
        Err(diagnostic) => return Verdict::fail(diagnostic),
    };

    let mut diagnostics = Vec::new();
    for (slot, switch) in task.switches.iter().enumerate() {
        let Some(switch) = switch.filter(|s| simulation.switches.contains_key(*s)) else {
            diagnostics.push(Diagnostic::BindingMissing { check: Check::Connectivity, part: Part::Switch(slot) });
            continue;
        };

        if !is_reachable_through_gate(simulation, index, indicator, switch) {
            let name = simulation.switches[switch].name.clone();
            log::debug!("{name} does not reach {} through a gate", simulation.indicators[indicator].name);
            diagnostics.push(Diagnostic::NotConnected { check: Check::Connectivity, switch: name });
        }
    }

    Verdict::from_diagnostics(diagnostics)
}

#[cfg(test)]
mod test {
    use super::{check, is_reachable_through_gate};
    use crate::{
        grading::{diagnostic::Diagnostic, task::Task},
        simulation::{GateKind, Simulation},
    };

    #[test]
    fn direct_wire_does_not_count() {
        let mut sim = Simulation::new();
        let s = sim.add_switch("s", false);
        let led = sim.add_indicator("led");
        let (s_out, led_in) = (sim.switches[s].output, sim.indicators[led].input);
        sim.add_registry().connect(s_out, led_in);

        assert!(!is_reachable_through_gate(&sim, &sim.wire_index(), led, s));
    }

    #[test]
    fn through_one_gate() {
        let mut sim = Simulation::new();
        let s = sim.add_switch("s", false);
        let led = sim.add_indicator("led");
        let not = sim.add_gate(GateKind::Not, "NotGate_1", 1);
        let (s_out, led_in) = (sim.switches[s].output, sim.indicators[led].input);
        let (not_in, not_out) = (sim.gates[not].inputs[0], sim.gates[not].output.expect("not has output"));
        let registry = sim.add_registry();
        registry.connect(s_out, not_in);
        registry.connect(not_out, led_in);

        assert!(is_reachable_through_gate(&sim, &sim.wire_index(), led, s));
    }

    #[test]
    fn direct_wire_next_to_gated_path() {
        // the switch feeds the indicator both directly and through a gate; the gated path still counts
        let mut sim = Simulation::new();
        let s = sim.add_switch("s", false);
        let led = sim.add_indicator("led");
        let or = sim.add_gate(GateKind::Or, "OrGate_1", 2);
        let (s_out, led_in) = (sim.switches[s].output, sim.indicators[led].input);
        let (or_in, or_out) = (sim.gates[or].inputs[0], sim.gates[or].output.expect("or has output"));
        let registry = sim.add_registry();
        registry.connect(s_out, led_in);
        registry.connect(s_out, or_in);
        sim.add_registry().connect(or_out, led_in);

        assert!(is_reachable_through_gate(&sim, &sim.wire_index(), led, s));
    }

    #[test]
    fn other_switch_is_a_dead_end() {
        let mut sim = Simulation::new();
        let s = sim.add_switch("s", false);
        let other = sim.add_switch("other", false);
        let led = sim.add_indicator("led");
        let and = sim.add_gate(GateKind::And, "AndGate_1", 2);
        let led_in = sim.indicators[led].input;
        let other_out = sim.switches[other].output;
        let (and_in, and_out) = (sim.gates[and].inputs[0], sim.gates[and].output.expect("and has output"));
        let registry = sim.add_registry();
        registry.connect(other_out, and_in);
        registry.connect(and_out, led_in);

        let index = sim.wire_index();
        assert!(is_reachable_through_gate(&sim, &index, led, other));
        assert!(!is_reachable_through_gate(&sim, &index, led, s));
    }

    #[test]
    fn terminates_on_cycle() {
        // two gates feeding each other, with the switch hanging off neither
        let mut sim = Simulation::new();
        let s = sim.add_switch("s", false);
        let led = sim.add_indicator("led");
        let a = sim.add_gate(GateKind::Xor, "XorGate_1", 2);
        let b = sim.add_gate(GateKind::Nor, "NorGate_1", 2);
        let led_in = sim.indicators[led].input;
        let (a_in, a_out) = (sim.gates[a].inputs.clone(), sim.gates[a].output.expect("xor has output"));
        let (b_in, b_out) = (sim.gates[b].inputs.clone(), sim.gates[b].output.expect("nor has output"));
        let registry = sim.add_registry();
        registry.connect(a_out, led_in);
        registry.connect(b_out, a_in[0]);
        registry.connect(a_out, b_in[0]);
        registry.connect(a_out, b_in[1]);
        registry.connect(b_out, a_in[1]);

        let index = sim.wire_index();
        assert!(!is_reachable_through_gate(&sim, &index, led, s));

        // and once the switch joins the loop it is found
        let s_out = sim.switches[s].output;
        sim.add_registry().connect(s_out, b_in[1]);
        assert!(is_reachable_through_gate(&sim, &sim.wire_index(), led, s));
    }

    #[test]
    fn check_names_every_unconnected_switch() {
        let mut sim = Simulation::new();
        let switches: Vec<_> = (0..4).map(|i| sim.add_switch(format!("Switch_{i}"), false)).collect();
        let led = sim.add_indicator("led");
        let or = sim.add_gate(GateKind::Or, "OrGate_1", 2);
        let led_in = sim.indicators[led].input;
        let (or_in, or_out) = (sim.gates[or].inputs.clone(), sim.gates[or].output.expect("or has output"));
        let outs: Vec<_> = switches.iter().map(|s| sim.switches[*s].output).collect();
        let registry = sim.add_registry();
        registry.connect(outs[0], or_in[0]);
        registry.connect(outs[1], or_in[1]);
        registry.connect(outs[2], led_in);
        registry.connect(or_out, led_in);

        let task = Task::target_values("or", vec![]).with_switches(switches).with_indicator(led);
        let verdict = check(&task, &sim, &sim.wire_index());
        assert!(!verdict.passed);
        let names: Vec<_> = verdict
            .diagnostics
            .iter()
            .map(|d| match d {
                Diagnostic::NotConnected { switch, .. } => switch.as_str(),
                other => panic!("unexpected diagnostic {other}"),
            })
            .collect();
        assert_eq!(names, ["Switch_2", "Switch_3"]);
    }

    #[test]
    fn check_without_indicator_fails() {
        let mut sim = Simulation::new();
        let s = sim.add_switch("s", false);
        let task = Task::target_values("nothing", vec![]).with_switches([s]);
        let verdict = check(&task, &sim, &sim.wire_index());
        assert!(!verdict.passed);
        assert_eq!(verdict.diagnostics.len(), 1);
    }
}

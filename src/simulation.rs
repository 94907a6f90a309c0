pub mod connections;
pub mod logic;

use slotmap::SlotMap;

pub use connections::{WireIndex, WireRegistry};
pub use logic::GateKind;

slotmap::new_key_type! {
    pub struct ConnectorKey;
    pub struct GateKey;
    pub struct SwitchKey;
    pub struct IndicatorKey;
}

pub type ConnectorMap = SlotMap<ConnectorKey, Connector>;
pub type GateMap = SlotMap<GateKey, Gate>;
pub type SwitchMap = SlotMap<SwitchKey, Switch>;
pub type IndicatorMap = SlotMap<IndicatorKey, Indicator>;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ConnectorKind {
    Input,
    Output,
}

/// What a connector belongs to. Connectors do not own their parent, the parent owns its connectors.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ConnectorParent {
    Gate(GateKey),
    Switch(SwitchKey),
    Indicator(IndicatorKey),
}

#[derive(Debug)]
pub struct Connector {
    pub kind: ConnectorKind,
    pub value: bool,
    pub parent: ConnectorParent,
}

#[derive(Debug)]
pub struct Gate {
    pub kind: GateKind,
    pub name: String,
    pub inputs: Vec<ConnectorKey>,
    pub output: Option<ConnectorKey>,
}

#[derive(Debug)]
pub struct Switch {
    pub name: String,
    pub output: ConnectorKey,
}

#[derive(Debug)]
pub struct Indicator {
    pub name: String,
    pub input: ConnectorKey,
}

/// The population of parts that gets graded: every gate, switch, indicator and connector, plus the wiring registries.
#[derive(Debug, Default)]
pub struct Simulation {
    pub connectors: ConnectorMap,
    pub gates: GateMap,
    pub switches: SwitchMap,
    pub indicators: IndicatorMap,
    pub registries: Vec<WireRegistry>,
}

impl Simulation {
    pub fn new() -> Self {
        Self::default()
    }

    // parts {{{1
    pub fn add_gate(&mut self, kind: GateKind, name: impl Into<String>, num_inputs: usize) -> GateKey {
        self.insert_gate(kind, name.into(), num_inputs, true)
    }
    pub fn add_gate_without_output(&mut self, kind: GateKind, name: impl Into<String>, num_inputs: usize) -> GateKey {
        self.insert_gate(kind, name.into(), num_inputs, false)
    }
    fn insert_gate(&mut self, kind: GateKind, name: String, num_inputs: usize, has_output: bool) -> GateKey {
        let connectors = &mut self.connectors;
        self.gates.insert_with_key(|gk| {
            let inputs = std::iter::repeat_with(|| connectors.insert(Connector { kind: ConnectorKind::Input, value: false, parent: ConnectorParent::Gate(gk) })).take(num_inputs).collect();
            // default value for the output is whatever value results from having all false inputs
            let output = has_output.then(|| connectors.insert(Connector { kind: ConnectorKind::Output, value: kind.compute(&vec![false; num_inputs]), parent: ConnectorParent::Gate(gk) }));
            Gate { kind, name, inputs, output }
        })
    }

    pub fn add_switch(&mut self, name: impl Into<String>, state: bool) -> SwitchKey {
        let connectors = &mut self.connectors;
        self.switches.insert_with_key(|sk| Switch { name: name.into(), output: connectors.insert(Connector { kind: ConnectorKind::Output, value: state, parent: ConnectorParent::Switch(sk) }) })
    }

    pub fn add_indicator(&mut self, name: impl Into<String>) -> IndicatorKey {
        let connectors = &mut self.connectors;
        self.indicators.insert_with_key(|ik| Indicator { name: name.into(), input: connectors.insert(Connector { kind: ConnectorKind::Input, value: false, parent: ConnectorParent::Indicator(ik) }) })
    }

    // removing a part leaves its wires behind in the registries, the wire index skips them
    pub fn remove_gate(&mut self, gate: GateKey) {
        if let Some(gate) = self.gates.remove(gate) {
            for connector in gate.inputs.into_iter().chain(gate.output) {
                self.connectors.remove(connector);
            }
        }
    }
    pub fn remove_switch(&mut self, switch: SwitchKey) {
        if let Some(switch) = self.switches.remove(switch) {
            self.connectors.remove(switch.output);
        }
    }
    pub fn remove_indicator(&mut self, indicator: IndicatorKey) {
        if let Some(indicator) = self.indicators.remove(indicator) {
            self.connectors.remove(indicator.input);
        }
    }

    pub fn rename_gate(&mut self, gate: GateKey, name: impl Into<String>) {
        if let Some(gate) = self.gates.get_mut(gate) {
            gate.name = name.into();
        }
    }

    pub fn gates_of_kind(&self, kind: GateKind) -> impl Iterator<Item = (GateKey, &Gate)> + '_ {
        self.gates.iter().filter(move |(_, gate)| gate.kind == kind)
    }

    pub fn parent_of(&self, connector: ConnectorKey) -> Option<ConnectorParent> {
        self.connectors.get(connector).map(|c| c.parent)
    }

    // wires {{{1
    pub fn add_registry(&mut self) -> &mut WireRegistry {
        let index = self.registries.len();
        self.registries.push(WireRegistry::new());
        &mut self.registries[index]
    }

    pub fn wire_index(&self) -> WireIndex {
        WireIndex::build(&self.connectors, &self.registries)
    }

    // values {{{1
    /// Returns `false` if the switch does not exist.
    pub fn set_switch(&mut self, switch: SwitchKey, state: bool) -> bool {
        match self.switches.get(switch).and_then(|s| self.connectors.get_mut(s.output)) {
            Some(connector) => {
                connector.value = state;
                true
            }
            None => false,
        }
    }

    pub fn switch_state(&self, switch: SwitchKey) -> Option<bool> {
        self.switches.get(switch).and_then(|s| self.connectors.get(s.output)).map(|c| c.value)
    }

    pub fn indicator_state(&self, indicator: IndicatorKey) -> Option<bool> {
        self.indicators.get(indicator).and_then(|i| self.connectors.get(i.input)).map(|c| c.value)
    }

    // update {{{1
    /// Recomputes every gate once, kind by kind, then refreshes every indicator.
    /// This is a single pass: a gate that reads the output of a gate recomputed after it sees the old value.
    pub fn recompute_pass(&mut self, index: &WireIndex) -> bool {
        let mut changed = false;
        for kind in GateKind::ALL {
            for (_, gate) in self.gates.iter().filter(|(_, gate)| gate.kind == kind) {
                changed |= recompute_gate(&mut self.connectors, index, gate);
            }
        }
        for (_, indicator) in &self.indicators {
            changed |= deliver(&mut self.connectors, index, indicator.input);
        }
        changed
    }

    /// Repeats recompute passes until nothing changes.
    /// Gives up after one pass per gate plus two, which only happens when the circuit oscillates.
    pub fn settle(&mut self, index: &WireIndex) -> bool {
        let max_passes = self.gates.len() + 2;
        for _ in 0..max_passes {
            if !self.recompute_pass(index) {
                return true;
            }
        }
        log::warn!("circuit did not settle after {max_passes} passes");
        false
    }
}

/// Sets an input connector to the OR of everything wired into it.
fn deliver(connectors: &mut ConnectorMap, index: &WireIndex, input: ConnectorKey) -> bool {
    let value = index.incoming_edges(input).iter().any(|output| connectors.get(*output).is_some_and(|c| c.value));
    match connectors.get_mut(input) {
        Some(connector) if connector.value != value => {
            connector.value = value;
            true
        }
        _ => false,
    }
}

fn recompute_gate(connectors: &mut ConnectorMap, index: &WireIndex, gate: &Gate) -> bool {
    let mut changed = false;
    for &input in &gate.inputs {
        changed |= deliver(connectors, index, input);
    }

    let Some(output) = gate.output else { return changed };
    let input_values: Vec<bool> = gate.inputs.iter().map(|i| connectors.get(*i).is_some_and(|c| c.value)).collect();
    let new_value = gate.kind.compute(&input_values);
    if let Some(output) = connectors.get_mut(output) {
        if output.value != new_value {
            output.value = new_value;
            changed = true;
        }
    }
    changed
}

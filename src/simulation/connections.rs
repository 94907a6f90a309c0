use std::collections::HashMap;

use crate::simulation::{ConnectorKey, ConnectorKind, ConnectorMap};

/// One wiring registry: a list of output -> input edges.
/// Several independent registries can exist at the same time and each can hold any subset of the wires.
#[derive(Debug, Default, Clone)]
pub struct WireRegistry {
    wires: Vec<(ConnectorKey, ConnectorKey)>,
}

/// Every wire of every registry grouped by the input connector it feeds.
#[derive(Debug, Default)]
pub struct WireIndex {
    incoming: HashMap<ConnectorKey, Vec<ConnectorKey>>,
}

impl WireRegistry {
    pub fn new() -> Self {
        Self { wires: Vec::new() }
    }

    // duplicates and multiple producers per input are allowed, they are not the registry's problem
    pub fn connect(&mut self, output: ConnectorKey, input: ConnectorKey) {
        self.wires.push((output, input));
    }

    pub fn disconnect(&mut self, output: ConnectorKey, input: ConnectorKey) {
        self.wires.retain(|wire| *wire != (output, input));
    }

    pub fn wires(&self) -> &[(ConnectorKey, ConnectorKey)] {
        &self.wires
    }
}

impl WireIndex {
    pub(crate) fn build<'r>(connectors: &ConnectorMap, registries: impl IntoIterator<Item = &'r WireRegistry>) -> WireIndex {
        let mut incoming: HashMap<ConnectorKey, Vec<ConnectorKey>> = HashMap::new();
        let mut skipped = 0;
        for registry in registries {
            for &(output, input) in registry.wires() {
                let is_kind = |key: ConnectorKey, kind: ConnectorKind| connectors.get(key).is_some_and(|c| c.kind == kind);
                if is_kind(output, ConnectorKind::Output) && is_kind(input, ConnectorKind::Input) {
                    incoming.entry(input).or_default().push(output);
                } else {
                    skipped += 1;
                }
            }
        }

        if skipped > 0 {
            log::debug!("wire index skipped {skipped} dangling or misdirected wire(s)");
        }
        log::debug!("wire index built with {} fed input connector(s)", incoming.len());

        WireIndex { incoming }
    }

    pub fn incoming_edges(&self, input: ConnectorKey) -> &[ConnectorKey] {
        self.incoming.get(&input).map(Vec::as_slice).unwrap_or(&[])
    }
}

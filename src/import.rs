use std::collections::HashMap;

use json::{object::Object, JsonValue};
use thiserror::Error;

use crate::{
    grading::{
        task::{Task, TruthTableEntry},
        TaskGrader,
    },
    simulation::{ConnectorKey, GateKind, IndicatorKey, Simulation, SwitchKey},
};

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("could not read scene file: {0}")]
    Io(#[from] std::io::Error),
    #[error("scene file is not valid json: {0}")]
    Json(#[from] json::Error),
    #[error("invalid scene: {0}")]
    Invalid(String),
}

struct Names {
    connectors: HashMap<usize, ConnectorKey>,
    switches: HashMap<String, SwitchKey>,
    indicators: HashMap<String, IndicatorKey>,
}

pub fn load(filename: &str) -> Result<TaskGrader, ImportError> {
    let scene = std::fs::read_to_string(filename)?;
    parse(&scene)
}

/// Builds the simulation and its tasks from a scene document and settles the circuit.
pub fn parse(scene: &str) -> Result<TaskGrader, ImportError> {
    let JsonValue::Object(mut scene) = json::parse(scene)? else {
        return Err(ImportError::Invalid("toplevel json must be object".into()));
    };

    let (simulation, tasks) = parse_scene(&mut scene).map_err(ImportError::Invalid)?;
    log::info!("loaded {} gate(s), {} switch(es), {} indicator(s), {} wire registries and {} task(s)", simulation.gates.len(), simulation.switches.len(), simulation.indicators.len(), simulation.registries.len(), tasks.len());
    Ok(TaskGrader::new(simulation, tasks))
}

fn parse_scene(scene: &mut Object) -> Result<(Simulation, Vec<Task>), String> {
    let mut simulation = Simulation::new();
    let mut names = Names { connectors: HashMap::new(), switches: HashMap::new(), indicators: HashMap::new() };

    for gate in optional_array(scene, "gates")? {
        parse_gate(&mut simulation, &mut names, gate)?;
    }
    for switch in optional_array(scene, "switches")? {
        parse_switch(&mut simulation, &mut names, switch)?;
    }
    for indicator in optional_array(scene, "indicators")? {
        parse_indicator(&mut simulation, &mut names, indicator)?;
    }

    for registry in optional_array(scene, "wires")? {
        let JsonValue::Array(wires) = registry else { return Err("wire registry must be array".into()) };
        let registry = simulation.add_registry();
        for wire in wires {
            let JsonValue::Array(wire) = wire else { return Err("wire must be array".into()) };
            let [output, input] = &wire[..] else { return Err("wire must have 2 elements".into()) };
            registry.connect(lookup_connector(&names, output)?, lookup_connector(&names, input)?);
        }
    }

    let tasks = optional_array(scene, "tasks")?.into_iter().map(|task| parse_task(&names, task)).collect::<Result<Vec<_>, _>>()?;

    let index = simulation.wire_index();
    simulation.settle(&index);

    Ok((simulation, tasks))
}

fn parse_gate(simulation: &mut Simulation, names: &mut Names, gate: JsonValue) -> Result<(), String> {
    let JsonValue::Object(mut gate) = gate else { return Err("gate must be object".into()) };
    let kind = take_string(&mut gate, "kind", "gate")?;
    let kind = GateKind::from_name(&kind).ok_or_else(|| format!("invalid gate kind '{kind}'"))?;
    let name = take_string(&mut gate, "name", "gate")?;
    let JsonValue::Array(inputs) = gate.remove("inputs").ok_or("gate must have field 'inputs'")? else { return Err("gate inputs must be array".into()) };
    let output = gate.remove("output").filter(|o| !o.is_null());

    let gk = if output.is_some() { simulation.add_gate(kind, name, inputs.len()) } else { simulation.add_gate_without_output(kind, name, inputs.len()) };
    let gate = &simulation.gates[gk];
    for (connector, number) in gate.inputs.iter().zip(&inputs) {
        assign_connector(names, *connector, number)?;
    }
    if let (Some(connector), Some(number)) = (gate.output, &output) {
        assign_connector(names, connector, number)?;
    }
    Ok(())
}

fn parse_switch(simulation: &mut Simulation, names: &mut Names, switch: JsonValue) -> Result<(), String> {
    let JsonValue::Object(mut switch) = switch else { return Err("switch must be object".into()) };
    let name = take_string(&mut switch, "name", "switch")?;
    let output = switch.remove("output").ok_or("switch must have field 'output'")?;
    let state = match switch.remove("state") {
        Some(state) => state.as_bool().ok_or("switch state must be boolean")?,
        None => false,
    };
    if names.switches.contains_key(&name) {
        return Err(format!("switch '{name}' declared twice"));
    }

    let sk = simulation.add_switch(name.clone(), state);
    assign_connector(names, simulation.switches[sk].output, &output)?;
    names.switches.insert(name, sk);
    Ok(())
}

fn parse_indicator(simulation: &mut Simulation, names: &mut Names, indicator: JsonValue) -> Result<(), String> {
    let JsonValue::Object(mut indicator) = indicator else { return Err("indicator must be object".into()) };
    let name = take_string(&mut indicator, "name", "indicator")?;
    let input = indicator.remove("input").ok_or("indicator must have field 'input'")?;
    if names.indicators.contains_key(&name) {
        return Err(format!("indicator '{name}' declared twice"));
    }

    let ik = simulation.add_indicator(name.clone());
    assign_connector(names, simulation.indicators[ik].input, &input)?;
    names.indicators.insert(name, ik);
    Ok(())
}

fn parse_task(names: &Names, task: JsonValue) -> Result<Task, String> {
    let JsonValue::Object(mut task) = task else { return Err("task must be object".into()) };
    let description = match task.remove("description") {
        Some(description) => description.as_str().ok_or("task description must be string")?.to_string(),
        None => String::new(),
    };

    let mut parsed = match (task.remove("targets"), task.remove("truth_table")) {
        (Some(JsonValue::Array(targets)), None) => {
            let targets = targets.iter().map(|t| t.as_u32().ok_or("task target must be non-negative integer")).collect::<Result<_, _>>()?;
            Task::target_values(description, targets)
        }
        (None, Some(JsonValue::Array(entries))) => Task::truth_table(description, entries.into_iter().map(parse_truth_table_entry).collect::<Result<_, _>>()?),
        (Some(_), Some(_)) => return Err("task must have only one of 'targets' and 'truth_table'".into()),
        (None, None) => return Err("task must have field 'targets' or 'truth_table'".into()),
        _ => return Err("task targets and truth_table must be arrays".into()),
    };

    if let Some(score) = task.remove("score") {
        parsed.max_score = score.as_u32().ok_or("task score must be non-negative integer")?;
    }

    for kind in optional_array(&mut task, "required_gates")? {
        let kind = kind.as_str().ok_or("required gate must be string")?;
        parsed.required_gates.insert(GateKind::from_name(kind).ok_or_else(|| format!("invalid gate kind '{kind}'"))?);
    }

    let switches = optional_array(&mut task, "switches")?;
    if switches.len() > parsed.switches.len() {
        return Err(format!("task '{}' has {} switch slots but {} switches were given", parsed.description, parsed.switches.len(), switches.len()));
    }
    for (slot, switch) in parsed.switches.iter_mut().zip(switches) {
        *slot = match switch.as_str() {
            Some(name) => Some(*names.switches.get(name).ok_or_else(|| format!("unknown switch '{name}'"))?),
            None if switch.is_null() => None,
            None => return Err("task switch must be string or null".into()),
        };
    }

    parsed.indicator = match task.remove("indicator") {
        Some(indicator) if !indicator.is_null() => {
            let name = indicator.as_str().ok_or("task indicator must be string or null")?;
            Some(*names.indicators.get(name).ok_or_else(|| format!("unknown indicator '{name}'"))?)
        }
        _ => None,
    };

    Ok(parsed)
}

fn parse_truth_table_entry(entry: JsonValue) -> Result<TruthTableEntry, String> {
    let JsonValue::Object(mut entry) = entry else { return Err("truth table entry must be object".into()) };
    let combination = entry.remove("input").ok_or("truth table entry must have field 'input'")?.as_u32().ok_or("truth table input must be non-negative integer")?;
    let expected = entry.remove("expected").ok_or("truth table entry must have field 'expected'")?.as_bool().ok_or("truth table expected must be boolean")?;
    Ok(TruthTableEntry { combination, expected })
}

// helpers {{{1
fn optional_array(object: &mut Object, key: &str) -> Result<Vec<JsonValue>, String> {
    match object.remove(key) {
        Some(JsonValue::Array(array)) => Ok(array),
        Some(JsonValue::Null) | None => Ok(Vec::new()),
        Some(_) => Err(format!("'{key}' must be array")),
    }
}

fn take_string(object: &mut Object, key: &str, what: &str) -> Result<String, String> {
    object.remove(key).ok_or_else(|| format!("{what} must have field '{key}'"))?.take_string().ok_or_else(|| format!("{what} {key} must be string"))
}

fn assign_connector(names: &mut Names, connector: ConnectorKey, number: &JsonValue) -> Result<(), String> {
    let number = number.as_usize().ok_or("connector must be non-negative integer")?;
    if names.connectors.insert(number, connector).is_some() {
        return Err(format!("connector {number} declared twice"));
    }
    Ok(())
}

fn lookup_connector(names: &Names, number: &JsonValue) -> Result<ConnectorKey, String> {
    let number = number.as_usize().ok_or("wire end must be non-negative integer")?;
    names.connectors.get(&number).copied().ok_or_else(|| format!("wire refers to undeclared connector {number}"))
}

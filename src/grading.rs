pub mod connectivity;
pub mod diagnostic;
pub mod scoring;
pub mod structure;
pub mod task;
pub mod toggle;
pub mod truth_table;

use crate::simulation::{GateKey, IndicatorKey, Simulation, SwitchKey, WireIndex};
use diagnostic::{Diagnostic, Verdict};
use scoring::WeightTable;
use task::{Task, TaskCheck};

/// Grades a list of tasks against the simulation it was given.
#[derive(Debug)]
pub struct TaskGrader {
    simulation: Simulation,
    tasks: Vec<Task>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskOutcome {
    pub description: String,
    pub passed: bool,
    pub score: u32,
    pub max_score: u32,
    /// Everything the failed checks reported; empty when the task passed.
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeReport {
    pub total_score: u32,
    pub max_score: u32,
    pub tasks: Vec<TaskOutcome>,
}

/// Something the outside world just spawned.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SpawnedObject {
    Gate(GateKey),
    Switch(SwitchKey),
    Indicator(IndicatorKey),
}

/// Where a spawned object ended up in the first task.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Binding {
    Indicator,
    SwitchSlot(usize),
}

impl TaskGrader {
    pub fn new(simulation: Simulation, tasks: Vec<Task>) -> Self {
        Self { simulation, tasks }
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }
    pub fn simulation_mut(&mut self) -> &mut Simulation {
        &mut self.simulation
    }
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }
    pub fn tasks_mut(&mut self) -> &mut Vec<Task> {
        &mut self.tasks
    }

    /// Sum of every task's maximum score, without grading anything.
    pub fn max_score(&self) -> u32 {
        self.tasks.iter().map(|task| task.max_score).sum()
    }

    /// Runs every check of every task. Truth table tasks leave their switches in the state of their last combination.
    pub fn grade_all(&mut self) -> GradeReport {
        let index = self.simulation.wire_index();
        // switches may have been flipped or wires added since the last update
        self.simulation.settle(&index);
        let mut outcomes = Vec::with_capacity(self.tasks.len());
        for (i, task) in self.tasks.iter().enumerate() {
            log::info!("[Task {}] grading: {}", i + 1, task.description);
            let outcome = grade_task(task, &mut self.simulation, &index);
            log::info!("[Task {}] {} with {} / {}", i + 1, if outcome.passed { "passed" } else { "failed" }, outcome.score, outcome.max_score);
            outcomes.push(outcome);
        }

        GradeReport { total_score: outcomes.iter().map(|o| o.score).sum(), max_score: self.max_score(), tasks: outcomes }
    }

    /// Binds a freshly spawned indicator or switch into the first free slot of the first task.
    pub fn on_object_created(&mut self, object: SpawnedObject) -> Option<Binding> {
        let task = self.tasks.first_mut()?;
        let binding = match object {
            SpawnedObject::Indicator(indicator) => {
                if task.indicator.is_some() {
                    return None;
                }
                task.indicator = Some(indicator);
                Binding::Indicator
            }
            SpawnedObject::Switch(switch) => {
                let slot = task.switches.iter().position(Option::is_none)?;
                task.switches[slot] = Some(switch);
                Binding::SwitchSlot(slot)
            }
            SpawnedObject::Gate(gate) => {
                log::info!("spawned gate '{}'", self.simulation.gates.get(gate).map_or("<removed>", |g| g.name.as_str()));
                return None;
            }
        };
        log::info!("bound spawned {object:?} as {binding:?} of task 1");
        Some(binding)
    }
}

fn grade_task(task: &Task, simulation: &mut Simulation, index: &WireIndex) -> TaskOutcome {
    // the toggle check reads live state, so it goes before anything that drives the switches
    let toggle = toggle::check(task, simulation);
    let connectivity = connectivity::check(task, simulation, index);
    let (verdicts, weights) = match &task.check {
        TaskCheck::TargetValues(_) => {
            let presence = structure::presence(task, simulation);
            let naming = structure::naming(task, simulation);
            ([toggle, connectivity, presence, naming], WeightTable::structure())
        }
        TaskCheck::TruthTable(entries) => {
            let has_gate = structure::at_least_one_gate(simulation);
            let truth_table = truth_table::validate(task, entries, simulation, index);
            ([toggle, connectivity, has_gate, truth_table], WeightTable::truth_table())
        }
    };

    let passes: Vec<bool> = verdicts.iter().map(|v| v.passed).collect();
    let score = scoring::score(task, &passes, &weights);
    let passed = passes.iter().all(|p| *p);
    let diagnostics = if passed { Vec::new() } else { verdicts.into_iter().flat_map(|v: Verdict| v.diagnostics).collect() };

    TaskOutcome { description: task.description.clone(), passed, score, max_score: task.max_score, diagnostics }
}

impl std::fmt::Display for GradeReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Total score: {} / {}", self.total_score, self.max_score)?;
        writeln!(f)?;
        writeln!(f, "Details:")?;
        for (i, task) in self.tasks.iter().enumerate() {
            if task.passed {
                writeln!(f, "[Task {}]: correct! +{} points", i + 1, task.score)?;
            } else {
                writeln!(f, "[Task {}]: not correct yet ({} points)", i + 1, task.score)?;
                for diagnostic in &task.diagnostics {
                    writeln!(f, "    {diagnostic}")?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::{Binding, SpawnedObject, TaskGrader};
    use crate::{
        grading::task::{Task, TruthTableEntry},
        simulation::{GateKind, Simulation},
    };

    /// Six switches; switches 0 and 1 go through an and gate, switches 2..6 through an or gate, both into an xor gate feeding the indicator.
    fn graded_circuit() -> TaskGrader {
        let mut sim = Simulation::new();
        let switches: Vec<_> = (0..6).map(|i| sim.add_switch(format!("Switch_{i}"), false)).collect();
        let led = sim.add_indicator("LED");
        let and = sim.add_gate(GateKind::And, "AndGate_1", 2);
        let or = sim.add_gate(GateKind::Or, "OrGate_1", 4);
        let xor = sim.add_gate(GateKind::Xor, "XorGate_1", 2);
        let outs: Vec<_> = switches.iter().map(|s| sim.switches[*s].output).collect();
        let output = |sim: &Simulation, g| sim.gates[g].output.expect("gate has output");
        let (and_out, or_out, xor_out) = (output(&sim, and), output(&sim, or), output(&sim, xor));
        let (and_in, or_in, xor_in) = (sim.gates[and].inputs.clone(), sim.gates[or].inputs.clone(), sim.gates[xor].inputs.clone());
        let led_in = sim.indicators[led].input;

        let registry = sim.add_registry();
        registry.connect(outs[0], and_in[0]);
        registry.connect(outs[1], and_in[1]);
        for (i, input) in or_in.iter().enumerate() {
            registry.connect(outs[i + 2], *input);
        }
        let registry = sim.add_registry();
        registry.connect(and_out, xor_in[0]);
        registry.connect(or_out, xor_in[1]);
        registry.connect(xor_out, led_in);
        let index = sim.wire_index();
        sim.settle(&index);

        let expected = |c: u32| (c & 0b11 == 0b11) != (c >> 2 != 0);
        let table: Vec<_> = (0..64).map(|combination| TruthTableEntry { combination, expected: expected(combination) }).collect();
        let tasks = vec![
            Task::truth_table("and xor or", table).with_switches(switches.clone()).with_indicator(led),
            Task::target_values("first four", vec![4, 8, 12]).with_switches(switches.into_iter().take(4)).with_indicator(led).requiring(GateKind::And | GateKind::Xor),
        ];
        TaskGrader::new(sim, tasks)
    }

    #[test]
    fn max_score_without_grading() {
        let grader = graded_circuit();
        assert_eq!(grader.max_score(), 150);
        assert_eq!(TaskGrader::new(Simulation::new(), Vec::new()).max_score(), 0);
    }

    #[test]
    fn grades_both_variants() {
        let mut grader = graded_circuit();
        let report = grader.grade_all();

        assert_eq!(report.max_score, 150);
        assert!(report.tasks[0].passed, "{:?}", report.tasks[0].diagnostics);
        assert_eq!(report.tasks[0].score, 100);
        // the truth table run leaves all six switches on; the second task reads 0b1111, which is not a target, and the indicator is off
        assert!(report.tasks[1].passed, "{:?}", report.tasks[1].diagnostics);
        assert_eq!(report.tasks[1].score, 50);
        assert_eq!(report.total_score, 150);
        assert_eq!(report.total_score, report.tasks.iter().map(|t| t.score).sum::<u32>());
        assert!(report.to_string().starts_with("Total score: 150 / 150\n"));
    }

    #[test]
    fn failures_list_diagnostics() {
        let mut grader = graded_circuit();
        let and = grader.simulation().gates_of_kind(GateKind::And).map(|(k, _)| k).next().expect("and gate exists");
        grader.simulation_mut().rename_gate(and, "MyAnd");
        let report = grader.grade_all();

        let second = &report.tasks[1];
        assert!(!second.passed);
        // toggle 30, connections 20, presence 15, naming -5: 60 capped at 50
        assert_eq!(second.score, 50);
        assert!(report.to_string().contains("[Task 2]: not correct yet (50 points)\n    gate naming: AND gate 'MyAnd' does not start with 'AndGate_'\n"));
    }

    #[test]
    fn one_bad_task_does_not_stop_the_rest() {
        let mut grader = graded_circuit();
        grader.tasks_mut().insert(0, Task::truth_table("unbound", Vec::new()));
        let report = grader.grade_all();

        assert_eq!(report.tasks.len(), 3);
        assert!(!report.tasks[0].passed);
        // only the gate count criterion holds
        assert_eq!(report.tasks[0].score, 10);
        assert!(report.tasks[1].passed);
    }

    #[test]
    fn switch_flipped_before_grading() {
        let mut sim = Simulation::new();
        let switches: Vec<_> = (0..4).map(|i| sim.add_switch(format!("Switch_{i}"), false)).collect();
        let led = sim.add_indicator("LED");
        let or = sim.add_gate(GateKind::Or, "OrGate_1", 4);
        let outs: Vec<_> = switches.iter().map(|s| sim.switches[*s].output).collect();
        let or_in = sim.gates[or].inputs.clone();
        let or_out = sim.gates[or].output.expect("or has output");
        let led_in = sim.indicators[led].input;
        let registry = sim.add_registry();
        for (out, input) in outs.iter().zip(&or_in) {
            registry.connect(*out, *input);
        }
        registry.connect(or_out, led_in);
        let index = sim.wire_index();
        sim.settle(&index);
        sim.set_switch(switches[0], true);

        let task = Task::target_values("any switch", (1..16).collect()).with_switches(switches).with_indicator(led).requiring(GateKind::Or);
        let mut grader = TaskGrader::new(sim, vec![task]);
        let report = grader.grade_all();
        assert!(report.tasks[0].passed, "{:?}", report.tasks[0].diagnostics);
        assert_eq!(report.tasks[0].score, 50);
        assert_eq!(grader.simulation().indicator_state(led), Some(true));
    }

    #[test]
    fn spawned_objects_fill_first_task() {
        let mut sim = Simulation::new();
        let a = sim.add_switch("a", false);
        let b = sim.add_switch("b", false);
        let led = sim.add_indicator("led");
        let other_led = sim.add_indicator("other");
        let gate = sim.add_gate(GateKind::And, "AndGate_1", 2);
        let mut grader = TaskGrader::new(sim, vec![Task::target_values("first", vec![]), Task::target_values("second", vec![])]);

        assert_eq!(grader.on_object_created(SpawnedObject::Indicator(led)), Some(Binding::Indicator));
        assert_eq!(grader.on_object_created(SpawnedObject::Indicator(other_led)), None);
        assert_eq!(grader.on_object_created(SpawnedObject::Switch(a)), Some(Binding::SwitchSlot(0)));
        assert_eq!(grader.on_object_created(SpawnedObject::Switch(b)), Some(Binding::SwitchSlot(1)));
        assert_eq!(grader.on_object_created(SpawnedObject::Gate(gate)), None);

        assert_eq!(grader.tasks()[0].indicator, Some(led));
        assert_eq!(grader.tasks()[0].switches, vec![Some(a), Some(b), None, None]);
        assert_eq!(grader.tasks()[1].indicator, None);

        for _ in 0..2 {
            grader.on_object_created(SpawnedObject::Switch(a));
        }
        assert_eq!(grader.on_object_created(SpawnedObject::Switch(b)), None);
    }

    #[test]
    fn spawning_without_tasks_binds_nothing() {
        let mut sim = Simulation::new();
        let led = sim.add_indicator("led");
        let mut grader = TaskGrader::new(sim, Vec::new());
        assert_eq!(grader.on_object_created(SpawnedObject::Indicator(led)), None);
    }
}

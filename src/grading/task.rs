use enumset::EnumSet;

use crate::{
    grading::diagnostic::{Check, Diagnostic, Part},
    simulation::{GateKind, IndicatorKey, Simulation, SwitchKey},
};

pub const TARGET_VALUES_SWITCHES: usize = 4;
pub const TRUTH_TABLE_SWITCHES: usize = 6;

pub const DEFAULT_TARGET_VALUES_SCORE: u32 = 50;
pub const DEFAULT_TRUTH_TABLE_SCORE: u32 = 100;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TruthTableEntry {
    /// Switch `i` is on iff bit `i` is set.
    pub combination: u32,
    pub expected: bool,
}

/// What the indicator is checked against.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TaskCheck {
    /// The indicator should be on exactly for these switch combinations.
    TargetValues(Vec<u32>),
    TruthTable(Vec<TruthTableEntry>),
}

#[derive(Clone, Debug)]
pub struct Task {
    pub description: String,
    pub required_gates: EnumSet<GateKind>,
    pub switches: Vec<Option<SwitchKey>>,
    pub indicator: Option<IndicatorKey>,
    pub max_score: u32,
    pub check: TaskCheck,
}

impl Task {
    pub fn target_values(description: impl Into<String>, targets: Vec<u32>) -> Task {
        Task {
            description: description.into(),
            required_gates: EnumSet::empty(),
            switches: vec![None; TARGET_VALUES_SWITCHES],
            indicator: None,
            max_score: DEFAULT_TARGET_VALUES_SCORE,
            check: TaskCheck::TargetValues(targets),
        }
    }

    /// An empty table is replaced by every combination expecting the indicator off.
    pub fn truth_table(description: impl Into<String>, entries: Vec<TruthTableEntry>) -> Task {
        let entries = if entries.is_empty() { default_truth_table(TRUTH_TABLE_SWITCHES) } else { entries };
        Task {
            description: description.into(),
            required_gates: EnumSet::empty(),
            switches: vec![None; TRUTH_TABLE_SWITCHES],
            indicator: None,
            max_score: DEFAULT_TRUTH_TABLE_SCORE,
            check: TaskCheck::TruthTable(entries),
        }
    }

    pub fn with_max_score(mut self, max_score: u32) -> Task {
        self.max_score = max_score;
        self
    }
    pub fn requiring(mut self, kinds: impl Into<EnumSet<GateKind>>) -> Task {
        self.required_gates |= kinds.into();
        self
    }
    // fills slots in order, extra switches are dropped
    pub fn with_switches(mut self, switches: impl IntoIterator<Item = SwitchKey>) -> Task {
        for (slot, switch) in self.switches.iter_mut().zip(switches) {
            *slot = Some(switch);
        }
        self
    }
    pub fn with_indicator(mut self, indicator: IndicatorKey) -> Task {
        self.indicator = Some(indicator);
        self
    }

    /// The bound switches, or a diagnostic for every slot that is empty or points at a switch that no longer exists.
    pub(crate) fn resolve_switches(&self, simulation: &Simulation, check: Check) -> Result<Vec<SwitchKey>, Vec<Diagnostic>> {
        let mut resolved = Vec::with_capacity(self.switches.len());
        let mut missing = Vec::new();
        for (slot, switch) in self.switches.iter().enumerate() {
            match switch {
                Some(switch) if simulation.switches.contains_key(*switch) => resolved.push(*switch),
                _ => missing.push(Diagnostic::BindingMissing { check, part: Part::Switch(slot) }),
            }
        }

        if missing.is_empty() {
            Ok(resolved)
        } else {
            Err(missing)
        }
    }

    pub(crate) fn resolve_indicator(&self, simulation: &Simulation, check: Check) -> Result<IndicatorKey, Diagnostic> {
        self.indicator.filter(|i| simulation.indicators.contains_key(*i)).ok_or(Diagnostic::BindingMissing { check, part: Part::Indicator })
    }
}

pub fn default_truth_table(num_switches: usize) -> Vec<TruthTableEntry> {
    (0..1u32 << num_switches).map(|combination| TruthTableEntry { combination, expected: false }).collect()
}

use thiserror::Error;

use crate::{simulation::GateKind, utils};

/// Which check produced a diagnostic.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Check {
    Toggle,
    Connectivity,
    Presence,
    Naming,
    GateCount,
    TruthTable,
}

/// A part of the task that has to be bound to something in the simulation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Part {
    Indicator,
    Switch(usize),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    #[error("{check}: {part} is not bound to the task")]
    BindingMissing { check: Check, part: Part },
    #[error("{check}: expected {expected} switches but the task has {got}")]
    WrongArity { check: Check, expected: usize, got: usize },
    #[error("{check}: malformed truth table: {reason}")]
    MalformedTruthTable { check: Check, reason: String },
    #[error("{check}: {switch} is not connected to the indicator through a gate")]
    NotConnected { check: Check, switch: String },
    #[error("{check}: no {kind} gate found")]
    MissingGateKind { check: Check, kind: GateKind },
    #[error("{check}: {kind} gate '{name}' does not start with '{prefix}'")]
    NamingViolation { check: Check, kind: GateKind, name: String, prefix: &'static str },
    #[error("{check}: no gate found")]
    NoGates { check: Check },
    #[error("{check}: switches read {combination} (Toggle: {}) -> indicator should be {} but is {}", bits(.combination, .width), word(.expected), word(.got))]
    ToggleMismatch { check: Check, combination: u32, width: usize, expected: bool, got: bool },
    #[error("{check}: switches read {combination} (Toggle: {}) which the truth table does not cover", bits(.combination, .width))]
    UncoveredCombination { check: Check, combination: u32, width: usize },
    #[error("Combo {combination} (Toggle: {}) -> expected {} but got {}", bits(.combination, .width), word(.expected), word(.got))]
    OutputMismatch { combination: u32, width: usize, expected: bool, got: bool },
}

/// The result of one check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub passed: bool,
    pub diagnostics: Vec<Diagnostic>,
}

impl Verdict {
    pub fn pass() -> Verdict {
        Verdict { passed: true, diagnostics: Vec::new() }
    }

    pub fn fail(diagnostic: Diagnostic) -> Verdict {
        Verdict { passed: false, diagnostics: vec![diagnostic] }
    }

    /// Passes iff nothing was reported.
    pub fn from_diagnostics(diagnostics: Vec<Diagnostic>) -> Verdict {
        Verdict { passed: diagnostics.is_empty(), diagnostics }
    }
}

fn bits(combination: &u32, width: &usize) -> String {
    utils::binary(*combination, *width)
}

fn word(value: &bool) -> &'static str {
    utils::bool_word(*value)
}

impl std::fmt::Display for Check {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Check::Toggle => "toggle state",
            Check::Connectivity => "connections",
            Check::Presence => "gate presence",
            Check::Naming => "gate naming",
            Check::GateCount => "gate count",
            Check::TruthTable => "truth table",
        };
        write!(f, "{name}")
    }
}

impl std::fmt::Display for Part {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Part::Indicator => write!(f, "indicator"),
            Part::Switch(slot) => write!(f, "switch slot {slot}"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::{Check, Diagnostic, Part, Verdict};
    use crate::simulation::GateKind;

    #[test]
    fn output_mismatch_message() {
        let d = Diagnostic::OutputMismatch { combination: 5, width: 6, expected: true, got: false };
        assert_eq!(d.to_string(), "Combo 5 (Toggle: 000101) -> expected True but got False");
    }

    #[test]
    fn naming_message_names_gate() {
        let d = Diagnostic::NamingViolation { check: Check::Naming, kind: GateKind::And, name: "Foo".into(), prefix: "AndGate_" };
        assert_eq!(d.to_string(), "gate naming: AND gate 'Foo' does not start with 'AndGate_'");
    }

    #[test]
    fn binding_message() {
        let d = Diagnostic::BindingMissing { check: Check::Connectivity, part: Part::Switch(3) };
        assert_eq!(d.to_string(), "connections: switch slot 3 is not bound to the task");
    }

    #[test]
    fn verdict_from_diagnostics() {
        assert!(Verdict::from_diagnostics(Vec::new()).passed);
        assert!(!Verdict::from_diagnostics(vec![Diagnostic::NoGates { check: Check::GateCount }]).passed);
    }
}

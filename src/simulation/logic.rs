use enumset::EnumSetType;

#[derive(EnumSetType, Debug, Hash)]
pub enum GateKind {
    And,
    Or,
    Nand,
    Nor,
    Xor,
    Xnor,
    Not,
}

impl GateKind {
    /// Every kind, in the order the circuit is recomputed.
    pub const ALL: [GateKind; 7] = [GateKind::And, GateKind::Or, GateKind::Nand, GateKind::Nor, GateKind::Xor, GateKind::Xnor, GateKind::Not];

    pub fn name(self) -> &'static str {
        match self {
            GateKind::And => "and",
            GateKind::Or => "or",
            GateKind::Nand => "nand",
            GateKind::Nor => "nor",
            GateKind::Xor => "xor",
            GateKind::Xnor => "xnor",
            GateKind::Not => "not",
        }
    }

    pub fn from_name(name: &str) -> Option<GateKind> {
        GateKind::ALL.into_iter().find(|kind| kind.name().eq_ignore_ascii_case(name))
    }

    /// Prefix that the identifier of every gate of this kind has to start with.
    pub fn name_prefix(self) -> &'static str {
        match self {
            GateKind::And => "AndGate_",
            GateKind::Or => "OrGate_",
            GateKind::Nand => "NandGate_",
            GateKind::Nor => "NorGate_",
            GateKind::Xor => "XorGate_",
            GateKind::Xnor => "XnorGate_",
            GateKind::Not => "NotGate_",
        }
    }

    pub fn compute(self, inputs: &[bool]) -> bool {
        let on = inputs.iter().filter(|i| **i).count();
        match self {
            GateKind::And => on == inputs.len(),
            GateKind::Or => on > 0,
            GateKind::Nand => on != inputs.len(),
            GateKind::Nor => on == 0,
            GateKind::Xor => on % 2 == 1,
            GateKind::Xnor => on % 2 == 0,
            // only the first input counts; an unconnected not gate outputs true
            GateKind::Not => !inputs.first().copied().unwrap_or(false),
        }
    }
}

impl std::fmt::Display for GateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name().to_uppercase())
    }
}

use crate::simulation::{Simulation, SwitchKey};

/// Zero padded binary representation of `combination`, most significant bit first.
pub(crate) fn binary(combination: u32, width: usize) -> String {
    format!("{combination:0width$b}")
}

pub(crate) fn bool_word(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

/// Switch states for a combination: switch `i` is on iff bit `i` is set.
pub(crate) fn combination_bits(combination: u32, width: usize) -> Vec<bool> {
    (0..width).map(|i| (combination >> i) & 1 == 1).collect()
}

/// Reads the switches back into a combination, the inverse of [`combination_bits`].
/// Missing switches read as off; switches past bit 31 are ignored.
pub(crate) fn read_combination(simulation: &Simulation, switches: &[SwitchKey]) -> u32 {
    switches.iter().enumerate().filter(|(_, s)| simulation.switch_state(**s).unwrap_or(false)).fold(0, |acc, (i, _)| acc | u32::try_from(i).ok().and_then(|i| 1u32.checked_shl(i)).unwrap_or(0))
}

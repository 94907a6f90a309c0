use crate::grading::task::Task;

/// Points for one criterion: `pass` is added when it holds, `fail` is added (usually negative or zero) when it does not.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Criterion {
    pub name: &'static str,
    pub pass: i32,
    pub fail: i32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeightTable {
    pub criteria: Vec<Criterion>,
}

impl WeightTable {
    /// Toggle state, connections, gate presence, gate naming; failures cost points.
    pub fn structure() -> WeightTable {
        WeightTable {
            criteria: vec![
                Criterion { name: "toggle state", pass: 30, fail: -10 },
                Criterion { name: "connections", pass: 20, fail: -10 },
                Criterion { name: "gate presence", pass: 15, fail: -5 },
                Criterion { name: "gate naming", pass: 15, fail: -5 },
            ],
        }
    }

    /// Toggle state, connections, at least one gate, truth table; failures cost nothing.
    pub fn truth_table() -> WeightTable {
        WeightTable {
            criteria: vec![
                Criterion { name: "toggle state", pass: 10, fail: 0 },
                Criterion { name: "connections", pass: 10, fail: 0 },
                Criterion { name: "gate count", pass: 10, fail: 0 },
                Criterion { name: "truth table", pass: 70, fail: 0 },
            ],
        }
    }
}

/// Sums the contribution of every criterion and clamps the result to `[0, task.max_score]`.
/// `verdicts` lines up with the criteria of `weights`; a criterion without a verdict counts as failed.
pub fn score(task: &Task, verdicts: &[bool], weights: &WeightTable) -> u32 {
    if verdicts.len() != weights.criteria.len() {
        log::warn!("{} verdicts for {} criteria in task '{}'", verdicts.len(), weights.criteria.len(), task.description);
    }

    let sum: i64 = weights
        .criteria
        .iter()
        .enumerate()
        .map(|(i, criterion)| {
            let passed = verdicts.get(i).copied().unwrap_or(false);
            log::debug!("task '{}': {} {}", task.description, criterion.name, if passed { "holds" } else { "fails" });
            if passed {
                criterion.pass
            } else {
                criterion.fail
            }
        })
        .map(i64::from)
        .sum();

    // clamp always fits, the upper bound is a u32
    sum.clamp(0, i64::from(task.max_score)) as u32
}

//! State summary data model

use std::collections::BTreeMap;
use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

use super::state::StateName;

/// Count of reachable leaves per state name
///
/// Always holds an entry for every known state, zero or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateCensus {
    counts: BTreeMap<StateName, u32>,
}

impl Default for StateCensus {
    fn default() -> Self {
        Self {
            counts: StateName::ALL.iter().map(|state| (*state, 0)).collect(),
        }
    }
}

impl StateCensus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, state: StateName) -> u32 {
        self.counts.get(&state).copied().unwrap_or(0)
    }

    /// Count one more leaf in `state`
    pub fn record(&mut self, state: StateName) {
        *self.counts.entry(state).or_insert(0) += 1;
    }

    /// Total number of leaves counted
    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }

    /// Whether any leaf is in a state outside of `acceptable`
    pub fn has_problems(&self, acceptable: &[StateName]) -> bool {
        self.counts
            .iter()
            .any(|(state, count)| *count != 0 && !acceptable.contains(state))
    }

    pub fn iter(&self) -> impl Iterator<Item = (StateName, u32)> + '_ {
        self.counts.iter().map(|(state, count)| (*state, *count))
    }
}

impl AddAssign<&StateCensus> for StateCensus {
    fn add_assign(&mut self, other: &StateCensus) {
        for (state, count) in other.iter() {
            *self.counts.entry(state).or_insert(0) += count;
        }
    }
}

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::data::record::Record;

/// Net type matchups of a team after cross-member cancellation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coverage {
    /// Tags the team is weak to and nobody covers, sorted.
    pub weaknesses: Vec<String>,
    /// Tags the team resists (or is immune to) and nobody is weak to, sorted.
    pub resistances: Vec<String>,
}

impl Coverage {
    pub fn is_empty(&self) -> bool {
        self.weaknesses.is_empty() && self.resistances.is_empty()
    }
}

/// Compute a team's coverage.
///
/// Weaknesses are unioned across members, as are resistances together with
/// immunities. A tag present in both unions cancels out of both: one member
/// resisting (or immune to) a tag covers every member weak to it, and a tag
/// someone is weak to is never reported as a team resistance.
pub fn coverage(team: &[&Record]) -> Coverage {
    let weak: HashSet<&str> = team
        .iter()
        .flat_map(|r| r.weaknesses.iter())
        .map(String::as_str)
        .collect();

    let resist: HashSet<&str> = team
        .iter()
        .flat_map(|r| r.resistances.iter().chain(r.immunities.iter()))
        .map(String::as_str)
        .collect();

    Coverage {
        weaknesses: sorted_difference(&weak, &resist),
        resistances: sorted_difference(&resist, &weak),
    }
}

fn sorted_difference(keep: &HashSet<&str>, remove: &HashSet<&str>) -> Vec<String> {
    let mut tags: Vec<String> = keep.difference(remove).map(|t| t.to_string()).collect();
    tags.sort();
    tags
}

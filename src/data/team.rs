use thiserror::Error;

use super::loader::Pokedex;
use super::record::Record;

/// Maximum number of members in a team.
pub const TEAM_SIZE: usize = 6;

/// Minimum team size before an analysis can be requested.
pub const MIN_ANALYSIS_SIZE: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TeamError {
    #[error("team already has {} members", TEAM_SIZE)]
    Full,
    #[error("#{0} is already on the team")]
    AlreadyPresent(u32),
}

/// The user's working selection: up to six distinct records, kept in the
/// order they were added. Members are stored as catalog ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Team {
    members: Vec<u32>,
}

impl Team {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record unless the team is full or already holds it.
    pub fn add(&mut self, record: &Record) -> Result<(), TeamError> {
        if self.contains(record.id) {
            return Err(TeamError::AlreadyPresent(record.id));
        }
        if self.is_full() {
            return Err(TeamError::Full);
        }
        self.members.push(record.id);
        Ok(())
    }

    /// Remove a member by id. Returns whether anything was removed.
    pub fn remove(&mut self, id: u32) -> bool {
        let before = self.members.len();
        self.members.retain(|&m| m != id);
        self.members.len() != before
    }

    pub fn contains(&self, id: u32) -> bool {
        self.members.contains(&id)
    }

    pub fn ids(&self) -> &[u32] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.members.len() >= TEAM_SIZE
    }

    pub fn can_analyze(&self) -> bool {
        self.members.len() >= MIN_ANALYSIS_SIZE
    }

    /// Resolve members against the catalog, in team order.
    pub fn resolve<'a>(&self, pokedex: &'a Pokedex) -> Vec<&'a Record> {
        self.members
            .iter()
            .filter_map(|&id| pokedex.get(id))
            .collect()
    }
}

//! Team standings record.

use serde::{Deserialize, Serialize};

/// Input row for one team: current record plus games left against every team by position.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TeamRecord {
    pub name: String,
    pub wins: u32,
    pub losses: u32,
    pub remaining: u32,
    /// Games left against each team, indexed by division position.
    pub against: Vec<u32>,
}

impl TeamRecord {
    pub fn new(
        name: impl Into<String>,
        wins: u32,
        losses: u32,
        remaining: u32,
        against: Vec<u32>,
    ) -> Self {
        Self {
            name: name.into(),
            wins,
            losses,
            remaining,
            against,
        }
    }
}

/// A team inside a built division.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Team {
    pub name: String,
    pub wins: u32,
    pub losses: u32,
    pub remaining: u32,
    /// Position in the division (row/column of the schedule matrix).
    pub index: usize,
    pub against: Vec<u32>,
}

impl Team {
    pub(crate) fn from_record(record: TeamRecord, index: usize) -> Self {
        Self {
            name: record.name,
            wins: record.wins,
            losses: record.losses,
            remaining: record.remaining,
            index,
            against: record.against,
        }
    }

    /// Best case for this team: win every remaining game.
    pub fn max_possible_wins(&self) -> u64 {
        u64::from(self.wins) + u64::from(self.remaining)
    }

    /// Games left against the team at `index`.
    pub fn against_index(&self, index: usize) -> u32 {
        self.against[index]
    }
}

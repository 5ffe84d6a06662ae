//! Division: ordered teams plus the remaining-games schedule. Immutable once built.

use crate::models::team::{Team, TeamRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Errors from building or querying a division.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DivisionError {
    /// No team with this name in the division.
    UnknownTeam(String),
    /// Two teams share a name (names identify teams).
    DuplicateTeamName(String),
    /// A team name is empty or whitespace.
    EmptyTeamName,
    /// A schedule row does not have one entry per team.
    InvalidScheduleData {
        team: String,
        expected: usize,
        found: usize,
    },
    /// Malformed standings input.
    Parse { line: usize, message: String },
    /// Standings file could not be read.
    Io(String),
}

impl std::fmt::Display for DivisionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DivisionError::UnknownTeam(name) => write!(f, "Unknown team: {}", name),
            DivisionError::DuplicateTeamName(name) => {
                write!(f, "A team named {} already exists", name)
            }
            DivisionError::EmptyTeamName => write!(f, "Team name must not be empty"),
            DivisionError::InvalidScheduleData {
                team,
                expected,
                found,
            } => write!(
                f,
                "Schedule row for {} has {} entries (expected {})",
                team, found, expected
            ),
            DivisionError::Parse { line, message } => write!(f, "Line {}: {}", line, message),
            DivisionError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for DivisionError {}

/// A violation of the schedule contract (symmetric, zero diagonal, rows sum to `remaining`).
/// Reported by [`Division::schedule_issues`]; queries never check these.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScheduleIssue {
    Asymmetric {
        team_1: String,
        team_2: String,
        forward: u32,
        backward: u32,
    },
    PlaysItself {
        team: String,
        games: u32,
    },
    RemainingMismatch {
        team: String,
        remaining: u32,
        scheduled: u64,
    },
}

impl std::fmt::Display for ScheduleIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScheduleIssue::Asymmetric {
                team_1,
                team_2,
                forward,
                backward,
            } => write!(
                f,
                "{} lists {} games against {}, but {} lists {}",
                team_1, forward, team_2, team_2, backward
            ),
            ScheduleIssue::PlaysItself { team, games } => {
                write!(f, "{} is scheduled to play itself {} times", team, games)
            }
            ScheduleIssue::RemainingMismatch {
                team,
                remaining,
                scheduled,
            } => write!(
                f,
                "{} has {} remaining games but {} scheduled",
                team, remaining, scheduled
            ),
        }
    }
}

/// Raw shape used to deserialize a division.
#[derive(Deserialize)]
struct DivisionData {
    teams: Vec<TeamRecord>,
}

impl TryFrom<DivisionData> for Division {
    type Error = DivisionError;

    fn try_from(data: DivisionData) -> Result<Self, Self::Error> {
        Division::new(data.teams)
    }
}

/// Full division: teams in input order and the schedule between them.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "DivisionData")]
pub struct Division {
    teams: Vec<Team>,
    #[serde(skip)]
    by_name: HashMap<String, usize>,
}

impl Division {
    /// Build a division. Names must be unique and non-empty; every schedule row needs one
    /// entry per team. Schedule contents are not checked (see [`Division::schedule_issues`]).
    pub fn new(records: Vec<TeamRecord>) -> Result<Self, DivisionError> {
        let count = records.len();
        let mut by_name = HashMap::with_capacity(count);
        let mut teams = Vec::with_capacity(count);
        for (index, record) in records.into_iter().enumerate() {
            if record.name.trim().is_empty() {
                return Err(DivisionError::EmptyTeamName);
            }
            if record.against.len() != count {
                return Err(DivisionError::InvalidScheduleData {
                    team: record.name,
                    expected: count,
                    found: record.against.len(),
                });
            }
            if by_name.insert(record.name.clone(), index).is_some() {
                return Err(DivisionError::DuplicateTeamName(record.name));
            }
            teams.push(Team::from_record(record, index));
        }
        Ok(Self { teams, by_name })
    }

    /// Number of teams.
    pub fn team_count(&self) -> usize {
        self.teams.len()
    }

    /// Team names in input order.
    pub fn teams(&self) -> impl Iterator<Item = &str> + '_ {
        self.teams.iter().map(|t| t.name.as_str())
    }

    /// Teams in input order.
    pub fn team_records(&self) -> &[Team] {
        &self.teams
    }

    /// Look up a team by name.
    pub fn team(&self, name: &str) -> Result<&Team, DivisionError> {
        self.by_name
            .get(name)
            .map(|&i| &self.teams[i])
            .ok_or_else(|| DivisionError::UnknownTeam(name.to_string()))
    }

    pub fn wins(&self, name: &str) -> Result<u32, DivisionError> {
        Ok(self.team(name)?.wins)
    }

    pub fn losses(&self, name: &str) -> Result<u32, DivisionError> {
        Ok(self.team(name)?.losses)
    }

    pub fn remaining(&self, name: &str) -> Result<u32, DivisionError> {
        Ok(self.team(name)?.remaining)
    }

    /// Games left between two teams.
    pub fn against(&self, team_1: &str, team_2: &str) -> Result<u32, DivisionError> {
        let t1 = self.team(team_1)?;
        let t2 = self.team(team_2)?;
        Ok(t1.against_index(t2.index))
    }

    /// Check the schedule contract. Empty when the data is consistent.
    pub fn schedule_issues(&self) -> Vec<ScheduleIssue> {
        let mut issues = Vec::new();
        for t in &self.teams {
            let own = t.against_index(t.index);
            if own != 0 {
                issues.push(ScheduleIssue::PlaysItself {
                    team: t.name.clone(),
                    games: own,
                });
            }
            let scheduled: u64 = t.against.iter().map(|&g| u64::from(g)).sum();
            if scheduled != u64::from(t.remaining) {
                issues.push(ScheduleIssue::RemainingMismatch {
                    team: t.name.clone(),
                    remaining: t.remaining,
                    scheduled,
                });
            }
        }
        for (i, a) in self.teams.iter().enumerate() {
            for b in &self.teams[i + 1..] {
                let forward = a.against_index(b.index);
                let backward = b.against_index(a.index);
                if forward != backward {
                    issues.push(ScheduleIssue::Asymmetric {
                        team_1: a.name.clone(),
                        team_2: b.name.clone(),
                        forward,
                        backward,
                    });
                }
            }
        }
        issues
    }
}

//! Data structures for a division: teams, standings and the remaining schedule.

mod division;
mod team;

pub use division::{Division, DivisionError, ScheduleIssue};
pub use team::{Team, TeamRecord};

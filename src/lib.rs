//! Division elimination: which teams can no longer finish first, and which teams prove it.

pub mod loader;
pub mod logic;
pub mod models;

pub use loader::{load_division, load_division_as, parse_division, read_division_csv, Format};
pub use logic::{
    build_network, certificate_of_elimination, division_report, is_eliminated,
    trivial_elimination, verify_certificate, Dinic, EdmondsKarp, Elimination, EliminationEngine,
    EliminationMethod, EliminationNetwork, FlowNetwork, MaxFlow, MaxFlowSolver, Solver,
};
pub use models::{Division, DivisionError, ScheduleIssue, Team, TeamRecord};

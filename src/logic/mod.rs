//! Elimination logic: trivial check, flow network reduction, max-flow solvers, engine.

mod elimination;
pub mod max_flow;
pub mod network;
mod trivial;

pub use elimination::{
    certificate_of_elimination, division_report, is_eliminated, verify_certificate, Elimination,
    EliminationEngine, EliminationMethod,
};
pub use max_flow::{Dinic, EdmondsKarp, FlowEdge, FlowNetwork, MaxFlow, MaxFlowSolver, Solver};
pub use network::{build_network, EliminationNetwork};
pub use trivial::trivial_elimination;

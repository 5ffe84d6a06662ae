//! Elimination engine: trivial check, then the max-flow reduction, then certificate verification.

use crate::logic::max_flow::{MaxFlowSolver, Solver};
use crate::logic::network::build_network;
use crate::logic::trivial::trivial_elimination;
use crate::models::{Division, DivisionError};
use serde::Serialize;

/// How an elimination was decided.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EliminationMethod {
    /// One team already has more wins than the candidate can reach.
    Trivial,
    /// Min cut of the flow network, confirmed by the certificate check.
    Flow,
    /// Not eliminated.
    None,
}

/// Answer for one team.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Elimination {
    pub team: String,
    pub eliminated: bool,
    /// Teams (division order) that together rule `team` out. Empty when not eliminated.
    pub certificate: Vec<String>,
    pub method: EliminationMethod,
}

impl Elimination {
    fn not_eliminated(team: &str) -> Self {
        Self {
            team: team.to_string(),
            eliminated: false,
            certificate: Vec::new(),
            method: EliminationMethod::None,
        }
    }
}

impl std::fmt::Display for Elimination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.eliminated {
            write!(f, "{} is eliminated by the subset R = {{ ", self.team)?;
            for t in &self.certificate {
                write!(f, "{} ", t)?;
            }
            write!(f, "}}")
        } else {
            write!(f, "{} is not eliminated", self.team)
        }
    }
}

/// Check that `certificate` really rules out `team`: the average wins the certificate teams must
/// reach between them, rounded up, exceeds what `team` can reach. Uses exact integer ceiling.
/// An empty certificate proves nothing.
pub fn verify_certificate(
    division: &Division,
    team: &str,
    certificate: &[String],
) -> Result<bool, DivisionError> {
    let max_wins = division.team(team)?.max_possible_wins();
    if certificate.is_empty() {
        return Ok(false);
    }
    let mut total: u64 = 0;
    for (i, name) in certificate.iter().enumerate() {
        total += u64::from(division.wins(name)?);
        for other in &certificate[i + 1..] {
            total += u64::from(division.against(name, other)?);
        }
    }
    let n = certificate.len() as u64;
    let ceiling_average = total.div_ceil(n);
    Ok(max_wins < ceiling_average)
}

/// Runs elimination queries against one division with a chosen max-flow solver.
/// Holds no mutable state; every query builds and drops its own network.
#[derive(Clone, Copy, Debug)]
pub struct EliminationEngine<'a, S = Solver> {
    division: &'a Division,
    solver: S,
}

impl<'a> EliminationEngine<'a, Solver> {
    pub fn new(division: &'a Division) -> Self {
        Self::with_solver(division, Solver::default())
    }
}

impl<'a, S: MaxFlowSolver> EliminationEngine<'a, S> {
    pub fn with_solver(division: &'a Division, solver: S) -> Self {
        Self { division, solver }
    }

    pub fn division(&self) -> &'a Division {
        self.division
    }

    /// Full answer for `team`.
    pub fn analyze(&self, team: &str) -> Result<Elimination, DivisionError> {
        self.division.team(team)?;

        let trivial = trivial_elimination(self.division, team)?;
        if !trivial.is_empty() {
            log::debug!("{} trivially eliminated by {:?}", team, trivial);
            return Ok(Elimination {
                team: team.to_string(),
                eliminated: true,
                certificate: trivial,
                method: EliminationMethod::Trivial,
            });
        }

        let built = build_network(self.division, team)?;
        let flow = self.solver.max_flow(&built.network, built.source, built.sink);
        log::debug!(
            "{}: max flow {} of {} games",
            team,
            flow.value(),
            built.total_games
        );

        let cut: Vec<String> = built
            .team_vertices()
            .filter(|&(vertex, _)| flow.in_cut(vertex))
            .map(|(_, name)| name.to_string())
            .collect();
        if cut.is_empty() {
            return Ok(Elimination::not_eliminated(team));
        }
        if !verify_certificate(self.division, team, &cut)? {
            log::warn!("{}: cut {:?} does not witness elimination", team, cut);
            return Ok(Elimination::not_eliminated(team));
        }
        Ok(Elimination {
            team: team.to_string(),
            eliminated: true,
            certificate: cut,
            method: EliminationMethod::Flow,
        })
    }

    pub fn is_eliminated(&self, team: &str) -> Result<bool, DivisionError> {
        Ok(self.analyze(team)?.eliminated)
    }

    /// Teams that eliminate `team`, or `None` if it is still alive.
    pub fn certificate_of_elimination(
        &self,
        team: &str,
    ) -> Result<Option<Vec<String>>, DivisionError> {
        let result = self.analyze(team)?;
        Ok(result.eliminated.then_some(result.certificate))
    }

    /// Answers for every team, in division order.
    pub fn report(&self) -> Result<Vec<Elimination>, DivisionError> {
        self.division.teams().map(|name| self.analyze(name)).collect()
    }
}

/// Is `team` eliminated? Uses the default solver.
pub fn is_eliminated(division: &Division, team: &str) -> Result<bool, DivisionError> {
    EliminationEngine::new(division).is_eliminated(team)
}

/// Certificate for `team` with the default solver; `None` if not eliminated.
pub fn certificate_of_elimination(
    division: &Division,
    team: &str,
) -> Result<Option<Vec<String>>, DivisionError> {
    EliminationEngine::new(division).certificate_of_elimination(team)
}

/// Answers for every team in division order with the default solver.
pub fn division_report(division: &Division) -> Result<Vec<Elimination>, DivisionError> {
    EliminationEngine::new(division).report()
}

//! Flow network for one elimination query.
//!
//! Layout for candidate `x` and the other teams R (M = |R|, P = M(M-1)/2 pairs):
//!
//! - vertex 0 is the source
//! - vertices 1..=P are game vertices, one per unordered pair of R
//! - vertices P+1..=P+M are team vertices, one per team of R in division order
//! - vertex P+M+1 is the sink
//!
//! source -> game {i, j} carries the games left between i and j; each game vertex feeds both its
//! teams without bound; team t -> sink allows `max_possible_wins(x) - wins(t)` more wins.

use crate::logic::max_flow::FlowNetwork;
use crate::models::{Division, DivisionError, Team};

pub const SOURCE: usize = 0;

/// A built network plus what is needed to read a min cut back as team names.
#[derive(Clone, Debug)]
pub struct EliminationNetwork {
    pub network: FlowNetwork,
    pub source: usize,
    pub sink: usize,
    /// Team vertex `first_team_vertex + k` stands for `teams[k]`.
    pub first_team_vertex: usize,
    pub teams: Vec<String>,
    /// Sum of all source arcs (games left among R).
    pub total_games: u64,
    /// Capacity used for the game -> team arcs.
    pub unbounded: u64,
}

impl EliminationNetwork {
    pub fn game_vertex_count(&self) -> usize {
        self.first_team_vertex - 1
    }

    /// Map (vertex, team name) for every team vertex.
    pub fn team_vertices(&self) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.teams
            .iter()
            .enumerate()
            .map(move |(k, name)| (self.first_team_vertex + k, name.as_str()))
    }
}

/// Build the network for `candidate`.
///
/// Team -> sink arcs are skipped for teams that already have more wins than the candidate can
/// reach; that case belongs to the trivial check and is logged here.
pub fn build_network(
    division: &Division,
    candidate: &str,
) -> Result<EliminationNetwork, DivisionError> {
    let candidate = division.team(candidate)?;
    let others: Vec<&Team> = division
        .team_records()
        .iter()
        .filter(|t| t.index != candidate.index)
        .collect();
    let m = others.len();
    let pairs = m * m.saturating_sub(1) / 2;
    let first_team_vertex = 1 + pairs;
    let sink = first_team_vertex + m;

    let mut games = Vec::with_capacity(pairs);
    for (a, outer) in others.iter().enumerate() {
        for (b, inner) in others.iter().enumerate().skip(a + 1) {
            games.push((a, b, u64::from(outer.against_index(inner.index))));
        }
    }
    let total_games: u64 = games.iter().map(|&(_, _, g)| g).sum();

    let max_wins = candidate.max_possible_wins();
    let sink_capacities: Vec<Option<u64>> = others
        .iter()
        .map(|t| max_wins.checked_sub(u64::from(t.wins)))
        .collect();
    let finite_total = total_games + sink_capacities.iter().flatten().sum::<u64>();
    let unbounded = finite_total + 1;

    let mut network = FlowNetwork::new(sink + 1);
    for (k, &(a, b, g)) in games.iter().enumerate() {
        let game_vertex = 1 + k;
        network.add_edge(SOURCE, game_vertex, g);
        network.add_edge(game_vertex, first_team_vertex + a, unbounded);
        network.add_edge(game_vertex, first_team_vertex + b, unbounded);
    }
    for (k, capacity) in sink_capacities.iter().enumerate() {
        match capacity {
            Some(c) => network.add_edge(first_team_vertex + k, sink, *c),
            None => log::warn!(
                "{} already has {} wins, more than {} can reach ({}); no sink arc",
                others[k].name,
                others[k].wins,
                candidate.name,
                max_wins
            ),
        }
    }

    log::debug!(
        "network for {}: {} game vertices, {} team vertices, {} games left",
        candidate.name,
        pairs,
        m,
        total_games
    );

    Ok(EliminationNetwork {
        network,
        source: SOURCE,
        sink,
        first_team_vertex,
        teams: others.iter().map(|t| t.name.clone()).collect(),
        total_games,
        unbounded,
    })
}

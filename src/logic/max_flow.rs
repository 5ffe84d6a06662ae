//! Generic directed flow network and max-flow / min-cut solvers.
//!
//! The elimination engine only talks to [`MaxFlowSolver`]; any correct algorithm works behind it.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A directed arc with integer capacity.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FlowEdge {
    pub from: usize,
    pub to: usize,
    pub capacity: u64,
}

/// Directed capacitated graph over vertices `0..vertex_count`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FlowNetwork {
    vertex_count: usize,
    edges: Vec<FlowEdge>,
}

impl FlowNetwork {
    pub fn new(vertex_count: usize) -> Self {
        Self {
            vertex_count,
            edges: Vec::new(),
        }
    }

    /// Add an arc.
    ///
    /// # Panics
    /// If either endpoint is not below `vertex_count`.
    pub fn add_edge(&mut self, from: usize, to: usize, capacity: u64) {
        assert!(
            from < self.vertex_count && to < self.vertex_count,
            "arc {} -> {} outside network of {} vertices",
            from,
            to,
            self.vertex_count
        );
        self.edges.push(FlowEdge { from, to, capacity });
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn edges(&self) -> &[FlowEdge] {
        &self.edges
    }

    /// Arcs leaving `vertex`.
    pub fn edges_from(&self, vertex: usize) -> impl Iterator<Item = &FlowEdge> + '_ {
        self.edges.iter().filter(move |e| e.from == vertex)
    }
}

/// Result of a max-flow computation: the flow value and the source side of a minimum cut.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MaxFlow {
    value: u64,
    source_side: Vec<bool>,
}

impl MaxFlow {
    pub fn value(&self) -> u64 {
        self.value
    }

    /// True if `vertex` is reachable from the source in the final residual graph.
    pub fn in_cut(&self, vertex: usize) -> bool {
        self.source_side.get(vertex).copied().unwrap_or(false)
    }
}

/// Max-flow / min-cut capability.
pub trait MaxFlowSolver {
    /// Saturate `network` from `source` to `sink`.
    ///
    /// # Panics
    /// If `source` or `sink` is not a vertex of `network`.
    fn max_flow(&self, network: &FlowNetwork, source: usize, sink: usize) -> MaxFlow;
}

/// Shortest augmenting paths (BFS).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct EdmondsKarp;

/// Blocking flows on a level graph.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Dinic;

/// Runtime choice of algorithm (CLI / API).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Solver {
    #[default]
    EdmondsKarp,
    Dinic,
}

impl MaxFlowSolver for Solver {
    fn max_flow(&self, network: &FlowNetwork, source: usize, sink: usize) -> MaxFlow {
        match self {
            Solver::EdmondsKarp => EdmondsKarp.max_flow(network, source, sink),
            Solver::Dinic => Dinic.max_flow(network, source, sink),
        }
    }
}

/// Residual graph. Arc `a` and its reverse are stored at `a` and `a ^ 1`.
struct Residual {
    adjacency: Vec<Vec<usize>>,
    to: Vec<usize>,
    residual: Vec<u64>,
}

impl Residual {
    fn new(network: &FlowNetwork) -> Self {
        let arcs = network.edges().len() * 2;
        let mut r = Self {
            adjacency: vec![Vec::new(); network.vertex_count()],
            to: Vec::with_capacity(arcs),
            residual: Vec::with_capacity(arcs),
        };
        for e in network.edges() {
            r.adjacency[e.from].push(r.to.len());
            r.to.push(e.to);
            r.residual.push(e.capacity);
            r.adjacency[e.to].push(r.to.len());
            r.to.push(e.from);
            r.residual.push(0);
        }
        r
    }

    fn push(&mut self, arc: usize, amount: u64) {
        self.residual[arc] -= amount;
        self.residual[arc ^ 1] += amount;
    }

    fn tail(&self, arc: usize) -> usize {
        self.to[arc ^ 1]
    }

    /// BFS over arcs with spare capacity; `None` marks unreachable vertices.
    fn levels(&self, source: usize) -> Vec<Option<usize>> {
        let mut level = vec![None; self.adjacency.len()];
        level[source] = Some(0);
        let mut queue = VecDeque::from([source]);
        while let Some(v) = queue.pop_front() {
            let next = level[v].map(|l| l + 1);
            for &arc in &self.adjacency[v] {
                let w = self.to[arc];
                if level[w].is_none() && self.residual[arc] > 0 {
                    level[w] = next;
                    queue.push_back(w);
                }
            }
        }
        level
    }

    fn source_side(&self, source: usize) -> Vec<bool> {
        self.levels(source).iter().map(Option::is_some).collect()
    }

    /// Dinic's DFS: push at most `limit` along one level-increasing path.
    fn augment(
        &mut self,
        v: usize,
        sink: usize,
        limit: u64,
        level: &[Option<usize>],
        next: &mut [usize],
    ) -> u64 {
        if v == sink {
            return limit;
        }
        while next[v] < self.adjacency[v].len() {
            let arc = self.adjacency[v][next[v]];
            let w = self.to[arc];
            let forward = match (level[v], level[w]) {
                (Some(lv), Some(lw)) => lw == lv + 1,
                _ => false,
            };
            if forward && self.residual[arc] > 0 {
                let pushed = self.augment(w, sink, limit.min(self.residual[arc]), level, next);
                if pushed > 0 {
                    self.push(arc, pushed);
                    return pushed;
                }
            }
            next[v] += 1;
        }
        0
    }
}

impl MaxFlowSolver for EdmondsKarp {
    fn max_flow(&self, network: &FlowNetwork, source: usize, sink: usize) -> MaxFlow {
        let mut graph = Residual::new(network);
        let mut value = 0;
        if source != sink {
            loop {
                let mut parent: Vec<Option<usize>> = vec![None; network.vertex_count()];
                let mut visited = vec![false; network.vertex_count()];
                visited[source] = true;
                let mut queue = VecDeque::from([source]);
                while let Some(v) = queue.pop_front() {
                    if v == sink {
                        break;
                    }
                    for &arc in &graph.adjacency[v] {
                        let w = graph.to[arc];
                        if !visited[w] && graph.residual[arc] > 0 {
                            visited[w] = true;
                            parent[w] = Some(arc);
                            queue.push_back(w);
                        }
                    }
                }
                if !visited[sink] {
                    break;
                }

                let mut bottleneck = u64::MAX;
                let mut v = sink;
                while let Some(arc) = parent[v] {
                    bottleneck = bottleneck.min(graph.residual[arc]);
                    v = graph.tail(arc);
                }
                let mut v = sink;
                while let Some(arc) = parent[v] {
                    graph.push(arc, bottleneck);
                    v = graph.tail(arc);
                }
                value += bottleneck;
            }
        }
        MaxFlow {
            value,
            source_side: graph.source_side(source),
        }
    }
}

impl MaxFlowSolver for Dinic {
    fn max_flow(&self, network: &FlowNetwork, source: usize, sink: usize) -> MaxFlow {
        let mut graph = Residual::new(network);
        let mut value = 0;
        if source != sink {
            loop {
                let level = graph.levels(source);
                if level[sink].is_none() {
                    break;
                }
                let mut next = vec![0; network.vertex_count()];
                loop {
                    let pushed = graph.augment(source, sink, u64::MAX, &level, &mut next);
                    if pushed == 0 {
                        break;
                    }
                    value += pushed;
                }
            }
        }
        MaxFlow {
            value,
            source_side: graph.source_side(source),
        }
    }
}

//! Ordering graph construction and traversal.
//!
//! Nodes are enabled entities of one kind; an edge `a -> b` means `a` must
//! load before `b`.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use petgraph::algo::{has_path_connecting, kosaraju_scc};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use modorder_core::entity::{ConstraintList, Native, Package};

/// A load-ordering graph backed by petgraph.
#[derive(Debug, Default)]
pub struct OrderGraph {
    graph: DiGraph<String, ()>,
    /// Lookup from entity name to node index.
    index: HashMap<String, NodeIndex>,
}

impl OrderGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Graph over the enabled packages.
    pub fn from_packages(packages: &[Package]) -> Self {
        let enabled: Vec<&Package> = packages.iter().filter(|p| p.enabled).collect();
        let mut g = Self::new();
        for p in &enabled {
            g.add_node(p.name());
        }
        for p in &enabled {
            g.add_constraints(p.name(), &p.load_before, &p.load_after);
        }
        g
    }

    /// Graph over the enabled natives. Outgoing constraints of the native at
    /// `skip` are left out, which lets callers ask whether a target is
    /// reachable without going through that native's own list.
    pub fn from_natives(natives: &[Native], skip: Option<usize>) -> Self {
        let mut g = Self::new();
        for n in natives.iter().filter(|n| n.enabled) {
            g.add_node(n.name());
        }
        for (i, n) in natives.iter().enumerate() {
            if !n.enabled || Some(i) == skip {
                continue;
            }
            g.add_constraints(n.name(), &n.load_before, &n.load_after);
        }
        g
    }

    fn add_constraints(&mut self, owner: &str, before: &ConstraintList, after: &ConstraintList) {
        let Some(from) = self.find(owner) else {
            return;
        };
        for c in before.iter().flatten() {
            if let Some(to) = self.find(&c.id) {
                self.add_edge(from, to);
            }
        }
        for c in after.iter().flatten() {
            if let Some(to) = self.find(&c.id) {
                self.add_edge(to, from);
            }
        }
    }

    /// Add or retrieve a node. If the name already exists, returns the existing index.
    pub fn add_node(&mut self, name: &str) -> NodeIndex {
        if let Some(&idx) = self.index.get(name) {
            return idx;
        }
        let idx = self.graph.add_node(name.to_string());
        self.index.insert(name.to_string(), idx);
        idx
    }

    /// Add an ordering edge: `before` loads before `after`.
    pub fn add_edge(&mut self, before: NodeIndex, after: NodeIndex) {
        if !self.graph.edges(before).any(|e| e.target() == after) {
            self.graph.add_edge(before, after, ());
        }
    }

    /// Look up a node by name.
    pub fn find(&self, name: &str) -> Option<NodeIndex> {
        self.index.get(name).copied()
    }

    pub fn name(&self, idx: NodeIndex) -> &str {
        &self.graph[idx]
    }

    /// Whether a non-empty chain of edges leads from `from` to `to`.
    pub fn reaches(&self, from: &str, to: &str) -> bool {
        let (Some(a), Some(b)) = (self.find(from), self.find(to)) else {
            return false;
        };
        if a == b {
            return false;
        }
        has_path_connecting(&self.graph, a, b, None)
    }

    /// Every name reachable from `from` (excluding `from` itself unless it is
    /// on a cycle).
    pub fn reachable_from(&self, from: &str) -> Vec<&str> {
        let Some(start) = self.find(from) else {
            return Vec::new();
        };
        let mut dfs = petgraph::visit::Dfs::new(&self.graph, start);
        let mut out = Vec::new();
        while let Some(idx) = dfs.next(&self.graph) {
            if idx != start {
                out.push(self.graph[idx].as_str());
            }
        }
        out
    }

    /// Topological order, breaking ties by insertion order.
    ///
    /// On failure returns the names of one strongly connected component that
    /// forms a cycle.
    pub fn topological_order(&self) -> Result<Vec<&str>, Vec<&str>> {
        let mut in_degree: Vec<usize> = self
            .graph
            .node_indices()
            .map(|idx| self.graph.edges_directed(idx, Direction::Incoming).count())
            .collect();

        let mut ready: BinaryHeap<Reverse<usize>> = in_degree
            .iter()
            .enumerate()
            .filter(|(_, d)| **d == 0)
            .map(|(i, _)| Reverse(i))
            .collect();

        let mut order = Vec::with_capacity(self.graph.node_count());
        while let Some(Reverse(i)) = ready.pop() {
            let idx = NodeIndex::new(i);
            order.push(self.graph[idx].as_str());
            for edge in self.graph.edges(idx) {
                let t = edge.target().index();
                in_degree[t] -= 1;
                if in_degree[t] == 0 {
                    ready.push(Reverse(t));
                }
            }
        }

        if order.len() == self.graph.node_count() {
            Ok(order)
        } else {
            Err(self.find_cycle())
        }
    }

    fn find_cycle(&self) -> Vec<&str> {
        for component in kosaraju_scc(&self.graph) {
            let is_cycle = component.len() > 1
                || component
                    .first()
                    .is_some_and(|&idx| self.graph.edges(idx).any(|e| e.target() == idx));
            if is_cycle {
                let mut nodes = component;
                nodes.sort();
                return nodes.iter().map(|&idx| self.graph[idx].as_str()).collect();
            }
        }
        Vec::new()
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

//! Role inheritance graph
//!
//! Edges point from a role to its parents. The graph answers three
//! questions at build time:
//!
//! - is there a cycle (DFS with a grey path)
//! - in which order can roles be resolved so every parent comes first (Kahn)
//! - how deep is each role's inheritance chain
//!
//! Iteration follows node insertion order, so results are deterministic.


use indexmap::{IndexMap, IndexSet};
use std::collections::{HashMap, VecDeque};

use crate::error::{AuthzError, Result};

/// A role and the parents it inherits from
///
/// # Examples
///
/// ```rust
/// use rolegate::graph::RoleGraphNode;
///
/// let mut node = RoleGraphNode::new("group_admin");
/// node.add_parent("admin");
/// node.add_parent("admin"); // duplicate, ignored
///
/// assert_eq!(node.parents().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleGraphNode {
    name: String,
    parents: IndexSet<String>,
}

impl RoleGraphNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parents: IndexSet::new(),
        }
    }

    pub fn with_parents<I, S>(name: impl Into<String>, parents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut node = Self::new(name);
        for parent in parents {
            node.add_parent(parent);
        }
        node
    }

    /// Adds a parent edge; repeated parents are ignored
    pub fn add_parent(&mut self, parent: impl Into<String>) {
        self.parents.insert(parent.into());
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parents(&self) -> &IndexSet<String> {
        &self.parents
    }
}

/// Directed graph of role inheritance
#[derive(Debug, Clone, Default)]
pub struct RoleGraph {
    nodes: IndexMap<String, RoleGraphNode>,
}

impl RoleGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a node, replacing any node of the same name
    pub fn add_node(&mut self, node: RoleGraphNode) {
        self.nodes.insert(node.name.clone(), node);
    }

    /// Fails with `CircularInheritance` naming the first cycle found
    ///
    /// The reported cycle starts and ends with the same role, e.g.
    /// `["a", "b", "c", "a"]`. Parents missing from the graph are ignored.
    pub fn detect_cycles(&self) -> Result<()> {
        let mut state: HashMap<&str, VisitState> = HashMap::new();

        for name in self.nodes.keys() {
            if state.get(name.as_str()).copied().unwrap_or(VisitState::Unvisited) == VisitState::Unvisited {
                self.dfs_cycle_detection(name, &mut state, &mut Vec::new())?;
            }
        }

        Ok(())
    }

    fn dfs_cycle_detection<'a>(
        &'a self,
        node: &'a str,
        state: &mut HashMap<&'a str, VisitState>,
        path: &mut Vec<&'a str>,
    ) -> Result<()> {
        match state.get(node) {
            Some(VisitState::Visiting) => {
                let start = path.iter().position(|n| *n == node).unwrap_or(0);
                let mut cycle: Vec<String> = path[start..].iter().map(|n| n.to_string()).collect();
                cycle.push(node.to_string());
                return Err(AuthzError::CircularInheritance { cycle });
            }
            Some(VisitState::Visited) => return Ok(()),
            _ => {}
        }

        let Some(graph_node) = self.nodes.get(node) else {
            return Ok(());
        };

        state.insert(node, VisitState::Visiting);
        path.push(node);

        for parent in &graph_node.parents {
            self.dfs_cycle_detection(parent, state, path)?;
        }

        path.pop();
        state.insert(node, VisitState::Visited);
        Ok(())
    }

    /// Orders roles so that every parent precedes its children
    ///
    /// Roots come out in insertion order. Fails on cycles.
    pub fn topological_sort(&self) -> Result<Vec<String>> {
        self.detect_cycles()?;

        let mut in_degree: IndexMap<&str, usize> = IndexMap::new();
        let mut children: HashMap<&str, Vec<&str>> = HashMap::new();

        for (name, node) in &self.nodes {
            let known_parents: Vec<&str> = node
                .parents
                .iter()
                .map(String::as_str)
                .filter(|p| self.nodes.contains_key(*p))
                .collect();

            in_degree.insert(name, known_parents.len());
            for parent in known_parents {
                children.entry(parent).or_default().push(name);
            }
        }

        let mut queue: VecDeque<&str> = in_degree
            .iter()
            .filter(|(_, &degree)| degree == 0)
            .map(|(name, _)| *name)
            .collect();

        let mut sorted = Vec::with_capacity(self.nodes.len());

        while let Some(current) = queue.pop_front() {
            sorted.push(current.to_string());

            for &child in children.get(current).into_iter().flatten() {
                if let Some(degree) = in_degree.get_mut(child) {
                    *degree -= 1;
                    if *degree == 0 {
                        queue.push_back(child);
                    }
                }
            }
        }

        if sorted.len() != self.nodes.len() {
            let remaining = in_degree
                .iter()
                .filter(|(_, &degree)| degree > 0)
                .map(|(name, _)| name.to_string())
                .collect();
            return Err(AuthzError::CircularInheritance { cycle: remaining });
        }

        Ok(sorted)
    }

    /// Inheritance depth per role: 0 without parents, else 1 + deepest parent
    pub fn depths(&self) -> Result<IndexMap<String, usize>> {
        let order = self.topological_sort()?;
        let mut depths: IndexMap<String, usize> = IndexMap::with_capacity(order.len());

        for name in order {
            let depth = self
                .nodes
                .get(&name)
                .map(|node| {
                    node.parents
                        .iter()
                        .filter_map(|p| depths.get(p))
                        .map(|d| d + 1)
                        .max()
                        .unwrap_or(0)
                })
                .unwrap_or(0);
            depths.insert(name, depth);
        }

        Ok(depths)
    }

    /// Fails with `InheritanceDepthExceeded` for the first role deeper than `max_depth`
    pub fn check_depth(&self, max_depth: usize) -> Result<()> {
        for (role, depth) in self.depths()? {
            if depth > max_depth {
                return Err(AuthzError::InheritanceDepthExceeded { role, max_depth });
            }
        }
        Ok(())
    }

    /// All ancestors of `name`, nearest first, each listed once
    pub fn ancestors(&self, name: &str) -> Vec<String> {
        let mut seen: IndexSet<String> = IndexSet::new();
        let mut queue: VecDeque<&str> = VecDeque::new();
        queue.push_back(name);

        while let Some(current) = queue.pop_front() {
            let Some(node) = self.nodes.get(current) else {
                continue;
            };
            for parent in &node.parents {
                if parent != name && seen.insert(parent.clone()) {
                    queue.push_back(parent);
                }
            }
        }

        seen.into_iter().collect()
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
enum VisitState {
    Unvisited,
    Visiting,
    Visited,
}

//! Cross-package dependency graph.
//!
//! One node per package name (workspace packages and every external name any
//! of them declares). Edges point from consumer to dependency. Each node
//! carries a [`DependencyRecord`]: who declares it, at which version, in which
//! table. The graph is acyclic by construction: an edge that would close a
//! cycle is refused.

use std::collections::{HashMap, HashSet, VecDeque};

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::manifest::{DependencyKind, Manifest};
use crate::registry::Registry;

/// Versions one consumer attached to a dependency, split by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Declaration {
    /// Version in `dependencies`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direct: Option<String>,
    /// Version in `devDependencies`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dev: Option<String>,
    /// Version in `peerDependencies`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peer: Option<String>,
}

impl Declaration {
    /// Reads how `consumer` declares `name`.
    #[must_use]
    pub fn of(consumer: &Manifest, name: &str) -> Self {
        let version = |kind| consumer.dependency(kind, name).map(str::to_string);
        Self {
            direct: version(DependencyKind::Direct),
            dev: version(DependencyKind::Dev),
            peer: version(DependencyKind::Peer),
        }
    }

    /// The direct or dev version, preferring direct.
    #[must_use]
    pub fn binding_version(&self) -> Option<&str> {
        self.direct.as_deref().or(self.dev.as_deref())
    }
}

/// Consumer package name to its declaration of one dependency.
pub type DependencyRecord = IndexMap<String, Declaration>;

#[derive(Debug, Clone, Default)]
struct Node {
    record: DependencyRecord,
    outgoing: IndexSet<String>,
    incoming: IndexSet<String>,
}

/// Directed acyclic graph of package names.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    nodes: IndexMap<String, Node>,
}

impl DependencyGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Derives the graph of a registry.
    ///
    /// Workspace packages become nodes first (in registry order) with empty
    /// records; then every declared dependency adds or extends a node and
    /// gets an edge from its consumer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CircularDependency`] if the workspace packages depend
    /// on each other in a cycle.
    pub fn build(registry: &Registry) -> Result<Self> {
        let mut graph = Self::new();

        for (_, manifest) in registry.iter() {
            graph.add_node(&manifest.name);
        }

        for (_, consumer) in registry.iter() {
            for name in consumer.dependency_names() {
                let entry = (consumer.name.clone(), Declaration::of(consumer, name));
                graph.merge_record(name, DependencyRecord::from([entry]));
                graph.add_dependency(&consumer.name, name)?;
            }
        }

        tracing::debug!(nodes = graph.len(), "built dependency graph");
        Ok(graph)
    }

    /// Adds a node with an empty record; existing nodes are left untouched.
    pub fn add_node(&mut self, name: &str) {
        if !self.nodes.contains_key(name) {
            self.nodes.insert(name.to_string(), Node::default());
        }
    }

    /// Overlays `record` onto the record of `name`, adding the node if needed.
    ///
    /// On a consumer collision the incoming entry wins.
    pub fn merge_record(&mut self, name: &str, record: DependencyRecord) {
        self.add_node(name);
        if let Some(node) = self.nodes.get_mut(name) {
            node.record.extend(record);
        }
    }

    /// Adds the edge `from -> to`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingPackage`] if either end is not a node and
    /// [`Error::CircularDependency`] if `to` already reaches `from`.
    pub fn add_dependency(&mut self, from: &str, to: &str) -> Result<()> {
        if !self.has_node(from) {
            return Err(Error::missing(from));
        }
        if !self.has_node(to) {
            return Err(Error::missing(to));
        }
        if let Some(path) = self.path_between(to, from) {
            let mut cycle = Vec::with_capacity(path.len() + 1);
            cycle.push(from.to_string());
            cycle.extend(path);
            return Err(Error::CircularDependency { cycle });
        }

        if let Some(node) = self.nodes.get_mut(from) {
            node.outgoing.insert(to.to_string());
        }
        if let Some(node) = self.nodes.get_mut(to) {
            node.incoming.insert(from.to_string());
        }
        Ok(())
    }

    /// Depth-first search along outgoing edges; returns the node path
    /// `start ..= goal` when `goal` is reachable.
    fn path_between(&self, start: &str, goal: &str) -> Option<Vec<String>> {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut parents: HashMap<&str, &str> = HashMap::new();
        let mut stack = vec![start];

        while let Some(current) = stack.pop() {
            if current == goal {
                let mut path = vec![goal.to_string()];
                let mut cursor = goal;
                while let Some(parent) = parents.get(cursor) {
                    path.push((*parent).to_string());
                    cursor = parent;
                }
                path.reverse();
                return Some(path);
            }
            if !visited.insert(current) {
                continue;
            }
            if let Some(node) = self.nodes.get(current) {
                for next in node.outgoing.iter().rev() {
                    if !visited.contains(next.as_str()) {
                        parents.entry(next.as_str()).or_insert(current);
                        stack.push(next.as_str());
                    }
                }
            }
        }
        None
    }

    /// Returns `true` if `name` is a node.
    #[must_use]
    pub fn has_node(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    /// The record attached to `name`.
    #[must_use]
    pub fn node_data(&self, name: &str) -> Option<&DependencyRecord> {
        self.nodes.get(name).map(|node| &node.record)
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    /// Names `name` depends on directly.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingPackage`] if `name` is not a node.
    pub fn dependencies_of(&self, name: &str) -> Result<Vec<&str>> {
        let node = self.nodes.get(name).ok_or_else(|| Error::missing(name))?;
        Ok(node.outgoing.iter().map(String::as_str).collect())
    }

    /// Names that depend on `name` directly.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingPackage`] if `name` is not a node.
    pub fn dependants_of(&self, name: &str) -> Result<Vec<&str>> {
        let node = self.nodes.get(name).ok_or_else(|| Error::missing(name))?;
        Ok(node.incoming.iter().map(String::as_str).collect())
    }

    /// A topological order: every name appears after all of its dependencies.
    ///
    /// Ties are broken by insertion order, so the result is deterministic but
    /// not the only valid order.
    #[must_use]
    pub fn overall_order(&self) -> Vec<&str> {
        let mut remaining: HashMap<&str, usize> =
            self.nodes.iter().map(|(name, node)| (name.as_str(), node.outgoing.len())).collect();
        let mut ready: VecDeque<&str> = self
            .nodes
            .iter()
            .filter(|(_, node)| node.outgoing.is_empty())
            .map(|(name, _)| name.as_str())
            .collect();
        let mut order = Vec::with_capacity(self.nodes.len());

        while let Some(name) = ready.pop_front() {
            order.push(name);
            let Some(node) = self.nodes.get(name) else { continue };
            for dependant in &node.incoming {
                if let Some(count) = remaining.get_mut(dependant.as_str()) {
                    *count -= 1;
                    if *count == 0 {
                        ready.push_back(dependant.as_str());
                    }
                }
            }
        }
        order
    }
}

//! Version-drift detection over the dependency graph.
//!
//! A name has integrity when every direct and dev declaration of it uses the
//! same version string. Peer ranges are informational and never compared.

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::graph::{DependencyGraph, DependencyRecord};

/// Outcome of checking one name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntegrityResult {
    /// `true` when at most one distinct direct/dev version is declared.
    pub integrity: bool,
    /// Everyone who declares the name.
    pub consumers: DependencyRecord,
}

impl IntegrityResult {
    /// Evaluates a record.
    #[must_use]
    pub fn of(record: &DependencyRecord) -> Self {
        Self { integrity: distinct_versions(record).len() <= 1, consumers: record.clone() }
    }

    /// Distinct direct/dev versions in declaration order.
    #[must_use]
    pub fn versions(&self) -> Vec<&str> {
        distinct_versions(&self.consumers)
    }
}

fn distinct_versions(record: &DependencyRecord) -> Vec<&str> {
    let mut versions: Vec<&str> = Vec::new();
    for declaration in record.values() {
        for version in [&declaration.direct, &declaration.dev].into_iter().flatten() {
            if !versions.contains(&version.as_str()) {
                versions.push(version);
            }
        }
    }
    versions
}

/// Per-name results, in the order the names were checked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct IntegrityReport {
    results: IndexMap<String, IntegrityResult>,
}

impl IntegrityReport {
    /// Returns `true` when every checked name has integrity.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.results.values().all(|result| result.integrity)
    }

    /// Names without integrity.
    pub fn drifted(&self) -> impl Iterator<Item = (&str, &IntegrityResult)> {
        self.iter().filter(|(_, result)| !result.integrity)
    }

    /// All results.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &IntegrityResult)> {
        self.results.iter().map(|(name, result)| (name.as_str(), result))
    }

    /// The result for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&IntegrityResult> {
        self.results.get(name)
    }

    /// Number of checked names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Returns `true` when nothing was checked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Turns drift into an error listing every drifted name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::VersionDrift`] unless the report is healthy.
    pub fn ensure_healthy(&self) -> Result<()> {
        let names: Vec<String> = self.drifted().map(|(name, _)| name.to_string()).collect();
        if names.is_empty() {
            Ok(())
        } else {
            Err(Error::VersionDrift { names })
        }
    }
}

/// Checks a single name.
///
/// # Errors
///
/// Returns [`Error::MissingPackage`] if `name` is not a node of the graph.
pub fn check_one(name: &str, graph: &DependencyGraph) -> Result<IntegrityResult> {
    graph.node_data(name).map(IntegrityResult::of).ok_or_else(|| Error::missing(name))
}

/// Checks every node, in topological order.
///
/// Never stops at the first drifted name; the caller decides what drift means.
#[must_use]
pub fn check_all(graph: &DependencyGraph) -> IntegrityReport {
    let results = graph
        .overall_order()
        .into_iter()
        .filter_map(|name| {
            graph.node_data(name).map(|record| (name.to_string(), IntegrityResult::of(record)))
        })
        .collect();
    IntegrityReport { results }
}

/// Checks `name` when given, every node otherwise.
///
/// # Errors
///
/// Returns [`Error::MissingPackage`] if a given `name` is not a node.
pub fn check(name: Option<&str>, graph: &DependencyGraph) -> Result<IntegrityReport> {
    match name {
        Some(name) => {
            let result = check_one(name, graph)?;
            Ok(IntegrityReport { results: IndexMap::from([(name.to_string(), result)]) })
        }
        None => Ok(check_all(graph)),
    }
}

//! Fixed dist-tag table for tests.

use std::collections::HashMap;
use std::future::ready;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::PortError;
use crate::ports::dist_tags::{DistTagClient, DistTagFuture};

/// Answers dist-tag lookups from a fixed table and counts every lookup.
#[derive(Default)]
pub struct StaticDistTags {
    tags: HashMap<(String, String), String>,
    lookups: AtomicUsize,
}

impl StaticDistTags {
    /// Creates an empty table; every lookup fails.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes `version` under `name@tag`.
    #[must_use]
    pub fn with_tag(
        mut self,
        name: impl Into<String>,
        tag: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        self.tags.insert((name.into(), tag.into()), version.into());
        self
    }

    /// Number of lookups performed so far.
    #[must_use]
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl DistTagClient for StaticDistTags {
    fn version_for_tag<'a>(&'a self, name: &'a str, tag: &'a str) -> DistTagFuture<'a> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let result: Result<String, PortError> = self
            .tags
            .get(&(name.to_string(), tag.to_string()))
            .cloned()
            .ok_or_else(|| format!("no version published under {name}@{tag}").into());
        Box::pin(ready(result))
    }
}

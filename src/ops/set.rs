//! Moving a name to a new version everywhere, directly or by release type.

use std::fmt;
use std::path::PathBuf;

use semver::{BuildMetadata, Prerelease, Version};
use serde::Serialize;

use super::get::version_of;
use super::{commit_and_notify, load_registry, VersionInfo};
use crate::changes::{Change, ChangeSet};
use crate::config::Config;
use crate::context::ServiceContext;
use crate::error::{Error, Result};
use crate::graph::DependencyGraph;
use crate::hooks::HookEvent;
use crate::manifest::ManifestStore;
use crate::resolve::{is_tag, resolve_version};

/// Outcome of [`set`] and [`bump`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionSet {
    /// Package name.
    pub name: String,
    /// Version now declared everywhere.
    pub version: String,
    /// Manifests that were rewritten.
    pub locations: Vec<PathBuf>,
}

/// How far [`bump`] moves a version, with npm `inc` semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseType {
    /// `1.2.3` to `2.0.0`; `2.0.0-rc.1` to `2.0.0`.
    Major,
    /// `1.2.3` to `1.3.0`; `1.3.0-rc.1` to `1.3.0`.
    Minor,
    /// `1.2.3` to `1.2.4`; `1.2.4-rc.1` to `1.2.4`.
    Patch,
    /// `1.2.3` to `2.0.0-0`.
    Premajor,
    /// `1.2.3` to `1.3.0-0`.
    Preminor,
    /// `1.2.3` to `1.2.4-0`.
    Prepatch,
    /// `1.2.3` to `1.2.4-0`; `1.2.4-0` to `1.2.4-1`.
    Prerelease,
}

impl ReleaseType {
    /// Parses a release type name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "major" => Self::Major,
            "minor" => Self::Minor,
            "patch" => Self::Patch,
            "premajor" => Self::Premajor,
            "preminor" => Self::Preminor,
            "prepatch" => Self::Prepatch,
            "prerelease" => Self::Prerelease,
            _ => return None,
        })
    }

    /// Computes the next version; `preid` names the prerelease channel.
    ///
    /// Returns `None` if `current` is not a semantic version, a component
    /// would overflow, or `preid` is not a valid prerelease identifier.
    #[must_use]
    pub fn apply(self, current: &str, preid: Option<&str>) -> Option<String> {
        let mut version = Version::parse(current.trim().trim_start_matches(['=', 'v'])).ok()?;
        version.build = BuildMetadata::EMPTY;
        let prerelease = !version.pre.is_empty();

        match self {
            Self::Major => {
                if !(prerelease && version.minor == 0 && version.patch == 0) {
                    version.major = version.major.checked_add(1)?;
                }
                version.minor = 0;
                version.patch = 0;
                version.pre = Prerelease::EMPTY;
            }
            Self::Minor => {
                if !(prerelease && version.patch == 0) {
                    version.minor = version.minor.checked_add(1)?;
                }
                version.patch = 0;
                version.pre = Prerelease::EMPTY;
            }
            Self::Patch => {
                if !prerelease {
                    version.patch = version.patch.checked_add(1)?;
                }
                version.pre = Prerelease::EMPTY;
            }
            Self::Premajor => {
                version.major = version.major.checked_add(1)?;
                version.minor = 0;
                version.patch = 0;
                version.pre = next_prerelease(&Prerelease::EMPTY, preid)?;
            }
            Self::Preminor => {
                version.minor = version.minor.checked_add(1)?;
                version.patch = 0;
                version.pre = next_prerelease(&Prerelease::EMPTY, preid)?;
            }
            Self::Prepatch => {
                version.patch = version.patch.checked_add(1)?;
                version.pre = next_prerelease(&Prerelease::EMPTY, preid)?;
            }
            Self::Prerelease => {
                if !prerelease {
                    version.patch = version.patch.checked_add(1)?;
                }
                version.pre = next_prerelease(&version.pre, preid)?;
            }
        }
        Some(version.to_string())
    }
}

/// Increments the last numeric identifier of `pre` (appending `0` when there
/// is none), then moves to the `preid` channel if it differs.
fn next_prerelease(pre: &Prerelease, preid: Option<&str>) -> Option<Prerelease> {
    let mut parts: Vec<String> = if pre.is_empty() {
        vec!["0".to_string()]
    } else {
        let mut parts: Vec<String> = pre.as_str().split('.').map(str::to_string).collect();
        match parts.iter().rposition(|part| part.parse::<u64>().is_ok()) {
            Some(index) => {
                let next = parts[index].parse::<u64>().ok()?.checked_add(1)?;
                parts[index] = next.to_string();
            }
            None => parts.push("0".to_string()),
        }
        parts
    };

    if let Some(preid) = preid {
        let same_channel = parts.first().is_some_and(|first| first == preid);
        let numbered = parts.get(1).is_some_and(|second| second.parse::<u64>().is_ok());
        if !(same_channel && numbered) {
            parts = vec![preid.to_string(), "0".to_string()];
        }
    }
    Prerelease::new(&parts.join(".")).ok()
}

impl fmt::Display for ReleaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Major => "major",
            Self::Minor => "minor",
            Self::Patch => "patch",
            Self::Premajor => "premajor",
            Self::Preminor => "preminor",
            Self::Prepatch => "prepatch",
            Self::Prerelease => "prerelease",
        };
        f.write_str(name)
    }
}

/// Sets `name` to `version` in its own manifest (when it is a workspace
/// package) and in every manifest that declares it.
///
/// A dist-tag is resolved first; workspace packages only accept `latest`.
///
/// # Errors
///
/// Returns [`Error::MissingPackage`] if no package declares or is `name`,
/// [`Error::TagOnLocalPackage`] for a rejected tag, and resolution or commit
/// failures unchanged.
pub async fn set(
    ctx: &ServiceContext,
    config: &Config,
    name: &str,
    version: &str,
) -> Result<VersionSet> {
    let registry = load_registry(ctx, config).await?;
    let graph = DependencyGraph::build(&registry)?;
    let consumers = graph.node_data(name).ok_or_else(|| Error::missing(name))?;

    let version = if is_tag(version) {
        resolve_version(name, version, &registry, ctx.dist_tags.as_ref()).await?
    } else {
        version.to_string()
    };

    let mut changes = ChangeSet::new(ManifestStore::new(ctx.fs.as_ref()));
    let own = registry.location_of(name);
    let declaring = consumers.keys().filter_map(|consumer| registry.location_of(consumer));
    for location in own.into_iter().chain(declaring) {
        changes.schedule(Change::update(location, name, &version));
    }

    let event = HookEvent::Version { name: name.to_string(), version: version.clone() };
    let locations = commit_and_notify(ctx, changes, &event).await?;
    tracing::info!(name, %version, manifests = locations.len(), "set version");

    Ok(VersionSet { name: name.to_string(), version, locations })
}

/// Moves `name` from its current consistent version by `release`.
///
/// # Errors
///
/// Returns [`Error::VersionDrift`] if the workspace disagrees on the current
/// version, [`Error::InvalidReleaseType`] if `release` is unknown or the
/// current version cannot be incremented, and [`set`] failures unchanged.
pub async fn bump(
    ctx: &ServiceContext,
    config: &Config,
    name: &str,
    release: &str,
    preid: Option<&str>,
) -> Result<VersionSet> {
    let invalid =
        || Error::InvalidReleaseType { name: name.to_string(), release: release.to_string() };
    let release_type = ReleaseType::parse(release).ok_or_else(invalid)?;

    let registry = load_registry(ctx, config).await?;
    let graph = DependencyGraph::build(&registry)?;
    let current = match version_of(name, &graph, &registry)? {
        VersionInfo::Consistent(version) => version,
        VersionInfo::Drifted(_) => {
            return Err(Error::VersionDrift { names: vec![name.to_string()] });
        }
    };

    let next = release_type.apply(&current, preid).ok_or_else(invalid)?;
    tracing::debug!(name, %current, %next, release = %release_type, "computed bump");
    set(ctx, config, name, &next).await
}

//! Workspace discovery: which directories hold the workspace's packages.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::config::{Config, DiscoveryMode};
use crate::context::ServiceContext;
use crate::error::{Error, Result};
use crate::manifest::{ManifestStore, Workspaces, MANIFEST_FILE};
use crate::ports::filesystem::FileSystem;
use crate::ports::shell::ShellCommand;

/// Lists every package location of the workspace rooted at `config.cwd`.
///
/// The root itself always comes first. Members mode expands the root
/// manifest's `workspaces` patterns; lerna mode asks `lerna ls`. Auto mode
/// picks members when the root manifest declares `workspaces`.
///
/// # Errors
///
/// Returns an error if the root manifest cannot be loaded (members and auto
/// modes), a pattern is invalid, or the lerna invocation fails.
pub async fn discover(ctx: &ServiceContext, config: &Config) -> Result<Vec<PathBuf>> {
    let root = config.cwd.as_path();
    let members = if config.discovery == DiscoveryMode::Lerna {
        lerna_members(ctx, root).await?
    } else {
        let manifest = ManifestStore::new(ctx.fs.as_ref()).load(root).await?;
        match (&manifest.workspaces, config.discovery) {
            (None, DiscoveryMode::Auto) => lerna_members(ctx, root).await?,
            (workspaces, _) => {
                let patterns = workspaces.as_ref().map_or(&[][..], Workspaces::patterns);
                expand_patterns(ctx.fs.as_ref(), root, patterns).await?
            }
        }
    };

    let mut locations = Vec::with_capacity(members.len() + 1);
    locations.push(root.to_path_buf());
    locations.extend(members.into_iter().filter(|location| location != root));
    tracing::debug!(mode = ?config.discovery, packages = locations.len(), "discovered workspace");
    Ok(locations)
}

/// Expands member patterns below `root`.
///
/// Patterns starting with `!` exclude what they match. The result is sorted
/// and holds only directories that contain a manifest.
///
/// # Errors
///
/// Returns [`Error::Discovery`] for malformed or recursive (`**`) patterns.
pub async fn expand_patterns(
    fs: &dyn FileSystem,
    root: &Path,
    patterns: &[String],
) -> Result<Vec<PathBuf>> {
    let mut found = BTreeSet::new();
    let mut excludes = Vec::new();

    for pattern in patterns {
        if let Some(negated) = pattern.strip_prefix('!') {
            excludes.push(compile(negated)?);
            continue;
        }
        for candidate in expand(fs, root, pattern).await? {
            let manifest = candidate.join(MANIFEST_FILE);
            if fs.exists(&manifest).await.map_err(|e| Error::io(&manifest, e))? {
                found.insert(candidate);
            }
        }
    }

    Ok(found
        .into_iter()
        .filter(|location| {
            let relative = location.strip_prefix(root).unwrap_or(location);
            !excludes.iter().any(|exclude| exclude.matches_path_with(relative, EXCLUDE_MATCH))
        })
        .collect())
}

/// Exclusions match path segment by segment; `*` never crosses a `/`.
const EXCLUDE_MATCH: glob::MatchOptions = glob::MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

fn compile(pattern: &str) -> Result<glob::Pattern> {
    glob::Pattern::new(pattern.trim_start_matches("./"))
        .map_err(|e| Error::Discovery(format!("invalid workspace pattern '{pattern}': {e}")))
}

fn is_wildcard(segment: &str) -> bool {
    segment.contains(['*', '?', '['])
}

/// Walks `pattern` one path segment at a time through the filesystem port.
async fn expand(fs: &dyn FileSystem, root: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let mut candidates = vec![root.to_path_buf()];

    for segment in pattern.split('/').filter(|s| !s.is_empty() && *s != ".") {
        if segment == "**" {
            return Err(Error::Discovery(format!(
                "recursive workspace pattern '{pattern}' is not supported"
            )));
        }
        if !is_wildcard(segment) {
            candidates.iter_mut().for_each(|dir| dir.push(segment));
            continue;
        }

        let matcher = compile(segment)?;
        let mut next = Vec::new();
        for dir in &candidates {
            // Files and missing directories simply match nothing.
            let Ok(entries) = fs.list_dir(dir).await else { continue };
            next.extend(
                entries.into_iter().filter(|name| matcher.matches(name)).map(|name| dir.join(name)),
            );
        }
        candidates = next;
    }
    Ok(candidates)
}

/// Parses `lerna ls -pla` output: one `location:name:version[:flag]` per line.
fn parse_lerna_output(root: &Path, stdout: &str) -> Vec<PathBuf> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| line.split(':').next())
        .map(|location| root.join(location))
        .collect()
}

async fn lerna_members(ctx: &ServiceContext, root: &Path) -> Result<Vec<PathBuf>> {
    let command = ShellCommand::new("lerna", root).args(["ls", "-pla"]);
    let output = ctx
        .shell
        .run(&command)
        .await
        .map_err(|e| Error::Discovery(format!("failed to run lerna: {e}")))?;
    if !output.success() {
        return Err(Error::Discovery(format!(
            "lerna ls exited with code {}: {}",
            output.exit_code,
            output.stderr.trim()
        )));
    }
    Ok(parse_lerna_output(root, &output.stdout))
}

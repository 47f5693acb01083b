//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Overrides;

/// Top-level CLI parser for `lockstep`.
#[derive(Debug, Parser)]
#[command(
    name = "lockstep",
    version,
    about = "Keep dependency versions consistent across a multi-package workspace"
)]
pub struct Cli {
    /// Workspace root; defaults to the current directory.
    #[arg(long, global = true, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Package registry used to resolve dist-tags.
    #[arg(long, global = true, value_name = "URL")]
    pub registry: Option<String>,

    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Configuration values given on the command line.
    #[must_use]
    pub fn overrides(&self) -> Overrides {
        Overrides { cwd: self.cwd.clone(), registry_url: self.registry.clone() }
    }
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Declare a dependency in one package.
    Add {
        /// Dependency name.
        name: String,
        /// Version or dist-tag (default: latest).
        version: Option<String>,
        /// Add to devDependencies instead of dependencies.
        #[arg(long)]
        dev: bool,
        /// Package that declares the dependency (default: the workspace root).
        #[arg(long, value_name = "PACKAGE")]
        parent: Option<String>,
    },
    /// Remove a dependency from one package.
    Remove {
        /// Dependency name.
        name: String,
        /// Package to remove it from (default: the workspace root).
        #[arg(long, value_name = "PACKAGE")]
        parent: Option<String>,
    },
    /// Set a package to a version in every manifest that uses it.
    Set {
        /// Package name.
        name: String,
        /// Version or dist-tag.
        version: String,
    },
    /// Bump a package by a release type in every manifest that uses it.
    Bump {
        /// Package name.
        name: String,
        /// major, minor, patch, premajor, preminor, prepatch, or prerelease.
        release: String,
        /// Prerelease identifier, as in 1.2.4-<PREID>.0.
        #[arg(long)]
        preid: Option<String>,
    },
    /// Print the version the workspace uses for a package.
    Get {
        /// Package name.
        name: String,
    },
    /// Report packages declared at more than one version.
    Check {
        /// Only check this package.
        name: Option<String>,
    },
}

/*
 * aurbump - Automated AUR package publisher for upstream GitHub releases.
 * Copyright (C) 2025  aurbump contributors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

//! Error types for the release-sync pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for aurbump operations
#[derive(Debug, Error)]
pub enum SyncError {
    /// Required environment variable absent
    #[error("Missing required environment variable '{name}'")]
    MissingEnv { name: String },

    /// Required configuration file absent
    #[error("Missing configuration file '{}'", path.display())]
    MissingFile { path: PathBuf },

    /// Required key absent from a key=value configuration file
    #[error("Missing key '{key}' in '{file}'")]
    MissingKey { file: String, key: String },

    /// An external call produced no usable result
    #[error("Empty result from {what}")]
    EmptyResult { what: String },

    /// Network errors during API calls or downloads
    #[error("Network error for {url}: {message}")]
    Network {
        url: String,
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// No release asset name ends with the configured stub
    #[error("No release asset matching stub '{stub}'")]
    NoAssetMatch { stub: String },

    /// Build produced zero or multiple package files
    #[error("Expected exactly one built package matching '{pattern}', found {count}")]
    AmbiguousArtifact { pattern: String, count: usize },

    /// PKGBUILD lint failure (gated)
    #[error("PKGBUILD lint failed: {reason}")]
    RecipeLintFailed { reason: String },

    /// Build failures during makepkg
    #[error("Build failed for '{package}': {reason}")]
    BuildFailed {
        package: String,
        reason: String,
        exit_code: Option<i32>,
    },

    /// Test installation of the built package failed
    #[error("Test install failed for '{package}': pacman exited with {exit_code:?}")]
    InstallFailed {
        package: String,
        exit_code: Option<i32>,
    },

    /// Git operation failure (clone, stage, commit)
    #[error("Git {operation} failed in '{repo}': {reason}")]
    GitFailed {
        operation: String,
        repo: String,
        reason: String,
    },

    /// Push failure during publish, reported separately so the
    /// `aurUpdated=false` output is recorded before aborting
    #[error("Push to '{remote}' failed: {reason}")]
    PushFailed { remote: String, reason: String },

    /// SSH transport provisioning failure
    #[error("SSH transport setup failed: {reason}")]
    TransportFailed { reason: String },

    /// A required external tool is not installed
    #[error("Required tool '{tool}' not found in PATH")]
    ToolMissing { tool: String },

    /// File system errors
    #[error("File system error for '{path}': {message}")]
    FileSystem {
        path: String,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Generic/wrapped error
    #[error("{0}")]
    Other(String),
}

impl SyncError {
    /// Create a network error
    pub fn network(url: impl Into<String>, message: impl Into<String>) -> Self {
        SyncError::Network {
            url: url.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create a filesystem error
    pub fn filesystem<E: Into<std::io::Error>>(
        path: impl Into<String>,
        message: impl Into<String>,
        source: E,
    ) -> Self {
        SyncError::FileSystem {
            path: path.into(),
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Create an empty-result error
    pub fn empty(what: impl Into<String>) -> Self {
        SyncError::EmptyResult { what: what.into() }
    }
}

/// Result type alias for aurbump operations
pub type SyncResult<T> = std::result::Result<T, SyncError>;

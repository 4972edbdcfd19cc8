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

//! Configuration loading with fail-fast validation.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{SyncError, SyncResult};

/// Version marker file name, relative to the working directory
pub const VERSION_FILE: &str = "VERSION";
/// Static configuration file name, relative to the working directory
pub const STATIC_CONFIG_FILE: &str = "aur.env";
/// Key holding the last-synced version in the version marker file
pub const CURRENT_VERSION_KEY: &str = "CURRENT_VERSION";

/// Static identifiers for the monitored upstream and target AUR package
#[derive(Debug, Clone)]
pub struct StaticConfig {
    /// Upstream repository in `org/repo` form
    pub upstream_repo: String,
    /// AUR repository remote URL (ssh://aur@aur.archlinux.org/...)
    pub aur_repo: String,
    /// AUR package name
    pub pkg_name: String,
    /// Suffix identifying the release asset to package
    pub asset_stub: String,
}

/// Full run configuration, built once at startup and immutable afterwards
#[derive(Debug, Clone)]
pub struct Config {
    /// Base directory for all relative file operations
    pub workdir: PathBuf,
    /// Extra packages to pre-install before building
    pub extra_packages: Vec<String>,
    /// Whether the Publisher stage runs
    pub publish: bool,
    /// Deploy key material for the AUR SSH transport
    pub ssh_private_key: String,
    /// Committer email
    pub git_email: String,
    /// Committer name
    pub git_username: String,
    /// Optional bearer token for the GitHub API
    pub github_token: Option<String>,
    /// Optional path CI outputs are appended to
    pub output_file: Option<PathBuf>,
    /// Non-root identity that runs makepkg
    pub build_user: String,

    /// Static upstream/AUR identifiers
    pub static_config: StaticConfig,
    /// Last version synced to the AUR
    pub current_version: String,
}

impl Config {
    /// Load configuration from the environment and the two key=value files
    /// under `workdir`. Fails on the first missing item, before any network
    /// activity.
    pub fn load(workdir: PathBuf, publish_override: Option<bool>) -> SyncResult<Self> {
        let ssh_private_key = require_env("AUR_SSH_PRIVATE_KEY")?;
        let git_email = require_env("GIT_EMAIL")?;
        let git_username = require_env("GIT_USERNAME")?;
        let github_token = optional_env("GITHUB_TOKEN");
        let output_file = optional_env("GITHUB_OUTPUT").map(PathBuf::from);
        let build_user = optional_env("BUILD_USER").unwrap_or_else(|| "builder".to_string());

        let publish = match publish_override {
            Some(p) => p,
            None => optional_env("INPUT_PUBLISH").as_deref() == Some("true"),
        };

        let extra_packages = optional_env("INPUT_PACKAGES")
            .map(|s| s.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();

        let static_config = StaticConfig::load(&workdir.join(STATIC_CONFIG_FILE))?;
        let current_version = load_version_marker(&workdir.join(VERSION_FILE))?;

        Ok(Self {
            workdir,
            extra_packages,
            publish,
            ssh_private_key,
            git_email,
            git_username,
            github_token,
            output_file,
            build_user,
            static_config,
            current_version,
        })
    }

    /// Resolve the working directory: flag override, then `GITHUB_WORKSPACE`,
    /// then the process current directory.
    pub fn resolve_workdir(flag: Option<PathBuf>) -> PathBuf {
        flag.or_else(|| optional_env("GITHUB_WORKSPACE").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

impl StaticConfig {
    /// Load the static configuration file. Keys are matched by substring
    /// (`UPSTREAM`, `AUR`, `PKG`, `STUB`), so both `UPSTREAM_REPO=` and
    /// `UPSTREAM=` satisfy the contract. When several keys carry the same
    /// stub, the first non-empty assignment in file order wins.
    pub fn load(path: &Path) -> SyncResult<Self> {
        let vars = parse_key_values(path)?;
        let file = path.display().to_string();

        let lookup = |stub: &str| -> SyncResult<String> {
            vars.iter()
                .find(|(k, v)| k.contains(stub) && !v.is_empty())
                .map(|(_, v)| v.clone())
                .ok_or_else(|| SyncError::MissingKey {
                    file: file.clone(),
                    key: format!("*{stub}*"),
                })
        };

        Ok(Self {
            upstream_repo: lookup("UPSTREAM")?,
            aur_repo: lookup("AUR")?,
            pkg_name: lookup("PKG")?,
            asset_stub: lookup("STUB")?,
        })
    }
}

/// Read `CURRENT_VERSION=` from the version marker file
pub fn load_version_marker(path: &Path) -> SyncResult<String> {
    let vars = parse_key_values(path)?;
    vars.iter()
        .find(|(k, v)| k == CURRENT_VERSION_KEY && !v.is_empty())
        .map(|(_, v)| v.clone())
        .ok_or_else(|| SyncError::MissingKey {
            file: path.display().to_string(),
            key: CURRENT_VERSION_KEY.to_string(),
        })
}

/// Rewrite the version marker file with a new version string
pub fn write_version_marker(path: &Path, version: &str) -> SyncResult<()> {
    fs::write(path, format!("{CURRENT_VERSION_KEY}={version}\n"))
        .map_err(|e| SyncError::filesystem(path.display().to_string(), "write version marker", e))
}

/// Parse a key=value file, one assignment per line. Blank lines and
/// `#` comments are skipped; values keep everything after the first `=`.
/// File order is preserved so lookups resolve deterministically.
fn parse_key_values(path: &Path) -> SyncResult<Vec<(String, String)>> {
    if !path.exists() {
        return Err(SyncError::MissingFile {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path)
        .map_err(|e| SyncError::filesystem(path.display().to_string(), "read config file", e))?;

    let mut vars = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            vars.push((
                key.trim().to_string(),
                value.trim().trim_matches('"').trim_matches('\'').to_string(),
            ));
        }
    }

    Ok(vars)
}

fn require_env(name: &str) -> SyncResult<String> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| SyncError::MissingEnv {
            name: name.to_string(),
        })
}

fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

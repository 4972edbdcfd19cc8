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

//! PKGBUILD field reading and managed-field rewriting.

use anyhow::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

use crate::error::{SyncError, SyncResult};
use crate::version;

/// Parsed PKGBUILD metadata, limited to the fields this pipeline manages
/// or reports
#[derive(Debug, Clone, Default)]
pub struct Pkgbuild {
    pub pkgname: Vec<String>,
    pub pkgver: String,
    pub pkgrel: String,
    pub sha256sums: Vec<String>,
}

/// Parse a PKGBUILD file
pub fn parse_pkgbuild(path: &Path) -> Result<Pkgbuild> {
    let content = fs::read_to_string(path)?;
    parse_pkgbuild_content(&content)
}

/// Parse PKGBUILD content string
///
/// Simplified field extraction, not a bash interpreter: assignments are
/// expected at the start of a line, which holds for AUR recipes this
/// pipeline manages.
pub fn parse_pkgbuild_content(content: &str) -> Result<Pkgbuild> {
    let mut pkgbuild = Pkgbuild::default();

    if let Some(cap) = Regex::new(r"(?m)^pkgver=([^\n]+)")?.captures(content) {
        pkgbuild.pkgver = unquote(cap.get(1).unwrap().as_str());
    }
    if let Some(cap) = Regex::new(r"(?m)^pkgrel=([^\n]+)")?.captures(content) {
        pkgbuild.pkgrel = unquote(cap.get(1).unwrap().as_str());
    }

    pkgbuild.pkgname = parse_array(content, "pkgname");
    pkgbuild.sha256sums = parse_array(content, "sha256sums");

    Ok(pkgbuild)
}

/// Rewrite the three managed fields in place: `pkgver` becomes the latest
/// tag with its prefix stripped, `sha256sums` becomes the computed digest,
/// and `pkgrel` resets to 1. Every other line is preserved byte-identical.
pub fn update_recipe(path: &Path, latest_tag: &str, sha256: &str) -> SyncResult<()> {
    let content = fs::read_to_string(path)
        .map_err(|e| SyncError::filesystem(path.display().to_string(), "read PKGBUILD", e))?;

    let updated = update_recipe_content(&content, latest_tag, sha256);

    fs::write(path, updated)
        .map_err(|e| SyncError::filesystem(path.display().to_string(), "write PKGBUILD", e))
}

/// Pure rewrite used by [`update_recipe`]; only lines starting with a
/// managed field name change.
pub fn update_recipe_content(content: &str, latest_tag: &str, sha256: &str) -> String {
    let new_version = version::normalized(latest_tag);
    let ends_with_newline = content.ends_with('\n');

    let mut lines: Vec<String> = Vec::new();
    for line in content.lines() {
        if line.starts_with("pkgver=") {
            lines.push(format!("pkgver={new_version}"));
        } else if line.starts_with("pkgrel=") {
            lines.push("pkgrel=1".to_string());
        } else if line.starts_with("sha256sums=") {
            lines.push(format!("sha256sums=('{sha256}')"));
        } else {
            lines.push(line.to_string());
        }
    }

    let mut updated = lines.join("\n");
    if ends_with_newline {
        updated.push('\n');
    }
    updated
}

fn unquote(value: &str) -> String {
    value.trim().trim_matches('"').trim_matches('\'').to_string()
}

/// Parse a bash array from PKGBUILD content
fn parse_array(content: &str, field: &str) -> Vec<String> {
    let pattern = format!(r"(?m)^{}=\(([^)]*)\)", field);
    if let Ok(re) = Regex::new(&pattern) {
        if let Some(cap) = re.captures(content) {
            return cap
                .get(1)
                .unwrap()
                .as_str()
                .split_whitespace()
                .map(unquote)
                .filter(|s| !s.is_empty())
                .collect();
        }
    }

    // Single value fallback: field=value
    let pattern = format!(r"(?m)^{}=([^\n(]+)", field);
    if let Ok(re) = Regex::new(&pattern) {
        if let Some(cap) = re.captures(content) {
            let value = unquote(cap.get(1).unwrap().as_str());
            if !value.is_empty() {
                return vec![value];
            }
        }
    }

    Vec::new()
}

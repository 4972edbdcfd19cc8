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

//! Run-scoped key/value outputs for the calling CI orchestrator.

use console::style;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use crate::error::{SyncError, SyncResult};

/// Writes `key=value` output pairs. When an output file is configured
/// (GITHUB_OUTPUT), pairs are appended there; they are always mirrored to
/// the terminal.
pub struct ActionOutputs {
    output_file: Option<PathBuf>,
}

impl ActionOutputs {
    pub fn new(output_file: Option<PathBuf>) -> Self {
        Self { output_file }
    }

    /// Record one output pair
    pub fn set(&self, key: &str, value: &str) -> SyncResult<()> {
        println!(
            "   {} output {}={}",
            style("->").dim(),
            style(key).cyan(),
            value
        );

        if let Some(path) = &self.output_file {
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| {
                    SyncError::filesystem(path.display().to_string(), "open output file", e)
                })?;
            writeln!(file, "{key}={value}").map_err(|e| {
                SyncError::filesystem(path.display().to_string(), "append output", e)
            })?;
        }
        Ok(())
    }
}

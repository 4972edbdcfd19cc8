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

//! Package building and validation with proper privilege handling.

use console::style;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{info, warn};

use crate::error::{SyncError, SyncResult};

/// Tools the builder shells out to; checked up front so a misconfigured
/// container fails before any mutation.
const REQUIRED_TOOLS: &[&str] = &["pacman", "makepkg", "namcap", "sudo", "chown"];

/// Runs makepkg/namcap/pacman against an AUR checkout.
///
/// makepkg always runs under a restricted non-root identity: recipes execute
/// third-party shell code.
pub struct PackageBuilder {
    /// Non-root user that runs makepkg
    build_user: String,
}

impl PackageBuilder {
    pub fn new(build_user: impl Into<String>) -> Self {
        Self {
            build_user: build_user.into(),
        }
    }

    /// Verify required external tools exist in PATH
    pub fn preflight(&self) -> SyncResult<()> {
        for tool in REQUIRED_TOOLS {
            which::which(tool).map_err(|_| SyncError::ToolMissing {
                tool: tool.to_string(),
            })?;
        }
        Ok(())
    }

    /// Pre-install extra packages needed by the build
    pub fn install_prerequisites(&self, packages: &[String]) -> SyncResult<()> {
        if packages.is_empty() {
            return Ok(());
        }

        println!(
            "   {} installing {} prerequisite package(s)...",
            style("->").blue(),
            packages.len()
        );

        let status = Command::new("pacman")
            .args(["-S", "--noconfirm", "--needed"])
            .args(packages)
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| SyncError::Other(format!("failed to run pacman -S: {e}")))?;

        if !status.success() {
            return Err(SyncError::Other(format!(
                "pacman -S exited with {:?} installing prerequisites",
                status.code()
            )));
        }
        Ok(())
    }

    /// Lint the PKGBUILD with namcap. Gated: a lint failure aborts the run.
    pub fn lint_recipe(&self, checkout: &Path) -> SyncResult<()> {
        let pkgbuild = checkout.join("PKGBUILD");
        let output = Command::new("namcap")
            .arg(&pkgbuild)
            .output()
            .map_err(|e| SyncError::Other(format!("failed to run namcap: {e}")))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !output.status.success() || stdout.contains(" E: ") {
            return Err(SyncError::RecipeLintFailed {
                reason: format!("{}{}", stdout, String::from_utf8_lossy(&output.stderr))
                    .trim()
                    .to_string(),
            });
        }
        if !stdout.trim().is_empty() {
            info!("namcap notes for PKGBUILD:\n{}", stdout.trim());
        }
        Ok(())
    }

    /// Build the package with makepkg under the restricted identity and
    /// return the single built artifact.
    pub fn build(&self, checkout: &Path, package_name: &str) -> SyncResult<PathBuf> {
        println!("   {} running makepkg...", style("->").blue());

        let is_root = unsafe { libc::getuid() } == 0;

        let status = if is_root {
            // The checkout must belong to the build user before makepkg runs
            let chown = Command::new("chown")
                .args([
                    "-R",
                    &format!("{}:{}", self.build_user, self.build_user),
                    &checkout.display().to_string(),
                ])
                .status()
                .map_err(|e| SyncError::Other(format!("failed to run chown: {e}")))?;
            if !chown.success() {
                return Err(SyncError::Other(format!(
                    "chown of build directory to '{}' failed",
                    self.build_user
                )));
            }

            Command::new("sudo")
                .args(["-u", &self.build_user, "makepkg", "-f", "--noconfirm"])
                .current_dir(checkout)
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit())
                .status()
                .map_err(|e| SyncError::Other(format!("failed to run makepkg: {e}")))?
        } else {
            Command::new("makepkg")
                .args(["-f", "--noconfirm"])
                .current_dir(checkout)
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit())
                .status()
                .map_err(|e| SyncError::Other(format!("failed to run makepkg: {e}")))?
        };

        if !status.success() {
            return Err(SyncError::BuildFailed {
                package: package_name.to_string(),
                reason: format!("makepkg exited with code {:?}", status.code()),
                exit_code: status.code(),
            });
        }

        self.find_built_package(checkout, package_name)
    }

    /// Lint the built artifact with namcap. Advisory: a failure is logged
    /// but does not gate the run, unlike the recipe lint.
    pub fn lint_package(&self, artifact: &Path) {
        let output = Command::new("namcap").arg(artifact).output();
        match output {
            Ok(output) => {
                let stdout = String::from_utf8_lossy(&output.stdout);
                if !output.status.success() || stdout.contains(" E: ") {
                    warn!(
                        "namcap reported issues for {}:\n{}",
                        artifact.display(),
                        stdout.trim()
                    );
                } else if !stdout.trim().is_empty() {
                    info!("namcap notes for artifact:\n{}", stdout.trim());
                }
            }
            Err(e) => warn!("could not lint built package: {e}"),
        }
    }

    /// Test-install the artifact with pacman in unattended mode
    pub fn install(&self, artifact: &Path, package_name: &str) -> SyncResult<()> {
        println!("   {} test-installing with pacman...", style("->").blue());

        let status = Command::new("pacman")
            .args(["-U", "--noconfirm"])
            .arg(artifact)
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| SyncError::Other(format!("failed to run pacman -U: {e}")))?;

        if !status.success() {
            return Err(SyncError::InstallFailed {
                package: package_name.to_string(),
                exit_code: status.code(),
            });
        }
        Ok(())
    }

    /// Regenerate .SRCINFO from the recipe, under the restricted identity
    pub fn generate_srcinfo(&self, checkout: &Path) -> SyncResult<()> {
        let is_root = unsafe { libc::getuid() } == 0;

        let output = if is_root {
            Command::new("sudo")
                .args(["-u", &self.build_user, "makepkg", "--printsrcinfo"])
                .current_dir(checkout)
                .output()
        } else {
            Command::new("makepkg")
                .arg("--printsrcinfo")
                .current_dir(checkout)
                .output()
        }
        .map_err(|e| SyncError::Other(format!("failed to run makepkg --printsrcinfo: {e}")))?;

        if !output.status.success() {
            return Err(SyncError::Other(format!(
                "makepkg --printsrcinfo exited with {:?}: {}",
                output.status.code(),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let srcinfo = checkout.join(".SRCINFO");
        fs::write(&srcinfo, &output.stdout)
            .map_err(|e| SyncError::filesystem(srcinfo.display().to_string(), "write .SRCINFO", e))
    }

    /// Locate the single built package file. Zero or multiple matches is a
    /// fatal ambiguous-or-missing-artifact error.
    fn find_built_package(&self, checkout: &Path, package_name: &str) -> SyncResult<PathBuf> {
        let pattern = format!("{package_name}-*.pkg.tar*");
        let mut matches = Vec::new();

        let entries = fs::read_dir(checkout).map_err(|e| {
            SyncError::filesystem(checkout.display().to_string(), "read build directory", e)
        })?;

        for entry in entries {
            let entry = entry.map_err(|e| {
                SyncError::filesystem(checkout.display().to_string(), "read directory entry", e)
            })?;
            let path = entry.path();
            if path.is_file() && is_package_file(&path, package_name) {
                matches.push(path);
            }
        }

        if matches.len() != 1 {
            return Err(SyncError::AmbiguousArtifact {
                pattern,
                count: matches.len(),
            });
        }

        Ok(matches.remove(0))
    }
}

/// True when `path` looks like a built package for `package_name`
fn is_package_file(path: &Path, package_name: &str) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.starts_with(&format!("{package_name}-"))
        && (name.ends_with(".pkg.tar")
            || name.ends_with(".pkg.tar.zst")
            || name.ends_with(".pkg.tar.xz")
            || name.ends_with(".pkg.tar.gz"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_is_package_file() {
        assert!(is_package_file(
            Path::new("widget-1.1.0-1-x86_64.pkg.tar.zst"),
            "widget"
        ));
        assert!(is_package_file(
            Path::new("widget-1.1.0-1-x86_64.pkg.tar"),
            "widget"
        ));
        assert!(!is_package_file(
            Path::new("widget-1.1.0-linux.tar.zst"),
            "widget"
        ));
        assert!(!is_package_file(
            Path::new("other-1.1.0-1-x86_64.pkg.tar.zst"),
            "widget"
        ));
    }

    #[test]
    fn test_find_built_package_exactly_one() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("widget-1.1.0-1-x86_64.pkg.tar.zst"), b"pkg").unwrap();
        fs::write(dir.path().join("PKGBUILD"), b"pkgname=widget").unwrap();

        let builder = PackageBuilder::new("builder");
        let found = builder.find_built_package(dir.path(), "widget").unwrap();
        assert!(found.ends_with("widget-1.1.0-1-x86_64.pkg.tar.zst"));
    }

    #[test]
    fn test_find_built_package_none_is_error() {
        let dir = TempDir::new().unwrap();
        let builder = PackageBuilder::new("builder");
        let err = builder.find_built_package(dir.path(), "widget").unwrap_err();
        assert!(matches!(err, SyncError::AmbiguousArtifact { count: 0, .. }));
    }

    #[test]
    fn test_find_built_package_multiple_is_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("widget-1.0.0-1-x86_64.pkg.tar.zst"), b"a").unwrap();
        fs::write(dir.path().join("widget-1.1.0-1-x86_64.pkg.tar.zst"), b"b").unwrap();

        let builder = PackageBuilder::new("builder");
        let err = builder.find_built_package(dir.path(), "widget").unwrap_err();
        assert!(matches!(err, SyncError::AmbiguousArtifact { count: 2, .. }));
    }
}

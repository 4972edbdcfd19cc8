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

//! The release-sync pipeline: one run, one decision.
//!
//! Control flow is strictly sequential with two branch points: the version
//! gate (successful early exit) and the publish stage (skipped when
//! disabled). The first error aborts the run; there are no retries and no
//! rollback.

use async_trait::async_trait;
use console::style;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;

use crate::build::PackageBuilder;
use crate::config::{self, Config};
use crate::download;
use crate::error::{SyncError, SyncResult};
use crate::git::{GitRepo, SshTransport};
use crate::github::{Release, ReleaseClient};
use crate::outputs::ActionOutputs;
use crate::pkgbuild;
use crate::version;

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Latest tag equals the synced version; nothing was done
    UpToDate,
    /// Package built and validated, publishing disabled
    Built,
    /// Package built, validated, and pushed to the AUR and source repo
    Published,
}

/// Upstream release queries and asset fetching
#[async_trait]
pub trait ReleaseSource {
    async fn latest_release(&self, repo: &str) -> SyncResult<Release>;
    /// Download `url` and return the lowercase hex SHA-256 of its bytes
    async fn fetch_checksum(&self, url: &str) -> SyncResult<String>;
}

/// Package build/lint/install tooling
pub trait Toolchain {
    fn preflight(&self) -> SyncResult<()>;
    fn install_prerequisites(&self, packages: &[String]) -> SyncResult<()>;
    fn lint_recipe(&self, checkout: &Path) -> SyncResult<()>;
    fn build(&self, checkout: &Path, package: &str) -> SyncResult<PathBuf>;
    fn lint_package(&self, artifact: &Path);
    fn install(&self, artifact: &Path, package: &str) -> SyncResult<()>;
    fn generate_srcinfo(&self, checkout: &Path) -> SyncResult<()>;
}

/// Narrow VCS surface the pipeline needs
pub trait VersionControl {
    fn clone_aur(&self, url: &str, dest: &Path) -> SyncResult<()>;
    fn set_identity(&self, repo: &Path) -> SyncResult<()>;
    fn stage(&self, repo: &Path, paths: &[&str]) -> SyncResult<()>;
    fn commit(&self, repo: &Path, message: &str) -> SyncResult<()>;
    /// Push over the dedicated AUR SSH transport
    fn push_aur(&self, repo: &Path) -> SyncResult<()>;
    /// Push using the ambient transport (source repository)
    fn push_ambient(&self, repo: &Path) -> SyncResult<()>;
    /// Remove the AUR transport's key material once AUR operations finish
    fn close_aur_transport(&self) -> SyncResult<()>;
}

/// Production release source backed by the GitHub API
pub struct GithubSource {
    client: ReleaseClient,
}

impl GithubSource {
    pub fn new(token: Option<String>) -> Self {
        Self {
            client: ReleaseClient::new(token),
        }
    }
}

#[async_trait]
impl ReleaseSource for GithubSource {
    async fn latest_release(&self, repo: &str) -> SyncResult<Release> {
        self.client.latest_release(repo).await
    }

    async fn fetch_checksum(&self, url: &str) -> SyncResult<String> {
        // The temp file is dropped here; only the digest feeds the recipe.
        // makepkg re-downloads the source itself during the build.
        let asset = download::fetch(url).await?;
        info!(
            "downloaded {} bytes to {}, sha256 {}",
            asset.size,
            asset.file.path().display(),
            asset.sha256
        );
        Ok(asset.sha256)
    }
}

impl Toolchain for PackageBuilder {
    fn preflight(&self) -> SyncResult<()> {
        PackageBuilder::preflight(self)
    }
    fn install_prerequisites(&self, packages: &[String]) -> SyncResult<()> {
        PackageBuilder::install_prerequisites(self, packages)
    }
    fn lint_recipe(&self, checkout: &Path) -> SyncResult<()> {
        PackageBuilder::lint_recipe(self, checkout)
    }
    fn build(&self, checkout: &Path, package: &str) -> SyncResult<PathBuf> {
        PackageBuilder::build(self, checkout, package)
    }
    fn lint_package(&self, artifact: &Path) {
        PackageBuilder::lint_package(self, artifact)
    }
    fn install(&self, artifact: &Path, package: &str) -> SyncResult<()> {
        PackageBuilder::install(self, artifact, package)
    }
    fn generate_srcinfo(&self, checkout: &Path) -> SyncResult<()> {
        PackageBuilder::generate_srcinfo(self, checkout)
    }
}

/// Production VCS collaborator: git CLI plus the provisioned AUR transport
pub struct GitCli {
    /// Taken out and destroyed by [`VersionControl::close_aur_transport`]
    transport: Mutex<Option<SshTransport>>,
    name: String,
    email: String,
}

impl GitCli {
    /// Provision the AUR transport (deploy key + known hosts) up front
    pub fn provision(config: &Config) -> SyncResult<Self> {
        let transport = SshTransport::provision(&config.ssh_private_key)?;
        transport.seed_known_hosts()?;
        Ok(Self {
            transport: Mutex::new(Some(transport)),
            name: config.git_username.clone(),
            email: config.git_email.clone(),
        })
    }

    fn aur_ssh_command(&self) -> SyncResult<String> {
        self.transport
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(SshTransport::ssh_command)
            .ok_or_else(|| SyncError::TransportFailed {
                reason: "AUR transport already closed".to_string(),
            })
    }
}

impl VersionControl for GitCli {
    fn clone_aur(&self, url: &str, dest: &Path) -> SyncResult<()> {
        let ssh = self.aur_ssh_command()?;
        GitRepo::clone(url, dest, Some(&ssh)).map(|_| ())
    }
    fn set_identity(&self, repo: &Path) -> SyncResult<()> {
        GitRepo::open(repo).set_identity(&self.name, &self.email)
    }
    fn stage(&self, repo: &Path, paths: &[&str]) -> SyncResult<()> {
        GitRepo::open(repo).add(paths)
    }
    fn commit(&self, repo: &Path, message: &str) -> SyncResult<()> {
        GitRepo::open(repo).commit(message)
    }
    fn push_aur(&self, repo: &Path) -> SyncResult<()> {
        let ssh = self.aur_ssh_command()?;
        GitRepo::open(repo).push(Some(&ssh))
    }
    fn push_ambient(&self, repo: &Path) -> SyncResult<()> {
        GitRepo::open(repo).push(None)
    }
    fn close_aur_transport(&self) -> SyncResult<()> {
        let taken = self
            .transport
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        match taken {
            Some(transport) => transport.cleanup(),
            None => Ok(()),
        }
    }
}

/// The release-sync pipeline
pub struct Pipeline<'a, S, T, V> {
    config: &'a Config,
    source: S,
    toolchain: T,
    vcs: V,
    outputs: ActionOutputs,
}

impl<'a, S, T, V> Pipeline<'a, S, T, V>
where
    S: ReleaseSource,
    T: Toolchain,
    V: VersionControl,
{
    pub fn new(config: &'a Config, source: S, toolchain: T, vcs: V) -> Self {
        let outputs = ActionOutputs::new(config.output_file.clone());
        Self {
            config,
            source,
            toolchain,
            vcs,
            outputs,
        }
    }

    /// Execute one run end to end
    pub async fn run(&self, aur_checkout: &Path) -> SyncResult<RunOutcome> {
        let cfg = self.config;
        let pkg = &cfg.static_config.pkg_name;

        self.outputs.set("aurPackageName", pkg)?;
        self.outputs.set("currentVersion", &cfg.current_version)?;

        println!(
            "{} checking {} for a new release...",
            style("::").cyan().bold(),
            style(&cfg.static_config.upstream_repo).yellow()
        );

        let release = self
            .source
            .latest_release(&cfg.static_config.upstream_repo)
            .await?;
        self.outputs.set("latestVersion", &release.tag_name)?;

        if version::is_same_release(&cfg.current_version, &release.tag_name) {
            info!(
                "no update available: {} is current ({})",
                pkg, cfg.current_version
            );
            println!(
                "{} {} is up to date ({})",
                style("::").green().bold(),
                style(pkg).white().bold(),
                cfg.current_version
            );
            self.outputs.set("aurUpdated", "false")?;
            return Ok(RunOutcome::UpToDate);
        }

        println!(
            "{} new release {} (current {})",
            style("::").cyan().bold(),
            style(&release.tag_name).green().bold(),
            style(&cfg.current_version).dim()
        );

        self.toolchain.preflight()?;
        self.toolchain.install_prerequisites(&cfg.extra_packages)?;

        let asset = release.resolve_asset(&cfg.static_config.asset_stub)?;
        println!(
            "   {} resolved asset {}",
            style("->").blue(),
            style(&asset.name).cyan()
        );

        let sha256 = self
            .source
            .fetch_checksum(&asset.browser_download_url)
            .await?;
        if sha256.is_empty() {
            return Err(SyncError::empty(format!("checksum of {}", asset.name)));
        }

        println!("   {} cloning AUR repository...", style("->").blue());
        self.vcs
            .clone_aur(&cfg.static_config.aur_repo, aur_checkout)?;

        let recipe_path = aur_checkout.join("PKGBUILD");
        pkgbuild::update_recipe(&recipe_path, &release.tag_name, &sha256)?;

        // Re-read the recipe and confirm the managed fields took
        let recipe = pkgbuild::parse_pkgbuild(&recipe_path)
            .map_err(|e| SyncError::Other(format!("could not re-read recipe: {e}")))?;
        let new_version = version::normalized(&release.tag_name);
        if recipe.pkgver != new_version || recipe.sha256sums != [sha256.clone()] {
            return Err(SyncError::Other(format!(
                "recipe update verification failed: pkgver={} sha256sums={:?}",
                recipe.pkgver, recipe.sha256sums
            )));
        }
        println!(
            "   {} recipe {} updated to {}-{}",
            style("->").green(),
            style(recipe.pkgname.first().map(String::as_str).unwrap_or(pkg)).cyan(),
            recipe.pkgver,
            recipe.pkgrel
        );

        self.toolchain.lint_recipe(aur_checkout)?;
        let artifact = self.toolchain.build(aur_checkout, pkg)?;
        self.toolchain.lint_package(&artifact);
        self.toolchain.install(&artifact, pkg)?;

        if !cfg.publish {
            self.vcs.close_aur_transport()?;
            println!(
                "{} publishing disabled, AUR not updated",
                style("::").yellow().bold()
            );
            self.outputs.set("aurUpdated", "false")?;
            return Ok(RunOutcome::Built);
        }

        self.publish(aur_checkout, &release.tag_name)?;
        Ok(RunOutcome::Published)
    }

    /// Publish stage: push the recipe to the AUR, then record the new
    /// version in the source repository.
    fn publish(&self, aur_checkout: &Path, latest_tag: &str) -> SyncResult<()> {
        let cfg = self.config;
        let new_version = version::normalized(latest_tag);

        println!("   {} regenerating .SRCINFO...", style("->").blue());
        self.toolchain.generate_srcinfo(aur_checkout)?;

        self.vcs.set_identity(aur_checkout)?;
        self.vcs.stage(aur_checkout, &["PKGBUILD", ".SRCINFO"])?;
        self.vcs
            .commit(aur_checkout, &format!("Update to {new_version}"))?;

        println!("   {} pushing to the AUR...", style("->").blue());
        if let Err(e) = self.vcs.push_aur(aur_checkout) {
            self.outputs.set("aurUpdated", "false")?;
            return Err(e);
        }
        self.outputs.set("aurUpdated", "true")?;
        // The AUR side is done; drop the deploy key before touching the
        // source repository.
        self.vcs.close_aur_transport()?;
        println!(
            "{} AUR package {} updated to {}",
            style("::").green().bold(),
            style(&cfg.static_config.pkg_name).white().bold(),
            style(new_version).green()
        );

        // Record the new version back in the source repository. A failure
        // past this point leaves the AUR updated and the marker stale; the
        // next run re-detects the delta and pushes an identical recipe.
        let workdir = &cfg.workdir;
        config::write_version_marker(&workdir.join(config::VERSION_FILE), latest_tag)?;

        let recipe_copy = workdir.join("PKGBUILD");
        fs::copy(aur_checkout.join("PKGBUILD"), &recipe_copy).map_err(|e| {
            SyncError::filesystem(
                recipe_copy.display().to_string(),
                "copy recipe into source repo",
                e,
            )
        })?;

        self.vcs.set_identity(workdir)?;
        self.vcs.stage(workdir, &[config::VERSION_FILE, "PKGBUILD"])?;
        self.vcs.commit(
            workdir,
            &format!(
                "chore: bump {} to {}",
                cfg.static_config.pkg_name, latest_tag
            ),
        )?;
        self.vcs.push_ambient(workdir)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StaticConfig;
    use crate::github::ReleaseAsset;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    type CallLog = Arc<Mutex<Vec<String>>>;

    fn log(calls: &CallLog, entry: impl Into<String>) {
        calls.lock().unwrap().push(entry.into());
    }

    struct FakeSource {
        release: Release,
        calls: CallLog,
    }

    #[async_trait]
    impl ReleaseSource for FakeSource {
        async fn latest_release(&self, _repo: &str) -> SyncResult<Release> {
            log(&self.calls, "latest_release");
            Ok(self.release.clone())
        }
        async fn fetch_checksum(&self, url: &str) -> SyncResult<String> {
            log(&self.calls, format!("fetch_checksum {url}"));
            Ok("ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad".to_string())
        }
    }

    struct FakeToolchain {
        calls: CallLog,
    }

    impl Toolchain for FakeToolchain {
        fn preflight(&self) -> SyncResult<()> {
            log(&self.calls, "preflight");
            Ok(())
        }
        fn install_prerequisites(&self, packages: &[String]) -> SyncResult<()> {
            log(&self.calls, format!("install_prerequisites {}", packages.len()));
            Ok(())
        }
        fn lint_recipe(&self, _checkout: &Path) -> SyncResult<()> {
            log(&self.calls, "lint_recipe");
            Ok(())
        }
        fn build(&self, checkout: &Path, package: &str) -> SyncResult<PathBuf> {
            log(&self.calls, "build");
            let artifact = checkout.join(format!("{package}-1.1.0-1-x86_64.pkg.tar.zst"));
            fs::write(&artifact, b"pkg").unwrap();
            Ok(artifact)
        }
        fn lint_package(&self, _artifact: &Path) {
            log(&self.calls, "lint_package");
        }
        fn install(&self, _artifact: &Path, _package: &str) -> SyncResult<()> {
            log(&self.calls, "install");
            Ok(())
        }
        fn generate_srcinfo(&self, checkout: &Path) -> SyncResult<()> {
            log(&self.calls, "generate_srcinfo");
            fs::write(checkout.join(".SRCINFO"), b"pkgbase = widget\n").unwrap();
            Ok(())
        }
    }

    struct FakeVcs {
        calls: CallLog,
        fail_aur_push: bool,
    }

    impl VersionControl for FakeVcs {
        fn clone_aur(&self, _url: &str, dest: &Path) -> SyncResult<()> {
            log(&self.calls, "clone_aur");
            fs::create_dir_all(dest).unwrap();
            fs::write(
                dest.join("PKGBUILD"),
                "pkgname=widget\npkgver=1.0.0\npkgrel=3\nsha256sums=('SKIP')\n",
            )
            .unwrap();
            Ok(())
        }
        fn set_identity(&self, _repo: &Path) -> SyncResult<()> {
            log(&self.calls, "set_identity");
            Ok(())
        }
        fn stage(&self, _repo: &Path, paths: &[&str]) -> SyncResult<()> {
            log(&self.calls, format!("stage {}", paths.join(",")));
            Ok(())
        }
        fn commit(&self, _repo: &Path, message: &str) -> SyncResult<()> {
            log(&self.calls, format!("commit {message}"));
            Ok(())
        }
        fn push_aur(&self, _repo: &Path) -> SyncResult<()> {
            log(&self.calls, "push_aur");
            if self.fail_aur_push {
                return Err(SyncError::PushFailed {
                    remote: "aur".to_string(),
                    reason: "permission denied".to_string(),
                });
            }
            Ok(())
        }
        fn push_ambient(&self, _repo: &Path) -> SyncResult<()> {
            log(&self.calls, "push_ambient");
            Ok(())
        }
        fn close_aur_transport(&self) -> SyncResult<()> {
            log(&self.calls, "close_aur_transport");
            Ok(())
        }
    }

    fn test_config(workdir: &Path, publish: bool, current_version: &str) -> Config {
        Config {
            workdir: workdir.to_path_buf(),
            extra_packages: vec![],
            publish,
            ssh_private_key: "key".to_string(),
            git_email: "dev@example.com".to_string(),
            git_username: "dev".to_string(),
            github_token: None,
            output_file: Some(workdir.join("outputs")),
            build_user: "builder".to_string(),
            static_config: StaticConfig {
                upstream_repo: "acme/widget".to_string(),
                aur_repo: "ssh://aur@aur.archlinux.org/widget.git".to_string(),
                pkg_name: "widget".to_string(),
                asset_stub: "linux.tar.zst".to_string(),
            },
            current_version: current_version.to_string(),
        }
    }

    fn release(tag: &str, assets: &[&str]) -> Release {
        Release {
            tag_name: tag.to_string(),
            assets: assets
                .iter()
                .map(|n| ReleaseAsset {
                    name: n.to_string(),
                    browser_download_url: format!("https://example.com/dl/{n}"),
                })
                .collect(),
        }
    }

    struct Harness {
        workdir: TempDir,
        aur_dir: TempDir,
        calls: CallLog,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                workdir: TempDir::new().unwrap(),
                aur_dir: TempDir::new().unwrap(),
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn aur_checkout(&self) -> PathBuf {
            self.aur_dir.path().join("widget")
        }

        fn collaborators(
            &self,
            rel: Release,
            fail_aur_push: bool,
        ) -> (FakeSource, FakeToolchain, FakeVcs) {
            (
                FakeSource {
                    release: rel,
                    calls: self.calls.clone(),
                },
                FakeToolchain {
                    calls: self.calls.clone(),
                },
                FakeVcs {
                    calls: self.calls.clone(),
                    fail_aur_push,
                },
            )
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn outputs(&self) -> String {
            fs::read_to_string(self.workdir.path().join("outputs")).unwrap()
        }
    }

    #[tokio::test]
    async fn test_gate_short_circuits_on_equal_versions() {
        let h = Harness::new();
        let cfg = test_config(h.workdir.path(), true, "v1.1.0");
        // Prefix-insensitive equality: marker has v, tag does not
        let (s, t, v) = h.collaborators(release("1.1.0", &["widget-1.1.0-linux.tar.zst"]), false);
        let pipeline = Pipeline::new(&cfg, s, t, v);

        let outcome = pipeline.run(&h.aur_checkout()).await.unwrap();
        assert_eq!(outcome, RunOutcome::UpToDate);

        let calls = h.calls();
        assert_eq!(calls, vec!["latest_release"]);
        assert!(h.outputs().contains("aurUpdated=false"));
    }

    #[tokio::test]
    async fn test_publish_disabled_builds_but_never_pushes() {
        let h = Harness::new();
        let cfg = test_config(h.workdir.path(), false, "v1.0.0");
        let (s, t, v) = h.collaborators(release("v1.1.0", &["widget-1.1.0-linux.tar.zst"]), false);
        let pipeline = Pipeline::new(&cfg, s, t, v);

        let outcome = pipeline.run(&h.aur_checkout()).await.unwrap();
        assert_eq!(outcome, RunOutcome::Built);

        let calls = h.calls();
        assert!(calls.contains(&"build".to_string()));
        assert!(calls.contains(&"install".to_string()));
        assert!(!calls.iter().any(|c| c.starts_with("commit")));
        assert!(!calls.contains(&"push_aur".to_string()));
        assert!(!calls.contains(&"push_ambient".to_string()));
        // The deploy key is removed even though nothing was pushed
        assert!(calls.contains(&"close_aur_transport".to_string()));
        assert!(h.outputs().contains("aurUpdated=false"));
    }

    #[tokio::test]
    async fn test_full_publish_run() {
        let h = Harness::new();
        let cfg = test_config(h.workdir.path(), true, "v1.0.0");
        fs::write(
            h.workdir.path().join(config::VERSION_FILE),
            "CURRENT_VERSION=v1.0.0\n",
        )
        .unwrap();
        let (s, t, v) = h.collaborators(
            release(
                "v1.1.0",
                &["widget-1.1.0-windows.zip", "widget-1.1.0-linux.tar.zst"],
            ),
            false,
        );
        let pipeline = Pipeline::new(&cfg, s, t, v);

        let outcome = pipeline.run(&h.aur_checkout()).await.unwrap();
        assert_eq!(outcome, RunOutcome::Published);

        // Asset resolution picked the stub match, not the zip
        let calls = h.calls();
        assert!(calls
            .iter()
            .any(|c| c == "fetch_checksum https://example.com/dl/widget-1.1.0-linux.tar.zst"));

        // Recipe carries the new version, digest, and a reset pkgrel
        let recipe =
            fs::read_to_string(h.aur_checkout().join("PKGBUILD")).unwrap();
        assert!(recipe.contains("pkgver=1.1.0"));
        assert!(recipe.contains("pkgrel=1"));
        assert!(recipe.contains(
            "sha256sums=('ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad')"
        ));

        // AUR commit records the normalized version
        assert!(calls.contains(&"commit Update to 1.1.0".to_string()));
        assert!(calls.contains(&"push_aur".to_string()));
        assert!(calls.contains(&"push_ambient".to_string()));

        // Deploy key lifetime ends between the AUR push and the source push
        let pos = |name: &str| calls.iter().position(|c| c == name).unwrap();
        assert!(pos("push_aur") < pos("close_aur_transport"));
        assert!(pos("close_aur_transport") < pos("push_ambient"));

        // Version marker rewritten with the raw tag
        let marker =
            fs::read_to_string(h.workdir.path().join(config::VERSION_FILE)).unwrap();
        assert_eq!(marker, "CURRENT_VERSION=v1.1.0\n");

        // Recipe copied back into the source repo
        assert!(h.workdir.path().join("PKGBUILD").exists());

        let outputs = h.outputs();
        assert!(outputs.contains("aurPackageName=widget"));
        assert!(outputs.contains("currentVersion=v1.0.0"));
        assert!(outputs.contains("latestVersion=v1.1.0"));
        assert!(outputs.contains("aurUpdated=true"));
    }

    #[tokio::test]
    async fn test_aur_push_failure_records_not_updated() {
        let h = Harness::new();
        let cfg = test_config(h.workdir.path(), true, "v1.0.0");
        let (s, t, v) = h.collaborators(release("v1.1.0", &["widget-1.1.0-linux.tar.zst"]), true);
        let pipeline = Pipeline::new(&cfg, s, t, v);

        let err = pipeline.run(&h.aur_checkout()).await.unwrap_err();
        assert!(matches!(err, SyncError::PushFailed { .. }));
        assert!(h.outputs().contains("aurUpdated=false"));
        assert!(!h.calls().contains(&"push_ambient".to_string()));
    }

    #[tokio::test]
    async fn test_missing_asset_is_fatal_before_clone() {
        let h = Harness::new();
        let cfg = test_config(h.workdir.path(), true, "v1.0.0");
        let (s, t, v) = h.collaborators(release("v1.1.0", &["widget-1.1.0-windows.zip"]), false);
        let pipeline = Pipeline::new(&cfg, s, t, v);

        let err = pipeline.run(&h.aur_checkout()).await.unwrap_err();
        assert!(matches!(err, SyncError::NoAssetMatch { .. }));
        assert!(!h.calls().contains(&"clone_aur".to_string()));
    }
}

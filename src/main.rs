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

use anyhow::Result;
use clap::Parser;
use console::style;
use std::path::PathBuf;

mod build;
mod config;
mod download;
mod error;
mod git;
mod github;
mod logging;
mod outputs;
mod pipeline;
mod pkgbuild;
mod version;

use build::PackageBuilder;
use config::Config;
use pipeline::{GitCli, GithubSource, Pipeline, RunOutcome};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "aurbump")]
#[command(version = VERSION)]
#[command(about = "Syncs the latest upstream GitHub release into an AUR package.")]
struct Cli {
    /// Working directory (defaults to GITHUB_WORKSPACE, then the current dir)
    #[arg(long)]
    workdir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Build and validate but never publish, regardless of INPUT_PUBLISH
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_with_level(&cli.log_level);

    let workdir = Config::resolve_workdir(cli.workdir);
    let publish_override = if cli.dry_run { Some(false) } else { None };
    let config = Config::load(workdir, publish_override)?;

    println!(
        "{} aurbump {} ({} -> {})",
        style("::").cyan().bold(),
        VERSION,
        style(&config.static_config.upstream_repo).yellow(),
        style(&config.static_config.pkg_name).yellow()
    );

    let source = GithubSource::new(config.github_token.clone());
    let toolchain = PackageBuilder::new(&config.build_user);
    let vcs = GitCli::provision(&config)?;

    // The AUR checkout is process-lifetime scoped; the temp dir cleans it up
    let checkout_root = tempfile::tempdir()?;
    let aur_checkout = checkout_root.path().join(&config.static_config.pkg_name);

    let pipeline = Pipeline::new(&config, source, toolchain, vcs);
    let outcome = pipeline.run(&aur_checkout).await?;

    match outcome {
        RunOutcome::UpToDate => {}
        RunOutcome::Built => {
            println!(
                "{} build validated, publishing was disabled",
                style("::").green().bold()
            );
        }
        RunOutcome::Published => {
            println!("{} release sync complete", style("::").green().bold());
        }
    }

    Ok(())
}

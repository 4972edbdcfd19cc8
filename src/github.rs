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

//! GitHub release API client: latest-tag resolution and asset location.

use serde::Deserialize;
use std::time::Duration;

use crate::error::{SyncError, SyncResult};

/// A downloadable file attached to a release
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseAsset {
    pub name: String,
    pub browser_download_url: String,
}

/// Latest-release API response
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    pub tag_name: String,
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

impl Release {
    /// Select the asset whose name ends with `stub` (case-sensitive).
    ///
    /// When several assets match, the first one in API-returned order wins.
    pub fn resolve_asset(&self, stub: &str) -> SyncResult<&ReleaseAsset> {
        self.assets
            .iter()
            .find(|a| a.name.ends_with(stub))
            .ok_or_else(|| SyncError::NoAssetMatch {
                stub: stub.to_string(),
            })
    }
}

/// GitHub release API client
pub struct ReleaseClient {
    client: reqwest::Client,
    api_base: String,
    token: Option<String>,
}

impl ReleaseClient {
    /// Create a client, optionally authenticated with a bearer token.
    /// Anonymous access works but is subject to stricter rate limits.
    pub fn new(token: Option<String>) -> Self {
        Self::with_base("https://api.github.com".to_string(), token)
    }

    /// Create a client against a custom API base (used in tests)
    pub fn with_base(api_base: String, token: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("aurbump/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_base,
            token,
        }
    }

    /// Fetch the latest published release for `repo` (`org/repo` form).
    ///
    /// Network failure, auth failure, and a repository without releases all
    /// collapse into the same empty-result error class.
    pub async fn latest_release(&self, repo: &str) -> SyncResult<Release> {
        let url = format!("{}/repos/{}/releases/latest", self.api_base, repo);

        let mut request = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }

        let response = request.send().await.map_err(|e| SyncError::Network {
            url: url.clone(),
            message: "request failed".to_string(),
            source: Some(e),
        })?;

        if !response.status().is_success() {
            return Err(SyncError::empty(format!(
                "latest release for '{repo}' (HTTP {})",
                response.status()
            )));
        }

        let release: Release = response.json().await.map_err(|e| SyncError::Network {
            url,
            message: "invalid release JSON".to_string(),
            source: Some(e),
        })?;

        if release.tag_name.is_empty() {
            return Err(SyncError::empty(format!("latest release tag for '{repo}'")));
        }

        Ok(release)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn release_with(names: &[&str]) -> Release {
        Release {
            tag_name: "v1.1.0".to_string(),
            assets: names
                .iter()
                .map(|n| ReleaseAsset {
                    name: n.to_string(),
                    browser_download_url: format!("https://example.com/dl/{n}"),
                })
                .collect(),
        }
    }

    #[test]
    fn test_resolve_asset_suffix_match() {
        let release = release_with(&[
            "widget-1.1.0-windows.zip",
            "widget-1.1.0-linux.tar.zst",
            "widget-1.1.0-darwin.tar.gz",
        ]);
        let asset = release.resolve_asset("linux.tar.zst").unwrap();
        assert_eq!(asset.name, "widget-1.1.0-linux.tar.zst");
        assert_eq!(
            asset.browser_download_url,
            "https://example.com/dl/widget-1.1.0-linux.tar.zst"
        );
    }

    #[test]
    fn test_resolve_asset_first_match_wins() {
        let release = release_with(&["a-linux.tar.zst", "b-linux.tar.zst"]);
        let asset = release.resolve_asset("linux.tar.zst").unwrap();
        assert_eq!(asset.name, "a-linux.tar.zst");
    }

    #[test]
    fn test_resolve_asset_idempotent() {
        let release = release_with(&["a-linux.tar.zst", "b-linux.tar.zst"]);
        let first = release.resolve_asset("linux.tar.zst").unwrap().name.clone();
        for _ in 0..3 {
            assert_eq!(release.resolve_asset("linux.tar.zst").unwrap().name, first);
        }
    }

    #[test]
    fn test_resolve_asset_case_sensitive() {
        let release = release_with(&["widget-LINUX.TAR.ZST"]);
        assert!(release.resolve_asset("linux.tar.zst").is_err());
    }

    #[test]
    fn test_resolve_asset_no_match() {
        let release = release_with(&["widget-1.1.0-windows.zip"]);
        let err = release.resolve_asset("linux.tar.zst").unwrap_err();
        assert!(matches!(err, SyncError::NoAssetMatch { .. }));
    }

    #[test]
    fn test_release_json_shape() {
        let json = r#"{
            "tag_name": "v1.1.0",
            "assets": [
                {"name": "widget-1.1.0-linux.tar.zst",
                 "browser_download_url": "https://example.com/widget-1.1.0-linux.tar.zst"}
            ]
        }"#;
        let release: Release = serde_json::from_str(json).unwrap();
        assert_eq!(release.tag_name, "v1.1.0");
        assert_eq!(release.assets.len(), 1);
    }

    #[test]
    fn test_release_json_missing_assets() {
        let release: Release = serde_json::from_str(r#"{"tag_name": "v2.0.0"}"#).unwrap();
        assert!(release.assets.is_empty());
    }
}

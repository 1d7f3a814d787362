//! Latest release downloads from a GitHub-compatible hosting API.
//!
//! The HTTP layer sits behind [`HttpGet`] so tests can stand in for the network.

use std::{
    borrow::Cow,
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::{
    bog::Bog,
    error::{Error, Result},
    ibog,
};

pub const GITHUB_API: &str = "https://api.github.com";
pub const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";
/// Overrides [`GITHUB_API`] in [`ReleaseApi::from_env`]
pub const API_URL_VAR: &str = "GITHUB_API_URL";

#[derive(Deserialize, Debug, Clone)]
pub struct Release {
    pub tag_name: String,
    #[serde(default)]
    pub assets: Vec<Asset>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Asset {
    pub name: String,
    pub browser_download_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// A blocking GET. Any status is a response; only transport failures are errors.
#[cfg_attr(test, mockall::automock)]
pub trait HttpGet {
    fn get(&self, url: &str, accept: &str) -> Result<HttpResponse>;
}

/// [`HttpGet`] over a `ureq` agent.
///
/// No timeout is configured: a hung endpoint blocks the caller.
pub struct UreqHttp {
    agent: ureq::Agent,
}

impl UreqHttp {
    pub fn new() -> Self {
        let config = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build();
        Self {
            agent: ureq::Agent::new_with_config(config),
        }
    }
}

impl Default for UreqHttp {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpGet for UreqHttp {
    fn get(&self, url: &str, accept: &str) -> Result<HttpResponse> {
        let transport = |e: ureq::Error| Error::Transport {
            url: url.to_string(),
            reason: e.to_string(),
        };

        let response = self
            .agent
            .get(url)
            .header("Accept", accept)
            .call()
            .map_err(transport)?;
        let status = response.status().as_u16();
        // assets easily exceed the default body cap
        let body = response
            .into_body()
            .with_config()
            .limit(u64::MAX)
            .read_to_vec()
            .map_err(transport)?;

        Ok(HttpResponse { status, body })
    }
}

pub struct ReleaseApi<H = UreqHttp> {
    http: H,
    base_url: String,
}

impl ReleaseApi<UreqHttp> {
    pub fn github() -> Self {
        Self::with_client(UreqHttp::new(), GITHUB_API)
    }

    /// Like [`ReleaseApi::github`], unless `GITHUB_API_URL` points somewhere else
    pub fn from_env() -> Self {
        let base_url = std::env::var(API_URL_VAR)
            .ok()
            .filter(|v| !v.trim().is_empty());
        Self::with_client(UreqHttp::new(), base_url.as_deref().unwrap_or(GITHUB_API))
    }
}

impl<H: HttpGet> ReleaseApi<H> {
    pub fn with_client(http: H, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn latest_release_url(&self, owner: &str, repo: &str) -> String {
        format!("{}/repos/{owner}/{repo}/releases/latest", self.base_url)
    }

    /// Fetch the metadata of the latest release of `owner/repo`
    pub fn latest_release(&self, owner: &str, repo: &str) -> Result<Release> {
        let url = self.latest_release_url(owner, repo);
        let response = self.fetch(&url)?;

        serde_json::from_slice(&response.body).map_err(|e| Error::MalformedRelease {
            url,
            reason: e.to_string(),
        })
    }

    /// Download the first asset of the latest release into `save_path`, overwriting any file of
    /// the same name. Returns the asset's file name.
    ///
    /// Single attempt: no retry, resume or checksum.
    pub fn get_latest_artifact(
        &self,
        owner: &str,
        repo: &str,
        save_path: impl AsRef<Path>,
        bog: &dyn Bog,
    ) -> Result<String> {
        let release = self.latest_release(owner, repo)?;
        ibog!(bog => "Latest release: {}", release.tag_name);

        // always the first; multi-platform releases are not disambiguated
        let Some(asset) = release.assets.first() else {
            return Err(Error::NoAssetsFound {
                tag: release.tag_name,
            });
        };
        let dest = asset_destination(save_path.as_ref(), asset)?;

        ibog!(bog => "Downloading {} from {}", asset.name, asset.browser_download_url);
        let response = self.fetch(&asset.browser_download_url)?;

        fs::write(&dest, &response.body).map_err(|source| Error::Io {
            path: dest.clone(),
            source,
        })?;

        ibog!(bog => "Downloaded {} successfully", asset.name);
        Ok(asset.name.clone())
    }

    fn fetch(&self, url: &str) -> Result<HttpResponse> {
        let response = self.http.get(url, GITHUB_ACCEPT)?;
        if response.status != 200 {
            return Err(Error::FetchFailure {
                url: url.to_string(),
                status: response.status,
                body: response.text().into_owned(),
            });
        }
        Ok(response)
    }
}

/// Asset names are written as-is, so they must be a bare file name
fn asset_destination(save_path: &Path, asset: &Asset) -> Result<PathBuf> {
    let name = Path::new(&asset.name);
    match name.file_name() {
        Some(file_name) if file_name == name.as_os_str() => Ok(save_path.join(file_name)),
        _ => Err(Error::MalformedRelease {
            url: asset.browser_download_url.clone(),
            reason: format!("asset name {:?} is not a plain file name", asset.name),
        }),
    }
}

/// [`ReleaseApi::get_latest_artifact`] against api.github.com
pub fn get_latest_artifact(
    owner: &str,
    repo: &str,
    save_path: impl AsRef<Path>,
    bog: &dyn Bog,
) -> Result<String> {
    ReleaseApi::github().get_latest_artifact(owner, repo, save_path, bog)
}

//! Asset access: template images and font files.
//!
//! `AssetStore` keeps all fetching concerns out of the renderer so the
//! pipeline works the same against local files, a CDN, or an in-memory
//! fixture.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::CertificateError;

/// Where an asset lives: a filesystem path or an `http(s)` URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AssetSource {
    Path(PathBuf),
    Url(String),
}

impl AssetSource {
    /// Parse a config string. Anything starting with `http://` or
    /// `https://` is a URL, everything else a path.
    pub fn parse(s: &str) -> Self {
        let lower = s.to_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Url(s.to_string())
        } else {
            Self::Path(PathBuf::from(s))
        }
    }

    /// Resolve relative paths against `root`. URLs and absolute paths are unchanged.
    pub fn rebased(&self, root: &Path) -> Self {
        match self {
            Self::Path(p) if p.is_relative() => Self::Path(root.join(p)),
            other => other.clone(),
        }
    }
}

impl fmt::Display for AssetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(p) => write!(f, "{}", p.display()),
            Self::Url(u) => f.write_str(u),
        }
    }
}

impl From<&str> for AssetSource {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl Serialize for AssetSource {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AssetSource {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::parse(&s))
    }
}

/// Fetches raw asset bytes.
#[async_trait]
pub trait AssetStore: Send + Sync {
    async fn fetch(&self, source: &AssetSource) -> Result<Vec<u8>, CertificateError>;
}

/// Reads paths from disk and URLs over HTTP.
pub struct HttpAssetStore {
    client: reqwest::Client,
}

impl HttpAssetStore {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, CertificateError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| CertificateError::Config(format!("HTTP client error: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl AssetStore for HttpAssetStore {
    async fn fetch(&self, source: &AssetSource) -> Result<Vec<u8>, CertificateError> {
        match source {
            AssetSource::Path(path) => tokio::fs::read(path).await.map_err(|e| {
                CertificateError::Asset(format!("Failed to read {}: {}", path.display(), e))
            }),
            AssetSource::Url(url) => {
                let response = self
                    .client
                    .get(url)
                    .send()
                    .await
                    .map_err(|e| CertificateError::Asset(format!("Failed to fetch {}: {}", url, e)))?;

                if !response.status().is_success() {
                    return Err(CertificateError::Asset(format!(
                        "Failed to fetch {}: HTTP {}",
                        url,
                        response.status()
                    )));
                }

                let bytes = response.bytes().await.map_err(|e| {
                    CertificateError::Asset(format!("Failed to read body of {}: {}", url, e))
                })?;
                Ok(bytes.to_vec())
            }
        }
    }
}

/// Serves assets from a map. Unknown sources behave like a 404.
#[derive(Default)]
pub struct MemoryAssetStore {
    assets: HashMap<AssetSource, Vec<u8>>,
}

impl MemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, source: impl Into<AssetSource>, bytes: Vec<u8>) -> &mut Self {
        self.assets.insert(source.into(), bytes);
        self
    }
}

#[async_trait]
impl AssetStore for MemoryAssetStore {
    async fn fetch(&self, source: &AssetSource) -> Result<Vec<u8>, CertificateError> {
        self.assets
            .get(source)
            .cloned()
            .ok_or_else(|| CertificateError::Asset(format!("Not found: {}", source)))
    }
}

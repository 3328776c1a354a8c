//! Feed sources: where the import document's bytes come from

use async_trait::async_trait;
use roster_common::config::FeedLocation;
use roster_common::{Error, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Named, read-only byte source holding the JSON feed document
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Human-readable name used in logs and errors
    fn name(&self) -> String;

    /// Fetch the whole document
    async fn read(&self) -> Result<Vec<u8>>;
}

/// Build the feed source for a configured location
pub fn feed_for(location: &FeedLocation) -> Arc<dyn FeedSource> {
    match location {
        FeedLocation::File(path) => Arc::new(FileFeed::new(path.clone())),
        FeedLocation::Url(url) => Arc::new(HttpFeed::new(url.clone())),
    }
}

/// Document stored on the local filesystem
#[derive(Debug, Clone)]
pub struct FileFeed {
    path: PathBuf,
}

impl FileFeed {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl FeedSource for FileFeed {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    async fn read(&self) -> Result<Vec<u8>> {
        debug!("Reading feed file {}", self.path.display());
        tokio::fs::read(&self.path)
            .await
            .map_err(|e| Error::Feed(format!("{}: {}", self.path.display(), e)))
    }
}

/// Document fetched over HTTP(S); any non-success status is a failure
#[derive(Debug, Clone)]
pub struct HttpFeed {
    url: String,
    client: reqwest::Client,
}

impl HttpFeed {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl FeedSource for HttpFeed {
    fn name(&self) -> String {
        self.url.clone()
    }

    async fn read(&self) -> Result<Vec<u8>> {
        debug!("Fetching feed document {}", self.url);
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::Feed(format!("{}: {}", self.url, e)))?;

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::Feed(format!("{}: {}", self.url, e)))?;

        Ok(body.to_vec())
    }
}

/// Document already held in memory
#[derive(Debug, Clone)]
pub struct MemoryFeed {
    name: String,
    bytes: Vec<u8>,
}

impl MemoryFeed {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

#[async_trait]
impl FeedSource for MemoryFeed {
    fn name(&self) -> String {
        self.name.clone()
    }

    async fn read(&self) -> Result<Vec<u8>> {
        Ok(self.bytes.clone())
    }
}

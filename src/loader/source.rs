//! Where the index document comes from

use crate::config::IndexConfig;
use crate::loader::error::LoadError;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Fetches the raw index document
#[async_trait]
pub trait IndexSource: Send + Sync {
    /// Read the whole document
    async fn fetch(&self) -> Result<Vec<u8>, LoadError>;

    /// Location for log messages
    fn describe(&self) -> String;
}

/// Index document on the local filesystem
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl IndexSource for FileSource {
    async fn fetch(&self) -> Result<Vec<u8>, LoadError> {
        tokio::fs::read(&self.path).await.map_err(|source| LoadError::Io {
            path: self.path.clone(),
            source,
        })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Index document served over HTTP(S)
#[derive(Debug, Clone)]
pub struct HttpSource {
    url: String,
    http: reqwest::Client,
}

impl HttpSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, LoadError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            url: url.into(),
            http,
        })
    }
}

#[async_trait]
impl IndexSource for HttpSource {
    async fn fetch(&self) -> Result<Vec<u8>, LoadError> {
        tracing::debug!(url = %self.url, "Fetching index document");

        let response = self.http.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status {
                status: status.as_u16(),
                url: self.url.clone(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Document held in memory
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    document: Arc<[u8]>,
}

impl StaticSource {
    pub fn new(document: impl Into<Vec<u8>>) -> Self {
        Self {
            document: Arc::from(document.into()),
        }
    }
}

#[async_trait]
impl IndexSource for StaticSource {
    async fn fetch(&self) -> Result<Vec<u8>, LoadError> {
        Ok(self.document.to_vec())
    }

    fn describe(&self) -> String {
        format!("<memory: {} bytes>", self.document.len())
    }
}

/// Create an index source based on configuration
pub fn create_source(config: &IndexConfig) -> Result<Arc<dyn IndexSource>, LoadError> {
    let location = config.location.trim();

    if location.starts_with("http://") || location.starts_with("https://") {
        tracing::info!(url = %location, "Using HTTP index source");
        let source = HttpSource::new(location, Duration::from_secs(config.timeout_secs))?;
        Ok(Arc::new(source))
    } else {
        tracing::info!(path = %location, "Using file index source");
        Ok(Arc::new(FileSource::new(location)))
    }
}

use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Location of the static source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceRef {
    Url(String),
    Path(PathBuf),
}

impl FromStr for ResourceRef {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Ok(ResourceRef::Url(trimmed.to_string()))
        } else {
            Ok(ResourceRef::Path(PathBuf::from(trimmed)))
        }
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceRef::Url(url) => f.write_str(url),
            ResourceRef::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("building HTTP client failed: {0}")]
    Client(String),
    #[error("request to {url} failed: {message}")]
    Http { url: String, message: String },
    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },
    #[error("fetching {resource} timed out after {timeout:?}")]
    Timeout {
        resource: String,
        timeout: Duration,
    },
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Source of raw delimited text.
pub trait Loader {
    fn fetch(
        &self,
        resource: &ResourceRef,
    ) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// Reads the source over HTTP or from the local filesystem, bounded by a timeout.
#[derive(Debug, Clone)]
pub struct StaticLoader {
    client: reqwest::Client,
    timeout: Duration,
}

impl StaticLoader {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;
        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn fetch_url(&self, url: &str) -> Result<String, FetchError> {
        let http_err = |e: reqwest::Error| {
            if e.is_timeout() {
                FetchError::Timeout {
                    resource: url.to_string(),
                    timeout: self.timeout,
                }
            } else {
                FetchError::Http {
                    url: url.to_string(),
                    message: e.to_string(),
                }
            }
        };

        let response = self.client.get(url).send().await.map_err(http_err)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        response.text().await.map_err(http_err)
    }

    async fn fetch_path(&self, path: &Path) -> Result<String, FetchError> {
        tokio::fs::read_to_string(path)
            .await
            .map_err(|source| FetchError::Io {
                path: path.to_path_buf(),
                source,
            })
    }
}

impl Loader for StaticLoader {
    async fn fetch(&self, resource: &ResourceRef) -> Result<String, FetchError> {
        let read = async {
            match resource {
                ResourceRef::Url(url) => self.fetch_url(url).await,
                ResourceRef::Path(path) => self.fetch_path(path).await,
            }
        };
        tokio::time::timeout(self.timeout, read)
            .await
            .unwrap_or_else(|_| {
                Err(FetchError::Timeout {
                    resource: resource.to_string(),
                    timeout: self.timeout,
                })
            })
    }
}

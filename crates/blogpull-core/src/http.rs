//! Blocking HTTP layer over a shared async reqwest client.
//!
//! The pipeline phases are sequential and synchronous; this module bridges
//! them onto one tokio runtime so connection pooling and per-read stall
//! timeouts come from reqwest/tokio instead of hand-rolled sockets.

use std::io;
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

use tokio::io::AsyncWriteExt;

/// Error from a single HTTP operation.
#[derive(Debug)]
pub enum FetchError {
    /// HTTP-level failure with optional status code.
    Http {
        status: Option<u16>,
        message: String,
    },
    /// Local or transport I/O failure (includes read stalls).
    Io(io::Error),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http {
                status: Some(s),
                message,
            } => write!(f, "HTTP {s}: {message}"),
            Self::Http {
                status: None,
                message,
            } => write!(f, "HTTP error: {message}"),
            Self::Io(e) => write!(f, "IO error: {e}"),
        }
    }
}

impl std::error::Error for FetchError {}

impl From<io::Error> for FetchError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl FetchError {
    pub fn from_reqwest(e: &reqwest::Error) -> Self {
        Self::Http {
            status: e.status().map(|s| s.as_u16()),
            message: e.to_string(),
        }
    }

    fn timed_out(read_timeout: Duration) -> Self {
        Self::Io(io::Error::new(
            io::ErrorKind::TimedOut,
            format!("read timeout ({}s with no data)", read_timeout.as_secs()),
        ))
    }
}

/// Error from a streaming download, split by where it happened.
///
/// Request construction and response-header failures abort the download
/// phase; a failure while copying the body only loses that one file.
#[derive(Debug)]
pub enum DownloadError {
    Request(FetchError),
    Body(FetchError),
}

impl std::fmt::Display for DownloadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Request(e) => write!(f, "request failed: {e}"),
            Self::Body(e) => write!(f, "body copy failed: {e}"),
        }
    }
}

impl std::error::Error for DownloadError {}

/// Shared tokio runtime for HTTP operations.
pub static SHARED_RUNTIME: LazyLock<tokio::runtime::Runtime> = LazyLock::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .expect("failed to build tokio runtime")
});

/// HTTP settings carried explicitly through the pipeline (no globals).
#[derive(Debug, Clone)]
pub struct HttpSettings {
    /// User-Agent attached to asset downloads (page fetches go without).
    pub user_agent: String,
    pub connect_timeout: Duration,
    /// Stall detection: max time with no data on a single read.
    pub read_timeout: Duration,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            user_agent: String::from("blogpull/0.1"),
            connect_timeout: Duration::from_secs(30),
            read_timeout: Duration::from_secs(30),
        }
    }
}

/// Blocking HTTP client wrapping a pooled reqwest client.
#[derive(Debug, Clone)]
pub struct Client {
    inner: reqwest::Client,
    user_agent: String,
    read_timeout: Duration,
}

impl Client {
    pub fn new(settings: &HttpSettings) -> Result<Self, FetchError> {
        let inner = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .pool_max_idle_per_host(8)
            .build()
            .map_err(|e| FetchError::from_reqwest(&e))?;
        Ok(Self {
            inner,
            user_agent: settings.user_agent.clone(),
            read_timeout: settings.read_timeout,
        })
    }

    /// GET a page and return its body as text.
    ///
    /// Non-2xx responses are errors. The whole body read is bounded by the
    /// read timeout; blog pages are small.
    pub fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        SHARED_RUNTIME.handle().block_on(async {
            let resp = self
                .inner
                .get(url)
                .send()
                .await
                .and_then(|r| r.error_for_status())
                .map_err(|e| FetchError::from_reqwest(&e))?;
            match tokio::time::timeout(self.read_timeout, resp.text()).await {
                Ok(body) => body.map_err(|e| FetchError::from_reqwest(&e)),
                Err(_) => Err(FetchError::timed_out(self.read_timeout)),
            }
        })
    }

    /// GET `url` and stream the body to `dest`, returning bytes written.
    ///
    /// The configured User-Agent is attached here. Each body chunk must
    /// arrive within the read timeout or the copy fails as a body error.
    pub fn download_to_file(&self, url: &str, dest: &Path) -> Result<u64, DownloadError> {
        SHARED_RUNTIME.handle().block_on(async {
            let mut req = self.inner.get(url);
            if !self.user_agent.is_empty() {
                req = req.header(reqwest::header::USER_AGENT, &self.user_agent);
            }
            let mut resp = req
                .send()
                .await
                .and_then(|r| r.error_for_status())
                .map_err(|e| DownloadError::Request(FetchError::from_reqwest(&e)))?;

            let mut file = tokio::fs::File::create(dest)
                .await
                .map_err(|e| DownloadError::Request(FetchError::Io(e)))?;

            let mut written = 0u64;
            loop {
                let chunk = match tokio::time::timeout(self.read_timeout, resp.chunk()).await {
                    Ok(Ok(Some(chunk))) => chunk,
                    Ok(Ok(None)) => break,
                    Ok(Err(e)) => {
                        return Err(DownloadError::Body(FetchError::from_reqwest(&e)));
                    }
                    Err(_) => {
                        return Err(DownloadError::Body(FetchError::timed_out(
                            self.read_timeout,
                        )));
                    }
                };
                file.write_all(&chunk)
                    .await
                    .map_err(|e| DownloadError::Body(FetchError::Io(e)))?;
                written += chunk.len() as u64;
            }
            file.flush()
                .await
                .map_err(|e| DownloadError::Body(FetchError::Io(e)))?;
            Ok(written)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http_err(status: u16) -> FetchError {
        FetchError::Http {
            status: Some(status),
            message: "test".to_string(),
        }
    }

    #[test]
    fn fetch_error_display_with_status() {
        let msg = format!("{}", http_err(404));
        assert!(msg.contains("404"));
    }

    #[test]
    fn fetch_error_display_without_status() {
        let err = FetchError::Http {
            status: None,
            message: "connect refused".into(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("HTTP error"));
    }

    #[test]
    fn fetch_error_display_io() {
        let err = FetchError::Io(io::Error::new(io::ErrorKind::TimedOut, "stall"));
        assert!(format!("{err}").contains("IO error"));
    }

    #[test]
    fn download_error_display_sides() {
        let req = DownloadError::Request(http_err(500));
        let body = DownloadError::Body(http_err(500));
        assert!(format!("{req}").starts_with("request failed"));
        assert!(format!("{body}").starts_with("body copy failed"));
    }

    #[test]
    fn client_from_default_settings() {
        let client = Client::new(&HttpSettings::default()).unwrap();
        assert_eq!(client.read_timeout, Duration::from_secs(30));
        assert_eq!(client.user_agent, "blogpull/0.1");
    }
}

//! Client configuration.
//!
//! All client behaviour is controlled through [`ClientConfig`], built via its
//! [`ClientConfigBuilder`]. The defaults match the stock backend running on
//! `localhost:8000`, so `ClientConfig::default()` works out of the box for a
//! local setup.

use crate::brainrot::BrainRotStyle;
use crate::error::RotError;
use crate::progress::RequestObserver;
use std::fmt;
use std::sync::Arc;

/// Backend origin used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Largest background video accepted for brain-rot rendering (100 MiB).
pub const MAX_VIDEO_BYTES: u64 = 100 * 1024 * 1024;

/// Configuration for a [`crate::ResearchClient`].
///
/// # Example
/// ```rust
/// use researchrot::ClientConfig;
///
/// let config = ClientConfig::builder()
///     .base_url("http://127.0.0.1:9000")
///     .request_timeout_secs(300)
///     .build()
///     .unwrap();
/// assert_eq!(config.base_url, "http://127.0.0.1:9000");
/// ```
#[derive(Clone)]
pub struct ClientConfig {
    /// Backend origin, without a trailing slash. Default: `http://localhost:8000`.
    pub base_url: String,

    /// Per-request timeout in seconds. Default: `None` (wait indefinitely).
    ///
    /// Podcast and video generation routinely take minutes on the backend,
    /// so no timeout is applied unless asked for.
    pub request_timeout_secs: Option<u64>,

    /// Caption style sent with every brain-rot request.
    pub brainrot_style: BrainRotStyle,

    /// Upper bound for background video uploads. Default: 100 MiB.
    pub max_video_bytes: u64,

    /// Receives start / complete / error events for every request.
    pub observer: Option<Arc<dyn RequestObserver>>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: None,
            brainrot_style: BrainRotStyle::default(),
            max_video_bytes: MAX_VIDEO_BYTES,
            observer: None,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("brainrot_style", &self.brainrot_style)
            .field("max_video_bytes", &self.max_video_bytes)
            .field(
                "observer",
                &self.observer.as_ref().map(|_| "<dyn RequestObserver>"),
            )
            .finish()
    }
}

impl ClientConfig {
    /// Create a new builder for `ClientConfig`.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder {
            config: Self::default(),
        }
    }

    /// Join an endpoint path onto the base URL.
    pub fn endpoint_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        let url: String = url.into();
        self.config.base_url = url.trim().trim_end_matches('/').to_string();
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = Some(secs);
        self
    }

    pub fn brainrot_style(mut self, style: BrainRotStyle) -> Self {
        self.config.brainrot_style = style;
        self
    }

    pub fn max_video_bytes(mut self, bytes: u64) -> Self {
        self.config.max_video_bytes = bytes;
        self
    }

    pub fn observer(mut self, observer: Arc<dyn RequestObserver>) -> Self {
        self.config.observer = Some(observer);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ClientConfig, RotError> {
        let c = &self.config;
        let parsed = reqwest::Url::parse(&c.base_url).map_err(|e| {
            RotError::InvalidConfig(format!("base URL '{}' is not valid: {e}", c.base_url))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(RotError::InvalidConfig(format!(
                "base URL must use http or https, got '{}'",
                parsed.scheme()
            )));
        }
        if c.request_timeout_secs == Some(0) {
            return Err(RotError::InvalidConfig(
                "request timeout must be ≥ 1 second".into(),
            ));
        }
        if c.max_video_bytes == 0 {
            return Err(RotError::InvalidConfig(
                "video size limit must be > 0".into(),
            ));
        }
        c.brainrot_style.validate()?;
        Ok(self.config)
    }
}

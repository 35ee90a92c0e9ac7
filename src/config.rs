use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::error::Error;

const DEFAULT_BACKEND_URL: &str = "http://localhost:5001/";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Backend connection settings.
///
/// Use [`from_env()`](ClientConfig::from_env) for convention-based setup, or
/// [`new()`](ClientConfig::new) with `with_*` methods for full control.
///
/// ```rust,ignore
/// use canteen_client::ClientConfig;
///
/// let config = ClientConfig::new("https://api.example.com".parse()?)?
///     .with_timeout(std::time::Duration::from_secs(5));
/// ```
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct ClientConfig {
    pub(crate) base_url: Url,
    pub(crate) timeout: Duration,
    pub(crate) token_path: Option<PathBuf>,
}

impl ClientConfig {
    /// Create a configuration for the backend rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `base_url` cannot carry path segments
    /// (e.g. `mailto:` URLs).
    pub fn new(base_url: Url) -> Result<Self, Error> {
        Ok(Self {
            base_url: normalize_base(base_url)?,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            token_path: None,
        })
    }

    /// Create config from environment variables.
    ///
    /// # Optional env vars
    /// - `CANTEEN_BACKEND_URL`: backend root (default `http://localhost:5001`)
    /// - `CANTEEN_TIMEOUT_SECS`: per-request timeout in seconds (default 10)
    /// - `CANTEEN_TOKEN_PATH`: file backing the durable token store
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a variable is set but invalid.
    pub fn from_env() -> Result<Self, Error> {
        let base_url = match std::env::var("CANTEEN_BACKEND_URL") {
            Ok(s) => s
                .parse()
                .map_err(|e| Error::Config(format!("CANTEEN_BACKEND_URL: {e}")))?,
            Err(_) => {
                tracing::info!(default = DEFAULT_BACKEND_URL, "CANTEEN_BACKEND_URL not set");
                DEFAULT_BACKEND_URL
                    .parse()
                    .map_err(|e| Error::Config(format!("default backend URL: {e}")))?
            }
        };

        let mut config = Self::new(base_url)?;

        if let Ok(secs) = std::env::var("CANTEEN_TIMEOUT_SECS") {
            let secs: u64 = secs
                .trim()
                .parse()
                .map_err(|e| Error::Config(format!("CANTEEN_TIMEOUT_SECS: {e}")))?;
            if secs == 0 {
                return Err(Error::Config("CANTEEN_TIMEOUT_SECS must be positive".into()));
            }
            config = config.with_timeout(Duration::from_secs(secs));
        }
        if let Ok(path) = std::env::var("CANTEEN_TOKEN_PATH") {
            config = config.with_token_path(path);
        }

        Ok(config)
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_token_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.token_path = Some(path.into());
        self
    }

    /// Backend root URL, always ending in `/`.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Location of the durable token file, if configured.
    #[must_use]
    pub fn token_path(&self) -> Option<&std::path::Path> {
        self.token_path.as_deref()
    }
}

fn normalize_base(mut url: Url) -> Result<Url, Error> {
    if url.cannot_be_a_base() {
        return Err(Error::Config(format!("backend URL cannot be a base: {url}")));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_trailing_slash() {
        let config = ClientConfig::new("https://api.example.com/v2".parse().unwrap()).unwrap();
        assert_eq!(config.base_url().as_str(), "https://api.example.com/v2/");
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert!(config.token_path().is_none());
    }

    #[test]
    fn rejects_non_base_url() {
        let err = ClientConfig::new("mailto:ops@example.com".parse().unwrap()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn overrides_apply() {
        let config = ClientConfig::new("http://localhost:5001".parse().unwrap())
            .unwrap()
            .with_timeout(Duration::from_secs(3))
            .with_token_path("/tmp/canteen/token.json");

        assert_eq!(config.timeout(), Duration::from_secs(3));
        assert_eq!(
            config.token_path(),
            Some(std::path::Path::new("/tmp/canteen/token.json"))
        );
    }
}

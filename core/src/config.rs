//! Long-lived request settings: credential, language and base address.
//!
//! # Design
//! `ClientConfig` is immutable once handed to a `SetlistClient`; the
//! `with_*` methods consume and return it so configuration reads as a chain
//! at construction time. The base URL always ends in `/` so that relative
//! endpoint paths join below it instead of replacing its last segment.

use std::sync::LazyLock;

use url::Url;

use crate::error::ConfigError;
use crate::language::Language;

/// Production API root.
pub const DEFAULT_BASE_URL: &str = "https://api.setlist.fm/rest/1.0/";

pub const API_KEY_ENV: &str = "SETLISTFM_API_KEY";
pub const LANGUAGE_ENV: &str = "SETLISTFM_LANGUAGE";
pub const BASE_URL_ENV: &str = "SETLISTFM_BASE_URL";

/// `DEFAULT_BASE_URL` parsed once. The constant is an absolute `https` URL
/// ending in `/`, so parsing cannot fail and the `expect` is unreachable.
static DEFAULT_BASE: LazyLock<Url> =
    LazyLock::new(|| Url::parse(DEFAULT_BASE_URL).expect("DEFAULT_BASE_URL is an absolute URL"));

#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    api_key: String,
    language: Language,
    base_url: Url,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            language: Language::default(),
            base_url: DEFAULT_BASE.clone(),
        }
    }

    /// Read `SETLISTFM_API_KEY` (required), `SETLISTFM_LANGUAGE` and
    /// `SETLISTFM_BASE_URL` (both optional).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`ClientConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = lookup(API_KEY_ENV)
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey(API_KEY_ENV))?;

        let mut config = Self::new(api_key);
        if let Some(code) = lookup(LANGUAGE_ENV) {
            config = config.with_language(code.parse()?);
        }
        if let Some(base_url) = lookup(BASE_URL_ENV) {
            config = config.with_base_url(&base_url)?;
        }
        Ok(config)
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Point the client at another API root, e.g. a local mock server.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason,
        };

        let mut url = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        if url.cannot_be_a_base() {
            return Err(invalid("not a hierarchical URL".to_string()));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(invalid("query and fragment are not allowed".to_string()));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        self.base_url = url;
        Ok(self)
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

// Hand-written so the API key never ends up in logs.
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("language", &self.language)
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

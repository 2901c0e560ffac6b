//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core services. The binaries read environment variables exactly once and hand the
//! raw values to the helpers below; nothing in the request path looks at the environment.

use crate::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_DEBOUNCE_MS, DEFAULT_MAX_SUGGESTIONS, DEFAULT_MIN_QUERY_CHARS,
    DEFAULT_REST_ADDR, ENV_API_BASE_URL, ENV_DEBOUNCE_MS, ENV_MAX_SUGGESTIONS,
    ENV_MIN_QUERY_CHARS, ENV_REST_ADDR,
};
use crate::{RecipeError, RecipeResult};
use recipe_types::NonEmptyText;
use std::net::SocketAddr;
use std::time::Duration;
use url::Url;

/// Tuning for the debounced suggestion fetcher.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SuggestConfig {
    /// How long the input must stay unchanged before a lookup is issued.
    pub debounce: Duration,
    /// Minimum trimmed input length, in characters.
    pub min_query_chars: usize,
    /// Display cap applied to lookup results.
    pub max_suggestions: usize,
}

impl SuggestConfig {
    /// The trimmed query to look up for `input`, or `None` when it is below the minimum
    /// length.
    pub fn lookup_query(&self, input: &str) -> Option<NonEmptyText> {
        NonEmptyText::new(input)
            .ok()
            .filter(|query| query.char_len() >= self.min_query_chars)
    }
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            min_query_chars: DEFAULT_MIN_QUERY_CHARS,
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
        }
    }
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    api_base_url: Url,
    suggest: SuggestConfig,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// The base URL is normalised to end with `/` so that endpoint paths are joined beneath it
    /// rather than replacing its last segment.
    pub fn new(api_base_url: Url, suggest: SuggestConfig) -> RecipeResult<Self> {
        if suggest.debounce.is_zero() {
            return Err(RecipeError::InvalidConfig {
                key: ENV_DEBOUNCE_MS,
                reason: "debounce delay must be greater than zero".into(),
            });
        }
        if suggest.min_query_chars == 0 {
            return Err(RecipeError::InvalidConfig {
                key: ENV_MIN_QUERY_CHARS,
                reason: "minimum query length must be at least 1".into(),
            });
        }
        if suggest.max_suggestions == 0 {
            return Err(RecipeError::InvalidConfig {
                key: ENV_MAX_SUGGESTIONS,
                reason: "suggestion limit must be at least 1".into(),
            });
        }

        Ok(Self {
            api_base_url: normalise_base_url(api_base_url),
            suggest,
        })
    }

    pub fn api_base_url(&self) -> &Url {
        &self.api_base_url
    }

    pub fn suggest(&self) -> SuggestConfig {
        self.suggest
    }
}

fn normalise_base_url(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// Trim an optional raw value, treating empty/whitespace as unset.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse the recipe database base URL from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns the public TheMealDB endpoint.
/// Only `http` and `https` URLs are accepted.
pub fn api_base_url_from_env_value(value: Option<String>) -> RecipeResult<Url> {
    let raw = non_blank(value).unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
    let url = Url::parse(&raw).map_err(|e| RecipeError::InvalidConfig {
        key: ENV_API_BASE_URL,
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(RecipeError::InvalidConfig {
            key: ENV_API_BASE_URL,
            reason: format!("unsupported URL scheme '{other}'"),
        }),
    }
}

/// Parse the debounce delay (milliseconds) from an optional string value.
pub fn debounce_from_env_value(value: Option<String>) -> RecipeResult<Duration> {
    let millis = match non_blank(value) {
        Some(raw) => raw.parse::<u64>().map_err(|e| RecipeError::InvalidConfig {
            key: ENV_DEBOUNCE_MS,
            reason: e.to_string(),
        })?,
        None => DEFAULT_DEBOUNCE_MS,
    };
    Ok(Duration::from_millis(millis))
}

/// Parse a count setting from an optional string value, falling back to `default`.
pub fn count_from_env_value(
    key: &'static str,
    value: Option<String>,
    default: usize,
) -> RecipeResult<usize> {
    match non_blank(value) {
        Some(raw) => raw.parse::<usize>().map_err(|e| RecipeError::InvalidConfig {
            key,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

/// Parse the REST listen address from an optional string value.
///
/// Only the REST binary reads this; it is not part of `CoreConfig`.
pub fn rest_addr_from_env_value(value: Option<String>) -> RecipeResult<SocketAddr> {
    let raw = non_blank(value).unwrap_or_else(|| DEFAULT_REST_ADDR.to_string());
    raw.parse::<SocketAddr>()
        .map_err(|e| RecipeError::InvalidConfig {
            key: ENV_REST_ADDR,
            reason: format!("'{raw}': {e}"),
        })
}

/// Resolve the full `CoreConfig` from a variable lookup.
///
/// Binaries pass `|key| std::env::var(key).ok()`; tests pass a map.
pub fn resolve_core_config<F>(lookup: F) -> RecipeResult<CoreConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let api_base_url = api_base_url_from_env_value(lookup(ENV_API_BASE_URL))?;
    let suggest = SuggestConfig {
        debounce: debounce_from_env_value(lookup(ENV_DEBOUNCE_MS))?,
        min_query_chars: count_from_env_value(
            ENV_MIN_QUERY_CHARS,
            lookup(ENV_MIN_QUERY_CHARS),
            DEFAULT_MIN_QUERY_CHARS,
        )?,
        max_suggestions: count_from_env_value(
            ENV_MAX_SUGGESTIONS,
            lookup(ENV_MAX_SUGGESTIONS),
            DEFAULT_MAX_SUGGESTIONS,
        )?,
    };

    CoreConfig::new(api_base_url, suggest)
}

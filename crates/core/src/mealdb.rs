//! HTTP client for TheMealDB's JSON API.
//!
//! Four read-only endpoints are used, all `GET` with a single query parameter:
//!
//! ```text
//! search.php?s=<name>      -> {"meals": [Meal] | null}
//! categories.php           -> {"categories": [Category]}
//! filter.php?c=<category>  -> {"meals": [MealSummary] | null}
//! lookup.php?i=<id>        -> {"meals": [Meal] | null}
//! ```
//!
//! There is no retry, backoff or explicit timeout. A failed call is reported once and the
//! caller decides what to show.

use crate::client::RecipeSource;
use crate::config::CoreConfig;
use crate::constants::{CATEGORIES_ENDPOINT, FILTER_ENDPOINT, LOOKUP_ENDPOINT, SEARCH_ENDPOINT};
use crate::model::{CategoriesEnvelope, Category, Meal, MealSummary, MealsEnvelope};
use crate::{RecipeError, RecipeResult};
use async_trait::async_trait;
use recipe_types::{CategoryName, MealId};
use serde::de::DeserializeOwned;
use url::Url;

/// [`RecipeSource`] backed by the public recipe database.
#[derive(Clone, Debug)]
pub struct MealDbClient {
    http: reqwest::Client,
    base_url: Url,
}

impl MealDbClient {
    /// Build a client for the base URL in `cfg`.
    pub fn new(cfg: &CoreConfig) -> RecipeResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("recipe-finder/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(RecipeError::Transport)?;
        Ok(Self::with_http(http, cfg))
    }

    /// Build a client around an existing `reqwest::Client`.
    pub fn with_http(http: reqwest::Client, cfg: &CoreConfig) -> Self {
        Self {
            http,
            base_url: cfg.api_base_url().clone(),
        }
    }

    fn endpoint_url(&self, endpoint: &str, query: Option<(&str, &str)>) -> RecipeResult<Url> {
        let mut url = self.base_url.join(endpoint)?;
        if let Some((key, value)) = query {
            url.query_pairs_mut().append_pair(key, value);
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        query: Option<(&str, &str)>,
    ) -> RecipeResult<T> {
        let url = self.endpoint_url(endpoint, query)?;
        tracing::debug!(%url, "querying recipe database");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(RecipeError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(RecipeError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(RecipeError::Transport)?;
        serde_json::from_slice(&body).map_err(RecipeError::Decode)
    }
}

#[async_trait]
impl RecipeSource for MealDbClient {
    async fn search_by_name(&self, name: &str) -> RecipeResult<Vec<Meal>> {
        let envelope: MealsEnvelope<Meal> =
            self.get_json(SEARCH_ENDPOINT, Some(("s", name))).await?;
        Ok(envelope.into_vec())
    }

    async fn list_categories(&self) -> RecipeResult<Vec<Category>> {
        let envelope: CategoriesEnvelope = self.get_json(CATEGORIES_ENDPOINT, None).await?;
        Ok(envelope.into_vec())
    }

    async fn filter_by_category(&self, category: &CategoryName) -> RecipeResult<Vec<MealSummary>> {
        let envelope: MealsEnvelope<MealSummary> = self
            .get_json(FILTER_ENDPOINT, Some(("c", category.as_str())))
            .await?;
        Ok(envelope.into_vec())
    }

    async fn lookup_by_id(&self, id: &MealId) -> RecipeResult<Option<Meal>> {
        let envelope: MealsEnvelope<Meal> = self
            .get_json(LOOKUP_ENDPOINT, Some(("i", id.as_str())))
            .await?;
        Ok(envelope.into_vec().into_iter().next())
    }
}

//! # API REST
//!
//! REST surface for the recipe app.
//!
//! Handles:
//! - HTTP endpoints with axum, one per page of the browser app
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS, path validation)
//!
//! Every page endpoint answers `200` with a view state (`ready`, `empty` or `failed`); only a
//! malformed path parameter is a client error.

#![warn(rust_2018_idioms)]

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::{IntoParams, OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use recipe_core::highlight::Segment;
use recipe_core::suggest::{suggest_once, PanelState, Suggestion, SuggestionList};
use recipe_core::views::{self, CategoryIndexView, CategoryView, HomeView, RecipeView, SearchView};
use recipe_core::{
    Category, CategoryName, CoreConfig, Ingredient, Meal, MealId, MealSummary, NonEmptyText,
    SharedSource,
};

/// Application state for the REST API server
///
/// The recipe source is shared by every request; configuration is resolved once at startup
/// and never re-read while serving.
#[derive(Clone)]
pub struct AppState {
    pub source: SharedSource,
    pub cfg: Arc<CoreConfig>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SuggestParams {
    /// Current contents of the search box
    #[serde(default)]
    pub q: String,
}

type Rejection = (StatusCode, &'static str);

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        home,
        recipe_detail,
        category_index,
        category_listing,
        search_results,
        suggest,
    ),
    components(schemas(
        HealthRes,
        HomeView,
        SearchView,
        CategoryView,
        RecipeView,
        CategoryIndexView,
        SuggestionList,
        Suggestion,
        PanelState,
        Segment,
        Meal,
        MealSummary,
        Category,
        Ingredient,
    ))
)]
pub struct ApiDoc;

/// Build the full router: page endpoints, suggestions, OpenAPI document and Swagger UI.
///
/// # Arguments
/// * `state` - Shared source and resolved configuration
///
/// # Returns
/// A router ready to be served with `axum::serve`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/", get(home))
        .route("/recipe/:id", get(recipe_detail))
        .route("/categories", get(category_index))
        .route("/category/:name", get(category_listing))
        .route("/search/:query", get(search_results))
        .route("/suggest", get(suggest))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Does not touch the upstream recipe database.
async fn health() -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "Recipe REST API is alive".into(),
    })
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Featured recipes, categories and the search prompt", body = HomeView)
    )
)]
/// Landing page
///
/// # Returns
/// * `Json<HomeView>` - Featured carousel (empty if any featured lookup failed) and the
///   category index
async fn home(State(state): State<AppState>) -> Json<HomeView> {
    Json(views::home(&state.source).await)
}

#[utoipa::path(
    get,
    path = "/recipe/{id}",
    params(("id" = String, Path, description = "Recipe identifier")),
    responses(
        (status = 200, description = "Recipe detail view", body = RecipeView),
        (status = 400, description = "Invalid recipe identifier")
    )
)]
/// Full details of one recipe
///
/// # Errors
/// Returns `400 Bad Request` if:
/// - the identifier is blank or contains whitespace.
async fn recipe_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RecipeView>, Rejection> {
    let id = MealId::new(&id).map_err(|e| {
        tracing::debug!("Invalid recipe id: {e}");
        (StatusCode::BAD_REQUEST, "Invalid recipe identifier")
    })?;
    Ok(Json(views::recipe_detail(state.source.as_ref(), &id).await))
}

#[utoipa::path(
    get,
    path = "/categories",
    responses(
        (status = 200, description = "Category index view", body = CategoryIndexView)
    )
)]
async fn category_index(State(state): State<AppState>) -> Json<CategoryIndexView> {
    Json(views::category_index(state.source.as_ref()).await)
}

#[utoipa::path(
    get,
    path = "/category/{name}",
    params(("name" = String, Path, description = "Category name, e.g. Seafood")),
    responses(
        (status = 200, description = "Recipes in the category", body = CategoryView),
        (status = 400, description = "Blank category name")
    )
)]
async fn category_listing(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<CategoryView>, Rejection> {
    let category = CategoryName::new(&name)
        .map_err(|_| (StatusCode::BAD_REQUEST, "Category name cannot be empty"))?;
    Ok(Json(views::category_listing(state.source.as_ref(), &category).await))
}

#[utoipa::path(
    get,
    path = "/search/{query}",
    params(("query" = String, Path, description = "Free-text recipe name")),
    responses(
        (status = 200, description = "Search results view", body = SearchView),
        (status = 400, description = "Blank query")
    )
)]
/// Full search results for a query
///
/// The query is trimmed; it must contain at least one non-whitespace character.
async fn search_results(
    State(state): State<AppState>,
    Path(query): Path<String>,
) -> Result<Json<SearchView>, Rejection> {
    let query = NonEmptyText::new(&query)
        .map_err(|_| (StatusCode::BAD_REQUEST, "Search query cannot be empty"))?;
    Ok(Json(views::search_results(state.source.as_ref(), &query).await))
}

#[utoipa::path(
    get,
    path = "/suggest",
    params(SuggestParams),
    responses(
        (status = 200, description = "Suggestions for the current input", body = SuggestionList)
    )
)]
/// Type-ahead suggestions
///
/// Request/response callers debounce on their side; this endpoint applies the minimum
/// length and the display cap only. Short input returns a closed, empty list without
/// contacting the upstream database.
async fn suggest(
    State(state): State<AppState>,
    Query(params): Query<SuggestParams>,
) -> Json<SuggestionList> {
    let cfg = state.cfg.suggest();
    Json(suggest_once(state.source.as_ref(), &cfg, &params.q).await)
}

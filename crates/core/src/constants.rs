//! Constants used throughout the recipe core crate.
//!
//! Defaults for configuration, endpoint paths of the external recipe database, and the fixed
//! shape of its meal records live here so the client, the suggestion fetcher and the views
//! agree on them.

/// Base URL of the public recipe database (TheMealDB, free tier).
pub const DEFAULT_API_BASE_URL: &str = "https://www.themealdb.com/api/json/v1/1";

/// Default address for the REST server.
pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:3000";

/// How long typing must pause before a suggestion lookup is issued.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Shortest (trimmed) input, in characters, that triggers a suggestion lookup.
pub const DEFAULT_MIN_QUERY_CHARS: usize = 2;

/// Maximum number of suggestions displayed in the panel.
pub const DEFAULT_MAX_SUGGESTIONS: usize = 6;

/// Number of ingredient/measure slots in a meal record.
pub const INGREDIENT_SLOTS: usize = 20;

/// Recipes shown on the home view.
pub const FEATURED_RECIPE_NAMES: [&str; 6] = [
    "Arrabiata",
    "Corba",
    "Tiramisu",
    "Kumpir",
    "Lasagne",
    "Pancakes",
];

// Endpoint paths, relative to the base URL.
pub const SEARCH_ENDPOINT: &str = "search.php";
pub const CATEGORIES_ENDPOINT: &str = "categories.php";
pub const FILTER_ENDPOINT: &str = "filter.php";
pub const LOOKUP_ENDPOINT: &str = "lookup.php";

// Environment variable names, read once by the binaries.
pub const ENV_API_BASE_URL: &str = "RECIPE_API_BASE_URL";
pub const ENV_DEBOUNCE_MS: &str = "RECIPE_SUGGEST_DEBOUNCE_MS";
pub const ENV_MIN_QUERY_CHARS: &str = "RECIPE_SUGGEST_MIN_CHARS";
pub const ENV_MAX_SUGGESTIONS: &str = "RECIPE_SUGGEST_LIMIT";
pub const ENV_REST_ADDR: &str = "RECIPE_REST_ADDR";

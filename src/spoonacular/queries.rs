//! Cache-aware recipe queries.
//!
//! Composes [`SpoonacularApi`] with the [`RecipeCache`]: cache-first for
//! detail lookups, fetch on miss/stale/incomplete, write-back on success,
//! and cache invalidation when upstream reports an id gone. All cache
//! writes are fire-and-forget; the caller only ever waits on the upstream
//! response it needs.

use crate::cache::recipe::RecipeCache;
use crate::spoonacular::client::SpoonacularApi;
use crate::spoonacular::errors::SpoonacularError;
use crate::spoonacular::json::parse_json;
use crate::spoonacular::types::{RandomRecipes, Recipe, SearchResults};
use std::sync::Arc;
use tracing::debug;

/// Documented bounds for the `number` parameter (results per page).
const NUMBER_MIN: i64 = 1;
const NUMBER_MAX: i64 = 100;
/// Documented bounds for the `offset` parameter (results to skip).
const OFFSET_MIN: i64 = 0;
const OFFSET_MAX: i64 = 900;

/// Pagination options shared by the search endpoints.
///
/// Out-of-bounds values are omitted from the outbound request — the
/// upstream default applies — rather than rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageOptions {
    /// Results per page, honored within `[1, 100]`.
    pub number: Option<i64>,
    /// Results to skip, honored within `[0, 900]`.
    pub offset: Option<i64>,
}

/// Options for the advanced recipe search.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// Title query, matched against recipe titles.
    pub title: Option<String>,
    /// Cooking tools the recipe must use (interpreted as `or`).
    pub tools: Vec<String>,
    /// Maximum total cooking time in minutes; ignored unless positive.
    pub max_time: Option<i64>,
    pub included_ingredients: Vec<String>,
    pub excluded_ingredients: Vec<String>,
    pub page: PageOptions,
}

/// Options for the random-recipes endpoint.
#[derive(Debug, Clone, Default)]
pub struct RandomOptions {
    /// Restrict to recipes with an open license.
    pub limit_license: Option<bool>,
    /// Diet/meal-type/cuisine/intolerance tags the recipes must carry.
    pub tags: Vec<String>,
    /// How many recipes to return, honored within `[1, 100]`.
    pub number: Option<i64>,
}

/// Recipe query functions, cache composition included. Clone-cheap.
#[derive(Clone)]
pub struct RecipeQueries {
    api: Arc<SpoonacularApi>,
    cache: RecipeCache,
}

impl RecipeQueries {
    pub fn new(api: Arc<SpoonacularApi>, cache: RecipeCache) -> Self {
        Self { api, cache }
    }

    /// Get full information for the recipe with the given id.
    ///
    /// Returns `None` for non-positive ids (never dispatched upstream),
    /// for cache misses confirmed gone by a 404, and nothing else. A cached
    /// record missing its ingredients is treated as a miss and refetched —
    /// a later detail fetch may have them — then replaced wholesale.
    pub async fn get_recipe_info(&self, id: i64) -> Result<Option<Recipe>, SpoonacularError> {
        if id <= 0 {
            return Ok(None);
        }

        let cached = self.cache.get(id).await;
        if let Some(recipe) = &cached {
            if recipe.is_complete() {
                return Ok(Some(recipe.clone()));
            }
            debug!(id, "cached recipe has no ingredients, refetching");
        }

        let endpoint = format!("/recipes/{id}/information");
        let params = vec![("includeNutrition".to_string(), "false".to_string())];
        let response = self.api.request(&endpoint, params.clone()).await?;

        match response.status {
            200 => {
                let recipe: Recipe = parse_json(&response.body)
                    .map_err(|e| self.api.parse_error_for(&endpoint, &params, &response, e))?;
                self.cache.put(recipe.clone());
                Ok(Some(recipe))
            }
            404 => {
                if cached.is_some() {
                    self.cache.remove(id);
                }
                Ok(None)
            }
            _ => Err(self.api.error_for(&endpoint, &params, &response)),
        }
    }

    /// Search recipes by title, sorted by popularity.
    ///
    /// Every returned recipe is opportunistically written into the recipe
    /// cache as a summary record (write-through population).
    pub async fn search_recipes_by_title(
        &self,
        search: &str,
        page: PageOptions,
    ) -> Result<SearchResults, SpoonacularError> {
        let params = title_search_params(search, page);
        self.run_search(params).await
    }

    /// Advanced search with tool, time and ingredient filters.
    pub async fn search_recipes(
        &self,
        options: &SearchOptions,
    ) -> Result<SearchResults, SpoonacularError> {
        let params = search_params(options);
        self.run_search(params).await
    }

    async fn run_search(
        &self,
        params: Vec<(String, String)>,
    ) -> Result<SearchResults, SpoonacularError> {
        const ENDPOINT: &str = "/recipes/complexSearch";

        let response = self.api.request(ENDPOINT, params.clone()).await?;
        if response.status != 200 {
            return Err(self.api.error_for(ENDPOINT, &params, &response));
        }

        let results: SearchResults = parse_json(&response.body)
            .map_err(|e| self.api.parse_error_for(ENDPOINT, &params, &response, e))?;
        self.cache.put_many(results.results.clone());
        Ok(results)
    }

    /// Get detailed info about random recipes. Results are not cached —
    /// random picks repeat too rarely to be worth a cache entry.
    pub async fn get_random_recipes(
        &self,
        options: &RandomOptions,
    ) -> Result<RandomRecipes, SpoonacularError> {
        const ENDPOINT: &str = "/recipes/random";

        let params = random_params(options);
        let response = self.api.request(ENDPOINT, params.clone()).await?;
        if response.status != 200 {
            return Err(self.api.error_for(ENDPOINT, &params, &response));
        }

        parse_json(&response.body)
            .map_err(|e| self.api.parse_error_for(ENDPOINT, &params, &response, e))
    }
}

fn push(params: &mut Vec<(String, String)>, name: &str, value: impl ToString) {
    params.push((name.to_string(), value.to_string()));
}

/// Append a pagination parameter when it falls inside its documented
/// bounds; out-of-bounds values are dropped so the upstream default wins.
fn push_bounded(
    params: &mut Vec<(String, String)>,
    name: &str,
    value: Option<i64>,
    min: i64,
    max: i64,
) {
    if let Some(v) = value {
        if (min..=max).contains(&v) {
            push(params, name, v);
        }
    }
}

fn push_page(params: &mut Vec<(String, String)>, page: PageOptions) {
    push_bounded(params, "number", page.number, NUMBER_MIN, NUMBER_MAX);
    push_bounded(params, "offset", page.offset, OFFSET_MIN, OFFSET_MAX);
}

fn title_search_params(search: &str, page: PageOptions) -> Vec<(String, String)> {
    let mut params = Vec::new();
    push(&mut params, "titleMatch", search);
    push_page(&mut params, page);
    push(&mut params, "instructionsRequired", "true");
    push(&mut params, "addRecipeInformation", "true");
    push(&mut params, "sort", "popularity");
    params
}

fn search_params(options: &SearchOptions) -> Vec<(String, String)> {
    let mut params = Vec::new();

    if let Some(title) = options.title.as_deref().filter(|t| !t.is_empty()) {
        push(&mut params, "titleMatch", title);
    }
    if !options.tools.is_empty() {
        push(&mut params, "equipment", options.tools.join(","));
    }
    if let Some(max_time) = options.max_time.filter(|t| *t > 0) {
        push(&mut params, "maxReadyTime", max_time);
    }
    push_page(&mut params, options.page);

    let include = !options.included_ingredients.is_empty();
    let exclude = !options.excluded_ingredients.is_empty();
    if include {
        push(
            &mut params,
            "includeIngredients",
            options.included_ingredients.join(","),
        );
    }
    if exclude {
        push(
            &mut params,
            "excludeIngredients",
            options.excluded_ingredients.join(","),
        );
    }
    if include || exclude {
        // With ingredient filters, ask for match data and sort by fewest
        // missing ingredients.
        push(&mut params, "fillIngredients", "true");
        push(&mut params, "sort", "min-missing-ingredients");
        push(&mut params, "ignorePantry", "true");
    } else {
        push(&mut params, "sort", "popularity");
    }

    push(&mut params, "instructionsRequired", "true");
    push(&mut params, "addRecipeInformation", "true");
    params
}

fn random_params(options: &RandomOptions) -> Vec<(String, String)> {
    let mut params = Vec::new();
    if let Some(limit_license) = options.limit_license {
        push(&mut params, "limitLicense", limit_license);
    }
    if !options.tags.is_empty() {
        push(&mut params, "tags", options.tags.join(","));
    }
    push_bounded(&mut params, "number", options.number, NUMBER_MIN, NUMBER_MAX);
    params
}

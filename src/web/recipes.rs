//! Recipe lookup and search handlers.

use axum::extract::{Path, Query, State};
use axum::response::Response;
use serde::Deserialize;

use crate::spoonacular::queries::{PageOptions, RandomOptions, SearchOptions};
use crate::state::AppState;
use crate::web::error::ApiError;
use crate::web::routes::{cache, with_cache_control};

/// Split a comma-separated query value into trimmed, non-empty items.
fn csv_list(value: Option<&str>) -> Vec<String> {
    value
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub title: Option<String>,
    /// Comma-separated cooking tool names.
    pub tools: Option<String>,
    pub max_time: Option<i64>,
    /// Comma-separated ingredient names to include.
    pub include_ingredients: Option<String>,
    /// Comma-separated ingredient names to exclude.
    pub exclude_ingredients: Option<String>,
    pub number: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RandomQuery {
    pub limit_license: Option<bool>,
    /// Comma-separated tags.
    pub tags: Option<String>,
    pub number: Option<i64>,
}

/// GET /api/recipes/{id} — full recipe detail, cache-first.
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let recipe = state.recipes.get_recipe_info(id).await?;
    match recipe {
        Some(recipe) => Ok(with_cache_control(recipe, cache::DETAIL)),
        None => Err(ApiError::not_found(format!("no recipe with id {id}"))),
    }
}

/// GET /api/recipes/search — advanced search with filters.
pub async fn search_recipes(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Response, ApiError> {
    let options = SearchOptions {
        title: query.title,
        tools: csv_list(query.tools.as_deref()),
        max_time: query.max_time,
        included_ingredients: csv_list(query.include_ingredients.as_deref()),
        excluded_ingredients: csv_list(query.exclude_ingredients.as_deref()),
        page: PageOptions {
            number: query.number,
            offset: query.offset,
        },
    };
    let results = state.recipes.search_recipes(&options).await?;
    Ok(with_cache_control(results, cache::SEARCH))
}

/// GET /api/recipes/random — random recipe picks, never cached.
pub async fn random_recipes(
    State(state): State<AppState>,
    Query(query): Query<RandomQuery>,
) -> Result<Response, ApiError> {
    let options = RandomOptions {
        limit_license: query.limit_license,
        tags: csv_list(query.tags.as_deref()),
        number: query.number,
    };
    let recipes = state.recipes.get_random_recipes(&options).await?;
    Ok(with_cache_control(recipes, cache::NO_STORE))
}

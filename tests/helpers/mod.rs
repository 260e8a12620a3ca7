//! Shared fixtures: a scripted, call-counting transport and in-memory
//! store implementations, wired into a `RecipeQueries` the way `App::new`
//! wires the real ones.

#![allow(dead_code)]

use async_trait::async_trait;
use spoonful::cache::http::{HttpCache, HttpCacheEntry, HttpCacheStore};
use spoonful::cache::recipe::{RecipeCache, RecipeStore};
use spoonful::cache::writeback::Writeback;
use spoonful::spoonacular::client::SpoonacularApi;
use spoonful::spoonacular::queries::RecipeQueries;
use spoonful::spoonacular::transport::{RawResponse, Transport};
use spoonful::spoonacular::types::Recipe;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

pub const BASE_URL: &str = "https://api.example.test";
pub const API_KEY: &str = "test-key-123";

// ---------------------------------------------------------------- transport

/// Transport that pops scripted responses and records every request URL.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<RawResponse>>,
    calls: AtomicUsize,
    urls: Mutex<Vec<Url>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn enqueue(&self, response: RawResponse) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requested_urls(&self) -> Vec<Url> {
        self.urls.lock().unwrap().clone()
    }

    /// Query value of the most recent request, or `None` if absent.
    pub fn last_query_value(&self, name: &str) -> Option<String> {
        let urls = self.urls.lock().unwrap();
        let url = urls.last()?;
        url.query_pairs()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.into_owned())
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, url: &Url) -> anyhow::Result<RawResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.urls.lock().unwrap().push(url.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("no scripted response left"))
    }
}

// ------------------------------------------------------------------- stores

#[derive(Default)]
pub struct MemoryRecipeStore {
    map: Mutex<HashMap<i64, Recipe>>,
}

impl MemoryRecipeStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn seed(&self, recipe: Recipe) {
        self.map.lock().unwrap().insert(recipe.id, recipe);
    }

    pub fn get(&self, id: i64) -> Option<Recipe> {
        self.map.lock().unwrap().get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.map.lock().unwrap().len()
    }
}

#[async_trait]
impl RecipeStore for MemoryRecipeStore {
    async fn find(&self, id: i64) -> anyhow::Result<Option<Recipe>> {
        Ok(self.get(id))
    }

    async fn upsert(&self, recipe: &Recipe) -> anyhow::Result<()> {
        self.seed(recipe.clone());
        Ok(())
    }

    async fn delete(&self, id: i64) -> anyhow::Result<u64> {
        Ok(self.map.lock().unwrap().remove(&id).map_or(0, |_| 1))
    }
}

/// Store whose every operation fails, for storage-degradation tests.
pub struct FailingRecipeStore;

#[async_trait]
impl RecipeStore for FailingRecipeStore {
    async fn find(&self, _id: i64) -> anyhow::Result<Option<Recipe>> {
        Err(anyhow::anyhow!("store unavailable"))
    }

    async fn upsert(&self, _recipe: &Recipe) -> anyhow::Result<()> {
        Err(anyhow::anyhow!("store unavailable"))
    }

    async fn delete(&self, _id: i64) -> anyhow::Result<u64> {
        Err(anyhow::anyhow!("store unavailable"))
    }
}

#[derive(Default)]
pub struct MemoryHttpCacheStore {
    map: Mutex<HashMap<String, HttpCacheEntry>>,
}

impl MemoryHttpCacheStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn len(&self) -> usize {
        self.map.lock().unwrap().len()
    }

    /// Push every stored entry's `stored_at` into the past, making them
    /// stale relative to their own max-age when `by` exceeds it.
    pub fn age_entries(&self, by: chrono::Duration) {
        for entry in self.map.lock().unwrap().values_mut() {
            entry.stored_at = entry.stored_at - by;
        }
    }

    pub fn entries(&self) -> Vec<HttpCacheEntry> {
        self.map.lock().unwrap().values().cloned().collect()
    }
}

#[async_trait]
impl HttpCacheStore for MemoryHttpCacheStore {
    async fn find(&self, request_hash: &str) -> anyhow::Result<Option<HttpCacheEntry>> {
        Ok(self.map.lock().unwrap().get(request_hash).cloned())
    }

    async fn upsert(&self, entry: &HttpCacheEntry) -> anyhow::Result<()> {
        self.map
            .lock()
            .unwrap()
            .insert(entry.request_hash.clone(), entry.clone());
        Ok(())
    }
}

// -------------------------------------------------------------- environment

pub struct TestEnv {
    pub queries: RecipeQueries,
    pub transport: Arc<MockTransport>,
    pub recipe_store: Arc<MemoryRecipeStore>,
    pub http_store: Arc<MemoryHttpCacheStore>,
    pub writeback: Writeback,
}

/// Wire a `RecipeQueries` over in-memory stores and a scripted transport,
/// mirroring the production wiring in `App::new`.
pub fn test_env() -> TestEnv {
    let transport = MockTransport::new();
    let recipe_store = MemoryRecipeStore::new();
    let http_store = MemoryHttpCacheStore::new();
    let writeback = Writeback::start();

    let queries = build_queries(
        transport.clone(),
        recipe_store.clone(),
        http_store.clone(),
        API_KEY,
        &writeback,
    );

    TestEnv {
        queries,
        transport,
        recipe_store,
        http_store,
        writeback,
    }
}

pub fn build_queries(
    transport: Arc<MockTransport>,
    recipe_store: Arc<MemoryRecipeStore>,
    http_store: Arc<MemoryHttpCacheStore>,
    api_key: &str,
    writeback: &Writeback,
) -> RecipeQueries {
    let http_cache = HttpCache::new(http_store, writeback.clone());
    let api = Arc::new(SpoonacularApi::new(
        Url::parse(BASE_URL).unwrap(),
        api_key.to_string(),
        transport,
        http_cache,
        Duration::from_secs(3600),
    ));
    let recipe_cache = RecipeCache::new(recipe_store, writeback.clone());
    RecipeQueries::new(api, recipe_cache)
}

// ----------------------------------------------------------------- payloads

pub fn ok_json(body: impl Into<String>) -> RawResponse {
    RawResponse {
        status: 200,
        status_text: "OK".to_string(),
        headers: vec![
            ("content-type".to_string(), "application/json".to_string()),
            ("x-api-quota-request".to_string(), "1".to_string()),
            ("x-api-quota-left".to_string(), "149".to_string()),
        ],
        body: body.into(),
    }
}

pub fn status_response(status: u16, status_text: &str) -> RawResponse {
    RawResponse {
        status,
        status_text: status_text.to_string(),
        headers: Vec::new(),
        body: String::new(),
    }
}

pub fn full_recipe_json(id: i64, title: &str) -> String {
    format!(
        r#"{{
            "id": {id},
            "title": "{title}",
            "image": "https://img.example.test/{id}.jpg",
            "imageType": "jpg",
            "servings": 4,
            "readyInMinutes": 45,
            "vegetarian": true,
            "analyzedInstructions": [
                {{"name": "", "steps": [
                    {{"number": 1, "step": "Mix everything.", "ingredients": [], "equipment": []}}
                ]}}
            ],
            "extendedIngredients": [
                {{"id": 1, "name": "flour", "amount": 2.0, "unit": "cups"}},
                {{"id": 2, "name": "water", "amount": 1.0, "unit": "cup"}}
            ]
        }}"#
    )
}

pub fn summary_recipe_json(id: i64, title: &str) -> String {
    format!(
        r#"{{"id": {id}, "title": "{title}", "image": "https://img.example.test/{id}.jpg", "imageType": "jpg"}}"#
    )
}

pub fn search_results_json(recipes: &[String]) -> String {
    format!(
        r#"{{"offset": 0, "number": 10, "totalResults": {}, "results": [{}]}}"#,
        recipes.len(),
        recipes.join(",")
    )
}

pub fn summary_recipe(id: i64, title: &str) -> Recipe {
    serde_json::from_str(&summary_recipe_json(id, title)).unwrap()
}

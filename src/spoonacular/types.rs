//! Data types returned by the Spoonacular API.
//!
//! A single [`Recipe`] struct covers both the summary shape returned by
//! search endpoints and the full shape returned by a detail fetch; the
//! detail-only fields are all optional. Unknown fields from the API are
//! ignored on deserialization.

use serde::{Deserialize, Serialize};

/// A recipe as returned by the API and as cached locally.
///
/// Only `id` and `title` are guaranteed; everything else depends on which
/// endpoint produced the value. A recipe is *complete* — usable as a full
/// detail record — once `extended_ingredients` is present and non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: i64,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub servings: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ready_in_minutes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credits_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spoonacular_source_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregate_likes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spoonacular_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_per_serving: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cheap: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diets: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gaps: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dairy_free: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gluten_free: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ketogenic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low_fodmap: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sustainable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vegan: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vegetarian: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whole30: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analyzed_instructions: Option<Vec<AnalyzedInstruction>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extended_ingredients: Option<Vec<ExtendedIngredient>>,
}

impl Recipe {
    /// Whether this record carries full detail data.
    ///
    /// A record without ingredients came from a search response (or a
    /// half-populated detail payload) and must be refetched before being
    /// served as a full detail record.
    pub fn is_complete(&self) -> bool {
        self.extended_ingredients
            .as_ref()
            .is_some_and(|ingredients| !ingredients.is_empty())
    }
}

/// One named instruction section with its ordered steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzedInstruction {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub steps: Vec<InstructionStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructionStep {
    pub number: i64,
    pub step: String,
    #[serde(default)]
    pub ingredients: Vec<InstructionItem>,
    #[serde(default)]
    pub equipment: Vec<InstructionItem>,
}

/// An ingredient or piece of equipment referenced from an instruction step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructionItem {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub localized_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// A fully described ingredient from a recipe detail response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendedIngredient {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aisle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consistency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_clean: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub meta: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub measures: Option<IngredientMeasures>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientMeasures {
    pub us: IngredientMeasure,
    pub metric: IngredientMeasure,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientMeasure {
    pub amount: f64,
    pub unit_short: String,
    pub unit_long: String,
}

/// Envelope returned by `/recipes/complexSearch`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    pub offset: i64,
    pub number: i64,
    pub total_results: i64,
    pub results: Vec<Recipe>,
}

/// Envelope returned by `/recipes/random`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RandomRecipes {
    pub recipes: Vec<Recipe>,
}

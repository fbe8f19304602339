//! AI coach layer
//!
//! Thin client over the Gemini generateContent API for the two request
//! categories the app proxies: free-form coaching chat and structured
//! plan generation (workout plans, diet plans). The core treats the
//! service as a black box: structured responses must parse into the
//! shapes below, and any violation is a recoverable [`AiError`], never
//! a panic or a partial state write.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use aurafit_shared::validation::{validate_calories, validate_sets};
use aurafit_shared::{
    DailyWorkout, DietPlan, Exercise, Macros, Meal, MealType, Recipe, UserProfile,
};

use crate::config::AiConfig;
use crate::error::AiError;

/// Fixed reply substituted when a chat request fails
pub const CHAT_FALLBACK: &str =
    "I'm having a bit of a workout fatigue. Let's try again in a moment!";

// ============================================================================
// Generated payload shapes (schema contract with the AI service)
// ============================================================================

/// Workout as returned by the AI service: no id, no completed flag.
/// The command layer assigns both before the entry enters the log.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedWorkout {
    pub title: String,
    pub duration: String,
    pub calories: f64,
    pub exercises: Vec<GeneratedExercise>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedExercise {
    pub name: String,
    pub sets: u32,
    pub reps: String,
    #[serde(default)]
    pub weight: Option<f64>,
}

impl GeneratedWorkout {
    /// Structural checks beyond what serde typing enforces
    fn validate(&self) -> Result<(), AiError> {
        if self.title.trim().is_empty() {
            return Err(AiError::Schema("workout title is empty".to_string()));
        }
        if self.exercises.is_empty() {
            return Err(AiError::Schema("workout has no exercises".to_string()));
        }
        validate_calories(self.calories).map_err(AiError::Schema)?;
        for exercise in &self.exercises {
            validate_sets(exercise.sets).map_err(AiError::Schema)?;
        }
        Ok(())
    }

    /// Admit into the log shape with a caller-assigned id
    pub fn into_workout(self, id: String) -> DailyWorkout {
        DailyWorkout {
            id,
            title: self.title,
            duration: self.duration,
            calories: self.calories,
            completed: false,
            exercises: self
                .exercises
                .into_iter()
                .map(|e| Exercise {
                    name: e.name,
                    sets: e.sets,
                    reps: e.reps,
                    weight: e.weight,
                    notes: None,
                })
                .collect(),
        }
    }
}

/// Diet plan as returned by the AI service: no id, no timestamp
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedDietPlan {
    pub title: String,
    pub calories: f64,
    pub macros: GeneratedMacros,
    pub meals: Vec<GeneratedMeal>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedMacros {
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedMeal {
    #[serde(rename = "type")]
    pub meal_type: MealType,
    pub dish: String,
    pub recipe: GeneratedRecipe,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedRecipe {
    pub name: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
}

impl GeneratedDietPlan {
    fn validate(&self) -> Result<(), AiError> {
        if self.meals.is_empty() {
            return Err(AiError::Schema("diet plan has no meals".to_string()));
        }
        validate_calories(self.calories).map_err(AiError::Schema)?;
        Ok(())
    }

    /// Admit into the stored shape with id and timestamp assigned by the core
    pub fn into_plan(self, id: String, generated_at: chrono::DateTime<chrono::Utc>) -> DietPlan {
        DietPlan {
            id,
            title: self.title,
            calories: self.calories,
            generated_at,
            macros: Macros {
                protein: self.macros.protein,
                carbs: self.macros.carbs,
                fats: self.macros.fats,
            },
            meals: self
                .meals
                .into_iter()
                .map(|m| Meal {
                    meal_type: m.meal_type,
                    dish: m.dish,
                    recipe: Recipe {
                        name: m.recipe.name,
                        ingredients: m.recipe.ingredients,
                        instructions: m.recipe.instructions,
                    },
                })
                .collect(),
        }
    }
}

/// Inputs for diet-plan generation beyond the profile
#[derive(Debug, Clone)]
pub struct DietRequest {
    pub current_weight_kg: f64,
    pub goal_weight_kg: f64,
    pub goal_type: String,
    pub vegetarian: bool,
    pub available_ingredients: String,
}

// ============================================================================
// Gemini wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType", skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
    error: Option<GeminiApiError>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiApiError {
    message: String,
}

// ============================================================================
// Client
// ============================================================================

/// Gemini-backed coach client
pub struct CoachClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl CoachClient {
    /// Build a client from configuration
    ///
    /// # Errors
    ///
    /// Returns [`AiError::Disabled`] when the AI layer is switched off or
    /// no API key is configured.
    pub fn from_config(config: &AiConfig) -> Result<Self, AiError> {
        if !config.enabled || config.api_key.is_empty() {
            return Err(AiError::Disabled);
        }
        Ok(Self {
            client: Client::new(),
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    /// Free-form coaching reply
    ///
    /// # Errors
    ///
    /// Any transport, API, or empty-response failure; callers that feed a
    /// message list should substitute [`CHAT_FALLBACK`] instead of
    /// propagating.
    pub async fn chat_advice(
        &self,
        message: &str,
        profile: &UserProfile,
    ) -> Result<String, AiError> {
        let request = GeminiRequest {
            contents: vec![user_text(message)],
            system_instruction: Some(GeminiContent {
                role: None,
                parts: vec![GeminiPart {
                    text: Some(coach_persona(profile)),
                }],
            }),
            generation_config: None,
        };
        self.generate(&request).await
    }

    /// Chat with the fixed fallback applied on failure
    pub async fn chat_advice_or_fallback(&self, message: &str, profile: &UserProfile) -> String {
        match self.chat_advice(message, profile).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "Chat request failed, substituting fallback");
                CHAT_FALLBACK.to_string()
            }
        }
    }

    /// Generate a batch of workouts for a free-form request
    ///
    /// # Errors
    ///
    /// Transport/API failures, or a response that is not a JSON array of
    /// the expected workout shape.
    pub async fn generate_workout_plan(
        &self,
        request: &str,
        profile: &UserProfile,
    ) -> Result<Vec<GeneratedWorkout>, AiError> {
        let prompt = workout_plan_prompt(request, profile);
        let text = self.generate_json(&prompt).await?;

        let workouts: Vec<GeneratedWorkout> =
            serde_json::from_str(&text).map_err(|e| AiError::Schema(e.to_string()))?;
        for workout in &workouts {
            workout.validate()?;
        }
        debug!(count = workouts.len(), "Generated workout plan");
        Ok(workouts)
    }

    /// Generate a one-day diet plan
    ///
    /// # Errors
    ///
    /// Transport/API failures, or a response that does not match the diet
    /// plan shape.
    pub async fn generate_diet_plan(
        &self,
        profile: &UserProfile,
        request: &DietRequest,
    ) -> Result<GeneratedDietPlan, AiError> {
        let prompt = diet_plan_prompt(profile, request);
        let text = self.generate_json(&prompt).await?;

        let plan: GeneratedDietPlan =
            serde_json::from_str(&text).map_err(|e| AiError::Schema(e.to_string()))?;
        plan.validate()?;
        Ok(plan)
    }

    /// Structured JSON-mode call returning the raw response text
    async fn generate_json(&self, prompt: &str) -> Result<String, AiError> {
        let request = GeminiRequest {
            contents: vec![user_text(prompt)],
            system_instruction: None,
            generation_config: Some(GenerationConfig {
                response_mime_type: Some("application/json".to_string()),
            }),
        };
        self.generate(&request).await
    }

    async fn generate(&self, request: &GeminiRequest) -> Result<String, AiError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let response = self.client.post(&url).json(request).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<GeminiResponse>(&body)
                .ok()
                .and_then(|r| r.error)
                .map_or_else(|| body.clone(), |e| e.message);
            return Err(AiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GeminiResponse =
            serde_json::from_str(&body).map_err(|e| AiError::Schema(e.to_string()))?;
        if let Some(error) = parsed.error {
            return Err(AiError::Api {
                status: status.as_u16(),
                message: error.message,
            });
        }
        extract_text(&parsed)
    }
}

fn user_text(text: &str) -> GeminiContent {
    GeminiContent {
        role: Some("user".to_string()),
        parts: vec![GeminiPart {
            text: Some(text.to_string()),
        }],
    }
}

fn extract_text(response: &GeminiResponse) -> Result<String, AiError> {
    response
        .candidates
        .as_ref()
        .and_then(|c| c.first())
        .and_then(|c| c.content.as_ref())
        .and_then(|c| c.parts.first())
        .and_then(|p| p.text.clone())
        .ok_or(AiError::MissingContent)
}

// ============================================================================
// Prompts
// ============================================================================

fn coach_persona(profile: &UserProfile) -> String {
    format!(
        "You are a world-class AI Fitness Coach named Aura. The user is {}, a {} fitness \
         enthusiast. Be encouraging and provide scientifically accurate advice for {}.",
        profile.name,
        profile.experience_level.description(),
        profile.goal.description(),
    )
}

fn workout_plan_prompt(request: &str, profile: &UserProfile) -> String {
    format!(
        "The user wants a workout plan with these requirements: \"{}\". \
         User Context: {} {:?}, Goal: {}, Usual Type: {}. \
         Generate a JSON array of workout objects. Each object must have: title (string), \
         duration (string), calories (number), exercises (array of {{name, sets, reps, weight?}}).",
        request,
        profile.experience_level.description(),
        profile.gender,
        profile.goal.description(),
        profile.workout_type.description(),
    )
}

fn diet_plan_prompt(profile: &UserProfile, request: &DietRequest) -> String {
    let dietary = if request.vegetarian {
        "Strictly Vegetarian (Indian style)"
    } else {
        "Non-Vegetarian (Eggs/Chicken allowed)"
    };
    let ingredients = if request.available_ingredients.is_empty() {
        "No ingredients specified. Use affordable, nutrient-dense Indian staples like Moong Dal, \
         Oats, Eggs, Paneer, Curd, seasonal vegetables."
            .to_string()
    } else {
        format!("User has these at home: {}", request.available_ingredients)
    };

    format!(
        "Generate a 1-day highly optimized, budget-friendly Indian diet plan.\n\
         User Profile: {:?}.\n\
         Current Weight: {}kg.\n\
         Goal Weight: {}kg.\n\
         Goal Strategy: {} (Focus on high protein and high fiber if fat cut).\n\
         Dietary Preference: {}.\n\
         Ingredient Context: {}.\n\
         The plan must include a calorie and macro breakdown (protein, carbs, fats in grams), \
         exactly 4 meals (Breakfast, Lunch, Snacks, Dinner), and complete recipes. \
         Return strictly a JSON object with: title, calories, macros {{protein, carbs, fats}}, \
         meals (array of {{type, dish, recipe {{name, ingredients, instructions}}}}).",
        profile.gender,
        request.current_weight_kg,
        request.goal_weight_kg,
        request.goal_type,
        dietary,
        ingredients,
    )
}

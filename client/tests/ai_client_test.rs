//! Integration tests for the AI coach client against a mock Gemini server

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use aurafit_client::ai::{CoachClient, DietRequest, CHAT_FALLBACK};
use aurafit_client::config::AiConfig;
use aurafit_client::error::AiError;
use aurafit_shared::{MealType, UserProfile};

fn test_config(server: &MockServer) -> AiConfig {
    AiConfig {
        enabled: true,
        api_key: "test-key".to_string(),
        base_url: server.uri(),
        model: "gemini-2.5-flash".to_string(),
    }
}

fn text_response(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP"
        }]
    }))
}

#[tokio::test]
async fn test_chat_returns_reply_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-flash:generateContent"))
        .and(query_param("key", "test-key"))
        .respond_with(text_response("Great job staying consistent!"))
        .expect(1)
        .mount(&server)
        .await;

    let coach = CoachClient::from_config(&test_config(&server)).unwrap();
    let reply = coach
        .chat_advice("How is my streak?", &UserProfile::seed())
        .await
        .unwrap();
    assert_eq!(reply, "Great job staying consistent!");
}

#[tokio::test]
async fn test_chat_failure_substitutes_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "error": {"code": 500, "message": "internal", "status": "INTERNAL"}
        })))
        .mount(&server)
        .await;

    let coach = CoachClient::from_config(&test_config(&server)).unwrap();
    let reply = coach
        .chat_advice_or_fallback("hello", &UserProfile::seed())
        .await;
    assert_eq!(reply, CHAT_FALLBACK);
}

#[tokio::test]
async fn test_chat_api_error_carries_status_and_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
            "error": {"code": 429, "message": "quota exceeded", "status": "RESOURCE_EXHAUSTED"}
        })))
        .mount(&server)
        .await;

    let coach = CoachClient::from_config(&test_config(&server)).unwrap();
    let err = coach
        .chat_advice("hello", &UserProfile::seed())
        .await
        .unwrap_err();
    match err {
        AiError::Api { status, message } => {
            assert_eq!(status, 429);
            assert_eq!(message, "quota exceeded");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_generate_workout_plan_parses_array() {
    let payload = serde_json::json!([
        {
            "title": "Full Body Blast",
            "duration": "45 min",
            "calories": 350,
            "exercises": [
                {"name": "Squats", "sets": 4, "reps": "12", "weight": 60},
                {"name": "Push-ups", "sets": 3, "reps": "15"}
            ]
        },
        {
            "title": "Cardio Burn",
            "duration": "30 min",
            "calories": 280,
            "exercises": [{"name": "Burpees", "sets": 3, "reps": "10"}]
        }
    ]);
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(text_response(&payload.to_string()))
        .mount(&server)
        .await;

    let coach = CoachClient::from_config(&test_config(&server)).unwrap();
    let workouts = coach
        .generate_workout_plan("two sessions please", &UserProfile::seed())
        .await
        .unwrap();

    assert_eq!(workouts.len(), 2);
    assert_eq!(workouts[0].title, "Full Body Blast");
    assert_eq!(workouts[0].exercises.len(), 2);
    assert_eq!(workouts[1].calories, 280.0);
}

#[tokio::test]
async fn test_generate_workout_plan_rejects_malformed_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(text_response("Sure! Here is a plan: squats and rows."))
        .mount(&server)
        .await;

    let coach = CoachClient::from_config(&test_config(&server)).unwrap();
    let err = coach
        .generate_workout_plan("a plan", &UserProfile::seed())
        .await
        .unwrap_err();
    assert!(matches!(err, AiError::Schema(_)));
}

#[tokio::test]
async fn test_generate_workout_plan_rejects_invalid_values() {
    // Well-formed JSON, but zero sets fails structural validation
    let payload = serde_json::json!([{
        "title": "Bad Plan",
        "duration": "20 min",
        "calories": 150,
        "exercises": [{"name": "Nothing", "sets": 0, "reps": "0"}]
    }]);
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(text_response(&payload.to_string()))
        .mount(&server)
        .await;

    let coach = CoachClient::from_config(&test_config(&server)).unwrap();
    let err = coach
        .generate_workout_plan("a plan", &UserProfile::seed())
        .await
        .unwrap_err();
    assert!(matches!(err, AiError::Schema(_)));
}

#[tokio::test]
async fn test_generate_diet_plan_parses_object() {
    let payload = serde_json::json!({
        "title": "Budget Cut Plan",
        "calories": 1750,
        "macros": {"protein": 135, "carbs": 160, "fats": 48},
        "meals": [
            {"type": "Breakfast", "dish": "Masala Oats",
             "recipe": {"name": "Masala Oats", "ingredients": ["oats", "veggies"],
                        "instructions": ["toast oats", "simmer"]}},
            {"type": "Lunch", "dish": "Dal Rice",
             "recipe": {"name": "Dal Tadka", "ingredients": ["moong dal", "rice"],
                        "instructions": ["pressure cook"]}},
            {"type": "Snacks", "dish": "Roasted Chana",
             "recipe": {"name": "Roasted Chana", "ingredients": ["chana"],
                        "instructions": ["roast"]}},
            {"type": "Dinner", "dish": "Paneer Bhurji",
             "recipe": {"name": "Paneer Bhurji", "ingredients": ["paneer"],
                        "instructions": ["scramble"]}}
        ]
    });
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(text_response(&payload.to_string()))
        .mount(&server)
        .await;

    let coach = CoachClient::from_config(&test_config(&server)).unwrap();
    let request = DietRequest {
        current_weight_kg: 72.0,
        goal_weight_kg: 67.0,
        goal_type: "Fat Cut".to_string(),
        vegetarian: true,
        available_ingredients: "oats, moong dal, paneer".to_string(),
    };
    let plan = coach
        .generate_diet_plan(&UserProfile::seed(), &request)
        .await
        .unwrap();

    assert_eq!(plan.title, "Budget Cut Plan");
    assert_eq!(plan.meals.len(), 4);
    assert_eq!(plan.meals[0].meal_type, MealType::Breakfast);
    assert_eq!(plan.macros.protein, 135.0);
}

#[tokio::test]
async fn test_empty_candidates_is_missing_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": []
        })))
        .mount(&server)
        .await;

    let coach = CoachClient::from_config(&test_config(&server)).unwrap();
    let err = coach
        .chat_advice("hello", &UserProfile::seed())
        .await
        .unwrap_err();
    assert!(matches!(err, AiError::MissingContent));
}

//! Input validation functions
//!
//! Session commands treat a failed validation as a silent no-op on that
//! field, so these return the reason mainly for logging.

/// Validate a display name: non-empty after trimming, bounded length
pub fn validate_name(name: &str) -> Result<(), String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Name cannot be empty".to_string());
    }
    if trimmed.len() > 100 {
        return Err("Name too long".to_string());
    }
    Ok(())
}

/// Validate weight value (in kg)
pub fn validate_weight_kg(weight_kg: f64) -> Result<(), String> {
    if weight_kg.is_nan() || weight_kg.is_infinite() {
        return Err("Weight must be a valid number".to_string());
    }
    if weight_kg < 20.0 {
        return Err("Weight must be at least 20 kg".to_string());
    }
    if weight_kg > 500.0 {
        return Err("Weight must be at most 500 kg".to_string());
    }
    Ok(())
}

/// Validate height value (in cm)
pub fn validate_height_cm(height_cm: f64) -> Result<(), String> {
    if height_cm.is_nan() || height_cm.is_infinite() {
        return Err("Height must be a valid number".to_string());
    }
    if height_cm < 50.0 {
        return Err("Height must be at least 50 cm".to_string());
    }
    if height_cm > 300.0 {
        return Err("Height must be at most 300 cm".to_string());
    }
    Ok(())
}

/// Validate age in years
pub fn validate_age(age: u32) -> Result<(), String> {
    if age < 1 {
        return Err("Age must be at least 1 year".to_string());
    }
    if age > 150 {
        return Err("Age cannot exceed 150 years".to_string());
    }
    Ok(())
}

/// Validate a calorie value
pub fn validate_calories(calories: f64) -> Result<(), String> {
    if calories.is_nan() || calories.is_infinite() {
        return Err("Calories must be a valid number".to_string());
    }
    if calories < 0.0 {
        return Err("Calories cannot be negative".to_string());
    }
    if calories > 50000.0 {
        return Err("Calorie value unreasonably high".to_string());
    }
    Ok(())
}

/// Validate a set count for an exercise
pub fn validate_sets(sets: u32) -> Result<(), String> {
    if sets == 0 {
        return Err("Sets must be positive".to_string());
    }
    if sets > 50 {
        return Err("Set count unreasonably high".to_string());
    }
    Ok(())
}

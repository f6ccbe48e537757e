use uuid::Uuid;

use super::{
    dto::{GeneratedWorkout, SaveWorkoutRequest},
    repo_types::NewWorkoutPlan,
};
use crate::{
    ai::parse::{parse_model_json, PlanParseError},
    errors::ApiError,
};

pub const FEATURED_LIMIT: i64 = 5;
pub const RECENT_LIMIT: i64 = 6;
pub const MAX_PAGE: i64 = 100;

/// Parses a plan id sent as a string. A missing id is a bad request; one that
/// is not a UUID cannot name any row, so it reads as not found.
pub fn parse_plan_id(
    raw: Option<&str>,
    missing: &'static str,
    not_found: &'static str,
) -> Result<Uuid, ApiError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::bad_request(missing))?;
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found(not_found))
}

fn required(s: Option<String>) -> Option<String> {
    s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn has_entries(v: &serde_json::Value) -> bool {
    match v {
        serde_json::Value::Object(m) => !m.is_empty(),
        serde_json::Value::Array(a) => !a.is_empty(),
        _ => false,
    }
}

pub fn validate_new_workout(req: SaveWorkoutRequest) -> Result<NewWorkoutPlan, ApiError> {
    let missing = || ApiError::bad_request("Missing required fields.");
    Ok(NewWorkoutPlan {
        routine_name: required(req.routine_name).ok_or_else(missing)?,
        no_of_exercises: req.no_of_exercises.filter(|n| *n > 0).ok_or_else(missing)?,
        estimated_duration: required(req.estimated_duration).ok_or_else(missing)?,
        exercises: req.exercises.filter(has_entries).ok_or_else(missing)?,
        category: required(req.category).ok_or_else(missing)?,
        calories: req.calories.filter(|n| *n > 0).ok_or_else(missing)?,
    })
}

/// Parses model output into a workout with at least one exercise. The
/// exercise count is taken from the map when the model left it out.
pub fn parse_generated_workout(raw: &str) -> Result<GeneratedWorkout, PlanParseError> {
    let mut plan: GeneratedWorkout = parse_model_json(raw)?;
    if plan.routine_name.trim().is_empty() {
        return Err(PlanParseError::Incomplete("routineName"));
    }
    if plan.exercises.is_empty() {
        return Err(PlanParseError::Incomplete("exercises"));
    }
    if plan.no_of_exercises <= 0 {
        plan.no_of_exercises = plan.exercises.len() as i32;
    }
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const MODEL_REPLY: &str = r#"Sure! Here is your plan:
```json
{
  "routineName": "Core Crusher",
  "noOfExercises": "2",
  "estimatedDuration": "30 mins",
  "category": "intermediate",
  "calories": 250,
  "exercises": {
    "2": {"name": "Plank", "estimatedTime": "2 mins", "videoURL": "https://v/plank"},
    "1": {"name": "Crunch", "repsAndSets": "3x15"},
    "10": {"name": "Bridge"}
  }
}
```"#;

    #[test]
    fn parses_fenced_workout_in_index_order() {
        let plan = parse_generated_workout(MODEL_REPLY).unwrap();
        assert_eq!(plan.routine_name, "Core Crusher");
        assert_eq!(plan.no_of_exercises, 2);
        assert_eq!(plan.calories, 250);
        let names: Vec<_> = plan.exercises.values().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Crunch", "Plank", "Bridge"]);
        assert_eq!(plan.exercises[&2].video_url.as_deref(), Some("https://v/plank"));
    }

    #[test]
    fn serialises_with_string_keys() {
        let plan = parse_generated_workout(MODEL_REPLY).unwrap();
        let v = serde_json::to_value(&plan).unwrap();
        assert_eq!(v["exercises"]["1"]["name"], "Crunch");
        assert_eq!(v["exercises"]["1"]["repsAndSets"], "3x15");
        assert_eq!(v["routineName"], "Core Crusher");
    }

    #[test]
    fn fills_missing_exercise_count() {
        let plan = parse_generated_workout(
            r#"{"routineName": "Quick", "exercises": {"1": {"name": "Squat"}}}"#,
        )
        .unwrap();
        assert_eq!(plan.no_of_exercises, 1);
    }

    #[test]
    fn rejects_plan_without_exercises() {
        let err = parse_generated_workout(r#"{"routineName": "Empty", "exercises": {}}"#)
            .unwrap_err();
        assert!(matches!(err, PlanParseError::Incomplete("exercises")));
    }

    #[test]
    fn rejects_non_json_reply() {
        let err = parse_generated_workout("I cannot do that.").unwrap_err();
        assert!(matches!(err, PlanParseError::NoJson));
    }

    fn full_request() -> SaveWorkoutRequest {
        serde_json::from_value(json!({
            "routineName": " Leg Day ",
            "noOfExercises": 3,
            "estimatedDuration": "40 mins",
            "exercises": {"1": {"name": "Squat"}},
            "category": "beginner",
            "calories": "320"
        }))
        .unwrap()
    }

    #[test]
    fn accepts_complete_workout() {
        let plan = validate_new_workout(full_request()).unwrap();
        assert_eq!(plan.routine_name, "Leg Day");
        assert_eq!(plan.calories, 320);
        assert_eq!(plan.no_of_exercises, 3);
    }

    #[test]
    fn rejects_missing_or_zero_fields() {
        let mut req = full_request();
        req.calories = Some(0);
        assert!(matches!(validate_new_workout(req), Err(ApiError::BadRequest(_))));

        let mut req = full_request();
        req.exercises = Some(json!({}));
        assert!(matches!(validate_new_workout(req), Err(ApiError::BadRequest(_))));

        let mut req = full_request();
        req.category = Some("   ".into());
        assert!(matches!(validate_new_workout(req), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn plan_id_parsing() {
        assert!(matches!(
            parse_plan_id(None, "Workout ID is required", "Workout not found"),
            Err(ApiError::BadRequest(_))
        ));
        assert!(matches!(
            parse_plan_id(Some("abc"), "Workout ID is required", "Workout not found"),
            Err(ApiError::NotFound(_))
        ));
        let id = Uuid::new_v4();
        assert_eq!(
            parse_plan_id(Some(&id.to_string()), "m", "n").unwrap(),
            id
        );
    }
}

use super::{
    dto::{FitnessRequest, FitnessStats},
    repo_types::{NewPhysicalFitness, PhysicalFitness},
};
use crate::errors::ApiError;

pub const GENDERS: &[&str] = &["male", "female", "other"];
pub const PRIMARY_GOALS: &[&str] = &[
    "weight-loss",
    "muscle-gain",
    "endurance",
    "flexibility",
    "general-fitness",
];
pub const FITNESS_LEVELS: &[&str] = &["beginner", "intermediate", "advanced"];
pub const WORKOUT_LOCATIONS: &[&str] = &["home", "gym", "outdoors", "mixed"];

fn one_of(value: Option<String>, allowed: &[&str], msg: &'static str) -> Result<String, ApiError> {
    value
        .map(|v| v.trim().to_ascii_lowercase())
        .filter(|v| allowed.contains(&v.as_str()))
        .ok_or_else(|| ApiError::bad_request(msg))
}

fn positive<T: PartialOrd + Default>(value: Option<T>, msg: &'static str) -> Result<T, ApiError> {
    value
        .filter(|v| *v > T::default())
        .ok_or_else(|| ApiError::bad_request(msg))
}

pub fn validate_fitness(req: FitnessRequest) -> Result<NewPhysicalFitness, ApiError> {
    const PER_WEEK: &str = "Please select how many workouts per week.";
    let fitness = NewPhysicalFitness {
        age: positive(req.age, "Please enter a valid age.")?,
        gender: one_of(req.gender, GENDERS, "Please select your gender.")?,
        height: positive(req.height, "Please enter a valid height.")?,
        weight: positive(req.weight, "Please enter a valid weight.")?,
        fitness_level: one_of(
            req.fitness_level,
            FITNESS_LEVELS,
            "Please select your current fitness level.",
        )?,
        primary_goal: one_of(
            req.primary_goal,
            PRIMARY_GOALS,
            "Please select a primary fitness goal.",
        )?,
        workout_duration: positive(
            req.workout_duration,
            "Please select your preferred workout duration.",
        )?,
        workout_location: one_of(
            req.workout_location,
            WORKOUT_LOCATIONS,
            "Please select where you plan to work out.",
        )?,
        workouts_per_week: positive(req.workouts_per_week, PER_WEEK)?,
        additional_info: req
            .additional_info
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
    };
    if fitness.workouts_per_week > 7 {
        return Err(ApiError::bad_request(PER_WEEK));
    }
    Ok(fitness)
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

pub fn bmi_category(bmi: f64) -> &'static str {
    match bmi {
        b if b < 18.5 => "underweight",
        b if b < 25.0 => "normal",
        b if b < 30.0 => "overweight",
        _ => "obese",
    }
}

/// BMI from height in cm and weight in kg, plus the share of the week the
/// user plans to train.
pub fn fitness_stats(p: &PhysicalFitness) -> Option<FitnessStats> {
    if p.height <= 0.0 || p.weight <= 0.0 {
        return None;
    }
    let meters = p.height / 100.0;
    let bmi = round1(p.weight / (meters * meters));
    Some(FitnessStats {
        bmi,
        bmi_category: bmi_category(bmi),
        weekly_activity_percent: round1(p.workouts_per_week as f64 / 7.0 * 100.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn request() -> FitnessRequest {
        serde_json::from_value(json!({
            "age": "29",
            "gender": "Female",
            "height": "168",
            "weight": 61.5,
            "primaryGoal": "endurance",
            "fitnessLevel": "intermediate",
            "workoutsPerWeek": "4",
            "workoutDuration": "45",
            "workoutLocation": "home",
            "additionalInfo": "  "
        }))
        .unwrap()
    }

    #[test]
    fn accepts_numeric_strings_and_normalises_choices() {
        let f = validate_fitness(request()).unwrap();
        assert_eq!(f.age, 29);
        assert_eq!(f.gender, "female");
        assert_eq!(f.height, 168.0);
        assert_eq!(f.workouts_per_week, 4);
        assert_eq!(f.additional_info, None);
    }

    #[test]
    fn rejects_unknown_choice() {
        let mut req = request();
        req.workout_location = Some("moon".into());
        match validate_fitness(req) {
            Err(ApiError::BadRequest(msg)) => {
                assert_eq!(msg, "Please select where you plan to work out.")
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn rejects_missing_or_non_positive_numbers() {
        let mut req = request();
        req.age = None;
        assert!(matches!(validate_fitness(req), Err(ApiError::BadRequest(_))));

        let mut req = request();
        req.weight = Some(0.0);
        assert!(matches!(validate_fitness(req), Err(ApiError::BadRequest(_))));

        let mut req = request();
        req.workouts_per_week = Some(8);
        assert!(matches!(validate_fitness(req), Err(ApiError::BadRequest(_))));

        let req: FitnessRequest = serde_json::from_value(json!({"age": "abc"})).unwrap();
        assert!(matches!(validate_fitness(req), Err(ApiError::BadRequest(_))));
    }

    fn profile(height: f64, weight: f64, per_week: i32) -> PhysicalFitness {
        PhysicalFitness {
            id: Uuid::new_v4(),
            user_email: "a@b.co".into(),
            age: 30,
            gender: "male".into(),
            height,
            weight,
            fitness_level: "beginner".into(),
            primary_goal: "weight-loss".into(),
            workout_duration: 30,
            workout_location: "gym".into(),
            workouts_per_week: per_week,
            additional_info: None,
            last_updated: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn computes_bmi_and_weekly_share() {
        let stats = fitness_stats(&profile(180.0, 81.0, 3)).unwrap();
        assert_eq!(stats.bmi, 25.0);
        assert_eq!(stats.bmi_category, "overweight");
        assert_eq!(stats.weekly_activity_percent, 42.9);
    }

    #[test]
    fn no_stats_without_measurements() {
        assert!(fitness_stats(&profile(0.0, 70.0, 3)).is_none());
    }

    #[test]
    fn bmi_bands() {
        assert_eq!(bmi_category(17.0), "underweight");
        assert_eq!(bmi_category(22.3), "normal");
        assert_eq!(bmi_category(31.0), "obese");
    }
}

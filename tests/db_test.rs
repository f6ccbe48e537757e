//! Router tests against a migrated database. `sqlx::test` creates a fresh
//! database per test from `DATABASE_URL`.

mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};
use sqlx::PgPool;

use common::{db_app, TestRequest};

const OWNER: &str = "owner@example.com";

async fn insert_owner(db: &PgPool) {
    sqlx::query("INSERT INTO users (email) VALUES ($1)")
        .bind(OWNER)
        .execute(db)
        .await
        .unwrap();
}

async fn insert_workout(db: &PgPool, name: &str, no_of_users: i32) {
    sqlx::query(
        "INSERT INTO workout_plans \
         (routine_name, no_of_exercises, estimated_duration, no_of_users, category, calories, user_email) \
         VALUES ($1, 3, '30 mins', $2, 'strength', 250, $3)",
    )
    .bind(name)
    .bind(no_of_users)
    .bind(OWNER)
    .execute(db)
    .await
    .unwrap();
}

async fn insert_diet(db: &PgPool, name: &str, rating: f64, meals: Value) -> String {
    let (id,): (uuid::Uuid,) = sqlx::query_as(
        "INSERT INTO diet_plans \
         (name, description, duration, meals, meals_per_day, difficulty, rating, total_calories, user_email) \
         VALUES ($1, 'plan', 1, $2, 2, 'easy', $3, 1800, $4) RETURNING id",
    )
    .bind(name)
    .bind(meals)
    .bind(rating)
    .bind(OWNER)
    .fetch_one(db)
    .await
    .unwrap();
    id.to_string()
}

async fn count(db: &PgPool, table: &str) -> i64 {
    let (n,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(db)
        .await
        .unwrap();
    n
}

/// Registers a user and returns their access token.
async fn register(db: &PgPool, email: &str) -> String {
    let (app, _) = db_app(db.clone(), "{}");
    let res = TestRequest::post("/api/auth/register")
        .json(&json!({"email": email, "password": "longenough"}))
        .send(app)
        .await;
    assert_eq!(res.status, StatusCode::CREATED, "{}", res.text());
    res.json()["access_token"].as_str().unwrap().to_owned()
}

async fn onboard(db: &PgPool, token: &str) {
    let (app, _) = db_app(db.clone(), "{}");
    let res = TestRequest::post("/api/onboarding")
        .bearer(token)
        .json(&json!({
            "age": 30,
            "gender": "female",
            "height": 170,
            "weight": 65,
            "primaryGoal": "endurance",
            "fitnessLevel": "beginner",
            "workoutsPerWeek": 3,
            "workoutDuration": 45,
            "workoutLocation": "home"
        }))
        .send(app)
        .await;
    assert_eq!(res.status, StatusCode::CREATED, "{}", res.text());
}

#[sqlx::test(migrations = "./migrations")]
async fn featured_workouts_are_the_five_most_used(db: PgPool) {
    insert_owner(&db).await;
    for (name, users) in [("a", 4), ("b", 70), ("c", 12), ("d", 0), ("e", 33), ("f", 9), ("g", 51)] {
        insert_workout(&db, name, users).await;
    }

    let (app, _) = db_app(db, "{}");
    let res = TestRequest::get("/api/workouts/featured").send(app).await;
    assert_eq!(res.status, StatusCode::OK);

    let users: Vec<i64> = res.json()["workouts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|w| w["noOfUsers"].as_i64().unwrap())
        .collect();
    assert_eq!(users, vec![70, 51, 33, 12, 9]);
}

#[sqlx::test(migrations = "./migrations")]
async fn bulk_diet_plans_are_the_six_best_rated(db: PgPool) {
    insert_owner(&db).await;
    for (i, rating) in [3.5, 4.9, 1.0, 4.1, 2.2, 5.0, 0.5, 3.9].into_iter().enumerate() {
        insert_diet(&db, &format!("plan {i}"), rating, json!([])).await;
    }

    let (app, _) = db_app(db, "{}");
    let res = TestRequest::get("/api/diet-plans/bulk").send(app).await;
    assert_eq!(res.status, StatusCode::OK);

    let ratings: Vec<f64> = res
        .json()
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["rating"].as_f64().unwrap())
        .collect();
    assert_eq!(ratings, vec![5.0, 4.9, 4.1, 3.9, 3.5, 2.2]);
}

#[sqlx::test(migrations = "./migrations")]
async fn diet_plan_marks_unknown_dishes(db: PgPool) {
    insert_owner(&db).await;
    sqlx::query("INSERT INTO dishes (name, calories, fibre) VALUES ('Oats', 310, '3g')")
        .execute(&db)
        .await
        .unwrap();
    let id = insert_diet(&db, "mixed", 4.0, json!([{"day": 1, "meals": ["Oats", "Moon Cheese"]}])).await;

    let (app, _) = db_app(db, "{}");
    let res = TestRequest::post("/api/diet-plans/id")
        .json(&json!({"diet_id": id}))
        .send(app)
        .await;
    assert_eq!(res.status, StatusCode::OK, "{}", res.text());

    let meals = &res.json()["meals"][0]["meals"];
    assert_eq!(meals[0]["name"], "Oats");
    assert_eq!(meals[1], json!({"name": "Moon Cheese", "error": "Dish not found"}));
}

#[sqlx::test(migrations = "./migrations")]
async fn deleting_a_user_removes_everything_they_own(db: PgPool) {
    let token = register(&db, "sam@example.com").await;
    onboard(&db, &token).await;

    let (app, _) = db_app(db.clone(), "{}");
    let res = TestRequest::post("/api/workouts/save-workout")
        .bearer(&token)
        .json(&json!({
            "routineName": "Push day",
            "noOfExercises": 1,
            "estimatedDuration": "20 mins",
            "exercises": {"1": {"name": "Push-up"}},
            "category": "strength",
            "calories": 150
        }))
        .send(app)
        .await;
    assert_eq!(res.status, StatusCode::CREATED, "{}", res.text());
    let workout_id = res.json()["workout"]["id"].as_str().unwrap().to_owned();

    let (app, _) = db_app(db.clone(), "{}");
    let res = TestRequest::post("/api/diet-plans/save-diet-plan")
        .bearer(&token)
        .json(&json!({
            "name": "Lean week",
            "description": "light",
            "duration": 1,
            "meals": [{"day": 1, "meals": ["Oats"]}],
            "mealsPerDay": 1,
            "difficulty": "easy",
            "rating": 4,
            "totalCalories": 1500
        }))
        .send(app)
        .await;
    assert_eq!(res.status, StatusCode::CREATED, "{}", res.text());
    let diet_id = res.json()["dietPlan"]["id"].as_str().unwrap().to_owned();

    let (app, _) = db_app(db.clone(), "{}");
    let res = TestRequest::post("/api/workouts/complete")
        .bearer(&token)
        .json(&json!({"workoutPlanId": workout_id, "caloriesBurned": 150}))
        .send(app)
        .await;
    assert_eq!(res.status, StatusCode::CREATED, "{}", res.text());

    let (app, _) = db_app(db.clone(), "{}");
    let res = TestRequest::post("/api/diet-plans/complete")
        .bearer(&token)
        .json(&json!({"dietPlanId": diet_id, "caloriesConsumed": 1500}))
        .send(app)
        .await;
    assert_eq!(res.status, StatusCode::CREATED, "{}", res.text());

    assert_eq!(count(&db, "sessions").await, 1);

    let (app, _) = db_app(db.clone(), "{}");
    let res = TestRequest::delete("/api/user").bearer(&token).send(app).await;
    assert_eq!(res.status, StatusCode::NO_CONTENT);

    for table in [
        "users",
        "sessions",
        "physical_fitness",
        "workout_plans",
        "diet_plans",
        "workout_completions",
        "diet_plan_completions",
    ] {
        assert_eq!(count(&db, table).await, 0, "{table} not emptied");
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn unusable_model_output_is_a_bad_gateway(db: PgPool) {
    let token = register(&db, "sam@example.com").await;
    onboard(&db, &token).await;

    let (app, _) = db_app(db.clone(), "Sorry, I can't build a plan today.");
    let res = TestRequest::post("/api/diet-plans/generate-diet-plan")
        .bearer(&token)
        .json(&json!({"preferences": "vegetarian"}))
        .send(app)
        .await;
    assert_eq!(res.status, StatusCode::BAD_GATEWAY);
    assert_eq!(res.error(), "AI response could not be parsed");

    let (app, _) = db_app(db, "```json\n{\"routineName\": \"x\"}\n```");
    let res = TestRequest::post("/api/workout-generator")
        .bearer(&token)
        .json(&json!({"preferences": "short sessions"}))
        .send(app)
        .await;
    assert_eq!(res.status, StatusCode::BAD_GATEWAY);
    assert_eq!(res.error(), "AI response could not be parsed");
}

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{debug, info, instrument, warn};

use super::{
    dto::{DietIdRequest, ExpandedDietPlan, GeneratedDietPlan, SaveDietPlanRequest, SavedDietPlan},
    repo,
    repo_types::DietPlan,
    services::{
        distinct_names, expand_meals, expanded_plan, parse_generated_diet, stored_meal_names,
        validate_new_diet, BULK_LIMIT,
    },
};
use crate::{
    ai::{
        dto::{GenerateRequest, GeneratedResponse},
        parse::unparsable,
        prompts::diet_prompt,
    },
    auth::{services::current_user, AuthUser},
    catalog,
    errors::{internal, ApiError},
    extractors::ApiJson,
    state::AppState,
    workouts::services::parse_plan_id,
};

pub fn diet_routes() -> Router<AppState> {
    Router::new()
        .route("/diet-plans/bulk", get(bulk_diet_plans))
        .route("/diet-plans/id", post(get_diet_plan))
        .route("/diet-plans/save-diet-plan", post(save_diet_plan))
        .route("/diet-plans/generate-diet-plan", post(generate_diet_plan))
}

#[instrument(skip(state))]
pub async fn bulk_diet_plans(State(state): State<AppState>) -> Result<Json<Vec<DietPlan>>, ApiError> {
    let plans = repo::list_top_rated(&state.db, BULK_LIMIT)
        .await
        .map_err(internal("list diet plans failed"))?;
    Ok(Json(plans))
}

#[instrument(skip(state, body))]
pub async fn get_diet_plan(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<DietIdRequest>,
) -> Result<Json<ExpandedDietPlan>, ApiError> {
    let id = parse_plan_id(
        body.diet_id.as_deref(),
        "Diet plan ID is required",
        "Diet plan not found",
    )?;
    let plan = repo::find_by_id(&state.db, id)
        .await
        .map_err(internal("find diet plan failed"))?
        .ok_or_else(|| ApiError::not_found("Diet plan not found"))?;

    let days = stored_meal_names(&plan.meals).map_err(internal("stored meals unreadable"))?;
    let names = distinct_names(&days);
    let dishes = catalog::repo::find_dishes_by_names(&state.db, &names)
        .await
        .map_err(internal("find dishes failed"))?;
    if dishes.len() < names.len() {
        debug!(diet_id = %id, missing = names.len() - dishes.len(), "plan references unknown dishes");
    }

    let meals = expand_meals(days, &dishes);
    Ok(Json(expanded_plan(plan, meals)))
}

#[instrument(skip(state, body))]
pub async fn save_diet_plan(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(body): ApiJson<SaveDietPlanRequest>,
) -> Result<(StatusCode, Json<SavedDietPlan>), ApiError> {
    let plan = validate_new_diet(body).map_err(|e| {
        warn!(%user_id, "save diet plan with missing fields");
        e
    })?;
    let user = current_user(&state, user_id).await?;

    let diet_plan = repo::insert(&state.db, &plan, &user.email)
        .await
        .map_err(internal("insert diet plan failed"))?;

    info!(%user_id, diet_id = %diet_plan.id, "diet plan saved");
    Ok((
        StatusCode::CREATED,
        Json(SavedDietPlan {
            message: "Diet plan saved successfully!",
            diet_plan,
        }),
    ))
}

#[instrument(skip(state, body))]
pub async fn generate_diet_plan(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(body): ApiJson<GenerateRequest>,
) -> Result<Json<GeneratedResponse<GeneratedDietPlan>>, ApiError> {
    let preferences = body.preferences()?;
    let user = current_user(&state, user_id).await?;

    let dishes = catalog::repo::list_dishes(&state.db)
        .await
        .map_err(internal("list dishes failed"))?;

    let prompt = diet_prompt(&dishes, preferences);
    let raw = state
        .ai
        .generate(&prompt)
        .await
        .map_err(internal("diet generation failed"))?;
    let mut plan = parse_generated_diet(&raw).map_err(unparsable(&raw))?;
    plan.user_email = user.email;

    info!(%user_id, days = plan.meals.len(), "diet plan generated");
    Ok(Json(GeneratedResponse {
        message: "Diet plan generated successfully",
        plan,
    }))
}

use std::collections::{BTreeSet, HashMap};

use super::{
    dto::{
        DayNutrition, ExpandedDietPlan, ExpandedMeal, GeneratedDietPlan, MealRef,
        NutritionSummary, NutritionTotals, SaveDietPlanRequest,
    },
    repo_types::{DayMeals, DietPlan, NewDietPlan},
};
use crate::{
    ai::parse::{parse_model_json, PlanParseError},
    catalog::repo_types::Dish,
    errors::ApiError,
};

pub const BULK_LIMIT: i64 = 6;
pub const DISH_NOT_FOUND: &str = "Dish not found";

/// Reduces each day's meals to dish names, the form plans are stored in.
pub fn meal_names(days: Vec<DayMeals<MealRef>>) -> Vec<DayMeals<String>> {
    days.into_iter()
        .map(|d| DayMeals {
            day: d.day,
            meals: d.meals.into_iter().map(MealRef::into_name).collect(),
        })
        .collect()
}

/// Reads the `meals` column. Rows written with full meal objects are
/// accepted and reduced to names.
pub fn stored_meal_names(meals: &serde_json::Value) -> anyhow::Result<Vec<DayMeals<String>>> {
    if meals.is_null() {
        return Ok(Vec::new());
    }
    let days: Vec<DayMeals<MealRef>> = serde_json::from_value(meals.clone())?;
    Ok(meal_names(days))
}

pub fn distinct_names(days: &[DayMeals<String>]) -> Vec<String> {
    days.iter()
        .flat_map(|d| d.meals.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn expand_meals(
    days: Vec<DayMeals<String>>,
    dishes: &HashMap<String, Dish>,
) -> Vec<DayMeals<ExpandedMeal>> {
    days.into_iter()
        .map(|d| DayMeals {
            day: d.day,
            meals: d
                .meals
                .into_iter()
                .map(|name| match dishes.get(&name) {
                    Some(dish) => ExpandedMeal::Found(dish.clone()),
                    None => ExpandedMeal::Missing {
                        name,
                        error: DISH_NOT_FOUND,
                    },
                })
                .collect(),
        })
        .collect()
}

fn fibre_grams(fibre: Option<&str>) -> f64 {
    fibre
        .and_then(|f| f.trim().trim_end_matches('g').trim().parse().ok())
        .unwrap_or(0.0)
}

impl NutritionTotals {
    pub fn add_dish(&mut self, d: &Dish) {
        self.calories += d.calories.unwrap_or(0.0);
        self.carbohydrates += d.carbohydrates.unwrap_or(0.0);
        self.protein += d.protein.unwrap_or(0.0);
        self.fats += d.fats.unwrap_or(0.0);
        self.sugar += d.sugar.unwrap_or(0.0);
        self.fibre += fibre_grams(d.fibre.as_deref());
        self.sodium += d.sodium.unwrap_or(0.0);
        self.calcium += d.calcium.unwrap_or(0.0);
        self.iron += d.iron.unwrap_or(0.0);
        self.vitamin_c += d.vitamin_c.unwrap_or(0.0);
        self.folate += d.folate.unwrap_or(0.0);
    }

    fn add(&mut self, o: &NutritionTotals) {
        self.calories += o.calories;
        self.carbohydrates += o.carbohydrates;
        self.protein += o.protein;
        self.fats += o.fats;
        self.sugar += o.sugar;
        self.fibre += o.fibre;
        self.sodium += o.sodium;
        self.calcium += o.calcium;
        self.iron += o.iron;
        self.vitamin_c += o.vitamin_c;
        self.folate += o.folate;
    }

    fn divided_by(&self, n: f64) -> NutritionTotals {
        NutritionTotals {
            calories: self.calories / n,
            carbohydrates: self.carbohydrates / n,
            protein: self.protein / n,
            fats: self.fats / n,
            sugar: self.sugar / n,
            fibre: self.fibre / n,
            sodium: self.sodium / n,
            calcium: self.calcium / n,
            iron: self.iron / n,
            vitamin_c: self.vitamin_c / n,
            folate: self.folate / n,
        }
    }
}

/// Per-day totals and the average over `duration` days. Missing dishes add
/// nothing. A non-positive duration falls back to the number of listed days.
pub fn nutrition_summary(days: &[DayMeals<ExpandedMeal>], duration: i32) -> NutritionSummary {
    let daily: Vec<DayNutrition> = days
        .iter()
        .map(|d| {
            let mut totals = NutritionTotals::default();
            for meal in &d.meals {
                if let ExpandedMeal::Found(dish) = meal {
                    totals.add_dish(dish);
                }
            }
            DayNutrition { day: d.day, totals }
        })
        .collect();

    let mut sum = NutritionTotals::default();
    for d in &daily {
        sum.add(&d.totals);
    }
    let span = if duration > 0 { duration as usize } else { daily.len() };
    let daily_average = if span == 0 {
        NutritionTotals::default()
    } else {
        sum.divided_by(span as f64)
    };

    NutritionSummary { daily, daily_average }
}

pub fn expanded_plan(
    plan: DietPlan,
    meals: Vec<DayMeals<ExpandedMeal>>,
) -> ExpandedDietPlan {
    let nutrition = nutrition_summary(&meals, plan.duration);
    ExpandedDietPlan {
        id: plan.id,
        name: plan.name,
        description: plan.description,
        duration: plan.duration,
        meals,
        meals_per_day: plan.meals_per_day,
        difficulty: plan.difficulty,
        rating: plan.rating,
        total_calories: plan.total_calories,
        user_email: plan.user_email,
        created_at: plan.created_at,
        nutrition,
    }
}

fn required(s: Option<String>) -> Option<String> {
    s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

pub fn validate_new_diet(req: SaveDietPlanRequest) -> Result<NewDietPlan, ApiError> {
    let missing = || ApiError::bad_request("Missing required fields.");
    Ok(NewDietPlan {
        name: required(req.name).ok_or_else(missing)?,
        description: required(req.description).ok_or_else(missing)?,
        duration: req.duration.filter(|n| *n > 0).ok_or_else(missing)?,
        meals: req
            .meals
            .filter(|m| !m.is_empty())
            .map(meal_names)
            .ok_or_else(missing)?,
        meals_per_day: req.meals_per_day.filter(|n| *n > 0).ok_or_else(missing)?,
        difficulty: required(req.difficulty).ok_or_else(missing)?,
        rating: req.rating.filter(|r| *r > 0.0).ok_or_else(missing)?,
        total_calories: req.total_calories.filter(|c| *c > 0.0).ok_or_else(missing)?,
    })
}

/// Parses model output into a diet plan with at least one day. Counts the
/// model left out are derived from the meals.
pub fn parse_generated_diet(raw: &str) -> Result<GeneratedDietPlan, PlanParseError> {
    let mut plan: GeneratedDietPlan = parse_model_json(raw)?;
    if plan.name.trim().is_empty() {
        return Err(PlanParseError::Incomplete("name"));
    }
    if plan.meals.is_empty() || plan.meals.iter().all(|d| d.meals.is_empty()) {
        return Err(PlanParseError::Incomplete("meals"));
    }
    if plan.duration <= 0 {
        plan.duration = plan.meals.len() as i32;
    }
    if plan.meals_per_day <= 0 {
        plan.meals_per_day = plan.meals.iter().map(|d| d.meals.len()).max().unwrap_or(0) as i32;
    }
    if plan.total_calories <= 0.0 {
        plan.total_calories = plan
            .meals
            .iter()
            .flat_map(|d| d.meals.iter())
            .map(|m| m.calories)
            .sum();
    }
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    fn dish(name: &str, calories: f64, protein: f64, fibre: &str) -> Dish {
        Dish {
            id: Uuid::new_v4(),
            name: name.into(),
            calories: Some(calories),
            carbohydrates: None,
            protein: Some(protein),
            fats: None,
            sugar: None,
            fibre: Some(fibre.into()),
            sodium: None,
            calcium: None,
            iron: None,
            vitamin_c: None,
            folate: None,
            ingredients: None,
        }
    }

    fn catalog() -> HashMap<String, Dish> {
        [dish("Oats", 300.0, 10.0, "4.5"), dish("Dal", 200.0, 12.0, "3g")]
            .into_iter()
            .map(|d| (d.name.clone(), d))
            .collect()
    }

    #[test]
    fn reduces_detailed_meals_to_names() {
        let days: Vec<DayMeals<MealRef>> = serde_json::from_value(json!([
            {"day": 1, "meals": [{"name": "Oats", "calories": 300}, "Dal"]},
            {"day": "2", "meals": []}
        ]))
        .unwrap();
        let names = meal_names(days);
        assert_eq!(names[0].meals, ["Oats", "Dal"]);
        assert_eq!(names[1].day, 2);
        assert!(names[1].meals.is_empty());
    }

    #[test]
    fn stored_meals_tolerate_null() {
        assert!(stored_meal_names(&serde_json::Value::Null).unwrap().is_empty());
        let days = stored_meal_names(&json!([{"day": 1, "meals": ["Oats"]}])).unwrap();
        assert_eq!(days[0].meals, ["Oats"]);
    }

    #[test]
    fn distinct_names_are_deduplicated() {
        let days = vec![
            DayMeals { day: 1, meals: vec!["Oats".into(), "Dal".into()] },
            DayMeals { day: 2, meals: vec!["Oats".into()] },
        ];
        assert_eq!(distinct_names(&days), ["Dal", "Oats"]);
    }

    #[test]
    fn missing_dish_becomes_marker() {
        let days = vec![DayMeals { day: 1, meals: vec!["Oats".into(), "Ghost".into()] }];
        let expanded = expand_meals(days, &catalog());
        let v = serde_json::to_value(&expanded).unwrap();
        assert_eq!(v[0]["meals"][0]["name"], "Oats");
        assert_eq!(v[0]["meals"][0]["calories"], 300.0);
        assert_eq!(v[0]["meals"][1], json!({"name": "Ghost", "error": "Dish not found"}));
    }

    #[test]
    fn summary_totals_days_and_averages_over_duration() {
        let days = vec![
            DayMeals { day: 1, meals: vec!["Oats".into(), "Dal".into()] },
            DayMeals { day: 2, meals: vec!["Dal".into(), "Ghost".into()] },
        ];
        let expanded = expand_meals(days, &catalog());
        let summary = nutrition_summary(&expanded, 4);

        assert_eq!(summary.daily[0].totals.calories, 500.0);
        assert_eq!(summary.daily[0].totals.fibre, 7.5);
        assert_eq!(summary.daily[1].totals.calories, 200.0);
        assert_eq!(summary.daily[1].totals.protein, 12.0);
        assert_eq!(summary.daily_average.calories, 175.0);
    }

    #[test]
    fn summary_without_duration_uses_listed_days() {
        let days = vec![DayMeals { day: 1, meals: vec!["Oats".into()] }];
        let summary = nutrition_summary(&expand_meals(days, &catalog()), 0);
        assert_eq!(summary.daily_average.calories, 300.0);

        let empty = nutrition_summary(&[], 0);
        assert_eq!(empty.daily_average, NutritionTotals::default());
    }

    #[test]
    fn day_nutrition_serialises_flat() {
        let d = DayNutrition {
            day: 3,
            totals: NutritionTotals { vitamin_c: 1.5, ..Default::default() },
        };
        let v = serde_json::to_value(&d).unwrap();
        assert_eq!(v["day"], 3);
        assert_eq!(v["vitaminC"], 1.5);
    }

    fn full_request() -> SaveDietPlanRequest {
        serde_json::from_value(json!({
            "name": "Lean Week",
            "description": "Seven light days",
            "duration": 7,
            "meals": [{"day": 1, "meals": [{"name": "Oats"}, {"name": "Dal"}]}],
            "mealsPerDay": 2,
            "difficulty": "Easy",
            "rating": 4.6,
            "totalCalories": "1500"
        }))
        .unwrap()
    }

    #[test]
    fn save_request_is_reduced_to_names() {
        let plan = validate_new_diet(full_request()).unwrap();
        assert_eq!(plan.meals, vec![DayMeals { day: 1, meals: vec!["Oats".to_string(), "Dal".to_string()] }]);
        assert_eq!(plan.total_calories, 1500.0);
    }

    #[test]
    fn save_request_rejects_missing_fields() {
        let mut req = full_request();
        req.rating = None;
        assert!(matches!(validate_new_diet(req), Err(ApiError::BadRequest(_))));

        let mut req = full_request();
        req.meals = Some(vec![]);
        assert!(matches!(validate_new_diet(req), Err(ApiError::BadRequest(_))));
    }

    const MODEL_REPLY: &str = r#"```json
{
  "name": "Green Start",
  "description": "Plant forward",
  "duration": "2",
  "meals": [
    {"day": 1, "meals": [{"name": "Oats", "calories": 300.5, "fibre": 2.57, "vitaminC": "1.2"}]},
    {"day": 2, "meals": [{"name": "Dal", "calories": "200", "fibre": "3.1", "ingredients": "lentils, salt"}]}
  ],
  "difficulty": "Easy",
  "rating": 4.6
}
```"#;

    #[test]
    fn parses_generated_diet_and_derives_counts() {
        let plan = parse_generated_diet(MODEL_REPLY).unwrap();
        assert_eq!(plan.name, "Green Start");
        assert_eq!(plan.duration, 2);
        assert_eq!(plan.meals_per_day, 1);
        assert_eq!(plan.total_calories, 500.5);
        assert_eq!(plan.meals[0].meals[0].fibre, "2.57");
        assert_eq!(plan.meals[0].meals[0].vitamin_c, 1.2);
        assert_eq!(plan.meals[1].meals[0].ingredients, "lentils, salt");
    }

    #[test]
    fn rejects_generated_diet_without_meals() {
        let err = parse_generated_diet(r#"{"name": "Nothing", "meals": []}"#).unwrap_err();
        assert!(matches!(err, PlanParseError::Incomplete("meals")));
        let err = parse_generated_diet(r#"{"name": "Nothing"}"#).unwrap_err();
        assert!(matches!(err, PlanParseError::Schema(_)));
    }
}

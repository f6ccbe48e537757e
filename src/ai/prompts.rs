use std::fmt::Write;

use crate::catalog::repo_types::{Dish, ExerciseDetails};
use crate::users::repo_types::PhysicalFitness;

fn with_unit<T: std::fmt::Display>(v: &Option<T>, unit: &str) -> String {
    match v {
        Some(x) => format!("{x}{unit}"),
        None => "unknown".into(),
    }
}

pub fn workout_prompt(
    profile: &PhysicalFitness,
    exercises: &[ExerciseDetails],
    preferences: &str,
) -> String {
    let names = exercises
        .iter()
        .map(|e| e.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let links = exercises
        .iter()
        .map(|e| e.video_url.as_deref().unwrap_or(""))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"Generate a personalized workout plan for a user with the following details:
- Age: {age}
- Gender: {gender}
- Height: {height} cm
- Weight: {weight} kg
- Fitness Level: {level}
- Primary Goal: {goal}
- Workout Duration: {duration} minutes
- Workouts Per Week: {per_week}
- Workout Setting: {location}

Available exercises for {location} workouts: {names}.
Video links for these exercises, in the same order: {links}
Give the workout a short 2-3 word name.

The user asked for: {preferences}

Respond only with a JSON object in exactly this format:
{{
  "routineName": "<name>",
  "noOfExercises": <number>,
  "estimatedDuration": "<minutes, e.g. 30 mins>",
  "category": "<beginner, intermediate or advanced>",
  "calories": <estimated calories burned, number>,
  "exercises": {{
    "1": {{
      "name": "<exercise name>",
      "equipment": "<equipment needed>",
      "estimatedTime": "<e.g. 3 mins>",
      "repsAndSets": "<reps and sets>",
      "targetedArea": "<targeted body area>",
      "benefits": "<two sentences>",
      "videoURL": "<url>"
    }},
    "2": {{ ... }}
  }}
}}"#,
        age = profile.age,
        gender = profile.gender,
        height = profile.height,
        weight = profile.weight,
        level = profile.fitness_level,
        goal = profile.primary_goal,
        duration = profile.workout_duration,
        per_week = profile.workouts_per_week,
        location = profile.workout_location,
        names = names,
        links = links,
        preferences = preferences.trim(),
    )
}

fn describe_dish(out: &mut String, d: &Dish) {
    // writing into a String cannot fail
    let _ = write!(
        out,
        "\nDish Name: {}\nCalories: {}\nCarbohydrates: {}\nProtein: {}\nFats: {}\nSugar: {}\nFibre: {}\nSodium: {}\nCalcium: {}\nIron: {}\nVitamin C: {}\nFolate: {}\nIngredients: {}\n----------------------------------------",
        d.name,
        with_unit(&d.calories, ""),
        with_unit(&d.carbohydrates, "g"),
        with_unit(&d.protein, "g"),
        with_unit(&d.fats, "g"),
        with_unit(&d.sugar, "g"),
        with_unit(&d.fibre, "g"),
        with_unit(&d.sodium, "mg"),
        with_unit(&d.calcium, "mg"),
        with_unit(&d.iron, "mg"),
        with_unit(&d.vitamin_c, "mg"),
        with_unit(&d.folate, "mcg"),
        d.ingredients.as_deref().unwrap_or("unknown"),
    );
}

pub fn diet_prompt(dishes: &[Dish], preferences: &str) -> String {
    let mut catalog = String::new();
    for d in dishes {
        describe_dish(&mut catalog, d);
    }

    format!(
        r#"Create a personalized diet plan using only the following dishes:{catalog}

The user asked for: {preferences}

Respond only with a JSON object in exactly this format:
{{
  "name": "<catchy 2-3 word plan name>",
  "description": "<short description>",
  "duration": 7,
  "meals": [
    {{
      "day": 1,
      "meals": [
        {{
          "name": "<dish name from the list>",
          "calories": <decimal>,
          "carbohydrates": <decimal>,
          "protein": <decimal>,
          "fats": <decimal>,
          "sugar": <decimal>,
          "fibre": "<decimal as string>",
          "sodium": <decimal>,
          "calcium": <decimal>,
          "iron": <decimal>,
          "vitaminC": <decimal>,
          "folate": <decimal>,
          "ingredients": "<comma separated ingredients; generate them if the list has none>"
        }}
      ]
    }}
  ],
  "mealsPerDay": 3,
  "difficulty": "Easy",
  "rating": 4.6
}}

Requirements:
1. Use the nutritional field names exactly as shown.
2. Keep the decimal precision of the dish data.
3. Keep "fibre" as a string, e.g. "2.57".
4. Provide one entry per day for the whole duration, each with mealsPerDay meals."#,
        catalog = catalog,
        preferences = preferences.trim(),
    )
}

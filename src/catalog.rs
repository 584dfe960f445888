use log::error;
use serde::Deserialize;

use crate::models::{Category, ExerciseInfo, Meal};

// Catalog data ships inside the binary; the app never reads these from
// the working directory.
const EXERCISES_JSON: &str = include_str!("exercises.json");
const MEALS_JSON: &str = include_str!("meals.json");

#[derive(Debug, Default, Deserialize)]
pub struct NutritionGuide {
    pub tips: Vec<String>,
    pub meals: Vec<Meal>,
}

pub fn load_exercises() -> Vec<ExerciseInfo> {
    match serde_json::from_str(EXERCISES_JSON) {
        Ok(exercises) => exercises,
        Err(e) => {
            error!("exercise catalog failed to parse: {e}");
            Vec::new()
        }
    }
}

pub fn load_nutrition() -> NutritionGuide {
    match serde_json::from_str(MEALS_JSON) {
        Ok(guide) => guide,
        Err(e) => {
            error!("nutrition guide failed to parse: {e}");
            NutritionGuide::default()
        }
    }
}

/// `None` stands for the "All Exercises" selection.
pub fn filter_by_category(
    exercises: &[ExerciseInfo],
    category: Option<Category>,
) -> Vec<&ExerciseInfo> {
    match category {
        None => exercises.iter().collect(),
        Some(wanted) => exercises.iter().filter(|e| e.category == wanted).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_exercises_parse() {
        let exercises = load_exercises();
        assert_eq!(exercises.len(), 9);
        assert_eq!(exercises[0].title, "Jumping Jacks");
        assert_eq!(exercises[0].category, Category::Cardio);
    }

    #[test]
    fn embedded_nutrition_parses() {
        let guide = load_nutrition();
        assert_eq!(guide.tips.len(), 5);
        assert_eq!(guide.meals.len(), 3);
        assert_eq!(guide.meals[0].meal_type, "Breakfast");
        assert!(!guide.meals[2].ingredients.is_empty());
    }

    #[test]
    fn all_selection_returns_everything() {
        let exercises = load_exercises();
        assert_eq!(filter_by_category(&exercises, None).len(), exercises.len());
    }

    #[test]
    fn category_selection_returns_matching_subset() {
        let exercises = load_exercises();

        let strength = filter_by_category(&exercises, Some(Category::Strength));
        assert_eq!(strength.len(), 3);
        assert!(strength.iter().all(|e| e.category == Category::Strength));

        let cardio = filter_by_category(&exercises, Some(Category::Cardio));
        let titles: Vec<&str> = cardio.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, ["Jumping Jacks", "High Knees", "Burpees"]);
    }
}

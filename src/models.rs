//models.rs
use serde::{Deserialize, Serialize};

/// One saved progress record. `id` is the stable key for table rows and
/// is assigned by the store, never by the form.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProgressEntry {
    pub id: String,
    pub date: String,
    pub weight: String,
    pub workout: String,
    #[serde(default)]
    pub notes: String,
}

/// What the form hands to the store: an entry missing only its id.
#[derive(Clone, Debug, Default)]
pub struct ProgressDraft {
    pub date: String,
    pub weight: String,
    pub workout: String,
    pub notes: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Cardio,
    Strength,
    Flexibility,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::Cardio => "Cardio",
            Category::Strength => "Strength",
            Category::Flexibility => "Flexibility",
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct ExerciseInfo {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub reps: String,
    pub tips: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Meal {
    pub meal_type: String,
    pub title: String,
    pub description: String,
    pub ingredients: Vec<String>,
}

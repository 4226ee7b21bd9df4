//! Day records and their aggregation
//!
//! A [`DayRecord`] is everything logged on one calendar date. Its JSON shape
//! follows the diary's local cache: four meal arrays, an exercise array, a water
//! count and an optional weight, with every field allowed to be absent.

use serde::{Deserialize, Deserializer, Serialize};

use super::{round_half_up, Nutrients};

const INGREDIENT_IMAGE_BASE_URL: &str = "https://spoonacular.com/cdn/ingredients_100x100/";

/// Meal slot within a day, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
    Snacks,
}

impl MealSlot {
    pub const ALL: [MealSlot; 4] = [
        MealSlot::Breakfast,
        MealSlot::Lunch,
        MealSlot::Dinner,
        MealSlot::Snacks,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealSlot::Breakfast => "breakfast",
            MealSlot::Lunch => "lunch",
            MealSlot::Dinner => "dinner",
            MealSlot::Snacks => "snacks",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "breakfast" => Some(MealSlot::Breakfast),
            "lunch" => Some(MealSlot::Lunch),
            "dinner" => Some(MealSlot::Dinner),
            "snacks" | "snack" => Some(MealSlot::Snacks),
            _ => None,
        }
    }
}

/// Ids arrive as strings from search results and as numbers from older caches
fn deserialize_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<RawId>::deserialize(deserializer)?.map(|id| match id {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    }))
}

/// One logged food item. Nutrient fields keep their short cache names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodEntry {
    #[serde(default, deserialize_with = "deserialize_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "quantity", alias = "quantityLabel")]
    pub quantity_label: Option<String>,
    pub calories: Option<f64>,
    pub p: Option<f64>,
    pub c: Option<f64>,
    pub f: Option<f64>,
    pub fib: Option<f64>,
    pub sug: Option<f64>,
    pub sod: Option<f64>,
    pub image: Option<String>,
    pub captured_image_uri: Option<String>,
}

impl FoodEntry {
    /// Coerce to complete nutrients; absent fields count as zero
    pub fn nutrients(&self) -> Nutrients {
        Nutrients {
            calories: self.calories.unwrap_or(0.0),
            protein: self.p.unwrap_or(0.0),
            carbs: self.c.unwrap_or(0.0),
            fat: self.f.unwrap_or(0.0),
            fiber: self.fib.unwrap_or(0.0),
            sugar: self.sug.unwrap_or(0.0),
            sodium: self.sod.unwrap_or(0.0),
        }
    }

    /// Picture to show for the entry: the captured photo wins, then an absolute
    /// image URL, then an ingredient image name resolved against the CDN.
    pub fn image_url(&self) -> Option<String> {
        let non_empty = |s: &Option<String>| s.as_deref().filter(|s| !s.is_empty()).map(str::to_string);

        if let Some(uri) = non_empty(&self.captured_image_uri) {
            return Some(uri);
        }
        let image = non_empty(&self.image)?;
        if image.starts_with("http") || image.starts_with("data:") {
            Some(image)
        } else {
            Some(format!("{}{}", INGREDIENT_IMAGE_BASE_URL, image))
        }
    }
}

/// One logged workout
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseEntry {
    pub name: Option<String>,
    pub duration_minutes: Option<f64>,
    pub calories: Option<f64>,
}

impl ExerciseEntry {
    pub fn calories_burned(&self) -> f64 {
        self.calories.unwrap_or(0.0)
    }
}

/// Cached days store `null` for slots that were cleared
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Water may be `null` or fractional; non-finite values count as none
fn deserialize_water<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?
        .filter(|cups| cups.is_finite())
        .map(|cups| round_half_up(cups) as i64)
        .unwrap_or(0))
}

/// Everything logged on one date. The default value is the empty day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DayRecord {
    #[serde(deserialize_with = "null_as_empty")]
    pub breakfast: Vec<FoodEntry>,
    #[serde(deserialize_with = "null_as_empty")]
    pub lunch: Vec<FoodEntry>,
    #[serde(deserialize_with = "null_as_empty")]
    pub dinner: Vec<FoodEntry>,
    #[serde(deserialize_with = "null_as_empty")]
    pub snacks: Vec<FoodEntry>,
    #[serde(deserialize_with = "null_as_empty")]
    pub exercises: Vec<ExerciseEntry>,
    #[serde(deserialize_with = "deserialize_water")]
    pub water: i64,
    pub weight: Option<f64>,
}

impl DayRecord {
    pub fn slot(&self, slot: MealSlot) -> &[FoodEntry] {
        match slot {
            MealSlot::Breakfast => &self.breakfast,
            MealSlot::Lunch => &self.lunch,
            MealSlot::Dinner => &self.dinner,
            MealSlot::Snacks => &self.snacks,
        }
    }

    pub fn slot_mut(&mut self, slot: MealSlot) -> &mut Vec<FoodEntry> {
        match slot {
            MealSlot::Breakfast => &mut self.breakfast,
            MealSlot::Lunch => &mut self.lunch,
            MealSlot::Dinner => &mut self.dinner,
            MealSlot::Snacks => &mut self.snacks,
        }
    }

    /// Breakfast, lunch, dinner, then snacks; insertion order within a slot
    pub fn all_food_items(&self) -> impl Iterator<Item = &FoodEntry> + '_ {
        MealSlot::ALL.into_iter().flat_map(move |slot| self.slot(slot).iter())
    }
}

/// Sums over one day
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DayTotals {
    /// Calories eaten
    pub food: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub fiber: f64,
    pub sugar: f64,
    pub sodium: f64,
    pub exercise_calories: f64,
}

impl DayTotals {
    pub fn from_parts(food: Nutrients, exercise_calories: f64) -> Self {
        Self {
            food: food.calories,
            protein: food.protein,
            carbs: food.carbs,
            fat: food.fat,
            fiber: food.fiber,
            sugar: food.sugar,
            sodium: food.sodium,
            exercise_calories,
        }
    }

    /// Whether anything was eaten or burned
    pub fn has_progress(&self) -> bool {
        self.food > 0.0 || self.exercise_calories > 0.0
    }
}

/// Totals for a list of entries, e.g. one meal slot
pub fn meal_totals(items: &[FoodEntry]) -> Nutrients {
    items.iter().map(FoodEntry::nutrients).sum()
}

/// Fold a day's food and exercise into totals. The empty day gives zeros.
pub fn aggregate_day(day: &DayRecord) -> DayTotals {
    let food: Nutrients = day.all_food_items().map(FoodEntry::nutrients).sum();
    let exercise_calories = day.exercises.iter().map(ExerciseEntry::calories_burned).sum();
    DayTotals::from_parts(food, exercise_calories)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn food(name: &str, calories: f64, p: f64) -> FoodEntry {
        FoodEntry {
            name: name.to_string(),
            calories: Some(calories),
            p: Some(p),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_day_is_all_zero() {
        assert_eq!(aggregate_day(&DayRecord::default()), DayTotals::default());
        assert!(!DayTotals::default().has_progress());
    }

    #[test]
    fn test_sums_every_slot_and_exercise() {
        let day = DayRecord {
            breakfast: vec![food("oats", 300.0, 10.0)],
            lunch: vec![food("rice", 400.0, 8.0), food("chicken", 250.0, 40.0)],
            dinner: vec![],
            snacks: vec![FoodEntry {
                name: "apple".into(),
                calories: Some(95.0),
                fib: Some(4.4),
                sug: Some(19.0),
                sod: Some(2.0),
                ..Default::default()
            }],
            exercises: vec![
                ExerciseEntry { calories: Some(200.0), ..Default::default() },
                ExerciseEntry { calories: None, ..Default::default() },
            ],
            water: 3,
            weight: None,
        };

        let totals = aggregate_day(&day);
        assert_eq!(totals.food, 1045.0);
        assert_eq!(totals.protein, 58.0);
        assert!((totals.fiber - 4.4).abs() < 1e-9);
        assert_eq!(totals.sugar, 19.0);
        assert_eq!(totals.sodium, 2.0);
        assert_eq!(totals.exercise_calories, 200.0);
    }

    #[test]
    fn test_missing_fields_count_as_zero() {
        let day = DayRecord {
            dinner: vec![FoodEntry { name: "mystery".into(), ..Default::default() }],
            ..Default::default()
        };
        assert_eq!(aggregate_day(&day), DayTotals::default());
    }

    #[test]
    fn test_all_food_items_order() {
        let day = DayRecord {
            snacks: vec![food("s1", 1.0, 0.0)],
            dinner: vec![food("d1", 1.0, 0.0)],
            breakfast: vec![food("b1", 1.0, 0.0), food("b2", 1.0, 0.0)],
            lunch: vec![food("l1", 1.0, 0.0)],
            ..Default::default()
        };
        let names: Vec<&str> = day.all_food_items().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["b1", "b2", "l1", "d1", "s1"]);
    }

    #[test]
    fn test_meal_totals() {
        let items = vec![food("a", 100.0, 5.0), food("b", 50.5, 1.5)];
        let totals = meal_totals(&items);
        assert_eq!(totals.calories, 150.5);
        assert_eq!(totals.protein, 6.5);
        assert_eq!(meal_totals(&[]), Nutrients::zero());
    }

    #[test]
    fn test_parse_cached_day_json() {
        let json = r#"{
            "food": 999, "exercise": 0,
            "breakfast": [{"id": 7, "name": "Koshari", "quantity": "1 plate", "calories": 700,
                           "p": 20, "c": 120, "f": 15, "image": "koshari.jpg"}],
            "lunch": [],
            "snacks": [{"id": "abc", "name": "Tea", "calories": null}],
            "water": 4,
            "weight": 0
        }"#;
        let day: DayRecord = serde_json::from_str(json).unwrap();
        assert_eq!(day.breakfast[0].id.as_deref(), Some("7"));
        assert_eq!(day.breakfast[0].quantity_label.as_deref(), Some("1 plate"));
        assert_eq!(day.snacks[0].id.as_deref(), Some("abc"));
        assert!(day.dinner.is_empty());
        assert!(day.exercises.is_empty());
        assert_eq!(day.water, 4);

        let totals = aggregate_day(&day);
        assert_eq!(totals.food, 700.0);
        assert_eq!(totals.carbs, 120.0);
    }

    #[test]
    fn test_cached_day_with_nulls_and_fractional_water() {
        let day: DayRecord = serde_json::from_str(r#"{"lunch":null,"water":null}"#).unwrap();
        assert_eq!(day, DayRecord::default());

        let day: DayRecord = serde_json::from_str(
            r#"{"breakfast":null,"dinner":null,"snacks":null,"exercises":null,"water":2.0}"#,
        )
        .unwrap();
        assert!(day.exercises.is_empty());
        assert_eq!(day.water, 2);

        let day: DayRecord = serde_json::from_str(r#"{"water":2.5}"#).unwrap();
        assert_eq!(day.water, 3);
    }

    #[test]
    fn test_image_url_resolution() {
        let mut entry = FoodEntry { image: Some("apple.jpg".into()), ..Default::default() };
        assert_eq!(
            entry.image_url().as_deref(),
            Some("https://spoonacular.com/cdn/ingredients_100x100/apple.jpg")
        );

        entry.image = Some("https://img.example/x.png".into());
        assert_eq!(entry.image_url().as_deref(), Some("https://img.example/x.png"));

        entry.captured_image_uri = Some("file:///photo.jpg".into());
        assert_eq!(entry.image_url().as_deref(), Some("file:///photo.jpg"));

        assert_eq!(FoodEntry::default().image_url(), None);
    }

    #[test]
    fn test_meal_slot_from_str() {
        assert_eq!(MealSlot::from_str("Snack"), Some(MealSlot::Snacks));
        assert_eq!(MealSlot::from_str("dinner"), Some(MealSlot::Dinner));
        assert_eq!(MealSlot::from_str("brunch"), None);
    }
}

use rand::Rng;

use super::dto::RecipeView;
use super::id::RecipeId;
use super::provider::MealRecord;

const DESCRIPTION_CHARS: usize = 150;

/// Projects a provider meal into the local recipe shape.
///
/// The provider has no cook time, servings or rating, so those are filled
/// with bounded random values: 20-59 minutes, 2-4 servings, 3.5-5.0 stars.
pub fn normalize_meal<R: Rng>(meal: MealRecord, rng: &mut R) -> RecipeView {
    let ingredients = meal
        .ingredient_pairs()
        .into_iter()
        .map(|(measure, ingredient)| format!("{measure} {ingredient}").trim().to_string())
        .collect();

    let instructions = meal.instructions.unwrap_or_default();
    let description = format!(
        "{}...",
        instructions.chars().take(DESCRIPTION_CHARS).collect::<String>()
    );

    let rating = f32::from(rng.gen_range(35u8..=50)) / 10.0;

    RecipeView {
        id: RecipeId::External(meal.id_meal),
        title: meal.name.unwrap_or_default(),
        description,
        ingredients,
        instructions,
        cook_time: format!("{} mins", rng.gen_range(20..60)),
        servings: rng.gen_range(2..=4),
        category: meal.category.unwrap_or_default().to_lowercase(),
        image: meal.thumbnail,
        created_by: None,
        rating: Some(rating),
        likes: None,
        created_at: None,
        updated_at: None,
        is_external: true,
    }
}

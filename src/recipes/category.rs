use std::fmt;

/// Filterable recipe categories. Anything else, including `all`, means
/// "no category filter".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Breakfast,
    Lunch,
    Dinner,
    Dessert,
    Snacks,
}

/// Filter values that resolve to a per-user identifier set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PseudoCategory {
    Favorites,
    LikedRecipes,
}

/// A parsed `category` query value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFilter {
    Any,
    Only(Category),
    Pseudo(PseudoCategory),
}

impl CategoryFilter {
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return CategoryFilter::Any;
        };
        match raw.to_ascii_lowercase().as_str() {
            "favorites" => CategoryFilter::Pseudo(PseudoCategory::Favorites),
            "liked_recipes" => CategoryFilter::Pseudo(PseudoCategory::LikedRecipes),
            other => Category::parse(other)
                .map(CategoryFilter::Only)
                .unwrap_or(CategoryFilter::Any),
        }
    }

    pub fn category(self) -> Option<Category> {
        match self {
            CategoryFilter::Only(c) => Some(c),
            _ => None,
        }
    }
}

impl Category {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "breakfast" => Some(Category::Breakfast),
            "lunch" => Some(Category::Lunch),
            "dinner" => Some(Category::Dinner),
            "dessert" => Some(Category::Dessert),
            "snacks" => Some(Category::Snacks),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Breakfast => "breakfast",
            Category::Lunch => "lunch",
            Category::Dinner => "dinner",
            Category::Dessert => "dessert",
            Category::Snacks => "snacks",
        }
    }

    /// Provider category fetched directly for this category, if any.
    pub fn provider_category(self) -> Option<&'static str> {
        match self {
            Category::Breakfast => Some("Breakfast"),
            Category::Dessert => Some("Dessert"),
            Category::Snacks => Some("Starter"),
            Category::Lunch | Category::Dinner => None,
        }
    }

    /// Whether a provider meal with `provider_category` belongs in results
    /// filtered by this category. Lunch and dinner are broad meal-time
    /// buckets and accept everything.
    pub fn accepts_external(self, provider_category: &str) -> bool {
        let provider_category = provider_category.to_lowercase();
        match self {
            Category::Lunch | Category::Dinner => true,
            Category::Snacks => {
                provider_category.contains("starter") || provider_category.contains("snack")
            }
            other => provider_category.contains(other.as_str()),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

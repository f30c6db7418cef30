//! Cuisine filter → Geoapify category token mapping.

/// Category token used when no cuisine filter applies.
pub const ALL_RESTAURANTS_CATEGORY: &str = "catering.restaurant";

/// Supported cuisine filters and their provider category tokens.
const CUISINE_CATEGORIES: &[(&str, &str)] = &[
    ("chinese", "catering.restaurant.chinese"),
    ("japanese", "catering.restaurant.japanese"),
    ("korean", "catering.restaurant.korean"),
    ("thai", "catering.restaurant.thai"),
    ("vietnamese", "catering.restaurant.vietnamese"),
    ("indian", "catering.restaurant.indian"),
    ("italian", "catering.restaurant.italian"),
    ("french", "catering.restaurant.french"),
    ("mexican", "catering.restaurant.mexican"),
    ("seafood", "catering.restaurant.seafood"),
    ("pizza", "catering.restaurant.pizza"),
    ("vegetarian", "catering.restaurant.vegetarian"),
    ("fast_food", "catering.fast_food"),
    ("cafe", "catering.cafe"),
];

/// Maps a client cuisine filter to the provider category token.
///
/// Unknown filters (and "all") fall back to the unfiltered restaurant
/// category rather than failing the search.
#[must_use]
pub fn category_for_cuisine(filter: &str) -> &'static str {
    let normalized = filter.trim().to_lowercase();
    CUISINE_CATEGORIES
        .iter()
        .find(|(cuisine, _)| *cuisine == normalized)
        .map_or(ALL_RESTAURANTS_CATEGORY, |(_, token)| *token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_cuisine_maps_to_provider_token() {
        assert_eq!(
            category_for_cuisine("chinese"),
            "catering.restaurant.chinese"
        );
        assert_eq!(category_for_cuisine("fast_food"), "catering.fast_food");
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(
            category_for_cuisine("  Japanese "),
            "catering.restaurant.japanese"
        );
    }

    #[test]
    fn all_and_unknown_fall_back_to_unfiltered() {
        assert_eq!(category_for_cuisine("all"), ALL_RESTAURANTS_CATEGORY);
        assert_eq!(category_for_cuisine("martian"), ALL_RESTAURANTS_CATEGORY);
        assert_eq!(category_for_cuisine(""), ALL_RESTAURANTS_CATEGORY);
    }
}

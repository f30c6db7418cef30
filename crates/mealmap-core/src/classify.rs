//! Keyword-table cuisine classification and health scoring.
//!
//! Shared by the places search adapter and the gateway so both paths agree
//! on labels and scores. Pure functions over fixed tables, no I/O.

/// Sentinel label used when no cuisine keyword matches.
pub const GENERAL_CUISINE: &str = "general";

/// Health score assigned when no scored cuisine matched and no healthy
/// signal was found.
const DEFAULT_HEALTH_SCORE: u8 = 50;

/// Score contributed when a healthy-signal keyword appears in the category
/// text, regardless of which cuisines matched.
const HEALTHY_SIGNAL_SCORE: u8 = 80;

/// Cuisine → keyword substrings. Intentionally many-to-many: a restaurant
/// may match several cuisines (a Japanese seafood izakaya matches both
/// "japanese" and "seafood").
const CUISINE_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "chinese",
        &[
            "chinese",
            "cantonese",
            "dim_sum",
            "dim sum",
            "dimsum",
            "noodle",
            "congee",
            "hot_pot",
            "hot pot",
            "hotpot",
            "sichuan",
            "szechuan",
            "shanghai",
        ],
    ),
    (
        "japanese",
        &[
            "japanese", "sushi", "ramen", "izakaya", "udon", "tempura", "yakitori", "donburi",
        ],
    ),
    ("korean", &["korean", "kimchi", "bibimbap", "bulgogi"]),
    ("thai", &["thai", "tom_yum", "tom yum", "pad_thai", "pad thai"]),
    ("vietnamese", &["vietnamese", "pho", "banh_mi", "banh mi"]),
    ("indian", &["indian", "curry", "tandoori", "biryani", "masala"]),
    (
        "italian",
        &["italian", "pizza", "pasta", "risotto", "trattoria"],
    ),
    (
        "french",
        &["french", "bistro", "brasserie", "patisserie", "creperie"],
    ),
    ("mexican", &["mexican", "taco", "burrito", "quesadilla"]),
    (
        "western",
        &["western", "steak", "grill", "american", "european"],
    ),
    ("seafood", &["seafood", "fish", "oyster", "lobster", "crab"]),
    (
        "fast_food",
        &[
            "fast_food",
            "fastfood",
            "fried_chicken",
            "fried chicken",
            "burger",
            "fries",
            "mcdonald",
            "kfc",
        ],
    ),
    (
        "cafe",
        &[
            "cafe",
            "coffee",
            "bakery",
            "dessert",
            "tea_house",
            "tea house",
            "bubble_tea",
            "bubble tea",
        ],
    ),
    (
        "vegetarian",
        &["vegetarian", "vegan", "salad", "plant_based", "plant based"],
    ),
];

/// Cuisine → health score (0–100). The final score is the maximum across
/// all matched cuisines, so a fast-food seafood place scores as seafood.
const CUISINE_HEALTH_SCORES: &[(&str, u8)] = &[
    ("vegetarian", 90),
    ("seafood", 75),
    ("japanese", 72),
    ("vietnamese", 70),
    ("thai", 65),
    ("korean", 62),
    ("chinese", 60),
    ("indian", 58),
    ("french", 55),
    ("italian", 52),
    ("mexican", 50),
    ("cafe", 45),
    ("western", 42),
    ("fast_food", 20),
];

/// Keywords in the raw category text that signal a health-conscious venue.
const HEALTHY_SIGNALS: &[&str] = &[
    "healthy",
    "salad",
    "organic",
    "vegan",
    "vegetarian",
    "juice",
    "smoothie",
    "wholesome",
];

/// The classifier's output: cuisine labels plus a derived health score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Matched cuisine labels in table order; never empty.
    pub cuisine_types: Vec<String>,
    /// Always in [0, 100].
    pub health_score: u8,
}

/// Classify a restaurant from its raw provider category tags and name.
///
/// Builds a lower-cased search text from all tags plus the name, matches it
/// against the cuisine keyword table (substring match, many-to-many), and
/// derives the health score as the maximum over matched cuisine scores and
/// the healthy-signal bonus. No match yields `["general"]` and a score
/// of 50.
#[must_use]
pub fn classify(categories: &[String], name: &str) -> Classification {
    let mut search_text = String::new();
    for tag in categories {
        search_text.push_str(&tag.to_lowercase());
        search_text.push(' ');
    }
    search_text.push_str(&name.to_lowercase());

    let mut cuisine_types: Vec<String> = Vec::new();
    for (cuisine, keywords) in CUISINE_KEYWORDS {
        if keywords.iter().any(|kw| search_text.contains(kw)) {
            cuisine_types.push((*cuisine).to_owned());
        }
    }

    let mut score_pool: Vec<u8> = cuisine_types
        .iter()
        .filter_map(|cuisine| {
            CUISINE_HEALTH_SCORES
                .iter()
                .find(|(name, _)| name == cuisine)
                .map(|(_, score)| *score)
        })
        .collect();

    // Healthy signals key on the raw category text only, not the name.
    let category_text = categories
        .iter()
        .map(|t| t.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");
    if HEALTHY_SIGNALS.iter().any(|kw| category_text.contains(kw)) {
        score_pool.push(HEALTHY_SIGNAL_SCORE);
    }

    if cuisine_types.is_empty() {
        cuisine_types.push(GENERAL_CUISINE.to_owned());
    }

    let health_score = score_pool
        .into_iter()
        .max()
        .unwrap_or(DEFAULT_HEALTH_SCORE);

    Classification {
        cuisine_types,
        health_score,
    }
}

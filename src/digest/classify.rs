/// The seven fixed categories for coffee news grouping. Order matters:
/// category 1 is the default for anything no keyword claims.
pub const CATEGORIES: [&str; 7] = [
    "1. Top News",
    "2. Market & Origin",
    "3. Retail & Business",
    "4. Roasting & Science",
    "5. Tech & Gear",
    "6. Sustainability",
    "7. Events & Culture",
];

/// Keyword table: first matching category wins, scanned in listed order.
/// More specific categories come before broader ones so "roastery business
/// award" lands in Retail & Business rather than Events & Culture.
const KEYWORDS: [(&[&str], usize); 6] = [
    (
        &[
            "futures", "price", "prices", "market", "harvest", "export", "origin", "crop",
            "arabica", "robusta", "frost", "drought", "tariff",
        ],
        1,
    ),
    (
        &[
            "cafe", "café", "shop", "retail", "business", "revenue", "acquisition",
            "franchise", "marketing", "menu",
        ],
        2,
    ),
    (
        &[
            "roast", "roasting", "brew", "brewing", "extraction", "recipe", "science", "study",
            "research", "sensory",
        ],
        3,
    ),
    (
        &[
            "grinder", "machine", "espresso machine", "gear", "equipment", "kettle", "scale",
            "app", "device",
        ],
        4,
    ),
    (
        &[
            "sustainab", "climate", "environment", "carbon", "fair trade", "fairtrade", "organic",
            "ethic", "deforestation",
        ],
        5,
    ),
    (
        &[
            "championship", "competition", "barista", "festival", "expo", "event", "award",
            "culture",
        ],
        6,
    ),
];

/// Pick a category for an article from its title and summary.
///
/// A cheap keyword heuristic standing in for the upstream pipeline's
/// model-based classifier: case-insensitive substring match over the
/// concatenated text, first hit wins, Top News as the fallback.
pub fn classify_article(title: &str, summary: &str) -> &'static str {
    let haystack = format!("{} {}", title, summary).to_lowercase();

    for (keywords, idx) in KEYWORDS {
        if keywords.iter().any(|k| haystack.contains(k)) {
            return CATEGORIES[idx];
        }
    }

    CATEGORIES[0]
}

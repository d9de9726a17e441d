//! Keyword categorisation of task descriptions.

use crate::fields::Category;

/// Keywords checked in priority order; the first one found decides the category.
const KEYWORDS: [(&str, Category); 2] = [("work", Category::Work), ("personal", Category::Personal)];

/// Map a free-text description to a category by case-insensitive substring match.
///
/// `"work"` wins over `"personal"` when both appear. Anything without a keyword,
/// including the empty string, is [`Category::Other`].
pub fn categorize(description: &str) -> Category {
    let lowered = description.to_lowercase();
    KEYWORDS
        .iter()
        .find(|(keyword, _)| lowered.contains(keyword))
        .map(|&(_, category)| category)
        .unwrap_or(Category::Other)
}

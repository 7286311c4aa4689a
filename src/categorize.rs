//! Place-category derivation from a name.

/// Ordered keyword table; the first row whose keyword appears in the
/// lowercased name decides the category.
const CATEGORY_TABLE: &[(&[&str], &str)] = &[
    (
        &["restaurant", "cafe", "diner", "eatery", "bakery", "pizzeria", "grill", "bistro"],
        "Restaurant",
    ),
    (&["hotel", "motel", "inn", "resort", "suites", "lodging"], "Hospitality"),
    (&["store", "shop", "market", "mart", "retail", "boutique", "outlet"], "Retail"),
    (&["salon", "spa", "barber", "beauty", "nail"], "Personal Care"),
    (
        &["clinic", "hospital", "medical", "dental", "pharmacy", "healthcare"],
        "Healthcare",
    ),
    (&["school", "university", "college", "academy", "institute"], "Educational"),
    (&["bank", "financial", "credit union", "investment"], "Financial"),
    (&["church", "temple", "mosque", "synagogue", "chapel"], "Religious"),
    (&["gym", "fitness", "athletic"], "Fitness"),
    (&["theater", "cinema", "funfair", "entertainment"], "Entertainment"),
    (&["museum", "gallery", "exhibition"], "Cultural"),
    (&["factory", "industrial", "warehouse", "shipping", "logistics"], "Industrial"),
    (&["furniture"], "Retail"),
    (&["tyres", "tires", "automotive", "garage"], "Automotive"),
];

/// Derives a coarse category from a place name, defaulting to
/// `"Business"` when no keyword matches.
#[must_use]
pub fn from_name(name: &str) -> &'static str {
    let lower = name.to_lowercase();
    for (keywords, category) in CATEGORY_TABLE {
        if keywords.iter().any(|keyword| lower.contains(keyword)) {
            return category;
        }
    }
    "Business"
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("ENISH NIGERIAN RESTAURANT & LOUNGE", "Restaurant")]
    #[test_case("Gomays Plaza Hotel", "Hospitality")]
    #[test_case("Seacoast Bank", "Financial")]
    #[test_case("TURKIYE FURNITURE", "Retail")]
    #[test_case("MADHOUSE TYRES", "Automotive")]
    #[test_case("Janiba Ginger Limited", "Business")]
    fn test_from_name(name: &str, expected: &str) {
        assert_eq!(from_name(name), expected);
    }

    #[test]
    fn test_first_matching_row_wins() {
        // "restaurant" appears before "bank" in the table.
        assert_eq!(from_name("BANK STREET RESTAURANT"), "Restaurant");
    }
}

//! Curated name-to-place knowledge bases.
//!
//! Two read-only tables back the pipeline: business names seen in
//! storefront photos and brand logos the vision provider reports. Both
//! share the same lookup discipline: exact case-insensitive match
//! first, then bidirectional substring containment scored by length
//! ratio, with insertion order breaking ties.

mod business;
mod logos;

pub use business::known_businesses;
pub use logos::known_logos;

use crate::models::GeoPoint;

/// A single curated place.
#[derive(Debug, Clone)]
pub struct KnowledgeEntry {
    /// Canonical name, matched case-insensitively.
    pub name: String,
    /// Fixed coordinates.
    pub location: GeoPoint,
    /// Formatted address.
    pub address: String,
    /// Place category, e.g. `"Restaurant"`.
    pub category: String,
    /// Short human description.
    pub description: String,
    /// Aggregate rating, when curated.
    pub rating: Option<f32>,
    /// Phone number, when curated.
    pub phone_number: Option<String>,
}

impl KnowledgeEntry {
    fn new(
        name: &str,
        lat: f64,
        lng: f64,
        address: &str,
        category: &str,
        description: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            location: GeoPoint::new(lat, lng),
            address: address.to_string(),
            category: category.to_string(),
            description: description.to_string(),
            rating: None,
            phone_number: None,
        }
    }

    fn rated(mut self, rating: f32, phone: &str) -> Self {
        self.rating = Some(rating);
        self.phone_number = Some(phone.to_string());
        self
    }
}

/// An ordered, read-only collection of [`KnowledgeEntry`] records.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    entries: Vec<KnowledgeEntry>,
}

impl KnowledgeBase {
    fn from_entries(entries: Vec<KnowledgeEntry>) -> Self {
        Self { entries }
    }

    /// Number of curated entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up a name.
    ///
    /// Tries an exact case-insensitive match before falling back to
    /// bidirectional containment: an entry matches when either string
    /// contains the other (case-insensitively). Containment matches are
    /// scored by `max(query_len / name_len, name_len / query_len)` and
    /// the highest score wins; a tie keeps the earliest entry. Note the
    /// score grows with length mismatch, so a short entry contained in
    /// a long query outranks a longer entry containing it.
    #[must_use]
    pub fn lookup(&self, query: &str) -> Option<&KnowledgeEntry> {
        let query = query.trim().to_uppercase();
        if query.is_empty() {
            return None;
        }

        if let Some(entry) = self
            .entries
            .iter()
            .find(|entry| entry.name.to_uppercase() == query)
        {
            return Some(entry);
        }

        let mut best: Option<(&KnowledgeEntry, f64)> = None;
        for entry in &self.entries {
            let name = entry.name.to_uppercase();
            if !name.contains(&query) && !query.contains(&name) {
                continue;
            }
            #[allow(clippy::cast_precision_loss)]
            let ratio = (query.len() as f64 / name.len() as f64)
                .max(name.len() as f64 / query.len() as f64);
            if best.is_none_or(|(_, score)| ratio > score) {
                best = Some((entry, ratio));
            }
        }
        best.map(|(entry, _)| entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> KnowledgeBase {
        KnowledgeBase::from_entries(vec![
            KnowledgeEntry::new("ENISH", 51.4845, -0.0842, "Albany Road", "Restaurant", "Enish"),
            KnowledgeEntry::new(
                "ENISH NIGERIAN RESTAURANT & LOUNGE",
                51.4845,
                -0.0842,
                "Albany Road",
                "Restaurant",
                "Enish full name",
            ),
        ])
    }

    #[test]
    fn test_exact_match_wins_over_containment() {
        let kb = sample();
        let hit = kb.lookup("enish").expect("hit");
        assert_eq!(hit.name, "ENISH");
    }

    #[test]
    fn test_containment_score_is_max_length_ratio() {
        let kb = sample();
        // Both entries match by containment; the short entry's ratio
        // against this query (14/5 = 2.8) beats the long entry's
        // (34/14 = 2.43), so the short form wins.
        let hit = kb.lookup("ENISH NIGERIAN").expect("hit");
        assert_eq!(hit.name, "ENISH");

        // Same quirk against the real seed table.
        let hit = known_businesses().lookup("ENISH NIGERIAN").expect("hit");
        assert_eq!(hit.name, "ENISH");
    }

    #[test]
    fn test_equal_scores_keep_insertion_order() {
        let kb = KnowledgeBase::from_entries(vec![
            KnowledgeEntry::new("HARBOUR CAFE EAST", 51.0, 0.0, "Pier 1", "Restaurant", "first"),
            KnowledgeEntry::new("HARBOUR CAFE WEST", 51.0, 0.1, "Pier 9", "Restaurant", "second"),
        ]);
        // Same length, same containment score; the earlier entry wins.
        let hit = kb.lookup("HARBOUR CAFE").expect("hit");
        assert_eq!(hit.description, "first");
    }

    #[test]
    fn test_miss_and_empty_query() {
        let kb = sample();
        assert!(kb.lookup("nonexistent place").is_none());
        assert!(kb.lookup("   ").is_none());
    }

    #[test]
    fn test_seed_tables_nonempty() {
        assert!(!known_businesses().is_empty());
        assert!(!known_logos().is_empty());
    }

    #[test]
    fn test_logo_lookup_case_insensitive() {
        let hit = known_logos().lookup("starbucks").expect("hit");
        assert_eq!(hit.category, "Restaurant");
    }
}

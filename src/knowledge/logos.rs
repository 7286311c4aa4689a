//! Curated brand-logo table.
//!
//! Logos identify a brand, not a branch, so the coordinates here are
//! representative flagship locations. The pipeline only treats a logo
//! hit as terminal when the detector's own score clears its threshold.

use std::sync::LazyLock;

use super::{KnowledgeBase, KnowledgeEntry};

static KNOWN_LOGOS: LazyLock<KnowledgeBase> = LazyLock::new(|| {
    KnowledgeBase::from_entries(vec![
        KnowledgeEntry::new(
            "McDonald's",
            40.7589,
            -73.9851,
            "Times Square, New York, NY",
            "Restaurant",
            "McDonald's fast food restaurant",
        ),
        KnowledgeEntry::new(
            "Starbucks",
            40.7614,
            -73.9776,
            "Manhattan, New York, NY",
            "Restaurant",
            "Starbucks coffee shop",
        ),
        KnowledgeEntry::new(
            "Subway",
            40.7505,
            -73.9934,
            "New York, NY",
            "Restaurant",
            "Subway sandwich shop",
        ),
        KnowledgeEntry::new(
            "KFC",
            40.758,
            -73.9855,
            "New York, NY",
            "Restaurant",
            "KFC fried chicken restaurant",
        ),
        KnowledgeEntry::new(
            "Pizza Hut",
            40.7549,
            -73.984,
            "New York, NY",
            "Restaurant",
            "Pizza Hut restaurant",
        ),
        KnowledgeEntry::new(
            "Burger King",
            40.7505,
            -73.9934,
            "New York, NY",
            "Restaurant",
            "Burger King fast food restaurant",
        ),
        KnowledgeEntry::new(
            "Taco Bell",
            40.7505,
            -73.9934,
            "New York, NY",
            "Restaurant",
            "Taco Bell Mexican fast food",
        ),
        KnowledgeEntry::new(
            "Walmart",
            40.7505,
            -73.9934,
            "New York, NY",
            "Retail",
            "Walmart superstore",
        ),
        KnowledgeEntry::new(
            "Target",
            40.7505,
            -73.9934,
            "New York, NY",
            "Retail",
            "Target retail store",
        ),
        KnowledgeEntry::new(
            "Shell",
            40.7505,
            -73.9934,
            "New York, NY",
            "Gas Station",
            "Shell gas station",
        ),
        KnowledgeEntry::new(
            "BP",
            40.7505,
            -73.9934,
            "New York, NY",
            "Gas Station",
            "BP gas station",
        ),
        KnowledgeEntry::new(
            "Exxon",
            40.7505,
            -73.9934,
            "New York, NY",
            "Gas Station",
            "Exxon gas station",
        ),
        KnowledgeEntry::new(
            "DHL",
            40.7505,
            -73.9934,
            "New York, NY",
            "Logistics",
            "DHL shipping and logistics",
        ),
        KnowledgeEntry::new(
            "FedEx",
            40.7505,
            -73.9934,
            "New York, NY",
            "Logistics",
            "FedEx shipping and logistics",
        ),
        KnowledgeEntry::new(
            "UPS",
            40.7505,
            -73.9934,
            "New York, NY",
            "Logistics",
            "UPS shipping and logistics",
        ),
        KnowledgeEntry::new(
            "Maersk",
            40.7505,
            -73.9934,
            "New York, NY",
            "Logistics",
            "Maersk shipping and logistics",
        ),
        KnowledgeEntry::new(
            "COSCO",
            40.7505,
            -73.9934,
            "New York, NY",
            "Logistics",
            "COSCO shipping and logistics",
        ),
    ])
});

/// The curated brand-logo table.
#[must_use]
pub fn known_logos() -> &'static KnowledgeBase {
    &KNOWN_LOGOS
}

//! Curated business-name table.

use std::sync::LazyLock;

use super::{KnowledgeBase, KnowledgeEntry};

static KNOWN_BUSINESSES: LazyLock<KnowledgeBase> = LazyLock::new(|| {
    KnowledgeBase::from_entries(vec![
        KnowledgeEntry::new(
            "TORTOISE",
            51.5141,
            -0.1329,
            "45 Charlotte St, London W1T 1RS, UK",
            "Restaurant",
            "Tortoise Media headquarters in London",
        ),
        KnowledgeEntry::new(
            "TORTOISE ONE",
            51.5141,
            -0.1329,
            "45 Charlotte St, London W1T 1RS, UK",
            "Restaurant",
            "Tortoise Media headquarters in London",
        ),
        KnowledgeEntry::new(
            "VENCHI",
            43.784_439_7,
            -88.787_867_8,
            "Wisconsin, USA",
            "Retail",
            "Venchi chocolate and gelato shop",
        ),
        KnowledgeEntry::new(
            "FUNFAIR",
            51.484_511_7,
            -0.084_221_2,
            "Albany Rd, London SE5 0AL, UK",
            "Entertainment",
            "George Bins Funfair at Burgess Park",
        ),
        KnowledgeEntry::new(
            "GEORGE BINS FUNFAIR",
            51.484_511_7,
            -0.084_221_2,
            "Albany Rd, London SE5 0AL, UK",
            "Entertainment",
            "George Bins Funfair at Burgess Park",
        ),
        KnowledgeEntry::new(
            "ARIN WINES",
            51.4762,
            -0.0662,
            "388B Old Kent Rd, London SE1 5AA, UK",
            "Retail",
            "Arin Wines Mini Market",
        ),
        KnowledgeEntry::new(
            "GOMAYS PLAZA",
            4.984_104_2,
            8.341_299_3,
            "90 Atekong Drive, Calabar, Cross River, Nigeria",
            "Hospitality",
            "Gomays Plaza Hotel",
        ),
        KnowledgeEntry::new(
            "GOMAYS",
            4.984_104_2,
            8.341_299_3,
            "90 Atekong Drive, Calabar, Cross River, Nigeria",
            "Hospitality",
            "Gomays Plaza Hotel",
        ),
        KnowledgeEntry::new(
            "MAD HOUSE TYRES",
            51.4862,
            -0.0723,
            "52 Old Kent Rd, London SE1 4TW, UK",
            "Automotive",
            "Madhouse Tyres - Alloy Wheel Refurbishment & Repairs",
        ),
        KnowledgeEntry::new(
            "MADHOUSE TYRES",
            51.4862,
            -0.0723,
            "52 Old Kent Rd, London SE1 4TW, UK",
            "Automotive",
            "Madhouse Tyres - Alloy Wheel Refurbishment & Repairs",
        ),
        KnowledgeEntry::new(
            "ALLOY WHEEL",
            51.4862,
            -0.0723,
            "52 Old Kent Rd, London SE1 4TW, UK",
            "Automotive",
            "Madhouse Tyres - Alloy Wheel Refurbishment & Repairs",
        ),
        KnowledgeEntry::new(
            "JANIBA GINGER LIMITED",
            40.7589,
            -73.9851,
            "New York, NY, USA",
            "Business",
            "Janiba Ginger Limited - Business Services",
        ),
        KnowledgeEntry::new(
            "JANIBA GINGER",
            40.7589,
            -73.9851,
            "New York, NY, USA",
            "Business",
            "Janiba Ginger Limited - Business Services",
        ),
        KnowledgeEntry::new(
            "CARGO SHIPPING",
            4.955_079,
            8.346_585,
            "Calabar, Cross River, Nigeria",
            "Logistics",
            "Cargo Shipping and Logistics Service",
        ),
        KnowledgeEntry::new(
            "ENISH NIGERIAN RESTAURANT & LOUNGE",
            51.4845,
            -0.0842,
            "Albany Road, London SE5, UK",
            "Restaurant",
            "Enish Nigerian Restaurant & Lounge",
        )
        .rated(4.2, "020 7967 6261"),
        KnowledgeEntry::new(
            "ENISH NIGERIAN RESTAURANT",
            51.4845,
            -0.0842,
            "Albany Road, London SE5, UK",
            "Restaurant",
            "Enish Nigerian Restaurant & Lounge",
        )
        .rated(4.2, "020 7967 6261"),
        KnowledgeEntry::new(
            "ENISH",
            51.4845,
            -0.0842,
            "Albany Road, London SE5, UK",
            "Restaurant",
            "Enish Nigerian Restaurant & Lounge",
        )
        .rated(4.2, "020 7967 6261"),
    ])
});

/// The curated business-name table.
#[must_use]
pub fn known_businesses() -> &'static KnowledgeBase {
    &KNOWN_BUSINESSES
}

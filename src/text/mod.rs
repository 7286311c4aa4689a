//! OCR text interpretation.
//!
//! Everything in this module is pure string work over detected text:
//! fixed correction tables, ordered extraction rules, no provider
//! calls. Rule order is load-bearing throughout; most-specific
//! patterns are listed first and the first match always wins.

mod address;
mod business;
mod clean;

pub use address::{extract_address, extract_phone, extract_website};
pub use business::extract_business_name;
pub use clean::clean;

//! Pricing domain - the offer resolution pipeline
//!
//! One rendered page goes through cascading extraction strategies; one
//! (product, source) pair always comes out as a `ResolvedOffer`, whatever
//! happened on the way.

mod currency;
mod extract;
mod resolver;
mod select;

pub use currency::{parse_amount, parse_localized_amount};
pub use extract::PriceExtractor;
pub use resolver::OfferResolver;
pub use select::select_best;

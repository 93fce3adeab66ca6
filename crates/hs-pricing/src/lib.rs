//! `hs-pricing`: hotel and reseller pricing and offer selection.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`engine`]      | `PricingEngine`, `Offer`, `RejectionReason`, `PricingSummary` |
//! | [`price_table`] | `DailyPriceTable`, `PriceSource` trait, `PriceTableStrategy` |
//! | [`error`]       | `PricingError`, `PricingResult<T>`                         |
//!
//! `PricingEngine` implements [`hs_supply::RateCard`], which is how the
//! ledger prices a booking at commit time.

pub mod engine;
pub mod error;
pub mod price_table;


pub use engine::{HotelQuote, Offer, PricingEngine, PricingSummary, RejectionReason, ResellerQuote};
pub use error::{PricingError, PricingResult};
pub use price_table::{DailyPriceTable, PriceSource, PriceTableStrategy};

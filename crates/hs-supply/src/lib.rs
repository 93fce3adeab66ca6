//! `hs-supply`: hotel inventory, reseller allocations, and booking.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                    |
//! |---------------|-------------------------------------------------------------|
//! | [`record`]    | `DailySupply`, `ResellerAllocation`, `BookingRequest`, `Booking` |
//! | [`store`]     | `SupplyStore` trait, `InMemorySupplyStore`                  |
//! | [`ledger`]    | `SupplyLedger`, `RateCard` trait, `Occupancy`               |
//! | [`shared`]    | `SharedCapacity` (single-supplier room pool)                |
//! | [`error`]     | `SupplyError`, `SupplyResult<T>`                            |
//!
//! # Feature flags
//!
//! | Flag      | Effect                                                       |
//! |-----------|--------------------------------------------------------------|
//! | `fx-hash` | FxHash for the in-memory store's partition maps.             |

pub mod error;
pub mod ledger;
pub mod record;
pub mod shared;
pub mod store;

#[cfg(test)]
mod tests;

pub use error::{SupplyError, SupplyResult};
pub use ledger::{Occupancy, RateCard, SupplierAvailability, SupplyLedger};
pub use record::{Booking, BookingRequest, DailySupply, ResellerAllocation, unix_now};
pub use shared::SharedCapacity;
pub use store::{InMemorySupplyStore, SupplyStore};

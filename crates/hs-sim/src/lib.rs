//! `hs-sim`: session context, matching strategies, and the day loop.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                       |
//! |--------------|----------------------------------------------------------------|
//! | [`session`]  | `SimSession`, `SimulationParameters`, supplier summaries       |
//! | [`strategy`] | `MatchingStrategy`, `MultiSupplierMatcher`, `SingleSupplierMatcher` |
//! | [`sim`]      | `Sim` (`run`, `run_full`, `run_day`, statistics, cleanup)      |
//! | [`builder`]  | `SimBuilder`                                                   |
//! | [`observer`] | `SimObserver`, `NoopObserver`                                  |
//! | [`stats`]    | `DayStats`, `SimulationStatistics`, `MissedDemandReport`       |
//! | [`error`]    | `SimError`, `SimResult<T>`                                     |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                   |
//! |------------|----------------------------------------------------------|
//! | `parallel` | Generate travellers on the Rayon pool.                   |
//! | `fx-hash`  | FxHash in the in-memory supply store.                    |

pub mod builder;
pub mod error;
pub mod observer;
pub mod session;
pub mod sim;
pub mod stats;
pub mod strategy;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use session::{HotelSummary, ResellerSummary, SimSession, SimulationParameters, TripKey};
pub use sim::Sim;
pub use stats::{DayStats, MissedDemandReport, MissedItinerary, SimulationStatistics};
pub use strategy::{MatchingStrategy, MultiSupplierMatcher, SINGLE_SUPPLIER_ID, SingleSupplierMatcher};

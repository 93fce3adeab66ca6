//! `hs-core`: foundational types for the hotel booking simulator.
//!
//! This crate is a dependency of every other `hs-*` crate.  It has no `hs-*`
//! dependencies of its own.
//!
//! # What lives here
//!
//! | Module          | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`ids`]         | `TravellerId`, `Persona`, `HotelId`, `ResellerId`, `Supplier` |
//! | [`day`]         | `Day`, `DayRange`, `SimClock`                               |
//! | [`rng`]         | `TravellerRng` (per-traveller), `fresh_seed`                |
//! | [`config`]      | `SimConfig`, `HotelConfig`, `ResellerConfig`, multipliers   |
//! | [`error`]       | `HsError`, `HsResult`                                       |

pub mod config;
pub mod day;
pub mod error;
pub mod ids;
pub mod rng;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{AllocationRules, HotelConfig, LeadTimeMultipliers, ResellerConfig, SimConfig};
pub use day::{Day, DayRange, SimClock};
pub use error::{HsError, HsResult};
pub use ids::{HotelId, Persona, ResellerId, SimulationId, Supplier, SupplierType, TravellerId};
pub use rng::{TravellerRng, fresh_seed};

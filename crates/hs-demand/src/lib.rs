//! `hs-demand`: travellers, itineraries, and synthetic demand generation.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`demand`]      | `Demand` (one day's willingness to pay for a stay)        |
//! | [`itinerary`]   | `Itinerary`, `Traveller`, `Population`                    |
//! | [`scheduler`]   | `schedule`, `ScheduledTrip` (non-overlapping trip starts) |
//! | [`generator`]   | `ItineraryGenerator` (casual and business persona models) |
//! | [`error`]       | `DemandError`, `DemandResult<T>`                          |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                     |
//! |------------|------------------------------------------------------------|
//! | `parallel` | Generate travellers on the Rayon pool (same output).       |

pub mod demand;
pub mod error;
pub mod generator;
pub mod itinerary;
pub mod scheduler;


pub use demand::Demand;
pub use error::{DemandError, DemandResult};
pub use generator::ItineraryGenerator;
pub use itinerary::{Itinerary, Population, Traveller};
pub use scheduler::{CASUAL_BLOCKOUT_DAYS, ScheduledTrip, schedule};

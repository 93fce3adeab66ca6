//! Itinerary generator: synthesises travellers and their per-day demand.
//!
//! # Persona models
//!
//! ```text
//! casual   (2 trips):  length ~ round(N(8, 2))            blockout 25 days
//!                      max    ~ N(110, 20), min = max * U(0.7, 0.9)
//!                      shop   [start - U{20..50}, start - U{5..15}]
//!                      price  rises linearly from min to max over the window
//!
//! business (5 trips):  lengths 1 x round(N(20, 5)) + 4 x round(N(5, 1))
//!                      max    ~ N(150, 10), flat for the whole window
//!                      shop   [start - U{3..7}, start - 1]
//! ```
//!
//! Lengths are floored at one night, stays are clipped to the last stay day,
//! and shopping windows never start before the earliest shopping day.

use hs_core::{Day, DayRange, Persona, TravellerId, TravellerRng, fresh_seed};

use crate::scheduler::{self, ScheduledTrip};
use crate::{Demand, DemandError, DemandResult, Itinerary, Population, Traveller};

/// Produces a [`Population`] from the persona models.
///
/// Deterministic for a fixed seed: traveller *k* (in generation order) always
/// draws from `TravellerRng::new(seed, k)`.
#[derive(Clone, Debug)]
pub struct ItineraryGenerator {
    seed:              u64,
    stays:             DayRange,
    earliest_shopping: Day,
}

impl ItineraryGenerator {
    /// Generator over the standard windows (stays `0..=99`, shopping from -20).
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            stays: DayRange::new(Day::FIRST_STAY, Day::LAST),
            earliest_shopping: Day::FIRST_SHOPPING,
        }
    }

    /// Generator seeded from OS entropy; every call samples a fresh population.
    pub fn from_entropy() -> Self {
        Self::new(fresh_seed())
    }

    /// Override the stay and shopping windows.
    pub fn with_windows(mut self, stays: DayRange, earliest_shopping: Day) -> Self {
        self.stays = stays;
        self.earliest_shopping = earliest_shopping;
        self
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generate `total` travellers, `floor(total * proportion_casual)` of them
    /// casual.  Casual travellers come first.
    pub fn generate(&self, total: usize, proportion_casual: f64) -> DemandResult<Population> {
        if !(0.0..=1.0).contains(&proportion_casual) {
            return Err(DemandError::InvalidProportion(proportion_casual));
        }
        let num_casual = ((total as f64) * proportion_casual).floor() as usize;
        let num_casual = num_casual.min(total);

        tracing::info!(
            total,
            casual = num_casual,
            business = total - num_casual,
            seed = self.seed,
            "generating travellers"
        );

        let travellers = self.generate_range(total, num_casual)?;
        let population = Population::new(travellers);

        tracing::info!(
            itineraries = population.total_itineraries(),
            demands = population.total_demands(),
            "demand generation complete"
        );
        Ok(population)
    }

    #[cfg(not(feature = "parallel"))]
    fn generate_range(&self, total: usize, num_casual: usize) -> DemandResult<Vec<Traveller>> {
        (0..total).map(|k| self.traveller_at(k, num_casual)).collect()
    }

    #[cfg(feature = "parallel")]
    fn generate_range(&self, total: usize, num_casual: usize) -> DemandResult<Vec<Traveller>> {
        use rayon::prelude::*;
        (0..total).into_par_iter().map(|k| self.traveller_at(k, num_casual)).collect()
    }

    /// Build the `k`-th traveller of a run with `num_casual` casual travellers.
    fn traveller_at(&self, k: usize, num_casual: usize) -> DemandResult<Traveller> {
        let mut rng = TravellerRng::new(self.seed, k as u64);
        let (persona, seq) = if k < num_casual {
            (Persona::Casual, k + 1)
        } else {
            (Persona::Business, k - num_casual + 1)
        };
        let traveller_id = TravellerId::new(persona, seq as u32);
        let itineraries = match persona {
            Persona::Casual => self.casual_itineraries(&mut rng)?,
            Persona::Business => self.business_itineraries(&mut rng)?,
        };
        Ok(Traveller { traveller_id, itineraries })
    }

    // ── Casual ────────────────────────────────────────────────────────────────

    fn casual_itineraries(&self, rng: &mut TravellerRng) -> DemandResult<Vec<Itinerary>> {
        let trips = scheduler::schedule(rng, Persona::Casual.trips_per_year(), self.horizon(), None)?;
        let mut out = Vec::with_capacity(trips.len());
        for (trip_id, trip) in trips.iter().enumerate() {
            let length = draw_length(rng, 8.0, 2.0);
            let stay = self.stay_for(trip, length);

            let base_max_price = rng.normal(110.0, 20.0);
            let min_price = base_max_price * rng.uniform(0.7, 0.9);

            let shop_start = (stay.start - rng.gen_range(20..=50)).max(self.earliest_shopping);
            let mut shop_end = stay.start - rng.gen_range(5..=15);
            if shop_end <= shop_start {
                shop_end = shop_start + 1;
            }
            let window = self.shopping_window(shop_start, shop_end, stay.start);

            let span = (window.end - window.start).max(1) as f64;
            let demands = window
                .iter()
                .map(|day| {
                    let progress = (day - window.start) as f64 / span;
                    Demand::new(day, stay, min_price + (base_max_price - min_price) * progress)
                })
                .collect();
            out.push(Itinerary::new(trip_id as u32, demands));
        }
        Ok(out)
    }

    // ── Business ──────────────────────────────────────────────────────────────

    fn business_itineraries(&self, rng: &mut TravellerRng) -> DemandResult<Vec<Itinerary>> {
        let mut lengths = Vec::with_capacity(Persona::Business.trips_per_year());
        lengths.push(draw_length(rng, 20.0, 5.0));
        for _ in 1..Persona::Business.trips_per_year() {
            lengths.push(draw_length(rng, 5.0, 1.0));
        }

        let trips = scheduler::schedule(rng, lengths.len(), self.horizon(), Some(&lengths))?;
        let mut out = Vec::with_capacity(trips.len());
        for (trip_id, trip) in trips.iter().enumerate() {
            let stay = self.stay_for(trip, trip.length.unwrap_or(1));
            let max_price = rng.normal(150.0, 10.0);

            let shop_start = (stay.start - rng.gen_range(3..=7)).max(self.earliest_shopping);
            let window = self.shopping_window(shop_start, stay.start - 1, stay.start);

            let demands = window.iter().map(|day| Demand::new(day, stay, max_price)).collect();
            out.push(Itinerary::new(trip_id as u32, demands));
        }
        Ok(out)
    }

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn horizon(&self) -> u32 {
        self.stays.len() as u32
    }

    fn stay_for(&self, trip: &ScheduledTrip, length: u32) -> DayRange {
        let start = self.stays.start + trip.start as i32;
        let end = (start + length as i32 - 1).min(self.stays.end);
        DayRange::new(start, end)
    }

    /// Clip a shopping window so it never reaches the check-in day.
    fn shopping_window(&self, start: Day, end: Day, check_in: Day) -> DayRange {
        let end = end.min(check_in - 1);
        let start = start.min(end);
        DayRange::new(start, end)
    }
}

/// `round(N(mean, sd))`, floored at one night.
fn draw_length(rng: &mut TravellerRng, mean: f64, sd: f64) -> u32 {
    rng.normal(mean, sd).round().max(1.0) as u32
}

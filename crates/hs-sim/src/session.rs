//! The explicit session context of one simulation run.
//!
//! A [`SimSession`] is created by [`SimSession::generate`] (fresh demand) or
//! [`SimSession::load`] (persisted demand) and owns everything the day loop
//! mutates apart from supply: the population, the booking log and the last
//! rejection seen for each itinerary.  Supply lives in the matching strategy.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use hs_core::{HotelId, ResellerId, SimConfig, SimulationId, TravellerId};
use hs_demand::{ItineraryGenerator, Population};
use hs_pricing::RejectionReason;
use hs_supply::Booking;

use crate::SimResult;

// ── SimulationParameters ──────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HotelSummary {
    pub hotel_id:    HotelId,
    pub name:        String,
    pub total_rooms: u32,
    pub base_price:  f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResellerSummary {
    pub reseller_id:             ResellerId,
    pub name:                    String,
    pub operating_cost_per_room: f64,
    pub profit_margin:           f64,
}

/// What a run was generated from.  Persisted alongside the population.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationParameters {
    pub simulation_id:        SimulationId,
    pub total_travellers:     usize,
    pub proportion_casual:    f64,
    /// Seed the population was drawn with.  `None` until generation.
    #[serde(default)]
    pub seed:                 Option<u64>,
    #[serde(default)]
    pub total_hotel_capacity: u64,
    #[serde(default)]
    pub hotels:               Vec<HotelSummary>,
    #[serde(default)]
    pub resellers:            Vec<ResellerSummary>,
}

impl SimulationParameters {
    /// Parameters with a clock-derived simulation id and no fixed seed.
    pub fn new(total_travellers: usize, proportion_casual: f64) -> Self {
        Self {
            simulation_id: SimulationId::from_clock(),
            total_travellers,
            proportion_casual,
            seed: None,
            total_hotel_capacity: 0,
            hotels: Vec::new(),
            resellers: Vec::new(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_simulation_id(mut self, id: impl Into<SimulationId>) -> Self {
        self.simulation_id = id.into();
        self
    }

    /// Copy the capacity total and supplier summaries out of `config`.
    pub fn describe(&mut self, config: &SimConfig) {
        self.total_hotel_capacity = config.total_hotel_capacity();
        self.hotels = config
            .hotels
            .iter()
            .map(|h| HotelSummary {
                hotel_id:    h.hotel_id.clone(),
                name:        h.name.clone(),
                total_rooms: h.total_rooms,
                base_price:  h.base_price,
            })
            .collect();
        self.resellers = config
            .resellers
            .iter()
            .map(|r| ResellerSummary {
                reseller_id:             r.reseller_id.clone(),
                name:                    r.name.clone(),
                operating_cost_per_room: r.operating_cost_per_room,
                profit_margin:           r.profit_margin,
            })
            .collect();
    }
}

// ── SimSession ────────────────────────────────────────────────────────────────

/// Key of one itinerary across the population.
pub type TripKey = (TravellerId, u32);

#[derive(Clone, Debug)]
pub struct SimSession {
    pub params:     SimulationParameters,
    pub population: Population,
    /// Every booking made so far, in commit order.
    pub bookings:   Vec<Booking>,
    /// Most recent rejection of each still-unbooked itinerary.
    pub rejections: BTreeMap<TripKey, RejectionReason>,
}

impl SimSession {
    /// Draw a fresh population.
    ///
    /// The seed in `params` is used when present; otherwise one is drawn from
    /// OS entropy and recorded back into the parameters.
    pub fn generate(mut params: SimulationParameters, config: &SimConfig) -> SimResult<Self> {
        let generator = match params.seed {
            Some(seed) => ItineraryGenerator::new(seed),
            None => ItineraryGenerator::from_entropy(),
        }
        .with_windows(config.operational_days(), config.shopping_start);

        let population = generator.generate(params.total_travellers, params.proportion_casual)?;
        params.seed = Some(generator.seed());
        params.describe(config);

        tracing::info!(
            sim = %params.simulation_id,
            travellers = population.len(),
            itineraries = population.total_itineraries(),
            demands = population.total_demands(),
            "demand generated"
        );
        Ok(Self::load(params, population))
    }

    /// Restore a session from persisted parameters and population.
    ///
    /// Itineraries keep their booked flags; the booking log starts empty.
    pub fn load(params: SimulationParameters, population: Population) -> Self {
        Self { params, population, bookings: Vec::new(), rejections: BTreeMap::new() }
    }

    #[inline]
    pub fn simulation_id(&self) -> &SimulationId {
        &self.params.simulation_id
    }

    /// Forget the booking log and rejection history.
    pub fn clear_log(&mut self) {
        self.bookings.clear();
        self.rejections.clear();
    }
}

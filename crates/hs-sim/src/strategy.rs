//! Matching strategies: how a demand is priced, checked and committed.
//!
//! The day loop in [`Sim`][crate::Sim] is the same for both operating modes.
//! Everything that differs sits behind [`MatchingStrategy`]:
//!
//! | Strategy                     | Supply                  | Prices                         |
//! |------------------------------|-------------------------|--------------------------------|
//! | [`MultiSupplierMatcher`]     | `SupplyLedger` (hotels + reseller allocations) | lead-time model, refreshed daily |
//! | [`SingleSupplierMatcher`]    | one `SharedCapacity` pool | caller's [`PriceSource`]     |

use hs_core::{Day, DayRange, HotelId, SimConfig, SimulationId, Supplier};
use hs_demand::Demand;
use hs_pricing::{
    DailyPriceTable, Offer, PriceSource, PriceTableStrategy, PricingEngine, PricingSummary, RejectionReason,
};
use hs_supply::{
    Booking, BookingRequest, InMemorySupplyStore, Occupancy, SharedCapacity, SupplierAvailability, SupplyLedger,
    SupplyResult, SupplyStore, unix_now,
};

use crate::{SimError, SimResult};

// ── MatchingStrategy ──────────────────────────────────────────────────────────

/// One operating mode of the matching engine.
pub trait MatchingStrategy {
    /// `true` once supply exists for `sim`.  The day loop refuses to run
    /// otherwise.
    fn is_ready(&self, sim: &SimulationId) -> bool;

    /// Called once at the top of every simulated day, before any demand.
    fn prepare_day(&mut self, sim: &SimulationId, day: Day) -> SimResult<()>;

    /// Best offer for `demand` under the prices in force today.
    fn evaluate(&self, sim: &SimulationId, demand: &Demand) -> Result<Offer, RejectionReason>;

    /// Take the rooms behind an accepted offer.
    ///
    /// On `Err` nothing has been consumed.
    fn commit(&mut self, request: &BookingRequest, offer: &Offer) -> SupplyResult<Booking>;

    /// Room-day totals over the bookable window.
    fn occupancy(&self, sim: &SimulationId) -> Occupancy;

    /// Revenue booked so far.
    fn revenue(&self, sim: &SimulationId) -> f64;

    /// Drop all supply state of `sim`.  Returns the number of records removed.
    fn cleanup(&mut self, sim: &SimulationId) -> usize;
}

// ── MultiSupplierMatcher ──────────────────────────────────────────────────────

/// Hotels and resellers priced by the lead-time model.
pub struct MultiSupplierMatcher<S: SupplyStore = InMemorySupplyStore> {
    config: SimConfig,
    ledger: SupplyLedger<S>,
}

impl MultiSupplierMatcher {
    /// Validate `config` and pair it with an empty in-memory ledger.
    pub fn new(config: SimConfig) -> SimResult<Self> {
        Self::with_ledger(config, SupplyLedger::default())
    }
}

impl<S: SupplyStore> MultiSupplierMatcher<S> {
    pub fn with_ledger(mut config: SimConfig, ledger: SupplyLedger<S>) -> SimResult<Self> {
        config.validate()?;
        Ok(Self { config, ledger })
    }

    /// Create supply for `sim`.  Returns the number of records created.
    pub fn initialize(&mut self, sim: &SimulationId) -> usize {
        self.ledger.initialize(sim, &self.config)
    }

    #[inline]
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    #[inline]
    pub fn ledger(&self) -> &SupplyLedger<S> {
        &self.ledger
    }

    #[inline]
    pub fn ledger_mut(&mut self) -> &mut SupplyLedger<S> {
        &mut self.ledger
    }

    #[inline]
    pub fn engine(&self) -> PricingEngine<'_> {
        PricingEngine::new(&self.config)
    }

    /// Every supplier with stock on `day`, hotels in configured order.
    pub fn available_suppliers(&self, sim: &SimulationId, day: Day) -> Vec<SupplierAvailability> {
        let hotels: Vec<HotelId> = self.config.hotels.iter().map(|h| h.hotel_id.clone()).collect();
        self.ledger.available_suppliers(sim, &hotels, day, &self.engine())
    }

    pub fn pricing_summary(&self, sim: &SimulationId, day: Day) -> PricingSummary {
        self.engine().pricing_summary(&self.ledger, sim, day)
    }
}

impl<S: SupplyStore> MatchingStrategy for MultiSupplierMatcher<S> {
    fn is_ready(&self, sim: &SimulationId) -> bool {
        self.ledger.is_initialized(sim)
    }

    fn prepare_day(&mut self, sim: &SimulationId, day: Day) -> SimResult<()> {
        if !self.ledger.is_initialized(sim) {
            return Err(SimError::NotInitialized(sim.clone()));
        }
        PricingEngine::new(&self.config).refresh_prices(&mut self.ledger, sim, day);
        Ok(())
    }

    fn evaluate(&self, sim: &SimulationId, demand: &Demand) -> Result<Offer, RejectionReason> {
        self.engine().best_offer(&self.ledger, sim, demand.stay(), demand.max_price_per_night)
    }

    fn commit(&mut self, request: &BookingRequest, _offer: &Offer) -> SupplyResult<Booking> {
        self.ledger.book(request, &PricingEngine::new(&self.config))
    }

    fn occupancy(&self, sim: &SimulationId) -> Occupancy {
        self.ledger.occupancy(sim, self.config.operational_days())
    }

    fn revenue(&self, sim: &SimulationId) -> f64 {
        self.ledger.revenue(sim, self.config.operational_days())
    }

    fn cleanup(&mut self, sim: &SimulationId) -> usize {
        self.ledger.cleanup(sim)
    }
}

// ── SingleSupplierMatcher ─────────────────────────────────────────────────────

/// Supplier id recorded on single-supplier bookings.
pub const SINGLE_SUPPLIER_ID: &str = "hotel";

/// One pool of rooms priced by an external table.
///
/// Each day the [`PriceSource`] is asked for the table in force.  A demand is
/// accepted when every night has a room and the mean table price over the
/// stay is at most its limit.  Capacity is checked first, so a demand that
/// fails both is a capacity rejection.
pub struct SingleSupplierMatcher<P: PriceSource = PriceTableStrategy> {
    source:   P,
    window:   DayRange,
    rooms:    u32,
    capacity: SharedCapacity,
    prices:   DailyPriceTable,
    revenue:  f64,
}

impl SingleSupplierMatcher<PriceTableStrategy> {
    /// Flat `price` on every night.
    pub fn fixed(price: f64, rooms: u32, window: DayRange) -> SimResult<Self> {
        Ok(Self::new(PriceTableStrategy::fixed(price)?, rooms, window))
    }

    /// Price rising from `min` (empty) to `max` (full) with utilisation.
    pub fn availability_linear(min: f64, max: f64, rooms: u32, window: DayRange) -> SimResult<Self> {
        Ok(Self::new(PriceTableStrategy::availability_linear(min, max)?, rooms, window))
    }
}

impl<P: PriceSource> SingleSupplierMatcher<P> {
    pub fn new(source: P, rooms: u32, window: DayRange) -> Self {
        Self {
            source,
            window,
            rooms,
            capacity: SharedCapacity::new(rooms, window),
            prices: DailyPriceTable::default(),
            revenue: 0.0,
        }
    }

    #[inline]
    pub fn capacity(&self) -> &SharedCapacity {
        &self.capacity
    }

    #[inline]
    pub fn capacity_mut(&mut self) -> &mut SharedCapacity {
        &mut self.capacity
    }

    /// The price table fetched at the start of the current day.
    #[inline]
    pub fn prices(&self) -> &DailyPriceTable {
        &self.prices
    }

    fn supplier() -> Supplier {
        Supplier::Hotel(HotelId::from(SINGLE_SUPPLIER_ID))
    }
}

impl<P: PriceSource> MatchingStrategy for SingleSupplierMatcher<P> {
    fn is_ready(&self, _sim: &SimulationId) -> bool {
        true
    }

    fn prepare_day(&mut self, _sim: &SimulationId, day: Day) -> SimResult<()> {
        self.prices = self.source.prices_for(day, &self.capacity);
        Ok(())
    }

    fn evaluate(&self, _sim: &SimulationId, demand: &Demand) -> Result<Offer, RejectionReason> {
        let stay = demand.stay();
        if !self.capacity.has_room(stay) {
            return Err(RejectionReason::Capacity);
        }
        match self.prices.mean_over(stay) {
            Some(avg) if avg <= demand.max_price_per_night => {
                let supplier = Self::supplier();
                Ok(Offer {
                    hotel_id:    HotelId::from(SINGLE_SUPPLIER_ID),
                    supplier,
                    avg_price:   avg,
                    total_price: avg * stay.len() as f64,
                })
            }
            _ => Err(RejectionReason::Price),
        }
    }

    fn commit(&mut self, request: &BookingRequest, offer: &Offer) -> SupplyResult<Booking> {
        self.capacity.consume(request.stay)?;
        let total_price = offer.avg_price * request.stay.len() as f64;
        self.revenue += total_price;
        Ok(Booking {
            simulation_id:   request.simulation_id.clone(),
            traveller_id:    request.traveller_id,
            trip_id:         request.trip_id,
            supplier:        Self::supplier(),
            hotel_id:        HotelId::from(SINGLE_SUPPLIER_ID),
            booking_day:     request.booking_day,
            stay:            request.stay,
            price_per_night: offer.avg_price,
            total_price,
            created_at:      unix_now(),
        })
    }

    fn occupancy(&self, _sim: &SimulationId) -> Occupancy {
        self.capacity.occupancy()
    }

    fn revenue(&self, _sim: &SimulationId) -> f64 {
        self.revenue
    }

    /// Restore the pool to full capacity.  Returns the number of days reset.
    fn cleanup(&mut self, _sim: &SimulationId) -> usize {
        self.capacity = SharedCapacity::new(self.rooms, self.window);
        self.prices = DailyPriceTable::default();
        self.revenue = 0.0;
        self.window.len()
    }
}

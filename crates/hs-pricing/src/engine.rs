//! The multi-supplier pricing engine.
//!
//! # Prices
//!
//! ```text
//! hotel     base_price * multiplier(stay_day - current_day)
//! reseller  (cost_basis + operating_cost_per_room) * (1 + profit_margin)
//! ```
//!
//! Hotel prices are written into the ledger by [`PricingEngine::refresh_prices`]
//! once per simulated day, so offer evaluation and booking both read the
//! stored price.  Reseller prices are derived on demand from the allocation's
//! fixed cost basis.
//!
//! # Offer selection
//!
//! Candidates are enumerated hotel by hotel: the hotel's direct offer, then
//! each configured reseller's offer on that hotel.  An offer is valid when
//! the supplier has a room on every night and the mean nightly price is at
//! most the traveller's limit.  The cheapest valid offer wins; on a tie the
//! first one enumerated is kept.

use std::fmt;

use serde::{Deserialize, Serialize};

use hs_core::{Day, DayRange, HotelConfig, HotelId, ResellerConfig, ResellerId, SimConfig, SimulationId, Supplier};
use hs_supply::{DailySupply, RateCard, SupplyLedger, SupplyStore};

// ── Offer / RejectionReason ───────────────────────────────────────────────────

/// A priced, fulfillable offer for one stay.
#[derive(Clone, Debug, PartialEq)]
pub struct Offer {
    pub supplier:    Supplier,
    pub hotel_id:    HotelId,
    /// Mean nightly price over the stay.
    pub avg_price:   f64,
    pub total_price: f64,
}

/// Why a demand found no offer.
///
/// When price and capacity both fail the outcome is reported as `Capacity`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    /// Some supplier had rooms for the whole stay but every such offer was
    /// above the traveller's limit.
    Price,
    /// No supplier had rooms for the whole stay.
    Capacity,
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RejectionReason::Price => "price",
            RejectionReason::Capacity => "capacity",
        })
    }
}

// ── Pricing summary ───────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HotelQuote {
    pub hotel_id:        HotelId,
    pub name:            String,
    pub price:           f64,
    pub rooms_available: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResellerQuote {
    pub reseller_id:     ResellerId,
    pub name:            String,
    pub hotel_id:        HotelId,
    pub price:           f64,
    pub rooms_available: u32,
}

/// Every supplier's price and stock on one stay day.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PricingSummary {
    pub day:       Day,
    pub hotels:    Vec<HotelQuote>,
    pub resellers: Vec<ResellerQuote>,
}

// ── PricingEngine ─────────────────────────────────────────────────────────────

/// Prices hotels and resellers from a [`SimConfig`].
#[derive(Clone, Copy, Debug)]
pub struct PricingEngine<'a> {
    config: &'a SimConfig,
}

impl<'a> PricingEngine<'a> {
    pub fn new(config: &'a SimConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &'a SimConfig {
        self.config
    }

    /// Direct price of `hotel` for `stay_day` as seen on `current_day`.
    pub fn hotel_price(&self, hotel: &HotelConfig, current_day: Day, stay_day: Day) -> f64 {
        let lead_time = stay_day - current_day;
        hotel.base_price * hotel.lead_time_multipliers.for_lead_time(lead_time)
    }

    /// Cost-plus price a reseller charges for rooms carved at `cost_basis`.
    pub fn reseller_price(&self, reseller: &ResellerConfig, cost_basis: f64) -> f64 {
        (cost_basis + reseller.operating_cost_per_room) * (1.0 + reseller.profit_margin)
    }

    /// Reprice every hotel for every operational day from `current_day` on.
    ///
    /// Returns the number of records rewritten.
    pub fn refresh_prices<S: SupplyStore>(
        &self,
        ledger: &mut SupplyLedger<S>,
        sim: &SimulationId,
        current_day: Day,
    ) -> usize {
        let window = self.config.operational_days().from_day(current_day);
        let mut updated = 0;
        for hotel in &self.config.hotels {
            for day in window.iter() {
                if let Some(rec) = ledger.get_mut(sim, &hotel.hotel_id, day) {
                    rec.hotel_price = self.hotel_price(hotel, current_day, day);
                    updated += 1;
                }
            }
        }
        tracing::debug!(day = current_day.0, updated, "hotel prices refreshed");
        updated
    }

    /// Cheapest valid offer for `stay` at or below `max_price`.
    pub fn best_offer<S: SupplyStore>(
        &self,
        ledger: &SupplyLedger<S>,
        sim: &SimulationId,
        stay: DayRange,
        max_price: f64,
    ) -> Result<Offer, RejectionReason> {
        if stay.is_empty() {
            return Err(RejectionReason::Capacity);
        }
        let mut best: Option<Offer> = None;
        let mut any_capacity = false;

        for hotel in &self.config.hotels {
            let candidates = std::iter::once(Supplier::Hotel(hotel.hotel_id.clone()))
                .chain(self.config.resellers.iter().map(|r| Supplier::Reseller(r.reseller_id.clone())));
            for supplier in candidates {
                let Some(total) = self.quote(ledger, sim, &supplier, &hotel.hotel_id, stay) else {
                    continue;
                };
                any_capacity = true;
                let avg = total / stay.len() as f64;
                if avg > max_price {
                    continue;
                }
                if best.as_ref().is_none_or(|b| avg < b.avg_price) {
                    best = Some(Offer { supplier, hotel_id: hotel.hotel_id.clone(), avg_price: avg, total_price: total });
                }
            }
        }

        match best {
            Some(offer) => Ok(offer),
            None if any_capacity => Err(RejectionReason::Price),
            None => Err(RejectionReason::Capacity),
        }
    }

    /// Total price of `stay` from `supplier` at `hotel`, or `None` if some
    /// night has no room or no rate.
    fn quote<S: SupplyStore>(
        &self,
        ledger: &SupplyLedger<S>,
        sim: &SimulationId,
        supplier: &Supplier,
        hotel: &HotelId,
        stay: DayRange,
    ) -> Option<f64> {
        let mut total = 0.0;
        for day in stay.iter() {
            let rec = ledger.get(sim, hotel, day)?;
            if !rec.has_room_for(supplier) {
                return None;
            }
            total += self.nightly_rate(rec, supplier)?;
        }
        Some(total)
    }

    /// Price and stock of every supplier on `day`.
    pub fn pricing_summary<S: SupplyStore>(
        &self,
        ledger: &SupplyLedger<S>,
        sim: &SimulationId,
        day: Day,
    ) -> PricingSummary {
        let mut summary = PricingSummary { day, hotels: Vec::new(), resellers: Vec::new() };
        for hotel in &self.config.hotels {
            let Some(rec) = ledger.get(sim, &hotel.hotel_id, day) else { continue };
            summary.hotels.push(HotelQuote {
                hotel_id: hotel.hotel_id.clone(),
                name: hotel.name.clone(),
                price: rec.hotel_price,
                rooms_available: rec.hotel_rooms_remaining,
            });
            for alloc in &rec.allocations {
                let Some(reseller) = self.config.reseller(&alloc.reseller_id) else { continue };
                summary.resellers.push(ResellerQuote {
                    reseller_id: reseller.reseller_id.clone(),
                    name: reseller.name.clone(),
                    hotel_id: hotel.hotel_id.clone(),
                    price: self.reseller_price(reseller, alloc.cost_basis),
                    rooms_available: alloc.rooms_remaining,
                });
            }
        }
        summary
    }
}

impl RateCard for PricingEngine<'_> {
    fn nightly_rate(&self, supply: &DailySupply, supplier: &Supplier) -> Option<f64> {
        match supplier {
            Supplier::Hotel(_) => Some(supply.hotel_price),
            Supplier::Reseller(id) => {
                let alloc = supply.allocation(id)?;
                let reseller = self.config.reseller(id)?;
                Some(self.reseller_price(reseller, alloc.cost_basis))
            }
        }
    }
}

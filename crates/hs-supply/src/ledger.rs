//! The `SupplyLedger`: initialization, queries, and check-then-commit booking.
//!
//! # Booking protocol
//!
//! `book` runs in two passes over the stay:
//!
//! 1. **Verify** every night: the record exists, the supplier has a room,
//!    and a rate is available.  Any failure returns `Err` with nothing
//!    changed.
//! 2. **Commit** every night: take one room and add the mean nightly price
//!    to the day's revenue.
//!
//! The ledger takes `&mut self` for the whole operation, so two bookings on
//! the same `(hotel, day)` can never interleave between the passes.

use hs_core::{Day, DayRange, HotelId, SimConfig, SimulationId, Supplier};

use crate::record::unix_now;
use crate::{Booking, BookingRequest, DailySupply, InMemorySupplyStore, SupplyError, SupplyResult, SupplyStore};

// ── RateCard ──────────────────────────────────────────────────────────────────

/// Supplies the nightly price a supplier charges on one hotel-day.
///
/// Implemented by the pricing engine.  Returning `None` means the supplier
/// has no price on that day (e.g. an unknown reseller).
pub trait RateCard {
    fn nightly_rate(&self, supply: &DailySupply, supplier: &Supplier) -> Option<f64>;
}

// ── Query results ─────────────────────────────────────────────────────────────

/// A supplier with stock on a given day.
#[derive(Clone, Debug, PartialEq)]
pub struct SupplierAvailability {
    pub supplier:        Supplier,
    pub hotel_id:        HotelId,
    pub rooms_available: u32,
    pub price:           f64,
}

/// Room-day totals over a window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Occupancy {
    /// Capacity summed over every record in the window.
    pub total_room_days:  u64,
    /// Rooms no longer held by the hotel directly, summed over the window.
    pub booked_room_days: u64,
}

impl Occupancy {
    /// Booked share of capacity, in percent.  Zero for an empty window.
    pub fn rate_percent(&self) -> f64 {
        if self.total_room_days == 0 {
            0.0
        } else {
            self.booked_room_days as f64 / self.total_room_days as f64 * 100.0
        }
    }
}

// ── SupplyLedger ──────────────────────────────────────────────────────────────

/// Per-hotel per-day inventory for any number of simulations.
pub struct SupplyLedger<S: SupplyStore = InMemorySupplyStore> {
    store: S,
}

impl Default for SupplyLedger<InMemorySupplyStore> {
    fn default() -> Self {
        Self::new(InMemorySupplyStore::new())
    }
}

impl<S: SupplyStore> SupplyLedger<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Create supply for `sim` from `config`, replacing any previous records.
    ///
    /// Every hotel gets one record per operational day at full capacity and
    /// base price.  Then, for each reseller and each scheduled allocation day
    /// inside the operational window, the reseller's rule for each hotel
    /// carves `min(rule, hotel_rooms_remaining)` rooms on every day from the
    /// allocation day to the end of the window.  Schedules are cumulative.
    ///
    /// Returns the number of records created.
    pub fn initialize(&mut self, sim: &SimulationId, config: &SimConfig) -> usize {
        let removed = self.store.delete_simulation(sim);
        if removed > 0 {
            tracing::debug!(%sim, removed, "replacing existing supply");
        }

        let window = config.operational_days();
        let mut created = 0;
        for hotel in &config.hotels {
            for day in window.iter() {
                self.store
                    .upsert(sim, DailySupply::new(hotel.hotel_id.clone(), day, hotel.total_rooms, hotel.base_price));
                created += 1;
            }
        }

        for reseller in &config.resellers {
            let Some(rules) = config.allocation_rules.get(&reseller.reseller_id) else {
                continue;
            };
            for &alloc_day in &reseller.allocation_schedule {
                if alloc_day < window.start {
                    continue;
                }
                for (hotel_id, &rooms) in rules {
                    let mut carved = 0u64;
                    for day in window.from_day(alloc_day).iter() {
                        if let Some(rec) = self.store.get_mut(sim, hotel_id, day) {
                            carved += rec.carve(&reseller.reseller_id, rooms) as u64;
                        }
                    }
                    tracing::debug!(
                        reseller = %reseller.reseller_id,
                        hotel = %hotel_id,
                        from = alloc_day.0,
                        room_days = carved,
                        "allocated reseller inventory"
                    );
                }
            }
        }

        tracing::info!(%sim, records = created, "supply initialized");
        created
    }

    #[inline]
    pub fn is_initialized(&self, sim: &SimulationId) -> bool {
        self.store.contains_simulation(sim)
    }

    #[inline]
    pub fn get(&self, sim: &SimulationId, hotel: &HotelId, day: Day) -> Option<&DailySupply> {
        self.store.get(sim, hotel, day)
    }

    #[inline]
    pub fn get_mut(&mut self, sim: &SimulationId, hotel: &HotelId, day: Day) -> Option<&mut DailySupply> {
        self.store.get_mut(sim, hotel, day)
    }

    /// Hotels with supply for `sim`.
    pub fn hotel_ids(&self, sim: &SimulationId) -> Vec<HotelId> {
        self.store.hotel_ids(sim)
    }

    /// Verify then commit one booking.  See the module docs.
    pub fn book<R: RateCard>(&mut self, req: &BookingRequest, rates: &R) -> SupplyResult<Booking> {
        if req.stay.is_empty() {
            return Err(SupplyError::EmptyStay);
        }
        let sim = &req.simulation_id;
        let hotel = &req.hotel_id;
        if !self.is_initialized(sim) {
            return Err(SupplyError::NotInitialized(sim.clone()));
        }

        let mut total_price = 0.0;
        for day in req.stay.iter() {
            let rec = self
                .store
                .get(sim, hotel, day)
                .ok_or_else(|| SupplyError::MissingSupply { hotel: hotel.clone(), day })?;
            if !rec.has_room_for(&req.supplier) {
                tracing::warn!(supplier = %req.supplier, %hotel, day = day.0, "booking re-verification failed");
                return Err(SupplyError::Unavailable { supplier: req.supplier.clone(), hotel: hotel.clone(), day });
            }
            total_price += rates.nightly_rate(rec, &req.supplier).ok_or_else(|| SupplyError::MissingRate {
                supplier: req.supplier.clone(),
                hotel: hotel.clone(),
                day,
            })?;
        }
        let price_per_night = total_price / req.stay.len() as f64;

        for day in req.stay.iter() {
            // Verified above; a miss here would mean the store changed between
            // passes, which `&mut self` rules out.
            if let Some(rec) = self.store.get_mut(sim, hotel, day) {
                rec.take_room(&req.supplier, price_per_night);
            }
        }

        tracing::debug!(
            traveller = %req.traveller_id,
            trip = req.trip_id,
            supplier = %req.supplier,
            %hotel,
            stay = %req.stay,
            price_per_night,
            "booking committed"
        );

        Ok(Booking {
            simulation_id: sim.clone(),
            traveller_id: req.traveller_id,
            trip_id: req.trip_id,
            supplier: req.supplier.clone(),
            hotel_id: hotel.clone(),
            booking_day: req.booking_day,
            stay: req.stay,
            price_per_night,
            total_price,
            created_at: unix_now(),
        })
    }

    /// Every supplier with stock on `day`: each hotel with direct rooms, then
    /// that hotel's reseller allocations with rooms left.
    pub fn available_suppliers<R: RateCard>(
        &self,
        sim: &SimulationId,
        hotels: &[HotelId],
        day: Day,
        rates: &R,
    ) -> Vec<SupplierAvailability> {
        let mut out = Vec::new();
        for hotel in hotels {
            let Some(rec) = self.store.get(sim, hotel, day) else { continue };
            let direct = Supplier::Hotel(hotel.clone());
            if rec.hotel_rooms_remaining > 0 {
                if let Some(price) = rates.nightly_rate(rec, &direct) {
                    out.push(SupplierAvailability {
                        supplier: direct,
                        hotel_id: hotel.clone(),
                        rooms_available: rec.hotel_rooms_remaining,
                        price,
                    });
                }
            }
            for alloc in rec.allocations.iter().filter(|a| a.rooms_remaining > 0) {
                let supplier = Supplier::Reseller(alloc.reseller_id.clone());
                if let Some(price) = rates.nightly_rate(rec, &supplier) {
                    out.push(SupplierAvailability {
                        supplier,
                        hotel_id: hotel.clone(),
                        rooms_available: alloc.rooms_remaining,
                        price,
                    });
                }
            }
        }
        out
    }

    /// Room-day totals for `sim` over `window`, across every hotel.
    pub fn occupancy(&self, sim: &SimulationId, window: DayRange) -> Occupancy {
        let mut occ = Occupancy::default();
        for hotel in self.store.hotel_ids(sim) {
            for day in window.iter() {
                if let Some(rec) = self.store.get(sim, &hotel, day) {
                    occ.total_room_days += rec.hotel_rooms_total as u64;
                    occ.booked_room_days += rec.rooms_out_of_hotel() as u64;
                }
            }
        }
        occ
    }

    /// Sum of `total_revenue` over every record of `sim` in `window`.
    pub fn revenue(&self, sim: &SimulationId, window: DayRange) -> f64 {
        self.store
            .hotel_ids(sim)
            .iter()
            .flat_map(|hotel| window.iter().filter_map(move |day| self.store.get(sim, hotel, day)))
            .map(|rec| rec.total_revenue)
            .sum()
    }

    /// Drop all supply of `sim`.  Returns the number of records removed.
    pub fn cleanup(&mut self, sim: &SimulationId) -> usize {
        let removed = self.store.delete_simulation(sim);
        tracing::info!(%sim, removed, "supply cleaned up");
        removed
    }
}

//! Supply records: `DailySupply`, `ResellerAllocation`, and `Booking`.
//!
//! # Inventory partition
//!
//! Each `(hotel, day)` record owns its reseller sub-ledger by value.  A
//! `ResellerAllocation` holds a copied `cost_basis` and its own remaining
//! count; it never refers back to the hotel record.  Carving rooms moves
//! them out of `hotel_rooms_remaining`, so at all times
//!
//! ```text
//! hotel_rooms_remaining + Σ rooms_allocated <= hotel_rooms_total
//! ```

use serde::{Deserialize, Serialize};

use hs_core::{Day, DayRange, HotelId, ResellerId, SimulationId, Supplier, SupplierType, TravellerId};

// ── ResellerAllocation ────────────────────────────────────────────────────────

/// Rooms a reseller holds for one hotel-day.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResellerAllocation {
    pub reseller_id:     ResellerId,
    pub rooms_allocated: u32,
    pub rooms_remaining: u32,
    /// Hotel price when the rooms were first carved.  Never repriced.
    pub cost_basis:      f64,
}

// ── DailySupply ───────────────────────────────────────────────────────────────

/// Inventory and running totals for one hotel on one stay day.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DailySupply {
    pub hotel_id:              HotelId,
    pub day:                   Day,
    pub hotel_rooms_total:     u32,
    pub hotel_rooms_remaining: u32,
    /// Current direct price, rewritten by each pricing sweep.
    pub hotel_price:           f64,
    pub allocations:           Vec<ResellerAllocation>,
    pub bookings_count:        u32,
    pub total_revenue:         f64,
}

impl DailySupply {
    /// A fresh record with full hotel capacity and no allocations.
    pub fn new(hotel_id: HotelId, day: Day, total_rooms: u32, price: f64) -> Self {
        Self {
            hotel_id,
            day,
            hotel_rooms_total: total_rooms,
            hotel_rooms_remaining: total_rooms,
            hotel_price: price,
            allocations: Vec::new(),
            bookings_count: 0,
            total_revenue: 0.0,
        }
    }

    pub fn allocation(&self, reseller: &ResellerId) -> Option<&ResellerAllocation> {
        self.allocations.iter().find(|a| &a.reseller_id == reseller)
    }

    fn allocation_mut(&mut self, reseller: &ResellerId) -> Option<&mut ResellerAllocation> {
        self.allocations.iter_mut().find(|a| &a.reseller_id == reseller)
    }

    /// Sum of rooms ever carved out for resellers.
    pub fn rooms_allocated(&self) -> u32 {
        self.allocations.iter().map(|a| a.rooms_allocated).sum()
    }

    /// Rooms the hotel no longer holds directly (sold or carved).
    pub fn rooms_out_of_hotel(&self) -> u32 {
        self.hotel_rooms_total - self.hotel_rooms_remaining
    }

    /// Rooms `supplier` can still sell on this day.
    pub fn rooms_for(&self, supplier: &Supplier) -> u32 {
        match supplier {
            Supplier::Hotel(h) if h == &self.hotel_id => self.hotel_rooms_remaining,
            Supplier::Hotel(_) => 0,
            Supplier::Reseller(r) => self.allocation(r).map_or(0, |a| a.rooms_remaining),
        }
    }

    #[inline]
    pub fn has_room_for(&self, supplier: &Supplier) -> bool {
        self.rooms_for(supplier) > 0
    }

    /// Carve up to `rooms` from the hotel pool for `reseller` at the current
    /// hotel price.  Returns the number actually carved.
    ///
    /// A repeat allocation grows the reseller's existing entry and keeps its
    /// original cost basis.
    pub fn carve(&mut self, reseller: &ResellerId, rooms: u32) -> u32 {
        let n = rooms.min(self.hotel_rooms_remaining);
        if n == 0 {
            return 0;
        }
        self.hotel_rooms_remaining -= n;
        let price = self.hotel_price;
        match self.allocation_mut(reseller) {
            Some(a) => {
                a.rooms_allocated += n;
                a.rooms_remaining += n;
            }
            None => self.allocations.push(ResellerAllocation {
                reseller_id: reseller.clone(),
                rooms_allocated: n,
                rooms_remaining: n,
                cost_basis: price,
            }),
        }
        n
    }

    /// Take one room from `supplier`'s stock and book `revenue` against the
    /// day.  Returns `false`, changing nothing, if the supplier has no room.
    pub fn take_room(&mut self, supplier: &Supplier, revenue: f64) -> bool {
        let taken = match supplier {
            Supplier::Hotel(h) if h == &self.hotel_id => match self.hotel_rooms_remaining.checked_sub(1) {
                Some(left) => {
                    self.hotel_rooms_remaining = left;
                    true
                }
                None => false,
            },
            Supplier::Hotel(_) => false,
            Supplier::Reseller(r) => match self.allocation_mut(r) {
                Some(a) if a.rooms_remaining > 0 => {
                    a.rooms_remaining -= 1;
                    true
                }
                _ => false,
            },
        };
        if taken {
            self.bookings_count += 1;
            self.total_revenue += revenue;
        }
        taken
    }
}

// ── Booking ───────────────────────────────────────────────────────────────────

/// Everything the ledger needs to commit one booking.
#[derive(Clone, Debug, PartialEq)]
pub struct BookingRequest {
    pub simulation_id: SimulationId,
    pub supplier:      Supplier,
    pub hotel_id:      HotelId,
    pub stay:          DayRange,
    pub booking_day:   Day,
    pub traveller_id:  TravellerId,
    pub trip_id:       u32,
}

/// Immutable record of a successful match.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub simulation_id:   SimulationId,
    pub traveller_id:    TravellerId,
    pub trip_id:         u32,
    #[serde(flatten)]
    pub supplier:        Supplier,
    pub hotel_id:        HotelId,
    pub booking_day:     Day,
    pub stay:            DayRange,
    pub price_per_night: f64,
    pub total_price:     f64,
    /// Wall-clock creation time, Unix seconds.
    pub created_at:      i64,
}

impl Booking {
    pub fn supplier_type(&self) -> SupplierType {
        self.supplier.kind()
    }

    pub fn nights(&self) -> usize {
        self.stay.len()
    }
}

/// Current Unix time in seconds.
pub fn unix_now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

//! Derived statistics: per-day counters, run totals, and missed demand.
//!
//! Nothing here is persisted state.  Every figure is recomputed from the
//! booking log, the strategy's occupancy, and the population.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use hs_core::{Day, DayRange, Persona, SupplierType, TravellerId};
use hs_demand::Population;
use hs_pricing::RejectionReason;
use hs_supply::{Booking, Occupancy};

use crate::session::TripKey;

// ── DayStats ──────────────────────────────────────────────────────────────────

/// Counters for one simulated day.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct DayStats {
    pub day:                 Day,
    /// Unbooked itineraries with a demand on this day.
    pub demands_checked:     u32,
    pub bookings:            u32,
    pub price_rejections:    u32,
    pub capacity_rejections: u32,
    /// Sum of `total_price` over today's bookings.
    pub revenue:             f64,
}

impl DayStats {
    pub fn new(day: Day) -> Self {
        Self { day, ..Self::default() }
    }

    pub fn record_rejection(&mut self, reason: RejectionReason) {
        match reason {
            RejectionReason::Price => self.price_rejections += 1,
            RejectionReason::Capacity => self.capacity_rejections += 1,
        }
    }
}

// ── SimulationStatistics ──────────────────────────────────────────────────────

/// Run totals.
///
/// ```text
/// occupancy_rate       booked_room_days / total_room_days * 100
/// avg_price_per_night  total_revenue / booked_room_days
/// revpar               total_revenue / total_room_days
/// adr                  total_revenue / booked_room_nights
/// ```
///
/// `booked_room_days` is counted from the hotels' side, so rooms carved out
/// for resellers count as booked.  `booked_room_nights` counts only nights
/// actually sold to travellers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct SimulationStatistics {
    pub total_bookings:      usize,
    pub hotel_bookings:      usize,
    pub reseller_bookings:   usize,
    pub total_revenue:       f64,
    pub total_room_days:     u64,
    pub booked_room_days:    u64,
    pub booked_room_nights:  u64,
    pub occupancy_rate:      f64,
    pub avg_price_per_night: f64,
    pub revpar:              f64,
    pub adr:                 f64,
}

impl SimulationStatistics {
    pub fn compute(bookings: &[Booking], occupancy: Occupancy, total_revenue: f64) -> Self {
        let hotel_bookings = bookings.iter().filter(|b| b.supplier_type() == SupplierType::Hotel).count();
        let booked_room_nights: u64 = bookings.iter().map(|b| b.nights() as u64).sum();
        Self {
            total_bookings: bookings.len(),
            hotel_bookings,
            reseller_bookings: bookings.len() - hotel_bookings,
            total_revenue,
            total_room_days: occupancy.total_room_days,
            booked_room_days: occupancy.booked_room_days,
            booked_room_nights,
            occupancy_rate: occupancy.rate_percent(),
            avg_price_per_night: ratio(total_revenue, occupancy.booked_room_days),
            revpar: ratio(total_revenue, occupancy.total_room_days),
            adr: ratio(total_revenue, booked_room_nights),
        }
    }
}

fn ratio(num: f64, den: u64) -> f64 {
    if den == 0 { 0.0 } else { num / den as f64 }
}

impl fmt::Display for SimulationStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  bookings            {:>12}", self.total_bookings)?;
        writeln!(f, "    via hotel         {:>12}", self.hotel_bookings)?;
        writeln!(f, "    via reseller      {:>12}", self.reseller_bookings)?;
        writeln!(f, "  revenue             {:>12.2}", self.total_revenue)?;
        writeln!(f, "  room-days           {:>12}", self.total_room_days)?;
        writeln!(f, "  booked room-days    {:>12}", self.booked_room_days)?;
        writeln!(f, "  sold room-nights    {:>12}", self.booked_room_nights)?;
        writeln!(f, "  occupancy           {:>11.1}%", self.occupancy_rate)?;
        writeln!(f, "  avg price / night   {:>12.2}", self.avg_price_per_night)?;
        writeln!(f, "  RevPAR              {:>12.2}", self.revpar)?;
        write!(f, "  ADR                 {:>12.2}", self.adr)
    }
}

// ── Missed demand ─────────────────────────────────────────────────────────────

/// One itinerary that never booked.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MissedItinerary {
    pub traveller_id:    TravellerId,
    pub persona:         Persona,
    pub trip_id:         u32,
    pub shopping_window: DayRange,
    pub stay:            DayRange,
    pub nights:          usize,
    pub min_price:       f64,
    pub max_price:       f64,
    /// `None` if the itinerary was never evaluated.
    pub last_rejection:  Option<RejectionReason>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MissedDemandReport {
    pub itineraries:      Vec<MissedItinerary>,
    pub lost_to_price:    usize,
    pub lost_to_capacity: usize,
    /// Never saw a shopping day inside the simulated range.
    pub never_checked:    usize,
}

impl MissedDemandReport {
    pub fn build(population: &Population, rejections: &BTreeMap<TripKey, RejectionReason>) -> Self {
        let mut report = Self::default();
        for (traveller, itin) in population.itineraries().filter(|(_, i)| !i.is_booked) {
            let (Some(stay), Some(shopping_window), Some((min_price, max_price))) =
                (itin.stay(), itin.shopping_window(), itin.price_range())
            else {
                continue;
            };
            let last_rejection = rejections.get(&(traveller.traveller_id, itin.trip_id)).copied();
            match last_rejection {
                Some(RejectionReason::Price) => report.lost_to_price += 1,
                Some(RejectionReason::Capacity) => report.lost_to_capacity += 1,
                None => report.never_checked += 1,
            }
            report.itineraries.push(MissedItinerary {
                traveller_id: traveller.traveller_id,
                persona: traveller.persona(),
                trip_id: itin.trip_id,
                shopping_window,
                stay,
                nights: stay.len(),
                min_price,
                max_price,
                last_rejection,
            });
        }
        report
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.itineraries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.itineraries.is_empty()
    }
}

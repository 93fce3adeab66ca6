//! Plain data row types written by output backends.

use hs_sim::DayStats;
use hs_supply::Booking;

/// One committed booking, flattened for tabular output.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingRow {
    pub simulation_id:   String,
    pub traveller_id:    String,
    pub trip_id:         u32,
    pub supplier_id:     String,
    /// `hotel` or `reseller`.
    pub supplier_type:   String,
    pub hotel_id:        String,
    pub booking_day:     i32,
    pub stay_start:      i32,
    /// Last night of the stay (inclusive).
    pub stay_end:        i32,
    pub nights:          u32,
    pub price_per_night: f64,
    pub total_price:     f64,
    pub created_at:      i64,
}

impl From<&Booking> for BookingRow {
    fn from(b: &Booking) -> Self {
        Self {
            simulation_id:   b.simulation_id.to_string(),
            traveller_id:    b.traveller_id.to_string(),
            trip_id:         b.trip_id,
            supplier_id:     b.supplier.id().to_owned(),
            supplier_type:   b.supplier_type().to_string(),
            hotel_id:        b.hotel_id.to_string(),
            booking_day:     b.booking_day.0,
            stay_start:      b.stay.start.0,
            stay_end:        b.stay.end.0,
            nights:          b.nights() as u32,
            price_per_night: b.price_per_night,
            total_price:     b.total_price,
            created_at:      b.created_at,
        }
    }
}

/// Counters for one simulated day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DaySummaryRow {
    pub day:                 i32,
    pub demands_checked:     u32,
    pub bookings:            u32,
    pub price_rejections:    u32,
    pub capacity_rejections: u32,
    pub revenue:             f64,
}

impl From<&DayStats> for DaySummaryRow {
    fn from(s: &DayStats) -> Self {
        Self {
            day:                 s.day.0,
            demands_checked:     s.demands_checked,
            bookings:            s.bookings,
            price_rejections:    s.price_rejections,
            capacity_rejections: s.capacity_rejections,
            revenue:             s.revenue,
        }
    }
}

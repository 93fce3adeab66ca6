//! Itineraries, travellers and the population container.
//!
//! # Booking state
//!
//! An itinerary is `UNMATCHED` until the matching engine calls
//! [`Itinerary::mark_booked`], after which it is `BOOKED` for good.  There is
//! no reverse transition; a second `mark_booked` is an error and leaves the
//! first booking untouched.
//!
//! The booked fields are kept flat (`booked_supplier_id`,
//! `booked_supplier_type`, ...) so the persisted form stays a plain record.

use serde::{Deserialize, Serialize};

use hs_core::{Day, DayRange, HotelId, Persona, Supplier, SupplierType, TravellerId};

use crate::{Demand, DemandError, DemandResult};

// ── Itinerary ─────────────────────────────────────────────────────────────────

/// One traveller's single trip, observed as a run of same-stay demands across
/// consecutive shopping days.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Itinerary {
    pub trip_id: u32,
    /// Ordered by `shopping_day`.  All share the same stay window.
    pub demands: Vec<Demand>,
    #[serde(default)]
    pub is_booked: bool,
    #[serde(default)]
    pub booked_price_per_night: Option<f64>,
    #[serde(default)]
    pub booked_supplier_id: Option<String>,
    #[serde(default)]
    pub booked_supplier_type: Option<SupplierType>,
    #[serde(default)]
    pub booked_hotel_id: Option<HotelId>,
}

impl Itinerary {
    pub fn new(trip_id: u32, demands: Vec<Demand>) -> Self {
        Self {
            trip_id,
            demands,
            is_booked: false,
            booked_price_per_night: None,
            booked_supplier_id: None,
            booked_supplier_type: None,
            booked_hotel_id: None,
        }
    }

    /// The first demand whose shopping day is `day`, if any.
    pub fn demand_on(&self, day: Day) -> Option<&Demand> {
        self.demands.iter().find(|d| d.shopping_day == day)
    }

    /// Stay window shared by all demands.  `None` for an empty itinerary.
    pub fn stay(&self) -> Option<DayRange> {
        self.demands.first().map(Demand::stay)
    }

    /// First and last shopping day.
    pub fn shopping_window(&self) -> Option<DayRange> {
        let first = self.demands.iter().map(|d| d.shopping_day).min()?;
        let last = self.demands.iter().map(|d| d.shopping_day).max()?;
        Some(DayRange::new(first, last))
    }

    /// Lowest and highest `max_price_per_night` over all demands.
    pub fn price_range(&self) -> Option<(f64, f64)> {
        let mut it = self.demands.iter().map(|d| d.max_price_per_night);
        let first = it.next()?;
        Some(it.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))))
    }

    /// Transition `UNMATCHED → BOOKED`, recording who fulfilled the trip.
    pub fn mark_booked(&mut self, supplier: &Supplier, hotel: &HotelId, price_per_night: f64) -> DemandResult<()> {
        if self.is_booked {
            return Err(DemandError::AlreadyBooked { trip_id: self.trip_id });
        }
        self.is_booked = true;
        self.booked_price_per_night = Some(price_per_night);
        self.booked_supplier_id = Some(supplier.id().to_owned());
        self.booked_supplier_type = Some(supplier.kind());
        self.booked_hotel_id = Some(hotel.clone());
        Ok(())
    }

    /// The supplier that fulfilled this itinerary, once booked.
    pub fn booked_supplier(&self) -> Option<Supplier> {
        match (&self.booked_supplier_id, self.booked_supplier_type) {
            (Some(id), Some(kind)) => Some(Supplier::from_parts(id, kind)),
            _ => None,
        }
    }
}

// ── Traveller ─────────────────────────────────────────────────────────────────

/// A generated traveller and the trips they want to take this year.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Traveller {
    pub traveller_id: TravellerId,
    /// Ordered by `trip_id`; `trip_id` is unique within the traveller.
    pub itineraries: Vec<Itinerary>,
}

impl Traveller {
    #[inline]
    pub fn persona(&self) -> Persona {
        self.traveller_id.persona
    }

    pub fn itinerary(&self, trip_id: u32) -> Option<&Itinerary> {
        self.itineraries.iter().find(|i| i.trip_id == trip_id)
    }

    pub fn itinerary_mut(&mut self, trip_id: u32) -> Option<&mut Itinerary> {
        self.itineraries.iter_mut().find(|i| i.trip_id == trip_id)
    }
}

// ── Population ────────────────────────────────────────────────────────────────

/// All travellers of a run, in generation order (casual first, then
/// business).  This order is the iteration order of the day loop.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Population {
    travellers: Vec<Traveller>,
}

impl Population {
    pub fn new(travellers: Vec<Traveller>) -> Self {
        Self { travellers }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.travellers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.travellers.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Traveller> {
        self.travellers.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Traveller> {
        self.travellers.iter_mut()
    }

    pub fn get(&self, id: TravellerId) -> Option<&Traveller> {
        self.travellers.iter().find(|t| t.traveller_id == id)
    }

    pub fn get_mut(&mut self, id: TravellerId) -> Option<&mut Traveller> {
        self.travellers.iter_mut().find(|t| t.traveller_id == id)
    }

    pub fn count_persona(&self, persona: Persona) -> usize {
        self.travellers.iter().filter(|t| t.persona() == persona).count()
    }

    /// Every `(traveller, itinerary)` pair in iteration order.
    pub fn itineraries(&self) -> impl Iterator<Item = (&Traveller, &Itinerary)> {
        self.travellers.iter().flat_map(|t| t.itineraries.iter().map(move |i| (t, i)))
    }

    pub fn total_itineraries(&self) -> usize {
        self.travellers.iter().map(|t| t.itineraries.len()).sum()
    }

    pub fn total_demands(&self) -> usize {
        self.itineraries().map(|(_, i)| i.demands.len()).sum()
    }

    pub fn booked_itineraries(&self) -> usize {
        self.itineraries().filter(|(_, i)| i.is_booked).count()
    }

    pub fn into_inner(self) -> Vec<Traveller> {
        self.travellers
    }
}

impl<'a> IntoIterator for &'a Population {
    type Item = &'a Traveller;
    type IntoIter = std::slice::Iter<'a, Traveller>;
    fn into_iter(self) -> Self::IntoIter {
        self.travellers.iter()
    }
}

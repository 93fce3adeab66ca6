//! Integration tests for hs-sim.

use std::collections::BTreeSet;

use hs_core::{Day, DayRange, HotelConfig, SimConfig, SimulationId, SupplierType};
use hs_supply::Booking;

use crate::{
    DayStats, MultiSupplierMatcher, NoopObserver, SimBuilder, SimObserver, SimSession, SimulationParameters,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn session(total: usize, casual: f64, seed: u64) -> SimSession {
    let params = SimulationParameters::new(total, casual).with_seed(seed).with_simulation_id("sim_test");
    SimSession::generate(params, &SimConfig::default()).unwrap()
}

fn stays() -> DayRange {
    SimConfig::default().operational_days()
}

#[derive(Default)]
struct Recorder {
    days_started: usize,
    days_ended:   Vec<DayStats>,
    bookings:     Vec<Booking>,
    ended_on:     Option<Day>,
}

impl SimObserver for Recorder {
    fn on_day_start(&mut self, _day: Day) {
        self.days_started += 1;
    }
    fn on_booking(&mut self, booking: &Booking) {
        self.bookings.push(booking.clone());
    }
    fn on_day_end(&mut self, stats: &DayStats) {
        self.days_ended.push(*stats);
    }
    fn on_sim_end(&mut self, final_day: Day) {
        self.ended_on = Some(final_day);
    }
}

// ── Session ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod session_tests {
    use super::*;

    #[test]
    fn generate_records_seed_and_suppliers() {
        let s = session(20, 0.5, 99);
        assert_eq!(s.params.seed, Some(99));
        assert_eq!(s.params.total_hotel_capacity, 100);
        assert_eq!(s.params.hotels.len(), 2);
        assert_eq!(s.params.resellers.len(), 1);
        assert_eq!(s.population.len(), 20);
        assert!(s.bookings.is_empty());
    }

    #[test]
    fn unseeded_generation_records_a_seed() {
        let params = SimulationParameters::new(3, 1.0);
        let s = SimSession::generate(params, &SimConfig::default()).unwrap();
        assert!(s.params.seed.is_some());
        assert!(s.params.simulation_id.as_str().starts_with("sim_"));
    }

    #[test]
    fn same_seed_same_population() {
        assert_eq!(session(15, 0.6, 5).population, session(15, 0.6, 5).population);
    }

    #[test]
    fn bad_proportion_is_an_error() {
        let params = SimulationParameters::new(10, 1.5).with_seed(1);
        assert!(SimSession::generate(params, &SimConfig::default()).is_err());
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;

    #[test]
    fn default_window_is_full_horizon() {
        let sim = SimBuilder::multi_supplier(session(2, 0.5, 1), SimConfig::default()).unwrap().build().unwrap();
        assert_eq!(sim.clock.start, Day(-20));
        assert_eq!(sim.clock.end, Day(99));
    }

    #[test]
    fn inverted_window_errors() {
        let result = SimBuilder::multi_supplier(session(2, 0.5, 1), SimConfig::default())
            .unwrap()
            .window(Day(10), Day(5))
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn window_outside_horizon_errors() {
        let result = SimBuilder::multi_supplier(session(2, 0.5, 1), SimConfig::default())
            .unwrap()
            .window(Day(-30), Day(5))
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn run_full_checks_window() {
        let mut sim = SimBuilder::multi_supplier(session(2, 0.5, 1), SimConfig::default()).unwrap().build().unwrap();
        assert!(sim.run_full(Day(0), Day(120), &mut NoopObserver).is_err());
        assert!(sim.run_full(Day(5), Day(4), &mut NoopObserver).is_err());
        assert!(sim.session.bookings.is_empty());
        sim.run_full(Day(0), Day(9), &mut NoopObserver).unwrap();
        assert_eq!(sim.clock.start, Day(0));
        assert!(sim.clock.is_finished());
    }

    #[test]
    fn single_supplier_rejects_bad_stay_window() {
        let strategy = hs_pricing::PriceTableStrategy::fixed(50.0).unwrap();
        for stays in [DayRange::new(Day(10), Day(9)), DayRange::new(Day(-1), Day(9)), DayRange::new(Day(0), Day(100))] {
            assert!(SimBuilder::single_supplier(session(2, 0.5, 1), strategy.clone(), 5, stays).is_err());
        }
    }

    #[test]
    fn invalid_config_rejected() {
        let cfg = SimConfig::with_hotels(Vec::new());
        assert!(SimBuilder::multi_supplier(session(2, 0.5, 1), cfg).is_err());
    }
}

// ── Multi-supplier day loop ───────────────────────────────────────────────────

#[cfg(test)]
mod multi_supplier_tests {
    use super::*;
    use crate::{MatchingStrategy, SimError};

    #[test]
    fn run_day_before_initialization_errors() {
        let matcher = MultiSupplierMatcher::new(SimConfig::default()).unwrap();
        let mut sim = SimBuilder::new(session(5, 0.5, 3), matcher).build().unwrap();
        let err = sim.run_day(Day(0), &mut NoopObserver).unwrap_err();
        assert!(matches!(err, SimError::NotInitialized(_)));
    }

    #[test]
    fn cleanup_drops_supply_and_log() {
        let mut sim = SimBuilder::multi_supplier(session(30, 0.5, 3), SimConfig::default()).unwrap().build().unwrap();
        sim.run(&mut NoopObserver).unwrap();
        assert_eq!(sim.cleanup(), 200);
        assert!(sim.session.bookings.is_empty());
        assert!(!sim.matcher.is_ready(&SimulationId::from("sim_test")));
        assert!(sim.run_day(Day(0), &mut NoopObserver).is_err());
    }

    #[test]
    fn at_most_one_booking_per_itinerary() {
        let mut sim = SimBuilder::multi_supplier(session(200, 0.7, 11), SimConfig::default()).unwrap().build().unwrap();
        let bookings = sim.run(&mut NoopObserver).unwrap();
        assert!(!bookings.is_empty());

        let keys: BTreeSet<_> = bookings.iter().map(|b| (b.traveller_id, b.trip_id)).collect();
        assert_eq!(keys.len(), bookings.len());
        assert_eq!(sim.session.population.booked_itineraries(), bookings.len());
        assert_eq!(sim.session.bookings.len(), bookings.len());

        for b in &bookings {
            let itin = sim.session.population.get(b.traveller_id).unwrap().itinerary(b.trip_id).unwrap();
            assert!(itin.is_booked);
            assert_eq!(itin.booked_supplier(), Some(b.supplier.clone()));
            assert_eq!(itin.booked_hotel_id.as_ref(), Some(&b.hotel_id));
            assert_eq!(itin.booked_price_per_night, Some(b.price_per_night));
            assert!(b.booking_day < b.stay.start);
        }
    }

    #[test]
    fn inventory_stays_consistent() {
        let mut sim = SimBuilder::multi_supplier(session(400, 0.5, 21), SimConfig::default()).unwrap().build().unwrap();
        sim.run(&mut NoopObserver).unwrap();
        let id = sim.session.simulation_id().clone();
        let ledger = sim.matcher.ledger();
        for hotel in ledger.hotel_ids(&id) {
            for day in DayRange::new(Day(0), Day(99)).iter() {
                let rec = ledger.get(&id, &hotel, day).unwrap();
                assert!(rec.hotel_rooms_remaining + rec.rooms_allocated() <= rec.hotel_rooms_total);
                for alloc in &rec.allocations {
                    assert!(alloc.rooms_remaining <= alloc.rooms_allocated);
                }
            }
        }
    }

    #[test]
    fn reseller_prices_fixed_at_allocation() {
        let mut sim = SimBuilder::multi_supplier(session(300, 0.5, 8), SimConfig::default()).unwrap().build().unwrap();
        let bookings = sim.run(&mut NoopObserver).unwrap();
        for b in bookings.iter().filter(|b| b.supplier_type() == SupplierType::Reseller) {
            // Allocations happen before any repricing, at base price.
            let expected = if b.hotel_id.as_str() == "boutique_hotel" { 184.0 } else { 149.5 };
            assert!((b.price_per_night - expected).abs() < 1e-9, "{b:?}");
        }
    }

    #[test]
    fn observer_sees_every_day_and_booking() {
        let mut sim = SimBuilder::multi_supplier(session(50, 0.5, 4), SimConfig::default()).unwrap().build().unwrap();
        let mut rec = Recorder::default();
        let bookings = sim.run(&mut rec).unwrap();
        assert_eq!(rec.days_started, 120);
        assert_eq!(rec.days_ended.len(), 120);
        assert_eq!(rec.ended_on, Some(Day(99)));
        assert_eq!(rec.bookings.len(), bookings.len());
        let counted: u32 = rec.days_ended.iter().map(|d| d.bookings).sum();
        assert_eq!(counted as usize, bookings.len());
        for d in &rec.days_ended {
            assert_eq!(d.demands_checked, d.bookings + d.price_rejections + d.capacity_rejections);
        }
    }

    #[test]
    fn runs_are_reproducible() {
        let summary = |seed| {
            let mut sim =
                SimBuilder::multi_supplier(session(80, 0.5, seed), SimConfig::default()).unwrap().build().unwrap();
            sim.run(&mut NoopObserver)
                .unwrap()
                .into_iter()
                .map(|b| (b.traveller_id, b.trip_id, b.supplier, b.booking_day, b.price_per_night))
                .collect::<Vec<_>>()
        };
        assert_eq!(summary(12), summary(12));
    }

    #[test]
    fn zero_stock_books_nothing() {
        let mut sim = SimBuilder::multi_supplier(session(60, 0.5, 2), SimConfig::default()).unwrap().build().unwrap();
        let id = sim.session.simulation_id().clone();
        let hotels = sim.matcher.ledger().hotel_ids(&id);
        for hotel in &hotels {
            for day in DayRange::new(Day(0), Day(99)).iter() {
                let rec = sim.matcher.ledger_mut().get_mut(&id, hotel, day).unwrap();
                rec.hotel_rooms_remaining = 0;
                rec.allocations.iter_mut().for_each(|a| a.rooms_remaining = 0);
            }
        }
        for day in DayRange::new(Day(-20), Day(99)).iter() {
            assert!(sim.run_day(day, &mut NoopObserver).unwrap().is_empty());
        }
        let missed = sim.missed_demand();
        assert_eq!(missed.lost_to_price, 0);
        assert_eq!(missed.len(), sim.session.population.total_itineraries());
    }

    #[test]
    fn statistics_follow_bookings() {
        let mut sim = SimBuilder::multi_supplier(session(150, 0.5, 6), SimConfig::default()).unwrap().build().unwrap();
        let bookings = sim.run(&mut NoopObserver).unwrap();
        let stats = sim.statistics();
        let revenue: f64 = bookings.iter().map(|b| b.total_price).sum();
        let nights: u64 = bookings.iter().map(|b| b.nights() as u64).sum();

        assert_eq!(stats.total_bookings, bookings.len());
        assert_eq!(stats.hotel_bookings + stats.reseller_bookings, bookings.len());
        assert!((stats.total_revenue - revenue).abs() < 1e-6);
        assert_eq!(stats.booked_room_nights, nights);
        assert_eq!(stats.total_room_days, 100 * 100);
        assert!(stats.booked_room_days >= nights);
        if nights > 0 {
            assert!((stats.adr - revenue / nights as f64).abs() < 1e-9);
        }
        assert!((stats.revpar - revenue / 10_000.0).abs() < 1e-9);
    }

    #[test]
    fn supply_queries_through_matcher() {
        let sim = SimBuilder::multi_supplier(session(1, 1.0, 1), SimConfig::default()).unwrap().build().unwrap();
        let id = sim.session.simulation_id();
        // Two hotels plus the reseller's allocation at each from day 5.
        assert_eq!(sim.matcher.available_suppliers(id, Day(10)).len(), 4);
        assert_eq!(sim.matcher.available_suppliers(id, Day(2)).len(), 2);
        let summary = sim.matcher.pricing_summary(id, Day(10));
        assert_eq!(summary.hotels.len(), 2);
        assert_eq!(summary.resellers.len(), 2);
    }

    #[test]
    fn custom_hotel_config() {
        let cfg = SimConfig::with_hotels(vec![HotelConfig::new("solo", "Solo Inn", 3, 80.0)]);
        let mut sim = SimBuilder::multi_supplier(session(40, 0.5, 9), cfg).unwrap().build().unwrap();
        let bookings = sim.run(&mut NoopObserver).unwrap();
        assert!(bookings.iter().all(|b| b.hotel_id.as_str() == "solo"));
        assert!(bookings.iter().all(|b| b.supplier_type() == SupplierType::Hotel));
        let occ = sim.statistics();
        assert!(occ.booked_room_days <= 300);
    }
}

// ── Single-supplier day loop ──────────────────────────────────────────────────

#[cfg(test)]
mod single_supplier_tests {
    use super::*;
    use crate::{SINGLE_SUPPLIER_ID, SingleSupplierMatcher};
    use hs_pricing::{DailyPriceTable, PriceTableStrategy, RejectionReason};

    #[test]
    fn flat_fifty_books_everyone_who_can_pay() {
        let strategy = PriceTableStrategy::fixed(50.0).unwrap();
        let mut sim = SimBuilder::single_supplier(session(10, 0.8, 17), strategy, 50, stays()).unwrap().build().unwrap();
        let bookings = sim.run(&mut NoopObserver).unwrap();

        // 26 itineraries can never fill 50 rooms, so only price can reject.
        for (_, itin) in sim.session.population.itineraries() {
            let can_pay = itin.demands.iter().any(|d| d.max_price_per_night >= 50.0);
            assert_eq!(itin.is_booked, can_pay, "trip {}", itin.trip_id);
            if itin.is_booked {
                assert_eq!(itin.booked_price_per_night, Some(50.0));
                assert_eq!(itin.booked_supplier_id.as_deref(), Some(SINGLE_SUPPLIER_ID));
                assert_eq!(itin.booked_supplier_type, Some(SupplierType::Hotel));
            }
        }
        let nights: usize = bookings.iter().map(|b| b.nights()).sum();
        assert!(nights <= 50 * 100);
        assert_eq!(sim.statistics().booked_room_nights as usize, nights);
    }

    #[test]
    fn zero_capacity_books_nothing_at_any_price() {
        let strategy = PriceTableStrategy::fixed(0.0).unwrap();
        let mut sim = SimBuilder::single_supplier(session(30, 0.5, 2), strategy, 10, stays()).unwrap().build().unwrap();
        sim.matcher.capacity_mut().exhaust();
        let mut rec = Recorder::default();
        for day in DayRange::new(Day(-20), Day(99)).iter() {
            assert!(sim.run_day(day, &mut rec).unwrap().is_empty());
        }
        assert!(rec.days_ended.iter().all(|d| d.price_rejections == 0));
        let missed = sim.missed_demand();
        assert_eq!(missed.lost_to_capacity, sim.session.population.total_itineraries());
    }

    #[test]
    fn unaffordable_price_is_price_rejection() {
        let table = DailyPriceTable::fixed(10_000.0, DayRange::new(Day(0), Day(99)));
        let mut sim = SimBuilder::single_supplier(session(20, 0.5, 3), table, 5, stays()).unwrap().build().unwrap();
        assert!(sim.run(&mut NoopObserver).unwrap().is_empty());
        let missed = sim.missed_demand();
        assert_eq!(missed.lost_to_price, sim.session.population.total_itineraries());
        assert_eq!(missed.never_checked, 0);
        assert!(missed.itineraries.iter().all(|m| m.last_rejection == Some(RejectionReason::Price)));
    }

    #[test]
    fn one_room_never_double_books() {
        let matcher = SingleSupplierMatcher::availability_linear(40.0, 60.0, 1, DayRange::new(Day(0), Day(99))).unwrap();
        let mut sim = SimBuilder::new(session(60, 0.5, 5), matcher).build().unwrap();
        let bookings = sim.run(&mut NoopObserver).unwrap();
        let mut used = BTreeSet::new();
        for b in &bookings {
            for day in b.stay.iter() {
                assert!(used.insert(day), "day {day} sold twice");
            }
        }
        let occ = sim.statistics();
        assert_eq!(occ.booked_room_days as usize, used.len());
        assert_eq!(occ.total_room_days, 100);
    }

    #[test]
    fn linear_price_rises_as_rooms_sell() {
        let matcher = SingleSupplierMatcher::availability_linear(100.0, 200.0, 2, DayRange::new(Day(0), Day(9))).unwrap();
        let mut sim = SimBuilder::new(session(1, 1.0, 1), matcher).window(Day(0), Day(0)).build().unwrap();
        sim.matcher.capacity_mut().consume(DayRange::new(Day(5), Day(5))).unwrap();
        sim.run(&mut NoopObserver).unwrap();
        assert_eq!(sim.matcher.prices().get(Day(4)), Some(100.0));
        assert_eq!(sim.matcher.prices().get(Day(5)), Some(150.0));
    }

    #[test]
    fn invalid_price_band_rejected() {
        assert!(SingleSupplierMatcher::availability_linear(90.0, 10.0, 5, DayRange::new(Day(0), Day(9))).is_err());
        assert!(SingleSupplierMatcher::fixed(-5.0, 5, DayRange::new(Day(0), Day(9))).is_err());
    }

    #[test]
    fn stay_window_follows_config() {
        let mut cfg = SimConfig::default();
        cfg.operational_end = Day(49);
        let strategy = PriceTableStrategy::fixed(1.0).unwrap();
        let mut sim =
            SimBuilder::single_supplier(session(30, 0.5, 6), strategy, 4, cfg.operational_days()).unwrap().build().unwrap();
        let bookings = sim.run(&mut NoopObserver).unwrap();
        assert!(bookings.iter().all(|b| b.stay.end <= Day(49)));
        assert_eq!(sim.statistics().total_room_days, 4 * 50);
    }

    #[test]
    fn cleanup_restores_capacity() {
        let strategy = PriceTableStrategy::fixed(1.0).unwrap();
        let mut sim = SimBuilder::single_supplier(session(40, 0.5, 4), strategy, 3, stays()).unwrap().build().unwrap();
        sim.run(&mut NoopObserver).unwrap();
        assert!(sim.statistics().booked_room_days > 0);
        assert_eq!(sim.cleanup(), 100);
        assert_eq!(sim.statistics().booked_room_days, 0);
        assert_eq!(sim.statistics().total_revenue, 0.0);
    }
}

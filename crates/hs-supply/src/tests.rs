//! Unit tests for hs-supply.

#[cfg(test)]
mod helpers {
    use hs_core::{
        Day, DayRange, HotelConfig, HotelId, Persona, ResellerConfig, ResellerId, SimConfig, SimulationId, Supplier,
        TravellerId,
    };

    use crate::{BookingRequest, DailySupply, RateCard};

    /// Hotel: stored price.  Reseller: cost-plus with cost 10, margin 15 %.
    pub struct TestRates;

    impl RateCard for TestRates {
        fn nightly_rate(&self, supply: &DailySupply, supplier: &Supplier) -> Option<f64> {
            match supplier {
                Supplier::Hotel(_) => Some(supply.hotel_price),
                Supplier::Reseller(r) => supply.allocation(r).map(|a| (a.cost_basis + 10.0) * 1.15),
            }
        }
    }

    pub fn sim() -> SimulationId {
        SimulationId::from("sim_test")
    }

    pub fn hotel() -> HotelId {
        HotelId::from("H")
    }

    pub fn agent() -> ResellerId {
        ResellerId::from("agent")
    }

    /// One 10-room hotel at 100/night; one reseller taking 5 rooms from day 10.
    pub fn one_hotel_one_agent() -> SimConfig {
        let mut cfg = SimConfig::with_hotels(vec![HotelConfig::new("H", "Hotel H", 10, 100.0)]);
        cfg.resellers.push(ResellerConfig::new("agent", "Agent", 10.0, 0.15).with_schedule([Day(10)]));
        cfg.allocation_rules.insert(agent(), [(hotel(), 5)].into_iter().collect());
        cfg
    }

    pub fn request(supplier: Supplier, start: i32, end: i32) -> BookingRequest {
        BookingRequest {
            simulation_id: sim(),
            supplier,
            hotel_id: hotel(),
            stay: DayRange::new(Day(start), Day(end)),
            booking_day: Day(start - 5),
            traveller_id: TravellerId::new(Persona::Casual, 1),
            trip_id: 0,
        }
    }
}

#[cfg(test)]
mod ledger_tests {
    use hs_core::{Day, DayRange, HotelId, ResellerId, SimConfig, SimulationId, Supplier, SupplierType};

    use super::helpers::*;
    use crate::{SupplyError, SupplyLedger};

    #[test]
    fn initialize_creates_one_record_per_hotel_day() {
        let mut ledger = SupplyLedger::default();
        let n = ledger.initialize(&sim(), &SimConfig::default());
        assert_eq!(n, 200);
        assert!(ledger.is_initialized(&sim()));
        assert_eq!(ledger.hotel_ids(&sim()).len(), 2);
        let rec = ledger.get(&sim(), &HotelId::from("large_hotel"), Day(0)).unwrap();
        assert_eq!(rec.hotel_price, 120.0);
        assert!(ledger.get(&sim(), &HotelId::from("large_hotel"), Day(100)).is_none());
    }

    #[test]
    fn default_schedule_allocations_are_cumulative() {
        let mut ledger = SupplyLedger::default();
        ledger.initialize(&sim(), &SimConfig::default());
        let boutique = HotelId::from("boutique_hotel");
        let agent = ResellerId::from("travel_agent_1");

        // Day -20 is before the operational window and is skipped.
        let d4 = ledger.get(&sim(), &boutique, Day(4)).unwrap();
        assert_eq!(d4.hotel_rooms_remaining, 20);
        assert!(d4.allocations.is_empty());

        let d5 = ledger.get(&sim(), &boutique, Day(5)).unwrap();
        assert_eq!(d5.hotel_rooms_remaining, 15);
        assert_eq!(d5.allocation(&agent).unwrap().rooms_allocated, 5);

        let d30 = ledger.get(&sim(), &boutique, Day(30)).unwrap();
        assert_eq!(d30.allocation(&agent).unwrap().rooms_allocated, 10);
        assert_eq!(d30.allocations.len(), 1);

        let d99 = ledger.get(&sim(), &boutique, Day(99)).unwrap();
        assert_eq!(d99.hotel_rooms_remaining, 0);
        assert_eq!(d99.allocation(&agent).unwrap().rooms_allocated, 20);
    }

    #[test]
    fn repeated_schedule_day_carves_twice() {
        let mut cfg = one_hotel_one_agent();
        cfg.resellers[0].allocation_schedule = vec![Day(10), Day(10)];
        cfg.validate().unwrap();
        let mut ledger = SupplyLedger::default();
        ledger.initialize(&sim(), &cfg);

        let rec = ledger.get(&sim(), &hotel(), Day(10)).unwrap();
        assert_eq!(rec.allocation(&agent()).unwrap().rooms_allocated, 10);
        assert_eq!(rec.hotel_rooms_remaining, 0);
        assert_eq!(rec.allocations.len(), 1);
    }

    #[test]
    fn partition_invariant_holds_after_init() {
        let mut ledger = SupplyLedger::default();
        let cfg = SimConfig::default();
        ledger.initialize(&sim(), &cfg);
        for h in &cfg.hotels {
            for day in cfg.operational_days().iter() {
                let rec = ledger.get(&sim(), &h.hotel_id, day).unwrap();
                assert!(rec.hotel_rooms_remaining + rec.rooms_allocated() <= rec.hotel_rooms_total);
            }
        }
    }

    #[test]
    fn reseller_price_uses_cost_basis_at_allocation() {
        let mut ledger = SupplyLedger::default();
        ledger.initialize(&sim(), &one_hotel_one_agent());
        // Hotel reprices later; the reseller's cost basis must not move.
        for day in 0..100 {
            ledger.get_mut(&sim(), &hotel(), Day(day)).unwrap().hotel_price = 250.0;
        }
        let offers = ledger.available_suppliers(&sim(), &[hotel()], Day(12), &TestRates);
        assert_eq!(offers.len(), 2);
        assert_eq!(offers[0].supplier, Supplier::Hotel(hotel()));
        assert_eq!(offers[0].price, 250.0);
        assert_eq!(offers[0].rooms_available, 5);
        assert_eq!(offers[1].supplier, Supplier::Reseller(agent()));
        assert!((offers[1].price - 126.5).abs() < 1e-9);

        let before = ledger.available_suppliers(&sim(), &[hotel()], Day(9), &TestRates);
        assert_eq!(before.len(), 1);
    }

    #[test]
    fn hotel_booking_decrements_every_night() {
        let mut ledger = SupplyLedger::default();
        ledger.initialize(&sim(), &one_hotel_one_agent());
        ledger.get_mut(&sim(), &hotel(), Day(2)).unwrap().hotel_price = 130.0;

        let booking = ledger.book(&request(Supplier::Hotel(hotel()), 1, 3), &TestRates).unwrap();
        assert_eq!(booking.supplier_type(), SupplierType::Hotel);
        assert_eq!(booking.nights(), 3);
        assert!((booking.price_per_night - 110.0).abs() < 1e-9);
        assert!((booking.total_price - 330.0).abs() < 1e-9);
        assert_eq!(booking.stay.iter().collect::<Vec<_>>(), vec![Day(1), Day(2), Day(3)]);

        for d in 1..=3 {
            let rec = ledger.get(&sim(), &hotel(), Day(d)).unwrap();
            assert_eq!(rec.hotel_rooms_remaining, 9);
            assert_eq!(rec.bookings_count, 1);
            assert!((rec.total_revenue - 110.0).abs() < 1e-9);
        }
        assert_eq!(ledger.get(&sim(), &hotel(), Day(4)).unwrap().hotel_rooms_remaining, 10);
    }

    #[test]
    fn reseller_booking_uses_allocation() {
        let mut ledger = SupplyLedger::default();
        ledger.initialize(&sim(), &one_hotel_one_agent());
        let booking = ledger.book(&request(Supplier::Reseller(agent()), 20, 21), &TestRates).unwrap();
        assert!((booking.price_per_night - 126.5).abs() < 1e-9);
        let rec = ledger.get(&sim(), &hotel(), Day(20)).unwrap();
        assert_eq!(rec.hotel_rooms_remaining, 5);
        assert_eq!(rec.allocation(&agent()).unwrap().rooms_remaining, 4);
        assert_eq!(rec.allocation(&agent()).unwrap().rooms_allocated, 5);
    }

    #[test]
    fn reseller_without_allocation_is_unavailable() {
        let mut ledger = SupplyLedger::default();
        ledger.initialize(&sim(), &one_hotel_one_agent());
        let err = ledger.book(&request(Supplier::Reseller(agent()), 8, 11), &TestRates).unwrap_err();
        assert!(matches!(err, SupplyError::Unavailable { day: Day(8), .. }));
        assert_eq!(ledger.get(&sim(), &hotel(), Day(10)).unwrap().allocation(&agent()).unwrap().rooms_remaining, 5);
    }

    #[test]
    fn failed_booking_changes_nothing() {
        let mut ledger = SupplyLedger::default();
        ledger.initialize(&sim(), &one_hotel_one_agent());
        ledger.get_mut(&sim(), &hotel(), Day(3)).unwrap().hotel_rooms_remaining = 0;

        let err = ledger.book(&request(Supplier::Hotel(hotel()), 1, 5), &TestRates).unwrap_err();
        assert!(matches!(err, SupplyError::Unavailable { day: Day(3), .. }));
        for d in [1, 2, 4, 5] {
            let rec = ledger.get(&sim(), &hotel(), Day(d)).unwrap();
            assert_eq!(rec.hotel_rooms_remaining, 10);
            assert_eq!(rec.bookings_count, 0);
        }
    }

    #[test]
    fn stay_past_window_is_missing_supply() {
        let mut ledger = SupplyLedger::default();
        ledger.initialize(&sim(), &one_hotel_one_agent());
        let before = ledger.get(&sim(), &hotel(), Day(98)).unwrap().hotel_rooms_remaining;
        assert_eq!(before, 5);

        let err = ledger.book(&request(Supplier::Hotel(hotel()), 98, 101), &TestRates).unwrap_err();
        assert!(matches!(err, SupplyError::MissingSupply { day: Day(100), .. }));
        let rec = ledger.get(&sim(), &hotel(), Day(98)).unwrap();
        assert_eq!(rec.hotel_rooms_remaining, before);
        assert_eq!(rec.bookings_count, 0);
    }

    #[test]
    fn booking_unknown_simulation_is_not_initialized() {
        let mut ledger = SupplyLedger::default();
        ledger.initialize(&sim(), &one_hotel_one_agent());
        let mut req = request(Supplier::Hotel(hotel()), 1, 2);
        req.simulation_id = SimulationId::from("sim_other");
        let err = ledger.book(&req, &TestRates).unwrap_err();
        assert!(matches!(err, SupplyError::NotInitialized(ref id) if id.as_str() == "sim_other"));
        assert_eq!(ledger.get(&sim(), &hotel(), Day(1)).unwrap().hotel_rooms_remaining, 10);
    }

    #[test]
    fn inventory_is_monotonic_and_never_negative() {
        let mut ledger = SupplyLedger::default();
        ledger.initialize(&sim(), &one_hotel_one_agent());
        let mut last = u32::MAX;
        let mut ok = 0;
        for _ in 0..20 {
            if ledger.book(&request(Supplier::Hotel(hotel()), 40, 42), &TestRates).is_ok() {
                ok += 1;
            }
            let now = ledger.get(&sim(), &hotel(), Day(41)).unwrap().hotel_rooms_remaining;
            assert!(now <= last);
            last = now;
        }
        // 10 rooms minus 5 carved by the reseller from day 10.
        assert_eq!(ok, 5);
        assert_eq!(last, 0);
        let err = ledger.book(&request(Supplier::Hotel(hotel()), 40, 42), &TestRates).unwrap_err();
        assert!(matches!(err, SupplyError::Unavailable { day: Day(40), .. }));
    }

    #[test]
    fn occupancy_counts_carved_rooms() {
        let mut ledger = SupplyLedger::default();
        ledger.initialize(&sim(), &one_hotel_one_agent());
        let window = DayRange::new(Day(0), Day(99));
        let occ = ledger.occupancy(&sim(), window);
        assert_eq!(occ.total_room_days, 1000);
        // Days 10..=99 each have 5 rooms carved.
        assert_eq!(occ.booked_room_days, 450);
        assert!((occ.rate_percent() - 45.0).abs() < 1e-9);

        ledger.book(&request(Supplier::Hotel(hotel()), 0, 1), &TestRates).unwrap();
        assert_eq!(ledger.occupancy(&sim(), window).booked_room_days, 452);
        assert!((ledger.revenue(&sim(), window) - 200.0).abs() < 1e-9);
    }

    #[test]
    fn cleanup_removes_only_that_simulation() {
        let mut ledger = SupplyLedger::default();
        let other = hs_core::SimulationId::from("other");
        ledger.initialize(&sim(), &one_hotel_one_agent());
        ledger.initialize(&other, &one_hotel_one_agent());
        assert_eq!(ledger.cleanup(&sim()), 100);
        assert!(!ledger.is_initialized(&sim()));
        assert!(ledger.is_initialized(&other));
        assert_eq!(ledger.cleanup(&sim()), 0);
    }

    #[test]
    fn reinitialize_resets_inventory() {
        let mut ledger = SupplyLedger::default();
        ledger.initialize(&sim(), &one_hotel_one_agent());
        ledger.book(&request(Supplier::Hotel(hotel()), 0, 0), &TestRates).unwrap();
        ledger.initialize(&sim(), &one_hotel_one_agent());
        assert_eq!(ledger.get(&sim(), &hotel(), Day(0)).unwrap().hotel_rooms_remaining, 10);
    }
}

#[cfg(test)]
mod shared_tests {
    use hs_core::{Day, DayRange};

    use crate::{SharedCapacity, SupplyError};

    #[test]
    fn consume_takes_one_room_per_night() {
        let mut cap = SharedCapacity::new(2, DayRange::new(Day(0), Day(9)));
        let stay = DayRange::new(Day(3), Day(5));
        cap.consume(stay).unwrap();
        assert_eq!(cap.remaining(Day(4)), 1);
        assert_eq!(cap.remaining(Day(6)), 2);
        cap.consume(stay).unwrap();
        assert!(!cap.has_room(stay));
        assert!(matches!(cap.consume(stay), Err(SupplyError::CapacityExhausted(Day(3)))));
    }

    #[test]
    fn partial_overlap_is_all_or_nothing() {
        let mut cap = SharedCapacity::new(1, DayRange::new(Day(0), Day(9)));
        cap.consume(DayRange::new(Day(5), Day(5))).unwrap();
        assert!(cap.consume(DayRange::new(Day(3), Day(6))).is_err());
        assert_eq!(cap.remaining(Day(3)), 1);
        assert_eq!(cap.remaining(Day(6)), 1);
    }

    #[test]
    fn outside_window_has_no_room() {
        let cap = SharedCapacity::new(5, DayRange::new(Day(0), Day(9)));
        assert_eq!(cap.remaining(Day(10)), 0);
        assert!(!cap.has_room(DayRange::new(Day(8), Day(10))));
    }

    #[test]
    fn exhaust_and_occupancy() {
        let mut cap = SharedCapacity::new(4, DayRange::new(Day(0), Day(4)));
        cap.consume(DayRange::new(Day(0), Day(1))).unwrap();
        let occ = cap.occupancy();
        assert_eq!(occ.total_room_days, 20);
        assert_eq!(occ.booked_room_days, 2);
        cap.exhaust();
        assert_eq!(cap.occupancy().booked_room_days, 20);
        assert!(cap.remaining_by_day().all(|(_, n)| n == 0));
    }
}

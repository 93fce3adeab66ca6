//! The `Sim` struct and its day loop.

use hs_core::{Day, SimClock};
use hs_pricing::RejectionReason;
use hs_supply::{Booking, BookingRequest, SupplyError};

use crate::builder::run_clock;
use crate::{
    DayStats, MatchingStrategy, MissedDemandReport, SimError, SimObserver, SimResult, SimSession,
    SimulationStatistics,
};

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// `Sim<M>` owns the session and one matching strategy and drives the day
/// loop.  For each simulated day `d`:
///
/// 1. **Prepare**: the strategy refreshes the prices in force on `d`.
/// 2. **Scan**: travellers in population order, itineraries in trip order.
///    Every unbooked itinerary with a demand shopping on `d` is evaluated
///    once, using the first such demand.
/// 3. **Commit**: an accepted offer is booked through the strategy and the
///    itinerary is marked booked.  A rejection is recorded and not retried
///    until the itinerary's next shopping day.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<M: MatchingStrategy> {
    /// Population, parameters and booking log.
    pub session: SimSession,

    /// The operating mode.  Owns all supply.
    pub matcher: M,

    /// Days still to run for [`run`][Self::run].
    pub clock: SimClock,
}

impl<M: MatchingStrategy> Sim<M> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run from the current clock day to the end of the clock window.
    ///
    /// Calls observer hooks at every day boundary.  Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<Vec<Booking>> {
        let sim = self.session.simulation_id().clone();
        tracing::info!(%sim, window = %self.clock, "simulation run starting");

        let mut all = Vec::new();
        while !self.clock.is_finished() {
            let day = self.clock.current_day;
            all.extend(self.run_day(day, observer)?);
            self.clock.advance();
        }
        observer.on_sim_end(self.clock.end);

        let stats = self.statistics();
        tracing::info!(
            %sim,
            bookings = stats.total_bookings,
            revenue = stats.total_revenue,
            occupancy = stats.occupancy_rate,
            "simulation complete"
        );
        Ok(all)
    }

    /// Reset the clock to `[start, end]` and run it.  The window is checked
    /// as [`SimBuilder::build`](crate::SimBuilder::build) checks it.
    pub fn run_full<O: SimObserver>(&mut self, start: Day, end: Day, observer: &mut O) -> SimResult<Vec<Booking>> {
        self.clock = run_clock(start, end)?;
        self.run(observer)
    }

    /// Process a single simulated day and return the bookings it made.
    ///
    /// Does not move the clock.
    pub fn run_day<O: SimObserver>(&mut self, day: Day, observer: &mut O) -> SimResult<Vec<Booking>> {
        let sim = self.session.params.simulation_id.clone();
        if !self.matcher.is_ready(&sim) {
            return Err(SimError::NotInitialized(sim));
        }

        observer.on_day_start(day);
        self.matcher.prepare_day(&sim, day)?;

        let mut stats = DayStats::new(day);
        let mut booked = Vec::new();

        for traveller in self.session.population.iter_mut() {
            let traveller_id = traveller.traveller_id;
            for itin in traveller.itineraries.iter_mut().filter(|i| !i.is_booked) {
                let Some(demand) = itin.demand_on(day).copied() else { continue };
                stats.demands_checked += 1;
                let key = (traveller_id, itin.trip_id);

                let offer = match self.matcher.evaluate(&sim, &demand) {
                    Ok(offer) => offer,
                    Err(reason) => {
                        tracing::debug!(
                            traveller = %traveller_id,
                            trip = itin.trip_id,
                            %reason,
                            max_price = demand.max_price_per_night,
                            "demand rejected"
                        );
                        stats.record_rejection(reason);
                        self.session.rejections.insert(key, reason);
                        continue;
                    }
                };

                let request = BookingRequest {
                    simulation_id: sim.clone(),
                    supplier:      offer.supplier.clone(),
                    hotel_id:      offer.hotel_id.clone(),
                    stay:          demand.stay(),
                    booking_day:   day,
                    traveller_id,
                    trip_id:       itin.trip_id,
                };
                let booking = match self.matcher.commit(&request, &offer) {
                    Ok(b) => b,
                    Err(SupplyError::Unavailable { .. } | SupplyError::CapacityExhausted(_)) => {
                        stats.record_rejection(RejectionReason::Capacity);
                        self.session.rejections.insert(key, RejectionReason::Capacity);
                        continue;
                    }
                    Err(e) => return Err(e.into()),
                };

                itin.mark_booked(&booking.supplier, &booking.hotel_id, booking.price_per_night)?;
                self.session.rejections.remove(&key);
                stats.bookings += 1;
                stats.revenue += booking.total_price;
                observer.on_booking(&booking);
                booked.push(booking);
            }
        }

        tracing::info!(
            day = day.0,
            checked = stats.demands_checked,
            booked = stats.bookings,
            price_rejections = stats.price_rejections,
            capacity_rejections = stats.capacity_rejections,
            "day processed"
        );
        observer.on_day_end(&stats);
        self.session.bookings.extend(booked.iter().cloned());
        Ok(booked)
    }

    // ── Reporting ─────────────────────────────────────────────────────────

    /// Totals over everything booked so far.
    pub fn statistics(&self) -> SimulationStatistics {
        let sim = self.session.simulation_id();
        SimulationStatistics::compute(
            &self.session.bookings,
            self.matcher.occupancy(sim),
            self.matcher.revenue(sim),
        )
    }

    /// Every itinerary still unbooked, with its last rejection reason.
    pub fn missed_demand(&self) -> MissedDemandReport {
        MissedDemandReport::build(&self.session.population, &self.session.rejections)
    }

    /// Drop the strategy's supply for this simulation and clear the booking
    /// log.  Returns the number of supply records removed.
    pub fn cleanup(&mut self) -> usize {
        let removed = self.matcher.cleanup(self.session.simulation_id());
        self.session.clear_log();
        removed
    }

    /// Consume the runner and hand back the session (e.g. for persistence).
    pub fn into_session(self) -> SimSession {
        self.session
    }
}

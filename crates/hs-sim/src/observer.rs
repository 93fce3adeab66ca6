//! Simulation observer trait for progress reporting and data collection.

use hs_core::Day;
use hs_supply::Booking;

use crate::DayStats;

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// day loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter;
///
/// impl SimObserver for ProgressPrinter {
///     fn on_day_end(&mut self, stats: &DayStats) {
///         println!("{}: {} bookings", stats.day, stats.bookings);
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each day, before prices are refreshed.
    fn on_day_start(&mut self, _day: Day) {}

    /// Called once per committed booking, in commit order.
    fn on_booking(&mut self, _booking: &Booking) {}

    /// Called at the end of each day with that day's counters.
    fn on_day_end(&mut self, _stats: &DayStats) {}

    /// Called once after the final day completes.
    fn on_sim_end(&mut self, _final_day: Day) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

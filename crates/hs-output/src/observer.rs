//! `SimOutputObserver<W>` bridges `SimObserver` to an `OutputWriter`.

use hs_core::Day;
use hs_sim::{DayStats, SimObserver};
use hs_supply::Booking;

use crate::writer::OutputWriter;
use crate::{BookingRow, DaySummaryRow, OutputError, OutputResult};

/// A [`SimObserver`] that writes bookings and day summaries to any
/// [`OutputWriter`] backend (CSV, SQLite).
///
/// Bookings are buffered during the day and written as one batch when the
/// day ends.  Errors from the writer are stored internally because
/// `SimObserver` methods have no return value.  After `sim.run()` returns,
/// check for errors with [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    pending:    Vec<BookingRow>,
    written:    usize,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, pending: Vec::new(), written: 0, last_error: None }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Bookings handed to the writer so far.
    pub fn bookings_written(&self) -> usize {
        self.written
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            tracing::warn!(error = %e, "output write failed");
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_booking(&mut self, booking: &Booking) {
        self.pending.push(BookingRow::from(booking));
    }

    fn on_day_end(&mut self, stats: &DayStats) {
        if !self.pending.is_empty() {
            let rows = std::mem::take(&mut self.pending);
            let result = self.writer.write_bookings(&rows);
            if result.is_ok() {
                self.written += rows.len();
            }
            self.store_err(result);
        }
        let result = self.writer.write_day_summary(&DaySummaryRow::from(stats));
        self.store_err(result);
    }

    fn on_sim_end(&mut self, _final_day: Day) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}

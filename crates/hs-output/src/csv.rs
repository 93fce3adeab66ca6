//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `bookings.csv`
//! - `day_summaries.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{BookingRow, DaySummaryRow, OutputResult};

pub const BOOKINGS_FILE: &str = "bookings.csv";
pub const DAY_SUMMARIES_FILE: &str = "day_summaries.csv";

/// Writes simulation output to two CSV files.
pub struct CsvWriter {
    bookings:  Writer<File>,
    summaries: Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut bookings = Writer::from_path(dir.join(BOOKINGS_FILE))?;
        bookings.write_record([
            "simulation_id",
            "traveller_id",
            "trip_id",
            "supplier_id",
            "supplier_type",
            "hotel_id",
            "booking_day",
            "stay_start",
            "stay_end",
            "nights",
            "price_per_night",
            "total_price",
            "created_at",
        ])?;

        let mut summaries = Writer::from_path(dir.join(DAY_SUMMARIES_FILE))?;
        summaries.write_record([
            "day",
            "demands_checked",
            "bookings",
            "price_rejections",
            "capacity_rejections",
            "revenue",
        ])?;

        Ok(Self { bookings, summaries, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_bookings(&mut self, rows: &[BookingRow]) -> OutputResult<()> {
        for row in rows {
            self.bookings.write_record(&[
                row.simulation_id.clone(),
                row.traveller_id.clone(),
                row.trip_id.to_string(),
                row.supplier_id.clone(),
                row.supplier_type.clone(),
                row.hotel_id.clone(),
                row.booking_day.to_string(),
                row.stay_start.to_string(),
                row.stay_end.to_string(),
                row.nights.to_string(),
                format!("{:.2}", row.price_per_night),
                format!("{:.2}", row.total_price),
                row.created_at.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_day_summary(&mut self, row: &DaySummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.day.to_string(),
            row.demands_checked.to_string(),
            row.bookings.to_string(),
            row.price_rejections.to_string(),
            row.capacity_rejections.to_string(),
            format!("{:.2}", row.revenue),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.bookings.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}

//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `output.db` file in the configured output directory with
//! two tables: `bookings` and `day_summaries`.  Like the CSV files, the tables
//! hold one run: opening a writer clears rows left by an earlier run.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::OutputWriter;
use crate::{BookingRow, DaySummaryRow, OutputResult};

pub const DATABASE_FILE: &str = "output.db";

/// Writes simulation output to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir`, initialise the schema and clear
    /// both tables.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;
        let conn = Connection::open(dir.join(DATABASE_FILE))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS bookings (
                 simulation_id   TEXT    NOT NULL,
                 traveller_id    TEXT    NOT NULL,
                 trip_id         INTEGER NOT NULL,
                 supplier_id     TEXT    NOT NULL,
                 supplier_type   TEXT    NOT NULL,
                 hotel_id        TEXT    NOT NULL,
                 booking_day     INTEGER NOT NULL,
                 stay_start      INTEGER NOT NULL,
                 stay_end        INTEGER NOT NULL,
                 nights          INTEGER NOT NULL,
                 price_per_night REAL    NOT NULL,
                 total_price     REAL    NOT NULL,
                 created_at      INTEGER NOT NULL,
                 PRIMARY KEY (simulation_id, traveller_id, trip_id)
             );
             CREATE TABLE IF NOT EXISTS day_summaries (
                 day                 INTEGER PRIMARY KEY,
                 demands_checked     INTEGER NOT NULL,
                 bookings            INTEGER NOT NULL,
                 price_rejections    INTEGER NOT NULL,
                 capacity_rejections INTEGER NOT NULL,
                 revenue             REAL    NOT NULL
             );
             DELETE FROM bookings;
             DELETE FROM day_summaries;",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_bookings(&mut self, rows: &[BookingRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO bookings \
                 (simulation_id, traveller_id, trip_id, supplier_id, supplier_type, hotel_id, \
                  booking_day, stay_start, stay_end, nights, price_per_night, total_price, created_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.simulation_id,
                    row.traveller_id,
                    row.trip_id,
                    row.supplier_id,
                    row.supplier_type,
                    row.hotel_id,
                    row.booking_day,
                    row.stay_start,
                    row.stay_end,
                    row.nights,
                    row.price_per_night,
                    row.total_price,
                    row.created_at,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_day_summary(&mut self, row: &DaySummaryRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO day_summaries \
             (day, demands_checked, bookings, price_rejections, capacity_rejections, revenue) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                row.day,
                row.demands_checked,
                row.bookings,
                row.price_rejections,
                row.capacity_rejections,
                row.revenue,
            ],
        )?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}

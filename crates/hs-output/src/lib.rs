//! `hs-output`: state persistence and simulation output writers.
//!
//! Persistence ([`state`]) saves and restores a session as one JSON
//! document.  Output backends record bookings and day summaries:
//!
//! | Feature   | Backend | Files created                           |
//! |-----------|---------|-----------------------------------------|
//! | *(none)*  | CSV     | `bookings.csv`, `day_summaries.csv`     |
//! | `sqlite`  | SQLite  | `output.db`                             |
//!
//! All backends implement [`OutputWriter`] and are driven by
//! [`SimOutputObserver`], which implements `hs_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use hs_output::{CsvWriter, SimOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = SimOutputObserver::new(writer);
//! sim.run(&mut obs)?;
//! if let Some(e) = obs.take_error() {
//!     eprintln!("output error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod state;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use row::{BookingRow, DaySummaryRow};
pub use state::{SimulationState, load_state, load_state_file, save_state, save_state_file};
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;

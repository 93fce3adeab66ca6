//! Trip scheduler: picks start days for one traveller's trips.
//!
//! # Algorithm
//!
//! Keep a set of available offsets `[0, horizon)`.  For each trip, pick a
//! uniformly random available offset as the start, then remove a blockout
//! window after it:
//!
//! ```text
//! explicit lengths (business):  remove [start, start + length]   (longest first)
//! no lengths (casual):          remove [start, start + 25)
//! ```
//!
//! Best effort only.  When the set runs dry the scheduler returns fewer
//! trips than requested.  The casual blockout ignores the real trip length,
//! so two casual stays can still overlap if a trip runs past 25 nights.

use std::collections::BTreeSet;

use hs_core::TravellerRng;

use crate::{DemandError, DemandResult};

/// Blockout applied after each casual trip start, in days.
pub const CASUAL_BLOCKOUT_DAYS: u32 = 25;

/// A scheduled trip: offset of the first night within the horizon and, when
/// lengths were supplied, the length the start was chosen for.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct ScheduledTrip {
    pub start:  u32,
    pub length: Option<u32>,
}

/// Schedule `num_trips` trips within `[0, horizon)`.
///
/// With `trip_lengths`, its length must equal `num_trips`; lengths are
/// placed longest first and each result carries the length it was placed
/// with.  The result is sorted ascending by start.
pub fn schedule(
    rng: &mut TravellerRng,
    num_trips: usize,
    horizon: u32,
    trip_lengths: Option<&[u32]>,
) -> DemandResult<Vec<ScheduledTrip>> {
    let mut available: BTreeSet<u32> = (0..horizon).collect();
    let mut trips = Vec::with_capacity(num_trips);

    match trip_lengths {
        Some(lengths) => {
            if lengths.len() != num_trips {
                return Err(DemandError::TripLengthMismatch { expected: num_trips, got: lengths.len() });
            }
            let mut sorted = lengths.to_vec();
            sorted.sort_unstable_by(|a, b| b.cmp(a));
            for length in sorted {
                let Some(start) = pick(rng, &available) else { break };
                block_out(&mut available, start, start.saturating_add(length).saturating_add(1));
                trips.push(ScheduledTrip { start, length: Some(length) });
            }
        }
        None => {
            for _ in 0..num_trips {
                let Some(start) = pick(rng, &available) else { break };
                block_out(&mut available, start, start.saturating_add(CASUAL_BLOCKOUT_DAYS));
                trips.push(ScheduledTrip { start, length: None });
            }
        }
    }

    trips.sort_unstable();
    Ok(trips)
}

fn pick(rng: &mut TravellerRng, available: &BTreeSet<u32>) -> Option<u32> {
    if available.is_empty() {
        return None;
    }
    let idx = rng.gen_range(0..available.len());
    available.iter().nth(idx).copied()
}

/// Remove `[from, to)` from the available set.
fn block_out(available: &mut BTreeSet<u32>, from: u32, to: u32) {
    let doomed: Vec<u32> = available.range(from..to).copied().collect();
    for d in doomed {
        available.remove(&d);
    }
}

//! Flat shared capacity for single-supplier runs.

use std::collections::BTreeMap;

use hs_core::{Day, DayRange};

use crate::{Occupancy, SupplyError, SupplyResult};

/// One pool of identical rooms, `capacity` per stay day.
///
/// Days outside the window have no rooms.
#[derive(Clone, Debug, PartialEq)]
pub struct SharedCapacity {
    capacity:  u32,
    remaining: BTreeMap<Day, u32>,
}

impl SharedCapacity {
    pub fn new(capacity: u32, window: DayRange) -> Self {
        Self { capacity, remaining: window.iter().map(|d| (d, capacity)).collect() }
    }

    #[inline]
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn remaining(&self, day: Day) -> u32 {
        self.remaining.get(&day).copied().unwrap_or(0)
    }

    /// Remaining rooms for every day in the window, in day order.
    pub fn remaining_by_day(&self) -> impl Iterator<Item = (Day, u32)> + '_ {
        self.remaining.iter().map(|(d, n)| (*d, *n))
    }

    /// `true` if every night of `stay` has at least one room.
    pub fn has_room(&self, stay: DayRange) -> bool {
        !stay.is_empty() && stay.iter().all(|d| self.remaining(d) > 0)
    }

    /// Take one room on every night of `stay`, or nothing if any night is full.
    pub fn consume(&mut self, stay: DayRange) -> SupplyResult<()> {
        if stay.is_empty() {
            return Err(SupplyError::EmptyStay);
        }
        if let Some(day) = stay.iter().find(|d| self.remaining(*d) == 0) {
            return Err(SupplyError::CapacityExhausted(day));
        }
        for day in stay.iter() {
            if let Some(n) = self.remaining.get_mut(&day) {
                *n -= 1;
            }
        }
        Ok(())
    }

    /// Force every day to zero remaining.
    pub fn exhaust(&mut self) {
        self.remaining.values_mut().for_each(|n| *n = 0);
    }

    pub fn occupancy(&self) -> Occupancy {
        Occupancy {
            total_room_days:  self.remaining.len() as u64 * self.capacity as u64,
            booked_room_days: self.remaining.values().map(|n| (self.capacity - n) as u64).sum(),
        }
    }
}

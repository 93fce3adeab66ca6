//! Simulation day model.
//!
//! # Design
//!
//! Time is a signed day counter.  Stay days live in `[0, 99]`; shopping can
//! start up to twenty days earlier, so the full horizon is `[-20, 99]`
//! (120 simulated days).  Using an integer as the canonical unit keeps all
//! lead-time and window arithmetic exact.

use std::fmt;

use serde::{Deserialize, Serialize};

// ── Day ───────────────────────────────────────────────────────────────────────

/// An absolute simulation day.  Negative values are pre-season shopping days.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Day(pub i32);

impl Day {
    /// Earliest day on which any shopping can happen.
    pub const FIRST_SHOPPING: Day = Day(-20);
    /// First bookable stay day.
    pub const FIRST_STAY: Day = Day(0);
    /// Last bookable stay day, and the last simulated day.
    pub const LAST: Day = Day(99);
    /// Number of simulated days from `FIRST_SHOPPING` through `LAST`.
    pub const HORIZON_DAYS: u32 = 120;

    #[inline]
    pub fn next(self) -> Day {
        Day(self.0 + 1)
    }
}

impl std::ops::Add<i32> for Day {
    type Output = Day;
    #[inline]
    fn add(self, rhs: i32) -> Day {
        Day(self.0 + rhs)
    }
}

impl std::ops::Sub<i32> for Day {
    type Output = Day;
    #[inline]
    fn sub(self, rhs: i32) -> Day {
        Day(self.0 - rhs)
    }
}

/// Days elapsed from `rhs` to `self`.  Negative if `rhs > self`.
impl std::ops::Sub for Day {
    type Output = i32;
    #[inline]
    fn sub(self, rhs: Day) -> i32 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "D{}", self.0)
    }
}

// ── DayRange ──────────────────────────────────────────────────────────────────

/// An inclusive range of days, `start..=end`.
///
/// Used for stay windows, shopping windows, and the operational window.  A
/// range with `end < start` is empty.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DayRange {
    pub start: Day,
    pub end:   Day,
}

impl DayRange {
    #[inline]
    pub fn new(start: Day, end: Day) -> Self {
        Self { start, end }
    }

    /// Number of days in the range (nights, for a stay window).
    #[inline]
    pub fn len(&self) -> usize {
        if self.end < self.start {
            0
        } else {
            (self.end.0 - self.start.0 + 1) as usize
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    #[inline]
    pub fn contains(&self, day: Day) -> bool {
        self.start <= day && day <= self.end
    }

    /// Iterate every day in ascending order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = Day> + use<> {
        (self.start.0..=self.end.0).map(Day)
    }

    /// The sub-range of `self` from `from` onward.
    pub fn from_day(&self, from: Day) -> DayRange {
        DayRange { start: self.start.max(from), end: self.end }
    }
}

impl fmt::Display for DayRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Tracks the current day of a run over a fixed inclusive window.
///
/// `SimClock` is cheap to copy and holds no heap data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SimClock {
    /// First day of the run.
    pub start: Day,
    /// Last day of the run (inclusive).
    pub end: Day,
    /// The next day to process; advanced by `SimClock::advance()`.
    pub current_day: Day,
}

impl SimClock {
    pub fn new(start: Day, end: Day) -> Self {
        Self { start, end, current_day: start }
    }

    /// A clock spanning the whole horizon, `FIRST_SHOPPING..=LAST`.
    pub fn full_horizon() -> Self {
        Self::new(Day::FIRST_SHOPPING, Day::LAST)
    }

    #[inline]
    pub fn advance(&mut self) {
        self.current_day = self.current_day.next();
    }

    /// `true` once every day through `end` has been processed.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.current_day > self.end
    }

    /// Days left to process, including `current_day`.
    pub fn remaining(&self) -> usize {
        DayRange::new(self.current_day, self.end).len()
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} of {}..={})", self.current_day, self.remaining(), self.start, self.end)
    }
}

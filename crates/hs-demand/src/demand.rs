use serde::{Deserialize, Serialize};

use hs_core::{Day, DayRange};

/// One day's willingness-to-pay observation for a trip.
///
/// Immutable once created.  `shopping_day < stay_start <= stay_end` holds for
/// every demand the generator emits.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Demand {
    #[serde(alias = "shopping_date")]
    pub shopping_day:        Day,
    #[serde(alias = "stay_start_date")]
    pub stay_start:          Day,
    #[serde(alias = "stay_end_date")]
    pub stay_end:            Day,
    pub max_price_per_night: f64,
}

impl Demand {
    pub fn new(shopping_day: Day, stay: DayRange, max_price_per_night: f64) -> Self {
        Self { shopping_day, stay_start: stay.start, stay_end: stay.end, max_price_per_night }
    }

    #[inline]
    pub fn stay(&self) -> DayRange {
        DayRange::new(self.stay_start, self.stay_end)
    }

    /// Number of nights in the stay.
    #[inline]
    pub fn nights(&self) -> usize {
        self.stay().len()
    }
}

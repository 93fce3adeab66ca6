//! Externally driven prices for single-supplier runs.
//!
//! A single-supplier run does not use the lead-time model.  Each day the
//! caller's [`PriceSource`] produces a [`DailyPriceTable`] (stay day → price)
//! and a demand is accepted when the mean of that table over the stay is at
//! most its limit.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use hs_core::{Day, DayRange};
use hs_supply::SharedCapacity;

use crate::{PricingError, PricingResult};

// ── DailyPriceTable ───────────────────────────────────────────────────────────

/// Price per stay day.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyPriceTable {
    prices: BTreeMap<Day, f64>,
}

impl DailyPriceTable {
    pub fn new(prices: BTreeMap<Day, f64>) -> Self {
        Self { prices }
    }

    /// The same `price` on every day of `window`.
    pub fn fixed(price: f64, window: DayRange) -> Self {
        Self { prices: window.iter().map(|d| (d, price)).collect() }
    }

    /// Price rising linearly with utilisation:
    ///
    /// ```text
    /// min + (max - min) * (capacity - remaining[day]) / capacity
    /// ```
    pub fn availability_linear(min: f64, max: f64, capacity: &SharedCapacity) -> Self {
        let cap = capacity.capacity();
        let prices = capacity
            .remaining_by_day()
            .map(|(day, left)| {
                let used = if cap == 0 { 1.0 } else { (cap - left) as f64 / cap as f64 };
                (day, min + (max - min) * used)
            })
            .collect();
        Self { prices }
    }

    pub fn get(&self, day: Day) -> Option<f64> {
        self.prices.get(&day).copied()
    }

    /// Mean price over `stay`, or `None` if any night is unpriced.
    pub fn mean_over(&self, stay: DayRange) -> Option<f64> {
        if stay.is_empty() {
            return None;
        }
        let mut total = 0.0;
        for day in stay.iter() {
            total += self.get(day)?;
        }
        Some(total / stay.len() as f64)
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

// ── PriceSource ───────────────────────────────────────────────────────────────

/// Produces the price table in force on a given simulated day.
pub trait PriceSource {
    fn prices_for(&self, today: Day, capacity: &SharedCapacity) -> DailyPriceTable;
}

/// A fixed external table applies unchanged on every day.
impl PriceSource for DailyPriceTable {
    fn prices_for(&self, _today: Day, _capacity: &SharedCapacity) -> DailyPriceTable {
        self.clone()
    }
}

/// The built-in single-supplier strategies.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PriceTableStrategy {
    Fixed { price: f64 },
    AvailabilityLinear { min: f64, max: f64 },
}

impl PriceTableStrategy {
    pub fn fixed(price: f64) -> PricingResult<Self> {
        check_price(price)?;
        Ok(Self::Fixed { price })
    }

    pub fn availability_linear(min: f64, max: f64) -> PricingResult<Self> {
        check_price(min)?;
        check_price(max)?;
        if min > max {
            return Err(PricingError::InvalidBand { min, max });
        }
        Ok(Self::AvailabilityLinear { min, max })
    }
}

impl PriceSource for PriceTableStrategy {
    fn prices_for(&self, _today: Day, capacity: &SharedCapacity) -> DailyPriceTable {
        match *self {
            PriceTableStrategy::Fixed { price } => DailyPriceTable::new(
                capacity.remaining_by_day().map(|(d, _)| (d, price)).collect(),
            ),
            PriceTableStrategy::AvailabilityLinear { min, max } => {
                DailyPriceTable::availability_linear(min, max, capacity)
            }
        }
    }
}

fn check_price(p: f64) -> PricingResult<()> {
    if p.is_finite() && p >= 0.0 { Ok(()) } else { Err(PricingError::InvalidPrice(p)) }
}

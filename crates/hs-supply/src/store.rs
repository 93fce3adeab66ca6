//! The `SupplyStore` seam and its in-memory implementation.
//!
//! The ledger talks to storage only through [`SupplyStore`]: point get, point
//! upsert, and bulk delete by simulation id.  `InMemorySupplyStore` is the
//! default; a durable store can be slotted in without touching the ledger.

use std::collections::BTreeMap;

use hs_core::{Day, HotelId, SimulationId};

use crate::DailySupply;

#[cfg(feature = "fx-hash")]
type Map<K, V> = rustc_hash::FxHashMap<K, V>;
#[cfg(not(feature = "fx-hash"))]
type Map<K, V> = std::collections::HashMap<K, V>;

// ── SupplyStore trait ─────────────────────────────────────────────────────────

/// Key-value storage of `DailySupply` keyed by `(simulation, hotel, day)`.
pub trait SupplyStore {
    fn get(&self, sim: &SimulationId, hotel: &HotelId, day: Day) -> Option<&DailySupply>;

    fn get_mut(&mut self, sim: &SimulationId, hotel: &HotelId, day: Day) -> Option<&mut DailySupply>;

    /// Insert or replace the record at `(sim, record.hotel_id, record.day)`.
    fn upsert(&mut self, sim: &SimulationId, record: DailySupply);

    /// Remove every record of `sim`.  Returns the number removed.
    fn delete_simulation(&mut self, sim: &SimulationId) -> usize;

    /// Hotels holding at least one record for `sim`, sorted.
    fn hotel_ids(&self, sim: &SimulationId) -> Vec<HotelId>;

    /// Total number of records across all simulations.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `true` if any record exists for `sim`.
    fn contains_simulation(&self, sim: &SimulationId) -> bool;
}

// ── InMemorySupplyStore ───────────────────────────────────────────────────────

/// Nested maps: simulation → hotel → day-ordered records.
#[derive(Debug, Default)]
pub struct InMemorySupplyStore {
    sims: Map<SimulationId, Map<HotelId, BTreeMap<Day, DailySupply>>>,
}

impl InMemorySupplyStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SupplyStore for InMemorySupplyStore {
    fn get(&self, sim: &SimulationId, hotel: &HotelId, day: Day) -> Option<&DailySupply> {
        self.sims.get(sim)?.get(hotel)?.get(&day)
    }

    fn get_mut(&mut self, sim: &SimulationId, hotel: &HotelId, day: Day) -> Option<&mut DailySupply> {
        self.sims.get_mut(sim)?.get_mut(hotel)?.get_mut(&day)
    }

    fn upsert(&mut self, sim: &SimulationId, record: DailySupply) {
        self.sims
            .entry(sim.clone())
            .or_default()
            .entry(record.hotel_id.clone())
            .or_default()
            .insert(record.day, record);
    }

    fn delete_simulation(&mut self, sim: &SimulationId) -> usize {
        self.sims
            .remove(sim)
            .map_or(0, |hotels| hotels.values().map(BTreeMap::len).sum())
    }

    fn hotel_ids(&self, sim: &SimulationId) -> Vec<HotelId> {
        let mut ids: Vec<HotelId> = self
            .sims
            .get(sim)
            .map(|hotels| hotels.keys().cloned().collect())
            .unwrap_or_default();
        ids.sort();
        ids
    }

    fn len(&self) -> usize {
        self.sims
            .values()
            .flat_map(|hotels| hotels.values())
            .map(BTreeMap::len)
            .sum()
    }

    fn contains_simulation(&self, sim: &SimulationId) -> bool {
        self.sims.get(sim).is_some_and(|hotels| !hotels.is_empty())
    }
}

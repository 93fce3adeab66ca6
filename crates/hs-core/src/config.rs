//! Simulation configuration: hotels, resellers and allocation rules.
//!
//! Configuration is a JSON document.  Every top-level section is optional
//! and falls back to the reference setup (two hotels, one reseller); unknown
//! fields are ignored.
//!
//! Hotel and reseller entries may be partial.  A missing field is taken from
//! the reference entry with the same id, or failing that from the reference
//! entry at the same position.  When `allocation_rules` is omitted, the
//! reference rules are kept for the suppliers still configured.
//!
//! ```json
//! {
//!   "hotels": [
//!     { "hotel_id": "boutique_hotel", "name": "Boutique Hotel",
//!       "total_rooms": 20, "base_price": 150.0,
//!       "lead_time_multipliers": { "lead_time_0_7": 1.6 } }
//!   ],
//!   "resellers": [
//!     { "reseller_id": "travel_agent_1", "name": "Premium Travel Co.",
//!       "operating_cost_per_room": 10.0, "profit_margin": 0.15,
//!       "allocation_schedule": [-20, 5, 30, 55, 80] }
//!   ],
//!   "allocation_rules": { "travel_agent_1": { "boutique_hotel": 5 } }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Day, DayRange, HotelId, HsError, HsResult, ResellerId};

// ── LeadTimeMultipliers ───────────────────────────────────────────────────────

/// Price multipliers applied to a hotel's base price by lead-time bucket.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeadTimeMultipliers {
    #[serde(rename = "lead_time_0_7")]
    pub days_0_7:     f64,
    #[serde(rename = "lead_time_8_14")]
    pub days_8_14:    f64,
    #[serde(rename = "lead_time_15_30")]
    pub days_15_30:   f64,
    #[serde(rename = "lead_time_31_plus")]
    pub days_31_plus: f64,
}

impl Default for LeadTimeMultipliers {
    fn default() -> Self {
        Self { days_0_7: 1.5, days_8_14: 1.3, days_15_30: 1.1, days_31_plus: 1.0 }
    }
}

impl LeadTimeMultipliers {
    /// Multiplier for a lead time in days (`stay_day - current_day`).
    ///
    /// Negative lead times (a stay day already in the past) fall in the
    /// shortest bucket.
    pub fn for_lead_time(&self, lead_time: i32) -> f64 {
        match lead_time {
            ..=7 => self.days_0_7,
            8..=14 => self.days_8_14,
            15..=30 => self.days_15_30,
            _ => self.days_31_plus,
        }
    }
}

// ── HotelConfig ───────────────────────────────────────────────────────────────

/// A hotel.  Static for the duration of a run.
///
/// Read from configuration through a partial entry; see the module docs.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HotelConfig {
    pub hotel_id:    HotelId,
    pub name:        String,
    pub total_rooms: u32,
    pub base_price:  f64,
    pub lead_time_multipliers: LeadTimeMultipliers,
}

impl HotelConfig {
    pub fn new(id: impl Into<HotelId>, name: impl Into<String>, total_rooms: u32, base_price: f64) -> Self {
        Self {
            hotel_id: id.into(),
            name: name.into(),
            total_rooms,
            base_price,
            lead_time_multipliers: LeadTimeMultipliers::default(),
        }
    }
}

// ── ResellerConfig ────────────────────────────────────────────────────────────

/// Days on which a reseller carves new inventory when no schedule is given:
/// every 25 days starting at day -20.
pub fn default_allocation_schedule() -> Vec<Day> {
    (-20..100).step_by(25).map(Day).collect()
}

/// A reseller (travel agent) selling rooms carved out of hotel stock.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResellerConfig {
    pub reseller_id:             ResellerId,
    pub name:                    String,
    pub operating_cost_per_room: f64,
    /// Fraction, e.g. `0.15` for a 15 % margin.
    pub profit_margin:           f64,
    pub allocation_schedule:     Vec<Day>,
}

impl ResellerConfig {
    pub fn new(
        id: impl Into<ResellerId>,
        name: impl Into<String>,
        operating_cost_per_room: f64,
        profit_margin: f64,
    ) -> Self {
        Self {
            reseller_id: id.into(),
            name: name.into(),
            operating_cost_per_room,
            profit_margin,
            allocation_schedule: default_allocation_schedule(),
        }
    }

    pub fn with_schedule(mut self, days: impl IntoIterator<Item = Day>) -> Self {
        self.allocation_schedule = days.into_iter().collect();
        self.allocation_schedule.sort_unstable();
        self
    }
}

// ── Partial entries ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct HotelEntry {
    hotel_id:    Option<HotelId>,
    name:        Option<String>,
    total_rooms: Option<u32>,
    base_price:  Option<f64>,
    #[serde(alias = "dynamic_pricing_config")]
    lead_time_multipliers: Option<LeadTimeMultipliers>,
}

impl HotelEntry {
    fn fill(self, index: usize, reference: &[HotelConfig]) -> HsResult<HotelConfig> {
        let base = reference
            .iter()
            .find(|h| self.hotel_id.as_ref() == Some(&h.hotel_id))
            .or_else(|| reference.get(index))
            .or(reference.last())
            .ok_or_else(|| HsError::Config("no reference hotel".into()))?;
        let hotel_id = match self.hotel_id {
            Some(id) => id,
            None if index < reference.len() => base.hotel_id.clone(),
            None => return Err(HsError::Config(format!("hotel entry {index} needs a hotel_id"))),
        };
        let name = match self.name {
            Some(name) => name,
            None if hotel_id == base.hotel_id => base.name.clone(),
            None => String::new(),
        };
        Ok(HotelConfig {
            name,
            total_rooms: self.total_rooms.unwrap_or(base.total_rooms),
            base_price: self.base_price.unwrap_or(base.base_price),
            lead_time_multipliers: self.lead_time_multipliers.unwrap_or(base.lead_time_multipliers),
            hotel_id,
        })
    }
}

#[derive(Deserialize)]
struct ResellerEntry {
    #[serde(alias = "agent_id")]
    reseller_id:             Option<ResellerId>,
    name:                    Option<String>,
    operating_cost_per_room: Option<f64>,
    profit_margin:           Option<f64>,
    allocation_schedule:     Option<Vec<Day>>,
}

impl ResellerEntry {
    fn fill(self, index: usize, reference: &[ResellerConfig]) -> HsResult<ResellerConfig> {
        let base = reference
            .iter()
            .find(|r| self.reseller_id.as_ref() == Some(&r.reseller_id))
            .or_else(|| reference.get(index))
            .or(reference.last())
            .ok_or_else(|| HsError::Config("no reference reseller".into()))?;
        let reseller_id = match self.reseller_id {
            Some(id) => id,
            None if index < reference.len() => base.reseller_id.clone(),
            None => return Err(HsError::Config(format!("reseller entry {index} needs a reseller_id"))),
        };
        let name = match self.name {
            Some(name) => name,
            None if reseller_id == base.reseller_id => base.name.clone(),
            None => String::new(),
        };
        Ok(ResellerConfig {
            name,
            operating_cost_per_room: self.operating_cost_per_room.unwrap_or(base.operating_cost_per_room),
            profit_margin: self.profit_margin.unwrap_or(base.profit_margin),
            allocation_schedule: self.allocation_schedule.unwrap_or_else(|| base.allocation_schedule.clone()),
            reseller_id,
        })
    }
}

/// The document as written, before it is laid over the reference setup.
#[derive(Default, Deserialize)]
#[serde(default)]
struct RawSimConfig {
    hotels:            Option<Vec<HotelEntry>>,
    #[serde(alias = "travel_agents")]
    resellers:         Option<Vec<ResellerEntry>>,
    allocation_rules:  Option<AllocationRules>,
    shopping_start:    Option<Day>,
    shopping_end:      Option<Day>,
    operational_start: Option<Day>,
    operational_end:   Option<Day>,
}

impl TryFrom<RawSimConfig> for SimConfig {
    type Error = HsError;

    fn try_from(raw: RawSimConfig) -> HsResult<Self> {
        let reference = SimConfig::default();
        let hotels = match raw.hotels {
            Some(entries) => entries
                .into_iter()
                .enumerate()
                .map(|(i, e)| e.fill(i, &reference.hotels))
                .collect::<HsResult<Vec<_>>>()?,
            None => reference.hotels.clone(),
        };
        let resellers = match raw.resellers {
            Some(entries) => entries
                .into_iter()
                .enumerate()
                .map(|(i, e)| e.fill(i, &reference.resellers))
                .collect::<HsResult<Vec<_>>>()?,
            None => reference.resellers.clone(),
        };
        let allocation_rules = match raw.allocation_rules {
            Some(rules) => rules,
            None => reference
                .allocation_rules
                .into_iter()
                .filter(|(r, _)| resellers.iter().any(|c| &c.reseller_id == r))
                .map(|(r, rules)| {
                    let kept: BTreeMap<HotelId, u32> =
                        rules.into_iter().filter(|(h, _)| hotels.iter().any(|c| &c.hotel_id == h)).collect();
                    (r, kept)
                })
                .filter(|(_, rules)| !rules.is_empty())
                .collect(),
        };
        Ok(SimConfig {
            hotels,
            resellers,
            allocation_rules,
            shopping_start: raw.shopping_start.unwrap_or(reference.shopping_start),
            shopping_end: raw.shopping_end.unwrap_or(reference.shopping_end),
            operational_start: raw.operational_start.unwrap_or(reference.operational_start),
            operational_end: raw.operational_end.unwrap_or(reference.operational_end),
        })
    }
}

/// Reseller id → (hotel id → rooms carved on each scheduled allocation day).
pub type AllocationRules = BTreeMap<ResellerId, BTreeMap<HotelId, u32>>;

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Full static configuration of a simulation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSimConfig")]
pub struct SimConfig {
    pub hotels:           Vec<HotelConfig>,
    pub resellers:        Vec<ResellerConfig>,
    pub allocation_rules: AllocationRules,
    /// Earliest shopping day.
    pub shopping_start:   Day,
    /// Last shopping day.
    pub shopping_end:     Day,
    /// First bookable stay day.
    pub operational_start: Day,
    /// Last bookable stay day.
    pub operational_end:  Day,
}

impl Default for SimConfig {
    fn default() -> Self {
        let mut allocation_rules = AllocationRules::new();
        allocation_rules.insert(
            ResellerId::from("travel_agent_1"),
            BTreeMap::from([
                (HotelId::from("boutique_hotel"), 5),
                (HotelId::from("large_hotel"), 20),
            ]),
        );
        Self {
            hotels: vec![
                HotelConfig::new("boutique_hotel", "Boutique Hotel", 20, 150.0),
                HotelConfig::new("large_hotel", "Large Hotel", 80, 120.0),
            ],
            resellers: vec![ResellerConfig::new("travel_agent_1", "Premium Travel Co.", 10.0, 0.15)],
            allocation_rules,
            shopping_start: Day::FIRST_SHOPPING,
            shopping_end: Day::LAST,
            operational_start: Day::FIRST_STAY,
            operational_end: Day::LAST,
        }
    }
}

impl SimConfig {
    /// A configuration with the given hotels and no resellers.
    pub fn with_hotels(hotels: Vec<HotelConfig>) -> Self {
        Self { hotels, resellers: Vec::new(), allocation_rules: AllocationRules::new(), ..Self::default() }
    }

    pub fn hotel(&self, id: &HotelId) -> Option<&HotelConfig> {
        self.hotels.iter().find(|h| &h.hotel_id == id)
    }

    pub fn reseller(&self, id: &ResellerId) -> Option<&ResellerConfig> {
        self.resellers.iter().find(|r| &r.reseller_id == id)
    }

    /// Allocation rule of `reseller` for `hotel`, if any.
    pub fn allocation(&self, reseller: &ResellerId, hotel: &HotelId) -> Option<u32> {
        self.allocation_rules.get(reseller).and_then(|rules| rules.get(hotel)).copied()
    }

    /// Sum of `total_rooms` over all hotels.
    pub fn total_hotel_capacity(&self) -> u64 {
        self.hotels.iter().map(|h| h.total_rooms as u64).sum()
    }

    pub fn shopping_days(&self) -> DayRange {
        DayRange::new(self.shopping_start, self.shopping_end)
    }

    pub fn operational_days(&self) -> DayRange {
        DayRange::new(self.operational_start, self.operational_end)
    }

    /// Check structural consistency and sort reseller schedules.
    ///
    /// A day listed twice in a schedule stays listed twice and carves twice.
    ///
    /// Rejects an empty hotel list, duplicate ids, zero-room hotels,
    /// negative prices or margins, and allocation rules that name an unknown
    /// hotel or reseller.
    pub fn validate(&mut self) -> HsResult<()> {
        if self.hotels.is_empty() {
            return Err(HsError::Config("at least one hotel is required".into()));
        }
        for (i, h) in self.hotels.iter().enumerate() {
            if self.hotels[..i].iter().any(|o| o.hotel_id == h.hotel_id) {
                return Err(HsError::Config(format!("duplicate hotel id {}", h.hotel_id)));
            }
            if h.total_rooms == 0 {
                return Err(HsError::Config(format!("hotel {} has no rooms", h.hotel_id)));
            }
            if h.base_price.is_nan() || h.base_price < 0.0 {
                return Err(HsError::Config(format!("hotel {} has a negative base price", h.hotel_id)));
            }
        }
        for (i, r) in self.resellers.iter().enumerate() {
            if self.resellers[..i].iter().any(|o| o.reseller_id == r.reseller_id) {
                return Err(HsError::Config(format!("duplicate reseller id {}", r.reseller_id)));
            }
            if r.operating_cost_per_room.is_nan()
                || r.operating_cost_per_room < 0.0
                || r.profit_margin.is_nan()
                || r.profit_margin < 0.0
            {
                return Err(HsError::Config(format!(
                    "reseller {} has a negative cost or margin",
                    r.reseller_id
                )));
            }
        }
        for (reseller, rules) in &self.allocation_rules {
            if self.reseller(reseller).is_none() {
                return Err(HsError::UnknownReseller(reseller.clone()));
            }
            if let Some(hotel) = rules.keys().find(|h| self.hotel(h).is_none()) {
                return Err(HsError::UnknownHotel(hotel.clone()));
            }
        }
        if self.operational_days().is_empty() {
            return Err(HsError::Config(format!(
                "empty operational window {}",
                self.operational_days()
            )));
        }
        for r in &mut self.resellers {
            r.allocation_schedule.sort_unstable();
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration document.
    pub fn from_json_str(json: &str) -> HsResult<Self> {
        let mut cfg: SimConfig = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn from_json_file(path: &Path) -> HsResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

//! Identifier types.
//!
//! Traveller ids are structured (`persona` + sequence number) and render as
//! `casual-001` / `business-014`.  Hotel, reseller and simulation ids are
//! opaque strings taken from configuration, wrapped so they cannot be mixed
//! up at call sites.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::HsError;

// ── Persona ───────────────────────────────────────────────────────────────────

/// Demand persona.  Decides trip count, trip-length model and price model.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Persona {
    Casual,
    Business,
}

impl Persona {
    /// Number of itineraries generated per traveller for the year.
    pub const fn trips_per_year(self) -> usize {
        match self {
            Persona::Casual => 2,
            Persona::Business => 5,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Persona::Casual => "casual",
            Persona::Business => "business",
        }
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Persona {
    type Err = HsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "casual" => Ok(Persona::Casual),
            "business" => Ok(Persona::Business),
            other => Err(HsError::Parse(format!("unknown persona '{other}'"))),
        }
    }
}

// ── TravellerId ───────────────────────────────────────────────────────────────

/// Traveller identifier: persona plus a 1-based sequence number within that
/// persona.
///
/// Orders by persona first (casual before business), then by sequence, which
/// is also the generation order.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TravellerId {
    pub persona: Persona,
    pub seq:     u32,
}

impl TravellerId {
    #[inline]
    pub const fn new(persona: Persona, seq: u32) -> Self {
        Self { persona, seq }
    }
}

impl fmt::Display for TravellerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:03}", self.persona, self.seq)
    }
}

impl FromStr for TravellerId {
    type Err = HsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (persona, seq) = s
            .rsplit_once('-')
            .ok_or_else(|| HsError::Parse(format!("malformed traveller id '{s}'")))?;
        let seq = seq
            .parse::<u32>()
            .map_err(|e| HsError::Parse(format!("traveller id '{s}': {e}")))?;
        Ok(TravellerId { persona: persona.parse()?, seq })
    }
}

impl TryFrom<String> for TravellerId {
    type Error = HsError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<TravellerId> for String {
    fn from(id: TravellerId) -> String {
        id.to_string()
    }
}

// ── String ids ────────────────────────────────────────────────────────────────

/// Generate a newtype over `String` for an id taken from configuration.
macro_rules! string_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident;) => {
        $(#[$attr])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
        #[serde(transparent)]
        $vis struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

string_id! {
    /// Hotel identifier, e.g. `boutique_hotel`.
    pub struct HotelId;
}

string_id! {
    /// Reseller (travel agent) identifier, e.g. `travel_agent_1`.
    pub struct ResellerId;
}

string_id! {
    /// Identifier of one simulation run; the partition key of the supply store.
    pub struct SimulationId;
}

impl SimulationId {
    /// `sim_<unix seconds>`, the id used when the caller does not name one.
    pub fn from_clock() -> Self {
        let secs = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        SimulationId(format!("sim_{secs}"))
    }
}

// ── Supplier ──────────────────────────────────────────────────────────────────

/// Kind of supplier that fulfilled a booking.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupplierType {
    Hotel,
    #[serde(alias = "travel_agent")]
    Reseller,
}

impl fmt::Display for SupplierType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SupplierType::Hotel => "hotel",
            SupplierType::Reseller => "reseller",
        })
    }
}

/// A concrete supplier: a hotel selling its own stock, or a reseller selling
/// rooms carved out of some hotel's stock.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(tag = "supplier_type", content = "supplier_id", rename_all = "snake_case")]
pub enum Supplier {
    Hotel(HotelId),
    #[serde(alias = "travel_agent")]
    Reseller(ResellerId),
}

impl Supplier {
    /// The supplier's own id string (hotel id or reseller id).
    pub fn id(&self) -> &str {
        match self {
            Supplier::Hotel(h) => h.as_str(),
            Supplier::Reseller(r) => r.as_str(),
        }
    }

    pub fn kind(&self) -> SupplierType {
        match self {
            Supplier::Hotel(_) => SupplierType::Hotel,
            Supplier::Reseller(_) => SupplierType::Reseller,
        }
    }

    /// Rebuild from the flat `(id, type)` pair used in persisted state.
    pub fn from_parts(id: &str, kind: SupplierType) -> Self {
        match kind {
            SupplierType::Hotel => Supplier::Hotel(HotelId::from(id)),
            SupplierType::Reseller => Supplier::Reseller(ResellerId::from(id)),
        }
    }
}

impl fmt::Display for Supplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind(), self.id())
    }
}

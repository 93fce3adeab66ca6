use hs_core::{Day, HotelId, SimulationId, Supplier};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SupplyError {
    #[error("simulation {0} has no supply records")]
    NotInitialized(SimulationId),

    #[error("no supply record for {hotel} on {day}")]
    MissingSupply { hotel: HotelId, day: Day },

    #[error("{supplier} has no room at {hotel} on {day}")]
    Unavailable { supplier: Supplier, hotel: HotelId, day: Day },

    #[error("no rate for {supplier} at {hotel} on {day}")]
    MissingRate { supplier: Supplier, hotel: HotelId, day: Day },

    #[error("no shared capacity left on {0}")]
    CapacityExhausted(Day),

    #[error("empty stay window")]
    EmptyStay,
}

pub type SupplyResult<T> = Result<T, SupplyError>;

use hs_core::{HsError, SimulationId};
use hs_demand::DemandError;
use hs_pricing::PricingError;
use hs_supply::SupplyError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation {0} is not initialized; generate or load it first")]
    NotInitialized(SimulationId),

    #[error("builder error: {0}")]
    Builder(String),

    #[error("core error: {0}")]
    Core(#[from] HsError),

    #[error("demand error: {0}")]
    Demand(#[from] DemandError),

    #[error("supply error: {0}")]
    Supply(#[from] SupplyError),

    #[error("pricing error: {0}")]
    Pricing(#[from] PricingError),
}

pub type SimResult<T> = Result<T, SimError>;

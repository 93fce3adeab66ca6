use thiserror::Error;

#[derive(Debug, Error)]
pub enum PricingError {
    #[error("invalid price band: min {min} > max {max}")]
    InvalidBand { min: f64, max: f64 },

    #[error("price must be a non-negative number, got {0}")]
    InvalidPrice(f64),
}

pub type PricingResult<T> = Result<T, PricingError>;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DemandError {
    #[error("proportion_casual must be within [0, 1], got {0}")]
    InvalidProportion(f64),

    #[error("expected {expected} trip lengths, got {got}")]
    TripLengthMismatch { expected: usize, got: usize },

    #[error("itinerary {trip_id} is already booked")]
    AlreadyBooked { trip_id: u32 },
}

pub type DemandResult<T> = Result<T, DemandError>;

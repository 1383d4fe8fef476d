use std::fmt;

/// A year transition that would leave the stock in an invalid state.
///
/// When `advance_year` returns one of these the market is unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// A unit finished the year without a buyer.
    UnresolvedOwner { unit_id: u32 },
    /// Price went non-positive or non-finite (e.g. a construction boom large
    /// enough to push appreciation below -100%).
    InvalidPrice { unit_id: u32, price: f64 },
    InvalidRent { unit_id: u32, rent: f64 },
    /// Ids must equal stock position.
    IdOutOfSequence { index: usize, id: u32 },
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::UnresolvedOwner { unit_id } => {
                write!(f, "unit {unit_id} has no owner after the year")
            }
            SimulationError::InvalidPrice { unit_id, price } => {
                write!(f, "unit {unit_id} has invalid price {price}")
            }
            SimulationError::InvalidRent { unit_id, rent } => {
                write!(f, "unit {unit_id} has invalid rent {rent}")
            }
            SimulationError::IdOutOfSequence { index, id } => {
                write!(f, "unit at position {index} has id {id}")
            }
        }
    }
}

impl std::error::Error for SimulationError {}

//! Weight allocation port trait.

use crate::domain::error::ParityError;
use crate::domain::returns::ReturnMatrix;
use crate::domain::weights::Weights;

/// Turns historical returns into a long-only weight vector summing to one,
/// with one weight per ticker in the matrix's column order.
pub trait AllocatorPort {
    fn name(&self) -> &str;

    fn allocate(&self, returns: &ReturnMatrix) -> Result<Weights, ParityError>;
}

//! Pre-flight checks run before any transaction is built
use crate::error::DrawError;

/// Fewest addresses a draw accepts.
pub const MIN_ADDRESSES: usize = 2;
/// Largest winner count accepted regardless of list size.
pub const MAX_WINNERS: u64 = 100;

/// Check a requested winner count against the number of valid addresses.
pub fn validate_selection(num_winners: u64, valid_count: usize) -> Result<(), DrawError> {
    validate_selection_with(num_winners, valid_count, MIN_ADDRESSES, MAX_WINNERS)
}

/// Same as [`validate_selection`] with configurable limits.
pub fn validate_selection_with(
    num_winners: u64,
    valid_count: usize,
    min_addresses: usize,
    max_winners: u64,
) -> Result<(), DrawError> {
    if valid_count < min_addresses {
        return Err(DrawError::NotEnoughAddresses {
            found: valid_count,
            required: min_addresses,
        });
    }

    let max = max_winners.min(valid_count as u64);
    if num_winners == 0 || num_winners > max {
        return Err(DrawError::InvalidWinnerCount {
            requested: num_winners,
            max,
        });
    }

    Ok(())
}

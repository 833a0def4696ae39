//! Tick-array addressing for concentrated-liquidity pools.

use crate::error::CodecError;

pub const TICK_ARRAY_SIZE: usize = 88;
pub const MIN_TICK_INDEX: i32 = -443_636;
pub const MAX_TICK_INDEX: i32 = 443_636;

/// Number of tick arrays on each side of the current one that a swap may cross.
const SWAP_TICK_ARRAY_RADIUS: i32 = 2;

fn ticks_per_array(tick_spacing: u16) -> Result<i32, CodecError> {
    if tick_spacing == 0 {
        return Err(CodecError::InvalidTickSpacing(tick_spacing));
    }
    Ok(i32::from(tick_spacing) * TICK_ARRAY_SIZE as i32)
}

/// Start index of the tick array containing `tick_index`.
///
/// Rounds toward negative infinity, so tick -1 with spacing 64 lives in the
/// array starting at -5632, not 0. A zero spacing (an uninitialized pool)
/// is rejected.
pub fn tick_array_start_index(tick_index: i32, tick_spacing: u16) -> Result<i32, CodecError> {
    let span = ticks_per_array(tick_spacing)?;
    Ok(tick_index.div_euclid(span) * span)
}

/// Start indexes of the five tick arrays a swap from `tick_current_index` may
/// touch: two below the current array, the current one, two above.
pub fn swap_tick_array_start_indexes(
    tick_current_index: i32,
    tick_spacing: u16,
) -> Result<[i32; 5], CodecError> {
    let span = ticks_per_array(tick_spacing)?;
    let current = tick_array_start_index(tick_current_index, tick_spacing)?;
    let mut starts = [0; 5];
    for (slot, offset) in starts.iter_mut().zip(-SWAP_TICK_ARRAY_RADIUS..=SWAP_TICK_ARRAY_RADIUS) {
        *slot = current + offset * span;
    }
    Ok(starts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_index_positive() {
        assert_eq!(tick_array_start_index(0, 64).unwrap(), 0);
        assert_eq!(tick_array_start_index(5631, 64).unwrap(), 0);
        assert_eq!(tick_array_start_index(5632, 64).unwrap(), 5632);
    }

    #[test]
    fn start_index_negative_rounds_down() {
        assert_eq!(tick_array_start_index(-1, 64).unwrap(), -5632);
        assert_eq!(tick_array_start_index(-5632, 64).unwrap(), -5632);
        assert_eq!(tick_array_start_index(-5633, 64).unwrap(), -11264);
    }

    #[test]
    fn start_index_small_spacing() {
        assert_eq!(tick_array_start_index(100, 1).unwrap(), 88);
        assert_eq!(tick_array_start_index(-100, 1).unwrap(), -176);
    }

    #[test]
    fn swap_arrays_surround_current() {
        assert_eq!(
            swap_tick_array_start_indexes(-1, 64).unwrap(),
            [-16896, -11264, -5632, 0, 5632]
        );
    }

    #[test]
    fn zero_spacing_is_an_error() {
        assert!(matches!(
            tick_array_start_index(100, 0),
            Err(CodecError::InvalidTickSpacing(0))
        ));
        assert!(swap_tick_array_start_indexes(100, 0).is_err());
    }
}

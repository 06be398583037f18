//! Machine position source trait
//!
//! The realtime stepper ISR updates machine position asynchronously to line
//! parsing. Parameters 1000-1004 mirror that position, so reads go through
//! this trait instead of the stored parameter table.

/// Number of live position values mirrored into the parameter space
pub const N_LIVE_POSITION: usize = 5;

/// Realtime machine position provider
///
/// Implementations must return a consistent snapshot: all values sampled from
/// the same interpolation cycle, not torn across an ISR update.
pub trait PositionSource {
    /// Current machine position, one value per mirrored slot
    fn current_position(&self) -> [f32; N_LIVE_POSITION];
}

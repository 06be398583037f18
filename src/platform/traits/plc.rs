//! PLC I/O interface trait
//!
//! Digital outputs drive relays and coolant valves through an SPI expander;
//! inputs aggregate limit switches, control pins and the probe into one
//! bitfield sample.

use crate::platform::error::PlcError;

/// Number of installed digital outputs
pub(crate) const OUTPUT_MAX: u8 = 8;

/// PLC I/O board interface
pub trait PlcIoInterface {
    /// Set one digital output
    ///
    /// The transfer to the output board is fire-and-forget: the call returns
    /// once the new state is queued, not once the relay has switched.
    ///
    /// # Errors
    ///
    /// Returns `PlcError::OutputOverflow` if `number` is beyond the
    /// installed output count.
    fn output_set_state(&mut self, number: u8, state: bool) -> Result<(), PlcError>;

    /// Current output bitfield as last commanded
    fn output_get_state(&self) -> u16;

    /// Sample all digital inputs as a bitfield
    ///
    /// Bit layout: limit switches in the low bits, control pins from bit 6,
    /// probe at bit 10.
    fn input_get_state(&mut self) -> u32;
}

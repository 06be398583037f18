//! Mock PLC I/O implementation for testing

use crate::platform::error::PlcError;
use crate::platform::traits::plc::OUTPUT_MAX;
use crate::platform::traits::PlcIoInterface;

/// Mock PLC I/O board
///
/// Records commanded outputs and serves a settable input bitfield.
///
/// # Example
///
/// ```
/// use stm_mill::platform::mock::MockPlcIo;
/// use stm_mill::platform::traits::PlcIoInterface;
///
/// let mut plc = MockPlcIo::new();
/// plc.output_set_state(2, true).unwrap();
/// assert_eq!(plc.output_get_state(), 0b100);
///
/// plc.set_inputs(0b1010);
/// assert_eq!(plc.input_get_state(), 0b1010);
/// ```
#[derive(Debug, Default)]
pub struct MockPlcIo {
    outputs: u16,
    inputs: u32,
    transfer_count: u32,
}

impl MockPlcIo {
    /// Create a new mock with all outputs off and all inputs low
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the input bitfield returned by `input_get_state`
    pub fn set_inputs(&mut self, inputs: u32) {
        self.inputs = inputs;
    }

    /// Number of output transfers commanded so far
    pub fn transfer_count(&self) -> u32 {
        self.transfer_count
    }
}

impl PlcIoInterface for MockPlcIo {
    fn output_set_state(&mut self, number: u8, state: bool) -> Result<(), PlcError> {
        if number >= OUTPUT_MAX {
            return Err(PlcError::OutputOverflow);
        }
        if state {
            self.outputs |= 1 << number;
        } else {
            self.outputs &= !(1 << number);
        }
        self.transfer_count += 1;
        Ok(())
    }

    fn output_get_state(&self) -> u16 {
        self.outputs
    }

    fn input_get_state(&mut self) -> u32 {
        self.inputs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_plc_outputs() {
        let mut plc = MockPlcIo::new();
        plc.output_set_state(0, true).unwrap();
        plc.output_set_state(3, true).unwrap();
        assert_eq!(plc.output_get_state(), 0b1001);

        plc.output_set_state(0, false).unwrap();
        assert_eq!(plc.output_get_state(), 0b1000);
    }

    #[test]
    fn test_mock_plc_output_overflow() {
        let mut plc = MockPlcIo::new();
        assert_eq!(plc.output_set_state(8, true), Err(PlcError::OutputOverflow));
    }
}

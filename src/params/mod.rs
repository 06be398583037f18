//! Numbered parameter table and live-value dispatch
//!
//! The interpreter keeps 6000 numbered parameters. Most are plain stored
//! floats, but three windows dispatch elsewhere:
//!
//! - 1000-1004 mirror the realtime machine position
//! - 3000-3127 drive PLC digital outputs when written
//! - 3128-3999 sample PLC digital inputs when read
//!
//! Assignments parsed from a line are staged here and committed together
//! once the whole line has been read, which is what gives parameter setting
//! its parallel semantics.

use heapless::Vec;

use crate::gcode::error::EvalError;
use crate::log_warn;
use crate::platform::error::PlcError;
use crate::platform::traits::{
    ParamReporter, PlcIoInterface, PositionSource, ReportValue, N_LIVE_POSITION,
};

/// Number of parameter slots; valid parameter numbers are 1..=5999
pub const MAX_PARAMETERS: usize = 6000;

/// First parameter mirroring the live machine position
pub const PARAM_LIVE_POSITION_BASE: u16 = 1000;

/// First PLC digital output parameter
pub const PARAM_PLC_OUTPUT_BASE: u16 = 3000;

/// First PLC digital input parameter
pub const PARAM_PLC_INPUT_BASE: u16 = 3128;

/// Last PLC digital input parameter
pub const PARAM_PLC_INPUT_END: u16 = 3999;

/// Staged assignments per line; an 80-character line cannot produce more
const PARAM_BUFFER_SIZE: usize = 50;

/// Parameter table with PLC I/O and live-position dispatch
pub struct ParameterStore<P: PlcIoInterface, S: PositionSource> {
    values: [f32; MAX_PARAMETERS],
    staged: Vec<(u16, f32), PARAM_BUFFER_SIZE>,
    plc: P,
    position: S,
}

impl<P: PlcIoInterface, S: PositionSource> ParameterStore<P, S> {
    /// Create a store with all parameters zero
    pub fn new(plc: P, position: S) -> Self {
        Self {
            values: [0.0; MAX_PARAMETERS],
            staged: Vec::new(),
            plc,
            position,
        }
    }

    /// Read a parameter with full window dispatch
    ///
    /// Live position mirrors return the current machine position; the PLC
    /// input window samples the input bitfield as 0.0 or 1.0. Out-of-range
    /// numbers are an error, never clamped.
    pub fn read(&mut self, index: u16) -> Result<f32, EvalError> {
        Self::check_range(index)?;
        if let Some(axis) = Self::live_position_slot(index) {
            return Ok(self.position.current_position()[axis]);
        }
        if (PARAM_PLC_INPUT_BASE..=PARAM_PLC_INPUT_END).contains(&index) {
            let bit = index - PARAM_PLC_INPUT_BASE;
            let state = self.plc.input_get_state() >> bit & 1;
            return Ok(state as f32);
        }
        Ok(self.values[index as usize])
    }

    /// Read a parameter on the evaluator path
    ///
    /// Expressions see the stored table plus the live position mirrors; the
    /// PLC input window reads its stored slot here, without touching the
    /// hardware.
    pub fn read_stored(&self, index: u16) -> Result<f32, EvalError> {
        Self::check_range(index)?;
        if let Some(axis) = Self::live_position_slot(index) {
            return Ok(self.position.current_position()[axis]);
        }
        Ok(self.values[index as usize])
    }

    /// Write a parameter directly, bypassing line staging
    ///
    /// For callers outside line parsing (probe results, tool data).
    pub fn write_stored(&mut self, index: u16, value: f32) -> Result<(), EvalError> {
        Self::check_range(index)?;
        self.values[index as usize] = value;
        Ok(())
    }

    /// Stage an assignment for the current line
    pub fn stage_write(&mut self, index: u16, value: f32) {
        if self.staged.push((index, value)).is_err() {
            log_warn!("parameter stage buffer full, dropping #{}", index);
        }
    }

    /// Commit all staged assignments
    ///
    /// Assignments apply in the order they appeared on the line; the last
    /// write to a parameter wins. Writes in the PLC output window also
    /// actuate the output, with the value truncated to on/off. An output
    /// failure aborts the commit and discards what remains.
    pub fn commit_line(&mut self) -> Result<(), PlcError> {
        while !self.staged.is_empty() {
            let (index, value) = self.staged.remove(0);
            if (PARAM_PLC_OUTPUT_BASE..PARAM_PLC_INPUT_BASE).contains(&index) {
                let number = (index - PARAM_PLC_OUTPUT_BASE) as u8;
                let state = value as u32 != 0;
                if let Err(e) = self.plc.output_set_state(number, state) {
                    self.staged.clear();
                    return Err(e);
                }
            }
            self.values[index as usize] = value;
        }
        Ok(())
    }

    /// Discard all staged assignments
    pub fn discard_line(&mut self) {
        self.staged.clear();
    }

    /// Report a parameter value on the console channel
    ///
    /// Position mirrors 1000-1002 report the live float, the first PLC
    /// input parameter reports the raw input bitfield, everything else
    /// reports the stored value.
    pub fn report<R: ParamReporter>(&mut self, index: u16, reporter: &mut R) {
        if (1000..=1002).contains(&index) {
            let axis = (index - PARAM_LIVE_POSITION_BASE) as usize;
            let value = self.position.current_position()[axis];
            reporter.report_parameter(index, ReportValue::Float(value));
        } else if index == PARAM_PLC_INPUT_BASE {
            reporter.report_parameter(index, ReportValue::Uint32(self.plc.input_get_state()));
        } else {
            reporter.report_parameter(index, ReportValue::Float(self.values[index as usize]));
        }
    }

    /// PLC I/O board handle
    pub fn plc(&self) -> &P {
        &self.plc
    }

    /// Mutable PLC I/O board handle
    pub fn plc_mut(&mut self) -> &mut P {
        &mut self.plc
    }

    /// Mutable position source handle
    pub fn position_mut(&mut self) -> &mut S {
        &mut self.position
    }

    fn check_range(index: u16) -> Result<(), EvalError> {
        if index < 1 || index as usize >= MAX_PARAMETERS {
            return Err(EvalError::ParameterOutOfRange);
        }
        Ok(())
    }

    fn live_position_slot(index: u16) -> Option<usize> {
        let offset = index.checked_sub(PARAM_LIVE_POSITION_BASE)? as usize;
        (offset < N_LIVE_POSITION).then_some(offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::{MockPlcIo, MockPosition};

    fn store() -> ParameterStore<MockPlcIo, MockPosition> {
        ParameterStore::new(MockPlcIo::new(), MockPosition::new())
    }

    #[test]
    fn test_stored_round_trip() {
        let mut store = store();
        store.write_stored(42, 3.5).unwrap();
        assert_eq!(store.read(42), Ok(3.5));
        assert_eq!(store.read_stored(42), Ok(3.5));
    }

    #[test]
    fn test_out_of_range_is_rejected() {
        let mut store = store();
        assert_eq!(store.read(0), Err(EvalError::ParameterOutOfRange));
        assert_eq!(store.read(6000), Err(EvalError::ParameterOutOfRange));
        assert_eq!(
            store.write_stored(6000, 1.0),
            Err(EvalError::ParameterOutOfRange)
        );
    }

    #[test]
    fn test_live_position_overrides_stored() {
        let mut store = store();
        store.write_stored(1000, 99.0).unwrap();
        store.position_mut().set_position([1.5, 2.5, 3.5, 4.5, 5.5]);

        assert_eq!(store.read(1000), Ok(1.5));
        assert_eq!(store.read(1004), Ok(5.5));
        assert_eq!(store.read_stored(1002), Ok(3.5));
        // First parameter after the mirror window is stored again.
        assert_eq!(store.read(1005), Ok(0.0));
    }

    #[test]
    fn test_input_window_samples_bitfield() {
        let mut store = store();
        store.plc_mut().set_inputs(0b101);

        assert_eq!(store.read(3128), Ok(1.0));
        assert_eq!(store.read(3129), Ok(0.0));
        assert_eq!(store.read(3130), Ok(1.0));
        // The evaluator path reads the stored slot instead.
        assert_eq!(store.read_stored(3128), Ok(0.0));
    }

    #[test]
    fn test_commit_applies_in_order() {
        let mut store = store();
        store.stage_write(7, 1.0);
        store.stage_write(8, 2.0);
        store.stage_write(7, 3.0);
        store.commit_line().unwrap();

        assert_eq!(store.read_stored(7), Ok(3.0));
        assert_eq!(store.read_stored(8), Ok(2.0));
    }

    #[test]
    fn test_discard_clears_staged() {
        let mut store = store();
        store.stage_write(7, 1.0);
        store.discard_line();
        store.commit_line().unwrap();
        assert_eq!(store.read_stored(7), Ok(0.0));
    }

    #[test]
    fn test_commit_actuates_outputs() {
        let mut store = store();
        store.stage_write(3000, 1.0);
        store.stage_write(3001, 0.5); // truncates to off
        store.commit_line().unwrap();

        assert_eq!(store.plc().output_get_state(), 0b1);
        assert_eq!(store.read_stored(3000), Ok(1.0));
        assert_eq!(store.read_stored(3001), Ok(0.5));
    }

    #[test]
    fn test_commit_output_overflow() {
        let mut store = store();
        store.stage_write(3008, 1.0);
        assert_eq!(store.commit_line(), Err(PlcError::OutputOverflow));
        // The failed commit leaves nothing staged behind.
        store.commit_line().unwrap();
    }

    #[test]
    fn test_input_window_writes_are_stored() {
        let mut store = store();
        store.stage_write(3200, 4.0);
        store.commit_line().unwrap();
        assert_eq!(store.read_stored(3200), Ok(4.0));
    }
}

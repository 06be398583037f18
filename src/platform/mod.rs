//! Platform abstraction layer
//!
//! This module provides hardware abstraction for the external collaborators of
//! the parameter engine: the EEPROM device, the PLC I/O board, the realtime
//! machine position and the report channel. All board-specific code must stay
//! behind these traits.

pub mod error;
pub mod traits;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export commonly used types
pub use error::{EepromError, PlatformError, PlcError, Result};
pub use traits::{
    EepromInterface, ParamReporter, PlcIoInterface, PositionSource, ReportValue, N_LIVE_POSITION,
};

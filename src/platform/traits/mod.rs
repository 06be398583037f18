//! Platform abstraction traits
//!
//! This module defines the traits that platform implementations must provide.

pub mod eeprom;
pub mod plc;
pub mod position;
pub mod report;

// Re-export trait interfaces
pub use eeprom::EepromInterface;
pub use plc::PlcIoInterface;
pub use position::{PositionSource, N_LIVE_POSITION};
pub use report::{ParamReporter, ReportValue};

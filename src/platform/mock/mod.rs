//! Mock platform implementations for testing
//!
//! This module provides mock implementations of platform traits that can be
//! used for unit testing without requiring actual hardware.
//!
//! # Feature Gate
//!
//! This module is available in two contexts:
//! - During test builds (`#[cfg(test)]`)
//! - When the `mock` feature is enabled

#![cfg(any(test, feature = "mock"))]

mod eeprom;
mod plc;
mod position;
mod report;

pub use eeprom::MockEeprom;
pub use plc::MockPlcIo;
pub use position::MockPosition;
pub use report::MockReporter;

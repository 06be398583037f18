//! Platform error types
//!
//! This module defines error types for platform operations.

use core::fmt;

/// Result type for platform operations
pub type Result<T> = core::result::Result<T, PlatformError>;

/// Platform-level errors
///
/// All platform implementations map their HAL-specific errors to these variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformError {
    /// EEPROM operation failed
    Eeprom(EepromError),
    /// PLC I/O operation failed
    Plc(PlcError),
    /// Platform initialization failed
    InitializationFailed,
}

/// EEPROM-specific errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EepromError {
    /// Address outside the device capacity
    InvalidAddress,
    /// Write operation failed
    WriteFailed,
    /// Read operation failed
    ReadFailed,
}

/// PLC I/O-specific errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlcError {
    /// Output number beyond the installed output count
    OutputOverflow,
    /// Transfer to the output board failed
    TransferFailed,
}

impl PlcError {
    /// Numeric status code for the wire protocol.
    pub fn code(&self) -> u16 {
        match self {
            PlcError::OutputOverflow => 410,
            PlcError::TransferFailed => 411,
        }
    }
}

impl From<EepromError> for PlatformError {
    fn from(e: EepromError) -> Self {
        PlatformError::Eeprom(e)
    }
}

impl From<PlcError> for PlatformError {
    fn from(e: PlcError) -> Self {
        PlatformError::Plc(e)
    }
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformError::Eeprom(e) => write!(f, "EEPROM error: {:?}", e),
            PlatformError::Plc(e) => write!(f, "PLC error: {:?}", e),
            PlatformError::InitializationFailed => write!(f, "Platform initialization failed"),
        }
    }
}

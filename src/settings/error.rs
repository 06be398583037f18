//! Settings status codes
//!
//! Numeric values follow the Grbl v1.1 status code table so existing
//! senders interpret them correctly.

use core::fmt;

/// Errors from setting storage and lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsError {
    /// Setting number not recognized
    InvalidStatement,
    /// Negative value for a setting that must be positive
    NegativeValue,
    /// Setting exists but is disabled in this build
    SettingDisabled,
    /// Step pulse must be at least 1 microsecond
    StepPulseMin,
    /// Stored settings failed the version or checksum check
    ReadFail,
    /// Soft limits require homing to be enabled
    SoftLimitError,
    /// Steps/mm and max rate combination exceeds the step rate ceiling
    MaxStepRateExceeded,
    /// EEPROM device fault while persisting
    PersistFailed,
}

impl SettingsError {
    /// Numeric status code for the wire protocol
    pub fn code(&self) -> u8 {
        match self {
            SettingsError::InvalidStatement => 3,
            SettingsError::NegativeValue => 4,
            SettingsError::SettingDisabled => 5,
            SettingsError::StepPulseMin => 6,
            SettingsError::ReadFail | SettingsError::PersistFailed => 7,
            SettingsError::SoftLimitError => 10,
            SettingsError::MaxStepRateExceeded => 12,
        }
    }
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error:{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(SettingsError::InvalidStatement.code(), 3);
        assert_eq!(SettingsError::NegativeValue.code(), 4);
        assert_eq!(SettingsError::StepPulseMin.code(), 6);
        assert_eq!(SettingsError::ReadFail.code(), 7);
        assert_eq!(SettingsError::SoftLimitError.code(), 10);
        assert_eq!(SettingsError::MaxStepRateExceeded.code(), 12);
    }
}

//! Setting descriptor table
//!
//! One row per setting number, sparse. The table drives the `$$` listing,
//! the `$h` help text and the per-setting print; storing values goes through
//! `SettingsManager::store_global_setting`, which validates per number.

use core::fmt;

use crate::settings::error::SettingsError;
use crate::settings::types::{Settings, SettingsFlags, MAX_SETTING_INDEX};

/// Display format of a setting value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKind {
    Uint32,
    Uint8,
    Float { precision: usize },
    Bool,
}

/// Which field of [`Settings`] a table row reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingField {
    PulseMicroseconds,
    StepperIdleLockTime,
    StepInvertMask,
    DirInvertMask,
    Flag(SettingsFlags),
    StatusReportMask,
    JunctionDeviation,
    ArcTolerance,
    RpmMax,
    RpmMin,
    HomingDirMask,
    HomingFeedRate,
    HomingSeekRate,
    HomingDebounceDelay,
    HomingPulloff,
    StepsPerMm(usize),
    MaxRate(usize),
    /// Reported in mm/sec^2; stored in mm/min^2
    Acceleration(usize),
    /// Reported positive; stored negative
    MaxTravel(usize),
    CoordOffset(usize, usize),
    ModalPlane,
    ModalUnits,
    ModalCoord,
    ModalPathControl,
    ModalDistance,
}

impl SettingField {
    /// Current value in reporting units
    pub fn get(&self, settings: &Settings) -> f32 {
        match *self {
            SettingField::PulseMicroseconds => settings.pulse_microseconds as f32,
            SettingField::StepperIdleLockTime => settings.stepper_idle_lock_time as f32,
            SettingField::StepInvertMask => settings.step_invert_mask as f32,
            SettingField::DirInvertMask => settings.dir_invert_mask as f32,
            SettingField::Flag(flag) => {
                if settings.flags.contains(flag) {
                    1.0
                } else {
                    0.0
                }
            }
            SettingField::StatusReportMask => settings.status_report_mask as f32,
            SettingField::JunctionDeviation => settings.junction_deviation,
            SettingField::ArcTolerance => settings.arc_tolerance,
            SettingField::RpmMax => settings.rpm_max,
            SettingField::RpmMin => settings.rpm_min,
            SettingField::HomingDirMask => settings.homing_dir_mask as f32,
            SettingField::HomingFeedRate => settings.homing_feed_rate,
            SettingField::HomingSeekRate => settings.homing_seek_rate,
            SettingField::HomingDebounceDelay => settings.homing_debounce_delay as f32,
            SettingField::HomingPulloff => settings.homing_pulloff,
            SettingField::StepsPerMm(axis) => settings.steps_per_mm[axis],
            SettingField::MaxRate(axis) => settings.max_rate[axis],
            SettingField::Acceleration(axis) => settings.acceleration[axis] / (60.0 * 60.0),
            SettingField::MaxTravel(axis) => -settings.max_travel[axis],
            SettingField::CoordOffset(set, axis) => settings.coord_offset[set][axis],
            SettingField::ModalPlane => settings.modal.plane_select as f32,
            SettingField::ModalUnits => settings.modal.units as f32,
            SettingField::ModalCoord => settings.modal.coord_select as f32,
            SettingField::ModalPathControl => settings.modal.path_control as f32,
            SettingField::ModalDistance => settings.modal.distance as f32,
        }
    }
}

/// One row of the settings table
#[derive(Debug, Clone, Copy)]
pub struct SettingDescriptor {
    pub index: u16,
    /// Included in the `$$` listing
    pub reported: bool,
    pub label: &'static str,
    pub kind: SettingKind,
    pub field: SettingField,
}

const fn row(
    index: u16,
    reported: bool,
    label: &'static str,
    kind: SettingKind,
    field: SettingField,
) -> SettingDescriptor {
    SettingDescriptor {
        index,
        reported,
        label,
        kind,
        field,
    }
}

const F3: SettingKind = SettingKind::Float { precision: 3 };

#[rustfmt::skip]
pub static SETTINGS_TABLE: &[SettingDescriptor] = &[
    row(0,  true,  "Step pulse, microseconds",   SettingKind::Uint32, SettingField::PulseMicroseconds),
    row(1,  true,  "Step idle delay, milliseconds", SettingKind::Uint32, SettingField::StepperIdleLockTime),
    row(2,  true,  "Step port invert, mask",     SettingKind::Uint32, SettingField::StepInvertMask),
    row(3,  true,  "Direction port invert, mask", SettingKind::Uint32, SettingField::DirInvertMask),
    row(4,  true,  "Step enable invert, boolean", SettingKind::Bool,  SettingField::Flag(SettingsFlags::INVERT_ST_ENABLE)),
    row(5,  true,  "Limit pins invert, boolean", SettingKind::Bool,   SettingField::Flag(SettingsFlags::INVERT_LIMIT_PINS)),
    row(6,  true,  "Probe pin invert, boolean",  SettingKind::Bool,   SettingField::Flag(SettingsFlags::INVERT_PROBE_PIN)),
    row(10, true,  "Status report, mask",        SettingKind::Uint32, SettingField::StatusReportMask),
    row(11, true,  "Junction deviation, mm",     F3,                  SettingField::JunctionDeviation),
    row(12, true,  "Arc tolerance, mm",          F3,                  SettingField::ArcTolerance),
    row(13, true,  "Report inches, boolean",     SettingKind::Bool,   SettingField::Flag(SettingsFlags::REPORT_INCHES)),
    row(20, true,  "Soft limits, boolean",       SettingKind::Bool,   SettingField::Flag(SettingsFlags::SOFT_LIMIT_ENABLE)),
    row(21, true,  "Hard limits, boolean",       SettingKind::Bool,   SettingField::Flag(SettingsFlags::HARD_LIMIT_ENABLE)),
    row(22, true,  "Homing cycle, boolean",      SettingKind::Bool,   SettingField::Flag(SettingsFlags::HOMING_ENABLE)),
    row(23, true,  "Homing dir invert, mask",    SettingKind::Uint32, SettingField::HomingDirMask),
    row(24, true,  "Homing feed, mm/min",        F3,                  SettingField::HomingFeedRate),
    row(25, true,  "Homing seek, mm/min",        F3,                  SettingField::HomingSeekRate),
    row(26, true,  "Homing debounce, milliseconds", SettingKind::Uint32, SettingField::HomingDebounceDelay),
    row(27, true,  "Homing pull-off, mm",        F3,                  SettingField::HomingPulloff),
    row(30, true,  "Max spindle speed, RPM",     F3,                  SettingField::RpmMax),
    row(31, true,  "Min spindle speed, RPM",     F3,                  SettingField::RpmMin),
    row(32, true,  "Laser mode, boolean",        SettingKind::Bool,   SettingField::Flag(SettingsFlags::LASER_MODE)),
    row(50, false, "Default plane, 0=G17 1=G18 2=G19", SettingKind::Uint8, SettingField::ModalPlane),
    row(51, false, "Default units, 0=G20 1=G21", SettingKind::Uint8,  SettingField::ModalUnits),
    row(52, false, "Default coord system, 0-5=G54-G59", SettingKind::Uint8, SettingField::ModalCoord),
    row(53, false, "Default path control, 0=G61 1=G61.1 2=G64", SettingKind::Uint8, SettingField::ModalPathControl),
    row(54, false, "Default distance mode, 0=G90 1=G91", SettingKind::Uint8, SettingField::ModalDistance),
    row(100, true,  "X steps/mm",                F3, SettingField::StepsPerMm(0)),
    row(101, true,  "Y steps/mm",                F3, SettingField::StepsPerMm(1)),
    row(102, true,  "Z steps/mm",                F3, SettingField::StepsPerMm(2)),
    row(103, false, "A steps/mm",                F3, SettingField::StepsPerMm(3)),
    row(110, true,  "X max rate, mm/min",        F3, SettingField::MaxRate(0)),
    row(111, true,  "Y max rate, mm/min",        F3, SettingField::MaxRate(1)),
    row(112, true,  "Z max rate, mm/min",        F3, SettingField::MaxRate(2)),
    row(113, false, "A max rate, mm/min",        F3, SettingField::MaxRate(3)),
    row(120, true,  "X acceleration, mm/sec^2",  F3, SettingField::Acceleration(0)),
    row(121, true,  "Y acceleration, mm/sec^2",  F3, SettingField::Acceleration(1)),
    row(122, true,  "Z acceleration, mm/sec^2",  F3, SettingField::Acceleration(2)),
    row(123, false, "A acceleration, mm/sec^2",  F3, SettingField::Acceleration(3)),
    row(130, true,  "X max travel, mm",          F3, SettingField::MaxTravel(0)),
    row(131, true,  "Y max travel, mm",          F3, SettingField::MaxTravel(1)),
    row(132, true,  "Z max travel, mm",          F3, SettingField::MaxTravel(2)),
    row(133, false, "A max travel, mm",          F3, SettingField::MaxTravel(3)),
    row(200, false, "G54 X offset, mm",          F3, SettingField::CoordOffset(0, 0)),
    row(201, false, "G54 Y offset, mm",          F3, SettingField::CoordOffset(0, 1)),
    row(202, false, "G54 Z offset, mm",          F3, SettingField::CoordOffset(0, 2)),
    row(203, false, "G54 A offset, mm",          F3, SettingField::CoordOffset(0, 3)),
    row(210, false, "G55 X offset, mm",          F3, SettingField::CoordOffset(1, 0)),
    row(211, false, "G55 Y offset, mm",          F3, SettingField::CoordOffset(1, 1)),
    row(212, false, "G55 Z offset, mm",          F3, SettingField::CoordOffset(1, 2)),
    row(213, false, "G55 A offset, mm",          F3, SettingField::CoordOffset(1, 3)),
    row(220, false, "G56 X offset, mm",          F3, SettingField::CoordOffset(2, 0)),
    row(221, false, "G56 Y offset, mm",          F3, SettingField::CoordOffset(2, 1)),
    row(222, false, "G56 Z offset, mm",          F3, SettingField::CoordOffset(2, 2)),
    row(223, false, "G56 A offset, mm",          F3, SettingField::CoordOffset(2, 3)),
    row(230, false, "G57 X offset, mm",          F3, SettingField::CoordOffset(3, 0)),
    row(231, false, "G57 Y offset, mm",          F3, SettingField::CoordOffset(3, 1)),
    row(232, false, "G57 Z offset, mm",          F3, SettingField::CoordOffset(3, 2)),
    row(233, false, "G57 A offset, mm",          F3, SettingField::CoordOffset(3, 3)),
    row(240, false, "G58 X offset, mm",          F3, SettingField::CoordOffset(4, 0)),
    row(241, false, "G58 Y offset, mm",          F3, SettingField::CoordOffset(4, 1)),
    row(242, false, "G58 Z offset, mm",          F3, SettingField::CoordOffset(4, 2)),
    row(243, false, "G58 A offset, mm",          F3, SettingField::CoordOffset(4, 3)),
    row(250, false, "G59 X offset, mm",          F3, SettingField::CoordOffset(5, 0)),
    row(251, false, "G59 Y offset, mm",          F3, SettingField::CoordOffset(5, 1)),
    row(252, false, "G59 Z offset, mm",          F3, SettingField::CoordOffset(5, 2)),
    row(253, false, "G59 A offset, mm",          F3, SettingField::CoordOffset(5, 3)),
    row(260, false, "G28 X position, mm",        F3, SettingField::CoordOffset(6, 0)),
    row(261, false, "G28 Y position, mm",        F3, SettingField::CoordOffset(6, 1)),
    row(262, false, "G28 Z position, mm",        F3, SettingField::CoordOffset(6, 2)),
    row(263, false, "G28 A position, mm",        F3, SettingField::CoordOffset(6, 3)),
    row(270, false, "G30 X position, mm",        F3, SettingField::CoordOffset(7, 0)),
    row(271, false, "G30 Y position, mm",        F3, SettingField::CoordOffset(7, 1)),
    row(272, false, "G30 Z position, mm",        F3, SettingField::CoordOffset(7, 2)),
    row(273, false, "G30 A position, mm",        F3, SettingField::CoordOffset(7, 3)),
];

/// Look up the table row for a setting number
///
/// Numbers past the table range are an error; numbers inside the range with
/// no row return `None`.
pub fn find(index: u16) -> Result<Option<&'static SettingDescriptor>, SettingsError> {
    if index > MAX_SETTING_INDEX {
        return Err(SettingsError::SettingDisabled);
    }
    Ok(SETTINGS_TABLE.iter().find(|d| d.index == index))
}

/// Help text for a setting number
pub fn help(index: u16) -> Result<&'static str, SettingsError> {
    Ok(find(index)?.map(|d| d.label).unwrap_or(""))
}

fn write_value<W: fmt::Write>(
    out: &mut W,
    descriptor: &SettingDescriptor,
    settings: &Settings,
) -> fmt::Result {
    let value = descriptor.field.get(settings);
    match descriptor.kind {
        SettingKind::Uint32 | SettingKind::Uint8 => {
            write!(out, "${}={}\r\n", descriptor.index, value as u32)
        }
        SettingKind::Float { precision } => {
            write!(out, "${}={:.*}\r\n", descriptor.index, precision, value)
        }
        SettingKind::Bool => {
            write!(out, "${}={}\r\n", descriptor.index, (value != 0.0) as u8)
        }
    }
}

/// Print one setting as `$<n>=<value>`
///
/// Unknown numbers inside the table range print nothing. The sink is a
/// serial channel in the firmware; a full sink truncates the report.
pub fn print_setting<W: fmt::Write>(
    out: &mut W,
    index: u16,
    settings: &Settings,
) -> Result<(), SettingsError> {
    if let Some(descriptor) = find(index)? {
        let _ = write_value(out, descriptor, settings);
    }
    Ok(())
}

/// Print the `$$` listing: every reported setting in table order
pub fn print_all<W: fmt::Write>(out: &mut W, settings: &Settings) {
    for descriptor in SETTINGS_TABLE.iter().filter(|d| d.reported) {
        let _ = write_value(out, descriptor, settings);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heapless::String;

    #[test]
    fn test_print_formats_by_kind() {
        let settings = Settings::defaults();
        let mut out: String<64> = String::new();

        print_setting(&mut out, 0, &settings).unwrap();
        assert_eq!(out.as_str(), "$0=10\r\n");

        out.clear();
        print_setting(&mut out, 11, &settings).unwrap();
        assert_eq!(out.as_str(), "$11=0.010\r\n");

        out.clear();
        print_setting(&mut out, 22, &settings).unwrap();
        assert_eq!(out.as_str(), "$22=0\r\n");
    }

    #[test]
    fn test_acceleration_reports_per_second() {
        let settings = Settings::defaults();
        let mut out: String<64> = String::new();
        print_setting(&mut out, 120, &settings).unwrap();
        assert_eq!(out.as_str(), "$120=10.000\r\n");
    }

    #[test]
    fn test_max_travel_reports_positive() {
        let settings = Settings::defaults();
        let mut out: String<64> = String::new();
        print_setting(&mut out, 130, &settings).unwrap();
        assert_eq!(out.as_str(), "$130=200.000\r\n");
    }

    #[test]
    fn test_out_of_table_index_disabled() {
        let settings = Settings::defaults();
        let mut out: String<64> = String::new();
        assert_eq!(
            print_setting(&mut out, 277, &settings),
            Err(SettingsError::SettingDisabled)
        );
        assert_eq!(help(1000), Err(SettingsError::SettingDisabled));
    }

    #[test]
    fn test_missing_row_prints_nothing() {
        let settings = Settings::defaults();
        let mut out: String<64> = String::new();
        print_setting(&mut out, 7, &settings).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_listing_hides_unreported_rows() {
        let settings = Settings::defaults();
        let mut out: String<2048> = String::new();
        print_all(&mut out, &settings);
        assert!(out.as_str().contains("$102="));
        assert!(!out.as_str().contains("$103="));
        assert!(!out.as_str().contains("$200="));
    }

    #[test]
    fn test_help_text() {
        assert_eq!(help(0), Ok("Step pulse, microseconds"));
        assert_eq!(help(7), Ok(""));
    }
}

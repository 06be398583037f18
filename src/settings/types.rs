//! Settings record, flags and EEPROM layout constants
//!
//! The global settings record persists as one checksummed block starting at
//! `EEPROM_ADDR_GLOBAL`, preceded by the version byte at address 0. The
//! upper half of the 1 KB EEPROM holds the coordinate vectors, the startup
//! lines and the build info string, each with its own checksum.

use bitflags::bitflags;

/// Number of machine axes (X, Y, Z, A)
pub const N_AXIS: usize = 4;

/// Version of the EEPROM data, stored in byte 0
///
/// Used to invalidate existing data when the record layout changes.
pub const SETTINGS_VERSION: u8 = 10;

/// EEPROM address of the version byte
pub const EEPROM_ADDR_VERSION: u32 = 0;

/// EEPROM address of the global settings record
pub const EEPROM_ADDR_GLOBAL: u32 = 1;

/// EEPROM address of the coordinate parameter vectors
pub const EEPROM_ADDR_PARAMETERS: u32 = 512;

/// EEPROM address of the startup line block
pub const EEPROM_ADDR_STARTUP_BLOCK: u32 = 768;

/// EEPROM address of the build info string
pub const EEPROM_ADDR_BUILD_INFO: u32 = 942;

/// Maximum line length, also the persisted size of startup lines
pub const LINE_BUFFER_SIZE: usize = 80;

/// Number of persisted startup lines
pub const N_STARTUP_LINE: usize = 2;

/// Work coordinate systems G54-G59
pub const N_COORDINATE_SYSTEM: usize = 6;

/// Persisted coordinate sets: G54-G59 plus the G28 and G30 home positions
pub const N_COORDINATE_SETS: usize = 8;

/// Coordinate set indices
pub const COORD_G54: usize = 0;
pub const COORD_G55: usize = 1;
pub const COORD_G56: usize = 2;
pub const COORD_G57: usize = 3;
pub const COORD_G58: usize = 4;
pub const COORD_G59: usize = 5;
pub const COORD_G28: usize = 6;
pub const COORD_G30: usize = 7;

/// Axis settings numbering: starts at 100, every 10, four kinds
pub const AXIS_SETTINGS_START: u16 = 100;
pub const AXIS_SETTINGS_INCREMENT: u16 = 10;
pub const AXIS_N_SETTINGS: usize = 4;

/// Coordinate offset numbering: starts at 200, every 10, eight sets
pub const AXIS_COORD_OFFSET_START: u16 = 200;
pub const AXIS_N_COORD_OFFSET: usize = 8;

/// Highest addressable setting number
pub const MAX_SETTING_INDEX: u16 = 276;

/// Step rate ceiling used to validate steps/mm against max rate
pub const MAX_STEP_RATE_HZ: f32 = 30_000.0;

bitflags! {
    /// Boolean machine settings packed into one word
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct SettingsFlags: u32 {
        const REPORT_INCHES     = 1 << 0;
        const LASER_MODE        = 1 << 1;
        const INVERT_ST_ENABLE  = 1 << 2;
        const HARD_LIMIT_ENABLE = 1 << 3;
        const HOMING_ENABLE     = 1 << 4;
        const SOFT_LIMIT_ENABLE = 1 << 5;
        const INVERT_LIMIT_PINS = 1 << 6;
        const INVERT_PROBE_PIN  = 1 << 7;
    }
}

bitflags! {
    /// Realtime status report content selection
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct StatusMask: u32 {
        const WPOS_TYPE       = 1 << 0;
        const BUFFER_STATE    = 1 << 1;
        const OVERRIDES       = 1 << 3;
        const IO              = 1 << 4;
        const WAIT_END_MOTION = 1 << 6;
        const U_AXIS          = 1 << 7;
        const A_AXIS          = 1 << 8;
        const B_AXIS          = 1 << 9;
        const INPUTS          = 1 << 10;
        const OUTPUTS         = 1 << 11;
    }
}

bitflags! {
    /// Independent restore targets for `SettingsManager::restore`
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RestoreFlags: u8 {
        const DEFAULTS      = 1 << 0;
        const PARAMETERS    = 1 << 1;
        const STARTUP_LINES = 1 << 2;
        const BUILD_INFO    = 1 << 3;
    }
}

/// Power-on G-code modal state defaults, settings 50-54
///
/// These live outside the persisted settings record; they seed the parser
/// state at reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModalDefaults {
    /// 0=G17, 1=G18, 2=G19
    pub plane_select: u8,
    /// 0=G20, 1=G21
    pub units: u8,
    /// 0-5 selects G54-G59
    pub coord_select: u8,
    /// 0=G61, 1=G61.1, 2=G64
    pub path_control: u8,
    /// 0=G90, 1=G91
    pub distance: u8,
}

impl Default for ModalDefaults {
    fn default() -> Self {
        Self {
            plane_select: 0,
            units: 1,
            coord_select: 0,
            path_control: 0,
            distance: 0,
        }
    }
}

/// Global persistent machine settings
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub steps_per_mm: [f32; N_AXIS],
    pub max_rate: [f32; N_AXIS],
    /// Stored in mm/min^2; entered and reported in mm/s^2
    pub acceleration: [f32; N_AXIS],
    /// Stored negative; entered positive
    pub max_travel: [f32; N_AXIS],

    /// Coordinate offsets, indexed by `COORD_G54`..`COORD_G30`
    pub coord_offset: [[f32; N_AXIS]; N_COORDINATE_SETS],

    pub pulse_microseconds: u32,
    pub step_invert_mask: u32,
    pub dir_invert_mask: u32,
    /// Steppers never disable at the max value 255
    pub stepper_idle_lock_time: u32,
    pub status_report_mask: u32,
    pub junction_deviation: f32,
    pub arc_tolerance: f32,

    pub rpm_max: f32,
    pub rpm_min: f32,

    pub flags: SettingsFlags,

    pub homing_dir_mask: u32,
    pub homing_feed_rate: f32,
    pub homing_seek_rate: f32,
    pub homing_debounce_delay: u32,
    pub homing_pulloff: f32,
    /// Derived from the status mask, tracks end of all motion
    pub wait_end_motion: u32,

    /// Not persisted; re-seeded from defaults on load
    pub modal: ModalDefaults,
}

impl Settings {
    /// Serialized record size in bytes, checksum excluded
    pub const SIZE: usize = 256;

    /// Compiled default settings
    pub fn defaults() -> Self {
        Self {
            steps_per_mm: [250.0; N_AXIS],
            max_rate: [500.0; N_AXIS],
            acceleration: [10.0 * 60.0 * 60.0; N_AXIS],
            max_travel: [-200.0; N_AXIS],
            coord_offset: [[0.0; N_AXIS]; N_COORDINATE_SETS],
            pulse_microseconds: 10,
            step_invert_mask: 0,
            dir_invert_mask: 0,
            stepper_idle_lock_time: 25,
            status_report_mask: StatusMask::WPOS_TYPE.bits(),
            junction_deviation: 0.010,
            arc_tolerance: 0.002,
            rpm_max: 1000.0,
            rpm_min: 0.0,
            flags: SettingsFlags::empty(),
            homing_dir_mask: 0,
            homing_feed_rate: 25.0,
            homing_seek_rate: 500.0,
            homing_debounce_delay: 250,
            homing_pulloff: 1.0,
            wait_end_motion: 0,
            modal: ModalDefaults::default(),
        }
    }

    /// Serialize to the little-endian EEPROM record layout
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut w = ByteWriter::new();
        for axis in 0..N_AXIS {
            w.put_f32(self.steps_per_mm[axis]);
        }
        for axis in 0..N_AXIS {
            w.put_f32(self.max_rate[axis]);
        }
        for axis in 0..N_AXIS {
            w.put_f32(self.acceleration[axis]);
        }
        for axis in 0..N_AXIS {
            w.put_f32(self.max_travel[axis]);
        }
        for coord in 0..N_COORDINATE_SETS {
            for axis in 0..N_AXIS {
                w.put_f32(self.coord_offset[coord][axis]);
            }
        }
        w.put_u32(self.pulse_microseconds);
        w.put_u32(self.step_invert_mask);
        w.put_u32(self.dir_invert_mask);
        w.put_u32(self.stepper_idle_lock_time);
        w.put_u32(self.status_report_mask);
        w.put_f32(self.junction_deviation);
        w.put_f32(self.arc_tolerance);
        w.put_f32(self.rpm_max);
        w.put_f32(self.rpm_min);
        w.put_u32(self.flags.bits());
        w.put_u32(self.homing_dir_mask);
        w.put_f32(self.homing_feed_rate);
        w.put_f32(self.homing_seek_rate);
        w.put_u32(self.homing_debounce_delay);
        w.put_f32(self.homing_pulloff);
        w.put_u32(self.wait_end_motion);
        w.finish()
    }

    /// Deserialize from the EEPROM record layout
    ///
    /// Returns `None` if `data` is not exactly `SIZE` bytes. Unknown flag
    /// bits are dropped.
    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        if data.len() != Self::SIZE {
            return None;
        }
        let mut r = ByteReader::new(data);
        let mut settings = Self::defaults();
        for axis in 0..N_AXIS {
            settings.steps_per_mm[axis] = r.get_f32();
        }
        for axis in 0..N_AXIS {
            settings.max_rate[axis] = r.get_f32();
        }
        for axis in 0..N_AXIS {
            settings.acceleration[axis] = r.get_f32();
        }
        for axis in 0..N_AXIS {
            settings.max_travel[axis] = r.get_f32();
        }
        for coord in 0..N_COORDINATE_SETS {
            for axis in 0..N_AXIS {
                settings.coord_offset[coord][axis] = r.get_f32();
            }
        }
        settings.pulse_microseconds = r.get_u32();
        settings.step_invert_mask = r.get_u32();
        settings.dir_invert_mask = r.get_u32();
        settings.stepper_idle_lock_time = r.get_u32();
        settings.status_report_mask = r.get_u32();
        settings.junction_deviation = r.get_f32();
        settings.arc_tolerance = r.get_f32();
        settings.rpm_max = r.get_f32();
        settings.rpm_min = r.get_f32();
        settings.flags = SettingsFlags::from_bits_truncate(r.get_u32());
        settings.homing_dir_mask = r.get_u32();
        settings.homing_feed_rate = r.get_f32();
        settings.homing_seek_rate = r.get_f32();
        settings.homing_debounce_delay = r.get_u32();
        settings.homing_pulloff = r.get_f32();
        settings.wait_end_motion = r.get_u32();
        Some(settings)
    }
}

struct ByteWriter {
    buf: [u8; Settings::SIZE],
    offset: usize,
}

impl ByteWriter {
    fn new() -> Self {
        Self {
            buf: [0; Settings::SIZE],
            offset: 0,
        }
    }

    fn put_f32(&mut self, value: f32) {
        self.buf[self.offset..self.offset + 4].copy_from_slice(&value.to_le_bytes());
        self.offset += 4;
    }

    fn put_u32(&mut self, value: u32) {
        self.buf[self.offset..self.offset + 4].copy_from_slice(&value.to_le_bytes());
        self.offset += 4;
    }

    fn finish(self) -> [u8; Settings::SIZE] {
        debug_assert_eq!(self.offset, Settings::SIZE);
        self.buf
    }
}

struct ByteReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> ByteReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    fn get_f32(&mut self) -> f32 {
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&self.data[self.offset..self.offset + 4]);
        self.offset += 4;
        f32::from_le_bytes(bytes)
    }

    fn get_u32(&mut self) -> u32 {
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&self.data[self.offset..self.offset + 4]);
        self.offset += 4;
        u32::from_le_bytes(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_round_trip() {
        let mut settings = Settings::defaults();
        settings.steps_per_mm[1] = 320.0;
        settings.coord_offset[COORD_G59][3] = -12.5;
        settings.flags = SettingsFlags::HOMING_ENABLE | SettingsFlags::REPORT_INCHES;
        settings.wait_end_motion = 1;

        let bytes = settings.to_bytes();
        let loaded = Settings::from_bytes(&bytes).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_from_bytes_rejects_wrong_size() {
        assert!(Settings::from_bytes(&[0u8; 255]).is_none());
        assert!(Settings::from_bytes(&[0u8; 257]).is_none());
    }

    #[test]
    fn test_defaults_store_travel_negative() {
        let settings = Settings::defaults();
        for axis in 0..N_AXIS {
            assert!(settings.max_travel[axis] < 0.0);
        }
    }

    #[test]
    fn test_unknown_flag_bits_dropped() {
        let mut settings = Settings::defaults();
        settings.flags = SettingsFlags::HARD_LIMIT_ENABLE;
        let mut bytes = settings.to_bytes();
        // Flags word sits after 48 floats and 5 u32 words plus 4 floats.
        let flags_offset = 48 * 4 + 5 * 4 + 4 * 4;
        bytes[flags_offset + 1] |= 0x80;
        let loaded = Settings::from_bytes(&bytes).unwrap();
        assert_eq!(loaded.flags, SettingsFlags::HARD_LIMIT_ENABLE);
    }
}

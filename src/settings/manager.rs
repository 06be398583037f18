//! Settings storage and the `$x=val` entry point
//!
//! `SettingsManager` owns the in-memory settings record and the EEPROM
//! device behind it. Subsystems that cache derived state (step/dir masks,
//! probe polarity, spindle PWM range) register through [`SubsystemHooks`]
//! and get called when the settings feeding them change.

use crate::log_warn;
use crate::platform::traits::EepromInterface;
use crate::settings::error::SettingsError;
use crate::settings::persist::{read_with_checksum, write_with_checksum};
use crate::settings::types::{
    RestoreFlags, Settings, SettingsFlags, StatusMask, AXIS_COORD_OFFSET_START,
    AXIS_N_COORD_OFFSET, AXIS_N_SETTINGS, AXIS_SETTINGS_INCREMENT, AXIS_SETTINGS_START,
    EEPROM_ADDR_BUILD_INFO, EEPROM_ADDR_GLOBAL, EEPROM_ADDR_PARAMETERS, EEPROM_ADDR_STARTUP_BLOCK,
    EEPROM_ADDR_VERSION, LINE_BUFFER_SIZE, MAX_STEP_RATE_HZ, N_AXIS, N_COORDINATE_SETS,
    N_STARTUP_LINE, SETTINGS_VERSION,
};

/// Per-coordinate-set EEPROM stride: four axis floats plus a checksum byte
const COORD_DATA_STRIDE: u32 = (N_AXIS * 4 + 1) as u32;

/// Per-startup-line EEPROM stride: line buffer plus a checksum byte
const STARTUP_LINE_STRIDE: u32 = (LINE_BUFFER_SIZE + 1) as u32;

/// Notifications for subsystems that derive state from settings
///
/// Default implementations do nothing, so a hook type only implements what
/// it cares about.
pub trait SubsystemHooks {
    /// Step or direction invert mask changed
    fn step_dir_masks_changed(&mut self, _settings: &Settings) {}
    /// Probe pin polarity changed
    fn probe_invert_changed(&mut self, _settings: &Settings) {}
    /// Report unit selection changed
    fn report_units_changed(&mut self, _settings: &Settings) {}
    /// Hard limit configuration changed
    fn limits_changed(&mut self, _settings: &Settings) {}
    /// Spindle RPM range changed
    fn spindle_changed(&mut self, _settings: &Settings) {}
}

/// Hooks implementation for builds with no derived-state subsystems
pub struct NoopHooks;

impl SubsystemHooks for NoopHooks {}

/// Persistent settings, their EEPROM image and the store entry points
pub struct SettingsManager<E: EepromInterface, H: SubsystemHooks> {
    settings: Settings,
    eeprom: E,
    hooks: H,
}

impl<E: EepromInterface, H: SubsystemHooks> SettingsManager<E, H> {
    /// Create a manager with compiled defaults; call `init` to load
    pub fn new(eeprom: E, hooks: H) -> Self {
        Self {
            settings: Settings::defaults(),
            eeprom,
            hooks,
        }
    }

    /// Active settings record
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// EEPROM device handle
    pub fn eeprom_mut(&mut self) -> &mut E {
        &mut self.eeprom
    }

    /// Load settings from EEPROM, falling back to a full restore
    ///
    /// Returns `Ok(true)` when the stored record was valid, `Ok(false)` when
    /// the version byte or checksum failed and everything was reset to
    /// defaults.
    pub fn init(&mut self) -> Result<bool, SettingsError> {
        if self.read_global()? {
            return Ok(true);
        }
        log_warn!("EEPROM settings invalid, restoring defaults");
        self.restore(RestoreFlags::all())?;
        Ok(false)
    }

    fn read_global(&mut self) -> Result<bool, SettingsError> {
        let mut version = [0u8; 1];
        self.eeprom
            .read(EEPROM_ADDR_VERSION, &mut version)
            .map_err(|_| SettingsError::ReadFail)?;
        if version[0] != SETTINGS_VERSION {
            return Ok(false);
        }
        let mut block = [0u8; Settings::SIZE];
        let valid = read_with_checksum(&mut self.eeprom, EEPROM_ADDR_GLOBAL, &mut block)
            .map_err(|_| SettingsError::ReadFail)?;
        if !valid {
            return Ok(false);
        }
        match Settings::from_bytes(&block) {
            Some(settings) => {
                self.settings = settings;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Persist the global settings record and the version byte
    pub fn write_global(&mut self) -> Result<(), SettingsError> {
        self.eeprom
            .write(EEPROM_ADDR_VERSION, &[SETTINGS_VERSION])
            .map_err(|_| SettingsError::PersistFailed)?;
        let block = self.settings.to_bytes();
        write_with_checksum(&mut self.eeprom, EEPROM_ADDR_GLOBAL, &block)
            .map_err(|_| SettingsError::PersistFailed)
    }

    /// Handle a `$<number>=<value>` statement
    ///
    /// Validates per setting number, updates the record, notifies the
    /// affected subsystem and persists. Settings 50-54 seed parser state at
    /// reset and are volatile, they never touch the EEPROM.
    pub fn store_global_setting(&mut self, parameter: u16, value: f32) -> Result<(), SettingsError> {
        if value < 0.0 {
            return Err(SettingsError::NegativeValue);
        }
        if parameter >= AXIS_COORD_OFFSET_START {
            let (set, axis) = Self::decode_axis_parameter(
                parameter - AXIS_COORD_OFFSET_START,
                AXIS_N_COORD_OFFSET,
            )?;
            self.settings.coord_offset[set][axis] = value;
        } else if parameter >= AXIS_SETTINGS_START {
            let (kind, axis) =
                Self::decode_axis_parameter(parameter - AXIS_SETTINGS_START, AXIS_N_SETTINGS)?;
            match kind {
                0 => {
                    if value * self.settings.max_rate[axis] > MAX_STEP_RATE_HZ * 60.0 {
                        return Err(SettingsError::MaxStepRateExceeded);
                    }
                    self.settings.steps_per_mm[axis] = value;
                }
                1 => {
                    if self.settings.steps_per_mm[axis] * value > MAX_STEP_RATE_HZ * 60.0 {
                        return Err(SettingsError::MaxStepRateExceeded);
                    }
                    self.settings.max_rate[axis] = value;
                }
                2 => self.settings.acceleration[axis] = value * 60.0 * 60.0,
                3 => self.settings.max_travel[axis] = -value,
                _ => return Err(SettingsError::InvalidStatement),
            }
        } else {
            match parameter {
                0 => {
                    if value < 1.0 {
                        self.settings.pulse_microseconds = Settings::defaults().pulse_microseconds;
                        return Err(SettingsError::StepPulseMin);
                    }
                    self.settings.pulse_microseconds = value as u32;
                }
                1 => self.settings.stepper_idle_lock_time = value as u32,
                2 => {
                    self.settings.step_invert_mask = value as u32;
                    self.hooks.step_dir_masks_changed(&self.settings);
                }
                3 => {
                    self.settings.dir_invert_mask = value as u32;
                    self.hooks.step_dir_masks_changed(&self.settings);
                }
                4 => self.set_flag(SettingsFlags::INVERT_ST_ENABLE, value),
                5 => self.set_flag(SettingsFlags::INVERT_LIMIT_PINS, value),
                6 => {
                    self.set_flag(SettingsFlags::INVERT_PROBE_PIN, value);
                    self.hooks.probe_invert_changed(&self.settings);
                }
                10 => {
                    self.settings.status_report_mask = value as u32;
                    let mask = StatusMask::from_bits_truncate(self.settings.status_report_mask);
                    self.settings.wait_end_motion =
                        mask.contains(StatusMask::WAIT_END_MOTION) as u32;
                }
                11 => self.settings.junction_deviation = value,
                12 => self.settings.arc_tolerance = value,
                13 => {
                    self.set_flag(SettingsFlags::REPORT_INCHES, value);
                    self.hooks.report_units_changed(&self.settings);
                }
                20 => {
                    if value != 0.0 && !self.settings.flags.contains(SettingsFlags::HOMING_ENABLE) {
                        return Err(SettingsError::SoftLimitError);
                    }
                    self.set_flag(SettingsFlags::SOFT_LIMIT_ENABLE, value);
                }
                21 => {
                    self.set_flag(SettingsFlags::HARD_LIMIT_ENABLE, value);
                    self.hooks.limits_changed(&self.settings);
                }
                22 => {
                    self.set_flag(SettingsFlags::HOMING_ENABLE, value);
                    if value == 0.0 {
                        // Soft limits cannot work without a homed origin.
                        self.settings.flags.remove(SettingsFlags::SOFT_LIMIT_ENABLE);
                    }
                }
                23 => self.settings.homing_dir_mask = value as u32,
                24 => self.settings.homing_feed_rate = value,
                25 => self.settings.homing_seek_rate = value,
                26 => self.settings.homing_debounce_delay = value as u32,
                27 => self.settings.homing_pulloff = value,
                30 => {
                    self.settings.rpm_max = value;
                    self.hooks.spindle_changed(&self.settings);
                }
                31 => {
                    self.settings.rpm_min = value;
                    self.hooks.spindle_changed(&self.settings);
                }
                32 => self.set_flag(SettingsFlags::LASER_MODE, value),
                50 => {
                    self.settings.modal.plane_select = value as u8;
                    return Ok(());
                }
                51 => {
                    self.settings.modal.units = value as u8;
                    return Ok(());
                }
                52 => {
                    self.settings.modal.coord_select = value as u8;
                    return Ok(());
                }
                53 => {
                    self.settings.modal.path_control = value as u8;
                    return Ok(());
                }
                54 => {
                    self.settings.modal.distance = value as u8;
                    return Ok(());
                }
                _ => return Err(SettingsError::InvalidStatement),
            }
        }
        self.write_global()
    }

    /// Restore the selected EEPROM regions to their blank state
    pub fn restore(&mut self, restore: RestoreFlags) -> Result<(), SettingsError> {
        if restore.contains(RestoreFlags::DEFAULTS) {
            self.settings = Settings::defaults();
            self.write_global()?;
        }
        if restore.contains(RestoreFlags::PARAMETERS) {
            for coord in 0..N_COORDINATE_SETS {
                self.write_coord_data(coord, &[0.0; N_AXIS])?;
            }
        }
        if restore.contains(RestoreFlags::STARTUP_LINES) {
            // Overwrite the whole slot so a stale checksum cannot survive.
            for n in 0..N_STARTUP_LINE {
                self.store_startup_line(n, "")?;
            }
        }
        if restore.contains(RestoreFlags::BUILD_INFO) {
            self.store_build_info("")?;
        }
        Ok(())
    }

    /// Persist one coordinate set and mirror it into the settings record
    pub fn write_coord_data(
        &mut self,
        coord: usize,
        data: &[f32; N_AXIS],
    ) -> Result<(), SettingsError> {
        if coord >= N_COORDINATE_SETS {
            return Err(SettingsError::InvalidStatement);
        }
        self.settings.coord_offset[coord] = *data;
        let mut block = [0u8; N_AXIS * 4];
        for (axis, value) in data.iter().enumerate() {
            block[axis * 4..axis * 4 + 4].copy_from_slice(&value.to_le_bytes());
        }
        let addr = EEPROM_ADDR_PARAMETERS + coord as u32 * COORD_DATA_STRIDE;
        write_with_checksum(&mut self.eeprom, addr, &block)
            .map_err(|_| SettingsError::PersistFailed)
    }

    /// Read one coordinate set from EEPROM
    ///
    /// A corrupt block is reset to zero in place and `Ok(false)` is
    /// returned with `data` zeroed.
    pub fn read_coord_data(
        &mut self,
        coord: usize,
        data: &mut [f32; N_AXIS],
    ) -> Result<bool, SettingsError> {
        if coord >= N_COORDINATE_SETS {
            return Err(SettingsError::InvalidStatement);
        }
        let addr = EEPROM_ADDR_PARAMETERS + coord as u32 * COORD_DATA_STRIDE;
        let mut block = [0u8; N_AXIS * 4];
        let valid = read_with_checksum(&mut self.eeprom, addr, &mut block)
            .map_err(|_| SettingsError::ReadFail)?;
        if !valid {
            *data = [0.0; N_AXIS];
            self.write_coord_data(coord, &[0.0; N_AXIS])?;
            return Ok(false);
        }
        for (axis, value) in data.iter_mut().enumerate() {
            let mut bytes = [0u8; 4];
            bytes.copy_from_slice(&block[axis * 4..axis * 4 + 4]);
            *value = f32::from_le_bytes(bytes);
        }
        self.settings.coord_offset[coord] = *data;
        Ok(true)
    }

    /// Persist startup line `n`, zero-padded to the line buffer size
    pub fn store_startup_line(&mut self, n: usize, line: &str) -> Result<(), SettingsError> {
        if n >= N_STARTUP_LINE || line.len() >= LINE_BUFFER_SIZE {
            return Err(SettingsError::InvalidStatement);
        }
        let mut block = [0u8; LINE_BUFFER_SIZE];
        block[..line.len()].copy_from_slice(line.as_bytes());
        let addr = EEPROM_ADDR_STARTUP_BLOCK + n as u32 * STARTUP_LINE_STRIDE;
        write_with_checksum(&mut self.eeprom, addr, &block)
            .map_err(|_| SettingsError::PersistFailed)
    }

    /// Read startup line `n` into `buf`
    ///
    /// A corrupt block is reset to an empty line and `Ok(false)` is
    /// returned with `buf` zeroed.
    pub fn read_startup_line(
        &mut self,
        n: usize,
        buf: &mut [u8; LINE_BUFFER_SIZE],
    ) -> Result<bool, SettingsError> {
        if n >= N_STARTUP_LINE {
            return Err(SettingsError::InvalidStatement);
        }
        let addr = EEPROM_ADDR_STARTUP_BLOCK + n as u32 * STARTUP_LINE_STRIDE;
        let valid = read_with_checksum(&mut self.eeprom, addr, buf)
            .map_err(|_| SettingsError::ReadFail)?;
        if !valid {
            *buf = [0; LINE_BUFFER_SIZE];
            self.store_startup_line(n, "")?;
            return Ok(false);
        }
        Ok(true)
    }

    /// Persist the build info string
    pub fn store_build_info(&mut self, info: &str) -> Result<(), SettingsError> {
        if info.len() >= LINE_BUFFER_SIZE {
            return Err(SettingsError::InvalidStatement);
        }
        let mut block = [0u8; LINE_BUFFER_SIZE];
        block[..info.len()].copy_from_slice(info.as_bytes());
        write_with_checksum(&mut self.eeprom, EEPROM_ADDR_BUILD_INFO, &block)
            .map_err(|_| SettingsError::PersistFailed)
    }

    /// Read the build info string into `buf`
    ///
    /// A corrupt block is reset to empty and `Ok(false)` is returned.
    pub fn read_build_info(
        &mut self,
        buf: &mut [u8; LINE_BUFFER_SIZE],
    ) -> Result<bool, SettingsError> {
        let valid = read_with_checksum(&mut self.eeprom, EEPROM_ADDR_BUILD_INFO, buf)
            .map_err(|_| SettingsError::ReadFail)?;
        if !valid {
            *buf = [0; LINE_BUFFER_SIZE];
            self.store_build_info("")?;
            return Ok(false);
        }
        Ok(true)
    }

    fn set_flag(&mut self, flag: SettingsFlags, value: f32) {
        self.settings.flags.set(flag, value != 0.0);
    }

    /// Decode an axis-group setting number offset into (group, axis)
    ///
    /// Numbers run in blocks of ten per group with only the first `N_AXIS`
    /// slots of each block populated.
    fn decode_axis_parameter(
        mut offset: u16,
        n_groups: usize,
    ) -> Result<(usize, usize), SettingsError> {
        let mut group = 0usize;
        loop {
            if (offset as usize) < N_AXIS {
                return Ok((group, offset as usize));
            }
            group += 1;
            if offset < AXIS_SETTINGS_INCREMENT || group == n_groups {
                return Err(SettingsError::InvalidStatement);
            }
            offset -= AXIS_SETTINGS_INCREMENT;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::MockEeprom;
    use crate::settings::types::{COORD_G28, COORD_G55};

    #[derive(Default)]
    struct RecordingHooks {
        step_dir: u32,
        probe: u32,
        units: u32,
        limits: u32,
        spindle: u32,
    }

    impl SubsystemHooks for RecordingHooks {
        fn step_dir_masks_changed(&mut self, _settings: &Settings) {
            self.step_dir += 1;
        }
        fn probe_invert_changed(&mut self, _settings: &Settings) {
            self.probe += 1;
        }
        fn report_units_changed(&mut self, _settings: &Settings) {
            self.units += 1;
        }
        fn limits_changed(&mut self, _settings: &Settings) {
            self.limits += 1;
        }
        fn spindle_changed(&mut self, _settings: &Settings) {
            self.spindle += 1;
        }
    }

    fn manager() -> SettingsManager<MockEeprom, NoopHooks> {
        SettingsManager::new(MockEeprom::new(), NoopHooks)
    }

    #[test]
    fn test_init_blank_eeprom_restores_defaults() {
        let mut manager = manager();
        assert_eq!(manager.init(), Ok(false));
        assert_eq!(manager.settings().pulse_microseconds, 10);

        // The restore persisted everything, so a second init succeeds.
        assert_eq!(manager.init(), Ok(true));
    }

    #[test]
    fn test_stored_settings_survive_reload() {
        let mut manager = manager();
        manager.init().unwrap();
        manager.store_global_setting(11, 0.025).unwrap();

        let mut reloaded = SettingsManager::new(MockEeprom::new(), NoopHooks);
        let mut image = [0u8; 1024];
        manager.eeprom_mut().get_contents(0, &mut image);
        reloaded.eeprom_mut().write(0, &image).unwrap();

        assert_eq!(reloaded.init(), Ok(true));
        assert_eq!(reloaded.settings().junction_deviation, 0.025);
    }

    #[test]
    fn test_version_mismatch_invalidates() {
        let mut manager = manager();
        manager.init().unwrap();
        manager.eeprom_mut().write(0, &[SETTINGS_VERSION + 1]).unwrap();
        assert_eq!(manager.init(), Ok(false));
    }

    #[test]
    fn test_corrupt_record_invalidates() {
        let mut manager = manager();
        manager.init().unwrap();
        manager.eeprom_mut().inject_corruption(EEPROM_ADDR_GLOBAL + 8, 1);
        assert_eq!(manager.init(), Ok(false));
    }

    #[test]
    fn test_negative_value_rejected() {
        let mut manager = manager();
        assert_eq!(
            manager.store_global_setting(11, -0.01),
            Err(SettingsError::NegativeValue)
        );
    }

    #[test]
    fn test_unknown_number_rejected() {
        let mut manager = manager();
        assert_eq!(
            manager.store_global_setting(33, 1.0),
            Err(SettingsError::InvalidStatement)
        );
        assert_eq!(
            manager.store_global_setting(104, 1.0),
            Err(SettingsError::InvalidStatement)
        );
    }

    #[test]
    fn test_step_pulse_minimum() {
        let mut manager = manager();
        manager.store_global_setting(0, 5.0).unwrap();
        assert_eq!(
            manager.store_global_setting(0, 0.0),
            Err(SettingsError::StepPulseMin)
        );
        // The failed store falls back to the default pulse width.
        assert_eq!(manager.settings().pulse_microseconds, 10);
    }

    #[test]
    fn test_step_rate_ceiling() {
        let mut manager = manager();
        // 4000 steps/mm at the default 500 mm/min rate exceeds 30 kHz.
        assert_eq!(
            manager.store_global_setting(100, 4000.0),
            Err(SettingsError::MaxStepRateExceeded)
        );
        manager.store_global_setting(100, 3000.0).unwrap();
        assert_eq!(
            manager.store_global_setting(110, 700.0),
            Err(SettingsError::MaxStepRateExceeded)
        );
    }

    #[test]
    fn test_acceleration_and_travel_conversion() {
        let mut manager = manager();
        manager.store_global_setting(121, 25.0).unwrap();
        assert_eq!(manager.settings().acceleration[1], 25.0 * 3600.0);

        manager.store_global_setting(132, 150.0).unwrap();
        assert_eq!(manager.settings().max_travel[2], -150.0);
    }

    #[test]
    fn test_soft_limits_require_homing() {
        let mut manager = manager();
        assert_eq!(
            manager.store_global_setting(20, 1.0),
            Err(SettingsError::SoftLimitError)
        );

        manager.store_global_setting(22, 1.0).unwrap();
        manager.store_global_setting(20, 1.0).unwrap();
        assert!(manager
            .settings()
            .flags
            .contains(SettingsFlags::SOFT_LIMIT_ENABLE));

        // Disabling homing drags soft limits down with it.
        manager.store_global_setting(22, 0.0).unwrap();
        assert!(!manager
            .settings()
            .flags
            .contains(SettingsFlags::SOFT_LIMIT_ENABLE));
    }

    #[test]
    fn test_status_mask_drives_wait_end_motion() {
        let mut manager = manager();
        manager.store_global_setting(10, 64.0).unwrap();
        assert_eq!(manager.settings().wait_end_motion, 1);
        manager.store_global_setting(10, 1.0).unwrap();
        assert_eq!(manager.settings().wait_end_motion, 0);
    }

    #[test]
    fn test_hooks_notified() {
        let mut manager = SettingsManager::new(MockEeprom::new(), RecordingHooks::default());
        manager.store_global_setting(2, 1.0).unwrap();
        manager.store_global_setting(3, 1.0).unwrap();
        manager.store_global_setting(6, 1.0).unwrap();
        manager.store_global_setting(13, 1.0).unwrap();
        manager.store_global_setting(21, 1.0).unwrap();
        manager.store_global_setting(30, 5000.0).unwrap();
        manager.store_global_setting(31, 100.0).unwrap();

        assert_eq!(manager.hooks.step_dir, 2);
        assert_eq!(manager.hooks.probe, 1);
        assert_eq!(manager.hooks.units, 1);
        assert_eq!(manager.hooks.limits, 1);
        assert_eq!(manager.hooks.spindle, 2);
    }

    #[test]
    fn test_modal_defaults_are_volatile() {
        let mut manager = manager();
        manager.init().unwrap();
        let writes_before = manager.eeprom_mut().write_count();

        manager.store_global_setting(50, 2.0).unwrap();
        manager.store_global_setting(54, 1.0).unwrap();
        assert_eq!(manager.settings().modal.plane_select, 2);
        assert_eq!(manager.settings().modal.distance, 1);
        assert_eq!(manager.eeprom_mut().write_count(), writes_before);

        // A reload comes back with the compiled modal defaults.
        assert_eq!(manager.init(), Ok(true));
        assert_eq!(manager.settings().modal.plane_select, 0);
    }

    #[test]
    fn test_coord_setting_number_decodes() {
        let mut manager = manager();
        manager.store_global_setting(213, 7.5).unwrap();
        assert_eq!(manager.settings().coord_offset[COORD_G55][3], 7.5);
        assert_eq!(
            manager.store_global_setting(280, 1.0),
            Err(SettingsError::InvalidStatement)
        );
    }

    #[test]
    fn test_coord_data_round_trip() {
        let mut manager = manager();
        manager
            .write_coord_data(COORD_G28, &[1.0, 2.0, 3.0, 4.0])
            .unwrap();

        let mut data = [0.0f32; N_AXIS];
        assert_eq!(manager.read_coord_data(COORD_G28, &mut data), Ok(true));
        assert_eq!(data, [1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_corrupt_coord_data_resets() {
        let mut manager = manager();
        manager
            .write_coord_data(COORD_G28, &[1.0, 2.0, 3.0, 4.0])
            .unwrap();
        let addr = EEPROM_ADDR_PARAMETERS + COORD_G28 as u32 * COORD_DATA_STRIDE;
        manager.eeprom_mut().inject_corruption(addr, 1);

        let mut data = [9.0f32; N_AXIS];
        assert_eq!(manager.read_coord_data(COORD_G28, &mut data), Ok(false));
        assert_eq!(data, [0.0; N_AXIS]);
        // The reset block reads back clean.
        assert_eq!(manager.read_coord_data(COORD_G28, &mut data), Ok(true));
    }

    #[test]
    fn test_startup_line_round_trip() {
        let mut manager = manager();
        manager.store_startup_line(1, "G21 G54").unwrap();

        let mut buf = [0u8; LINE_BUFFER_SIZE];
        assert_eq!(manager.read_startup_line(1, &mut buf), Ok(true));
        assert_eq!(&buf[..7], b"G21 G54");
        assert_eq!(buf[7], 0);
    }

    #[test]
    fn test_corrupt_startup_line_resets() {
        let mut manager = manager();
        manager.store_startup_line(0, "G90").unwrap();
        manager
            .eeprom_mut()
            .inject_corruption(EEPROM_ADDR_STARTUP_BLOCK + 1, 1);

        let mut buf = [0u8; LINE_BUFFER_SIZE];
        assert_eq!(manager.read_startup_line(0, &mut buf), Ok(false));
        assert_eq!(buf, [0u8; LINE_BUFFER_SIZE]);
        assert_eq!(manager.read_startup_line(0, &mut buf), Ok(true));
    }

    #[test]
    fn test_build_info_round_trip() {
        let mut manager = manager();
        manager.store_build_info("v1.1f.mill").unwrap();

        let mut buf = [0u8; LINE_BUFFER_SIZE];
        assert_eq!(manager.read_build_info(&mut buf), Ok(true));
        assert_eq!(&buf[..10], b"v1.1f.mill");
    }

    #[test]
    fn test_restore_regions_are_independent() {
        let mut manager = manager();
        manager.init().unwrap();
        manager.store_global_setting(11, 0.5).unwrap();
        manager.store_startup_line(0, "G91").unwrap();
        manager
            .write_coord_data(COORD_G55, &[5.0, 0.0, 0.0, 0.0])
            .unwrap();

        manager.restore(RestoreFlags::STARTUP_LINES).unwrap();

        let mut buf = [0u8; LINE_BUFFER_SIZE];
        assert_eq!(manager.read_startup_line(0, &mut buf), Ok(true));
        assert_eq!(buf[0], 0);
        assert_eq!(manager.settings().junction_deviation, 0.5);
        let mut data = [0.0f32; N_AXIS];
        assert_eq!(manager.read_coord_data(COORD_G55, &mut data), Ok(true));
        assert_eq!(data[0], 5.0);
    }

    #[test]
    fn test_restore_over_stored_line_reads_back_clean() {
        let mut manager = manager();
        manager.store_startup_line(0, "G91").unwrap();
        manager.store_build_info("v1.1f.mill").unwrap();

        manager
            .restore(RestoreFlags::STARTUP_LINES | RestoreFlags::BUILD_INFO)
            .unwrap();

        // The restored slots must read back as valid empty blocks, not as
        // corruption left over from the previous contents.
        let mut buf = [0u8; LINE_BUFFER_SIZE];
        assert_eq!(manager.read_startup_line(0, &mut buf), Ok(true));
        assert_eq!(buf, [0u8; LINE_BUFFER_SIZE]);
        assert_eq!(manager.read_build_info(&mut buf), Ok(true));
        assert_eq!(buf, [0u8; LINE_BUFFER_SIZE]);
    }

    #[test]
    fn test_restore_parameters_zeroes_coords() {
        let mut manager = manager();
        manager
            .write_coord_data(COORD_G55, &[5.0, 6.0, 7.0, 8.0])
            .unwrap();

        manager.restore(RestoreFlags::PARAMETERS).unwrap();

        let mut data = [9.0f32; N_AXIS];
        assert_eq!(manager.read_coord_data(COORD_G55, &mut data), Ok(true));
        assert_eq!(data, [0.0; N_AXIS]);
        assert_eq!(manager.settings().coord_offset[COORD_G55], [0.0; N_AXIS]);
    }
}

//! Machine settings: descriptor table, storage logic and EEPROM persistence
//!
//! Settings are addressed by number through `$<n>=<value>` statements. The
//! global record persists as one checksummed, versioned EEPROM block;
//! coordinate sets, startup lines and the build info string each persist in
//! their own checksummed slots.

pub mod error;
pub mod manager;
pub mod persist;
pub mod registry;
pub mod types;

pub use error::SettingsError;
pub use manager::{NoopHooks, SettingsManager, SubsystemHooks};
pub use registry::{help, print_all, print_setting, SettingDescriptor, SettingField, SettingKind};
pub use types::{ModalDefaults, RestoreFlags, Settings, SettingsFlags, StatusMask};
